use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateProfileDto, UserResponseDto};
use crate::features::users::services::{UserChanges, UserService};
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // email and role are not self-service
    let changes = UserChanges {
        full_name: dto.full_name,
        phone_number: dto.phone_number,
        address: dto.address,
        rt: dto.rt,
        rw: dto.rw,
        password: dto.password,
        ..Default::default()
    };

    let updated = service.update_user(user.id, changes).await?;
    Ok(Json(ApiResponse::success(
        Some(updated.into()),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}
