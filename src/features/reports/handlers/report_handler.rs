use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireCitizen, RequireStaff};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::MultipartForm;
use crate::features::reports::dtos::{
    AddReportActionDto, CreateReportDto, CreateReportForm, ReportDetailResponseDto,
    ReportResponseDto, UpdateReportDto, UpdateReportStatusDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::ApiResponse;

/// Submit a new report with up to 5 images
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(
        content = CreateReportForm,
        content_type = "multipart/form-data",
        description = "Report fields plus repeated `images` file parts",
    ),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error or unsupported image"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only citizens can submit reports")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    RequireCitizen(user): RequireCitizen,
    State(service): State<Arc<ReportService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let images = form.take_files("images");
    let dto = CreateReportDto {
        title: form.text_or_empty("title"),
        description: form.text_or_empty("description"),
        category: form.text_or_empty("category"),
        address: form.text_or_empty("address"),
        rt: form.text_or_empty("rt"),
        rw: form.text_or_empty("rw"),
    };

    let report = service.create_report(&user, dto, images).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List reports visible to the caller, newest first
///
/// Citizens get their own reports; staff and admins get every report with
/// the reporter's name.
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_reports(&user).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// List the caller's own reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports/my-reports",
    responses(
        (status = 200, description = "List of own reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Citizen access required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_my_reports(
    RequireCitizen(user): RequireCitizen,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_my_reports(&user).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// Get report by ID with its audit trail
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Report belongs to another citizen"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let detail = service.get_report(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(detail.into()), None, None)))
}

/// Edit own report while it is still pending
#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error or report no longer pending"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report(
    RequireCitizen(user): RequireCitizen,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.update_report(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report updated".to_string()),
        None,
    )))
}

/// Change report status with a mandatory note
#[utoipa::path(
    put,
    path = "/api/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportDetailResponseDto>),
        (status = 400, description = "Invalid status or empty action description"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Village staff or admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let detail = service
        .update_status(&user, id, &dto.status, &dto.action_description)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(detail.into()),
        Some("Report status updated".to_string()),
        None,
    )))
}

/// Add a note to the audit trail without changing status
#[utoipa::path(
    post,
    path = "/api/reports/{id}/actions",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = AddReportActionDto,
    responses(
        (status = 201, description = "Action added", body = ApiResponse<ReportDetailResponseDto>),
        (status = 400, description = "Empty description"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Village staff or admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn add_report_action(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AddReportActionDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportDetailResponseDto>>)> {
    let detail = service.add_action(&user, id, &dto.description).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(detail.into()), None, None)),
    ))
}
