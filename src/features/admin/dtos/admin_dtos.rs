use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::shared::validation::{not_blank, PHONE_NUMBER_REGEX};

// =============================================================================
// USER MANAGEMENT DTOs
// =============================================================================

/// Query params for listing users
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UserListQuery {
    /// Filter by role: citizen, village_staff or admin
    pub role: Option<String>,
}

/// Request DTO for creating a user with any role
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 128, message = "Full name must not exceed 128 characters")
    )]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(regex(path = *PHONE_NUMBER_REGEX, message = "Invalid phone number"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 10, message = "RT must not exceed 10 characters"))]
    pub rt: Option<String>,

    #[validate(length(max = 10, message = "RW must not exceed 10 characters"))]
    pub rw: Option<String>,

    /// citizen (default), village_staff or admin
    #[schema(example = "village_staff")]
    pub role: Option<String>,
}

/// Request DTO for editing any user field
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 128, message = "Full name must not exceed 128 characters")
    )]
    pub full_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password; re-hashed before it is stored
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    #[validate(regex(path = *PHONE_NUMBER_REGEX, message = "Invalid phone number"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 10, message = "RT must not exceed 10 characters"))]
    pub rt: Option<String>,

    #[validate(length(max = 10, message = "RW must not exceed 10 characters"))]
    pub rw: Option<String>,

    pub role: Option<String>,
}

// =============================================================================
// STATS DTOs
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsDto {
    pub total: i64,
    pub citizens: i64,
    pub village_staff: i64,
    pub admins: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatsDto {
    pub total: i64,
    pub pending: i64,
    pub received: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleStatsDto {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StatsResponseDto {
    pub users: UserStatsDto,
    pub reports: ReportStatsDto,
    pub articles: ArticleStatsDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = StatsResponseDto {
            users: UserStatsDto {
                total: 3,
                citizens: 1,
                village_staff: 1,
                admins: 1,
            },
            reports: ReportStatsDto {
                in_progress: 2,
                ..Default::default()
            },
            articles: ArticleStatsDto::default(),
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["users"]["villageStaff"], 1);
        assert_eq!(json["reports"]["inProgress"], 2);
        assert_eq!(json["articles"]["total"], 0);
    }

    #[test]
    fn test_create_user_rejects_bad_email() {
        let dto: CreateUserDto = serde_json::from_str(
            r#"{"fullName":"Pak Kades","email":"not-an-email","password":"rahasia","role":"admin"}"#,
        )
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
