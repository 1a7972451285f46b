use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{User, UserRole};
use crate::shared::validation::{not_blank, PHONE_NUMBER_REGEX};

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub rt: Option<String>,
    pub rw: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            phone_number: u.phone_number,
            address: u.address,
            rt: u.rt,
            rw: u.rw,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request DTO for a user updating their own profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 128, message = "Full name must not exceed 128 characters")
    )]
    pub full_name: Option<String>,

    #[validate(regex(path = *PHONE_NUMBER_REGEX, message = "Invalid phone number"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 10, message = "RT must not exceed 10 characters"))]
    pub rt: Option<String>,

    #[validate(length(max = 10, message = "RW must not exceed 10 characters"))]
    pub rw: Option<String>,

    /// New password; re-hashed before it is stored
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_rejects_blank_name_and_bad_phone() {
        let dto = UpdateProfileDto {
            full_name: Some("  ".to_string()),
            phone_number: Some("12-34".to_string()),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("phone_number"));
    }

    #[test]
    fn test_update_profile_allows_empty_patch() {
        assert!(UpdateProfileDto::default().validate().is_ok());
    }

    #[test]
    fn test_user_response_uses_camel_case() {
        let now = Utc::now();
        let dto = UserResponseDto::from(User {
            id: Uuid::now_v7(),
            full_name: "Siti Aminah".to_string(),
            email: "siti@desa.id".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            phone_number: None,
            address: None,
            rt: Some("001".to_string()),
            rw: Some("002".to_string()),
            role: UserRole::Citizen,
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["fullName"], "Siti Aminah");
        assert_eq!(json["role"], "citizen");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
