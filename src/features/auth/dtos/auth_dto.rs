use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::dtos::UserResponseDto;
use crate::shared::validation::{not_blank, PHONE_NUMBER_REGEX};

/// Request DTO for citizen registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
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
}

/// Request DTO for user login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// Bearer token for the `Authorization` header
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_dto() -> RegisterRequestDto {
        RegisterRequestDto {
            full_name: "Siti Aminah".to_string(),
            email: "siti@desa.id".to_string(),
            password: "rahasia".to_string(),
            phone_number: Some("081234567890".to_string()),
            address: None,
            rt: Some("001".to_string()),
            rw: Some("002".to_string()),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register_dto().validate().is_ok());
    }

    #[test]
    fn test_register_short_password() {
        let dto = RegisterRequestDto {
            password: "12345".to_string(),
            ..register_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_reads_camel_case() {
        let dto: RegisterRequestDto = serde_json::from_str(
            r#"{"fullName":"Budi","email":"budi@desa.id","password":"rahasia","phoneNumber":"081234567890"}"#,
        )
        .unwrap();
        assert_eq!(dto.full_name, "Budi");
        assert_eq!(dto.phone_number.as_deref(), Some("081234567890"));
        assert!(dto.rt.is_none());
    }
}
