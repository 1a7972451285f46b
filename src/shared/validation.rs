use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for Indonesian-style phone numbers
    /// Digits only, optionally prefixed with "+", 8 to 15 digits
    /// - Valid: "081234567890", "+6281234567890"
    /// - Invalid: "0812-3456", "phone", "12345"
    pub static ref PHONE_NUMBER_REGEX: Regex = Regex::new(r"^\+?[0-9]{8,15}$").unwrap();
}

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
