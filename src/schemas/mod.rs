// Request/response shapes per resource, decoupled from the row structs.
pub mod admin;
pub mod article;
pub mod comment;
pub mod newsletter;
pub mod spot;
pub mod user;

use std::collections::HashMap;

use crate::error::ApiError;

/// Resolve skip/limit query parameters against the configured bounds.
/// Out-of-range values are rejected, not clamped.
pub fn resolve_page(
    skip: Option<i64>,
    limit: Option<i64>,
    default_limit: i64,
    max_limit: i64,
) -> Result<(i64, i64), ApiError> {
    let skip = skip.unwrap_or(0);
    let limit = limit.unwrap_or(default_limit);

    let mut field_errors = HashMap::new();
    if skip < 0 {
        field_errors.insert("skip".to_string(), "must be greater than or equal to 0".to_string());
    }
    if limit < 1 || limit > max_limit {
        field_errors.insert("limit".to_string(), format!("must be between 1 and {}", max_limit));
    }
    if !field_errors.is_empty() {
        return Err(ApiError::unprocessable_entity("Invalid query parameters", field_errors));
    }
    Ok((skip, limit))
}

pub(crate) fn require(field: &str, value: &str, errors: &mut HashMap<String, String>) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), "This field is required".to_string());
    }
}

pub(crate) fn check_email(field: &str, value: &str, errors: &mut HashMap<String, String>) {
    let mut parts = value.split('@');
    let valid = matches!((parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && domain.contains('.'));
    if !valid {
        errors.insert(field.to_string(), "Invalid email address".to_string());
    }
}

pub(crate) fn finish_validation(
    message: &str,
    errors: HashMap<String, String>,
) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity(message, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_page_applies_defaults() {
        assert_eq!(resolve_page(None, None, 10, 100).unwrap(), (0, 10));
        assert_eq!(resolve_page(Some(20), Some(50), 10, 100).unwrap(), (20, 50));
    }

    #[test]
    fn resolve_page_rejects_out_of_range() {
        assert_eq!(resolve_page(Some(-1), None, 10, 100).unwrap_err().status_code(), 422);
        assert_eq!(resolve_page(None, Some(0), 10, 100).unwrap_err().status_code(), 422);
        assert_eq!(resolve_page(None, Some(101), 10, 100).unwrap_err().status_code(), 422);
    }

    #[test]
    fn email_check_accepts_plausible_addresses() {
        let mut errors = HashMap::new();
        check_email("email", "subscriber1@example.com", &mut errors);
        assert!(errors.is_empty());

        check_email("email", "not-an-email", &mut errors);
        assert!(errors.contains_key("email"));
    }
}
