pub mod attendee;
pub mod booking;
pub mod event;
pub mod venue;

use crate::api::error::ApiError;

/// Check a string field against inclusive character-length bounds.
pub(crate) fn check_str(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::Validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}

/// Check an integer field against a lower bound.
pub(crate) fn check_min(field: &str, value: i64, min: i64) -> Result<(), ApiError> {
    if value < min {
        return Err(ApiError::Validation(format!(
            "{} must be at least {}",
            field, min
        )));
    }
    Ok(())
}
