use thiserror::Error;

/// Raised while constructing records. Never recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Identifier field `{field}` must be a non-empty string")]
    EmptyIdentifier { field: &'static str },

    #[error("Field `{field}` must be a positive count, got {value}")]
    NonPositiveCount { field: &'static str, value: i64 },

    #[error("Field `{field}` is too large for a count, got {value} (max {max})")]
    CountOutOfRange {
        field: &'static str,
        value: i64,
        max: u32,
    },
}

/// Checks a count field and narrows it to `u32`.
pub(crate) fn positive_count(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveCount { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::CountOutOfRange {
        field,
        value,
        max: u32::MAX,
    })
}
