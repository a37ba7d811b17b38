use crate::error::{Result, TrellisError};

/// Trims user-entered text and rejects blank or over-long input
///
/// `field` names the input in the resulting `InvalidInput` error. Length is
/// counted in characters after trimming.
pub fn normalize_text(field: &'static str, raw: &str, max_len: usize) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(TrellisError::invalid_input(field, "must not be empty"));
    }

    let len = trimmed.chars().count();
    if len > max_len {
        return Err(TrellisError::invalid_input(
            field,
            format!("{} characters exceeds the limit of {}", len, max_len),
        ));
    }

    Ok(trimmed.to_string())
}
