use crate::utils::error::{PiggyError, Result};

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PiggyError::ValidationError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PiggyError::ValidationError {
            message: format!("{} must be a non-negative number, got {}", field_name, value),
        });
    }
    Ok(())
}
