//! Field rules shared by the group and subject forms.

use crate::error::ValidationError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Whether a form creates a record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit { id: String },
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }
}

/// Trimmed, non-empty, at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required { field: "Name" });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "Name",
            max: MAX_NAME_LEN,
        });
    }
    Ok(name.to_string())
}

/// Trimmed; blank becomes `None`.
pub fn validate_description(description: &str) -> Result<Option<String>, ValidationError> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "Description",
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(Some(description.to_string()).filter(|d| !d.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("  Physics ").unwrap(), "Physics");
        assert_eq!(
            validate_name("   ").unwrap_err(),
            ValidationError::Required { field: "Name" }
        );
        assert!(validate_name(&"n".repeat(100)).is_ok());
        assert!(validate_name(&"n".repeat(101)).is_err());
        // counted in characters, not bytes
        assert!(validate_name(&"é".repeat(100)).is_ok());
    }

    #[test]
    fn test_description_rules() {
        assert_eq!(validate_description("  ").unwrap(), None);
        assert_eq!(validate_description(" x ").unwrap().as_deref(), Some("x"));
        assert!(validate_description(&"d".repeat(501)).is_err());
    }
}
