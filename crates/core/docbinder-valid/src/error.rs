//! Validation error types.
//!
//! A failed validation produces [`FormErrors`]: a list of messages, each
//! attached to a form field or to the form as a whole.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use docbinder_types::Permission;

/// Result type alias for validation.
pub type ValidationResult<T> = Result<T, FormErrors>;

/// Form field names errors can be attached to.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DOCUMENT_TYPE: &str = "document_type";
    pub const FILE: &str = "file";
    pub const HYPERLINK: &str = "hyperlink";
    pub const EXTERNAL_AUTHORS: &str = "external_authors";
    pub const PROGRAMS: &str = "programs";
    pub const AUTHORS: &str = "authors";
}

/// Message for a missing required value.
pub const REQUIRED: &str = "This field is required.";

/// One validation message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Field the message belongs to; `None` for form-wide errors.
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    /// An error attached to `field`.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// A form-wide error.
    pub fn non_field(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    pub fn is_non_field(&self) -> bool {
        self.field.is_none()
    }
}

/// All errors found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    errors: Vec<ValidationError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.push(ValidationError::field(field, message));
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.push(ValidationError::non_field(message));
    }

    /// Append all of `other`.
    pub fn extend(&mut self, other: FormErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Messages attached to `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field.as_deref() == Some(field))
            .map(|e| e.message.as_str())
    }

    /// Form-wide messages.
    pub fn non_field(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(|e| e.is_non_field())
            .map(|e| e.message.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.for_field(field).next().is_some()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for FormErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            match &error.field {
                Some(field) => write!(f, "{field}: {}", error.message)?,
                None => f.write_str(&error.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Raised when an actor lacks a permission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{username} does not have {permission} permission on documents")]
pub struct AccessDenied {
    pub username: String,
    pub permission: Permission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_messages() {
        let mut errors = FormErrors::new();
        errors.add_non_field("You must either attach a file or provide a hyperlink");
        errors.add_field(fields::TITLE, REQUIRED);
        assert_eq!(
            errors.to_string(),
            "You must either attach a file or provide a hyperlink; title: This field is required."
        );
    }

    #[test]
    fn test_field_lookup() {
        let mut errors = FormErrors::new();
        errors.add_field(fields::FILE, "bad file");
        assert!(errors.has_field(fields::FILE));
        assert!(!errors.has_field(fields::TITLE));
        assert_eq!(errors.non_field().count(), 0);
        assert_eq!(errors.for_field(fields::FILE).collect::<Vec<_>>(), vec!["bad file"]);
    }

    #[test]
    fn test_into_result() {
        assert!(FormErrors::new().into_result().is_ok());
        let errors: FormErrors = ValidationError::non_field("x").into();
        assert!(errors.into_result().is_err());
    }
}
