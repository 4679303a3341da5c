//! Configuration validation utilities and rules

use crate::MurmurError;
use std::fmt;

/// Configuration validation result
pub type ValidationResult = Result<(), ValidationError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is required but missing or blank
    Required {
        /// Dotted field path
        field: String,
    },
    /// Value is out of acceptable range
    OutOfRange {
        /// Dotted field path
        field: String,
        /// Inclusive lower bound, if any
        min: Option<f64>,
        /// Inclusive upper bound, if any
        max: Option<f64>,
        /// Offending value
        actual: f64,
    },
    /// Custom validation failed
    Custom {
        /// Dotted field path
        field: String,
        /// What was wrong
        message: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { field } => {
                write!(f, "Field '{field}' is required but missing")
            }
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                let range_desc = match (min, max) {
                    (Some(min), Some(max)) => format!("between {min} and {max}"),
                    (Some(min), None) => format!("at least {min}"),
                    (None, Some(max)) => format!("at most {max}"),
                    (None, None) => "in valid range".to_string(),
                };
                write!(f, "Field '{field}' must be {range_desc} (got {actual})")
            }
            ValidationError::Custom { field, message } => {
                write!(f, "Field '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for MurmurError {
    fn from(err: ValidationError) -> Self {
        MurmurError::config(err.to_string())
    }
}

/// Configuration validator that accumulates validation rules
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
    field_prefix: String,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator for a nested field
    pub fn for_field(&self, field_name: &str) -> Self {
        Self {
            errors: Vec::new(),
            field_prefix: self.full_field_name(field_name),
        }
    }

    /// Validate that a string is present and not blank
    pub fn non_empty(&mut self, field_name: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Required {
                field: self.full_field_name(field_name),
            });
        }
        self
    }

    /// Validate that a number is within range
    pub fn range<T>(
        &mut self,
        field_name: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> &mut Self
    where
        T: PartialOrd + Copy + Into<f64>,
    {
        let below = min.is_some_and(|m| value < m);
        let above = max.is_some_and(|m| value > m);

        if below || above {
            self.errors.push(ValidationError::OutOfRange {
                field: self.full_field_name(field_name),
                min: min.map(Into::into),
                max: max.map(Into::into),
                actual: value.into(),
            });
        }
        self
    }

    /// Validate using a custom predicate
    pub fn custom<T, F>(
        &mut self,
        field_name: &str,
        value: &T,
        predicate: F,
        message: &str,
    ) -> &mut Self
    where
        T: ?Sized,
        F: FnOnce(&T) -> bool,
    {
        if !predicate(value) {
            self.errors.push(ValidationError::Custom {
                field: self.full_field_name(field_name),
                message: message.to_string(),
            });
        }
        self
    }

    /// Merge errors from another validator
    pub fn merge(&mut self, other: ConfigValidator) {
        self.errors.extend(other.errors);
    }

    /// First error, if any
    pub fn result(self) -> ValidationResult {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Get all validation errors
    pub fn all_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    fn full_field_name(&self, field_name: &str) -> String {
        if self.field_prefix.is_empty() {
            field_name.to_string()
        } else {
            format!("{}.{field_name}", self.field_prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_rejects_blank() {
        let mut v = ConfigValidator::new();
        v.non_empty("default_room", "   ");
        assert_eq!(
            v.result(),
            Err(ValidationError::Required {
                field: "default_room".to_string()
            })
        );
    }

    #[test]
    fn test_nested_field_names() {
        let root = ConfigValidator::new();
        let mut upload = root.for_field("upload");
        upload.range("timeout_ms", 0u32, Some(1), None);
        let errors = upload.all_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("upload.timeout_ms"));
        assert!(errors[0].to_string().contains("at least 1"));
    }

    #[test]
    fn test_custom_and_merge() {
        let mut root = ConfigValidator::new();
        let mut nested = root.for_field("upload");
        nested.custom("endpoint", "ftp://x", |s: &str| s.starts_with("http"), "must be http(s)");
        root.merge(nested);
        root.non_empty("default_room", "General");
        let errors = root.all_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Field 'upload.endpoint': must be http(s)"
        );
    }

    #[test]
    fn test_converts_into_config_error() {
        let err: MurmurError = ValidationError::Required {
            field: "x".to_string(),
        }
        .into();
        assert!(matches!(err, MurmurError::Config { .. }));
    }
}
