//! Field-level validation results.
//!
//! Validators push every violation they find into a [`ValidationErrors`]
//! instead of stopping at the first one, so callers can report all problems
//! with a submission at once.

use std::fmt;

/// A single constraint a field value failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("can't be blank")]
    Blank,
    #[error("is too long (maximum is {max} characters)")]
    TooLong { max: usize },
    #[error("is too short (minimum is {min} characters)")]
    TooShort { min: usize },
    #[error("is invalid")]
    Invalid,
    #[error("has already been taken")]
    Taken,
    #[error("doesn't match {other}")]
    Mismatch { other: &'static str },
}

/// A violation attached to the field it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub violation: Violation,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.violation)
    }
}

/// Ordered collection of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, violation: Violation) {
        self.errors.push(FieldError { field, violation });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether `field` failed with exactly `violation`.
    pub fn contains(&self, field: &str, violation: &Violation) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && &e.violation == violation)
    }

    /// Whether `field` failed any constraint.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(error, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
