//! Unified error handling for halgen-core.
//!
//! Wraps the per-layer error enums behind one type with a category for
//! caller-side mapping. The single error ordinary client input can cause
//! is an out-of-bounds page request — everything else is either a
//! contract violation at a call site or a wiring bug.

use thiserror::Error;

use crate::application::error::GeneratorError;
use crate::domain::error::DomainError;
use crate::metadata::error::MetadataError;

/// Root error type for halgen-core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HalError {
    /// Value-object contract violations and structural conflicts.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Metadata registration and lookup failures.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Generation-pipeline failures.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

impl HalError {
    /// Error category for caller-side mapping and display.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Metadata(e) => e.category(),
            Self::Generator(e) => e.category(),
        }
    }

    /// Whether this error stems from ordinary client input (map to a 4xx)
    /// rather than a server-side fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Generator(e) if e.is_client_error())
    }
}

/// Error categories for caller-side mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input to a value-object operation.
    Validation,
    /// Data/embed namespace collisions and container-shape mismatches.
    Conflict,
    /// Startup/wiring mistakes: bad descriptors, duplicate registrations,
    /// missing strategies or extractors.
    Configuration,
    /// Runtime usage problems, including the one client-facing error
    /// (out-of-bounds pagination).
    Usage,
}

/// Convenient result type alias.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_the_only_client_error() {
        let out_of_bounds = HalError::from(GeneratorError::OutOfBoundsPage {
            page: 0,
            page_count: 3,
        });
        assert!(out_of_bounds.is_client_error());
        assert_eq!(out_of_bounds.category(), ErrorCategory::Usage);

        let unknown = HalError::from(GeneratorError::UnknownType {
            type_name: "book".into(),
        });
        assert!(!unknown.is_client_error());

        let conflict = HalError::from(DomainError::EmbedCollidesWithData { name: "foo".into() });
        assert!(!conflict.is_client_error());
        assert_eq!(conflict.category(), ErrorCategory::Conflict);
    }
}
