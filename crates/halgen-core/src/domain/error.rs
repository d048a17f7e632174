//! Domain-layer errors: contract violations on [`Link`](crate::domain::Link)
//! and [`Resource`](crate::domain::Resource) construction and evolution.
//!
//! Validation errors are raised at the call that violates the contract and
//! are never silently coerced; structural conflicts are raised at the
//! offending `embed`/`with_element` call. Mutator no-ops (re-adding an
//! existing relation, removing an absent element) are *not* errors — they
//! return the original instance.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("link relation must be a non-empty string")]
    EmptyRelation,

    #[error("link attribute name must be a non-empty string")]
    EmptyAttributeName,

    #[error("invalid link attribute value: {reason}")]
    InvalidAttributeValue { reason: String },

    #[error("element name cannot be empty")]
    EmptyElementName,

    #[error("'{name}' is a reserved element name and cannot be used")]
    ReservedElementName { name: String },

    #[error("cannot embed value of type {found}; expected a resource or a list of resources")]
    InvalidEmbedValue { found: &'static str },

    // ========================================================================
    // Structural Conflict Errors
    // ========================================================================
    #[error("collision detected: attempt to add element matching embedded resource name '{name}'")]
    ElementCollidesWithEmbedded { name: String },

    #[error("collision detected: attempt to embed resource matching element name '{name}'")]
    EmbedCollidesWithData { name: String },

    #[error("structurally inequivalent resources detected for element '{name}'")]
    StructurallyInequivalent { name: String },
}

impl DomainError {
    /// Error category for caller-side mapping.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyRelation
            | Self::EmptyAttributeName
            | Self::InvalidAttributeValue { .. }
            | Self::EmptyElementName
            | Self::ReservedElementName { .. }
            | Self::InvalidEmbedValue { .. } => ErrorCategory::Validation,
            Self::ElementCollidesWithEmbedded { .. }
            | Self::EmbedCollidesWithData { .. }
            | Self::StructurallyInequivalent { .. } => ErrorCategory::Conflict,
        }
    }
}
