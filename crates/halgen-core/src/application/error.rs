//! Generation-pipeline errors.
//!
//! Most of these are configuration errors surfaced at wiring or first-use
//! time. The exception is [`GeneratorError::OutOfBoundsPage`], which is
//! triggered by ordinary client-supplied input (a bad page number) and is
//! the one variant callers should map to a client-facing response instead
//! of a server fault — check [`GeneratorError::is_client_error`].

use thiserror::Error;

use crate::error::ErrorCategory;
use crate::metadata::MetadataKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    /// The object's type (and none of its ancestors) has registered
    /// metadata.
    #[error("cannot generate a resource for unmapped type '{type_name}'")]
    UnknownType { type_name: String },

    /// No strategy is registered for the metadata kind.
    #[error("no strategy registered for {kind} metadata")]
    UnknownMetadataType { kind: MetadataKind },

    /// A strategy was dispatched metadata of a kind it cannot handle —
    /// a wiring bug.
    #[error("strategy expects {expected} metadata, received {actual}")]
    UnexpectedMetadataType {
        expected: MetadataKind,
        actual: MetadataKind,
    },

    /// The extractor locator has no service under the configured name.
    #[error("no extractor registered under name '{name}'")]
    InvalidExtractor { name: String },

    /// The extractor could not process the instance handed to it.
    #[error("extractor '{name}' cannot extract type '{type_name}'")]
    ExtractionFailed { name: String, type_name: String },

    /// A collection strategy received a non-iterable instance.
    #[error("type '{type_name}' does not provide a collection view")]
    InvalidCollection { type_name: String },

    /// Client-supplied page number outside the computed page range.
    #[error("page {page} is out of bounds for a collection of {page_count} page(s)")]
    OutOfBoundsPage { page: i64, page_count: usize },

    /// The URL generator port failed to produce an href.
    #[error("failed to generate URL for route '{route}': {reason}")]
    UrlGeneration { route: String, reason: String },
}

impl GeneratorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownMetadataType { .. }
            | Self::UnexpectedMetadataType { .. }
            | Self::InvalidExtractor { .. }
            | Self::ExtractionFailed { .. }
            | Self::UrlGeneration { .. } => ErrorCategory::Configuration,
            Self::UnknownType { .. }
            | Self::InvalidCollection { .. }
            | Self::OutOfBoundsPage { .. } => ErrorCategory::Usage,
        }
    }

    /// Whether this error stems from ordinary client input rather than a
    /// wiring or usage bug.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::OutOfBoundsPage { .. })
    }
}
