//! Metadata-layer errors. All of these are configuration errors: they are
//! raised while populating the metadata map at application startup and are
//! not recoverable at runtime.

use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetadataError {
    #[error("metadata for type '{type_name}' is already registered")]
    DuplicateMetadata { type_name: String },

    #[error("cannot register metadata for undeclared type '{type_name}'")]
    UndefinedType { type_name: String },

    #[error("no metadata registered for type '{type_name}'")]
    UndefinedMetadata { type_name: String },

    #[error("metadata field '{field}' must not be empty")]
    MissingField { field: &'static str },
}

impl MetadataError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}
