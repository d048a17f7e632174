//! Metadata map: type name → metadata descriptor.
//!
//! Populated once during application wiring (validated against the
//! [`TypeRegistry`]) and read-only afterwards — share it via `Arc`.
//! Lookups here are exact-match only; walking a type's ancestor chain is
//! the resource generator's responsibility.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::TypeRegistry;
use crate::metadata::Metadata;
use crate::metadata::error::MetadataError;

#[derive(Debug)]
pub struct MetadataMap {
    registry: Arc<TypeRegistry>,
    map: HashMap<String, Metadata>,
}

impl MetadataMap {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            map: HashMap::new(),
        }
    }

    /// The type universe this map was built against.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Register a descriptor for its target type.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::UndefinedType`] when the target type is not
    ///   declared in the registry
    /// - [`MetadataError::DuplicateMetadata`] when the type already has a
    ///   descriptor
    pub fn add(&mut self, metadata: Metadata) -> Result<(), MetadataError> {
        let type_name = metadata.target_type();
        if self.map.contains_key(type_name) {
            return Err(MetadataError::DuplicateMetadata {
                type_name: type_name.to_owned(),
            });
        }
        if !self.registry.contains(type_name) {
            return Err(MetadataError::UndefinedType {
                type_name: type_name.to_owned(),
            });
        }
        self.map.insert(type_name.to_owned(), metadata);
        Ok(())
    }

    pub fn has(&self, type_name: &str) -> bool {
        self.map.contains_key(type_name)
    }

    /// # Errors
    ///
    /// [`MetadataError::UndefinedMetadata`] when the type has no
    /// descriptor.
    pub fn get(&self, type_name: &str) -> Result<&Metadata, MetadataError> {
        self.map
            .get(type_name)
            .ok_or_else(|| MetadataError::UndefinedMetadata {
                type_name: type_name.to_owned(),
            })
    }
}
