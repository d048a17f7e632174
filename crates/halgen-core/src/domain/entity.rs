//! Domain object traits and the type registry.
//!
//! The generation pipeline works on arbitrary domain objects. Instead of
//! runtime reflection, objects implement [`Entity`] (an explicit type
//! identifier plus an [`Any`] hook for extractors), and the application
//! declares its type universe up front in a [`TypeRegistry`] — including
//! each type's ancestor chain, which drives metadata resolution for
//! subtypes.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A domain object the generation pipeline can turn into a resource.
pub trait Entity: Any + Send + Sync {
    /// The registered type identifier of this object.
    fn type_name(&self) -> &str;

    /// Downcast hook used by extractors.
    fn as_any(&self) -> &dyn Any;

    /// The collection view of this object, when it is one.
    fn as_collection(&self) -> Option<&dyn EntityCollection> {
        None
    }
}

/// A domain object holding an ordered set of other domain objects.
pub trait EntityCollection: Entity {
    /// The contained items, in order.
    fn items(&self) -> Box<dyn Iterator<Item = Arc<dyn Entity>> + '_>;

    /// Pagination characteristics, when the collection is paginated.
    /// `None` means the whole collection is always materialized.
    fn pagination(&self) -> Option<Pagination> {
        None
    }
}

/// Pagination characteristics of an [`EntityCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total_items: usize,
    pub items_per_page: usize,
}

impl Pagination {
    pub fn new(total_items: usize, items_per_page: usize) -> Self {
        Self {
            total_items,
            items_per_page,
        }
    }

    /// Number of pages. Zero items yield zero pages.
    pub fn page_count(&self) -> usize {
        if self.items_per_page == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.items_per_page)
    }
}

/// Registration-time declaration of the domain type universe.
///
/// Populated once during application wiring and read-only afterwards
/// (share via `Arc`). The metadata map consults it to reject descriptors
/// for undeclared types; the generator walks a type's ancestor chain here
/// when no exact metadata match exists.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Vec<String>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type with no ancestors.
    pub fn register(&mut self, name: impl Into<String>) -> &mut Self {
        self.types.insert(name.into(), Vec::new());
        self
    }

    /// Declare a type along with its ancestor chain, nearest first.
    pub fn register_with_ancestors<I, S>(&mut self, name: impl Into<String>, ancestors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types
            .insert(name.into(), ancestors.into_iter().map(Into::into).collect());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The declared ancestor chain of a type, nearest first. Empty for
    /// unregistered types.
    pub fn ancestors(&self, name: &str) -> &[String] {
        self.types.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
