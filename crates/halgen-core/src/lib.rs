//! halgen-core - HAL resource model and metadata-driven generation.
//!
//! This crate provides the domain and application layers for building
//! Hypertext Application Language representations of domain objects,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          host application               │
//! │  (HTTP handlers, wiring, negotiation)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Services             │
//! │  (ResourceGenerator, LinkGenerator)     │
//! │   strategy dispatch per metadata kind   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Extractor, UrlGenerator, Renderer)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     halgen-adapters (Infrastructure)    │
//! │ (renderers, extractors, URL templates)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Link, Resource, Metadata, TypeRegistry)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use halgen_core::prelude::*;
//! use halgen_core::metadata::RouteBasedResourceMetadata;
//! # fn wiring(extractors: Arc<dyn ExtractorLocator>, urls: Arc<dyn UrlGenerator>) -> HalResult<()> {
//!
//! // 1. Declare the type universe and map types to metadata
//! let mut registry = TypeRegistry::new();
//! registry.register("book");
//! let mut map = MetadataMap::new(Arc::new(registry));
//! map.add(RouteBasedResourceMetadata::builder("book", "books.show", "book").build()?)?;
//!
//! // 2. Wire the generator (with injected port implementations)
//! let generator = ResourceGenerator::new(
//!     Arc::new(map),
//!     extractors, // impl ExtractorLocator
//!     LinkGenerator::new(urls), // impl UrlGenerator
//! )
//! .with_default_strategies();
//! # Ok(()) }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Metadata descriptors and the type → descriptor map
pub mod metadata;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

/// Ordered parameter mapping used for route and query parameters.
pub type Params = serde_json::Map<String, serde_json::Value>;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::Params;
    pub use crate::application::{
        ExtractedFields, Extractor, ExtractorLocator, FieldValue, LinkGenerator, Renderer,
        RequestContext, ResourceGenerator, Strategy, UrlGenerator,
    };
    pub use crate::domain::{
        Element, Embedded, Entity, EntityCollection, Link, Pagination, Resource, TypeRegistry,
    };
    pub use crate::error::{ErrorCategory, HalError, HalResult};
    pub use crate::metadata::{Metadata, MetadataKind, MetadataMap, PaginationParamType};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
