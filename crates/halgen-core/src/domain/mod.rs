//! Core domain layer for halgen.
//!
//! Pure business logic with no I/O: the [`Link`] and [`Resource`] value
//! objects with their aggregation and serialization semantics, the domain
//! object traits ([`Entity`], [`EntityCollection`]) and the
//! [`TypeRegistry`]. URL generation, extraction, and rendering are ports
//! defined in the application layer and implemented by `halgen-adapters`.

pub mod entity;
pub mod error;
pub mod link;
pub mod resource;

pub use entity::{Entity, EntityCollection, Pagination, TypeRegistry};
pub use error::DomainError;
pub use link::{Link, LinkBuilder};
pub use resource::{Element, Embedded, Resource, ResourceBuilder};
