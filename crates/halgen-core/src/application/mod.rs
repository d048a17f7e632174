//! Application layer: the generation pipeline and its driven ports.
//!
//! Orchestration only — resource semantics live in `crate::domain`, type
//! mapping in `crate::metadata`. Everything external (extraction, URL
//! generation, rendering) is a port implemented by `halgen-adapters` or
//! by the host application.

pub mod error;
pub mod generator;
pub mod link_generator;
pub mod params;
pub mod ports;
pub mod request;

pub use error::GeneratorError;
pub use generator::{
    ResourceGenerator, RouteBasedCollectionStrategy, RouteBasedResourceStrategy, Strategy,
    UrlBasedCollectionStrategy, UrlBasedResourceStrategy,
};
pub use link_generator::LinkGenerator;
pub use ports::{ExtractedFields, Extractor, ExtractorLocator, FieldValue, Renderer, UrlGenerator};
pub use request::RequestContext;
