//! Infrastructure adapters for halgen.
//!
//! This crate implements the ports defined in
//! `halgen_core::application::ports`: extraction, URL generation, and
//! text rendering. The core stays pure; everything with an opinion about
//! formats or addressing lives here.

pub mod extractor;
pub mod renderer;
pub mod url;

// Re-export commonly used adapters
pub use extractor::{FnExtractor, InMemoryExtractorLocator, SerdeExtractor};
pub use renderer::{JsonRenderer, XmlRenderer};
pub use url::TemplateUrlGenerator;
