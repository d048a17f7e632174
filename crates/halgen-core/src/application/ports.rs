//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the generation pipeline needs from external
//! systems. The `halgen-adapters` crate provides implementations.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::Params;
use crate::application::error::GeneratorError;
use crate::application::request::RequestContext;
use crate::domain::{Entity, Resource};

/// One extracted field: either a plain value, or a nested domain object
/// left for the generator to resolve recursively.
#[derive(Clone)]
pub enum FieldValue {
    Value(Value),
    Child(Arc<dyn Entity>),
}

impl std::fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Child(child) => f.debug_tuple("Child").field(&child.type_name()).finish(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Field name → value mapping produced by an extractor, in field order.
pub type ExtractedFields = IndexMap<String, FieldValue>;

/// Port for turning a domain object into its plain field mapping.
///
/// Implemented by:
/// - `halgen_adapters::extractor::FnExtractor` (closure per type)
/// - `halgen_adapters::extractor::SerdeExtractor` (serde-serializable leaf types)
pub trait Extractor: Send + Sync {
    /// # Errors
    ///
    /// [`GeneratorError::ExtractionFailed`] when the instance is not of a
    /// type this extractor handles.
    fn extract(&self, instance: &dyn Entity) -> Result<ExtractedFields, GeneratorError>;
}

/// Port for looking up extractors by the name a metadata descriptor
/// carries.
///
/// Implemented by:
/// - `halgen_adapters::extractor::InMemoryExtractorLocator`
pub trait ExtractorLocator: Send + Sync {
    fn get(&self, name: &str) -> Option<Arc<dyn Extractor>>;
}

/// Port for producing an href from routing information and the current
/// request (the request resolves fully-qualified base URLs).
///
/// Implemented by:
/// - `halgen_adapters::url::TemplateUrlGenerator`
#[cfg_attr(test, mockall::automock)]
pub trait UrlGenerator: Send + Sync {
    /// # Errors
    ///
    /// [`GeneratorError::UrlGeneration`] when no href can be produced for
    /// the route.
    fn generate(
        &self,
        request: &RequestContext,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> Result<String, GeneratorError>;
}

/// Port for rendering a finished resource to text.
///
/// Implemented by:
/// - `halgen_adapters::renderer::JsonRenderer`
/// - `halgen_adapters::renderer::XmlRenderer`
pub trait Renderer: Send + Sync {
    fn render(&self, resource: &Resource) -> String;
}
