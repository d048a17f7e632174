//! Read-only request view.
//!
//! The generation pipeline needs exactly two things from the current
//! request: its query parameters (pagination page detection and self-link
//! query propagation) and its named route attributes (placeholder-style
//! pagination). Transports adapt their request type into this value.

use serde_json::Value;

use crate::Params;

/// The read-only request context handed through the generation pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    query_params: Params,
    attributes: Params,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a query parameter (builder style).
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Attach a named route attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
