//! Route-template URL generation.
//!
//! A route table maps route names to path templates with `{placeholder}`
//! tokens. Generation substitutes route parameters into the tokens,
//! appends the query string, and optionally prefixes a base URL for
//! fully-qualified hrefs.

use std::collections::HashMap;

use tracing::instrument;

use halgen_core::Params;
use halgen_core::application::error::GeneratorError;
use halgen_core::application::params::{param_string, query_string};
use halgen_core::application::{RequestContext, UrlGenerator};

/// [`UrlGenerator`] backed by a static route table.
#[derive(Debug, Default, Clone)]
pub struct TemplateUrlGenerator {
    routes: HashMap<String, String>,
    base_url: Option<String>,
}

impl TemplateUrlGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route: `route("books.show", "/api/books/{id}")`.
    pub fn route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }

    /// Prefix every generated path with a base URL
    /// (e.g. `https://api.example.com`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl UrlGenerator for TemplateUrlGenerator {
    #[instrument(skip_all, fields(route))]
    fn generate(
        &self,
        _request: &RequestContext,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> Result<String, GeneratorError> {
        let template = self
            .routes
            .get(route)
            .ok_or_else(|| GeneratorError::UrlGeneration {
                route: route.to_owned(),
                reason: "unknown route".into(),
            })?;

        let mut path = template.clone();
        for (name, value) in route_params {
            path = path.replace(&format!("{{{name}}}"), &param_string(value));
        }

        if let Some(start) = path.find('{') {
            let end = path[start..].find('}').map_or(path.len(), |i| start + i + 1);
            return Err(GeneratorError::UrlGeneration {
                route: route.to_owned(),
                reason: format!("unresolved placeholder {}", &path[start..end]),
            });
        }

        let query = query_string(query_params);
        if !query.is_empty() {
            path = format!("{path}?{query}");
        }

        Ok(match &self.base_url {
            Some(base_url) => format!("{base_url}{path}"),
            None => path,
        })
    }
}
