//! Link generation service: routing information in, [`Link`] out.
//!
//! Thin orchestration over the [`UrlGenerator`] port; strategies never
//! talk to the port directly.

use std::sync::Arc;

use crate::Params;
use crate::application::ports::UrlGenerator;
use crate::application::request::RequestContext;
use crate::domain::Link;
use crate::error::HalResult;

#[derive(Clone)]
pub struct LinkGenerator {
    url_generator: Arc<dyn UrlGenerator>,
}

impl LinkGenerator {
    pub fn new(url_generator: Arc<dyn UrlGenerator>) -> Self {
        Self { url_generator }
    }

    /// Produce a link for `relation` whose href comes from the URL
    /// generator port.
    pub fn from_route(
        &self,
        relation: &str,
        request: &RequestContext,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> HalResult<Link> {
        let href = self
            .url_generator
            .generate(request, route, route_params, query_params)?;
        Ok(Link::new(relation, href)?)
    }

    /// Same as [`from_route`](Self::from_route), marking the link as an
    /// RFC 6570 URI template.
    pub fn templated_from_route(
        &self,
        relation: &str,
        request: &RequestContext,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> HalResult<Link> {
        let href = self
            .url_generator
            .generate(request, route, route_params, query_params)?;
        Ok(Link::builder(relation).href(href).templated(true).build()?)
    }
}

impl std::fmt::Debug for LinkGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkGenerator").finish_non_exhaustive()
    }
}
