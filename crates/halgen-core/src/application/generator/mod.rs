//! Resource generation orchestrator.
//!
//! Resolves a domain object's metadata (exact type first, then the
//! registry's ancestor chain), dispatches to the strategy registered for
//! the metadata's kind, and hands strategies everything they need to
//! recurse into nested objects.

mod extract;
mod paging;
mod route_collection;
mod route_resource;
mod strategy;
mod url_collection;
mod url_resource;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Map;
use tracing::{debug, instrument};

use crate::application::error::GeneratorError;
use crate::application::link_generator::LinkGenerator;
use crate::application::ports::ExtractorLocator;
use crate::application::request::RequestContext;
use crate::domain::{Entity, Link, Resource};
use crate::error::HalResult;
use crate::metadata::{Metadata, MetadataKind, MetadataMap};

pub use route_collection::RouteBasedCollectionStrategy;
pub use route_resource::RouteBasedResourceStrategy;
pub use strategy::Strategy;
pub use url_collection::UrlBasedCollectionStrategy;
pub use url_resource::UrlBasedResourceStrategy;

pub struct ResourceGenerator {
    metadata_map: Arc<MetadataMap>,
    extractors: Arc<dyn ExtractorLocator>,
    link_generator: LinkGenerator,
    strategies: HashMap<MetadataKind, Arc<dyn Strategy>>,
}

impl ResourceGenerator {
    /// Create a generator with no strategies registered; pair with
    /// [`add_strategy`](Self::add_strategy) or
    /// [`with_default_strategies`](Self::with_default_strategies).
    pub fn new(
        metadata_map: Arc<MetadataMap>,
        extractors: Arc<dyn ExtractorLocator>,
        link_generator: LinkGenerator,
    ) -> Self {
        Self {
            metadata_map,
            extractors,
            link_generator,
            strategies: HashMap::new(),
        }
    }

    /// Register the four built-in strategies, one per metadata kind.
    pub fn with_default_strategies(mut self) -> Self {
        self.add_strategy(
            MetadataKind::RouteBasedResource,
            Arc::new(RouteBasedResourceStrategy),
        );
        self.add_strategy(
            MetadataKind::UrlBasedResource,
            Arc::new(UrlBasedResourceStrategy),
        );
        self.add_strategy(
            MetadataKind::RouteBasedCollection,
            Arc::new(RouteBasedCollectionStrategy),
        );
        self.add_strategy(
            MetadataKind::UrlBasedCollection,
            Arc::new(UrlBasedCollectionStrategy),
        );
        self
    }

    /// Link a metadata kind to the strategy that creates resources for it.
    /// Registering again for the same kind replaces the strategy.
    pub fn add_strategy(&mut self, kind: MetadataKind, strategy: Arc<dyn Strategy>) {
        self.strategies.insert(kind, strategy);
    }

    pub fn metadata_map(&self) -> &MetadataMap {
        &self.metadata_map
    }

    pub fn extractors(&self) -> &dyn ExtractorLocator {
        self.extractors.as_ref()
    }

    pub fn link_generator(&self) -> &LinkGenerator {
        &self.link_generator
    }

    /// Build a resource for a domain object.
    pub fn from_object(&self, instance: &dyn Entity, request: &RequestContext) -> HalResult<Resource> {
        self.from_object_at(instance, request, 0)
    }

    /// Build a resource at an explicit recursion depth. Strategies call
    /// this with `depth + 1` when resolving nested objects.
    #[instrument(skip_all, fields(type_name = instance.type_name(), depth))]
    pub fn from_object_at(
        &self,
        instance: &dyn Entity,
        request: &RequestContext,
        depth: usize,
    ) -> HalResult<Resource> {
        let metadata = self.class_metadata(instance)?;

        let strategy = self.strategies.get(&metadata.kind()).ok_or(
            GeneratorError::UnknownMetadataType {
                kind: metadata.kind(),
            },
        )?;

        debug!(kind = %metadata.kind(), "dispatching to strategy");
        strategy.create_resource(instance, metadata, self, request, depth)
    }

    /// Build a bare resource from a plain mapping, optionally attaching a
    /// `self` link.
    pub fn from_array(
        &self,
        data: Map<String, serde_json::Value>,
        uri: Option<&str>,
    ) -> HalResult<Resource> {
        let resource = Resource::from_data(data)?;
        match uri {
            Some(uri) => Ok(resource.with_link(Link::new("self", uri)?)),
            None => Ok(resource),
        }
    }

    /// Metadata for the instance's exact type, else the first registered
    /// ancestor from the type registry.
    fn class_metadata(&self, instance: &dyn Entity) -> HalResult<&Metadata> {
        let type_name = instance.type_name();
        if self.metadata_map.has(type_name) {
            return Ok(self.metadata_map.get(type_name)?);
        }

        for ancestor in self.metadata_map.registry().ancestors(type_name) {
            if self.metadata_map.has(ancestor) {
                return Ok(self.metadata_map.get(ancestor)?);
            }
        }

        Err(GeneratorError::UnknownType {
            type_name: type_name.to_owned(),
        }
        .into())
    }
}

impl std::fmt::Debug for ResourceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceGenerator")
            .field("strategies", &self.strategies.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
