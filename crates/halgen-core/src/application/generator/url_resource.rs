//! Resource strategy for URL-addressed types: the self link is the
//! descriptor's fixed URL, no route-parameter synthesis.

use tracing::debug;

use crate::application::error::GeneratorError;
use crate::application::generator::extract::extract_instance;
use crate::application::generator::{ResourceGenerator, Strategy};
use crate::application::request::RequestContext;
use crate::domain::{Entity, Link, Resource};
use crate::error::HalResult;
use crate::metadata::{Metadata, MetadataKind};

pub struct UrlBasedResourceStrategy;

impl Strategy for UrlBasedResourceStrategy {
    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::UrlBasedResource(descriptor) = metadata else {
            return Err(GeneratorError::UnexpectedMetadataType {
                expected: MetadataKind::UrlBasedResource,
                actual: metadata.kind(),
            }
            .into());
        };

        let mut builder = Resource::builder().link(Link::new("self", descriptor.url())?);
        for link in metadata.links() {
            builder = builder.link(link.clone());
        }

        if metadata.max_depth_reached(depth) {
            debug!(depth, "max depth reached, emitting link-only resource");
        } else {
            let elements = extract_instance(
                instance,
                descriptor.extractor(),
                metadata,
                generator,
                request,
                depth,
            )?;
            for (name, element) in elements {
                builder = builder.element(name, element);
            }
        }

        Ok(builder.build()?)
    }
}
