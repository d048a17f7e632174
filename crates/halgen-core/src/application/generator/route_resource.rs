//! Resource strategy for route-addressed types: the self link is produced
//! through the URL generator port, with route parameters synthesized from
//! the extracted payload.

use serde_json::Value;
use tracing::debug;

use crate::Params;
use crate::application::error::GeneratorError;
use crate::application::generator::extract::extract_instance;
use crate::application::generator::{ResourceGenerator, Strategy};
use crate::application::request::RequestContext;
use crate::domain::{Element, Entity, Resource};
use crate::error::HalResult;
use crate::metadata::{Metadata, MetadataKind};

pub struct RouteBasedResourceStrategy;

impl Strategy for RouteBasedResourceStrategy {
    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::RouteBasedResource(descriptor) = metadata else {
            return Err(GeneratorError::UnexpectedMetadataType {
                expected: MetadataKind::RouteBasedResource,
                actual: metadata.kind(),
            }
            .into());
        };

        let elements = extract_instance(
            instance,
            descriptor.extractor(),
            metadata,
            generator,
            request,
            depth,
        )?;

        // The extracted payload doubles as the data source for the self
        // link's route parameters: every scalar field is injected, mapped
        // through the identifier table when configured, else under its own
        // name.
        let mut route_params = descriptor.route_params().clone();
        for (name, element) in &elements {
            if let Element::Value(value) = element {
                if is_scalar(value) {
                    let placeholder = descriptor
                        .identifiers_to_placeholders()
                        .get(name)
                        .map(String::as_str)
                        .unwrap_or(name);
                    route_params.insert(placeholder.to_owned(), value.clone());
                }
            }
        }

        let self_link = generator.link_generator().from_route(
            "self",
            request,
            descriptor.route(),
            &route_params,
            &Params::new(),
        )?;

        let mut builder = Resource::builder().link(self_link);
        for link in metadata.links() {
            builder = builder.link(link.clone());
        }

        // A depth-truncated nested resource is link-only.
        if metadata.max_depth_reached(depth) {
            debug!(depth, "max depth reached, emitting link-only resource");
        } else {
            for (name, element) in elements {
                builder = builder.element(name, element);
            }
        }

        Ok(builder.build()?)
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
