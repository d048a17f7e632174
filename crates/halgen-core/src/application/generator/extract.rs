//! Shared extraction step for resource strategies: run the configured
//! extractor, then recursively resolve nested mapped objects into
//! embedded resources.

use tracing::trace;

use crate::application::generator::ResourceGenerator;
use crate::application::ports::FieldValue;
use crate::application::request::RequestContext;
use crate::application::error::GeneratorError;
use crate::domain::{Element, Entity};
use crate::error::HalResult;
use crate::metadata::Metadata;

/// Extract `instance` into named elements.
///
/// When the metadata's max depth has been reached at `depth`, recursion
/// stops: only the flat values come back (they still feed route-parameter
/// synthesis), and nested objects are left unresolved. Otherwise every
/// nested object whose type is in the metadata map is resolved through
/// `generator.from_object_at(depth + 1)`; a nested *collection* is
/// unwrapped to its item list so it embeds as a plain array rather than a
/// HAL collection envelope. Nested objects of unmapped types are omitted.
pub(crate) fn extract_instance(
    instance: &dyn Entity,
    extractor_name: &str,
    metadata: &Metadata,
    generator: &ResourceGenerator,
    request: &RequestContext,
    depth: usize,
) -> HalResult<Vec<(String, Element)>> {
    let extractor = generator
        .extractors()
        .get(extractor_name)
        .ok_or_else(|| GeneratorError::InvalidExtractor {
            name: extractor_name.to_owned(),
        })?;

    let fields = extractor.extract(instance)?;
    let truncated = metadata.max_depth_reached(depth);

    let mut elements = Vec::with_capacity(fields.len());
    for (name, field) in fields {
        match field {
            FieldValue::Value(value) => elements.push((name, Element::Value(value))),
            FieldValue::Child(_) if truncated => {
                trace!(field = %name, depth, "max depth reached, leaving nested object unresolved");
            }
            FieldValue::Child(child) => {
                let metadata_map = generator.metadata_map();
                if !metadata_map.has(child.type_name()) {
                    trace!(field = %name, child_type = child.type_name(), "no metadata for nested object, omitting");
                    continue;
                }

                let child_resource = generator.from_object_at(child.as_ref(), request, depth + 1)?;
                let child_metadata = metadata_map.get(child.type_name())?;
                let element = match child_metadata.collection_relation() {
                    // Nested collections flatten to their item list.
                    Some(relation) => child_resource
                        .get_element(relation)?
                        .unwrap_or(Element::Collection(Vec::new())),
                    None => Element::Resource(child_resource),
                };
                elements.push((name, element));
            }
        }
    }

    Ok(elements)
}
