//! Strategy capability: turn a domain object + its metadata into a
//! resource. One implementation per metadata kind; the generator
//! dispatches on [`MetadataKind`](crate::metadata::MetadataKind).

use crate::application::generator::ResourceGenerator;
use crate::application::request::RequestContext;
use crate::domain::{Entity, Resource};
use crate::error::HalResult;
use crate::metadata::Metadata;

pub trait Strategy: Send + Sync {
    /// # Errors
    ///
    /// [`GeneratorError::UnexpectedMetadataType`](crate::application::GeneratorError::UnexpectedMetadataType)
    /// for metadata kinds the strategy cannot handle, plus any error the
    /// extraction, link generation, or resource construction raises.
    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
        depth: usize,
    ) -> HalResult<Resource>;
}
