//! Collection strategy for route-addressed collections.
//!
//! Page links carry route params = descriptor statics plus the pagination
//! key (placeholder type), and query args = the request's live query
//! params merged underneath the descriptor's static arguments — statics
//! win on conflicts. The un-paginated self link uses the same query
//! merge.

use crate::application::error::GeneratorError;
use crate::application::generator::paging::{self, PageConfig, PageLinkSource};
use crate::application::generator::{ResourceGenerator, Strategy};
use crate::application::params::merge_params;
use crate::application::request::RequestContext;
use crate::domain::{Entity, Link, Resource};
use crate::error::HalResult;
use crate::metadata::{Metadata, MetadataKind, PaginationParamType, RouteBasedCollectionMetadata};

pub struct RouteBasedCollectionStrategy;

impl Strategy for RouteBasedCollectionStrategy {
    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::RouteBasedCollection(descriptor) = metadata else {
            return Err(GeneratorError::UnexpectedMetadataType {
                expected: MetadataKind::RouteBasedCollection,
                actual: metadata.kind(),
            }
            .into());
        };

        let collection =
            instance
                .as_collection()
                .ok_or_else(|| GeneratorError::InvalidCollection {
                    type_name: instance.type_name().to_owned(),
                })?;

        paging::extract_collection(
            self,
            PageConfig {
                relation: descriptor.collection_relation(),
                param: descriptor.pagination_param(),
                param_type: descriptor.pagination_param_type(),
            },
            collection,
            metadata,
            generator,
            request,
            depth,
        )
    }
}

impl PageLinkSource for RouteBasedCollectionStrategy {
    fn page_link(
        &self,
        rel: &str,
        page: usize,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
    ) -> HalResult<Link> {
        let descriptor = route_collection(metadata)?;

        let mut route_params = descriptor.route_params().clone();
        let mut query_params =
            merge_params(request.query_params(), descriptor.query_string_arguments());

        let page_value = serde_json::Value::from(page as u64);
        match descriptor.pagination_param_type() {
            PaginationParamType::Placeholder => {
                route_params.insert(descriptor.pagination_param().to_owned(), page_value);
            }
            _ => {
                query_params.insert(descriptor.pagination_param().to_owned(), page_value);
            }
        }

        generator.link_generator().from_route(
            rel,
            request,
            descriptor.route(),
            &route_params,
            &query_params,
        )
    }

    fn self_link(
        &self,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
    ) -> HalResult<Link> {
        let descriptor = route_collection(metadata)?;
        let query_params =
            merge_params(request.query_params(), descriptor.query_string_arguments());
        generator.link_generator().from_route(
            "self",
            request,
            descriptor.route(),
            descriptor.route_params(),
            &query_params,
        )
    }
}

fn route_collection(metadata: &Metadata) -> Result<&RouteBasedCollectionMetadata, GeneratorError> {
    match metadata {
        Metadata::RouteBasedCollection(descriptor) => Ok(descriptor),
        other => Err(GeneratorError::UnexpectedMetadataType {
            expected: MetadataKind::RouteBasedCollection,
            actual: other.kind(),
        }),
    }
}
