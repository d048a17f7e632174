//! Shared collection extraction: pagination detection, bounds checking,
//! page slicing, and page-link synthesis.
//!
//! The two collection strategies differ only in how they spell hrefs, so
//! each implements [`PageLinkSource`] and delegates the rest here.

use serde_json::Value;
use tracing::debug;

use crate::application::error::GeneratorError;
use crate::application::generator::ResourceGenerator;
use crate::application::request::RequestContext;
use crate::domain::{EntityCollection, Link, Resource};
use crate::error::HalResult;
use crate::metadata::{Metadata, PaginationParamType};

/// Strategy-specific href production for collection links.
pub(crate) trait PageLinkSource {
    /// A link for the given page of the collection, with the pagination
    /// key substituted into the strategy's parameter set.
    fn page_link(
        &self,
        rel: &str,
        page: usize,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
    ) -> HalResult<Link>;

    /// The self link of an un-paginated collection.
    fn self_link(
        &self,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
    ) -> HalResult<Link>;
}

/// Pagination configuration of the dispatched collection descriptor.
pub(crate) struct PageConfig<'a> {
    pub relation: &'a str,
    pub param: &'a str,
    pub param_type: PaginationParamType,
}

pub(crate) fn extract_collection(
    links: &dyn PageLinkSource,
    config: PageConfig<'_>,
    collection: &dyn EntityCollection,
    metadata: &Metadata,
    generator: &ResourceGenerator,
    request: &RequestContext,
    depth: usize,
) -> HalResult<Resource> {
    match (collection.pagination(), config.param_type) {
        (Some(pagination), PaginationParamType::Placeholder | PaginationParamType::Query)
            if pagination.items_per_page > 0 =>
        {
            extract_paginated(
                links, config, collection, pagination, metadata, generator, request, depth,
            )
        }
        // A disabled/unrecognized pagination type, or a collection without
        // pagination info: self link and items only, no page links.
        _ => extract_plain(links, config, collection, metadata, generator, request, depth),
    }
}

#[allow(clippy::too_many_arguments)]
fn extract_paginated(
    links: &dyn PageLinkSource,
    config: PageConfig<'_>,
    collection: &dyn EntityCollection,
    pagination: crate::domain::Pagination,
    metadata: &Metadata,
    generator: &ResourceGenerator,
    request: &RequestContext,
    depth: usize,
) -> HalResult<Resource> {
    let requested = match config.param_type {
        PaginationParamType::Placeholder => request.attribute(config.param),
        _ => request.query_params().get(config.param),
    };
    let page = page_number(requested);
    let page_count = pagination.page_count();

    // Bounds are checked before any item is materialized.
    if page < 1 || (page_count > 0 && page as usize > page_count) {
        return Err(GeneratorError::OutOfBoundsPage { page, page_count }.into());
    }
    let page = page as usize;

    debug!(page, page_count, total = pagination.total_items, "paginating collection");

    let mut collection_links = vec![links.page_link("self", page, metadata, generator, request)?];
    collection_links.push(links.page_link("first", 1, metadata, generator, request)?);
    if page > 1 {
        collection_links.push(links.page_link("prev", page - 1, metadata, generator, request)?);
    }
    if page < page_count {
        collection_links.push(links.page_link("next", page + 1, metadata, generator, request)?);
    }
    collection_links.push(links.page_link("last", page_count.max(1), metadata, generator, request)?);

    let mut items = Vec::new();
    for item in collection
        .items()
        .skip((page - 1) * pagination.items_per_page)
        .take(pagination.items_per_page)
    {
        items.push(generator.from_object_at(item.as_ref(), request, depth + 1)?);
    }

    let mut builder = Resource::builder()
        .element("_page", Value::from(page as u64))
        .element("_page_count", Value::from(page_count as u64))
        .element("_total_items", Value::from(pagination.total_items as u64));
    for link in collection_links {
        builder = builder.link(link);
    }
    for link in metadata.links() {
        builder = builder.link(link.clone());
    }
    builder = builder.embed(config.relation, items);
    Ok(builder.build()?)
}

fn extract_plain(
    links: &dyn PageLinkSource,
    config: PageConfig<'_>,
    collection: &dyn EntityCollection,
    metadata: &Metadata,
    generator: &ResourceGenerator,
    request: &RequestContext,
    depth: usize,
) -> HalResult<Resource> {
    let mut items = Vec::new();
    for item in collection.items() {
        items.push(generator.from_object_at(item.as_ref(), request, depth + 1)?);
    }

    let mut builder = Resource::builder()
        .element("_total_items", Value::from(items.len() as u64))
        .link(links.self_link(metadata, generator, request)?);
    for link in metadata.links() {
        builder = builder.link(link.clone());
    }
    builder = builder.embed(config.relation, items);
    Ok(builder.build()?)
}

/// Page numbers arrive as route attributes or query parameters; absent
/// means page 1, unparseable text falls to 0 and fails the bounds check.
fn page_number(value: Option<&Value>) -> i64 {
    match value {
        None => 1,
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        Some(_) => 0,
    }
}
