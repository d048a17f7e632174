//! Metadata descriptors: how a domain type maps to a HAL resource.
//!
//! Four concrete descriptor shapes exist — resource vs collection, each
//! either route-based (self links produced through the URL generator port)
//! or URL-based (self links from a fixed URL). They are carried by the
//! closed [`Metadata`] enum; the generation pipeline dispatches strategies
//! on its [`MetadataKind`] tag rather than on runtime type inspection.
//!
//! Descriptors are built through builders that fail fast on missing
//! required fields, the same configuration-time discipline the rest of the
//! crate applies: a bad descriptor is a wiring bug, surfaced before the
//! first request is served.

pub mod error;
pub mod map;

use std::str::FromStr;

use indexmap::IndexMap;

use crate::Params;
use crate::domain::Link;
use error::MetadataError;

pub use map::MetadataMap;

/// Default recursion bound for nested resource embedding.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default pagination parameter name.
pub const DEFAULT_PAGINATION_PARAM: &str = "page";

/// Closed tag set for metadata dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    RouteBasedResource,
    UrlBasedResource,
    RouteBasedCollection,
    UrlBasedCollection,
}

impl std::fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::RouteBasedResource => "route-based resource",
            Self::UrlBasedResource => "url-based resource",
            Self::RouteBasedCollection => "route-based collection",
            Self::UrlBasedCollection => "url-based collection",
        })
    }
}

/// Where a collection reads its page number from, and how page links carry
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaginationParamType {
    /// A route placeholder / path segment.
    Placeholder,
    /// A query-string parameter.
    #[default]
    Query,
    /// Pagination links are not generated; the collection still gets a
    /// self link and its items.
    Disabled,
}

impl PaginationParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Query => "query",
            Self::Disabled => "disabled",
        }
    }
}

impl FromStr for PaginationParamType {
    type Err = std::convert::Infallible;

    /// Unrecognized values map to [`Disabled`](Self::Disabled): an unknown
    /// pagination type suppresses page-link generation rather than failing
    /// the request.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "placeholder" => Self::Placeholder,
            "query" => Self::Query,
            _ => Self::Disabled,
        })
    }
}

impl std::fmt::Display for PaginationParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Resource mapped through a named route.
#[derive(Debug, Clone)]
pub struct RouteBasedResourceMetadata {
    target_type: String,
    route: String,
    extractor: String,
    max_depth: usize,
    route_params: Params,
    identifiers_to_placeholders: IndexMap<String, String>,
    links: Vec<Link>,
}

impl RouteBasedResourceMetadata {
    /// Required fields up front; optional ones on the builder.
    pub fn builder(
        target_type: impl Into<String>,
        route: impl Into<String>,
        extractor: impl Into<String>,
    ) -> RouteBasedResourceMetadataBuilder {
        RouteBasedResourceMetadataBuilder {
            target_type: target_type.into(),
            route: route.into(),
            extractor: extractor.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            route_params: Params::new(),
            identifiers_to_placeholders: IndexMap::from([("id".to_owned(), "id".to_owned())]),
            links: Vec::new(),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn extractor(&self) -> &str {
        &self.extractor
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Static route parameters merged into every generated self link.
    pub fn route_params(&self) -> &Params {
        &self.route_params
    }

    /// Extracted-field name → route placeholder name. Fields listed here
    /// are injected into route parameters under the placeholder name; all
    /// other scalar fields are injected under their own names.
    pub fn identifiers_to_placeholders(&self) -> &IndexMap<String, String> {
        &self.identifiers_to_placeholders
    }
}

pub struct RouteBasedResourceMetadataBuilder {
    target_type: String,
    route: String,
    extractor: String,
    max_depth: usize,
    route_params: Params,
    identifiers_to_placeholders: IndexMap<String, String>,
    links: Vec<Link>,
}

impl RouteBasedResourceMetadataBuilder {
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn route_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.route_params.insert(name.into(), value.into());
        self
    }

    /// Map an extracted identifier field onto a route placeholder,
    /// replacing the default `id → id` mapping on first use.
    pub fn identifier(mut self, field: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let field = field.into();
        let placeholder = placeholder.into();
        if self.identifiers_to_placeholders.len() == 1
            && self.identifiers_to_placeholders.get("id").map(String::as_str) == Some("id")
            && field != "id"
        {
            self.identifiers_to_placeholders.clear();
        }
        self.identifiers_to_placeholders.insert(field, placeholder);
        self
    }

    /// Attach a static link merged into every resource of this type.
    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn build(self) -> Result<Metadata, MetadataError> {
        require(&self.target_type, "target_type")?;
        require(&self.route, "route")?;
        require(&self.extractor, "extractor")?;
        Ok(Metadata::RouteBasedResource(RouteBasedResourceMetadata {
            target_type: self.target_type,
            route: self.route,
            extractor: self.extractor,
            max_depth: self.max_depth,
            route_params: self.route_params,
            identifiers_to_placeholders: self.identifiers_to_placeholders,
            links: self.links,
        }))
    }
}

/// Resource mapped to a fixed URL.
#[derive(Debug, Clone)]
pub struct UrlBasedResourceMetadata {
    target_type: String,
    url: String,
    extractor: String,
    max_depth: usize,
    links: Vec<Link>,
}

impl UrlBasedResourceMetadata {
    pub fn builder(
        target_type: impl Into<String>,
        url: impl Into<String>,
        extractor: impl Into<String>,
    ) -> UrlBasedResourceMetadataBuilder {
        UrlBasedResourceMetadataBuilder {
            target_type: target_type.into(),
            url: url.into(),
            extractor: extractor.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            links: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn extractor(&self) -> &str {
        &self.extractor
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

pub struct UrlBasedResourceMetadataBuilder {
    target_type: String,
    url: String,
    extractor: String,
    max_depth: usize,
    links: Vec<Link>,
}

impl UrlBasedResourceMetadataBuilder {
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn build(self) -> Result<Metadata, MetadataError> {
        require(&self.target_type, "target_type")?;
        require(&self.url, "url")?;
        require(&self.extractor, "extractor")?;
        Ok(Metadata::UrlBasedResource(UrlBasedResourceMetadata {
            target_type: self.target_type,
            url: self.url,
            extractor: self.extractor,
            max_depth: self.max_depth,
            links: self.links,
        }))
    }
}

/// Collection mapped through a named route, with pagination link synthesis.
#[derive(Debug, Clone)]
pub struct RouteBasedCollectionMetadata {
    target_type: String,
    collection_relation: String,
    route: String,
    pagination_param: String,
    pagination_param_type: PaginationParamType,
    route_params: Params,
    query_string_arguments: Params,
    links: Vec<Link>,
}

impl RouteBasedCollectionMetadata {
    pub fn builder(
        target_type: impl Into<String>,
        collection_relation: impl Into<String>,
        route: impl Into<String>,
    ) -> RouteBasedCollectionMetadataBuilder {
        RouteBasedCollectionMetadataBuilder {
            target_type: target_type.into(),
            collection_relation: collection_relation.into(),
            route: route.into(),
            pagination_param: DEFAULT_PAGINATION_PARAM.to_owned(),
            pagination_param_type: PaginationParamType::default(),
            route_params: Params::new(),
            query_string_arguments: Params::new(),
            links: Vec::new(),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn collection_relation(&self) -> &str {
        &self.collection_relation
    }

    pub fn pagination_param(&self) -> &str {
        &self.pagination_param
    }

    pub fn pagination_param_type(&self) -> PaginationParamType {
        self.pagination_param_type
    }

    pub fn route_params(&self) -> &Params {
        &self.route_params
    }

    /// Static query-string arguments; merged over request-supplied query
    /// parameters on generated links (statics win on conflicts).
    pub fn query_string_arguments(&self) -> &Params {
        &self.query_string_arguments
    }
}

pub struct RouteBasedCollectionMetadataBuilder {
    target_type: String,
    collection_relation: String,
    route: String,
    pagination_param: String,
    pagination_param_type: PaginationParamType,
    route_params: Params,
    query_string_arguments: Params,
    links: Vec<Link>,
}

impl RouteBasedCollectionMetadataBuilder {
    pub fn pagination_param(mut self, param: impl Into<String>) -> Self {
        self.pagination_param = param.into();
        self
    }

    pub fn pagination_param_type(mut self, param_type: PaginationParamType) -> Self {
        self.pagination_param_type = param_type;
        self
    }

    pub fn route_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.route_params.insert(name.into(), value.into());
        self
    }

    pub fn query_string_argument(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.query_string_arguments.insert(name.into(), value.into());
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn build(self) -> Result<Metadata, MetadataError> {
        require(&self.target_type, "target_type")?;
        require(&self.collection_relation, "collection_relation")?;
        require(&self.route, "route")?;
        require(&self.pagination_param, "pagination_param")?;
        Ok(Metadata::RouteBasedCollection(RouteBasedCollectionMetadata {
            target_type: self.target_type,
            collection_relation: self.collection_relation,
            route: self.route,
            pagination_param: self.pagination_param,
            pagination_param_type: self.pagination_param_type,
            route_params: self.route_params,
            query_string_arguments: self.query_string_arguments,
            links: self.links,
        }))
    }
}

/// Collection mapped to a fixed URL; page links mutate the URL's query
/// string (or a placeholder token) directly.
#[derive(Debug, Clone)]
pub struct UrlBasedCollectionMetadata {
    target_type: String,
    collection_relation: String,
    url: String,
    pagination_param: String,
    pagination_param_type: PaginationParamType,
    links: Vec<Link>,
}

impl UrlBasedCollectionMetadata {
    pub fn builder(
        target_type: impl Into<String>,
        collection_relation: impl Into<String>,
        url: impl Into<String>,
    ) -> UrlBasedCollectionMetadataBuilder {
        UrlBasedCollectionMetadataBuilder {
            target_type: target_type.into(),
            collection_relation: collection_relation.into(),
            url: url.into(),
            pagination_param: DEFAULT_PAGINATION_PARAM.to_owned(),
            pagination_param_type: PaginationParamType::default(),
            links: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection_relation(&self) -> &str {
        &self.collection_relation
    }

    pub fn pagination_param(&self) -> &str {
        &self.pagination_param
    }

    pub fn pagination_param_type(&self) -> PaginationParamType {
        self.pagination_param_type
    }
}

pub struct UrlBasedCollectionMetadataBuilder {
    target_type: String,
    collection_relation: String,
    url: String,
    pagination_param: String,
    pagination_param_type: PaginationParamType,
    links: Vec<Link>,
}

impl UrlBasedCollectionMetadataBuilder {
    pub fn pagination_param(mut self, param: impl Into<String>) -> Self {
        self.pagination_param = param.into();
        self
    }

    pub fn pagination_param_type(mut self, param_type: PaginationParamType) -> Self {
        self.pagination_param_type = param_type;
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn build(self) -> Result<Metadata, MetadataError> {
        require(&self.target_type, "target_type")?;
        require(&self.collection_relation, "collection_relation")?;
        require(&self.url, "url")?;
        require(&self.pagination_param, "pagination_param")?;
        Ok(Metadata::UrlBasedCollection(UrlBasedCollectionMetadata {
            target_type: self.target_type,
            collection_relation: self.collection_relation,
            url: self.url,
            pagination_param: self.pagination_param,
            pagination_param_type: self.pagination_param_type,
            links: self.links,
        }))
    }
}

// ============================================================================
// The closed descriptor enum
// ============================================================================

/// A metadata descriptor for a registered domain type.
#[derive(Debug, Clone)]
pub enum Metadata {
    RouteBasedResource(RouteBasedResourceMetadata),
    UrlBasedResource(UrlBasedResourceMetadata),
    RouteBasedCollection(RouteBasedCollectionMetadata),
    UrlBasedCollection(UrlBasedCollectionMetadata),
}

impl Metadata {
    pub fn kind(&self) -> MetadataKind {
        match self {
            Self::RouteBasedResource(_) => MetadataKind::RouteBasedResource,
            Self::UrlBasedResource(_) => MetadataKind::UrlBasedResource,
            Self::RouteBasedCollection(_) => MetadataKind::RouteBasedCollection,
            Self::UrlBasedCollection(_) => MetadataKind::UrlBasedCollection,
        }
    }

    pub fn target_type(&self) -> &str {
        match self {
            Self::RouteBasedResource(m) => &m.target_type,
            Self::UrlBasedResource(m) => &m.target_type,
            Self::RouteBasedCollection(m) => &m.target_type,
            Self::UrlBasedCollection(m) => &m.target_type,
        }
    }

    /// Static links merged into every generated resource of this type.
    pub fn links(&self) -> &[Link] {
        match self {
            Self::RouteBasedResource(m) => &m.links,
            Self::UrlBasedResource(m) => &m.links,
            Self::RouteBasedCollection(m) => &m.links,
            Self::UrlBasedCollection(m) => &m.links,
        }
    }

    /// Whether the given recursion depth exceeds this descriptor's bound.
    /// Collections carry no bound of their own.
    pub fn max_depth_reached(&self, depth: usize) -> bool {
        match self {
            Self::RouteBasedResource(m) => depth > m.max_depth,
            Self::UrlBasedResource(m) => depth > m.max_depth,
            Self::RouteBasedCollection(_) | Self::UrlBasedCollection(_) => false,
        }
    }

    /// The embed name items are placed under, for collection descriptors.
    pub fn collection_relation(&self) -> Option<&str> {
        match self {
            Self::RouteBasedCollection(m) => Some(&m.collection_relation),
            Self::UrlBasedCollection(m) => Some(&m.collection_relation),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Self::RouteBasedCollection(_) | Self::UrlBasedCollection(_)
        )
    }
}

fn require(value: &str, field: &'static str) -> Result<(), MetadataError> {
    if value.is_empty() {
        return Err(MetadataError::MissingField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn route_resource_defaults() {
        let metadata = RouteBasedResourceMetadata::builder("book", "books.show", "book")
            .build()
            .unwrap();
        assert_eq!(metadata.kind(), MetadataKind::RouteBasedResource);
        assert_eq!(metadata.target_type(), "book");
        let Metadata::RouteBasedResource(inner) = &metadata else {
            unreachable!()
        };
        assert_eq!(inner.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(
            inner.identifiers_to_placeholders().get("id").map(String::as_str),
            Some("id")
        );
    }

    #[test]
    fn identifier_replaces_default_mapping() {
        let metadata = RouteBasedResourceMetadata::builder("book", "books.show", "book")
            .identifier("id", "book_id")
            .build()
            .unwrap();
        let Metadata::RouteBasedResource(inner) = &metadata else {
            unreachable!()
        };
        assert_eq!(inner.identifiers_to_placeholders().len(), 1);
        assert_eq!(
            inner.identifiers_to_placeholders().get("id").map(String::as_str),
            Some("book_id")
        );
    }

    #[test]
    fn non_id_identifier_clears_the_default() {
        let metadata = RouteBasedResourceMetadata::builder("book", "books.show", "book")
            .identifier("isbn", "isbn")
            .build()
            .unwrap();
        let Metadata::RouteBasedResource(inner) = &metadata else {
            unreachable!()
        };
        assert!(!inner.identifiers_to_placeholders().contains_key("id"));
        assert_eq!(
            inner.identifiers_to_placeholders().get("isbn").map(String::as_str),
            Some("isbn")
        );
    }

    #[test]
    fn builders_reject_missing_required_fields() {
        assert_eq!(
            RouteBasedResourceMetadata::builder("", "r", "e")
                .build()
                .unwrap_err(),
            MetadataError::MissingField {
                field: "target_type"
            }
        );
        assert_eq!(
            UrlBasedResourceMetadata::builder("t", "", "e")
                .build()
                .unwrap_err(),
            MetadataError::MissingField { field: "url" }
        );
        assert_eq!(
            RouteBasedCollectionMetadata::builder("t", "", "r")
                .build()
                .unwrap_err(),
            MetadataError::MissingField {
                field: "collection_relation"
            }
        );
        assert_eq!(
            UrlBasedCollectionMetadata::builder("t", "items", "u")
                .pagination_param("")
                .build()
                .unwrap_err(),
            MetadataError::MissingField {
                field: "pagination_param"
            }
        );
    }

    #[test]
    fn collection_defaults_to_query_pagination() {
        let metadata = RouteBasedCollectionMetadata::builder("books", "book", "books.list")
            .build()
            .unwrap();
        let Metadata::RouteBasedCollection(inner) = &metadata else {
            unreachable!()
        };
        assert_eq!(inner.pagination_param(), "page");
        assert_eq!(inner.pagination_param_type(), PaginationParamType::Query);
        assert_eq!(metadata.collection_relation(), Some("book"));
        assert!(metadata.is_collection());
    }

    #[test]
    fn pagination_param_type_parses_leniently() {
        assert_eq!(
            "placeholder".parse::<PaginationParamType>().unwrap(),
            PaginationParamType::Placeholder
        );
        assert_eq!(
            "query".parse::<PaginationParamType>().unwrap(),
            PaginationParamType::Query
        );
        assert_eq!(
            "whatever".parse::<PaginationParamType>().unwrap(),
            PaginationParamType::Disabled
        );
    }

    #[test]
    fn collections_never_reach_max_depth() {
        let metadata = RouteBasedCollectionMetadata::builder("books", "book", "books.list")
            .build()
            .unwrap();
        assert!(!metadata.max_depth_reached(usize::MAX));
    }

    #[test]
    fn resources_reach_max_depth_past_the_bound() {
        let metadata = RouteBasedResourceMetadata::builder("book", "books.show", "book")
            .max_depth(2)
            .build()
            .unwrap();
        assert!(!metadata.max_depth_reached(2));
        assert!(metadata.max_depth_reached(3));
    }

    #[test]
    fn static_params_and_links_are_kept() {
        let metadata = RouteBasedCollectionMetadata::builder("books", "book", "books.list")
            .route_param("shelf", json!(3))
            .query_string_argument("sort", "ASC")
            .link(Link::new("doc", "/doc/books").unwrap())
            .build()
            .unwrap();
        let Metadata::RouteBasedCollection(inner) = &metadata else {
            unreachable!()
        };
        assert_eq!(inner.route_params().get("shelf"), Some(&json!(3)));
        assert_eq!(inner.query_string_arguments().get("sort"), Some(&json!("ASC")));
        assert_eq!(metadata.links().len(), 1);
    }
}
