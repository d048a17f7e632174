//! End-to-end generation scenarios: metadata-mapped domain objects in,
//! finished HAL resources out, through the in-memory adapters.

mod common;

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use common::*;
use halgen_adapters::{FnExtractor, InMemoryExtractorLocator, TemplateUrlGenerator};
use halgen_core::application::error::GeneratorError;
use halgen_core::application::{ExtractedFields, Extractor, FieldValue};
use halgen_core::metadata::{
    RouteBasedCollectionMetadata, RouteBasedResourceMetadata, UrlBasedCollectionMetadata,
};
use halgen_core::prelude::*;
use indexmap::IndexMap;

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register("book");
    registry.register("publisher");
    registry.register("author");
    registry.register("catalog");
    registry
}

fn generator_with(
    map: MetadataMap,
    locator: InMemoryExtractorLocator,
    urls: TemplateUrlGenerator,
) -> ResourceGenerator {
    ResourceGenerator::new(
        Arc::new(map),
        Arc::new(locator),
        LinkGenerator::new(Arc::new(urls)),
    )
    .with_default_strategies()
}

fn book_metadata() -> Metadata {
    RouteBasedResourceMetadata::builder("book", "books.show", "book")
        .build()
        .unwrap()
}

fn link_href(resource: &Resource, rel: &str) -> String {
    resource
        .links_by_rel(rel)
        .next()
        .unwrap_or_else(|| panic!("expected a '{rel}' link"))
        .href()
        .to_owned()
}

fn has_link(resource: &Resource, rel: &str) -> bool {
    resource.links_by_rel(rel).next().is_some()
}

#[test]
fn route_based_resource_maps_identifier_and_keeps_static_params() {
    init_tracing();
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(
        RouteBasedResourceMetadata::builder("book", "books.show", "book")
            .route_param("shelf_id", json!(1234))
            .identifier("id", "book_id")
            .build()
            .unwrap(),
    )
    .unwrap();
    let urls = TemplateUrlGenerator::new()
        .route("books.show", "/api/shelves/{shelf_id}/books/{book_id}");
    let generator = generator_with(map, locator(), urls);

    let resource = generator
        .from_object(&book(42, "Sense and Sensibility"), &RequestContext::new())
        .unwrap();

    assert_eq!(
        serde_json::to_value(&resource).unwrap(),
        json!({
            "id": 42,
            "title": "Sense and Sensibility",
            "_links": {"self": {"href": "/api/shelves/1234/books/42"}},
        })
    );
}

#[test]
fn scalar_fields_inject_into_route_params_under_their_own_names() {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    let urls = TemplateUrlGenerator::new().route("books.show", "/api/books/{id}/{title}");
    let generator = generator_with(map, locator(), urls);

    let resource = generator
        .from_object(&book(7, "dune"), &RequestContext::new())
        .unwrap();
    assert_eq!(link_href(&resource, "self"), "/api/books/7/dune");
}

#[test]
fn nested_mapped_object_embeds_as_resource() {
    let publisher = Publisher {
        id: uuid::Uuid::new_v4(),
        name: "Contact".into(),
    };
    let mut subject = book(1234, "Het Achterhuis");
    subject.publisher = Some(publisher.clone());

    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    map.add(
        RouteBasedResourceMetadata::builder("publisher", "publishers.show", "publisher")
            .build()
            .unwrap(),
    )
    .unwrap();
    let urls = TemplateUrlGenerator::new()
        .route("books.show", "/api/books/{id}")
        .route("publishers.show", "/api/publishers/{id}");
    let generator = generator_with(map, locator(), urls);

    let resource = generator
        .from_object(&subject, &RequestContext::new())
        .unwrap();

    assert!(!resource.data().contains_key("publisher"));
    let Some(Element::Resource(embedded)) = resource.get_element("publisher").unwrap() else {
        panic!("expected an embedded publisher resource");
    };
    assert_eq!(embedded.data().get("name"), Some(&json!("Contact")));
    assert_eq!(
        link_href(&embedded, "self"),
        format!("/api/publishers/{}", publisher.id)
    );
}

#[test]
fn nested_unmapped_object_is_omitted() {
    let mut subject = book(1, "orphan");
    subject.publisher = Some(Publisher {
        id: uuid::Uuid::new_v4(),
        name: "Unmapped".into(),
    });

    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    let urls = TemplateUrlGenerator::new().route("books.show", "/api/books/{id}");
    let generator = generator_with(map, locator(), urls);

    let resource = generator
        .from_object(&subject, &RequestContext::new())
        .unwrap();
    assert_eq!(resource.get_element("publisher").unwrap(), None);
    assert!(resource.embedded().is_empty());
}

/// An author whose `books` field holds a whole catalog.
#[derive(Clone)]
struct Author {
    id: u64,
    name: String,
    books: Catalog,
}

impl Entity for Author {
    fn type_name(&self) -> &str {
        "author"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn author_extractor() -> FnExtractor<Author> {
    FnExtractor::new("author", |author: &Author| {
        IndexMap::from([
            ("id".to_owned(), FieldValue::Value(json!(author.id))),
            ("name".to_owned(), FieldValue::Value(json!(author.name))),
            (
                "books".to_owned(),
                FieldValue::Child(Arc::new(author.books.clone())),
            ),
        ])
    })
}

#[test]
fn nested_collection_embeds_as_plain_array_without_envelope() {
    let author = Author {
        id: 101010,
        name: "ack".into(),
        books: catalog_of(3, None),
    };

    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    map.add(
        RouteBasedResourceMetadata::builder("author", "authors.show", "author")
            .build()
            .unwrap(),
    )
    .unwrap();
    map.add(
        RouteBasedCollectionMetadata::builder("catalog", "books", "books.list")
            .build()
            .unwrap(),
    )
    .unwrap();
    let urls = TemplateUrlGenerator::new()
        .route("books.show", "/api/books/{id}")
        .route("authors.show", "/api/authors/{id}")
        .route("books.list", "/api/books");
    let locator = locator().with("author", Arc::new(author_extractor()));
    let generator = generator_with(map, locator, urls);

    let resource = generator
        .from_object(&author, &RequestContext::new())
        .unwrap();

    let Some(Element::Collection(books)) = resource.get_element("books").unwrap() else {
        panic!("expected the nested collection to flatten to its item list");
    };
    assert_eq!(books.len(), 3);
    for (index, member) in books.iter().enumerate() {
        assert_eq!(
            link_href(member, "self"),
            format!("/api/books/{}", index + 1)
        );
        // Item fields only: the collection envelope fields stay behind.
        assert!(!member.data().contains_key("_total_items"));
    }
}

fn paginated_catalog_map(param_type: PaginationParamType) -> MetadataMap {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    map.add(
        RouteBasedCollectionMetadata::builder("catalog", "books", "books.list")
            .pagination_param("p")
            .pagination_param_type(param_type)
            .route_param("foo_id", json!(1234))
            .query_string_argument("sort", "ASC")
            .build()
            .unwrap(),
    )
    .unwrap();
    map
}

fn collection_urls() -> TemplateUrlGenerator {
    TemplateUrlGenerator::new()
        .route("books.show", "/api/books/{id}")
        .route("books.list", "/api/foo/{foo_id}/p/{p}")
}

#[test]
fn placeholder_pagination_synthesizes_page_links_with_merged_query() {
    init_tracing();
    let generator = generator_with(
        paginated_catalog_map(PaginationParamType::Placeholder),
        locator(),
        collection_urls(),
    );
    let request = RequestContext::new()
        .with_attribute("p", json!(3))
        .with_query_param("query_1", "value_1");

    let resource = generator
        .from_object(&catalog_of(14, Some(3)), &request)
        .unwrap();

    assert_eq!(
        link_href(&resource, "self"),
        "/api/foo/1234/p/3?query_1=value_1&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "first"),
        "/api/foo/1234/p/1?query_1=value_1&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "prev"),
        "/api/foo/1234/p/2?query_1=value_1&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "next"),
        "/api/foo/1234/p/4?query_1=value_1&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "last"),
        "/api/foo/1234/p/5?query_1=value_1&sort=ASC"
    );

    assert_eq!(resource.data().get("_page"), Some(&json!(3)));
    assert_eq!(resource.data().get("_page_count"), Some(&json!(5)));
    assert_eq!(resource.data().get("_total_items"), Some(&json!(14)));

    let Some(Element::Collection(items)) = resource.get_element("books").unwrap() else {
        panic!("expected embedded items");
    };
    let ids: Vec<_> = items
        .iter()
        .map(|item| item.data().get("id").cloned().unwrap())
        .collect();
    assert_eq!(ids, [json!(7), json!(8), json!(9)]);
}

#[test]
fn prev_and_next_are_omitted_at_the_bounds() {
    let generator = generator_with(
        paginated_catalog_map(PaginationParamType::Placeholder),
        locator(),
        collection_urls(),
    );

    let first_page = generator
        .from_object(
            &catalog_of(14, Some(3)),
            &RequestContext::new().with_attribute("p", json!(1)),
        )
        .unwrap();
    assert!(!has_link(&first_page, "prev"));
    assert!(has_link(&first_page, "first"));
    assert!(has_link(&first_page, "next"));
    assert!(has_link(&first_page, "last"));

    let last_page = generator
        .from_object(
            &catalog_of(14, Some(3)),
            &RequestContext::new().with_attribute("p", json!(5)),
        )
        .unwrap();
    assert!(!has_link(&last_page, "next"));
    assert!(has_link(&last_page, "prev"));
    assert!(has_link(&last_page, "last"));
}

#[test]
fn query_pagination_reads_the_query_param() {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    map.add(
        RouteBasedCollectionMetadata::builder("catalog", "books", "books.list")
            .pagination_param("page_num")
            .build()
            .unwrap(),
    )
    .unwrap();
    let urls = TemplateUrlGenerator::new()
        .route("books.show", "/api/books/{id}")
        .route("books.list", "/api/items");
    let generator = generator_with(map, locator(), urls);

    let resource = generator
        .from_object(
            &catalog_of(14, Some(3)),
            &RequestContext::new().with_query_param("page_num", json!(3)),
        )
        .unwrap();

    assert_eq!(link_href(&resource, "self"), "/api/items?page_num=3");
    assert_eq!(link_href(&resource, "first"), "/api/items?page_num=1");
    assert_eq!(link_href(&resource, "prev"), "/api/items?page_num=2");
    assert_eq!(link_href(&resource, "next"), "/api/items?page_num=4");
    assert_eq!(link_href(&resource, "last"), "/api/items?page_num=5");
}

#[test]
fn out_of_bounds_page_raises_before_any_item_extraction() {
    let extractions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&extractions);
    let counting_extractor = FnExtractor::new("book", move |book: &Book| {
        counter.fetch_add(1, Ordering::SeqCst);
        IndexMap::from([("id".to_owned(), FieldValue::Value(json!(book.id)))])
    });
    let locator = InMemoryExtractorLocator::new().with("book", Arc::new(counting_extractor));
    let generator = generator_with(
        paginated_catalog_map(PaginationParamType::Placeholder),
        locator,
        collection_urls(),
    );

    for page in [json!(0), json!(-1), json!(6), json!("abc")] {
        let error = generator
            .from_object(
                &catalog_of(14, Some(3)),
                &RequestContext::new().with_attribute("p", page),
            )
            .unwrap_err();
        assert!(matches!(
            error,
            HalError::Generator(GeneratorError::OutOfBoundsPage { page_count: 5, .. })
        ));
        assert!(error.is_client_error());
    }

    assert_eq!(extractions.load(Ordering::SeqCst), 0);
}

#[test]
fn disabled_pagination_type_suppresses_page_links() {
    // No `{p}` token in the route: pagination never fills one here.
    let generator = generator_with(
        paginated_catalog_map(PaginationParamType::Disabled),
        locator(),
        TemplateUrlGenerator::new()
            .route("books.show", "/api/books/{id}")
            .route("books.list", "/api/foo/{foo_id}"),
    );

    let resource = generator
        .from_object(
            &catalog_of(14, Some(3)),
            &RequestContext::new().with_query_param("query_1", "value_1"),
        )
        .unwrap();

    assert_eq!(
        link_href(&resource, "self"),
        "/api/foo/1234?query_1=value_1&sort=ASC"
    );
    for rel in ["first", "prev", "next", "last"] {
        assert!(!has_link(&resource, rel));
    }
    // Every item is materialized when no page is in play.
    assert_eq!(resource.data().get("_total_items"), Some(&json!(14)));
    assert!(!resource.data().contains_key("_page"));
    let Some(Element::Collection(items)) = resource.get_element("books").unwrap() else {
        panic!("expected embedded items");
    };
    assert_eq!(items.len(), 14);
}

#[test]
fn unpaginated_self_link_merges_query_with_metadata_winning() {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    map.add(
        RouteBasedCollectionMetadata::builder("catalog", "books", "books.list")
            .query_string_argument("query_2", "overridden_2")
            .build()
            .unwrap(),
    )
    .unwrap();
    let urls = TemplateUrlGenerator::new()
        .route("books.show", "/api/books/{id}")
        .route("books.list", "/api/collection");
    let generator = generator_with(map, locator(), urls);

    let resource = generator
        .from_object(
            &catalog_of(2, None),
            &RequestContext::new()
                .with_query_param("query_1", "value_1")
                .with_query_param("query_2", "value_2"),
        )
        .unwrap();

    assert_eq!(
        link_href(&resource, "self"),
        "/api/collection?query_1=value_1&query_2=overridden_2"
    );
}

fn url_collection_map(param_type: PaginationParamType, url: &str) -> MetadataMap {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    map.add(
        UrlBasedCollectionMetadata::builder("catalog", "books", url)
            .pagination_param("p")
            .pagination_param_type(param_type)
            .build()
            .unwrap(),
    )
    .unwrap();
    map
}

#[test]
fn url_based_pagination_substitutes_into_the_query_string() {
    let generator = generator_with(
        url_collection_map(PaginationParamType::Query, "http://test.local/collection/"),
        locator(),
        TemplateUrlGenerator::new().route("books.show", "/api/books/{id}"),
    );
    let request = RequestContext::new()
        .with_query_param("query_1", "value_1")
        .with_query_param("p", json!(3))
        .with_query_param("sort", "ASC");

    let resource = generator
        .from_object(&catalog_of(14, Some(3)), &request)
        .unwrap();

    assert_eq!(
        link_href(&resource, "self"),
        "http://test.local/collection/?query_1=value_1&p=3&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "first"),
        "http://test.local/collection/?query_1=value_1&p=1&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "prev"),
        "http://test.local/collection/?query_1=value_1&p=2&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "next"),
        "http://test.local/collection/?query_1=value_1&p=4&sort=ASC"
    );
    assert_eq!(
        link_href(&resource, "last"),
        "http://test.local/collection/?query_1=value_1&p=5&sort=ASC"
    );
}

#[test]
fn url_based_placeholder_pagination_replaces_the_token() {
    let generator = generator_with(
        url_collection_map(
            PaginationParamType::Placeholder,
            "http://test.local/collection/{p}",
        ),
        locator(),
        TemplateUrlGenerator::new().route("books.show", "/api/books/{id}"),
    );

    let resource = generator
        .from_object(
            &catalog_of(14, Some(3)),
            &RequestContext::new().with_attribute("p", json!(2)),
        )
        .unwrap();

    assert_eq!(link_href(&resource, "self"), "http://test.local/collection/2");
    assert_eq!(link_href(&resource, "first"), "http://test.local/collection/1");
    assert_eq!(link_href(&resource, "prev"), "http://test.local/collection/1");
    assert_eq!(link_href(&resource, "next"), "http://test.local/collection/3");
    assert_eq!(link_href(&resource, "last"), "http://test.local/collection/5");
}

#[test]
fn url_based_plain_self_appends_the_request_query() {
    let generator = generator_with(
        url_collection_map(PaginationParamType::Query, "http://test.local/collection/"),
        locator(),
        TemplateUrlGenerator::new().route("books.show", "/api/books/{id}"),
    );

    let resource = generator
        .from_object(
            &catalog_of(2, None),
            &RequestContext::new()
                .with_query_param("query_1", "value_1")
                .with_query_param("query_2", "value_2"),
        )
        .unwrap();

    assert_eq!(
        link_href(&resource, "self"),
        "http://test.local/collection/?query_1=value_1&query_2=value_2"
    );
    for rel in ["first", "prev", "next", "last"] {
        assert!(!has_link(&resource, rel));
    }
}

#[test]
fn depth_truncated_nested_resource_is_link_only() {
    let publisher = Publisher {
        id: uuid::Uuid::new_v4(),
        name: "Querido".into(),
    };
    let mut subject = book(1, "depths");
    subject.publisher = Some(publisher.clone());

    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    map.add(
        RouteBasedResourceMetadata::builder("publisher", "publishers.show", "publisher")
            .max_depth(0)
            .build()
            .unwrap(),
    )
    .unwrap();
    let urls = TemplateUrlGenerator::new()
        .route("books.show", "/api/books/{id}")
        .route("publishers.show", "/api/publishers/{id}");
    let generator = generator_with(map, locator(), urls);

    let resource = generator
        .from_object(&subject, &RequestContext::new())
        .unwrap();

    let Some(Element::Resource(truncated)) = resource.get_element("publisher").unwrap() else {
        panic!("expected an embedded publisher resource");
    };
    // Body discarded, but the identifier still reached the self link.
    assert!(truncated.data().is_empty());
    assert_eq!(
        link_href(&truncated, "self"),
        format!("/api/publishers/{}", publisher.id)
    );
}

/// A novel is a book as far as the metadata map is concerned.
#[derive(Clone)]
struct Novel(Book);

impl Entity for Novel {
    fn type_name(&self) -> &str {
        "novel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct PublicationExtractor;

impl Extractor for PublicationExtractor {
    fn extract(&self, instance: &dyn Entity) -> Result<ExtractedFields, GeneratorError> {
        let book = instance
            .as_any()
            .downcast_ref::<Book>()
            .or_else(|| instance.as_any().downcast_ref::<Novel>().map(|n| &n.0))
            .ok_or_else(|| GeneratorError::ExtractionFailed {
                name: "book".into(),
                type_name: instance.type_name().to_owned(),
            })?;
        Ok(IndexMap::from([
            ("id".to_owned(), FieldValue::Value(json!(book.id))),
            ("title".to_owned(), FieldValue::Value(json!(book.title))),
        ]))
    }
}

#[test]
fn metadata_resolution_walks_the_ancestor_chain() {
    let mut registry = TypeRegistry::new();
    registry.register("book");
    registry.register_with_ancestors("novel", ["book"]);
    let mut map = MetadataMap::new(Arc::new(registry));
    map.add(book_metadata()).unwrap();
    let urls = TemplateUrlGenerator::new().route("books.show", "/api/books/{id}");
    let locator = InMemoryExtractorLocator::new().with("book", Arc::new(PublicationExtractor));
    let generator = generator_with(map, locator, urls);

    let resource = generator
        .from_object(&Novel(book(55, "Max Havelaar")), &RequestContext::new())
        .unwrap();
    assert_eq!(link_href(&resource, "self"), "/api/books/55");
}

#[test]
fn unmapped_type_raises_unknown_type() {
    let map = MetadataMap::new(Arc::new(registry()));
    let generator = generator_with(map, locator(), TemplateUrlGenerator::new());

    let error = generator
        .from_object(&book(1, "nowhere"), &RequestContext::new())
        .unwrap_err();
    assert_eq!(
        error,
        HalError::Generator(GeneratorError::UnknownType {
            type_name: "book".into()
        })
    );
}

#[test]
fn missing_strategy_raises_unknown_metadata_type() {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    let generator = ResourceGenerator::new(
        Arc::new(map),
        Arc::new(locator()),
        LinkGenerator::new(Arc::new(TemplateUrlGenerator::new())),
    );

    let error = generator
        .from_object(&book(1, "unrouted"), &RequestContext::new())
        .unwrap_err();
    assert_eq!(
        error,
        HalError::Generator(GeneratorError::UnknownMetadataType {
            kind: MetadataKind::RouteBasedResource
        })
    );
}

#[test]
fn strategy_and_metadata_kind_mismatch_is_a_configuration_error() {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(book_metadata()).unwrap();
    let mut generator = ResourceGenerator::new(
        Arc::new(map),
        Arc::new(locator()),
        LinkGenerator::new(Arc::new(TemplateUrlGenerator::new())),
    );
    generator.add_strategy(
        MetadataKind::RouteBasedResource,
        Arc::new(halgen_core::application::UrlBasedResourceStrategy),
    );

    let error = generator
        .from_object(&book(1, "miswired"), &RequestContext::new())
        .unwrap_err();
    assert_eq!(
        error,
        HalError::Generator(GeneratorError::UnexpectedMetadataType {
            expected: MetadataKind::UrlBasedResource,
            actual: MetadataKind::RouteBasedResource,
        })
    );
}

#[test]
fn non_collection_instance_raises_invalid_collection() {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(
        RouteBasedCollectionMetadata::builder("book", "books", "books.list")
            .build()
            .unwrap(),
    )
    .unwrap();
    let generator = generator_with(
        map,
        locator(),
        TemplateUrlGenerator::new().route("books.list", "/api/books"),
    );

    let error = generator
        .from_object(&book(1, "not a list"), &RequestContext::new())
        .unwrap_err();
    assert_eq!(
        error,
        HalError::Generator(GeneratorError::InvalidCollection {
            type_name: "book".into()
        })
    );
}

#[test]
fn unregistered_extractor_name_raises_invalid_extractor() {
    let mut map = MetadataMap::new(Arc::new(registry()));
    map.add(
        RouteBasedResourceMetadata::builder("book", "books.show", "nope")
            .build()
            .unwrap(),
    )
    .unwrap();
    let generator = generator_with(
        map,
        locator(),
        TemplateUrlGenerator::new().route("books.show", "/api/books/{id}"),
    );

    let error = generator
        .from_object(&book(1, "extractorless"), &RequestContext::new())
        .unwrap_err();
    assert_eq!(
        error,
        HalError::Generator(GeneratorError::InvalidExtractor {
            name: "nope".into()
        })
    );
}

#[test]
fn from_array_builds_a_bare_resource_with_optional_self_link() {
    let map = MetadataMap::new(Arc::new(registry()));
    let generator = generator_with(map, locator(), TemplateUrlGenerator::new());

    let data = json!({"foo": "bar"}).as_object().unwrap().clone();
    let bare = generator.from_array(data.clone(), None).unwrap();
    assert!(bare.links().is_empty());
    assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"foo": "bar"}));

    let linked = generator.from_array(data, Some("/api/foo")).unwrap();
    assert_eq!(link_href(&linked, "self"), "/api/foo");
}
