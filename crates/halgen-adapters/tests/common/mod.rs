//! Shared fixtures: a small publishing domain wired through the in-memory
//! adapters.

#![allow(dead_code)]

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::json;
use uuid::Uuid;

use halgen_adapters::{FnExtractor, InMemoryExtractorLocator};
use halgen_core::application::FieldValue;
use halgen_core::prelude::*;

#[derive(Clone)]
pub struct Publisher {
    pub id: Uuid,
    pub name: String,
}

impl Entity for Publisher {
    fn type_name(&self) -> &str {
        "publisher"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub publisher: Option<Publisher>,
}

impl Entity for Book {
    fn type_name(&self) -> &str {
        "book"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An ordered set of entities, optionally paginated.
#[derive(Clone)]
pub struct Catalog {
    pub items: Vec<Arc<dyn Entity>>,
    pub per_page: Option<usize>,
}

impl Entity for Catalog {
    fn type_name(&self) -> &str {
        "catalog"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_collection(&self) -> Option<&dyn EntityCollection> {
        Some(self)
    }
}

impl EntityCollection for Catalog {
    fn items(&self) -> Box<dyn Iterator<Item = Arc<dyn Entity>> + '_> {
        Box::new(self.items.iter().cloned())
    }

    fn pagination(&self) -> Option<Pagination> {
        self.per_page
            .map(|per_page| Pagination::new(self.items.len(), per_page))
    }
}

pub fn book(id: u64, title: &str) -> Book {
    Book {
        id,
        title: title.to_owned(),
        published_at: None,
        publisher: None,
    }
}

/// A catalog of `count` numbered books.
pub fn catalog_of(count: usize, per_page: Option<usize>) -> Catalog {
    Catalog {
        items: (1..=count as u64)
            .map(|id| Arc::new(book(id, &format!("Book {id}"))) as Arc<dyn Entity>)
            .collect(),
        per_page,
    }
}

pub fn book_extractor() -> FnExtractor<Book> {
    FnExtractor::new("book", |book: &Book| {
        let mut fields: ExtractedFields = IndexMap::from([
            ("id".to_owned(), FieldValue::Value(json!(book.id))),
            ("title".to_owned(), FieldValue::Value(json!(book.title))),
        ]);
        if let Some(published_at) = &book.published_at {
            fields.insert(
                "published_at".to_owned(),
                FieldValue::Value(json!(published_at.to_rfc3339())),
            );
        }
        if let Some(publisher) = &book.publisher {
            fields.insert(
                "publisher".to_owned(),
                FieldValue::Child(Arc::new(publisher.clone())),
            );
        }
        fields
    })
}

pub fn publisher_extractor() -> FnExtractor<Publisher> {
    FnExtractor::new("publisher", |publisher: &Publisher| {
        IndexMap::from([
            (
                "id".to_owned(),
                FieldValue::Value(json!(publisher.id.to_string())),
            ),
            (
                "name".to_owned(),
                FieldValue::Value(json!(publisher.name)),
            ),
        ])
    })
}

pub fn locator() -> InMemoryExtractorLocator {
    InMemoryExtractorLocator::new()
        .with("book", Arc::new(book_extractor()))
        .with("publisher", Arc::new(publisher_extractor()))
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
