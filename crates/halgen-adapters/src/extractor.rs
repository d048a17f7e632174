//! Extractor adapters and the in-memory extractor locator.
//!
//! Metadata descriptors name their extractor; the locator resolves that
//! name to an implementation. Two implementations cover the usual cases:
//! a closure per domain type ([`FnExtractor`] — needed whenever fields
//! hold nested domain objects), and a serde-based one for leaf types
//! whose fields are all plain values ([`SerdeExtractor`]).

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use halgen_core::application::error::GeneratorError;
use halgen_core::application::{ExtractedFields, Extractor, ExtractorLocator};
use halgen_core::domain::Entity;

/// Closure-backed extractor for one concrete entity type.
///
/// The closure receives the concrete instance and returns the field
/// mapping; nested domain objects go in as
/// [`FieldValue::Child`](halgen_core::application::FieldValue::Child) so
/// the generator can resolve them recursively.
pub struct FnExtractor<T: Entity> {
    name: String,
    extract: Box<dyn Fn(&T) -> ExtractedFields + Send + Sync>,
    _entity: PhantomData<fn(&T)>,
}

impl<T: Entity> FnExtractor<T> {
    pub fn new(
        name: impl Into<String>,
        extract: impl Fn(&T) -> ExtractedFields + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            extract: Box::new(extract),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Extractor for FnExtractor<T> {
    fn extract(&self, instance: &dyn Entity) -> Result<ExtractedFields, GeneratorError> {
        let concrete = instance.as_any().downcast_ref::<T>().ok_or_else(|| {
            GeneratorError::ExtractionFailed {
                name: self.name.clone(),
                type_name: instance.type_name().to_owned(),
            }
        })?;
        Ok((self.extract)(concrete))
    }
}

/// Serde-backed extractor for leaf entity types.
///
/// Serializes the instance and flattens the resulting JSON object into
/// plain field values. Nested domain objects are invisible to serde, so
/// types with mapped children need a [`FnExtractor`] instead.
pub struct SerdeExtractor<T: Entity + Serialize> {
    name: String,
    _entity: PhantomData<fn(&T)>,
}

impl<T: Entity + Serialize> SerdeExtractor<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity + Serialize> Extractor for SerdeExtractor<T> {
    fn extract(&self, instance: &dyn Entity) -> Result<ExtractedFields, GeneratorError> {
        let failure = || GeneratorError::ExtractionFailed {
            name: self.name.clone(),
            type_name: instance.type_name().to_owned(),
        };
        let concrete = instance.as_any().downcast_ref::<T>().ok_or_else(failure)?;
        let serialized = serde_json::to_value(concrete).map_err(|_| failure())?;
        let Value::Object(fields) = serialized else {
            return Err(failure());
        };
        Ok(fields
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect())
    }
}

/// In-memory extractor registry: populated during wiring, read-only
/// afterwards.
#[derive(Default, Clone)]
pub struct InMemoryExtractorLocator {
    extractors: HashMap<String, Arc<dyn Extractor>>,
}

impl InMemoryExtractorLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor under the name metadata descriptors refer to.
    pub fn insert(&mut self, name: impl Into<String>, extractor: Arc<dyn Extractor>) -> &mut Self {
        self.extractors.insert(name.into(), extractor);
        self
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, extractor: Arc<dyn Extractor>) -> Self {
        self.insert(name, extractor);
        self
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl ExtractorLocator for InMemoryExtractorLocator {
    fn get(&self, name: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;
    use std::any::Any;

    #[derive(Clone, Serialize)]
    struct Book {
        id: u64,
        title: String,
    }

    impl Entity for Book {
        fn type_name(&self) -> &str {
            "book"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Clone, Serialize)]
    struct Magazine {
        issue: u32,
    }

    impl Entity for Magazine {
        fn type_name(&self) -> &str {
            "magazine"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn book() -> Book {
        Book {
            id: 7,
            title: "Het Achterhuis".into(),
        }
    }

    #[test]
    fn fn_extractor_maps_fields() {
        let extractor = FnExtractor::new("book", |book: &Book| {
            IndexMap::from([
                ("id".to_owned(), json!(book.id).into()),
                ("title".to_owned(), json!(book.title).into()),
            ])
        });

        let fields = extractor.extract(&book()).unwrap();
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["id", "title"]);
    }

    #[test]
    fn fn_extractor_rejects_foreign_types() {
        let extractor = FnExtractor::new("book", |_: &Book| IndexMap::new());
        let error = extractor.extract(&Magazine { issue: 1 }).unwrap_err();
        assert_eq!(
            error,
            GeneratorError::ExtractionFailed {
                name: "book".into(),
                type_name: "magazine".into(),
            }
        );
    }

    #[test]
    fn serde_extractor_flattens_serialized_fields() {
        let extractor = SerdeExtractor::<Book>::new("book");
        let fields = extractor.extract(&book()).unwrap();
        assert!(matches!(
            fields.get("title"),
            Some(halgen_core::application::FieldValue::Value(Value::String(title)))
                if title == "Het Achterhuis"
        ));
    }

    #[test]
    fn locator_round_trips_and_misses() {
        let mut locator = InMemoryExtractorLocator::new();
        locator.insert("book", Arc::new(SerdeExtractor::<Book>::new("book")));

        assert!(locator.get("book").is_some());
        assert!(locator.get("magazine").is_none());
        assert_eq!(locator.len(), 1);
    }
}
