//! Resource aggregate: data fields, embedded sub-resources, and links.
//!
//! A `Resource` is an immutable aggregate behind an `Arc` handle. All
//! evolution methods return new instances; no-op changes (removing an
//! absent element, re-adding a link handle that is already present) return
//! the **same** handle, observable via [`Resource::ptr_eq`].
//!
//! The two element namespaces — plain `data` and `embedded` sub-resources —
//! are disjoint by invariant: a name lives in exactly one of them. Both
//! preserve insertion order, which is also the serialization order.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::error::DomainError;
use crate::domain::link::Link;

const RESERVED_NAMES: [&str; 2] = ["_links", "_embedded"];

/// A value being added to a resource: a plain field, a single sub-resource,
/// or a list of sub-resources.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Value(Value),
    Resource(Resource),
    Collection(Vec<Resource>),
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Element::Value(value)
    }
}

impl From<Resource> for Element {
    fn from(resource: Resource) -> Self {
        Element::Resource(resource)
    }
}

impl From<Vec<Resource>> for Element {
    fn from(resources: Vec<Resource>) -> Self {
        Element::Collection(resources)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Value(Value::String(value.to_owned()))
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Value(Value::String(value))
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::Value(Value::from(value))
    }
}

impl From<u64> for Element {
    fn from(value: u64) -> Self {
        Element::Value(Value::from(value))
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::Value(Value::from(value))
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::Value(Value::Bool(value))
    }
}

/// An entry in the embedded namespace: a single sub-resource or an ordered
/// list of sub-resources.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedded {
    Single(Resource),
    Collection(Vec<Resource>),
}

/// Object representation of a Hypertext Application Language resource.
#[derive(Debug, Clone)]
pub struct Resource {
    inner: Arc<ResourceInner>,
}

#[derive(Debug)]
struct ResourceInner {
    data: Map<String, Value>,
    embedded: IndexMap<String, Embedded>,
    links: Vec<Link>,
    embed_empty_collections: bool,
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.inner.data == other.inner.data
            && self.inner.embedded == other.inner.embedded
            && self.inner.links == other.inner.links
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::new()
    }
}

impl Resource {
    /// Create an empty resource with the default empty-collection policy
    /// (empty lists stay plain data fields).
    pub fn new() -> Self {
        Resource {
            inner: Arc::new(ResourceInner {
                data: Map::new(),
                embedded: IndexMap::new(),
                links: Vec::new(),
                embed_empty_collections: false,
            }),
        }
    }

    /// Start the builder pattern for a fully-populated resource.
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder::default()
    }

    /// Build a resource from a plain field mapping.
    ///
    /// # Errors
    ///
    /// Fails when any name is empty or reserved.
    pub fn from_data(data: Map<String, Value>) -> Result<Self, DomainError> {
        let mut builder = Resource::builder();
        for (name, value) in data {
            builder = builder.element(name, value);
        }
        builder.build()
    }

    /// Whether two handles point at the same underlying resource value.
    pub fn ptr_eq(a: &Resource, b: &Resource) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// The plain (non-embedded) fields, in insertion order.
    pub fn data(&self) -> &Map<String, Value> {
        &self.inner.data
    }

    /// The embedded sub-resources, in insertion order.
    pub fn embedded(&self) -> &IndexMap<String, Embedded> {
        &self.inner.embedded
    }

    pub fn links(&self) -> &[Link] {
        &self.inner.links
    }

    /// All links serving the given relation type.
    pub fn links_by_rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.inner.links.iter().filter(move |link| link.has_rel(rel))
    }

    /// Retrieve a named element from either namespace.
    ///
    /// A name held by the embedded namespace yields the sub-resource(s);
    /// otherwise the plain data value; `None` when absent from both.
    ///
    /// # Errors
    ///
    /// Fails when `name` is empty or reserved.
    pub fn get_element(&self, name: &str) -> Result<Option<Element>, DomainError> {
        validate_element_name(name)?;
        if let Some(embedded) = self.inner.embedded.get(name) {
            return Ok(Some(match embedded {
                Embedded::Single(resource) => Element::Resource(resource.clone()),
                Embedded::Collection(resources) => Element::Collection(resources.clone()),
            }));
        }
        Ok(self.inner.data.get(name).cloned().map(Element::Value))
    }

    /// All elements of the resource: plain fields first, then embedded
    /// sub-resources, each under its name.
    pub fn elements(&self) -> impl Iterator<Item = (&str, Element)> + '_ {
        let data = self
            .inner
            .data
            .iter()
            .map(|(name, value)| (name.as_str(), Element::Value(value.clone())));
        let embedded = self.inner.embedded.iter().map(|(name, embedded)| {
            let element = match embedded {
                Embedded::Single(resource) => Element::Resource(resource.clone()),
                Embedded::Collection(resources) => Element::Collection(resources.clone()),
            };
            (name.as_str(), element)
        });
        data.chain(embedded)
    }

    /// Return an instance including the given link.
    ///
    /// No-op (same handle) when this exact link handle is already attached.
    pub fn with_link(&self, link: Link) -> Resource {
        if self.inner.links.iter().any(|held| Link::ptr_eq(held, &link)) {
            return self.clone();
        }
        let mut links = self.inner.links.clone();
        links.push(link);
        self.evolve(|inner| inner.links = links)
    }

    /// Return an instance without the given link.
    ///
    /// No-op (same handle) when the link handle is not attached.
    pub fn without_link(&self, link: &Link) -> Resource {
        if !self.inner.links.iter().any(|held| Link::ptr_eq(held, link)) {
            return self.clone();
        }
        let links = self
            .inner
            .links
            .iter()
            .filter(|held| !Link::ptr_eq(held, link))
            .cloned()
            .collect();
        self.evolve(|inner| inner.links = links)
    }

    /// Return an instance including the named element.
    ///
    /// Sub-resource values (and, when the resource was built with
    /// `embed_empty_collections`, empty sub-resource lists) are routed to
    /// [`embed`](Resource::embed). Plain values overwrite an existing data
    /// field of the same name.
    ///
    /// # Errors
    ///
    /// - name empty or reserved
    /// - a plain value targeting a name held by the embedded namespace
    pub fn with_element(
        &self,
        name: impl Into<String>,
        value: impl Into<Element>,
    ) -> Result<Resource, DomainError> {
        let name = name.into();
        validate_element_name(&name)?;

        match value.into() {
            Element::Resource(resource) => self.embed(name, resource, false),
            Element::Collection(resources) if !resources.is_empty() => {
                self.embed(name, resources, false)
            }
            Element::Collection(resources) if self.inner.embed_empty_collections => {
                self.embed(name, resources, false)
            }
            // Empty sub-resource list under the default policy: plain field.
            Element::Collection(_) => self.set_data(name, Value::Array(Vec::new())),
            Element::Value(value) => self.set_data(name, value),
        }
    }

    /// Fold [`with_element`](Resource::with_element) over a set of entries.
    pub fn with_elements<N, E>(
        &self,
        elements: impl IntoIterator<Item = (N, E)>,
    ) -> Result<Resource, DomainError>
    where
        N: Into<String>,
        E: Into<Element>,
    {
        let mut resource = self.clone();
        for (name, value) in elements {
            resource = resource.with_element(name, value)?;
        }
        Ok(resource)
    }

    /// Return an instance without the named element, whichever namespace
    /// holds it. No-op (same handle) when absent from both.
    ///
    /// # Errors
    ///
    /// Fails when `name` is empty or reserved.
    pub fn without_element(&self, name: &str) -> Result<Resource, DomainError> {
        validate_element_name(name)?;

        if self.inner.data.contains_key(name) {
            let mut data = self.inner.data.clone();
            // shift_remove keeps the insertion order of the remaining fields
            data.shift_remove(name);
            return Ok(self.evolve(|inner| inner.data = data));
        }

        if self.inner.embedded.contains_key(name) {
            let mut embedded = self.inner.embedded.clone();
            embedded.shift_remove(name);
            return Ok(self.evolve(|inner| inner.embedded = embedded));
        }

        Ok(self.clone())
    }

    /// Embed a sub-resource or list of sub-resources under the given name,
    /// merging with whatever the name already holds.
    ///
    /// `force_collection` wraps an otherwise-single resource in a
    /// one-element list so it serializes as an array.
    ///
    /// Merge rules (existing → incoming):
    /// - none → stored as-is (single wrapped when forced);
    /// - single → single: two-element list;
    /// - single → list / list → list: sides concatenate, existing first;
    ///   the shape probe is shallow — only "has a first element" is
    ///   compared, and one empty side against a non-empty one is a
    ///   structural mismatch;
    /// - list → single: append (appending to an empty list is a mismatch).
    ///
    /// Members of differing field shapes under one name are allowed — HAL
    /// permits union-typed collections.
    ///
    /// # Errors
    ///
    /// - name empty or reserved
    /// - name already held by the data namespace
    /// - value that is not a resource nor a list of resources
    /// - structural mismatch per the rules above
    pub fn embed(
        &self,
        name: impl Into<String>,
        value: impl Into<Element>,
        force_collection: bool,
    ) -> Result<Resource, DomainError> {
        let name = name.into();
        validate_element_name(&name)?;
        if self.inner.data.contains_key(&name) {
            return Err(DomainError::EmbedCollidesWithData { name });
        }

        let incoming = match value.into() {
            Element::Resource(resource) => Embedded::Single(resource),
            Element::Collection(resources) => Embedded::Collection(resources),
            Element::Value(value) => {
                return Err(DomainError::InvalidEmbedValue {
                    found: json_type_name(&value),
                });
            }
        };

        let aggregated = self.aggregate(&name, incoming, force_collection)?;
        let mut embedded = self.inner.embedded.clone();
        embedded.insert(name, aggregated);
        Ok(self.evolve(|inner| inner.embedded = embedded))
    }

    /// The canonical serializable projection: data fields first, then
    /// `_links`, then `_embedded` (each only when non-empty).
    pub fn to_map(&self) -> Map<String, Value> {
        let mut projection = self.inner.data.clone();

        if !self.inner.links.is_empty() {
            projection.insert("_links".into(), Value::Object(self.serialize_links()));
        }

        if !self.inner.embedded.is_empty() {
            let mut embedded = Map::new();
            for (name, entry) in &self.inner.embedded {
                let value = match entry {
                    Embedded::Single(resource) => Value::Object(resource.to_map()),
                    Embedded::Collection(resources) => Value::Array(
                        resources
                            .iter()
                            .map(|resource| Value::Object(resource.to_map()))
                            .collect(),
                    ),
                };
                embedded.insert(name.clone(), value);
            }
            projection.insert("_embedded".into(), Value::Object(embedded));
        }

        projection
    }

    /// Group links by relation and collapse singleton groups to a single
    /// object, unless a member carries the forced-collection marker.
    fn serialize_links(&self) -> Map<String, Value> {
        let mut by_relation: IndexMap<&str, (Vec<Map<String, Value>>, bool)> = IndexMap::new();

        for link in &self.inner.links {
            let representation = link.representation();
            let forced = link.forces_collection();
            for rel in link.relations() {
                let entry = by_relation.entry(rel).or_default();
                entry.0.push(representation.clone());
                entry.1 |= forced;
            }
        }

        let mut serialized = Map::new();
        for (rel, (mut members, forced)) in by_relation {
            let value = if members.len() == 1 && !forced {
                Value::Object(members.remove(0))
            } else {
                Value::Array(members.into_iter().map(Value::Object).collect())
            };
            serialized.insert(rel.to_owned(), value);
        }
        serialized
    }

    fn set_data(&self, name: String, value: Value) -> Result<Resource, DomainError> {
        if self.inner.embedded.contains_key(&name) {
            return Err(DomainError::ElementCollidesWithEmbedded { name });
        }
        let mut data = self.inner.data.clone();
        data.insert(name, value);
        Ok(self.evolve(|inner| inner.data = data))
    }

    fn aggregate(
        &self,
        name: &str,
        incoming: Embedded,
        force_collection: bool,
    ) -> Result<Embedded, DomainError> {
        let Some(existing) = self.inner.embedded.get(name) else {
            return Ok(match incoming {
                Embedded::Single(resource) if force_collection => {
                    Embedded::Collection(vec![resource])
                }
                other => other,
            });
        };

        match (existing, incoming) {
            (Embedded::Single(held), Embedded::Single(resource)) => {
                Ok(Embedded::Collection(vec![held.clone(), resource]))
            }
            (Embedded::Single(held), Embedded::Collection(resources)) => {
                merge_collections(name, vec![held.clone()], resources)
            }
            (Embedded::Collection(held), Embedded::Single(resource)) => {
                if held.is_empty() {
                    return Err(DomainError::StructurallyInequivalent {
                        name: name.to_owned(),
                    });
                }
                let mut merged = held.clone();
                merged.push(resource);
                Ok(Embedded::Collection(merged))
            }
            (Embedded::Collection(held), Embedded::Collection(resources)) => {
                merge_collections(name, held.clone(), resources)
            }
        }
    }

    fn evolve(&self, mutate: impl FnOnce(&mut ResourceInner)) -> Resource {
        let mut inner = ResourceInner {
            data: self.inner.data.clone(),
            embedded: self.inner.embedded.clone(),
            links: self.inner.links.clone(),
            embed_empty_collections: self.inner.embed_empty_collections,
        };
        mutate(&mut inner);
        Resource {
            inner: Arc::new(inner),
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// The shape probe is intentionally shallow: only the presence of a first
/// element on each side is compared, never member field shapes.
fn merge_collections(
    name: &str,
    existing: Vec<Resource>,
    incoming: Vec<Resource>,
) -> Result<Embedded, DomainError> {
    match (existing.is_empty(), incoming.is_empty()) {
        (true, true) => Ok(Embedded::Collection(Vec::new())),
        (false, false) => {
            let mut merged = existing;
            merged.extend(incoming);
            Ok(Embedded::Collection(merged))
        }
        _ => Err(DomainError::StructurallyInequivalent {
            name: name.to_owned(),
        }),
    }
}

fn validate_element_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::EmptyElementName);
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(DomainError::ReservedElementName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builder for a fully-populated [`Resource`]. Entries are applied in
/// order at [`build`](ResourceBuilder::build), with the same validation as
/// the evolution methods.
#[derive(Default)]
pub struct ResourceBuilder {
    elements: Vec<(String, Element)>,
    embedded: Vec<(String, Element)>,
    links: Vec<Link>,
    embed_empty_collections: bool,
}

impl ResourceBuilder {
    /// Add a named element; sub-resource values route to the embedded
    /// namespace exactly as [`Resource::with_element`] does.
    pub fn element(mut self, name: impl Into<String>, value: impl Into<Element>) -> Self {
        self.elements.push((name.into(), value.into()));
        self
    }

    /// Explicitly embed a sub-resource or list of sub-resources.
    pub fn embed(mut self, name: impl Into<String>, value: impl Into<Element>) -> Self {
        self.embedded.push((name.into(), value.into()));
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Route empty sub-resource lists to the embedded namespace instead of
    /// keeping them as plain `[]` data fields. `null` values stay plain
    /// data regardless.
    pub fn embed_empty_collections(mut self, embed: bool) -> Self {
        self.embed_empty_collections = embed;
        self
    }

    /// Consume the builder and construct the resource.
    ///
    /// # Errors
    ///
    /// Any error the equivalent sequence of `with_element` / `embed` /
    /// `with_link` calls would raise.
    pub fn build(self) -> Result<Resource, DomainError> {
        let mut resource = Resource {
            inner: Arc::new(ResourceInner {
                data: Map::new(),
                embedded: IndexMap::new(),
                links: Vec::new(),
                embed_empty_collections: self.embed_empty_collections,
            }),
        };
        for (name, value) in self.elements {
            resource = resource.with_element(name, value)?;
        }
        for (name, value) in self.embedded {
            match value {
                Element::Resource(_) | Element::Collection(_) => {
                    resource = resource.embed(name, value, false)?;
                }
                Element::Value(value) => {
                    return Err(DomainError::InvalidEmbedValue {
                        found: json_type_name(&value),
                    });
                }
            }
        }
        for link in self.links {
            resource = resource.with_link(link);
        }
        Ok(resource)
    }
}
