//! Link value object: one or more relation types pointing at an href.
//!
//! A `Link` is an immutable, cheaply-cloneable handle (`Arc`-backed). Every
//! evolution method returns a *new* `Link`; when the requested change is a
//! no-op (adding a relation that is already present, removing one that is
//! absent, and so on) the method returns a handle to the **same** allocation.
//! That identity preservation is part of the contract — callers may rely on
//! [`Link::ptr_eq`] to detect it.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// An immutable hyperlink carrying one or more relation types.
#[derive(Debug, Clone)]
pub struct Link {
    inner: Arc<LinkInner>,
}

#[derive(Debug, PartialEq)]
struct LinkInner {
    relations: Vec<String>,
    href: String,
    templated: bool,
    attributes: Map<String, Value>,
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Link {
    /// Reserved attribute key. When set to a truthy value on a link, the
    /// relation group containing that link serializes as an array even when
    /// it has a single member. The marker itself never appears in output.
    pub const AS_COLLECTION: &'static str = "__FORCE_COLLECTION__";

    /// Create a link with a single relation type and an href.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyRelation`] when `relation` is empty.
    pub fn new(relation: impl Into<String>, href: impl Into<String>) -> Result<Self, DomainError> {
        Self::builder(relation).href(href).build()
    }

    /// Start the builder pattern for links with multiple relations,
    /// templating, or attributes.
    pub fn builder(relation: impl Into<String>) -> LinkBuilder {
        LinkBuilder {
            relations: vec![relation.into()],
            href: String::new(),
            templated: false,
            attributes: Map::new(),
        }
    }

    /// All relation types served by this link. Never empty.
    pub fn relations(&self) -> &[String] {
        &self.inner.relations
    }

    pub fn href(&self) -> &str {
        &self.inner.href
    }

    pub fn is_templated(&self) -> bool {
        self.inner.templated
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.inner.attributes
    }

    /// Whether this link serves the given relation type.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.inner.relations.iter().any(|r| r == rel)
    }

    /// Whether two handles point at the same underlying link value.
    ///
    /// This is how the identity-preserving no-op contract is observed:
    /// `Link::ptr_eq(&link, &link.with_rel("self")?)` holds when `"self"`
    /// was already among the relations.
    pub fn ptr_eq(a: &Link, b: &Link) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Return a link including the given relation type.
    ///
    /// No-op (same handle) when the relation is already present.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyRelation`] when `rel` is empty.
    pub fn with_rel(&self, rel: impl Into<String>) -> Result<Link, DomainError> {
        let rel = rel.into();
        if rel.is_empty() {
            return Err(DomainError::EmptyRelation);
        }
        if self.has_rel(&rel) {
            return Ok(self.clone());
        }
        let mut relations = self.inner.relations.clone();
        relations.push(rel);
        Ok(self.evolve(|inner| inner.relations = relations))
    }

    /// Return a link without the given relation type.
    ///
    /// No-op (same handle) when the relation is absent or empty.
    pub fn without_rel(&self, rel: &str) -> Link {
        if rel.is_empty() || !self.has_rel(rel) {
            return self.clone();
        }
        let relations = self
            .inner
            .relations
            .iter()
            .filter(|r| r.as_str() != rel)
            .cloned()
            .collect();
        self.evolve(|inner| inner.relations = relations)
    }

    /// Return a link pointing at a different href.
    pub fn with_href(&self, href: impl Into<String>) -> Link {
        let href = href.into();
        self.evolve(|inner| inner.href = href)
    }

    /// Return a link carrying the given attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyAttributeName`] for an empty name, and
    /// [`DomainError::InvalidAttributeValue`] when the value is not a
    /// scalar, an array of strings, or null.
    pub fn with_attribute(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Link, DomainError> {
        let name = name.into();
        let value = value.into();
        validate_attribute_name(&name)?;
        validate_attribute_value(&value)?;
        let mut attributes = self.inner.attributes.clone();
        attributes.insert(name, value);
        Ok(self.evolve(|inner| inner.attributes = attributes))
    }

    /// Return a link without the given attribute.
    ///
    /// No-op (same handle) when the attribute is absent or the name is
    /// empty.
    pub fn without_attribute(&self, name: &str) -> Link {
        if name.is_empty() || !self.inner.attributes.contains_key(name) {
            return self.clone();
        }
        let mut attributes = self.inner.attributes.clone();
        attributes.shift_remove(name);
        self.evolve(|inner| inner.attributes = attributes)
    }

    /// Whether the forced-collection marker attribute is set to a truthy
    /// value on this link.
    pub(crate) fn forces_collection(&self) -> bool {
        match self.inner.attributes.get(Self::AS_COLLECTION) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(_) => true,
        }
    }

    /// The serialized object form of this link: attributes (marker key
    /// stripped), then `href`, then `templated` when set.
    pub(crate) fn representation(&self) -> Map<String, Value> {
        let mut repr: Map<String, Value> = self
            .inner
            .attributes
            .iter()
            .filter(|(name, _)| name.as_str() != Self::AS_COLLECTION)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        repr.insert("href".into(), Value::String(self.inner.href.clone()));
        if self.inner.templated {
            repr.insert("templated".into(), Value::Bool(true));
        }
        repr
    }

    fn evolve(&self, mutate: impl FnOnce(&mut LinkInner)) -> Link {
        let mut inner = LinkInner {
            relations: self.inner.relations.clone(),
            href: self.inner.href.clone(),
            templated: self.inner.templated,
            attributes: self.inner.attributes.clone(),
        };
        mutate(&mut inner);
        Link {
            inner: Arc::new(inner),
        }
    }
}

/// Builder for [`Link`]. Validation happens at [`build`](LinkBuilder::build).
pub struct LinkBuilder {
    relations: Vec<String>,
    href: String,
    templated: bool,
    attributes: Map<String, Value>,
}

impl LinkBuilder {
    /// Add a further relation type served by the same link.
    pub fn relation(mut self, rel: impl Into<String>) -> Self {
        self.relations.push(rel.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    /// Mark the href as an RFC 6570 URI template.
    pub fn templated(mut self, templated: bool) -> Self {
        self.templated = templated;
        self
    }

    /// Attach an attribute. Validated at `build`.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Consume the builder and construct the link.
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmptyRelation`] when any relation is empty
    /// - [`DomainError::EmptyAttributeName`] / [`DomainError::InvalidAttributeValue`]
    ///   for malformed attributes
    pub fn build(self) -> Result<Link, DomainError> {
        if self.relations.iter().any(String::is_empty) {
            return Err(DomainError::EmptyRelation);
        }
        for (name, value) in &self.attributes {
            validate_attribute_name(name)?;
            validate_attribute_value(value)?;
        }
        Ok(Link {
            inner: Arc::new(LinkInner {
                relations: self.relations,
                href: self.href,
                templated: self.templated,
                attributes: self.attributes,
            }),
        })
    }
}

fn validate_attribute_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::EmptyAttributeName);
    }
    Ok(())
}

fn validate_attribute_value(value: &Value) -> Result<(), DomainError> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
        Value::Array(items) => {
            if items.iter().all(Value::is_string) {
                Ok(())
            } else {
                Err(DomainError::InvalidAttributeValue {
                    reason: "array attribute values must contain only strings".into(),
                })
            }
        }
        Value::Object(_) => Err(DomainError::InvalidAttributeValue {
            reason: "expected a scalar, an array of strings, or null".into(),
        }),
    }
}
