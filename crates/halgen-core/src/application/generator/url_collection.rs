//! Collection strategy for URL-addressed collections.
//!
//! Page links rebuild the URL's query string from the request's live
//! query params with the pagination key substituted (query type), or
//! replace a `{param}` token in the URL itself (placeholder type). The
//! un-paginated self link appends the request's query string verbatim.

use crate::application::error::GeneratorError;
use crate::application::generator::paging::{self, PageConfig, PageLinkSource};
use crate::application::generator::{ResourceGenerator, Strategy};
use crate::application::params::query_string;
use crate::application::request::RequestContext;
use crate::domain::{Entity, Link, Resource};
use crate::error::HalResult;
use crate::metadata::{Metadata, MetadataKind, PaginationParamType, UrlBasedCollectionMetadata};

pub struct UrlBasedCollectionStrategy;

impl Strategy for UrlBasedCollectionStrategy {
    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &RequestContext,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::UrlBasedCollection(descriptor) = metadata else {
            return Err(GeneratorError::UnexpectedMetadataType {
                expected: MetadataKind::UrlBasedCollection,
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

impl PageLinkSource for UrlBasedCollectionStrategy {
    fn page_link(
        &self,
        rel: &str,
        page: usize,
        metadata: &Metadata,
        _generator: &ResourceGenerator,
        request: &RequestContext,
    ) -> HalResult<Link> {
        let descriptor = url_collection(metadata)?;

        let mut url = descriptor.url().to_owned();
        let request_query = query_string(request.query_params());
        if !request_query.is_empty() {
            url = format!("{url}?{request_query}");
        }

        let url = match descriptor.pagination_param_type() {
            PaginationParamType::Placeholder => url.replace(
                &format!("{{{}}}", descriptor.pagination_param()),
                &page.to_string(),
            ),
            _ => set_query_param(
                &strip_fragment(&url),
                descriptor.pagination_param(),
                &page.to_string(),
            ),
        };

        Ok(Link::new(rel, url)?)
    }

    fn self_link(
        &self,
        metadata: &Metadata,
        _generator: &ResourceGenerator,
        request: &RequestContext,
    ) -> HalResult<Link> {
        let descriptor = url_collection(metadata)?;
        let request_query = query_string(request.query_params());
        let url = if request_query.is_empty() {
            descriptor.url().to_owned()
        } else {
            format!("{}?{}", descriptor.url(), request_query)
        };
        Ok(Link::new("self", url)?)
    }
}

fn url_collection(metadata: &Metadata) -> Result<&UrlBasedCollectionMetadata, GeneratorError> {
    match metadata {
        Metadata::UrlBasedCollection(descriptor) => Ok(descriptor),
        other => Err(GeneratorError::UnexpectedMetadataType {
            expected: MetadataKind::UrlBasedCollection,
            actual: other.kind(),
        }),
    }
}

fn strip_fragment(url: &str) -> String {
    match url.split_once('#') {
        Some((base, _)) => base.to_owned(),
        None => url.to_owned(),
    }
}

/// Set or replace a parameter in a URL's query string, keeping the order
/// of other parameters.
fn set_query_param(url: &str, param: &str, value: &str) -> String {
    let encoded_param = urlencoding::encode(param).into_owned();
    let encoded_value = urlencoding::encode(value).into_owned();

    let Some((base, query)) = url.split_once('?') else {
        return format!("{url}?{encoded_param}={encoded_value}");
    };

    if query.is_empty() {
        return format!("{base}?{encoded_param}={encoded_value}");
    }

    let mut replaced = false;
    let mut pairs: Vec<String> = query
        .split('&')
        .map(|pair| {
            let name = pair.split('=').next().unwrap_or(pair);
            if name == encoded_param {
                replaced = true;
                format!("{encoded_param}={encoded_value}")
            } else {
                pair.to_owned()
            }
        })
        .collect();
    if !replaced {
        pairs.push(format!("{encoded_param}={encoded_value}"));
    }

    format!("{base}?{}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_query_param_appends_when_absent() {
        assert_eq!(
            set_query_param("http://test.local/c", "p", "2"),
            "http://test.local/c?p=2"
        );
        assert_eq!(
            set_query_param("http://test.local/c?sort=ASC", "p", "2"),
            "http://test.local/c?sort=ASC&p=2"
        );
    }

    #[test]
    fn set_query_param_replaces_in_place() {
        assert_eq!(
            set_query_param("http://test.local/c?a=1&p=3&z=9", "p", "4"),
            "http://test.local/c?a=1&p=4&z=9"
        );
    }

    #[test]
    fn strip_fragment_drops_fragment_only() {
        assert_eq!(strip_fragment("http://t/c?p=1#frag"), "http://t/c?p=1");
        assert_eq!(strip_fragment("http://t/c?p=1"), "http://t/c?p=1");
    }
}
