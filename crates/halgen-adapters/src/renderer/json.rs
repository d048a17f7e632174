//! JSON rendering: the resource's serialization projection through
//! serde_json, compact by default.

use tracing::instrument;

use halgen_core::application::Renderer;
use halgen_core::domain::Resource;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Compact output.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Human-readable, 2-space-indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    #[instrument(skip_all)]
    fn render(&self, resource: &Resource) -> String {
        let projection = resource.to_map();
        if self.pretty {
            serde_json::to_string_pretty(&projection)
                .expect("a resource projection always serializes")
        } else {
            serde_json::to_string(&projection).expect("a resource projection always serializes")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halgen_core::domain::Link;

    fn resource() -> Resource {
        Resource::builder()
            .element("foo", "bar")
            .link(Link::new("self", "/api/foo").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn renders_compact_by_default() {
        let rendered = JsonRenderer::new().render(&resource());
        assert_eq!(rendered, r#"{"foo":"bar","_links":{"self":{"href":"/api/foo"}}}"#);
    }

    #[test]
    fn pretty_renders_indented() {
        let rendered = JsonRenderer::pretty().render(&resource());
        assert!(rendered.contains("\n  \"foo\": \"bar\""));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&rendered).unwrap(),
            serde_json::from_str::<serde_json::Value>(&JsonRenderer::new().render(&resource()))
                .unwrap()
        );
    }
}
