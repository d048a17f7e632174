//! XML rendering: walks the resource tree, mapping the self link onto the
//! enclosing `<resource>` element, remaining links to `<link>` elements,
//! embedded resources to nested `<resource rel="...">` elements, and each
//! data field to a same-named element. Null values become empty elements,
//! list values repeat the element, object values nest.

use serde_json::{Map, Value};
use tracing::instrument;

use halgen_core::application::Renderer;
use halgen_core::domain::{Embedded, Link, Resource};

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlRenderer;

impl XmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for XmlRenderer {
    #[instrument(skip_all)]
    fn render(&self, resource: &Resource) -> String {
        let mut lines = vec![r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_owned()];
        render_resource(&mut lines, resource, "self", 0);
        lines.join("\n")
    }
}

fn render_resource(lines: &mut Vec<String>, resource: &Resource, rel: &str, depth: usize) {
    let indent = "  ".repeat(depth);

    let mut open = format!("{indent}<resource rel=\"{}\"", escape_attr(rel));
    if let Some(link) = resource.links_by_rel("self").next() {
        open.push_str(&format!(" href=\"{}\"", escape_attr(link.href())));
    }

    let mut children = Vec::new();
    for link in resource.links() {
        for link_rel in link.relations() {
            if link_rel == "self" {
                continue;
            }
            children.push(format!("{indent}  {}", link_element(link, link_rel)));
        }
    }
    for (name, entry) in resource.embedded() {
        match entry {
            Embedded::Single(child) => render_resource(&mut children, child, name, depth + 1),
            Embedded::Collection(members) => {
                for member in members {
                    render_resource(&mut children, member, name, depth + 1);
                }
            }
        }
    }
    for (name, value) in resource.data() {
        render_value(&mut children, name, value, depth + 1);
    }

    if children.is_empty() {
        lines.push(format!("{open}/>"));
    } else {
        lines.push(format!("{open}>"));
        lines.append(&mut children);
        lines.push(format!("{indent}</resource>"));
    }
}

fn link_element(link: &Link, rel: &str) -> String {
    let mut element = format!(
        "<link rel=\"{}\" href=\"{}\"",
        escape_attr(rel),
        escape_attr(link.href())
    );
    if link.is_templated() {
        element.push_str(" templated=\"true\"");
    }
    for (name, value) in link.attributes() {
        if name == Link::AS_COLLECTION {
            continue;
        }
        match value {
            Value::String(s) => element.push_str(&format!(" {name}=\"{}\"", escape_attr(s))),
            Value::Number(n) => element.push_str(&format!(" {name}=\"{n}\"")),
            Value::Bool(b) => element.push_str(&format!(" {name}=\"{b}\"")),
            // string lists and null have no attribute form
            _ => {}
        }
    }
    element.push_str("/>");
    element
}

fn render_value(lines: &mut Vec<String>, name: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Null => lines.push(format!("{indent}<{name}/>")),
        Value::Bool(b) => lines.push(format!("{indent}<{name}>{b}</{name}>")),
        Value::Number(n) => lines.push(format!("{indent}<{name}>{n}</{name}>")),
        Value::String(s) => lines.push(format!("{indent}<{name}>{}</{name}>", escape_text(s))),
        Value::Array(items) => {
            for item in items {
                render_value(lines, name, item, depth);
            }
        }
        Value::Object(fields) => render_object(lines, name, fields, depth),
    }
}

fn render_object(lines: &mut Vec<String>, name: &str, fields: &Map<String, Value>, depth: usize) {
    let indent = "  ".repeat(depth);
    if fields.is_empty() {
        lines.push(format!("{indent}<{name}/>"));
        return;
    }
    lines.push(format!("{indent}<{name}>"));
    for (field, value) in fields {
        render_value(lines, field, value, depth + 1);
    }
    lines.push(format!("{indent}</{name}>"));
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
