//! Text renderers over the finished resource tree.

mod json;
mod xml;

pub use json::JsonRenderer;
pub use xml::XmlRenderer;
