//! Element constructors.
//!
//! `element` builds a node for any tag. `form` and `input` carry behavioral
//! defaults, and `create` routes a tag name to the matching constructor.

use beyond_protocol::Datum;

use crate::key::fresh_id;
use crate::node::{AttrValue, Attributes, Node};

/// Attribute preset on every `form` so the browser never submits it.
pub const SUBMIT_SUPPRESSION: (&str, &str) = ("onsubmit", "return false;");

/// A fresh, empty node for `tag`.
pub fn element(tag: impl Into<String>) -> Node {
    Node::new(tag)
}

/// Build a node for `tag`, applying per-tag construction rules.
pub fn create(tag: &str, attributes: Attributes) -> Node {
    match tag {
        "form" => form(attributes),
        "input" => input(attributes),
        _ => element(tag).attrs(attributes),
    }
}

/// A `form` with submission suppressed unless the caller overrides it.
pub fn form(attributes: Attributes) -> Node {
    let (name, value) = SUBMIT_SUPPRESSION;
    element("form").attr(name, value).attrs(attributes)
}

/// An `input`. Text inputs get a unique `input#<id>` tag so clients can
/// address them across renders; a caller-supplied `id` is dropped.
pub fn input(attributes: Attributes) -> Node {
    if !is_text_input(&attributes) {
        return element("input").attrs(attributes);
    }

    let tag = format!("input#{}", fresh_id());
    let attributes = attributes.into_iter().filter(|(name, _)| {
        if name == "id" {
            log::warn!("id attribute on text input ignored, using `{tag}`");
            false
        } else {
            true
        }
    });
    element(tag.as_str()).attrs(attributes)
}

fn is_text_input(attributes: &Attributes) -> bool {
    attributes.iter().any(|(name, value)| {
        name == "type" && matches!(value, AttrValue::Plain(Datum::Text(kind)) if kind == "text")
    })
}

macro_rules! tags {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("A fresh `", stringify!($name), "` node.")]
            pub fn $name() -> Node {
                element(stringify!($name))
            }
        )*
    };
}

tags!(
    a, button, div, footer, h1, h2, h3, header, label, li, main, nav, ol, p, section, span, strong,
    ul,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use crate::node::Callback;

    fn text_attr<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
        node.attribute(name)?.as_datum()?.as_text()
    }

    #[test]
    fn element_builds_any_tag() {
        let node = element("my-widget");
        assert_eq!(node.tag(), "my-widget");
        assert!(node.attributes().is_empty());
        assert_eq!(section().tag(), "section");
    }

    #[test]
    fn form_suppresses_submit_by_default() {
        let node = form(attrs! {});
        assert_eq!(text_attr(&node, "onsubmit"), Some("return false;"));
    }

    #[test]
    fn form_default_can_be_overridden() {
        let node = form(attrs! { "onsubmit" => "validate()" });
        assert_eq!(text_attr(&node, "onsubmit"), Some("validate()"));
    }

    #[test]
    fn form_keeps_callbacks() {
        let node = form(attrs! { "onSubmit" => Callback::new(|_| {}) });
        assert!(node.attribute("onSubmit").is_some_and(AttrValue::is_event));
        assert_eq!(text_attr(&node, "onsubmit"), Some("return false;"));
    }

    #[test]
    fn text_inputs_get_distinct_identities() {
        let first = input(attrs! { "type" => "text" });
        let second = input(attrs! { "type" => "text" });
        assert!(first.tag().starts_with("input#"));
        assert!(second.tag().starts_with("input#"));
        assert_ne!(first.tag(), second.tag());
    }

    #[test]
    fn text_input_drops_explicit_id() {
        let node = input(attrs! { "type" => "text", "id" => "name", "class" => "new-todo" });
        assert!(node.attribute("id").is_none());
        assert_eq!(text_attr(&node, "class"), Some("new-todo"));
    }

    #[test]
    fn other_inputs_are_plain() {
        let node = input(attrs! { "type" => "submit", "id" => "go" });
        assert_eq!(node.tag(), "input");
        assert_eq!(text_attr(&node, "id"), Some("go"));
    }

    #[test]
    fn create_dispatches_special_tags() {
        assert_eq!(create("form", attrs! {}).tag(), "form");
        assert!(create("input", attrs! { "type" => "text" }).tag().starts_with("input#"));
        let div = create("div", attrs! { "class" => "x" });
        assert_eq!(div.tag(), "div");
        assert_eq!(text_attr(&div, "class"), Some("x"));
    }
}
