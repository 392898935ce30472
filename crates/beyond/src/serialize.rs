//! Node tree -> data tree conversion.
//!
//! Plain attributes are copied (with reserved-word renames), event
//! attributes are swapped for freshly allocated keys. The registry being
//! built is threaded through the recursion by value, so every allocation
//! sees every key handed out earlier in the same call.

use std::collections::BTreeMap;

use beyond_protocol::{Data, Datum, Element};

use crate::key::{KeyAllocator, KeyspaceExhausted};
use crate::node::{AttrValue, Child, Node};
use crate::registry::CallbackRegistry;

/// Attribute names that stand in for reserved words.
const RENAMES: &[(&str, &str)] = &[("For", "for"), ("Class", "class")];

/// Serialize with a default (ULID, single attempt) allocator.
pub fn serialize(root: &Node) -> Result<(Data, CallbackRegistry), KeyspaceExhausted> {
    serialize_with(root, &mut KeyAllocator::new())
}

pub fn serialize_with(
    root: &Node,
    keys: &mut KeyAllocator,
) -> Result<(Data, CallbackRegistry), KeyspaceExhausted> {
    node_to_data(root, CallbackRegistry::new(), keys)
}

/// The name an attribute is emitted under.
pub fn html_attribute_name(name: &str) -> &str {
    RENAMES
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |(_, to)| *to)
}

/// Event name for an event attribute: `onClick` -> `click`, `on_change` -> `change`.
pub fn event_name(attribute: &str) -> String {
    attribute
        .strip_prefix("on_")
        .or_else(|| attribute.strip_prefix("on"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(attribute)
        .to_ascii_lowercase()
}

fn child_to_data(
    child: &Child,
    registry: CallbackRegistry,
    keys: &mut KeyAllocator,
) -> Result<(Data, CallbackRegistry), KeyspaceExhausted> {
    match child {
        Child::Text(scalar) => Ok((Data::Scalar(scalar.clone()), registry)),
        Child::Node(node) => node_to_data(node, registry, keys),
    }
}

fn node_to_data(
    node: &Node,
    mut registry: CallbackRegistry,
    keys: &mut KeyAllocator,
) -> Result<(Data, CallbackRegistry), KeyspaceExhausted> {
    let mut attributes: BTreeMap<String, Datum> = BTreeMap::new();
    let mut on: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in node.attributes() {
        match value {
            AttrValue::Plain(datum) => {
                let emitted = html_attribute_name(name);
                if let Some(dropped) = attributes.insert(emitted.to_string(), datum.clone()) {
                    log::warn!(
                        "<{}> sets `{emitted}` more than once, {dropped:?} is replaced by `{name}`",
                        node.tag()
                    );
                }
            }
            AttrValue::Event(callback) => {
                let key = keys.allocate(&registry)?;
                registry.insert(key.clone(), callback.clone());
                let event = event_name(name);
                if let Some(shadowed) = on.insert(event.clone(), key) {
                    log::warn!(
                        "<{}> binds `{event}` more than once, key {shadowed} is unreachable",
                        node.tag()
                    );
                }
            }
        }
    }

    let mut children = Vec::with_capacity(node.children().len());
    for child in node.children() {
        let (data, next) = child_to_data(child, registry, keys)?;
        registry = next;
        children.push(data);
    }

    let element = Element {
        tag: node.tag().to_string(),
        attributes,
        on,
        children,
    };
    Ok((Data::Element(element), registry))
}
