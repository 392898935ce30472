//! Wire types for beyond server <-> client communication.
//!
//! Everything here is plain data: a rendered tree never carries behavior,
//! only event keys that the server resolves on the way back.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// JSON has no NaN or infinity; refuse them instead of writing `null`.
fn finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        Err(serde::ser::Error::custom(format!(
            "non-finite number {value} cannot be serialized"
        )))
    }
}

/// A literal text child: string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    #[serde(serialize_with = "finite")]
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

/// A plain (display) attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Bool(bool),
    Int(i64),
    #[serde(serialize_with = "finite")]
    Float(f64),
    Text(String),
}

impl Datum {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Datum::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Text(value.to_string())
    }
}

impl From<&String> for Datum {
    fn from(value: &String) -> Self {
        Datum::Text(value.clone())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Text(value)
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Bool(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int(value)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Self {
        Datum::Int(value.into())
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Float(value)
    }
}

/// One rendered element.
///
/// JSON shape: `{"tag": .., "attributes": {..}, "on": {..}, "children": [..]}`.
/// `on` maps event names to registry keys and is left out when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Datum>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub on: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Data>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            on: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

/// A node of the rendered tree: a bare scalar or an element record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Data {
    Scalar(Scalar),
    Element(Element),
}

impl Data {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Data::Element(element) => Some(element),
            Data::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Data::Scalar(scalar) => Some(scalar),
            Data::Element(_) => None,
        }
    }

    /// All `(event, key)` bindings in depth-first order.
    pub fn bindings(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        collect_bindings(self, &mut out);
        out
    }

    /// Find the first element (depth-first) whose tag matches.
    pub fn find_tag(&self, tag: &str) -> Option<&Element> {
        let element = self.as_element()?;
        if element.tag == tag {
            return Some(element);
        }
        element.children.iter().find_map(|child| child.find_tag(tag))
    }

    /// Concatenated text of all scalar descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_bindings<'a>(data: &'a Data, out: &mut Vec<(&'a str, &'a str)>) {
    if let Data::Element(element) = data {
        for (event, key) in &element.on {
            out.push((event.as_str(), key.as_str()));
        }
        for child in &element.children {
            collect_bindings(child, out);
        }
    }
}

fn collect_text(data: &Data, out: &mut String) {
    match data {
        Data::Scalar(Scalar::Text(text)) => out.push_str(text),
        Data::Scalar(Scalar::Int(n)) => out.push_str(&n.to_string()),
        Data::Scalar(Scalar::Float(n)) => out.push_str(&n.to_string()),
        Data::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
        }
    }
}

/// Event notification sent by a client.
///
/// `event` is application-defined and passed to the callback untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub key: String,
    #[serde(default)]
    pub event: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Event {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            event: serde_json::Value::Null,
            path: None,
            kind: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.event = body;
        self
    }

    /// Convenience for the `{"target.value": ..}` body browsers send for inputs.
    pub fn with_target_value(self, value: impl Into<String>) -> Self {
        self.with_body(serde_json::json!({ "target.value": value.into() }))
    }

    pub fn target_value(&self) -> Option<&str> {
        self.event.get("target.value")?.as_str()
    }
}

/// Reply to a client after a send or recv.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    /// A fresh tree; keys from any earlier response are no longer valid
    Render { epoch: u64, tree: Data },

    /// The event could not be dispatched
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn element_without_events_omits_on() {
        let mut element = Element::new("div");
        element.children.push(Data::Scalar("hi".into()));
        let value = serde_json::to_value(Data::Element(element)).unwrap();
        assert_eq!(
            value,
            json!({"tag": "div", "attributes": {}, "children": ["hi"]})
        );
    }

    #[test]
    fn element_with_events_keeps_on() {
        let mut element = Element::new("button");
        element.on.insert("click".to_string(), "k1".to_string());
        let value = serde_json::to_value(Data::Element(element)).unwrap();
        assert_eq!(value["on"], json!({"click": "k1"}));
    }

    #[test]
    fn parses_browser_event_envelope() {
        let raw = r#"{"path": "/", "type": "dom-event", "key": "abc", "event": {"target.value": "milk"}}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.key, "abc");
        assert_eq!(event.kind.as_deref(), Some("dom-event"));
        assert_eq!(event.target_value(), Some("milk"));
    }

    #[test]
    fn event_body_defaults_to_null() {
        let event: Event = serde_json::from_str(r#"{"key": "abc"}"#).unwrap();
        assert!(event.event.is_null());
        assert_eq!(event.target_value(), None);
    }

    #[test]
    fn scalars_keep_their_number_kind() {
        let children: Vec<Data> = serde_json::from_str(r#"["x", 3, 1.5]"#).unwrap();
        assert_eq!(children[0], Data::Scalar(Scalar::Text("x".into())));
        assert_eq!(children[1], Data::Scalar(Scalar::Int(3)));
        assert_eq!(children[2], Data::Scalar(Scalar::Float(1.5)));
    }

    #[test]
    fn non_finite_numbers_are_refused() {
        assert!(serde_json::to_string(&Data::Scalar(Scalar::Float(f64::NAN))).is_err());
        let mut element = Element::new("meter");
        element.attributes.insert("max".into(), Datum::Float(f64::INFINITY));
        assert!(serde_json::to_string(&Data::Element(element)).is_err());
        assert_eq!(serde_json::to_string(&Scalar::Float(0.5)).unwrap(), "0.5");
    }

    #[test]
    fn bindings_are_depth_first() {
        let tree: Data = serde_json::from_value(json!({
            "tag": "div",
            "attributes": {},
            "on": {"click": "a"},
            "children": [
                {"tag": "input", "attributes": {}, "on": {"change": "b"}, "children": []},
                {"tag": "button", "attributes": {}, "on": {"click": "c"}, "children": ["go"]}
            ]
        }))
        .unwrap();
        assert_eq!(
            tree.bindings(),
            vec![("click", "a"), ("change", "b"), ("click", "c")]
        );
        assert_eq!(tree.text_content(), "go");
        assert_eq!(tree.find_tag("button").map(|b| b.children.len()), Some(1));
    }

    #[test]
    fn response_is_tagged() {
        let response = Response::Error { message: "nope".into() };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"type": "error", "message": "nope"})
        );
    }
}
