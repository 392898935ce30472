//! In-memory UI tree.
//!
//! A `Node` is built fresh on every render, mutated only by appending
//! children and merging attributes, then handed to the serializer.
//! Attributes are either plain data or callbacks; the distinction is
//! declared by `AttrValue`, never guessed from the attribute name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use beyond_protocol::{Datum, Event, Scalar};

/// Error type callbacks may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type CallbackFn = dyn Fn(&Event) -> Result<(), BoxError> + Send + Sync;

/// Behavior bound to an event attribute.
///
/// Cloning is cheap and yields a handle to the same function.
#[derive(Clone)]
pub struct Callback {
    inner: Arc<CallbackFn>,
}

impl Callback {
    pub fn new(f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(move |event| {
                f(event);
                Ok(())
            }),
        }
    }

    /// Callback whose failure is propagated out of `recv`.
    pub fn fallible<E>(f: impl Fn(&Event) -> Result<(), E> + Send + Sync + 'static) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: Arc::new(move |event| f(event).map_err(Into::into)),
        }
    }

    pub fn call(&self, event: &Event) -> Result<(), BoxError> {
        (self.inner)(event)
    }

    /// Whether both handles point at the same function.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.inner))
    }
}

/// Attribute value: display data, or an event binding.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Plain(Datum),
    Event(Callback),
}

impl AttrValue {
    pub fn as_datum(&self) -> Option<&Datum> {
        match self {
            AttrValue::Plain(datum) => Some(datum),
            AttrValue::Event(_) => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            AttrValue::Event(callback) => Some(callback),
            AttrValue::Plain(_) => None,
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, AttrValue::Event(_))
    }
}

impl From<Callback> for AttrValue {
    fn from(callback: Callback) -> Self {
        AttrValue::Event(callback)
    }
}

impl From<Datum> for AttrValue {
    fn from(datum: Datum) -> Self {
        AttrValue::Plain(datum)
    }
}

macro_rules! plain_attr_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::Plain(Datum::from(value))
                }
            }
        )*
    };
}

plain_attr_from!(&str, &String, String, bool, i32, i64, f64);

/// Attribute list accepted by the element constructors.
pub type Attributes = Vec<(String, AttrValue)>;

/// Build an `Attributes` list with mixed plain and callback values.
///
/// ```ignore
/// let attrs = attrs! { "type" => "text", "onChange" => on_change };
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::node::Attributes::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        vec![$((::std::string::String::from($name), $crate::node::AttrValue::from($value))),+]
    };
}

/// A child entry: nested node or literal text.
#[derive(Debug, Clone)]
pub enum Child {
    Node(Node),
    Text(Scalar),
}

impl Child {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Text(_) => None,
        }
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Scalar> for Child {
    fn from(scalar: Scalar) -> Self {
        Child::Text(scalar)
    }
}

macro_rules! text_child_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Child::Text(Scalar::from(value))
                }
            }
        )*
    };
}

text_child_from!(&str, String, i32, i64, f64);

/// Anything `Node::append` accepts.
///
/// Single items become one child; collections are flattened one level.
pub trait Append {
    fn append_to(self, children: &mut Vec<Child>);
}

macro_rules! append_single {
    ($($ty:ty),*) => {
        $(
            impl Append for $ty {
                fn append_to(self, children: &mut Vec<Child>) {
                    children.push(Child::from(self));
                }
            }
        )*
    };
}

append_single!(Node, Child, Scalar, &str, String, i32, i64, f64);

impl<T: Into<Child>> Append for Vec<T> {
    fn append_to(self, children: &mut Vec<Child>) {
        children.extend(self.into_iter().map(Into::into));
    }
}

impl<T: Into<Child>, const N: usize> Append for [T; N] {
    fn append_to(self, children: &mut Vec<Child>) {
        children.extend(self.into_iter().map(Into::into));
    }
}

/// One UI element: tag, attributes and ordered children.
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    attributes: BTreeMap<String, AttrValue>,
    children: Vec<Child>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttrValue> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Merge attributes, overwriting existing names.
    pub fn set_attributes<K, V>(&mut self, attributes: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        for (name, value) in attributes {
            self.attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Owned form of `set_attributes` for builder chains.
    pub fn attrs<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.set_attributes(attributes);
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn append(&mut self, item: impl Append) -> &mut Self {
        item.append_to(&mut self.children);
        self
    }

    pub fn extend<T: Into<Child>>(&mut self, items: impl IntoIterator<Item = T>) -> &mut Self {
        self.children.extend(items.into_iter().map(Into::into));
        self
    }

    /// Owned form of `append` for builder chains.
    pub fn child(mut self, item: impl Append) -> Self {
        self.append(item);
        self
    }

    /// Number of event-bound attributes in this subtree.
    pub fn event_count(&self) -> usize {
        let own = self.attributes.values().filter(|v| v.is_event()).count();
        own + self
            .children
            .iter()
            .filter_map(Child::as_node)
            .map(Node::event_count)
            .sum::<usize>()
    }
}
