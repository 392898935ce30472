//! Server-driven UI runtime.
//!
//! Application state and the UI tree live on the server. Each render turns
//! a live `Node` tree (whose attributes may hold callbacks) into plain
//! `Data` plus a registry mapping generated keys to those callbacks. Clients
//! echo a key back as an `Event`; the dispatcher runs the callback and
//! renders again, invalidating every key of the previous render.
//!
//! ```ignore
//! use beyond::{element, Callback, Dispatcher, Node};
//!
//! let mut dispatcher = Dispatcher::new(|| {
//!     element::div().attr("onClick", Callback::new(|_| {})).child("hi")
//! });
//! let tree = dispatcher.send()?;
//! ```

pub mod dispatch;
pub mod element;
pub mod error;
pub mod key;
pub mod node;
pub mod registry;
pub mod serialize;

pub use beyond_protocol as protocol;
pub use beyond_protocol::{Data, Datum, Element, Event, Response, Scalar};
pub use dispatch::{Dispatcher, Renderer, SharedDispatcher};
pub use error::DispatchError;
pub use key::{KeyAllocator, KeySource, KeyspaceExhausted, UlidSource};
pub use node::{AttrValue, Attributes, BoxError, Callback, Child, Node};
pub use registry::{CallbackRegistry, RegistryStore};
pub use serialize::{serialize, serialize_with};
