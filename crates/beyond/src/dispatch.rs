//! The send/recv cycle.
//!
//! `send` renders the application, serializes the tree and installs the
//! resulting registry. `recv` resolves an event key against that registry,
//! runs the callback and sends again. Only keys from the latest render are
//! ever honored.

use std::sync::{Arc, Mutex, MutexGuard};

use beyond_protocol::{Data, Event};

use crate::error::DispatchError;
use crate::key::KeyAllocator;
use crate::node::Node;
use crate::registry::{CallbackRegistry, RegistryStore};
use crate::serialize::serialize_with;

/// Builds a fresh tree from current application state.
pub trait Renderer {
    fn render(&mut self) -> Node;
}

impl<F> Renderer for F
where
    F: FnMut() -> Node,
{
    fn render(&mut self) -> Node {
        self()
    }
}

pub struct Dispatcher<R> {
    renderer: R,
    keys: KeyAllocator,
    store: RegistryStore,
}

impl<R: Renderer> Dispatcher<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_keys(renderer, KeyAllocator::new())
    }

    pub fn with_keys(renderer: R, keys: KeyAllocator) -> Self {
        Self {
            renderer,
            keys,
            store: RegistryStore::new(),
        }
    }

    /// Render, serialize and install the new registry.
    ///
    /// On failure the previous registry stays installed.
    pub fn send(&mut self) -> Result<Data, DispatchError> {
        let root = self.renderer.render();
        let (data, registry) = serialize_with(&root, &mut self.keys)?;
        let size = registry.len();
        let epoch = self.store.install(registry);
        log::debug!("render epoch {epoch}: <{}> with {size} event key(s)", root.tag());
        Ok(data)
    }

    /// Run the callback bound to `event.key`, then send.
    pub fn recv(&mut self, event: &Event) -> Result<Data, DispatchError> {
        let callback = self.store.resolve(&event.key).inspect_err(|_| {
            log::warn!(
                "event key {} is not in render epoch {}",
                event.key,
                self.store.epoch()
            );
        })?;
        log::debug!("dispatching event key {} (epoch {})", event.key, self.store.epoch());
        callback
            .call(event)
            .map_err(|source| DispatchError::Callback {
                key: event.key.clone(),
                source,
            })?;
        self.send()
    }

    /// Number of completed renders.
    pub fn epoch(&self) -> u64 {
        self.store.epoch()
    }

    pub fn registry(&self) -> &CallbackRegistry {
        self.store.current()
    }
}

/// A dispatcher shared between threads.
///
/// Each `send`/`recv` holds the lock for its whole duration, so registry
/// replacement and lookup-invoke-render never interleave.
pub struct SharedDispatcher<R> {
    inner: Arc<Mutex<Dispatcher<R>>>,
}

impl<R> Clone for SharedDispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Renderer> SharedDispatcher<R> {
    pub fn new(dispatcher: Dispatcher<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dispatcher)),
        }
    }

    pub fn send(&self) -> Result<Data, DispatchError> {
        self.lock()?.send()
    }

    pub fn recv(&self, event: &Event) -> Result<Data, DispatchError> {
        self.lock()?.recv(event)
    }

    pub fn epoch(&self) -> Result<u64, DispatchError> {
        Ok(self.lock()?.epoch())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dispatcher<R>>, DispatchError> {
        self.inner.lock().map_err(|_| DispatchError::Poisoned)
    }
}
