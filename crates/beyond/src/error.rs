use std::fmt;

use crate::key::KeyspaceExhausted;
use crate::node::BoxError;

/// Failure of a `send` or `recv`.
#[derive(Debug)]
pub enum DispatchError {
    /// Serialization could not allocate a fresh event key.
    KeyspaceExhausted(KeyspaceExhausted),
    /// The key is not in the current registry (stale render or forged event).
    UnknownEventKey { key: String },
    /// The callback bound to `key` failed. Nothing was re-rendered.
    Callback { key: String, source: BoxError },
    /// A thread panicked while holding the shared dispatcher.
    Poisoned,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::KeyspaceExhausted(inner) => write!(f, "{inner}"),
            DispatchError::UnknownEventKey { key } => write!(f, "unknown event key `{key}`"),
            DispatchError::Callback { key, source } => {
                write!(f, "callback for event key `{key}` failed: {source}")
            }
            DispatchError::Poisoned => write!(f, "dispatcher lock poisoned"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::KeyspaceExhausted(inner) => Some(inner),
            DispatchError::Callback { source, .. } => Some(source.as_ref()),
            DispatchError::UnknownEventKey { .. } | DispatchError::Poisoned => None,
        }
    }
}

impl From<KeyspaceExhausted> for DispatchError {
    fn from(inner: KeyspaceExhausted) -> Self {
        DispatchError::KeyspaceExhausted(inner)
    }
}
