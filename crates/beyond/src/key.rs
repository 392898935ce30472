//! Event key allocation.
//!
//! Keys are random ULIDs rendered in lowercase. A key is checked against the
//! registry being built; a collision is treated as keyspace exhaustion after
//! the configured number of attempts instead of looping forever.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use ulid::Ulid;

/// Source of candidate keys.
pub trait KeySource: Send {
    fn next_key(&mut self) -> String;
}

/// Random keys from `Ulid::new()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidSource;

impl KeySource for UlidSource {
    fn next_key(&mut self) -> String {
        Ulid::new().to_string().to_ascii_lowercase()
    }
}

/// A fresh random identifier, as used for synthesized element identities.
pub fn fresh_id() -> String {
    UlidSource.next_key()
}

/// Anything a candidate key can be checked against.
pub trait KeySet {
    fn contains_key(&self, key: &str) -> bool;
}

impl<V> KeySet for HashMap<String, V> {
    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }
}

impl<V> KeySet for BTreeMap<String, V> {
    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }
}

impl KeySet for HashSet<String> {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

/// No fresh key could be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyspaceExhausted {
    pub attempts: u32,
    /// The last colliding candidate
    pub collided: String,
}

impl fmt::Display for KeyspaceExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "keyspace exhausted: {} attempt(s), last candidate `{}` already registered",
            self.attempts, self.collided
        )
    }
}

impl std::error::Error for KeyspaceExhausted {}

pub struct KeyAllocator {
    source: Box<dyn KeySource>,
    attempts: u32,
}

impl KeyAllocator {
    /// Single attempt per key.
    pub const DEFAULT_ATTEMPTS: u32 = 1;

    pub fn new() -> Self {
        Self::with_source(UlidSource)
    }

    pub fn with_source(source: impl KeySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            attempts: Self::DEFAULT_ATTEMPTS,
        }
    }

    /// Allow up to `attempts` candidates per key (at least one).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn allocate(&mut self, existing: &impl KeySet) -> Result<String, KeyspaceExhausted> {
        let mut collided = String::new();
        for attempt in 1..=self.attempts {
            let candidate = self.source.next_key();
            if !existing.contains_key(&candidate) {
                log::trace!("allocated key {candidate} (attempt {attempt})");
                return Ok(candidate);
            }
            log::trace!("key {candidate} collided (attempt {attempt})");
            collided = candidate;
        }
        Err(KeyspaceExhausted {
            attempts: self.attempts,
            collided,
        })
    }
}

impl Default for KeyAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAllocator")
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed list of candidates, repeating the last one.
    pub(crate) struct ScriptedSource {
        keys: Vec<String>,
        next: usize,
    }

    impl ScriptedSource {
        pub(crate) fn new(keys: &[&str]) -> Self {
            Self {
                keys: keys.iter().map(|k| k.to_string()).collect(),
                next: 0,
            }
        }
    }

    impl KeySource for ScriptedSource {
        fn next_key(&mut self) -> String {
            let index = self.next.min(self.keys.len() - 1);
            self.next += 1;
            self.keys[index].clone()
        }
    }

    #[test]
    fn ulid_keys_are_lowercase_and_distinct() {
        let mut source = UlidSource;
        let a = source.next_key();
        let b = source.next_key();
        assert_eq!(a.len(), 26);
        assert_eq!(a, a.to_ascii_lowercase());
        assert_ne!(a, b);
    }

    #[test]
    fn allocate_returns_unused_key() {
        let mut allocator = KeyAllocator::new();
        let existing: HashSet<String> = HashSet::new();
        let key = allocator.allocate(&existing).unwrap();
        assert!(!key.is_empty());
    }

    #[test]
    fn collision_fails_without_retry() {
        let mut allocator = KeyAllocator::with_source(ScriptedSource::new(&["taken", "free"]));
        let existing: HashSet<String> = ["taken".to_string()].into_iter().collect();
        let err = allocator.allocate(&existing).unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(err.collided, "taken");
    }

    #[test]
    fn bounded_retry_recovers_from_collision() {
        let mut allocator =
            KeyAllocator::with_source(ScriptedSource::new(&["taken", "free"])).with_attempts(2);
        let existing: HashSet<String> = ["taken".to_string()].into_iter().collect();
        assert_eq!(allocator.allocate(&existing).unwrap(), "free");
    }

    #[test]
    fn bounded_retry_still_exhausts() {
        let mut allocator =
            KeyAllocator::with_source(ScriptedSource::new(&["taken"])).with_attempts(3);
        let existing: BTreeMap<String, ()> = [("taken".to_string(), ())].into_iter().collect();
        let err = allocator.allocate(&existing).unwrap_err();
        assert_eq!(err.attempts, 3);
    }

    #[test]
    fn zero_attempts_is_clamped() {
        assert_eq!(KeyAllocator::new().with_attempts(0).attempts(), 1);
    }
}
