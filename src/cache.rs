//! Keyed result cache shared by every node controller.
//!
//! Each generator/translator/synthesizer node maps a *parameter key*
//! (duration class, language code, or voice style) to a computed result.
//! The cache enforces the crate-wide guarantee of **at most one computed
//! result per distinct key per node instance**: once a key holds a record,
//! later writes for the same key are ignored, and selecting a cached key
//! never triggers a new provider call.
//!
//! Pending and failed computations are deliberately *not* cache states.
//! They live on the owning node as a [`StagePhase`](crate::node::StagePhase),
//! so a session persisted mid-computation never resurrects a stale
//! "pending" entry on reload.
//!
//! # Examples
//!
//! ```rust
//! use launchloom::cache::KeyedCache;
//! use launchloom::types::Language;
//!
//! let mut cache: KeyedCache<Language, String> = KeyedCache::default();
//! assert!(cache.is_empty());
//!
//! cache.fill(Language::Fr, "Bonjour".to_string());
//! // First write wins; the second fill is a no-op.
//! cache.fill(Language::Fr, "Salut".to_string());
//!
//! assert_eq!(cache.get(&Language::Fr).map(String::as_str), Some("Bonjour"));
//! assert_eq!(cache.len(), 1);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Map from parameter key to the result computed for that key.
///
/// Serializes as a plain JSON object so cached variants survive session
/// persistence together with the rest of the node payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyedCache<K: Eq + Hash, V> {
    entries: FxHashMap<K, V>,
}

impl<K: Eq + Hash, V> Default for KeyedCache<K, V> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash, V> KeyedCache<K, V> {
    /// Returns the cached result for `key`, if one was ever computed.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns true if `key` already holds a computed result.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key` unless the key is already filled.
    ///
    /// The first completed computation for a key is authoritative; a late
    /// duplicate completion is dropped so a previously displayed result can
    /// never change underneath the user. Returns a reference to the stored
    /// record either way.
    pub fn fill(&mut self, key: K, value: V) -> &V {
        self.entries.entry(key).or_insert(value)
    }

    /// Number of keys with a computed result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys already computed, for "already computed"
    /// indicators in a presentation layer.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}
