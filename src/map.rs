//! Sorted map type for CON objects.
//!
//! [`ConMap`] wraps a [`BTreeMap`], so object keys are unique and always
//! iterate in sorted (byte-wise) order. Both the text printer and the binary
//! encoder walk objects in this order, which makes the output deterministic and
//! compatible with files written by earlier CON implementations.
//!
//! ## Examples
//!
//! ```rust
//! use confile::{ConMap, Value};
//!
//! let mut map = ConMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["age", "name"]);
//! ```

use crate::Value;
use std::collections::{btree_map, BTreeMap, HashMap};

/// A sorted map of string keys to CON values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConMap(BTreeMap<String, Value>);

impl ConMap {
    /// Creates an empty `ConMap`.
    #[must_use]
    pub fn new() -> Self {
        ConMap(BTreeMap::new())
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confile::{ConMap, Value};
    ///
    /// let mut map = ConMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert_eq!(map.insert("key".to_string(), Value::from(43)), Some(Value::from(42)));
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Removes a key from the map, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in key order.
    pub fn values(&self) -> btree_map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for ConMap {
    fn from(map: HashMap<String, Value>) -> Self {
        ConMap(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for ConMap {
    fn from(map: BTreeMap<String, Value>) -> Self {
        ConMap(map)
    }
}

impl From<ConMap> for BTreeMap<String, Value> {
    fn from(map: ConMap) -> Self {
        map.0
    }
}

impl IntoIterator for ConMap {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ConMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ConMap(BTreeMap::from_iter(iter))
    }
}

impl Extend<(String, Value)> for ConMap {
    fn extend<T: IntoIterator<Item = (String, Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
