//! Ordered lists of resources as returned by the API.

use std::ops::{Deref, DerefMut};

use serde_json::Value as JsonValue;

/// Access to a resource's fields by name, for [Collection::find].
pub trait Fields {
    /// Returns the value of the field `key`, or `None` if the resource has no such field.
    fn field(&self, key: &str) -> Option<JsonValue>;
}

/// Resources in the order the server returned them.
///
/// Membership belongs to the caller: destroying a resource marks it as
/// deleted but leaves it in the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Returns the first element matching `predicate`.
    pub fn find_by<P: FnMut(&T) -> bool>(&self, mut predicate: P) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    /// Returns the first element matching `predicate`, mutably.
    pub fn find_by_mut<P: FnMut(&T) -> bool>(&mut self, mut predicate: P) -> Option<&mut T> {
        self.items.iter_mut().find(|item| predicate(item))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Fields> Collection<T> {
    /// Returns the first element whose field `key` equals `value`.
    ///
    /// Comparison is strict: numbers only match numbers and strings only
    /// match strings, so `find("id", 42)` never matches an id of `"42"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dnsimple_api::{Collection, Fields};
    /// use serde_json::{Value, json};
    ///
    /// struct Zone(i64);
    ///
    /// impl Fields for Zone {
    ///     fn field(&self, key: &str) -> Option<Value> {
    ///         (key == "id").then(|| json!(self.0))
    ///     }
    /// }
    ///
    /// let zones = Collection::new(vec![Zone(7), Zone(42)]);
    /// assert_eq!(zones.find("id", 42).map(|z| z.0), Some(42));
    /// assert!(zones.find("id", "42").is_none());
    /// ```
    pub fn find<V: Into<JsonValue>>(&self, key: &str, value: V) -> Option<&T> {
        let value = value.into();
        self.find_by(|item| item.field(key).as_ref() == Some(&value))
    }

    /// Like [Collection::find], but returns a mutable reference.
    pub fn find_mut<V: Into<JsonValue>>(&mut self, key: &str, value: V) -> Option<&mut T> {
        let value = value.into();
        self.find_by_mut(|item| item.field(key).as_ref() == Some(&value))
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(value: Vec<T>) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for Collection<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for Collection<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Collection<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}
