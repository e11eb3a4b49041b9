//! Attributes and the sorted attribute container

use super::pool::{attrs_pool, AttrsPool};
use super::value::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::mem::{self, ManuallyDrop};
use std::sync::Arc;
use std::time::Duration;

/// Key of the attribute carrying an error passed to `Logger::error`
pub const ERROR_KEY: &str = "error";

/// Default key of the captured call-site attribute
pub const CALLER_KEY: &str = "caller";

/// One key/value field.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr<'a> {
    pub key: Cow<'a, str>,
    pub value: Value<'a>,
}

impl<'a> Attr<'a> {
    pub fn new(key: impl Into<Cow<'a, str>>, value: impl Into<Value<'a>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Self::new(key, Value::string(value))
    }

    pub fn int64(key: impl Into<Cow<'a, str>>, value: i64) -> Self {
        Self::new(key, Value::int64(value))
    }

    pub fn int(key: impl Into<Cow<'a, str>>, value: isize) -> Self {
        Self::new(key, Value::int64(value as i64))
    }

    pub fn uint64(key: impl Into<Cow<'a, str>>, value: u64) -> Self {
        Self::new(key, Value::uint64(value))
    }

    pub fn float64(key: impl Into<Cow<'a, str>>, value: f64) -> Self {
        Self::new(key, Value::float64(value))
    }

    pub fn bool(key: impl Into<Cow<'a, str>>, value: bool) -> Self {
        Self::new(key, Value::bool(value))
    }

    pub fn time(key: impl Into<Cow<'a, str>>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::time(value))
    }

    pub fn duration(key: impl Into<Cow<'a, str>>, value: Duration) -> Self {
        Self::new(key, Value::duration(value))
    }

    pub fn any<T>(key: impl Into<Cow<'a, str>>, value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(key, Value::any(value))
    }

    /// The `error` attribute holding the error's display text.
    pub fn err(err: &dyn std::error::Error) -> Self {
        Self::string(ERROR_KEY, err.to_string())
    }

    pub fn into_owned(self) -> Attr<'static> {
        Attr {
            key: Cow::Owned(self.key.into_owned()),
            value: self.value.into_owned(),
        }
    }
}

/// Attributes kept sorted by key, one entry per key.
///
/// Storage comes from an [`AttrsPool`] and goes back to it when the
/// container is disposed or dropped.
///
/// # Example
///
/// ```
/// use rust_structlog::core::{Attr, Attrs};
///
/// let mut attrs = Attrs::default();
/// attrs.append([Attr::int("b", 2), Attr::int("a", 1), Attr::int("b", 3)]);
///
/// let keys: Vec<_> = attrs.iter().map(|a| a.key.as_ref()).collect();
/// assert_eq!(keys, ["a", "b"]);
/// assert_eq!(attrs.search("b").map(|a| a.value.as_int64()), Some(3));
/// ```
pub struct Attrs<'a> {
    items: Vec<Attr<'a>>,
    pool: Arc<AttrsPool>,
}

impl<'a> Attrs<'a> {
    pub fn new_in(pool: &Arc<AttrsPool>) -> Self {
        let items: Vec<Attr<'static>> = pool.get();
        Self {
            items,
            pool: Arc::clone(pool),
        }
    }

    /// Insert every attribute, overwriting entries whose key already exists.
    pub fn append<I>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        for attr in attrs {
            self.push(attr);
        }
    }

    pub fn push(&mut self, attr: Attr<'a>) {
        match self.position(&attr.key) {
            Ok(i) => self.items[i] = attr,
            Err(i) => self.items.insert(i, attr),
        }
    }

    pub fn search(&self, key: &str) -> Option<&Attr<'a>> {
        self.position(key).ok().map(|i| &self.items[i])
    }

    /// Visit attributes in key order until `f` returns `true`.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&Attr<'a>) -> bool,
    {
        for attr in &self.items {
            if f(attr) {
                break;
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attr<'a>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy into a container that owns all of its text.
    pub fn to_owned_attrs(&self) -> Attrs<'static> {
        let mut owned = Attrs::new_in(&self.pool);
        owned
            .items
            .extend(self.items.iter().cloned().map(Attr::into_owned));
        owned
    }

    /// Return the storage to the pool.
    pub fn dispose(self) {
        drop(self);
    }

    fn position(&self, key: &str) -> Result<usize, usize> {
        self.items.binary_search_by(|attr| attr.key.as_ref().cmp(key))
    }
}

impl Default for Attrs<'_> {
    /// A container with a private pool, for use outside a logger.
    fn default() -> Self {
        Attrs::new_in(&Arc::new(attrs_pool()))
    }
}

impl Clone for Attrs<'_> {
    fn clone(&self) -> Self {
        let mut cloned = Attrs::new_in(&self.pool);
        cloned.items.extend(self.items.iter().cloned());
        cloned
    }
}

impl Drop for Attrs<'_> {
    fn drop(&mut self) {
        let mut items = mem::take(&mut self.items);
        items.clear();

        let mut items = ManuallyDrop::new(items);
        let (ptr, capacity) = (items.as_mut_ptr(), items.capacity());
        // SAFETY: `ptr` and `capacity` come from a live Vec<Attr<'a>> that is
        // never dropped, and its length is 0, so no Attr<'a> outlives 'a.
        // Attr<'a> and Attr<'static> differ only in lifetime, so size and
        // alignment of the allocation match.
        let storage = unsafe { Vec::from_raw_parts(ptr.cast::<Attr<'static>>(), 0, capacity) };
        self.pool.put(storage);
    }
}

impl fmt::Debug for Attrs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl PartialEq for Attrs<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'s, 'a> IntoIterator for &'s Attrs<'a> {
    type Item = &'s Attr<'a>;
    type IntoIter = std::slice::Iter<'s, Attr<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Extend<Attr<'a>> for Attrs<'a> {
    fn extend<I: IntoIterator<Item = Attr<'a>>>(&mut self, iter: I) {
        self.append(iter);
    }
}
