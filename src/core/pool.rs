//! Object pools
//!
//! Pools are explicit objects handed to the components that need them.
//! Nothing here is process-global: a [`Pools`] bundle is created once and
//! shared through an `Arc`.

use super::attr::{Attr, Attrs};
use super::caller::Caller;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Initial capacity of pooled attribute storage
pub const ATTRS_CAPACITY: usize = 64;

/// Initial capacity of pooled byte buffers
pub const BUFFER_CAPACITY: usize = 1024;

/// Default bound on idle objects kept by a pool
pub const DEFAULT_MAX_IDLE: usize = 256;

/// Pool of attribute storage vectors
pub type AttrsPool = Pool<Vec<Attr<'static>>>;

/// Thread-safe free list.
///
/// `get` hands out an idle object or creates a new one; `put` runs the reset
/// hook and keeps the object unless `max_idle` objects are already waiting.
pub struct Pool<T> {
    free: Mutex<Vec<T>>,
    create: fn() -> T,
    reset: fn(&mut T),
    max_idle: usize,
}

impl<T> Pool<T> {
    pub fn new(create: fn() -> T, reset: fn(&mut T)) -> Self {
        Self::with_max_idle(create, reset, DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(create: fn() -> T, reset: fn(&mut T), max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            create,
            reset,
            max_idle,
        }
    }

    pub fn get(&self) -> T {
        let idle = self.free.lock().pop();
        idle.unwrap_or_else(self.create)
    }

    pub fn put(&self, mut item: T) {
        (self.reset)(&mut item);
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(item);
        }
    }

    /// Number of objects currently waiting in the pool
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl<T: Default> Pool<T> {
    /// Borrow an object that returns itself to the pool when dropped.
    pub fn acquire(&self) -> Pooled<'_, T> {
        Pooled {
            pool: self,
            item: self.get(),
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}

/// Exclusive handle to a pooled object.
///
/// Dropping the handle leaves an empty `T::default()` behind, which for the
/// pooled collections does not allocate.
pub struct Pooled<'p, T: Default> {
    pool: &'p Pool<T>,
    item: T,
}

impl<T: Default> Pooled<'_, T> {
    /// Return the object to its pool now.
    pub fn dispose(self) {
        drop(self);
    }
}

impl<T: Default> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Default> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Default> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.put(mem::take(&mut self.item));
    }
}

impl<T: Default + fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

pub(crate) fn attrs_pool() -> AttrsPool {
    Pool::new(|| Vec::with_capacity(ATTRS_CAPACITY), Vec::clear)
}

/// The pools used along one write pipeline.
///
/// # Example
///
/// ```
/// use rust_structlog::core::{Attr, Pools};
///
/// let pools = Pools::shared();
/// let mut attrs = pools.attrs();
/// attrs.push(Attr::int("status", 200));
/// attrs.dispose();
/// assert_eq!(pools.attrs_pool().idle(), 1);
/// ```
#[derive(Debug)]
pub struct Pools {
    attrs: Arc<AttrsPool>,
    buffers: Pool<Vec<u8>>,
    keys: Pool<HashSet<String>>,
    callers: Pool<Caller>,
}

impl Pools {
    pub fn new() -> Self {
        Self {
            attrs: Arc::new(attrs_pool()),
            buffers: Pool::new(|| Vec::with_capacity(BUFFER_CAPACITY), Vec::clear),
            keys: Pool::new(HashSet::new, HashSet::clear),
            callers: Pool::new(Caller::default, Caller::clear),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Fresh attribute container backed by pooled storage
    pub fn attrs<'a>(&self) -> Attrs<'a> {
        Attrs::new_in(&self.attrs)
    }

    pub fn attrs_pool(&self) -> &Arc<AttrsPool> {
        &self.attrs
    }

    /// Byte buffers for serialized records
    pub fn buffers(&self) -> &Pool<Vec<u8>> {
        &self.buffers
    }

    /// Key-tracking scratch for the JSON marshaler
    pub fn keys(&self) -> &Pool<HashSet<String>> {
        &self.keys
    }

    pub fn callers(&self) -> &Pool<Caller> {
        &self.callers
    }
}

impl Default for Pools {
    fn default() -> Self {
        Self::new()
    }
}
