//! Runtime-overridable name tables for small integer enumerations

use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Names {
    by_value: HashMap<i64, String>,
    by_name: HashMap<String, i64>,
}

impl Names {
    fn invert(&mut self) {
        self.by_name = self
            .by_value
            .iter()
            .map(|(value, name)| (name.clone(), *value))
            .collect();
    }
}

/// Bidirectional value/name mapping shared by `Level` and `OutputFormat`.
///
/// Reads vastly outnumber writes, so the table sits behind a read-write lock
/// and the inverse map is rebuilt on every change.
#[derive(Debug)]
pub(crate) struct NameTable {
    names: RwLock<Names>,
}

impl NameTable {
    pub(crate) fn new(entries: &[(i64, &str)]) -> Self {
        let mut names = Names {
            by_value: entries
                .iter()
                .map(|(value, name)| (*value, (*name).to_string()))
                .collect(),
            by_name: HashMap::new(),
        };
        names.invert();

        Self {
            names: RwLock::new(names),
        }
    }

    /// Name `value`. A name belongs to one value at a time, so any other
    /// value registered under `name` loses it.
    pub(crate) fn set(&self, value: i64, name: &str) {
        let mut names = self.names.write();
        names.by_value.retain(|other, existing| *other == value || existing != name);
        names.by_value.insert(value, name.to_string());
        names.invert();
    }

    /// Run `f` with the registered name for `value`, if any.
    pub(crate) fn with_name<R>(&self, value: i64, f: impl FnOnce(Option<&str>) -> R) -> R {
        let names = self.names.read();
        f(names.by_value.get(&value).map(String::as_str))
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<i64> {
        self.names.read().by_name.get(name).copied()
    }
}
