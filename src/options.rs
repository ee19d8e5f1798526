use std::collections::BTreeMap;

/// Backend-specific connection settings, as string key/value pairs.
///
/// Keys follow the libdbi driver conventions; for `SQLite` these are `dbname`,
/// `sqlite3_dbdir` and `sqlite3_timeout`.
/// ```rust
/// use sql_dbi::prelude::*;
///
/// let opts = ConnectOptions::new()
///     .with("dbname", "test.sqlite3")
///     .with("sqlite3_dbdir", ".");
/// assert_eq!(opts.get("dbname"), Some("test.sqlite3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    values: BTreeMap<String, String>,
}

impl ConnectOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ConnectOptions::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key`, replacing any earlier value.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for ConnectOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut opts = ConnectOptions::new();
        for (k, v) in iter {
            opts.set(k, v);
        }
        opts
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for ConnectOptions {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
