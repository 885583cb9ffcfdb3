//! The outbound header table.
//!
//! Names are compared as exact strings: `accept:` does not touch a default
//! `Accept`. One value per name; assigning again replaces the old value in
//! place, and assigning an empty value removes the entry.

/// Sent as `User-Agent` unless an item overrides it.
pub const CLIENT_NAME: &str = "Gurl";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    entries: Vec<(String, String)>,
}

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table every request starts from.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.set("User-Agent", CLIENT_NAME);
        table.set("Accept", "*/*");
        table
    }

    /// Replace the value of `name`, or append it if absent.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove `name` if present. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    /// Apply one `Name:Value` item: set on a non-empty value, delete on an
    /// empty one.
    pub fn apply(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.remove(name);
        } else {
            self.set(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive presence check, for wire-level decisions such as
    /// whether the caller already supplied `Host`.
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
