//! Document-root attribute boundary towards the styling system.
//!
//! # Responsibility
//! - Abstract the `<html>` element attributes the theme store writes.
//! - Provide an in-memory attribute map for native hosts and tests.
//!
//! # Invariants
//! - `set_attribute` is infallible from the caller's point of view and
//!   replaces any previous value.

use std::collections::BTreeMap;

/// Attribute carrying the active world (`classical|gaming`).
pub const ATTR_AESTHETIC: &str = "data-aesthetic";
/// Attribute carrying the color scheme (`light|dark`).
pub const ATTR_THEME: &str = "data-theme";

/// Document root element the theme is reflected onto.
pub trait DocumentRoot {
    fn set_attribute(&mut self, name: &str, value: &str);
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl<D: DocumentRoot + ?Sized> DocumentRoot for &mut D {
    fn set_attribute(&mut self, name: &str, value: &str) {
        (**self).set_attribute(name, value);
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        (**self).attribute(name)
    }
}

/// In-memory document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    attributes: BTreeMap<String, String>,
    writes: u64,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `set_attribute` calls observed.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl DocumentRoot for AttributeMap {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.writes += 1;
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
