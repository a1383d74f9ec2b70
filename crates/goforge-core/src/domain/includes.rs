//! Broadcast flag set telling templates which libraries were selected.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::manifest::Manifest;

/// Library name to "was it selected" flag.
///
/// The key set is closed: it is exactly the manifest's libraries, so a
/// template testing `includes.<lib>` for any known library always sees a
/// concrete boolean. Names outside the manifest are never inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Includes(BTreeMap<String, bool>);

impl Includes {
    /// Build flags for a validated selection.
    pub fn derive(manifest: &Manifest, selected: &[String]) -> Self {
        Self(
            manifest
                .libs
                .keys()
                .map(|name| (name.clone(), selected.contains(name)))
                .collect(),
        )
    }

    pub fn is_selected(&self, lib: &str) -> bool {
        self.0.get(lib).copied().unwrap_or(false)
    }

    /// Whether `key` belongs to the recognized set.
    pub fn recognizes(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Selected library names in key order.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
    }
}
