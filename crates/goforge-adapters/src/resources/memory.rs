//! In-memory resources for tests and embedding.

use std::collections::HashMap;

use goforge_core::{
    application::{ApplicationError, ports::ResourceLoader},
    error::GenResult,
};

/// Resource map keyed by asset-relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    files: HashMap<String, String>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceLoader for MemoryResources {
    fn read_to_string(&self, path: &str) -> GenResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::ResourceMissing { path: path.into() }.into())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
