//! Generation request.

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, manifest::Manifest, validation::DomainValidator};

/// Architecture label used when the caller does not pick one.
pub const DEFAULT_ARCHITECTURE: &str = "clean";

/// What the caller wants generated.
///
/// Field names follow the JSON request body (`projectName`, `moduleName`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub project_name: String,
    pub module_name: String,
    pub framework: String,
    #[serde(default = "default_architecture")]
    pub architecture: String,
    #[serde(default)]
    pub libs: Vec<String>,
    #[serde(default)]
    pub include_example: bool,
}

fn default_architecture() -> String {
    DEFAULT_ARCHITECTURE.into()
}

impl GenerateRequest {
    pub fn new(
        project_name: impl Into<String>,
        module_name: impl Into<String>,
        framework: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            module_name: module_name.into(),
            framework: framework.into(),
            architecture: default_architecture(),
            libs: Vec::new(),
            include_example: false,
        }
    }

    pub fn with_lib(mut self, lib: impl Into<String>) -> Self {
        self.libs.push(lib.into());
        self
    }

    pub fn with_libs<I, S>(mut self, libs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.libs.extend(libs.into_iter().map(Into::into));
        self
    }

    pub fn with_example(mut self, include_example: bool) -> Self {
        self.include_example = include_example;
        self
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    /// Selected libraries in request order, first occurrence wins.
    pub fn selected_libs(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.libs
            .iter()
            .filter(|lib| seen.insert(lib.as_str()))
            .cloned()
            .collect()
    }

    /// Field rules, then manifest membership, then radio-group exclusivity.
    pub fn validate(&self, manifest: &Manifest) -> Result<(), DomainError> {
        DomainValidator::validate_project_name(&self.project_name)?;
        DomainValidator::validate_module_name(&self.module_name)?;
        DomainValidator::validate_framework(&self.framework)?;

        manifest.framework(&self.framework)?;
        let libs = self.selected_libs();
        for lib in &libs {
            manifest.lib(lib)?;
        }
        manifest.check_exclusive(&libs)
    }

    /// Archive file name delivered to the caller.
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.project_name)
    }
}
