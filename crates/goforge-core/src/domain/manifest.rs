//! Manifest model: the catalog of selectable frameworks and libraries.
//!
//! The manifest is parsed and structurally validated here without touching
//! the filesystem. Resource existence checks happen in
//! [`crate::application::ManifestStore`], which owns the load path.

use std::{collections::BTreeMap, fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{error::DomainError, layout};

/// Oldest manifest format this engine understands.
pub const MIN_MANIFEST_VERSION: &str = "1.0.0";

/// Definition names become path segments in the generated tree.
static DEFINITION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("definition name regex is valid")
});

/// Versioned catalog of frameworks and libraries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(default)]
    pub libs: BTreeMap<String, LibDef>,
    #[serde(default)]
    pub frameworks: BTreeMap<String, FrameworkDef>,
}

/// A web framework the generated project is built around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkDef {
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub config_section: Option<String>,
    #[serde(default)]
    pub templates: Vec<String>,
    #[serde(flatten)]
    pub display: DisplayMeta,
}

/// An optional library adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibDef {
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub config_section: Option<String>,
    #[serde(default)]
    pub templates: Vec<String>,
    #[serde(
        default,
        deserialize_with = "category_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<LibCategory>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_radio: bool,
    #[serde(flatten)]
    pub display: DisplayMeta,
}

impl LibDef {
    /// Category used for grouping; uncategorized libraries count as `other`.
    pub fn category(&self) -> LibCategory {
        self.category.unwrap_or(LibCategory::Other)
    }
}

/// Presentation-only fields; ignored by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Library categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibCategory {
    Database,
    Caching,
    Messaging,
    Utilities,
    Observability,
    Other,
}

impl LibCategory {
    pub const ALL: [LibCategory; 6] = [
        Self::Database,
        Self::Caching,
        Self::Messaging,
        Self::Utilities,
        Self::Observability,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Caching => "caching",
            Self::Messaging => "messaging",
            Self::Utilities => "utilities",
            Self::Observability => "observability",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LibCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = Self::ALL.iter().map(|c| c.as_str()).collect();
                format!("invalid category: {}. Valid categories: {}", s, valid.join(", "))
            })
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn category_or_none<'de, D>(deserializer: D) -> Result<Option<LibCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_as_none(deserializer)? {
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl Manifest {
    /// Parse a manifest document. Structure is not validated yet.
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw).map_err(|e| DomainError::InvalidManifest {
            reason: e.to_string(),
        })
    }

    /// Structural validation: version, counts and path conventions.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.check_version()?;

        if self.frameworks.is_empty() {
            return Err(DomainError::InvalidManifest {
                reason: "manifest must contain at least one framework".into(),
            });
        }

        for (name, def) in &self.frameworks {
            check_definition("framework", name, &def.templates, &def.imports, &def.config_section)?;
        }
        for (name, def) in &self.libs {
            check_definition("library", name, &def.templates, &def.imports, &def.config_section)?;
        }

        Ok(())
    }

    fn check_version(&self) -> Result<(), DomainError> {
        if self.version.trim().is_empty() {
            return Err(DomainError::InvalidManifest {
                reason: "manifest version is required".into(),
            });
        }

        let found = semver::Version::parse(self.version.trim()).map_err(|e| {
            DomainError::InvalidManifest {
                reason: format!("version '{}' is not a semantic version: {}", self.version, e),
            }
        })?;
        let minimum = semver::Version::new(1, 0, 0);

        if found < minimum {
            return Err(DomainError::UnsupportedManifestVersion {
                found: self.version.clone(),
                minimum: MIN_MANIFEST_VERSION.into(),
            });
        }
        Ok(())
    }

    /// Look up a framework by name.
    pub fn framework(&self, name: &str) -> Result<&FrameworkDef, DomainError> {
        self.frameworks
            .get(name)
            .ok_or_else(|| DomainError::UnknownFramework { name: name.into() })
    }

    /// Look up a library by name.
    pub fn lib(&self, name: &str) -> Result<&LibDef, DomainError> {
        self.libs
            .get(name)
            .ok_or_else(|| DomainError::UnknownLibrary { name: name.into() })
    }

    /// Reject selections holding two radio libraries of one category.
    pub fn check_exclusive(&self, libs: &[String]) -> Result<(), DomainError> {
        let mut taken: BTreeMap<LibCategory, &str> = BTreeMap::new();

        for name in libs {
            let def = self.lib(name)?;
            if !def.is_radio {
                continue;
            }
            if let Some(first) = taken.insert(def.category(), name) {
                return Err(DomainError::ExclusiveSelection {
                    category: def.category().to_string(),
                    first: first.into(),
                    second: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Every template path referenced by a definition, deduplicated.
    pub fn declared_templates(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .frameworks
            .values()
            .flat_map(|f| f.templates.iter())
            .chain(self.libs.values().flat_map(|l| l.templates.iter()))
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }

    /// Every config fragment path referenced by a definition, deduplicated.
    pub fn declared_fragments(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .frameworks
            .values()
            .filter_map(|f| f.config_section.as_deref())
            .chain(self.libs.values().filter_map(|l| l.config_section.as_deref()))
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}

fn check_definition(
    kind: &str,
    name: &str,
    templates: &[String],
    imports: &[String],
    config_section: &Option<String>,
) -> Result<(), DomainError> {
    let invalid = |reason: String| DomainError::InvalidDefinition {
        owner: format!("{} '{}'", kind, name),
        reason,
    };

    if name.trim().is_empty() {
        return Err(DomainError::InvalidManifest {
            reason: format!("{} name cannot be empty", kind),
        });
    }
    if !DEFINITION_NAME_RE.is_match(name) {
        return Err(invalid(
            "name must be lowercase letters, digits, '-' or '_' and start with a letter or digit"
                .to_owned(),
        ));
    }
    if templates.is_empty() {
        return Err(invalid(format!("{} must have at least one template", kind)));
    }
    for path in templates {
        layout::check_template_path(path).map_err(&invalid)?;
    }
    if let Some(section) = config_section {
        layout::check_fragment_path(section).map_err(&invalid)?;
    }
    if imports.is_empty() {
        return Err(invalid(format!("{} must have at least one import", kind)));
    }
    Ok(())
}
