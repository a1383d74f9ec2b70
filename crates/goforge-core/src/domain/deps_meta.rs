//! Dependency-injection metadata for the generated `internal/deps` package.
//!
//! Two optional documents drive it: `deps_meta.json` describes how each
//! library is constructed and closed, `config_meta.json` names the config
//! struct field each library reads. Both are keyed by library name.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, includes::Includes, layout, manifest::Manifest};

/// How one library is wired into the deps container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepEntry {
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub struct_field: String,
    #[serde(default)]
    pub init_lines: Vec<String>,
    #[serde(default)]
    pub close_lines: Vec<String>,
    #[serde(default)]
    pub helper_files: Vec<String>,
}

/// Config accessor metadata for one library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub config_field: String,
}

/// Both metadata documents; empty when the files are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepsMetadata {
    pub deps: BTreeMap<String, DepEntry>,
    pub config: BTreeMap<String, ConfigEntry>,
}

/// Rendered view of one selected deps entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepBinding {
    pub key: String,
    pub struct_field: String,
    pub init_lines: Vec<String>,
    pub close_lines: Vec<String>,
}

/// Rendered view of one selected config entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigBinding {
    pub key: String,
    pub config_field: String,
}

impl DepsMetadata {
    pub fn parse_deps(raw: &str) -> Result<BTreeMap<String, DepEntry>, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }

    pub fn parse_config(raw: &str) -> Result<BTreeMap<String, ConfigEntry>, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }

    /// Every key must name a manifest library and helper files must be
    /// template files.
    pub fn validate(&self, manifest: &Manifest) -> Result<(), DomainError> {
        let keys = self.deps.keys().map(|k| (layout::templates::DEPS_META, k));
        let config_keys = self.config.keys().map(|k| (layout::templates::CONFIG_META, k));

        for (source, key) in keys.chain(config_keys) {
            if !manifest.libs.contains_key(key) {
                return Err(DomainError::InvalidDefinition {
                    owner: source.into(),
                    reason: format!("key '{}' is not a library in the manifest", key),
                });
            }
        }

        for (key, entry) in &self.deps {
            for file in &entry.helper_files {
                if !file.ends_with(layout::TEMPLATE_EXT) {
                    return Err(DomainError::InvalidDefinition {
                        owner: format!("deps entry '{}'", key),
                        reason: format!("helper file must end with {}: {}", layout::TEMPLATE_EXT, file),
                    });
                }
            }
        }
        Ok(())
    }

    /// Helper templates referenced by any entry.
    pub fn helper_templates(&self) -> Vec<String> {
        self.deps
            .values()
            .flat_map(|e| e.helper_files.iter())
            .map(|f| layout::helper_template(f))
            .collect()
    }

    /// Selected deps entries with their imports, placeholder replaced and
    /// deduplicated across entries in key order.
    pub fn dep_bindings(&self, includes: &Includes, module_name: &str) -> (Vec<String>, Vec<DepBinding>) {
        let selected: Vec<_> = self
            .deps
            .iter()
            .filter(|(k, _)| includes.is_selected(k))
            .collect();

        let imports = dedup_imports(selected.iter().map(|(_, e)| e.imports.as_slice()), module_name);
        let bindings = selected
            .into_iter()
            .map(|(key, entry)| DepBinding {
                key: key.clone(),
                struct_field: entry.struct_field.clone(),
                init_lines: entry.init_lines.clone(),
                close_lines: entry.close_lines.clone(),
            })
            .collect();
        (imports, bindings)
    }

    /// Selected config entries, imports deduplicated the same way.
    pub fn config_bindings(
        &self,
        includes: &Includes,
        module_name: &str,
    ) -> (Vec<String>, Vec<ConfigBinding>) {
        let selected: Vec<_> = self
            .config
            .iter()
            .filter(|(k, _)| includes.is_selected(k))
            .collect();

        let imports = dedup_imports(selected.iter().map(|(_, e)| e.imports.as_slice()), module_name);
        let bindings = selected
            .into_iter()
            .map(|(key, entry)| ConfigBinding {
                key: key.clone(),
                config_field: entry.config_field.clone(),
            })
            .collect();
        (imports, bindings)
    }

    /// `(key, helper file)` pairs for selected entries, in key order.
    pub fn selected_helpers<'a>(&'a self, includes: &'a Includes) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.deps
            .iter()
            .filter(|(k, _)| includes.is_selected(k))
            .flat_map(|(k, e)| e.helper_files.iter().map(move |f| (k.as_str(), f.as_str())))
    }
}

/// Flatten import lists in order, substituting the module placeholder and
/// keeping the first occurrence of each import.
fn dedup_imports<'a>(lists: impl Iterator<Item = &'a [String]>, module_name: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    lists
        .flatten()
        .map(|import| import.replace(layout::MODULE_NAME_PLACEHOLDER, module_name))
        .filter(|import| seen.insert(import.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        Manifest::from_json(
            r#"{"version":"1.0.0","frameworks":{},
                "libs":{"postgres":{},"redis":{},"kafka":{}}}"#,
        )
        .unwrap()
    }

    fn metadata() -> DepsMetadata {
        DepsMetadata {
            deps: DepsMetadata::parse_deps(
                r#"{
                "postgres": {"imports": ["{{module_name}}/internal/infrastructure/postgres", "context"],
                             "struct_field": "DB *gorm.DB",
                             "init_lines": ["d.DB = postgres.MustConnect(cfg.Postgres)"],
                             "helper_files": ["postgres_helper.tmpl"]},
                "redis": {"imports": ["{{module_name}}/internal/infrastructure/redis", "context"],
                          "struct_field": "Redis *redis.Client"}
            }"#,
            )
            .unwrap(),
            config: DepsMetadata::parse_config(
                r#"{"redis": {"imports": ["{{module_name}}/internal/infrastructure/redis"],
                              "config_field": "Redis redis.Config `mapstructure:\"redis\"`"}}"#,
            )
            .unwrap(),
        }
    }

    #[test]
    fn bindings_follow_selection_and_dedupe_imports() {
        let m = manifest();
        let includes = Includes::derive(&m, &["redis".into(), "postgres".into()]);

        let (imports, bindings) = metadata().dep_bindings(&includes, "example.com/demo");

        assert_eq!(
            imports,
            vec![
                "example.com/demo/internal/infrastructure/postgres",
                "context",
                "example.com/demo/internal/infrastructure/redis",
            ]
        );
        assert_eq!(
            bindings.iter().map(|b| b.key.as_str()).collect::<Vec<_>>(),
            vec!["postgres", "redis"]
        );
    }

    #[test]
    fn unselected_entries_are_skipped() {
        let m = manifest();
        let includes = Includes::derive(&m, &["redis".into()]);
        let meta = metadata();

        let (_, bindings) = meta.dep_bindings(&includes, "example.com/demo");
        assert_eq!(bindings.len(), 1);
        assert_eq!(meta.selected_helpers(&includes).count(), 0);

        let (config_imports, config) = meta.config_bindings(&includes, "example.com/demo");
        assert_eq!(config_imports, vec!["example.com/demo/internal/infrastructure/redis"]);
        assert_eq!(config[0].key, "redis");
    }

    #[test]
    fn imports_keep_first_occurrence_after_substitution() {
        let first = vec!["{{module_name}}/internal/config".to_owned(), "context".to_owned()];
        let second = vec![
            "context".to_owned(),
            "example.com/demo/internal/config".to_owned(),
            "time".to_owned(),
        ];

        let imports = dedup_imports([first.as_slice(), second.as_slice()].into_iter(), "example.com/demo");

        assert_eq!(imports, vec!["example.com/demo/internal/config", "context", "time"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut meta = metadata();
        meta.deps.insert("mongo".into(), DepEntry::default());
        assert!(meta.validate(&manifest()).is_err());
    }

    #[test]
    fn helper_files_must_be_templates() {
        let mut meta = metadata();
        meta.deps.get_mut("redis").unwrap().helper_files = vec!["redis.go".into()];
        assert!(meta.validate(&manifest()).is_err());
        assert_eq!(
            metadata().helper_templates(),
            vec!["templates/deps/postgres_helper.tmpl"]
        );
    }
}
