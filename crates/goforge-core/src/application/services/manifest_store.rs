//! Manifest Store - the immutable catalog shared by every generation.
//!
//! Loading builds and checks everything in local memory first; the store is
//! only handed out once every check passed, so no reader can observe a
//! partially valid manifest.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::ResourceLoader},
    domain::{
        DepsMetadata, DomainError, GenerateRequest, GenerationPlan, Manifest, MergedConfig,
        layout::{self, templates},
    },
    error::GenResult,
};

/// Default manifest location, relative to the asset root.
pub const DEFAULT_MANIFEST_PATH: &str = "manifest.json";

/// Loaded, validated manifest plus dependency-injection metadata.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    manifest: Arc<Manifest>,
    metadata: Arc<DepsMetadata>,
}

impl ManifestStore {
    /// Read, parse and fully validate the manifest at `path`.
    ///
    /// Any violation fails the whole load.
    #[instrument(skip(resources))]
    pub fn load(path: &str, resources: &dyn ResourceLoader) -> GenResult<Self> {
        let raw = resources.read_to_string(path)?;
        let store = Self::from_json(&raw, resources)?;

        info!(
            version = %store.manifest.version,
            frameworks = store.manifest.frameworks.len(),
            libs = store.manifest.libs.len(),
            "Manifest loaded"
        );
        Ok(store)
    }

    /// Validate an already-read manifest document against `resources`.
    pub fn from_json(raw: &str, resources: &dyn ResourceLoader) -> GenResult<Self> {
        let manifest = Manifest::from_json(raw)?;
        manifest.validate()?;

        check_templates(&manifest, resources)?;
        check_fragments(&manifest, resources)?;
        let metadata = load_metadata(&manifest, resources)?;

        Ok(Self {
            manifest: Arc::new(manifest),
            metadata: Arc::new(metadata),
        })
    }

    /// Cheap shared read of the immutable manifest.
    pub fn manifest(&self) -> Arc<Manifest> {
        Arc::clone(&self.manifest)
    }

    pub fn metadata(&self) -> &DepsMetadata {
        &self.metadata
    }

    /// Every template a generation may read, sorted; all verified at load.
    pub fn required_templates(&self) -> Vec<String> {
        let mut all = required_templates(&self.manifest);
        all.extend(self.metadata.helper_templates());
        all.sort();
        all.dedup();
        all
    }

    /// Validate a request and plan its layers.
    pub fn plan(&self, request: &GenerateRequest) -> Result<GenerationPlan, DomainError> {
        GenerationPlan::build(request, &self.manifest, &self.metadata)
    }
}

/// Declared templates plus every template the planner can pick by convention.
pub(crate) fn required_templates(manifest: &Manifest) -> Vec<String> {
    let mut required: Vec<String> = manifest
        .declared_templates()
        .into_iter()
        .map(String::from)
        .collect();

    required.extend(templates::ALWAYS.iter().map(|t| t.to_string()));
    required.extend(templates::EXAMPLE.iter().map(|t| t.to_string()));

    for framework in manifest.frameworks.keys() {
        required.extend(
            layout::MIDDLEWARE_KINDS
                .iter()
                .map(|kind| layout::middleware_template(framework, kind)),
        );
    }
    if manifest.libs.contains_key(layout::SCHEDULER_LIB) {
        required.push(templates::EXAMPLE_JOB.into());
    }
    for broker in layout::BROKER_LIBS {
        if manifest.libs.contains_key(broker) {
            required.push(layout::consumer_template(broker));
        }
    }

    required.sort();
    required.dedup();
    required
}

fn check_templates(manifest: &Manifest, resources: &dyn ResourceLoader) -> GenResult<()> {
    let required = required_templates(manifest);
    for template in &required {
        if !resources.exists(template) {
            return Err(ApplicationError::ResourceMissing {
                path: template.clone(),
            }
            .into());
        }
    }
    debug!(count = required.len(), "Templates present");
    Ok(())
}

fn check_fragments(manifest: &Manifest, resources: &dyn ResourceLoader) -> GenResult<()> {
    for path in manifest.declared_fragments() {
        let raw = resources.read_to_string(path)?;
        MergedConfig::parse_fragment(&raw).map_err(|reason| ApplicationError::FragmentInvalid {
            path: path.into(),
            reason,
        })?;
    }
    Ok(())
}

fn load_metadata(manifest: &Manifest, resources: &dyn ResourceLoader) -> GenResult<DepsMetadata> {
    let mut metadata = DepsMetadata::default();

    if resources.exists(templates::DEPS_META) {
        let raw = resources.read_to_string(templates::DEPS_META)?;
        metadata.deps = DepsMetadata::parse_deps(&raw).map_err(|reason| {
            ApplicationError::MetadataInvalid {
                path: templates::DEPS_META.into(),
                reason,
            }
        })?;
    }
    if resources.exists(templates::CONFIG_META) {
        let raw = resources.read_to_string(templates::CONFIG_META)?;
        metadata.config = DepsMetadata::parse_config(&raw).map_err(|reason| {
            ApplicationError::MetadataInvalid {
                path: templates::CONFIG_META.into(),
                reason,
            }
        })?;
    }

    metadata.validate(manifest)?;
    for helper in metadata.helper_templates() {
        if !resources.exists(&helper) {
            return Err(ApplicationError::ResourceMissing { path: helper }.into());
        }
    }

    debug!(
        deps = metadata.deps.len(),
        config = metadata.config.len(),
        "Dependency metadata loaded"
    );
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{FakeResources, MANIFEST, fixture_resources};
    use crate::error::ErrorKind;

    #[test]
    fn loads_valid_manifest() {
        let resources = fixture_resources();
        let store = ManifestStore::load("manifest.json", &resources).unwrap();

        let manifest = store.manifest();
        assert!(manifest.frameworks.contains_key("gin"));
        assert_eq!(store.metadata().deps.len(), 1);
    }

    #[test]
    fn shared_reads_point_at_one_manifest() {
        let store = ManifestStore::load("manifest.json", &fixture_resources()).unwrap();
        assert!(Arc::ptr_eq(&store.manifest(), &store.manifest()));
    }

    #[test]
    fn required_templates_include_helpers_and_conventions() {
        let store = ManifestStore::load("manifest.json", &fixture_resources()).unwrap();
        let all = store.required_templates();

        assert!(all.contains(&"templates/deps/redis_helper.tmpl".to_string()));
        assert!(all.contains(&templates::GO_MOD.to_string()));
        assert!(all.contains(&"templates/consumers/kafka_consumer.tmpl".to_string()));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn missing_manifest_file_fails() {
        let err = ManifestStore::load("nope.json", &FakeResources::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn missing_declared_template_fails_load() {
        let resources = fixture_resources().without("templates/libs/redis/redis.tmpl");
        let err = ManifestStore::load("manifest.json", &resources).unwrap_err();
        assert!(err.to_string().contains("templates/libs/redis/redis.tmpl"));
    }

    #[test]
    fn missing_convention_template_fails_load() {
        let resources = fixture_resources().without("templates/middleware/gin/tracing.tmpl");
        assert!(ManifestStore::load("manifest.json", &resources).is_err());

        let resources = fixture_resources().without(templates::BOOTSTRAP);
        assert!(ManifestStore::load("manifest.json", &resources).is_err());
    }

    #[test]
    fn invalid_fragment_fails_load() {
        let resources = fixture_resources().with("templates/config/gin.json", "[]");
        let err = ManifestStore::load("manifest.json", &resources).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn metadata_with_unknown_key_fails_load() {
        let resources = fixture_resources().with(
            templates::DEPS_META,
            r#"{"mongo": {"struct_field": "Mongo *mongo.Client"}}"#,
        );
        assert!(ManifestStore::load("manifest.json", &resources).is_err());
    }

    #[test]
    fn old_manifest_version_fails_load() {
        let raw = MANIFEST.replace("\"1.0.0\"", "\"0.1.0\"");
        let err = ManifestStore::from_json(&raw, &fixture_resources()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
