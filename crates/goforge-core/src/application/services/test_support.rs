//! In-memory fakes shared by the service tests.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ResourceLoader, TemplateRenderer},
        services::manifest_store::{ManifestStore, required_templates},
    },
    domain::{Manifest, RenderContext, layout::templates},
    error::GenResult,
};

pub const MANIFEST: &str = r#"{
    "version": "1.0.0",
    "frameworks": {
        "gin": {
            "imports": ["github.com/gin-gonic/gin"],
            "config_section": "templates/config/gin.json",
            "templates": ["templates/frameworks/gin/router.tmpl"]
        }
    },
    "libs": {
        "redis": {
            "imports": ["github.com/redis/go-redis/v9"],
            "config_section": "templates/config/redis.json",
            "templates": ["templates/libs/redis/redis.tmpl"],
            "category": "caching"
        },
        "cron": {
            "imports": ["github.com/robfig/cron/v3"],
            "templates": ["templates/libs/cron/scheduler.tmpl"],
            "category": "utilities"
        },
        "kafka": {
            "imports": ["github.com/segmentio/kafka-go"],
            "templates": ["templates/libs/kafka/kafka.tmpl"],
            "category": "messaging"
        }
    }
}"#;

const DEPS_META: &str = r#"{
    "redis": {
        "imports": ["{{module_name}}/internal/infrastructure/redis"],
        "struct_field": "Redis *redis.Client",
        "init_lines": ["d.Redis = redis.NewClient(cfg.Redis)"],
        "close_lines": ["d.Redis.Close()"],
        "helper_files": ["redis_helper.tmpl"]
    }
}"#;

/// Resource map keyed by asset-relative path.
#[derive(Debug, Clone, Default)]
pub struct FakeResources {
    files: BTreeMap<String, String>,
}

impl FakeResources {
    pub fn with(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn without(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }
}

impl ResourceLoader for FakeResources {
    fn read_to_string(&self, path: &str) -> GenResult<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::ResourceMissing { path: path.into() }.into()
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

/// Every asset [`MANIFEST`] needs, each template echoing the request.
pub fn fixture_resources() -> FakeResources {
    let manifest = Manifest::from_json(MANIFEST).unwrap();
    let mut resources = FakeResources::default().with("manifest.json", MANIFEST);

    for template in required_templates(&manifest) {
        let body = format!("{{{{project_name}}}} {{{{module_name}}}} {}", template);
        resources = resources.with(&template, &body);
    }

    resources
        .with("templates/config/gin.json", r#"{"server": {"port": 9090}}"#)
        .with("templates/config/redis.json", r#"{"redis": {"addr": "localhost:6379"}}"#)
        .with(templates::DEPS_META, DEPS_META)
        .with("templates/deps/redis_helper.tmpl", "package deps // {{module_name}}")
}

pub fn fixture_store() -> ManifestStore {
    ManifestStore::load("manifest.json", &fixture_resources()).unwrap()
}

#[derive(Debug, Default)]
struct FsState {
    dirs: Vec<PathBuf>,
    files: BTreeMap<PathBuf, String>,
}

/// Recording filesystem; clones share state so tests can inspect what a
/// boxed copy wrote.
#[derive(Debug, Clone, Default)]
pub struct FakeFilesystem {
    state: Arc<Mutex<FsState>>,
    fail_on: Option<PathBuf>,
}

impl FakeFilesystem {
    /// Writes to `path` fail; everything else succeeds.
    pub fn failing_on(path: &str) -> Self {
        Self {
            fail_on: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.state.lock().unwrap().files.get(Path::new(path)).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }

    pub fn is_untouched(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.is_empty() && state.files.is_empty()
    }
}

impl Filesystem for FakeFilesystem {
    fn create_dir_all(&self, path: &Path) -> GenResult<()> {
        self.state.lock().unwrap().dirs.push(path.to_path_buf());
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GenResult<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "injected failure".into(),
            }
            .into());
        }
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_path_buf(), content.into());
        Ok(())
    }
}

/// Substitutes the two request placeholders; `{{fail}}` fails the render.
pub struct FakeRenderer;

impl TemplateRenderer for FakeRenderer {
    fn render(&self, template: &str, source: &str, context: &RenderContext) -> GenResult<String> {
        if source.contains("{{fail}}") {
            return Err(ApplicationError::RenderingFailed {
                template: template.into(),
                reason: "forced".into(),
            }
            .into());
        }
        let common = context.common();
        Ok(source
            .replace("{{project_name}}", &common.project_name)
            .replace("{{module_name}}", &common.module_name))
    }
}
