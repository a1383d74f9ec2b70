//! Generation Service - the public entry point of the engine.
//!
//! Workflow for one request:
//! 1. Validate and plan against the shared manifest (no side effects)
//! 2. Acquire an exclusively owned staging area
//! 3. Compose every layer into it
//! 4. Pack the tree into an archive
//! 5. Release the staging area (also on every error path, via `Drop`)

use std::sync::Arc;

use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Archiver, Filesystem, ResourceLoader, TemplateRenderer, Workspace},
        services::{LayerComposer, ManifestStore},
    },
    domain::{DependencySet, GenerateRequest, GenerationPlan, Manifest},
    error::{GenError, GenResult},
};

/// Adapters the service drives.
pub struct Adapters {
    pub resources: Box<dyn ResourceLoader>,
    pub renderer: Box<dyn TemplateRenderer>,
    pub filesystem: Box<dyn Filesystem>,
    pub workspace: Box<dyn Workspace>,
    pub archiver: Box<dyn Archiver>,
}

/// A finished generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArchive {
    pub request_id: Uuid,
    /// `<project>.zip`
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub files: usize,
    pub dependencies: DependencySet,
}

/// Orchestrates validation, composition, packaging and staging teardown.
pub struct GenerationService {
    store: Arc<ManifestStore>,
    adapters: Adapters,
}

impl GenerationService {
    /// Create a service over an already loaded store.
    ///
    /// The store is shared read-only; many services (or threads holding one
    /// service) may generate concurrently.
    pub fn new(store: Arc<ManifestStore>, adapters: Adapters) -> Self {
        Self { store, adapters }
    }

    pub fn manifest(&self) -> Arc<Manifest> {
        self.store.manifest()
    }

    /// Validate `request` and return what a generation would produce.
    pub fn plan(&self, request: &GenerateRequest) -> GenResult<GenerationPlan> {
        Ok(self.store.plan(request)?)
    }

    /// Generate a project archive.
    ///
    /// `request_id` is chosen by the caller and tags every log line of this
    /// generation.
    pub fn generate(&self, request: &GenerateRequest, request_id: Uuid) -> GenResult<GeneratedArchive> {
        let span = info_span!(
            "generate",
            %request_id,
            project = %request.project_name,
            framework = %request.framework,
            libs = request.libs.len(),
            example = request.include_example,
        );
        let _entered = span.enter();

        let result = self.run(request, request_id);
        match &result {
            Ok(archive) => info!(
                files = archive.files,
                bytes = archive.bytes.len(),
                "Project generated"
            ),
            Err(e) => warn!(
                kind = %e.kind(),
                layer = e.failed_layer().map(|l| l.as_str()).unwrap_or("-"),
                error = %e,
                "Generation failed"
            ),
        }
        result
    }

    fn run(&self, request: &GenerateRequest, request_id: Uuid) -> GenResult<GeneratedArchive> {
        let plan = self.plan(request)?;
        debug!(
            layers = plan.layers.len(),
            dependencies = plan.dependencies.len(),
            "Request validated"
        );

        let staging = self.adapters.workspace.acquire(&request.project_name)?;
        debug!(root = %staging.root().display(), "Staging area acquired");

        let files = LayerComposer::new(
            self.adapters.resources.as_ref(),
            self.adapters.renderer.as_ref(),
            self.adapters.filesystem.as_ref(),
            staging.root(),
        )
        .compose(&plan)?;

        let bytes = self.adapters.archiver.pack(staging.root())?;
        if bytes.is_empty() {
            return Err(GenError::Internal {
                message: "archiver produced an empty artifact".into(),
            });
        }

        drop(staging);
        debug!("Staging area released");

        Ok(GeneratedArchive {
            request_id,
            file_name: request.archive_name(),
            bytes,
            files,
            dependencies: plan.dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::{Path, PathBuf},
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use super::*;
    use crate::application::{
        ApplicationError,
        ports::{MockArchiver, MockWorkspace, StagingArea},
        services::test_support::{FakeFilesystem, FakeRenderer, fixture_resources, fixture_store},
    };
    use crate::error::ErrorKind;

    struct CountedStaging {
        root: PathBuf,
        released: Arc<AtomicUsize>,
    }

    impl StagingArea for CountedStaging {
        fn root(&self) -> &Path {
            &self.root
        }
    }

    impl Drop for CountedStaging {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counted_workspace(released: &Arc<AtomicUsize>) -> MockWorkspace {
        let released = Arc::clone(released);
        let mut workspace = MockWorkspace::new();
        workspace.expect_acquire().times(1).returning(move |_| {
            Ok(Box::new(CountedStaging {
                root: PathBuf::from("/stage"),
                released: Arc::clone(&released),
            }) as Box<dyn StagingArea>)
        });
        workspace
    }

    fn service(workspace: MockWorkspace, archiver: MockArchiver, fs: FakeFilesystem) -> GenerationService {
        GenerationService::new(
            Arc::new(fixture_store()),
            Adapters {
                resources: Box::new(fixture_resources()),
                renderer: Box::new(FakeRenderer),
                filesystem: Box::new(fs),
                workspace: Box::new(workspace),
                archiver: Box::new(archiver),
            },
        )
    }

    fn request() -> GenerateRequest {
        GenerateRequest::new("demo-api", "example.com/demo-api", "gin").with_lib("redis")
    }

    #[test]
    fn generates_and_releases_staging() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut archiver = MockArchiver::new();
        archiver
            .expect_pack()
            .withf(|root| root == Path::new("/stage"))
            .times(1)
            .returning(|_| Ok(vec![0x50, 0x4b]));

        let svc = service(counted_workspace(&released), archiver, FakeFilesystem::default());
        let id = Uuid::new_v4();
        let archive = svc.generate(&request(), id).unwrap();

        assert_eq!(archive.request_id, id);
        assert_eq!(archive.file_name, "demo-api.zip");
        assert_eq!(archive.bytes, vec![0x50, 0x4b]);
        assert!(archive.dependencies.contains("github.com/redis/go-redis/v9"));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_request_never_acquires_staging() {
        let mut workspace = MockWorkspace::new();
        workspace.expect_acquire().never();
        let mut archiver = MockArchiver::new();
        archiver.expect_pack().never();
        let fs = FakeFilesystem::default();

        let svc = service(workspace, archiver, fs.clone());
        let bad = GenerateRequest::new("My_Project", "example.com/demo", "gin");
        let err = svc.generate(&bad, Uuid::new_v4()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fs.is_untouched());
    }

    #[test]
    fn unknown_library_is_not_found_before_staging() {
        let mut workspace = MockWorkspace::new();
        workspace.expect_acquire().never();
        let svc = service(workspace, MockArchiver::new(), FakeFilesystem::default());

        let err = svc
            .generate(&request().with_lib("mongo"), Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.kind().status_code(), 404);
    }

    #[test]
    fn composition_failure_still_releases_staging() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut archiver = MockArchiver::new();
        archiver.expect_pack().never();

        let svc = service(
            counted_workspace(&released),
            archiver,
            FakeFilesystem::failing_on("/stage/go.mod"),
        );
        let err = svc.generate(&request(), Uuid::new_v4()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FileSystem);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn archive_failure_still_releases_staging() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut archiver = MockArchiver::new();
        archiver.expect_pack().returning(|_| {
            Err(ApplicationError::ArchiveFailed {
                reason: "disk gone".into(),
            }
            .into())
        });

        let svc = service(counted_workspace(&released), archiver, FakeFilesystem::default());
        assert!(svc.generate(&request(), Uuid::new_v4()).is_err());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn plan_matches_generation_outputs() {
        let fs = FakeFilesystem::default();
        let mut archiver = MockArchiver::new();
        archiver.expect_pack().returning(|_| Ok(vec![1]));
        let released = Arc::new(AtomicUsize::new(0));

        let svc = service(counted_workspace(&released), archiver, fs.clone());
        let plan = svc.plan(&request()).unwrap();
        let archive = svc.generate(&request(), Uuid::new_v4()).unwrap();

        assert_eq!(archive.files, plan.file_count());
        assert_eq!(fs.file_count(), plan.file_count());
    }
}
