//! Layer planning: which files a request produces, in which order, with
//! which context.
//!
//! Planning is pure. The same [`GenerationPlan`] backs a dry run and a real
//! generation, so what is previewed is exactly what gets written.

use std::{collections::HashMap, fmt};

use serde::Serialize;

use crate::domain::{
    context::{
        BuildManifestContext, CommonContext, ConfigAccessorContext, ContainerContext,
        DependenciesContext, RenderContext,
    },
    dependencies::DependencySet,
    deps_meta::DepsMetadata,
    error::DomainError,
    includes::Includes,
    layout::{self, dirs, files, templates},
    manifest::Manifest,
    request::GenerateRequest,
};

/// One structural unit of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    Skeleton,
    Framework,
    Middleware,
    BaseConfig,
    Library,
    Config,
    Domain,
    Errors,
    Models,
    Repository,
    Usecase,
    Handler,
    Jobs,
    Consumers,
    Bootstrap,
    DependencyInjection,
    Docs,
    BuildManifest,
    ProjectMeta,
}

impl Layer {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skeleton => "skeleton",
            Self::Framework => "framework",
            Self::Middleware => "middleware",
            Self::BaseConfig => "base-config",
            Self::Library => "library",
            Self::Config => "config",
            Self::Domain => "domain",
            Self::Errors => "errors",
            Self::Models => "models",
            Self::Repository => "repository",
            Self::Usecase => "usecase",
            Self::Handler => "handler",
            Self::Jobs => "jobs",
            Self::Consumers => "consumers",
            Self::Bootstrap => "bootstrap",
            Self::DependencyInjection => "dependency-injection",
            Self::Docs => "docs",
            Self::BuildManifest => "build-manifest",
            Self::ProjectMeta => "project-meta",
        }
    }

    /// Layers only present when example code is requested.
    pub fn is_example_only(self) -> bool {
        matches!(
            self,
            Self::Domain
                | Self::Errors
                | Self::Models
                | Self::Repository
                | Self::Usecase
                | Self::Handler
                | Self::Jobs
                | Self::Consumers
        )
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single action inside a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Create a directory relative to the staging root.
    CreateDir(String),
    /// Render a template into a file relative to the staging root.
    Render(RenderStep),
    /// Seed the config document with the default logging section.
    MergeBaseline,
    /// Overlay a config fragment onto the config document.
    MergeFragment(String),
    /// Write the config document.
    WriteConfig(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderStep {
    pub template: String,
    pub output: String,
    pub context: RenderContext,
}

/// Ordered steps of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPlan {
    pub layer: Layer,
    /// Library name for [`Layer::Library`] plans.
    pub subject: Option<String>,
    pub steps: Vec<Step>,
}

impl LayerPlan {
    fn new(layer: Layer) -> Self {
        Self {
            layer,
            subject: None,
            steps: Vec::new(),
        }
    }

    fn render(mut self, template: impl Into<String>, output: impl Into<String>, context: RenderContext) -> Self {
        self.steps.push(Step::Render(RenderStep {
            template: template.into(),
            output: output.into(),
            context,
        }));
        self
    }

    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Files this layer writes, in order.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            Step::Render(r) => Some(r.output.as_str()),
            Step::WriteConfig(path) => Some(path.as_str()),
            _ => None,
        })
    }
}

/// Everything one generation will do.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub project_name: String,
    pub libs: Vec<String>,
    pub dependencies: DependencySet,
    pub layers: Vec<LayerPlan>,
}

impl GenerationPlan {
    /// Validate the request and plan every layer in render order.
    pub fn build(
        request: &GenerateRequest,
        manifest: &Manifest,
        metadata: &DepsMetadata,
    ) -> Result<Self, DomainError> {
        request.validate(manifest)?;

        let libs = request.selected_libs();
        let includes = Includes::derive(manifest, &libs);
        let common = CommonContext::new(request, includes);
        let dependencies = DependencySet::resolve(request, manifest)?;
        let planner = Planner {
            manifest,
            metadata,
            common: &common,
        };

        let mut layers = vec![
            planner.skeleton(),
            planner.framework()?,
            planner.middleware(),
            planner.base_config()?,
        ];
        for lib in &libs {
            layers.push(planner.library(lib)?);
        }
        layers.push(LayerPlan::new(Layer::Config).step(Step::WriteConfig(files::CONFIG.into())));

        if request.include_example {
            layers.extend(planner.example_layers());
        }

        layers.push(planner.bootstrap());
        layers.push(planner.dependency_injection());
        layers.push(LayerPlan::new(Layer::Docs).render(
            templates::DOCS,
            files::DOCS,
            RenderContext::project(&common),
        ));
        layers.push(LayerPlan::new(Layer::BuildManifest).render(
            templates::GO_MOD,
            files::GO_MOD,
            RenderContext::BuildManifest(BuildManifestContext {
                common: common.clone(),
                go_version: layout::DEFAULT_GO_VERSION.into(),
                dependencies: dependencies.to_vec(),
            }),
        ));
        layers.push(planner.project_meta());

        let plan = Self {
            project_name: request.project_name.clone(),
            libs,
            dependencies,
            layers,
        };
        plan.check_unique_outputs()?;
        Ok(plan)
    }

    /// Every file the plan writes, in render order.
    pub fn outputs(&self) -> Vec<&str> {
        self.layers.iter().flat_map(LayerPlan::outputs).collect()
    }

    pub fn file_count(&self) -> usize {
        self.layers.iter().map(|l| l.outputs().count()).sum()
    }

    fn check_unique_outputs(&self) -> Result<(), DomainError> {
        let mut owners: HashMap<&str, Layer> = HashMap::new();
        for layer in &self.layers {
            for output in layer.outputs() {
                if let Some(first) = owners.insert(output, layer.layer) {
                    return Err(DomainError::OutputCollision {
                        path: output.into(),
                        first,
                        second: layer.layer,
                    });
                }
            }
        }
        Ok(())
    }
}

struct Planner<'a> {
    manifest: &'a Manifest,
    metadata: &'a DepsMetadata,
    common: &'a CommonContext,
}

impl Planner<'_> {
    fn project(&self) -> RenderContext {
        RenderContext::project(self.common)
    }

    fn includes(&self) -> &Includes {
        &self.common.includes
    }

    fn skeleton(&self) -> LayerPlan {
        let mut plan = LayerPlan::new(Layer::Skeleton);
        let example: &[&str] = if self.common.include_example {
            &dirs::EXAMPLE
        } else {
            &[]
        };
        for dir in dirs::BASE.iter().chain(example) {
            plan = plan.step(Step::CreateDir((*dir).into()));
        }
        plan
    }

    fn framework(&self) -> Result<LayerPlan, DomainError> {
        let def = self.manifest.framework(&self.common.framework)?;
        Ok(def.templates.iter().fold(LayerPlan::new(Layer::Framework), |plan, t| {
            plan.render(t, layout::framework_output(t), self.project())
        }))
    }

    fn middleware(&self) -> LayerPlan {
        layout::MIDDLEWARE_KINDS
            .iter()
            .fold(LayerPlan::new(Layer::Middleware), |plan, kind| {
                plan.render(
                    layout::middleware_template(&self.common.framework, kind),
                    layout::middleware_output(kind),
                    self.project(),
                )
            })
    }

    fn base_config(&self) -> Result<LayerPlan, DomainError> {
        let def = self.manifest.framework(&self.common.framework)?;
        let mut plan = LayerPlan::new(Layer::BaseConfig).step(Step::MergeBaseline);
        if let Some(section) = &def.config_section {
            plan = plan.step(Step::MergeFragment(section.clone()));
        }
        Ok(plan)
    }

    fn library(&self, lib: &str) -> Result<LayerPlan, DomainError> {
        let def = self.manifest.lib(lib)?;
        let context = RenderContext::library(self.common, lib);

        let mut plan = def.templates.iter().fold(LayerPlan::new(Layer::Library), |plan, t| {
            plan.render(t, layout::library_output(lib, t), context.clone())
        });
        plan.subject = Some(lib.into());
        if let Some(section) = &def.config_section {
            plan = plan.step(Step::MergeFragment(section.clone()));
        }
        Ok(plan)
    }

    fn example_layers(&self) -> Vec<LayerPlan> {
        let single = |layer, template, output| {
            LayerPlan::new(layer).render(template, output, self.project())
        };

        let mut layers = vec![
            single(Layer::Domain, templates::DOMAIN_ENTITY, files::DOMAIN_ENTITY),
            single(Layer::Errors, templates::ERRORS, files::ERRORS),
            single(Layer::Models, templates::USER_MODEL, files::USER_MODEL),
            LayerPlan::new(Layer::Repository)
                .render(templates::USER_REPOSITORY, files::USER_REPOSITORY, self.project())
                .render(templates::CACHE_REPOSITORY, files::CACHE_REPOSITORY, self.project()),
            single(Layer::Usecase, templates::USER_USECASE, files::USER_USECASE),
            single(Layer::Handler, templates::USER_HANDLER, files::USER_HANDLER),
        ];

        if self.includes().is_selected(layout::SCHEDULER_LIB) {
            layers.push(single(Layer::Jobs, templates::EXAMPLE_JOB, files::EXAMPLE_JOB));
        }

        let consumers = layout::BROKER_LIBS
            .iter()
            .filter(|broker| self.includes().is_selected(broker))
            .fold(LayerPlan::new(Layer::Consumers), |plan, broker| {
                plan.render(
                    layout::consumer_template(broker),
                    layout::consumer_output(broker),
                    self.project(),
                )
            });
        if !consumers.steps.is_empty() {
            layers.push(consumers);
        }

        layers
    }

    fn bootstrap(&self) -> LayerPlan {
        let (server, routes, bootstrap) = if self.common.include_example {
            (templates::SERVER, templates::ROUTES, templates::BOOTSTRAP)
        } else {
            (
                templates::SERVER_SIMPLE,
                templates::ROUTES_SAMPLE,
                templates::BOOTSTRAP_SAMPLE,
            )
        };

        LayerPlan::new(Layer::Bootstrap)
            .render(server, files::SERVER, self.project())
            .render(routes, files::ROUTES, self.project())
            .render(bootstrap, files::BOOTSTRAP, self.project())
            .render(templates::MAIN, files::MAIN, self.project())
    }

    fn dependency_injection(&self) -> LayerPlan {
        let module = &self.common.module_name;
        let (imports, bindings) = self.metadata.dep_bindings(self.includes(), module);
        let (config_imports, fields) = self.metadata.config_bindings(self.includes(), module);

        let plan = LayerPlan::new(Layer::DependencyInjection)
            .render(
                templates::DEPS,
                files::DEPS,
                RenderContext::Dependencies(DependenciesContext {
                    common: self.common.clone(),
                    imports,
                    bindings,
                }),
            )
            .render(
                templates::DEPS_CONFIG,
                files::DEPS_CONFIG,
                RenderContext::ConfigAccessor(ConfigAccessorContext {
                    common: self.common.clone(),
                    imports: config_imports,
                    fields,
                }),
            );

        self.metadata
            .selected_helpers(self.includes())
            .fold(plan, |plan, (key, file)| {
                plan.render(
                    layout::helper_template(file),
                    layout::helper_output(file),
                    RenderContext::helper(self.common, key),
                )
            })
    }

    fn project_meta(&self) -> LayerPlan {
        let container = RenderContext::Container(ContainerContext {
            common: self.common.clone(),
            binary_name: self.common.project_name.clone(),
            port: layout::DEFAULT_PORT,
            go_version: layout::DEFAULT_GO_VERSION.into(),
        });

        LayerPlan::new(Layer::ProjectMeta)
            .render(templates::DOCKERFILE, files::DOCKERFILE, container)
            .render(templates::GITIGNORE, files::GITIGNORE, self.project())
            .render(templates::ENV_EXAMPLE, files::ENV_EXAMPLE, self.project())
            .render(templates::README, files::README, self.project())
    }
}
