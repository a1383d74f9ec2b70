//! Layer Composer - executes a [`GenerationPlan`] into a staging tree.
//!
//! Layers run strictly in plan order. The first failing step aborts the
//! whole composition and is reported once, tagged with its layer.

use std::path::Path;

use tracing::{debug, trace};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ResourceLoader, TemplateRenderer},
    },
    domain::{GenerationPlan, LayerPlan, MergedConfig, RenderContext, Step},
    error::{Context, GenError, GenResult},
};

/// Per-generation composer bound to one staging root.
pub struct LayerComposer<'a> {
    resources: &'a dyn ResourceLoader,
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
    root: &'a Path,
    config: MergedConfig,
    files_written: usize,
}

impl<'a> LayerComposer<'a> {
    pub fn new(
        resources: &'a dyn ResourceLoader,
        renderer: &'a dyn TemplateRenderer,
        filesystem: &'a dyn Filesystem,
        root: &'a Path,
    ) -> Self {
        Self {
            resources,
            renderer,
            filesystem,
            root,
            config: MergedConfig::empty(),
            files_written: 0,
        }
    }

    /// Run every layer of `plan`; returns the number of files written.
    pub fn compose(mut self, plan: &GenerationPlan) -> GenResult<usize> {
        for layer in &plan.layers {
            self.run_layer(layer).map_err(|e| e.in_layer(layer.layer))?;
            debug!(
                layer = %layer.layer,
                subject = layer.subject.as_deref().unwrap_or(""),
                steps = layer.steps.len(),
                "Layer rendered"
            );
        }
        Ok(self.files_written)
    }

    fn run_layer(&mut self, layer: &LayerPlan) -> GenResult<()> {
        for step in &layer.steps {
            match step {
                Step::CreateDir(dir) => {
                    self.filesystem.create_dir_all(&self.root.join(dir))?;
                }
                Step::Render(r) => {
                    self.render_to(&r.template, &r.context, &r.output)?;
                    self.files_written += 1;
                }
                Step::MergeBaseline => self.config.overlay_baseline(),
                Step::MergeFragment(path) => self.merge_fragment(path)?,
                Step::WriteConfig(output) => {
                    let body = self
                        .config
                        .to_pretty_json()
                        .context("Failed to encode config document")?;
                    self.write(output, &body)?;
                    self.files_written += 1;
                }
            }
        }
        Ok(())
    }

    /// Resolve `template`, render it against `context` and write the result
    /// to `output` under the staging root, creating parent directories.
    pub fn render_to(&self, template: &str, context: &RenderContext, output: &str) -> GenResult<()> {
        let source = self.resources.read_to_string(template).map_err(|e| match e {
            GenError::Application(ApplicationError::ResourceMissing { .. }) => {
                ApplicationError::TemplateNotFound {
                    template: template.into(),
                }
                .into()
            }
            other => other,
        })?;

        let rendered = self.renderer.render(template, &source, context)?;
        self.write(output, &rendered)?;
        trace!(template, output, bytes = rendered.len(), "Template rendered");
        Ok(())
    }

    fn merge_fragment(&mut self, path: &str) -> GenResult<()> {
        let raw = self.resources.read_to_string(path)?;
        let fragment = MergedConfig::parse_fragment(&raw).map_err(|reason| {
            ApplicationError::FragmentInvalid {
                path: path.into(),
                reason,
            }
        })?;
        self.config.overlay(fragment);
        Ok(())
    }

    fn write(&self, output: &str, content: &str) -> GenResult<()> {
        let dest = self.root.join(output);
        if let Some(parent) = dest.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&dest, content)
    }
}
