//! `goforge validate`: load the manifest and every asset it references.
//!
//! Loading already performs the full check; this command only reports
//! what was verified. Failures surface as setup errors (exit code 4).

use serde::Serialize;
use tracing::info;

use crate::{
    cli::{GlobalArgs, OutputFormat},
    config::AppConfig,
    engine::Engine,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationReport {
    manifest: String,
    assets: String,
    version: String,
    frameworks: usize,
    libs: usize,
    templates: usize,
    dependency_entries: usize,
    config_entries: usize,
}

pub fn execute(global: GlobalArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let engine = Engine::load(&global, &config)?;
    let store = engine.store();
    let manifest = store.manifest();

    let report = ValidationReport {
        manifest: engine.manifest_path.display().to_string(),
        assets: engine.asset_root.display().to_string(),
        version: manifest.version.clone(),
        frameworks: manifest.frameworks.len(),
        libs: manifest.libs.len(),
        templates: store.required_templates().len(),
        dependency_entries: store.metadata().deps.len(),
        config_entries: store.metadata().config.len(),
    };
    info!(version = %report.version, templates = report.templates, "Manifest valid");

    if output.format() == OutputFormat::Json {
        output.json(&report)?;
        return Ok(());
    }

    output.success(&format!("Manifest {} is valid", report.manifest))?;
    output.print(&format!("  assets:      {}", report.assets))?;
    output.print(&format!("  version:     {}", report.version))?;
    output.print(&format!("  frameworks:  {}", report.frameworks))?;
    output.print(&format!("  libraries:   {}", report.libs))?;
    output.print(&format!("  templates:   {}", report.templates))?;
    output.print(&format!(
        "  metadata:    {} dependency, {} config",
        report.dependency_entries, report.config_entries
    ))?;
    Ok(())
}
