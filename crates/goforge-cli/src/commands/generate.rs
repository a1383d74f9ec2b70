//! Implementation of the `goforge generate` command.
//!
//! Responsibility: translate CLI arguments into a `GenerateRequest`, call the
//! core generation service, and write the archive. No composition logic
//! lives here.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use goforge_core::{
    application::GeneratedArchive,
    domain::{GenerateRequest, GenerationPlan},
};

use crate::{
    cli::{GenerateArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    engine::Engine,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `goforge generate` command.
///
/// Dispatch sequence:
/// 1. Build the request from flags and config defaults
/// 2. Load the manifest and plan (validates the request, touches nothing)
/// 3. Early-exit with the plan if `--dry-run`
/// 4. Refuse an existing destination unless `--force`
/// 5. Generate, tagged with a fresh request id
/// 6. Write the archive and print next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, &config);
    let destination = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(request.archive_name()));

    let engine = Engine::load(&global, &config)?;
    let service = engine.service();
    let plan = service.plan(&request)?;

    if args.dry_run {
        return show_plan(&plan, &destination, &output);
    }

    if destination.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("Output path '{}' is a directory", destination.display()),
        });
    }
    if destination.exists() && !args.force {
        return Err(CliError::OutputExists { path: destination });
    }

    let request_id = Uuid::new_v4();
    let spinner = output.spinner(&format!("Generating '{}'...", request.project_name));
    let result = service.generate(&request, request_id);
    spinner.finish_and_clear();
    let archive = result.map_err(|source| CliError::Generation { request_id, source })?;

    write_archive(&destination, &archive.bytes)?;
    info!(
        %request_id,
        path = %destination.display(),
        bytes = archive.bytes.len(),
        "Archive written"
    );

    report(&archive, &destination, &output)
}

/// Merge flags with config defaults; flags win.
fn build_request(args: &GenerateArgs, config: &AppConfig) -> GenerateRequest {
    let framework = args
        .framework
        .clone()
        .or_else(|| config.defaults.framework.clone())
        .unwrap_or_default();

    let mut request = GenerateRequest::new(&args.name, &args.module, framework)
        .with_libs(args.libs.iter().cloned())
        .with_example(args.example || config.defaults.include_example);

    if let Some(arch) = args
        .architecture
        .clone()
        .or_else(|| config.defaults.architecture.clone())
    {
        request = request.with_architecture(arch);
    }
    request
}

fn write_archive(destination: &Path, bytes: &[u8]) -> CliResult<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(destination, bytes)
        .with_cli_context(|| format!("Failed to write archive to '{}'", destination.display()))
}

// ── Reporting ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateSummary<'a> {
    request_id: String,
    archive: String,
    files: usize,
    bytes: usize,
    dependencies: Vec<&'a str>,
}

fn report(archive: &GeneratedArchive, destination: &Path, out: &OutputManager) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        out.json(&GenerateSummary {
            request_id: archive.request_id.to_string(),
            archive: destination.display().to_string(),
            files: archive.files,
            bytes: archive.bytes.len(),
            dependencies: archive.dependencies.iter().collect(),
        })?;
        return Ok(());
    }

    out.success(&format!(
        "Generated {} ({} files, {} bytes)",
        destination.display(),
        archive.files,
        archive.bytes.len()
    ))?;

    if !out.is_quiet() {
        let project = archive.file_name.trim_end_matches(".zip");
        out.print("")?;
        out.print("Next steps:")?;
        out.print(&format!("  unzip {} -d {project}", destination.display()))?;
        out.print(&format!("  cd {project}"))?;
        out.print("  go mod tidy")?;
        out.print("  go run ./cmd")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct PlannedLayer<'a> {
    layer: &'static str,
    subject: Option<&'a str>,
    outputs: Vec<&'a str>,
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    project: &'a str,
    archive: String,
    layers: Vec<PlannedLayer<'a>>,
    dependencies: Vec<&'a str>,
}

fn show_plan(plan: &GenerationPlan, destination: &Path, out: &OutputManager) -> CliResult<()> {
    let layers: Vec<PlannedLayer<'_>> = plan
        .layers
        .iter()
        .map(|l| PlannedLayer {
            layer: l.layer.as_str(),
            subject: l.subject.as_deref(),
            outputs: l.outputs().collect(),
        })
        .collect();

    if out.format() == OutputFormat::Json {
        out.json(&PlanSummary {
            project: &plan.project_name,
            archive: destination.display().to_string(),
            layers,
            dependencies: plan.dependencies.iter().collect(),
        })?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would write {} ({} files)",
        destination.display(),
        plan.file_count()
    ))?;
    out.header("Layers")?;
    for layer in &layers {
        let name = match layer.subject {
            Some(subject) => format!("{} ({subject})", layer.layer),
            None => layer.layer.to_string(),
        };
        out.print(&format!("  {name:<24} {} files", layer.outputs.len()))?;
    }
    out.header("Dependencies")?;
    for module in plan.dependencies.iter() {
        out.print(&format!("  {module}"))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use goforge_core::domain::DEFAULT_ARCHITECTURE;

    fn args(framework: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            name: "demo-api".into(),
            module: "example.com/demo-api".into(),
            framework: framework.map(String::from),
            architecture: None,
            libs: vec!["redis".into(), "cron".into()],
            example: false,
            output: None,
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn flags_map_onto_request() {
        let request = build_request(&args(Some("gin")), &AppConfig::default());
        assert_eq!(request.project_name, "demo-api");
        assert_eq!(request.module_name, "example.com/demo-api");
        assert_eq!(request.framework, "gin");
        assert_eq!(request.libs, vec!["redis", "cron"]);
        assert_eq!(request.architecture, DEFAULT_ARCHITECTURE);
        assert!(!request.include_example);
    }

    #[test]
    fn config_defaults_fill_missing_flags() {
        let mut config = AppConfig::default();
        config.defaults.framework = Some("echo".into());
        config.defaults.architecture = Some("hexagonal".into());
        config.defaults.include_example = true;

        let request = build_request(&args(None), &config);
        assert_eq!(request.framework, "echo");
        assert_eq!(request.architecture, "hexagonal");
        assert!(request.include_example);
    }

    #[test]
    fn flags_beat_config_defaults() {
        let mut config = AppConfig::default();
        config.defaults.framework = Some("echo".into());
        assert_eq!(build_request(&args(Some("gin")), &config).framework, "gin");
    }

    #[test]
    fn missing_framework_is_left_for_validation() {
        let request = build_request(&args(None), &AppConfig::default());
        assert!(request.framework.is_empty());
    }

    #[test]
    fn archive_lands_in_nested_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("out/demo-api.zip");
        write_archive(&dest, b"PK").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"PK");
    }
}
