//! `goforge config`: inspect configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.raw(&value)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = config.to_toml().map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            let path = global.config.unwrap_or_else(AppConfig::config_path);
            output.raw(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let path = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    };

    match key {
        "manifest_path" => Ok(config.manifest_path.display().to_string()),
        "assets_dir" => Ok(path(&config.assets_dir)),
        "log.level" => Ok(config.log.level.clone().unwrap_or_default()),
        "log.format" => Ok(config.log.format.clone()),
        "log.file" => Ok(path(&config.log.file)),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "defaults.framework" => Ok(config.defaults.framework.clone().unwrap_or_default()),
        "defaults.architecture" => Ok(config.defaults.architecture.clone().unwrap_or_default()),
        "defaults.include_example" => Ok(config.defaults.include_example.to_string()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
