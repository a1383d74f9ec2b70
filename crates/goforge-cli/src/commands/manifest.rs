//! `goforge manifest`: print the loaded manifest.

use crate::{
    cli::GlobalArgs, config::AppConfig, engine::Engine, error::CliResult, output::OutputManager,
};

/// Serialize the validated manifest as JSON, regardless of output format.
pub fn execute(global: GlobalArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let engine = Engine::load(&global, &config)?;
    let manifest = engine.store().manifest();
    output.json(&*manifest)?;
    Ok(())
}
