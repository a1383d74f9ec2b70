//! Implementation of the `goforge list` command.

use serde::Serialize;

use goforge_core::domain::{LibCategory, Manifest};

use crate::{
    cli::{ListArgs, ListFormat, global::GlobalArgs},
    config::AppConfig,
    engine::Engine,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let engine = Engine::load(&global, &config)?;
    let manifest = engine.store().manifest();
    let catalog = Catalog::from_manifest(&manifest);

    match args.format {
        ListFormat::Table => {
            output.header("Frameworks:")?;
            for fw in &catalog.frameworks {
                output.print(&format!("  {:<12} {}", fw.name, fw.display_name))?;
            }
            output.print("")?;
            output.header("Libraries:")?;
            for category in LibCategory::ALL {
                let libs: Vec<_> = catalog
                    .libs
                    .iter()
                    .filter(|l| l.category == category.as_str())
                    .collect();
                if libs.is_empty() {
                    continue;
                }
                output.print(&format!("  {category}"))?;
                for lib in libs {
                    let radio = if lib.is_radio { "  (pick one)" } else { "" };
                    output.print(&format!("    {:<12} {}{radio}", lib.name, lib.display_name))?;
                }
            }
        }
        // JSON goes through `json` so it stays parseable in pipes.
        ListFormat::Json => output.json(&catalog)?,
        ListFormat::List => {
            for name in catalog.names() {
                output.raw(name)?;
            }
        }
        ListFormat::Csv => {
            for line in catalog.csv_lines() {
                output.raw(&line)?;
            }
        }
    }

    Ok(())
}

// ── Catalog view ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameworkEntry<'a> {
    name: &'a str,
    display_name: &'a str,
    imports: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LibEntry<'a> {
    name: &'a str,
    display_name: &'a str,
    category: &'static str,
    is_radio: bool,
    imports: &'a [String],
}

#[derive(Debug, Serialize)]
struct Catalog<'a> {
    version: &'a str,
    frameworks: Vec<FrameworkEntry<'a>>,
    libs: Vec<LibEntry<'a>>,
}

impl<'a> Catalog<'a> {
    fn from_manifest(manifest: &'a Manifest) -> Self {
        let frameworks = manifest
            .frameworks
            .iter()
            .map(|(name, fw)| FrameworkEntry {
                name,
                display_name: fw.display.display_name.as_deref().unwrap_or(name),
                imports: &fw.imports,
            })
            .collect();

        let libs = manifest
            .libs
            .iter()
            .map(|(name, lib)| LibEntry {
                name,
                display_name: lib.display.display_name.as_deref().unwrap_or(name),
                category: lib.category().as_str(),
                is_radio: lib.is_radio,
                imports: &lib.imports,
            })
            .collect();

        Self {
            version: &manifest.version,
            frameworks,
            libs,
        }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.frameworks
            .iter()
            .map(|f| f.name)
            .chain(self.libs.iter().map(|l| l.name))
    }

    fn csv_lines(&self) -> Vec<String> {
        let mut lines = vec!["kind,name,display_name,category,is_radio".to_string()];
        lines.extend(
            self.frameworks
                .iter()
                .map(|f| format!("framework,{},{},,false", f.name, csv_field(f.display_name))),
        );
        lines.extend(self.libs.iter().map(|l| {
            format!(
                "lib,{},{},{},{}",
                l.name,
                csv_field(l.display_name),
                l.category,
                l.is_radio
            )
        }));
        lines
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(|c: char| c == ',' || c == '"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
