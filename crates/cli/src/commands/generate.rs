// Provider generation command

use anyhow::{Context, Result};
use authgen_core::{HttpAuthSchemeProviderGenerator, SchemeRegistry};
use std::path::PathBuf;

use crate::loader::{load_config, load_model};

pub struct GenerateArgs {
    pub model: PathBuf,
    pub config: Option<PathBuf>,
    pub service_name: Option<String>,
    pub out: Option<PathBuf>,
}

pub fn run(args: GenerateArgs, registry: &SchemeRegistry, quiet: bool) -> Result<()> {
    let model = load_model(&args.model)?;
    let config = load_config(
        args.config.as_deref(),
        args.service_name.as_deref(),
        &model,
    )?;

    let source = HttpAuthSchemeProviderGenerator::new(&config, &model, registry)
        .render()
        .context("Failed to generate auth scheme provider")?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, &source)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            if !quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => print!("{source}"),
    }

    Ok(())
}
