// Model and config loading
//
// Files are TOML unless they end in `.json`.

use anyhow::{Context, Result};
use authgen_core::{GeneratorConfig, ServiceModel, Shape};
use serde::de::DeserializeOwned;
use std::path::Path;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse_file<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;
    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} JSON: {}", what, path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {} TOML: {}", what, path.display()))
    }
}

/// Load and validate a service model snapshot
pub fn load_model(path: &Path) -> Result<ServiceModel> {
    tracing::info!("Loading service model from: {}", path.display());
    let model: ServiceModel = parse_file(path, "model")?;
    model
        .validate()
        .with_context(|| format!("Invalid service model: {}", path.display()))?;
    tracing::debug!(
        service = %model.service.id,
        operations = model.service.operations.len(),
        "Loaded service model"
    );
    Ok(model)
}

/// Load the generator config, falling back to defaults without a file.
///
/// The service name is taken, in order, from `service_name`, the config file,
/// and finally the member name of the model's service shape.
pub fn load_config(
    path: Option<&Path>,
    service_name: Option<&str>,
    model: &ServiceModel,
) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading generator config from: {}", path.display());
            parse_file(path, "config")?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(name) = service_name {
        config.service_name = name.to_string();
    }
    if config.service_name.trim().is_empty() {
        config.service_name = model.service.name().to_string();
    }

    config.validate().context("Invalid generator config")?;
    Ok(config)
}
