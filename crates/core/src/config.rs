// Generator configuration
//
// GeneratorConfig controls the names and import sources of the emitted provider.
// It can be:
// - Created directly with `GeneratorConfig::new(service_name)`
// - Loaded from a TOML/JSON file (every field but the service name has a default)
// - Assembled with GeneratorConfigBuilder

use serde::{Deserialize, Serialize};

use crate::error::{AuthGenError, Result};
use crate::resolver::AuthSchemeMode;

/// Configuration for provider generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Prefix of every emitted symbol (e.g., "Weather")
    #[serde(default)]
    pub service_name: String,

    /// Client resolved-config type; defaults to `<ServiceName>ClientResolvedConfig`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_config_type: Option<String>,

    /// Module exporting the resolved-config type; defaults to `../<ServiceName>Client`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_config_module: Option<String>,

    /// Import source of the runtime auth types
    #[serde(default = "default_types_package")]
    pub types_package: String,

    /// Import source of the middleware helpers
    #[serde(default = "default_middleware_package")]
    pub middleware_package: String,

    /// Whether noAuth participates in resolution
    #[serde(default)]
    pub mode: AuthSchemeMode,

    /// Emit `@internal` doc blocks above each artifact
    #[serde(default = "default_emit_docs")]
    pub emit_docs: bool,
}

fn default_types_package() -> String {
    "@smithy/types".to_string()
}

fn default_middleware_package() -> String {
    "@smithy/util-middleware".to_string()
}

fn default_emit_docs() -> bool {
    true
}

impl GeneratorConfig {
    /// Create a configuration for a service
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    /// Set the resolved-config type name
    pub fn with_resolved_config_type(mut self, type_name: impl Into<String>) -> Self {
        self.resolved_config_type = Some(type_name.into());
        self
    }

    /// Set the module the resolved-config type is imported from
    pub fn with_resolved_config_module(mut self, module: impl Into<String>) -> Self {
        self.resolved_config_module = Some(module.into());
        self
    }

    /// Set the resolution mode
    pub fn with_mode(mut self, mode: AuthSchemeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable doc blocks
    pub fn with_emit_docs(mut self, emit_docs: bool) -> Self {
        self.emit_docs = emit_docs;
        self
    }

    /// Resolved-config type name, explicit or derived from the service name
    pub fn resolved_config_type(&self) -> String {
        self.resolved_config_type
            .clone()
            .unwrap_or_else(|| format!("{}ClientResolvedConfig", self.service_name))
    }

    /// Resolved-config module, explicit or derived from the service name
    pub fn resolved_config_module(&self) -> String {
        self.resolved_config_module
            .clone()
            .unwrap_or_else(|| format!("../{}Client", self.service_name))
    }

    /// Check that every emitted name can be formed
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(AuthGenError::config("service_name is required"));
        }
        if !self
            .service_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AuthGenError::config(format!(
                "service_name '{}' is not a valid identifier",
                self.service_name
            )));
        }
        if self.types_package.trim().is_empty() {
            return Err(AuthGenError::config("types_package is required"));
        }
        if self.middleware_package.trim().is_empty() {
            return Err(AuthGenError::config("middleware_package is required"));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            resolved_config_type: None,
            resolved_config_module: None,
            types_package: default_types_package(),
            middleware_package: default_middleware_package(),
            mode: AuthSchemeMode::default(),
            emit_docs: default_emit_docs(),
        }
    }
}

/// Builder for GeneratorConfig with fluent API
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    /// Set the service name
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.service_name = name.into();
        self
    }

    /// Set the resolved-config type name
    pub fn resolved_config_type(mut self, type_name: impl Into<String>) -> Self {
        self.config.resolved_config_type = Some(type_name.into());
        self
    }

    /// Set the module exporting the resolved-config type
    pub fn resolved_config_module(mut self, module: impl Into<String>) -> Self {
        self.config.resolved_config_module = Some(module.into());
        self
    }

    /// Set the runtime types package
    pub fn types_package(mut self, package: impl Into<String>) -> Self {
        self.config.types_package = package.into();
        self
    }

    /// Set the middleware package
    pub fn middleware_package(mut self, package: impl Into<String>) -> Self {
        self.config.middleware_package = package.into();
        self
    }

    /// Set the resolution mode
    pub fn mode(mut self, mode: AuthSchemeMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Enable or disable doc blocks
    pub fn emit_docs(mut self, emit_docs: bool) -> Self {
        self.config.emit_docs = emit_docs;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<GeneratorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::new("Weather");
        assert_eq!(config.types_package, "@smithy/types");
        assert_eq!(config.middleware_package, "@smithy/util-middleware");
        assert_eq!(config.mode, AuthSchemeMode::NoAuthAware);
        assert!(config.emit_docs);
        assert_eq!(config.resolved_config_type(), "WeatherClientResolvedConfig");
        assert_eq!(config.resolved_config_module(), "../WeatherClient");
    }

    #[test]
    fn test_explicit_resolved_config_type() {
        let config = GeneratorConfig::new("Weather").with_resolved_config_type("WeatherConfig");
        assert_eq!(config.resolved_config_type(), "WeatherConfig");
    }

    #[test]
    fn test_explicit_resolved_config_module() {
        let config = GeneratorConfig::new("Weather").with_resolved_config_module("./config");
        assert_eq!(config.resolved_config_module(), "./config");
        assert_eq!(
            GeneratorConfig::new("Weather").resolved_config_module(),
            "../WeatherClient"
        );
    }

    #[test]
    fn test_builder_validates() {
        assert!(GeneratorConfigBuilder::new().build().is_err());
        assert!(GeneratorConfigBuilder::new()
            .service_name("Weather Service")
            .build()
            .is_err());

        let config = GeneratorConfigBuilder::new()
            .service_name("Weather")
            .mode(AuthSchemeMode::Standard)
            .emit_docs(false)
            .build()
            .unwrap();
        assert_eq!(config.mode, AuthSchemeMode::Standard);
        assert!(!config.emit_docs);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            service_name = "Weather"
            mode = "standard"
            "#,
        )
        .unwrap();
        assert_eq!(config.service_name, "Weather");
        assert_eq!(config.mode, AuthSchemeMode::Standard);
        assert_eq!(config.types_package, "@smithy/types");
        assert!(config.emit_docs);
    }
}
