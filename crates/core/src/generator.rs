//! HTTP auth scheme provider generation.
//!
//! Emits, for one service, the provider source a client uses to choose auth
//! options at runtime:
//!
//! 1. the auth parameters interface (`operation` plus every collected parameter)
//! 2. the parameters provider interface
//! 3. the default parameters provider, reading each parameter from its source
//! 4. one `create<Scheme>HttpAuthOption` factory per effective scheme
//! 5. the auth scheme provider interface
//! 6. the default auth scheme provider: a `switch` on the operation name with a
//!    case per divergent operation and a default branch
//!
//! All ordering comes from the [`DecisionProcedure`], so the output is
//! byte-identical across runs for an unchanged model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::model::ModelQuery;
use crate::parameter::ParameterSource;
use crate::procedure::{DecisionProcedure, DecisionProcedureBuilder, OperationBranch};
use crate::registry::SchemeRegistry;
use crate::resolver::{AuthSchemeMode, EffectiveSchemeSet};
use crate::scheme_id::SchemeId;
use crate::synthesizer::ResolvedOption;
use crate::writer::{string_literal, CodeSink, CodeWriter, Expression, Import};

/// Option factory emitted for one scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionFactory {
    pub scheme_id: SchemeId,
    pub function_name: String,
    pub registered: bool,
}

/// Summary of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub service_name: String,
    pub mode: AuthSchemeMode,
    pub parameters: Vec<String>,
    pub option_factories: Vec<OptionFactory>,
    pub branches: Vec<OperationBranch>,
    pub default: EffectiveSchemeSet,
}

impl GenerationReport {
    fn from_procedure(service_name: &str, procedure: &DecisionProcedure) -> Self {
        Self {
            service_name: service_name.to_string(),
            mode: procedure.mode,
            parameters: procedure.parameters.keys().cloned().collect(),
            option_factories: procedure
                .options
                .values()
                .map(|option| OptionFactory {
                    scheme_id: option.scheme_id.clone(),
                    function_name: factory_name(&option.normalized_name),
                    registered: option.registered,
                })
                .collect(),
            branches: procedure.branches.clone(),
            default: procedure.default.clone(),
        }
    }
}

fn factory_name(normalized_name: &str) -> String {
    format!("create{normalized_name}HttpAuthOption")
}

/// Generates the HTTP auth scheme provider for a service
pub struct HttpAuthSchemeProviderGenerator<'a> {
    config: &'a GeneratorConfig,
    model: &'a dyn ModelQuery,
    registry: &'a SchemeRegistry,
}

impl<'a> HttpAuthSchemeProviderGenerator<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        model: &'a dyn ModelQuery,
        registry: &'a SchemeRegistry,
    ) -> Self {
        Self {
            config,
            model,
            registry,
        }
    }

    /// Compile the decision procedure without emitting anything
    pub fn procedure(&self) -> DecisionProcedure {
        DecisionProcedureBuilder::new(self.model, self.registry)
            .with_mode(self.config.mode)
            .build()
    }

    /// Summarize what `generate` would emit
    pub fn plan(&self) -> Result<GenerationReport> {
        self.config.validate()?;
        Ok(GenerationReport::from_procedure(
            &self.config.service_name,
            &self.procedure(),
        ))
    }

    /// Emit every artifact into `sink`
    pub fn generate<S: CodeSink + ?Sized>(&self, sink: &mut S) -> Result<GenerationReport> {
        self.config.validate()?;
        let procedure = self.procedure();

        self.write_parameters_interface(sink, &procedure)?;
        sink.blank_line()?;
        self.write_parameters_provider_interface(sink)?;
        sink.blank_line()?;
        self.write_default_parameters_provider(sink, &procedure)?;
        for option in procedure.options.values() {
            sink.blank_line()?;
            self.write_option_factory(sink, option)?;
        }
        sink.blank_line()?;
        self.write_provider_interface(sink)?;
        sink.blank_line()?;
        self.write_default_provider(sink, &procedure)?;

        let report = GenerationReport::from_procedure(&self.config.service_name, &procedure);
        info!(
            service = %report.service_name,
            option_factories = report.option_factories.len(),
            branches = report.branches.len(),
            "Generated HTTP auth scheme provider"
        );
        Ok(report)
    }

    /// Generate into a fresh [`CodeWriter`] and return the rendered source
    pub fn render(&self) -> Result<String> {
        let mut writer = CodeWriter::new();
        self.generate(&mut writer)?;
        Ok(writer.finish())
    }

    fn service(&self) -> &str {
        &self.config.service_name
    }

    fn types_import(&self, symbol: &str) -> Import {
        Import::new(symbol, self.config.types_package.clone())
    }

    fn write_docs<S: CodeSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        if self.config.emit_docs {
            sink.write_line("/**")?;
            sink.write_line(" * @internal")?;
            sink.write_line(" */")?;
        }
        Ok(())
    }

    fn write_parameters_interface<S: CodeSink + ?Sized>(
        &self,
        sink: &mut S,
        procedure: &DecisionProcedure,
    ) -> Result<()> {
        sink.add_import(&self.types_import("HttpAuthSchemeParameters"));
        self.write_docs(sink)?;
        sink.open_block(&format!(
            "export interface {}HttpAuthSchemeParameters extends HttpAuthSchemeParameters {{",
            self.service()
        ))?;
        for parameter in procedure.parameters.values() {
            sink.write_line(&format!("{}?: {};", parameter.name(), parameter.type_expr()))?;
        }
        sink.close_block("}")
    }

    fn write_parameters_provider_interface<S: CodeSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let resolved = self.config.resolved_config_type();
        sink.add_import(&self.types_import("HttpAuthSchemeParametersProvider"));
        sink.add_import(&Import::new(
            resolved.clone(),
            self.config.resolved_config_module(),
        ));
        self.write_docs(sink)?;
        sink.write_line(&format!(
            "export interface {s}HttpAuthSchemeParametersProvider extends \
             HttpAuthSchemeParametersProvider<{resolved}, {s}HttpAuthSchemeParameters> {{}}",
            s = self.service()
        ))
    }

    fn write_default_parameters_provider<S: CodeSink + ?Sized>(
        &self,
        sink: &mut S,
        procedure: &DecisionProcedure,
    ) -> Result<()> {
        let middleware = &self.config.middleware_package;
        self.write_docs(sink)?;
        sink.open_block(&format!(
            "export const default{s}HttpAuthSchemeParametersProvider: \
             {s}HttpAuthSchemeParametersProvider = async (config, context, input) => {{",
            s = self.service()
        ))?;
        sink.open_block("return {")?;
        let operation = ParameterSource::ContextOperation.render(middleware);
        sink.write_expression("operation: ", &operation, ",")?;
        for parameter in procedure.parameters.values() {
            let value = parameter.source().render(middleware);
            sink.write_expression(&format!("{}: ", parameter.name()), &value, ",")?;
        }
        sink.close_block("};")?;
        sink.close_block("};")
    }

    fn write_option_factory<S: CodeSink + ?Sized>(
        &self,
        sink: &mut S,
        option: &ResolvedOption,
    ) -> Result<()> {
        sink.add_import(&self.types_import("HttpAuthOption"));
        sink.open_block(&format!(
            "function {}(authParameters: {}HttpAuthSchemeParameters): HttpAuthOption {{",
            factory_name(&option.normalized_name),
            self.service()
        ))?;
        sink.open_block("return {")?;
        sink.write_line(&format!(
            "schemeId: {},",
            string_literal(option.scheme_id.as_str())
        ))?;
        write_properties(sink, "identityProperties", &option.identity_properties)?;
        write_properties(sink, "signingProperties", &option.signing_properties)?;
        sink.close_block("};")?;
        sink.close_block("};")
    }

    fn write_provider_interface<S: CodeSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.add_import(&self.types_import("HttpAuthSchemeProvider"));
        self.write_docs(sink)?;
        sink.write_line(&format!(
            "export interface {s}HttpAuthSchemeProvider extends \
             HttpAuthSchemeProvider<{s}HttpAuthSchemeParameters> {{}}",
            s = self.service()
        ))
    }

    fn write_default_provider<S: CodeSink + ?Sized>(
        &self,
        sink: &mut S,
        procedure: &DecisionProcedure,
    ) -> Result<()> {
        sink.add_import(&self.types_import("HttpAuthOption"));
        self.write_docs(sink)?;
        sink.open_block(&format!(
            "export const default{s}HttpAuthSchemeProvider: {s}HttpAuthSchemeProvider = \
             (authParameters) => {{",
            s = self.service()
        ))?;
        sink.write_line("const options: HttpAuthOption[] = [];")?;
        sink.open_block("switch (authParameters.operation) {")?;
        for branch in &procedure.branches {
            sink.open_block(&format!("case {}: {{", string_literal(&branch.operation)))?;
            write_pushes(sink, procedure, &branch.schemes)?;
            sink.write_line("break;")?;
            sink.close_block("};")?;
        }
        sink.open_block("default: {")?;
        write_pushes(sink, procedure, &procedure.default)?;
        sink.close_block("};")?;
        sink.close_block("};")?;
        sink.write_line("return options;")?;
        sink.close_block("};")
    }
}

fn write_properties<S: CodeSink + ?Sized>(
    sink: &mut S,
    label: &str,
    properties: &IndexMap<String, Expression>,
) -> Result<()> {
    if properties.is_empty() {
        return Ok(());
    }
    sink.open_block(&format!("{label}: {{"))?;
    for (name, value) in properties {
        sink.write_expression(&format!("{name}: "), value, ",")?;
    }
    sink.close_block("},")
}

fn write_pushes<S: CodeSink + ?Sized>(
    sink: &mut S,
    procedure: &DecisionProcedure,
    schemes: &EffectiveSchemeSet,
) -> Result<()> {
    for id in schemes {
        // Every effective scheme has an option; fall back to the ID-derived name regardless
        let name = procedure
            .options
            .get(id)
            .map_or_else(|| id.normalized_name(), |o| o.normalized_name.clone());
        sink.write_line(&format!(
            "options.push({}(authParameters));",
            factory_name(&name)
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthTrait, OperationShape, ServiceModel, ServiceShape};

    fn weather() -> ServiceModel {
        ServiceModel::new(
            ServiceShape::new("example.weather#Weather")
                .with_trait(
                    AuthTrait::new(SchemeId::http_api_key_auth())
                        .with_value("name", "X-Api-Key")
                        .with_value("in", "header"),
                )
                .with_operation(OperationShape::new("example.weather#GetForecast"))
                .with_operation(OperationShape::new("example.weather#Ping").with_optional_auth()),
        )
        .unwrap()
    }

    const EXPECTED: &str = r#"import { WeatherClientResolvedConfig } from "../WeatherClient";
import { HttpApiKeyAuthLocation, HttpAuthOption, HttpAuthSchemeParameters, HttpAuthSchemeParametersProvider, HttpAuthSchemeProvider } from "@smithy/types";
import { getSmithyContext, normalizeProvider } from "@smithy/util-middleware";

/**
 * @internal
 */
export interface WeatherHttpAuthSchemeParameters extends HttpAuthSchemeParameters {
  region?: string;
}

/**
 * @internal
 */
export interface WeatherHttpAuthSchemeParametersProvider extends HttpAuthSchemeParametersProvider<WeatherClientResolvedConfig, WeatherHttpAuthSchemeParameters> {}

/**
 * @internal
 */
export const defaultWeatherHttpAuthSchemeParametersProvider: WeatherHttpAuthSchemeParametersProvider = async (config, context, input) => {
  return {
    operation: getSmithyContext(context).operation as string,
    region: await normalizeProvider(config.region)(),
  };
};

function createSmithyApiHttpApiKeyAuthHttpAuthOption(authParameters: WeatherHttpAuthSchemeParameters): HttpAuthOption {
  return {
    schemeId: "smithy.api#httpApiKeyAuth",
    signingProperties: {
      name: "X-Api-Key",
      in: HttpApiKeyAuthLocation.HEADER,
      scheme: "",
    },
  };
};

function createSmithyApiNoAuthHttpAuthOption(authParameters: WeatherHttpAuthSchemeParameters): HttpAuthOption {
  return {
    schemeId: "smithy.api#noAuth",
  };
};

/**
 * @internal
 */
export interface WeatherHttpAuthSchemeProvider extends HttpAuthSchemeProvider<WeatherHttpAuthSchemeParameters> {}

/**
 * @internal
 */
export const defaultWeatherHttpAuthSchemeProvider: WeatherHttpAuthSchemeProvider = (authParameters) => {
  const options: HttpAuthOption[] = [];
  switch (authParameters.operation) {
    case "Ping": {
      options.push(createSmithyApiHttpApiKeyAuthHttpAuthOption(authParameters));
      options.push(createSmithyApiNoAuthHttpAuthOption(authParameters));
      break;
    };
    default: {
      options.push(createSmithyApiHttpApiKeyAuthHttpAuthOption(authParameters));
    };
  };
  return options;
};
"#;

    #[test]
    fn test_render_full_provider() {
        let config = GeneratorConfig::new("Weather");
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = weather();
        let generator = HttpAuthSchemeProviderGenerator::new(&config, &model, &registry);

        assert_eq!(generator.render().unwrap(), EXPECTED);
    }

    #[test]
    fn test_report_lists_factories_and_branches() {
        let config = GeneratorConfig::new("Weather");
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = weather();
        let generator = HttpAuthSchemeProviderGenerator::new(&config, &model, &registry);

        let mut writer = CodeWriter::new();
        let report = generator.generate(&mut writer).unwrap();

        let factories: Vec<_> = report
            .option_factories
            .iter()
            .map(|f| f.function_name.as_str())
            .collect();
        assert_eq!(
            factories,
            vec![
                "createSmithyApiHttpApiKeyAuthHttpAuthOption",
                "createSmithyApiNoAuthHttpAuthOption"
            ]
        );
        assert_eq!(report.branches.len(), 1);
        assert_eq!(report.branches[0].operation, "Ping");
        // sigv4 is registered but unused and still contributes its parameter
        assert_eq!(report.parameters, vec!["region".to_string()]);
        assert_eq!(report, generator.plan().unwrap());
    }

    #[test]
    fn test_parameters_are_emitted_after_operation() {
        let config = GeneratorConfig::new("Weather").with_emit_docs(false);
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = ServiceModel::new(
            ServiceShape::new("example.weather#Weather")
                .with_trait(AuthTrait::new(SchemeId::sigv4()).with_value("name", "weather")),
        )
        .unwrap();
        let generator = HttpAuthSchemeProviderGenerator::new(&config, &model, &registry);

        let out = generator.render().unwrap();
        assert!(out.contains(
            "export interface WeatherHttpAuthSchemeParameters extends HttpAuthSchemeParameters {\n  region?: string;\n}\n"
        ));
        assert!(out.contains(
            "    operation: getSmithyContext(context).operation as string,\n    region: await normalizeProvider(config.region)(),\n"
        ));
        assert!(out.contains("import { getSmithyContext, normalizeProvider } from \"@smithy/util-middleware\";"));
        assert!(out.contains("      name: \"weather\",\n      region: authParameters.region,\n"));
        assert!(!out.contains("@internal"));
    }

    #[test]
    fn test_invalid_config_fails_before_emitting() {
        let config = GeneratorConfig::default();
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = weather();
        let generator = HttpAuthSchemeProviderGenerator::new(&config, &model, &registry);

        let mut writer = CodeWriter::new();
        assert!(generator.generate(&mut writer).is_err());
        assert_eq!(writer.finish(), "");
    }
}
