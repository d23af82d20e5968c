// Auth scheme parameters
//
// A scheme parameter is a field of the generated parameter bag: the inputs the
// provider receives besides the operation name. Schemes declare them, and the
// collector merges every declaration into one ordered map keyed by name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AuthGenError, Result};
use crate::property::require;
use crate::registry::AuthScheme;
use crate::scheme_id::SchemeId;
use crate::writer::{Expression, Import};

/// Field that every parameter bag carries, populated from execution context
pub const OPERATION_PARAMETER: &str = "operation";

/// How the default parameters provider populates a parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParameterSource {
    /// `await normalizeProvider(config.<field>)()`
    ConfigProvider(String),
    /// `config.<field>`
    ConfigField(String),
    /// Name of the operation currently executing
    ContextOperation,
    /// Raw expression
    Expression(String),
}

impl ParameterSource {
    /// Value expression written into the default parameters provider
    pub fn render(&self, middleware_package: &str) -> Expression {
        match self {
            ParameterSource::ConfigProvider(field) => {
                Expression::raw(format!("await normalizeProvider(config.{field})()"))
                    .with_import(Import::new("normalizeProvider", middleware_package))
            }
            ParameterSource::ConfigField(field) => Expression::raw(format!("config.{field}")),
            ParameterSource::ContextOperation => {
                Expression::raw("getSmithyContext(context).operation as string")
                    .with_import(Import::new("getSmithyContext", middleware_package))
            }
            ParameterSource::Expression(code) => Expression::raw(code.clone()),
        }
    }
}

/// A named, typed input of the auth scheme provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeParameter {
    name: String,
    type_expr: String,
    source: ParameterSource,
}

impl SchemeParameter {
    /// Create a validated scheme parameter
    pub fn new(
        name: impl Into<String>,
        type_expr: impl Into<String>,
        source: ParameterSource,
    ) -> Result<Self> {
        let name = name.into();
        let type_expr = type_expr.into();
        require("scheme parameter name", &name)?;
        require("scheme parameter type", &type_expr)
            .map_err(|e| AuthGenError::config(format!("scheme parameter '{name}': {e}")))?;
        if name == OPERATION_PARAMETER {
            return Err(AuthGenError::config(format!(
                "scheme parameter '{name}' is reserved"
            )));
        }
        match &source {
            ParameterSource::ConfigProvider(field) | ParameterSource::ConfigField(field) => {
                require("config field", field)
            }
            ParameterSource::Expression(code) => require("expression", code),
            ParameterSource::ContextOperation => Ok(()),
        }
        .map_err(|e| AuthGenError::config(format!("scheme parameter '{name}': {e}")))?;

        Ok(Self {
            name,
            type_expr,
            source,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_expr(&self) -> &str {
        &self.type_expr
    }

    pub fn source(&self) -> &ParameterSource {
        &self.source
    }
}

/// Merge parameters declared across schemes into one ordered map.
///
/// Names are unique; order is the first time each name was seen. When two
/// schemes declare the same name, the later declaration replaces the earlier one
/// in place and a warning is logged.
pub fn collect_parameters<'a>(
    schemes: impl IntoIterator<Item = &'a AuthScheme>,
) -> IndexMap<String, SchemeParameter> {
    let mut merged: IndexMap<String, SchemeParameter> = IndexMap::new();
    let mut declared_by: IndexMap<String, SchemeId> = IndexMap::new();

    for scheme in schemes {
        for parameter in scheme.parameters() {
            if let Some(previous) = merged.get(parameter.name()) {
                if previous != parameter {
                    warn!(
                        parameter = %parameter.name(),
                        previous_scheme = %declared_by[parameter.name()],
                        scheme_id = %scheme.scheme_id(),
                        "Auth scheme parameter redeclared; later declaration wins"
                    );
                }
            }
            // IndexMap::insert keeps the original position of an existing key
            merged.insert(parameter.name().to_string(), parameter.clone());
            declared_by.insert(parameter.name().to_string(), scheme.scheme_id().clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(source: ParameterSource) -> SchemeParameter {
        SchemeParameter::new("region", "string", source).unwrap()
    }

    #[test]
    fn test_render_sources() {
        let pkg = "@smithy/util-middleware";
        let expr = ParameterSource::ConfigProvider("region".into()).render(pkg);
        assert_eq!(expr.code, "await normalizeProvider(config.region)()");
        assert_eq!(expr.imports, vec![Import::new("normalizeProvider", pkg)]);

        assert_eq!(
            ParameterSource::ConfigField("endpoint".into()).render(pkg).code,
            "config.endpoint"
        );
        assert_eq!(
            ParameterSource::ContextOperation.render(pkg).code,
            "getSmithyContext(context).operation as string"
        );
        assert_eq!(
            ParameterSource::Expression("\"x\"".into()).render(pkg).code,
            "\"x\""
        );
    }

    #[test]
    fn test_parameter_validation() {
        assert!(SchemeParameter::new("", "string", ParameterSource::ContextOperation).is_err());
        assert!(SchemeParameter::new("region", "", ParameterSource::ContextOperation).is_err());
        assert!(SchemeParameter::new(
            "operation",
            "string",
            ParameterSource::ContextOperation
        )
        .is_err());
        assert!(
            SchemeParameter::new("region", "string", ParameterSource::ConfigField(" ".into()))
                .is_err()
        );
    }

    #[test]
    fn test_collect_dedups_by_name_last_wins() {
        let first = AuthScheme::new(SchemeId::new("a#first"))
            .unwrap()
            .with_parameter(region(ParameterSource::ConfigField("region".into())));
        let second = AuthScheme::new(SchemeId::new("b#second"))
            .unwrap()
            .with_parameter(region(ParameterSource::ConfigProvider("region".into())));

        let merged = collect_parameters([&first, &second]);

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged["region"].source(),
            &ParameterSource::ConfigProvider("region".into())
        );
    }

    #[test]
    fn test_collect_preserves_first_registration_order() {
        let param = |name: &str| {
            SchemeParameter::new(name, "string", ParameterSource::ConfigField(name.into()))
                .unwrap()
        };
        let first = AuthScheme::new(SchemeId::new("a#first"))
            .unwrap()
            .with_parameter(param("zeta"))
            .with_parameter(param("alpha"));
        let second = AuthScheme::new(SchemeId::new("b#second"))
            .unwrap()
            .with_parameter(param("mid"))
            .with_parameter(param("zeta"));

        let merged = collect_parameters([&first, &second]);
        let names: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_collect_empty() {
        let merged = collect_parameters(std::iter::empty::<&AuthScheme>());
        assert!(merged.is_empty());
    }
}
