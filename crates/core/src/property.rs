// Auth option properties
//
// An option property is one entry of the `identityProperties` or `signingProperties`
// object on a generated auth option. Each property names where its value comes from:
// the scheme's trait instance, the auth parameter bag, or a constant.
//
// Design: sources are a closed set of tagged variants plus one escape hatch
// (`Computed`, a plain function pointer). Every variant tolerates an absent trait.

use serde::{Deserialize, Serialize};

use crate::error::{AuthGenError, Result};
use crate::model::AuthTrait;
use crate::writer::{Expression, Import};

/// Function computing a property value from an optional trait instance
pub type SourceFn = fn(Option<&AuthTrait>) -> Expression;

/// Which property object an option property is emitted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyCategory {
    /// Emitted into `identityProperties`
    Identity,
    /// Emitted into `signingProperties`
    Signing,
}

impl std::fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyCategory::Identity => write!(f, "identity"),
            PropertyCategory::Signing => write!(f, "signing"),
        }
    }
}

/// Where an option property's value comes from
#[derive(Clone)]
pub enum PropertySource {
    /// Constant expression; the trait is ignored
    Literal(Expression),

    /// Reads string member `field` from the trait and quotes it.
    /// Absent trait or member: quoted `default`, or `undefined` without one.
    TraitString {
        field: String,
        default: Option<String>,
    },

    /// Reads string member `field` and renders it as `EnumType.UPPER_VALUE`.
    /// Absent trait or member: `EnumType.<default>`.
    TraitEnum {
        field: String,
        enum_type: String,
        import_from: String,
        default: String,
    },

    /// `authParameters.<name>`, sourced from execution context; never reads the trait
    AuthParameter(String),

    /// Anything else, as an explicit function value
    Computed(SourceFn),
}

impl PropertySource {
    /// Constant expression
    pub fn literal(code: impl Into<String>) -> Self {
        PropertySource::Literal(Expression::raw(code))
    }

    /// Trait string member with an optional default
    pub fn trait_string(field: impl Into<String>, default: Option<&str>) -> Self {
        PropertySource::TraitString {
            field: field.into(),
            default: default.map(str::to_string),
        }
    }

    /// Trait enum member
    pub fn trait_enum(
        field: impl Into<String>,
        enum_type: impl Into<String>,
        import_from: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        PropertySource::TraitEnum {
            field: field.into(),
            enum_type: enum_type.into(),
            import_from: import_from.into(),
            default: default.into(),
        }
    }

    /// Auth parameter reference
    pub fn auth_parameter(name: impl Into<String>) -> Self {
        PropertySource::AuthParameter(name.into())
    }

    /// Produce the value expression for an (optional) trait instance
    pub fn resolve(&self, auth_trait: Option<&AuthTrait>) -> Expression {
        match self {
            PropertySource::Literal(expr) => expr.clone(),
            PropertySource::TraitString { field, default } => {
                match auth_trait.and_then(|t| t.string(field)) {
                    Some(value) => Expression::string(value),
                    None => default
                        .as_deref()
                        .map_or_else(Expression::undefined, Expression::string),
                }
            }
            PropertySource::TraitEnum {
                field,
                enum_type,
                import_from,
                default,
            } => {
                let variant = auth_trait
                    .and_then(|t| t.string(field))
                    .map_or_else(|| default.clone(), str::to_uppercase);
                Expression::raw(format!("{enum_type}.{variant}"))
                    .with_import(Import::new(enum_type.clone(), import_from.clone()))
            }
            PropertySource::AuthParameter(name) => {
                Expression::raw(format!("authParameters.{name}"))
            }
            PropertySource::Computed(source) => source(auth_trait),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            PropertySource::TraitString { field, .. } => require("field", field),
            PropertySource::TraitEnum {
                field,
                enum_type,
                import_from,
                default,
            } => {
                require("field", field)?;
                require("enum_type", enum_type)?;
                require("import_from", import_from)?;
                require("default", default)
            }
            PropertySource::AuthParameter(name) => require("parameter name", name),
            PropertySource::Literal(expr) => require("literal", &expr.code),
            PropertySource::Computed(_) => Ok(()),
        }
    }
}

impl std::fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertySource::Literal(expr) => f.debug_tuple("Literal").field(&expr.code).finish(),
            PropertySource::TraitString { field, default } => f
                .debug_struct("TraitString")
                .field("field", field)
                .field("default", default)
                .finish(),
            PropertySource::TraitEnum {
                field,
                enum_type,
                default,
                ..
            } => f
                .debug_struct("TraitEnum")
                .field("field", field)
                .field("enum_type", enum_type)
                .field("default", default)
                .finish(),
            PropertySource::AuthParameter(name) => {
                f.debug_tuple("AuthParameter").field(name).finish()
            }
            PropertySource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

pub(crate) fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuthGenError::config(format!("{what} is required")));
    }
    Ok(())
}

/// A named identity or signing property of an auth option
#[derive(Debug, Clone)]
pub struct OptionProperty {
    name: String,
    category: PropertyCategory,
    source: PropertySource,
}

impl OptionProperty {
    /// Create a validated option property
    pub fn new(
        name: impl Into<String>,
        category: PropertyCategory,
        source: PropertySource,
    ) -> Result<Self> {
        let name = name.into();
        require("option property name", &name)?;
        source
            .validate()
            .map_err(|e| AuthGenError::config(format!("option property '{name}': {e}")))?;
        Ok(Self {
            name,
            category,
            source,
        })
    }

    /// Identity property shorthand
    pub fn identity(name: impl Into<String>, source: PropertySource) -> Result<Self> {
        Self::new(name, PropertyCategory::Identity, source)
    }

    /// Signing property shorthand
    pub fn signing(name: impl Into<String>, source: PropertySource) -> Result<Self> {
        Self::new(name, PropertyCategory::Signing, source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> PropertyCategory {
        self.category
    }

    pub fn source(&self) -> &PropertySource {
        &self.source
    }

    /// Value expression for this property given the scheme's trait instance
    pub fn resolve(&self, auth_trait: Option<&AuthTrait>) -> Expression {
        self.source.resolve(auth_trait)
    }
}
