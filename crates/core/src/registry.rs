//! Auth Scheme Registry
//!
//! Holds every auth scheme the generator knows how to emit properties for.
//! Schemes are registered explicitly at startup, either one by one or through
//! an [`AuthSchemeIntegration`] that contributes a batch.
//!
//! Design decisions:
//! - Descriptors are immutable once constructed; registration is the only mutation
//! - Lookup misses are normal: a scheme referenced by the model but not registered
//!   still gets an option, just without properties
//! - Registration order is kept so parameter collection is deterministic

use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AuthGenError, Result};
use crate::parameter::SchemeParameter;
use crate::property::{OptionProperty, PropertyCategory};
use crate::scheme_id::SchemeId;
use crate::schemes::BuiltinSchemes;

// ============================================================================
// AuthScheme
// ============================================================================

/// Descriptor of an auth scheme: which trait configures it, which parameters it
/// needs, and which identity/signing properties its options carry.
#[derive(Debug, Clone)]
pub struct AuthScheme {
    scheme_id: SchemeId,
    trait_id: SchemeId,
    parameters: Vec<SchemeParameter>,
    properties: Vec<OptionProperty>,
}

impl AuthScheme {
    /// Create a descriptor whose trait ID equals its scheme ID
    pub fn new(scheme_id: SchemeId) -> Result<Self> {
        let scheme_id = SchemeId::parse(scheme_id.as_str())
            .map_err(|e| AuthGenError::config(format!("auth scheme: {e}")))?;
        Ok(Self {
            trait_id: scheme_id.clone(),
            scheme_id,
            parameters: Vec::new(),
            properties: Vec::new(),
        })
    }

    /// Use a different trait to configure this scheme
    pub fn with_trait_id(mut self, trait_id: SchemeId) -> Self {
        self.trait_id = trait_id;
        self
    }

    /// Declare a parameter; redeclaring a name replaces it in place
    pub fn with_parameter(mut self, parameter: SchemeParameter) -> Self {
        let existing = self
            .parameters
            .iter()
            .position(|p| p.name() == parameter.name());
        if let Some(index) = existing {
            warn!(
                scheme_id = %self.scheme_id,
                parameter = %parameter.name(),
                "Scheme parameter declared twice; later declaration wins"
            );
            self.parameters[index] = parameter;
        } else {
            self.parameters.push(parameter);
        }
        self
    }

    /// Declare an option property; redeclaring a name within a category replaces it in place
    pub fn with_property(mut self, property: OptionProperty) -> Self {
        let existing = self
            .properties
            .iter()
            .position(|p| p.name() == property.name() && p.category() == property.category());
        if let Some(index) = existing {
            warn!(
                scheme_id = %self.scheme_id,
                property = %property.name(),
                category = %property.category(),
                "Option property declared twice; later declaration wins"
            );
            self.properties[index] = property;
        } else {
            self.properties.push(property);
        }
        self
    }

    pub fn scheme_id(&self) -> &SchemeId {
        &self.scheme_id
    }

    pub fn trait_id(&self) -> &SchemeId {
        &self.trait_id
    }

    pub fn parameters(&self) -> &[SchemeParameter] {
        &self.parameters
    }

    pub fn properties(&self) -> &[OptionProperty] {
        &self.properties
    }

    /// Properties of one category, in declaration order
    pub fn properties_by_category(&self, category: PropertyCategory) -> Vec<&OptionProperty> {
        self.properties
            .iter()
            .filter(|p| p.category() == category)
            .collect()
    }
}

// ============================================================================
// AuthSchemeIntegration Trait
// ============================================================================

/// A plug-in contributing auth scheme descriptors.
///
/// # Example
///
/// ```
/// use authgen_core::{AuthScheme, AuthSchemeIntegration, Result, SchemeId, SchemeRegistry};
///
/// struct WeatherIntegration;
///
/// impl AuthSchemeIntegration for WeatherIntegration {
///     fn name(&self) -> &str {
///         "weather"
///     }
///
///     fn auth_schemes(&self) -> Result<Vec<AuthScheme>> {
///         Ok(vec![AuthScheme::new(SchemeId::new("example.weather#token"))?])
///     }
/// }
///
/// let registry = SchemeRegistry::builder()
///     .integration(&WeatherIntegration)
///     .unwrap()
///     .build();
/// assert!(registry.has(&SchemeId::new("example.weather#token")));
/// ```
pub trait AuthSchemeIntegration {
    /// Integration name, used in diagnostics
    fn name(&self) -> &str;

    /// Descriptors this integration supports
    fn auth_schemes(&self) -> Result<Vec<AuthScheme>>;
}

// ============================================================================
// Scheme Registry
// ============================================================================

/// Read-only lookup of auth scheme descriptors by scheme ID.
///
/// # Example
///
/// ```
/// use authgen_core::{SchemeId, SchemeRegistry};
///
/// let registry = SchemeRegistry::with_builtins()?;
///
/// if let Some(scheme) = registry.lookup(&SchemeId::sigv4()) {
///     println!("{} needs {} parameter(s)", scheme.scheme_id(), scheme.parameters().len());
/// }
/// assert!(registry.lookup(&SchemeId::new("example#unknown")).is_none());
/// # Ok::<(), authgen_core::AuthGenError>(())
/// ```
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    schemes: IndexMap<SchemeId, Arc<AuthScheme>>,
}

impl SchemeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            schemes: IndexMap::new(),
        }
    }

    /// Create a registry with all built-in schemes registered
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_integration(&BuiltinSchemes)?;
        Ok(registry)
    }

    /// Register a scheme; a later registration for the same ID replaces the earlier one
    pub fn register(&mut self, scheme: AuthScheme) {
        let id = scheme.scheme_id().clone();
        if self.schemes.contains_key(&id) {
            warn!(scheme_id = %id, "Auth scheme registered twice; later registration wins");
        }
        debug!(scheme_id = %id, "Registered auth scheme");
        self.schemes.insert(id, Arc::new(scheme));
    }

    /// Register every scheme an integration contributes
    pub fn register_integration(&mut self, integration: &dyn AuthSchemeIntegration) -> Result<()> {
        let schemes = integration.auth_schemes().map_err(|e| {
            AuthGenError::config(format!("integration '{}': {e}", integration.name()))
        })?;
        for scheme in schemes {
            self.register(scheme);
        }
        Ok(())
    }

    /// Get a scheme by ID
    pub fn lookup(&self, id: &SchemeId) -> Option<&Arc<AuthScheme>> {
        self.schemes.get(id)
    }

    /// Check if a scheme is registered
    pub fn has(&self, id: &SchemeId) -> bool {
        self.schemes.contains_key(id)
    }

    /// All registered schemes, in registration order
    pub fn list(&self) -> impl Iterator<Item = &AuthScheme> {
        self.schemes.values().map(|s| s.as_ref())
    }

    /// Get the number of registered schemes
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Create a builder for fluent registration
    pub fn builder() -> SchemeRegistryBuilder {
        SchemeRegistryBuilder::new()
    }
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<_> = self.schemes.keys().map(SchemeId::as_str).collect();
        f.debug_struct("SchemeRegistry")
            .field("schemes", &ids)
            .finish()
    }
}

/// Builder for creating a SchemeRegistry with a fluent API
pub struct SchemeRegistryBuilder {
    registry: SchemeRegistry,
}

impl SchemeRegistryBuilder {
    /// Create a new builder with an empty registry
    pub fn new() -> Self {
        Self {
            registry: SchemeRegistry::new(),
        }
    }

    /// Create a new builder with built-in schemes
    pub fn with_builtins() -> Result<Self> {
        Ok(Self {
            registry: SchemeRegistry::with_builtins()?,
        })
    }

    /// Add a scheme
    pub fn scheme(mut self, scheme: AuthScheme) -> Self {
        self.registry.register(scheme);
        self
    }

    /// Add every scheme of an integration
    pub fn integration(mut self, integration: &dyn AuthSchemeIntegration) -> Result<Self> {
        self.registry.register_integration(integration)?;
        Ok(self)
    }

    /// Build the registry
    pub fn build(self) -> SchemeRegistry {
        self.registry
    }
}

impl Default for SchemeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
