// Service model snapshot
//
// The generator never walks a full API model. It only needs the service shape,
// its operations, the auth traits attached to them, and the per-shape auth
// overrides. These types hold exactly that, and the `Shape` / `ModelQuery`
// traits are the seam any other model loader plugs into.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{AuthGenError, Result};
use crate::scheme_id::SchemeId;

/// An auth scheme trait instance attached to a shape (the scheme's configuration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTrait {
    /// Trait identifier, equal to the scheme ID it configures
    pub id: SchemeId,

    /// Trait members as declared in the model
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl AuthTrait {
    /// Create a trait instance with no members
    pub fn new(id: SchemeId) -> Self {
        Self {
            id,
            values: Map::new(),
        }
    }

    /// Add a string member
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Read a member as a string, if present and a string
    pub fn string(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    /// Check if a member is present
    pub fn has(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }
}

/// Common view over service and operation shapes
pub trait Shape {
    /// Shape ID (`namespace#Name`)
    fn id(&self) -> &str;

    /// Ordered auth override declared on this shape, if any
    fn auth_override(&self) -> Option<&[SchemeId]>;

    /// Whether this shape permits unauthenticated access
    fn permits_unauthenticated(&self) -> bool;

    /// Auth traits attached to this shape, in declaration order
    fn auth_traits(&self) -> &[AuthTrait];

    /// Find an attached trait by its identifier
    fn find_trait(&self, trait_id: &SchemeId) -> Option<&AuthTrait> {
        self.auth_traits().iter().find(|t| &t.id == trait_id)
    }

    /// Member name of the shape ID (after `#`)
    fn name(&self) -> &str {
        let id = self.id();
        id.split_once('#').map_or(id, |(_, name)| name)
    }
}

/// Operation shape bound to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationShape {
    pub id: String,

    #[serde(default)]
    pub traits: Vec<AuthTrait>,

    /// Replaces the inherited scheme list entirely when present
    #[serde(default)]
    pub auth: Option<Vec<SchemeId>>,

    #[serde(default)]
    pub optional_auth: bool,
}

impl OperationShape {
    /// Create an operation that inherits the service auth
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            traits: Vec::new(),
            auth: None,
            optional_auth: false,
        }
    }

    /// Set the auth override
    pub fn with_auth(mut self, auth: impl IntoIterator<Item = SchemeId>) -> Self {
        self.auth = Some(auth.into_iter().collect());
        self
    }

    /// Mark the operation as permitting unauthenticated access
    pub fn with_optional_auth(mut self) -> Self {
        self.optional_auth = true;
        self
    }
}

impl Shape for OperationShape {
    fn id(&self) -> &str {
        &self.id
    }

    fn auth_override(&self) -> Option<&[SchemeId]> {
        self.auth.as_deref()
    }

    fn permits_unauthenticated(&self) -> bool {
        self.optional_auth
    }

    fn auth_traits(&self) -> &[AuthTrait] {
        &self.traits
    }
}

/// Service shape with its auth traits and operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceShape {
    pub id: String,

    /// Auth traits in declaration (priority) order
    #[serde(default)]
    pub traits: Vec<AuthTrait>,

    /// Priority override for the declared traits
    #[serde(default)]
    pub auth: Option<Vec<SchemeId>>,

    #[serde(default)]
    pub optional_auth: bool,

    #[serde(default)]
    pub operations: Vec<OperationShape>,
}

impl ServiceShape {
    /// Create a service with no auth and no operations
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            traits: Vec::new(),
            auth: None,
            optional_auth: false,
            operations: Vec::new(),
        }
    }

    /// Attach an auth trait
    pub fn with_trait(mut self, auth_trait: AuthTrait) -> Self {
        self.traits.push(auth_trait);
        self
    }

    /// Set the auth priority override
    pub fn with_auth(mut self, auth: impl IntoIterator<Item = SchemeId>) -> Self {
        self.auth = Some(auth.into_iter().collect());
        self
    }

    /// Mark the service as permitting unauthenticated access
    pub fn with_optional_auth(mut self) -> Self {
        self.optional_auth = true;
        self
    }

    /// Add an operation
    pub fn with_operation(mut self, operation: OperationShape) -> Self {
        self.operations.push(operation);
        self
    }
}

impl Shape for ServiceShape {
    fn id(&self) -> &str {
        &self.id
    }

    fn auth_override(&self) -> Option<&[SchemeId]> {
        self.auth.as_deref()
    }

    fn permits_unauthenticated(&self) -> bool {
        self.optional_auth
    }

    fn auth_traits(&self) -> &[AuthTrait] {
        &self.traits
    }
}

/// Read-only queries the resolver and synthesizer need from a model
pub trait ModelQuery {
    /// The service being generated
    fn service(&self) -> &dyn Shape;

    /// Operations bound to the service, in model order
    fn operations(&self) -> Vec<&dyn Shape>;

    /// Trait instance attached to `shape` for the given trait ID
    fn trait_instance<'a>(&self, shape: &'a dyn Shape, trait_id: &SchemeId) -> Option<&'a AuthTrait> {
        shape.find_trait(trait_id)
    }
}

/// Immutable model snapshot for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceModel {
    pub service: ServiceShape,
}

impl ServiceModel {
    /// Wrap a service shape, validating it
    pub fn new(service: ServiceShape) -> Result<Self> {
        let model = Self { service };
        model.validate()?;
        Ok(model)
    }

    /// Reject snapshots the generator cannot emit deterministically
    pub fn validate(&self) -> Result<()> {
        if self.service.id.trim().is_empty() {
            return Err(AuthGenError::model("service id must not be empty"));
        }

        let mut seen = HashSet::new();
        for operation in &self.service.operations {
            if !seen.insert(operation.id.as_str()) {
                return Err(AuthGenError::model(format!(
                    "duplicate operation id: {}",
                    operation.id
                )));
            }
        }

        // Operations are keyed by member name in the generated switch
        let mut names = HashSet::new();
        for operation in &self.service.operations {
            if !names.insert(operation.name()) {
                return Err(AuthGenError::model(format!(
                    "duplicate operation name: {}",
                    operation.name()
                )));
            }
        }

        Ok(())
    }
}

impl ModelQuery for ServiceModel {
    fn service(&self) -> &dyn Shape {
        &self.service
    }

    fn operations(&self) -> Vec<&dyn Shape> {
        self.service
            .operations
            .iter()
            .map(|op| op as &dyn Shape)
            .collect()
    }
}
