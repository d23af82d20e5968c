// Effective auth scheme resolution
//
// Computes, for the service and for each operation, the ordered list of schemes
// a client should try. Rules, applied per shape:
// 1. The service starts from its auth traits in declaration order.
// 2. An `auth` override on the shape replaces the inherited list entirely.
//    Operations without an override inherit the service's effective set.
// 3. In no-auth-aware mode a shape permitting unauthenticated access gets the
//    reserved noAuth scheme appended (once). Standard mode never yields noAuth.
//
// An operation whose effective set equals the service set, compared as an
// ordered sequence, needs no dedicated branch in the generated provider.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{ModelQuery, Shape};
use crate::scheme_id::SchemeId;

/// Whether "no authentication" participates in resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthSchemeMode {
    /// noAuth is filtered out
    Standard,
    /// noAuth is a first-class candidate
    #[default]
    NoAuthAware,
}

impl std::fmt::Display for AuthSchemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthSchemeMode::Standard => write!(f, "standard"),
            AuthSchemeMode::NoAuthAware => write!(f, "no_auth_aware"),
        }
    }
}

/// Ordered, duplicate-free list of scheme IDs.
///
/// Equality is sequence equality: the same schemes in a different order are a
/// different set. Deserialization goes through `from_ordered`, so duplicates in
/// the input are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SchemeId>", into = "Vec<SchemeId>")]
pub struct EffectiveSchemeSet(Vec<SchemeId>);

impl EffectiveSchemeSet {
    /// Build from an ordered list, keeping the first occurrence of each ID
    pub fn from_ordered(ids: impl IntoIterator<Item = SchemeId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            set.push(id);
        }
        set
    }

    /// Append an ID unless already present
    fn push(&mut self, id: SchemeId) {
        if !self.0.contains(&id) {
            self.0.push(id);
        }
    }

    pub fn contains(&self, id: &SchemeId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemeId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SchemeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SchemeId>> for EffectiveSchemeSet {
    fn from(ids: Vec<SchemeId>) -> Self {
        Self::from_ordered(ids)
    }
}

impl From<EffectiveSchemeSet> for Vec<SchemeId> {
    fn from(set: EffectiveSchemeSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a EffectiveSchemeSet {
    type Item = &'a SchemeId;
    type IntoIter = std::slice::Iter<'a, SchemeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for EffectiveSchemeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<_> = self.0.iter().map(SchemeId::as_str).collect();
        write!(f, "[{}]", ids.join(", "))
    }
}

/// An operation whose effective set differs from the service default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergentOperation {
    /// Full operation shape ID
    pub id: String,
    /// Member name; the branch key in the generated provider
    pub name: String,
    pub schemes: EffectiveSchemeSet,
}

/// Resolves effective scheme sets against a model snapshot
pub struct EffectiveSchemeResolver<'a> {
    model: &'a dyn ModelQuery,
    mode: AuthSchemeMode,
}

impl<'a> EffectiveSchemeResolver<'a> {
    pub fn new(model: &'a dyn ModelQuery, mode: AuthSchemeMode) -> Self {
        Self { model, mode }
    }

    pub fn mode(&self) -> AuthSchemeMode {
        self.mode
    }

    /// Effective set of the service: the default for every operation
    pub fn resolve_service(&self) -> EffectiveSchemeSet {
        let service = self.model.service();
        let declared: Vec<SchemeId> = match service.auth_override() {
            Some(ids) => ids.to_vec(),
            None => service.auth_traits().iter().map(|t| t.id.clone()).collect(),
        };
        self.apply_mode(declared, service.permits_unauthenticated())
    }

    /// Effective set of one operation of the service
    pub fn resolve_operation(&self, operation: &dyn Shape) -> EffectiveSchemeSet {
        self.resolve_operation_with(operation, &self.resolve_service())
    }

    fn resolve_operation_with(
        &self,
        operation: &dyn Shape,
        service_set: &EffectiveSchemeSet,
    ) -> EffectiveSchemeSet {
        let inherited: Vec<SchemeId> = match operation.auth_override() {
            Some(ids) => ids.to_vec(),
            None => service_set.as_slice().to_vec(),
        };
        self.apply_mode(inherited, operation.permits_unauthenticated())
    }

    fn apply_mode(&self, ids: Vec<SchemeId>, permits_unauthenticated: bool) -> EffectiveSchemeSet {
        match self.mode {
            AuthSchemeMode::Standard => {
                EffectiveSchemeSet::from_ordered(ids.into_iter().filter(|id| !id.is_no_auth()))
            }
            AuthSchemeMode::NoAuthAware => {
                let mut set = EffectiveSchemeSet::from_ordered(ids);
                if permits_unauthenticated {
                    set.push(SchemeId::no_auth());
                }
                set
            }
        }
    }

    /// Operations whose effective set differs from the service set, in model order
    pub fn divergent_operations(&self) -> Vec<DivergentOperation> {
        let service_set = self.resolve_service();
        let mut divergent = Vec::new();

        for operation in self.model.operations() {
            let schemes = self.resolve_operation_with(operation, &service_set);
            if schemes == service_set {
                debug!(
                    operation = %operation.name(),
                    "Operation auth matches service default; no branch needed"
                );
                continue;
            }
            debug!(
                operation = %operation.name(),
                schemes = %schemes,
                "Operation auth diverges from service default"
            );
            divergent.push(DivergentOperation {
                id: operation.id().to_string(),
                name: operation.name().to_string(),
                schemes,
            });
        }

        divergent
    }

    /// Every scheme appearing in the service set or any operation set,
    /// in first-appearance order
    pub fn all_effective_schemes(&self) -> EffectiveSchemeSet {
        let service_set = self.resolve_service();
        let mut all = service_set.clone();
        for operation in self.model.operations() {
            for id in &self.resolve_operation_with(operation, &service_set) {
                all.push(id.clone());
            }
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthTrait, OperationShape, ServiceModel, ServiceShape};

    fn a() -> SchemeId {
        SchemeId::new("example#A")
    }

    fn b() -> SchemeId {
        SchemeId::new("example#B")
    }

    fn service() -> ServiceShape {
        ServiceShape::new("example#Service")
            .with_trait(AuthTrait::new(a()))
            .with_trait(AuthTrait::new(b()))
    }

    fn ids(set: &EffectiveSchemeSet) -> Vec<&str> {
        set.iter().map(SchemeId::as_str).collect()
    }

    #[test]
    fn test_service_uses_declaration_order() {
        let model = ServiceModel::new(service()).unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);
        assert_eq!(ids(&resolver.resolve_service()), vec!["example#A", "example#B"]);
    }

    #[test]
    fn test_service_override_replaces_declared() {
        let model = ServiceModel::new(service().with_auth([b()])).unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);
        assert_eq!(ids(&resolver.resolve_service()), vec!["example#B"]);
    }

    #[test]
    fn test_operation_inherits_service_set() {
        let model = ServiceModel::new(
            service().with_operation(OperationShape::new("example#GetThing")),
        )
        .unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);

        let op = &model.service.operations[0];
        assert_eq!(resolver.resolve_operation(op), resolver.resolve_service());
        assert!(resolver.divergent_operations().is_empty());
    }

    #[test]
    fn test_reordered_override_is_divergent() {
        let model = ServiceModel::new(
            service().with_operation(OperationShape::new("example#Reordered").with_auth([b(), a()])),
        )
        .unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);

        let divergent = resolver.divergent_operations();
        assert_eq!(divergent.len(), 1);
        assert_eq!(divergent[0].name, "Reordered");
        assert_eq!(ids(&divergent[0].schemes), vec!["example#B", "example#A"]);
    }

    #[test]
    fn test_override_with_same_order_is_not_divergent() {
        let model = ServiceModel::new(
            service().with_operation(OperationShape::new("example#Same").with_auth([a(), b()])),
        )
        .unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);
        assert!(resolver.divergent_operations().is_empty());
    }

    #[test]
    fn test_optional_auth_appends_no_auth() {
        let model = ServiceModel::new(
            service().with_operation(OperationShape::new("example#Ping").with_optional_auth()),
        )
        .unwrap();

        let aware = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);
        let op = &model.service.operations[0];
        assert_eq!(
            ids(&aware.resolve_operation(op)),
            vec!["example#A", "example#B", SchemeId::NO_AUTH]
        );

        let standard = EffectiveSchemeResolver::new(&model, AuthSchemeMode::Standard);
        assert_eq!(
            ids(&standard.resolve_operation(op)),
            vec!["example#A", "example#B"]
        );
        assert!(standard.divergent_operations().is_empty());
    }

    #[test]
    fn test_empty_override_resolves_to_empty_set() {
        let model = ServiceModel::new(
            service().with_operation(OperationShape::new("example#Open").with_auth([])),
        )
        .unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);

        let op = &model.service.operations[0];
        assert!(resolver.resolve_operation(op).is_empty());
        assert_eq!(resolver.divergent_operations().len(), 1);
    }

    #[test]
    fn test_no_auth_anywhere_resolves_to_empty_set() {
        let model = ServiceModel::new(
            ServiceShape::new("example#Bare").with_operation(OperationShape::new("example#Op")),
        )
        .unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);

        assert!(resolver.resolve_service().is_empty());
        assert!(resolver.divergent_operations().is_empty());
        assert!(resolver.all_effective_schemes().is_empty());
    }

    #[test]
    fn test_service_optional_auth_is_inherited() {
        let model = ServiceModel::new(
            service()
                .with_optional_auth()
                .with_operation(OperationShape::new("example#Op").with_optional_auth()),
        )
        .unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);

        let service_set = resolver.resolve_service();
        assert_eq!(
            ids(&service_set),
            vec!["example#A", "example#B", SchemeId::NO_AUTH]
        );
        // noAuth is not appended twice, so the operation matches the default
        assert!(resolver.divergent_operations().is_empty());
    }

    #[test]
    fn test_duplicates_in_override_are_dropped() {
        let set = EffectiveSchemeSet::from_ordered([b(), a(), b()]);
        assert_eq!(ids(&set), vec!["example#B", "example#A"]);
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let set: EffectiveSchemeSet =
            serde_json::from_str(r#"["example#B", "example#A", "example#B"]"#).unwrap();
        assert_eq!(ids(&set), vec!["example#B", "example#A"]);
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["example#B","example#A"]"#
        );
    }

    #[test]
    fn test_all_effective_schemes_first_appearance_order() {
        let c = SchemeId::new("example#C");
        let model = ServiceModel::new(
            service()
                .with_operation(OperationShape::new("example#One").with_auth([c.clone(), a()]))
                .with_operation(OperationShape::new("example#Two").with_optional_auth()),
        )
        .unwrap();
        let resolver = EffectiveSchemeResolver::new(&model, AuthSchemeMode::NoAuthAware);

        assert_eq!(
            ids(&resolver.all_effective_schemes()),
            vec!["example#A", "example#B", "example#C", SchemeId::NO_AUTH]
        );
    }

    #[test]
    fn test_effective_set_display() {
        let set = EffectiveSchemeSet::from_ordered([a(), b()]);
        assert_eq!(set.to_string(), "[example#A, example#B]");
    }
}
