//! Decision procedure assembly.
//!
//! A [`DecisionProcedure`] maps an operation name to the ordered auth options a
//! client should try. It holds one branch per divergent operation plus a default
//! branch built from the service's effective set, so every operation is covered
//! exactly once: by its own branch or by the default.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::model::ModelQuery;
use crate::parameter::{collect_parameters, SchemeParameter};
use crate::registry::SchemeRegistry;
use crate::resolver::{AuthSchemeMode, EffectiveSchemeResolver, EffectiveSchemeSet};
use crate::scheme_id::SchemeId;
use crate::synthesizer::{OptionSynthesizer, ResolvedOption};

/// Dedicated branch for an operation whose schemes differ from the default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationBranch {
    /// Operation name, matched against `authParameters.operation`
    pub operation: String,
    pub schemes: EffectiveSchemeSet,
}

/// Compiled per-operation auth option selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionProcedure {
    pub mode: AuthSchemeMode,

    /// Merged parameter bag fields, in first-declaration order
    pub parameters: IndexMap<String, SchemeParameter>,

    /// One option per distinct scheme, in first-appearance order
    pub options: IndexMap<SchemeId, ResolvedOption>,

    /// Divergent operations, in model order
    pub branches: Vec<OperationBranch>,

    /// Service effective set, used by every operation without a branch
    pub default: EffectiveSchemeSet,
}

impl DecisionProcedure {
    /// Branch dedicated to an operation, if it has one
    pub fn branch(&self, operation: &str) -> Option<&OperationBranch> {
        self.branches.iter().find(|b| b.operation == operation)
    }

    /// Scheme list selected for an operation
    pub fn schemes_for(&self, operation: &str) -> &EffectiveSchemeSet {
        self.branch(operation)
            .map_or(&self.default, |branch| &branch.schemes)
    }

    /// Ordered options selected for an operation
    pub fn options_for(&self, operation: &str) -> Vec<&ResolvedOption> {
        self.schemes_for(operation)
            .iter()
            .filter_map(|id| self.options.get(id))
            .collect()
    }

    /// Options whose normalized names clash with an earlier option's
    pub fn normalization_collisions(&self) -> Vec<(&SchemeId, &SchemeId)> {
        let mut seen: IndexMap<&str, &SchemeId> = IndexMap::new();
        let mut collisions = Vec::new();
        for option in self.options.values() {
            match seen.get(option.normalized_name.as_str()) {
                Some(first) => collisions.push((*first, &option.scheme_id)),
                None => {
                    seen.insert(option.normalized_name.as_str(), &option.scheme_id);
                }
            }
        }
        collisions
    }
}

/// Builds a [`DecisionProcedure`] from a model snapshot and a scheme registry
pub struct DecisionProcedureBuilder<'a> {
    model: &'a dyn ModelQuery,
    registry: &'a SchemeRegistry,
    mode: AuthSchemeMode,
}

impl<'a> DecisionProcedureBuilder<'a> {
    pub fn new(model: &'a dyn ModelQuery, registry: &'a SchemeRegistry) -> Self {
        Self {
            model,
            registry,
            mode: AuthSchemeMode::default(),
        }
    }

    /// Set the resolution mode
    pub fn with_mode(mut self, mode: AuthSchemeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(&self) -> DecisionProcedure {
        let resolver = EffectiveSchemeResolver::new(self.model, self.mode);
        let synthesizer = OptionSynthesizer::new(self.registry, self.model);

        let default = resolver.resolve_service();
        let all = resolver.all_effective_schemes();
        let options = synthesizer.synthesize_all(&all);

        // Every registered scheme contributes, whether or not the model uses it
        let parameters = collect_parameters(self.registry.list());

        let branches: Vec<OperationBranch> = resolver
            .divergent_operations()
            .into_iter()
            .map(|op| OperationBranch {
                operation: op.name,
                schemes: op.schemes,
            })
            .collect();

        let procedure = DecisionProcedure {
            mode: self.mode,
            parameters,
            options,
            branches,
            default,
        };

        for (first, second) in procedure.normalization_collisions() {
            warn!(
                scheme_id = %second,
                previous_scheme = %first,
                "Distinct auth schemes normalize to the same name; option factories will clash"
            );
        }

        info!(
            options = procedure.options.len(),
            branches = procedure.branches.len(),
            parameters = procedure.parameters.len(),
            mode = %self.mode,
            "Built auth decision procedure"
        );

        procedure
    }
}
