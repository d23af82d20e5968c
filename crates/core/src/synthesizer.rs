// Auth option synthesis
//
// Turns a scheme ID into a ResolvedOption: the scheme ID plus the identity and
// signing property values for that scheme, computed from the trait instance the
// service attaches for it. Unregistered schemes degrade to an ID-only option.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::ModelQuery;
use crate::property::PropertyCategory;
use crate::registry::SchemeRegistry;
use crate::scheme_id::SchemeId;
use crate::writer::Expression;

/// Synthesized auth option for one scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOption {
    pub scheme_id: SchemeId,

    /// Symbol-safe name derived from the scheme ID
    pub normalized_name: String,

    /// Identity properties in declaration order; empty when the scheme is unregistered
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub identity_properties: IndexMap<String, Expression>,

    /// Signing properties in declaration order; empty when the scheme is unregistered
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub signing_properties: IndexMap<String, Expression>,

    /// Whether a descriptor was registered for the scheme
    pub registered: bool,
}

impl ResolvedOption {
    /// ID-only option for a scheme without a registered descriptor
    pub fn bare(scheme_id: SchemeId) -> Self {
        Self {
            normalized_name: scheme_id.normalized_name(),
            scheme_id,
            identity_properties: IndexMap::new(),
            signing_properties: IndexMap::new(),
            registered: false,
        }
    }

    /// Properties of one category
    pub fn properties(&self, category: PropertyCategory) -> &IndexMap<String, Expression> {
        match category {
            PropertyCategory::Identity => &self.identity_properties,
            PropertyCategory::Signing => &self.signing_properties,
        }
    }

    pub fn has_properties(&self) -> bool {
        !self.identity_properties.is_empty() || !self.signing_properties.is_empty()
    }
}

/// Builds resolved options from the registry and the model's trait instances
pub struct OptionSynthesizer<'a> {
    registry: &'a SchemeRegistry,
    model: &'a dyn ModelQuery,
}

impl<'a> OptionSynthesizer<'a> {
    pub fn new(registry: &'a SchemeRegistry, model: &'a dyn ModelQuery) -> Self {
        Self { registry, model }
    }

    /// Synthesize the option for one scheme
    pub fn synthesize(&self, scheme_id: &SchemeId) -> ResolvedOption {
        let Some(scheme) = self.registry.lookup(scheme_id) else {
            warn!(
                scheme_id = %scheme_id,
                "No auth scheme registered; emitting option without properties"
            );
            return ResolvedOption::bare(scheme_id.clone());
        };

        let auth_trait = self
            .model
            .trait_instance(self.model.service(), scheme.trait_id());
        if auth_trait.is_none() {
            debug!(
                scheme_id = %scheme_id,
                trait_id = %scheme.trait_id(),
                "Service has no trait instance for scheme; properties use their defaults"
            );
        }

        let mut option = ResolvedOption::bare(scheme_id.clone());
        option.registered = true;
        for property in scheme.properties() {
            let value = property.resolve(auth_trait);
            let target = match property.category() {
                PropertyCategory::Identity => &mut option.identity_properties,
                PropertyCategory::Signing => &mut option.signing_properties,
            };
            target.insert(property.name().to_string(), value);
        }
        option
    }

    /// Synthesize options for a list of schemes, keeping its order
    pub fn synthesize_all<'s>(
        &self,
        scheme_ids: impl IntoIterator<Item = &'s SchemeId>,
    ) -> IndexMap<SchemeId, ResolvedOption> {
        scheme_ids
            .into_iter()
            .map(|id| (id.clone(), self.synthesize(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthTrait, ServiceModel, ServiceShape};
    use crate::property::{OptionProperty, PropertySource};
    use crate::registry::AuthScheme;

    fn model() -> ServiceModel {
        ServiceModel::new(
            ServiceShape::new("example#Weather").with_trait(
                AuthTrait::new(SchemeId::http_api_key_auth())
                    .with_value("name", "X-Api-Key")
                    .with_value("in", "query"),
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_unregistered_scheme_is_bare() {
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = model();
        let synthesizer = OptionSynthesizer::new(&registry, &model);

        let option = synthesizer.synthesize(&SchemeId::new("example#custom"));
        assert_eq!(option.scheme_id.as_str(), "example#custom");
        assert_eq!(option.normalized_name, "ExampleCustom");
        assert!(!option.registered);
        assert!(!option.has_properties());
    }

    #[test]
    fn test_registered_scheme_reads_service_trait() {
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = model();
        let synthesizer = OptionSynthesizer::new(&registry, &model);

        let option = synthesizer.synthesize(&SchemeId::http_api_key_auth());
        assert!(option.registered);
        assert!(option.identity_properties.is_empty());

        let signing: Vec<_> = option
            .signing_properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.code.as_str()))
            .collect();
        assert_eq!(
            signing,
            vec![
                ("name", "\"X-Api-Key\""),
                ("in", "HttpApiKeyAuthLocation.QUERY"),
                ("scheme", "\"\""),
            ]
        );
    }

    #[test]
    fn test_absent_trait_is_tolerated() {
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = model();
        let synthesizer = OptionSynthesizer::new(&registry, &model);

        let option = synthesizer.synthesize(&SchemeId::sigv4());
        assert_eq!(option.signing_properties["name"].code, "undefined");
        assert_eq!(
            option.signing_properties["region"].code,
            "authParameters.region"
        );
    }

    #[test]
    fn test_categories_keep_declaration_order() {
        let scheme = AuthScheme::new(SchemeId::new("example#custom"))
            .unwrap()
            .with_property(OptionProperty::signing("zeta", PropertySource::literal("1")).unwrap())
            .with_property(
                OptionProperty::identity("beta", PropertySource::literal("2")).unwrap(),
            )
            .with_property(OptionProperty::signing("alpha", PropertySource::literal("3")).unwrap())
            .with_property(
                OptionProperty::identity("alpha", PropertySource::literal("4")).unwrap(),
            );
        let registry = SchemeRegistry::builder().scheme(scheme).build();
        let model = model();
        let synthesizer = OptionSynthesizer::new(&registry, &model);

        let option = synthesizer.synthesize(&SchemeId::new("example#custom"));
        let signing: Vec<_> = option.signing_properties.keys().map(String::as_str).collect();
        let identity: Vec<_> = option.identity_properties.keys().map(String::as_str).collect();
        assert_eq!(signing, vec!["zeta", "alpha"]);
        assert_eq!(identity, vec!["beta", "alpha"]);
        assert_eq!(
            option.properties(PropertyCategory::Identity)["alpha"].code,
            "4"
        );
    }

    #[test]
    fn test_synthesize_all_keeps_order() {
        let registry = SchemeRegistry::with_builtins().unwrap();
        let model = model();
        let synthesizer = OptionSynthesizer::new(&registry, &model);

        let ids = [SchemeId::sigv4(), SchemeId::http_api_key_auth()];
        let options = synthesizer.synthesize_all(&ids);
        let keys: Vec<_> = options.keys().map(SchemeId::as_str).collect();
        assert_eq!(keys, vec![SchemeId::SIGV4, SchemeId::HTTP_API_KEY_AUTH]);
    }
}
