// sigv4 scheme
//
// Parameters:
// - region: resolved from the client config provider
//
// Signing properties:
// - name:   trait `name` (the signing service name), no default
// - region: `authParameters.region`

use crate::error::Result;
use crate::parameter::{ParameterSource, SchemeParameter};
use crate::property::{OptionProperty, PropertySource};
use crate::registry::AuthScheme;
use crate::scheme_id::SchemeId;

pub fn sigv4() -> Result<AuthScheme> {
    Ok(AuthScheme::new(SchemeId::sigv4())?
        .with_parameter(SchemeParameter::new(
            "region",
            "string",
            ParameterSource::ConfigProvider("region".to_string()),
        )?)
        .with_property(OptionProperty::signing(
            "name",
            PropertySource::trait_string("name", None),
        )?)
        .with_property(OptionProperty::signing(
            "region",
            PropertySource::auth_parameter("region"),
        )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthTrait;

    #[test]
    fn test_sigv4_descriptor() {
        let scheme = sigv4().unwrap();
        assert_eq!(scheme.parameters().len(), 1);
        assert_eq!(scheme.parameters()[0].name(), "region");

        let auth_trait = AuthTrait::new(SchemeId::sigv4()).with_value("name", "weather");
        let values: Vec<_> = scheme
            .properties()
            .iter()
            .map(|p| p.resolve(Some(&auth_trait)).code)
            .collect();
        assert_eq!(values, vec!["\"weather\"", "authParameters.region"]);
    }
}
