// httpApiKeyAuth scheme
//
// Signing properties read from the trait:
// - name:   trait `name`, no default
// - in:     trait `in` as HttpApiKeyAuthLocation, default HEADER
// - scheme: trait `scheme`, default ""

use crate::error::Result;
use crate::property::{OptionProperty, PropertySource};
use crate::registry::AuthScheme;
use crate::scheme_id::SchemeId;

/// Runtime enum naming where the API key is sent
pub const HTTP_API_KEY_LOCATION: &str = "HttpApiKeyAuthLocation";

const TYPES_PACKAGE: &str = "@smithy/types";

pub fn http_api_key_auth() -> Result<AuthScheme> {
    Ok(AuthScheme::new(SchemeId::http_api_key_auth())?
        .with_property(OptionProperty::signing(
            "name",
            PropertySource::trait_string("name", None),
        )?)
        .with_property(OptionProperty::signing(
            "in",
            PropertySource::trait_enum("in", HTTP_API_KEY_LOCATION, TYPES_PACKAGE, "HEADER"),
        )?)
        .with_property(OptionProperty::signing(
            "scheme",
            PropertySource::trait_string("scheme", Some("")),
        )?))
}
