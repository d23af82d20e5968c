//! Built-in auth scheme descriptors
//!
//! Each scheme lives in its own file with the properties it contributes.
//! [`BuiltinSchemes`] registers them all, in a fixed order.

mod http_api_key;
mod http_simple;
mod sigv4;

pub use http_api_key::{http_api_key_auth, HTTP_API_KEY_LOCATION};
pub use http_simple::{http_basic_auth, http_bearer_auth, http_digest_auth, no_auth};
pub use sigv4::sigv4;

use crate::error::Result;
use crate::registry::{AuthScheme, AuthSchemeIntegration};

/// Integration contributing every built-in scheme
pub struct BuiltinSchemes;

impl AuthSchemeIntegration for BuiltinSchemes {
    fn name(&self) -> &str {
        "builtin"
    }

    fn auth_schemes(&self) -> Result<Vec<AuthScheme>> {
        Ok(vec![
            http_api_key_auth()?,
            http_bearer_auth()?,
            http_basic_auth()?,
            http_digest_auth()?,
            sigv4()?,
            no_auth()?,
        ])
    }
}
