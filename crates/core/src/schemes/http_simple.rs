// Schemes whose options carry only a scheme ID

use crate::error::Result;
use crate::registry::AuthScheme;
use crate::scheme_id::SchemeId;

pub fn http_bearer_auth() -> Result<AuthScheme> {
    AuthScheme::new(SchemeId::http_bearer_auth())
}

pub fn http_basic_auth() -> Result<AuthScheme> {
    AuthScheme::new(SchemeId::http_basic_auth())
}

pub fn http_digest_auth() -> Result<AuthScheme> {
    AuthScheme::new(SchemeId::http_digest_auth())
}

pub fn no_auth() -> Result<AuthScheme> {
    AuthScheme::new(SchemeId::no_auth())
}
