// Scheme identifier definitions
//
// Design Decision: Scheme IDs are string-based (`namespace#Name`) so new schemes can be
// registered without code changes to an enum. Validation happens when an ID is parsed
// from a model file; built-in constants are trusted.

use serde::{Deserialize, Serialize};

use crate::error::{AuthGenError, Result};

/// Scheme identifier - a namespaced shape ID such as `smithy.api#httpApiKeyAuth`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemeId(String);

impl SchemeId {
    /// Create a scheme ID without validation
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse and validate a scheme ID
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let Some((namespace, name)) = id.split_once('#') else {
            return Err(AuthGenError::invalid_scheme_id(id));
        };
        let namespace_ok = !namespace.is_empty() && namespace.split('.').all(|s| !s.is_empty());
        if !namespace_ok || name.is_empty() || name.contains('#') {
            return Err(AuthGenError::invalid_scheme_id(id));
        }
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace part (before `#`)
    pub fn namespace(&self) -> &str {
        self.0.split_once('#').map_or("", |(ns, _)| ns)
    }

    /// Member name part (after `#`)
    pub fn name(&self) -> &str {
        self.0.split_once('#').map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Synthetic symbol name: segments split on `.` and `#`, each capitalized, joined.
    ///
    /// `smithy.api#httpApiKeyAuth` becomes `SmithyApiHttpApiKeyAuth`.
    pub fn normalized_name(&self) -> String {
        self.0.split(['.', '#']).map(capitalize).collect()
    }

    /// Whether this is the reserved "no authentication" scheme
    pub fn is_no_auth(&self) -> bool {
        self.0 == Self::NO_AUTH
    }

    // Well-known scheme ID constants
    pub const NO_AUTH: &'static str = "smithy.api#noAuth";
    pub const HTTP_API_KEY_AUTH: &'static str = "smithy.api#httpApiKeyAuth";
    pub const HTTP_BEARER_AUTH: &'static str = "smithy.api#httpBearerAuth";
    pub const HTTP_BASIC_AUTH: &'static str = "smithy.api#httpBasicAuth";
    pub const HTTP_DIGEST_AUTH: &'static str = "smithy.api#httpDigestAuth";
    pub const SIGV4: &'static str = "aws.auth#sigv4";

    /// Create the noAuth scheme ID
    pub fn no_auth() -> Self {
        Self::new(Self::NO_AUTH)
    }

    /// Create the httpApiKeyAuth scheme ID
    pub fn http_api_key_auth() -> Self {
        Self::new(Self::HTTP_API_KEY_AUTH)
    }

    /// Create the httpBearerAuth scheme ID
    pub fn http_bearer_auth() -> Self {
        Self::new(Self::HTTP_BEARER_AUTH)
    }

    /// Create the httpBasicAuth scheme ID
    pub fn http_basic_auth() -> Self {
        Self::new(Self::HTTP_BASIC_AUTH)
    }

    /// Create the httpDigestAuth scheme ID
    pub fn http_digest_auth() -> Self {
        Self::new(Self::HTTP_DIGEST_AUTH)
    }

    /// Create the sigv4 scheme ID
    pub fn sigv4() -> Self {
        Self::new(Self::SIGV4)
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl std::fmt::Display for SchemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SchemeId {
    type Err = AuthGenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SchemeId {
    type Error = AuthGenError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<SchemeId> for String {
    fn from(id: SchemeId) -> Self {
        id.0
    }
}

impl AsRef<str> for SchemeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
