//! Security scheme, OAuth flow, and security requirement objects.

use indexmap::IndexMap;

use super::Error;

/// A security requirement: scheme name to required scopes.
///
/// An empty map is a valid "no auth required" alternative and is preserved
/// as such.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// The type-specific part of a security scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum SecuritySchemeKind {
    /// `apiKey`: a named key in a header, query parameter, or cookie.
    ApiKey {
        /// The parameter name.
        name: String,
        /// `header`, `query`, or `cookie`.
        location: String,
    },
    /// `http`: an Authorization-header scheme.
    Http {
        /// The RFC 9110 auth scheme name.
        scheme: String,
        /// A hint for bearer token formats.
        bearer_format: Option<String>,
    },
    /// `mutualTLS`.
    MutualTls,
    /// `oauth2` with its flow objects.
    OAuth2 {
        /// Configured flows.
        flows: OAuthFlows,
    },
    /// `openIdConnect` discovery.
    OpenIdConnect {
        /// The discovery URL.
        url: String,
    },
}

impl SecuritySchemeKind {
    /// The `type` keyword for this kind.
    pub fn type_str(&self) -> &'static str {
        match self {
            SecuritySchemeKind::ApiKey { .. } => "apiKey",
            SecuritySchemeKind::Http { .. } => "http",
            SecuritySchemeKind::MutualTls => "mutualTLS",
            SecuritySchemeKind::OAuth2 { .. } => "oauth2",
            SecuritySchemeKind::OpenIdConnect { .. } => "openIdConnect",
        }
    }
}

/// A security scheme definition.
///
/// See <https://spec.openapis.org/oas/v3.2.0#security-scheme-object>.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityScheme {
    /// Type-specific data.
    pub kind: SecuritySchemeKind,
    /// A description of the scheme.
    pub description: Option<String>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// The set of flows an `oauth2` scheme configures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthFlows {
    /// Implicit flow.
    pub implicit: Option<OAuthFlow>,
    /// Resource-owner password flow.
    pub password: Option<OAuthFlow>,
    /// Client-credentials flow.
    pub client_credentials: Option<OAuthFlow>,
    /// Authorization-code flow.
    pub authorization_code: Option<OAuthFlow>,
    /// Device-authorization flow (OpenAPI 3.2).
    pub device_authorization: Option<OAuthFlow>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl OAuthFlows {
    /// Configured `(key, flow)` pairs, in serialization order.
    pub fn entries(&self) -> Vec<(&'static str, &OAuthFlow)> {
        [
            ("implicit", self.implicit.as_ref()),
            ("password", self.password.as_ref()),
            ("clientCredentials", self.client_credentials.as_ref()),
            ("authorizationCode", self.authorization_code.as_ref()),
            ("deviceAuthorization", self.device_authorization.as_ref()),
        ]
        .into_iter()
        .filter_map(|(key, flow)| flow.map(|f| (key, f)))
        .collect()
    }
}

/// Configuration for one OAuth flow.
///
/// Which URLs are required depends on the flow kind; see
/// [`OAuthFlow::validate_for`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthFlow {
    /// Authorization endpoint.
    pub authorization_url: Option<String>,
    /// Token endpoint.
    pub token_url: Option<String>,
    /// Refresh endpoint.
    pub refresh_url: Option<String>,
    /// Device-authorization endpoint.
    pub device_authorization_url: Option<String>,
    /// Available scopes (possibly empty, but the object is required).
    pub scopes: IndexMap<String, String>,
    /// `true` when the source document carried a `scopes` object.
    pub scopes_set: bool,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl OAuthFlow {
    /// Validates the flow's required URLs for its kind key.
    ///
    /// - `implicit` requires `authorizationUrl`
    /// - `password` and `clientCredentials` require `tokenUrl`
    /// - `authorizationCode` requires both
    /// - `deviceAuthorization` requires `deviceAuthorizationUrl` and
    ///   `tokenUrl`
    ///
    /// Every flow requires a `scopes` object.
    pub fn validate_for(&self, kind: &str) -> Result<(), Error> {
        let missing = |field: &'static str| Error::OAuthFlowMissingField {
            flow: kind.to_owned(),
            field,
        };

        match kind {
            "implicit" => {
                if self.authorization_url.is_none() {
                    return Err(missing("authorizationUrl"));
                }
            }
            "password" | "clientCredentials" => {
                if self.token_url.is_none() {
                    return Err(missing("tokenUrl"));
                }
            }
            "authorizationCode" => {
                if self.authorization_url.is_none() {
                    return Err(missing("authorizationUrl"));
                }
                if self.token_url.is_none() {
                    return Err(missing("tokenUrl"));
                }
            }
            "deviceAuthorization" => {
                if self.device_authorization_url.is_none() {
                    return Err(missing("deviceAuthorizationUrl"));
                }
                if self.token_url.is_none() {
                    return Err(missing("tokenUrl"));
                }
            }
            other => return Err(Error::UnknownOAuthFlow(other.to_owned())),
        }

        if !self.scopes_set {
            return Err(missing("scopes"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn flow(auth: bool, token: bool, device: bool) -> OAuthFlow {
        OAuthFlow {
            authorization_url: auth.then(|| "https://example.com/auth".to_owned()),
            token_url: token.then(|| "https://example.com/token".to_owned()),
            device_authorization_url: device.then(|| "https://example.com/device".to_owned()),
            scopes_set: true,
            ..OAuthFlow::default()
        }
    }

    #[test]
    fn required_urls_per_flow_kind() {
        assert!(flow(true, false, false).validate_for("implicit").is_ok());
        assert!(flow(false, true, false).validate_for("password").is_ok());
        assert!(flow(true, true, false)
            .validate_for("authorizationCode")
            .is_ok());
        assert!(flow(false, true, true)
            .validate_for("deviceAuthorization")
            .is_ok());

        assert_matches!(
            flow(false, true, false).validate_for("deviceAuthorization"),
            Err(Error::OAuthFlowMissingField { field: "deviceAuthorizationUrl", .. })
        );
        assert_matches!(
            flow(true, false, false).validate_for("authorizationCode"),
            Err(Error::OAuthFlowMissingField { field: "tokenUrl", .. })
        );
    }

    #[test]
    fn unknown_flow_kind_rejected() {
        assert_matches!(
            flow(true, true, true).validate_for("legacy"),
            Err(Error::UnknownOAuthFlow(_))
        );
    }

    #[test]
    fn scopes_object_required() {
        let mut f = flow(true, true, false);
        f.scopes_set = false;
        assert_matches!(
            f.validate_for("authorizationCode"),
            Err(Error::OAuthFlowMissingField { field: "scopes", .. })
        );
    }
}
