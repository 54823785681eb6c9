//! Security scheme and requirement loading.

use serde_json::Value;

use super::{arr, extensions, get_str, obj, req_str, str_vec};
use crate::spec::{
    Error, OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme, SecuritySchemeKind,
};

/// Loads a `security` array.
///
/// An empty array means "no security"; an empty requirement object inside
/// the array is a valid optional-auth marker and is preserved.
pub(crate) fn load_security_requirements(
    value: &Value,
) -> Result<Vec<SecurityRequirement>, Error> {
    let list = arr(value, "security")?;
    let mut requirements = Vec::with_capacity(list.len());

    for entry in list {
        let map = obj(entry, "security requirement")?;
        let mut requirement = SecurityRequirement::new();
        for (scheme, scopes) in map {
            requirement.insert(scheme.clone(), str_vec(Some(scopes)));
        }
        requirements.push(requirement);
    }

    Ok(requirements)
}

/// Loads one security scheme, validating its type-specific required fields.
pub(crate) fn load_security_scheme(name: &str, value: &Value) -> Result<SecurityScheme, Error> {
    let map = obj(value, &format!("security scheme {name}"))?;
    let scheme_type = req_str(map, "type", &format!("security scheme {name}"))?;

    let missing = |field: &'static str| Error::SecuritySchemeMissingField {
        scheme: scheme_type.clone(),
        field,
    };

    let kind = match scheme_type.as_str() {
        "apiKey" => {
            let key_name = get_str(map, "name").ok_or_else(|| missing("name"))?;
            let location = get_str(map, "in").ok_or_else(|| missing("in"))?;
            if !matches!(location.as_str(), "header" | "query" | "cookie") {
                return Err(Error::UnknownParameterIn(location));
            }
            SecuritySchemeKind::ApiKey {
                name: key_name,
                location,
            }
        }
        "http" => SecuritySchemeKind::Http {
            scheme: get_str(map, "scheme").ok_or_else(|| missing("scheme"))?,
            bearer_format: get_str(map, "bearerFormat"),
        },
        "mutualTLS" => SecuritySchemeKind::MutualTls,
        "oauth2" => {
            let flows_value = map.get("flows").ok_or_else(|| missing("flows"))?;
            SecuritySchemeKind::OAuth2 {
                flows: load_oauth_flows(flows_value)?,
            }
        }
        "openIdConnect" => SecuritySchemeKind::OpenIdConnect {
            url: get_str(map, "openIdConnectUrl").ok_or_else(|| missing("openIdConnectUrl"))?,
        },
        other => return Err(Error::UnknownSecuritySchemeType(other.to_owned())),
    };

    Ok(SecurityScheme {
        kind,
        description: get_str(map, "description"),
        extensions: extensions(map),
    })
}

/// Loads the flows object, validating each flow against its kind.
fn load_oauth_flows(value: &Value) -> Result<OAuthFlows, Error> {
    let map = obj(value, "oauth flows")?;
    let mut flows = OAuthFlows {
        extensions: extensions(map),
        ..OAuthFlows::default()
    };

    for (kind, flow_value) in map {
        if kind.starts_with("x-") {
            continue;
        }

        let flow = load_oauth_flow(flow_value)?;
        flow.validate_for(kind)?;

        match kind.as_str() {
            "implicit" => flows.implicit = Some(flow),
            "password" => flows.password = Some(flow),
            "clientCredentials" => flows.client_credentials = Some(flow),
            "authorizationCode" => flows.authorization_code = Some(flow),
            "deviceAuthorization" => flows.device_authorization = Some(flow),
            // validate_for already rejected anything else
            _ => unreachable!("unknown flow kind survived validation"),
        }
    }

    Ok(flows)
}

fn load_oauth_flow(value: &Value) -> Result<OAuthFlow, Error> {
    let map = obj(value, "oauth flow")?;

    let mut flow = OAuthFlow {
        authorization_url: get_str(map, "authorizationUrl"),
        token_url: get_str(map, "tokenUrl"),
        refresh_url: get_str(map, "refreshUrl"),
        device_authorization_url: get_str(map, "deviceAuthorizationUrl"),
        extensions: extensions(map),
        ..OAuthFlow::default()
    };

    if let Some(scopes) = map.get("scopes") {
        flow.scopes_set = true;
        for (scope, description) in obj(scopes, "scopes")? {
            if let Some(description) = description.as_str() {
                flow.scopes.insert(scope.clone(), description.to_owned());
            }
        }
    }

    Ok(flow)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn authorization_code_flow_accepted() {
        let scheme = load_security_scheme(
            "oauth",
            &json!({
                "type": "oauth2",
                "flows": {
                    "authorizationCode": {
                        "authorizationUrl": "u",
                        "tokenUrl": "t",
                        "scopes": {}
                    }
                }
            }),
        )
        .unwrap();

        assert_matches!(
            scheme.kind,
            SecuritySchemeKind::OAuth2 { flows: OAuthFlows { authorization_code: Some(_), .. } }
        );
    }

    #[test]
    fn device_authorization_requires_device_url() {
        let result = load_security_scheme(
            "oauth",
            &json!({
                "type": "oauth2",
                "flows": {
                    "deviceAuthorization": { "tokenUrl": "t", "scopes": {} }
                }
            }),
        );
        assert_matches!(
            result,
            Err(Error::OAuthFlowMissingField { field: "deviceAuthorizationUrl", .. })
        );
    }

    #[test]
    fn unknown_flow_kind_rejected() {
        let result = load_security_scheme(
            "oauth",
            &json!({
                "type": "oauth2",
                "flows": { "legacy": { "tokenUrl": "t", "scopes": {} } }
            }),
        );
        assert_matches!(result, Err(Error::UnknownOAuthFlow(_)));
    }

    #[test]
    fn api_key_requires_name_and_in() {
        let result = load_security_scheme("key", &json!({ "type": "apiKey", "name": "X" }));
        assert_matches!(
            result,
            Err(Error::SecuritySchemeMissingField { field: "in", .. })
        );

        let result =
            load_security_scheme("key", &json!({ "type": "apiKey", "name": "X", "in": "body" }));
        assert_matches!(result, Err(Error::UnknownParameterIn(_)));
    }

    #[test]
    fn http_requires_scheme() {
        let result = load_security_scheme("basic", &json!({ "type": "http" }));
        assert_matches!(
            result,
            Err(Error::SecuritySchemeMissingField { field: "scheme", .. })
        );
    }

    #[test]
    fn open_id_connect_requires_url() {
        let result = load_security_scheme("oidc", &json!({ "type": "openIdConnect" }));
        assert_matches!(
            result,
            Err(Error::SecuritySchemeMissingField { field: "openIdConnectUrl", .. })
        );
    }

    #[test]
    fn mutual_tls_and_unknown_types() {
        assert!(load_security_scheme("mtls", &json!({ "type": "mutualTLS" })).is_ok());
        assert_matches!(
            load_security_scheme("x", &json!({ "type": "basic" })),
            Err(Error::UnknownSecuritySchemeType(_))
        );
    }

    #[test]
    fn empty_requirement_object_preserved() {
        let requirements =
            load_security_requirements(&json!([{}, { "key": ["read"] }])).unwrap();
        assert_eq!(requirements.len(), 2);
        assert!(requirements[0].is_empty());
        assert_eq!(requirements[1]["key"], vec!["read".to_owned()]);
    }
}
