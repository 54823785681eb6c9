//! Server objects.

use indexmap::IndexMap;

/// An object representing a server.
///
/// See <https://spec.openapis.org/oas/v3.2.0#server-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    /// A URL to the target host; supports `{variable}` templates and MUST
    /// NOT carry a query or fragment.
    pub url: String,
    /// An optional name for the server.
    pub name: Option<String>,
    /// An optional description of the host.
    pub description: Option<String>,
    /// Template variables, keyed by name, in document order.
    pub variables: IndexMap<String, ServerVariable>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Server {
    /// Variable names referenced by the URL template, in order.
    pub fn template_variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut rest = self.url.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            out.push(&rest[open + 1..open + close]);
            rest = &rest[open + close + 1..];
        }
        out
    }
}

/// A server URL template variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerVariable {
    /// The substitution default. REQUIRED.
    pub default: String,
    /// Allowed values, when limited.
    pub enum_values: Vec<String>,
    /// An optional description.
    pub description: Option<String>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_variables_in_order() {
        let server = Server {
            url: "https://{region}.example.com/{basePath}".to_owned(),
            ..Server::default()
        };
        assert_eq!(server.template_variables(), ["region", "basePath"]);
    }
}
