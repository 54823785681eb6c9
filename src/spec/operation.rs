//! Operation objects.

use indexmap::IndexMap;

use super::{
    Callback, Error, ExternalDoc, Parameter, RequestBody, Response, SecurityRequirement, Server,
};

/// The HTTP method an operation binds to.
///
/// OpenAPI 3.2 adds `QUERY` alongside the classic verbs; anything else goes
/// through `additionalOperations` and is carried as a free-form method
/// string on the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// HTTP GET.
    Get,
    /// HTTP PUT.
    Put,
    /// HTTP POST.
    Post,
    /// HTTP DELETE.
    Delete,
    /// HTTP OPTIONS.
    Options,
    /// HTTP HEAD.
    Head,
    /// HTTP PATCH.
    Patch,
    /// HTTP TRACE.
    Trace,
    /// HTTP QUERY (OpenAPI 3.2).
    Query,
}

impl Verb {
    /// All fixed verb keys, in the order path items serialize them.
    pub const ALL: &'static [Verb] = &[
        Verb::Get,
        Verb::Put,
        Verb::Post,
        Verb::Delete,
        Verb::Options,
        Verb::Head,
        Verb::Patch,
        Verb::Trace,
        Verb::Query,
    ];

    /// The lowercase path-item key for this verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Put => "put",
            Verb::Post => "post",
            Verb::Delete => "delete",
            Verb::Options => "options",
            Verb::Head => "head",
            Verb::Patch => "patch",
            Verb::Trace => "trace",
            Verb::Query => "query",
        }
    }

    /// The uppercase wire method.
    pub fn method(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
            Verb::Head => "HEAD",
            Verb::Patch => "PATCH",
            Verb::Trace => "TRACE",
            Verb::Query => "QUERY",
        }
    }

    /// Parses a lowercase path-item key.
    pub fn parse(s: &str) -> Option<Self> {
        Verb::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    /// `true` when `method` (any case) names a standard verb; such methods
    /// are forbidden inside `additionalOperations`.
    pub fn is_standard_method(method: &str) -> bool {
        Verb::ALL
            .iter()
            .any(|v| v.method().eq_ignore_ascii_case(method))
    }
}

/// Describes a single API operation on a path.
///
/// See <https://spec.openapis.org/oas/v3.2.0#operation-object>.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// The verb this operation binds to.
    ///
    /// For `additionalOperations` entries this is the closest classification
    /// and `method` carries the real token.
    pub verb: Verb,
    /// The literal method string, for nonstandard operations.
    pub method: Option<String>,
    /// `true` when the operation came from `additionalOperations`.
    pub is_additional: bool,
    /// String used to uniquely identify the operation across the document
    /// and every registered document.
    pub operation_id: Option<String>,
    /// A short summary of what the operation does.
    pub summary: Option<String>,
    /// A verbose explanation of the operation behavior.
    pub description: Option<String>,
    /// Declares this operation to be deprecated.
    pub deprecated: Option<bool>,
    /// Tags for API documentation control.
    pub tags: Vec<String>,
    /// Additional external documentation.
    pub external_docs: Option<ExternalDoc>,
    /// Parameters, with path-level parameters already merged in.
    pub parameters: Vec<Parameter>,
    /// The request body, when the method carries one.
    pub request_body: Option<RequestBody>,
    /// Responses, in document order.
    pub responses: Vec<Response>,
    /// Out-of-band callbacks, keyed by expression name.
    pub callbacks: IndexMap<String, Callback>,
    /// Security requirements; `None` inherits the root.
    pub security: Option<Vec<SecurityRequirement>>,
    /// Alternative servers for this operation.
    pub servers: Vec<Server>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Default for Operation {
    fn default() -> Self {
        Self {
            verb: Verb::Get,
            method: None,
            is_additional: false,
            operation_id: None,
            summary: None,
            description: None,
            deprecated: None,
            tags: Vec::new(),
            external_docs: None,
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
            callbacks: IndexMap::new(),
            security: None,
            servers: Vec::new(),
            extensions: IndexMap::new(),
        }
    }
}

impl Operation {
    /// The wire method: the captured string for additional operations, the
    /// verb's method otherwise.
    pub fn wire_method(&self) -> &str {
        self.method.as_deref().unwrap_or(self.verb.method())
    }

    /// Finds a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Response status code keys must match `[1-5][0-9X][0-9X]` or equal
    /// `default`.
    pub fn valid_response_code(code: &str) -> Result<(), Error> {
        use once_cell::sync::Lazy;
        use regex::Regex;

        static RE: Lazy<Regex> = Lazy::new(|| Regex::new("^[1-5][0-9X][0-9X]$").unwrap());

        if code == "default" || RE.is_match(code) {
            Ok(())
        } else {
            Err(Error::InvalidResponseCode(code.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_round_trip() {
        for verb in Verb::ALL {
            assert_eq!(Verb::parse(verb.as_str()), Some(*verb));
        }
        assert_eq!(Verb::parse("purge"), None);
    }

    #[test]
    fn standard_methods_detected_case_insensitively() {
        assert!(Verb::is_standard_method("GET"));
        assert!(Verb::is_standard_method("query"));
        assert!(!Verb::is_standard_method("PURGE"));
    }

    #[test]
    fn response_code_keys() {
        assert!(Operation::valid_response_code("200").is_ok());
        assert!(Operation::valid_response_code("2XX").is_ok());
        assert!(Operation::valid_response_code("default").is_ok());
        assert!(Operation::valid_response_code("600").is_err());
        assert!(Operation::valid_response_code("20").is_err());
        assert!(Operation::valid_response_code("X20").is_err());
    }
}
