//! Path item and callback objects.

use indexmap::IndexMap;

use super::{Operation, Parameter, Server};

/// Describes the operations available on a single route.
///
/// Webhooks reuse this shape with the event name in `route`.
///
/// See <https://spec.openapis.org/oas/v3.2.0#path-item-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    /// The route template (`/pets/{petId}`), or the webhook/callback key.
    pub route: String,
    /// A `$ref` to a components path item, when referenced.
    pub ref_path: Option<String>,
    /// An optional summary for all operations on this path.
    pub summary: Option<String>,
    /// An optional description for all operations on this path.
    pub description: Option<String>,
    /// Alternative servers for all operations on this path.
    pub servers: Vec<Server>,
    /// Path-level parameters, before merging into operations.
    pub parameters: Vec<Parameter>,
    /// Operations, fixed verbs first and then `additionalOperations`
    /// entries (marked `is_additional`), all in document order.
    pub operations: Vec<Operation>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl PathItem {
    /// Variable names in the route template, in order.
    pub fn template_variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut rest = self.route.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            out.push(&rest[open + 1..open + close]);
            rest = &rest[open + close + 1..];
        }
        out
    }

    /// The route with each `{variable}` replaced by `{}`, for ambiguity
    /// comparison between sibling templates.
    pub fn normalized_template(&self) -> String {
        let mut out = String::with_capacity(self.route.len());
        let mut rest = self.route.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            out.push_str("{}");
            match rest[open..].find('}') {
                Some(close) => rest = &rest[open + close + 1..],
                None => {
                    rest = "";
                    break;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// A callback: path items keyed by runtime expression.
///
/// See <https://spec.openapis.org/oas/v3.2.0#callback-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Callback {
    /// Path items keyed by the callback expression.
    pub expressions: Vec<PathItem>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_normalization() {
        let a = PathItem {
            route: "/a/{x}/b".to_owned(),
            ..PathItem::default()
        };
        let b = PathItem {
            route: "/a/{y}/b".to_owned(),
            ..PathItem::default()
        };
        assert_eq!(a.normalized_template(), b.normalized_template());
        assert_eq!(a.template_variables(), ["x"]);
    }
}
