//! Example objects.

use indexmap::IndexMap;

use super::Any;

/// A named example.
///
/// `value`/`data_value` and `serialized_value`/`external_value` are the two
/// mutually exclusive pairs the loader enforces.
///
/// See <https://spec.openapis.org/oas/v3.2.0#example-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    /// A short summary.
    pub summary: Option<String>,
    /// A long description.
    pub description: Option<String>,
    /// The example value in data form (`value` or `dataValue`).
    pub value: Option<Any>,
    /// The example value in its serialized wire form.
    pub serialized_value: Option<String>,
    /// A URI pointing to the example value.
    pub external_value: Option<String>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}
