//! Per-operation documentation snippets (`to_docs_json`).

use serde_json::{json, Map, Value};

use super::{c_ident, resolve_shape, CScalar, CShape, Error};
use crate::spec::{Operation, ParameterIn, Spec};

/// Options for snippet generation.
#[derive(Debug, Clone, Default)]
pub struct DocsOptions {
    /// Omit `#include` lines.
    pub no_imports: bool,
    /// Omit the `main` wrapper around the call.
    pub no_wrapping: bool,
    /// Header name used in the include line.
    pub header_name: String,
}

fn placeholder_arg(spec: &Spec, op: &Operation) -> Vec<String> {
    let mut args = vec!["client".to_owned()];
    for parameter in &op.parameters {
        if parameter.location == ParameterIn::Cookie {
            continue;
        }
        let name = c_ident(&parameter.name);
        let arg = match parameter.schema.as_ref().map(|s| resolve_shape(spec, s)) {
            Some(CShape::Scalar(CScalar::Int)) | Some(CShape::Scalar(CScalar::Long)) => {
                "0".to_owned()
            }
            Some(CShape::Scalar(CScalar::Double)) => "0.0".to_owned(),
            Some(CShape::Scalar(CScalar::Bool)) => "0".to_owned(),
            Some(CShape::Array(_)) => {
                args.push(format!("{name}_values"));
                format!("n_{name}")
            }
            _ => format!("\"{name}\""),
        };
        args.push(arg);
    }
    if op.request_body.is_some() {
        args.push("body".to_owned());
    }
    args.push("&result".to_owned());
    args
}

fn snippet_for(spec: &Spec, op: &Operation, options: &DocsOptions) -> String {
    let Some(op_id) = op.operation_id.as_deref() else {
        return String::new();
    };
    let fname = c_ident(op_id);
    let args = placeholder_arg(spec, op).join(", ");

    let mut lines = Vec::new();
    if !options.no_imports {
        lines.push(format!("#include \"{}\"", options.header_name));
        lines.push(String::new());
    }
    if !options.no_wrapping {
        lines.push("int main(void) {".to_owned());
    }
    let indent = if options.no_wrapping { "" } else { "  " };
    lines.push(format!("{indent}struct ApiClient *client = NULL;"));
    lines.push(format!(
        "{indent}api_client_init(&client, \"https://api.example.com\");"
    ));
    lines.push(format!("{indent}{fname}({args});"));
    lines.push(format!("{indent}api_client_cleanup(client);"));
    if !options.no_wrapping {
        lines.push("  return 0;".to_owned());
        lines.push("}".to_owned());
    }
    lines.join("\n")
}

/// Produces the documentation JSON: one snippet object per operation with
/// an `operationId`, keyed by id in document order.
pub fn emit_docs_json(spec: &Spec, options: &DocsOptions) -> Result<Value, Error> {
    let mut operations = Map::new();

    for (route, op) in spec.operations() {
        let Some(op_id) = op.operation_id.as_deref() else {
            continue;
        };
        operations.insert(
            op_id.to_owned(),
            json!({
                "method": op.wire_method(),
                "route": route,
                "language": "c",
                "snippet": snippet_for(spec, op, options),
            }),
        );
    }

    Ok(json!({ "operations": operations }))
}
