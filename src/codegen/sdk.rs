//! HTTP client SDK emission.
//!
//! Every operation with an `operationId` becomes a C function that encodes
//! its path, query, and header parameters per the OpenAPI style rules,
//! performs the request through the opaque transport contract, and parses
//! the primary response schema. The URL runtime the generated code calls
//! (`url_encode`, `url_query_*`) ships with the SDK sources.

use std::io::Write;

use super::{c_ident, resolve_shape, CScalar, CShape, Error};
use crate::codegen::structs::c_escape;
use crate::spec::{Operation, Parameter, ParameterIn, ParameterStyle, Spec};

/// How one parameter surfaces in the generated function.
enum ParamArg<'a> {
    Str(&'a Parameter),
    Int(&'a Parameter),
    Long(&'a Parameter),
    Double(&'a Parameter),
    Bool(&'a Parameter),
    StrArray(&'a Parameter),
    /// Anything else: the caller passes an already-serialized value.
    Opaque(&'a Parameter),
}

impl<'a> ParamArg<'a> {
    fn new(spec: &'a Spec, parameter: &'a Parameter) -> Self {
        let Some(schema) = &parameter.schema else {
            return ParamArg::Opaque(parameter);
        };
        match resolve_shape(spec, schema) {
            CShape::Scalar(CScalar::Str) => ParamArg::Str(parameter),
            CShape::Scalar(CScalar::Int) => ParamArg::Int(parameter),
            CShape::Scalar(CScalar::Long) => ParamArg::Long(parameter),
            CShape::Scalar(CScalar::Double) => ParamArg::Double(parameter),
            CShape::Scalar(CScalar::Bool) => ParamArg::Bool(parameter),
            CShape::Array(CScalar::Str) => ParamArg::StrArray(parameter),
            _ => ParamArg::Opaque(parameter),
        }
    }

    fn parameter(&self) -> &'a Parameter {
        match self {
            ParamArg::Str(p)
            | ParamArg::Int(p)
            | ParamArg::Long(p)
            | ParamArg::Double(p)
            | ParamArg::Bool(p)
            | ParamArg::StrArray(p)
            | ParamArg::Opaque(p) => p,
        }
    }

    fn signature(&self) -> String {
        let name = c_ident(&self.parameter().name);
        match self {
            ParamArg::Str(_) | ParamArg::Opaque(_) => format!("const char *{name}"),
            ParamArg::Int(_) => format!("int {name}"),
            ParamArg::Long(_) => format!("long {name}"),
            ParamArg::Double(_) => format!("double {name}"),
            ParamArg::Bool(_) => format!("int {name}"),
            ParamArg::StrArray(_) => {
                format!("const char *const *{name}, size_t n_{name}")
            }
        }
    }

    /// Emits statements that leave a NUL-terminated raw value in
    /// `<name>_str` (scalar parameters only).
    fn write_stringify(&self, out: &mut dyn Write) -> Result<(), Error> {
        let name = c_ident(&self.parameter().name);
        match self {
            ParamArg::Str(_) | ParamArg::Opaque(_) | ParamArg::StrArray(_) => {}
            ParamArg::Int(_) => {
                writeln!(out, "  char {name}_str[32];")?;
                writeln!(out, "  sprintf({name}_str, \"%d\", {name});")?;
            }
            ParamArg::Long(_) => {
                writeln!(out, "  char {name}_str[32];")?;
                writeln!(out, "  sprintf({name}_str, \"%ld\", {name});")?;
            }
            ParamArg::Double(_) => {
                writeln!(out, "  char {name}_str[64];")?;
                writeln!(out, "  sprintf({name}_str, \"%g\", {name});")?;
            }
            ParamArg::Bool(_) => {}
        }
        Ok(())
    }

    /// The expression producing the raw (unencoded) string value.
    fn raw_expr(&self) -> String {
        let name = c_ident(&self.parameter().name);
        match self {
            ParamArg::Str(_) | ParamArg::Opaque(_) => name,
            ParamArg::Bool(_) => format!("({name} ? \"true\" : \"false\")"),
            _ => format!("{name}_str"),
        }
    }
}

/// Emits the transport contract, the URL runtime prototypes, and one
/// prototype per operation.
pub(crate) fn write_sdk_header(spec: &Spec, out: &mut dyn Write) -> Result<(), Error> {
    let operations: Vec<(&str, &Operation)> = spec
        .operations()
        .filter(|(_, op)| op.operation_id.is_some())
        .collect();
    if operations.is_empty() {
        return Ok(());
    }

    writeln!(out, "/* --- URL runtime (str_utils.c) --- */")?;
    writeln!(out)?;
    writeln!(out, "struct UrlQueryParam {{")?;
    writeln!(out, "  char *key;")?;
    writeln!(out, "  char *value;")?;
    writeln!(out, "  int value_is_encoded;")?;
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "struct UrlQueryParams {{")?;
    writeln!(out, "  struct UrlQueryParam *params;")?;
    writeln!(out, "  size_t count;")?;
    writeln!(out, "  size_t capacity;")?;
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "extern char *url_encode(const char *str);")?;
    writeln!(out, "extern char *url_encode_allow_reserved(const char *str);")?;
    writeln!(out, "extern int url_query_init(struct UrlQueryParams *qp);")?;
    writeln!(out, "extern void url_query_free(struct UrlQueryParams *qp);")?;
    writeln!(
        out,
        "extern int url_query_add(struct UrlQueryParams *qp, const char *key, const char *value);"
    )?;
    writeln!(
        out,
        "extern int url_query_add_encoded(struct UrlQueryParams *qp, const char *key, const char *value);"
    )?;
    writeln!(
        out,
        "extern int url_query_build(const struct UrlQueryParams *qp, char **out_str);"
    )?;
    writeln!(out)?;
    writeln!(out, "/* --- HTTP transport contract (transport_factory.c) --- */")?;
    writeln!(out)?;
    writeln!(out, "struct ApiClient;")?;
    writeln!(
        out,
        "extern int api_client_init(struct ApiClient **client, const char *base_url);"
    )?;
    writeln!(out, "extern void api_client_cleanup(struct ApiClient *client);")?;
    writeln!(
        out,
        "extern int api_client_perform(struct ApiClient *client, const char *method,"
    )?;
    writeln!(
        out,
        "                              const char *path_and_query, const char *const *headers,"
    )?;
    writeln!(
        out,
        "                              size_t n_headers, const char *body, char **response_out);"
    )?;
    writeln!(out)?;
    writeln!(out, "/* --- Operations --- */")?;
    writeln!(out)?;

    for (_, op) in &operations {
        writeln!(out, "extern {};", operation_signature(spec, op))?;
    }
    writeln!(out)?;
    Ok(())
}

fn response_struct<'a>(spec: &'a Spec, op: &'a Operation) -> Option<&'a str> {
    for response in &op.responses {
        if !(response.code.starts_with('2') || response.code == "default") {
            continue;
        }
        if let Some(schema) = response.schema() {
            if let CShape::Scalar(CScalar::Struct(target)) = resolve_shape(spec, schema) {
                return Some(target);
            }
        }
    }
    None
}

fn body_struct<'a>(spec: &'a Spec, op: &'a Operation) -> Option<&'a str> {
    let schema = op.request_body.as_ref()?.schema()?;
    match resolve_shape(spec, schema) {
        CShape::Scalar(CScalar::Struct(target)) => Some(target),
        _ => None,
    }
}

fn operation_signature(spec: &Spec, op: &Operation) -> String {
    let fname = c_ident(op.operation_id.as_deref().unwrap_or("operation"));
    let mut args = vec!["struct ApiClient *client".to_owned()];

    for parameter in &op.parameters {
        if parameter.location == ParameterIn::Cookie {
            continue;
        }
        args.push(ParamArg::new(spec, parameter).signature());
    }

    if op.request_body.is_some() {
        match body_struct(spec, op) {
            Some(target) => args.push(format!("const struct {target} *body")),
            None => args.push("const char *body_json".to_owned()),
        }
    }

    match response_struct(spec, op) {
        Some(target) => args.push(format!("struct {target} **out")),
        None => args.push("char **response_out".to_owned()),
    }

    format!("int {fname}({})", args.join(", "))
}

/// Emits the operation function bodies.
pub(crate) fn write_sdk_source(
    spec: &Spec,
    _basename: &str,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let operations: Vec<(&str, &Operation)> = spec
        .operations()
        .filter(|(_, op)| op.operation_id.is_some())
        .collect();

    for (route, op) in operations {
        write_operation_impl(spec, out, route, op)?;
    }
    Ok(())
}

fn write_operation_impl(
    spec: &Spec,
    out: &mut dyn Write,
    route: &str,
    op: &Operation,
) -> Result<(), Error> {
    let args: Vec<ParamArg<'_>> = op
        .parameters
        .iter()
        .filter(|p| p.location != ParameterIn::Cookie)
        .map(|p| ParamArg::new(spec, p))
        .collect();

    let header_params: Vec<&ParamArg<'_>> = args
        .iter()
        .filter(|a| a.parameter().location == ParameterIn::Header)
        .collect();

    writeln!(out, "{} {{", operation_signature(spec, op))?;
    writeln!(out, "  struct UrlQueryParams qp;")?;
    writeln!(out, "  char *query = NULL;")?;
    writeln!(out, "  char *path = NULL;")?;
    writeln!(out, "  char *url = NULL;")?;
    writeln!(out, "  char *response = NULL;")?;
    if op.request_body.is_some() && body_struct(spec, op).is_some() {
        writeln!(out, "  char *body_json = NULL;")?;
    }
    if !header_params.is_empty() {
        writeln!(out, "  const char *headers[{}];", header_params.len())?;
        for arg in &header_params {
            let name = c_ident(&arg.parameter().name);
            writeln!(out, "  char {name}_hdr[256];")?;
        }
    }
    writeln!(out, "  int rc;")?;
    writeln!(out, "  if (client == NULL) return EINVAL;")?;

    for arg in &args {
        arg.write_stringify(out)?;
    }

    writeln!(out, "  url_query_init(&qp);")?;

    // Path: each template variable is replaced by its percent-encoded
    // value (simple style).
    write_path_build(out, route, &args)?;

    // Query parameters per style and explode.
    for arg in &args {
        let parameter = arg.parameter();
        if parameter.location != ParameterIn::Query {
            continue;
        }
        write_query_param(out, arg)?;
    }

    // Header parameters render in simple style.
    for (i, arg) in header_params.iter().enumerate() {
        let parameter = arg.parameter();
        let name = c_ident(&parameter.name);
        writeln!(
            out,
            "  sprintf({name}_hdr, \"{}: %s\", {});",
            c_escape(&parameter.name),
            arg.raw_expr()
        )?;
        writeln!(out, "  headers[{i}] = {name}_hdr;")?;
    }

    writeln!(out, "  rc = url_query_build(&qp, &query);")?;
    writeln!(out, "  if (rc != 0) goto done;")?;
    writeln!(
        out,
        "  url = (char *)malloc(strlen(path) + strlen(query) + 1);"
    )?;
    writeln!(out, "  if (url == NULL) {{ rc = ENOMEM; goto done; }}")?;
    writeln!(out, "  sprintf(url, \"%s%s\", path, query);")?;

    let body_expr = if op.request_body.is_some() {
        if let Some(target) = body_struct(spec, op) {
            writeln!(out, "  rc = {target}_to_json(body, &body_json);")?;
            writeln!(out, "  if (rc != 0) goto done;")?;
            "body_json"
        } else {
            "body_json"
        }
    } else {
        "NULL"
    };

    let headers_expr = if header_params.is_empty() {
        ("NULL", "0".to_owned())
    } else {
        ("headers", header_params.len().to_string())
    };
    writeln!(
        out,
        "  rc = api_client_perform(client, \"{}\", url, {}, {}, {body_expr}, &response);",
        op.wire_method(),
        headers_expr.0,
        headers_expr.1
    )?;
    writeln!(out, "  if (rc != 0) goto done;")?;

    match response_struct(spec, op) {
        Some(target) => {
            writeln!(out, "  if (response != NULL) rc = {target}_from_json(response, out);")?;
        }
        None => {
            writeln!(out, "  *response_out = response;")?;
            writeln!(out, "  response = NULL;")?;
        }
    }

    writeln!(out, "done:")?;
    writeln!(out, "  free(response);")?;
    if op.request_body.is_some() && body_struct(spec, op).is_some() {
        writeln!(out, "  free(body_json);")?;
    }
    writeln!(out, "  free(url);")?;
    writeln!(out, "  free(query);")?;
    writeln!(out, "  free(path);")?;
    writeln!(out, "  url_query_free(&qp);")?;
    writeln!(out, "  return rc;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_path_build(
    out: &mut dyn Write,
    route: &str,
    args: &[ParamArg<'_>],
) -> Result<(), Error> {
    // Split the route into literal segments and template variables.
    let mut format = String::new();
    let mut var_args: Vec<String> = Vec::new();
    let mut encoded: Vec<String> = Vec::new();
    let mut rest = route;
    while let Some(open) = rest.find('{') {
        format.push_str(&c_escape(&rest[..open]));
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let var = &rest[open + 1..open + close];
        format.push_str("%s");

        let arg = args.iter().find(|a| {
            a.parameter().location == ParameterIn::Path && a.parameter().name == var
        });
        match arg {
            Some(arg @ (ParamArg::Str(_) | ParamArg::Opaque(_))) => {
                let name = c_ident(&arg.parameter().name);
                writeln!(out, "  char *{name}_enc = url_encode({});", arg.raw_expr())?;
                writeln!(
                    out,
                    "  if ({name}_enc == NULL) {{ url_query_free(&qp); return ENOMEM; }}"
                )?;
                encoded.push(name.clone());
                var_args.push(format!("{name}_enc"));
            }
            Some(arg) => {
                var_args.push(arg.raw_expr());
            }
            None => {
                var_args.push("\"\"".to_owned());
            }
        }
        rest = &rest[open + close + 1..];
    }
    format.push_str(&c_escape(rest));

    let mut size_terms = vec![format!("strlen(\"{format}\")")];
    for arg in &var_args {
        if arg.starts_with('"') {
            continue;
        }
        size_terms.push(format!("strlen({arg})"));
    }

    writeln!(
        out,
        "  path = (char *)malloc({} + 1);",
        size_terms.join(" + ")
    )?;
    writeln!(out, "  if (path == NULL) {{ url_query_free(&qp); return ENOMEM; }}")?;
    if var_args.is_empty() {
        writeln!(out, "  strcpy(path, \"{format}\");")?;
    } else {
        writeln!(
            out,
            "  sprintf(path, \"{format}\", {});",
            var_args.join(", ")
        )?;
    }
    for name in &encoded {
        writeln!(out, "  free({name}_enc);")?;
    }
    Ok(())
}

fn write_query_param(out: &mut dyn Write, arg: &ParamArg<'_>) -> Result<(), Error> {
    let parameter = arg.parameter();
    let name = c_ident(&parameter.name);
    let json_name = c_escape(&parameter.name);
    let explode = parameter.explode.unwrap_or(true);
    let style = parameter.style.unwrap_or(ParameterStyle::Form);

    match arg {
        ParamArg::StrArray(_) => {
            if style == ParameterStyle::Form && !explode {
                // Comma-joined form value; the comma must survive, so the
                // joined string is added pre-encoded.
                writeln!(out, "  if ({name} != NULL && n_{name} > 0) {{")?;
                writeln!(out, "    size_t i;")?;
                writeln!(out, "    size_t cap = 1;")?;
                writeln!(out, "    char *joined;")?;
                writeln!(out, "    for (i = 0; i < n_{name}; ++i)")?;
                writeln!(out, "      cap += strlen({name}[i]) * 3 + 1;")?;
                writeln!(out, "    joined = (char *)malloc(cap);")?;
                writeln!(
                    out,
                    "    if (joined == NULL) {{ url_query_free(&qp); return ENOMEM; }}"
                )?;
                writeln!(out, "    joined[0] = '\\0';")?;
                writeln!(out, "    for (i = 0; i < n_{name}; ++i) {{")?;
                writeln!(out, "      char *enc = url_encode({name}[i]);")?;
                writeln!(
                    out,
                    "      if (enc == NULL) {{ free(joined); url_query_free(&qp); return ENOMEM; }}"
                )?;
                writeln!(out, "      if (i > 0) strcat(joined, \",\");")?;
                writeln!(out, "      strcat(joined, enc);")?;
                writeln!(out, "      free(enc);")?;
                writeln!(out, "    }}")?;
                writeln!(out, "    url_query_add_encoded(&qp, \"{json_name}\", joined);")?;
                writeln!(out, "    free(joined);")?;
                writeln!(out, "  }}")?;
            } else {
                // form + explode: one key per value.
                writeln!(out, "  if ({name} != NULL) {{")?;
                writeln!(out, "    size_t i;")?;
                writeln!(out, "    for (i = 0; i < n_{name}; ++i)")?;
                writeln!(out, "      url_query_add(&qp, \"{json_name}\", {name}[i]);")?;
                writeln!(out, "  }}")?;
            }
        }
        ParamArg::Str(_) | ParamArg::Opaque(_) => {
            writeln!(out, "  if ({name} != NULL)")?;
            writeln!(out, "    url_query_add(&qp, \"{json_name}\", {name});")?;
        }
        _ => {
            writeln!(out, "  url_query_add(&qp, \"{json_name}\", {});", arg.raw_expr())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::codegen::tests::{header_for, source_for};

    fn doc() -> serde_json::Value {
        json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/pets/{petId}": {
                    "get": {
                        "operationId": "getPet",
                        "parameters": [
                            {
                                "name": "petId",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer", "format": "int64" }
                            },
                            {
                                "name": "verbose",
                                "in": "query",
                                "schema": { "type": "boolean" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Pet" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "parameters": [
                            {
                                "name": "tags",
                                "in": "query",
                                "style": "form",
                                "explode": false,
                                "schema": { "type": "array", "items": { "type": "string" } }
                            }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
                }
            }
        })
    }

    #[test]
    fn operation_prototypes_in_header() {
        let header = header_for(doc());
        assert!(header
            .contains("extern int getPet(struct ApiClient *client, long petId, int verbose, struct Pet **out);"));
        assert!(header.contains(
            "extern int listPets(struct ApiClient *client, const char *const *tags, size_t n_tags, char **response_out);"
        ));
    }

    #[test]
    fn transport_contract_declared() {
        let header = header_for(doc());
        assert!(header.contains("struct ApiClient;"));
        assert!(header.contains("api_client_init"));
        assert!(header.contains("api_client_perform"));
        assert!(header.contains("url_query_add_encoded"));
    }

    #[test]
    fn form_no_explode_array_joins_with_commas_pre_encoded() {
        let source = source_for(doc());
        assert!(source.contains("strcat(joined, \",\");"));
        assert!(source.contains("url_query_add_encoded(&qp, \"tags\", joined);"));
    }

    #[test]
    fn numeric_path_param_formats_into_path() {
        let source = source_for(doc());
        assert!(source.contains("sprintf(petId_str, \"%ld\", petId);"));
        assert!(source.contains("sprintf(path, \"/pets/%s\", petId_str);"));
    }

    #[test]
    fn response_parses_into_struct() {
        let source = source_for(doc());
        assert!(source.contains("rc = Pet_from_json(response, out);"));
    }
}
