//! Path item, operation, parameter, and response loading.
//!
//! Path-level parameters merge into each operation before the operation is
//! validated; the merged list drives parameter uniqueness, `querystring`
//! exclusivity, and path-template checks. Inline body and response schemas
//! are promoted into named components as they are encountered.

use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};

use super::{
    arr, extensions, get_bool, get_str, load_external_docs, obj, promote::promote_inline_schema,
    req_str, schema::load_schema_ref, security,
};
use crate::spec::{
    Any, Callback, DocumentRegistry, Encoding, Error, Example, Header, Link, MediaType,
    MultipartField, Operation, Parameter, ParameterIn, ParameterStyle, PathItem, RefError,
    RequestBody, Response, SchemaRef, Server, ServerVariable, Spec, Verb,
};

/// Loads a `paths` or `webhooks` map into path items.
///
/// `validate_templates` is set for `paths`: routes must start with `/`, and
/// sibling templates may not differ only in variable names.
pub(crate) fn load_path_items(
    spec: &mut Spec,
    map: &Map<String, Value>,
    validate_templates: bool,
    registry: &DocumentRegistry,
) -> Result<Vec<PathItem>, Error> {
    let mut items = Vec::with_capacity(map.len());

    for (route, value) in map {
        if route.starts_with("x-") {
            continue;
        }
        if validate_templates && !route.starts_with('/') {
            return Err(Error::PathMissingSlash(route.clone()));
        }

        let item = load_path_item(spec, route, value, validate_templates, registry)?;

        if validate_templates {
            let normalized = item.normalized_template();
            if let Some(other) = items
                .iter()
                .find(|p: &&PathItem| p.normalized_template() == normalized && p.route != item.route)
            {
                return Err(Error::AmbiguousPathTemplates(
                    other.route.clone(),
                    item.route,
                ));
            }
        }

        items.push(item);
    }

    Ok(items)
}

/// Loads one path item, including its operations and
/// `additionalOperations`.
pub(crate) fn load_path_item(
    spec: &mut Spec,
    route: &str,
    value: &Value,
    validate_templates: bool,
    registry: &DocumentRegistry,
) -> Result<PathItem, Error> {
    let map = obj(value, route)?;

    let mut item = PathItem {
        route: route.to_owned(),
        ref_path: get_str(map, "$ref"),
        summary: get_str(map, "summary"),
        description: get_str(map, "description"),
        extensions: extensions(map),
        ..PathItem::default()
    };

    if let Some(servers) = map.get("servers") {
        item.servers = load_servers_array(servers)?;
    }

    if let Some(parameters) = map.get("parameters") {
        for entry in arr(parameters, "parameters")? {
            if let Some(parameter) = load_parameter(spec, entry, None, registry)? {
                item.parameters.push(parameter);
            }
        }
        check_parameter_uniqueness(&item.parameters)?;
    }

    for verb in Verb::ALL {
        let Some(op_value) = map.get(verb.as_str()) else {
            continue;
        };
        let operation = load_operation(
            spec,
            route,
            *verb,
            None,
            op_value,
            &item.parameters,
            validate_templates,
            registry,
        )?;
        item.operations.push(operation);
    }

    if let Some(additional) = map.get("additionalOperations") {
        for (method, op_value) in obj(additional, "additionalOperations")? {
            if Verb::is_standard_method(method) {
                return Err(Error::StandardMethodInAdditional(method.clone()));
            }
            let operation = load_operation(
                spec,
                route,
                Verb::Get,
                Some(method.as_str()),
                op_value,
                &item.parameters,
                validate_templates,
                registry,
            )?;
            item.operations.push(operation);
        }
    }

    Ok(item)
}

#[allow(clippy::too_many_arguments)]
fn load_operation(
    spec: &mut Spec,
    route: &str,
    verb: Verb,
    method: Option<&str>,
    value: &Value,
    path_parameters: &[Parameter],
    validate_templates: bool,
    registry: &DocumentRegistry,
) -> Result<Operation, Error> {
    let map = obj(value, &format!("{} {route}", method.unwrap_or(verb.method())))?;

    let mut op = Operation {
        verb,
        method: method.map(str::to_owned),
        is_additional: method.is_some(),
        operation_id: get_str(map, "operationId"),
        summary: get_str(map, "summary"),
        description: get_str(map, "description"),
        deprecated: get_bool(map, "deprecated"),
        tags: super::str_vec(map.get("tags")),
        extensions: extensions(map),
        ..Operation::default()
    };

    if let Some(docs) = map.get("externalDocs") {
        op.external_docs = Some(load_external_docs(docs)?);
    }
    if let Some(servers) = map.get("servers") {
        op.servers = load_servers_array(servers)?;
    }

    // A stable name for synthesized inline components.
    let ctx = op
        .operation_id
        .clone()
        .unwrap_or_else(|| sanitize_context(&format!("{}_{}", op.wire_method(), route)));

    if let Some(parameters) = map.get("parameters") {
        for entry in arr(parameters, "parameters")? {
            if let Some(parameter) = load_parameter(spec, entry, Some(&ctx), registry)? {
                op.parameters.push(parameter);
            }
        }
    }
    check_parameter_uniqueness(&op.parameters)?;

    // Merge path-level parameters: operation definitions shadow them.
    for inherited in path_parameters {
        let shadowed = op
            .parameters
            .iter()
            .any(|p| p.name == inherited.name && p.location == inherited.location);
        if !shadowed {
            op.parameters.push(inherited.clone());
        }
    }

    validate_querystring_exclusivity(&op.parameters)?;

    if validate_templates {
        validate_path_template(route, &op.parameters)?;
    }

    if let Some(body) = map.get("requestBody") {
        let promote_base = format!("Inline_{ctx}_Request");
        op.request_body = Some(load_request_body(spec, body, &promote_base, registry)?);
    }

    match map.get("responses") {
        Some(responses) => {
            for (code, entry) in obj(responses, "responses")? {
                if code.starts_with("x-") {
                    continue;
                }
                Operation::valid_response_code(code)?;
                let promote_base = format!("Inline_{ctx}_Response_{code}");
                op.responses
                    .push(load_response(spec, code, entry, &promote_base, registry)?);
            }
        }
        None => {
            return Err(Error::MissingResponses(
                op.operation_id.clone().unwrap_or_else(|| ctx.clone()),
            ))
        }
    }

    if let Some(callbacks) = map.get("callbacks") {
        for (name, entry) in obj(callbacks, "callbacks")? {
            if name.starts_with("x-") {
                continue;
            }
            op.callbacks
                .insert(name.clone(), load_callback(spec, entry, registry)?);
        }
    }

    if let Some(requirements) = map.get("security") {
        op.security = Some(security::load_security_requirements(requirements)?);
    }

    debug!("loaded operation {} {route}", op.wire_method());
    Ok(op)
}

fn sanitize_context(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn check_parameter_uniqueness(parameters: &[Parameter]) -> Result<(), Error> {
    for (i, parameter) in parameters.iter().enumerate() {
        if parameters[..i]
            .iter()
            .any(|p| p.name == parameter.name && p.location == parameter.location)
        {
            return Err(Error::DuplicateParameter {
                name: parameter.name.clone(),
                location: parameter.location.as_str().to_owned(),
            });
        }
    }
    Ok(())
}

fn validate_querystring_exclusivity(parameters: &[Parameter]) -> Result<(), Error> {
    let querystrings = parameters
        .iter()
        .filter(|p| p.location == ParameterIn::Querystring)
        .count();
    if querystrings == 0 {
        return Ok(());
    }
    let queries = parameters
        .iter()
        .any(|p| p.location == ParameterIn::Query);
    if querystrings > 1 || queries {
        return Err(Error::QuerystringConflict);
    }
    Ok(())
}

fn validate_path_template(route: &str, parameters: &[Parameter]) -> Result<(), Error> {
    let item = PathItem {
        route: route.to_owned(),
        ..PathItem::default()
    };
    for var in item.template_variables() {
        let declared = parameters.iter().any(|p| {
            p.location == ParameterIn::Path && p.name == var && p.required == Some(true)
        });
        if !declared {
            return Err(Error::MissingPathParameter {
                route: route.to_owned(),
                var: var.to_owned(),
            });
        }
    }
    Ok(())
}

/// Loads one parameter.
///
/// Returns `Ok(None)` for reserved header parameters (`Accept`,
/// `Content-Type`, `Authorization`), which are silently dropped. Local
/// component references are resolved against the already-loaded components.
/// With a promotion context, inline object schemas inside `content` are
/// promoted as `Inline_<ctx>_<name>`.
pub(crate) fn load_parameter(
    spec: &mut Spec,
    value: &Value,
    promote_ctx: Option<&str>,
    registry: &DocumentRegistry,
) -> Result<Option<Parameter>, Error> {
    let map = obj(value, "parameter")?;

    if let Some(reference) = get_str(map, "$ref") {
        let resolved = crate::spec::local_component_name(&reference)
            .filter(|(kind, _)| *kind == "parameters")
            .and_then(|(_, name)| spec.components.parameters.get(name));
        return match resolved {
            Some(parameter) => Ok(Some(parameter.clone())),
            None => Err(Error::Ref(RefError::Unresolvable(reference))),
        };
    }

    if !map.contains_key("name") || !map.contains_key("in") {
        return Err(Error::ParameterMissingNameOrIn);
    }

    let name = req_str(map, "name", "parameter")?;
    let location = ParameterIn::parse(&req_str(map, "in", "parameter")?)?;

    let mut parameter = Parameter {
        name,
        location,
        description: get_str(map, "description"),
        required: get_bool(map, "required"),
        deprecated: get_bool(map, "deprecated"),
        allow_empty_value: get_bool(map, "allowEmptyValue"),
        explode: get_bool(map, "explode"),
        allow_reserved: get_bool(map, "allowReserved"),
        extensions: extensions(map),
        ..Parameter::default()
    };

    if parameter.is_reserved_header() {
        debug!("dropping reserved header parameter {:?}", parameter.name);
        return Ok(None);
    }

    if location == ParameterIn::Path && parameter.required != Some(true) {
        return Err(Error::PathParameterNotRequired(parameter.name));
    }

    if parameter.allow_empty_value.is_some() && location != ParameterIn::Query {
        return Err(Error::AllowEmptyValueNotQuery);
    }

    if let Some(style) = get_str(map, "style") {
        let style = ParameterStyle::parse(&style)?;
        if location == ParameterIn::Header && style != ParameterStyle::Simple {
            return Err(Error::HeaderStyleNotSimple(parameter.name));
        }
        parameter.style = Some(style);
    }

    let (example, examples) = load_example_pair(map, &parameter.name)?;
    parameter.example = example;
    parameter.examples = examples;

    match (map.get("schema"), map.get("content")) {
        (Some(_), Some(_)) => {
            return Err(Error::SchemaContentConflict(parameter.name));
        }
        (Some(schema), None) => {
            parameter.schema = Some(load_schema_ref(schema)?);
        }
        (None, Some(content)) => {
            let content = obj(content, "parameter.content")?;
            if content.len() != 1 {
                return Err(Error::ContentNotSingular(parameter.name));
            }
            for (media_range, media_value) in content {
                parameter.content_type = Some(media_range.clone());
                let media = match promote_ctx {
                    Some(ctx) => {
                        let promote_name = format!("Inline_{ctx}_{}", parameter.name);
                        load_media_type(spec, media_range, media_value, &promote_name, registry)?
                    }
                    None => load_media_type_shared(spec, media_range, media_value)?,
                };
                if !media.examples.is_empty() || media.example.is_some() {
                    parameter.example_location = crate::spec::ExampleLocation::Media;
                }
                parameter.content_media_types.push(media);
            }
        }
        (None, None) => {}
    }

    Ok(Some(parameter))
}

/// Loads one header object.
///
/// Returns `Ok(None)` for `Content-Type` headers, which are silently
/// dropped.
pub(crate) fn load_header(spec: &Spec, name: &str, value: &Value) -> Result<Option<Header>, Error> {
    if name.eq_ignore_ascii_case("content-type") {
        debug!("dropping Content-Type response header");
        return Ok(None);
    }

    let map = obj(value, &format!("header {name}"))?;

    if let Some(reference) = get_str(map, "$ref") {
        let resolved = crate::spec::local_component_name(&reference)
            .filter(|(kind, _)| *kind == "headers")
            .and_then(|(_, hname)| spec.components.headers.get(hname));
        return match resolved {
            Some(header) => {
                let mut header = header.clone();
                header.name = name.to_owned();
                Ok(Some(header))
            }
            None => Err(Error::Ref(RefError::Unresolvable(reference))),
        };
    }

    if let Some(style) = get_str(map, "style") {
        if ParameterStyle::parse(&style)? != ParameterStyle::Simple {
            return Err(Error::HeaderStyleNotSimple(name.to_owned()));
        }
    }

    let mut header = Header {
        name: name.to_owned(),
        description: get_str(map, "description"),
        required: get_bool(map, "required"),
        deprecated: get_bool(map, "deprecated"),
        explode: get_bool(map, "explode"),
        extensions: extensions(map),
        ..Header::default()
    };

    let (example, examples) = load_example_pair(map, name)?;
    header.example = example;
    header.examples = examples;

    match (map.get("schema"), map.get("content")) {
        (Some(_), Some(_)) => return Err(Error::SchemaContentConflict(name.to_owned())),
        (Some(schema), None) => header.schema = Some(load_schema_ref(schema)?),
        (None, Some(content)) => {
            let content = obj(content, "header.content")?;
            if content.len() != 1 {
                return Err(Error::ContentNotSingular(name.to_owned()));
            }
            for (media_range, media_value) in content {
                header.content_type = Some(media_range.clone());
                header
                    .content_media_types
                    .push(load_media_type_shared(spec, media_range, media_value)?);
            }
        }
        (None, None) => {}
    }

    Ok(Some(header))
}

/// Loads a media type object without promotion.
pub(crate) fn load_media_type_shared(
    spec: &Spec,
    name: &str,
    value: &Value,
) -> Result<MediaType, Error> {
    let map = obj(value, &format!("media type {name}"))?;

    let mut media = MediaType {
        name: name.to_owned(),
        extensions: extensions(map),
        ..MediaType::default()
    };

    let (example, examples) = load_example_pair(map, name)?;
    media.example = example;
    media.examples = examples;

    if let Some(schema) = map.get("schema") {
        media.schema = Some(load_schema_ref(schema)?);
    }

    if let Some(encoding) = map.get("encoding") {
        let Some(schema_value) = map.get("schema") else {
            return Err(Error::EncodingWithoutSchema);
        };
        let property_names = schema_property_names(spec, schema_value);
        for (prop, enc_value) in obj(encoding, "encoding")? {
            if let Some(known) = &property_names {
                if !known.iter().any(|p| p == prop) {
                    return Err(Error::EncodingUnknownProperty(prop.clone()));
                }
            }
            media.encoding.push(load_encoding(spec, prop, enc_value)?);
        }
    }

    Ok(media)
}

/// Loads a media type at a promotable position (request/response content).
pub(crate) fn load_media_type(
    spec: &mut Spec,
    name: &str,
    value: &Value,
    promote_ctx: &str,
    registry: &DocumentRegistry,
) -> Result<MediaType, Error> {
    let map = obj(value, &format!("media type {name}"))?;

    let mut media = load_media_type_shared(spec, name, value)?;

    if let Some(schema_value) = map.get("schema") {
        if name.starts_with("multipart/") {
            media.schema = Some(load_multipart_schema(schema_value)?);
        } else {
            media.schema = Some(promote_inline_schema(
                spec,
                registry,
                schema_value,
                promote_ctx,
            )?);
        }
    }

    Ok(media)
}

/// Multipart bodies flatten into named typed parts instead of promoting.
fn load_multipart_schema(value: &Value) -> Result<SchemaRef, Error> {
    let mut schema = load_schema_ref(value)?;

    let properties = value
        .as_object()
        .and_then(|map| map.get("properties"))
        .and_then(Value::as_object);
    let Some(properties) = properties else {
        return Ok(schema);
    };

    for (prop, prop_value) in properties {
        let prop_map = prop_value.as_object();
        let ty = prop_map
            .and_then(|m| m.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("string");
        let is_binary = prop_map
            .and_then(|m| m.get("format"))
            .and_then(Value::as_str)
            == Some("binary");
        schema.multipart_fields.push(MultipartField {
            name: prop.clone(),
            ty: ty.to_owned(),
            is_binary,
        });
    }
    // The verbatim properties are superseded by the typed parts.
    schema.extra = None;
    schema.inline_type = Some("object".to_owned());
    Ok(schema)
}

fn schema_property_names(spec: &Spec, schema_value: &Value) -> Option<Vec<String>> {
    let map = schema_value.as_object()?;
    if let Some(properties) = map.get("properties").and_then(Value::as_object) {
        return Some(properties.keys().cloned().collect());
    }
    if let Some(reference) = get_str(map, "$ref") {
        let name = crate::spec::local_component_name(&reference)
            .filter(|(kind, _)| *kind == "schemas")
            .map(|(_, name)| name.to_owned())?;
        let sf = spec.defined_schemas.get(&name)?;
        return Some(sf.fields.iter().map(|f| f.name.clone()).collect());
    }
    None
}

fn load_encoding(spec: &Spec, name: &str, value: &Value) -> Result<Encoding, Error> {
    let map = obj(value, &format!("encoding {name}"))?;

    let mut encoding = Encoding {
        name: name.to_owned(),
        content_type: get_str(map, "contentType"),
        style: get_str(map, "style"),
        explode: get_bool(map, "explode"),
        allow_reserved: get_bool(map, "allowReserved"),
        extensions: extensions(map),
        ..Encoding::default()
    };

    if let Some(headers) = map.get("headers") {
        for (hname, hvalue) in obj(headers, "encoding.headers")? {
            if let Some(header) = load_header(spec, hname, hvalue)? {
                encoding.headers.push(header);
            }
        }
    }

    Ok(encoding)
}

/// Enforces `example`/`examples` exclusivity and loads both forms.
pub(crate) fn load_example_pair(
    map: &Map<String, Value>,
    object_name: &str,
) -> Result<(Option<Any>, IndexMap<String, Example>), Error> {
    if map.contains_key("example") && map.contains_key("examples") {
        return Err(Error::ExampleConflict(object_name.to_owned()));
    }

    let example = map.get("example").map(Any::from_value);

    let mut examples = IndexMap::new();
    if let Some(raw) = map.get("examples") {
        for (name, value) in obj(raw, "examples")? {
            examples.insert(name.clone(), load_example_object(name, value)?);
        }
    }

    Ok((example, examples))
}

/// Loads one example object, enforcing its two exclusive value pairs.
pub(crate) fn load_example_object(name: &str, value: &Value) -> Result<Example, Error> {
    let map = obj(value, &format!("example {name}"))?;

    let data_value = map.get("dataValue").or_else(|| map.get("value"));
    if map.contains_key("dataValue") && map.contains_key("value") {
        return Err(Error::ExampleValueConflict(name.to_owned()));
    }
    if map.contains_key("serializedValue") && map.contains_key("externalValue") {
        return Err(Error::ExampleValueConflict(name.to_owned()));
    }
    if data_value.is_some()
        && (map.contains_key("serializedValue") || map.contains_key("externalValue"))
    {
        return Err(Error::ExampleValueConflict(name.to_owned()));
    }

    Ok(Example {
        summary: get_str(map, "summary"),
        description: get_str(map, "description"),
        value: data_value.map(Any::from_value),
        serialized_value: get_str(map, "serializedValue"),
        external_value: get_str(map, "externalValue"),
        extensions: extensions(map),
    })
}

/// Loads a request body, promoting inline object schemas under
/// `promote_base`.
pub(crate) fn load_request_body(
    spec: &mut Spec,
    value: &Value,
    promote_base: &str,
    registry: &DocumentRegistry,
) -> Result<RequestBody, Error> {
    let map = obj(value, "requestBody")?;

    if let Some(reference) = get_str(map, "$ref") {
        return Ok(RequestBody {
            ref_path: Some(reference),
            description: get_str(map, "description"),
            extensions: extensions(map),
            ..RequestBody::default()
        });
    }

    let mut body = RequestBody {
        description: get_str(map, "description"),
        required: get_bool(map, "required"),
        extensions: extensions(map),
        ..RequestBody::default()
    };

    let Some(content) = map.get("content") else {
        return Err(Error::MissingField {
            field: "content",
            object: "requestBody".to_owned(),
        });
    };

    for (media_range, media_value) in obj(content, "requestBody.content")? {
        body.content.push(load_media_type(
            spec,
            media_range,
            media_value,
            promote_base,
            registry,
        )?);
    }

    Ok(body)
}

/// Loads a response, promoting inline content schemas under
/// `promote_base`.
pub(crate) fn load_response(
    spec: &mut Spec,
    code: &str,
    value: &Value,
    promote_base: &str,
    registry: &DocumentRegistry,
) -> Result<Response, Error> {
    let map = obj(value, &format!("response {code}"))?;

    let mut response = Response {
        code: code.to_owned(),
        ref_path: get_str(map, "$ref"),
        description: get_str(map, "description"),
        summary: get_str(map, "summary"),
        extensions: extensions(map),
        ..Response::default()
    };

    if response.ref_path.is_none() && response.description.is_none() {
        return Err(Error::ResponseMissingDescription(code.to_owned()));
    }

    if let Some(headers) = map.get("headers") {
        for (name, hvalue) in obj(headers, "response.headers")? {
            if let Some(header) = load_header(spec, name, hvalue)? {
                response.headers.push(header);
            }
        }
    }

    if let Some(content) = map.get("content") {
        for (media_range, media_value) in obj(content, "response.content")? {
            response.content.push(load_media_type(
                spec,
                media_range,
                media_value,
                promote_base,
                registry,
            )?);
        }
    }

    if let Some(links) = map.get("links") {
        for (name, lvalue) in obj(links, "response.links")? {
            response.links.insert(name.clone(), load_link(lvalue)?);
        }
    }

    Ok(response)
}

pub(crate) fn load_link(value: &Value) -> Result<Link, Error> {
    let map = obj(value, "link")?;

    let mut link = Link {
        operation_ref: get_str(map, "operationRef"),
        operation_id: get_str(map, "operationId"),
        description: get_str(map, "description"),
        request_body: map.get("requestBody").cloned(),
        extensions: extensions(map),
        ..Link::default()
    };

    if let Some(parameters) = map.get("parameters") {
        for (name, pvalue) in obj(parameters, "link.parameters")? {
            link.parameters.insert(name.clone(), pvalue.clone());
        }
    }

    if let Some(server) = map.get("server") {
        let smap = obj(server, "link.server")?;
        let mut srv = Server {
            url: req_str(smap, "url", "link.server")?,
            name: get_str(smap, "name"),
            description: get_str(smap, "description"),
            extensions: extensions(smap),
            ..Server::default()
        };
        if let Some(variables) = smap.get("variables") {
            for (key, vvalue) in obj(variables, "server.variables")? {
                let vmap = obj(vvalue, "server variable")?;
                srv.variables.insert(
                    key.clone(),
                    ServerVariable {
                        default: req_str(vmap, "default", "server variable")?,
                        enum_values: super::str_vec(vmap.get("enum")),
                        description: get_str(vmap, "description"),
                        extensions: extensions(vmap),
                    },
                );
            }
        }
        link.server = Some(srv);
    }

    Ok(link)
}

pub(crate) fn load_callback(
    spec: &mut Spec,
    value: &Value,
    registry: &DocumentRegistry,
) -> Result<Callback, Error> {
    let map = obj(value, "callback")?;

    let mut callback = Callback {
        extensions: extensions(map),
        ..Callback::default()
    };

    for (expression, item_value) in map {
        if expression.starts_with("x-") {
            continue;
        }
        callback
            .expressions
            .push(load_path_item(spec, expression, item_value, false, registry)?);
    }

    Ok(callback)
}

fn load_servers_array(value: &Value) -> Result<Vec<Server>, Error> {
    let list = arr(value, "servers")?;
    let mut servers = Vec::with_capacity(list.len());
    for entry in list {
        let map = obj(entry, "server")?;
        let url = req_str(map, "url", "server")?;
        if url.contains('?') || url.contains('#') {
            return Err(Error::ServerUrlQueryFragment(url));
        }
        servers.push(Server {
            url,
            name: get_str(map, "name"),
            description: get_str(map, "description"),
            extensions: extensions(map),
            ..Server::default()
        });
    }
    Ok(servers)
}
