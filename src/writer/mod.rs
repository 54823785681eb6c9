//! Canonical OpenAPI JSON emission.
//!
//! The writer is a pure function from a [`Spec`] to a JSON value. Ordered
//! collections keep their insertion order, extensions are re-inserted
//! verbatim under their original keys, and the final invariant checks run
//! before any output is produced.

use serde_json::{json, Map, Value};

mod schema;

pub(crate) use self::schema::write_schema_ref;
use self::schema::{
    extend_extensions, write_discriminator, write_external_docs, write_struct_fields,
};
use crate::spec::{
    Callback, Components, Encoding, Error, Example, Header, Link, MediaType, OAuthFlow,
    Operation, Parameter, PathItem, RequestBody, Response, SecurityRequirement, SecurityScheme,
    SecuritySchemeKind, Server, Spec, StructFields,
};

/// Serializes a spec to canonical OpenAPI JSON.
///
/// Schema documents echo their original root verbatim. The writer re-runs
/// the load-time invariants that depend only on the model (license field
/// conflict, server URL shape, operation-id uniqueness) and refuses to emit
/// a violating document.
pub fn write_spec(spec: &Spec) -> Result<Value, Error> {
    if spec.is_schema_document {
        return Ok(spec.schema_root_json.clone().unwrap_or(Value::Null));
    }

    validate(spec)?;

    let mut root = Map::new();

    if let Some(version) = &spec.openapi_version {
        root.insert("openapi".to_owned(), json!(version));
    }
    if let Some(self_uri) = &spec.self_uri {
        root.insert("$self".to_owned(), json!(self_uri));
    }
    if let Some(dialect) = &spec.json_schema_dialect {
        root.insert("jsonSchemaDialect".to_owned(), json!(dialect));
    }

    if let Some(info) = &spec.info {
        let mut obj = Map::new();
        obj.insert("title".to_owned(), json!(info.title));
        if let Some(summary) = &info.summary {
            obj.insert("summary".to_owned(), json!(summary));
        }
        if let Some(description) = &info.description {
            obj.insert("description".to_owned(), json!(description));
        }
        if let Some(terms) = &info.terms_of_service {
            obj.insert("termsOfService".to_owned(), json!(terms));
        }
        if let Some(contact) = &info.contact {
            let mut cobj = Map::new();
            if let Some(name) = &contact.name {
                cobj.insert("name".to_owned(), json!(name));
            }
            if let Some(url) = &contact.url {
                cobj.insert("url".to_owned(), json!(url));
            }
            if let Some(email) = &contact.email {
                cobj.insert("email".to_owned(), json!(email));
            }
            extend_extensions(&mut cobj, &contact.extensions);
            obj.insert("contact".to_owned(), Value::Object(cobj));
        }
        if let Some(license) = &info.license {
            let mut lobj = Map::new();
            lobj.insert("name".to_owned(), json!(license.name));
            if let Some(identifier) = &license.identifier {
                lobj.insert("identifier".to_owned(), json!(identifier));
            }
            if let Some(url) = &license.url {
                lobj.insert("url".to_owned(), json!(url));
            }
            extend_extensions(&mut lobj, &license.extensions);
            obj.insert("license".to_owned(), Value::Object(lobj));
        }
        obj.insert("version".to_owned(), json!(info.version));
        extend_extensions(&mut obj, &info.extensions);
        root.insert("info".to_owned(), Value::Object(obj));
    }

    if let Some(docs) = &spec.external_docs {
        root.insert("externalDocs".to_owned(), write_external_docs(docs));
    }

    if !spec.tags.is_empty() {
        let tags: Vec<Value> = spec
            .tags
            .iter()
            .map(|tag| {
                let mut obj = Map::new();
                obj.insert("name".to_owned(), json!(tag.name));
                if let Some(summary) = &tag.summary {
                    obj.insert("summary".to_owned(), json!(summary));
                }
                if let Some(description) = &tag.description {
                    obj.insert("description".to_owned(), json!(description));
                }
                if let Some(parent) = &tag.parent {
                    obj.insert("parent".to_owned(), json!(parent));
                }
                if let Some(kind) = &tag.kind {
                    obj.insert("kind".to_owned(), json!(kind));
                }
                if let Some(docs) = &tag.external_docs {
                    obj.insert("externalDocs".to_owned(), write_external_docs(docs));
                }
                extend_extensions(&mut obj, &tag.extensions);
                Value::Object(obj)
            })
            .collect();
        root.insert("tags".to_owned(), Value::Array(tags));
    }

    if !spec.servers.is_empty() {
        root.insert("servers".to_owned(), write_servers(&spec.servers));
    }

    if !spec.paths.is_empty() {
        let mut paths = Map::new();
        for item in &spec.paths {
            paths.insert(item.route.clone(), write_path_item(item));
        }
        root.insert("paths".to_owned(), Value::Object(paths));
    }

    if !spec.webhooks.is_empty() {
        let mut webhooks = Map::new();
        for item in &spec.webhooks {
            webhooks.insert(item.route.clone(), write_path_item(item));
        }
        root.insert("webhooks".to_owned(), Value::Object(webhooks));
    }

    let components = write_components(spec);
    if !components.is_empty() {
        root.insert("components".to_owned(), Value::Object(components));
    }

    if let Some(requirements) = &spec.security {
        root.insert(
            "security".to_owned(),
            write_security_requirements(requirements),
        );
    }

    extend_extensions(&mut root, &spec.extensions);
    Ok(Value::Object(root))
}

/// Final invariant checks before emission.
fn validate(spec: &Spec) -> Result<(), Error> {
    if let Some(license) = spec.info.as_ref().and_then(|info| info.license.as_ref()) {
        if license.has_field_conflict() {
            return Err(Error::LicenseConflict);
        }
    }

    for server in &spec.servers {
        if server.url.contains('?') || server.url.contains('#') {
            return Err(Error::ServerUrlQueryFragment(server.url.clone()));
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for (_, op) in spec.operations() {
        if let Some(id) = op.operation_id.as_deref() {
            if seen.contains(&id) {
                return Err(Error::DuplicateOperationId(id.to_owned()));
            }
            seen.push(id);
        }
    }

    Ok(())
}

fn write_servers(servers: &[Server]) -> Value {
    let list: Vec<Value> = servers
        .iter()
        .map(|server| {
            let mut obj = Map::new();
            obj.insert("url".to_owned(), json!(server.url));
            if let Some(name) = &server.name {
                obj.insert("name".to_owned(), json!(name));
            }
            if let Some(description) = &server.description {
                obj.insert("description".to_owned(), json!(description));
            }
            if !server.variables.is_empty() {
                let mut variables = Map::new();
                for (name, variable) in &server.variables {
                    let mut vobj = Map::new();
                    vobj.insert("default".to_owned(), json!(variable.default));
                    if !variable.enum_values.is_empty() {
                        vobj.insert("enum".to_owned(), json!(variable.enum_values));
                    }
                    if let Some(description) = &variable.description {
                        vobj.insert("description".to_owned(), json!(description));
                    }
                    extend_extensions(&mut vobj, &variable.extensions);
                    variables.insert(name.clone(), Value::Object(vobj));
                }
                obj.insert("variables".to_owned(), Value::Object(variables));
            }
            extend_extensions(&mut obj, &server.extensions);
            Value::Object(obj)
        })
        .collect();
    Value::Array(list)
}

fn write_path_item(item: &PathItem) -> Value {
    let mut obj = Map::new();

    if let Some(reference) = &item.ref_path {
        obj.insert("$ref".to_owned(), json!(reference));
    }
    if let Some(summary) = &item.summary {
        obj.insert("summary".to_owned(), json!(summary));
    }
    if let Some(description) = &item.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if !item.servers.is_empty() {
        obj.insert("servers".to_owned(), write_servers(&item.servers));
    }
    if !item.parameters.is_empty() {
        let parameters: Vec<Value> = item.parameters.iter().map(write_parameter).collect();
        obj.insert("parameters".to_owned(), Value::Array(parameters));
    }

    for op in item.operations.iter().filter(|op| !op.is_additional) {
        obj.insert(
            op.verb.as_str().to_owned(),
            write_operation(op, &item.parameters),
        );
    }

    let additional: Vec<&Operation> =
        item.operations.iter().filter(|op| op.is_additional).collect();
    if !additional.is_empty() {
        let mut map = Map::new();
        for op in additional {
            map.insert(
                op.wire_method().to_owned(),
                write_operation(op, &item.parameters),
            );
        }
        obj.insert("additionalOperations".to_owned(), Value::Object(map));
    }

    extend_extensions(&mut obj, &item.extensions);
    Value::Object(obj)
}

fn write_operation(op: &Operation, path_parameters: &[Parameter]) -> Value {
    let mut obj = Map::new();

    if !op.tags.is_empty() {
        obj.insert("tags".to_owned(), json!(op.tags));
    }
    if let Some(summary) = &op.summary {
        obj.insert("summary".to_owned(), json!(summary));
    }
    if let Some(description) = &op.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if let Some(docs) = &op.external_docs {
        obj.insert("externalDocs".to_owned(), write_external_docs(docs));
    }
    if let Some(id) = &op.operation_id {
        obj.insert("operationId".to_owned(), json!(id));
    }

    // Parameters inherited from the path level are not repeated here.
    let own: Vec<Value> = op
        .parameters
        .iter()
        .filter(|p| !path_parameters.contains(*p))
        .map(write_parameter)
        .collect();
    if !own.is_empty() {
        obj.insert("parameters".to_owned(), Value::Array(own));
    }

    if let Some(body) = &op.request_body {
        obj.insert("requestBody".to_owned(), write_request_body(body));
    }

    if !op.responses.is_empty() {
        let mut responses = Map::new();
        for response in &op.responses {
            responses.insert(response.code.clone(), write_response(response));
        }
        obj.insert("responses".to_owned(), Value::Object(responses));
    }

    if !op.callbacks.is_empty() {
        let mut callbacks = Map::new();
        for (name, callback) in &op.callbacks {
            callbacks.insert(name.clone(), write_callback(callback));
        }
        obj.insert("callbacks".to_owned(), Value::Object(callbacks));
    }

    if let Some(deprecated) = op.deprecated {
        obj.insert("deprecated".to_owned(), json!(deprecated));
    }
    if let Some(requirements) = &op.security {
        obj.insert(
            "security".to_owned(),
            write_security_requirements(requirements),
        );
    }
    if !op.servers.is_empty() {
        obj.insert("servers".to_owned(), write_servers(&op.servers));
    }

    extend_extensions(&mut obj, &op.extensions);
    Value::Object(obj)
}

fn write_parameter(parameter: &Parameter) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_owned(), json!(parameter.name));
    obj.insert("in".to_owned(), json!(parameter.location.as_str()));
    if let Some(description) = &parameter.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if let Some(required) = parameter.required {
        obj.insert("required".to_owned(), json!(required));
    }
    if let Some(deprecated) = parameter.deprecated {
        obj.insert("deprecated".to_owned(), json!(deprecated));
    }
    if let Some(allow_empty) = parameter.allow_empty_value {
        obj.insert("allowEmptyValue".to_owned(), json!(allow_empty));
    }
    if let Some(style) = parameter.style {
        obj.insert("style".to_owned(), json!(style.as_str()));
    }
    if let Some(explode) = parameter.explode {
        obj.insert("explode".to_owned(), json!(explode));
    }
    if let Some(allow_reserved) = parameter.allow_reserved {
        obj.insert("allowReserved".to_owned(), json!(allow_reserved));
    }
    if let Some(schema) = &parameter.schema {
        obj.insert("schema".to_owned(), write_schema_ref(schema));
    }
    write_example_fields(&mut obj, parameter.example.as_ref(), &parameter.examples);
    write_content(
        &mut obj,
        parameter.content_type.as_deref(),
        &parameter.content_media_types,
    );
    extend_extensions(&mut obj, &parameter.extensions);
    Value::Object(obj)
}

fn write_header(header: &Header) -> Value {
    let mut obj = Map::new();
    if let Some(description) = &header.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if let Some(required) = header.required {
        obj.insert("required".to_owned(), json!(required));
    }
    if let Some(deprecated) = header.deprecated {
        obj.insert("deprecated".to_owned(), json!(deprecated));
    }
    if let Some(explode) = header.explode {
        obj.insert("explode".to_owned(), json!(explode));
    }
    if let Some(schema) = &header.schema {
        obj.insert("schema".to_owned(), write_schema_ref(schema));
    }
    write_example_fields(&mut obj, header.example.as_ref(), &header.examples);
    write_content(
        &mut obj,
        header.content_type.as_deref(),
        &header.content_media_types,
    );
    extend_extensions(&mut obj, &header.extensions);
    Value::Object(obj)
}

fn write_content(obj: &mut Map<String, Value>, _content_type: Option<&str>, media: &[MediaType]) {
    if media.is_empty() {
        return;
    }
    let mut content = Map::new();
    for entry in media {
        content.insert(entry.name.clone(), write_media_type(entry));
    }
    obj.insert("content".to_owned(), Value::Object(content));
}

fn write_example_fields(
    obj: &mut Map<String, Value>,
    example: Option<&crate::spec::Any>,
    examples: &indexmap::IndexMap<String, Example>,
) {
    if let Some(example) = example {
        obj.insert("example".to_owned(), example.to_value());
    }
    if !examples.is_empty() {
        let mut map = Map::new();
        for (name, entry) in examples {
            map.insert(name.clone(), write_example(entry));
        }
        obj.insert("examples".to_owned(), Value::Object(map));
    }
}

fn write_example(example: &Example) -> Value {
    let mut obj = Map::new();
    if let Some(summary) = &example.summary {
        obj.insert("summary".to_owned(), json!(summary));
    }
    if let Some(description) = &example.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if let Some(value) = &example.value {
        obj.insert("value".to_owned(), value.to_value());
    }
    if let Some(serialized) = &example.serialized_value {
        obj.insert("serializedValue".to_owned(), json!(serialized));
    }
    if let Some(external) = &example.external_value {
        obj.insert("externalValue".to_owned(), json!(external));
    }
    extend_extensions(&mut obj, &example.extensions);
    Value::Object(obj)
}

fn write_media_type(media: &MediaType) -> Value {
    let mut obj = Map::new();
    if let Some(schema) = &media.schema {
        obj.insert("schema".to_owned(), write_schema_ref(schema));
    }
    write_example_fields(&mut obj, media.example.as_ref(), &media.examples);
    if !media.encoding.is_empty() {
        let mut encoding = Map::new();
        for entry in &media.encoding {
            encoding.insert(entry.name.clone(), write_encoding(entry));
        }
        obj.insert("encoding".to_owned(), Value::Object(encoding));
    }
    extend_extensions(&mut obj, &media.extensions);
    Value::Object(obj)
}

fn write_encoding(encoding: &Encoding) -> Value {
    let mut obj = Map::new();
    if let Some(content_type) = &encoding.content_type {
        obj.insert("contentType".to_owned(), json!(content_type));
    }
    if !encoding.headers.is_empty() {
        let mut headers = Map::new();
        for header in &encoding.headers {
            headers.insert(header.name.clone(), write_header(header));
        }
        obj.insert("headers".to_owned(), Value::Object(headers));
    }
    if let Some(style) = &encoding.style {
        obj.insert("style".to_owned(), json!(style));
    }
    if let Some(explode) = encoding.explode {
        obj.insert("explode".to_owned(), json!(explode));
    }
    if let Some(allow_reserved) = encoding.allow_reserved {
        obj.insert("allowReserved".to_owned(), json!(allow_reserved));
    }
    extend_extensions(&mut obj, &encoding.extensions);
    Value::Object(obj)
}

fn write_request_body(body: &RequestBody) -> Value {
    let mut obj = Map::new();
    if let Some(reference) = &body.ref_path {
        obj.insert("$ref".to_owned(), json!(reference));
        if let Some(description) = &body.description {
            obj.insert("description".to_owned(), json!(description));
        }
        return Value::Object(obj);
    }
    if let Some(description) = &body.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if !body.content.is_empty() {
        let mut content = Map::new();
        for media in &body.content {
            content.insert(media.name.clone(), write_media_type(media));
        }
        obj.insert("content".to_owned(), Value::Object(content));
    }
    if let Some(required) = body.required {
        obj.insert("required".to_owned(), json!(required));
    }
    extend_extensions(&mut obj, &body.extensions);
    Value::Object(obj)
}

fn write_response(response: &Response) -> Value {
    let mut obj = Map::new();
    if let Some(reference) = &response.ref_path {
        obj.insert("$ref".to_owned(), json!(reference));
        if let Some(summary) = &response.summary {
            obj.insert("summary".to_owned(), json!(summary));
        }
        if let Some(description) = &response.description {
            obj.insert("description".to_owned(), json!(description));
        }
        return Value::Object(obj);
    }
    if let Some(description) = &response.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if !response.headers.is_empty() {
        let mut headers = Map::new();
        for header in &response.headers {
            headers.insert(header.name.clone(), write_header(header));
        }
        obj.insert("headers".to_owned(), Value::Object(headers));
    }
    if !response.content.is_empty() {
        let mut content = Map::new();
        for media in &response.content {
            content.insert(media.name.clone(), write_media_type(media));
        }
        obj.insert("content".to_owned(), Value::Object(content));
    }
    if !response.links.is_empty() {
        let mut links = Map::new();
        for (name, link) in &response.links {
            links.insert(name.clone(), write_link(link));
        }
        obj.insert("links".to_owned(), Value::Object(links));
    }
    extend_extensions(&mut obj, &response.extensions);
    Value::Object(obj)
}

fn write_link(link: &Link) -> Value {
    let mut obj = Map::new();
    if let Some(reference) = &link.operation_ref {
        obj.insert("operationRef".to_owned(), json!(reference));
    }
    if let Some(id) = &link.operation_id {
        obj.insert("operationId".to_owned(), json!(id));
    }
    if !link.parameters.is_empty() {
        let mut parameters = Map::new();
        for (name, value) in &link.parameters {
            parameters.insert(name.clone(), value.clone());
        }
        obj.insert("parameters".to_owned(), Value::Object(parameters));
    }
    if let Some(body) = &link.request_body {
        obj.insert("requestBody".to_owned(), body.clone());
    }
    if let Some(description) = &link.description {
        obj.insert("description".to_owned(), json!(description));
    }
    if let Some(server) = &link.server {
        obj.insert(
            "server".to_owned(),
            write_servers(std::slice::from_ref(server))
                .as_array()
                .and_then(|list| list.first())
                .cloned()
                .unwrap_or(Value::Null),
        );
    }
    extend_extensions(&mut obj, &link.extensions);
    Value::Object(obj)
}

fn write_callback(callback: &Callback) -> Value {
    let mut obj = Map::new();
    for item in &callback.expressions {
        obj.insert(item.route.clone(), write_path_item(item));
    }
    extend_extensions(&mut obj, &callback.extensions);
    Value::Object(obj)
}

fn write_components(spec: &Spec) -> Map<String, Value> {
    let mut components = Map::new();

    let schemas = write_component_schemas(spec);
    if !schemas.is_empty() {
        components.insert("schemas".to_owned(), Value::Object(schemas));
    }

    let Components {
        parameters,
        headers,
        responses,
        request_bodies,
        media_types,
        examples,
        links,
        callbacks,
        path_items,
        security_schemes,
        extensions,
    } = &spec.components;

    if !parameters.is_empty() {
        let mut map = Map::new();
        for (name, parameter) in parameters {
            map.insert(name.clone(), write_parameter(parameter));
        }
        components.insert("parameters".to_owned(), Value::Object(map));
    }
    if !headers.is_empty() {
        let mut map = Map::new();
        for (name, header) in headers {
            map.insert(name.clone(), write_header(header));
        }
        components.insert("headers".to_owned(), Value::Object(map));
    }
    if !responses.is_empty() {
        let mut map = Map::new();
        for (name, response) in responses {
            map.insert(name.clone(), write_response(response));
        }
        components.insert("responses".to_owned(), Value::Object(map));
    }
    if !request_bodies.is_empty() {
        let mut map = Map::new();
        for (name, body) in request_bodies {
            map.insert(name.clone(), write_request_body(body));
        }
        components.insert("requestBodies".to_owned(), Value::Object(map));
    }
    if !media_types.is_empty() {
        let mut map = Map::new();
        for (name, media) in media_types {
            map.insert(name.clone(), write_media_type(media));
        }
        components.insert("mediaTypes".to_owned(), Value::Object(map));
    }
    if !examples.is_empty() {
        let mut map = Map::new();
        for (name, example) in examples {
            map.insert(name.clone(), write_example(example));
        }
        components.insert("examples".to_owned(), Value::Object(map));
    }
    if !links.is_empty() {
        let mut map = Map::new();
        for (name, link) in links {
            map.insert(name.clone(), write_link(link));
        }
        components.insert("links".to_owned(), Value::Object(map));
    }
    if !callbacks.is_empty() {
        let mut map = Map::new();
        for (name, callback) in callbacks {
            map.insert(name.clone(), write_callback(callback));
        }
        components.insert("callbacks".to_owned(), Value::Object(map));
    }
    if !path_items.is_empty() {
        let mut map = Map::new();
        for (name, item) in path_items {
            map.insert(name.clone(), write_path_item(item));
        }
        components.insert("pathItems".to_owned(), Value::Object(map));
    }
    if !security_schemes.is_empty() {
        let mut map = Map::new();
        for (name, scheme) in security_schemes {
            map.insert(name.clone(), write_security_scheme(scheme));
        }
        components.insert("securitySchemes".to_owned(), Value::Object(map));
    }

    extend_extensions(&mut components, extensions);
    components
}

/// Schemas emit in original document order; promoted `Inline_*` components
/// (absent from the recorded order) append at the end.
fn write_component_schemas(spec: &Spec) -> Map<String, Value> {
    let mut schemas = Map::new();

    let write_one = |schemas: &mut Map<String, Value>, name: &str| {
        if let Some(sf) = spec.defined_schemas.get(name) {
            schemas.insert(name.to_owned(), write_defined_schema(spec, name, sf));
        } else if let Some(raw) = spec.raw_schemas.get(name) {
            schemas.insert(name.to_owned(), raw.clone());
        }
    };

    for name in &spec.schema_order {
        write_one(&mut schemas, name);
    }
    for name in spec.defined_schemas.keys() {
        if !schemas.contains_key(name) {
            write_one(&mut schemas, name);
        }
    }
    for name in spec.raw_schemas.keys() {
        if !schemas.contains_key(name) {
            write_one(&mut schemas, name);
        }
    }

    schemas
}

/// Writes a defined schema, re-attaching its `$id`/`$anchor` registrations.
fn write_defined_schema(spec: &Spec, name: &str, sf: &StructFields) -> Value {
    let mut value = write_struct_fields(sf);
    if let Some(obj) = value.as_object_mut() {
        if let Some((id, _)) = spec.schema_ids.iter().find(|(_, n)| *n == name) {
            obj.insert("$id".to_owned(), json!(id));
        }
        if let Some((anchor, _)) = spec.anchors.iter().find(|(_, n)| *n == name) {
            obj.insert("$anchor".to_owned(), json!(anchor));
        }
        if let Some((anchor, _)) = spec.dynamic_anchors.iter().find(|(_, n)| *n == name) {
            obj.insert("$dynamicAnchor".to_owned(), json!(anchor));
        }
    }
    value
}

fn write_security_requirements(requirements: &[SecurityRequirement]) -> Value {
    let list: Vec<Value> = requirements
        .iter()
        .map(|requirement| {
            let mut obj = Map::new();
            for (scheme, scopes) in requirement {
                obj.insert(scheme.clone(), json!(scopes));
            }
            Value::Object(obj)
        })
        .collect();
    Value::Array(list)
}

fn write_security_scheme(scheme: &SecurityScheme) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_owned(), json!(scheme.kind.type_str()));
    if let Some(description) = &scheme.description {
        obj.insert("description".to_owned(), json!(description));
    }

    match &scheme.kind {
        SecuritySchemeKind::ApiKey { name, location } => {
            obj.insert("name".to_owned(), json!(name));
            obj.insert("in".to_owned(), json!(location));
        }
        SecuritySchemeKind::Http {
            scheme: http_scheme,
            bearer_format,
        } => {
            obj.insert("scheme".to_owned(), json!(http_scheme));
            if let Some(format) = bearer_format {
                obj.insert("bearerFormat".to_owned(), json!(format));
            }
        }
        SecuritySchemeKind::MutualTls => {}
        SecuritySchemeKind::OAuth2 { flows } => {
            let mut fobj = Map::new();
            for (key, flow) in flows.entries() {
                fobj.insert(key.to_owned(), write_oauth_flow(flow));
            }
            extend_extensions(&mut fobj, &flows.extensions);
            obj.insert("flows".to_owned(), Value::Object(fobj));
        }
        SecuritySchemeKind::OpenIdConnect { url } => {
            obj.insert("openIdConnectUrl".to_owned(), json!(url));
        }
    }

    extend_extensions(&mut obj, &scheme.extensions);
    Value::Object(obj)
}

fn write_oauth_flow(flow: &OAuthFlow) -> Value {
    let mut obj = Map::new();
    if let Some(url) = &flow.authorization_url {
        obj.insert("authorizationUrl".to_owned(), json!(url));
    }
    if let Some(url) = &flow.device_authorization_url {
        obj.insert("deviceAuthorizationUrl".to_owned(), json!(url));
    }
    if let Some(url) = &flow.token_url {
        obj.insert("tokenUrl".to_owned(), json!(url));
    }
    if let Some(url) = &flow.refresh_url {
        obj.insert("refreshUrl".to_owned(), json!(url));
    }
    if flow.scopes_set {
        let mut scopes = Map::new();
        for (scope, description) in &flow.scopes {
            scopes.insert(scope.clone(), json!(description));
        }
        obj.insert("scopes".to_owned(), Value::Object(scopes));
    }
    extend_extensions(&mut obj, &flow.extensions);
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::spec::DocumentRegistry;

    fn round_trip(doc: Value) -> Value {
        let mut registry = DocumentRegistry::new();
        let spec = crate::loader::load_spec(&doc, None, &mut registry).unwrap();
        write_spec(&spec).unwrap()
    }

    #[test]
    fn schema_document_echoes_verbatim() {
        let doc = json!({ "$id": "https://example.com/x.json", "type": "object", "weird": [1] });
        assert_eq!(round_trip(doc.clone()), doc);
    }

    #[test]
    fn minimal_document_round_trips() {
        let doc = json!({
            "openapi": "3.2.0",
            "info": { "title": "Test API", "version": "0.1" }
        });
        assert_eq!(round_trip(doc.clone()), doc);
    }

    #[test]
    fn components_and_paths_round_trip() {
        let doc = json!({
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
                }
            },
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "name": { "type": "string" }
                        },
                        "required": ["id", "name"]
                    }
                }
            }
        });
        assert_eq!(round_trip(doc.clone()), doc);
    }

    #[test]
    fn extensions_reinserted_under_original_keys() {
        let doc = json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1", "x-audience": "internal" },
            "x-owner": { "team": "api" }
        });
        let out = round_trip(doc);
        assert_eq!(out["x-owner"], json!({ "team": "api" }));
        assert_eq!(out["info"]["x-audience"], json!("internal"));
    }

    #[test]
    fn nullable_union_survives() {
        let doc = json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "components": {
                "schemas": {
                    "MaybeName": { "type": ["string", "null"] }
                }
            }
        });
        let out = round_trip(doc);
        assert_eq!(
            out["components"]["schemas"]["MaybeName"]["type"],
            json!(["string", "null"])
        );
    }

    #[test]
    fn writer_rejects_duplicate_operation_ids() {
        let mut spec = Spec {
            openapi_version: Some("3.2.0".to_owned()),
            ..Spec::default()
        };
        let mut item = PathItem {
            route: "/a".to_owned(),
            ..PathItem::default()
        };
        let mut op = Operation {
            operation_id: Some("dup".to_owned()),
            ..Operation::default()
        };
        item.operations.push(op.clone());
        op.verb = crate::spec::Verb::Post;
        item.operations.push(op);
        spec.paths.push(item);

        assert!(matches!(
            write_spec(&spec),
            Err(Error::DuplicateOperationId(_))
        ));
    }

    #[test]
    fn reserved_header_params_dropped_from_output() {
        let doc = json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/x": {
                    "get": {
                        "parameters": [
                            { "name": "Authorization", "in": "header", "schema": { "type": "string" } },
                            { "name": "q", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            }
        });
        let out = round_trip(doc);
        let parameters = &out["paths"]["/x"]["get"]["parameters"];
        assert_eq!(parameters.as_array().unwrap().len(), 1);
        assert_eq!(parameters[0]["name"], json!("q"));
    }

    #[test]
    fn inline_promotion_visible_as_new_component() {
        let doc = json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/pets": {
                    "post": {
                        "operationId": "createPet",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "name": { "type": "string" } }
                                    }
                                }
                            }
                        },
                        "responses": { "201": { "description": "created" } }
                    }
                }
            }
        });
        let out = round_trip(doc);
        assert_eq!(
            out["paths"]["/pets"]["post"]["requestBody"]["content"]["application/json"]["schema"],
            json!({ "$ref": "#/components/schemas/Inline_createPet_Request" })
        );
        assert!(out["components"]["schemas"]["Inline_createPet_Request"].is_object());
    }
}
