//! Document ingestion and validation.
//!
//! The loader is a pure function from a parsed JSON value (plus a retrieval
//! URI and a registry) to a validated [`Spec`]. Load order follows the
//! document: info, servers, tags, external docs, components, paths,
//! webhooks, security, then a global uniqueness pass.

use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};

use crate::spec::{
    Contact, DocumentRegistry, Error, ExternalDoc, Info, License, Server, ServerVariable, Spec,
    Tag,
};

mod components;
mod paths;
mod promote;
mod resolve;
mod schema;
mod security;

pub use self::promote::promote_inline_schema;
pub use self::schema::load_schema_ref;

/// Loads and validates a document.
///
/// Root dispatch first: bare JSON Schema documents (boolean roots, or roots
/// with `$id`/primitive `type` and no `openapi`/`swagger`) short-circuit
/// into a schema-document [`Spec`] with the root kept verbatim. OpenAPI
/// roots get the full validation pipeline. The loaded document is
/// registered in `registry` under its base URI.
pub fn load_spec(
    value: &Value,
    retrieval_uri: Option<&str>,
    registry: &mut DocumentRegistry,
) -> Result<Spec, Error> {
    if let Some(spec) = try_schema_document(value, retrieval_uri) {
        let base = DocumentRegistry::base_uri_of(&spec).to_owned();
        registry.register(base, spec.clone());
        return Ok(spec);
    }

    let root = obj(value, "document root")?;

    if !root.contains_key("openapi") && !root.contains_key("swagger") {
        return Err(Error::NotOpenApi);
    }

    let mut spec = Spec {
        openapi_version: get_str(root, "openapi").or_else(|| get_str(root, "swagger")),
        self_uri: get_str(root, "$self"),
        document_uri: retrieval_uri.map(str::to_owned),
        json_schema_dialect: get_str(root, "jsonSchemaDialect"),
        ..Spec::default()
    };
    spec.validate_version()?;

    if let Some(info) = root.get("info") {
        spec.info = Some(load_info(info)?);
    }
    if let Some(servers) = root.get("servers") {
        spec.servers = load_servers(servers)?;
    }
    if let Some(tags) = root.get("tags") {
        spec.tags = load_tags(tags)?;
    }
    if let Some(docs) = root.get("externalDocs") {
        spec.external_docs = Some(load_external_docs(docs)?);
    }

    if let Some(components) = root.get("components") {
        components::load_components(&mut spec, obj(components, "components")?, registry)?;
    }

    if let Some(paths) = root.get("paths") {
        let items = paths::load_path_items(&mut spec, obj(paths, "paths")?, true, registry)?;
        spec.paths = items;
    }
    if let Some(webhooks) = root.get("webhooks") {
        let items = paths::load_path_items(&mut spec, obj(webhooks, "webhooks")?, false, registry)?;
        spec.webhooks = items;
    }

    if let Some(security) = root.get("security") {
        spec.security = Some(security::load_security_requirements(security)?);
    }

    spec.extensions = extensions(root);

    // Anchor tables and the registry are complete here; run the full
    // resolver over every reference the literal fast path left open.
    resolve::resolve_spec_references(&mut spec, registry);

    validate_operation_id_uniqueness(&spec, registry)?;

    debug!(
        "loaded spec: {} paths, {} schemas",
        spec.paths.len(),
        spec.defined_schemas.len() + spec.raw_schemas.len()
    );

    let base = DocumentRegistry::base_uri_of(&spec).to_owned();
    registry.register(base, spec.clone());
    Ok(spec)
}

/// Detects and loads a bare JSON Schema document.
///
/// A boolean root, or an object with a top-level `$id` or primitive `type`
/// and no `openapi`/`swagger`, is stored verbatim with no further
/// validation.
fn try_schema_document(value: &Value, retrieval_uri: Option<&str>) -> Option<Spec> {
    let is_schema = match value {
        Value::Bool(_) => true,
        Value::Object(map) => {
            !map.contains_key("openapi")
                && !map.contains_key("swagger")
                && (map.contains_key("$id")
                    || map.get("type").map(Value::is_string).unwrap_or(false))
        }
        _ => false,
    };
    if !is_schema {
        return None;
    }

    let mut spec = Spec {
        is_schema_document: true,
        schema_root_json: Some(value.clone()),
        document_uri: retrieval_uri.map(str::to_owned),
        ..Spec::default()
    };
    if let Value::Object(map) = value {
        if let Some(id) = get_str(map, "$id") {
            spec.self_uri = Some(id);
        }
    }
    Some(spec)
}

fn load_info(value: &Value) -> Result<Info, Error> {
    let map = obj(value, "info")?;
    let mut info = Info {
        title: req_str(map, "title", "info")?,
        version: req_str(map, "version", "info")?,
        summary: get_str(map, "summary"),
        description: get_str(map, "description"),
        terms_of_service: get_str(map, "termsOfService"),
        extensions: extensions(map),
        ..Info::default()
    };

    if let Some(contact) = map.get("contact") {
        let cmap = obj(contact, "info.contact")?;
        info.contact = Some(Contact {
            name: get_str(cmap, "name"),
            url: get_str(cmap, "url"),
            email: get_str(cmap, "email"),
            extensions: extensions(cmap),
        });
    }

    if let Some(license) = map.get("license") {
        let lmap = obj(license, "info.license")?;
        let license = License {
            name: req_str(lmap, "name", "info.license")?,
            identifier: get_str(lmap, "identifier"),
            url: get_str(lmap, "url"),
            extensions: extensions(lmap),
        };
        if license.has_field_conflict() {
            return Err(Error::LicenseConflict);
        }
        info.license = Some(license);
    }

    Ok(info)
}

fn load_servers(value: &Value) -> Result<Vec<Server>, Error> {
    let list = arr(value, "servers")?;
    let mut servers = Vec::with_capacity(list.len());
    let mut seen_names = Vec::new();

    for entry in list {
        let map = obj(entry, "server")?;
        let url = req_str(map, "url", "server")?;
        if url.contains('?') || url.contains('#') {
            return Err(Error::ServerUrlQueryFragment(url));
        }

        let mut server = Server {
            url,
            name: get_str(map, "name"),
            description: get_str(map, "description"),
            extensions: extensions(map),
            ..Server::default()
        };

        if let Some(name) = &server.name {
            if seen_names.contains(name) {
                return Err(Error::DuplicateServerName(name.clone()));
            }
            seen_names.push(name.clone());
        }

        if let Some(variables) = map.get("variables") {
            for (key, vvalue) in obj(variables, "server.variables")? {
                let vmap = obj(vvalue, "server variable")?;
                server.variables.insert(
                    key.clone(),
                    ServerVariable {
                        default: req_str(vmap, "default", "server variable")?,
                        enum_values: str_vec(vmap.get("enum")),
                        description: get_str(vmap, "description"),
                        extensions: extensions(vmap),
                    },
                );
            }
        }

        // Every template variable must be declared with a default.
        for var in server.template_variables() {
            if !server.variables.contains_key(var) {
                return Err(Error::ServerVariableUndeclared(var.to_owned()));
            }
        }

        servers.push(server);
    }

    Ok(servers)
}

fn load_tags(value: &Value) -> Result<Vec<Tag>, Error> {
    let list = arr(value, "tags")?;
    let mut tags = Vec::with_capacity(list.len());

    for entry in list {
        let map = obj(entry, "tag")?;
        let tag = Tag {
            name: req_str(map, "name", "tag")?,
            summary: get_str(map, "summary"),
            description: get_str(map, "description"),
            parent: get_str(map, "parent"),
            kind: get_str(map, "kind"),
            external_docs: map
                .get("externalDocs")
                .map(load_external_docs)
                .transpose()?,
            extensions: extensions(map),
        };
        if tags.iter().any(|t: &Tag| t.name == tag.name) {
            return Err(Error::DuplicateTag(tag.name));
        }
        tags.push(tag);
    }

    fn parent_of<'a>(tags: &'a [Tag], name: &str) -> Option<&'a str> {
        tags.iter()
            .find(|t| t.name == name)
            .and_then(|t| t.parent.as_deref())
    }

    for tag in &tags {
        if let Some(parent) = tag.parent.as_deref() {
            if !tags.iter().any(|t| t.name == parent) {
                return Err(Error::UnknownTagParent(parent.to_owned()));
            }

            // Tortoise-hare walk of the parent chain.
            let mut slow = Some(tag.name.as_str());
            let mut fast = parent_of(&tags, tag.name.as_str());
            while let Some(f) = fast {
                if slow == fast {
                    return Err(Error::TagParentCycle(f.to_owned()));
                }
                slow = slow.and_then(|name| parent_of(&tags, name));
                fast = parent_of(&tags, f).and_then(|name| parent_of(&tags, name));
            }
        }
    }

    Ok(tags)
}

pub(crate) fn load_external_docs(value: &Value) -> Result<ExternalDoc, Error> {
    let map = obj(value, "externalDocs")?;
    Ok(ExternalDoc {
        url: req_str(map, "url", "externalDocs")?,
        description: get_str(map, "description"),
        extensions: extensions(map),
    })
}

/// Global `operationId` uniqueness across this spec's paths, webhooks, and
/// callbacks, and every previously registered document.
fn validate_operation_id_uniqueness(
    spec: &Spec,
    registry: &DocumentRegistry,
) -> Result<(), Error> {
    // Re-registering the same base URI replaces the entry, so a reload of
    // the same document must not collide with its previous copy.
    let own_base = DocumentRegistry::base_uri_of(spec);

    let mut registered: Vec<&str> = Vec::new();
    for (uri, other) in registry.iter() {
        if uri == own_base {
            continue;
        }
        collect_operation_ids(other, &mut registered);
    }

    let mut current: Vec<&str> = Vec::new();
    collect_operation_ids(spec, &mut current);

    for (i, id) in current.iter().enumerate() {
        if current[..i].contains(id) || registered.contains(id) {
            return Err(Error::DuplicateOperationId((*id).to_owned()));
        }
    }
    Ok(())
}

fn collect_operation_ids<'a>(spec: &'a Spec, out: &mut Vec<&'a str>) {
    for item in spec.paths.iter().chain(spec.webhooks.iter()) {
        collect_path_item_operation_ids(item, out);
    }
    for item in spec.components.path_items.values() {
        collect_path_item_operation_ids(item, out);
    }
}

fn collect_path_item_operation_ids<'a>(item: &'a crate::spec::PathItem, out: &mut Vec<&'a str>) {
    for op in &item.operations {
        if let Some(id) = op.operation_id.as_deref() {
            out.push(id);
        }
        for callback in op.callbacks.values() {
            for expr_item in &callback.expressions {
                collect_path_item_operation_ids(expr_item, out);
            }
        }
    }
}

//
// shared JSON access helpers
//

pub(crate) fn obj<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, Error> {
    value.as_object().ok_or_else(|| Error::WrongType {
        object: what.to_owned(),
        expected: "an object",
    })
}

pub(crate) fn arr<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, Error> {
    value.as_array().ok_or_else(|| Error::WrongType {
        object: what.to_owned(),
        expected: "an array",
    })
}

pub(crate) fn get_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_owned)
}

pub(crate) fn req_str(
    map: &Map<String, Value>,
    key: &'static str,
    object: &str,
) -> Result<String, Error> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Error::WrongType {
            object: format!("{object}.{key}"),
            expected: "a string",
        }),
        None => Err(Error::MissingField {
            field: key,
            object: object.to_owned(),
        }),
    }
}

pub(crate) fn get_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

pub(crate) fn get_u64(map: &Map<String, Value>, key: &str) -> Option<u64> {
    map.get(key).and_then(Value::as_u64)
}

pub(crate) fn get_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

pub(crate) fn str_vec(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Collects `x-` keys verbatim, preserving their original names and values.
pub(crate) fn extensions(map: &Map<String, Value>) -> IndexMap<String, Value> {
    map.iter()
        .filter(|(key, _)| key.starts_with("x-"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn load(value: Value) -> Result<Spec, Error> {
        let mut registry = DocumentRegistry::new();
        load_spec(&value, None, &mut registry)
    }

    fn minimal(extra: Value) -> Value {
        let mut base = json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
        });
        base.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        base
    }

    #[test]
    fn schema_document_short_circuits() {
        let doc = json!({ "$id": "https://example.com/pet.json", "type": "object" });
        let spec = load(doc.clone()).unwrap();
        assert!(spec.is_schema_document);
        assert_eq!(spec.schema_root_json, Some(doc));
        assert_eq!(spec.self_uri.as_deref(), Some("https://example.com/pet.json"));
    }

    #[test]
    fn boolean_root_is_a_schema_document() {
        let spec = load(json!(true)).unwrap();
        assert!(spec.is_schema_document);
        assert_eq!(spec.schema_root_json, Some(json!(true)));
    }

    #[test]
    fn non_openapi_root_rejected() {
        assert_matches!(load(json!({ "title": "nope" })), Err(Error::NotOpenApi));
    }

    #[test]
    fn unsupported_major_rejected() {
        let doc = json!({ "openapi": "4.0.0", "info": { "title": "t", "version": "1" } });
        assert_matches!(load(doc), Err(Error::UnsupportedVersion(_)));
    }

    #[test]
    fn info_title_and_version_required() {
        let doc = json!({ "openapi": "3.2.0", "info": { "title": "t" } });
        assert_matches!(
            load(doc),
            Err(Error::MissingField { field: "version", .. })
        );
    }

    #[test]
    fn license_identifier_url_conflict_rejected() {
        let doc = minimal(json!({}));
        let mut doc = doc;
        doc["info"]["license"] = json!({ "name": "MIT", "identifier": "MIT", "url": "https://x" });
        assert_matches!(load(doc), Err(Error::LicenseConflict));
    }

    #[test]
    fn license_name_required() {
        let mut doc = minimal(json!({}));
        doc["info"]["license"] = json!({ "identifier": "MIT" });
        assert_matches!(load(doc), Err(Error::MissingField { field: "name", .. }));
    }

    #[test]
    fn server_url_query_fragment_rejected() {
        let doc = minimal(json!({ "servers": [{ "url": "https://x.example/api?v=1" }] }));
        assert_matches!(load(doc), Err(Error::ServerUrlQueryFragment(_)));
    }

    #[test]
    fn server_template_variables_must_be_declared() {
        let doc = minimal(json!({ "servers": [{ "url": "https://{region}.example" }] }));
        assert_matches!(load(doc), Err(Error::ServerVariableUndeclared(_)));

        let doc = minimal(json!({
            "servers": [{
                "url": "https://{region}.example",
                "variables": { "region": { "default": "eu" } }
            }]
        }));
        assert!(load(doc).is_ok());
    }

    #[test]
    fn duplicate_tags_rejected() {
        let doc = minimal(json!({ "tags": [{ "name": "a" }, { "name": "a" }] }));
        assert_matches!(load(doc), Err(Error::DuplicateTag(_)));
    }

    #[test]
    fn tag_parent_must_exist() {
        let doc = minimal(json!({ "tags": [{ "name": "a", "parent": "missing" }] }));
        assert_matches!(load(doc), Err(Error::UnknownTagParent(_)));
    }

    #[test]
    fn tag_parent_cycles_rejected() {
        let doc = minimal(json!({
            "tags": [
                { "name": "a", "parent": "b" },
                { "name": "b", "parent": "a" },
            ]
        }));
        assert_matches!(load(doc), Err(Error::TagParentCycle(_)));
    }

    #[test]
    fn external_docs_url_required() {
        let doc = minimal(json!({ "externalDocs": { "description": "d" } }));
        assert_matches!(load(doc), Err(Error::MissingField { field: "url", .. }));
    }

    #[test]
    fn root_extensions_captured_verbatim() {
        let doc = minimal(json!({ "x-internal": { "flag": true }, "ignored": 1 }));
        let spec = load(doc).unwrap();
        assert_eq!(spec.extensions.get("x-internal"), Some(&json!({ "flag": true })));
        assert!(!spec.extensions.contains_key("ignored"));
    }

    #[test]
    fn empty_security_array_is_preserved() {
        let doc = minimal(json!({ "security": [] }));
        let spec = load(doc).unwrap();
        assert_eq!(spec.security, Some(vec![]));
    }

    #[test]
    fn missing_security_means_inherit() {
        let spec = load(minimal(json!({}))).unwrap();
        assert_eq!(spec.security, None);
    }
}
