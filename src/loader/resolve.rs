//! Post-load reference resolution.
//!
//! Literal `#/components/schemas/<Name>` fragments resolve while schemas
//! load; everything else — `$anchor` and `$id` fragments, `$dynamicRef`
//! against `$dynamicAnchor` scopes, and cross-document targets — needs the
//! finished anchor tables and the registry. Once a document is fully
//! loaded, this pass runs every still-unresolved reference through the
//! full resolver and fills in `ref_name`, so the writer and the code
//! emitter see resolved component names. Opaque references (externals with
//! no registered base, sub-component pointers) stay untouched.

use log::debug;

use crate::spec::{
    resolve_ref, Callback, DocumentRegistry, Header, MediaType, Operation, Parameter, PathItem,
    RefTarget, RequestBody, ResolvedRef, Response, SchemaRef, Spec,
};

/// Resolves every pending `$ref`/`$dynamicRef` in `spec` against the
/// document's anchor tables and the registry.
pub(crate) fn resolve_spec_references(spec: &mut Spec, registry: &DocumentRegistry) {
    let mut pending: Vec<(String, bool)> = Vec::new();
    walk_spec(spec, &mut |schema| {
        if schema.ref_name.is_none() {
            if let Some(path) = &schema.ref_path {
                let key = (path.clone(), schema.ref_is_dynamic);
                if !pending.contains(&key) {
                    pending.push(key);
                }
            }
        }
    });
    if pending.is_empty() {
        return;
    }

    let mut resolved: Vec<(String, bool, String)> = Vec::new();
    for (path, is_dynamic) in &pending {
        if let ResolvedRef::Target(RefTarget::Component { kind, name, .. }) =
            resolve_ref(spec, registry, path, *is_dynamic)
        {
            if kind == "schemas" {
                debug!("resolved {path:?} to component {name:?}");
                resolved.push((path.clone(), *is_dynamic, name));
            }
        }
    }
    if resolved.is_empty() {
        return;
    }

    walk_spec(spec, &mut |schema| {
        if schema.ref_name.is_some() {
            return;
        }
        let Some(path) = schema.ref_path.as_deref() else {
            return;
        };
        if let Some((_, _, name)) = resolved
            .iter()
            .find(|(p, d, _)| p == path && *d == schema.ref_is_dynamic)
        {
            schema.ref_name = Some(name.clone());
        }
    });
}

/// Visits every schema position in the document, nested descriptors
/// included.
fn walk_spec<F: FnMut(&mut SchemaRef)>(spec: &mut Spec, f: &mut F) {
    for sf in spec.defined_schemas.values_mut() {
        for field in &mut sf.fields {
            walk_schema(&mut field.schema, f);
        }
    }
    for item in &mut spec.paths {
        walk_path_item(item, f);
    }
    for item in &mut spec.webhooks {
        walk_path_item(item, f);
    }

    for parameter in spec.components.parameters.values_mut() {
        walk_parameter(parameter, f);
    }
    for header in spec.components.headers.values_mut() {
        walk_header(header, f);
    }
    for response in spec.components.responses.values_mut() {
        walk_response(response, f);
    }
    for body in spec.components.request_bodies.values_mut() {
        walk_request_body(body, f);
    }
    for media in spec.components.media_types.values_mut() {
        walk_media_type(media, f);
    }
    for callback in spec.components.callbacks.values_mut() {
        walk_callback(callback, f);
    }
    for item in spec.components.path_items.values_mut() {
        walk_path_item(item, f);
    }
}

fn walk_schema<F: FnMut(&mut SchemaRef)>(schema: &mut SchemaRef, f: &mut F) {
    f(schema);
    if let Some(items) = schema.items.as_deref_mut() {
        walk_schema(items, f);
    }
    if let Some(content) = schema.content_schema.as_deref_mut() {
        walk_schema(content, f);
    }
}

fn walk_path_item<F: FnMut(&mut SchemaRef)>(item: &mut PathItem, f: &mut F) {
    for parameter in &mut item.parameters {
        walk_parameter(parameter, f);
    }
    for op in &mut item.operations {
        walk_operation(op, f);
    }
}

fn walk_operation<F: FnMut(&mut SchemaRef)>(op: &mut Operation, f: &mut F) {
    for parameter in &mut op.parameters {
        walk_parameter(parameter, f);
    }
    if let Some(body) = &mut op.request_body {
        walk_request_body(body, f);
    }
    for response in &mut op.responses {
        walk_response(response, f);
    }
    for callback in op.callbacks.values_mut() {
        walk_callback(callback, f);
    }
}

fn walk_callback<F: FnMut(&mut SchemaRef)>(callback: &mut Callback, f: &mut F) {
    for item in &mut callback.expressions {
        walk_path_item(item, f);
    }
}

fn walk_parameter<F: FnMut(&mut SchemaRef)>(parameter: &mut Parameter, f: &mut F) {
    if let Some(schema) = &mut parameter.schema {
        walk_schema(schema, f);
    }
    for media in &mut parameter.content_media_types {
        walk_media_type(media, f);
    }
}

fn walk_header<F: FnMut(&mut SchemaRef)>(header: &mut Header, f: &mut F) {
    if let Some(schema) = &mut header.schema {
        walk_schema(schema, f);
    }
    for media in &mut header.content_media_types {
        walk_media_type(media, f);
    }
}

fn walk_media_type<F: FnMut(&mut SchemaRef)>(media: &mut MediaType, f: &mut F) {
    if let Some(schema) = &mut media.schema {
        walk_schema(schema, f);
    }
    for encoding in &mut media.encoding {
        for header in &mut encoding.headers {
            walk_header(header, f);
        }
    }
}

fn walk_request_body<F: FnMut(&mut SchemaRef)>(body: &mut RequestBody, f: &mut F) {
    for media in &mut body.content {
        walk_media_type(media, f);
    }
}

fn walk_response<F: FnMut(&mut SchemaRef)>(response: &mut Response, f: &mut F) {
    for header in &mut response.headers {
        walk_header(header, f);
    }
    for media in &mut response.content {
        walk_media_type(media, f);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::spec::DocumentRegistry;

    fn load(doc: serde_json::Value) -> crate::spec::Spec {
        let mut registry = DocumentRegistry::new();
        crate::loader::load_spec(&doc, None, &mut registry).unwrap()
    }

    fn minimal(schemas: serde_json::Value) -> serde_json::Value {
        json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "components": { "schemas": schemas }
        })
    }

    #[test]
    fn anchor_refs_gain_ref_name() {
        let spec = load(minimal(json!({
            "Node": {
                "$anchor": "node",
                "type": "object",
                "properties": { "next": { "$ref": "#node" } }
            }
        })));

        let field = spec.defined_schema("Node").unwrap().field("next").unwrap();
        assert_eq!(field.schema.ref_name.as_deref(), Some("Node"));
        assert_eq!(field.schema.ref_path.as_deref(), Some("#node"));
    }

    #[test]
    fn dynamic_refs_resolve_against_dynamic_anchors() {
        let spec = load(minimal(json!({
            "Node": {
                "$dynamicAnchor": "node",
                "type": "object",
                "properties": { "next": { "$dynamicRef": "#node" } }
            }
        })));

        let field = spec.defined_schema("Node").unwrap().field("next").unwrap();
        assert!(field.schema.ref_is_dynamic);
        assert_eq!(field.schema.ref_name.as_deref(), Some("Node"));
    }

    #[test]
    fn id_refs_resolve_across_registered_documents() {
        let common = json!({
            "openapi": "3.2.0",
            "$self": "https://example.com/common.json",
            "info": { "title": "common", "version": "1" },
            "components": {
                "schemas": {
                    "Money": {
                        "$id": "https://example.com/money.json",
                        "type": "object",
                        "properties": { "amount": { "type": "number" } }
                    }
                }
            }
        });
        let main = json!({
            "openapi": "3.2.0",
            "info": { "title": "main", "version": "1" },
            "components": {
                "schemas": {
                    "Invoice": {
                        "type": "object",
                        "properties": {
                            "total": { "$ref": "https://example.com/money.json" }
                        }
                    }
                }
            }
        });

        let mut registry = DocumentRegistry::new();
        crate::loader::load_spec(&common, None, &mut registry).unwrap();
        let spec = crate::loader::load_spec(&main, None, &mut registry).unwrap();

        let field = spec
            .defined_schema("Invoice")
            .unwrap()
            .field("total")
            .unwrap();
        assert_eq!(field.schema.ref_name.as_deref(), Some("Money"));
    }

    #[test]
    fn opaque_references_stay_unresolved() {
        let spec = load(minimal(json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "copy": { "$ref": "#/components/schemas/Pet/properties/id" },
                    "elsewhere": { "$ref": "https://unregistered.example/x.json#/components/schemas/X" }
                }
            }
        })));

        let sf = spec.defined_schema("Pet").unwrap();
        assert_eq!(sf.field("copy").unwrap().schema.ref_name, None);
        assert_eq!(sf.field("elsewhere").unwrap().schema.ref_name, None);
    }
}
