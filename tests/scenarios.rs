//! End-to-end scenarios: load a document, then emit JSON or C and check
//! the observable contract.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;

use oasc::{
    codegen::{self, CodegenOptions},
    loader,
    spec::{DocumentRegistry, Error, Spec},
    writer,
};

fn load(doc: serde_json::Value) -> Spec {
    let mut registry = DocumentRegistry::new();
    loader::load_spec(&doc, None, &mut registry).unwrap()
}

fn minimal(extra: serde_json::Value) -> serde_json::Value {
    let mut base = json!({
        "openapi": "3.2.0",
        "info": { "title": "Test API", "version": "0.1" },
    });
    base.as_object_mut()
        .unwrap()
        .extend(extra.as_object().unwrap().clone());
    base
}

fn emit(doc: serde_json::Value) -> (String, String) {
    let spec = load(doc);
    let opts = CodegenOptions::default();
    let mut header = Vec::new();
    let mut source = Vec::new();
    codegen::emit_header(&spec, "client", &opts, &mut header).unwrap();
    codegen::emit_source(&spec, "client", &opts, &mut source).unwrap();
    (
        String::from_utf8(header).unwrap(),
        String::from_utf8(source).unwrap(),
    )
}

#[test]
fn cyclic_schemas_forward_declared_before_definitions() {
    let (header, _) = emit(minimal(json!({
        "components": {
            "schemas": {
                "A": {
                    "type": "object",
                    "properties": { "b": { "$ref": "#/components/schemas/B" } }
                },
                "B": {
                    "type": "object",
                    "properties": { "a": { "$ref": "#/components/schemas/A" } }
                }
            }
        }
    })));

    let fwd_a = header.find("struct A;").expect("forward declaration of A");
    let fwd_b = header.find("struct B;").expect("forward declaration of B");
    let def_a = header.find("struct A {").expect("definition of A");
    let def_b = header.find("struct B {").expect("definition of B");
    assert!(fwd_a < def_a && fwd_a < def_b);
    assert!(fwd_b < def_a && fwd_b < def_b);

    // The members point across the cycle through pointers.
    assert!(header.contains("struct B *b;"));
    assert!(header.contains("struct A *a;"));
}

#[test]
fn one_of_with_discriminator_becomes_tagged_union() {
    let (header, source) = emit(minimal(json!({
        "components": {
            "schemas": {
                "Pet": {
                    "oneOf": [
                        { "$ref": "#/components/schemas/Cat" },
                        { "$ref": "#/components/schemas/Dog" }
                    ],
                    "discriminator": { "propertyName": "petType" }
                },
                "Cat": {
                    "type": "object",
                    "properties": { "meows": { "type": "boolean" } },
                    "required": ["meows"]
                },
                "Dog": {
                    "type": "object",
                    "properties": { "barks": { "type": "boolean" } },
                    "required": ["barks"]
                }
            }
        }
    })));

    assert!(header.contains("enum Pet_tag {"));
    assert!(header.contains("Pet_UNKNOWN = 0"));
    assert!(header.contains("struct Cat *Cat;"));
    assert!(header.contains("struct Dog *Dog;"));
    assert!(header.contains("} data;"));

    assert!(source.contains("switch (obj->tag) {"));
    assert!(source.contains("json_object_get_string(jobj, \"petType\")"));
}

#[test]
fn form_no_explode_array_renders_comma_joined() {
    // Scenario: {name: tags, in: query, style: form, explode: false}
    // with ["a", "b"] must produce `tags=a,b` (comma preserved).
    let value = oasc::url::StyleValue::Array(vec![
        oasc::url::KvValue::Str("a"),
        oasc::url::KvValue::Str("b"),
    ]);
    assert_eq!(
        oasc::url::expand_style("tags", oasc::url::Style::Form, false, &value, false),
        "?tags=a,b"
    );

    // The same contract holds in generated client code via add_encoded.
    let (_, source) = emit(minimal(json!({
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "findPets",
                    "parameters": [{
                        "name": "tags",
                        "in": "query",
                        "style": "form",
                        "explode": false,
                        "schema": { "type": "array", "items": { "type": "string" } }
                    }],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    })));
    assert!(source.contains("url_query_add_encoded(&qp, \"tags\", joined);"));
}

#[test]
fn oauth_flows_validate_per_kind() {
    let ok = minimal(json!({
        "components": {
            "securitySchemes": {
                "oauth": {
                    "type": "oauth2",
                    "flows": {
                        "authorizationCode": {
                            "authorizationUrl": "u",
                            "tokenUrl": "t",
                            "scopes": {}
                        }
                    }
                }
            }
        }
    }));
    let mut registry = DocumentRegistry::new();
    assert!(loader::load_spec(&ok, None, &mut registry).is_ok());

    let bad = minimal(json!({
        "components": {
            "securitySchemes": {
                "oauth": {
                    "type": "oauth2",
                    "flows": {
                        "deviceAuthorization": { "tokenUrl": "t", "scopes": {} }
                    }
                }
            }
        }
    }));
    let mut registry = DocumentRegistry::new();
    assert_matches!(
        loader::load_spec(&bad, None, &mut registry),
        Err(Error::OAuthFlowMissingField { field: "deviceAuthorizationUrl", .. })
    );
}

#[test]
fn inline_request_body_promoted_with_collision_suffix() {
    let doc = minimal(json!({
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
        },
        "components": {
            "schemas": {
                // Occupies the synthesized name, forcing the `_1` suffix.
                "Inline_createPet_Request": {
                    "type": "object",
                    "properties": { "occupied": { "type": "boolean" } }
                }
            }
        }
    }));

    let spec = load(doc);
    assert!(spec.defined_schema("Inline_createPet_Request").is_some());
    assert!(spec.defined_schema("Inline_createPet_Request_1").is_some());

    let body = spec.paths[0].operations[0].request_body.as_ref().unwrap();
    assert_eq!(
        body.schema().unwrap().ref_name.as_deref(),
        Some("Inline_createPet_Request_1")
    );
}

#[test]
fn exclusive_minimum_constraint_generates_erange_check() {
    // Scenario: {type: integer, minimum: 10, exclusiveMinimum: true} must
    // reject 10 with ERANGE and accept 11.
    let (_, source) = emit(minimal(json!({
        "components": {
            "schemas": {
                "Limits": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": "integer",
                            "minimum": 10,
                            "exclusiveMinimum": true
                        }
                    }
                }
            }
        }
    })));

    assert!(source.contains("if (obj->value <= 10) { Limits_cleanup(obj); return ERANGE; }"));
}

#[test]
fn writer_round_trips_loader_output() {
    let doc = minimal(json!({
        "tags": [{ "name": "pets" }],
        "servers": [{ "url": "https://api.example.com/v1" }],
        "paths": {
            "/pets/{petId}": {
                "get": {
                    "tags": ["pets"],
                    "operationId": "getPet",
                    "parameters": [{
                        "name": "petId",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "integer", "format": "int64" }
                    }],
                    "responses": {
                        "200": {
                            "description": "ok",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Pet" }
                                }
                            }
                        },
                        "default": { "description": "error" }
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
                        "name": { "type": "string" },
                        "tag": { "type": ["string", "null"] }
                    },
                    "required": ["id", "name"]
                }
            }
        }
    }));

    let spec = load(doc.clone());
    let written = writer::write_spec(&spec).unwrap();
    assert_eq!(written, doc);
}

#[test]
fn schema_document_with_id_and_type_echoes_verbatim() {
    let doc = json!({
        "$id": "https://example.com/pet.schema.json",
        "type": "object",
        "properties": { "name": { "type": "string" } },
        "customKeyword": { "anything": ["goes", 1, null] }
    });

    let spec = load(doc.clone());
    assert!(spec.is_schema_document);
    assert_eq!(writer::write_spec(&spec).unwrap(), doc);
}

#[test]
fn sub_component_ref_passes_through_unresolved() {
    let doc = minimal(json!({
        "paths": {
            "/x": {
                "get": {
                    "operationId": "getX",
                    "parameters": [{
                        "name": "q",
                        "in": "query",
                        "schema": { "$ref": "#/components/schemas/Pet/properties/id" }
                    }],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "properties": { "id": { "type": "integer" } }
                }
            }
        }
    }));

    let spec = load(doc.clone());
    let schema = spec.paths[0].operations[0].parameters[0]
        .schema
        .as_ref()
        .unwrap();
    assert_eq!(schema.ref_name, None);
    assert_eq!(
        schema.ref_path.as_deref(),
        Some("#/components/schemas/Pet/properties/id")
    );

    // The writer echoes the pointer byte for byte.
    let written = writer::write_spec(&spec).unwrap();
    assert_eq!(
        written["paths"]["/x"]["get"]["parameters"][0]["schema"]["$ref"],
        json!("#/components/schemas/Pet/properties/id")
    );
}

#[test]
fn operation_ids_unique_across_registered_documents() {
    let first = minimal(json!({
        "paths": {
            "/a": {
                "get": {
                    "operationId": "shared",
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    }));
    let second = minimal(json!({
        "$self": "https://example.com/second.json",
        "paths": {
            "/b": {
                "get": {
                    "operationId": "shared",
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    }));

    let mut registry = DocumentRegistry::new();
    loader::load_spec(&first, None, &mut registry).unwrap();
    assert_matches!(
        loader::load_spec(&second, None, &mut registry),
        Err(Error::DuplicateOperationId(id)) if id == "shared"
    );
}

#[test]
fn querystring_and_query_parameters_conflict() {
    let doc = minimal(json!({
        "paths": {
            "/search": {
                "get": {
                    "operationId": "search",
                    "parameters": [
                        {
                            "name": "full",
                            "in": "querystring",
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "type": "string" }
                                }
                            }
                        },
                        { "name": "q", "in": "query", "schema": { "type": "string" } }
                    ],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    }));

    let mut registry = DocumentRegistry::new();
    assert_matches!(
        loader::load_spec(&doc, None, &mut registry),
        Err(Error::QuerystringConflict)
    );
}

#[test]
fn ambiguous_sibling_templates_rejected() {
    let doc = minimal(json!({
        "paths": {
            "/a/{x}/b": {
                "get": {
                    "parameters": [{
                        "name": "x", "in": "path", "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": { "200": { "description": "ok" } }
                }
            },
            "/a/{y}/b": {
                "get": {
                    "parameters": [{
                        "name": "y", "in": "path", "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    }));

    let mut registry = DocumentRegistry::new();
    assert_matches!(
        loader::load_spec(&doc, None, &mut registry),
        Err(Error::AmbiguousPathTemplates(..))
    );
}

#[test]
fn path_template_variable_requires_required_path_parameter() {
    let doc = minimal(json!({
        "paths": {
            "/pets/{petId}": {
                "get": {
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    }));

    let mut registry = DocumentRegistry::new();
    assert_matches!(
        loader::load_spec(&doc, None, &mut registry),
        Err(Error::MissingPathParameter { var, .. }) if var == "petId"
    );
}

#[test]
fn additional_operations_reject_standard_methods() {
    let doc = minimal(json!({
        "paths": {
            "/jobs": {
                "additionalOperations": {
                    "PURGE": { "responses": { "200": { "description": "ok" } } }
                }
            }
        }
    }));
    let spec = load(doc);
    let op = &spec.paths[0].operations[0];
    assert!(op.is_additional);
    assert_eq!(op.wire_method(), "PURGE");

    let bad = minimal(json!({
        "paths": {
            "/jobs": {
                "additionalOperations": {
                    "GET": { "responses": { "200": { "description": "ok" } } }
                }
            }
        }
    }));
    let mut registry = DocumentRegistry::new();
    assert_matches!(
        loader::load_spec(&bad, None, &mut registry),
        Err(Error::StandardMethodInAdditional(_))
    );
}

#[test]
fn emitting_twice_is_byte_identical() {
    let doc = minimal(json!({
        "components": {
            "schemas": {
                "Color": { "type": "string", "enum": ["RED", "GREEN"] },
                "Pet": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "color": { "$ref": "#/components/schemas/Color" }
                    }
                }
            }
        }
    }));

    let (header1, source1) = emit(doc.clone());
    let (header2, source2) = emit(doc);
    assert_eq!(header1, header2);
    assert_eq!(source1, source2);
}

#[test]
fn anchor_references_emit_typed_members() {
    let (header, _) = emit(minimal(json!({
        "components": {
            "schemas": {
                "Node": {
                    "$anchor": "node",
                    "type": "object",
                    "properties": { "next": { "$ref": "#node" } }
                }
            }
        }
    })));

    // The anchor resolves to the component, so the member is a typed
    // pointer rather than an opaque JSON blob.
    assert!(header.contains("struct Node *next;"));
}

#[test]
fn dynamic_refs_emit_typed_members() {
    let (header, _) = emit(minimal(json!({
        "components": {
            "schemas": {
                "Tree": {
                    "$dynamicAnchor": "tree",
                    "type": "object",
                    "properties": {
                        "children": {
                            "type": "array",
                            "items": { "$dynamicRef": "#tree" }
                        }
                    }
                }
            }
        }
    })));

    assert!(header.contains("struct Tree **children;"));
}

#[test]
fn all_of_merges_across_registered_documents() {
    let common = minimal(json!({
        "$self": "https://example.com/common.json",
        "components": {
            "schemas": {
                "Audited": {
                    "type": "object",
                    "properties": { "createdAt": { "type": "string" } },
                    "required": ["createdAt"]
                }
            }
        }
    }));

    let main = minimal(json!({
        "$self": "https://example.com/api.json",
        "components": {
            "schemas": {
                "Pet": {
                    "allOf": [
                        { "$ref": "https://example.com/common.json#/components/schemas/Audited" },
                        {
                            "type": "object",
                            "properties": { "name": { "type": "string" } }
                        }
                    ]
                }
            }
        }
    }));

    let mut registry = DocumentRegistry::new();
    loader::load_spec(&common, None, &mut registry).unwrap();
    let spec = loader::load_spec(&main, None, &mut registry).unwrap();

    let sf = spec.defined_schema("Pet").unwrap();
    let names: Vec<_> = sf.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["createdAt", "name"]);
    assert!(sf.field("createdAt").unwrap().required);
}

#[test]
fn cross_document_refs_resolve_through_registry() {
    let common = minimal(json!({
        "$self": "https://example.com/common.json",
        "components": {
            "schemas": {
                "Error": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                }
            }
        }
    }));

    let mut registry = DocumentRegistry::new();
    loader::load_spec(&common, None, &mut registry).unwrap();

    let spec = Spec {
        document_uri: Some("https://example.com/api.json".to_owned()),
        ..Spec::default()
    };
    let resolved = oasc::spec::resolve_ref(
        &spec,
        &registry,
        "common.json#/components/schemas/Error",
        false,
    );
    assert_matches!(
        resolved,
        oasc::spec::ResolvedRef::Target(oasc::spec::RefTarget::Component { name, .. })
            if name == "Error"
    );
}
