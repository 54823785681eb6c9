//! Schema loading and component lowering.
//!
//! [`load_schema_ref`] reads any schema position into a [`SchemaRef`];
//! [`lower_component_schema`] turns a `components/schemas` entry into a
//! [`StructFields`] composite (struct, enum, or union) or keeps it as a raw
//! schema when it does not fit the composite mold. `allOf` is flattened by
//! merging properties and required lists.

use indexmap::IndexMap;
use log::trace;
use serde_json::{Map, Value};

use super::{extensions, get_bool, get_f64, get_str, get_u64, load_external_docs, obj};
use crate::spec::{
    resolve_ref, Any, Discriminator, DocumentRegistry, Error, Field, RefTarget, ResolvedRef,
    SchemaRef, Spec, StructFields, Xml, XmlNodeType,
};

/// Keywords the descriptor models directly; anything else is preserved in
/// `extra` and merged back on write.
const KNOWN_SCHEMA_KEYS: &[&str] = &[
    "$ref",
    "$dynamicRef",
    "type",
    "items",
    "format",
    "contentMediaType",
    "contentEncoding",
    "contentSchema",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "minItems",
    "maxItems",
    "uniqueItems",
    "enum",
    "const",
    "default",
    "title",
    "summary",
    "description",
    "deprecated",
    "readOnly",
    "writeOnly",
    "example",
    "examples",
    "externalDocs",
    "discriminator",
    "xml",
];

/// Reads a schema position into a [`SchemaRef`].
///
/// Boolean schemas, `$ref`/`$dynamicRef` forms, inline primitive types, type
/// unions, arrays with item schemas, constraints, and annotations are
/// modelled directly; unknown keywords land in `extra` verbatim.
pub fn load_schema_ref(value: &Value) -> Result<SchemaRef, Error> {
    if let Value::Bool(b) = value {
        return Ok(SchemaRef {
            boolean: Some(*b),
            ..SchemaRef::default()
        });
    }

    let map = obj(value, "schema")?;
    let mut schema = SchemaRef::default();

    if let Some(reference) = get_str(map, "$ref") {
        schema.ref_name = crate::spec::local_component_name(&reference)
            .filter(|(kind, _)| *kind == "schemas")
            .map(|(_, name)| name.to_owned());
        schema.ref_path = Some(reference);
    } else if let Some(reference) = get_str(map, "$dynamicRef") {
        schema.ref_path = Some(reference);
        schema.ref_is_dynamic = true;
    }

    match map.get("type") {
        Some(Value::String(ty)) => {
            schema.inline_type = Some(ty.clone());
            schema.is_array = ty == "array";
        }
        Some(Value::Array(types)) => {
            schema.type_union = types
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect();
            schema.is_array = schema.type_union.iter().any(|t| t == "array");
        }
        _ => {}
    }

    if let Some(items) = map.get("items") {
        schema.items = Some(Box::new(load_schema_ref(items)?));
    }

    schema.format = get_str(map, "format");
    schema.content_media_type = get_str(map, "contentMediaType");
    schema.content_encoding = get_str(map, "contentEncoding");
    if let Some(content_schema) = map.get("contentSchema") {
        schema.content_schema = Some(Box::new(load_schema_ref(content_schema)?));
    }

    schema.minimum = get_f64(map, "minimum");
    schema.maximum = get_f64(map, "maximum");
    // Both the boolean form and the numeric draft form are accepted.
    match map.get("exclusiveMinimum") {
        Some(Value::Bool(b)) => schema.exclusive_minimum = *b,
        Some(Value::Number(n)) => {
            schema.exclusive_minimum = true;
            schema.minimum = schema.minimum.or_else(|| n.as_f64());
        }
        _ => {}
    }
    match map.get("exclusiveMaximum") {
        Some(Value::Bool(b)) => schema.exclusive_maximum = *b,
        Some(Value::Number(n)) => {
            schema.exclusive_maximum = true;
            schema.maximum = schema.maximum.or_else(|| n.as_f64());
        }
        _ => {}
    }
    schema.min_length = get_u64(map, "minLength");
    schema.max_length = get_u64(map, "maxLength");
    schema.pattern = get_str(map, "pattern");
    schema.min_items = get_u64(map, "minItems");
    schema.max_items = get_u64(map, "maxItems");
    schema.unique_items = get_bool(map, "uniqueItems");

    if let Some(values) = map.get("enum").and_then(Value::as_array) {
        schema.enum_values = values.iter().map(Any::from_value).collect();
    }
    schema.const_value = map.get("const").map(Any::from_value);
    schema.default = map.get("default").map(Any::from_value);

    schema.title = get_str(map, "title");
    schema.summary = get_str(map, "summary");
    schema.description = get_str(map, "description");
    schema.deprecated = get_bool(map, "deprecated");
    schema.read_only = get_bool(map, "readOnly");
    schema.write_only = get_bool(map, "writeOnly");
    schema.example = map.get("example").map(Any::from_value);
    if let Some(examples) = map.get("examples").and_then(Value::as_array) {
        schema.examples = examples.iter().map(Any::from_value).collect();
    }

    if let Some(docs) = map.get("externalDocs") {
        schema.external_docs = Some(load_external_docs(docs)?);
    }
    if let Some(discriminator) = map.get("discriminator") {
        schema.discriminator = Some(load_discriminator(discriminator)?);
    }
    if let Some(xml) = map.get("xml") {
        schema.xml = Some(load_xml(xml)?);
    }

    // Everything the descriptor does not model stays verbatim, including
    // `x-` extensions and structural keywords at non-promotable positions.
    let extra: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| !KNOWN_SCHEMA_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if !extra.is_empty() {
        schema.extra = Some(Value::Object(extra));
    }

    Ok(schema)
}

pub(crate) fn load_discriminator(value: &Value) -> Result<Discriminator, Error> {
    let map = obj(value, "discriminator")?;
    let mut mapping = IndexMap::new();
    if let Some(raw) = map.get("mapping") {
        for (key, target) in obj(raw, "discriminator.mapping")? {
            if let Some(target) = target.as_str() {
                mapping.insert(key.clone(), target.to_owned());
            }
        }
    }
    Ok(Discriminator {
        property_name: super::req_str(map, "propertyName", "discriminator")?,
        mapping,
        default_mapping: get_str(map, "defaultMapping"),
        extensions: extensions(map),
    })
}

pub(crate) fn load_xml(value: &Value) -> Result<Xml, Error> {
    let map = obj(value, "xml")?;
    Ok(Xml {
        name: get_str(map, "name"),
        namespace: get_str(map, "namespace"),
        prefix: get_str(map, "prefix"),
        node_type: get_str(map, "nodeType")
            .as_deref()
            .and_then(XmlNodeType::from_str_opt),
        attribute: get_bool(map, "attribute"),
        wrapped: get_bool(map, "wrapped"),
        extensions: extensions(map),
    })
}

/// Lowers one `components/schemas` entry into the spec.
///
/// Objects (including `allOf` compositions) become structs, string `enum`s
/// become enums, `oneOf`/`anyOf` become unions; everything else (scalar
/// strings, booleans, arrays, free-form schemas) is kept verbatim in
/// `raw_schemas`. `$id`, `$anchor` and `$dynamicAnchor` registrations are
/// recorded either way.
pub(crate) fn lower_component_schema(
    spec: &mut Spec,
    registry: &DocumentRegistry,
    schemas_raw: &Map<String, Value>,
    name: &str,
    value: &Value,
) -> Result<(), Error> {
    record_schema_anchors(spec, name, value);

    let Value::Object(map) = value else {
        // Boolean schemas (and anything else non-object) stay raw.
        spec.raw_schemas.insert(name.to_owned(), value.clone());
        return Ok(());
    };

    if is_string_enum(map) {
        let members = map
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let mut sf = StructFields::new_enum(members);
        sf.description = get_str(map, "description");
        sf.deprecated = get_bool(map, "deprecated");
        spec.defined_schemas.insert(name.to_owned(), sf);
        return Ok(());
    }

    if let Some(variants) = union_variants(map) {
        let sf = lower_union(spec, registry, schemas_raw, name, map, variants)?;
        spec.defined_schemas.insert(name.to_owned(), sf);
        return Ok(());
    }

    if is_object_shape(map) {
        let sf = lower_struct(spec, registry, map, Some(schemas_raw))?;
        spec.defined_schemas.insert(name.to_owned(), sf);
        return Ok(());
    }

    trace!("keeping schema {name:?} raw");
    spec.raw_schemas.insert(name.to_owned(), value.clone());
    Ok(())
}

/// Records a component's `$id`/`$anchor`/`$dynamicAnchor` registrations.
///
/// Called once as a pre-pass over the whole schemas map (so forward anchor
/// references resolve during lowering) and again defensively by
/// [`lower_component_schema`]; re-recording the same entry is harmless.
pub(crate) fn record_schema_anchors(spec: &mut Spec, name: &str, value: &Value) {
    let Value::Object(map) = value else { return };
    if let Some(id) = get_str(map, "$id") {
        spec.schema_ids.insert(id, name.to_owned());
    }
    if let Some(anchor) = get_str(map, "$anchor") {
        spec.anchors.insert(anchor, name.to_owned());
    }
    if let Some(anchor) = get_str(map, "$dynamicAnchor") {
        spec.dynamic_anchors.insert(anchor, name.to_owned());
    }
}

pub(crate) fn is_string_enum(map: &Map<String, Value>) -> bool {
    let Some(values) = map.get("enum").and_then(Value::as_array) else {
        return false;
    };
    let type_ok = match map.get("type") {
        None => true,
        Some(Value::String(t)) => t == "string",
        Some(_) => false,
    };
    type_ok && !values.is_empty() && values.iter().all(Value::is_string)
}

pub(crate) fn union_variants(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    map.get("oneOf")
        .or_else(|| map.get("anyOf"))
        .and_then(Value::as_array)
}

pub(crate) fn is_object_shape(map: &Map<String, Value>) -> bool {
    map.get("type").and_then(Value::as_str) == Some("object") && !map.contains_key("enum")
        || map.contains_key("properties")
        || map.contains_key("allOf")
}

/// Lowers an object schema (with `allOf` flattening) into a struct
/// composite.
///
/// `schemas_raw` resolves `allOf` references at component-load time (when
/// forward references are still raw JSON); already-lowered components and
/// anchor/`$id`/cross-document targets resolve through `spec`/`registry`.
pub(crate) fn lower_struct(
    spec: &Spec,
    registry: &DocumentRegistry,
    map: &Map<String, Value>,
    schemas_raw: Option<&Map<String, Value>>,
) -> Result<StructFields, Error> {
    if map.contains_key("allOf") && map.contains_key("discriminator") {
        return Err(Error::AllOfWithDiscriminator);
    }

    let mut sf = StructFields::new_struct();
    sf.description = get_str(map, "description");
    sf.deprecated = get_bool(map, "deprecated");
    collect_object_members(spec, registry, map, schemas_raw, &mut sf.fields)?;
    Ok(sf)
}

/// Merges `properties` and `required` of an object schema (and of every
/// `allOf` constituent, referenced or inline) into `fields`. The first
/// definition of a property wins.
fn collect_object_members(
    spec: &Spec,
    registry: &DocumentRegistry,
    map: &Map<String, Value>,
    schemas_raw: Option<&Map<String, Value>>,
    fields: &mut Vec<Field>,
) -> Result<(), Error> {
    let required = super::str_vec(map.get("required"));

    if let Some(entries) = map.get("allOf").and_then(Value::as_array) {
        for entry in entries {
            let Value::Object(entry_map) = entry else {
                continue;
            };
            if let Some(reference) = get_str(entry_map, "$ref") {
                merge_allof_target(spec, registry, &reference, schemas_raw, fields)?;
            } else {
                collect_object_members(spec, registry, entry_map, schemas_raw, fields)?;
            }
        }
    }

    if let Some(properties) = map.get("properties").and_then(Value::as_object) {
        for (prop_name, prop_value) in properties {
            if fields.iter().any(|f| f.name == *prop_name) {
                continue;
            }
            let mut field = Field::new(prop_name.clone(), load_schema_ref(prop_value)?);
            field.default_value = prop_value
                .as_object()
                .and_then(|p| p.get("default"))
                .map(Any::from_value);
            fields.push(field);
        }
    }

    // This level's `required` list also covers properties merged in from
    // `allOf` constituents.
    for field in fields.iter_mut() {
        if required.iter().any(|r| *r == field.name) {
            field.required = true;
        }
    }

    Ok(())
}

/// Locates an `allOf` constituent by reference and merges its fields.
///
/// The target may be a literal local component fragment, an `$anchor`/`$id`
/// form resolved through the full resolver, or a component of another
/// registered document. Unresolvable constituents are skipped.
fn merge_allof_target(
    spec: &Spec,
    registry: &DocumentRegistry,
    reference: &str,
    schemas_raw: Option<&Map<String, Value>>,
    fields: &mut Vec<Field>,
) -> Result<(), Error> {
    let local = crate::spec::local_component_name(reference)
        .filter(|(kind, _)| *kind == "schemas")
        .map(|(_, name)| name.to_owned());

    let (foreign, name) = match local {
        Some(name) => (None, name),
        None => match resolve_ref(spec, registry, reference, false) {
            ResolvedRef::Target(RefTarget::Component {
                spec: owner,
                kind,
                name,
            }) if kind == "schemas" => {
                let owner = (!std::ptr::eq(owner, spec)).then_some(owner);
                (owner, name)
            }
            _ => return Ok(()),
        },
    };

    if let Some(owner) = foreign {
        if let Some(sf) = owner.defined_schemas.get(&name) {
            push_merged_fields(sf, fields);
        }
        return Ok(());
    }

    if let Some(Value::Object(raw_map)) = schemas_raw.and_then(|s| s.get(&name)) {
        return collect_object_members(spec, registry, raw_map, schemas_raw, fields);
    }
    if let Some(sf) = spec.defined_schemas.get(&name) {
        push_merged_fields(sf, fields);
    }
    Ok(())
}

fn push_merged_fields(sf: &StructFields, fields: &mut Vec<Field>) {
    for field in &sf.fields {
        if !fields.iter().any(|f| f.name == field.name) {
            fields.push(field.clone());
        }
    }
}

/// Lowers a `oneOf`/`anyOf` composition into a union composite.
///
/// Referenced variants take their component name; inline object variants
/// are promoted into their own components named from `title` (or a
/// positional fallback); primitive variants carry their type name.
pub(crate) fn lower_union(
    spec: &mut Spec,
    registry: &DocumentRegistry,
    schemas_raw: &Map<String, Value>,
    name: &str,
    map: &Map<String, Value>,
    variants: &[Value],
) -> Result<StructFields, Error> {
    let mut fields = Vec::with_capacity(variants.len());

    for (index, variant) in variants.iter().enumerate() {
        let Value::Object(vmap) = variant else {
            continue;
        };

        if let Some(reference) = get_str(vmap, "$ref") {
            let schema = load_schema_ref(variant)?;
            let variant_name = schema
                .ref_name
                .clone()
                .or_else(|| reference.rsplit('/').next().map(str::to_owned))
                .unwrap_or_else(|| format!("Variant{index}"));
            fields.push(Field::new(variant_name, schema));
            continue;
        }

        if is_object_shape(vmap) {
            // Inline variants are promoted to their own components, named
            // from their title when available.
            let base = match get_str(vmap, "title") {
                Some(title) => format!("{name}_{title}"),
                None => format!("{name}_Variant{index}"),
            };
            let promoted = unique_schema_name(spec, &base);
            let sf = lower_struct(spec, registry, vmap, Some(schemas_raw))?;
            spec.defined_schemas.insert(promoted.clone(), sf);

            let mut schema = SchemaRef::reference(format!("#/components/schemas/{promoted}"));
            schema.ref_name = Some(promoted.clone());
            fields.push(Field::new(promoted, schema));
            continue;
        }

        let schema = load_schema_ref(variant)?;
        let variant_name = schema
            .inline_type
            .clone()
            .unwrap_or_else(|| format!("Variant{index}"));
        fields.push(Field::new(variant_name, schema));
    }

    let mut sf = StructFields::new_union(fields);
    sf.description = get_str(map, "description");
    sf.deprecated = get_bool(map, "deprecated");
    if let Some(discriminator) = map.get("discriminator") {
        sf.discriminator = Some(load_discriminator(discriminator)?);
    }
    Ok(sf)
}

/// Picks a component name not yet taken, suffixing `_1`, `_2`, ... on
/// collision.
pub(crate) fn unique_schema_name(spec: &Spec, base: &str) -> String {
    let taken = |name: &str| {
        spec.defined_schemas.contains_key(name) || spec.raw_schemas.contains_key(name)
    };
    if !taken(base) {
        return base.to_owned();
    }
    let mut i = 1;
    loop {
        let candidate = format!("{base}_{i}");
        if !taken(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::spec::CompositeKind;

    #[test]
    fn ref_name_resolves_for_local_schema_refs() {
        let schema = load_schema_ref(&json!({ "$ref": "#/components/schemas/Pet" })).unwrap();
        assert_eq!(schema.ref_name.as_deref(), Some("Pet"));
        assert_eq!(schema.ref_path.as_deref(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn sub_component_pointer_keeps_ref_name_unset() {
        let schema =
            load_schema_ref(&json!({ "$ref": "#/components/schemas/Pet/properties/id" })).unwrap();
        assert_eq!(schema.ref_name, None);
        assert_eq!(
            schema.ref_path.as_deref(),
            Some("#/components/schemas/Pet/properties/id")
        );
    }

    #[test]
    fn dynamic_ref_flagged() {
        let schema = load_schema_ref(&json!({ "$dynamicRef": "#node" })).unwrap();
        assert!(schema.ref_is_dynamic);
        assert_eq!(schema.ref_path.as_deref(), Some("#node"));
    }

    #[test]
    fn type_union_with_null() {
        let schema = load_schema_ref(&json!({ "type": ["string", "null"] })).unwrap();
        assert_eq!(schema.type_union, ["string", "null"]);
        assert!(schema.nullable());
    }

    #[test]
    fn boolean_schemas() {
        assert_eq!(load_schema_ref(&json!(true)).unwrap().boolean, Some(true));
        assert_eq!(load_schema_ref(&json!(false)).unwrap().boolean, Some(false));
    }

    #[test]
    fn exclusive_minimum_bool_and_numeric_forms() {
        let schema =
            load_schema_ref(&json!({ "type": "integer", "minimum": 10, "exclusiveMinimum": true }))
                .unwrap();
        assert_eq!(schema.minimum, Some(10.0));
        assert!(schema.exclusive_minimum);

        let schema =
            load_schema_ref(&json!({ "type": "integer", "exclusiveMinimum": 10 })).unwrap();
        assert_eq!(schema.minimum, Some(10.0));
        assert!(schema.exclusive_minimum);
    }

    #[test]
    fn unknown_keywords_kept_in_extra() {
        let schema = load_schema_ref(&json!({
            "type": "object",
            "additionalProperties": false,
            "x-internal": true
        }))
        .unwrap();
        let extra = schema.extra.unwrap();
        assert_eq!(extra["additionalProperties"], json!(false));
        assert_eq!(extra["x-internal"], json!(true));
    }

    #[test]
    fn enum_values_preserve_origin_types() {
        let schema = load_schema_ref(&json!({ "enum": [1, "1", null] })).unwrap();
        assert_eq!(
            schema.enum_values,
            vec![Any::Number(1.into()), Any::Str("1".into()), Any::Null]
        );
    }

    #[test]
    fn component_object_lowers_to_struct() {
        let mut spec = Spec::default();
        let raw = Map::new();
        lower_component_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &raw,
            "Login",
            &json!({
                "type": "object",
                "properties": { "user": { "type": "string" } },
                "required": ["user"]
            }),
        )
        .unwrap();

        let sf = spec.defined_schema("Login").unwrap();
        assert_eq!(sf.kind, CompositeKind::Struct);
        assert_eq!(sf.fields.len(), 1);
        assert_eq!(sf.fields[0].name, "user");
        assert!(sf.fields[0].required);
        assert_eq!(sf.fields[0].schema.inline_type.as_deref(), Some("string"));
    }

    #[test]
    fn component_string_enum_lowers_to_enum() {
        let mut spec = Spec::default();
        lower_component_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &Map::new(),
            "Color",
            &json!({ "type": "string", "enum": ["RED", "GREEN"] }),
        )
        .unwrap();
        let sf = spec.defined_schema("Color").unwrap();
        assert_eq!(sf.kind, CompositeKind::Enum);
        assert_eq!(sf.members, ["RED", "GREEN"]);
    }

    #[test]
    fn scalar_component_stays_raw() {
        let mut spec = Spec::default();
        let value = json!({ "type": "string", "maxLength": 10 });
        lower_component_schema(&mut spec, &DocumentRegistry::new(), &Map::new(), "Name", &value)
            .unwrap();
        assert_eq!(spec.raw_schemas.get("Name"), Some(&value));
        assert!(spec.defined_schema("Name").is_none());
    }

    #[test]
    fn all_of_merges_properties_and_required() {
        let raw: Map<String, Value> = serde_json::from_value(json!({
            "Base": {
                "type": "object",
                "properties": { "id": { "type": "integer" } },
                "required": ["id"]
            },
            "Derived": {
                "allOf": [
                    { "$ref": "#/components/schemas/Base" },
                    {
                        "type": "object",
                        "properties": { "name": { "type": "string" } },
                        "required": ["name"]
                    }
                ]
            }
        }))
        .unwrap();

        let mut spec = Spec::default();
        lower_component_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &raw,
            "Derived",
            &raw["Derived"],
        )
        .unwrap();

        let sf = spec.defined_schema("Derived").unwrap();
        let names: Vec<_> = sf.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "name"]);
        assert!(sf.fields.iter().all(|f| f.required));
    }

    #[test]
    fn all_of_with_discriminator_rejected() {
        let mut spec = Spec::default();
        let result = lower_component_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &Map::new(),
            "Bad",
            &json!({
                "allOf": [{ "type": "object" }],
                "discriminator": { "propertyName": "kind" }
            }),
        );
        assert!(matches!(result, Err(Error::AllOfWithDiscriminator)));
    }

    #[test]
    fn one_of_refs_lower_to_union() {
        let raw: Map<String, Value> = serde_json::from_value(json!({
            "Cat": { "type": "object", "properties": { "meows": { "type": "boolean" } } },
            "Dog": { "type": "object", "properties": { "barks": { "type": "boolean" } } },
        }))
        .unwrap();

        let mut spec = Spec::default();
        lower_component_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &raw,
            "Pet",
            &json!({
                "oneOf": [
                    { "$ref": "#/components/schemas/Cat" },
                    { "$ref": "#/components/schemas/Dog" }
                ],
                "discriminator": { "propertyName": "petType" }
            }),
        )
        .unwrap();

        let sf = spec.defined_schema("Pet").unwrap();
        assert_eq!(sf.kind, CompositeKind::Union);
        let names: Vec<_> = sf.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Cat", "Dog"]);
        assert_eq!(
            sf.discriminator.as_ref().unwrap().property_name,
            "petType"
        );
    }

    #[test]
    fn inline_union_variant_promoted_by_title() {
        let mut spec = Spec::default();
        lower_component_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &Map::new(),
            "Shape",
            &json!({
                "oneOf": [
                    {
                        "title": "Circle",
                        "type": "object",
                        "properties": { "radius": { "type": "number" } }
                    }
                ]
            }),
        )
        .unwrap();

        assert!(spec.defined_schema("Shape_Circle").is_some());
        let sf = spec.defined_schema("Shape").unwrap();
        assert_eq!(sf.fields[0].name, "Shape_Circle");
        assert_eq!(sf.fields[0].schema.ref_name.as_deref(), Some("Shape_Circle"));
    }

    #[test]
    fn schema_anchors_recorded() {
        let mut spec = Spec::default();
        lower_component_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &Map::new(),
            "Node",
            &json!({
                "$id": "https://example.com/node.json",
                "$anchor": "node",
                "$dynamicAnchor": "dyn-node",
                "type": "object",
                "properties": {}
            }),
        )
        .unwrap();

        assert_eq!(spec.schema_ids.get("https://example.com/node.json"), Some(&"Node".to_owned()));
        assert_eq!(spec.anchors.get("node"), Some(&"Node".to_owned()));
        assert_eq!(spec.dynamic_anchors.get("dyn-node"), Some(&"Node".to_owned()));
    }

    #[test]
    fn unique_names_suffix_on_collision() {
        let mut spec = Spec::default();
        spec.raw_schemas.insert("Inline_createPet_Request".to_owned(), json!({}));
        assert_eq!(
            unique_schema_name(&spec, "Inline_createPet_Request"),
            "Inline_createPet_Request_1"
        );
    }
}
