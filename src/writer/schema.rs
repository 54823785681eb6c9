//! The schema serialization kernel.

use serde_json::{json, Map, Value};

use crate::spec::{
    CompositeKind, Discriminator, ExternalDoc, SchemaRef, StructFields, Xml,
};

/// Serializes a [`SchemaRef`] back to schema JSON.
///
/// Boolean schemas emit as bare `true`/`false`. References emit their
/// keyword (`$ref` or `$dynamicRef`) plus any sibling annotations. Multipart
/// descriptors override everything else with a
/// `{type: object, properties: ...}` shape. Unknown keywords preserved in
/// `extra` are merged last without overriding keys the descriptor set.
pub(crate) fn write_schema_ref(schema: &SchemaRef) -> Value {
    if let Some(boolean) = schema.boolean {
        return Value::Bool(boolean);
    }

    let mut obj = Map::new();

    if let Some(reference) = &schema.ref_path {
        let keyword = if schema.ref_is_dynamic {
            "$dynamicRef"
        } else {
            "$ref"
        };
        obj.insert(keyword.to_owned(), json!(reference));
        if let Some(summary) = &schema.summary {
            obj.insert("summary".to_owned(), json!(summary));
        }
        if let Some(description) = &schema.description {
            obj.insert("description".to_owned(), json!(description));
        }
        merge_extra(&mut obj, schema.extra.as_ref());
        return Value::Object(obj);
    }

    if !schema.multipart_fields.is_empty() {
        let mut properties = Map::new();
        for field in &schema.multipart_fields {
            let prop = if field.is_binary {
                json!({ "type": "string", "format": "binary" })
            } else {
                json!({ "type": field.ty })
            };
            properties.insert(field.name.clone(), prop);
        }
        obj.insert("type".to_owned(), json!("object"));
        obj.insert("properties".to_owned(), Value::Object(properties));
        return Value::Object(obj);
    }

    write_type_fields(&mut obj, schema);
    merge_extra(&mut obj, schema.extra.as_ref());
    Value::Object(obj)
}

/// Writes every non-reference descriptor field into `obj`.
pub(crate) fn write_type_fields(obj: &mut Map<String, Value>, schema: &SchemaRef) {
    if let Some(title) = &schema.title {
        obj.insert("title".to_owned(), json!(title));
    }
    if let Some(summary) = &schema.summary {
        obj.insert("summary".to_owned(), json!(summary));
    }
    if let Some(description) = &schema.description {
        obj.insert("description".to_owned(), json!(description));
    }

    if !schema.type_union.is_empty() {
        obj.insert("type".to_owned(), json!(schema.type_union));
    } else if let Some(ty) = &schema.inline_type {
        obj.insert("type".to_owned(), json!(ty));
    }

    if schema.is_array {
        if let Some(items) = &schema.items {
            obj.insert("items".to_owned(), write_schema_ref(items));
        }
    }

    if let Some(format) = &schema.format {
        obj.insert("format".to_owned(), json!(format));
    }
    if let Some(media_type) = &schema.content_media_type {
        obj.insert("contentMediaType".to_owned(), json!(media_type));
    }
    if let Some(encoding) = &schema.content_encoding {
        obj.insert("contentEncoding".to_owned(), json!(encoding));
    }
    if let Some(content_schema) = &schema.content_schema {
        obj.insert("contentSchema".to_owned(), write_schema_ref(content_schema));
    }

    if !schema.enum_values.is_empty() {
        let values: Vec<Value> = schema.enum_values.iter().map(|v| v.to_value()).collect();
        obj.insert("enum".to_owned(), Value::Array(values));
    }
    if let Some(const_value) = &schema.const_value {
        obj.insert("const".to_owned(), const_value.to_value());
    }
    if let Some(default) = &schema.default {
        obj.insert("default".to_owned(), default.to_value());
    }

    if let Some(minimum) = schema.minimum {
        obj.insert("minimum".to_owned(), number(minimum));
        if schema.exclusive_minimum {
            obj.insert("exclusiveMinimum".to_owned(), json!(true));
        }
    }
    if let Some(maximum) = schema.maximum {
        obj.insert("maximum".to_owned(), number(maximum));
        if schema.exclusive_maximum {
            obj.insert("exclusiveMaximum".to_owned(), json!(true));
        }
    }
    if let Some(min_length) = schema.min_length {
        obj.insert("minLength".to_owned(), json!(min_length));
    }
    if let Some(max_length) = schema.max_length {
        obj.insert("maxLength".to_owned(), json!(max_length));
    }
    if let Some(pattern) = &schema.pattern {
        obj.insert("pattern".to_owned(), json!(pattern));
    }
    if let Some(min_items) = schema.min_items {
        obj.insert("minItems".to_owned(), json!(min_items));
    }
    if let Some(max_items) = schema.max_items {
        obj.insert("maxItems".to_owned(), json!(max_items));
    }
    if let Some(unique) = schema.unique_items {
        obj.insert("uniqueItems".to_owned(), json!(unique));
    }

    if let Some(deprecated) = schema.deprecated {
        obj.insert("deprecated".to_owned(), json!(deprecated));
    }
    if let Some(read_only) = schema.read_only {
        obj.insert("readOnly".to_owned(), json!(read_only));
    }
    if let Some(write_only) = schema.write_only {
        obj.insert("writeOnly".to_owned(), json!(write_only));
    }
    if let Some(example) = &schema.example {
        obj.insert("example".to_owned(), example.to_value());
    }
    if !schema.examples.is_empty() {
        let values: Vec<Value> = schema.examples.iter().map(|v| v.to_value()).collect();
        obj.insert("examples".to_owned(), Value::Array(values));
    }

    if let Some(docs) = &schema.external_docs {
        obj.insert("externalDocs".to_owned(), write_external_docs(docs));
    }
    if let Some(discriminator) = &schema.discriminator {
        obj.insert("discriminator".to_owned(), write_discriminator(discriminator));
    }
    if let Some(xml) = &schema.xml {
        obj.insert("xml".to_owned(), write_xml(xml));
    }
}

/// Turns a lowered composite back into schema JSON.
pub(crate) fn write_struct_fields(sf: &StructFields) -> Value {
    let mut obj = Map::new();

    if let Some(description) = &sf.description {
        obj.insert("description".to_owned(), json!(description));
    }

    match sf.kind {
        CompositeKind::Enum => {
            obj.insert("type".to_owned(), json!("string"));
            obj.insert("enum".to_owned(), json!(sf.members));
        }
        CompositeKind::Union => {
            let variants: Vec<Value> = sf
                .fields
                .iter()
                .map(|f| write_schema_ref(&f.schema))
                .collect();
            obj.insert("oneOf".to_owned(), Value::Array(variants));
            if let Some(discriminator) = &sf.discriminator {
                obj.insert(
                    "discriminator".to_owned(),
                    write_discriminator(discriminator),
                );
            }
        }
        CompositeKind::Struct => {
            obj.insert("type".to_owned(), json!("object"));
            let mut properties = Map::new();
            for field in &sf.fields {
                properties.insert(field.name.clone(), write_schema_ref(&field.schema));
            }
            obj.insert("properties".to_owned(), Value::Object(properties));
            let required = sf.required_names();
            if !required.is_empty() {
                obj.insert("required".to_owned(), json!(required));
            }
        }
    }

    if let Some(deprecated) = sf.deprecated {
        obj.insert("deprecated".to_owned(), json!(deprecated));
    }

    Value::Object(obj)
}

pub(crate) fn write_external_docs(docs: &ExternalDoc) -> Value {
    let mut obj = Map::new();
    if let Some(description) = &docs.description {
        obj.insert("description".to_owned(), json!(description));
    }
    obj.insert("url".to_owned(), json!(docs.url));
    extend_extensions(&mut obj, &docs.extensions);
    Value::Object(obj)
}

pub(crate) fn write_discriminator(discriminator: &Discriminator) -> Value {
    let mut obj = Map::new();
    obj.insert(
        "propertyName".to_owned(),
        json!(discriminator.property_name),
    );
    if !discriminator.mapping.is_empty() {
        let mut mapping = Map::new();
        for (key, target) in &discriminator.mapping {
            mapping.insert(key.clone(), json!(target));
        }
        obj.insert("mapping".to_owned(), Value::Object(mapping));
    }
    if let Some(default_mapping) = &discriminator.default_mapping {
        obj.insert("defaultMapping".to_owned(), json!(default_mapping));
    }
    extend_extensions(&mut obj, &discriminator.extensions);
    Value::Object(obj)
}

pub(crate) fn write_xml(xml: &Xml) -> Value {
    let mut obj = Map::new();
    if let Some(name) = &xml.name {
        obj.insert("name".to_owned(), json!(name));
    }
    if let Some(namespace) = &xml.namespace {
        obj.insert("namespace".to_owned(), json!(namespace));
    }
    if let Some(prefix) = &xml.prefix {
        obj.insert("prefix".to_owned(), json!(prefix));
    }
    if let Some(node_type) = xml.node_type {
        obj.insert("nodeType".to_owned(), json!(node_type.as_str()));
    }
    if let Some(attribute) = xml.attribute {
        obj.insert("attribute".to_owned(), json!(attribute));
    }
    if let Some(wrapped) = xml.wrapped {
        obj.insert("wrapped".to_owned(), json!(wrapped));
    }
    extend_extensions(&mut obj, &xml.extensions);
    Value::Object(obj)
}

/// Merges preserved unknown keywords without overriding already-set keys.
pub(crate) fn merge_extra(obj: &mut Map<String, Value>, extra: Option<&Value>) {
    let Some(Value::Object(extra)) = extra else {
        return;
    };
    for (key, value) in extra {
        if !obj.contains_key(key) {
            obj.insert(key.clone(), value.clone());
        }
    }
}

/// Re-inserts specification extensions verbatim under their original keys.
pub(crate) fn extend_extensions(
    obj: &mut Map<String, Value>,
    extensions: &indexmap::IndexMap<String, Value>,
) {
    for (key, value) in extensions {
        obj.insert(key.clone(), value.clone());
    }
}

/// Emits a JSON number, collapsing integral floats to integers.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::loader::load_schema_ref;
    use crate::spec::{Any, Field, MultipartField};

    #[test]
    fn boolean_schema_round_trips() {
        assert_eq!(write_schema_ref(&load_schema_ref(&json!(true)).unwrap()), json!(true));
        assert_eq!(write_schema_ref(&load_schema_ref(&json!(false)).unwrap()), json!(false));
    }

    #[test]
    fn type_union_with_null_emits_array() {
        let schema = load_schema_ref(&json!({ "type": ["string", "null"] })).unwrap();
        let value = write_schema_ref(&schema);
        assert_eq!(value["type"], json!(["string", "null"]));
    }

    #[test]
    fn array_schema_recurses_into_items() {
        let schema = load_schema_ref(&json!({
            "type": "array",
            "items": { "type": "integer", "format": "int64" }
        }))
        .unwrap();
        let value = write_schema_ref(&schema);
        assert_eq!(value["items"], json!({ "type": "integer", "format": "int64" }));
    }

    #[test]
    fn multipart_fields_override_schema_content() {
        let mut schema = SchemaRef::inline("object");
        schema.multipart_fields.push(MultipartField {
            name: "meta".to_owned(),
            ty: "string".to_owned(),
            is_binary: false,
        });
        schema.multipart_fields.push(MultipartField {
            name: "file".to_owned(),
            ty: "string".to_owned(),
            is_binary: true,
        });

        assert_eq!(
            write_schema_ref(&schema),
            json!({
                "type": "object",
                "properties": {
                    "meta": { "type": "string" },
                    "file": { "type": "string", "format": "binary" }
                }
            })
        );
    }

    #[test]
    fn constraints_round_trip_in_bool_form() {
        let input = json!({
            "type": "integer",
            "minimum": 10,
            "exclusiveMinimum": true,
            "maximum": 100
        });
        let schema = load_schema_ref(&input).unwrap();
        assert_eq!(write_schema_ref(&schema), input);
    }

    #[test]
    fn enum_values_keep_origin_types() {
        let schema = load_schema_ref(&json!({ "enum": [1, "1", true] })).unwrap();
        assert_eq!(write_schema_ref(&schema)["enum"], json!([1, "1", true]));
    }

    #[test]
    fn extra_merges_without_override() {
        let mut schema = SchemaRef::inline("object");
        schema.extra = Some(json!({ "type": "string", "additionalProperties": false }));
        let value = write_schema_ref(&schema);
        // `type` was set by the descriptor and must not be overridden.
        assert_eq!(value["type"], json!("object"));
        assert_eq!(value["additionalProperties"], json!(false));
    }

    #[test]
    fn ref_emits_keyword_verbatim() {
        let schema = load_schema_ref(&json!({ "$ref": "other.json#/components/schemas/Pet" }))
            .unwrap();
        assert_eq!(
            write_schema_ref(&schema),
            json!({ "$ref": "other.json#/components/schemas/Pet" })
        );

        let schema = load_schema_ref(&json!({ "$dynamicRef": "#node" })).unwrap();
        assert_eq!(write_schema_ref(&schema), json!({ "$dynamicRef": "#node" }));
    }

    #[test]
    fn struct_fields_emit_properties_and_required() {
        let mut sf = StructFields::new_struct();
        let mut field = Field::new("user", SchemaRef::inline("string"));
        field.required = true;
        sf.push(field);
        sf.push(Field::new("age", SchemaRef::inline("integer")));

        assert_eq!(
            write_struct_fields(&sf),
            json!({
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "age": { "type": "integer" }
                },
                "required": ["user"]
            })
        );
    }

    #[test]
    fn enum_composite_emits_enum() {
        let sf = StructFields::new_enum(vec!["RED".to_owned(), "GREEN".to_owned()]);
        assert_eq!(
            write_struct_fields(&sf),
            json!({ "type": "string", "enum": ["RED", "GREEN"] })
        );
    }

    #[test]
    fn union_composite_emits_one_of_with_discriminator() {
        let mut cat = SchemaRef::reference("#/components/schemas/Cat");
        cat.ref_name = Some("Cat".to_owned());
        let mut dog = SchemaRef::reference("#/components/schemas/Dog");
        dog.ref_name = Some("Dog".to_owned());

        let mut sf = StructFields::new_union(vec![
            Field::new("Cat", cat),
            Field::new("Dog", dog),
        ]);
        sf.discriminator = Some(Discriminator {
            property_name: "petType".to_owned(),
            ..Discriminator::default()
        });

        assert_eq!(
            write_struct_fields(&sf),
            json!({
                "oneOf": [
                    { "$ref": "#/components/schemas/Cat" },
                    { "$ref": "#/components/schemas/Dog" }
                ],
                "discriminator": { "propertyName": "petType" }
            })
        );
    }

    #[test]
    fn default_value_written_from_any() {
        let mut schema = SchemaRef::inline("integer");
        schema.default = Some(Any::Number(42.into()));
        assert_eq!(write_schema_ref(&schema)["default"], json!(42));
    }
}
