//! Inline schema promotion.
//!
//! Anonymous inline object schemas found at non-component positions
//! (request bodies, response content, content-typed parameters) are hoisted
//! into named components so the code emitter always works against named
//! composites. The inline occurrence is replaced by a reference to the
//! synthesized component.

use log::debug;
use serde_json::{Map, Value};

use super::schema::{
    is_object_shape, is_string_enum, load_schema_ref, lower_struct, lower_union,
    union_variants, unique_schema_name,
};
use crate::spec::{DocumentRegistry, Error, SchemaRef, Spec};

/// Loads a schema at a promotable position.
///
/// - An inline object (or `allOf` composition) is lowered, registered under
///   `base_name` (suffixed `_1`, `_2`, ... on collision), and replaced by a
///   reference.
/// - An inline array whose items are an inline object promotes the items
///   under `<base_name>_Item`.
/// - A `oneOf`/`anyOf` composition is promoted to a union component, with
///   inline variants promoted individually.
/// - Anything else (references, primitives, string enums) loads in place.
pub fn promote_inline_schema(
    spec: &mut Spec,
    registry: &DocumentRegistry,
    value: &Value,
    base_name: &str,
) -> Result<SchemaRef, Error> {
    let Value::Object(map) = value else {
        return load_schema_ref(value);
    };

    if map.contains_key("$ref") || map.contains_key("$dynamicRef") || is_string_enum(map) {
        return load_schema_ref(value);
    }

    if union_variants(map).is_some() {
        let name = unique_schema_name(spec, base_name);
        let variants = union_variants(map).cloned().unwrap_or_default();
        let sf = lower_union(spec, registry, &Map::new(), &name, map, &variants)?;
        spec.defined_schemas.insert(name.clone(), sf);
        debug!("promoted inline union as {name:?}");
        return Ok(named_ref(name));
    }

    if is_object_shape(map) {
        let name = unique_schema_name(spec, base_name);
        let sf = lower_struct(spec, registry, map, None)?;
        spec.defined_schemas.insert(name.clone(), sf);
        debug!("promoted inline object as {name:?}");
        return Ok(named_ref(name));
    }

    let mut schema = load_schema_ref(value)?;
    if schema.is_array {
        if let Some(items) = map.get("items") {
            if items
                .as_object()
                .is_some_and(|m| is_object_shape(m) && !m.contains_key("$ref"))
            {
                let item_ref =
                    promote_inline_schema(spec, registry, items, &format!("{base_name}_Item"))?;
                schema.items = Some(Box::new(item_ref));
            }
        }
    }
    Ok(schema)
}

fn named_ref(name: String) -> SchemaRef {
    let mut schema = SchemaRef::reference(format!("#/components/schemas/{name}"));
    schema.ref_name = Some(name);
    schema
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::spec::CompositeKind;

    #[test]
    fn inline_object_promoted_with_context_name() {
        let mut spec = Spec::default();
        let schema = promote_inline_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &json!({
                "type": "object",
                "properties": { "name": { "type": "string" } }
            }),
            "Inline_createPet_Request",
        )
        .unwrap();

        assert_eq!(schema.ref_name.as_deref(), Some("Inline_createPet_Request"));
        let sf = spec.defined_schema("Inline_createPet_Request").unwrap();
        assert_eq!(sf.fields[0].name, "name");
    }

    #[test]
    fn collision_appends_numeric_suffix() {
        let mut spec = Spec::default();
        spec.defined_schemas.insert(
            "Inline_createPet_Request".to_owned(),
            crate::spec::StructFields::new_struct(),
        );

        let schema = promote_inline_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &json!({ "type": "object", "properties": {} }),
            "Inline_createPet_Request",
        )
        .unwrap();

        assert_eq!(
            schema.ref_name.as_deref(),
            Some("Inline_createPet_Request_1")
        );
        assert!(spec.defined_schema("Inline_createPet_Request_1").is_some());
    }

    #[test]
    fn inline_array_of_objects_promotes_items() {
        let mut spec = Spec::default();
        let schema = promote_inline_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": { "id": { "type": "integer" } }
                }
            }),
            "Inline_listPets_Response_200",
        )
        .unwrap();

        assert!(schema.is_array);
        let items = schema.items.unwrap();
        assert_eq!(
            items.ref_name.as_deref(),
            Some("Inline_listPets_Response_200_Item")
        );
        assert!(spec
            .defined_schema("Inline_listPets_Response_200_Item")
            .is_some());
    }

    #[test]
    fn references_and_primitives_load_in_place() {
        let mut spec = Spec::default();
        let schema = promote_inline_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &json!({ "$ref": "#/components/schemas/Pet" }),
            "Inline_x_Request",
        )
        .unwrap();
        assert_eq!(schema.ref_name.as_deref(), Some("Pet"));
        assert!(spec.defined_schemas.is_empty());

        let schema = promote_inline_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &json!({ "type": "string" }),
            "Inline_y",
        )
        .unwrap();
        assert_eq!(schema.inline_type.as_deref(), Some("string"));
        assert!(spec.defined_schemas.is_empty());
    }

    #[test]
    fn inline_one_of_promoted_as_union() {
        let mut spec = Spec::default();
        let schema = promote_inline_schema(
            &mut spec,
            &DocumentRegistry::new(),
            &json!({
                "oneOf": [
                    { "title": "ById", "type": "object", "properties": { "id": { "type": "integer" } } },
                    { "title": "ByName", "type": "object", "properties": { "name": { "type": "string" } } }
                ]
            }),
            "Inline_search_Request",
        )
        .unwrap();

        assert_eq!(schema.ref_name.as_deref(), Some("Inline_search_Request"));
        let sf = spec.defined_schema("Inline_search_Request").unwrap();
        assert_eq!(sf.kind, CompositeKind::Union);
        assert!(spec.defined_schema("Inline_search_Request_ById").is_some());
        assert!(spec.defined_schema("Inline_search_Request_ByName").is_some());
    }
}
