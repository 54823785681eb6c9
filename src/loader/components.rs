//! The `components` section.
//!
//! Schemas lower into the spec's `defined_schemas`/`raw_schemas`; the other
//! component kinds load into [`Components`](crate::spec::Components) as
//! typed structures keyed in document order. All component keys must match
//! `[a-zA-Z0-9._-]+`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::{
    extensions, obj,
    paths::{
        load_callback, load_example_object, load_header, load_link, load_media_type_shared,
        load_parameter, load_path_item, load_request_body, load_response,
    },
    schema::{lower_component_schema, record_schema_anchors},
    security::load_security_scheme,
};
use crate::spec::{DocumentRegistry, Error, Spec};

static COMPONENT_KEY: Lazy<Regex> = Lazy::new(|| Regex::new("^[a-zA-Z0-9._-]+$").unwrap());

fn check_key(key: &str) -> Result<(), Error> {
    if COMPONENT_KEY.is_match(key) {
        Ok(())
    } else {
        Err(Error::InvalidComponentKey(key.to_owned()))
    }
}

fn section<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, Error> {
    match map.get(key) {
        Some(value) => Ok(Some(obj(value, &format!("components.{key}"))?)),
        None => Ok(None),
    }
}

pub(crate) fn load_components(
    spec: &mut Spec,
    map: &Map<String, Value>,
    registry: &DocumentRegistry,
) -> Result<(), Error> {
    if let Some(schemas) = section(map, "schemas")? {
        // Anchor pre-pass, so forward `$anchor`/`$id` references resolve
        // while lowering.
        for (name, value) in schemas {
            check_key(name)?;
            record_schema_anchors(spec, name, value);
        }
        for (name, value) in schemas {
            lower_component_schema(spec, registry, schemas, name, value)?;
            spec.schema_order.push(name.clone());
        }
    }

    if let Some(parameters) = section(map, "parameters")? {
        for (name, value) in parameters {
            check_key(name)?;
            if let Some(parameter) = load_parameter(spec, value, None, registry)? {
                spec.components.parameters.insert(name.clone(), parameter);
            }
        }
    }

    if let Some(headers) = section(map, "headers")? {
        for (name, value) in headers {
            check_key(name)?;
            if let Some(header) = load_header(spec, name, value)? {
                spec.components.headers.insert(name.clone(), header);
            }
        }
    }

    if let Some(responses) = section(map, "responses")? {
        for (name, value) in responses {
            check_key(name)?;
            let promote_base = format!("Inline_{name}_Response");
            let response = load_response(spec, name, value, &promote_base, registry)?;
            spec.components.responses.insert(name.clone(), response);
        }
    }

    if let Some(bodies) = section(map, "requestBodies")? {
        for (name, value) in bodies {
            check_key(name)?;
            let promote_base = format!("Inline_{name}_Request");
            let body = load_request_body(spec, value, &promote_base, registry)?;
            spec.components.request_bodies.insert(name.clone(), body);
        }
    }

    if let Some(media_types) = section(map, "mediaTypes")? {
        for (name, value) in media_types {
            check_key(name)?;
            let media = load_media_type_shared(spec, name, value)?;
            spec.components.media_types.insert(name.clone(), media);
        }
    }

    if let Some(examples) = section(map, "examples")? {
        for (name, value) in examples {
            check_key(name)?;
            let example = load_example_object(name, value)?;
            spec.components.examples.insert(name.clone(), example);
        }
    }

    if let Some(links) = section(map, "links")? {
        for (name, value) in links {
            check_key(name)?;
            spec.components.links.insert(name.clone(), load_link(value)?);
        }
    }

    if let Some(callbacks) = section(map, "callbacks")? {
        for (name, value) in callbacks {
            check_key(name)?;
            let callback = load_callback(spec, value, registry)?;
            spec.components.callbacks.insert(name.clone(), callback);
        }
    }

    if let Some(path_items) = section(map, "pathItems")? {
        for (name, value) in path_items {
            check_key(name)?;
            let item = load_path_item(spec, name, value, false, registry)?;
            spec.components.path_items.insert(name.clone(), item);
        }
    }

    if let Some(schemes) = section(map, "securitySchemes")? {
        for (name, value) in schemes {
            check_key(name)?;
            let scheme = load_security_scheme(name, value)?;
            spec.components.security_schemes.insert(name.clone(), scheme);
        }
    }

    spec.components.extensions = extensions(map);
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn load(components: Value) -> Result<Spec, Error> {
        let mut spec = Spec::default();
        let registry = DocumentRegistry::new();
        load_components(&mut spec, components.as_object().unwrap(), &registry)?;
        Ok(spec)
    }

    #[test]
    fn component_keys_validated() {
        let result = load(json!({ "schemas": { "bad key!": { "type": "object" } } }));
        assert_matches!(result, Err(Error::InvalidComponentKey(_)));
    }

    #[test]
    fn parameters_load_in_order() {
        let spec = load(json!({
            "parameters": {
                "limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } },
                "offset": { "name": "offset", "in": "query", "schema": { "type": "integer" } }
            }
        }))
        .unwrap();

        let names: Vec<_> = spec.components.parameters.keys().collect();
        assert_eq!(names, ["limit", "offset"]);
    }

    #[test]
    fn component_response_requires_description() {
        let result = load(json!({ "responses": { "NotFound": {} } }));
        assert_matches!(result, Err(Error::ResponseMissingDescription(_)));
    }

    #[test]
    fn security_schemes_load() {
        let spec = load(json!({
            "securitySchemes": {
                "key": { "type": "apiKey", "name": "X-Key", "in": "header" }
            }
        }))
        .unwrap();
        assert!(spec.components.security_schemes.contains_key("key"));
    }
}
