//! C header declarations to JSON Schema.
//!
//! Walks `struct` and `enum` declarations in a header and lowers each to a
//! component schema. Member lines map per the same table the code emitter
//! uses in the other direction: `const char *` is a string, `long` an
//! `int64` integer, `struct X *` a `$ref`, a pointer with a `size_t n_<f>`
//! sibling (or a flexible array member) an array, and `char name[N]` a
//! string with `maxLength`.

use serde_json::{json, Map, Value};

use super::Error;

/// A top-level declaration extracted from a header.
#[derive(Debug, Clone, PartialEq)]
pub enum CDecl {
    /// `struct <name> { ... };`
    Struct {
        /// Type name.
        name: String,
        /// Parsed members in declaration order.
        fields: Vec<CField>,
    },
    /// `enum <name> { ... };`
    Enum {
        /// Type name.
        name: String,
        /// Member names in declaration order (initializer values dropped).
        members: Vec<String>,
    },
}

/// One parsed struct member.
#[derive(Debug, Clone, PartialEq)]
pub struct CField {
    /// Member name.
    pub name: String,
    /// Logical schema type: `string`, `integer`, `number`, `boolean`,
    /// `array`, or `object`.
    pub ty: String,
    /// Schema `format` hint (`int64`, `float`), when the C type implies one.
    pub format: Option<String>,
    /// Referenced `struct`/`enum` type name, for `$ref` lowering.
    pub ref_name: Option<String>,
    /// Bit-field width, kept verbatim.
    pub bit_width: Option<String>,
    /// Array item type/format/ref for flexible or counted arrays.
    pub items: Option<Box<CField>>,
    /// `char name[N]` capacity, lowered to `maxLength`.
    pub max_length: Option<u64>,
}

impl CField {
    fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            format: None,
            ref_name: None,
            bit_width: None,
            items: None,
            max_length: None,
        }
    }
}

fn strip_comment(line: &str) -> &str {
    let line = line.split("//").next().unwrap_or(line);
    line.split("/*").next().unwrap_or(line)
}

/// Maps a C base type (tokens before the declarator) to a logical schema
/// type plus optional format/ref.
fn map_base_type(tokens: &[&str]) -> Option<(String, Option<String>, Option<String>)> {
    match tokens {
        ["const", "char"] | ["char"] => Some(("string".into(), None, None)),
        ["bool"] | ["_Bool"] => Some(("boolean".into(), None, None)),
        ["double"] => Some(("number".into(), None, None)),
        ["float"] => Some(("number".into(), Some("float".into()), None)),
        ["int"] | ["short"] | ["unsigned", "int"] | ["unsigned"] | ["signed", "int"] => {
            Some(("integer".into(), None, None))
        }
        ["long"] | ["long", "long"] | ["unsigned", "long"] | ["long", "int"] | ["int64_t"] => {
            Some(("integer".into(), Some("int64".into()), None))
        }
        ["size_t"] | ["int32_t"] | ["uint32_t"] => Some(("integer".into(), None, None)),
        ["struct", name] | ["const", "struct", name] => {
            Some(("object".into(), None, Some((*name).to_owned())))
        }
        ["enum", name] | ["const", "enum", name] => {
            Some(("string".into(), None, Some((*name).to_owned())))
        }
        _ => None,
    }
}

/// Parses one struct member line (`int x : 3;`, `const char *foo;`,
/// `long ids[];`, ...). Lines that do not look like members are skipped by
/// returning `None`.
pub(crate) fn parse_member_line(line: &str) -> Result<Option<CField>, Error> {
    let line = strip_comment(line).trim();
    let Some(line) = line.strip_suffix(';') else {
        return Ok(None);
    };
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    // Bit-field: `<type> <name> : <width>`.
    let (decl, bit_width) = match line.split_once(':') {
        Some((decl, width)) => (decl.trim(), Some(width.trim().to_owned())),
        None => (line, None),
    };

    // Split pointer stars and array suffix off the declarator.
    let mut words: Vec<&str> = decl
        .split_whitespace()
        .flat_map(|w| {
            // keep `*` as its own word so `struct Point * p` and
            // `struct Point *p` parse alike
            let mut parts = Vec::new();
            let mut rest = w;
            while let Some(stripped) = rest.strip_prefix('*') {
                parts.push("*");
                rest = stripped;
            }
            if !rest.is_empty() {
                if let Some(stem) = rest.strip_suffix('*') {
                    parts.push(stem);
                    parts.push("*");
                } else {
                    parts.push(rest);
                }
            }
            parts
        })
        .collect();

    if words.len() < 2 {
        return Ok(None);
    }

    let mut declarator = words.pop().unwrap_or_default().to_owned();
    let mut is_flexible_array = false;
    let mut fixed_len: Option<u64> = None;
    if let Some(open) = declarator.find('[') {
        let inner = declarator[open + 1..].trim_end_matches(']').trim();
        if inner.is_empty() {
            is_flexible_array = true;
        } else {
            fixed_len = inner.parse().ok();
            if fixed_len.is_none() {
                return Err(Error::MalformedDecl(line.to_owned()));
            }
        }
        declarator.truncate(open);
    }

    let mut pointer_depth = 0usize;
    while words.last() == Some(&"*") {
        words.pop();
        pointer_depth += 1;
    }

    let Some((ty, format, ref_name)) = map_base_type(&words) else {
        return Ok(None);
    };

    let name = declarator;
    if name.is_empty() {
        return Err(Error::MalformedDecl(line.to_owned()));
    }

    let mut field = CField::new(name, ty.clone());
    field.format = format.clone();
    field.ref_name = ref_name.clone();
    field.bit_width = bit_width;

    // `char buf[32]` is a bounded string, not an array.
    if let Some(len) = fixed_len {
        if ty == "string" && ref_name.is_none() {
            field.max_length = Some(len);
            return Ok(Some(field));
        }
    }

    // A flexible array member (or a double pointer) is an array of the base
    // type; the element metadata moves into `items`.
    if is_flexible_array || fixed_len.is_some() || pointer_depth >= 2 {
        let mut item = CField::new("", ty);
        item.format = format;
        item.ref_name = ref_name;
        field.ty = "array".into();
        field.format = None;
        field.ref_name = None;
        field.items = Some(Box::new(item));
    }

    Ok(Some(field))
}

fn field_schema(field: &CField) -> Value {
    if let Some(ref_name) = &field.ref_name {
        return json!({ "$ref": format!("#/components/schemas/{ref_name}") });
    }
    let mut obj = Map::new();
    obj.insert("type".into(), json!(field.ty));
    if let Some(format) = &field.format {
        obj.insert("format".into(), json!(format));
    }
    if let Some(max_length) = field.max_length {
        obj.insert("maxLength".into(), json!(max_length));
    }
    if let Some(items) = &field.items {
        obj.insert("items".into(), field_schema(items));
    }
    Value::Object(obj)
}

/// Parses header text into top-level `struct`/`enum` declarations.
pub(crate) fn parse_header(src: &str) -> Result<Vec<CDecl>, Error> {
    let mut decls = Vec::new();
    let mut lines = src.lines();

    // Declarations may put `{ ... };` on one line or span several; collect
    // until the closing brace either way.
    while let Some(line) = lines.next() {
        let line = strip_comment(line).trim();
        let Some((keyword, rest)) = line
            .strip_prefix("struct ")
            .map(|r| ("struct", r))
            .or_else(|| line.strip_prefix("enum ").map(|r| ("enum", r)))
        else {
            continue;
        };

        let Some((name, _)) = rest.split_once(|c: char| c.is_whitespace() || c == '{') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let mut decl_text = line.to_owned();
        if !decl_text.contains('{') && decl_text.contains(';') {
            // forward declaration (`struct X;`) or a prototype
            continue;
        }
        while !decl_text.contains('}') {
            let Some(next) = lines.next() else {
                return Err(Error::Unterminated("declaration"));
            };
            decl_text.push('\n');
            decl_text.push_str(strip_comment(next));
        }
        let Some(open) = decl_text.find('{') else {
            continue;
        };
        let body = &decl_text[open + 1..];
        let body = &body[..body.find('}').unwrap_or(body.len())];

        match keyword {
            "enum" => {
                let members = body
                    .split(',')
                    .map(|m| m.split('=').next().unwrap_or("").trim())
                    .filter(|m| !m.is_empty())
                    .map(str::to_owned)
                    .collect();
                decls.push(CDecl::Enum {
                    name: name.to_owned(),
                    members,
                });
            }
            _ => {
                let mut fields = Vec::new();
                for member in body.split('\n').flat_map(|l| l.split_inclusive(';')) {
                    if let Some(field) = parse_member_line(member)? {
                        fields.push(field);
                    }
                }
                decls.push(CDecl::Struct {
                    name: name.to_owned(),
                    fields,
                });
            }
        }
    }

    Ok(decls)
}

/// Converts C header text into a JSON Schema document.
///
/// The result is a `components/schemas` container holding one schema per
/// declaration, in declaration order.
pub fn header_to_schema(src: &str) -> Result<Value, Error> {
    let decls = parse_header(src)?;
    let mut schemas = Map::new();

    for decl in &decls {
        match decl {
            CDecl::Enum { name, members } => {
                schemas.insert(
                    name.clone(),
                    json!({ "type": "string", "enum": members }),
                );
            }
            CDecl::Struct { name, fields } => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in fields {
                    properties.insert(field.name.clone(), field_schema(field));
                    if field.ref_name.is_none() && field.ty != "array" {
                        required.push(json!(field.name));
                    }
                }
                let mut schema = Map::new();
                schema.insert("type".into(), json!("object"));
                schema.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    schema.insert("required".into(), Value::Array(required));
                }
                schemas.insert(name.clone(), Value::Object(schema));
            }
        }
    }

    Ok(json!({ "components": { "schemas": schemas } }))
}
