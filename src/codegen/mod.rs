//! C code emission.
//!
//! Turns a loaded [`Spec`] into a C header/source pair: type definitions
//! with forward declarations for arbitrary reference cycles, JSON codecs
//! with inlined constraint validation, lifecycle helpers, an HTTP client
//! SDK, a generated test suite, and a `CMakeLists.txt`.
//!
//! Emission is two-pass: forward declarations for every composite first, so
//! mutually recursive schemas need no ordering, then definitions in
//! document order.

use std::io::{self, Write};

use derive_more::derive::{Display, Error};
use serde_json::Value;

mod build;
mod docs;
mod enums;
mod sdk;
mod structs;
mod tests_emit;
mod unions;

pub use self::build::{emit_cmake, MakeConfig};
pub use self::docs::{emit_docs_json, DocsOptions};
pub use self::tests_emit::emit_tests;

use crate::spec::{CompositeKind, SchemaRef, Spec, StructFields};

/// Code generation errors.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Write failure on the output stream.
    #[display("I/O error")]
    Io(io::Error),

    /// An unknown build-system target.
    #[display("unsupported build target: {_0}")]
    UnsupportedTarget(#[error(not(source))] String),

    /// A reference to a component that is not in the spec.
    #[display("unknown component schema: {_0}")]
    UnknownSchema(#[error(not(source))] String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// Optional guard macros wrapped around generated blocks.
///
/// When a guard is set, the corresponding blocks are wrapped in
/// `#ifdef <guard> ... #endif /* <guard> */`.
#[derive(Debug, Clone, Default)]
pub struct CodegenOptions {
    /// Guard for enum helpers (`_from_str`/`_to_str`).
    pub enum_guard: Option<String>,
    /// Guard for JSON codec functions.
    pub json_guard: Option<String>,
    /// Guard for utility functions (`_eq`, `_default`, `_deepcopy`,
    /// `_display`, `_debug`).
    pub utils_guard: Option<String>,
}

/// A component schema as the emitter sees it.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SchemaEntry<'a> {
    /// A lowered struct/enum/union composite.
    Composite(&'a StructFields),
    /// A raw schema kept as verbatim JSON (scalars, root arrays).
    Raw(&'a Value),
}

/// Schemas in original document order, promoted components last.
pub(crate) fn ordered_schemas(spec: &Spec) -> Vec<(&str, SchemaEntry<'_>)> {
    fn push<'a>(spec: &'a Spec, out: &mut Vec<(&'a str, SchemaEntry<'a>)>, name: &str) {
        if out.iter().any(|(n, _)| *n == name) {
            return;
        }
        if let Some((key, sf)) = spec.defined_schemas.get_key_value(name) {
            out.push((key.as_str(), SchemaEntry::Composite(sf)));
        } else if let Some((key, raw)) = spec.raw_schemas.get_key_value(name) {
            out.push((key.as_str(), SchemaEntry::Raw(raw)));
        }
    }

    let mut out = Vec::new();
    for name in &spec.schema_order {
        push(spec, &mut out, name);
    }
    for name in spec.defined_schemas.keys() {
        push(spec, &mut out, name);
    }
    for name in spec.raw_schemas.keys() {
        push(spec, &mut out, name);
    }
    out
}

/// The scalar C type a schema position maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CScalar<'a> {
    /// `const char *`
    Str,
    /// `int`
    Int,
    /// `long` (`format: int64`)
    Long,
    /// `double`
    Double,
    /// `int` used as boolean
    Bool,
    /// `enum <name>`
    Enum(&'a str),
    /// `struct <name> *` (objects and unions)
    Struct(&'a str),
    /// Opaque JSON fragment carried as `char *`
    Json,
}

/// Scalar or array-of-scalar shape for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CShape<'a> {
    /// A single value.
    Scalar(CScalar<'a>),
    /// A counted array: `size_t n_<f>;` plus a pointer member.
    Array(CScalar<'a>),
}

fn scalar_for_type<'a>(ty: &str, format: Option<&str>) -> CScalar<'a> {
    match ty {
        "string" => CScalar::Str,
        "integer" => {
            if format == Some("int64") {
                CScalar::Long
            } else {
                CScalar::Int
            }
        }
        "number" => CScalar::Double,
        "boolean" => CScalar::Bool,
        _ => CScalar::Json,
    }
}

fn scalar_for_ref<'a>(spec: &'a Spec, name: &'a str) -> CScalar<'a> {
    if let Some(sf) = spec.defined_schemas.get(name) {
        return match sf.kind {
            CompositeKind::Enum => CScalar::Enum(name),
            CompositeKind::Struct | CompositeKind::Union => CScalar::Struct(name),
        };
    }
    if let Some(raw) = spec.raw_schemas.get(name) {
        let ty = raw.get("type").and_then(Value::as_str).unwrap_or("");
        let format = raw.get("format").and_then(Value::as_str);
        return scalar_for_type(ty, format);
    }
    CScalar::Json
}

fn primary_type(schema: &SchemaRef) -> Option<&str> {
    if let Some(ty) = schema.inline_type.as_deref() {
        return Some(ty);
    }
    schema
        .type_union
        .iter()
        .map(String::as_str)
        .find(|t| *t != "null")
}

/// Resolves the C shape of a schema position.
pub(crate) fn resolve_shape<'a>(spec: &'a Spec, schema: &'a SchemaRef) -> CShape<'a> {
    if schema.is_array {
        let item = match &schema.items {
            Some(items) => resolve_scalar(spec, items),
            None => CScalar::Json,
        };
        return CShape::Array(item);
    }
    CShape::Scalar(resolve_scalar(spec, schema))
}

fn resolve_scalar<'a>(spec: &'a Spec, schema: &'a SchemaRef) -> CScalar<'a> {
    if let Some(name) = schema.ref_name.as_deref() {
        return scalar_for_ref(spec, name);
    }
    match primary_type(schema) {
        Some(ty) => scalar_for_type(ty, schema.format.as_deref()),
        None => CScalar::Json,
    }
}

impl CScalar<'_> {
    /// The declaration type for a single value member.
    pub(crate) fn member_decl(&self) -> String {
        match self {
            CScalar::Str => "const char *".to_owned(),
            CScalar::Int | CScalar::Bool => "int ".to_owned(),
            CScalar::Long => "long ".to_owned(),
            CScalar::Double => "double ".to_owned(),
            CScalar::Enum(name) => format!("enum {name} "),
            CScalar::Struct(name) => format!("struct {name} *"),
            CScalar::Json => "char *".to_owned(),
        }
    }

    /// The element pointer type for a counted array member.
    pub(crate) fn array_decl(&self) -> String {
        match self {
            CScalar::Str | CScalar::Json => "char **".to_owned(),
            CScalar::Int | CScalar::Bool => "int *".to_owned(),
            CScalar::Long => "long *".to_owned(),
            CScalar::Double => "double *".to_owned(),
            CScalar::Enum(name) => format!("enum {name} *"),
            CScalar::Struct(name) => format!("struct {name} **"),
        }
    }
}

/// Makes a valid C identifier out of an arbitrary schema/member name.
pub(crate) fn c_ident(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

pub(crate) fn open_guard(out: &mut dyn Write, guard: Option<&str>) -> io::Result<()> {
    if let Some(guard) = guard {
        writeln!(out, "#ifdef {guard}")?;
    }
    Ok(())
}

pub(crate) fn close_guard(out: &mut dyn Write, guard: Option<&str>) -> io::Result<()> {
    if let Some(guard) = guard {
        writeln!(out, "#endif /* {guard} */")?;
    }
    Ok(())
}

/// Root arrays: raw component schemas whose root `type` is `array`.
pub(crate) fn root_array_item<'a>(raw: &'a Value) -> Option<(&'a str, Option<&'a str>)> {
    if raw.get("type").and_then(Value::as_str) != Some("array") {
        return None;
    }
    let items = raw.get("items")?;
    if let Some(reference) = items.get("$ref").and_then(Value::as_str) {
        let name = reference.rsplit('/').next().unwrap_or(reference);
        return Some(("object", Some(name)));
    }
    let ty = items.get("type").and_then(Value::as_str).unwrap_or("string");
    Some((ty, None))
}

/// Emits the public header: forward declarations, type definitions, and
/// prototypes for every component plus the client SDK.
pub fn emit_header(
    spec: &Spec,
    basename: &str,
    opts: &CodegenOptions,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let guard = format!("{}_H", c_ident(basename).to_ascii_uppercase());
    let schemas = ordered_schemas(spec);

    writeln!(out, "/* Generated by oasc. Do not edit. */")?;
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include <stddef.h>")?;
    writeln!(out, "#include <stdio.h>")?;
    writeln!(out)?;
    writeln!(out, "#include <parson.h>")?;
    writeln!(out)?;
    writeln!(out, "#ifdef __cplusplus")?;
    writeln!(out, "extern \"C\" {{")?;
    writeln!(out, "#endif /* __cplusplus */")?;
    writeln!(out)?;
    writeln!(
        out,
        "/* Patterns outside the literal subset delegate to the runtime matcher. */"
    )?;
    writeln!(
        out,
        "extern int oasc_regex_match(const char *pattern, const char *subject);"
    )?;
    writeln!(out)?;

    // Pass 1: forward declarations. Any pair of mutually referencing
    // schemas compiles regardless of definition order.
    let mut forwarded = false;
    for (name, entry) in &schemas {
        if let SchemaEntry::Composite(sf) = entry {
            if matches!(sf.kind, CompositeKind::Struct | CompositeKind::Union) {
                writeln!(out, "struct {};", c_ident(name))?;
                forwarded = true;
            }
        }
    }
    if forwarded {
        writeln!(out)?;
    }

    // Pass 2: definitions and prototypes, in document order.
    for (name, entry) in &schemas {
        let name = c_ident(name);
        match entry {
            SchemaEntry::Composite(sf) => match sf.kind {
                CompositeKind::Enum => enums::write_enum_header(out, &name, sf, opts)?,
                CompositeKind::Union => unions::write_union_header(spec, out, &name, sf, opts)?,
                CompositeKind::Struct => structs::write_struct_header(spec, out, &name, sf, opts)?,
            },
            SchemaEntry::Raw(raw) => {
                if let Some((item_type, item_ref)) = root_array_item(raw) {
                    structs::write_root_array_header(out, &name, item_type, item_ref, opts)?;
                }
            }
        }
    }

    sdk::write_sdk_header(spec, out)?;

    writeln!(out, "#ifdef __cplusplus")?;
    writeln!(out, "}}")?;
    writeln!(out, "#endif /* __cplusplus */")?;
    writeln!(out)?;
    writeln!(out, "#endif /* {guard} */")?;
    Ok(())
}

/// Emits the implementation file for [`emit_header`]'s declarations.
pub fn emit_source(
    spec: &Spec,
    basename: &str,
    opts: &CodegenOptions,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let schemas = ordered_schemas(spec);

    writeln!(out, "/* Generated by oasc. Do not edit. */")?;
    writeln!(out, "#include <errno.h>")?;
    writeln!(out, "#include <stdlib.h>")?;
    writeln!(out, "#include <string.h>")?;
    writeln!(out)?;
    writeln!(out, "#include \"{basename}.h\"")?;
    writeln!(out)?;
    writeln!(out, "#ifdef _MSC_VER")?;
    writeln!(out, "#define oasc_strdup _strdup")?;
    writeln!(out, "#else")?;
    writeln!(out, "#define oasc_strdup strdup")?;
    writeln!(out, "#endif /* _MSC_VER */")?;
    writeln!(out)?;

    for (name, entry) in &schemas {
        let name = c_ident(name);
        match entry {
            SchemaEntry::Composite(sf) => match sf.kind {
                CompositeKind::Enum => enums::write_enum_source(out, &name, sf, opts)?,
                CompositeKind::Union => unions::write_union_source(spec, out, &name, sf, opts)?,
                CompositeKind::Struct => structs::write_struct_source(spec, out, &name, sf, opts)?,
            },
            SchemaEntry::Raw(raw) => {
                if let Some((item_type, item_ref)) = root_array_item(raw) {
                    structs::write_root_array_source(out, &name, item_type, item_ref, opts)?;
                }
            }
        }
    }

    sdk::write_sdk_source(spec, basename, out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::spec::DocumentRegistry;

    pub(crate) fn load(doc: serde_json::Value) -> Spec {
        let mut registry = DocumentRegistry::new();
        crate::loader::load_spec(&doc, None, &mut registry).unwrap()
    }

    pub(crate) fn header_for(doc: serde_json::Value) -> String {
        let spec = load(doc);
        let mut out = Vec::new();
        emit_header(&spec, "client", &CodegenOptions::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    pub(crate) fn source_for(doc: serde_json::Value) -> String {
        let spec = load(doc);
        let mut out = Vec::new();
        emit_source(&spec, "client", &CodegenOptions::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn components(schemas: serde_json::Value) -> serde_json::Value {
        json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "components": { "schemas": schemas }
        })
    }

    #[test]
    fn cyclic_schemas_get_forward_declarations() {
        let header = header_for(components(json!({
            "A": {
                "type": "object",
                "properties": { "b": { "$ref": "#/components/schemas/B" } }
            },
            "B": {
                "type": "object",
                "properties": { "a": { "$ref": "#/components/schemas/A" } }
            }
        })));

        let fwd_a = header.find("struct A;").expect("forward decl for A");
        let fwd_b = header.find("struct B;").expect("forward decl for B");
        let def_a = header.find("struct A {").expect("definition for A");
        let def_b = header.find("struct B {").expect("definition for B");
        assert!(fwd_a < def_a && fwd_a < def_b);
        assert!(fwd_b < def_a && fwd_b < def_b);
    }

    #[test]
    fn emission_is_deterministic() {
        let doc = components(json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "name": { "type": "string" }
                }
            }
        }));
        assert_eq!(header_for(doc.clone()), header_for(doc.clone()));
        assert_eq!(source_for(doc.clone()), source_for(doc));
    }

    #[test]
    fn field_type_mapping() {
        let header = header_for(components(json!({
            "Mixed": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "id": { "type": "integer", "format": "int64" },
                    "count": { "type": "integer" },
                    "ratio": { "type": "number" },
                    "ok": { "type": "boolean" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "pets": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/Pet" }
                    },
                    "owner": { "$ref": "#/components/schemas/Pet" }
                }
            },
            "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
        })));

        assert!(header.contains("const char *name;"));
        assert!(header.contains("long id;"));
        assert!(header.contains("int count;"));
        assert!(header.contains("double ratio;"));
        assert!(header.contains("int ok;"));
        assert!(header.contains("size_t n_tags;"));
        assert!(header.contains("char **tags;"));
        assert!(header.contains("size_t n_pets;"));
        assert!(header.contains("struct Pet **pets;"));
        assert!(header.contains("struct Pet *owner;"));
    }

    #[test]
    fn root_array_component_gets_array_functions() {
        let header = header_for(components(json!({
            "PetList": {
                "type": "array",
                "items": { "$ref": "#/components/schemas/Pet" }
            },
            "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
        })));

        assert!(header
            .contains("int PetList_from_json(const char *json, struct Pet ***out, size_t *len);"));
        assert!(header.contains(
            "int PetList_to_json(struct Pet *const *items, size_t len, char **json_out);"
        ));
        assert!(header.contains("void PetList_cleanup(struct Pet **items, size_t len);"));
    }

    #[test]
    fn guard_macros_wrap_blocks() {
        let spec = load(components(json!({
            "Color": { "type": "string", "enum": ["RED", "GREEN"] }
        })));
        let opts = CodegenOptions {
            enum_guard: Some("ENABLE_ENUMS".to_owned()),
            ..CodegenOptions::default()
        };
        let mut out = Vec::new();
        emit_source(&spec, "client", &opts, &mut out).unwrap();
        let source = String::from_utf8(out).unwrap();

        assert!(source.contains("#ifdef ENABLE_ENUMS"));
        assert!(source.contains("#endif /* ENABLE_ENUMS */"));
    }

    #[test]
    fn c_identifiers_sanitized() {
        assert_eq!(c_ident("Pet"), "Pet");
        assert_eq!(c_ident("my-schema.v2"), "my_schema_v2");
        assert_eq!(c_ident("2fast"), "_2fast");
    }
}
