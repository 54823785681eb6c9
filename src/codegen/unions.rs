//! Tagged union generation for `oneOf`/`anyOf` composites.
//!
//! A union `Pet = oneOf[Cat, Dog]` emits a companion tag enum and a wrapper
//! struct holding the active variant:
//!
//! ```c
//! enum Pet_tag { Pet_UNKNOWN = 0, Pet_Cat, Pet_Dog };
//! struct Pet { enum Pet_tag tag; union { struct Cat *Cat; struct Dog *Dog; } data; };
//! ```
//!
//! `_from_jsonObject` dispatches on the discriminator when one is declared.
//! Without one it falls back to a deterministic shape match: the first
//! variant (in document order) whose required properties are all present
//! wins; a variant without required properties matches on its first
//! property. Array-shaped variants carry the same counted-array shape as
//! struct fields (`{ size_t n_<v>; T *<v>; } <v>`); untyped variants are
//! serialized JSON fragments.

use std::io::Write;

use super::{
    c_ident, close_guard, open_guard, resolve_shape, CScalar, CShape, CodegenOptions, Error,
};
use crate::codegen::structs::c_escape;
use crate::spec::{CompositeKind, Field, Spec, StructFields};

/// How a variant is stored and parsed.
enum VariantKind<'a> {
    Object(&'a str),
    Enum(&'a str),
    Str,
    Int,
    Long,
    Double,
    Bool,
    /// Counted array: `{ size_t n_<v>; T *<v>; } <v>`.
    Array(CScalar<'a>),
    /// Untyped variants: serialized JSON fragment.
    Json,
}

fn variant_kind<'a>(spec: &'a Spec, field: &'a Field) -> VariantKind<'a> {
    match resolve_shape(spec, &field.schema) {
        CShape::Scalar(CScalar::Struct(name)) => VariantKind::Object(name),
        CShape::Scalar(CScalar::Enum(name)) => VariantKind::Enum(name),
        CShape::Scalar(CScalar::Str) => VariantKind::Str,
        CShape::Scalar(CScalar::Int) => VariantKind::Int,
        CShape::Scalar(CScalar::Long) => VariantKind::Long,
        CShape::Scalar(CScalar::Double) => VariantKind::Double,
        CShape::Scalar(CScalar::Bool) => VariantKind::Bool,
        CShape::Array(item) => VariantKind::Array(item),
        CShape::Scalar(CScalar::Json) => VariantKind::Json,
    }
}

fn member_decl(kind: &VariantKind<'_>, vname: &str) -> String {
    match kind {
        VariantKind::Object(target) => format!("struct {target} *{vname};"),
        VariantKind::Enum(target) => format!("enum {target} {vname};"),
        VariantKind::Str => format!("const char *{vname};"),
        VariantKind::Int | VariantKind::Bool => format!("int {vname};"),
        VariantKind::Long => format!("long {vname};"),
        VariantKind::Double => format!("double {vname};"),
        VariantKind::Array(item) => format!(
            "struct {{ size_t n_{vname}; {}{vname}; }} {vname};",
            item.array_decl()
        ),
        VariantKind::Json => format!("char *{vname};"),
    }
}

/// Emits the tag enum, the wrapper struct, and prototypes.
pub(crate) fn write_union_header(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    writeln!(out, "enum {name}_tag {{")?;
    write!(out, "  {name}_UNKNOWN = 0")?;
    for field in &sf.fields {
        write!(out, ",\n  {name}_{}", c_ident(&field.name))?;
    }
    writeln!(out, "\n}};")?;
    writeln!(out)?;

    writeln!(out, "struct {name} {{")?;
    writeln!(out, "  enum {name}_tag tag;")?;
    writeln!(out, "  union {{")?;
    for field in &sf.fields {
        let vname = c_ident(&field.name);
        writeln!(out, "    {}", member_decl(&variant_kind(spec, field), &vname))?;
    }
    writeln!(out, "  }} data;")?;
    writeln!(out, "}};")?;
    writeln!(out)?;

    open_guard(out, opts.json_guard.as_deref())?;
    writeln!(
        out,
        "extern int {name}_from_json(const char *json, struct {name} **out);"
    )?;
    writeln!(
        out,
        "extern int {name}_from_jsonObject(const JSON_Object *jobj, struct {name} **out);"
    )?;
    writeln!(
        out,
        "extern int {name}_to_json(const struct {name} *obj, char **json_out);"
    )?;
    close_guard(out, opts.json_guard.as_deref())?;
    writeln!(out, "extern void {name}_cleanup(struct {name} *obj);")?;
    writeln!(out)?;
    Ok(())
}

/// Emits the JSON codec and cleanup implementations.
pub(crate) fn write_union_source(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    open_guard(out, opts.json_guard.as_deref())?;
    write_from_json_object(spec, out, name, sf)?;
    write_from_json(spec, out, name, sf)?;
    write_to_json(spec, out, name, sf)?;
    close_guard(out, opts.json_guard.as_deref())?;
    write_cleanup(spec, out, name, sf)?;
    writeln!(out)?;
    Ok(())
}

/// The parse-into-variant block used by both dispatch strategies.
fn write_object_variant_parse(
    out: &mut dyn Write,
    name: &str,
    target: &str,
    vname: &str,
    indent: &str,
) -> Result<(), Error> {
    writeln!(out, "{indent}{{")?;
    writeln!(
        out,
        "{indent}  const int rc = {target}_from_jsonObject(jobj, &obj->data.{vname});"
    )?;
    writeln!(
        out,
        "{indent}  if (rc != 0) {{ {name}_cleanup(obj); return rc; }}"
    )?;
    writeln!(out, "{indent}  obj->tag = {name}_{vname};")?;
    writeln!(out, "{indent}}}")?;
    Ok(())
}

/// Names a discriminator value can select a variant by: explicit mapping
/// entries first, then the variant's own schema name.
fn discriminator_values<'a>(sf: &'a StructFields, field: &'a Field) -> Vec<&'a str> {
    let mut values = Vec::new();
    let target = field
        .schema
        .ref_name
        .as_deref()
        .unwrap_or(field.name.as_str());

    if let Some(discriminator) = &sf.discriminator {
        for (value, mapped) in &discriminator.mapping {
            let mapped_name = mapped.rsplit('/').next().unwrap_or(mapped);
            if mapped_name == target {
                values.push(value.as_str());
            }
        }
    }
    values.push(target);
    values
}

fn write_from_json_object(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
) -> Result<(), Error> {
    writeln!(
        out,
        "int {name}_from_jsonObject(const JSON_Object *jobj, struct {name} **out) {{"
    )?;
    writeln!(out, "  struct {name} *obj;")?;
    writeln!(out, "  if (jobj == NULL || out == NULL) return EINVAL;")?;
    writeln!(out, "  obj = (struct {name} *)calloc(1, sizeof(*obj));")?;
    writeln!(out, "  if (obj == NULL) return ENOMEM;")?;

    if let Some(discriminator) = &sf.discriminator {
        let property = c_escape(&discriminator.property_name);
        writeln!(out, "  {{")?;
        writeln!(
            out,
            "    const char *d = json_object_get_string(jobj, \"{property}\");"
        )?;
        writeln!(out, "    if (d != NULL) {{")?;
        let mut first = true;
        for field in &sf.fields {
            let VariantKind::Object(target) = variant_kind(spec, field) else {
                continue;
            };
            let vname = c_ident(&field.name);
            let checks: Vec<String> = discriminator_values(sf, field)
                .iter()
                .map(|v| format!("strcmp(d, \"{}\") == 0", c_escape(v)))
                .collect();
            let prefix = if first { "if" } else { "else if" };
            first = false;
            writeln!(out, "      {prefix} ({})", checks.join(" || "))?;
            write_object_variant_parse(out, name, target, &vname, "      ")?;
        }
        if let Some(default_target) = &discriminator.default_mapping {
            let default_name = default_target.rsplit('/').next().unwrap_or(default_target);
            if let Some(field) = sf.fields.iter().find(|f| {
                f.schema.ref_name.as_deref() == Some(default_name) || f.name == default_name
            }) {
                if let VariantKind::Object(target) = variant_kind(spec, field) {
                    let vname = c_ident(&field.name);
                    writeln!(out, "      else")?;
                    write_object_variant_parse(out, name, target, &vname, "      ")?;
                }
            }
        }
        writeln!(out, "    }}")?;
        writeln!(out, "  }}")?;
    }

    // Deterministic shape match when no discriminator decided: first
    // variant whose required properties are all present.
    writeln!(out, "  if (obj->tag == {name}_UNKNOWN) {{")?;
    let mut first = true;
    for field in &sf.fields {
        let VariantKind::Object(target) = variant_kind(spec, field) else {
            continue;
        };
        let vname = c_ident(&field.name);
        let condition = shape_match_condition(spec, target);
        let prefix = if first { "if" } else { "else if" };
        first = false;
        writeln!(out, "    {prefix} ({condition})")?;
        write_object_variant_parse(out, name, target, &vname, "    ")?;
    }
    if first {
        writeln!(out, "    ;")?;
    }
    writeln!(out, "  }}")?;

    writeln!(
        out,
        "  if (obj->tag == {name}_UNKNOWN) {{ {name}_cleanup(obj); return EINVAL; }}"
    )?;
    writeln!(out, "  *out = obj;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

/// Presence condition for the shape match: all required properties, or the
/// first property when nothing is required, or everything when the variant
/// declares no members at all.
fn shape_match_condition(spec: &Spec, target: &str) -> String {
    let Some(target_sf) = spec.defined_schemas.get(target) else {
        return "1".to_owned();
    };
    if target_sf.kind != CompositeKind::Struct {
        return "1".to_owned();
    }

    let required = target_sf.required_names();
    let probe: Vec<&str> = if !required.is_empty() {
        required
    } else if let Some(field) = target_sf.fields.first() {
        vec![field.name.as_str()]
    } else {
        return "1".to_owned();
    };

    probe
        .iter()
        .map(|prop| format!("json_object_has_value(jobj, \"{}\")", c_escape(prop)))
        .collect::<Vec<_>>()
        .join(" && ")
}

fn write_from_json(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
) -> Result<(), Error> {
    writeln!(
        out,
        "int {name}_from_json(const char *json, struct {name} **out) {{"
    )?;
    writeln!(out, "  JSON_Value *root;")?;
    writeln!(out, "  int rc = EINVAL;")?;
    writeln!(out, "  if (json == NULL || out == NULL) return EINVAL;")?;
    writeln!(out, "  root = json_parse_string(json);")?;
    writeln!(out, "  if (root == NULL) return EINVAL;")?;
    writeln!(out, "  if (json_value_get_type(root) == JSONObject) {{")?;
    writeln!(
        out,
        "    rc = {name}_from_jsonObject(json_value_get_object(root), out);"
    )?;
    writeln!(out, "  }}")?;

    // Primitive variants accept non-object payloads.
    for field in &sf.fields {
        let vname = c_ident(&field.name);
        match variant_kind(spec, field) {
            VariantKind::Str => {
                writeln!(out, "  else if (json_value_get_type(root) == JSONString) {{")?;
                write_primitive_alloc(out, name, &vname, "oasc_strdup(json_value_get_string(root))")?;
                writeln!(out, "  }}")?;
            }
            VariantKind::Int => {
                writeln!(out, "  else if (json_value_get_type(root) == JSONNumber) {{")?;
                write_primitive_set(
                    out,
                    name,
                    &vname,
                    "(int)json_value_get_number(root)",
                )?;
                writeln!(out, "  }}")?;
            }
            VariantKind::Long => {
                writeln!(out, "  else if (json_value_get_type(root) == JSONNumber) {{")?;
                write_primitive_set(
                    out,
                    name,
                    &vname,
                    "(long)json_value_get_number(root)",
                )?;
                writeln!(out, "  }}")?;
            }
            VariantKind::Double => {
                writeln!(out, "  else if (json_value_get_type(root) == JSONNumber) {{")?;
                write_primitive_set(out, name, &vname, "json_value_get_number(root)")?;
                writeln!(out, "  }}")?;
            }
            VariantKind::Bool => {
                writeln!(out, "  else if (json_value_get_type(root) == JSONBoolean) {{")?;
                write_primitive_set(out, name, &vname, "json_value_get_boolean(root)")?;
                writeln!(out, "  }}")?;
            }
            VariantKind::Array(item) => {
                writeln!(out, "  else if (json_value_get_type(root) == JSONArray) {{")?;
                writeln!(out, "    const JSON_Array *arr = json_value_get_array(root);")?;
                writeln!(out, "    const size_t n = json_array_get_count(arr);")?;
                writeln!(out, "    size_t i;")?;
                writeln!(
                    out,
                    "    struct {name} *obj = (struct {name} *)calloc(1, sizeof(*obj));"
                )?;
                writeln!(
                    out,
                    "    if (obj == NULL) {{ json_value_free(root); return ENOMEM; }}"
                )?;
                writeln!(
                    out,
                    "    obj->data.{vname}.{vname} = ({})calloc(n ? n : 1, sizeof(*obj->data.{vname}.{vname}));",
                    item.array_decl()
                )?;
                writeln!(
                    out,
                    "    if (obj->data.{vname}.{vname} == NULL) {{ free(obj); json_value_free(root); return ENOMEM; }}"
                )?;
                writeln!(out, "    obj->data.{vname}.n_{vname} = n;")?;
                writeln!(out, "    obj->tag = {name}_{vname};")?;
                writeln!(out, "    for (i = 0; i < n; ++i) {{")?;
                match item {
                    CScalar::Str | CScalar::Json => {
                        writeln!(
                            out,
                            "      const char *s = json_array_get_string(arr, i);"
                        )?;
                        writeln!(out, "      if (s != NULL) {{")?;
                        writeln!(
                            out,
                            "        obj->data.{vname}.{vname}[i] = oasc_strdup(s);"
                        )?;
                        writeln!(
                            out,
                            "        if (obj->data.{vname}.{vname}[i] == NULL) {{ {name}_cleanup(obj); json_value_free(root); return ENOMEM; }}"
                        )?;
                        writeln!(out, "      }}")?;
                    }
                    CScalar::Int => writeln!(
                        out,
                        "      obj->data.{vname}.{vname}[i] = (int)json_array_get_number(arr, i);"
                    )?,
                    CScalar::Long => writeln!(
                        out,
                        "      obj->data.{vname}.{vname}[i] = (long)json_array_get_number(arr, i);"
                    )?,
                    CScalar::Double => writeln!(
                        out,
                        "      obj->data.{vname}.{vname}[i] = json_array_get_number(arr, i);"
                    )?,
                    CScalar::Bool => writeln!(
                        out,
                        "      obj->data.{vname}.{vname}[i] = json_array_get_boolean(arr, i);"
                    )?,
                    CScalar::Enum(target) => writeln!(
                        out,
                        "      (void){target}_from_str(json_array_get_string(arr, i), &obj->data.{vname}.{vname}[i]);"
                    )?,
                    CScalar::Struct(target) => {
                        writeln!(
                            out,
                            "      const JSON_Object *sub = json_array_get_object(arr, i);"
                        )?;
                        writeln!(out, "      if (sub != NULL) {{")?;
                        writeln!(
                            out,
                            "        const int item_rc = {target}_from_jsonObject(sub, &obj->data.{vname}.{vname}[i]);"
                        )?;
                        writeln!(
                            out,
                            "        if (item_rc != 0) {{ {name}_cleanup(obj); json_value_free(root); return item_rc; }}"
                        )?;
                        writeln!(out, "      }}")?;
                    }
                }
                writeln!(out, "    }}")?;
                writeln!(out, "    *out = obj;")?;
                writeln!(out, "    rc = 0;")?;
                writeln!(out, "  }}")?;
            }
            VariantKind::Json => {
                writeln!(out, "  else if (json_value_get_type(root) == JSONArray) {{")?;
                write_primitive_alloc(out, name, &vname, "json_serialize_to_string(root)")?;
                writeln!(out, "  }}")?;
            }
            VariantKind::Object(_) | VariantKind::Enum(_) => {}
        }
    }

    writeln!(out, "  json_value_free(root);")?;
    writeln!(out, "  return rc;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_primitive_alloc(
    out: &mut dyn Write,
    name: &str,
    vname: &str,
    expr: &str,
) -> Result<(), Error> {
    writeln!(
        out,
        "    struct {name} *obj = (struct {name} *)calloc(1, sizeof(*obj));"
    )?;
    writeln!(
        out,
        "    if (obj == NULL) {{ json_value_free(root); return ENOMEM; }}"
    )?;
    writeln!(out, "    obj->data.{vname} = {expr};")?;
    writeln!(
        out,
        "    if (obj->data.{vname} == NULL) {{ free(obj); json_value_free(root); return ENOMEM; }}"
    )?;
    writeln!(out, "    obj->tag = {name}_{vname};")?;
    writeln!(out, "    *out = obj;")?;
    writeln!(out, "    rc = 0;")?;
    Ok(())
}

fn write_primitive_set(
    out: &mut dyn Write,
    name: &str,
    vname: &str,
    expr: &str,
) -> Result<(), Error> {
    writeln!(
        out,
        "    struct {name} *obj = (struct {name} *)calloc(1, sizeof(*obj));"
    )?;
    writeln!(
        out,
        "    if (obj == NULL) {{ json_value_free(root); return ENOMEM; }}"
    )?;
    writeln!(out, "    obj->data.{vname} = {expr};")?;
    writeln!(out, "    obj->tag = {name}_{vname};")?;
    writeln!(out, "    *out = obj;")?;
    writeln!(out, "    rc = 0;")?;
    Ok(())
}

fn write_to_json(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
) -> Result<(), Error> {
    writeln!(
        out,
        "int {name}_to_json(const struct {name} *obj, char **json_out) {{"
    )?;
    writeln!(out, "  if (obj == NULL || json_out == NULL) return EINVAL;")?;
    writeln!(out, "  switch (obj->tag) {{")?;

    for field in &sf.fields {
        let vname = c_ident(&field.name);
        writeln!(out, "    case {name}_{vname}:")?;
        match variant_kind(spec, field) {
            VariantKind::Object(target) => {
                writeln!(
                    out,
                    "      return obj->data.{vname} != NULL ? {target}_to_json(obj->data.{vname}, json_out) : EINVAL;"
                )?;
            }
            VariantKind::Enum(target) => {
                writeln!(out, "      return {target}_to_str(obj->data.{vname}, json_out);")?;
            }
            VariantKind::Str | VariantKind::Json => {
                writeln!(out, "      {{")?;
                writeln!(
                    out,
                    "        JSON_Value *v = json_value_init_string(obj->data.{vname} ? obj->data.{vname} : \"\");"
                )?;
                writeln!(out, "        if (v == NULL) return ENOMEM;")?;
                writeln!(out, "        *json_out = json_serialize_to_string(v);")?;
                writeln!(out, "        json_value_free(v);")?;
                writeln!(out, "        return *json_out != NULL ? 0 : ENOMEM;")?;
                writeln!(out, "      }}")?;
            }
            VariantKind::Int | VariantKind::Long | VariantKind::Bool | VariantKind::Double => {
                writeln!(out, "      {{")?;
                writeln!(
                    out,
                    "        JSON_Value *v = json_value_init_number((double)obj->data.{vname});"
                )?;
                writeln!(out, "        if (v == NULL) return ENOMEM;")?;
                writeln!(out, "        *json_out = json_serialize_to_string(v);")?;
                writeln!(out, "        json_value_free(v);")?;
                writeln!(out, "        return *json_out != NULL ? 0 : ENOMEM;")?;
                writeln!(out, "      }}")?;
            }
            VariantKind::Array(item) => {
                writeln!(out, "      {{")?;
                writeln!(out, "        JSON_Value *arr_val = json_value_init_array();")?;
                writeln!(out, "        JSON_Array *arr;")?;
                writeln!(out, "        size_t i;")?;
                writeln!(out, "        if (arr_val == NULL) return ENOMEM;")?;
                writeln!(out, "        arr = json_value_get_array(arr_val);")?;
                writeln!(
                    out,
                    "        for (i = 0; i < obj->data.{vname}.n_{vname}; ++i) {{"
                )?;
                match item {
                    CScalar::Str | CScalar::Json => writeln!(
                        out,
                        "          if (obj->data.{vname}.{vname}[i] != NULL) json_array_append_string(arr, obj->data.{vname}.{vname}[i]);"
                    )?,
                    CScalar::Int | CScalar::Long => writeln!(
                        out,
                        "          json_array_append_number(arr, (double)obj->data.{vname}.{vname}[i]);"
                    )?,
                    CScalar::Double => writeln!(
                        out,
                        "          json_array_append_number(arr, obj->data.{vname}.{vname}[i]);"
                    )?,
                    CScalar::Bool => writeln!(
                        out,
                        "          json_array_append_boolean(arr, obj->data.{vname}.{vname}[i]);"
                    )?,
                    CScalar::Enum(target) => {
                        writeln!(out, "          char *s = NULL;")?;
                        writeln!(
                            out,
                            "          if ({target}_to_str(obj->data.{vname}.{vname}[i], &s) == 0 && s != NULL) {{"
                        )?;
                        writeln!(out, "            json_array_append_string(arr, s);")?;
                        writeln!(out, "            free(s);")?;
                        writeln!(out, "          }}")?;
                    }
                    CScalar::Struct(target) => {
                        writeln!(out, "          char *sub = NULL;")?;
                        writeln!(
                            out,
                            "          if (obj->data.{vname}.{vname}[i] != NULL && {target}_to_json(obj->data.{vname}.{vname}[i], &sub) == 0 && sub != NULL) {{"
                        )?;
                        writeln!(
                            out,
                            "            json_array_append_value(arr, json_parse_string(sub));"
                        )?;
                        writeln!(out, "            free(sub);")?;
                        writeln!(out, "          }}")?;
                    }
                }
                writeln!(out, "        }}")?;
                writeln!(out, "        *json_out = json_serialize_to_string(arr_val);")?;
                writeln!(out, "        json_value_free(arr_val);")?;
                writeln!(out, "        return *json_out != NULL ? 0 : ENOMEM;")?;
                writeln!(out, "      }}")?;
            }
        }
    }

    writeln!(out, "    case {name}_UNKNOWN:")?;
    writeln!(out, "    default:")?;
    writeln!(out, "      return EINVAL;")?;
    writeln!(out, "  }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_cleanup(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
) -> Result<(), Error> {
    writeln!(out, "void {name}_cleanup(struct {name} *obj) {{")?;
    writeln!(out, "  if (obj == NULL) return;")?;
    writeln!(out, "  switch (obj->tag) {{")?;

    for field in &sf.fields {
        let vname = c_ident(&field.name);
        writeln!(out, "    case {name}_{vname}:")?;
        match variant_kind(spec, field) {
            VariantKind::Object(target) => {
                writeln!(
                    out,
                    "      if (obj->data.{vname} != NULL) {target}_cleanup(obj->data.{vname});"
                )?;
            }
            VariantKind::Str => {
                writeln!(out, "      free((char *)obj->data.{vname});")?;
            }
            VariantKind::Json => {
                writeln!(out, "      free(obj->data.{vname});")?;
            }
            VariantKind::Array(item) => {
                writeln!(out, "      if (obj->data.{vname}.{vname} != NULL) {{")?;
                match item {
                    CScalar::Str | CScalar::Json => {
                        writeln!(out, "        size_t i;")?;
                        writeln!(
                            out,
                            "        for (i = 0; i < obj->data.{vname}.n_{vname}; ++i)"
                        )?;
                        writeln!(out, "          free(obj->data.{vname}.{vname}[i]);")?;
                    }
                    CScalar::Struct(target) => {
                        writeln!(out, "        size_t i;")?;
                        writeln!(
                            out,
                            "        for (i = 0; i < obj->data.{vname}.n_{vname}; ++i)"
                        )?;
                        writeln!(
                            out,
                            "          if (obj->data.{vname}.{vname}[i] != NULL) {target}_cleanup(obj->data.{vname}.{vname}[i]);"
                        )?;
                    }
                    _ => {}
                }
                writeln!(out, "        free(obj->data.{vname}.{vname});")?;
                writeln!(out, "      }}")?;
            }
            _ => {}
        }
        writeln!(out, "      break;")?;
    }

    writeln!(out, "    case {name}_UNKNOWN:")?;
    writeln!(out, "    default:")?;
    writeln!(out, "      break;")?;
    writeln!(out, "  }}")?;
    writeln!(out, "  free(obj);")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}
