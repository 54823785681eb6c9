//! Object struct generation: declarations, JSON codecs with inlined
//! constraint validation, and the lifecycle helper suite.

use std::io::Write;

use super::{
    c_ident, close_guard, open_guard, resolve_shape, CScalar, CShape, CodegenOptions, Error,
};
use crate::spec::{Any, SchemaRef, Spec, StructFields};

/// Escapes a string for inclusion in a C string literal.
pub(crate) fn c_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// The compiled form of a `pattern` constraint.
///
/// Anchored or bare literals compile to `strcmp`/`strncmp`/`strstr`; any
/// other pattern delegates to the runtime matcher.
enum PatternKind<'a> {
    Exact(&'a str),
    Prefix(&'a str),
    Suffix(&'a str),
    Contains(&'a str),
    Regex(&'a str),
}

fn is_pattern_literal(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || " _-/:@,".contains(c))
}

fn classify_pattern(pattern: &str) -> PatternKind<'_> {
    if let Some(rest) = pattern.strip_prefix('^') {
        if let Some(lit) = rest.strip_suffix('$') {
            if is_pattern_literal(lit) {
                return PatternKind::Exact(lit);
            }
        } else if is_pattern_literal(rest) {
            return PatternKind::Prefix(rest);
        }
    } else if let Some(lit) = pattern.strip_suffix('$') {
        if is_pattern_literal(lit) {
            return PatternKind::Suffix(lit);
        }
    } else if is_pattern_literal(pattern) {
        return PatternKind::Contains(pattern);
    }
    PatternKind::Regex(pattern)
}

fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Emits the struct declaration and function prototypes.
pub(crate) fn write_struct_header(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    writeln!(out, "struct {name} {{")?;
    if sf.fields.is_empty() {
        // Empty structs are not valid C89; keep a placeholder member.
        writeln!(out, "  int _reserved;")?;
    }
    for field in &sf.fields {
        let fname = c_ident(&field.name);
        match resolve_shape(spec, &field.schema) {
            CShape::Scalar(scalar) => {
                if let Some(width) = &field.bit_width {
                    writeln!(out, "  {}{fname} : {width};", scalar.member_decl())?;
                } else {
                    writeln!(out, "  {}{fname};", scalar.member_decl())?;
                }
            }
            CShape::Array(item) => {
                writeln!(out, "  size_t n_{fname};")?;
                writeln!(out, "  {}{fname};", item.array_decl())?;
            }
        }
    }
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
    open_guard(out, opts.utils_guard.as_deref())?;
    writeln!(
        out,
        "extern int {name}_eq(const struct {name} *a, const struct {name} *b);"
    )?;
    writeln!(out, "extern int {name}_default(struct {name} **out);")?;
    writeln!(
        out,
        "extern int {name}_deepcopy(const struct {name} *src, struct {name} **out);"
    )?;
    writeln!(
        out,
        "extern int {name}_display(const struct {name} *obj, FILE *fh);"
    )?;
    writeln!(
        out,
        "extern int {name}_debug(const struct {name} *obj, FILE *fh);"
    )?;
    close_guard(out, opts.utils_guard.as_deref())?;
    writeln!(out)?;
    Ok(())
}

/// Emits all function implementations for one object struct.
pub(crate) fn write_struct_source(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    open_guard(out, opts.json_guard.as_deref())?;
    write_from_json_object(spec, out, name, sf)?;
    write_from_json(out, name)?;
    write_to_json(spec, out, name, sf)?;
    close_guard(out, opts.json_guard.as_deref())?;
    write_cleanup(spec, out, name, sf)?;
    open_guard(out, opts.utils_guard.as_deref())?;
    write_eq(spec, out, name, sf)?;
    write_default(spec, out, name, sf)?;
    write_deepcopy(out, name)?;
    write_display(spec, out, name, sf)?;
    write_debug(out, name)?;
    close_guard(out, opts.utils_guard.as_deref())?;
    writeln!(out)?;
    Ok(())
}

/// The `cleanup-and-return` sequence used on every validation failure.
fn fail(name: &str, code: &str) -> String {
    format!("{{ {name}_cleanup(obj); return {code}; }}")
}

fn write_string_constraints(
    out: &mut dyn Write,
    name: &str,
    fname: &str,
    schema: &SchemaRef,
) -> Result<(), Error> {
    if let Some(min) = schema.min_length {
        writeln!(
            out,
            "    if (obj->{fname} != NULL && strlen(obj->{fname}) < {min}) {}",
            fail(name, "ERANGE")
        )?;
    }
    if let Some(max) = schema.max_length {
        writeln!(
            out,
            "    if (obj->{fname} != NULL && strlen(obj->{fname}) > {max}) {}",
            fail(name, "ERANGE")
        )?;
    }

    if let Some(pattern) = &schema.pattern {
        match classify_pattern(pattern) {
            PatternKind::Exact(lit) => writeln!(
                out,
                "    if (obj->{fname} != NULL && strcmp(obj->{fname}, \"{}\") != 0) {}",
                c_escape(lit),
                fail(name, "EINVAL")
            )?,
            PatternKind::Prefix(lit) => writeln!(
                out,
                "    if (obj->{fname} != NULL && strncmp(obj->{fname}, \"{}\", {}) != 0) {}",
                c_escape(lit),
                lit.len(),
                fail(name, "EINVAL")
            )?,
            PatternKind::Suffix(lit) => {
                writeln!(out, "    if (obj->{fname} != NULL) {{")?;
                writeln!(out, "      const size_t slen = strlen(obj->{fname});")?;
                writeln!(
                    out,
                    "      if (slen < {0} || strcmp(obj->{fname} + slen - {0}, \"{1}\") != 0) {2}",
                    lit.len(),
                    c_escape(lit),
                    fail(name, "EINVAL")
                )?;
                writeln!(out, "    }}")?;
            }
            PatternKind::Contains(lit) => writeln!(
                out,
                "    if (obj->{fname} != NULL && strstr(obj->{fname}, \"{}\") == NULL) {}",
                c_escape(lit),
                fail(name, "EINVAL")
            )?,
            PatternKind::Regex(pattern) => writeln!(
                out,
                "    if (obj->{fname} != NULL && oasc_regex_match(\"{}\", obj->{fname}) != 1) {}",
                c_escape(pattern),
                fail(name, "EINVAL")
            )?,
        }
    }

    // Inline string enumerations validate membership.
    let literals: Vec<&str> = schema
        .enum_values
        .iter()
        .filter_map(Any::as_str)
        .collect();
    if !literals.is_empty() && literals.len() == schema.enum_values.len() {
        let checks: Vec<String> = literals
            .iter()
            .map(|lit| format!("strcmp(obj->{fname}, \"{}\") != 0", c_escape(lit)))
            .collect();
        writeln!(
            out,
            "    if (obj->{fname} != NULL && {}) {}",
            checks.join(" && "),
            fail(name, "EINVAL")
        )?;
    }

    Ok(())
}

fn write_numeric_constraints(
    out: &mut dyn Write,
    name: &str,
    fname: &str,
    schema: &SchemaRef,
) -> Result<(), Error> {
    if let Some(min) = schema.minimum {
        let op = if schema.exclusive_minimum { "<=" } else { "<" };
        writeln!(
            out,
            "  if (obj->{fname} {op} {}) {}",
            fmt_number(min),
            fail(name, "ERANGE")
        )?;
    }
    if let Some(max) = schema.maximum {
        let op = if schema.exclusive_maximum { ">=" } else { ">" };
        writeln!(
            out,
            "  if (obj->{fname} {op} {}) {}",
            fmt_number(max),
            fail(name, "ERANGE")
        )?;
    }
    Ok(())
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

    for field in &sf.fields {
        let fname = c_ident(&field.name);
        let json_name = c_escape(&field.name);

        if field.required {
            writeln!(
                out,
                "  if (!json_object_has_value(jobj, \"{json_name}\")) {}",
                fail(name, "EINVAL")
            )?;
        }

        match resolve_shape(spec, &field.schema) {
            CShape::Scalar(CScalar::Str) => {
                writeln!(out, "  {{")?;
                writeln!(
                    out,
                    "    const char *s = json_object_get_string(jobj, \"{json_name}\");"
                )?;
                writeln!(out, "    if (s != NULL) {{")?;
                writeln!(out, "      obj->{fname} = oasc_strdup(s);")?;
                writeln!(
                    out,
                    "      if (obj->{fname} == NULL) {}",
                    fail(name, "ENOMEM")
                )?;
                writeln!(out, "    }}")?;
                write_string_constraints(out, name, &fname, &field.schema)?;
                writeln!(out, "  }}")?;
            }
            CShape::Scalar(CScalar::Int) => {
                writeln!(
                    out,
                    "  obj->{fname} = (int)json_object_get_number(jobj, \"{json_name}\");"
                )?;
                write_numeric_constraints(out, name, &fname, &field.schema)?;
            }
            CShape::Scalar(CScalar::Long) => {
                writeln!(
                    out,
                    "  obj->{fname} = (long)json_object_get_number(jobj, \"{json_name}\");"
                )?;
                write_numeric_constraints(out, name, &fname, &field.schema)?;
            }
            CShape::Scalar(CScalar::Double) => {
                writeln!(
                    out,
                    "  obj->{fname} = json_object_get_number(jobj, \"{json_name}\");"
                )?;
                write_numeric_constraints(out, name, &fname, &field.schema)?;
            }
            CShape::Scalar(CScalar::Bool) => {
                writeln!(
                    out,
                    "  obj->{fname} = json_object_get_boolean(jobj, \"{json_name}\");"
                )?;
                writeln!(out, "  if (obj->{fname} < 0) obj->{fname} = 0;")?;
            }
            CShape::Scalar(CScalar::Enum(target)) => {
                writeln!(out, "  {{")?;
                writeln!(
                    out,
                    "    const char *s = json_object_get_string(jobj, \"{json_name}\");"
                )?;
                writeln!(
                    out,
                    "    if ({target}_from_str(s, &obj->{fname}) != 0) {}",
                    fail(name, "EINVAL")
                )?;
                writeln!(out, "  }}")?;
            }
            CShape::Scalar(CScalar::Struct(target)) => {
                writeln!(out, "  {{")?;
                writeln!(
                    out,
                    "    const JSON_Object *sub = json_object_get_object(jobj, \"{json_name}\");"
                )?;
                writeln!(out, "    if (sub != NULL) {{")?;
                writeln!(
                    out,
                    "      const int rc = {target}_from_jsonObject(sub, &obj->{fname});"
                )?;
                writeln!(out, "      if (rc != 0) {{ {name}_cleanup(obj); return rc; }}")?;
                writeln!(out, "    }}")?;
                writeln!(out, "  }}")?;
            }
            CShape::Scalar(CScalar::Json) => {
                writeln!(out, "  {{")?;
                writeln!(
                    out,
                    "    const JSON_Value *v = json_object_get_value(jobj, \"{json_name}\");"
                )?;
                writeln!(out, "    if (v != NULL) {{")?;
                writeln!(out, "      obj->{fname} = json_serialize_to_string(v);")?;
                writeln!(
                    out,
                    "      if (obj->{fname} == NULL) {}",
                    fail(name, "ENOMEM")
                )?;
                writeln!(out, "    }}")?;
                writeln!(out, "  }}")?;
            }
            CShape::Array(item) => {
                writeln!(out, "  {{")?;
                writeln!(
                    out,
                    "    const JSON_Array *arr = json_object_get_array(jobj, \"{json_name}\");"
                )?;
                writeln!(out, "    if (arr != NULL) {{")?;
                writeln!(out, "      size_t i;")?;
                writeln!(out, "      const size_t n = json_array_get_count(arr);")?;
                if let Some(min) = field.schema.min_items {
                    writeln!(out, "      if (n < {min}) {}", fail(name, "ERANGE"))?;
                }
                if let Some(max) = field.schema.max_items {
                    writeln!(out, "      if (n > {max}) {}", fail(name, "ERANGE"))?;
                }
                writeln!(
                    out,
                    "      obj->{fname} = ({})calloc(n ? n : 1, sizeof(*obj->{fname}));",
                    item.array_decl()
                )?;
                writeln!(
                    out,
                    "      if (obj->{fname} == NULL) {}",
                    fail(name, "ENOMEM")
                )?;
                writeln!(out, "      obj->n_{fname} = n;")?;
                writeln!(out, "      for (i = 0; i < n; ++i) {{")?;
                match item {
                    CScalar::Str | CScalar::Json => {
                        writeln!(
                            out,
                            "        const char *s = json_array_get_string(arr, i);"
                        )?;
                        writeln!(out, "        if (s != NULL) {{")?;
                        writeln!(out, "          obj->{fname}[i] = oasc_strdup(s);")?;
                        writeln!(
                            out,
                            "          if (obj->{fname}[i] == NULL) {}",
                            fail(name, "ENOMEM")
                        )?;
                        writeln!(out, "        }}")?;
                    }
                    CScalar::Int => writeln!(
                        out,
                        "        obj->{fname}[i] = (int)json_array_get_number(arr, i);"
                    )?,
                    CScalar::Long => writeln!(
                        out,
                        "        obj->{fname}[i] = (long)json_array_get_number(arr, i);"
                    )?,
                    CScalar::Double => writeln!(
                        out,
                        "        obj->{fname}[i] = json_array_get_number(arr, i);"
                    )?,
                    CScalar::Bool => writeln!(
                        out,
                        "        obj->{fname}[i] = json_array_get_boolean(arr, i);"
                    )?,
                    CScalar::Enum(target) => writeln!(
                        out,
                        "        (void){target}_from_str(json_array_get_string(arr, i), &obj->{fname}[i]);"
                    )?,
                    CScalar::Struct(target) => {
                        writeln!(
                            out,
                            "        const JSON_Object *sub = json_array_get_object(arr, i);"
                        )?;
                        writeln!(out, "        if (sub != NULL) {{")?;
                        writeln!(
                            out,
                            "          const int rc = {target}_from_jsonObject(sub, &obj->{fname}[i]);"
                        )?;
                        writeln!(
                            out,
                            "          if (rc != 0) {{ {name}_cleanup(obj); return rc; }}"
                        )?;
                        writeln!(out, "        }}")?;
                    }
                }
                writeln!(out, "      }}")?;
                writeln!(out, "    }}")?;
                writeln!(out, "  }}")?;
            }
        }
    }

    writeln!(out, "  *out = obj;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_from_json(out: &mut dyn Write, name: &str) -> Result<(), Error> {
    writeln!(
        out,
        "int {name}_from_json(const char *json, struct {name} **out) {{"
    )?;
    writeln!(out, "  JSON_Value *root;")?;
    writeln!(out, "  const JSON_Object *jobj;")?;
    writeln!(out, "  int rc;")?;
    writeln!(out, "  if (json == NULL || out == NULL) return EINVAL;")?;
    writeln!(out, "  root = json_parse_string(json);")?;
    writeln!(out, "  if (root == NULL) return EINVAL;")?;
    writeln!(out, "  jobj = json_value_get_object(root);")?;
    writeln!(
        out,
        "  if (jobj == NULL) {{ json_value_free(root); return EINVAL; }}"
    )?;
    writeln!(out, "  rc = {name}_from_jsonObject(jobj, out);")?;
    writeln!(out, "  json_value_free(root);")?;
    writeln!(out, "  return rc;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
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
    writeln!(out, "  JSON_Value *root;")?;
    writeln!(out, "  JSON_Object *jobj;")?;
    writeln!(out, "  if (obj == NULL || json_out == NULL) return EINVAL;")?;
    writeln!(out, "  root = json_value_init_object();")?;
    writeln!(out, "  if (root == NULL) return ENOMEM;")?;
    writeln!(out, "  jobj = json_value_get_object(root);")?;

    for field in &sf.fields {
        let fname = c_ident(&field.name);
        let json_name = c_escape(&field.name);
        match resolve_shape(spec, &field.schema) {
            CShape::Scalar(CScalar::Str) => writeln!(
                out,
                "  if (obj->{fname} != NULL) json_object_set_string(jobj, \"{json_name}\", obj->{fname});"
            )?,
            CShape::Scalar(CScalar::Int) | CShape::Scalar(CScalar::Long) => writeln!(
                out,
                "  json_object_set_number(jobj, \"{json_name}\", (double)obj->{fname});"
            )?,
            CShape::Scalar(CScalar::Double) => writeln!(
                out,
                "  json_object_set_number(jobj, \"{json_name}\", obj->{fname});"
            )?,
            CShape::Scalar(CScalar::Bool) => writeln!(
                out,
                "  json_object_set_boolean(jobj, \"{json_name}\", obj->{fname});"
            )?,
            CShape::Scalar(CScalar::Enum(target)) => {
                writeln!(out, "  {{")?;
                writeln!(out, "    char *s = NULL;")?;
                writeln!(
                    out,
                    "    if ({target}_to_str(obj->{fname}, &s) == 0 && s != NULL) {{"
                )?;
                writeln!(
                    out,
                    "      json_object_set_string(jobj, \"{json_name}\", s);"
                )?;
                writeln!(out, "      free(s);")?;
                writeln!(out, "    }}")?;
                writeln!(out, "  }}")?;
            }
            CShape::Scalar(CScalar::Struct(target)) => {
                writeln!(out, "  if (obj->{fname} != NULL) {{")?;
                writeln!(out, "    char *sub = NULL;")?;
                writeln!(
                    out,
                    "    if ({target}_to_json(obj->{fname}, &sub) == 0 && sub != NULL) {{"
                )?;
                writeln!(
                    out,
                    "      json_object_set_value(jobj, \"{json_name}\", json_parse_string(sub));"
                )?;
                writeln!(out, "      free(sub);")?;
                writeln!(out, "    }}")?;
                writeln!(out, "  }}")?;
            }
            CShape::Scalar(CScalar::Json) => writeln!(
                out,
                "  if (obj->{fname} != NULL) json_object_set_value(jobj, \"{json_name}\", json_parse_string(obj->{fname}));"
            )?,
            CShape::Array(item) => {
                writeln!(out, "  {{")?;
                writeln!(out, "    JSON_Value *arr_val = json_value_init_array();")?;
                writeln!(out, "    JSON_Array *arr = json_value_get_array(arr_val);")?;
                writeln!(out, "    size_t i;")?;
                writeln!(out, "    for (i = 0; i < obj->n_{fname}; ++i) {{")?;
                match item {
                    CScalar::Str | CScalar::Json => writeln!(
                        out,
                        "      if (obj->{fname}[i] != NULL) json_array_append_string(arr, obj->{fname}[i]);"
                    )?,
                    CScalar::Int | CScalar::Long => writeln!(
                        out,
                        "      json_array_append_number(arr, (double)obj->{fname}[i]);"
                    )?,
                    CScalar::Double => writeln!(
                        out,
                        "      json_array_append_number(arr, obj->{fname}[i]);"
                    )?,
                    CScalar::Bool => writeln!(
                        out,
                        "      json_array_append_boolean(arr, obj->{fname}[i]);"
                    )?,
                    CScalar::Enum(target) => {
                        writeln!(out, "      char *s = NULL;")?;
                        writeln!(
                            out,
                            "      if ({target}_to_str(obj->{fname}[i], &s) == 0 && s != NULL) {{"
                        )?;
                        writeln!(out, "        json_array_append_string(arr, s);")?;
                        writeln!(out, "        free(s);")?;
                        writeln!(out, "      }}")?;
                    }
                    CScalar::Struct(target) => {
                        writeln!(out, "      char *sub = NULL;")?;
                        writeln!(
                            out,
                            "      if (obj->{fname}[i] != NULL && {target}_to_json(obj->{fname}[i], &sub) == 0 && sub != NULL) {{"
                        )?;
                        writeln!(
                            out,
                            "        json_array_append_value(arr, json_parse_string(sub));"
                        )?;
                        writeln!(out, "        free(sub);")?;
                        writeln!(out, "      }}")?;
                    }
                }
                writeln!(out, "    }}")?;
                writeln!(
                    out,
                    "    json_object_set_value(jobj, \"{json_name}\", arr_val);"
                )?;
                writeln!(out, "  }}")?;
            }
        }
    }

    writeln!(out, "  *json_out = json_serialize_to_string(root);")?;
    writeln!(out, "  json_value_free(root);")?;
    writeln!(out, "  if (*json_out == NULL) return ENOMEM;")?;
    writeln!(out, "  return 0;")?;
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

    for field in &sf.fields {
        let fname = c_ident(&field.name);
        match resolve_shape(spec, &field.schema) {
            CShape::Scalar(CScalar::Str) => {
                writeln!(out, "  free((char *)obj->{fname});")?;
            }
            CShape::Scalar(CScalar::Json) => {
                writeln!(out, "  free(obj->{fname});")?;
            }
            CShape::Scalar(CScalar::Struct(target)) => {
                writeln!(
                    out,
                    "  if (obj->{fname} != NULL) {target}_cleanup(obj->{fname});"
                )?;
            }
            CShape::Scalar(_) => {}
            CShape::Array(item) => {
                writeln!(out, "  if (obj->{fname} != NULL) {{")?;
                match item {
                    CScalar::Str | CScalar::Json => {
                        writeln!(out, "    size_t i;")?;
                        writeln!(out, "    for (i = 0; i < obj->n_{fname}; ++i)")?;
                        writeln!(out, "      free(obj->{fname}[i]);")?;
                    }
                    CScalar::Struct(target) => {
                        writeln!(out, "    size_t i;")?;
                        writeln!(out, "    for (i = 0; i < obj->n_{fname}; ++i)")?;
                        writeln!(
                            out,
                            "      if (obj->{fname}[i] != NULL) {target}_cleanup(obj->{fname}[i]);"
                        )?;
                    }
                    _ => {}
                }
                writeln!(out, "    free(obj->{fname});")?;
                writeln!(out, "  }}")?;
            }
        }
    }

    writeln!(out, "  free(obj);")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_eq(spec: &Spec, out: &mut dyn Write, name: &str, sf: &StructFields) -> Result<(), Error> {
    writeln!(
        out,
        "int {name}_eq(const struct {name} *a, const struct {name} *b) {{"
    )?;
    writeln!(out, "  if (a == b) return 1;")?;
    writeln!(out, "  if (a == NULL || b == NULL) return 0;")?;

    for field in &sf.fields {
        let fname = c_ident(&field.name);
        match resolve_shape(spec, &field.schema) {
            CShape::Scalar(CScalar::Str) | CShape::Scalar(CScalar::Json) => {
                writeln!(
                    out,
                    "  if ((a->{fname} == NULL) != (b->{fname} == NULL)) return 0;"
                )?;
                writeln!(
                    out,
                    "  if (a->{fname} != NULL && strcmp(a->{fname}, b->{fname}) != 0) return 0;"
                )?;
            }
            CShape::Scalar(CScalar::Struct(target)) => {
                writeln!(out, "  if (!{target}_eq(a->{fname}, b->{fname})) return 0;")?;
            }
            CShape::Scalar(_) => {
                writeln!(out, "  if (a->{fname} != b->{fname}) return 0;")?;
            }
            CShape::Array(item) => {
                writeln!(out, "  if (a->n_{fname} != b->n_{fname}) return 0;")?;
                writeln!(out, "  {{")?;
                writeln!(out, "    size_t i;")?;
                writeln!(out, "    for (i = 0; i < a->n_{fname}; ++i) {{")?;
                match item {
                    CScalar::Str | CScalar::Json => {
                        writeln!(
                            out,
                            "      if ((a->{fname}[i] == NULL) != (b->{fname}[i] == NULL)) return 0;"
                        )?;
                        writeln!(
                            out,
                            "      if (a->{fname}[i] != NULL && strcmp(a->{fname}[i], b->{fname}[i]) != 0) return 0;"
                        )?;
                    }
                    CScalar::Struct(target) => {
                        writeln!(
                            out,
                            "      if (!{target}_eq(a->{fname}[i], b->{fname}[i])) return 0;"
                        )?;
                    }
                    _ => {
                        writeln!(out, "      if (a->{fname}[i] != b->{fname}[i]) return 0;")?;
                    }
                }
                writeln!(out, "    }}")?;
                writeln!(out, "  }}")?;
            }
        }
    }

    writeln!(out, "  return 1;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_default(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
) -> Result<(), Error> {
    writeln!(out, "int {name}_default(struct {name} **out) {{")?;
    writeln!(out, "  struct {name} *obj;")?;
    writeln!(out, "  if (out == NULL) return EINVAL;")?;
    writeln!(out, "  obj = (struct {name} *)calloc(1, sizeof(*obj));")?;
    writeln!(out, "  if (obj == NULL) return ENOMEM;")?;

    for field in &sf.fields {
        let fname = c_ident(&field.name);
        let default = field
            .default_value
            .as_ref()
            .or(field.schema.default.as_ref());
        let Some(default) = default else { continue };

        match (resolve_shape(spec, &field.schema), default) {
            (CShape::Scalar(CScalar::Str), Any::Str(s)) => {
                writeln!(out, "  obj->{fname} = oasc_strdup(\"{}\");", c_escape(s))?;
                writeln!(out, "  if (obj->{fname} == NULL) {}", fail(name, "ENOMEM"))?;
            }
            (CShape::Scalar(CScalar::Int), Any::Number(n)) => {
                writeln!(out, "  obj->{fname} = {};", n.as_i64().unwrap_or(0))?;
            }
            (CShape::Scalar(CScalar::Long), Any::Number(n)) => {
                writeln!(out, "  obj->{fname} = {}L;", n.as_i64().unwrap_or(0))?;
            }
            (CShape::Scalar(CScalar::Double), Any::Number(n)) => {
                writeln!(out, "  obj->{fname} = {};", n.as_f64().unwrap_or(0.0))?;
            }
            (CShape::Scalar(CScalar::Bool), Any::Bool(b)) => {
                writeln!(out, "  obj->{fname} = {};", i32::from(*b))?;
            }
            _ => {}
        }
    }

    writeln!(out, "  *out = obj;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_deepcopy(out: &mut dyn Write, name: &str) -> Result<(), Error> {
    writeln!(
        out,
        "int {name}_deepcopy(const struct {name} *src, struct {name} **out) {{"
    )?;
    writeln!(out, "  char *json = NULL;")?;
    writeln!(out, "  int rc;")?;
    writeln!(out, "  if (src == NULL || out == NULL) return EINVAL;")?;
    writeln!(out, "  rc = {name}_to_json(src, &json);")?;
    writeln!(out, "  if (rc != 0) return rc;")?;
    writeln!(out, "  rc = {name}_from_json(json, out);")?;
    writeln!(out, "  free(json);")?;
    writeln!(out, "  return rc;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_display(
    spec: &Spec,
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
) -> Result<(), Error> {
    writeln!(
        out,
        "int {name}_display(const struct {name} *obj, FILE *fh) {{"
    )?;
    writeln!(out, "  if (obj == NULL || fh == NULL) return EINVAL;")?;
    writeln!(out, "  if (fprintf(fh, \"{name}(\") < 0) return EIO;")?;

    for (i, field) in sf.fields.iter().enumerate() {
        let fname = c_ident(&field.name);
        let sep = if i == 0 { "" } else { ", " };
        match resolve_shape(spec, &field.schema) {
            CShape::Scalar(CScalar::Str) | CShape::Scalar(CScalar::Json) => writeln!(
                out,
                "  if (fprintf(fh, \"{sep}{fname}=%s\", obj->{fname} ? obj->{fname} : \"(null)\") < 0) return EIO;"
            )?,
            CShape::Scalar(CScalar::Int) | CShape::Scalar(CScalar::Bool) => writeln!(
                out,
                "  if (fprintf(fh, \"{sep}{fname}=%d\", obj->{fname}) < 0) return EIO;"
            )?,
            CShape::Scalar(CScalar::Long) => writeln!(
                out,
                "  if (fprintf(fh, \"{sep}{fname}=%ld\", obj->{fname}) < 0) return EIO;"
            )?,
            CShape::Scalar(CScalar::Double) => writeln!(
                out,
                "  if (fprintf(fh, \"{sep}{fname}=%g\", obj->{fname}) < 0) return EIO;"
            )?,
            CShape::Scalar(CScalar::Enum(_)) => writeln!(
                out,
                "  if (fprintf(fh, \"{sep}{fname}=%d\", (int)obj->{fname}) < 0) return EIO;"
            )?,
            CShape::Scalar(CScalar::Struct(_)) => writeln!(
                out,
                "  if (fprintf(fh, \"{sep}{fname}=%s\", obj->{fname} ? \"{{...}}\" : \"(null)\") < 0) return EIO;"
            )?,
            CShape::Array(_) => writeln!(
                out,
                "  if (fprintf(fh, \"{sep}n_{fname}=%lu\", (unsigned long)obj->n_{fname}) < 0) return EIO;"
            )?,
        }
    }

    writeln!(out, "  if (fprintf(fh, \")\\n\") < 0) return EIO;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_debug(out: &mut dyn Write, name: &str) -> Result<(), Error> {
    writeln!(out, "int {name}_debug(const struct {name} *obj, FILE *fh) {{")?;
    writeln!(out, "  char *json = NULL;")?;
    writeln!(out, "  int rc;")?;
    writeln!(out, "  if (obj == NULL || fh == NULL) return EINVAL;")?;
    writeln!(out, "  rc = {name}_to_json(obj, &json);")?;
    writeln!(out, "  if (rc != 0) return rc;")?;
    writeln!(out, "  if (fprintf(fh, \"%s\\n\", json) < 0) {{")?;
    writeln!(out, "    free(json);")?;
    writeln!(out, "    return EIO;")?;
    writeln!(out, "  }}")?;
    writeln!(out, "  free(json);")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

/// C member type for a root array item.
fn root_item_type(item_type: &str, item_ref: Option<&str>) -> (String, bool) {
    match item_ref {
        Some(target) => (format!("struct {target} *"), true),
        None => match item_type {
            "integer" => ("long ".to_owned(), false),
            "number" => ("double ".to_owned(), false),
            "boolean" => ("int ".to_owned(), false),
            _ => ("char *".to_owned(), false),
        },
    }
}

/// Prototypes for a component whose root schema is an array.
pub(crate) fn write_root_array_header(
    out: &mut dyn Write,
    name: &str,
    item_type: &str,
    item_ref: Option<&str>,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    let (item, _is_object) = root_item_type(item_type, item_ref);
    open_guard(out, opts.json_guard.as_deref())?;
    writeln!(
        out,
        "extern int {name}_from_json(const char *json, {item}**out, size_t *len);"
    )?;
    writeln!(
        out,
        "extern int {name}_to_json({item}const *items, size_t len, char **json_out);"
    )?;
    close_guard(out, opts.json_guard.as_deref())?;
    writeln!(out, "extern void {name}_cleanup({item}*items, size_t len);")?;
    writeln!(out)?;
    Ok(())
}

/// Implementations for a root array component.
pub(crate) fn write_root_array_source(
    out: &mut dyn Write,
    name: &str,
    item_type: &str,
    item_ref: Option<&str>,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    let (item, is_object) = root_item_type(item_type, item_ref);

    open_guard(out, opts.json_guard.as_deref())?;

    writeln!(
        out,
        "int {name}_from_json(const char *json, {item}**out, size_t *len) {{"
    )?;
    writeln!(out, "  JSON_Value *root;")?;
    writeln!(out, "  const JSON_Array *arr;")?;
    writeln!(out, "  {item}*items;")?;
    writeln!(out, "  size_t i, n;")?;
    writeln!(
        out,
        "  if (json == NULL || out == NULL || len == NULL) return EINVAL;"
    )?;
    writeln!(out, "  root = json_parse_string(json);")?;
    writeln!(out, "  if (root == NULL) return EINVAL;")?;
    writeln!(out, "  arr = json_value_get_array(root);")?;
    writeln!(
        out,
        "  if (arr == NULL) {{ json_value_free(root); return EINVAL; }}"
    )?;
    writeln!(out, "  n = json_array_get_count(arr);")?;
    writeln!(out, "  items = ({item}*)calloc(n ? n : 1, sizeof(*items));")?;
    writeln!(
        out,
        "  if (items == NULL) {{ json_value_free(root); return ENOMEM; }}"
    )?;
    writeln!(out, "  for (i = 0; i < n; ++i) {{")?;
    if is_object {
        let target = item_ref.unwrap_or_default();
        writeln!(
            out,
            "    const JSON_Object *sub = json_array_get_object(arr, i);"
        )?;
        writeln!(out, "    if (sub != NULL) {{")?;
        writeln!(
            out,
            "      const int rc = {target}_from_jsonObject(sub, &items[i]);"
        )?;
        writeln!(out, "      if (rc != 0) {{")?;
        writeln!(out, "        {name}_cleanup(items, n);")?;
        writeln!(out, "        json_value_free(root);")?;
        writeln!(out, "        return rc;")?;
        writeln!(out, "      }}")?;
        writeln!(out, "    }}")?;
    } else {
        match item_type {
            "integer" => writeln!(out, "    items[i] = (long)json_array_get_number(arr, i);")?,
            "number" => writeln!(out, "    items[i] = json_array_get_number(arr, i);")?,
            "boolean" => writeln!(out, "    items[i] = json_array_get_boolean(arr, i);")?,
            _ => {
                writeln!(out, "    const char *s = json_array_get_string(arr, i);")?;
                writeln!(out, "    if (s != NULL) {{")?;
                writeln!(out, "      items[i] = oasc_strdup(s);")?;
                writeln!(out, "      if (items[i] == NULL) {{")?;
                writeln!(out, "        {name}_cleanup(items, n);")?;
                writeln!(out, "        json_value_free(root);")?;
                writeln!(out, "        return ENOMEM;")?;
                writeln!(out, "      }}")?;
                writeln!(out, "    }}")?;
            }
        }
    }
    writeln!(out, "  }}")?;
    writeln!(out, "  json_value_free(root);")?;
    writeln!(out, "  *out = items;")?;
    writeln!(out, "  *len = n;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "int {name}_to_json({item}const *items, size_t len, char **json_out) {{"
    )?;
    writeln!(out, "  JSON_Value *root;")?;
    writeln!(out, "  JSON_Array *arr;")?;
    writeln!(out, "  size_t i;")?;
    writeln!(out, "  if (json_out == NULL) return EINVAL;")?;
    writeln!(out, "  root = json_value_init_array();")?;
    writeln!(out, "  if (root == NULL) return ENOMEM;")?;
    writeln!(out, "  arr = json_value_get_array(root);")?;
    writeln!(out, "  for (i = 0; i < len; ++i) {{")?;
    if is_object {
        let target = item_ref.unwrap_or_default();
        writeln!(out, "    char *sub = NULL;")?;
        writeln!(
            out,
            "    if (items[i] != NULL && {target}_to_json(items[i], &sub) == 0 && sub != NULL) {{"
        )?;
        writeln!(out, "      json_array_append_value(arr, json_parse_string(sub));")?;
        writeln!(out, "      free(sub);")?;
        writeln!(out, "    }}")?;
    } else {
        match item_type {
            "integer" => writeln!(
                out,
                "    json_array_append_number(arr, (double)items[i]);"
            )?,
            "number" => writeln!(out, "    json_array_append_number(arr, items[i]);")?,
            "boolean" => writeln!(out, "    json_array_append_boolean(arr, items[i]);")?,
            _ => writeln!(
                out,
                "    if (items[i] != NULL) json_array_append_string(arr, items[i]);"
            )?,
        }
    }
    writeln!(out, "  }}")?;
    writeln!(out, "  *json_out = json_serialize_to_string(root);")?;
    writeln!(out, "  json_value_free(root);")?;
    writeln!(out, "  if (*json_out == NULL) return ENOMEM;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    close_guard(out, opts.json_guard.as_deref())?;

    writeln!(out, "void {name}_cleanup({item}*items, size_t len) {{")?;
    writeln!(out, "  size_t i;")?;
    writeln!(out, "  if (items == NULL) return;")?;
    if is_object {
        let target = item_ref.unwrap_or_default();
        writeln!(out, "  for (i = 0; i < len; ++i)")?;
        writeln!(out, "    if (items[i] != NULL) {target}_cleanup(items[i]);")?;
    } else if item_type != "integer" && item_type != "number" && item_type != "boolean" {
        writeln!(out, "  for (i = 0; i < len; ++i)")?;
        writeln!(out, "    free(items[i]);")?;
    } else {
        writeln!(out, "  (void)i;")?;
    }
    writeln!(out, "  free(items);")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::codegen::tests::source_for;

    fn components(schemas: serde_json::Value) -> serde_json::Value {
        json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "components": { "schemas": schemas }
        })
    }

    #[test]
    fn exclusive_minimum_emits_strict_comparison() {
        let source = source_for(components(json!({
            "Count": {
                "type": "object",
                "properties": {
                    "value": { "type": "integer", "minimum": 10, "exclusiveMinimum": true }
                }
            }
        })));
        assert!(source.contains("if (obj->value <= 10) { Count_cleanup(obj); return ERANGE; }"));
    }

    #[test]
    fn inclusive_bounds_emit_non_strict_comparisons() {
        let source = source_for(components(json!({
            "Range": {
                "type": "object",
                "properties": {
                    "value": { "type": "integer", "minimum": 1, "maximum": 5 }
                }
            }
        })));
        assert!(source.contains("if (obj->value < 1) { Range_cleanup(obj); return ERANGE; }"));
        assert!(source.contains("if (obj->value > 5) { Range_cleanup(obj); return ERANGE; }"));
    }

    #[test]
    fn string_length_constraints_return_erange() {
        let source = source_for(components(json!({
            "Name": {
                "type": "object",
                "properties": {
                    "value": { "type": "string", "minLength": 2, "maxLength": 8 }
                }
            }
        })));
        assert!(source.contains("strlen(obj->value) < 2) { Name_cleanup(obj); return ERANGE; }"));
        assert!(source.contains("strlen(obj->value) > 8) { Name_cleanup(obj); return ERANGE; }"));
    }

    #[test]
    fn pattern_subset_compiles_to_string_functions() {
        let source = source_for(components(json!({
            "Codes": {
                "type": "object",
                "properties": {
                    "exact": { "type": "string", "pattern": "^ok$" },
                    "prefix": { "type": "string", "pattern": "^pre" },
                    "inner": { "type": "string", "pattern": "mid" },
                    "fancy": { "type": "string", "pattern": "^[a-z]+$" }
                }
            }
        })));
        assert!(source.contains("strcmp(obj->exact, \"ok\") != 0) { Codes_cleanup(obj); return EINVAL; }"));
        assert!(source.contains("strncmp(obj->prefix, \"pre\", 3) != 0"));
        assert!(source.contains("strstr(obj->inner, \"mid\") == NULL"));
        assert!(source.contains("oasc_regex_match(\"^[a-z]+$\", obj->fancy) != 1"));
    }

    #[test]
    fn required_fields_checked_before_read() {
        let source = source_for(components(json!({
            "Login": {
                "type": "object",
                "properties": { "user": { "type": "string" } },
                "required": ["user"]
            }
        })));
        assert!(source.contains(
            "if (!json_object_has_value(jobj, \"user\")) { Login_cleanup(obj); return EINVAL; }"
        ));
    }

    #[test]
    fn lifecycle_suite_present_for_each_struct() {
        let source = source_for(components(json!({
            "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
        })));
        for func in [
            "Pet_from_json",
            "Pet_from_jsonObject",
            "Pet_to_json",
            "Pet_cleanup",
            "Pet_eq",
            "Pet_default",
            "Pet_deepcopy",
            "Pet_display",
            "Pet_debug",
        ] {
            assert!(source.contains(func), "missing {func}");
        }
    }

    #[test]
    fn nested_object_arrays_recurse() {
        let source = source_for(components(json!({
            "Owner": {
                "type": "object",
                "properties": {
                    "pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
                }
            },
            "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
        })));
        assert!(source.contains("Pet_from_jsonObject(sub, &obj->pets[i])"));
        assert!(source.contains("Pet_cleanup(obj->pets[i])"));
    }

    #[test]
    fn bit_width_members_declared_as_bitfields() {
        use crate::codegen::CodegenOptions;
        use crate::spec::{Field, SchemaRef, Spec, StructFields};

        let mut spec = Spec::default();
        let mut sf = StructFields::new_struct();
        let mut field = Field::new("flags", SchemaRef::inline("integer"));
        field.bit_width = Some("3".to_owned());
        sf.push(field);
        spec.defined_schemas.insert("Packed".to_owned(), sf);

        let mut out = Vec::new();
        crate::codegen::emit_header(&spec, "client", &CodegenOptions::default(), &mut out)
            .unwrap();
        let header = String::from_utf8(out).unwrap();
        assert!(header.contains("int flags : 3;"));
    }

    #[test]
    fn defaults_populate_default_constructor() {
        let source = source_for(components(json!({
            "Config": {
                "type": "object",
                "properties": {
                    "mode": { "type": "string", "default": "fast" },
                    "retries": { "type": "integer", "default": 3 }
                }
            }
        })));
        assert!(source.contains("obj->mode = oasc_strdup(\"fast\");"));
        assert!(source.contains("obj->retries = 3;"));
    }
}
