//! Test suite generation (`schema2tests`).
//!
//! Emits a `greatest.h`-style test header exercising the generated
//! lifecycle functions per schema: default construction, deep copy,
//! equality, and a JSON round trip; enum helpers get a string round trip
//! and the UNKNOWN fallback.

use std::io::Write;

use super::{c_ident, ordered_schemas, SchemaEntry};
use crate::spec::{CompositeKind, Spec};

/// Emits the generated test suite for `spec`, including `header_name` and
/// guarded by a macro derived from `suite_name`.
pub fn emit_tests(
    spec: &Spec,
    header_name: &str,
    suite_name: &str,
    out: &mut dyn Write,
) -> Result<(), super::Error> {
    let guard = format!("TEST_{}_H", c_ident(suite_name).to_ascii_uppercase());
    let suite = c_ident(suite_name);

    writeln!(out, "/* Generated by oasc. Do not edit. */")?;
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include <stdlib.h>")?;
    writeln!(out, "#include <string.h>")?;
    writeln!(out)?;
    writeln!(out, "#include <greatest.h>")?;
    writeln!(out)?;
    writeln!(out, "#include \"{header_name}\"")?;
    writeln!(out)?;

    let mut test_names = Vec::new();

    for (name, entry) in ordered_schemas(spec) {
        let name = c_ident(name);
        let SchemaEntry::Composite(sf) = entry else {
            continue;
        };

        match sf.kind {
            CompositeKind::Enum => {
                let test = format!("test_{name}_str_round_trip");
                writeln!(out, "TEST {test}(void) {{")?;
                writeln!(out, "  enum {name} val = {name}_UNKNOWN;")?;
                writeln!(out, "  char *s = NULL;")?;
                if let Some(member) = sf.members.first() {
                    let ident = c_ident(member);
                    writeln!(out, "  ASSERT_EQ(0, {name}_from_str(\"{member}\", &val));")?;
                    writeln!(out, "  ASSERT_EQ({name}_{ident}, val);")?;
                    writeln!(out, "  ASSERT_EQ(0, {name}_to_str(val, &s));")?;
                    writeln!(out, "  ASSERT_STR_EQ(\"{member}\", s);")?;
                    writeln!(out, "  free(s);")?;
                }
                writeln!(
                    out,
                    "  ASSERT_EQ(0, {name}_from_str(\"no such member\", &val));"
                )?;
                writeln!(out, "  ASSERT_EQ({name}_UNKNOWN, val);")?;
                writeln!(out, "  PASS();")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
                test_names.push(test);
            }
            CompositeKind::Struct => {
                let test = format!("test_{name}_lifecycle");
                writeln!(out, "TEST {test}(void) {{")?;
                writeln!(out, "  struct {name} *a = NULL;")?;
                writeln!(out, "  struct {name} *b = NULL;")?;
                writeln!(out, "  ASSERT_EQ(0, {name}_default(&a));")?;
                writeln!(out, "  ASSERT_EQ(0, {name}_deepcopy(a, &b));")?;
                writeln!(out, "  ASSERT({name}_eq(a, b));")?;
                writeln!(out, "  {name}_cleanup(a);")?;
                writeln!(out, "  {name}_cleanup(b);")?;
                writeln!(out, "  PASS();")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
                test_names.push(test);

                let test = format!("test_{name}_json_round_trip");
                writeln!(out, "TEST {test}(void) {{")?;
                writeln!(out, "  struct {name} *a = NULL;")?;
                writeln!(out, "  struct {name} *b = NULL;")?;
                writeln!(out, "  char *json = NULL;")?;
                writeln!(out, "  ASSERT_EQ(0, {name}_default(&a));")?;
                writeln!(out, "  ASSERT_EQ(0, {name}_to_json(a, &json));")?;
                writeln!(out, "  ASSERT_EQ(0, {name}_from_json(json, &b));")?;
                writeln!(out, "  ASSERT({name}_eq(a, b));")?;
                writeln!(out, "  free(json);")?;
                writeln!(out, "  {name}_cleanup(a);")?;
                writeln!(out, "  {name}_cleanup(b);")?;
                writeln!(out, "  PASS();")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
                test_names.push(test);
            }
            CompositeKind::Union => {
                let test = format!("test_{name}_unknown_rejected");
                writeln!(out, "TEST {test}(void) {{")?;
                writeln!(out, "  struct {name} *u = NULL;")?;
                writeln!(
                    out,
                    "  ASSERT_EQ(EINVAL, {name}_from_json(\"{{}}\", &u));"
                )?;
                writeln!(out, "  PASS();")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
                test_names.push(test);
            }
        }
    }

    writeln!(out, "SUITE({suite}_suite) {{")?;
    for test in &test_names {
        writeln!(out, "  RUN_TEST({test});")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "#endif /* {guard} */")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codegen::tests::load;

    #[test]
    fn suite_covers_each_composite() {
        let spec = load(json!({
            "openapi": "3.2.0",
            "info": { "title": "t", "version": "1" },
            "components": {
                "schemas": {
                    "Color": { "type": "string", "enum": ["RED"] },
                    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
                }
            }
        }));

        let mut out = Vec::new();
        emit_tests(&spec, "client.h", "client", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("#include \"client.h\""));
        assert!(text.contains("TEST test_Color_str_round_trip(void)"));
        assert!(text.contains("TEST test_Pet_lifecycle(void)"));
        assert!(text.contains("TEST test_Pet_json_round_trip(void)"));
        assert!(text.contains("SUITE(client_suite)"));
        assert!(text.contains("RUN_TEST(test_Pet_lifecycle);"));
    }
}
