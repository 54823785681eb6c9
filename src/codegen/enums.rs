//! Enum extraction and generation.

use std::io::Write;

use super::{c_ident, close_guard, open_guard, CodegenOptions, Error};
use crate::spec::StructFields;

/// Emits the enum declaration and helper prototypes.
///
/// Every generated enum carries a `<Name>_UNKNOWN = 0` member; both helper
/// functions route unmatched input to it.
pub(crate) fn write_enum_header(
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    writeln!(out, "enum {name} {{")?;
    write!(out, "  {name}_UNKNOWN = 0")?;
    for member in &sf.members {
        write!(out, ",\n  {name}_{}", c_ident(member))?;
    }
    writeln!(out, "\n}};")?;
    writeln!(out)?;

    open_guard(out, opts.enum_guard.as_deref())?;
    writeln!(
        out,
        "extern int {name}_from_str(const char *str, enum {name} *val);"
    )?;
    writeln!(out, "extern int {name}_to_str(enum {name} val, char **str_out);")?;
    close_guard(out, opts.enum_guard.as_deref())?;
    writeln!(out)?;
    Ok(())
}

/// Emits the switch-based `_to_str` / `_from_str` implementations.
pub(crate) fn write_enum_source(
    out: &mut dyn Write,
    name: &str,
    sf: &StructFields,
    opts: &CodegenOptions,
) -> Result<(), Error> {
    open_guard(out, opts.enum_guard.as_deref())?;

    writeln!(out, "int {name}_to_str(enum {name} val, char **str_out) {{")?;
    writeln!(out, "  if (str_out == NULL) return EINVAL;")?;
    writeln!(out, "  switch (val) {{")?;
    for member in &sf.members {
        let ident = c_ident(member);
        writeln!(out, "    case {name}_{ident}:")?;
        writeln!(out, "      *str_out = oasc_strdup(\"{member}\");")?;
        writeln!(out, "      break;")?;
    }
    writeln!(out, "    case {name}_UNKNOWN:")?;
    writeln!(out, "    default:")?;
    writeln!(out, "      *str_out = oasc_strdup(\"UNKNOWN\");")?;
    writeln!(out, "      break;")?;
    writeln!(out, "  }}")?;
    writeln!(out, "  if (*str_out == NULL) return ENOMEM;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "int {name}_from_str(const char *const str, enum {name} *val) {{"
    )?;
    writeln!(out, "  if (val == NULL) return EINVAL;")?;
    writeln!(out, "  else if (str == NULL) *val = {name}_UNKNOWN;")?;
    for member in &sf.members {
        let ident = c_ident(member);
        writeln!(
            out,
            "  else if (strcmp(str, \"{member}\") == 0) *val = {name}_{ident};"
        )?;
    }
    writeln!(out, "  else *val = {name}_UNKNOWN;")?;
    writeln!(out, "  return 0;")?;
    writeln!(out, "}}")?;

    close_guard(out, opts.enum_guard.as_deref())?;
    writeln!(out)?;
    Ok(())
}
