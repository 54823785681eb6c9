//! The emit-time shape of a component schema.

use super::{Any, Discriminator, SchemaRef};

/// What a lowered component is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeKind {
    /// A plain object: fields are struct members.
    #[default]
    Struct,
    /// A string enumeration: `members` holds the values.
    Enum,
    /// A `oneOf`/`anyOf` union: fields are the variants.
    Union,
}

/// One member of a composite: a struct field or a union variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    /// Member name (property name, or variant name for unions).
    pub name: String,
    /// The member's schema descriptor; type, reference, constraints, and
    /// item metadata all live here.
    pub schema: SchemaRef,
    /// `true` when listed in the parent's `required`.
    pub required: bool,
    /// Bit-field width for C-sourced schemas, verbatim.
    pub bit_width: Option<String>,
    /// Default value captured at the field level.
    pub default_value: Option<Any>,
}

impl Field {
    /// Creates a field from a name and schema.
    pub fn new(name: impl Into<String>, schema: SchemaRef) -> Self {
        Self {
            name: name.into(),
            schema,
            ..Self::default()
        }
    }
}

/// A named composite schema lowered for emission.
///
/// The loader produces these from `components/schemas` entries (and from
/// inline promotion); the code emitter walks them; the writer turns them
/// back into schema JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructFields {
    /// Struct, enum, or union.
    pub kind: CompositeKind,
    /// Ordered members; struct fields or union variants.
    pub fields: Vec<Field>,
    /// Enum member values, in document order.
    pub members: Vec<String>,
    /// Schema `description`.
    pub description: Option<String>,
    /// Schema `deprecated` flag.
    pub deprecated: Option<bool>,
    /// Discriminator, for unions.
    pub discriminator: Option<Discriminator>,
}

impl StructFields {
    /// Creates an empty struct composite.
    pub fn new_struct() -> Self {
        Self::default()
    }

    /// Creates an enum composite from member values.
    pub fn new_enum(members: Vec<String>) -> Self {
        Self {
            kind: CompositeKind::Enum,
            members,
            ..Self::default()
        }
    }

    /// Creates a union composite from variant fields.
    pub fn new_union(fields: Vec<Field>) -> Self {
        Self {
            kind: CompositeKind::Union,
            fields,
            ..Self::default()
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Appends a field.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Names of required fields, in order.
    pub fn required_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup() {
        let mut sf = StructFields::new_struct();
        sf.push(Field::new("id", SchemaRef::inline("integer")));
        sf.push(Field::new("name", SchemaRef::inline("string")));

        assert_eq!(sf.field("name").unwrap().schema.inline_type.as_deref(), Some("string"));
        assert!(sf.field("missing").is_none());
    }
}
