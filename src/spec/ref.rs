//! `$ref` and `$dynamicRef` resolution.
//!
//! Resolution is a three-level lookup: split the reference into
//! `base#fragment`, resolve the base against the containing document, pick
//! the target document out of the registry (or stay in the current one),
//! then apply the fragment. Anything that cannot be resolved stays opaque
//! and is echoed verbatim by the writer.

use derive_more::derive::{Display, Error};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{registry::resolve_uri, DocumentRegistry, Spec};

/// Reference errors.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RefError {
    /// A reference string that does not parse.
    #[display("malformed reference: {_0}")]
    Malformed(#[error(not(source))] String),

    /// A reference that must resolve but did not.
    #[display("unresolvable reference: {_0}")]
    Unresolvable(#[error(not(source))] String),
}

/// What a reference resolved to.
#[derive(Debug, Clone)]
pub enum RefTarget<'a> {
    /// The root of a document (`#` fragment, or no fragment).
    Root(&'a Spec),
    /// A named component in a document.
    Component {
        /// The owning document.
        spec: &'a Spec,
        /// The components section (`schemas`, `responses`, ...).
        kind: String,
        /// The component key.
        name: String,
    },
}

/// The outcome of resolving a reference string.
#[derive(Debug, Clone)]
pub enum ResolvedRef<'a> {
    /// Resolution found a concrete target.
    Target(RefTarget<'a>),
    /// The reference stays opaque: external without a registered base, or a
    /// pointer descending below a component. The writer echoes it verbatim.
    Opaque(String),
}

static COMPONENT_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new("^/components/(?P<kind>[^/]+)/(?P<name>[^/]+)(?P<rest>/.*)?$").unwrap());

/// Splits a reference that points at a local component of the current
/// document into `(kind, name)`.
///
/// Deeper pointers (`/components/schemas/Pet/properties/id`) are NOT
/// component references and return `None`.
pub(crate) fn local_component_name(reference: &str) -> Option<(&str, &str)> {
    let (base, fragment) = split_fragment(reference);
    if !base.is_empty() {
        return None;
    }
    let caps = COMPONENT_FRAGMENT.captures(fragment)?;
    if caps.name("rest").is_some() {
        return None;
    }
    Some((caps.name("kind")?.as_str(), caps.name("name")?.as_str()))
}

fn split_fragment(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((base, fragment)) => (base, fragment),
        None => (reference, ""),
    }
}

/// Resolves a `$ref` (or `$dynamicRef`) from within `current`.
///
/// `$dynamicRef` fragments name a `$dynamicAnchor`; the outermost registered
/// document carrying a matching anchor defines the target, falling back to
/// the current document.
pub fn resolve_ref<'a>(
    current: &'a Spec,
    registry: &'a DocumentRegistry,
    reference: &str,
    is_dynamic: bool,
) -> ResolvedRef<'a> {
    trace!("resolving {}{reference:?}", if is_dynamic { "dynamic " } else { "" });

    let (base, fragment) = split_fragment(reference);

    if is_dynamic {
        let anchor = fragment.trim_start_matches('/');
        for (_, spec) in registry.iter() {
            if let Some(name) = spec.dynamic_anchors.get(anchor) {
                return ResolvedRef::Target(RefTarget::Component {
                    spec,
                    kind: "schemas".to_owned(),
                    name: name.clone(),
                });
            }
        }
        if let Some(name) = current.dynamic_anchors.get(anchor) {
            return ResolvedRef::Target(RefTarget::Component {
                spec: current,
                kind: "schemas".to_owned(),
                name: name.clone(),
            });
        }
        return ResolvedRef::Opaque(reference.to_owned());
    }

    // A full-URI match against a registered `$id` targets that schema
    // directly; the current (possibly not yet registered) document is
    // checked alongside the registry.
    let absolute = resolve_uri(current.base_uri(), base);
    let id_hit = |spec: &Spec| {
        spec.schema_ids
            .get(reference)
            .or_else(|| spec.schema_ids.get(absolute.as_str()).filter(|_| fragment.is_empty()))
            .cloned()
    };
    for (_, spec) in registry.iter() {
        if let Some(name) = id_hit(spec) {
            return ResolvedRef::Target(RefTarget::Component {
                spec,
                kind: "schemas".to_owned(),
                name,
            });
        }
    }
    if let Some(name) = id_hit(current) {
        return ResolvedRef::Target(RefTarget::Component {
            spec: current,
            kind: "schemas".to_owned(),
            name,
        });
    }

    let spec = if base.is_empty() {
        current
    } else {
        match registry.lookup(&absolute) {
            Some(spec) => spec,
            // External with no registered base: leave unresolved.
            None => return ResolvedRef::Opaque(reference.to_owned()),
        }
    };

    if fragment.is_empty() {
        return ResolvedRef::Target(RefTarget::Root(spec));
    }

    if let Some(caps) = COMPONENT_FRAGMENT.captures(fragment) {
        if caps.name("rest").is_some() {
            // Pointers below a component are passed through for the emitter.
            return ResolvedRef::Opaque(reference.to_owned());
        }
        if let Some((kind, name)) = caps.name("kind").zip(caps.name("name")) {
            return ResolvedRef::Target(RefTarget::Component {
                spec,
                kind: kind.as_str().to_owned(),
                name: name.as_str().to_owned(),
            });
        }
    }

    // Plain fragments may name an `$anchor` or the local part of an `$id`.
    let anchor = fragment.trim_start_matches('/');
    if let Some(name) = spec.anchors.get(anchor) {
        return ResolvedRef::Target(RefTarget::Component {
            spec,
            kind: "schemas".to_owned(),
            name: name.clone(),
        });
    }

    ResolvedRef::Opaque(reference.to_owned())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::spec::{CompositeKind, StructFields};

    fn spec_with_schema(name: &str) -> Spec {
        let mut spec = Spec::default();
        spec.defined_schemas.insert(
            name.to_owned(),
            StructFields {
                kind: CompositeKind::Struct,
                ..StructFields::default()
            },
        );
        spec
    }

    #[test]
    fn local_component_fragments() {
        assert_eq!(
            local_component_name("#/components/schemas/Pet"),
            Some(("schemas", "Pet"))
        );
        assert_eq!(
            local_component_name("#/components/parameters/limit"),
            Some(("parameters", "limit"))
        );
        // Sub-component pointers are not component references.
        assert_eq!(
            local_component_name("#/components/schemas/Pet/properties/id"),
            None
        );
        // Cross-document references are handled by full resolution instead.
        assert_eq!(
            local_component_name("other.json#/components/schemas/Pet"),
            None
        );
    }

    #[test]
    fn root_fragment_resolves_to_spec_root() {
        let spec = Spec::default();
        let registry = DocumentRegistry::new();
        assert_matches!(
            resolve_ref(&spec, &registry, "#", false),
            ResolvedRef::Target(RefTarget::Root(_))
        );
    }

    #[test]
    fn component_fragment_resolves_locally() {
        let spec = spec_with_schema("Pet");
        let registry = DocumentRegistry::new();
        assert_matches!(
            resolve_ref(&spec, &registry, "#/components/schemas/Pet", false),
            ResolvedRef::Target(RefTarget::Component { kind, name, .. }) if kind == "schemas" && name == "Pet"
        );
    }

    #[test]
    fn sub_component_pointer_stays_opaque() {
        let spec = spec_with_schema("Pet");
        let registry = DocumentRegistry::new();
        assert_matches!(
            resolve_ref(&spec, &registry, "#/components/schemas/Pet/properties/id", false),
            ResolvedRef::Opaque(_)
        );
    }

    #[test]
    fn unregistered_external_base_stays_opaque() {
        let spec = Spec::default();
        let registry = DocumentRegistry::new();
        assert_matches!(
            resolve_ref(
                &spec,
                &registry,
                "https://elsewhere.example/x.json#/components/schemas/Pet",
                false
            ),
            ResolvedRef::Opaque(_)
        );
    }

    #[test]
    fn registered_external_base_resolves() {
        let mut other = spec_with_schema("Pet");
        other.self_uri = Some("https://a.example/common.json".to_owned());
        let mut registry = DocumentRegistry::new();
        registry.register("https://a.example/common.json", other);

        let mut current = Spec::default();
        current.document_uri = Some("https://a.example/openapi.json".to_owned());

        assert_matches!(
            resolve_ref(&current, &registry, "common.json#/components/schemas/Pet", false),
            ResolvedRef::Target(RefTarget::Component { name, .. }) if name == "Pet"
        );
    }

    #[test]
    fn dynamic_anchor_outermost_wins() {
        let mut outer = spec_with_schema("Node");
        outer.dynamic_anchors.insert("node".to_owned(), "Node".to_owned());
        let mut inner = spec_with_schema("OtherNode");
        inner
            .dynamic_anchors
            .insert("node".to_owned(), "OtherNode".to_owned());

        let mut registry = DocumentRegistry::new();
        registry.register("https://a.example/outer.json", outer);
        registry.register("https://a.example/inner.json", inner);

        let current = Spec::default();
        let resolved = resolve_ref(&current, &registry, "#node", true);
        assert_matches!(
            resolved,
            ResolvedRef::Target(RefTarget::Component { name, .. }) if name == "Node"
        );
    }

    #[test]
    fn anchor_fragment_resolves() {
        let mut spec = spec_with_schema("Pet");
        spec.anchors.insert("pet".to_owned(), "Pet".to_owned());
        let registry = DocumentRegistry::new();
        assert_matches!(
            resolve_ref(&spec, &registry, "#pet", false),
            ResolvedRef::Target(RefTarget::Component { name, .. }) if name == "Pet"
        );
    }
}
