//! The cross-document registry.

use log::debug;

use super::Spec;

/// URI-keyed collection of loaded documents.
///
/// The caller constructs the registry before loading and may extend it
/// between loads; it outlives any single [`Spec`] and is consulted during
/// reference resolution. Entries keep registration order, which also defines
/// the outermost-first order for `$dynamicRef` resolution.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    docs: Vec<(String, Spec)>,
}

impl DocumentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The normalized base URI a spec registers under: `$self` wins, then
    /// the retrieval URI, then empty.
    pub fn base_uri_of(spec: &Spec) -> &str {
        spec.base_uri().unwrap_or("")
    }

    /// Registers a document under `base_uri`.
    ///
    /// Additive, and idempotent on exact match: re-registering an existing
    /// URI replaces that entry instead of appending.
    pub fn register(&mut self, base_uri: impl Into<String>, spec: Spec) {
        let base_uri = base_uri.into();
        debug!("registering document under {base_uri:?}");
        if let Some(entry) = self.docs.iter_mut().find(|(uri, _)| *uri == base_uri) {
            entry.1 = spec;
        } else {
            self.docs.push((base_uri, spec));
        }
    }

    /// Looks up a document by exact base URI.
    pub fn lookup(&self, base_uri: &str) -> Option<&Spec> {
        self.docs
            .iter()
            .find(|(uri, _)| uri == base_uri)
            .map(|(_, spec)| spec)
    }

    /// Iterates registered documents in registration order (outermost
    /// first).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Spec)> {
        self.docs.iter().map(|(uri, spec)| (uri.as_str(), spec))
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Resolves `target` against an optional base URI.
///
/// Absolute targets pass through; relative targets join onto an absolute
/// base; with no usable base the target is returned as-is.
pub(crate) fn resolve_uri(base: Option<&str>, target: &str) -> String {
    if target.is_empty() {
        return base.unwrap_or("").to_owned();
    }
    if url::Url::parse(target).is_ok() {
        return target.to_owned();
    }
    if let Some(base) = base {
        if let Ok(base_url) = url::Url::parse(base) {
            if let Ok(joined) = base_url.join(target) {
                return joined.to_string();
            }
        }
    }
    target.to_owned()
}
