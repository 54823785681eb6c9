//! Tools to load, validate, and re-emit [OpenAPI v3.2.x] specifications and
//! to generate C client SDKs from them.
//!
//! The crate is organised as a pipeline:
//!
//! - [`loader`] ingests a parsed JSON (or YAML) document, validates it, and
//!   materialises a [`Spec`](spec::Spec), registering documents in a
//!   [`DocumentRegistry`](spec::DocumentRegistry) for cross-document `$ref`
//!   resolution.
//! - [`writer`] serialises a [`Spec`](spec::Spec) back to canonical OpenAPI
//!   JSON, preserving insertion order and specification extensions.
//! - [`codegen`] emits a C header/source pair (types, JSON codecs, lifecycle
//!   helpers, HTTP client functions), a test suite, and a `CMakeLists.txt`.
//! - [`cparse`] goes the other way: C header declarations to JSON Schema.
//!
//! # Example
//!
//! ```no_run
//! let json = std::fs::read_to_string("path/to/openapi.json").unwrap();
//!
//! let mut registry = oasc::spec::DocumentRegistry::new();
//! match oasc::from_json(&json, &mut registry) {
//!     Ok(spec) => println!("loaded {} schemas", spec.defined_schemas.len()),
//!     Err(err) => println!("error: {err}"),
//! }
//! ```
//!
//! [OpenAPI v3.2.x]: https://spec.openapis.org/oas/v3.2.0

#![warn(missing_docs)]

pub mod codegen;
pub mod cparse;
mod error;
pub mod loader;
pub mod spec;
pub mod url;
pub mod writer;

pub use self::error::Error;
use self::spec::{DocumentRegistry, Spec};

/// Loads and validates an OpenAPI spec (JSON format) from a string.
///
/// The document is registered in `registry` under its base URI so that later
/// loads can resolve references into it.
pub fn from_json(json: impl AsRef<str>, registry: &mut DocumentRegistry) -> Result<Spec, Error> {
    let value: serde_json::Value = serde_json::from_str(json.as_ref())?;
    Ok(loader::load_spec(&value, None, registry)?)
}

/// Loads and validates an OpenAPI spec (YAML format) from a string.
pub fn from_yaml(yaml: impl AsRef<str>, registry: &mut DocumentRegistry) -> Result<Spec, Error> {
    let value: serde_json::Value = serde_yml::from_str(yaml.as_ref())?;
    Ok(loader::load_spec(&value, None, registry)?)
}

/// Serialises a spec to a canonical OpenAPI JSON string.
pub fn to_json(spec: &Spec) -> Result<String, Error> {
    let value = writer::write_spec(spec)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
