//! API metadata objects.

use indexmap::IndexMap;

/// Metadata about the API.
///
/// See <https://spec.openapis.org/oas/v3.2.0#info-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    /// The title of the API. REQUIRED.
    pub title: String,
    /// The version of this OpenAPI document. REQUIRED.
    pub version: String,
    /// A short summary of the API.
    pub summary: Option<String>,
    /// A description of the API.
    pub description: Option<String>,
    /// A URL to the Terms of Service.
    pub terms_of_service: Option<String>,
    /// Contact information.
    pub contact: Option<Contact>,
    /// License information.
    pub license: Option<License>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// Contact information for the exposed API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    /// The identifying name of the contact person/organization.
    pub name: Option<String>,
    /// A URL for the contact information.
    pub url: Option<String>,
    /// An email address.
    pub email: Option<String>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// License information for the exposed API.
///
/// `name` is required; `identifier` and `url` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct License {
    /// The license name. REQUIRED.
    pub name: String,
    /// An SPDX license identifier.
    pub identifier: Option<String>,
    /// A URL to the license text.
    pub url: Option<String>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl License {
    /// `true` when the mutually exclusive `identifier`/`url` pair is
    /// violated.
    pub fn has_field_conflict(&self) -> bool {
        self.identifier.is_some() && self.url.is_some()
    }
}
