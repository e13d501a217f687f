//! Package version descriptor schema
//!
//! Mirrors the `artifacthub.yaml` document found in every version
//! directory:
//!
//! ```yaml
//! name: k8s-required-labels
//! version: 1.2.0
//! displayName: Required labels
//! logoURL: https://example.com/logo.png
//! keywords: [labels, gatekeeper]
//! maintainers:
//!   - name: Platform team
//!     email: platform@example.com
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata describing one package version.
///
/// `name` and `version` are authoritative over the directory the
/// descriptor was found in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// RFC 3339 timestamp of the version's release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Remote logo image; only the newest version's logo is stored
    #[serde(default, rename = "logoURL", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, rename = "homeURL", skip_serializing_if = "Option::is_none")]
    pub home_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    #[serde(default)]
    pub contains_security_updates: bool,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub prerelease: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<Maintainer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl PackageMetadata {
    /// The logo reference, if one is set and non-blank.
    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// A named link attached to a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A package maintainer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// The organization or individual publishing the package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub name: String,
}
