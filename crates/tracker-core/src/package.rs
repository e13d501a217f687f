//! Package records submitted to the catalog

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracker_meta::validation::{parse_created_at, validate};
use tracker_meta::{Link, Maintainer, PackageMetadata, Provider};

use crate::repository::{PackageVersionKey, Repository};

/// Key of the raw policy payload in [`PackageRecord::data`].
pub const POLICIES_KEY: &str = "policies";

/// One package version as the catalog stores it.
///
/// Built fresh for every version and never reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    /// Identifier assigned by the image store to the stored logo
    pub logo_image_id: Option<String>,
    pub keywords: Vec<String>,
    pub home_url: Option<String>,
    pub readme: Option<String>,
    pub install: Option<String>,
    pub license: Option<String>,
    pub app_version: Option<String>,
    pub deprecated: bool,
    pub prerelease: bool,
    pub contains_security_updates: bool,
    pub maintainers: Vec<Maintainer>,
    pub provider: Option<Provider>,
    pub links: Vec<Link>,
    pub annotations: BTreeMap<String, String>,
    pub created_at: Option<DateTime<Utc>>,
    /// `sha256:<hex>` over the descriptor and payload
    pub digest: String,
    /// Opaque payloads; the policy body lives under [`POLICIES_KEY`]
    pub data: BTreeMap<String, Value>,
    pub repository: Repository,
}

impl PackageRecord {
    /// Prepare a record from validated metadata.
    ///
    /// Fails when the metadata does not satisfy the catalog's required
    /// fields. Source link, payload, digest, logo and repository are
    /// filled in by the caller.
    pub fn from_metadata(md: &PackageMetadata) -> tracker_meta::Result<Self> {
        validate(md)?;
        let created_at = md.created_at.as_deref().map(parse_created_at).transpose()?;

        Ok(Self {
            name: md.name.clone(),
            version: md.version.clone(),
            display_name: md.display_name.clone(),
            description: md.description.clone(),
            logo_url: md.logo_url().map(str::to_string),
            keywords: md.keywords.clone(),
            home_url: md.home_url.clone(),
            readme: md.readme.clone(),
            install: md.install.clone(),
            license: md.license.clone(),
            app_version: md.app_version.clone(),
            deprecated: md.deprecated,
            prerelease: md.prerelease,
            contains_security_updates: md.contains_security_updates,
            maintainers: md.maintainers.clone(),
            provider: md.provider.clone(),
            links: md.links.clone(),
            annotations: md.annotations.clone(),
            created_at,
            ..Default::default()
        })
    }

    /// Minimal record identifying a version to remove from the catalog.
    pub fn for_unregister(key: &PackageVersionKey, repository: Repository) -> Self {
        Self {
            name: key.name.clone(),
            version: key.version.clone(),
            repository,
            ..Default::default()
        }
    }

    pub fn key(&self) -> PackageVersionKey {
        PackageVersionKey::new(&self.name, &self.version)
    }

    /// The raw policy payload, if attached.
    pub fn policies(&self) -> Option<&str> {
        self.data.get(POLICIES_KEY).and_then(Value::as_str)
    }
}
