//! Validation of package metadata against the catalog's required fields

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::schema::PackageMetadata;
use crate::{Error, Result};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid package name regex"));

/// Check that `md` can be turned into a catalog record.
///
/// All problems are reported together in a single error.
pub fn validate(md: &PackageMetadata) -> Result<()> {
    let mut problems = Vec::new();

    if md.name.is_empty() {
        problems.push("name not provided".to_string());
    } else if !NAME_RE.is_match(&md.name) {
        problems.push(format!(
            "invalid name '{}' (only lowercase letters, digits and dashes allowed)",
            md.name
        ));
    }

    if md.version.is_empty() {
        problems.push("version not provided".to_string());
    } else if let Err(e) = semver::Version::parse(&md.version) {
        problems.push(format!("invalid version '{}' (semver expected): {e}", md.version));
    }

    if let Some(created_at) = &md.created_at
        && let Err(e) = parse_created_at(created_at)
    {
        problems.push(e.to_string());
    }

    for maintainer in &md.maintainers {
        if maintainer.email.trim().is_empty() {
            problems.push(format!("maintainer '{}' has no email", maintainer.name));
        }
    }

    for link in &md.links {
        if link.name.trim().is_empty() || link.url.trim().is_empty() {
            problems.push("link name and url must be provided".to_string());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::invalid(problems.join("; ")))
    }
}

/// Parse an RFC 3339 `createdAt` value.
pub fn parse_created_at(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::invalid(format!("invalid createdAt '{value}' (RFC 3339 expected): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Link, Maintainer};
    use rstest::rstest;

    fn valid() -> PackageMetadata {
        PackageMetadata {
            name: "k8s-required-labels".into(),
            version: "1.2.0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_metadata_passes() {
        assert!(validate(&valid()).is_ok());
    }

    #[rstest]
    #[case("Upper")]
    #[case("with space")]
    #[case("at@sign")]
    fn test_invalid_names_rejected(#[case] name: &str) {
        let md = PackageMetadata {
            name: name.into(),
            ..valid()
        };
        let err = validate(&md).unwrap_err().to_string();
        assert!(err.contains("invalid name"), "got: {err}");
    }

    #[test]
    fn test_non_semver_version_rejected() {
        let md = PackageMetadata {
            version: "1.2".into(),
            ..valid()
        };
        assert!(validate(&md).unwrap_err().to_string().contains("semver expected"));
    }

    #[test]
    fn test_all_problems_reported_together() {
        let md = PackageMetadata {
            maintainers: vec![Maintainer {
                name: "Ops".into(),
                email: String::new(),
            }],
            links: vec![Link::new("docs", "")],
            created_at: Some("yesterday".into()),
            ..valid()
        };
        let err = validate(&md).unwrap_err().to_string();
        assert!(err.contains("maintainer 'Ops' has no email"));
        assert!(err.contains("link name and url"));
        assert!(err.contains("invalid createdAt"));
    }

    #[test]
    fn test_parse_created_at_normalizes_to_utc() {
        let ts = parse_created_at("2023-01-02T03:04:05+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-01-02T01:04:05+00:00");
    }
}
