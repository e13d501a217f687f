//! Browsable source links for package versions

use std::sync::LazyLock;

use regex::Regex;
use tracker_fs::NormalizedPath;
use tracker_meta::Link;

/// Hosted git URL, optionally followed by the subpath holding the packages.
static REPO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https://(github|gitlab)\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+)/?(.*)$")
        .expect("valid repository URL regex")
});

/// Name of the link added to every registered version.
pub const SOURCE_LINK_NAME: &str = "source";

/// Supported git hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitProvider {
    GitHub,
    GitLab,
}

impl GitProvider {
    fn from_host(host: &str) -> Option<Self> {
        match host {
            "github" => Some(Self::GitHub),
            "gitlab" => Some(Self::GitLab),
            _ => None,
        }
    }

    /// Path segment for viewing a file on the default branch.
    pub fn blob_path(&self) -> &'static str {
        match self {
            Self::GitHub => "blob/master",
            Self::GitLab => "-/blob/master",
        }
    }
}

/// The parts of a repository URL on a supported provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    /// `https://<provider>.com/<owner>/<repo>`
    pub base_url: String,
    pub provider: GitProvider,
    /// Subpath after the repository, without a trailing slash
    pub packages_path: String,
}

impl RepoUrl {
    /// Parse `url`, returning `None` for unrecognized providers or shapes.
    pub fn parse(url: &str) -> Option<Self> {
        let captures = REPO_URL_RE.captures(url)?;
        let provider = GitProvider::from_host(captures.get(2)?.as_str())?;
        Some(Self {
            base_url: captures.get(1)?.as_str().to_string(),
            provider,
            packages_path: captures
                .get(3)
                .map(|m| m.as_str().trim_end_matches('/').to_string())
                .unwrap_or_default(),
        })
    }
}

/// Build the `source` link for the version at `version_path`.
///
/// `version_path` is relative to the packages subpath
/// (`<package>/<version>`). The URL is base URL, blob segment, packages
/// subpath, and version path, in that order. An unrecognized repository
/// URL leaves the first three empty; the resulting link is kept as is.
pub fn source_link(repository_url: &str, version_path: &NormalizedPath) -> Link {
    let (base_url, blob_path, packages_path) = match RepoUrl::parse(repository_url) {
        Some(url) => (url.base_url, url.provider.blob_path(), url.packages_path),
        None => (String::new(), "", String::new()),
    };
    let path = NormalizedPath::new(packages_path).join(version_path.as_str());

    Link::new(SOURCE_LINK_NAME, format!("{base_url}/{blob_path}/{path}"))
}
