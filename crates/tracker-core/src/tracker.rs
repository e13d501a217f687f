//! Tracker implementation
//!
//! The Tracker reconciles the catalog's view of one repository with the
//! package versions present in its source tree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracker_fs::{NormalizedPath, checksum, io};
use tracker_meta::{TrackerSettings, VersionDir, VersionDocument};

use crate::collector::ErrorsCollector;
use crate::package::{POLICIES_KEY, PackageRecord};
use crate::reconcile::{DigestReconciler, Outcome};
use crate::repository::{PackageVersionKey, Repository};
use crate::services::{CatalogReader, CatalogWriter, Cloner, ImageStore, LogoFetcher};
use crate::source_link::source_link;
use crate::versions::VersionSet;
use crate::{Error, Result};

/// Counts from one tracking run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackReport {
    /// Versions submitted to the catalog
    pub registered: usize,
    /// Versions already registered and left alone
    pub skipped: usize,
    /// Versions removed from the catalog
    pub unregistered: usize,
    /// Isolated errors handed to the collector
    pub failed: usize,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
}

/// The collaborators a run talks to.
#[derive(Clone)]
pub struct TrackerServices {
    pub cloner: Arc<dyn Cloner>,
    pub catalog_reader: Arc<dyn CatalogReader>,
    pub catalog_writer: Arc<dyn CatalogWriter>,
    pub images: Arc<dyn ImageStore>,
    pub logos: Arc<dyn LogoFetcher>,
    pub errors: Arc<dyn ErrorsCollector>,
}

/// Registers and unregisters the policy packages of one repository.
///
/// A run is sequential: packages in directory order, each package's
/// versions newest first, then the unregister pass. Failures confined to
/// one package or version are reported to the errors collector and the
/// run carries on.
pub struct Tracker {
    repository: Repository,
    settings: TrackerSettings,
    services: TrackerServices,
    cancel: CancellationToken,
}

impl Tracker {
    pub fn new(
        repository: Repository,
        settings: TrackerSettings,
        services: TrackerServices,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            repository,
            settings,
            services,
            cancel,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Run one reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error only when the source cannot be cloned, the
    /// registered digests cannot be loaded, or the packages directory
    /// cannot be listed. Cancellation ends the run early with `Ok`.
    pub fn track(&self) -> Result<TrackReport> {
        let span = tracing::info_span!("track", repo = %self.repository.name);
        let _entered = span.enter();

        tracing::debug!("Cloning repository");
        let source = self
            .services
            .cloner
            .clone_repository(&self.repository)
            .map_err(|source| Error::Clone {
                url: self.repository.url.clone(),
                source,
            })?;

        let registered = self
            .services
            .catalog_reader
            .registered_digests(self.repository.repository_id)
            .map_err(Error::RegisteredDigests)?;
        let mut reconciler =
            DigestReconciler::new(registered, self.settings.bypass_digest_check);

        let packages_dir = source.packages_dir();
        let packages = io::list_dirs(&packages_dir).map_err(|source| Error::ReadPackages {
            path: packages_dir.to_native(),
            source,
        })?;

        let mut report = TrackReport::default();
        for package in &packages {
            if self.cancelled(&mut report) {
                return Ok(report);
            }
            self.track_package(&packages_dir, package, &mut reconciler, &mut report);
        }

        for key in reconciler.stale() {
            if self.cancelled(&mut report) {
                return Ok(report);
            }
            match self.unregister(&key) {
                Ok(()) => report.unregistered += 1,
                Err(err) => self.warn(err, &mut report),
            }
        }

        tracing::info!(
            registered = report.registered,
            skipped = report.skipped,
            unregistered = report.unregistered,
            failed = report.failed,
            "Tracking completed"
        );
        Ok(report)
    }

    fn cancelled(&self, report: &mut TrackReport) -> bool {
        if self.cancel.is_cancelled() {
            tracing::info!("Tracking cancelled");
            report.cancelled = true;
        }
        report.cancelled
    }

    /// Process every version of one package, newest first.
    ///
    /// A descriptor that cannot be loaded stops the package: older
    /// versions are not looked at.
    fn track_package(
        &self,
        packages_dir: &NormalizedPath,
        package: &str,
        reconciler: &mut DigestReconciler,
        report: &mut TrackReport,
    ) {
        let package_dir = packages_dir.join(package);
        let versions = match VersionSet::scan(&package_dir) {
            Ok((versions, rejected)) => {
                for err in rejected {
                    self.warn(err, report);
                }
                versions
            }
            Err(err) => {
                self.warn(err, report);
                return;
            }
        };

        for (i, entry) in versions.iter().enumerate() {
            let dir = VersionDir::new(package_dir.join(&entry.dir));
            let doc = match dir.load_descriptor() {
                Ok(doc) => doc,
                Err(source) => {
                    self.warn(
                        Error::Descriptor {
                            package: package.to_string(),
                            version: entry.dir.clone(),
                            source,
                        },
                        report,
                    );
                    break;
                }
            };

            let key = PackageVersionKey::new(&doc.metadata.name, &doc.metadata.version);
            if reconciler.observe(&key) == Outcome::Skip {
                report.skipped += 1;
                continue;
            }

            tracing::debug!(name = %key.name, v = %key.version, "Registering package version");
            let version_path = NormalizedPath::new(package).join(&entry.dir);
            match self.register(&dir, &version_path, doc, i == 0) {
                Ok(()) => report.registered += 1,
                Err(err) => self.warn(err, report),
            }
        }
    }

    /// Assemble the record for one version and submit it.
    ///
    /// Only the newest version of a package (`store_logo`) fetches and
    /// stores the logo.
    fn register(
        &self,
        dir: &VersionDir,
        version_path: &NormalizedPath,
        doc: VersionDocument,
        store_logo: bool,
    ) -> Result<()> {
        let md = &doc.metadata;
        let package = || md.name.clone();
        let version = || md.version.clone();

        let mut record = PackageRecord::from_metadata(md).map_err(|source| Error::Prepare {
            package: package(),
            version: version(),
            source,
        })?;
        record.repository = self.repository.clone();
        record
            .links
            .push(source_link(&self.repository.url, version_path));

        let policies = dir.load_payload().map_err(|source| Error::Payload {
            package: package(),
            version: version(),
            source,
        })?;
        record.digest = checksum::compute_checksum(&[&doc.raw, &policies]);
        record
            .data
            .insert(POLICIES_KEY.to_string(), payload_value(policies));

        if store_logo && let Some(logo_url) = md.logo_url() {
            let data = self
                .services
                .logos
                .download(logo_url)
                .map_err(|source| Error::LogoDownload {
                    package: package(),
                    version: version(),
                    source,
                })?;
            match self.services.images.save_image(&data) {
                Ok(image_id) => record.logo_image_id = Some(image_id),
                Err(err) if err.is_unsupported_format() => {
                    tracing::debug!(
                        name = %md.name,
                        v = %md.version,
                        url = %logo_url,
                        "Logo has an unsupported image format, registering without it"
                    );
                }
                Err(source) => {
                    return Err(Error::LogoStore {
                        package: package(),
                        version: version(),
                        source,
                    });
                }
            }
        }

        self.services
            .catalog_writer
            .register(&record)
            .map_err(|source| Error::Register {
                package: package(),
                version: version(),
                source,
            })
    }

    fn unregister(&self, key: &str) -> Result<()> {
        let key = PackageVersionKey::parse(key).ok_or_else(|| Error::MalformedKey {
            key: key.to_string(),
        })?;

        tracing::debug!(name = %key.name, v = %key.version, "Unregistering package");
        let record = PackageRecord::for_unregister(&key, self.repository.clone());
        self.services
            .catalog_writer
            .unregister(&record)
            .map_err(|source| Error::Unregister {
                package: key.name,
                version: key.version,
                source,
            })
    }

    /// Report an isolated error and log it as a warning.
    fn warn(&self, err: Error, report: &mut TrackReport) {
        tracing::warn!(error = %err, "Tracking error");
        report.failed += 1;
        self.services
            .errors
            .append(self.repository.repository_id, err);
    }
}

/// Payload as stored in the record: text when it is UTF-8, raw bytes otherwise.
fn payload_value(payload: Vec<u8>) -> Value {
    match String::from_utf8(payload) {
        Ok(text) => Value::String(text),
        Err(err) => Value::Array(err.into_bytes().into_iter().map(Value::from).collect()),
    }
}
