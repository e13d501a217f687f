//! Track command implementation

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;
use tracker_core::{
    CancellationToken, ErrorCollector, Repository, TrackReport, Tracker, TrackerServices,
};
use tracker_meta::{RepositorySource, TrackerSettings, load_config};
use uuid::Uuid;

use crate::adapters::{FsImageStore, HttpLogoFetcher, LedgerCatalog, LocalCheckout};
use crate::error::{CliError, Result};

/// Outcome of one repository's run.
#[derive(Debug, Serialize)]
pub struct RepositorySummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<TrackReport>,
    /// Set when the run could not complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
    pub errors: Vec<String>,
}

/// Run the track command
pub fn run_track(
    config_path: &Path,
    bypass_digest_check: bool,
    only: &[String],
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let settings = TrackerSettings {
        bypass_digest_check: bypass_digest_check || config.tracker.settings.bypass_digest_check,
    };
    let sources = select(&config.repositories, only)?;
    if sources.is_empty() {
        println!("{}", "No repositories configured".yellow());
        return Ok(());
    }

    let errors = Arc::new(ErrorCollector::new());
    let catalog = Arc::new(LedgerCatalog::new(config.tracker.ledger.as_path()));
    let services = TrackerServices {
        cloner: Arc::new(LocalCheckout::new(
            sources.iter().map(|s| (s.id, s.checkout.clone())),
        )),
        catalog_reader: catalog.clone(),
        catalog_writer: catalog,
        images: Arc::new(FsImageStore::new(config.tracker.images_dir.clone())),
        logos: Arc::new(HttpLogoFetcher::new()?),
        errors: errors.clone(),
    };

    let cancel = CancellationToken::new();
    watch_ctrl_c(cancel.clone());

    let results: Vec<(Repository, tracker_core::Result<TrackReport>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let repository = Repository::new(source.id, &source.name, &source.url);
                let tracker = Tracker::new(repository, settings, services.clone(), cancel.clone());
                scope.spawn(move || {
                    let result = tracker.track();
                    (tracker.repository().clone(), result)
                })
            })
            .collect();
        handles
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .collect()
    });

    if results.len() != sources.len() {
        return Err(CliError::user("a tracking thread panicked"));
    }

    let mut grouped = errors.grouped();
    let summaries: Vec<RepositorySummary> = results
        .into_iter()
        .map(|(repository, result)| {
            let (report, fatal) = match result {
                Ok(report) => (Some(report), None),
                Err(e) => {
                    tracing::error!(repo = %repository.name, error = %e, "Tracking failed");
                    (None, Some(e.to_string()))
                }
            };
            RepositorySummary {
                errors: grouped.remove(&repository.repository_id).unwrap_or_default(),
                id: repository.repository_id,
                name: repository.name,
                report,
                fatal,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print_summaries(&summaries);
    }

    let failed = summaries.iter().filter(|s| s.fatal.is_some()).count();
    if failed > 0 {
        return Err(CliError::user(format!(
            "{failed} of {} repositories could not be tracked",
            summaries.len()
        )));
    }
    Ok(())
}

/// Pick the configured repositories named in `only`, or all of them.
fn select<'a>(sources: &'a [RepositorySource], only: &[String]) -> Result<Vec<&'a RepositorySource>> {
    if only.is_empty() {
        return Ok(sources.iter().collect());
    }
    only.iter()
        .map(|name| {
            sources
                .iter()
                .find(|s| &s.name == name)
                .ok_or_else(|| CliError::user(format!("Unknown repository: {name}")))
        })
        .collect()
}

/// Cancel `cancel` on the first Ctrl-C.
fn watch_ctrl_c(cancel: CancellationToken) {
    let spawned = std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
                    return;
                }
            };
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, stopping after the current item");
                    cancel.cancel();
                }
            });
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
    }
}

fn print_summaries(summaries: &[RepositorySummary]) {
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut error_report: BTreeMap<&str, &[String]> = BTreeMap::new();

    for summary in summaries {
        let name = format!("{:width$}", summary.name, width = width);
        match (&summary.report, &summary.fatal) {
            (Some(report), _) => {
                let mut line = format!(
                    "{} registered {}, skipped {}, unregistered {}, failed {}",
                    name.cyan(),
                    report.registered.to_string().green(),
                    report.skipped,
                    report.unregistered.to_string().yellow(),
                    report.failed.to_string().red(),
                );
                if report.cancelled {
                    line.push_str(&format!(" ({})", "cancelled".yellow()));
                }
                println!("{line}");
            }
            (None, Some(fatal)) => println!("{} {} {}", name.cyan(), "failed:".red().bold(), fatal),
            (None, None) => {}
        }
        if !summary.errors.is_empty() {
            error_report.insert(&summary.name, &summary.errors);
        }
    }

    if error_report.is_empty() {
        return;
    }
    println!();
    println!("{}", "Errors".bold());
    for (name, errors) in error_report {
        println!("  {}:", name.cyan());
        for error in errors {
            println!("    {} {}", "-".red(), error);
        }
    }
}
