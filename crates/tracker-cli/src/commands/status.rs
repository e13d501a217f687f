//! Status command implementation

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use tracker_meta::load_config;

use crate::adapters::LedgerCatalog;
use crate::error::Result;

/// Run the status command
pub fn run_status(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let ledger = LedgerCatalog::new(config.tracker.ledger.as_path()).load()?;

    // Registered keys per configured repository, by name
    let registered: BTreeMap<&str, Vec<&str>> = config
        .repositories
        .iter()
        .map(|repository| {
            let keys = ledger
                .get(&repository.id)
                .map(|entries| entries.keys().map(String::as_str).collect())
                .unwrap_or_default();
            (repository.name.as_str(), keys)
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&registered)?);
        return Ok(());
    }

    println!("{}", "Catalog Status".bold());
    println!();
    println!("{}:   {}", "Config".dimmed(), config_path.display());
    println!("{}:   {}", "Ledger".dimmed(), config.tracker.ledger.display());
    println!();

    if registered.is_empty() {
        println!("  {}", "No repositories configured".dimmed());
        return Ok(());
    }
    for (name, keys) in &registered {
        println!("{} ({} versions)", name.cyan().bold(), keys.len());
        for key in keys {
            println!("  {} {}", "+".green(), key);
        }
    }

    let unknown = ledger
        .keys()
        .filter(|id| !config.repositories.iter().any(|r| r.id == **id))
        .count();
    if unknown > 0 {
        println!();
        println!(
            "{} ledger holds {} repositories missing from the config",
            "note:".yellow(),
            unknown
        );
    }
    Ok(())
}
