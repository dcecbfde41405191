//! Fetch → tally → write, run once.

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::{
    config::Settings,
    owners::{fetch_entries_by_owner, EntriesByOwner, OwnerSource},
    pool,
};

/// Outcome of one run, for the console spot check.
#[derive(Debug)]
pub struct PoolSummary {
    pub entries: EntriesByOwner,
    pub total_entries: u64,
    pub output_path: PathBuf,
}

/// Build the participant pool for the token in `settings`.
///
/// The output file is only touched once the owner tally has fully
/// succeeded; any earlier error leaves it as it was.
pub async fn run(settings: &Settings, source: &dyn OwnerSource) -> Result<PoolSummary> {
    info!(
        "[PIPELINE] building pool for token {} of {}",
        settings.token_id_hex(),
        settings.contract_address
    );

    let entries =
        fetch_entries_by_owner(source, &settings.contract_address, &settings.token_id).await?;

    let contents = pool::render(&entries)?;
    pool::write_pool(&settings.output_path, &contents)?;

    let total_entries = entries.total_entries();
    info!(
        "[PIPELINE] {} entries from {} owners -> {}",
        total_entries,
        entries.len(),
        settings.output_path.display()
    );

    Ok(PoolSummary {
        entries,
        total_entries,
        output_path: settings.output_path.clone(),
    })
}
