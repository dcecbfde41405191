//! Owner → units-held tally for a single token ID.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use num::BigUint;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{token_id, OwnerRecord, OwnerSource};

/// Largest pool a single run will build.
pub const MAX_POOL_ENTRIES: u64 = 50_000_000;

/// Map of `owner address` to `how many of the target token they own`.
///
/// Iterates in the order owners were first seen. An owner whose count is
/// zero is absent from `get`/`iter`, but keeps its slot in case a later
/// record sets it again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntriesByOwner {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl EntriesByOwner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the owner's count. Known owners keep their position.
    pub fn set(&mut self, owner: &str, count: u64) {
        match self.counts.get_mut(owner) {
            Some(existing) => *existing = count,
            None => {
                self.counts.insert(owner.to_string(), count);
                self.order.push(owner.to_string());
            }
        }
    }

    pub fn get(&self, owner: &str) -> Option<u64> {
        self.counts.get(owner).copied().filter(|c| *c > 0)
    }

    pub fn len(&self) -> usize {
        self.counts.values().filter(|c| **c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all counts, i.e. the number of pool lines. Saturates.
    pub fn total_entries(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    /// Sum of all counts, rejecting overflow and pools over [`MAX_POOL_ENTRIES`].
    pub fn checked_total(&self) -> Result<u64> {
        let total = self
            .counts
            .values()
            .try_fold(0u64, |acc, c| acc.checked_add(*c))
            .ok_or_else(|| anyhow!("total entries overflow u64"))?;
        if total > MAX_POOL_ENTRIES {
            return Err(anyhow!(
                "{total} entries exceeds the pool limit of {MAX_POOL_ENTRIES}"
            ));
        }
        Ok(total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.order.iter().filter_map(move |owner| {
            self.get(owner).map(|count| (owner.as_str(), count))
        })
    }
}

impl Serialize for EntriesByOwner {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (owner, count) in self.iter() {
            map.serialize_entry(owner, &count)?;
        }
        map.end()
    }
}

/// Tally `records` down to the balances of `target`.
///
/// A token ID that is not valid hex, or a total over [`MAX_POOL_ENTRIES`],
/// fails the whole tally.
pub fn entries_by_owner(records: &[OwnerRecord], target: &BigUint) -> Result<EntriesByOwner> {
    let mut entries = EntriesByOwner::new();

    for record in records {
        for balance in &record.token_balances {
            let id = token_id::parse_hex(&balance.token_id)
                .with_context(|| format!("owner {}", record.owner_address))?;
            if &id == target {
                debug!(
                    "[AGGREGATE] {} holds {} of {}",
                    record.owner_address, balance.balance, balance.token_id
                );
                entries.set(&record.owner_address, balance.balance);
            }
        }
    }

    entries.checked_total()?;
    Ok(entries)
}

/// Fetch every owner of `contract_address` and tally the `target` token.
pub async fn fetch_entries_by_owner(
    source: &dyn OwnerSource,
    contract_address: &str,
    target: &BigUint,
) -> Result<EntriesByOwner> {
    let records = source.owners_for_contract(contract_address).await?;
    info!(
        "[AGGREGATE] {} owners returned for {}",
        records.len(),
        contract_address
    );

    let entries = entries_by_owner(&records, target)?;
    info!(
        "[AGGREGATE] {} owners hold token {}, {} units total",
        entries.len(),
        token_id::to_hex(target),
        entries.total_entries()
    );
    Ok(entries)
}
