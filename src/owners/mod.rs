/* --------------------------------------------------------------------- */
/*  Owner lookup: source trait, wire records, aggregation                */
/* --------------------------------------------------------------------- */

pub mod aggregate;
pub mod alchemy;
pub mod token_id;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer, Serialize};

pub use aggregate::{entries_by_owner, fetch_entries_by_owner, EntriesByOwner};

/// One owner and every (token, balance) pair it holds in the contract.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecord {
    pub owner_address: String,
    #[serde(default)]
    pub token_balances: Vec<TokenBalance>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Hex string, `0x` prefixed.
    pub token_id: String,
    #[serde(deserialize_with = "balance_from_number_or_string")]
    pub balance: u64,
}

/// Anything that can list the owners of a contract with per-token balances.
#[async_trait]
pub trait OwnerSource: Send + Sync {
    /// Complete owner set for `contract_address`, pagination already resolved.
    async fn owners_for_contract(&self, contract_address: &str) -> Result<Vec<OwnerRecord>>;
}

// The API has shipped balances both as JSON numbers and as decimal strings.
fn balance_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBalance {
        Number(u64),
        Text(String),
    }

    match RawBalance::deserialize(deserializer)? {
        RawBalance::Number(n) => Ok(n),
        RawBalance::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| de::Error::custom(format!("invalid balance {s:?}: {e}"))),
    }
}
