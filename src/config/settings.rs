//! Runtime configuration loader.
//!
//! Everything the pool job needs is read once at startup into [`Settings`]
//! and passed down explicitly. API credentials come from the environment,
//! the pool target (contract, token, output file) has defaults that the
//! CLI can override.

use std::{env, fmt, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};
use num::BigUint;
use strum_macros::{Display, EnumString};

use crate::owners::token_id;

/// E30D contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5ab44d97b0504ed90b8c5b8a325aa61376703c88";
pub const DEFAULT_TOKEN_ID: u64 = 5;
pub const DEFAULT_OUTPUT_PATH: &str = "./participants";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "ALCHEMY_API_KEY";
pub const ENV_NETWORK: &str = "ALCHEMY_NETWORK";
pub const ENV_BASE_URL: &str = "ALCHEMY_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ALCHEMY_TIMEOUT_SECS";

/// ------------------------------------------------------------------
/// Networks served by the NFT API, keyed by their host slug
/// ------------------------------------------------------------------
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
pub enum Network {
    #[default]
    #[strum(to_string = "eth-mainnet", serialize = "mainnet")]
    EthMainnet,
    #[strum(to_string = "eth-goerli")]
    EthGoerli,
    #[strum(to_string = "eth-sepolia")]
    EthSepolia,
    #[strum(to_string = "polygon-mainnet")]
    PolygonMainnet,
    #[strum(to_string = "polygon-mumbai")]
    PolygonMumbai,
    #[strum(to_string = "opt-mainnet")]
    OptMainnet,
    #[strum(to_string = "arb-mainnet")]
    ArbMainnet,
    #[strum(to_string = "base-mainnet")]
    BaseMainnet,
}

impl Network {
    /// Default API host for this network.
    pub fn base_url(&self) -> String {
        format!("https://{self}.g.alchemy.com")
    }
}

/// ------------------------------------------------------------------
/// Main Settings object
/// ------------------------------------------------------------------
#[derive(Clone)]
pub struct Settings {
    /* -------- api access ---------------------------- */
    pub api_key: String,
    pub network: Network,
    /// Replaces the network host, e.g. for a proxy or a local stub.
    pub base_url: Option<String>,
    pub request_timeout: Duration,

    /* -------- pool target --------------------------- */
    pub contract_address: String,
    pub token_id: BigUint,
    pub output_path: PathBuf,
}

impl Settings {
    /// --------------------------------------------------------------
    /// Read settings from the process environment.
    /// --------------------------------------------------------------
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// --------------------------------------------------------------
    /// Build settings from an arbitrary variable source.
    /// --------------------------------------------------------------
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("{ENV_API_KEY} is not set"))?;

        let network = match lookup(ENV_NETWORK).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<Network>()
                .with_context(|| format!("parsing {ENV_NETWORK}={raw:?}"))?,
            None => Network::default(),
        };

        let base_url = lookup(ENV_BASE_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("parsing {ENV_TIMEOUT_SECS}={raw:?}"))?;
                if secs == 0 {
                    return Err(anyhow!("{ENV_TIMEOUT_SECS} must be at least 1 second"));
                }
                secs
            }
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            network,
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            token_id: BigUint::from(DEFAULT_TOKEN_ID),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        })
    }

    /// --------------------------------------------------------------
    /// Helper: API host actually used for requests.
    /// --------------------------------------------------------------
    pub fn api_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.network.base_url())
    }

    /// Target token ID rendered as `0x`-prefixed hex, for logs.
    pub fn token_id_hex(&self) -> String {
        token_id::to_hex(&self.token_id)
    }
}

/* ------------------------------------------------------------------ */
/*  Manual Debug implementation (keeps the API key out of logs)        */
/* ------------------------------------------------------------------ */
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("network", &self.network)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("contract_address", &self.contract_address)
            .field("token_id", &self.token_id)
            .field("output_path", &self.output_path)
            .finish()
    }
}
