//! Alchemy NFT API owner source (`getOwnersForCollection` with token balances)

use std::{collections::HashSet, time::Instant};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{OwnerRecord, OwnerSource};
use crate::config::Settings;

const OWNERS_METHOD: &str = "getOwnersForCollection";

/// One page of the owners listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnersPage {
    #[serde(default)]
    owner_addresses: Vec<OwnerRecord>,
    #[serde(default)]
    page_key: Option<String>,
}

#[derive(Clone)]
pub struct AlchemyClient {
    /// `{base}/nft/v2/{api_key}/`; never logged.
    endpoint: Url,
    client: Client,
}

impl AlchemyClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let base = settings.api_base_url();
        let base = if base.ends_with('/') { base } else { format!("{base}/") };
        let endpoint = Url::parse(&base)
            .with_context(|| format!("parsing API base url {base:?}"))?
            .join(&format!("nft/v2/{}/", settings.api_key))
            .context("building API endpoint")?;

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("building HTTP client")?;

        info!(
            "[ALCHEMY] Owner source initialized: {} ({})",
            settings.network,
            endpoint.host_str().unwrap_or_default()
        );
        Ok(Self { endpoint, client })
    }

    fn page_url(&self, contract_address: &str, page_key: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint.join(OWNERS_METHOD)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("contractAddress", contract_address)
                .append_pair("withTokenBalances", "true");
            if let Some(key) = page_key {
                query.append_pair("pageKey", key);
            }
        }
        Ok(url)
    }

    async fn fetch_page(&self, contract_address: &str, page_key: Option<&str>) -> Result<OwnersPage> {
        let url = self.page_url(contract_address, page_key)?;

        let res = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("owners request failed: {}", e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            return Err(anyhow!("Alchemy HTTP {}: {}", status, err_text));
        }

        let page: OwnersPage = res
            .json()
            .await
            .map_err(|e| anyhow!("decoding owners page: {}", e.without_url()))?;
        Ok(page)
    }
}

#[async_trait]
impl OwnerSource for AlchemyClient {
    async fn owners_for_contract(&self, contract_address: &str) -> Result<Vec<OwnerRecord>> {
        let start_time = Instant::now();
        let mut owners = Vec::new();
        let mut page_key: Option<String> = None;
        let mut seen_keys: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(contract_address, page_key.as_deref()).await?;
            pages += 1;
            debug!(
                "[ALCHEMY] page {} for {}: {} owners",
                pages,
                contract_address,
                page.owner_addresses.len()
            );
            owners.extend(page.owner_addresses);

            match page.page_key.filter(|k| !k.is_empty()) {
                Some(next) => {
                    if !seen_keys.insert(next.clone()) {
                        return Err(anyhow!("owners listing repeated page key {next:?}"));
                    }
                    page_key = Some(next);
                }
                None => break,
            }
        }

        info!(
            "[ALCHEMY] {} owners of {} in {} page(s), {}ms",
            owners.len(),
            contract_address,
            pages,
            start_time.elapsed().as_millis()
        );
        Ok(owners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{ENV_API_KEY, ENV_BASE_URL};

    fn client_for(base_url: Option<&str>) -> AlchemyClient {
        let base = base_url.map(str::to_string);
        let settings = Settings::from_lookup(move |key| match key {
            ENV_API_KEY => Some("test-key".to_string()),
            ENV_BASE_URL => base.clone(),
            _ => None,
        })
        .unwrap();
        AlchemyClient::new(&settings).unwrap()
    }

    #[test]
    fn test_page_url_default_network() {
        let client = client_for(None);
        let url = client.page_url("0xabc", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://eth-mainnet.g.alchemy.com/nft/v2/test-key/getOwnersForCollection?contractAddress=0xabc&withTokenBalances=true"
        );
    }

    #[test]
    fn test_page_url_with_page_key_and_base_path() {
        let client = client_for(Some("http://127.0.0.1:8080/proxy"));
        let url = client.page_url("0xabc", Some("next page")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/proxy/nft/v2/test-key/getOwnersForCollection?contractAddress=0xabc&withTokenBalances=true&pageKey=next+page"
        );
    }

    #[test]
    fn test_owners_page_decoding() {
        let raw = r#"{
            "ownerAddresses": [
                {"ownerAddress": "0xa", "tokenBalances": [{"tokenId": "0x5", "balance": 1}]}
            ],
            "pageKey": "abc"
        }"#;
        let page: OwnersPage = serde_json::from_str(raw).unwrap();
        assert_eq!(page.owner_addresses.len(), 1);
        assert_eq!(page.page_key.as_deref(), Some("abc"));

        let last: OwnersPage = serde_json::from_str(r#"{"ownerAddresses": []}"#).unwrap();
        assert!(last.page_key.is_none());
    }
}
