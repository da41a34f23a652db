//! W3C API client implementation.
//!
//! Every request carries the API key as the `apikey` query parameter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use groupdir_core::constants::{
    API_KEY_PARAM, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_W3C_API_URL, LINK_ACTIVE_CHARTER,
    LINK_HOMEPAGE, LINK_PP_STATUS, PATENT_POLICY_FIELD,
};
use groupdir_core::error::{GroupError, Result};
use groupdir_core::traits::GroupFetcher;
use groupdir_core::types::{GroupCategory, GroupRecord, PatentPolicy, PolicyStatus};

/// W3C API client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// API base URL (e.g. "https://api.w3.org")
    pub base_url: String,
    /// API key sent with every request
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl FetcherConfig {
    /// Creates config for the public W3C API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_W3C_API_URL.into(),
            api_key: api_key.into(),
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Points the client at another API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Client for the W3C group API.
pub struct W3cClient {
    config: FetcherConfig,
    base_url: Url,
    http_client: reqwest::Client,
}

impl W3cClient {
    /// Creates a new client with the given config.
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GroupError::Config("W3C API key is empty".into()));
        }

        // `Url::join` replaces the last path segment unless the base ends with '/'.
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| GroupError::Config(format!("Invalid API base URL '{}': {}", base, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("groupdir/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GroupError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            base_url,
            http_client,
        })
    }

    /// Fetches the metadata of group `id`.
    ///
    /// A non-success status on the group resource fails the whole fetch. A
    /// failed patent policy lookup on the active charter does not; the record
    /// comes back with [`GroupRecord::policy_unresolved`] set.
    #[instrument(skip(self))]
    pub async fn fetch_group(
        &self,
        id: u64,
        shortname: &str,
        category: GroupCategory,
    ) -> Result<GroupRecord> {
        let url = self.group_url(id)?;
        debug!(id, "Fetching group from W3C API");

        let body: GroupResponse = self.get_json(url).await?;

        let mut record = GroupRecord::partial(shortname, category, id);
        record.name = body.name.clone();
        record.homepage_uri = body.link(LINK_HOMEPAGE).map(str::to_owned);
        record.patent_statement_uri = body.link(LINK_PP_STATUS).map(str::to_owned);

        if let Some(charter) = body.link(LINK_ACTIVE_CHARTER) {
            record = match self.patent_policy(charter).await {
                Ok(status) => {
                    record.patent_policy = status;
                    record
                }
                Err(err) => {
                    warn!(charter, error = %err, "Patent policy lookup failed");
                    record.with_unresolved_policy()
                }
            };
        }

        info!(id, shortname, "Resolved group");
        Ok(record)
    }

    /// Classifies the patent policy of the charter at `charter_href`.
    #[instrument(skip(self))]
    pub async fn patent_policy(&self, charter_href: &str) -> Result<PolicyStatus> {
        let url = Url::parse(charter_href)
            .map_err(|e| GroupError::InvalidUrl(format!("{}: {}", charter_href, e)))?;

        let charter: serde_json::Value = self.get_json(url).await?;
        Ok(PatentPolicy::classify_url(charter.get(PATENT_POLICY_FIELD)))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let url = self.authorize(url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GroupError::remote(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Upstream error"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(transport_error)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) fn group_url(&self, id: u64) -> Result<Url> {
        self.base_url
            .join(&format!("groups/{}", id))
            .map_err(|e| GroupError::InvalidUrl(e.to_string()))
    }

    /// Sets the `apikey` query parameter, replacing any existing one.
    pub(crate) fn authorize(&self, mut url: Url) -> Url {
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != API_KEY_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(&retained)
            .append_pair(API_KEY_PARAM, &self.config.api_key);
        url
    }
}

/// Maps a reqwest failure to [`GroupError::Transport`].
///
/// The request URL is stripped: it carries the API key.
fn transport_error(err: reqwest::Error) -> GroupError {
    GroupError::Transport(err.without_url().to_string())
}

#[async_trait]
impl GroupFetcher for W3cClient {
    async fn fetch(
        &self,
        id: u64,
        shortname: &str,
        category: GroupCategory,
    ) -> Result<GroupRecord> {
        self.fetch_group(id, shortname, category).await
    }
}

/// Group resource as returned by the W3C API.
#[derive(Debug, Deserialize)]
struct GroupResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "_links", default)]
    links: HashMap<String, serde_json::Value>,
}

impl GroupResponse {
    /// `href` of a single-valued link relation.
    fn link(&self, rel: &str) -> Option<&str> {
        self.links
            .get(rel)
            .and_then(|link| link.get("href"))
            .and_then(serde_json::Value::as_str)
            .filter(|href| !href.is_empty())
    }
}
