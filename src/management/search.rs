use reqwest::Client;
use tracing::debug;

use crate::{
    config::Config,
    error::SearchError,
    management::TokenManager,
    spotify,
    types::SearchResultItem,
    utils::{self, PER_KIND_LIMIT},
};

/// Turns a free-text query into the capped, interleaved result list served
/// by `GET /search`.
pub struct SearchProxy {
    client: Client,
    api_url: String,
    tokens: TokenManager,
}

impl SearchProxy {
    /// Builds the shared HTTP client, applying the configured timeout if any.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        SearchProxy {
            tokens: TokenManager::new(client.clone(), config),
            client,
            api_url: config.api_url.clone(),
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Searches albums and tracks for `query`.
    ///
    /// A blank query returns an empty list without fetching a token or
    /// calling the search endpoint. Any upstream failure is returned as is;
    /// there are no retries and no partial results.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let credential = self.tokens.get_token().await?;

        let response = spotify::search::search_catalog(
            &self.client,
            &self.api_url,
            &credential.access_token,
            query,
            PER_KIND_LIMIT,
        )
        .await
        .map_err(SearchError::Upstream)?;

        let items = utils::shape_results(response);
        debug!(query_len = query.len(), results = items.len(), "search served");

        Ok(items)
    }
}
