use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::info;

use crate::{config::Config, error::SearchError, spotify, types::Credential};

/// Owns the process-wide app token.
///
/// The cache sits behind a single async mutex that stays locked while a
/// refresh is in flight, so callers racing on an expired token share one
/// exchange instead of each issuing their own.
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<Credential>>,
}

impl TokenManager {
    pub fn new(client: Client, config: &Config) -> Self {
        TokenManager {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached credential while it is still valid, otherwise
    /// exchanges the client credentials for a new one and caches it.
    pub async fn get_token(&self) -> Result<Credential, SearchError> {
        let mut cached = self.cached.lock().await;

        if let Some(credential) = cached.as_ref() {
            if credential.is_valid_at(Utc::now()) {
                return Ok(credential.clone());
            }
        }

        let response = spotify::auth::request_client_credentials(
            &self.client,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
        )
        .await
        .map_err(SearchError::Auth)?;

        info!(expires_in = response.expires_in, "obtained new access token");

        let credential = Credential {
            access_token: response.access_token,
            expires_at: expiry_from(Utc::now(), response.expires_in),
        };
        *cached = Some(credential.clone());

        Ok(credential)
    }

    /// The cached credential, valid or not, without touching the network.
    pub async fn current(&self) -> Option<Credential> {
        self.cached.lock().await.clone()
    }
}

fn expiry_from(now: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
    let validity = i64::try_from(expires_in)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX);

    now.checked_add_signed(validity)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
