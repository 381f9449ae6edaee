use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};

use crate::{types::TokenResponse, utils};

/// Exchanges the application's client credentials for an access token.
///
/// Sends `grant_type=client_credentials` as a form body to `token_url`,
/// authenticated with `Basic base64(client_id:client_secret)`.
///
/// # Returns
///
/// - `Ok(TokenResponse)` - access token and its validity in seconds
/// - `Err(reqwest::Error)` - network failure, non-2xx status, or a body
///   without `access_token`/`expires_in`
pub async fn request_client_credentials(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<TokenResponse, reqwest::Error> {
    client
        .post(token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth_header(client_id, client_secret),
        )
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("grant_type=client_credentials")
        .send()
        .await?
        .error_for_status()?
        .json::<TokenResponse>()
        .await
}
