use reqwest::Client;

use crate::types::SearchResponse;

/// Searches the catalog for albums and tracks matching `query`.
///
/// `limit` applies to each result type separately, so a limit of 5 yields
/// up to 5 albums and up to 5 tracks.
///
/// # API Endpoint
///
/// `GET {api_url}/search?q=<query>&type=album,track&limit=<limit>`, with the
/// query percent-encoded.
pub async fn search_catalog(
    client: &Client,
    api_url: &str,
    token: &str,
    query: &str,
    limit: usize,
) -> Result<SearchResponse, reqwest::Error> {
    let url = format!(
        "{uri}/search?q={q}&type=album,track&limit={limit}",
        uri = api_url,
        q = urlencoding::encode(query),
        limit = limit
    );

    client
        .get(&url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?
        .json::<SearchResponse>()
        .await
}
