use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tabled::Table;

use crate::{config, error, info, success, types::SearchResultItem, utils, warning};

pub async fn query(text: String, server: Option<String>, json: bool) {
    let query = text.trim();
    if query.is_empty() {
        warning!("Nothing to search for.");
        return;
    }

    let base_url = base_url(server.unwrap_or_else(config::server_addr));

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Searching for \"{}\"...", query));
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = fetch_results(&base_url, query).await;
    pb.finish_and_clear();

    let items = match result {
        Ok(items) => utils::dedupe_for_display(items),
        Err(e) => error!("Search failed. Err: {}", e),
    };

    if items.is_empty() {
        info!("No results for \"{}\".", query);
        return;
    }

    if json {
        match serde_json::to_string_pretty(&items) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot encode results. Err: {}", e),
        }
        return;
    }

    success!("{} result(s) for \"{}\"", items.len(), query);
    let table = Table::new(utils::to_table_rows(&items));
    println!("{}", table);
}

/// Calls `GET {base_url}/search` on a running proxy and returns its items
/// untouched.
pub async fn fetch_results(
    base_url: &str,
    query: &str,
) -> Result<Vec<SearchResultItem>, reqwest::Error> {
    let url = format!(
        "{base}/search?q={q}",
        base = base_url.trim_end_matches('/'),
        q = urlencoding::encode(query)
    );

    Client::new()
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<SearchResultItem>>()
        .await
}

fn base_url(address: String) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address
    } else {
        format!("http://{}", address)
    }
}
