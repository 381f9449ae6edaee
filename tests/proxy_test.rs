use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jukeboxd::{
    cli,
    config::Config,
    error::SearchError,
    management::SearchProxy,
    server,
    types::{ItemKind, SearchResultItem},
    utils,
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinSet};

const CLIENT_ID: &str = "client-id";
const CLIENT_SECRET: &str = "client-secret";

/// Stand-in for the Spotify accounts service and Web API.
#[derive(Clone)]
struct FakeSpotify {
    token_calls: Arc<AtomicUsize>,
    search_calls: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<String>>>,
    token_body: Option<Value>,
    expires_in: u64,
    token_status: StatusCode,
    search_status: StatusCode,
    search_body: Value,
}

impl FakeSpotify {
    fn new(tracks: usize, albums: usize) -> Self {
        FakeSpotify {
            token_calls: Arc::new(AtomicUsize::new(0)),
            search_calls: Arc::new(AtomicUsize::new(0)),
            last_query: Arc::new(Mutex::new(None)),
            token_body: None,
            expires_in: 3600,
            token_status: StatusCode::OK,
            search_status: StatusCode::OK,
            search_body: search_body(tracks, albums),
        }
    }

    fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

async fn token_handler(
    State(fake): State<FakeSpotify>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let n = fake.token_calls.fetch_add(1, Ordering::SeqCst) + 1;

    let expected_auth = utils::basic_auth_header(CLIENT_ID, CLIENT_SECRET);
    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth != Some(expected_auth.as_str()) || body != "grant_type=client_credentials" {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_client" })))
            .into_response();
    }

    if fake.token_status != StatusCode::OK {
        return (fake.token_status, "accounts service unavailable").into_response();
    }

    let body = fake.token_body.clone().unwrap_or_else(|| {
        json!({
            "access_token": format!("token-{}", n),
            "token_type": "Bearer",
            "expires_in": fake.expires_in,
        })
    });
    Json(body).into_response()
}

async fn search_handler(
    State(fake): State<FakeSpotify>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    fake.search_calls.fetch_add(1, Ordering::SeqCst);
    *fake.last_query.lock().unwrap() = query;

    let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if !bearer.is_some_and(|b| b.starts_with("Bearer token-")) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if fake.search_status != StatusCode::OK {
        return (fake.search_status, "search unavailable").into_response();
    }

    Json(fake.search_body.clone()).into_response()
}

fn album(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Album {}", id),
        "album_type": "album",
        "artists": [{ "id": "ar1", "name": "Joni Mitchell" }],
        "images": [{ "url": format!("https://i.scdn.co/image/{}", id), "height": 640, "width": 640 }],
        "release_date": "1971-06-22",
        "release_date_precision": "day",
        "external_urls": { "spotify": format!("https://open.spotify.com/album/{}", id) }
    })
}

fn track(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Track {}", id),
        "artists": [{ "name": "Simon" }, { "name": "Garfunkel" }],
        "album": { "images": [], "release_date": "1970-01-26" },
        "popularity": 71,
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) }
    })
}

fn search_body(tracks: usize, albums: usize) -> Value {
    let albums: Vec<Value> = (1..=albums).map(|i| album(&format!("a{}", i))).collect();
    let tracks: Vec<Value> = (1..=tracks).map(|i| track(&format!("t{}", i))).collect();
    json!({
        "albums": { "items": albums, "limit": 5, "total": 100 },
        "tracks": { "items": tracks, "limit": 5, "total": 100 }
    })
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn spawn_fake(fake: &FakeSpotify) -> Config {
    let router = Router::new()
        .route("/api/token", post(token_handler))
        .route("/v1/search", get(search_handler))
        .with_state(fake.clone());
    let addr = spawn(router).await;

    Config {
        server_address: "127.0.0.1:0".to_string(),
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        api_url: format!("http://{}/v1", addr),
        token_url: format!("http://{}/api/token", addr),
        request_timeout: None,
    }
}

async fn proxy_for(fake: &FakeSpotify) -> Arc<SearchProxy> {
    let config = spawn_fake(fake).await;
    Arc::new(SearchProxy::new(&config).unwrap())
}

fn ids(items: &[SearchResultItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

#[tokio::test]
async fn blank_query_makes_no_upstream_calls() {
    let fake = FakeSpotify::new(2, 2);
    let proxy = proxy_for(&fake).await;

    for query in ["", "   ", "\t\n"] {
        assert!(proxy.search(query).await.unwrap().is_empty());
    }

    assert_eq!(fake.token_calls(), 0);
    assert_eq!(fake.search_calls(), 0);
    assert!(proxy.tokens().current().await.is_none());
}

#[tokio::test]
async fn token_is_reused_until_expiry() {
    let fake = FakeSpotify::new(0, 0);
    let proxy = proxy_for(&fake).await;

    let first = proxy.tokens().get_token().await.unwrap();
    let second = proxy.tokens().get_token().await.unwrap();

    assert_eq!(first.access_token, "token-1");
    assert_eq!(first, second);
    assert_eq!(fake.token_calls(), 1);
}

#[tokio::test]
async fn expired_token_is_refreshed_once() {
    let mut fake = FakeSpotify::new(0, 0);
    fake.expires_in = 0;
    let proxy = proxy_for(&fake).await;

    let first = proxy.tokens().get_token().await.unwrap();
    assert_eq!(fake.token_calls(), 1);

    let second = proxy.tokens().get_token().await.unwrap();
    assert_eq!(fake.token_calls(), 2);
    assert_eq!(second.access_token, "token-2");
    assert_ne!(first.access_token, second.access_token);
    assert_eq!(proxy.tokens().current().await, Some(second));
}

#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
    let fake = FakeSpotify::new(0, 0);
    let proxy = proxy_for(&fake).await;

    let mut set = JoinSet::new();
    for _ in 0..8 {
        let proxy = Arc::clone(&proxy);
        set.spawn(async move { proxy.tokens().get_token().await.unwrap() });
    }

    while let Some(res) = set.join_next().await {
        assert_eq!(res.unwrap().access_token, "token-1");
    }
    assert_eq!(fake.token_calls(), 1);
}

#[tokio::test]
async fn search_interleaves_tracks_first() {
    let fake = FakeSpotify::new(2, 3);
    let proxy = proxy_for(&fake).await;

    let items = proxy.search("blue").await.unwrap();

    assert_eq!(ids(&items), vec!["t1", "a1", "t2", "a2", "a3"]);
    assert_eq!(items[0].kind, ItemKind::Track);
    assert_eq!(items[0].artist, "Simon, Garfunkel");
    assert_eq!(items[0].year.as_deref(), Some("1970"));
    assert_eq!(items[0].image, None);
    assert_eq!(items[0].popularity, 71);
    assert_eq!(items[1].kind, ItemKind::Album);
    assert_eq!(items[1].popularity, 0);
    assert_eq!(
        items[1].image.as_deref(),
        Some("https://i.scdn.co/image/a1")
    );
}

#[tokio::test]
async fn search_caps_results_at_ten() {
    let fake = FakeSpotify::new(6, 6);
    let proxy = proxy_for(&fake).await;

    let items = proxy.search("blue").await.unwrap();

    assert_eq!(items.len(), 10);
    assert_eq!(ids(&items).last(), Some(&"a5"));
}

#[tokio::test]
async fn search_reuses_token_across_requests() {
    let fake = FakeSpotify::new(1, 1);
    let proxy = proxy_for(&fake).await;

    proxy.search("blue").await.unwrap();
    proxy.search("green").await.unwrap();

    assert_eq!(fake.token_calls(), 1);
    assert_eq!(fake.search_calls(), 2);
}

#[tokio::test]
async fn search_encodes_query_and_requests_both_kinds() {
    let fake = FakeSpotify::new(1, 1);
    let proxy = proxy_for(&fake).await;

    proxy.search("  blue & green ").await.unwrap();

    let query = fake.last_query.lock().unwrap().clone();
    assert_eq!(
        query.as_deref(),
        Some("q=blue%20%26%20green&type=album,track&limit=5")
    );
}

#[tokio::test]
async fn failed_token_exchange_is_auth_error() {
    let mut fake = FakeSpotify::new(1, 1);
    fake.token_status = StatusCode::SERVICE_UNAVAILABLE;
    let proxy = proxy_for(&fake).await;

    let err = proxy.search("blue").await.unwrap_err();

    assert!(matches!(err, SearchError::Auth(_)));
    assert_eq!(fake.search_calls(), 0);
    assert!(proxy.tokens().current().await.is_none());
}

#[tokio::test]
async fn malformed_token_response_is_auth_error() {
    let mut fake = FakeSpotify::new(1, 1);
    fake.token_body = Some(json!({ "access_token": "token-x" }));
    let proxy = proxy_for(&fake).await;

    let err = proxy.tokens().get_token().await.unwrap_err();

    assert!(matches!(err, SearchError::Auth(_)));
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let fake = FakeSpotify::new(1, 1);
    let mut config = spawn_fake(&fake).await;
    config.client_secret = "wrong".to_string();
    let proxy = SearchProxy::new(&config).unwrap();

    let err = proxy.search("blue").await.unwrap_err();

    assert!(matches!(err, SearchError::Auth(_)));
}

#[tokio::test]
async fn failed_search_is_upstream_error() {
    let mut fake = FakeSpotify::new(1, 1);
    fake.search_status = StatusCode::INTERNAL_SERVER_ERROR;
    let proxy = proxy_for(&fake).await;

    let err = proxy.search("blue").await.unwrap_err();

    assert!(matches!(err, SearchError::Upstream(_)));
    assert_eq!(fake.token_calls(), 1);
}

#[tokio::test]
async fn malformed_search_response_is_upstream_error() {
    let mut fake = FakeSpotify::new(0, 0);
    fake.search_body = json!({ "albums": { "items": [] } });
    let proxy = proxy_for(&fake).await;

    let err = proxy.search("blue").await.unwrap_err();

    assert!(matches!(err, SearchError::Upstream(_)));
}

#[tokio::test]
async fn http_search_returns_wire_shape() {
    let fake = FakeSpotify::new(1, 1);
    let proxy = proxy_for(&fake).await;
    let addr = spawn(server::router(proxy)).await;

    let res = reqwest::get(format!("http://{}/search?q=blue", addr))
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!([
            {
                "id": "t1",
                "type": "track",
                "title": "Track t1",
                "artist": "Simon, Garfunkel",
                "image": null,
                "year": "1970",
                "popularity": 71,
                "spotifyUrl": "https://open.spotify.com/track/t1"
            },
            {
                "id": "a1",
                "type": "album",
                "title": "Album a1",
                "artist": "Joni Mitchell",
                "image": "https://i.scdn.co/image/a1",
                "year": "1971",
                "popularity": 0,
                "spotifyUrl": "https://open.spotify.com/album/a1"
            }
        ])
    );
}

#[tokio::test]
async fn http_search_without_query_is_empty() {
    let fake = FakeSpotify::new(1, 1);
    let proxy = proxy_for(&fake).await;
    let addr = spawn(server::router(proxy)).await;

    for path in ["/search", "/search?q=", "/search?q=%20%20"] {
        let res = reqwest::get(format!("http://{}{}", addr, path))
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!([]));
    }

    assert_eq!(fake.token_calls(), 0);
    assert_eq!(fake.search_calls(), 0);
}

#[tokio::test]
async fn http_search_failure_is_bad_gateway() {
    let mut fake = FakeSpotify::new(1, 1);
    fake.search_status = StatusCode::INTERNAL_SERVER_ERROR;
    let proxy = proxy_for(&fake).await;
    let addr = spawn(server::router(proxy)).await;

    let res = reqwest::get(format!("http://{}/search?q=blue", addr))
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_GATEWAY);

    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Search request failed"));
}

#[tokio::test]
async fn http_health_reports_version() {
    let fake = FakeSpotify::new(0, 0);
    let proxy = proxy_for(&fake).await;
    let addr = spawn(server::router(proxy)).await;

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn client_fetch_then_dedupe_keeps_five() {
    let fake = FakeSpotify::new(5, 5);
    let proxy = proxy_for(&fake).await;
    let addr = spawn(server::router(proxy)).await;

    let items = cli::fetch_results(&format!("http://{}", addr), "blue")
        .await
        .unwrap();
    assert_eq!(items.len(), 10);

    let shown = utils::dedupe_for_display(items);
    assert_eq!(ids(&shown), vec!["t1", "a1", "t2", "a2", "t3"]);
}
