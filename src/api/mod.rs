//! # API Module
//!
//! HTTP endpoints served by the proxy.
//!
//! - [`search`] - `GET /search?q=<text>`: up to 10 albums and tracks,
//!   tracks first at every position. A missing or blank `q` yields `[]`.
//!   Upstream failures surface as `502 Bad Gateway` with an `{"error"}` body,
//!   never as an empty list.
//! - [`health`] - `GET /health`: liveness and crate version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use jukeboxd::api::{health, search};
//!
//! let app = Router::new()
//!     .route("/search", get(search))
//!     .route("/health", get(health))
//!     .layer(Extension(proxy));
//! ```

mod health;
mod search;

pub use health::health;
pub use search::{SearchParams, search};
