//! # Spotify Integration Module
//!
//! Thin wrappers around the two Spotify endpoints the proxy depends on.
//!
//! ```text
//! management::TokenManager ──► auth::request_client_credentials ──► POST /api/token
//! management::SearchProxy  ──► search::search_catalog           ──► GET  /v1/search
//! ```
//!
//! ## Authentication
//!
//! [`auth`] performs the OAuth 2.0 client credentials grant. The client id
//! and secret travel in a `Basic` authorization header and the response
//! carries an app-only access token with its lifetime in seconds. No user
//! is involved and no refresh token is issued; an expired token is simply
//! exchanged again.
//!
//! ## Search
//!
//! [`search`] queries the catalog for albums and tracks in one request.
//!
//! ## Error Types
//!
//! Both functions return `reqwest::Error` for transport failures, non-2xx
//! statuses and bodies that do not decode into the expected records. The
//! caller decides which [`crate::error::SearchError`] variant it becomes.
//! Nothing here retries.

pub mod auth;
pub mod search;
