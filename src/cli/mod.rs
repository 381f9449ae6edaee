//! # CLI Module
//!
//! User-facing commands of the `jukeboxd` binary.
//!
//! - [`serve`] - runs the search proxy until interrupted
//! - [`query`] - acts as a client of a running proxy: sends one query,
//!   keeps the first five unique results and prints them as a table
//!
//! ```text
//! jukeboxd query "blue" ──HTTP──► jukeboxd serve ──► Spotify accounts + Web API
//! ```
//!
//! Failures are reported with the crate's colored status macros; fatal ones
//! exit the process with status 1.

mod query;
mod serve;

pub use query::{fetch_results, query};
pub use serve::serve;
