//! jukeboxd search proxy library
//!
//! A small backend that sits between a browser search box and the Spotify
//! Web API. It exchanges client credentials for an app token, caches the
//! token until it expires, searches albums and tracks, and returns a
//! capped list that alternates tracks and albums.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for `/search` and `/health`
//! - `cli` - Command-line entry points (`serve`, `query`)
//! - `config` - Environment-driven configuration
//! - `error` - Error types and their HTTP mapping
//! - `management` - Token cache and search proxy
//! - `server` - Router and server lifecycle
//! - `spotify` - Spotify accounts and Web API calls
//! - `types` - Provider records and result types
//! - `utils` - Result shaping helpers
//!
//! # Example
//!
//! ```
//! use jukeboxd::{config::Config, management::SearchProxy};
//!
//! #[tokio::main]
//! async fn main() -> jukeboxd::Res<()> {
//!     let proxy = SearchProxy::new(&Config::from_env()?)?;
//!     let items = proxy.search("blue").await?;
//!     println!("{} results", items.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed-error result used by the binary and by callers that mix
/// configuration, HTTP client and search errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Evaluates to `!`, so it can terminate a `match` arm.
///
/// ```ignore
/// let listener = match TcpListener::bind(&addr).await {
///     Ok(listener) => listener,
///     Err(e) => error!("Cannot bind to {}. Err: {}", addr, e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr and carries on.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
