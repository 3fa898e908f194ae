//! Statify Library
//!
//! Client side of a listening-statistics dashboard. A backend service talks to
//! Spotify on the user's behalf; this crate handles the session with that
//! backend (login, token storage, expiry-driven invalidation) and the list
//! fetches every view is built on.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local login callback server
//! - `cli` - Command-line views (tracks, artists, genres, playlist, auth)
//! - `config` - Configuration management and environment variables
//! - `management` - Credential storage, session, auth state and resource fetching
//! - `server` - Local HTTP server receiving the authorization redirect
//! - `spotify` - Remote client for the dashboard backend
//! - `types` - Data structures and type definitions
//! - `utils` - Formatting helpers
//!
//! # Example
//!
//! ```
//! use statify::{management::{FetchParams, ResourceFetcher, Session}, spotify::ApiClient, types::Track};
//!
//! #[tokio::main]
//! async fn main() -> statify::Res<()> {
//!     let client = ApiClient::from_env(Session::persistent());
//!     let tracks: ResourceFetcher<Track> = ResourceFetcher::new(client);
//!     tracks
//!         .request("/api/spotify/top/tracks", FetchParams::new().with("limit", 10))
//!         .await;
//!     println!("{} tracks", tracks.view().data.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used for application plumbing where the concrete error type does not
/// matter to the caller. Components with a meaningful error taxonomy
/// (`spotify::ApiError`, `management::LoginError`) return their own types.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Waiting for the login callback...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal CLI-level errors (missing configuration, unbindable
/// callback address). Library code reports failures through return values.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Error fetching data from {} after {}ms", endpoint, elapsed);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed debug message, only when verbose output is enabled.
///
/// Verbose output is switched on with `--verbose` or `STATIFY_VERBOSE=true`,
/// see [`config::verbose`].
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::verbose() {
      use colored::Colorize;
      eprintln!("[{}] {}", "·".dimmed(), std::format_args!($($arg)*));
    }
  })
}
