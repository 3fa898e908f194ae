//! Configuration management for statify.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Only `SPOTIFY_CLIENT_ID` has no default; it is needed to start a login.

use std::{
    env,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

/// Default address of the dashboard backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Default redirect URI registered with Spotify.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/callback";

/// Default Spotify authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Default bind address of the local callback server.
pub const DEFAULT_CALLBACK_SERVER_ADDRESS: &str = "127.0.0.1:3000";

/// Permissions requested at login.
pub const SPOTIFY_SCOPES: &str = "user-read-private user-read-email user-top-read playlist-read-private playlist-modify-public playlist-modify-private";

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Loads environment variables from `<data dir>/statify/.env`.
///
/// Creates the directory if needed. A missing `.env` file is not an error;
/// every key has either a default or is reported when it is actually used.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/statify/.env`
/// - macOS: `~/Library/Application Support/statify/.env`
/// - Windows: `%LOCALAPPDATA%/statify/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    if env_flag("STATIFY_VERBOSE") {
        set_verbose(true);
    }
    Ok(())
}

/// Returns the platform-specific data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("statify");
    path
}

/// Returns the base address of the dashboard backend.
///
/// Reads `API_BASE_URL`, falling back to [`DEFAULT_API_BASE_URL`] so the
/// client can be pointed at another deployment without code changes.
///
/// # Example
///
/// ```
/// let base = api_base_url(); // e.g., "http://localhost:8080"
/// ```
pub fn api_base_url() -> String {
    env_or("API_BASE_URL", DEFAULT_API_BASE_URL)
}

/// Returns the Spotify client ID used to build the authorization URL.
///
/// # Errors
///
/// Returns an error message if `SPOTIFY_CLIENT_ID` is not set.
pub fn spotify_client_id() -> Result<String, String> {
    env::var("SPOTIFY_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| "SPOTIFY_CLIENT_ID must be set".to_string())
}

/// Returns the redirect URI Spotify sends the user back to after consent.
///
/// Must match the redirect URI registered for the Spotify application and
/// the address of the local callback server.
pub fn spotify_redirect_uri() -> String {
    env_or("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the Spotify authorization endpoint.
pub fn spotify_auth_url() -> String {
    env_or("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the address the local callback server binds to.
pub fn callback_server_addr() -> String {
    env_or("CALLBACK_SERVER_ADDRESS", DEFAULT_CALLBACK_SERVER_ADDRESS)
}

pub fn verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_flag(key: &str) -> bool {
    matches!(
        env::var(key).map(|v| v.to_lowercase()).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}
