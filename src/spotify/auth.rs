use reqwest::Url;

use crate::{
    config,
    spotify::{ApiClient, ApiError},
    types::{CodeExchangeRequest, TokenResponse},
};

pub const AUTH_CALLBACK_PATH: &str = "/api/spotify/auth/callback";
pub const ME_PATH: &str = "/api/spotify/me";

/// Builds the Spotify authorization URL the user is sent to for consent.
///
/// The URL requests an authorization code for the fixed scope list in
/// [`config::SPOTIFY_SCOPES`] and sets `show_dialog=true` so the consent screen
/// is shown even when the user approved the application before.
///
/// # Arguments
///
/// * `auth_url` - Spotify authorization endpoint
/// * `client_id` - Client ID of the registered Spotify application
/// * `redirect_uri` - Where Spotify sends the user back with `code` or `error`
///
/// # Errors
///
/// Returns an error message if `auth_url` is not a valid URL.
///
/// # Example
///
/// ```
/// let url = authorize_url(
///     "https://accounts.spotify.com/authorize",
///     "abc123",
///     "http://localhost:3000/callback",
/// )?;
/// ```
pub fn authorize_url(auth_url: &str, client_id: &str, redirect_uri: &str) -> Result<String, String> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", config::SPOTIFY_SCOPES),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| format!("invalid authorization endpoint {}: {}", auth_url, e))?;

    Ok(url.into())
}

/// Exchanges an authorization code for an access token through the backend.
///
/// The backend holds the client secret and performs the actual exchange with
/// Spotify. This call is made without a bearer credential and bypasses the
/// unauthorized handling of the client pipeline.
///
/// # Returns
///
/// - `Ok(TokenResponse)` - the access token and its lifetime in seconds
/// - `Err(ApiError)` - network failure, non-success status or a body without
///   `access_token`/`expires_in`
pub async fn exchange_code(client: &ApiClient, code: &str) -> Result<TokenResponse, ApiError> {
    client
        .post_unauthenticated(AUTH_CALLBACK_PATH, &CodeExchangeRequest { code })
        .await
}
