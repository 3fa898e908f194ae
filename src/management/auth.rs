use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::watch;

use crate::{
    config,
    management::{FetchParams, ROOT_PATH, Session, credentials::CredentialError},
    spotify::{self, ApiClient, ApiError},
    types::User,
    warning,
};

/// Where the user stands with the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    /// The stored token is being verified against the backend.
    Checking,
    Authenticated(User),
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Checking)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Query parameters Spotify appends to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("authorization denied: {0}")]
    AccessDenied(String),
    #[error("no authorization code received")]
    MissingCode,
    #[error("code exchange failed: {0}")]
    ExchangeFailed(#[source] ApiError),
    #[error("could not store the session token: {0}")]
    Storage(#[from] CredentialError),
}

impl LoginError {
    /// Copy shown to the user on the callback page and in the terminal.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoginError::AccessDenied(_) => "Access denied. Please try again.",
            LoginError::MissingCode => "No authorization code received.",
            LoginError::ExchangeFailed(_) | LoginError::Storage(_) => {
                "Failed to authenticate with Spotify. Please try again."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub expires_at: DateTime<Utc>,
}

/// Fixed parameters of the authorization request.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginConfig {
    pub auth_url: String,
    pub client_id: String,
    pub redirect_uri: String,
}

impl LoginConfig {
    /// Reads the login settings from the environment. A missing client ID is
    /// only reported once a login is started.
    pub fn from_env() -> Self {
        Self {
            auth_url: config::spotify_auth_url(),
            client_id: config::spotify_client_id().unwrap_or_default(),
            redirect_uri: config::spotify_redirect_uri(),
        }
    }
}

/// Drives login, session verification and logout.
///
/// The current [`AuthState`] is published on a watch channel; `is_loading`
/// is true only while a stored token is being checked.
pub struct AuthManager {
    client: ApiClient,
    login: LoginConfig,
    state: watch::Sender<AuthState>,
}

impl AuthManager {
    pub fn new(client: ApiClient, login: LoginConfig) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            client,
            login,
            state,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Verifies the stored token by fetching the current user.
    ///
    /// # State Transitions
    ///
    /// - no stored token: `Unauthenticated` without any request
    /// - profile fetched: `Checking` then `Authenticated`
    /// - token rejected (401): `Checking` then `Unauthenticated`; the client
    ///   pipeline has already cleared the stored token
    /// - any other failure: `Checking` then `Unauthenticated`, the token is
    ///   kept since it may still be valid
    pub async fn bootstrap(&self) -> AuthState {
        if !self.session().is_present().await {
            self.state.send_replace(AuthState::Unauthenticated);
            return AuthState::Unauthenticated;
        }

        self.state.send_replace(AuthState::Checking);

        let next = match self
            .client
            .get::<User>(spotify::auth::ME_PATH, &FetchParams::new())
            .await
        {
            Ok(user) => AuthState::Authenticated(user),
            Err(e) if e.is_session_invalidated() => AuthState::Unauthenticated,
            Err(e) => {
                warning!("Could not verify the session, keeping the stored token: {}", e);
                AuthState::Unauthenticated
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    pub fn login_url(&self) -> Result<String, String> {
        if self.login.client_id.is_empty() {
            return Err("SPOTIFY_CLIENT_ID must be set".to_string());
        }
        spotify::auth::authorize_url(
            &self.login.auth_url,
            &self.login.client_id,
            &self.login.redirect_uri,
        )
    }

    /// Opens the Spotify consent screen in the default browser.
    ///
    /// Returns the authorization URL; when no browser can be launched the URL
    /// is printed so the user can open it manually.
    pub fn begin_login(&self) -> Result<String, String> {
        let url = self.login_url()?;
        if webbrowser::open(&url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            );
        }
        Ok(url)
    }

    /// Finishes a login from the parameters Spotify redirected back with.
    ///
    /// # Errors
    ///
    /// - [`LoginError::AccessDenied`] - the user declined consent
    /// - [`LoginError::MissingCode`] - the redirect carried no code
    /// - [`LoginError::ExchangeFailed`] - the backend could not turn the code
    ///   into a token, or answered with an unexpected body
    /// - [`LoginError::Storage`] - the token could not be persisted
    ///
    /// On success the token is stored with an expiry of now plus its
    /// lifetime. The state stays as it is; call [`bootstrap`](Self::bootstrap)
    /// to load the user.
    pub async fn complete_login(&self, params: &CallbackParams) -> Result<LoginSuccess, LoginError> {
        if let Some(error) = &params.error {
            return Err(LoginError::AccessDenied(error.clone()));
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(LoginError::MissingCode)?;

        let token = spotify::auth::exchange_code(&self.client, code)
            .await
            .map_err(LoginError::ExchangeFailed)?;

        let lifetime = i64::try_from(token.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.session()
            .establish(&token.access_token, expires_at)
            .await?;

        Ok(LoginSuccess { expires_at })
    }

    /// Clears the session and returns the path to navigate to.
    pub async fn logout(&self) -> &'static str {
        self.session().end().await;
        self.state.send_replace(AuthState::Unauthenticated);
        ROOT_PATH
    }
}
