//! # CLI Module
//!
//! The views of statify. Each command is a thin consumer of the session and
//! fetch layers: it checks the session, fetches what it needs and renders a
//! table.
//!
//! ## Commands
//!
//! ### Session
//!
//! - [`auth`] - opens the Spotify consent screen and waits for the redirect
//! - [`logout`] - forgets the stored token
//! - [`whoami`] - shows the logged-in user
//!
//! ### Statistics
//!
//! - [`top_tracks`] - most played tracks for a time range
//! - [`top_artists`] - most played artists for a time range
//! - [`genres`] - genre breakdown of the top artists
//!
//! ### Playlists
//!
//! - [`playlist`] - creates a playlist from the top tracks
//!
//! ## Session Handling
//!
//! Every data command first verifies the stored token. Without a valid
//! session it prints a login hint instead of data. When the backend rejects
//! the token mid-command the session is cleared by the client pipeline and
//! the command reports the expiry after rendering whatever it has.
//!
//! ## Usage Patterns
//!
//! ```bash
//! statify auth                                  # Connect your Spotify account
//! statify tracks --time-range short_term        # Last 4 weeks
//! statify artists --limit 10
//! statify genres --time-range long_term
//! statify playlist --time-range medium_term --public
//! ```

mod auth;
mod playlist;
mod stats;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast;

pub use auth::{auth, logout, wait_for_login, whoami};
pub use playlist::playlist;
pub use stats::{genres, top_artists, top_tracks};

use crate::{
    management::{AuthManager, AuthState, LoginConfig, Session, SessionEvent},
    spotify::ApiClient,
    types::User,
    warning,
};

const LOGIN_HINT: &str = "Run `statify auth` to connect your Spotify account.";

fn connect() -> (ApiClient, AuthManager) {
    let client = ApiClient::from_env(Session::persistent());
    let auth = AuthManager::new(client.clone(), LoginConfig::from_env());
    (client, auth)
}

async fn require_user(auth: &AuthManager) -> Option<User> {
    let pb = spinner("Checking session...");
    let state = auth.bootstrap().await;
    pb.finish_and_clear();

    match state {
        AuthState::Authenticated(user) => Some(user),
        _ => {
            warning!("You are not logged in. {}", LOGIN_HINT);
            None
        }
    }
}

fn report_invalidation(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Invalidated { .. } = event {
            warning!("Your session has expired. {}", LOGIN_HINT);
            return;
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
