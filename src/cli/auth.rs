use std::{sync::Arc, time::Duration};

use tabled::Table;
use tokio::{sync::mpsc, time::timeout};

use crate::{
    api::{CallbackState, LoginOutcome},
    config, error, info,
    management::{AuthState, LoginSuccess},
    server, success,
    types::UserTableRow,
    warning,
};

use super::{connect, require_user};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Time the callback server gets to deliver the failure page before the
/// command exits.
const PAGE_FLUSH_DELAY: Duration = Duration::from_millis(500);

/// Connects the Spotify account.
///
/// Starts the local callback server, opens the consent screen and waits for
/// Spotify to redirect back. Does nothing beyond a greeting when the stored
/// session is still valid.
pub async fn auth() {
    let (_, auth) = connect();

    if let AuthState::Authenticated(user) = auth.bootstrap().await {
        success!("Already logged in as {}", user.name());
        return;
    }

    let auth = Arc::new(auth);
    let (tx, mut rx) = mpsc::channel(1);
    let state = CallbackState {
        auth: Arc::clone(&auth),
        outcome: tx,
    };

    if let Err(e) = server::start_callback_server(&config::callback_server_addr(), state).await {
        error!("Cannot start the login callback server: {}", e);
    }

    if let Err(e) = auth.begin_login() {
        error!("Cannot start login: {}", e);
    }

    info!("Waiting for Spotify to redirect back...");

    match wait_for_login(&mut rx, LOGIN_TIMEOUT).await {
        Ok(_) => match auth.bootstrap().await {
            AuthState::Authenticated(user) => success!("Logged in as {}", user.name()),
            _ => warning!("Logged in, but the profile could not be loaded yet."),
        },
        Err(message) => error!("{}", message),
    }
}

/// Waits for the callback server to report the login outcome.
///
/// The handler reports before its page is written, so on failure this waits
/// [`PAGE_FLUSH_DELAY`] before returning the message to show.
pub async fn wait_for_login(
    outcomes: &mut mpsc::Receiver<LoginOutcome>,
    limit: Duration,
) -> Result<LoginSuccess, String> {
    match timeout(limit, outcomes.recv()).await {
        Ok(Some(Ok(success))) => Ok(success),
        Ok(Some(Err(e))) => {
            tokio::time::sleep(PAGE_FLUSH_DELAY).await;
            Err(e.user_message().to_string())
        }
        Ok(None) | Err(_) => Err("Authentication failed or timed out.".to_string()),
    }
}

pub async fn logout() {
    let (_, auth) = connect();
    auth.logout().await;
    success!("Logged out.");
}

pub async fn whoami() {
    let (_, auth) = connect();
    let Some(user) = require_user(&auth).await else {
        return;
    };

    let row = UserTableRow {
        id: user.id.clone(),
        name: user.name().to_string(),
        avatar: user.avatar_url().unwrap_or("-").to_string(),
    };
    println!("{}", Table::new(vec![row]));
}
