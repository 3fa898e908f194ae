use std::sync::Arc;

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::mpsc;

use crate::{
    management::{AuthManager, CallbackParams, LoginError, LoginSuccess},
    warning,
};

pub type LoginOutcome = Result<LoginSuccess, LoginError>;

/// Shared with the callback handler: the auth manager that completes the
/// login and the channel the waiting command listens on.
#[derive(Clone)]
pub struct CallbackState {
    pub auth: Arc<AuthManager>,
    pub outcome: mpsc::Sender<LoginOutcome>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<CallbackState>,
) -> Html<String> {
    let result = state.auth.complete_login(&params).await;

    let page = match &result {
        Ok(_) => success_page(),
        Err(e) => {
            warning!("Login failed: {}", e);
            error_page(e.user_message())
        }
    };

    if state.outcome.send(result).await.is_err() {
        warning!("Login callback received but no command is waiting for it");
    }

    Html(page)
}

fn success_page() -> String {
    "<h2>Successfully Connected!</h2><p>You can close this window and return to the terminal.</p>"
        .to_string()
}

fn error_page(reason: &str) -> String {
    format!(
        "<h2>Authentication Failed</h2><p>{}</p><p>Run <code>{} auth</code> to try again.</p>",
        reason,
        env!("CARGO_PKG_NAME")
    )
}
