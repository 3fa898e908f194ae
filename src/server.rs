use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};
use tokio::net::TcpListener;

use crate::{
    Res,
    api::{self, CallbackState},
    warning,
};

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Binds the login callback server and serves it in the background.
///
/// Returns the bound address, which differs from `addr` when port `0` was
/// requested.
pub async fn start_callback_server(addr: &str, state: CallbackState) -> Res<SocketAddr> {
    let addr = SocketAddr::from_str(addr)?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(state)).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    Ok(bound)
}
