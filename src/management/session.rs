use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::{
    management::credentials::{CredentialError, CredentialStore, FileCredentialStore},
    warning,
};

/// Where the user is sent after logging out or losing the session.
pub const ROOT_PATH: &str = "/";

/// Lifecycle notifications of a [`Session`].
///
/// `Ended` and `Invalidated` carry the navigation target the view layer is
/// expected to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Established,
    Ended { redirect: &'static str },
    Invalidated { redirect: &'static str },
}

/// Shared handle to the session token.
///
/// Cloned into every component that needs the token. Reading is public;
/// writing is reserved to the auth manager and to the remote client's
/// unauthorized handling.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    /// Session backed by the credential file in the local data directory.
    pub fn persistent() -> Self {
        Self::new(Arc::new(FileCredentialStore::default_location()))
    }

    pub async fn token(&self) -> Option<String> {
        self.store.get().await
    }

    pub async fn is_present(&self) -> bool {
        self.token().await.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) async fn establish(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CredentialError> {
        self.store.set(token, expires_at).await?;
        self.emit(SessionEvent::Established);
        Ok(())
    }

    /// Logout.
    pub(crate) async fn end(&self) {
        self.clear_store().await;
        self.emit(SessionEvent::Ended {
            redirect: ROOT_PATH,
        });
    }

    /// The backend rejected the token.
    pub(crate) async fn invalidate(&self) {
        self.clear_store().await;
        self.emit(SessionEvent::Invalidated {
            redirect: ROOT_PATH,
        });
    }

    async fn clear_store(&self) {
        if let Err(e) = self.store.clear().await {
            warning!("Failed to clear stored credentials: {}", e);
        }
    }

    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}
