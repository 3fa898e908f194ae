mod auth;
mod credentials;
mod resource;
mod session;

pub use auth::{AuthManager, AuthState, CallbackParams, LoginConfig, LoginError, LoginSuccess};
pub use credentials::{
    CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredToken,
};
pub use resource::{FetchParams, ParamValue, ResourceFetcher, ResourceView, normalize_items};
pub use session::{ROOT_PATH, Session, SessionEvent};
