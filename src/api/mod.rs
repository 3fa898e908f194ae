//! # API Module
//!
//! HTTP handlers of the local login server. Spotify redirects the browser to
//! this server after the consent screen, which makes it the redirect target
//! of the login flow.
//!
//! ## Endpoints
//!
//! - [`callback`] - receives `code` or `error` from Spotify, completes the
//!   login through [`crate::management::AuthManager`], renders a success or
//!   failure page and hands the outcome to the waiting `auth` command.
//! - [`health`] - reports status and version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use statify::server;
//!
//! let addr = server::start_callback_server("127.0.0.1:3000", state).await?;
//! ```

mod callback;
mod health;

pub use callback::{CallbackState, LoginOutcome, callback};
pub use health::health;
