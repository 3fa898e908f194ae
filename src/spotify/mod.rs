//! # Dashboard Backend Integration
//!
//! Everything that goes over the wire to the dashboard backend. The backend
//! holds the Spotify client secret, exchanges authorization codes and proxies
//! the statistics endpoints; this module is the client side of that contract.
//!
//! ## Architecture
//!
//! ```text
//! Views (CLI)          management::{AuthManager, ResourceFetcher}
//!          ↓                          ↓
//!        client::ApiClient  (bearer injection, 401 handling)
//!          ↓
//!     Dashboard backend  →  Spotify Web API
//! ```
//!
//! ## Modules
//!
//! - [`client`] - the single request pipeline. Attaches the stored token as a
//!   bearer credential and turns a `401 Unauthorized` into a cleared session
//!   plus [`ApiError::SessionInvalidated`].
//! - [`auth`] - authorization URL construction and the unauthenticated
//!   code-for-token exchange.
//! - [`stats`] - endpoints and parameter builders for top tracks, top artists
//!   and the genre breakdown.
//! - [`playlist`] - playlist generation from a template.
//!
//! ## Endpoints
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | POST | `/api/spotify/auth/callback` | none |
//! | GET | `/api/spotify/me` | bearer |
//! | GET | `/api/spotify/top/tracks` | bearer |
//! | GET | `/api/spotify/top/artists` | bearer |
//! | GET | `/api/spotify/analytics/genres` | bearer |
//! | POST | `/api/spotify/playlists/generate` | bearer |
//!
//! ## Error Types
//!
//! All calls return [`ApiError`]:
//! - `SessionInvalidated` - the token was rejected; the session is already
//!   cleared and subscribers have been told to go back to the root
//! - `Status` - any other non-success status, with the response body
//! - `Transport` - connection or protocol failure
//! - `Decode` - the body did not have the expected shape
//!
//! Timeouts are left to the transport defaults.

pub mod auth;
pub mod client;
pub mod playlist;
pub mod stats;

pub use client::{ApiClient, ApiError};
