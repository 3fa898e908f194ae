use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    config,
    management::{FetchParams, ROOT_PATH, Session},
    warning,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401; the stored token has already been cleared.
    #[error("session is no longer valid, continue at {redirect}")]
    SessionInvalidated { redirect: &'static str },
    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_session_invalidated(&self) -> bool {
        matches!(self, ApiError::SessionInvalidated { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::SessionInvalidated { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }
}

/// The one outbound pipeline for calls to the dashboard backend.
///
/// Every request made through [`get`](ApiClient::get) or
/// [`post`](ApiClient::post) carries the session token as a bearer
/// credential when one is stored. A `401 Unauthorized` answer clears the
/// stored token, broadcasts [`SessionEvent::Invalidated`](crate::management::SessionEvent)
/// and surfaces as [`ApiError::SessionInvalidated`].
///
/// Cloning is cheap; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    /// Client for the backend configured in `API_BASE_URL`.
    pub fn from_env(session: Session) -> Self {
        Self::new(config::api_base_url(), session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Joins `path` onto the base address; a leading slash is optional.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get_value(&self, path: &str, params: &FetchParams) -> Result<Value, ApiError> {
        let request = self.http.get(self.url(path)).query(&params.to_query());
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &FetchParams,
    ) -> Result<T, ApiError> {
        let value = self.get_value(path, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// POST outside the pipeline: no bearer credential and no unauthorized
    /// handling. Used for the one-shot code exchange.
    pub async fn post_unauthenticated<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let response = Self::check_status(response).await?;
        Self::decode(response).await
    }

    async fn send(&self, mut request: RequestBuilder) -> Result<Response, ApiError> {
        if let Some(token) = self.session.token().await {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warning!(
                "Backend rejected the session on {}, signing out",
                response.url().path()
            );
            self.session.invalidate().await;
            return Err(ApiError::SessionInvalidated {
                redirect: ROOT_PATH,
            });
        }

        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
