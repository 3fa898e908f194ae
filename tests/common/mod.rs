#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{Value, json};
use statify::{
    management::{CredentialStore, MemoryCredentialStore, Session},
    spotify::ApiClient,
};

pub const VALID_TOKEN: &str = "tok1";
pub const EXPIRED_TOKEN: &str = "expired";
pub const FLAKY_TOKEN: &str = "flaky";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: &'static str,
    pub query: HashMap<String, String>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    fn record(
        &self,
        method: &'static str,
        path: &'static str,
        query: HashMap<String, String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) -> Option<String> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path,
            query,
            bearer: bearer.clone(),
            body,
        });
        bearer
    }

    pub fn all(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.all().iter().filter(|r| r.path == path).count()
    }
}

/// In-process stand-in for the dashboard backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub recorder: Recorder,
}

impl MockBackend {
    pub async fn start() -> Self {
        let recorder = Recorder::default();
        let app = Router::new()
            .route("/api/spotify/auth/callback", post(exchange))
            .route("/api/spotify/me", get(me))
            .route("/api/spotify/top/tracks", get(top_tracks))
            .route("/api/spotify/top/artists", get(top_artists))
            .route("/api/spotify/analytics/genres", get(genres))
            .route("/api/spotify/playlists/generate", post(generate_playlist))
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, recorder }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client with a fresh in-memory store, optionally holding `token`.
    pub async fn client(&self, token: Option<&str>) -> (ApiClient, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        if let Some(token) = token {
            store
                .set(token, Utc::now() + ChronoDuration::hours(1))
                .await
                .unwrap();
        }
        let session = Session::new(store.clone());
        (ApiClient::new(self.base_url(), session), store)
    }
}

pub fn track(i: usize) -> Value {
    json!({
        "id": format!("track-{}", i),
        "name": format!("Track {}", i),
        "artists": [{ "id": format!("artist-{}", i), "name": format!("Artist {}", i) }],
        "album": { "name": format!("Album {}", i), "images": [{ "url": "https://img/1" }] },
        "duration_ms": 180_000 + i as u64 * 1000,
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", i) },
        "uri": format!("spotify:track:{}", i)
    })
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "The access token expired" })),
    )
}

/// 401 for the expired token or no token, 500 for the flaky one.
fn check_bearer(bearer: &Option<String>) -> Option<(StatusCode, Json<Value>)> {
    match bearer.as_deref() {
        None | Some(EXPIRED_TOKEN) => Some(unauthorized()),
        Some(FLAKY_TOKEN) => Some((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "upstream unavailable" })),
        )),
        Some(_) => None,
    }
}

async fn exchange(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    recorder.record(
        "POST",
        "/api/spotify/auth/callback",
        HashMap::new(),
        &headers,
        Some(body.clone()),
    );

    match body["code"].as_str() {
        Some("abc123") => (
            StatusCode::OK,
            Json(json!({ "access_token": VALID_TOKEN, "expires_in": 3600, "refresh_token": "r1" })),
        ),
        Some("forever") => (
            StatusCode::OK,
            Json(json!({ "access_token": "tokbig", "expires_in": 10_000_000_000_000_000u64 })),
        ),
        Some("garbled") =>(StatusCode::OK, Json(json!({ "unexpected": true }))),
        Some("revoked") => unauthorized(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        ),
    }
}

async fn me(State(recorder): State<Recorder>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let bearer = recorder.record("GET", "/api/spotify/me", HashMap::new(), &headers, None);
    if let Some(failure) = check_bearer(&bearer) {
        return failure;
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "user-1",
            "display_name": "Test Listener",
            "images": [{ "url": "https://img/avatar", "height": 64, "width": 64 }]
        })),
    )
}

async fn top_tracks(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let bearer = recorder.record(
        "GET",
        "/api/spotify/top/tracks",
        query.clone(),
        &headers,
        None,
    );
    if let Some(failure) = check_bearer(&bearer) {
        return failure;
    }

    if let Some(ms) = query.get("delay_ms").and_then(|v| v.parse::<u64>().ok()) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    let limit = query
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(50);

    match query.get("time_range").map(String::as_str) {
        Some("short_term") => {
            let items: Vec<Value> = (0..limit).map(track).collect();
            (StatusCode::OK, Json(json!({ "items": items })))
        }
        Some("long_term") => {
            let items: Vec<Value> = (100..103).map(track).collect();
            (StatusCode::OK, Json(Value::Array(items)))
        }
        Some("broken") => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid time range" })),
        ),
        Some("weird") => (StatusCode::OK, Json(json!({ "tracks": [track(1)] }))),
        Some("bad_items") => (StatusCode::OK, Json(json!({ "items": [{ "nope": 1 }] }))),
        _ => (StatusCode::OK, Json(json!({ "items": [track(7)] }))),
    }
}

async fn top_artists(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let bearer = recorder.record("GET", "/api/spotify/top/artists", query, &headers, None);
    if let Some(failure) = check_bearer(&bearer) {
        return failure;
    }

    (
        StatusCode::OK,
        Json(json!({
            "items": [
                {
                    "id": "a1",
                    "name": "First Artist",
                    "images": [],
                    "genres": ["indie pop", "dream pop"],
                    "followers": { "total": 1200 },
                    "external_urls": { "spotify": "https://open.spotify.com/artist/a1" }
                },
                {
                    "id": "a2",
                    "name": "Second Artist",
                    "genres": ["shoegaze"],
                    "followers": { "total": 30 }
                }
            ]
        })),
    )
}

async fn genres(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let bearer = recorder.record("GET", "/api/spotify/analytics/genres", query, &headers, None);
    if let Some(failure) = check_bearer(&bearer) {
        return failure;
    }

    (
        StatusCode::OK,
        Json(json!({
            "items": [
                { "name": "indie pop", "count": 6, "percentage": 12.0 },
                { "name": "shoegaze", "count": 3, "percentage": 6.0 }
            ]
        })),
    )
}

async fn generate_playlist(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let bearer = recorder.record(
        "POST",
        "/api/spotify/playlists/generate",
        HashMap::new(),
        &headers,
        Some(body.clone()),
    );
    if let Some(failure) = check_bearer(&bearer) {
        return failure;
    }

    if body["time_range"] == "long_term" {
        return (
            StatusCode::OK,
            Json(json!({
                "message": "No tracks found for the selected time period",
                "name": body["name"]
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "pl-1",
            "name": body["name"],
            "description": body["description"],
            "tracks_added": 50,
            "external_urls": { "spotify": "https://open.spotify.com/playlist/pl-1" }
        })),
    )
}
