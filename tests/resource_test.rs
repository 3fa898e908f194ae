mod common;

use common::{EXPIRED_TOKEN, MockBackend, VALID_TOKEN};
use serde_json::json;
use statify::{
    management::{
        CredentialStore, FetchParams, ParamValue, ResourceFetcher, ResourceView, SessionEvent,
        normalize_items,
    },
    spotify::stats::{GENRES_PATH, TOP_ARTISTS_PATH, TOP_TRACKS_PATH, top_params},
    types::{Artist, GenreData, TimeRange, Track},
};

fn range(value: &str) -> FetchParams {
    FetchParams::new().with("time_range", value)
}

fn ids(view: &ResourceView<Track>) -> Vec<String> {
    view.data.iter().map(|t| t.id.clone()).collect()
}

#[test]
fn test_normalize_items_accepts_wrapped_and_bare_lists() {
    let wrapped: Vec<Track> = normalize_items(json!({ "items": [common::track(1)] })).unwrap();
    assert_eq!(wrapped.len(), 1);
    assert_eq!(wrapped[0].id, "track-1");

    let bare: Vec<Track> =
        normalize_items(json!([common::track(1), common::track(2)])).unwrap();
    assert_eq!(bare.len(), 2);
    assert_eq!(bare[1].id, "track-2");
}

#[test]
fn test_normalize_items_other_shapes_are_empty() {
    for body in [
        json!({ "tracks": [common::track(1)] }),
        json!({ "items": "nope" }),
        json!({}),
        json!(null),
        json!("text"),
        json!(42),
    ] {
        let items: Vec<Track> = normalize_items(body.clone()).unwrap();
        assert!(items.is_empty(), "{} should normalize to nothing", body);
    }
}

#[test]
fn test_normalize_items_rejects_malformed_entries() {
    let result = normalize_items::<Track>(json!({ "items": [{ "nope": 1 }] }));
    assert!(result.is_err());
}

#[test]
fn test_fetch_params_compare_by_content() {
    let a = FetchParams::new()
        .with("time_range", "short_term")
        .with("limit", 10);
    let mut b = FetchParams::new();
    b.insert("limit", 10);
    b.insert("time_range", "short_term");

    assert_eq!(a, b);
    assert_ne!(a, FetchParams::new().with("time_range", "short_term"));
    assert_ne!(a, a.clone().with("limit", "10"));
    assert_eq!(a.get("limit"), Some(&ParamValue::Number(10)));
    assert_eq!(
        a.to_query(),
        vec![
            ("limit".to_string(), "10".to_string()),
            ("time_range".to_string(), "short_term".to_string()),
        ]
    );
}

#[test]
fn test_fetch_params_accept_fractional_numbers() {
    let params = FetchParams::new()
        .with("min_share", 0.5)
        .with("time_range", "long_term");

    assert_eq!(params.get("min_share"), Some(&ParamValue::Float(0.5)));
    assert_eq!(params.to_query()[0], ("min_share".to_string(), "0.5".to_string()));
    assert_eq!(params, FetchParams::new().with("time_range", "long_term").with("min_share", 0.5));
    assert_ne!(params, params.clone().with("min_share", 0.25));
}

#[tokio::test]
async fn test_fractional_parameter_reaches_backend() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<GenreData>::new(client);

    fetcher
        .request(GENRES_PATH, range("short_term").with("min_share", 2.75))
        .await;

    let request = &backend.recorder.all()[0];
    assert_eq!(request.query.get("min_share").unwrap(), "2.75");
    assert_eq!(fetcher.view().data.len(), 2);
}

#[test]
fn test_top_params_clamp_limit() {
    let params = top_params(TimeRange::LongTerm, 500);
    assert_eq!(params.get("limit"), Some(&ParamValue::Number(50)));
    assert_eq!(
        params.get("time_range"),
        Some(&ParamValue::Text("long_term".to_string()))
    );

    let params = top_params(TimeRange::ShortTerm, 0);
    assert_eq!(params.get("limit"), Some(&ParamValue::Number(1)));
}

#[tokio::test]
async fn test_initial_view_is_empty_and_idle() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);

    assert_eq!(fetcher.view(), ResourceView::default());
    assert_eq!(fetcher.fetch_count(), 0);
    assert!(!fetcher.refresh().await);
    assert!(backend.recorder.all().is_empty());
}

#[tokio::test]
async fn test_parameter_change_replaces_list() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);

    assert!(
        fetcher
            .request(TOP_TRACKS_PATH, top_params(TimeRange::ShortTerm, 50))
            .await
    );
    let view = fetcher.view();
    assert!(!view.is_loading);
    assert_eq!(view.data.len(), 50);
    assert_eq!(view.data[0].id, "track-0");
    assert_eq!(view.data[49].id, "track-49");

    assert!(
        fetcher
            .request(TOP_TRACKS_PATH, top_params(TimeRange::LongTerm, 50))
            .await
    );
    assert_eq!(
        ids(&fetcher.view()),
        vec!["track-100", "track-101", "track-102"]
    );
    assert_eq!(backend.recorder.count(TOP_TRACKS_PATH), 2);
}

#[tokio::test]
async fn test_identical_request_is_not_refetched() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);

    assert!(fetcher.request(TOP_TRACKS_PATH, range("short_term")).await);
    assert!(!fetcher.request(TOP_TRACKS_PATH, range("short_term")).await);

    assert_eq!(backend.recorder.count(TOP_TRACKS_PATH), 1);
    assert_eq!(fetcher.fetch_count(), 1);
    assert_eq!(fetcher.view().data.len(), 50);
}

#[tokio::test]
async fn test_refresh_refetches_last_request() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);

    fetcher.request(TOP_TRACKS_PATH, range("long_term")).await;
    assert!(fetcher.refresh().await);

    let requests = backend.recorder.all();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query.get("time_range").unwrap(), "long_term");
    assert_eq!(fetcher.view().data.len(), 3);
}

#[tokio::test]
async fn test_failure_empties_list() {
    let backend = MockBackend::start().await;
    let (client, store) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);

    fetcher.request(TOP_TRACKS_PATH, range("short_term")).await;
    assert_eq!(fetcher.view().data.len(), 50);

    fetcher.request(TOP_TRACKS_PATH, range("broken")).await;

    assert_eq!(fetcher.view(), ResourceView::default());
    // a 400 is not a session problem
    assert_eq!(store.get().await.as_deref(), Some(VALID_TOKEN));
}

#[tokio::test]
async fn test_unexpected_shapes_yield_empty_list() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);

    fetcher.request(TOP_TRACKS_PATH, range("weird")).await;
    assert!(fetcher.view().data.is_empty());

    fetcher.request(TOP_TRACKS_PATH, range("short_term")).await;
    fetcher.request(TOP_TRACKS_PATH, range("bad_items")).await;
    assert!(fetcher.view().data.is_empty());
    assert!(!fetcher.view().is_loading);
}

#[tokio::test]
async fn test_loading_flag_is_raised_while_fetching() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);
    let mut rx = fetcher.subscribe();

    let params = range("short_term").with("delay_ms", 100);
    let (_, loading) = tokio::join!(fetcher.request(TOP_TRACKS_PATH, params), async {
        rx.changed().await.unwrap();
        let loading = rx.borrow_and_update().is_loading;
        loading
    });

    assert!(loading);
    let view = fetcher.view();
    assert!(!view.is_loading);
    assert_eq!(view.data.len(), 50);
}

#[tokio::test]
async fn test_unauthorized_fetch_clears_session() {
    let backend = MockBackend::start().await;
    let (client, store) = backend.client(Some(EXPIRED_TOKEN)).await;
    let mut events = client.session().subscribe();
    let fetcher = ResourceFetcher::<Artist>::new(client);

    fetcher.request(TOP_ARTISTS_PATH, range("short_term")).await;

    assert!(fetcher.view().data.is_empty());
    assert_eq!(store.get().await, None);
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Invalidated { redirect: "/" }
    );
}

#[tokio::test]
async fn test_newest_request_wins_over_slow_older_one() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;
    let fetcher = ResourceFetcher::<Track>::new(client);

    let slow = range("short_term").with("delay_ms", 300);
    let fast = range("long_term");

    tokio::join!(
        fetcher.request(TOP_TRACKS_PATH, slow),
        fetcher.request(TOP_TRACKS_PATH, fast)
    );

    let view = fetcher.view();
    assert!(!view.is_loading);
    assert_eq!(ids(&view), vec!["track-100", "track-101", "track-102"]);
    assert_eq!(fetcher.fetch_count(), 2);
}

#[tokio::test]
async fn test_other_resources_normalize() {
    let backend = MockBackend::start().await;
    let (client, _) = backend.client(Some(VALID_TOKEN)).await;

    let artists = ResourceFetcher::<Artist>::new(client.clone());
    artists
        .request(TOP_ARTISTS_PATH, top_params(TimeRange::MediumTerm, 10))
        .await;
    let data = artists.view().data;
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].genres, vec!["indie pop", "dream pop"]);
    assert_eq!(data[1].followers.total, 30);

    let genres = ResourceFetcher::<GenreData>::new(client);
    genres.request(GENRES_PATH, range("medium_term")).await;
    let data = genres.view().data;
    assert_eq!(data[0].name, "indie pop");
    assert_eq!(data[1].percentage, 6.0);
}
