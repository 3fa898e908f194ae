use serde::de::DeserializeOwned;
use tabled::Table;

use crate::{
    info,
    management::{FetchParams, ResourceFetcher, ResourceView},
    spotify::stats,
    types::{Artist, GenreData, TimeRange, Track},
    utils,
};

use super::{connect, report_invalidation, require_user, spinner};

pub async fn top_tracks(time_range: TimeRange, limit: u32) {
    let Some(data) = fetch::<Track>(
        stats::TOP_TRACKS_PATH,
        stats::top_params(time_range, limit),
        "Loading top tracks...",
    )
    .await
    else {
        return;
    };

    if data.is_empty() {
        info!("No tracks found for this time period");
        return;
    }

    info!("Top tracks · {}", time_range.label());
    println!("{}", Table::new(utils::track_rows(&data)));
}

pub async fn top_artists(time_range: TimeRange, limit: u32) {
    let Some(data) = fetch::<Artist>(
        stats::TOP_ARTISTS_PATH,
        stats::top_params(time_range, limit),
        "Loading top artists...",
    )
    .await
    else {
        return;
    };

    if data.is_empty() {
        info!("No artists found for this time period");
        return;
    }

    info!("Top artists · {}", time_range.label());
    println!("{}", Table::new(utils::artist_rows(&data)));
}

pub async fn genres(time_range: TimeRange) {
    let Some(data) = fetch::<GenreData>(
        stats::GENRES_PATH,
        stats::genre_params(time_range),
        "Loading genres...",
    )
    .await
    else {
        return;
    };

    if data.is_empty() {
        info!("No genre data available for this time period");
        return;
    }

    info!("Top genres · {}", time_range.label());
    println!("{}", Table::new(utils::genre_rows(&data)));
}

/// `None` when there is no session to fetch with.
async fn fetch<T>(endpoint: &str, params: FetchParams, message: &'static str) -> Option<Vec<T>>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    let (client, auth) = connect();
    require_user(&auth).await?;

    let mut events = client.session().subscribe();
    let fetcher = ResourceFetcher::<T>::new(client);

    let pb = spinner(message);
    fetcher.request(endpoint, params).await;
    pb.finish_and_clear();

    report_invalidation(&mut events);

    let ResourceView { data, .. } = fetcher.view();
    Some(data)
}
