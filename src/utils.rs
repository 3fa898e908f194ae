use chrono::NaiveDate;

use crate::types::{
    Artist, ArtistTableRow, GenreData, GenreTableRow, TimeRange, Track, TrackTableRow,
};

/// Formats a track length as `m:ss`.
pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

pub fn join_artist_names(track: &Track) -> String {
    track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Default name of a generated playlist, e.g. `My Top Tracks - Last 4 weeks - 2025-03-01`.
pub fn playlist_name(time_range: TimeRange, date: NaiveDate) -> String {
    format!(
        "My Top Tracks - {} - {}",
        time_range.label(),
        date.format("%Y-%m-%d")
    )
}

pub fn playlist_description(time_range: TimeRange) -> String {
    format!("Your top tracks from {}", time_range.phrase())
}

/// Formats a share such as `12.5` as `12.5%`, dropping trailing zeros.
pub fn format_percentage(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}%", rounded)
}

pub fn track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            rank: i + 1,
            name: t.name.clone(),
            artists: join_artist_names(t),
            album: t.album.name.clone(),
            duration: format_duration(t.duration_ms),
        })
        .collect()
}

pub fn artist_rows(artists: &[Artist]) -> Vec<ArtistTableRow> {
    artists
        .iter()
        .enumerate()
        .map(|(i, a)| ArtistTableRow {
            rank: i + 1,
            name: a.name.clone(),
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(", "),
            followers: a.followers.total,
        })
        .collect()
}

pub fn genre_rows(genres: &[GenreData]) -> Vec<GenreTableRow> {
    genres
        .iter()
        .map(|g| GenreTableRow {
            genre: g.name.clone(),
            tracks: g.count,
            share: format_percentage(g.percentage),
        })
        .collect()
}
