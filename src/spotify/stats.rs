use crate::{management::FetchParams, types::TimeRange};

pub const TOP_TRACKS_PATH: &str = "/api/spotify/top/tracks";
pub const TOP_ARTISTS_PATH: &str = "/api/spotify/top/artists";
pub const GENRES_PATH: &str = "/api/spotify/analytics/genres";

/// The backend caps top lists at 50 entries.
pub const MAX_LIMIT: u32 = 50;

pub fn top_params(time_range: TimeRange, limit: u32) -> FetchParams {
    FetchParams::new()
        .with("time_range", time_range.as_str())
        .with("limit", limit.clamp(1, MAX_LIMIT))
}

pub fn genre_params(time_range: TimeRange) -> FetchParams {
    FetchParams::new().with("time_range", time_range.as_str())
}
