use chrono::Local;

use crate::{
    spotify::{ApiClient, ApiError},
    types::{GeneratePlaylistRequest, GeneratedPlaylist, TimeRange},
    utils,
};

pub const GENERATE_PATH: &str = "/api/spotify/playlists/generate";
pub const TOP_TRACKS_TEMPLATE: &str = "top-tracks";

/// Request for a playlist of the user's top tracks.
///
/// Name and description default to the dated "My Top Tracks" wording when not
/// given.
pub fn top_tracks_request(
    time_range: TimeRange,
    name: Option<String>,
    public: bool,
) -> GeneratePlaylistRequest {
    GeneratePlaylistRequest {
        template: TOP_TRACKS_TEMPLATE.to_string(),
        time_range,
        name: name.unwrap_or_else(|| utils::playlist_name(time_range, Local::now().date_naive())),
        description: utils::playlist_description(time_range),
        public,
    }
}

/// Asks the backend to create a playlist from a template.
///
/// # Returns
///
/// - `Ok(GeneratedPlaylist)` - the created playlist, or a playlist carrying
///   only `name` and `message` when there was nothing to add
/// - `Err(ApiError::SessionInvalidated)` - the token was rejected and cleared
/// - `Err(ApiError)` - any other failure
pub async fn generate(
    client: &ApiClient,
    request: &GeneratePlaylistRequest,
) -> Result<GeneratedPlaylist, ApiError> {
    client.post(GENERATE_PATH, request).await
}
