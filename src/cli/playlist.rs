use crate::{info, spotify, success, types::TimeRange, warning};

use super::{LOGIN_HINT, connect, require_user, spinner};

/// Creates a playlist from the top tracks of `time_range`.
///
/// The "Creating..." spinner is cleared on every outcome, including an
/// expired session.
pub async fn playlist(time_range: TimeRange, name: Option<String>, public: bool) {
    let (client, auth) = connect();
    if require_user(&auth).await.is_none() {
        return;
    }

    let request = spotify::playlist::top_tracks_request(time_range, name, public);

    let pb = spinner("Creating...");
    let result = spotify::playlist::generate(&client, &request).await;
    pb.finish_and_clear();

    match result {
        Ok(playlist) if playlist.id.is_none() => info!(
            "{}",
            playlist
                .message
                .as_deref()
                .unwrap_or("No tracks found for the selected time period")
        ),
        Ok(playlist) => {
            success!("\"{}\" created successfully!", playlist.name);
            if let Some(count) = playlist.tracks_added {
                info!("{} tracks added", count);
            }
            if let Some(url) = playlist.external_urls.and_then(|u| u.spotify) {
                info!("{}", url);
            }
        }
        Err(e) if e.is_session_invalidated() => {
            warning!("Your session has expired. {}", LOGIN_HINT)
        }
        Err(e) => warning!("Failed to create playlist. Please try again. ({})", e),
    }
}
