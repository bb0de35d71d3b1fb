use serde::Deserialize;

use crate::matcher::TrackMetadata;

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

/// Track metadata from the Web API. Spotify never supplies a playable
/// audio stream, so this is only ever an input to the matcher.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl SpotifyTrack {
    pub fn metadata(&self) -> TrackMetadata {
        TrackMetadata {
            name: self.name.clone(),
            artists: self.artists.iter().map(|a| a.name.clone()).collect(),
            duration_ms: self.duration_ms,
        }
    }
}

/// One page of `/v1/playlists/{id}/tracks`.
#[derive(Debug, Deserialize)]
pub struct PlaylistPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    /// `null` for removed or local-file entries.
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "accessTokenExpirationTimestampMs")]
    pub expiration_timestamp_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_metadata_carries_all_artists() {
        let track: SpotifyTrack = serde_json::from_value(serde_json::json!({
            "id": "4uLU6hMCjMI75M1A2tKUQC",
            "name": "Never Gonna Give You Up",
            "artists": [{ "name": "Rick Astley" }, { "name": "Someone Else" }],
            "duration_ms": 212826
        }))
        .unwrap();

        let meta = track.metadata();
        assert_eq!(meta.artists, vec!["Rick Astley", "Someone Else"]);
        assert_eq!(meta.duration_ms, 212_826);
        assert_eq!(
            meta.search_phrase(),
            "Rick Astley, Someone Else - Never Gonna Give You Up"
        );
    }

    #[test]
    fn playlist_page_tolerates_null_tracks() {
        let page: PlaylistPage = serde_json::from_value(serde_json::json!({
            "items": [
                { "track": { "id": "a", "name": "A", "artists": [], "duration_ms": 1000 } },
                { "track": null }
            ],
            "next": null
        }))
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.items[1].track.is_none());
    }
}
