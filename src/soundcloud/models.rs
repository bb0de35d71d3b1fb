use serde::Deserialize;

use crate::models::Song;

/// A track object from the api-v2 payloads. Playlist responses include
/// full objects only for the first few members; the rest are stubs
/// carrying just an id, hence the optional fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ScTrack {
    pub id: u64,
    pub title: Option<String>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub full_duration: u64,
}

impl ScTrack {
    /// `None` for stubs that were never hydrated.
    pub fn into_song(self) -> Option<Song> {
        let title = self.title?;
        let url = self.permalink_url?;
        Some(Song {
            id: self.id.to_string(),
            title,
            url,
            duration_ms: self.full_duration,
            thumbnail_url: self.artwork_url.unwrap_or_default(),
        })
    }

    pub fn is_stub(&self) -> bool {
        self.title.is_none() || self.permalink_url.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScPlaylist {
    #[serde(default)]
    pub tracks: Vec<ScTrack>,
}

/// What `/resolve` hands back for a canonical URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScResource {
    Track(ScTrack),
    Playlist(ScPlaylist),
}

#[derive(Debug, Deserialize)]
pub struct ScSearchPage {
    #[serde(default)]
    pub collection: Vec<ScTrack>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_payload_is_tagged_by_kind() {
        let track: ScResource = serde_json::from_value(serde_json::json!({
            "kind": "track",
            "id": 123,
            "title": "Song",
            "permalink_url": "https://soundcloud.com/a/song",
            "artwork_url": "https://i1.sndcdn.com/artworks-x.jpg",
            "full_duration": 201000
        }))
        .unwrap();
        assert!(matches!(track, ScResource::Track(_)));

        let playlist: ScResource = serde_json::from_value(serde_json::json!({
            "kind": "playlist",
            "tracks": [{ "id": 1 }, { "id": 2, "title": "B", "permalink_url": "u" }]
        }))
        .unwrap();
        match playlist {
            ScResource::Playlist(p) => {
                assert_eq!(p.tracks.len(), 2);
                assert!(p.tracks[0].is_stub());
                assert!(!p.tracks[1].is_stub());
            }
            ScResource::Track(_) => panic!("expected playlist"),
        }
    }

    #[test]
    fn stub_track_produces_no_song() {
        let stub = ScTrack {
            id: 9,
            title: None,
            permalink_url: None,
            artwork_url: None,
            full_duration: 0,
        };
        assert!(stub.into_song().is_none());
    }
}
