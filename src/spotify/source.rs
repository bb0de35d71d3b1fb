//! The Spotify platform adapter. Spotify supplies metadata only, so every
//! resolution goes through the cross-platform matcher to locate a
//! playable upload.

use async_trait::async_trait;
use reqwest::Url;

use super::client::SpotifyClient;
use crate::errors::ResolveError;
use crate::matcher::Matcher;
use crate::models::Song;
use crate::providers::{buffered_ordered, PlatformAdapter};

pub struct SpotifySource {
    client: SpotifyClient,
    matcher: Matcher,
    max_concurrency: usize,
}

impl SpotifySource {
    pub fn new(client: SpotifyClient, matcher: Matcher, max_concurrency: usize) -> Self {
        Self {
            client,
            matcher,
            max_concurrency,
        }
    }
}

#[async_trait]
impl PlatformAdapter for SpotifySource {
    async fn fetch_track(&self, url: &str) -> Result<Song, ResolveError> {
        let id = extract_id(url, "track")
            .ok_or_else(|| ResolveError::NotFound(format!("no track id in {}", url)))?;
        let track = self.client.track(&id).await?;
        self.matcher.find_match(&track.metadata()).await
    }

    async fn fetch_collection(&self, url: &str) -> Result<Vec<Song>, ResolveError> {
        let id = extract_id(url, "playlist")
            .ok_or_else(|| ResolveError::NotFound(format!("no playlist id in {}", url)))?;
        let tracks = self.client.playlist_tracks(&id).await?;
        let members = tracks.len();

        // One matcher lookup per member; bounded fan-out, reassembled in
        // playlist order. A failed member is skipped, never fatal.
        let matches = buffered_ordered(
            tracks.into_iter().map(|track| {
                let matcher = &self.matcher;
                async move {
                    match matcher.find_match(&track.metadata()).await {
                        Ok(song) => Some(song),
                        Err(e) => {
                            log::warn!("skipping \"{}\": {}", track.name, e);
                            None
                        }
                    }
                }
            }),
            self.max_concurrency,
        )
        .await;

        let songs: Vec<Song> = matches.into_iter().flatten().collect();
        log::info!(
            "spotify playlist {}: matched {}/{} members",
            id,
            songs.len(),
            members
        );
        Ok(songs)
    }
}

/// Pulls the id following a `/track/` or `/playlist/` path segment,
/// tolerating locale prefixes like `/intl-de/`.
fn extract_id(url: &str, kind: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == kind {
            return segments
                .next()
                .filter(|id| !id.is_empty())
                .map(str::to_string);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ids_from_canonical_and_locale_urls() {
        assert_eq!(
            extract_id("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC", "track").as_deref(),
            Some("4uLU6hMCjMI75M1A2tKUQC")
        );
        assert_eq!(
            extract_id(
                "https://open.spotify.com/intl-de/track/4uLU6hMCjMI75M1A2tKUQC?si=x",
                "track"
            )
            .as_deref(),
            Some("4uLU6hMCjMI75M1A2tKUQC")
        );
        assert_eq!(
            extract_id(
                "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M",
                "playlist"
            )
            .as_deref(),
            Some("37i9dQZF1DXcBWIGoYBM5M")
        );
        assert_eq!(
            extract_id("https://open.spotify.com/track/", "track"),
            None
        );
        assert_eq!(extract_id("https://open.spotify.com/album/x", "track"), None);
    }
}
