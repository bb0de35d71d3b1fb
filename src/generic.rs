//! Fallback adapter for URLs on unrecognized hosts: a direct probe of the
//! target. Degrades to a placeholder descriptor instead of failing, so a
//! pasted direct-file link is always enqueueable.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};

use crate::errors::ResolveError;
use crate::models::Song;
use crate::providers::PlatformAdapter;

pub struct GenericClient {
    client: Client,
}

impl GenericClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Probes the URL for media info. Never fails: any error collapses
    /// into the degraded `"Unknown Song"` placeholder.
    pub async fn probe(&self, url: &str) -> Song {
        match self.try_probe(url).await {
            Ok(song) => song,
            Err(e) => {
                log::warn!("media probe failed for {}: {}", url, e);
                placeholder(url)
            }
        }
    }

    async fn try_probe(&self, url: &str) -> Result<Song, ResolveError> {
        // HEAD first; some servers reject it, so fall back to a GET and
        // read only the headers.
        let mut response = self.client.head(url).send().await?;
        if !response.status().is_success() {
            response = self.client.get(url).send().await?;
        }
        if !response.status().is_success() {
            return Err(ResolveError::LookupFailed(format!(
                "probe {}: HTTP {}",
                url,
                response.status()
            )));
        }
        if !is_media_response(&response) {
            return Err(ResolveError::NotFound(format!("{} is not a media resource", url)));
        }

        let title = title_from_url(response.url()).unwrap_or_else(|| "Unknown Song".to_string());
        Ok(Song {
            id: String::new(),
            title,
            url: url.to_string(),
            // Duration is unknowable from headers alone.
            duration_ms: 0,
            thumbnail_url: String::new(),
        })
    }
}

#[async_trait]
impl PlatformAdapter for GenericClient {
    async fn fetch_track(&self, url: &str) -> Result<Song, ResolveError> {
        Ok(self.probe(url).await)
    }

    async fn fetch_collection(&self, url: &str) -> Result<Vec<Song>, ResolveError> {
        Ok(vec![self.probe(url).await])
    }
}

fn is_media_response(response: &Response) -> bool {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    content_type.starts_with("audio/")
        || content_type.starts_with("video/")
        || content_type.starts_with("application/ogg")
        || content_type.starts_with("application/octet-stream")
}

/// The last non-empty path segment, or nothing for bare-host URLs.
fn title_from_url(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}

fn placeholder(url: &str) -> Song {
    Song {
        id: String::new(),
        title: "Unknown Song".to_string(),
        url: url.to_string(),
        duration_ms: 0,
        thumbnail_url: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_last_path_segment() {
        let url = Url::parse("https://files.example.org/music/track.mp3?sig=abc").unwrap();
        assert_eq!(title_from_url(&url).as_deref(), Some("track.mp3"));

        let trailing = Url::parse("https://files.example.org/music/").unwrap();
        assert_eq!(title_from_url(&trailing).as_deref(), Some("music"));

        let bare = Url::parse("https://example.org/").unwrap();
        assert_eq!(title_from_url(&bare), None);
    }

    #[test]
    fn placeholder_keeps_the_original_url() {
        let song = placeholder("https://example.org/mystery");
        assert_eq!(song.title, "Unknown Song");
        assert_eq!(song.url, "https://example.org/mystery");
        assert_eq!(song.id, "");
        assert_eq!(song.duration_ms, 0);
    }
}
