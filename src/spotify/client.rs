//! Spotify Web API client using the anonymous web-player token, which is
//! enough for read-only track and playlist metadata. The token is cached
//! until shortly before its expiry.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use super::models::{PlaylistPage, SpotifyTrack, TokenResponse};
use crate::errors::ResolveError;

const TOKEN_URL: &str =
    "https://open.spotify.com/get_access_token?reason=transport&productType=web_player";
const API_BASE: &str = "https://api.spotify.com/v1";
const PLAYLIST_FIELDS: &str = "items(track(id,name,artists(name),duration_ms)),next";
const PLAYLIST_PAGE_LIMIT: usize = 100;
/// Refresh the token this long before Spotify says it expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    client: Client,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, ResolveError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        let response = self.client.get(TOKEN_URL).send().await?;
        if !response.status().is_success() {
            return Err(ResolveError::LookupFailed(format!(
                "spotify token: HTTP {}",
                response.status()
            )));
        }
        let token: TokenResponse = response.json().await?;

        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let ttl = Duration::from_millis(token.expiration_timestamp_ms.saturating_sub(now_ms))
            .saturating_sub(TOKEN_EXPIRY_MARGIN);
        log::debug!("fetched anonymous spotify token, valid for {:?}", ttl);

        *guard = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ResolveError> {
        let token = self.access_token().await?;
        let response = self.client.get(url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ResolveError::NotFound(format!("spotify {}", url))),
            status if !status.is_success() => Err(ResolveError::LookupFailed(format!(
                "spotify {}: HTTP {}",
                url, status
            ))),
            _ => Ok(response.json().await?),
        }
    }

    pub async fn track(&self, id: &str) -> Result<SpotifyTrack, ResolveError> {
        self.get_json(&format!("{}/tracks/{}", API_BASE, id)).await
    }

    /// All playlist members, following pagination. Removed and local-file
    /// entries (null tracks) are dropped; order is preserved.
    pub async fn playlist_tracks(&self, id: &str) -> Result<Vec<SpotifyTrack>, ResolveError> {
        let mut url = Some(format!(
            "{}/playlists/{}/tracks?fields={}&limit={}",
            API_BASE, id, PLAYLIST_FIELDS, PLAYLIST_PAGE_LIMIT
        ));

        let mut tracks = Vec::new();
        while let Some(page_url) = url {
            let page: PlaylistPage = self.get_json(&page_url).await?;
            tracks.extend(page.items.into_iter().filter_map(|item| item.track));
            url = page.next;
        }
        Ok(tracks)
    }
}
