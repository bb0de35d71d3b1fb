//! SoundCloud lookup over the api-v2 endpoints. Requires a `client_id`,
//! which SoundCloud rotates; it is injected through the resolver config
//! rather than discovered here.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::models::{ScResource, ScSearchPage, ScTrack};
use crate::errors::ResolveError;
use crate::models::Song;
use crate::providers::PlatformAdapter;
use crate::query::strip_query_params;

const API_BASE: &str = "https://api-v2.soundcloud.com";
/// api-v2 caps `/tracks?ids=` lookups at 50 ids per call.
const HYDRATE_BATCH_SIZE: usize = 50;

pub struct SoundcloudClient {
    client: Client,
    client_id: String,
}

impl SoundcloudClient {
    pub fn new(client: Client, client_id: impl Into<String>) -> Self {
        Self {
            client,
            client_id: client_id.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ResolveError> {
        let url = format!("{}{}", API_BASE, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("client_id", self.client_id.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ResolveError::NotFound(format!("soundcloud {}", path))),
            status if !status.is_success() => Err(ResolveError::LookupFailed(format!(
                "soundcloud {}: HTTP {}",
                path, status
            ))),
            _ => Ok(response.json().await?),
        }
    }

    /// Resolves a canonical track or set URL into its api-v2 object.
    pub async fn resolve(&self, url: &str) -> Result<ScResource, ResolveError> {
        self.get_json("/resolve", &[("url", url)]).await
    }

    /// Expands a share link by following its redirect and stripping the
    /// tracking query parameters from wherever it lands.
    pub async fn expand_short_link(&self, url: &str) -> Result<Url, ResolveError> {
        let response = self.client.get(url).send().await?;
        let expanded = strip_query_params(response.url().clone());
        log::debug!("expanded short link {} -> {}", url, expanded);
        Ok(expanded)
    }

    /// Free-text track search.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Song>, ResolveError> {
        let limit_str = limit.to_string();
        let page: ScSearchPage = self
            .get_json("/search/tracks", &[("q", query), ("limit", &limit_str)])
            .await?;
        Ok(page
            .collection
            .into_iter()
            .filter_map(ScTrack::into_song)
            .collect())
    }

    /// Replaces playlist stub members with full track objects, fetched in
    /// id batches. Members that stay unresolvable are dropped later by
    /// `into_song`; order is untouched.
    async fn hydrate_stubs(&self, tracks: Vec<ScTrack>) -> Vec<ScTrack> {
        let missing: Vec<u64> = tracks
            .iter()
            .filter(|t| t.is_stub())
            .map(|t| t.id)
            .collect();
        if missing.is_empty() {
            return tracks;
        }

        let mut hydrated: HashMap<u64, ScTrack> = HashMap::new();
        for chunk in missing.chunks(HYDRATE_BATCH_SIZE) {
            let ids = chunk
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            match self
                .get_json::<Vec<ScTrack>>("/tracks", &[("ids", &ids)])
                .await
            {
                Ok(full) => hydrated.extend(full.into_iter().map(|t| (t.id, t))),
                Err(e) => {
                    log::warn!("soundcloud: hydrating {} stub tracks failed: {}", chunk.len(), e);
                }
            }
        }

        tracks
            .into_iter()
            .map(|t| {
                if t.is_stub() {
                    hydrated.remove(&t.id).unwrap_or(t)
                } else {
                    t
                }
            })
            .collect()
    }
}

#[async_trait]
impl PlatformAdapter for SoundcloudClient {
    async fn fetch_track(&self, url: &str) -> Result<Song, ResolveError> {
        match self.resolve(url).await? {
            ScResource::Track(track) => track
                .into_song()
                .ok_or_else(|| ResolveError::NotFound(format!("soundcloud track {}", url))),
            ScResource::Playlist(_) => {
                Err(ResolveError::NotFound(format!("{} is a set, not a track", url)))
            }
        }
    }

    async fn fetch_collection(&self, url: &str) -> Result<Vec<Song>, ResolveError> {
        let playlist = match self.resolve(url).await? {
            ScResource::Playlist(playlist) => playlist,
            ScResource::Track(_) => {
                return Err(ResolveError::NotFound(format!("{} is a track, not a set", url)))
            }
        };

        let members = playlist.tracks.len();
        let songs: Vec<Song> = self
            .hydrate_stubs(playlist.tracks)
            .await
            .into_iter()
            .filter_map(ScTrack::into_song)
            .collect();
        if songs.len() < members {
            log::warn!(
                "soundcloud set {}: skipped {} unresolvable members",
                url,
                members - songs.len()
            );
        }
        Ok(songs)
    }
}
