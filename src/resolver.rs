//! The resolution orchestrator: classifies a raw query, dispatches to the
//! right platform adapter, and tags the result with how it should be
//! presented. Linear flow, no retries; every adapter failure downgrades
//! to an empty result list.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ResolveError;
use crate::generic::GenericClient;
use crate::matcher::{Matcher, MatcherConfig};
use crate::models::{ResultKind, SearchResult, Song};
use crate::providers::PlatformAdapter;
use crate::query::{check_query, is_short_link, Platform, QueryInfo, QueryShape};
use crate::soundcloud::SoundcloudClient;
use crate::spotify::{SpotifyClient, SpotifySource};
use crate::youtube::{VideoCandidate, YoutubeClient};

/// Which platform serves free-text searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    #[default]
    Youtube,
    Soundcloud,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// api-v2 client id; SoundCloud lookups fail without one.
    pub soundcloud_client_id: String,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Result cap for free-text searches.
    pub search_limit: usize,
    /// In-flight cap for per-member collection lookups.
    pub max_concurrency: usize,
    pub matcher: MatcherConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            soundcloud_client_id: String::new(),
            request_timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            search_limit: 10,
            max_concurrency: 4,
            matcher: MatcherConfig::default(),
        }
    }
}

/// The resolution engine. Owns one adapter per platform; a pure function
/// of (query, source hint) plus the injected HTTP client.
pub struct Resolver {
    youtube: Arc<YoutubeClient>,
    soundcloud: SoundcloudClient,
    spotify: SpotifySource,
    generic: GenericClient,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ResolveError::LookupFailed(format!("http client: {}", e)))?;
        Ok(Self::with_client(config, client))
    }

    /// Builds a resolver around a caller-supplied `reqwest::Client`
    /// (shared connection pool, custom proxy, and so on).
    pub fn with_client(config: ResolverConfig, client: Client) -> Self {
        let youtube = Arc::new(YoutubeClient::new(client.clone()));
        let matcher = Matcher::new(youtube.clone(), config.matcher.clone());
        Self {
            soundcloud: SoundcloudClient::new(
                client.clone(),
                config.soundcloud_client_id.clone(),
            ),
            spotify: SpotifySource::new(
                SpotifyClient::new(client.clone()),
                matcher,
                config.max_concurrency,
            ),
            generic: GenericClient::new(client),
            youtube,
            config,
        }
    }

    /// Resolves one raw query into an ordered list of playable tracks.
    ///
    /// Only an empty query is an error; lookup failures surface as an
    /// empty item list so the caller renders "no results".
    pub async fn resolve(
        &self,
        query: &str,
        source: SearchSource,
    ) -> Result<SearchResult, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::InvalidInput);
        }

        let info = check_query(query);
        if !info.is_url {
            let items = self.search(query, source).await.unwrap_or_else(|e| {
                log::warn!("search \"{}\" on {:?} failed: {}", query, source, e);
                Vec::new()
            });
            return Ok(SearchResult {
                items,
                kind: ResultKind::Selection,
            });
        }

        // Share links hide the real path behind a redirect; expand and
        // re-classify before dispatching.
        let (info, url) = if info.platform == Platform::Soundcloud && is_short_link(query) {
            match self.soundcloud.expand_short_link(query).await {
                Ok(expanded) => {
                    let expanded = expanded.to_string();
                    (check_query(&expanded), expanded)
                }
                Err(e) => {
                    log::warn!("short link {} did not expand: {}", query, e);
                    return Ok(SearchResult {
                        items: Vec::new(),
                        kind: ResultKind::Results,
                    });
                }
            }
        } else {
            (info, query.to_string())
        };

        let items = match self.dispatch(info, &url).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("resolving {} failed: {}", url, e);
                Vec::new()
            }
        };
        Ok(SearchResult {
            items,
            kind: ResultKind::Results,
        })
    }

    async fn dispatch(&self, info: QueryInfo, url: &str) -> Result<Vec<Song>, ResolveError> {
        let adapter: &dyn PlatformAdapter = match info.platform {
            Platform::Youtube => self.youtube.as_ref(),
            Platform::Soundcloud => &self.soundcloud,
            Platform::Spotify => &self.spotify,
            Platform::Generic => &self.generic,
            // A URL always maps to a platform; classification only
            // produces None for free text, handled before dispatch.
            Platform::None => return Ok(Vec::new()),
        };

        match info.shape {
            QueryShape::Playlist => adapter.fetch_collection(url).await,
            QueryShape::Track | QueryShape::None => {
                adapter.fetch_track(url).await.map(|song| vec![song])
            }
        }
    }

    async fn search(
        &self,
        query: &str,
        source: SearchSource,
    ) -> Result<Vec<Song>, ResolveError> {
        match source {
            SearchSource::Youtube => Ok(self
                .youtube
                .search(query, self.config.search_limit)
                .await?
                .into_iter()
                .map(VideoCandidate::into_song)
                .collect()),
            SearchSource::Soundcloud => {
                self.soundcloud.search(query, self.config.search_limit).await
            }
        }
    }
}
