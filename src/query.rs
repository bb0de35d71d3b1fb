//! Query classification: deciding whether a raw input string is a URL,
//! which platform owns it, and whether it addresses a single track or a
//! whole collection. Pure string/URL inspection, no I/O.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SoundCloud share-link hosts that redirect to the canonical track or
/// set URL. These cannot be pattern-matched until expanded.
const SOUNDCLOUD_SHORT_HOSTS: [&str; 3] = [
    "on.soundcloud.com",
    "soundcloud.app.goo.gl",
    "www.soundcloud.app.goo.gl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Soundcloud,
    Spotify,
    Generic,
    None,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Youtube => write!(f, "youtube"),
            Platform::Soundcloud => write!(f, "soundcloud"),
            Platform::Spotify => write!(f, "spotify"),
            Platform::Generic => write!(f, "generic"),
            Platform::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryShape {
    Track,
    Playlist,
    None,
}

/// Classification of one raw input string. Produced once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInfo {
    pub is_url: bool,
    pub platform: Platform,
    pub shape: QueryShape,
}

impl QueryInfo {
    const NOT_A_URL: QueryInfo = QueryInfo {
        is_url: false,
        platform: Platform::None,
        shape: QueryShape::None,
    };

    fn url(platform: Platform, shape: QueryShape) -> Self {
        QueryInfo {
            is_url: true,
            platform,
            shape,
        }
    }
}

/// Classifies a raw query string. Never fails: anything that does not
/// parse as an absolute `http`/`https` URL is treated as free text.
pub fn check_query(input: &str) -> QueryInfo {
    let url = match Url::parse(input.trim()) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u,
        _ => return QueryInfo::NOT_A_URL,
    };

    let host = match url.host_str() {
        Some(h) => h.to_ascii_lowercase(),
        None => return QueryInfo::NOT_A_URL,
    };
    let path = url.path();

    match host.as_str() {
        "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let shape = if path.starts_with("/playlist") {
                QueryShape::Playlist
            } else {
                QueryShape::Track
            };
            QueryInfo::url(Platform::Youtube, shape)
        }
        // Short video links carry the id as the path; never a playlist.
        "youtu.be" => QueryInfo::url(Platform::Youtube, QueryShape::Track),
        "soundcloud.com" | "www.soundcloud.com" | "m.soundcloud.com" => {
            let shape = if path.contains("/sets/") {
                QueryShape::Playlist
            } else {
                QueryShape::Track
            };
            QueryInfo::url(Platform::Soundcloud, shape)
        }
        h if SOUNDCLOUD_SHORT_HOSTS.contains(&h) => {
            // Shape is unknowable until the redirect is followed; the
            // orchestrator expands the link and re-classifies.
            QueryInfo::url(Platform::Soundcloud, QueryShape::Track)
        }
        "open.spotify.com" => {
            let shape = if path.contains("/playlist/") {
                QueryShape::Playlist
            } else {
                QueryShape::Track
            };
            QueryInfo::url(Platform::Spotify, shape)
        }
        _ => QueryInfo::url(Platform::Generic, QueryShape::Track),
    }
}

/// True when the input is a SoundCloud share link that must be expanded
/// (redirect followed, query parameters stripped) before classification
/// can see the canonical URL.
pub fn is_short_link(input: &str) -> bool {
    Url::parse(input.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .is_some_and(|h| SOUNDCLOUD_SHORT_HOSTS.contains(&h.as_str()))
}

/// Drops every query parameter (and fragment) from a resolved URL.
/// Expanded share links carry tracking parameters that would otherwise
/// defeat path-pattern matching.
pub fn strip_query_params(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    url
}
