//! YouTube lookup over the Innertube JSON API. Audio source and metadata
//! come from the same lookup, so this client backs both direct URL
//! resolution and the search side of the cross-platform matcher.
//!
//! Innertube payloads are deeply nested and only partially documented, so
//! parsing navigates `serde_json::Value` with `Option` chains and treats
//! any unexpected shape as a skipped entry.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};

use super::models::{parse_colon_duration, watch_url, VideoCandidate};
use crate::errors::ResolveError;
use crate::models::{best_thumbnail, Song, Thumbnail};
use crate::providers::PlatformAdapter;

const INNERTUBE_BASE: &str = "https://www.youtube.com/youtubei/v1";
const CLIENT_NAME: &str = "WEB";
const CLIENT_VERSION: &str = "2.20240814.00.00";
/// Innertube search filter restricting results to plain videos.
const SEARCH_FILTER_VIDEOS: &str = "EgIQAQ==";

pub struct YoutubeClient {
    client: Client,
}

impl YoutubeClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn call(&self, endpoint: &str, mut body: Value) -> Result<Value, ResolveError> {
        body["context"] = json!({
            "client": { "clientName": CLIENT_NAME, "clientVersion": CLIENT_VERSION }
        });

        let url = format!("{}/{}?prettyPrint=false", INNERTUBE_BASE, endpoint);
        let response = self.client.post(&url).json(&body).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ResolveError::NotFound(format!("youtube {}", endpoint))),
            status if !status.is_success() => Err(ResolveError::LookupFailed(format!(
                "youtube {}: HTTP {}",
                endpoint, status
            ))),
            _ => Ok(response.json().await?),
        }
    }

    /// Looks up a single video by id.
    pub async fn video(&self, id: &str) -> Result<Song, ResolveError> {
        let data = self.call("player", json!({ "videoId": id })).await?;
        parse_video_details(&data)
            .ok_or_else(|| ResolveError::NotFound(format!("youtube video {}", id)))
    }

    /// Lists a playlist's videos in playlist order. Members whose
    /// renderer fails to parse are skipped.
    pub async fn playlist(&self, id: &str) -> Result<Vec<Song>, ResolveError> {
        let browse_id = format!("VL{}", id);
        let data = self.call("browse", json!({ "browseId": browse_id })).await?;

        let items = playlist_contents(&data)
            .ok_or_else(|| ResolveError::NotFound(format!("youtube playlist {}", id)))?;

        let songs: Vec<Song> = items.iter().filter_map(parse_playlist_video).collect();
        log::debug!("youtube playlist {}: {} playable members", id, songs.len());
        Ok(songs)
    }

    /// Runs a video search, returning at most `limit` candidates.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<VideoCandidate>, ResolveError> {
        let data = self
            .call(
                "search",
                json!({ "query": query, "params": SEARCH_FILTER_VIDEOS }),
            )
            .await?;

        let mut candidates = search_candidates(&data);
        candidates.truncate(limit);
        log::debug!("youtube search \"{}\": {} candidates", query, candidates.len());
        Ok(candidates)
    }
}

#[async_trait]
impl PlatformAdapter for YoutubeClient {
    async fn fetch_track(&self, url: &str) -> Result<Song, ResolveError> {
        let id = parse_url(url)
            .as_ref()
            .and_then(extract_video_id)
            .ok_or_else(|| ResolveError::NotFound(format!("no video id in {}", url)))?;
        self.video(&id).await
    }

    async fn fetch_collection(&self, url: &str) -> Result<Vec<Song>, ResolveError> {
        let id = parse_url(url)
            .as_ref()
            .and_then(extract_playlist_id)
            .ok_or_else(|| ResolveError::NotFound(format!("no playlist id in {}", url)))?;
        self.playlist(&id).await
    }
}

fn parse_url(url: &str) -> Option<Url> {
    Url::parse(url).ok()
}

/// Pulls a video id out of watch, short-link, shorts, live and embed URLs.
fn extract_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    if host == "youtu.be" {
        return url
            .path_segments()?
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "v") {
        if !id.is_empty() {
            return Some(id.into_owned());
        }
    }

    let mut segments = url.path_segments()?;
    match segments.next() {
        Some("shorts") | Some("live") | Some("embed") => segments
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn extract_playlist_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == "list")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn parse_video_details(data: &Value) -> Option<Song> {
    let details = data.get("videoDetails")?;
    let id = details.get("videoId")?.as_str()?.to_string();
    let title = details.get("title")?.as_str()?.to_string();

    let live = details
        .get("isLiveContent")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let duration_ms = if live {
        0
    } else {
        details
            .get("lengthSeconds")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0)
            * 1000
    };

    let thumbnails = parse_thumbnails(details.get("thumbnail")?.get("thumbnails"));
    Some(Song {
        url: watch_url(&id),
        thumbnail_url: best_thumbnail(&thumbnails)
            .map(|t| t.url.clone())
            .unwrap_or_default(),
        id,
        title,
        duration_ms,
    })
}

fn playlist_contents(data: &Value) -> Option<&Vec<Value>> {
    data.get("contents")?
        .get("twoColumnBrowseResultsRenderer")?
        .get("tabs")?
        .get(0)?
        .get("tabRenderer")?
        .get("content")?
        .get("sectionListRenderer")?
        .get("contents")?
        .get(0)?
        .get("itemSectionRenderer")?
        .get("contents")?
        .get(0)?
        .get("playlistVideoListRenderer")?
        .get("contents")?
        .as_array()
}

fn parse_playlist_video(item: &Value) -> Option<Song> {
    let renderer = item.get("playlistVideoRenderer")?;
    let id = renderer.get("videoId")?.as_str()?.to_string();
    let title = runs_text(renderer.get("title")?)?;
    let duration_ms = renderer
        .get("lengthSeconds")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
        * 1000;
    let thumbnails = parse_thumbnails(renderer.get("thumbnail").and_then(|t| t.get("thumbnails")));

    Some(Song {
        url: watch_url(&id),
        thumbnail_url: best_thumbnail(&thumbnails)
            .map(|t| t.url.clone())
            .unwrap_or_default(),
        id,
        title,
        duration_ms,
    })
}

fn search_candidates(data: &Value) -> Vec<VideoCandidate> {
    let sections = data
        .get("contents")
        .and_then(|c| c.get("twoColumnSearchResultsRenderer"))
        .and_then(|c| c.get("primaryContents"))
        .and_then(|c| c.get("sectionListRenderer"))
        .and_then(|c| c.get("contents"))
        .and_then(Value::as_array);

    let Some(sections) = sections else {
        return Vec::new();
    };

    sections
        .iter()
        .filter_map(|section| {
            section
                .get("itemSectionRenderer")?
                .get("contents")?
                .as_array()
        })
        .flatten()
        .filter_map(parse_video_renderer)
        .collect()
}

fn parse_video_renderer(item: &Value) -> Option<VideoCandidate> {
    let renderer = item.get("videoRenderer")?;
    let id = renderer.get("videoId")?.as_str()?.to_string();
    let title = runs_text(renderer.get("title")?)?;

    let channel = renderer
        .get("ownerText")
        .and_then(runs_text)
        .or_else(|| renderer.get("longBylineText").and_then(runs_text))
        .unwrap_or_default();

    // Live results carry no lengthText; parse_colon_duration maps the
    // missing label to 0.
    let duration_ms = renderer
        .get("lengthText")
        .and_then(|l| l.get("simpleText"))
        .and_then(Value::as_str)
        .map(parse_colon_duration)
        .unwrap_or(0);

    let thumbnails = parse_thumbnails(renderer.get("thumbnail").and_then(|t| t.get("thumbnails")));

    Some(VideoCandidate {
        id,
        title,
        channel,
        duration_ms,
        thumbnails,
    })
}

fn runs_text(value: &Value) -> Option<String> {
    value
        .get("runs")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

fn parse_thumbnails(value: Option<&Value>) -> Vec<Thumbnail> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|t| {
                    Some(Thumbnail {
                        url: t.get("url")?.as_str()?.to_string(),
                        width: t.get("width")?.as_u64()? as u32,
                        height: t.get("height")?.as_u64()? as u32,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn video_id_from_watch_and_short_urls() {
        assert_eq!(
            extract_video_id(&url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")).as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id(&url("https://youtu.be/dQw4w9WgXcQ?t=30")).as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id(&url("https://youtube.com/shorts/abc123")).as_deref(),
            Some("abc123")
        );
        assert_eq!(extract_video_id(&url("https://youtube.com/feed/library")), None);
    }

    #[test]
    fn playlist_id_from_list_param() {
        assert_eq!(
            extract_playlist_id(&url("https://www.youtube.com/playlist?list=PLx0y")).as_deref(),
            Some("PLx0y")
        );
        assert_eq!(
            extract_playlist_id(&url("https://www.youtube.com/playlist")),
            None
        );
    }

    #[test]
    fn player_response_parses_to_song() {
        let data = json!({
            "videoDetails": {
                "videoId": "dQw4w9WgXcQ",
                "title": "Never Gonna Give You Up",
                "lengthSeconds": "212",
                "isLiveContent": false,
                "thumbnail": { "thumbnails": [
                    { "url": "lo", "width": 120, "height": 90 },
                    { "url": "hi", "width": 1280, "height": 720 }
                ]}
            }
        });
        let song = parse_video_details(&data).unwrap();
        assert_eq!(song.id, "dQw4w9WgXcQ");
        assert_eq!(song.duration_ms, 212_000);
        assert_eq!(song.url, "https://youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(song.thumbnail_url, "hi");
    }

    #[test]
    fn live_video_reports_zero_duration() {
        let data = json!({
            "videoDetails": {
                "videoId": "live1",
                "title": "24/7 stream",
                "lengthSeconds": "0",
                "isLiveContent": true,
                "thumbnail": { "thumbnails": [] }
            }
        });
        assert_eq!(parse_video_details(&data).unwrap().duration_ms, 0);
    }

    #[test]
    fn video_renderer_parses_to_candidate() {
        let item = json!({
            "videoRenderer": {
                "videoId": "abc",
                "title": { "runs": [{ "text": "Song (Official)" }] },
                "ownerText": { "runs": [{ "text": "Artist - Topic" }] },
                "lengthText": { "simpleText": "3:32" },
                "thumbnail": { "thumbnails": [{ "url": "t", "width": 336, "height": 188 }] }
            }
        });
        let candidate = parse_video_renderer(&item).unwrap();
        assert_eq!(candidate.channel, "Artist - Topic");
        assert_eq!(candidate.duration_ms, 212_000);
    }

    #[test]
    fn malformed_renderers_are_skipped() {
        assert_eq!(parse_video_renderer(&json!({ "radioRenderer": {} })), None);
        assert_eq!(parse_playlist_video(&json!({ "continuationItemRenderer": {} })), None);
    }
}
