//! Cross-platform matching: given only metadata from a platform that
//! cannot supply playable audio (Spotify), find the best-matching audio
//! upload on YouTube.
//!
//! Scoring is a sum of independent signed signals with lower-is-better
//! sign convention, so the best candidate is simply the minimum. The
//! weights and the duration window are empirical values carried over
//! unchanged; they live in [`MatcherConfig`] so callers can tune them.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::ResolveError;
use crate::models::Song;
use crate::youtube::{VideoCandidate, YoutubeClient};

/// Auto-generated audio channels ("Artist - Topic") are the canonical
/// uploads for most commercial tracks.
const TOPIC_CHANNEL_SUFFIX: &str = "- Topic";

/// Metadata describing a track on the source platform. Ephemeral: built
/// per lookup, consumed only by the matcher.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub name: String,
    pub artists: Vec<String>,
    pub duration_ms: u64,
}

impl TrackMetadata {
    /// The search phrase sent to the secondary platform:
    /// `"<artists> - <name>"`, or just the name when no artist is known.
    pub fn search_phrase(&self) -> String {
        if self.artists.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.artists.join(", "), self.name)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Candidate title contains the source track name.
    pub title_weight: i32,
    /// Candidate channel name contains one of the source artists.
    pub channel_weight: i32,
    /// Candidate channel is an auto-generated "- Topic" channel.
    pub topic_weight: i32,
    /// Candidate duration falls inside the duration window.
    pub duration_weight: i32,
    pub duration_window_ms: u64,
    /// Upper bound on how many search results are scored.
    pub candidate_limit: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            title_weight: -1,
            channel_weight: -1,
            topic_weight: -2,
            duration_weight: -2,
            duration_window_ms: 5000,
            candidate_limit: 20,
        }
    }
}

/// Scores one candidate against the source metadata. Pure; each signal
/// is applied independently and decrements favor the candidate.
pub fn score(candidate: &VideoCandidate, metadata: &TrackMetadata, config: &MatcherConfig) -> i32 {
    let mut value = 0;

    let name = metadata.name.to_lowercase();
    let title = candidate.title.to_lowercase();
    let channel = candidate.channel.to_lowercase();

    if !name.is_empty() && title.contains(&name) {
        value += config.title_weight;
    }
    if metadata
        .artists
        .iter()
        .any(|artist| !artist.is_empty() && channel.contains(&artist.to_lowercase()))
    {
        value += config.channel_weight;
    }
    if candidate.channel.ends_with(TOPIC_CHANNEL_SUFFIX) {
        value += config.topic_weight;
    }
    if candidate.duration_ms != 0
        && candidate.duration_ms.abs_diff(metadata.duration_ms) <= config.duration_window_ms
    {
        value += config.duration_weight;
    }

    value
}

/// Picks the best-scoring candidate; the first of equals wins, keeping
/// selection stable with respect to search ranking.
pub fn select_best(
    candidates: Vec<VideoCandidate>,
    metadata: &TrackMetadata,
    config: &MatcherConfig,
) -> Option<VideoCandidate> {
    candidates
        .into_iter()
        .min_by_key(|candidate| score(candidate, metadata, config))
}

/// Finds a playable YouTube upload for source-platform metadata.
pub struct Matcher {
    youtube: Arc<YoutubeClient>,
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(youtube: Arc<YoutubeClient>, config: MatcherConfig) -> Self {
        Self { youtube, config }
    }

    pub async fn find_match(&self, metadata: &TrackMetadata) -> Result<Song, ResolveError> {
        let phrase = metadata.search_phrase();
        let candidates = self
            .youtube
            .search(&phrase, self.config.candidate_limit)
            .await?;

        match select_best(candidates, metadata, &self.config) {
            Some(best) => {
                log::debug!(
                    "matched \"{}\" -> {} (score {})",
                    phrase,
                    best.id,
                    score(&best, metadata, &self.config)
                );
                Ok(best.into_song())
            }
            None => Err(ResolveError::NoMatch(phrase)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, channel: &str, duration_ms: u64) -> VideoCandidate {
        VideoCandidate {
            id: format!("{}-{}", title.len(), duration_ms),
            title: title.to_string(),
            channel: channel.to_string(),
            duration_ms,
            thumbnails: Vec::new(),
        }
    }

    fn metadata() -> TrackMetadata {
        TrackMetadata {
            name: "Song".to_string(),
            artists: vec!["Artist".to_string()],
            duration_ms: 200_000,
        }
    }

    #[test]
    fn topic_upload_with_close_duration_wins() {
        let config = MatcherConfig::default();
        let meta = metadata();

        let canonical = candidate("Song (Official)", "Artist - Topic", 200_500);
        let unrelated = candidate("Unrelated", "Someone", 0);

        assert!(score(&canonical, &meta, &config) < score(&unrelated, &meta, &config));

        let best = select_best(vec![unrelated, canonical.clone()], &meta, &config).unwrap();
        assert_eq!(best, canonical);
    }

    #[test]
    fn signals_apply_independently() {
        let config = MatcherConfig::default();
        let meta = metadata();

        // All four signals: -1 -1 -2 -2.
        assert_eq!(
            score(&candidate("Song", "Artist - Topic", 200_000), &meta, &config),
            -6
        );
        // Title only.
        assert_eq!(score(&candidate("song cover", "X", 0), &meta, &config), -1);
        // Duration window is inclusive at +/-5000.
        assert_eq!(score(&candidate("x", "y", 205_000), &meta, &config), -2);
        assert_eq!(score(&candidate("x", "y", 205_001), &meta, &config), 0);
        // A zero candidate duration (live/unknown) never counts as close.
        let live_meta = TrackMetadata {
            duration_ms: 3000,
            ..metadata()
        };
        assert_eq!(score(&candidate("x", "y", 0), &live_meta, &config), 0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let config = MatcherConfig::default();
        let meta = TrackMetadata {
            name: "SONG".to_string(),
            artists: vec!["artist".to_string()],
            duration_ms: 0,
        };
        let c = candidate("song (official)", "ARTIST Official", 999_999);
        assert_eq!(score(&c, &meta, &config), -2);
    }

    #[test]
    fn first_of_equal_scores_is_selected() {
        let config = MatcherConfig::default();
        let meta = metadata();
        let a = candidate("Song A", "Artist", 200_000);
        let b = candidate("Song B", "Artist", 200_000);
        let best = select_best(vec![a.clone(), b], &meta, &config).unwrap();
        assert_eq!(best, a);
    }

    #[test]
    fn empty_candidate_set_selects_nothing() {
        assert!(select_best(Vec::new(), &metadata(), &MatcherConfig::default()).is_none());
    }

    #[test]
    fn search_phrase_joins_artists() {
        let meta = TrackMetadata {
            name: "Song".to_string(),
            artists: vec!["A".to_string(), "B".to_string()],
            duration_ms: 0,
        };
        assert_eq!(meta.search_phrase(), "A, B - Song");

        let bare = TrackMetadata {
            name: "Song".to_string(),
            artists: Vec::new(),
            duration_ms: 0,
        };
        assert_eq!(bare.search_phrase(), "Song");
    }
}
