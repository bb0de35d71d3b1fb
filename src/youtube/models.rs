use crate::models::{best_thumbnail, Song, Thumbnail};

/// One row of a YouTube video search, kept un-normalized so the
/// cross-platform matcher can score it against source metadata before it
/// is flattened into a [`Song`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    /// Uploading channel name. Empty when the renderer carried none.
    pub channel: String,
    /// Milliseconds; `0` for live streams.
    pub duration_ms: u64,
    pub thumbnails: Vec<Thumbnail>,
}

impl VideoCandidate {
    pub fn into_song(self) -> Song {
        Song {
            url: watch_url(&self.id),
            thumbnail_url: best_thumbnail(&self.thumbnails)
                .map(|t| t.url.clone())
                .unwrap_or_default(),
            id: self.id,
            title: self.title,
            duration_ms: self.duration_ms,
        }
    }
}

/// Canonical watch URL for a video id.
pub fn watch_url(id: &str) -> String {
    format!("https://youtube.com/watch?v={}", id)
}

/// Parses a colon-separated duration label ("3:27", "1:02:03") into
/// milliseconds. Returns 0 for anything unparseable, which matches how
/// live streams are labeled.
pub fn parse_colon_duration(label: &str) -> u64 {
    let mut seconds = 0u64;
    for part in label.split(':') {
        match part.trim().parse::<u64>() {
            Ok(n) => seconds = seconds * 60 + n,
            Err(_) => return 0,
        }
    }
    seconds * 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_duration_minutes_seconds() {
        assert_eq!(parse_colon_duration("3:27"), 207_000);
    }

    #[test]
    fn colon_duration_with_hours() {
        assert_eq!(parse_colon_duration("1:02:03"), 3_723_000);
    }

    #[test]
    fn colon_duration_rejects_live_labels() {
        assert_eq!(parse_colon_duration("LIVE"), 0);
        assert_eq!(parse_colon_duration(""), 0);
    }

    #[test]
    fn candidate_into_song_uses_canonical_url_and_best_thumbnail() {
        let candidate = VideoCandidate {
            id: "dQw4w9WgXcQ".into(),
            title: "Test".into(),
            channel: "Someone".into(),
            duration_ms: 212_000,
            thumbnails: vec![
                Thumbnail {
                    url: "small".into(),
                    width: 120,
                    height: 90,
                },
                Thumbnail {
                    url: "large".into(),
                    width: 1280,
                    height: 720,
                },
            ],
        };
        let song = candidate.into_song();
        assert_eq!(song.url, "https://youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(song.thumbnail_url, "large");
    }
}
