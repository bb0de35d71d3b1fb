use serde::{Deserialize, Serialize};

/// A normalized playable-item record, the common shape every platform
/// adapter produces. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Milliseconds. `0` when the source is a live stream or the duration
    /// is unknown.
    pub duration_ms: u64,
    pub thumbnail_url: String,
}

/// One entry of a platform's thumbnail candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Picks the highest-resolution thumbnail (maximum `width * height`).
/// The first entry wins on ties.
pub fn best_thumbnail(thumbnails: &[Thumbnail]) -> Option<&Thumbnail> {
    thumbnails.iter().reduce(|best, t| {
        if t.area() > best.area() {
            t
        } else {
            best
        }
    })
}

impl Thumbnail {
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// How the caller should present a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// Free-text search: the user picks one or more entries.
    Selection,
    /// URL resolution: every entry should be enqueued as-is.
    Results,
}

/// The outcome of resolving one query. `items` is empty only when the
/// underlying platform call failed or returned no matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<Song>,
    pub kind: ResultKind,
}
