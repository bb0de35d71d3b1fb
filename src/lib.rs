//! quaver resolves a user-supplied media query, either a free-text search
//! phrase or a streaming-platform URL, into an ordered list of playable
//! track descriptors.
//!
//! ```no_run
//! use quaver::{Resolver, ResolverConfig, SearchSource};
//!
//! # async fn demo() -> Result<(), quaver::ResolveError> {
//! let resolver = Resolver::new(ResolverConfig::default())?;
//! let result = resolver
//!     .resolve("never gonna give you up", SearchSource::Youtube)
//!     .await?;
//! for song in &result.items {
//!     println!("{} ({})", song.title, song.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod generic;
pub mod matcher;
pub mod models;
pub mod providers;
pub mod query;
pub mod resolver;
pub mod soundcloud;
pub mod spotify;
pub mod youtube;

pub use errors::ResolveError;
pub use matcher::{Matcher, MatcherConfig, TrackMetadata};
pub use models::{ResultKind, SearchResult, Song, Thumbnail};
pub use query::{check_query, Platform, QueryInfo, QueryShape};
pub use resolver::{Resolver, ResolverConfig, SearchSource};
