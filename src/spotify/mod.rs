pub mod client;
pub mod models;
pub mod source;

pub use client::SpotifyClient;
pub use models::SpotifyTrack;
pub use source::SpotifySource;
