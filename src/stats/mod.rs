//! # Listening Statistics
//!
//! The three derived views of the dashboard:
//!
//! - [`extract`] - collects the top tracks of each listening window, tags
//!   them with genres and stores them
//! - [`genres`] - genre distributions and their change against all time
//! - [`suggestions`] - recommendations seeded by the stored tracks, with
//!   fallbacks when Spotify cannot recommend
//!
//! Everything that talks to Spotify is generic over
//! [`crate::spotify::SpotifyApi`].

pub mod extract;
pub mod genres;
pub mod suggestions;
