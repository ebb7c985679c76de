//! # API Module
//!
//! HTTP handlers of the spotvibe dashboard server.
//!
//! ## Endpoints
//!
//! - [`dashboard`] - `GET /`: the login page while no token is cached,
//!   otherwise the top tracks, genre chart, comparison with all time and song
//!   suggestions for `?term=` (default `short_term`)
//! - [`login`] - `GET /login`: starts the OAuth flow and redirects to Spotify
//! - [`callback`] - `GET /callback`: completes the OAuth flow
//! - [`refresh`] - `POST /refresh`: re-fetches the top tracks of all terms
//! - [`logout`] - `POST /logout`: forgets the cached token and the session
//! - [`health`] - `GET /health`: status and version for monitoring
//!
//! ## Error Pages
//!
//! Handlers never terminate the process. Authentication failures render an
//! error page with a login link, other failures an error page with a link
//! back to the dashboard. Empty data is not an error: the dashboard shows an
//! informational message instead.

mod callback;
mod dashboard;
mod health;
pub mod render;
mod session;

pub use callback::callback;
pub use dashboard::dashboard;
pub use health::health;
pub use session::{login, logout, refresh};

use axum::{http::StatusCode, response::Response};

use crate::types::Term;

/// Parses the optional `term` parameter, defaulting to [`Term::ShortTerm`].
fn parse_term(term: Option<&str>) -> Result<Term, Response> {
    match term {
        None | Some("") => Ok(Term::default()),
        Some(term) => term
            .parse::<Term>()
            .map_err(|e| render::error_response(StatusCode::BAD_REQUEST, &e.to_string(), false)),
    }
}
