use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    api::{
        parse_term,
        render::{self, DashboardView},
        session::{api_failure, session_user},
    },
    error::StoreError,
    server::AppState,
    spotify::SpotifyClient,
    stats::{
        genres::{self, Grouping},
        suggestions::song_suggestions,
    },
    types::{Term, TrackRecord, UserProfile},
    warning,
};

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    term: Option<String>,
    loaded: Option<String>,
}

/// The dashboard, or the login page while no token is cached.
pub async fn dashboard(
    Query(params): Query<DashboardParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let term = match parse_term(params.term.as_deref()) {
        Ok(term) => term,
        Err(response) => return response,
    };

    let Ok(client) = SpotifyClient::from_cache(&state.settings).await else {
        return Html(render::login_page()).into_response();
    };

    let mut session = state.session.lock().await;
    let user = match session_user(&client, &mut session).await {
        Ok(user) => user,
        Err(e) => return api_failure(&e),
    };

    match build_view(&state, &client, &user, term, params.loaded.is_some()).await {
        Ok(view) => Html(render::dashboard_page(&view)).into_response(),
        Err(e) => {
            warning!("Cannot read stored tracks: {}", e);
            render::error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), false)
        }
    }
}

async fn build_view(
    state: &AppState,
    client: &SpotifyClient,
    user: &UserProfile,
    term: Term,
    loaded: bool,
) -> Result<DashboardView, StoreError> {
    let tracks = state.store.tracks(&user.id, term).await?;

    let mut view = DashboardView {
        display_name: user.name().to_string(),
        term,
        loaded,
        tracks: Vec::new(),
        genres: Vec::new(),
        deltas: Vec::new(),
        suggestions: Vec::new(),
    };
    if tracks.is_empty() {
        return Ok(view);
    }

    view.genres = genres::distribution(genre_strings(&tracks), state.settings.genre_grouping);

    if term != Term::LongTerm {
        let all_time = state.store.tracks(&user.id, Term::LongTerm).await?;
        if !all_time.is_empty() {
            view.deltas = genres::delta(
                &genres::distribution(genre_strings(&tracks), Grouping::None),
                &genres::distribution(genre_strings(&all_time), Grouping::None),
            );
        }
    }

    view.suggestions = song_suggestions(client, &state.store, &user.id, term).await?;
    view.tracks = tracks;
    Ok(view)
}

fn genre_strings(tracks: &[TrackRecord]) -> impl Iterator<Item = &str> {
    tracks.iter().map(|t| t.genre.as_str())
}
