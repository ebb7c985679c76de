use std::sync::Arc;

use axum::{
    Extension, Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    api::{parse_term, render},
    error::ApiError,
    info,
    management::TokenManager,
    server::{AppState, Session},
    spotify::{self, SpotifyApi, SpotifyClient},
    stats::extract::refresh_all_terms,
    success,
    types::UserProfile,
    warning,
};

/// Redirects the browser to the Spotify authorization page.
pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Response {
    match spotify::auth::begin_login(&state).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            warning!("Cannot start login: {}", e);
            render::error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), false)
        }
    }
}

/// Forgets the cached token and the session, then shows the login page.
pub async fn logout(Extension(state): Extension<Arc<AppState>>) -> Response {
    if let Err(e) = TokenManager::clear(&state.settings.token_path).await {
        warning!("Cannot remove cached token: {}", e);
        return render::error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Cannot remove the cached Spotify token.",
            false,
        );
    }

    *state.session.lock().await = Session::default();
    info!("Logged out.");
    Redirect::to("/").into_response()
}

#[derive(Debug, Deserialize)]
pub struct RefreshForm {
    term: Option<String>,
}

/// Re-runs the top-track extraction for every term of the logged-in user.
///
/// Redirects back to the dashboard of the submitted term.
pub async fn refresh(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<RefreshForm>,
) -> Response {
    let term = match parse_term(form.term.as_deref()) {
        Ok(term) => term,
        Err(response) => return response,
    };

    let Ok(client) = SpotifyClient::from_cache(&state.settings).await else {
        return Redirect::to("/").into_response();
    };

    let mut session = state.session.lock().await;
    let user = match session_user(&client, &mut session).await {
        Ok(user) => user,
        Err(e) => return api_failure(&e),
    };

    info!("Fetching Spotify data for {}...", user.name());
    match refresh_all_terms(&client, &state.store, &user.id, state.settings.term_delay).await {
        Ok(stored) => {
            for (term, count) in stored {
                success!("Stored {} tracks for {}", count, term);
            }
            Redirect::to(&format!("/?term={}&loaded=1", term)).into_response()
        }
        Err(e) if e.is_auth() => render::error_response(
            StatusCode::UNAUTHORIZED,
            "Your Spotify session has expired. Please log in again.",
            true,
        ),
        Err(e) => {
            warning!("Refresh failed: {}", e);
            render::error_response(StatusCode::BAD_GATEWAY, &e.to_string(), false)
        }
    }
}

/// Profile of the logged-in user, kept in the session until the cached token
/// changes.
pub(crate) async fn session_user(
    client: &SpotifyClient,
    session: &mut Session,
) -> Result<UserProfile, ApiError> {
    let obtained_at = client.token_obtained_at().await;
    if let Some(user) = &session.user {
        if session.user_token == obtained_at {
            return Ok(user.clone());
        }
    }

    let user = client.current_user().await?;
    session.user = Some(user.clone());
    session.user_token = client.token_obtained_at().await;
    Ok(user)
}

/// Error page for a failed Spotify call, with a login link when the failure
/// means the user is no longer authenticated.
pub(crate) fn api_failure(e: &ApiError) -> Response {
    if e.is_auth() {
        render::error_response(
            StatusCode::UNAUTHORIZED,
            "Spotify login failed. Please log in again.",
            true,
        )
    } else {
        warning!("Spotify API error: {}", e);
        render::error_response(StatusCode::BAD_GATEWAY, &e.to_string(), false)
    }
}
