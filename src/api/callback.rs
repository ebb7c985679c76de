use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    api::render, management::TokenManager, server::AppState, spotify, success, warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Finishes the login started by `/login` or `spotvibe auth`.
///
/// The `state` parameter has to match the pending login, then the code is
/// exchanged for a token which is cached on disk and recorded in the session.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    if let Some(error) = params.error {
        warning!("Spotify denied authorization: {}", error);
        return render::error_response(
            StatusCode::BAD_REQUEST,
            &format!("Spotify login failed ({}). Please try again.", error),
            true,
        );
    }

    let Some(code) = params.code else {
        return render::error_response(
            StatusCode::BAD_REQUEST,
            "Missing authorization code.",
            true,
        );
    };

    let mut session = state.session.lock().await;
    let Some(pending) = session.pending.as_mut() else {
        return render::error_response(
            StatusCode::BAD_REQUEST,
            "No login in progress. Please start again.",
            true,
        );
    };

    if params.state.as_deref() != Some(pending.state.as_str()) {
        warning!("Rejected callback with mismatching state.");
        return render::error_response(
            StatusCode::BAD_REQUEST,
            "Login state mismatch. Please start again.",
            true,
        );
    }

    let token =
        match spotify::auth::exchange_code(&state.settings, &code, &pending.code_verifier).await {
            Ok(token) => token,
            Err(e) => {
                warning!("Token exchange failed: {}", e);
                return render::error_response(
                    StatusCode::BAD_GATEWAY,
                    "Spotify login failed. Please refresh and try again.",
                    true,
                );
            }
        };

    if let Err(e) = TokenManager::new(token.clone(), &state.settings.token_path)
        .persist()
        .await
    {
        warning!("Failed to save token: {}", e);
        return render::error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Cannot save the Spotify token.",
            false,
        );
    }

    pending.token = Some(token);
    session.user = None;
    success!("Authentication successful.");

    Html(render::callback_page()).into_response()
}
