use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    config::Settings,
    error, info,
    error::ApiError,
    server::{AppState, start_api_server},
    success,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// Runs the complete OAuth 2.0 authorization-code flow (with PKCE) from the
/// command line.
///
/// 1. **PKCE Setup**: generates a code verifier, its SHA256 challenge and a
///    random `state` value, and keeps them in the shared session
/// 2. **Server Start**: launches the local HTTP server whose `/callback`
///    route finishes the flow
/// 3. **Browser Launch**: opens the Spotify authorization URL
/// 4. **Callback Handling**: the callback exchanges the code, persists the
///    token and records it in the session
/// 5. **Wait**: polls the session until the token shows up or 60 s pass
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - A missing token after the timeout terminates the program with an error
///
/// # Example
///
/// ```
/// let state = Arc::new(AppState::new(settings, store));
/// auth(state).await;
/// ```
pub async fn auth(state: Arc<AppState>) {
    let auth_url = match begin_login(&state).await {
        Ok(url) => url,
        Err(e) => error!("Cannot start authorization: {}", e),
    };

    let server_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    info!("Waiting for Spotify authorization...");
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(state).await {
        Some(_) => success!("Authentication successful!"),
        None => error!("Authentication failed or timed out."),
    }
}

/// Starts a login: stores a fresh PKCE verifier and `state` in the session
/// and returns the Spotify authorization URL to send the user to.
///
/// A login that was started earlier and never finished is discarded.
pub async fn begin_login(state: &AppState) -> Result<String, ApiError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let csrf_state = utils::generate_state();

    let url = authorize_url(&state.settings, &code_challenge, &csrf_state)?;

    let mut session = state.session.lock().await;
    session.pending = Some(PkceToken {
        code_verifier,
        state: csrf_state,
        token: None,
    });

    Ok(url)
}

/// Builds the Spotify authorization URL with all parameters URL-encoded.
pub fn authorize_url(
    settings: &Settings,
    code_challenge: &str,
    state: &str,
) -> Result<String, ApiError> {
    let url = Url::parse_with_params(
        &settings.auth_url,
        &[
            ("client_id", settings.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
            ("state", state),
            ("scope", settings.scope.as_str()),
        ],
    )
    .map_err(|e| ApiError::Auth(format!("invalid authorization URL: {}", e)))?;

    Ok(url.to_string())
}

/// Polls the session for the token stored by the callback handler.
///
/// Gives up after 60 seconds, checking once per second.
async fn wait_for_token(state: Arc<AppState>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let session = state.session.lock().await;
        if let Some(pkce_token) = session.pending.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(session);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for an access token.
///
/// The application credentials go into the Basic authorization header and
/// the PKCE verifier proves that this client started the flow.
pub async fn exchange_code(
    settings: &Settings,
    code: &str,
    verifier: &str,
) -> Result<Token, ApiError> {
    let response = Client::new()
        .post(&settings.token_url)
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", settings.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let body = token_response(response).await?;
    let refresh_token = body
        .refresh_token
        .clone()
        .ok_or_else(|| ApiError::Auth("token response without refresh token".to_string()))?;

    Ok(into_token(body, refresh_token))
}

/// Refreshes an expired access token.
///
/// Spotify may or may not rotate the refresh token; when the response has
/// none, the one passed in stays in use.
pub async fn refresh_token(settings: &Settings, refresh_token: &str) -> Result<Token, ApiError> {
    let response = Client::new()
        .post(&settings.token_url)
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", settings.client_id.as_str()),
        ])
        .send()
        .await?;

    let body = token_response(response).await?;
    let refresh_token = body
        .refresh_token
        .clone()
        .unwrap_or_else(|| refresh_token.to_string());

    Ok(into_token(body, refresh_token))
}

async fn token_response(response: reqwest::Response) -> Result<TokenResponse, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(ApiError::Auth(format!(
            "token endpoint responded with {}: {}",
            status,
            String::from_utf8_lossy(&body)
        )));
    }

    serde_json::from_slice(&body).map_err(ApiError::from)
}

fn into_token(body: TokenResponse, refresh_token: String) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token,
        scope: body.scope,
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
