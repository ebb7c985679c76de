use crate::{error::ApiError, spotify::SpotifyClient, types::UserProfile};

/// Retrieves the profile of the logged-in user. Its `id` keys the stored rows.
pub async fn current_user(client: &SpotifyClient) -> Result<UserProfile, ApiError> {
    client.get_json("/me", &[]).await
}
