//! Client-credentials token with an in-memory cache.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use url::Url;

use super::models::TokenResponse;
use crate::config::SpotifyCredentials;
use crate::error::SourceResult;
use crate::http::HttpBackend;

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct TokenCache {
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// A valid access token, fetching a new one when needed.
    pub async fn get<B: HttpBackend>(
        &self,
        http: &B,
        credentials: &SpotifyCredentials,
    ) -> SourceResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + EXPIRY_MARGIN < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        tracing::debug!("Requesting Spotify access token");
        let url = Url::parse(TOKEN_URL)?;
        let response: TokenResponse = http
            .post_form(
                &url,
                (&credentials.client_id, &credentials.client_secret),
                &[("grant_type", "client_credentials")],
            )
            .await?;

        let access_token = response.access_token;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });
        Ok(access_token)
    }
}
