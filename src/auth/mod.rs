//! Gets an access token for the Gmail API.
//!
//! Tokens are cached in `token.json` between runs. The browser based
//! authorization flow only runs when there is no cache yet.

mod client_secret;
mod flow;
mod token;

use std::path::PathBuf;

use reqwest::Client;
use time::OffsetDateTime;

use crate::Error;

pub use client_secret::ClientSecret;
pub use flow::run_installed_app_flow;
pub use token::{AuthorizedUser, TokenResponse, refresh_access_token};

/// The only scope the program asks for: read access to the user's mail.
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// Where the credentials live and how the user is asked for consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// The OAuth client secret file.
    pub credentials_path: PathBuf,
    /// The token cache file.
    pub token_path: PathBuf,
    /// Whether to open the consent page in the browser automatically.
    pub open_browser: bool,
}

/// Get an access token for reading the user's mail.
///
/// Uses the cached access token if it is still valid, refreshes it if it has
/// expired, and otherwise asks the user to authorize the program. New tokens
/// are written back to the cache.
///
/// # Errors
/// Returns [Error::TokenCache] if the cached token has expired and cannot be
/// refreshed, or any error from the authorization flow.
pub async fn obtain_access_token(settings: &AuthSettings, http: &Client) -> Result<String, Error> {
    let token_path = &settings.token_path;

    if let Some(mut user) = AuthorizedUser::load(token_path)? {
        if let Some(token) = user.valid_access_token(OffsetDateTime::now_utc()) {
            tracing::debug!("Using cached access token from {token_path:?}");
            return Ok(token.to_owned());
        }

        let refresh_token = user.refresh_token.clone().ok_or_else(|| {
            Error::TokenCache(format!(
                "the access token in {token_path:?} has expired and there is no refresh token, \
                delete the file to sign in again"
            ))
        })?;

        let response = refresh_access_token(http, &user, &refresh_token).await?;
        user.update(response, OffsetDateTime::now_utc());
        user.save(token_path)?;
        tracing::info!("Refreshed access token and saved it to {token_path:?}");

        return access_token(user);
    }

    tracing::info!("No token cache at {token_path:?}, starting the authorization flow");
    let client = ClientSecret::load(&settings.credentials_path)?;
    let response = run_installed_app_flow(http, &client, settings.open_browser).await?;

    let user = AuthorizedUser::from_token_response(&client, response, OffsetDateTime::now_utc());
    user.save(token_path)?;
    tracing::info!("Saved new credentials to {token_path:?}");

    access_token(user)
}

fn access_token(user: AuthorizedUser) -> Result<String, Error> {
    user.token
        .ok_or_else(|| Error::TokenExchange("the token endpoint returned no access token".to_owned()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{Json, Router, routing::post};
    use serde_json::json;
    use time::{Duration, OffsetDateTime};

    use crate::{Error, test_utils::serve};

    use super::{AuthSettings, AuthorizedUser, GMAIL_READONLY_SCOPE, obtain_access_token};

    fn settings(dir: &Path) -> AuthSettings {
        AuthSettings {
            credentials_path: dir.join("credentials.json"),
            token_path: dir.join("token.json"),
            open_browser: false,
        }
    }

    fn cached_user(token_uri: &str, expiry: OffsetDateTime, refresh: Option<&str>) -> AuthorizedUser {
        AuthorizedUser {
            token: Some("cached-access".to_owned()),
            refresh_token: refresh.map(str::to_owned),
            token_uri: token_uri.to_owned(),
            client_id: "client".to_owned(),
            client_secret: "secret".to_owned(),
            scopes: vec![GMAIL_READONLY_SCOPE.to_owned()],
            expiry: Some(expiry),
        }
    }

    #[tokio::test]
    async fn uses_valid_cached_token() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
        // The token URI is never contacted while the cached token is valid.
        cached_user("http://127.0.0.1:1/token", expiry, Some("refresh"))
            .save(&settings.token_path)
            .unwrap();

        let token = obtain_access_token(&settings, &reqwest::Client::new()).await;

        assert_eq!(token, Ok("cached-access".to_owned()));
    }

    #[tokio::test]
    async fn refreshes_expired_token_and_saves_it() {
        let base_url = serve(Router::new().route(
            "/token",
            post(|| async {
                Json(json!({
                    "access_token": "refreshed-access",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }))
            }),
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let expiry = OffsetDateTime::now_utc() - Duration::hours(1);
        cached_user(&format!("{base_url}/token"), expiry, Some("refresh"))
            .save(&settings.token_path)
            .unwrap();

        let token = obtain_access_token(&settings, &reqwest::Client::new()).await;

        assert_eq!(token, Ok("refreshed-access".to_owned()));
        let saved = AuthorizedUser::load(&settings.token_path)
            .unwrap()
            .expect("Token cache was deleted");
        assert_eq!(saved.token.as_deref(), Some("refreshed-access"));
        assert_eq!(saved.refresh_token.as_deref(), Some("refresh"));
        assert!(saved.expiry.unwrap() > OffsetDateTime::now_utc());
    }

    #[tokio::test]
    async fn expired_token_without_refresh_token_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let expiry = OffsetDateTime::now_utc() - Duration::hours(1);
        cached_user("http://127.0.0.1:1/token", expiry, None)
            .save(&settings.token_path)
            .unwrap();

        let result = obtain_access_token(&settings, &reqwest::Client::new()).await;

        assert!(matches!(result, Err(Error::TokenCache(_))), "{result:?}");
    }

    #[tokio::test]
    async fn missing_client_secret_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = obtain_access_token(&settings(dir.path()), &reqwest::Client::new()).await;

        assert!(matches!(result, Err(Error::ClientSecretFile(_))), "{result:?}");
    }
}
