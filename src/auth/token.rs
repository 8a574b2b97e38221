//! The token cache saved between runs and the requests that fill it.

use std::{fs, path::Path};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{GMAIL_READONLY_SCOPE, client_secret::ClientSecret},
};

/// Access tokens that expire within this margin are treated as expired.
const EXPIRY_MARGIN: Duration = Duration::seconds(60);

mod rfc3339_option {
    //! Serializes an optional [time::OffsetDateTime] as an RFC 3339 string,
    //! e.g. "2025-03-01T09:30:00.123456Z", which is also how Google's client
    //! libraries write the token expiry.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    pub fn serialize<S>(dt: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => {
                let formatted = dt.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// OAuth credentials for the user, saved as `token.json`.
///
/// The fields match the authorized user JSON written by Google's client
/// libraries, so a token file created by either can be used by the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    /// The current access token.
    pub token: Option<String>,
    /// The long lived token used to get new access tokens.
    pub refresh_token: Option<String>,
    /// Where refresh tokens are exchanged for access tokens.
    pub token_uri: String,
    /// The OAuth client the tokens were issued to.
    pub client_id: String,
    /// The secret of the OAuth client.
    pub client_secret: String,
    /// The scopes the user granted.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// When the access token expires.
    #[serde(
        default,
        with = "rfc3339_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry: Option<OffsetDateTime>,
}

impl AuthorizedUser {
    /// Create the credentials for a user that just completed the
    /// authorization flow for `client`.
    pub fn from_token_response(
        client: &ClientSecret,
        response: TokenResponse,
        now: OffsetDateTime,
    ) -> Self {
        let mut user = Self {
            token: None,
            refresh_token: None,
            token_uri: client.token_uri.clone(),
            client_id: client.client_id.clone(),
            client_secret: client.client_secret.clone(),
            scopes: vec![GMAIL_READONLY_SCOPE.to_owned()],
            expiry: None,
        };

        user.update(response, now);
        user
    }

    /// Read the token cache at `path`.
    ///
    /// Returns `Ok(None)` if there is no file at `path`.
    ///
    /// # Errors
    /// Returns [Error::TokenCache] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Option<Self>, Error> {
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path)
            .map_err(|error| Error::TokenCache(format!("could not read {path:?}: {error}")))?;

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|error| Error::TokenCache(format!("could not parse {path:?}: {error}")))
    }

    /// Write the token cache to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(self)?;

        fs::write(path, text)
            .map_err(|error| Error::TokenCache(format!("could not write {path:?}: {error}")))
    }

    /// Get the access token if there is one and it will not expire within a
    /// minute of `now`.
    ///
    /// Tokens without an expiry are assumed to be valid.
    pub fn valid_access_token(&self, now: OffsetDateTime) -> Option<&str> {
        let token = self.token.as_deref()?;

        match self.expiry {
            Some(expiry) if expiry - EXPIRY_MARGIN <= now => None,
            _ => Some(token),
        }
    }

    /// Replace the access token with the one in `response`.
    ///
    /// The expiry is `expires_in` seconds after `now`.
    ///
    /// The refresh token and scopes are only replaced if the response includes
    /// them, since token refreshes usually leave them out.
    pub fn update(&mut self, response: TokenResponse, now: OffsetDateTime) {
        self.token = Some(response.access_token);
        // A lifetime too long to represent is treated as no expiry.
        self.expiry = response
            .expires_in
            .and_then(|seconds| now.checked_add(Duration::seconds(seconds)));

        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }

        if let Some(scope) = response.scope {
            self.scopes = scope.split_whitespace().map(str::to_owned).collect();
        }
    }
}

/// A successful response from the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// The new access token.
    pub access_token: String,
    /// The lifetime of the access token in seconds.
    pub expires_in: Option<i64>,
    /// Only issued by the authorization code exchange.
    pub refresh_token: Option<String>,
    /// The granted scopes separated by spaces.
    pub scope: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Post `form` to the token endpoint at `token_uri`.
///
/// # Errors
/// Returns [Error::TokenExchange] if the endpoint rejects the request, or
/// [Error::Http] if it cannot be reached.
pub(super) async fn request_token(
    http: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, Error> {
    let response = http.post(token_uri).form(form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(TokenErrorResponse {
                error,
                error_description: Some(description),
            }) => format!("{error}: {description}"),
            Ok(TokenErrorResponse { error, .. }) => error,
            Err(_) => format!("the token endpoint returned {status}"),
        };

        return Err(Error::TokenExchange(reason));
    }

    serde_json::from_str(&body).map_err(|error| Error::TokenExchange(error.to_string()))
}

/// Get a new access token for `user` with its refresh token.
pub async fn refresh_access_token(
    http: &Client,
    user: &AuthorizedUser,
    refresh_token: &str,
) -> Result<TokenResponse, Error> {
    tracing::debug!("Refreshing access token at {}", user.token_uri);

    request_token(
        http,
        &user.token_uri,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", user.client_id.as_str()),
            ("client_secret", user.client_secret.as_str()),
        ],
    )
    .await
}
