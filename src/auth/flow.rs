//! The OAuth flow for installed applications.
//!
//! The user is sent to Google's consent page in their browser, and Google
//! redirects back to a listener on a random local port with an authorization
//! code. The code is then exchanged for an access token and a refresh token.

use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use maud::{DOCTYPE, Markup, html};
use rand::{Rng, distributions::Alphanumeric};
use reqwest::{Client, Url};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
};

use crate::{
    Error,
    auth::{
        GMAIL_READONLY_SCOPE,
        client_secret::ClientSecret,
        token::{TokenResponse, request_token},
    },
    browser,
};

/// How long to wait for the browser to close its connection to the redirect
/// listener after the authorization code arrives.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

const STATE_LENGTH: usize = 30;
const CODE_VERIFIER_LENGTH: usize = 64;

fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// A proof key for the code exchange (RFC 7636) using the S256 method.
#[derive(Debug, Clone)]
pub(super) struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

impl Pkce {
    pub fn new() -> Self {
        Self::from_verifier(random_string(CODE_VERIFIER_LENGTH))
    }

    fn from_verifier(verifier: String) -> Self {
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

        Self {
            verifier,
            challenge,
        }
    }
}

/// Build the URL of the consent page for read only access to the user's mail.
pub(super) fn authorization_url(
    client: &ClientSecret,
    redirect_uri: &str,
    state: &str,
    pkce: &Pkce,
) -> Result<Url, Error> {
    Url::parse_with_params(
        &client.auth_uri,
        &[
            ("response_type", "code"),
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", GMAIL_READONLY_SCOPE),
            ("state", state),
            ("access_type", "offline"),
            ("code_challenge", pkce.challenge.as_str()),
            ("code_challenge_method", "S256"),
        ],
    )
    .map_err(|error| Error::InvalidClientSecret(format!("invalid auth_uri: {error}")))
}

/// The query parameters Google adds to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct AuthorizationRedirect {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl AuthorizationRedirect {
    /// Get the authorization code, checking that the redirect answers the
    /// request that was sent with `expected_state`.
    pub fn into_code(self, expected_state: &str) -> Result<String, Error> {
        if let Some(error) = self.error {
            return Err(Error::AuthorizationDenied(error));
        }

        if self.state.as_deref() != Some(expected_state) {
            return Err(Error::StateMismatch);
        }

        self.code.ok_or_else(|| {
            Error::OAuthFlow("the redirect did not include an authorization code".to_owned())
        })
    }
}

#[derive(Clone)]
struct RedirectState {
    redirects: mpsc::Sender<AuthorizationRedirect>,
}

async fn redirect_handler(
    State(state): State<RedirectState>,
    Query(redirect): Query<AuthorizationRedirect>,
) -> Markup {
    if let Err(error) = state.redirects.try_send(redirect) {
        tracing::warn!("Ignoring extra authorization redirect: {error}");
    }

    completion_page()
}

fn completion_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                title { "Spendwatch" }
            }
            body
            {
                p { "The authentication flow has completed. You may close this window." }
            }
        }
    }
}

fn redirect_router(redirects: mpsc::Sender<AuthorizationRedirect>) -> Router {
    Router::new()
        .route("/", get(redirect_handler))
        .with_state(RedirectState { redirects })
}

/// Ask the user to authorize the program and get the tokens for their
/// account.
///
/// Prints the consent page URL and, if `open_browser` is set, opens it in
/// the system browser. Waits until the user has answered.
pub async fn run_installed_app_flow(
    http: &Client,
    client: &ClientSecret,
    open_browser: bool,
) -> Result<TokenResponse, Error> {
    authorize(http, client, |url| {
        println!("Please visit this URL to authorize this application: {url}");

        if open_browser {
            if let Err(error) = browser::open(url.as_str()) {
                tracing::warn!("Could not open the browser: {error}");
            }
        }
    })
    .await
}

/// Run the authorization flow, handing the consent page URL to
/// `show_consent_page` once the redirect listener is ready.
pub(super) async fn authorize(
    http: &Client,
    client: &ClientSecret,
    show_consent_page: impl FnOnce(&Url),
) -> Result<TokenResponse, Error> {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .map_err(|error| Error::OAuthFlow(format!("could not start redirect listener: {error}")))?;
    let port = listener
        .local_addr()
        .map_err(|error| Error::OAuthFlow(format!("could not get redirect listener port: {error}")))?
        .port();

    let redirect_uri = format!("http://localhost:{port}/");
    let state = random_string(STATE_LENGTH);
    let pkce = Pkce::new();
    let url = authorization_url(client, &redirect_uri, &state, &pkce)?;

    let (redirect_sender, mut redirect_receiver) = mpsc::channel(1);
    let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();

    tracing::debug!("Waiting for the authorization redirect on {redirect_uri}");
    let server = tokio::spawn(async move {
        axum::serve(listener, redirect_router(redirect_sender))
            .with_graceful_shutdown(async {
                shutdown_receiver.await.ok();
            })
            .await
    });

    show_consent_page(&url);

    let redirect = redirect_receiver.recv().await;
    shutdown_sender.send(()).ok();

    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, server).await {
        Ok(Ok(Ok(()))) => tracing::debug!("Redirect listener shut down."),
        Ok(Ok(Err(error))) => tracing::warn!("Redirect listener failed: {error}"),
        Ok(Err(error)) => tracing::warn!("Redirect listener task failed: {error}"),
        Err(_) => tracing::debug!("Redirect listener did not shut down in time, leaving it."),
    }

    let code = redirect
        .ok_or_else(|| {
            Error::OAuthFlow("the redirect listener stopped before the user answered".to_owned())
        })?
        .into_code(&state)?;

    exchange_code(http, client, &code, &redirect_uri, &pkce).await
}

/// Exchange an authorization code for tokens.
pub(super) async fn exchange_code(
    http: &Client,
    client: &ClientSecret,
    code: &str,
    redirect_uri: &str,
    pkce: &Pkce,
) -> Result<TokenResponse, Error> {
    request_token(
        http,
        &client.token_uri,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("code_verifier", pkce.verifier.as_str()),
        ],
    )
    .await
}
