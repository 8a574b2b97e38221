//! Loads the OAuth client secret downloaded from the Google Cloud console.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::Error;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The OAuth client the program authorizes as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecret {
    /// The client ID, e.g. "1234.apps.googleusercontent.com".
    pub client_id: String,
    /// The client secret.
    pub client_secret: String,
    /// Where the user is sent to grant access.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Where authorization codes and refresh tokens are exchanged for access
    /// tokens.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_owned()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

/// The client secret file has the client under a key named after the
/// application type.
#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Read the client secret from the JSON file at `path`.
    ///
    /// # Errors
    /// Returns [Error::ClientSecretFile] if the file cannot be read, or
    /// [Error::InvalidClientSecret] if it is not a client secret file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|error| Error::ClientSecretFile(format!("{}: {error}", path.display())))?;

        Self::from_json(&text)
    }

    /// Parse the contents of a client secret file for an installed or web
    /// application.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let file: ClientSecretFile = serde_json::from_str(text)
            .map_err(|error| Error::InvalidClientSecret(error.to_string()))?;

        file.installed.or(file.web).ok_or_else(|| {
            Error::InvalidClientSecret(
                "expected an \"installed\" or \"web\" application client".to_owned(),
            )
        })
    }
}
