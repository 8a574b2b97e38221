//! Spendwatch reads transaction notifications from a Gmail inbox and turns
//! them into a small spending dashboard.
//!
//! A run goes through these stages:
//! 1. [auth] gets an access token for the Gmail API, reusing `token.json` when
//!    possible.
//! 2. [gmail] lists the messages that look like transaction alerts and fetches
//!    each one.
//! 3. [decode] pulls the plain text body out of each message.
//! 4. [transaction] extracts the amount and merchant and assigns a category.
//! 5. [report] totals the spending and checks it against the budget,
//!    [forecast] predicts the next expense and [chart] draws the spending by
//!    category.

#![warn(missing_docs)]

pub mod auth;
pub mod browser;
pub mod chart;
pub mod config;
pub mod decode;
pub mod forecast;
pub mod gmail;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use pipeline::{ScanResult, scan_inbox};
pub use transaction::{Category, Transaction};

/// The errors that may occur while running the program.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The OAuth client secret file (`credentials.json`) could not be read.
    #[error("could not read the OAuth client secret file: {0}")]
    ClientSecretFile(String),

    /// The OAuth client secret file was read but is not in the format Google
    /// issues for installed or web applications.
    #[error("invalid OAuth client secret: {0}")]
    InvalidClientSecret(String),

    /// The token cache (`token.json`) could not be read, parsed or written.
    #[error("token cache error: {0}")]
    TokenCache(String),

    /// The local redirect listener used by the OAuth flow failed.
    #[error("the OAuth flow failed: {0}")]
    OAuthFlow(String),

    /// The user (or the authorization server) rejected the authorization
    /// request.
    ///
    /// Callers should pass in the `error` query parameter from the redirect.
    #[error("authorization was denied: {0}")]
    AuthorizationDenied(String),

    /// The `state` returned with the authorization code did not match the one
    /// sent with the authorization request.
    #[error("the OAuth state parameter did not match, the redirect may be forged")]
    StateMismatch,

    /// The token endpoint did not return an access token.
    #[error("could not obtain an access token: {0}")]
    TokenExchange(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The Gmail API answered with a non-success status code.
    #[error("the mail API returned {status}: {message}")]
    MailApi {
        /// The HTTP status code.
        status: u16,
        /// The error message from the response body.
        message: String,
    },

    /// A response from the Gmail API could not be deserialized.
    #[error("unexpected response from the mail API: {0}")]
    InvalidResponse(String),

    /// A message body was not valid URL-safe base64.
    #[error("could not decode message body as base64: {0}")]
    Base64Decode(String),

    /// A decoded message body was not valid UTF-8.
    #[error("message body is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// The message part selected for decoding has no body data.
    ///
    /// Callers should pass in the MIME type of the part.
    #[error("the {0} message part has no body data")]
    MissingBodyData(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The chart page could not be written to disk.
    #[error("could not write the chart: {0}")]
    Chart(String),

    /// The logging subscriber could not be set up.
    #[error("could not set up logging: {0}")]
    Logging(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        tracing::error!("an HTTP error occurred: {}", value);
        Error::Http(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}
