//! Fetches transaction alerts from the Gmail REST API.
//!
//! The [MailSource] trait is what the rest of the program depends on, and
//! [GmailClient] is its implementation over HTTPS.

mod message;
mod query;

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::Error;

pub use message::{Message, MessagePart, MessagePartBody, MessageRef};
pub use query::{DEFAULT_KEYWORDS, DEFAULT_MAX_RESULTS, DEFAULT_NEWER_THAN_DAYS, SearchQuery};

use message::ListMessagesResponse;

/// The base URL of version 1 of the Gmail API.
pub const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// The user ID that refers to the owner of the access token.
const AUTHENTICATED_USER: &str = "me";

/// A mailbox that can be searched for messages.
pub trait MailSource {
    /// Get the IDs of the messages matching `query`, newest first.
    fn list_messages(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<MessageRef>, Error>>;

    /// Get the full content of the message with the ID `id`.
    fn get_message(&self, id: &str) -> impl Future<Output = Result<Message, Error>>;
}

/// A client for the mailbox of the user that authorized the access token.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    /// Create a client for the Gmail API at [GMAIL_API_BASE_URL].
    pub fn new(http: Client, access_token: String) -> Self {
        Self::with_base_url(http, access_token, GMAIL_API_BASE_URL.to_owned())
    }

    /// Create a client for a Gmail compatible API at `base_url`.
    ///
    /// `base_url` should not end with a slash.
    pub fn with_base_url(http: Client, access_token: String, base_url: String) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/users/{AUTHENTICATED_USER}/messages", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_owned());
            tracing::error!("GET {url} failed with {status}: {message}");

            return Err(Error::MailApi {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|error| {
            tracing::debug!("Could not deserialize response body: {body}");
            Error::InvalidResponse(error.to_string())
        })
    }
}

impl MailSource for GmailClient {
    async fn list_messages(&self, query: &SearchQuery) -> Result<Vec<MessageRef>, Error> {
        let search = query.to_string();
        tracing::debug!("Searching for messages with query {search:?}");

        let response: ListMessagesResponse = self
            .get_json(
                &self.messages_url(),
                &[("q", search), ("maxResults", query.max_results.to_string())],
            )
            .await?;

        tracing::debug!(
            "Found {} messages (estimated total {})",
            response.messages.len(),
            response.result_size_estimate
        );

        Ok(response.messages)
    }

    async fn get_message(&self, id: &str) -> Result<Message, Error> {
        let url = format!("{}/{id}", self.messages_url());

        self.get_json(&url, &[("format", "full".to_owned())]).await
    }
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Get the message from a Google API error body, if the body has one.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|response| response.error.message)
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode, header::AUTHORIZATION},
        response::IntoResponse,
        routing::get,
    };
    use serde_json::json;

    use crate::{Error, test_utils::serve};

    use super::{GmailClient, MailSource, SearchQuery, api_error_message};

    const ACCESS_TOKEN: &str = "ya29.test-token";

    fn is_authorized(headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .is_some_and(|value| value == format!("Bearer {ACCESS_TOKEN}").as_str())
    }

    async fn list_handler(
        headers: HeaderMap,
        Query(params): Query<Vec<(String, String)>>,
    ) -> impl IntoResponse {
        if !is_authorized(&headers) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": 401, "message": "Invalid Credentials"}})),
            );
        }

        let expected = vec![
            (
                "q".to_owned(),
                "(debited OR spent OR INR OR Rs) newer_than:30d".to_owned(),
            ),
            ("maxResults".to_owned(), "20".to_owned()),
        ];

        if params != expected {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"code": 400, "message": format!("{params:?}")}})),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "messages": [
                    {"id": "a1", "threadId": "t1"},
                    {"id": "b2", "threadId": "t2"}
                ],
                "resultSizeEstimate": 2
            })),
        )
    }

    async fn get_handler(
        headers: HeaderMap,
        Path(id): Path<String>,
        Query(params): Query<Vec<(String, String)>>,
    ) -> impl IntoResponse {
        if !is_authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({})));
        }

        if params != vec![("format".to_owned(), "full".to_owned())] {
            return (StatusCode::BAD_REQUEST, Json(json!({})));
        }

        if id == "broken" {
            return (StatusCode::OK, Json(json!({"id": "broken"})));
        }

        if id != "a1" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"code": 404, "message": "Requested entity was not found."}})),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "id": "a1",
                "threadId": "t1",
                "snippet": "You spent Rs. 450 at Zomato",
                "payload": {
                    "mimeType": "text/plain",
                    "body": {"size": 27, "data": "WW91IHNwZW50IFJzLiA0NTAgYXQgWm9tYXRv"}
                }
            })),
        )
    }

    async fn mock_gmail() -> String {
        let router = Router::new()
            .route("/users/me/messages", get(list_handler))
            .route("/users/me/messages/{id}", get(get_handler));

        serve(router).await
    }

    fn client(base_url: String, access_token: &str) -> GmailClient {
        GmailClient::with_base_url(reqwest::Client::new(), access_token.to_owned(), base_url)
    }

    #[tokio::test]
    async fn lists_messages_matching_query() {
        let client = client(mock_gmail().await, ACCESS_TOKEN);

        let messages = client
            .list_messages(&SearchQuery::default())
            .await
            .expect("Could not list messages");

        let ids: Vec<&str> = messages.iter().map(|message| message.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "b2"]);
        assert_eq!(messages[1].thread_id, "t2");
    }

    #[tokio::test]
    async fn gets_full_message() {
        let client = client(mock_gmail().await, ACCESS_TOKEN);

        let message = client.get_message("a1").await.expect("Could not get message");

        assert_eq!(message.id, "a1");
        assert_eq!(message.payload.mime_type, "text/plain");
        assert_eq!(
            message.payload.body.data.as_deref(),
            Some("WW91IHNwZW50IFJzLiA0NTAgYXQgWm9tYXRv")
        );
    }

    #[tokio::test]
    async fn missing_message_is_api_error() {
        let client = client(mock_gmail().await, ACCESS_TOKEN);

        let result = client.get_message("zz").await;

        assert_eq!(
            result,
            Err(Error::MailApi {
                status: 404,
                message: "Requested entity was not found.".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn bad_token_is_api_error() {
        let client = client(mock_gmail().await, "expired");

        let result = client.list_messages(&SearchQuery::default()).await;

        assert_eq!(
            result,
            Err(Error::MailApi {
                status: 401,
                message: "Invalid Credentials".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let client = client(mock_gmail().await, ACCESS_TOKEN);

        let result = client.get_message("broken").await;

        assert!(matches!(result, Err(Error::InvalidResponse(_))), "{result:?}");
    }

    #[test]
    fn reads_google_error_message() {
        let body = r#"{"error": {"code": 403, "message": "Insufficient Permission", "status": "PERMISSION_DENIED"}}"#;

        assert_eq!(
            api_error_message(body),
            Some("Insufficient Permission".to_owned())
        );
        assert_eq!(api_error_message("<html>Bad Gateway</html>"), None);
    }
}
