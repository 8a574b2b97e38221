//! The Gmail API resources used by the fetcher.
//!
//! Only the fields the program reads are modelled, everything else in the
//! responses is ignored.

use serde::Deserialize;

/// A message ID returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// The immutable ID of the message.
    pub id: String,
    /// The ID of the thread the message belongs to.
    #[serde(default)]
    pub thread_id: String,
}

/// The response body of `users.messages.list`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListMessagesResponse {
    /// Absent when nothing matches the query.
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    #[serde(default)]
    pub result_size_estimate: u32,
}

/// A message fetched with `format=full`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// The immutable ID of the message.
    pub id: String,
    /// A short part of the message text.
    #[serde(default)]
    pub snippet: String,
    /// The parsed email structure.
    pub payload: MessagePart,
}

/// A single MIME part of a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    /// The MIME type of the part, e.g. "text/plain" or "multipart/alternative".
    #[serde(default)]
    pub mime_type: String,
    /// The body of the part, empty for container parts.
    #[serde(default)]
    pub body: MessagePartBody,
    /// The child parts of a multipart message, `None` for single part messages.
    pub parts: Option<Vec<MessagePart>>,
}

/// The body of a MIME part.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePartBody {
    /// The body data encoded as URL-safe base64.
    pub data: Option<String>,
    /// The number of bytes in the body.
    #[serde(default)]
    pub size: u64,
}
