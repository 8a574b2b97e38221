//! Extracts the plain text body of a Gmail message.

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::{Error, gmail::MessagePart};

const TEXT_PLAIN: &str = "text/plain";

/// URL-safe base64 that accepts data with or without trailing padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Get the plain text body of a message payload.
///
/// For multipart messages, the top level `text/plain` parts are decoded and the
/// last one is returned. A multipart message without a `text/plain` part has
/// an empty body. Single part messages return their own body regardless of
/// MIME type.
///
/// # Errors
/// Returns:
/// - [Error::MissingBodyData] if the selected part has no body data,
/// - [Error::Base64Decode] if the body data is not URL-safe base64,
/// - [Error::InvalidUtf8] if the decoded body is not UTF-8.
pub fn extract_plain_text(payload: &MessagePart) -> Result<String, Error> {
    match &payload.parts {
        Some(parts) => {
            let mut text = String::new();

            for part in parts.iter().filter(|part| part.mime_type == TEXT_PLAIN) {
                text = decode_part_body(part)?;
            }

            Ok(text)
        }
        None => decode_part_body(payload),
    }
}

fn decode_part_body(part: &MessagePart) -> Result<String, Error> {
    let data = part
        .body
        .data
        .as_deref()
        .ok_or_else(|| Error::MissingBodyData(part.mime_type.clone()))?;

    decode_body_data(data)
}

/// Decode URL-safe base64 body data into a string.
pub fn decode_body_data(data: &str) -> Result<String, Error> {
    let bytes = URL_SAFE_LENIENT
        .decode(data)
        .map_err(|error| Error::Base64Decode(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::InvalidUtf8(error.to_string()))
}
