//! Turns the messages in a mailbox into transactions.

use crate::{
    Error,
    decode::extract_plain_text,
    gmail::{MailSource, SearchQuery},
    transaction::{Transaction, extract_transaction},
};

/// The outcome of scanning a mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// How many messages matched the search query.
    pub messages_found: usize,
    /// The transactions found in those messages, in the order the mailbox
    /// listed them.
    pub transactions: Vec<Transaction>,
}

/// Fetch every message matching `query` from `source` and extract the
/// transactions from their plain text bodies.
///
/// Messages without an amount are skipped.
///
/// # Errors
/// Returns the first error from listing or fetching the messages, or from
/// decoding a message body. No partial result is returned.
pub async fn scan_inbox<S: MailSource>(
    source: &S,
    query: &SearchQuery,
) -> Result<ScanResult, Error> {
    let messages = source.list_messages(query).await?;
    let mut transactions = Vec::new();

    for message_ref in &messages {
        let message = source.get_message(&message_ref.id).await?;
        let text = extract_plain_text(&message.payload)?;

        match extract_transaction(&text) {
            Some(transaction) => {
                tracing::debug!("Message {} contains {transaction:?}", message.id);
                transactions.push(transaction);
            }
            None => tracing::debug!("Skipping message {} without an amount", message.id),
        }
    }

    Ok(ScanResult {
        messages_found: messages.len(),
        transactions,
    })
}
