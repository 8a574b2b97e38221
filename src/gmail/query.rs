//! Builds the Gmail search query that finds transaction alerts.

use std::fmt::Display;

/// Words that appear in transaction alerts from Indian banks and wallets.
pub const DEFAULT_KEYWORDS: [&str; 4] = ["debited", "spent", "INR", "Rs"];

/// How many days back to search by default.
pub const DEFAULT_NEWER_THAN_DAYS: u32 = 30;

/// The largest number of messages to fetch by default.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// A keyword search limited to recent messages.
///
/// Displays as a Gmail search string, e.g.
/// `(debited OR spent OR INR OR Rs) newer_than:30d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Messages must contain at least one of these words.
    pub keywords: Vec<String>,
    /// Only messages received in the last `newer_than_days` days match.
    pub newer_than_days: u32,
    /// The largest number of messages to fetch.
    pub max_results: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|&word| word.to_owned()).collect(),
            newer_than_days: DEFAULT_NEWER_THAN_DAYS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.keywords.is_empty() {
            write!(f, "({}) ", self.keywords.join(" OR "))?;
        }

        write!(f, "newer_than:{}d", self.newer_than_days)
    }
}

#[cfg(test)]
mod tests {
    use super::SearchQuery;

    #[test]
    fn default_query_matches_transaction_alerts() {
        let query = SearchQuery::default();

        assert_eq!(
            query.to_string(),
            "(debited OR spent OR INR OR Rs) newer_than:30d"
        );
        assert_eq!(query.max_results, 20);
    }

    #[test]
    fn custom_window() {
        let query = SearchQuery {
            keywords: vec!["paid".to_owned()],
            newer_than_days: 7,
            max_results: 5,
        };

        assert_eq!(query.to_string(), "(paid) newer_than:7d");
    }

    #[test]
    fn no_keywords_only_limits_by_date() {
        let query = SearchQuery {
            keywords: Vec::new(),
            ..Default::default()
        };

        assert_eq!(query.to_string(), "newer_than:30d");
    }
}
