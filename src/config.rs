//! Settings for a single run of the program.

use std::path::PathBuf;

use crate::{auth::AuthSettings, gmail::SearchQuery, report::DEFAULT_MONTHLY_BUDGET};

/// The default path of the OAuth client secret file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
/// The default path of the token cache.
pub const DEFAULT_TOKEN_PATH: &str = "token.json";
/// The default path of the chart page.
pub const DEFAULT_CHART_PATH: &str = "spending_by_category.html";
/// The default path of the debug log.
pub const DEFAULT_LOG_PATH: &str = "debug.log";

/// Everything a run needs to know, with defaults for a run in the directory
/// holding `credentials.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The OAuth client secret file.
    pub credentials_path: PathBuf,
    /// The token cache file.
    pub token_path: PathBuf,
    /// The messages to look for.
    pub search: SearchQuery,
    /// The budget the total spending is checked against.
    pub monthly_budget: u64,
    /// Where to write the chart page.
    pub chart_path: PathBuf,
    /// Whether to open the consent page and the chart in the browser.
    pub open_browser: bool,
    /// Where to write the debug log.
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            search: SearchQuery::default(),
            monthly_budget: DEFAULT_MONTHLY_BUDGET,
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            open_browser: true,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl Config {
    /// The part of the config used to get an access token.
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            credentials_path: self.credentials_path.clone(),
            token_path: self.token_path.clone(),
            open_browser: self.open_browser,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Config;

    #[test]
    fn defaults_match_a_plain_run() {
        let config = Config::default();

        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.token_path, PathBuf::from("token.json"));
        assert_eq!(config.monthly_budget, 10_000);
        assert_eq!(
            config.search.to_string(),
            "(debited OR spent OR INR OR Rs) newer_than:30d"
        );
        assert_eq!(config.search.max_results, 20);
        assert!(config.open_browser);
    }

    #[test]
    fn auth_settings_use_configured_paths() {
        let config = Config {
            credentials_path: PathBuf::from("secrets/client.json"),
            token_path: PathBuf::from("secrets/token.json"),
            open_browser: false,
            ..Default::default()
        };

        let settings = config.auth_settings();

        assert_eq!(settings.credentials_path, PathBuf::from("secrets/client.json"));
        assert_eq!(settings.token_path, PathBuf::from("secrets/token.json"));
        assert!(!settings.open_browser);
    }
}
