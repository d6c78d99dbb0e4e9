// src/config.rs
// =============================================================================
// Runtime configuration shared by the page fetcher and the image transport.
//
// The binary fills this in from command-line flags (each of which can also
// come from an environment variable, see src/cli.rs). Library users build
// it directly or start from Config::default().
// =============================================================================

use std::time::Duration;

use reqwest::Client;

/// Timeout applied to every request unless configured otherwise
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Per-request timeout for page and image fetches
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn new(timeout_secs: u64, user_agent: Option<String>) -> Self {
        Config {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: user_agent
                .filter(|agent| !agent.trim().is_empty())
                .unwrap_or_else(default_user_agent),
        }
    }

    // Builds the reqwest client used for all requests
    //
    // Client is cheap to clone (it's an Arc internally), so one client is
    // shared by the fetcher and the image transport
    pub fn http_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
    }
}

pub fn default_user_agent() -> String {
    format!("og-preview/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("og-preview/"));
    }

    #[test]
    fn test_blank_user_agent_falls_back_to_default() {
        let config = Config::new(3, Some("  ".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, default_user_agent());

        let config = Config::new(3, Some("custom/1.0".to_string()));
        assert_eq!(config.user_agent, "custom/1.0");
    }

    #[test]
    fn test_builds_http_client() {
        assert!(Config::default().http_client().is_ok());
    }
}
