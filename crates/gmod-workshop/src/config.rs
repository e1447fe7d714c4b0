//! Workshop client configuration

use std::time::Duration;

/// Steam Web API endpoint for published file details
pub const DEFAULT_API_URL: &str =
    "https://api.steampowered.com/ISteamRemoteStorage/GetPublishedFileDetails/v1/";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings shared by the metadata client and the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopConfig {
    /// Endpoint queried for item details
    pub api_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// User-Agent header sent with requests
    pub user_agent: String,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("gmod-workshop/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl WorkshopConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different details endpoint
    pub fn api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    pub fn user_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.user_agent = agent.into();
        self
    }
}
