use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Runtime configuration for a POS terminal session.
///
/// Only the API base URL comes from the environment by necessity; the rest
/// have operational defaults and optional overrides.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the order-management backend, e.g. `https://host/api`.
    pub base_url: String,
    /// Restaurant name printed in the KOT header.
    pub restaurant_name: String,
    /// `limit` used when fetching the menu item list.
    pub item_limit: u32,
    /// Orders per page in the history view.
    pub page_size: u32,
    /// Quiet period before a search-term change triggers a fetch.
    pub search_debounce: Duration,
    /// How long a success/failure message stays up before the submission
    /// flow returns to idle.
    pub message_delay: Duration,
    /// Request timeout for all backend calls.
    pub http_timeout: Duration,
    /// Number of times each KOT is sent to the printer.
    pub print_copies: u32,
    /// Pause between successive copies of the same ticket.
    pub print_pause: Duration,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            restaurant_name: "BUDDHA AVENUE".to_string(),
            item_limit: 100,
            page_size: 10,
            search_debounce: Duration::from_millis(300),
            message_delay: Duration::from_secs(2),
            http_timeout: Duration::from_secs(20),
            print_copies: 2,
            print_pause: Duration::from_millis(1500),
        }
    }

    /// Reads configuration from the environment. `POS_API_URL` is required;
    /// `POS_RESTAURANT_NAME`, `POS_PAGE_SIZE` and `POS_PRINT_COPIES` are
    /// optional overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("POS_API_URL").map_err(|_| ConfigError::MissingVar("POS_API_URL"))?;
        let mut config = Self::new(base_url);

        if let Ok(name) = env::var("POS_RESTAURANT_NAME") {
            config.restaurant_name = name;
        }
        if let Ok(value) = env::var("POS_PAGE_SIZE") {
            config.page_size = parse_var("POS_PAGE_SIZE", value)?;
        }
        if let Ok(value) = env::var("POS_PRINT_COPIES") {
            config.print_copies = parse_var("POS_PRINT_COPIES", value)?;
        }

        Ok(config)
    }
}

fn parse_var(var: &'static str, value: String) -> Result<u32, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidVar { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_operational_values() {
        let config = Config::new("http://localhost:3000/api");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.print_copies, 2);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.print_pause, Duration::from_millis(1500));
    }

    #[test]
    fn parse_var_rejects_garbage() {
        let err = parse_var("POS_PAGE_SIZE", "ten".to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "POS_PAGE_SIZE", .. }));
    }
}
