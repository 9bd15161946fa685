//! Run configuration.
//!
//! [`ScreenConfig`] is deserialized from TOML. Every field has a default, so an
//! empty file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    agent::{DEFAULT_USER_AGENTS, UserAgentPool},
    error::{Result, ScreenError},
    retry::{BackoffPolicy, DelayRange},
};

/// Forbes "Top 100 America's Best Large Employers 2025" article.
pub const FORBES_URL: &str = "https://www.forbes.com/sites/rachelpeachman/2025/03/19/the-top-100-americas-best-large-employers-of--2025/";

/// Great Place To Work "100 Best Companies to Work For 2025".
pub const GPTW_URL: &str = "https://www.greatplacetowork.com/best-workplaces/100-best/2025";

/// Top-level screen configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Path of the spreadsheet to write.
    pub output_path: PathBuf,
    /// Names kept from each ranking after normalization, applied to Forbes and
    /// Great Place To Work alike. `None` keeps every name.
    pub top_n: Option<usize>,
    /// Pause after each ranking page fetch.
    pub source_delay: DelayRange,
    /// Pause after each ticker lookup query.
    pub lookup_delay: DelayRange,
    /// Pause after each company is processed.
    pub company_delay: DelayRange,
    /// Retry policy for metrics queries.
    pub fetch: BackoffPolicy,
    /// Timeout for ranking page requests, in seconds.
    pub page_timeout_secs: u64,
    /// Timeout for ticker lookup requests, in seconds.
    pub lookup_timeout_secs: u64,
    /// User agents rotated across requests.
    pub user_agents: Vec<String>,
    /// Forbes ranking URL.
    pub forbes_url: String,
    /// Great Place To Work ranking URL.
    pub gptw_url: String,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("Employer_Stock_Analysis.xlsx"),
            top_n: Some(100),
            source_delay: DelayRange::new(1.0, 3.0),
            lookup_delay: DelayRange::new(0.5, 1.5),
            company_delay: DelayRange::new(3.0, 8.0),
            fetch: BackoffPolicy::default(),
            page_timeout_secs: 10,
            lookup_timeout_secs: 5,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| (*s).to_string()).collect(),
            forbes_url: FORBES_URL.to_string(),
            gptw_url: GPTW_URL.to_string(),
        }
    }
}

impl ScreenConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ScreenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ScreenError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Configuration with every delay disabled, for tests and dry runs.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            source_delay: DelayRange::NONE,
            lookup_delay: DelayRange::NONE,
            company_delay: DelayRange::NONE,
            fetch: BackoffPolicy::new(3, DelayRange::NONE),
            ..Self::default()
        }
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.max_attempts == 0 {
            return Err(ScreenError::Config(
                "fetch.max_attempts must be at least 1".to_string(),
            ));
        }

        let ranges = [
            ("source_delay", self.source_delay),
            ("lookup_delay", self.lookup_delay),
            ("company_delay", self.company_delay),
            ("fetch.delay", self.fetch.delay),
        ];
        for (field, range) in ranges {
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(range.min_secs) || !valid(range.max_secs) {
                return Err(ScreenError::Config(format!(
                    "{field} bounds must be finite and non-negative"
                )));
            }
            if range.min_secs > range.max_secs {
                return Err(ScreenError::Config(format!(
                    "{field}.min_secs exceeds {field}.max_secs"
                )));
            }
        }

        if self.user_agents.iter().all(|a| a.trim().is_empty()) {
            return Err(ScreenError::Config(
                "user_agents must contain at least one agent".to_string(),
            ));
        }

        if self.page_timeout_secs == 0 || self.lookup_timeout_secs == 0 {
            return Err(ScreenError::Config("timeouts must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Builds the user-agent pool from the configured agents.
    #[must_use]
    pub fn user_agent_pool(&self) -> UserAgentPool {
        UserAgentPool::new(
            self.user_agents
                .iter()
                .filter(|a| !a.trim().is_empty())
                .cloned()
                .collect(),
        )
    }
}
