//! User-agent rotation.

use rand::seq::SliceRandom;

/// Agents used when no pool is configured.
pub const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    "Mozilla/5.0 (X11; Linux x86_64)",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X)",
];

/// A fixed pool of user agents; each call to [`pick`](Self::pick) draws one at random.
#[derive(Clone, Debug)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Creates a pool. An empty list falls back to [`DEFAULT_USER_AGENTS`].
    #[must_use]
    pub fn new(agents: Vec<String>) -> Self {
        if agents.is_empty() {
            Self::default()
        } else {
            Self { agents }
        }
    }

    /// Returns one agent from the pool.
    #[must_use]
    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .map_or(DEFAULT_USER_AGENTS[0], String::as_str)
    }

    /// Returns every agent in the pool.
    #[must_use]
    pub fn agents(&self) -> &[String] {
        &self.agents
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            agents: DEFAULT_USER_AGENTS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_from_pool() {
        let pool = UserAgentPool::new(vec!["a".to_string(), "b".to_string()]);
        for _ in 0..20 {
            assert!(["a", "b"].contains(&pool.pick()));
        }
    }

    #[test]
    fn test_empty_pool_uses_defaults() {
        let pool = UserAgentPool::new(Vec::new());
        assert_eq!(pool.agents().len(), DEFAULT_USER_AGENTS.len());
        assert!(DEFAULT_USER_AGENTS.contains(&pool.pick()));
    }
}
