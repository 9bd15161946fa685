//! Metrics fetching with bounded retries.

use std::sync::Arc;

use employer_core::{
    BackoffPolicy, CompanyName, FinancialRecord, Outcome, QuoteSource, ScreenError, Symbol,
    attempt_with_backoff,
};
use tracing::{debug, warn};

/// Fetches a [`FinancialRecord`] per ticker, retrying failed queries.
///
/// An attempt succeeds only when the response carries a display name. A
/// response without one still has its other fields copied into the record,
/// then counts as a failed attempt.
#[derive(Debug, Clone)]
pub struct MetricsFetcher {
    quotes: Arc<dyn QuoteSource>,
    policy: BackoffPolicy,
}

impl MetricsFetcher {
    /// Create a fetcher over a metrics service.
    #[must_use]
    pub fn new(quotes: Arc<dyn QuoteSource>, policy: BackoffPolicy) -> Self {
        Self { quotes, policy }
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Fetches metrics for `ticker`. Never fails: exhausted retries yield a
    /// record whose `last_error` holds the final attempt's error text.
    pub async fn fetch(&self, company: &CompanyName, ticker: &Symbol) -> FinancialRecord {
        let mut record = FinancialRecord::new(ticker.clone(), company.clone());

        let outcome = attempt_with_backoff(
            &self.policy,
            ticker.as_str(),
            |_| self.quotes.quote(ticker),
            |snapshot| {
                record.absorb(&snapshot);
                if snapshot.has_name() {
                    Ok(snapshot)
                } else {
                    Err(ScreenError::MissingName(ticker.to_string()))
                }
            },
        )
        .await;

        match outcome {
            Outcome::Success { attempts, .. } => {
                record.last_error = None;
                debug!(
                    provider = self.quotes.name(),
                    symbol = %ticker,
                    attempts,
                    "Fetched metrics"
                );
            }
            Outcome::Exhausted { error, attempts } => {
                warn!(
                    provider = self.quotes.name(),
                    symbol = %ticker,
                    attempts,
                    error = %error,
                    "Failed to fetch metrics"
                );
                record.last_error = Some(error.to_string());
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use employer_core::{DelayRange, Provider, QuoteSnapshot, Result};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replays scripted responses, then keeps failing.
    #[derive(Debug)]
    struct ScriptedQuotes {
        responses: Mutex<VecDeque<Result<QuoteSnapshot>>>,
        calls: AtomicU32,
    }

    impl ScriptedQuotes {
        fn new(responses: Vec<Result<QuoteSnapshot>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Provider for ScriptedQuotes {
        fn name(&self) -> &str {
            "scripted"
        }

        fn description(&self) -> &str {
            "scripted quotes"
        }
    }

    #[async_trait]
    impl QuoteSource for ScriptedQuotes {
        async fn quote(&self, _symbol: &Symbol) -> Result<QuoteSnapshot> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ScreenError::Network(format!("exhausted script {n}"))))
        }
    }

    fn named(name: &str) -> QuoteSnapshot {
        QuoteSnapshot {
            short_name: Some(name.to_string()),
            sector: Some("Technology".to_string()),
            price: Some(100.0),
            trailing_pe: Some(30.0),
            ..Default::default()
        }
    }

    fn fetcher(quotes: Arc<ScriptedQuotes>, max_attempts: u32) -> MetricsFetcher {
        MetricsFetcher::new(quotes, BackoffPolicy::new(max_attempts, DelayRange::NONE))
    }

    fn acme() -> CompanyName {
        CompanyName::new("Acme").unwrap()
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let quotes = ScriptedQuotes::new(vec![Ok(named("Acme Inc."))]);
        let record = fetcher(quotes.clone(), 3)
            .fetch(&acme(), &Symbol::new("ACME"))
            .await;

        assert_eq!(quotes.calls(), 1);
        assert_eq!(record.name.as_deref(), Some("Acme Inc."));
        assert_eq!(record.company, acme());
        assert_eq!(record.pe_ratio, Some(30.0));
        assert!(record.last_error.is_none());
    }

    #[tokio::test]
    async fn test_all_attempts_fail_keeps_third_error() {
        let quotes = ScriptedQuotes::new(vec![
            Err(ScreenError::Network("timeout 1".to_string())),
            Err(ScreenError::Network("timeout 2".to_string())),
            Err(ScreenError::Network("timeout 3".to_string())),
        ]);
        let record = fetcher(quotes.clone(), 3)
            .fetch(&acme(), &Symbol::new("ACME"))
            .await;

        assert_eq!(quotes.calls(), 3);
        assert_eq!(record.ticker, Symbol::new("ACME"));
        assert!(record.name.is_none());
        assert!(record.sector.is_none());
        assert!(record.price.is_none());
        assert_eq!(record.last_error.as_deref(), Some("Network error: timeout 3"));
    }

    #[tokio::test]
    async fn test_missing_name_is_retried_then_cleared() {
        let nameless = QuoteSnapshot {
            sector: Some("Utilities".to_string()),
            ..Default::default()
        };
        let quotes = ScriptedQuotes::new(vec![
            Ok(nameless),
            Err(ScreenError::Parse("bad json".to_string())),
            Ok(named("Acme Inc.")),
        ]);
        let record = fetcher(quotes.clone(), 3)
            .fetch(&acme(), &Symbol::new("ACME"))
            .await;

        assert_eq!(quotes.calls(), 3);
        assert!(record.is_usable());
        assert_eq!(record.sector.as_deref(), Some("Technology"));
        assert!(record.last_error.is_none());
    }

    #[tokio::test]
    async fn test_nameless_fields_survive_exhaustion() {
        let nameless = QuoteSnapshot {
            sector: Some("Utilities".to_string()),
            market_cap: Some(1.0e9),
            ..Default::default()
        };
        let quotes = ScriptedQuotes::new(vec![Ok(nameless)]);
        let record = fetcher(quotes.clone(), 2)
            .fetch(&acme(), &Symbol::new("ACME"))
            .await;

        assert_eq!(quotes.calls(), 2);
        assert!(!record.is_usable());
        assert_eq!(record.sector.as_deref(), Some("Utilities"));
        assert_eq!(record.market_cap, Some(1.0e9));
        assert_eq!(record.last_error.as_deref(), Some("Network error: exhausted script 2"));
    }

    #[tokio::test]
    async fn test_missing_name_error_text() {
        let quotes = ScriptedQuotes::new(vec![Ok(QuoteSnapshot::default())]);
        let record = fetcher(quotes, 1).fetch(&acme(), &Symbol::new("ACME")).await;

        assert_eq!(
            record.last_error.as_deref(),
            Some("Minimal info (Name) not received for ACME")
        );
    }

    #[tokio::test]
    async fn test_partial_success_is_success() {
        let partial = QuoteSnapshot {
            short_name: Some("Acme Inc.".to_string()),
            sector: Some("Industrials".to_string()),
            ..Default::default()
        };
        let quotes = ScriptedQuotes::new(vec![Ok(partial)]);
        let record = fetcher(quotes.clone(), 3)
            .fetch(&acme(), &Symbol::new("ACME"))
            .await;

        assert_eq!(quotes.calls(), 1);
        assert_eq!(record.sector.as_deref(), Some("Industrials"));
        assert!(record.pe_ratio.is_none());
        assert!(record.last_error.is_none());
    }
}
