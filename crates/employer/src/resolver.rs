//! Ticker resolution.

use std::sync::Arc;

use employer_core::{CompanyName, DelayRange, SearchCandidate, Symbol, SymbolSearch};
use tracing::debug;

/// The first equity-type candidate, in provider order.
#[must_use]
pub fn first_equity(candidates: &[SearchCandidate]) -> Option<Symbol> {
    candidates
        .iter()
        .find(|c| c.instrument.is_equity())
        .map(|c| c.symbol.clone())
}

/// Maps company names onto ticker symbols with one lookup query per name.
///
/// Lookup failures are not retried and resolve to `None`, exactly as an empty
/// candidate list would. A politeness delay follows every query.
#[derive(Debug, Clone)]
pub struct TickerResolver {
    search: Arc<dyn SymbolSearch>,
    politeness: DelayRange,
}

impl TickerResolver {
    /// Create a resolver over a lookup service.
    #[must_use]
    pub fn new(search: Arc<dyn SymbolSearch>, politeness: DelayRange) -> Self {
        Self { search, politeness }
    }

    /// Resolves a name to the symbol of its first equity candidate.
    pub async fn resolve(&self, name: &CompanyName) -> Option<Symbol> {
        let result = self.search.search(name.as_str()).await;
        self.politeness.pause().await;

        match result {
            Ok(candidates) => {
                let symbol = first_equity(&candidates);
                debug!(
                    provider = self.search.name(),
                    company = %name,
                    candidates = candidates.len(),
                    symbol = ?symbol,
                    "Lookup completed"
                );
                symbol
            }
            Err(e) => {
                debug!(
                    provider = self.search.name(),
                    company = %name,
                    error = %e,
                    "Lookup failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use employer_core::{InstrumentType, Provider, Result, ScreenError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct ScriptedSearch {
        calls: AtomicUsize,
    }

    impl Provider for ScriptedSearch {
        fn name(&self) -> &str {
            "scripted"
        }

        fn description(&self) -> &str {
            "scripted lookup"
        }
    }

    #[async_trait]
    impl SymbolSearch for ScriptedSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match query {
                "Hilton" => Ok(vec![
                    SearchCandidate::new(Symbol::new("HLTFND"), InstrumentType::MutualFund),
                    SearchCandidate::new(Symbol::new("HLT"), InstrumentType::Equity),
                    SearchCandidate::new(Symbol::new("HLT.MX"), InstrumentType::Equity),
                ]),
                "Fund Only" => Ok(vec![SearchCandidate::new(
                    Symbol::new("FND"),
                    InstrumentType::Etf,
                )]),
                "Flaky" => Err(ScreenError::Network("connection reset".to_string())),
                _ => Ok(Vec::new()),
            }
        }
    }

    fn resolver() -> (TickerResolver, Arc<ScriptedSearch>) {
        let search = Arc::new(ScriptedSearch::default());
        (TickerResolver::new(search.clone(), DelayRange::NONE), search)
    }

    fn name(s: &str) -> CompanyName {
        CompanyName::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_first_equity_wins() {
        let (resolver, _) = resolver();
        assert_eq!(resolver.resolve(&name("Hilton")).await, Some(Symbol::new("HLT")));
    }

    #[tokio::test]
    async fn test_no_equity_is_not_found() {
        let (resolver, _) = resolver();
        assert_eq!(resolver.resolve(&name("Fund Only")).await, None);
        assert_eq!(resolver.resolve(&name("Unlisted Co")).await, None);
    }

    #[tokio::test]
    async fn test_lookup_error_is_not_found_without_retry() {
        let (resolver, search) = resolver();
        assert_eq!(resolver.resolve(&name("Flaky")).await, None);
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }
}
