#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/employer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance provider.
//!
//! This crate provides a Yahoo Finance client that implements the
//! [`Provider`], [`SymbolSearch`], and [`QuoteSource`] traits from
//! `employer-core`.
//!
//! # Features
//!
//! - Free-text ticker lookup using Yahoo Finance's search API
//! - Display name, sector, industry, price, market cap and trailing P/E
//!   from the quote summary API
//! - Built-in rate limiting (1 request per second by default)
//! - User-agent rotation per request
//! - Session crumb acquisition for the quote summary endpoint
//!
//! # Example
//!
//! ```no_run
//! use employer_yahoo::YahooProvider;
//! use employer_core::{QuoteSource, Symbol};
//!
//! # async fn example() -> employer_core::Result<()> {
//! let provider = YahooProvider::new()?;
//! let quote = provider.quote(&Symbol::new("AAPL")).await?;
//! println!("{:?}", quote.short_name);
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use employer_core::{
    InstrumentType, Provider, QuoteSnapshot, QuoteSource, Result, ScreenConfig, ScreenError,
    SearchCandidate, Symbol, SymbolSearch, UserAgentPool,
};
use reqwest::{StatusCode, Url, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

/// Yahoo Finance search API URL.
const SEARCH_API_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// Yahoo Finance quote summary API base URL.
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Modules requested from the quote summary API.
const QUOTE_MODULES: &str = "price,summaryProfile,summaryDetail,financialData";

/// Page visited to obtain session cookies.
const COOKIE_URL: &str = "https://fc.yahoo.com";

/// Endpoint returning the crumb bound to the session cookies.
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";

/// Default rate limit delay in milliseconds.
const DEFAULT_RATE_LIMIT_MS: u64 = 1000;

/// Default timeout for lookup queries.
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Provider label used in errors.
const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance provider.
///
/// Implements [`Provider`], [`SymbolSearch`], and [`QuoteSource`].
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    agents: UserAgentPool,
    rate_limit_ms: u64,
    lookup_timeout: Duration,
    last_request_time: AtomicU64,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with default settings.
    ///
    /// Uses built-in rate limiting of 1 request per second.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScreenError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client))
    }

    /// Create a provider from the run configuration.
    pub fn from_config(config: &ScreenConfig) -> Result<Self> {
        Ok(Self::new()?
            .with_user_agents(config.user_agent_pool())
            .with_lookup_timeout(Duration::from_secs(config.lookup_timeout_secs)))
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    ///
    /// Uses the provided client for all HTTP requests. Rate limiting
    /// is still applied. The client should keep a cookie store for the
    /// quote summary endpoint to accept the session crumb.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            agents: UserAgentPool::default(),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            last_request_time: AtomicU64::new(0),
            crumb: Mutex::new(None),
        }
    }

    /// Set the minimum spacing between requests.
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit_ms = rate_limit.as_millis() as u64;
        self
    }

    /// Set the user agents rotated across requests.
    #[must_use]
    pub fn with_user_agents(mut self, agents: UserAgentPool) -> Self {
        self.agents = agents;
        self
    }

    /// Set the timeout applied to lookup queries.
    #[must_use]
    pub const fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Apply rate limiting before making a request.
    async fn apply_rate_limit(&self) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let last = self.last_request_time.load(Ordering::Relaxed);
        let elapsed = now.saturating_sub(last);

        if elapsed < self.rate_limit_ms {
            let wait_time = self.rate_limit_ms - elapsed;
            debug!("Rate limiting: waiting {}ms", wait_time);
            sleep(Duration::from_millis(wait_time)).await;
        }

        self.last_request_time.store(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            Ordering::Relaxed,
        );
    }

    /// Build the search API URL for a free-text query.
    fn build_search_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(SEARCH_API_URL, &[("q", query), ("newsCount", "0")])
            .map_err(|e| ScreenError::InvalidParameter(e.to_string()))
    }

    /// Build the quote summary API URL for a symbol.
    fn build_quote_url(&self, symbol: &Symbol, crumb: Option<&str>) -> Result<Url> {
        let base = format!("{}/{}", QUOTE_SUMMARY_URL, symbol.as_str());
        let mut params = vec![("modules", QUOTE_MODULES)];
        if let Some(crumb) = crumb {
            params.push(("crumb", crumb));
        }
        Url::parse_with_params(&base, &params)
            .map_err(|e| ScreenError::InvalidParameter(e.to_string()))
    }

    /// Issue a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        timeout: Option<Duration>,
    ) -> Result<T> {
        self.apply_rate_limit().await;

        debug!("Fetching: {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(header::USER_AGENT, self.agents.pick());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScreenError::Network(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScreenError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: Some(Duration::from_secs(60)),
            });
        }

        if !response.status().is_success() {
            return Err(ScreenError::Http {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ScreenError::Parse(e.to_string()))
    }

    /// Return the cached session crumb, acquiring one if needed.
    ///
    /// Failure to obtain a crumb is not an error: the request proceeds without it.
    async fn session_crumb(&self) -> Option<String> {
        let mut crumb = self.crumb.lock().await;
        if crumb.is_none() {
            *crumb = self.fetch_crumb().await;
        }
        crumb.clone()
    }

    async fn fetch_crumb(&self) -> Option<String> {
        let agent = self.agents.pick();

        // The cookie page commonly answers 404 while still setting the session cookie.
        if let Err(e) = self
            .client
            .get(COOKIE_URL)
            .header(header::USER_AGENT, agent)
            .send()
            .await
        {
            debug!(error = %e, "Cookie request failed");
            return None;
        }

        let response = match self
            .client
            .get(CRUMB_URL)
            .header(header::USER_AGENT, agent)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(status = %r.status(), "Crumb request rejected");
                return None;
            }
            Err(e) => {
                debug!(error = %e, "Crumb request failed");
                return None;
            }
        };

        match response.text().await {
            Ok(text) if !text.trim().is_empty() && !text.contains('<') => {
                Some(text.trim().to_string())
            }
            _ => None,
        }
    }

    /// Fetch quote summary data for a symbol.
    async fn fetch_quote_summary(&self, symbol: &Symbol) -> Result<QuoteSummaryResponse> {
        let crumb = self.session_crumb().await;
        let url = self.build_quote_url(symbol, crumb.as_deref())?;

        match self.get_json(url, None).await {
            Err(ScreenError::Http { status, url }) if status == 401 || status == 403 => {
                // Crumb expired or was never accepted; acquire a new one next time.
                *self.crumb.lock().await = None;
                Err(ScreenError::Http { status, url })
            }
            Err(ScreenError::Http { status: 404, .. }) => {
                Err(ScreenError::SymbolNotFound(symbol.to_string()))
            }
            other => other,
        }
    }
}

impl Provider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Yahoo Finance ticker lookup and quote metrics"
    }
}

#[async_trait]
impl SymbolSearch for YahooProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let url = self.build_search_url(query)?;
        let response: SearchResponse = self.get_json(url, Some(self.lookup_timeout)).await?;
        Ok(parse_search_response(response))
    }
}

#[async_trait]
impl QuoteSource for YahooProvider {
    async fn quote(&self, symbol: &Symbol) -> Result<QuoteSnapshot> {
        let summary = self.fetch_quote_summary(symbol).await?;
        parse_quote_summary(symbol, summary)
    }
}

/// Convert a search response into candidates, dropping entries without a symbol.
fn parse_search_response(response: SearchResponse) -> Vec<SearchCandidate> {
    response
        .quotes
        .into_iter()
        .filter_map(|q| {
            let symbol = q.symbol.filter(|s| !s.trim().is_empty())?;
            let instrument = q
                .quote_type
                .as_deref()
                .map_or_else(|| InstrumentType::Other(String::new()), InstrumentType::from_tag);
            Some(SearchCandidate {
                symbol: Symbol::new(symbol),
                instrument,
                name: q.shortname.or(q.longname),
                exchange: q.exchange,
            })
        })
        .collect()
}

/// Convert a quote summary response into a snapshot.
///
/// Each field is copied independently; missing modules leave fields empty.
fn parse_quote_summary(symbol: &Symbol, response: QuoteSummaryResponse) -> Result<QuoteSnapshot> {
    if let Some(error) = response.quote_summary.error {
        if error.code == "Not Found" {
            return Err(ScreenError::SymbolNotFound(symbol.to_string()));
        }
        return Err(ScreenError::Other(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    let data = response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ScreenError::SymbolNotFound(symbol.to_string()))?;

    let price = data.price.unwrap_or_default();
    let profile = data
        .summary_profile
        .or(data.asset_profile)
        .unwrap_or_default();
    let detail = data.summary_detail.unwrap_or_default();
    let financial = data.financial_data.unwrap_or_default();

    Ok(QuoteSnapshot {
        short_name: price.short_name.filter(|n| !n.trim().is_empty()),
        sector: profile.sector.filter(|s| !s.is_empty()),
        industry: profile.industry.filter(|s| !s.is_empty()),
        price: financial
            .current_price
            .and_then(|v| v.value())
            .or_else(|| price.regular_market_price.and_then(|v| v.value())),
        market_cap: price
            .market_cap
            .and_then(|v| v.value())
            .or_else(|| detail.market_cap.and_then(|v| v.value())),
        trailing_pe: detail.trailing_pe.and_then(|v| v.value()),
    })
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

/// Search API response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuote {
    symbol: Option<String>,
    quote_type: Option<String>,
    shortname: Option<String>,
    longname: Option<String>,
    exchange: Option<String>,
}

/// Quote Summary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryData>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryData {
    price: Option<PriceModule>,
    summary_profile: Option<Profile>,
    asset_profile: Option<Profile>,
    summary_detail: Option<SummaryDetail>,
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<String>,
    regular_market_price: Option<Numeric>,
    market_cap: Option<Numeric>,
}

#[derive(Debug, Default, Deserialize)]
struct Profile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<Numeric>,
    market_cap: Option<Numeric>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    current_price: Option<Numeric>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`, sometimes as `{}` or a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Plain(f64),
    Wrapped {
        #[serde(default)]
        raw: Option<f64>,
    },
    Other(serde_json::Value),
}

impl Numeric {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Plain(v) => Some(*v),
            Self::Wrapped { raw } => *raw,
            Self::Other(_) => None,
        }
        .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YahooProvider {
        YahooProvider::new().unwrap()
    }

    #[test]
    fn test_build_search_url_encodes_query() {
        let url = provider().build_search_url("Procter & Gamble").unwrap();

        assert!(url.as_str().starts_with(SEARCH_API_URL));
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some("Procter & Gamble"));
    }

    #[test]
    fn test_build_quote_url() {
        let symbol = Symbol::new("hd");
        let url = provider().build_quote_url(&symbol, Some("abc")).unwrap();

        assert!(url.path().ends_with("/HD"));
        assert!(url.as_str().contains("modules="));
        assert!(url.as_str().contains("crumb=abc"));

        let url = provider().build_quote_url(&symbol, None).unwrap();
        assert!(!url.as_str().contains("crumb"));
    }

    #[test]
    fn test_parse_search_response() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "quotes": [
                    {"symbol": "^DJI", "quoteType": "INDEX", "shortname": "Dow Jones"},
                    {"quoteType": "EQUITY"},
                    {"symbol": "MCD", "quoteType": "EQUITY", "shortname": "McDonald's Corporation", "exchange": "NYQ"},
                    {"symbol": "MCD.MX", "quoteType": "EQUITY"}
                ],
                "news": []
            }"#,
        )
        .unwrap();

        let candidates = parse_search_response(response);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].instrument, InstrumentType::Index);
        assert_eq!(candidates[1].symbol.as_str(), "MCD");
        assert!(candidates[1].instrument.is_equity());
        assert_eq!(candidates[1].name.as_deref(), Some("McDonald's Corporation"));
        assert_eq!(candidates[1].exchange.as_deref(), Some("NYQ"));
    }

    #[test]
    fn test_parse_search_response_without_quotes() {
        let response: SearchResponse = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(parse_search_response(response).is_empty());
    }

    #[test]
    fn test_parse_quote_summary_full() {
        let response: QuoteSummaryResponse = serde_json::from_str(
            r#"{
                "quoteSummary": {
                    "result": [{
                        "price": {
                            "shortName": "Apple Inc.",
                            "regularMarketPrice": {"raw": 190.5, "fmt": "190.50"},
                            "marketCap": {"raw": 2950000000000, "fmt": "2.95T"}
                        },
                        "summaryProfile": {"sector": "Technology", "industry": "Consumer Electronics"},
                        "summaryDetail": {"trailingPE": {"raw": 29.4, "fmt": "29.40"}},
                        "financialData": {"currentPrice": {"raw": 191.0, "fmt": "191.00"}}
                    }],
                    "error": null
                }
            }"#,
        )
        .unwrap();

        let snapshot = parse_quote_summary(&Symbol::new("AAPL"), response).unwrap();

        assert_eq!(snapshot.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(snapshot.sector.as_deref(), Some("Technology"));
        assert_eq!(snapshot.industry.as_deref(), Some("Consumer Electronics"));
        assert_eq!(snapshot.price, Some(191.0));
        assert_eq!(snapshot.market_cap, Some(2_950_000_000_000.0));
        assert_eq!(snapshot.trailing_pe, Some(29.4));
    }

    #[test]
    fn test_parse_quote_summary_partial() {
        let response: QuoteSummaryResponse = serde_json::from_str(
            r#"{
                "quoteSummary": {
                    "result": [{
                        "price": {"shortName": "Acme", "regularMarketPrice": {"raw": 12.0}},
                        "assetProfile": {"sector": "Industrials"},
                        "summaryDetail": {"trailingPE": {}, "marketCap": {"raw": 5000000}}
                    }]
                }
            }"#,
        )
        .unwrap();

        let snapshot = parse_quote_summary(&Symbol::new("ACME"), response).unwrap();

        assert_eq!(snapshot.short_name.as_deref(), Some("Acme"));
        assert_eq!(snapshot.sector.as_deref(), Some("Industrials"));
        assert_eq!(snapshot.industry, None);
        assert_eq!(snapshot.price, Some(12.0));
        assert_eq!(snapshot.market_cap, Some(5_000_000.0));
        assert_eq!(snapshot.trailing_pe, None);
    }

    #[test]
    fn test_parse_quote_summary_not_found() {
        let response: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found", "description": "Quote not found for symbol: ZZZZ"}}}"#,
        )
        .unwrap();

        let err = parse_quote_summary(&Symbol::new("ZZZZ"), response).unwrap_err();
        assert!(matches!(err, ScreenError::SymbolNotFound(s) if s == "ZZZZ"));
    }

    #[test]
    fn test_parse_quote_summary_empty_result() {
        let response: QuoteSummaryResponse =
            serde_json::from_str(r#"{"quoteSummary": {"result": []}}"#).unwrap();
        assert!(parse_quote_summary(&Symbol::new("X"), response).is_err());
    }

    #[test]
    fn test_provider_info() {
        let provider = provider();
        assert_eq!(provider.name(), "Yahoo Finance");
        assert!(!provider.description().is_empty());
    }
}
