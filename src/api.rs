//! Wire types and the remote endpoint client.
//!
//! Two endpoints back the dashboard: `GET <search>?q=<query>` returning a
//! JSON array of suggestions, and `POST <run>` returning the analysis
//! report. [`HttpApi`] is the reqwest implementation; [`ApiBackend`] is the
//! seam that lets the controllers run against a test double.
//!
//! Payload handling is deliberately tolerant: a non-array search payload
//! coerces to no suggestions, malformed array entries are skipped, and a
//! stats field that is not an object degrades to "no stats" instead of
//! failing the whole report.

use indexmap::IndexMap;
use reqwest::Url;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::options::DashboardOptions;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("tickerdesk/", env!("CARGO_PKG_VERSION"));

/// One ticker suggestion as returned by the search endpoint.
///
/// Identity is `symbol`; `logo`, when present, is an already-encoded data
/// URL the client treats as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Exchange symbol, e.g. `AAPL`.
    pub symbol: String,
    /// Display label, e.g. `Apple Inc. (AAPL) - 189.30 USD`.
    pub label: String,
    /// Optional logo data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Investor risk tolerance sent with a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RiskProfile {
    /// Capital preservation first.
    Conservative,
    /// Balanced risk and return.
    #[default]
    Moderate,
    /// Growth over drawdown protection.
    Aggressive,
}

/// History window for the returns chart, in yfinance period spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Period {
    /// One year of history.
    #[serde(rename = "1y")]
    #[cfg_attr(feature = "cli", value(name = "1y"))]
    OneYear,
    /// Two years of history.
    #[serde(rename = "2y")]
    #[cfg_attr(feature = "cli", value(name = "2y"))]
    TwoYears,
    /// Five years of history.
    #[default]
    #[serde(rename = "5y")]
    #[cfg_attr(feature = "cli", value(name = "5y"))]
    FiveYears,
    /// Ten years of history.
    #[serde(rename = "10y")]
    #[cfg_attr(feature = "cli", value(name = "10y"))]
    TenYears,
    /// All available history.
    #[serde(rename = "max")]
    #[cfg_attr(feature = "cli", value(name = "max"))]
    Max,
}

/// Aggregation frequency for the returns chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Frequency {
    /// Yearly returns.
    #[default]
    #[serde(rename = "Y")]
    #[cfg_attr(feature = "cli", value(name = "Y"))]
    Yearly,
    /// Quarterly returns.
    #[serde(rename = "Q")]
    #[cfg_attr(feature = "cli", value(name = "Q"))]
    Quarterly,
    /// Monthly returns.
    #[serde(rename = "M")]
    #[cfg_attr(feature = "cli", value(name = "M"))]
    Monthly,
}

/// The three discrete run knobs, read at trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSettings {
    /// Risk tolerance.
    pub risk: RiskProfile,
    /// Returns history window.
    pub period: Period,
    /// Returns aggregation frequency.
    pub freq: Frequency,
}

/// Body of a `POST <run>` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    /// Selected exchange symbol.
    pub ticker: String,
    /// Risk tolerance.
    pub risk: RiskProfile,
    /// Returns history window.
    pub period: Period,
    /// Returns aggregation frequency.
    pub freq: Frequency,
}

impl RunRequest {
    /// Builds the request for a selected `ticker` under `settings`.
    pub fn new(ticker: impl Into<String>, settings: RunSettings) -> Self {
        Self {
            ticker: ticker.into(),
            risk: settings.risk,
            period: settings.period,
            freq: settings.freq,
        }
    }
}

/// One value of the trader stats table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Numeric stat, displayed with fixed four decimal places.
    Number(f64),
    /// Textual stat, displayed verbatim.
    Text(String),
    /// Anything else the server sent; displayed as its JSON text.
    Other(Value),
}

/// Ordered stats table; iteration order is the server's key order.
pub type StatsMap = IndexMap<String, StatValue>;

/// Stats field as found on the wire: either a proper table or junk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum LenientStats {
    Table(StatsMap),
    Invalid(Value),
}

/// Result of a completed analysis run.
///
/// Field spellings follow the run endpoint's JSON; every field is optional
/// and absent fields render as placeholders rather than failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunReport {
    /// Analyst summary text; blank-line-separated paragraphs.
    pub summary: Option<String>,
    /// Strategist plan text; same layout as `summary`.
    pub strategy: Option<String>,
    #[serde(rename = "traderStats")]
    trader_stats: Option<LenientStats>,
    /// Trader simulation chart URL.
    #[serde(rename = "traderChart")]
    pub trader_chart: Option<String>,
    /// Returns chart URL.
    #[serde(rename = "returnsChart")]
    pub returns_chart: Option<String>,
}

impl RunReport {
    /// The stats table, if the server sent a structured mapping.
    pub fn stats(&self) -> Option<&StatsMap> {
        match &self.trader_stats {
            Some(LenientStats::Table(table)) => Some(table),
            _ => None,
        }
    }
}

/// The remote operations the controllers depend on.
///
/// Both calls take a [`CancellationToken`]; once it fires the call settles
/// with [`ApiError::Cancelled`] and must have no further effect.
#[allow(async_fn_in_trait)]
pub trait ApiBackend {
    /// Looks up ticker suggestions for `query`.
    async fn search(
        &self,
        query: &str,
        token: CancellationToken,
    ) -> Result<Vec<SearchResultItem>, ApiError>;

    /// Submits one analysis run.
    async fn run(&self, request: &RunRequest, token: CancellationToken)
    -> Result<RunReport, ApiError>;
}

/// reqwest-backed [`ApiBackend`].
///
/// One pooled client per session; no per-request timeout beyond what the
/// caller's cancellation token imposes.
#[derive(Debug)]
pub struct HttpApi {
    http: reqwest::Client,
    search_endpoint: Url,
    run_endpoint: Url,
}

impl HttpApi {
    /// Builds the client for the endpoints in `options`.
    pub fn new(options: &DashboardOptions) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            search_endpoint: parse_endpoint(&options.search_endpoint)?,
            run_endpoint: parse_endpoint(&options.run_endpoint)?,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|e| ApiError::InvalidEndpoint(format!("{raw}: {e}")))
}

impl ApiBackend for HttpApi {
    async fn search(
        &self,
        query: &str,
        token: CancellationToken,
    ) -> Result<Vec<SearchResultItem>, ApiError> {
        let request = self
            .http
            .get(self.search_endpoint.clone())
            .query(&[("q", query)])
            .header(ACCEPT, "application/json");

        let work = async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::Endpoint {
                    status: status.as_u16(),
                    message: format!("Search failed ({})", status.as_u16()),
                });
            }
            let payload: Value = response
                .json()
                .await
                .map_err(|e| ApiError::Malformed(e.to_string()))?;
            Ok(parse_search_payload(payload))
        };

        tokio::select! {
            _ = token.cancelled() => Err(ApiError::Cancelled),
            result = work => result,
        }
    }

    async fn run(
        &self,
        request: &RunRequest,
        token: CancellationToken,
    ) -> Result<RunReport, ApiError> {
        let request = self
            .http
            .post(self.run_endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(request);

        let work = async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body: Value = response
                    .json()
                    .await
                    .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
                return Err(ApiError::Endpoint {
                    status: status.as_u16(),
                    message: endpoint_error_message(status.as_u16(), &body),
                });
            }
            response
                .json::<RunReport>()
                .await
                .map_err(|e| ApiError::Malformed(e.to_string()))
        };

        tokio::select! {
            _ = token.cancelled() => Err(ApiError::Cancelled),
            result = work => result,
        }
    }
}

/// Coerces a search payload into suggestions.
///
/// Non-array payloads yield no suggestions; entries that don't deserialize
/// are skipped.
pub fn parse_search_payload(payload: Value) -> Vec<SearchResultItem> {
    match payload {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Extracts the user-facing message from a non-2xx run response body.
///
/// Prefers a non-empty server-supplied `error` field, otherwise a generic
/// message carrying the status.
pub fn endpoint_error_message(status: u16, body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Request failed ({status})"))
}
