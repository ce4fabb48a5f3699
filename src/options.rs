//! Configuration options for the dashboard.
//!
//! [`DashboardOptions`] doubles as the clap argument surface of the `tkd`
//! binary (behind the `cli` feature) and as a builder for library and test
//! use.

use std::time::Duration;

use derive_builder::Builder;

use crate::api::{Frequency, Period, RiskProfile, RunSettings};

/// Default ticker search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "http://127.0.0.1:5000/api/search";
/// Default analysis run endpoint.
pub const DEFAULT_RUN_ENDPOINT: &str = "http://127.0.0.1:5000/api/run";

/// tkd - ticker analysis dashboard in your terminal
///
/// Type to search for a ticker, pick a suggestion, run the analysis.
#[derive(Debug, Clone, Builder)]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "tkd", args_override_self = true, version, about)
)]
pub struct DashboardOptions {
    /// Ticker search endpoint
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = DEFAULT_SEARCH_ENDPOINT, help_heading = "Endpoints")
    )]
    pub search_endpoint: String,

    /// Analysis run endpoint
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = DEFAULT_RUN_ENDPOINT, help_heading = "Endpoints")
    )]
    pub run_endpoint: String,

    /// Risk profile sent with every run
    #[cfg_attr(
        feature = "cli",
        arg(long, value_enum, default_value = "moderate", help_heading = "Run")
    )]
    pub risk: RiskProfile,

    /// History window for the returns chart
    #[cfg_attr(
        feature = "cli",
        arg(long, value_enum, default_value = "5y", help_heading = "Run")
    )]
    pub period: Period,

    /// Aggregation frequency for the returns chart
    #[cfg_attr(
        feature = "cli",
        arg(long, value_enum, default_value = "Y", help_heading = "Run")
    )]
    pub freq: Frequency,

    /// Minimum query length before a search is issued
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "2", help_heading = "Search")
    )]
    pub min_query_length: usize,

    /// Settle delay between keystroke and search call, in milliseconds
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "110", help_heading = "Search")
    )]
    pub debounce_ms: u64,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            search_endpoint: String::from(DEFAULT_SEARCH_ENDPOINT),
            run_endpoint: String::from(DEFAULT_RUN_ENDPOINT),
            risk: RiskProfile::default(),
            period: Period::default(),
            freq: Frequency::default(),
            min_query_length: crate::search::DEFAULT_MIN_QUERY_CHARS,
            debounce_ms: crate::search::DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl DashboardOptions {
    /// The debounce settle delay.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The run knobs as a value the run controller takes at trigger time.
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            risk: self.risk,
            period: self.period,
            freq: self.freq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_falls_back_to_defaults() {
        let options = DashboardOptionsBuilder::default()
            .debounce_ms(5u64)
            .build()
            .unwrap();
        assert_eq!(options.debounce(), Duration::from_millis(5));
        assert_eq!(options.min_query_length, 2);
        assert_eq!(options.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
    }

    #[test]
    fn run_settings_mirror_the_knobs() {
        let options = DashboardOptionsBuilder::default()
            .risk(RiskProfile::Aggressive)
            .freq(Frequency::Monthly)
            .build()
            .unwrap();
        let settings = options.run_settings();
        assert_eq!(settings.risk, RiskProfile::Aggressive);
        assert_eq!(settings.period, Period::FiveYears);
        assert_eq!(settings.freq, Frequency::Monthly);
    }
}
