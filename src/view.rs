//! The rendering collaborator surface and its text helpers.
//!
//! Controllers never touch a screen directly; they speak to a
//! [`DashboardView`] and the view decides how things look. The crate ships
//! a terminal implementation in [`crate::term`]; tests substitute a
//! recording double.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{SearchResultItem, StatValue, StatsMap};
use crate::selection::Pick;

/// Shared handle to the view, cloneable into controller tasks.
pub type SharedView = Rc<RefCell<dyn DashboardView>>;

/// Severity of the status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Neutral progress or acknowledgement.
    Info,
    /// A run finished and its report is on screen.
    Success,
    /// A failure the user should read.
    Error,
}

/// Target of a text-block render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPanel {
    /// Analyst summary.
    Summary,
    /// Strategist plan.
    Strategy,
}

/// Target of a chart update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    /// Trader simulation chart.
    Trader,
    /// Returns chart; shows a dedicated "no data" notice when absent.
    Returns,
}

/// Display state of the run trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// No selection; the trigger cannot fire.
    Disabled,
    /// Armed.
    Ready,
    /// A run is in flight.
    Busy,
}

/// One update of the suggestion list panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListUpdate<'a> {
    /// Show these suggestions.
    Items(&'a [SearchResultItem]),
    /// Show a single muted notice line.
    Notice(&'a str),
    /// Empty the list and hide it.
    Hidden,
}

/// Muted placeholder for an absent or empty text block.
pub const NO_OUTPUT_NOTICE: &str = "No output provided.";
/// Muted placeholder for absent or unstructured stats.
pub const NO_STATS_NOTICE: &str = "No stats available.";
/// Placeholder shown in the returns chart slot when no URL came back.
pub const NO_RETURNS_NOTICE: &str = "No returns data available.";

/// What the controllers need from the rendering layer.
///
/// Implementations are plain state + paint; all coordination (debouncing,
/// staleness, single-flight) happens before a method here is called.
pub trait DashboardView {
    /// Shows the status banner.
    fn set_status(&mut self, kind: StatusKind, message: &str);

    /// Updates the suggestion list.
    fn render_list(&mut self, update: ListUpdate<'_>);

    /// Renders a text block; `None` or effectively empty text shows
    /// [`NO_OUTPUT_NOTICE`].
    fn render_text(&mut self, panel: TextPanel, text: Option<&str>);

    /// Renders the stats table; `None` shows [`NO_STATS_NOTICE`].
    fn render_stats(&mut self, stats: Option<&StatsMap>);

    /// Shows or hides a chart slot.
    fn show_chart(&mut self, slot: ChartSlot, url: Option<&str>);

    /// Shows or hides the whole results panel.
    fn set_results_visible(&mut self, visible: bool);

    /// Reflects the current selection (label display).
    fn selection_changed(&mut self, pick: Option<&Pick>);

    /// Reflects the run trigger state.
    fn run_trigger(&mut self, state: TriggerState);
}

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Splits text into paragraphs of lines.
///
/// Paragraphs are separated by one or more blank lines; single newlines are
/// line breaks within a paragraph. Leading and trailing whitespace around
/// the whole text is dropped. Empty input yields no paragraphs.
pub fn paragraphs(text: &str) -> Vec<Vec<&str>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    PARAGRAPH_BREAK
        .split(trimmed)
        .map(|paragraph| paragraph.split('\n').collect())
        .collect()
}

/// Formats one stat value for display: numbers get fixed four decimal
/// places, strings pass through, anything else shows as its JSON text.
pub fn format_stat(value: &StatValue) -> String {
    match value {
        StatValue::Number(n) => format!("{n:.4}"),
        StatValue::Text(s) => s.clone(),
        StatValue::Other(v) => v.to_string(),
    }
}
