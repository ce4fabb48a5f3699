//! Plain-terminal implementation of the rendering collaborator.
//!
//! No widget framework: the whole frame is rebuilt as a list of toned lines
//! and repainted on every change. The view also keeps the last suggestion
//! list and a highlight row so the event loop can drive Up/Down/Enter.

use std::io::{self, Write};

use crossterm::cursor::{MoveTo, Show};
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use crate::api::{SearchResultItem, StatsMap};
use crate::selection::Pick;
use crate::view::{
    ChartSlot, DashboardView, ListUpdate, NO_OUTPUT_NOTICE, NO_RETURNS_NOTICE, NO_STATS_NOTICE,
    StatusKind, TextPanel, TriggerState, format_stat, paragraphs,
};

const HINT_BAR: &str = "tkd · type to search · ↑/↓ choose · Enter pick · Ctrl-R run · Esc hide · Ctrl-C quit";
const CHART_URL_WIDTH: usize = 60;

/// Rendering tone of one frame line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Regular text.
    Normal,
    /// De-emphasized notices.
    Muted,
    /// Section headers.
    Header,
    /// The highlighted suggestion row.
    Highlight,
    /// Informational status.
    Info,
    /// Success status.
    Success,
    /// Error status.
    Error,
}

/// One line of the painted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Rendering tone.
    pub tone: Tone,
    /// Line text.
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Terminal dashboard view.
#[derive(Debug, Default)]
pub struct TermView {
    status: Option<(StatusKind, String)>,
    query: String,
    cursor: usize,
    items: Vec<SearchResultItem>,
    notice: Option<String>,
    list_visible: bool,
    highlight: usize,
    pick: Option<Pick>,
    trigger: Option<TriggerState>,
    results_visible: bool,
    summary: Option<String>,
    strategy: Option<String>,
    stats: Option<StatsMap>,
    trader_chart: Option<String>,
    returns_chart: Option<String>,
}

impl TermView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the query line and repaints.
    pub fn set_query(&mut self, value: &str, cursor: usize) {
        self.query = value.to_string();
        self.cursor = cursor;
        self.repaint();
    }

    /// Moves the suggestion highlight, re-showing a hidden list.
    pub fn move_highlight(&mut self, delta: i32) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        let next = self.highlight as i64 + delta as i64;
        self.highlight = next.clamp(0, last as i64) as usize;
        self.list_visible = true;
        self.repaint();
    }

    /// The currently highlighted suggestion, if the list is on screen.
    pub fn highlighted(&self) -> Option<SearchResultItem> {
        if !self.list_visible {
            return None;
        }
        self.items.get(self.highlight).cloned()
    }

    /// Hides the list without emptying it.
    pub fn hide_list(&mut self) {
        self.list_visible = false;
        self.repaint();
    }

    /// Whether the suggestion list is on screen.
    pub fn list_visible(&self) -> bool {
        self.list_visible
    }

    /// The frame as toned lines; what `paint` writes out.
    pub fn frame_lines(&self) -> Vec<Line> {
        let mut lines = vec![
            Line::new(Tone::Muted, HINT_BAR),
            Line::new(Tone::Normal, format!("> {}", self.query)),
        ];

        match &self.status {
            Some((kind, message)) => {
                let tone = match kind {
                    StatusKind::Info => Tone::Info,
                    StatusKind::Success => Tone::Success,
                    StatusKind::Error => Tone::Error,
                };
                lines.push(Line::new(tone, message.clone()));
            }
            None => lines.push(Line::new(Tone::Normal, "")),
        }

        let selected = match &self.pick {
            Some(pick) => format!("Selected: {}", pick.label),
            None => String::new(),
        };
        lines.push(Line::new(Tone::Normal, selected));
        let trigger = match self.trigger {
            None | Some(TriggerState::Disabled) => "Run: pick a ticker to enable",
            Some(TriggerState::Ready) => "Run: press Ctrl-R",
            Some(TriggerState::Busy) => "Run: running…",
        };
        lines.push(Line::new(Tone::Muted, trigger));
        lines.push(Line::new(Tone::Normal, ""));

        if self.list_visible {
            if let Some(notice) = &self.notice {
                lines.push(Line::new(Tone::Muted, notice.clone()));
            }
            for (row, item) in self.items.iter().enumerate() {
                if row == self.highlight {
                    lines.push(Line::new(Tone::Highlight, format!("> {}", item.label)));
                } else {
                    lines.push(Line::new(Tone::Normal, format!("  {}", item.label)));
                }
            }
        }

        if self.results_visible {
            lines.push(Line::new(Tone::Normal, ""));
            self.push_text_block(&mut lines, "Analyst summary", self.summary.as_deref());
            self.push_text_block(&mut lines, "Strategist plan", self.strategy.as_deref());
            self.push_stats(&mut lines);
            self.push_charts(&mut lines);
        }

        lines
    }

    /// Repaints the frame to stdout.
    pub fn paint(&self) -> io::Result<()> {
        let mut out = io::stdout();
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        for (row, line) in self.frame_lines().iter().enumerate() {
            queue!(out, MoveTo(0, row as u16))?;
            match line.tone {
                Tone::Normal => queue!(out, ResetColor)?,
                Tone::Muted => queue!(out, SetForegroundColor(Color::DarkGrey))?,
                Tone::Header => queue!(out, SetForegroundColor(Color::Yellow))?,
                Tone::Highlight => queue!(out, SetForegroundColor(Color::Cyan))?,
                Tone::Info => queue!(out, SetForegroundColor(Color::Blue))?,
                Tone::Success => queue!(out, SetForegroundColor(Color::Green))?,
                Tone::Error => queue!(out, SetForegroundColor(Color::Red))?,
            }
            write!(out, "{}", line.text)?;
        }
        // Leave the terminal cursor in the query line.
        let col = 2 + self.query.chars().take(self.cursor).count() as u16;
        queue!(out, ResetColor, MoveTo(col, 1), Show)?;
        out.flush()
    }

    fn repaint(&self) {
        if let Err(err) = self.paint() {
            warn!("terminal paint failed: {err}");
        }
    }

    fn push_text_block(&self, lines: &mut Vec<Line>, title: &str, text: Option<&str>) {
        lines.push(Line::new(Tone::Header, title));
        let paras = text.map(paragraphs).unwrap_or_default();
        if paras.is_empty() {
            lines.push(Line::new(Tone::Muted, NO_OUTPUT_NOTICE));
        } else {
            for (i, para) in paras.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::new(Tone::Normal, ""));
                }
                for line in para {
                    lines.push(Line::new(Tone::Normal, format!("  {line}")));
                }
            }
        }
        lines.push(Line::new(Tone::Normal, ""));
    }

    fn push_stats(&self, lines: &mut Vec<Line>) {
        lines.push(Line::new(Tone::Header, "Trader stats"));
        match &self.stats {
            Some(stats) => {
                for (label, value) in stats {
                    lines.push(Line::new(
                        Tone::Normal,
                        format!("  {label:<24} {}", format_stat(value)),
                    ));
                }
            }
            None => lines.push(Line::new(Tone::Muted, NO_STATS_NOTICE)),
        }
        lines.push(Line::new(Tone::Normal, ""));
    }

    fn push_charts(&self, lines: &mut Vec<Line>) {
        if let Some(url) = &self.trader_chart {
            lines.push(Line::new(
                Tone::Normal,
                format!("Trader chart: {}", truncate_url(url)),
            ));
        }
        match &self.returns_chart {
            Some(url) => lines.push(Line::new(
                Tone::Normal,
                format!("Returns chart: {}", truncate_url(url)),
            )),
            None => lines.push(Line::new(Tone::Muted, NO_RETURNS_NOTICE)),
        }
    }
}

impl DashboardView for TermView {
    fn set_status(&mut self, kind: StatusKind, message: &str) {
        self.status = Some((kind, message.to_string()));
        self.repaint();
    }

    fn render_list(&mut self, update: ListUpdate<'_>) {
        match update {
            ListUpdate::Items(items) => {
                self.items = items.to_vec();
                self.notice = None;
                self.highlight = 0;
                self.list_visible = true;
            }
            ListUpdate::Notice(notice) => {
                self.items.clear();
                self.notice = Some(notice.to_string());
                self.highlight = 0;
                self.list_visible = true;
            }
            ListUpdate::Hidden => {
                self.items.clear();
                self.notice = None;
                self.highlight = 0;
                self.list_visible = false;
            }
        }
        self.repaint();
    }

    fn render_text(&mut self, panel: TextPanel, text: Option<&str>) {
        let slot = match panel {
            TextPanel::Summary => &mut self.summary,
            TextPanel::Strategy => &mut self.strategy,
        };
        *slot = text.map(str::to_owned);
        self.repaint();
    }

    fn render_stats(&mut self, stats: Option<&StatsMap>) {
        self.stats = stats.cloned();
        self.repaint();
    }

    fn show_chart(&mut self, slot: ChartSlot, url: Option<&str>) {
        let target = match slot {
            ChartSlot::Trader => &mut self.trader_chart,
            ChartSlot::Returns => &mut self.returns_chart,
        };
        *target = url.map(str::to_owned);
        self.repaint();
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.results_visible = visible;
        self.repaint();
    }

    fn selection_changed(&mut self, pick: Option<&Pick>) {
        self.pick = pick.cloned();
        self.repaint();
    }

    fn run_trigger(&mut self, state: TriggerState) {
        self.trigger = Some(state);
        self.repaint();
    }
}

/// Chart URLs are often multi-kilobyte data URLs; keep the frame readable.
fn truncate_url(url: &str) -> String {
    if url.chars().count() <= CHART_URL_WIDTH {
        return url.to_string();
    }
    let head: String = url.chars().take(CHART_URL_WIDTH).collect();
    format!("{head}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(symbol: &str, label: &str) -> SearchResultItem {
        SearchResultItem {
            symbol: symbol.to_string(),
            label: label.to_string(),
            logo: None,
        }
    }

    fn find(lines: &[Line], needle: &str) -> bool {
        lines.iter().any(|l| l.text.contains(needle))
    }

    #[test]
    fn highlight_clamps_and_survives_hide() {
        let mut view = TermView::new();
        view.render_list(ListUpdate::Items(&[
            item("AAPL", "Apple Inc."),
            item("AAP", "Advance Auto Parts"),
        ]));
        view.move_highlight(5);
        assert_eq!(view.highlighted().unwrap().symbol, "AAP");

        view.hide_list();
        assert!(view.highlighted().is_none());

        // Moving the highlight re-shows the preserved list.
        view.move_highlight(-1);
        assert!(view.list_visible());
        assert_eq!(view.highlighted().unwrap().symbol, "AAPL");
    }

    #[test]
    fn hidden_update_empties_the_list() {
        let mut view = TermView::new();
        view.render_list(ListUpdate::Items(&[item("AAPL", "Apple Inc.")]));
        view.render_list(ListUpdate::Hidden);
        view.move_highlight(1);
        assert!(view.highlighted().is_none());
    }

    #[test]
    fn frame_shows_placeholders_for_empty_report() {
        let mut view = TermView::new();
        view.set_results_visible(true);
        view.render_text(TextPanel::Summary, None);
        view.render_text(TextPanel::Strategy, Some("  "));
        view.render_stats(None);
        view.show_chart(ChartSlot::Returns, None);

        let lines = view.frame_lines();
        assert!(find(&lines, NO_OUTPUT_NOTICE));
        assert!(find(&lines, NO_STATS_NOTICE));
        assert!(find(&lines, NO_RETURNS_NOTICE));
    }

    #[test]
    fn frame_splits_summary_into_paragraphs() {
        let mut view = TermView::new();
        view.set_results_visible(true);
        view.render_text(TextPanel::Summary, Some("Buy.\n\nHold steady."));

        let lines = view.frame_lines();
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        let first = texts.iter().position(|t| *t == "  Buy.").unwrap();
        assert_eq!(texts[first + 1], "");
        assert_eq!(texts[first + 2], "  Hold steady.");
    }

    #[test]
    fn long_chart_urls_are_truncated() {
        let long = format!("data:image/png;base64,{}", "a".repeat(500));
        let shown = truncate_url(&long);
        assert!(shown.chars().count() <= CHART_URL_WIDTH + 1);
        assert!(shown.ends_with('…'));
        assert_eq!(truncate_url("http://short"), "http://short");
    }
}
