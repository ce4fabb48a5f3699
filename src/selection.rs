//! The currently chosen search result.

/// A picked suggestion: the symbol the run targets and the label shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    /// Exchange symbol.
    pub symbol: String,
    /// Display label.
    pub label: String,
}

/// The selection gate for the run action.
///
/// Set only by an explicit pick; cleared when the query text diverges from
/// the picked label. The run controller refuses to start without it.
#[derive(Debug, Default)]
pub struct Selection {
    current: Option<Pick>,
}

impl Selection {
    /// Selects a suggestion.
    pub fn select(&mut self, symbol: impl Into<String>, label: impl Into<String>) {
        self.current = Some(Pick {
            symbol: symbol.into(),
            label: label.into(),
        });
    }

    /// Clears the selection; returns whether one was set.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// The current pick, if any.
    pub fn current(&self) -> Option<&Pick> {
        self.current.as_ref()
    }

    /// The picked label, if any.
    pub fn label(&self) -> Option<&str> {
        self.current.as_ref().map(|pick| pick.label.as_str())
    }

    /// Whether a suggestion is picked.
    pub fn is_some(&self) -> bool {
        self.current.is_some()
    }
}
