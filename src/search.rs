//! The debounced search controller.
//!
//! This is the coordination core of the search box. Every input event
//! supersedes whatever was outstanding: the previous flight's token is
//! cancelled unconditionally, and a single new task is scheduled that
//! sleeps out the settle delay before touching the network. A settled
//! response is rendered only if its query is still the latest input, so an
//! older request that resolves after a newer one can never flash stale
//! suggestions, even if its cancellation somehow failed to land.
//!
//! Tasks are spawned on the current [`tokio::task::LocalSet`]; the
//! controller must be driven from within one.

use std::rc::Rc;
use std::time::Duration;

use tokio::task::spawn_local;

use crate::api::{ApiBackend, SearchResultItem};
use crate::options::DashboardOptions;
use crate::session::SharedSession;
use crate::view::{ListUpdate, SharedView, TriggerState};

/// Default settle delay between keystroke and search call.
pub const DEFAULT_DEBOUNCE_MS: u64 = 110;
/// Default minimum query length before a search is issued.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Notice shown while the authoritative fetch is in flight and no cached
/// results are on screen.
pub const SEARCHING_NOTICE: &str = "Searching…";
/// Notice shown when the endpoint answered with no suggestions.
pub const NO_MATCHES_NOTICE: &str = "No matches found.";
/// Notice shown when the search call failed.
pub const UNAVAILABLE_NOTICE: &str = "Search is unavailable right now.";

/// Coordinates the search box against the search endpoint.
pub struct SearchController<A: ApiBackend + 'static> {
    session: SharedSession,
    api: Rc<A>,
    view: SharedView,
    debounce: Duration,
    min_query_chars: usize,
}

impl<A: ApiBackend + 'static> SearchController<A> {
    /// Creates the controller over shared session state and a view.
    pub fn new(
        session: SharedSession,
        api: Rc<A>,
        view: SharedView,
        options: &DashboardOptions,
    ) -> Self {
        Self {
            session,
            api,
            view,
            debounce: options.debounce(),
            min_query_chars: options.min_query_length,
        }
    }

    /// Handles one input event with the full current text of the search box.
    pub fn on_input(&self, raw: &str) {
        let query = raw.trim().to_string();
        let key = query.to_lowercase();

        let selection_cleared = {
            let mut session = self.session.borrow_mut();
            session.set_current_query(&key);
            session.clear_just_picked();
            let diverged = session.selection.label() != Some(query.as_str());
            let cleared = diverged && session.selection.clear();
            // Supersede the previous flight even if no new one will start.
            session.cancel_search();
            cleared
        };
        if selection_cleared {
            let mut view = self.view.borrow_mut();
            view.selection_changed(None);
            view.run_trigger(TriggerState::Disabled);
        }

        if query.chars().count() < self.min_query_chars {
            let mut view = self.view.borrow_mut();
            if query.is_empty() {
                view.render_list(ListUpdate::Hidden);
            } else {
                let hint = format!(
                    "Keep typing to see matches ({}+ characters).",
                    self.min_query_chars
                );
                view.render_list(ListUpdate::Notice(&hint));
            }
            return;
        }

        let cached: Option<Vec<SearchResultItem>> = self
            .session
            .borrow()
            .cache
            .lookup(&key)
            .map(|results| results.to_vec());
        if let Some(results) = &cached {
            // Provisional render; the fetch below supersedes it.
            render_results(&self.view, results);
        }

        let (flight_id, token) = self.session.borrow_mut().begin_search();
        let had_cache = cached.is_some();
        let session = self.session.clone();
        let api = Rc::clone(&self.api);
        let view = Rc::clone(&self.view);
        let debounce = self.debounce;

        spawn_local(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }
            if !had_cache {
                view.borrow_mut().render_list(ListUpdate::Notice(SEARCHING_NOTICE));
            }

            match api.search(&query, token.clone()).await {
                // Superseded mid-flight; a newer input owns the screen.
                Err(err) if err.is_cancelled() => {}
                Ok(results) => {
                    if session.borrow().is_current_query(&key) {
                        session.borrow_mut().cache.put(key, results.clone());
                        render_results(&view, &results);
                    } else {
                        debug!("discarding stale search response for {query:?}");
                    }
                }
                Err(err) => {
                    error!("ticker search failed: {err}");
                    view.borrow_mut().render_list(ListUpdate::Notice(UNAVAILABLE_NOTICE));
                }
            }

            session.borrow_mut().finish_search(flight_id);
        });
    }

    /// Handles an explicit suggestion pick: sets the selection, arms the run
    /// trigger, and empties the list.
    pub fn pick(&self, item: &SearchResultItem) {
        {
            let mut session = self.session.borrow_mut();
            session.selection.select(&item.symbol, &item.label);
            session.mark_just_picked();
        }
        let pick = self.session.borrow().selection.current().cloned();
        let mut view = self.view.borrow_mut();
        view.selection_changed(pick.as_ref());
        view.run_trigger(TriggerState::Ready);
        view.render_list(ListUpdate::Hidden);
    }
}

fn render_results(view: &SharedView, results: &[SearchResultItem]) {
    let mut view = view.borrow_mut();
    if results.is_empty() {
        view.render_list(ListUpdate::Notice(NO_MATCHES_NOTICE));
    } else {
        view.render_list(ListUpdate::Items(results));
    }
}
