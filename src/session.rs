//! Session-scoped state shared by the controllers.
//!
//! One [`Session`] lives for the page session and replaces what the
//! browser original kept in module-level globals: the search cache, the
//! selection, the current-query staleness marker, and the two in-flight
//! handles. Everything runs on one local task set, so the shared handle is
//! an `Rc<RefCell<_>>` and borrows are always transient.

use std::cell::RefCell;
use std::rc::Rc;

use tokio_util::sync::CancellationToken;

use crate::cache::SearchCache;
use crate::selection::Selection;

/// Shared handle to the session state.
pub type SharedSession = Rc<RefCell<Session>>;

/// Handle to one in-flight operation.
///
/// Killing it cancels the operation's token; the task observes the token at
/// its next suspension point and settles as cancelled. Dropping the handle
/// kills it.
#[derive(Debug)]
pub struct Flight {
    id: u64,
    token: CancellationToken,
}

impl Flight {
    fn new(id: u64) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
        }
    }

    /// The token to pass into the operation's awaits.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancels the operation.
    pub fn kill(&self) {
        self.token.cancel();
    }
}

impl Drop for Flight {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Mutable state owned by the dashboard session.
#[derive(Debug)]
pub struct Session {
    /// Memo of prior search results.
    pub cache: SearchCache,
    /// The picked suggestion gating the run action.
    pub selection: Selection,
    current_query: String,
    just_picked: bool,
    search_flight: Option<Flight>,
    run_flight: Option<Flight>,
    next_flight_id: u64,
}

impl Session {
    /// Creates a session whose cache prefix scan stops at `min_query_chars`.
    pub fn new(min_query_chars: usize) -> Self {
        Self {
            cache: SearchCache::new(min_query_chars),
            selection: Selection::default(),
            current_query: String::new(),
            just_picked: false,
            search_flight: None,
            run_flight: None,
            next_flight_id: 0,
        }
    }

    /// Convenience constructor for the shared handle.
    pub fn shared(min_query_chars: usize) -> SharedSession {
        Rc::new(RefCell::new(Self::new(min_query_chars)))
    }

    /// Records the normalized text of the latest input event.
    pub fn set_current_query(&mut self, key: &str) {
        self.current_query = key.to_string();
    }

    /// Whether `key` is still the latest input; the staleness check for a
    /// settled search response.
    pub fn is_current_query(&self, key: &str) -> bool {
        self.current_query == key
    }

    /// Cancels the in-flight search, if any.
    pub fn cancel_search(&mut self) {
        if let Some(flight) = self.search_flight.take() {
            flight.kill();
        }
    }

    /// Cancels any predecessor and registers a fresh search flight.
    pub fn begin_search(&mut self) -> (u64, CancellationToken) {
        self.cancel_search();
        let flight = self.new_flight();
        let handle = (flight.id, flight.token());
        self.search_flight = Some(flight);
        handle
    }

    /// Clears the search flight if `id` still owns it; returns whether it did.
    pub fn finish_search(&mut self, id: u64) -> bool {
        if self.search_flight.as_ref().is_some_and(|f| f.id == id) {
            self.search_flight = None;
            true
        } else {
            false
        }
    }

    /// Cancels the in-flight run, if any.
    pub fn cancel_run(&mut self) {
        if let Some(flight) = self.run_flight.take() {
            flight.kill();
        }
    }

    /// Cancels any predecessor and registers a fresh run flight.
    pub fn begin_run(&mut self) -> (u64, CancellationToken) {
        self.cancel_run();
        let flight = self.new_flight();
        let handle = (flight.id, flight.token());
        self.run_flight = Some(flight);
        handle
    }

    /// Clears the run flight if `id` still owns it; returns whether it did.
    pub fn finish_run(&mut self, id: u64) -> bool {
        if self.run_flight.as_ref().is_some_and(|f| f.id == id) {
            self.run_flight = None;
            true
        } else {
            false
        }
    }

    /// Whether a search operation is outstanding.
    pub fn search_in_flight(&self) -> bool {
        self.search_flight.is_some()
    }

    /// Whether a run operation is outstanding.
    pub fn run_in_flight(&self) -> bool {
        self.run_flight.is_some()
    }

    /// Marks that a suggestion was just picked; the next typed character
    /// replaces the whole input.
    pub fn mark_just_picked(&mut self) {
        self.just_picked = true;
    }

    /// Drops the just-picked mark without consuming behavior.
    pub fn clear_just_picked(&mut self) {
        self.just_picked = false;
    }

    /// Consumes the just-picked mark.
    pub fn take_just_picked(&mut self) -> bool {
        std::mem::take(&mut self.just_picked)
    }

    fn new_flight(&mut self) -> Flight {
        self.next_flight_id += 1;
        Flight::new(self.next_flight_id)
    }
}
