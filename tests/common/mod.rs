//! Test doubles shared by the flow tests: a programmable backend and a
//! recording view.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use tickerdesk::api::{
    ApiBackend, RunReport, RunRequest, SearchResultItem, StatsMap, endpoint_error_message,
};
use tickerdesk::error::ApiError;
use tickerdesk::options::DashboardOptionsBuilder;
use tickerdesk::run::RunController;
use tickerdesk::search::SearchController;
use tickerdesk::selection::Pick;
use tickerdesk::session::{Session, SharedSession};
use tickerdesk::view::{
    ChartSlot, DashboardView, ListUpdate, SharedView, StatusKind, TextPanel, TriggerState,
};

pub fn item(symbol: &str, label: &str) -> SearchResultItem {
    SearchResultItem {
        symbol: symbol.to_string(),
        label: label.to_string(),
        logo: None,
    }
}

pub fn apple() -> SearchResultItem {
    item("AAPL", "Apple Inc.")
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Scripted behavior for one search query.
#[derive(Clone)]
pub struct SearchPlan {
    pub delay: Duration,
    pub outcome: Result<Vec<SearchResultItem>, u16>,
    /// Ignore the cancellation token and settle anyway; used to prove the
    /// staleness marker discards out-of-order responses on its own.
    pub deaf: bool,
}

impl Default for SearchPlan {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(Vec::new()),
            deaf: false,
        }
    }
}

/// Scripted behavior for one run, consumed in trigger order.
#[derive(Clone)]
pub struct RunPlan {
    pub delay: Duration,
    pub outcome: Result<Value, (u16, Value)>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(Value::Object(serde_json::Map::new())),
        }
    }
}

/// Programmable [`ApiBackend`] recording every call.
#[derive(Default)]
pub struct MockApi {
    search_plans: RefCell<HashMap<String, SearchPlan>>,
    run_plans: RefCell<VecDeque<RunPlan>>,
    search_calls: RefCell<Vec<String>>,
    run_calls: RefCell<Vec<RunRequest>>,
}

impl MockApi {
    pub fn plan_search(&self, query: &str, plan: SearchPlan) {
        self.search_plans.borrow_mut().insert(query.to_string(), plan);
    }

    pub fn search_ok(&self, query: &str, delay_ms: u64, results: Vec<SearchResultItem>) {
        self.plan_search(
            query,
            SearchPlan {
                delay: ms(delay_ms),
                outcome: Ok(results),
                deaf: false,
            },
        );
    }

    pub fn search_deaf_ok(&self, query: &str, delay_ms: u64, results: Vec<SearchResultItem>) {
        self.plan_search(
            query,
            SearchPlan {
                delay: ms(delay_ms),
                outcome: Ok(results),
                deaf: true,
            },
        );
    }

    pub fn search_fail(&self, query: &str, delay_ms: u64, status: u16) {
        self.plan_search(
            query,
            SearchPlan {
                delay: ms(delay_ms),
                outcome: Err(status),
                deaf: false,
            },
        );
    }

    pub fn plan_run(&self, plan: RunPlan) {
        self.run_plans.borrow_mut().push_back(plan);
    }

    pub fn run_ok(&self, delay_ms: u64, report: Value) {
        self.plan_run(RunPlan {
            delay: ms(delay_ms),
            outcome: Ok(report),
        });
    }

    pub fn run_fail(&self, delay_ms: u64, status: u16, body: Value) {
        self.plan_run(RunPlan {
            delay: ms(delay_ms),
            outcome: Err((status, body)),
        });
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.borrow().clone()
    }

    pub fn run_calls(&self) -> Vec<RunRequest> {
        self.run_calls.borrow().clone()
    }
}

impl ApiBackend for MockApi {
    async fn search(
        &self,
        query: &str,
        token: CancellationToken,
    ) -> Result<Vec<SearchResultItem>, ApiError> {
        self.search_calls.borrow_mut().push(query.to_string());
        let plan = self
            .search_plans
            .borrow()
            .get(query)
            .cloned()
            .unwrap_or_default();

        if plan.deaf {
            tokio::time::sleep(plan.delay).await;
        } else {
            tokio::select! {
                _ = token.cancelled() => return Err(ApiError::Cancelled),
                _ = tokio::time::sleep(plan.delay) => {}
            }
        }

        match plan.outcome {
            Ok(results) => Ok(results),
            Err(status) => Err(ApiError::Endpoint {
                status,
                message: format!("Search failed ({status})"),
            }),
        }
    }

    async fn run(
        &self,
        request: &RunRequest,
        token: CancellationToken,
    ) -> Result<RunReport, ApiError> {
        self.run_calls.borrow_mut().push(request.clone());
        let plan = self.run_plans.borrow_mut().pop_front().unwrap_or_default();

        tokio::select! {
            _ = token.cancelled() => return Err(ApiError::Cancelled),
            _ = tokio::time::sleep(plan.delay) => {}
        }

        match plan.outcome {
            Ok(report) => {
                Ok(serde_json::from_value(report).expect("mock report should deserialize"))
            }
            Err((status, body)) => Err(ApiError::Endpoint {
                status,
                message: endpoint_error_message(status, &body),
            }),
        }
    }
}

/// Owned snapshot of one suggestion-list update.
#[derive(Debug, Clone, PartialEq)]
pub enum ListSnapshot {
    Items(Vec<SearchResultItem>),
    Notice(String),
    Hidden,
}

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Status(StatusKind, String),
    List(ListSnapshot),
    Text(TextPanel, Option<String>),
    Stats(Option<StatsMap>),
    Chart(ChartSlot, Option<String>),
    ResultsVisible(bool),
    Selection(Option<Pick>),
    Trigger(TriggerState),
}

/// [`DashboardView`] that records every call for assertions.
#[derive(Default)]
pub struct RecordingView {
    pub calls: Vec<ViewCall>,
}

impl DashboardView for RecordingView {
    fn set_status(&mut self, kind: StatusKind, message: &str) {
        self.calls.push(ViewCall::Status(kind, message.to_string()));
    }

    fn render_list(&mut self, update: ListUpdate<'_>) {
        let snapshot = match update {
            ListUpdate::Items(items) => ListSnapshot::Items(items.to_vec()),
            ListUpdate::Notice(notice) => ListSnapshot::Notice(notice.to_string()),
            ListUpdate::Hidden => ListSnapshot::Hidden,
        };
        self.calls.push(ViewCall::List(snapshot));
    }

    fn render_text(&mut self, panel: TextPanel, text: Option<&str>) {
        self.calls
            .push(ViewCall::Text(panel, text.map(str::to_owned)));
    }

    fn render_stats(&mut self, stats: Option<&StatsMap>) {
        self.calls.push(ViewCall::Stats(stats.cloned()));
    }

    fn show_chart(&mut self, slot: ChartSlot, url: Option<&str>) {
        self.calls
            .push(ViewCall::Chart(slot, url.map(str::to_owned)));
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.calls.push(ViewCall::ResultsVisible(visible));
    }

    fn selection_changed(&mut self, pick: Option<&Pick>) {
        self.calls.push(ViewCall::Selection(pick.cloned()));
    }

    fn run_trigger(&mut self, state: TriggerState) {
        self.calls.push(ViewCall::Trigger(state));
    }
}

/// Controllers wired to a [`MockApi`] and a [`RecordingView`].
pub struct Harness {
    pub api: Rc<MockApi>,
    pub view: Rc<RefCell<RecordingView>>,
    pub session: SharedSession,
    pub search: SearchController<MockApi>,
    pub run: RunController<MockApi>,
}

impl Harness {
    /// Default harness: 50 ms debounce, min query length 2.
    pub fn new() -> Self {
        Self::with_debounce(50)
    }

    pub fn with_debounce(debounce_ms: u64) -> Self {
        let options = DashboardOptionsBuilder::default()
            .debounce_ms(debounce_ms)
            .build()
            .unwrap();
        let api = Rc::new(MockApi::default());
        let view = Rc::new(RefCell::new(RecordingView::default()));
        let shared_view: SharedView = view.clone();
        let session = Session::shared(options.min_query_length);
        let search = SearchController::new(
            session.clone(),
            Rc::clone(&api),
            shared_view.clone(),
            &options,
        );
        let run = RunController::new(session.clone(), Rc::clone(&api), shared_view);
        Self {
            api,
            view,
            session,
            search,
            run,
        }
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.view.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.view.borrow_mut().calls.clear();
    }

    pub fn lists(&self) -> Vec<ListSnapshot> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::List(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<(StatusKind, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::Status(kind, message) => Some((kind, message)),
                _ => None,
            })
            .collect()
    }

    pub fn trigger_states(&self) -> Vec<TriggerState> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::Trigger(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    /// Picks the Apple suggestion so a run may start.
    pub fn pick_apple(&self) -> SearchResultItem {
        let picked = apple();
        self.search.pick(&picked);
        picked
    }
}
