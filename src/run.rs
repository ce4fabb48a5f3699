//! The single-flight run controller.
//!
//! At most one analysis run is in flight; triggering while one is
//! outstanding cancels it first. A cancelled predecessor settles with a
//! neutral status message and nothing else; in particular it must not
//! restore the trigger or clear the flight record its successor now owns.
//!
//! Tasks are spawned on the current [`tokio::task::LocalSet`]; the
//! controller must be driven from within one.

use std::rc::Rc;

use tokio::task::spawn_local;

use crate::api::{ApiBackend, RunReport, RunRequest, RunSettings};
use crate::error::ApiError;
use crate::session::SharedSession;
use crate::view::{ChartSlot, SharedView, StatusKind, TextPanel, TriggerState};

/// Status shown when a superseded run settles.
pub const CANCELLED_STATUS: &str = "Previous analysis cancelled.";
/// Status shown when a run completes.
pub const SUCCESS_STATUS: &str = "Analysis complete. Review the insights below.";
/// Fallback error status when the failure carries no endpoint message.
pub const FAILURE_FALLBACK: &str = "Failed to run analysis.";

/// Coordinates the run action against the run endpoint.
pub struct RunController<A: ApiBackend + 'static> {
    session: SharedSession,
    api: Rc<A>,
    view: SharedView,
}

impl<A: ApiBackend + 'static> RunController<A> {
    /// Creates the controller over shared session state and a view.
    pub fn new(session: SharedSession, api: Rc<A>, view: SharedView) -> Self {
        Self { session, api, view }
    }

    /// Starts a run for the current selection; a no-op without one.
    pub fn trigger(&self, settings: RunSettings) {
        let Some(pick) = self.session.borrow().selection.current().cloned() else {
            return;
        };
        let (flight_id, token) = self.session.borrow_mut().begin_run();

        {
            let mut view = self.view.borrow_mut();
            view.set_status(
                StatusKind::Info,
                &format!("Running analysis for {}…", pick.label),
            );
            view.set_results_visible(false);
            view.run_trigger(TriggerState::Busy);
        }

        let request = RunRequest::new(pick.symbol, settings);
        let session = self.session.clone();
        let api = Rc::clone(&self.api);
        let view = Rc::clone(&self.view);

        spawn_local(async move {
            match api.run(&request, token).await {
                Ok(report) => render_report(&view, &report),
                Err(err) if err.is_cancelled() => {
                    view.borrow_mut().set_status(StatusKind::Info, CANCELLED_STATUS);
                }
                Err(err) => {
                    error!("analysis run for {} failed: {err}", request.ticker);
                    let message = match &err {
                        ApiError::Endpoint { message, .. } => message.clone(),
                        _ => FAILURE_FALLBACK.to_string(),
                    };
                    view.borrow_mut().set_status(StatusKind::Error, &message);
                }
            }

            // Only the task still owning the flight restores the trigger;
            // a superseded run leaves its successor's busy state alone.
            if session.borrow_mut().finish_run(flight_id) {
                let state = if session.borrow().selection.is_some() {
                    TriggerState::Ready
                } else {
                    TriggerState::Disabled
                };
                view.borrow_mut().run_trigger(state);
            }
        });
    }
}

fn render_report(view: &SharedView, report: &RunReport) {
    let mut view = view.borrow_mut();
    view.render_text(TextPanel::Summary, report.summary.as_deref());
    view.render_text(TextPanel::Strategy, report.strategy.as_deref());
    view.render_stats(report.stats());
    view.show_chart(ChartSlot::Trader, report.trader_chart.as_deref());
    view.show_chart(ChartSlot::Returns, report.returns_chart.as_deref());
    view.set_results_visible(true);
    view.set_status(StatusKind::Success, SUCCESS_STATUS);
}
