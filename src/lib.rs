//! Tickerdesk is the coordination engine of a ticker-analysis dashboard.
//!
//! It manages the two genuinely concurrent parts of such a page: an
//! incremental search box (debouncing, request supersession, stale-response
//! suppression, a prefix-aware client cache, cooperative cancellation) and
//! a single-flight "run analysis" action. Rendering sits behind the
//! [`view::DashboardView`] trait; the crate ships a plain-terminal
//! implementation and the `tkd` binary that drives it.
//!
//! Everything runs on one thread: controllers spawn their flights with
//! `tokio::task::spawn_local`, so drive them from inside a
//! [`tokio::task::LocalSet`].
//!
//! # Examples
//!
//! ```
//! use tickerdesk::view::paragraphs;
//!
//! let paras = paragraphs("Buy.\n\nHold steady.");
//! assert_eq!(paras.len(), 2);
//! assert_eq!(paras[1], vec!["Hold steady."]);
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub mod api;
pub mod app;
pub mod cache;
pub mod error;
pub mod input;
pub mod options;
pub mod run;
pub mod search;
pub mod selection;
pub mod session;
pub mod term;
pub mod view;

pub use crate::api::{ApiBackend, HttpApi, RunReport, RunRequest, RunSettings, SearchResultItem};
pub use crate::app::Dashboard;
pub use crate::error::ApiError;
pub use crate::options::{DashboardOptions, DashboardOptionsBuilder};
pub use crate::run::RunController;
pub use crate::search::SearchController;
pub use crate::session::{Session, SharedSession};
pub use crate::view::{DashboardView, SharedView};
