//! The interactive dashboard event loop.
//!
//! Wires the line editor, the two controllers, and the terminal view
//! together. Must run inside a [`tokio::task::LocalSet`] so the controllers
//! can spawn their flights on the same thread.

use std::cell::RefCell;
use std::rc::Rc;

use color_eyre::eyre::Result;
use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use futures::StreamExt as _;

use crate::api::{ApiBackend, HttpApi};
use crate::error::ApiError;
use crate::input::InputLine;
use crate::options::DashboardOptions;
use crate::run::RunController;
use crate::search::SearchController;
use crate::session::{Session, SharedSession};
use crate::term::TermView;
use crate::view::SharedView;

/// The dashboard application: one session, one view, one event loop.
pub struct Dashboard<A = HttpApi>
where
    A: ApiBackend + 'static,
{
    options: DashboardOptions,
    session: SharedSession,
    view: Rc<RefCell<TermView>>,
    search: SearchController<A>,
    run: RunController<A>,
    input: InputLine,
    should_quit: bool,
}

impl Dashboard {
    /// Builds the dashboard against the HTTP endpoints in `options`.
    pub fn new(options: DashboardOptions) -> Result<Self, ApiError> {
        let api = Rc::new(HttpApi::new(&options)?);
        Ok(Self::with_api(options, api))
    }
}

impl<A: ApiBackend + 'static> Dashboard<A> {
    /// Builds the dashboard over any backend (e.g. a test double).
    pub fn with_api(options: DashboardOptions, api: Rc<A>) -> Self {
        let session = Session::shared(options.min_query_length);
        let view = Rc::new(RefCell::new(TermView::new()));
        let shared_view: SharedView = view.clone();
        let search = SearchController::new(
            session.clone(),
            Rc::clone(&api),
            shared_view.clone(),
            &options,
        );
        let run = RunController::new(session.clone(), api, shared_view);
        Self {
            options,
            session,
            view,
            search,
            run,
            input: InputLine::default(),
            should_quit: false,
        }
    }

    /// Runs the event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        let outcome = self.event_loop().await;
        terminal::disable_raw_mode()?;
        outcome
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.view.borrow().paint()?;
        let mut events = EventStream::new();
        while !self.should_quit {
            match events.next().await {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    self.handle_key(&key);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!("terminal event error: {err}");
                }
                None => break,
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
            }
            KeyCode::Char('r') if ctrl => {
                self.run.trigger(self.options.run_settings());
            }
            KeyCode::Esc => {
                self.view.borrow_mut().hide_list();
            }
            KeyCode::Up => {
                self.view.borrow_mut().move_highlight(-1);
            }
            KeyCode::Down => {
                self.view.borrow_mut().move_highlight(1);
            }
            KeyCode::Enter => {
                let picked = self.view.borrow().highlighted();
                if let Some(item) = picked {
                    self.search.pick(&item);
                    self.input.set_value(&item.label);
                    self.sync_cursor();
                }
            }
            KeyCode::Backspace => {
                if self.input.backspace() {
                    self.query_changed();
                }
            }
            KeyCode::Delete => {
                if self.input.delete() {
                    self.query_changed();
                }
            }
            KeyCode::Left => {
                self.input.move_left();
                self.sync_cursor();
            }
            KeyCode::Right => {
                self.input.move_right();
                self.sync_cursor();
            }
            KeyCode::Home => {
                self.input.move_home();
                self.sync_cursor();
            }
            KeyCode::End => {
                self.input.move_end();
                self.sync_cursor();
            }
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                // A pick leaves the label in the box; the next typed
                // character starts a fresh query.
                if self.session.borrow_mut().take_just_picked() {
                    self.input.clear();
                }
                self.input.insert(c);
                self.query_changed();
            }
            _ => {}
        }
    }

    fn query_changed(&mut self) {
        self.sync_cursor();
        self.search.on_input(self.input.value());
    }

    fn sync_cursor(&mut self) {
        self.view
            .borrow_mut()
            .set_query(self.input.value(), self.input.cursor());
    }
}
