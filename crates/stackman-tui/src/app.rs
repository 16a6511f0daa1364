//! Main TUI application: event loop wiring around the reducer

use crate::event::{Event, EventHandler};
use crate::executor::Executor;
use crate::message::{Command, Message};
use crate::state::DashboardState;
use crate::ui;
use crate::update::update;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use stackman_core::StackManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] stackman_core::CoreError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Main application
pub struct App {
    pub state: DashboardState,
    pub should_quit: bool,
    manager: Arc<StackManager>,
    executor: Executor,
    messages: mpsc::UnboundedReceiver<Message>,
    tick_rate: Duration,
}

impl App {
    /// Create the app for the project rooted at `project_dir`
    pub fn new(manager: StackManager, project_dir: PathBuf) -> Self {
        let (tx, messages) = mpsc::unbounded_channel();
        let manager = Arc::new(manager);
        let timings = manager.config().dashboard.clone();

        let mut state = DashboardState::new(manager.stack().clone());
        state.connection_error = manager.connection_error().map(str::to_string);

        Self {
            state,
            should_quit: false,
            executor: Executor::new(manager.clone(), tx, timings.clone(), project_dir),
            manager,
            messages,
            tick_rate: timings.tick_rate(),
        }
    }

    pub fn manager(&self) -> &StackManager {
        &self.manager
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    /// Kick off project detection, which in turn loads the containers
    pub fn init(&mut self) {
        self.execute(Command::DetectProject);
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let mut events = EventHandler::new(self.tick_rate);
        self.init();

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                event = events.next() => {
                    if let Some(e) = event {
                        self.handle_event(e);
                    }
                }
                msg = self.messages.recv() => {
                    if let Some(msg) = msg {
                        self.dispatch(msg);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.dispatch(Message::Key(key)),
            Event::Tick | Event::Resize(_, _) => {
                // Redrawn on the next loop iteration
            }
        }
    }

    /// Run one message through the reducer and start whatever it asks for
    pub fn dispatch(&mut self, msg: Message) {
        let command = update(&mut self.state, msg);
        self.execute(command);
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::Quit => self.should_quit = true,
            Command::Batch(commands) => {
                for command in commands {
                    self.execute(command);
                }
            }
            other => self.executor.spawn(other),
        }
    }

    /// Simulate a key press
    pub async fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AppResult<()> {
        self.dispatch(Message::Key(KeyEvent::new(code, modifiers)));
        Ok(())
    }

    /// Type each character of `text`
    pub async fn send_text(&mut self, text: &str) -> AppResult<()> {
        for c in text.chars() {
            self.send_key(KeyCode::Char(c), KeyModifiers::NONE).await?;
        }
        Ok(())
    }

    /// Dispatch background results until `done` holds
    ///
    /// Returns false if `timeout` passes first.
    pub async fn run_until(&mut self, timeout: Duration, done: impl Fn(&App) -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while !done(self) {
            match tokio::time::timeout_at(deadline, self.messages.recv()).await {
                Ok(Some(msg)) => self.dispatch(msg),
                _ => return false,
            }
        }
        true
    }

    /// Dispatch whatever is already queued without waiting
    pub fn drain_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.messages.try_recv() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }
}
