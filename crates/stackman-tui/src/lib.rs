//! Dashboard TUI for stackman
//!
//! A single reducer ([`update`]) owns all dashboard state. Terminal input
//! and background results (container lists, compose output, timers) arrive
//! as [`Message`]s on one queue and are handled strictly in order.

pub mod app;
pub mod confirm;
mod event;
mod executor;
pub mod message;
pub mod pump;
pub mod state;
pub mod ui;
pub mod update;

pub use app::{App, AppError, AppResult};
pub use confirm::{ConfirmOutcome, ConfirmStage, ConfirmationFlow};
pub use event::{Event, EventHandler};
pub use message::{Command, LoadOrigin, Message};
pub use pump::PumpEvent;
pub use state::{DashboardState, Panel, View};
pub use update::update;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use stackman_core::StackManager;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static DASHBOARD_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether the dashboard currently owns the terminal
///
/// Log layers that write to the terminal should drop events while this holds,
/// from every thread, including blocking-pool workers.
pub fn dashboard_active() -> bool {
    DASHBOARD_ACTIVE.load(Ordering::Relaxed)
}

/// Marks the terminal as owned by the dashboard until dropped
pub struct DashboardGuard(());

impl DashboardGuard {
    pub fn engage() -> Self {
        DASHBOARD_ACTIVE.store(true, Ordering::Relaxed);
        Self(())
    }
}

impl Drop for DashboardGuard {
    fn drop(&mut self) {
        DASHBOARD_ACTIVE.store(false, Ordering::Relaxed);
    }
}

/// Run the dashboard for the project in the current directory
pub async fn run(manager: StackManager) -> AppResult<()> {
    // Log lines would corrupt the alternate screen
    let _guard = DashboardGuard::engage();

    let project_dir = std::env::current_dir()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(manager, project_dir);
    let res = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
