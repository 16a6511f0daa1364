//! UI rendering
//!
//! Pure layout: everything shown here is read from [`App`] state.

mod dialogs;
mod panels;

use crate::app::App;
use crate::confirm::ConfirmStage;
use crate::state::{Panel, View};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use dialogs::*;
use panels::*;

pub use dialogs::centered_rect;
pub use panels::cpu_bar;

/// Draw the whole screen
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let show_warning = !app.is_connected();

    let chunks = if show_warning {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Warning banner
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Footer
            ])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Footer
            ])
            .split(area)
    };

    draw_header(frame, app, chunks[0]);

    let (content_area, footer_area) = if show_warning {
        draw_disconnection_warning(frame, app, chunks[1]);
        (chunks[2], chunks[3])
    } else {
        (chunks[1], chunks[2])
    };

    match app.state.view {
        View::Dashboard => match app.state.panel {
            Panel::Preflight => draw_preflight(frame, app, content_area),
            Panel::Output => draw_output(frame, app, content_area),
            Panel::Status => draw_status(frame, app, content_area),
        },
        View::Help => draw_help(frame, content_area),
        View::Projects => draw_projects(frame, app, content_area),
    }

    if app.state.confirmation.is_active() {
        draw_confirm_dialog(frame, app, area);
    }

    draw_footer(frame, app, footer_area);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let mut spans = Vec::new();

    match &state.project {
        Some(project) => {
            spans.push(Span::styled("Project: ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(project.name.clone(), Style::default().bold()));
        }
        None => spans.push(Span::styled(
            "No project detected",
            Style::default().fg(Color::DarkGray),
        )),
    }

    spans.push(Span::raw("  │  "));
    spans.push(Span::styled(
        format!("{} containers", state.containers.len()),
        Style::default().fg(Color::Gray),
    ));

    if state.refresh_active {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled("● live", Style::default().fg(Color::Green)));
    }

    if let Some(at) = state.last_refreshed {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(
            format!("updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" stackman - Stack Manager ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn draw_disconnection_warning(frame: &mut Frame, app: &App, area: Rect) {
    let detail = app
        .state
        .connection_error
        .as_deref()
        .unwrap_or("Docker is not reachable");
    let warning = Paragraph::new(format!(
        "Not connected to Docker: {}. Stack operations may still work.",
        detail
    ))
    .style(Style::default().fg(Color::Yellow))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(warning, area);
}

/// Key hints for the current view and panel
fn footer_help(app: &App) -> &'static str {
    let state = &app.state;
    match state.confirmation.stage() {
        ConfirmStage::Idle => {}
        _ => return "Enter: Submit  Backspace: Delete  Esc: Cancel",
    }

    match state.view {
        View::Help | View::Projects => "Esc: Back  q: Quit",
        View::Dashboard => match state.panel {
            Panel::Preflight => "s: Start stack  t: Install template  r: Refresh  d: Destroy  p: Project  ?: Help  q: Quit",
            Panel::Output if state.streaming => "(running...)  q: Quit",
            Panel::Output => "Esc: Close output  ?: Help  q: Quit",
            Panel::Status => "j/k: Navigate  s: Start/Stop  r: Restart  S: Stop stack  R: Restart stack  d: Destroy  ?: Help  q: Quit",
        },
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = footer_help(app);

    let footer = match (&app.state.last_error, &app.state.status_message) {
        (Some(error), _) => Paragraph::new(Line::from(vec![
            Span::styled(error.clone(), Style::default().fg(Color::Red).bold()),
            Span::styled(format!(" │ {}", help), Style::default().fg(Color::DarkGray)),
        ])),
        (None, Some(status)) if !status.is_empty() => {
            Paragraph::new(format!("{} │ {}", status, help))
                .style(Style::default().fg(Color::DarkGray))
        }
        _ => Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(footer.block(Block::default().borders(Borders::ALL)), area);
}
