use super::*;
use stackman_provider::{ContainerStatus, OutputLine};

const CPU_BAR_WIDTH: usize = 10;

/// Fixed-width CPU gauge, e.g. `▓▓▓░░░░░░░`
pub fn cpu_bar(percent: f64, width: usize) -> String {
    let ratio = if percent.is_finite() {
        percent.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "▓".repeat(filled), "░".repeat(width - filled))
}

fn check_line(ok: bool, text: String) -> Line<'static> {
    let (mark, color) = if ok {
        ("[✓] ", Color::Green)
    } else {
        ("[✗] ", Color::Red)
    };
    Line::from(vec![
        Span::styled(mark, Style::default().fg(color)),
        Span::raw(text),
    ])
}

pub(super) fn draw_preflight(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let mut lines = Vec::new();

    match &state.project {
        Some(project) => {
            lines.push(check_line(
                true,
                format!("Project '{}' at {}", project.name, project.path.display()),
            ));
            if project.has_public_html {
                lines.push(check_line(true, "public_html found".to_string()));
            } else {
                lines.push(check_line(
                    false,
                    "public_html missing - press 't' to install the starter template".to_string(),
                ));
            }
        }
        None => lines.push(check_line(false, "No project detected yet".to_string())),
    }

    match state.stack.validate() {
        Ok(path) => lines.push(check_line(true, format!("Stack file {}", path.display()))),
        Err(e) => lines.push(check_line(false, e.to_string())),
    }

    lines.push(Line::from(""));
    if state.scaffolded_project().is_some() {
        lines.push(Line::from(vec![
            Span::raw("No containers running. Press "),
            Span::styled("s", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" to start the stack."),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "The stack can start once the project has a public_html directory.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let preflight = Paragraph::new(lines)
        .block(Block::default().title(" Preflight ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });

    frame.render_widget(preflight, area);
}

fn output_line(line: &OutputLine) -> Line<'_> {
    // Carriage returns from progress bars would overwrite in place
    let text = line.text().replace('\r', "");
    let style = match line {
        OutputLine::Data(_) => Style::default(),
        OutputLine::Warning(_) => Style::default().fg(Color::Red),
        OutputLine::Fatal(_) => Style::default().fg(Color::Red).bold(),
        OutputLine::Complete => Style::default().fg(Color::Green).bold(),
    };
    Line::from(Span::styled(text, style))
}

pub(super) fn draw_output(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let inner_height = area.height.saturating_sub(2) as usize;

    // Always follow the newest lines
    let skip = state.output.len().saturating_sub(inner_height);
    let lines: Vec<Line> = state.output.iter().skip(skip).map(output_line).collect();

    let operation = state
        .operation
        .map(|op| op.to_string())
        .unwrap_or_default();
    let title = if state.streaming {
        format!(" Output: {} (running...) ", operation)
    } else {
        format!(" Output: {} - Esc to close ", operation)
    };
    let border = if state.streaming {
        Color::Yellow
    } else if state.output.last() == Some(&OutputLine::Complete) {
        Color::Green
    } else {
        Color::Red
    };

    let output = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );

    frame.render_widget(output, area);
}

pub(super) fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;

    let header = Row::new(vec![
        Cell::from(" "),
        Cell::from("Service"),
        Cell::from("Status"),
        Cell::from("Image"),
        Cell::from("URL"),
        Cell::from("CPU%"),
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = state
        .containers
        .iter()
        .map(|container| {
            let (symbol, color) = match container.status {
                ContainerStatus::Running => ("●", Color::Green),
                ContainerStatus::Stopped => ("○", Color::DarkGray),
                ContainerStatus::Restarting => ("◐", Color::Yellow),
                ContainerStatus::Error => ("✗", Color::Red),
                ContainerStatus::Unknown => ("?", Color::DarkGray),
            };

            let cpu = if container.is_running() {
                format!(
                    "{} {:>5.1}",
                    cpu_bar(container.cpu_percent, CPU_BAR_WIDTH),
                    container.cpu_percent
                )
            } else {
                "-".to_string()
            };

            Row::new(vec![
                Cell::from(symbol).style(Style::default().fg(color)),
                Cell::from(container.service.clone()).style(Style::default().bold()),
                Cell::from(container.status.to_string()).style(Style::default().fg(color)),
                Cell::from(container.image.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(container.url.clone()).style(Style::default().fg(Color::Blue)),
                Cell::from(cpu),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),  // Status icon
        Constraint::Length(16), // Service
        Constraint::Length(11), // Status
        Constraint::Min(16),    // Image
        Constraint::Length(24), // URL
        Constraint::Length(17), // CPU bar + value
    ];

    let title = match &state.project {
        Some(project) => format!(" Containers - {} ", project.name),
        None => " Containers ".to_string(),
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}
