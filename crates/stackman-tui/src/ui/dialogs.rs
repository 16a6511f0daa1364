use super::*;
use crate::confirm::{FIRST_ANSWER, SECOND_ANSWER};

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

pub(super) fn draw_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let flow = &app.state.confirmation;
    let project = app
        .state
        .project
        .as_ref()
        .map(|p| p.name.as_str())
        .unwrap_or("this project");

    let (step, answer, input) = match flow.stage() {
        ConfirmStage::SecondPrompt => ("Step 2 of 2", SECOND_ANSWER, flow.second_input()),
        _ => ("Step 1 of 2", FIRST_ANSWER, flow.first_input()),
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("Destroy the stack for '{}'?", project),
            Style::default().bold(),
        )),
        Line::from(Span::styled(
            "Containers and named volumes (databases) will be deleted.",
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{}: type ", step), Style::default().fg(Color::Gray)),
            Span::styled(answer, Style::default().fg(Color::Yellow).bold()),
            Span::styled(" and press Enter", Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(input.to_string(), Style::default().fg(Color::White).bold()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Esc: Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let height = lines.len() as u16 + 2;
    let dialog_area = centered_rect(62, height, area);
    frame.render_widget(Clear, dialog_area);

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Destroy Stack ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(dialog, dialog_area);
}

pub(super) fn draw_help(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(format!("{:<10}", k), Style::default().fg(Color::Yellow));
    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(Color::Cyan).bold()))
    };

    let lines = vec![
        section("Containers"),
        Line::from(vec![key("j/k ↑/↓"), Span::raw("Move selection")]),
        Line::from(vec![key("s"), Span::raw("Start or stop the selected container")]),
        Line::from(vec![key("r"), Span::raw("Restart the selected container")]),
        Line::from(""),
        section("Stack"),
        Line::from(vec![key("s"), Span::raw("Start the stack (preflight)")]),
        Line::from(vec![key("S"), Span::raw("Stop the stack")]),
        Line::from(vec![key("R"), Span::raw("Restart the stack")]),
        Line::from(vec![key("d"), Span::raw("Destroy the stack and its volumes")]),
        Line::from(vec![key("t"), Span::raw("Install the starter template")]),
        Line::from(""),
        section("General"),
        Line::from(vec![key("p"), Span::raw("Project details")]),
        Line::from(vec![key("Esc"), Span::raw("Back to the dashboard / close output")]),
        Line::from(vec![key("q"), Span::raw("Quit")]),
    ];

    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(help, area);
}

pub(super) fn draw_projects(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let label = |text: &'static str| Span::styled(format!("{:<14}", text), Style::default().fg(Color::DarkGray));
    let path_or = |path: Option<&std::path::Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    };

    let mut lines = Vec::new();
    match &state.project {
        Some(project) => {
            lines.push(Line::from(vec![label("Name"), Span::raw(project.name.clone())]));
            lines.push(Line::from(vec![
                label("Directory"),
                Span::raw(project.path.display().to_string()),
            ]));
            lines.push(Line::from(vec![
                label("public_html"),
                Span::raw(if project.has_public_html { "present" } else { "missing" }),
            ]));
        }
        None => lines.push(Line::from("No project detected")),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        label("Stack file"),
        Span::raw(path_or(state.stack.stack_file.as_deref())),
    ]));
    lines.push(Line::from(vec![
        label("Stack home"),
        Span::raw(path_or(state.stack.stack_home.as_deref())),
    ]));
    lines.push(Line::from(vec![
        label("Containers"),
        Span::raw(state.containers.len().to_string()),
    ]));

    let projects = Paragraph::new(lines).block(
        Block::default()
            .title(" Project ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(projects, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(40, 20, area);

        assert_eq!(centered.x, 30);
        assert_eq!(centered.y, 15);
        assert_eq!(centered.width, 40);
        assert_eq!(centered.height, 20);
    }

    #[test]
    fn test_centered_rect_overflow() {
        let area = Rect::new(0, 0, 30, 20);
        let centered = centered_rect(50, 30, area);

        assert_eq!(centered.width, 30);
        assert_eq!(centered.height, 20);
    }
}
