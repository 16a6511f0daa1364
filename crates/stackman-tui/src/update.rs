//! Dashboard reducer
//!
//! `update` is the only place [`DashboardState`] changes. It never waits on
//! I/O: anything slow comes back as a [`Command`] for the executor, whose
//! result arrives later as another [`Message`].

use crate::confirm::ConfirmOutcome;
use crate::message::{Command, LoadOrigin, Message};
use crate::pump::PumpEvent;
use crate::state::{DashboardState, Panel, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stackman_core::{format_action_error, format_user_error, CoreError, Project};
use stackman_provider::{
    ComposeOperation, ContainerAction, ContainerSnapshot, ContainerStatus, OutputLine,
};

/// Process one message
pub fn update(state: &mut DashboardState, msg: Message) -> Command {
    match msg {
        Message::Key(key) => handle_key(state, key),
        Message::ProjectDetected(result) => on_project_detected(state, result),
        Message::ContainersLoaded { origin, result } => on_containers_loaded(state, origin, result),
        Message::PollTick { generation } => on_poll_tick(state, generation),
        Message::Stream { stream_id, event } => on_stream_event(state, stream_id, event),
        Message::StreamRejected { stream_id, error } => on_stream_rejected(state, stream_id, error),
        Message::SettleElapsed { stream_id } => on_settled(state, stream_id),
        Message::ContainerActionDone {
            action,
            service,
            result,
        } => on_container_action_done(state, action, &service, result),
        Message::TemplateInstalled(result) => on_template_installed(state, result),
        Message::ClearError { generation } => {
            if generation == state.error_generation {
                state.last_error = None;
            }
            Command::None
        }
    }
}

/// Show an error and arm its auto-clear timer
fn show_error(state: &mut DashboardState, message: String) -> Command {
    tracing::debug!("dashboard error: {}", message);
    state.last_error = Some(message);
    state.error_generation += 1;
    Command::ScheduleErrorClear {
        generation: state.error_generation,
    }
}

fn load_containers(state: &DashboardState) -> Command {
    match &state.project {
        Some(project) => Command::LoadContainers(project.clone()),
        None => Command::None,
    }
}

fn start_polling(state: &mut DashboardState) -> Command {
    state.refresh_active = true;
    state.poll_generation += 1;
    tracing::debug!("poller started (generation {})", state.poll_generation);
    Command::SchedulePoll {
        generation: state.poll_generation,
    }
}

fn stop_polling(state: &mut DashboardState) {
    if state.refresh_active {
        state.refresh_active = false;
        // Orphans any tick or poll result still in flight
        state.poll_generation += 1;
        tracing::debug!("poller cancelled");
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

fn handle_key(state: &mut DashboardState, key: KeyEvent) -> Command {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Command::Quit;
    }

    if state.confirmation.is_active() {
        return match state.confirmation.handle_key(key) {
            ConfirmOutcome::Pending => Command::None,
            ConfirmOutcome::Cancelled => {
                state.status_message = Some("Destroy cancelled".to_string());
                Command::None
            }
            ConfirmOutcome::Confirmed => start_stack_operation(state, ComposeOperation::Destroy),
        };
    }

    // Any key press dismisses the current error
    state.last_error = None;

    match key.code {
        KeyCode::Char('q') => return Command::Quit,
        KeyCode::Char('?') => {
            switch_view(state, View::Help);
            return Command::None;
        }
        KeyCode::Char('p') => {
            switch_view(state, View::Projects);
            return Command::None;
        }
        KeyCode::Esc => return on_escape(state),
        _ => {}
    }

    if state.view != View::Dashboard {
        return Command::None;
    }

    match state.panel {
        Panel::Preflight => preflight_key(state, key),
        Panel::Status => status_key(state, key),
        Panel::Output => Command::None,
    }
}

fn switch_view(state: &mut DashboardState, view: View) {
    state.view = view;
    if view != View::Dashboard {
        stop_polling(state);
    }
}

fn on_escape(state: &mut DashboardState) -> Command {
    if state.view != View::Dashboard {
        switch_view(state, View::Dashboard);
        return load_containers(state);
    }

    if state.panel == Panel::Output && !state.streaming {
        state.panel = if state.containers.is_empty() {
            Panel::Preflight
        } else {
            Panel::Status
        };
        return load_containers(state);
    }

    Command::None
}

fn preflight_key(state: &mut DashboardState, key: KeyEvent) -> Command {
    match key.code {
        KeyCode::Char('s') => {
            if state.scaffolded_project().is_none() {
                state.status_message =
                    Some("Install the starter template first (press 't')".to_string());
                return Command::None;
            }
            start_stack_operation(state, ComposeOperation::Up)
        }
        KeyCode::Char('t') => {
            let Some(project) = state.project.clone() else {
                return show_error(state, "No project detected".to_string());
            };
            if project.has_public_html {
                state.status_message = Some("public_html already exists".to_string());
                return Command::None;
            }
            state.status_message = Some("Installing template...".to_string());
            Command::InstallTemplate(project)
        }
        KeyCode::Char('r') => {
            state.status_message = Some("Refreshing...".to_string());
            Command::DetectProject
        }
        KeyCode::Char('d') => begin_destroy(state),
        _ => Command::None,
    }
}

fn status_key(state: &mut DashboardState, key: KeyEvent) -> Command {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.select_next();
            Command::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.select_previous();
            Command::None
        }
        KeyCode::Char('s') => toggle_selected(state),
        KeyCode::Char('r') => container_action(state, ContainerAction::Restart),
        KeyCode::Char('S') => start_stack_operation(state, ComposeOperation::Down),
        KeyCode::Char('R') => start_stack_operation(state, ComposeOperation::Restart),
        KeyCode::Char('d') => begin_destroy(state),
        _ => Command::None,
    }
}

fn toggle_selected(state: &mut DashboardState) -> Command {
    let Some((status, service)) = state
        .selected_container()
        .map(|c| (c.status, c.service.clone()))
    else {
        return Command::None;
    };
    match status {
        ContainerStatus::Running => container_action(state, ContainerAction::Stop),
        ContainerStatus::Restarting => {
            state.status_message =
                Some(format!("'{}' is restarting, try again shortly", service));
            Command::None
        }
        _ => container_action(state, ContainerAction::Start),
    }
}

fn container_action(state: &mut DashboardState, action: ContainerAction) -> Command {
    let Some(ContainerSnapshot { id, service, .. }) = state.selected_container().cloned() else {
        return Command::None;
    };
    state.status_message = Some(format!("{} '{}'...", action.progressive(), service));
    Command::RunContainerAction {
        action,
        id,
        service,
    }
}

fn begin_destroy(state: &mut DashboardState) -> Command {
    if state.streaming {
        state.status_message = Some("A stack operation is already running".to_string());
        return Command::None;
    }
    if state.scaffolded_project().is_none() {
        state.status_message =
            Some("Destroy needs a detected project with public_html".to_string());
        return Command::None;
    }
    state.confirmation.begin();
    Command::None
}

// ---------------------------------------------------------------------------
// Stack operations
// ---------------------------------------------------------------------------

fn start_stack_operation(state: &mut DashboardState, operation: ComposeOperation) -> Command {
    if state.streaming {
        state.status_message = Some("A stack operation is already running".to_string());
        return Command::None;
    }

    let Some(project) = state.project.clone() else {
        return show_error(state, "No project detected".to_string());
    };

    // Stack problems are reported here and never reach the output panel
    if let Err(e) = state.stack.validate() {
        return show_error(state, e.to_string());
    }

    state.output.clear();
    state.panel = Panel::Output;
    state.streaming = true;
    state.operation = Some(operation);
    state.stream_id += 1;
    state.status_message = Some(operation.progress_label().to_string());
    tracing::info!("stack {} started (stream {})", operation, state.stream_id);

    Command::StartStream {
        stream_id: state.stream_id,
        operation,
        project,
    }
}

fn is_current_stream(state: &DashboardState, stream_id: u64) -> bool {
    state.streaming && stream_id == state.stream_id
}

fn operation_name(state: &DashboardState) -> String {
    state
        .operation
        .map(|op| op.to_string())
        .unwrap_or_else(|| "operation".to_string())
}

fn on_stream_event(state: &mut DashboardState, stream_id: u64, event: PumpEvent) -> Command {
    if !is_current_stream(state, stream_id) {
        tracing::debug!("ignoring event from stale stream {}", stream_id);
        return Command::None;
    }

    match event {
        PumpEvent::Line(OutputLine::Complete) | PumpEvent::Closed => {
            state.output.push(OutputLine::Complete);
            state.streaming = false;
            state.status_message = Some(format!("Stack {} finished", operation_name(state)));
            tracing::info!("stream {} complete", stream_id);
            Command::batch([load_containers(state), Command::ScheduleSettle { stream_id }])
        }
        PumpEvent::Line(line @ OutputLine::Fatal(_)) => {
            tracing::warn!("stream {} failed: {}", stream_id, line);
            state.output.push(line);
            state.streaming = false;
            state.status_message = Some(format!("Stack {} failed", operation_name(state)));
            Command::None
        }
        PumpEvent::TimedOut { after } => {
            tracing::warn!("stream {} timed out after {:?}", stream_id, after);
            state.output.push(OutputLine::Fatal(format!(
                "ERROR: No output for {}s, stopped following the operation",
                after.as_secs()
            )));
            state.streaming = false;
            state.status_message = Some(format!("Stack {} timed out", operation_name(state)));
            Command::None
        }
        PumpEvent::Line(line) => {
            state.output.push(line);
            Command::None
        }
    }
}

fn on_stream_rejected(state: &mut DashboardState, stream_id: u64, error: CoreError) -> Command {
    if !is_current_stream(state, stream_id) {
        return Command::None;
    }
    state.streaming = false;
    state
        .output
        .push(OutputLine::Fatal(format!("ERROR: Failed to start command: {}", error)));
    show_error(state, format_user_error(&error.to_string()))
}

fn on_settled(state: &mut DashboardState, stream_id: u64) -> Command {
    // Ignore if another operation started or the user already left the panel
    if stream_id != state.stream_id || state.streaming || state.panel != Panel::Output {
        return Command::None;
    }
    state.panel = Panel::Status;
    load_containers(state)
}

// ---------------------------------------------------------------------------
// Async results
// ---------------------------------------------------------------------------

fn on_project_detected(state: &mut DashboardState, result: Result<Project, CoreError>) -> Command {
    match result {
        Ok(project) => {
            tracing::debug!("project {} detected", project.name);
            state.project = Some(project);
            if state.status_message.as_deref() == Some("Refreshing...") {
                state.status_message = None;
            }
            load_containers(state)
        }
        Err(e) => show_error(state, e.to_string()),
    }
}

fn on_containers_loaded(
    state: &mut DashboardState,
    origin: LoadOrigin,
    result: Result<Vec<ContainerSnapshot>, CoreError>,
) -> Command {
    let poll_generation = match origin {
        LoadOrigin::Poll { generation }
            if state.refresh_active && generation == state.poll_generation =>
        {
            Some(generation)
        }
        _ => None,
    };

    match result {
        Ok(containers) => {
            state.apply_containers(containers);

            if let Some(generation) = poll_generation {
                if state.containers.is_empty() {
                    state.refresh_active = false;
                    tracing::debug!("poller stopped: no containers");
                    return Command::None;
                }
                return Command::SchedulePoll { generation };
            }

            if !state.containers.is_empty() && !state.refresh_active && state.view == View::Dashboard
            {
                return start_polling(state);
            }
            Command::None
        }
        Err(e) => {
            tracing::warn!("container refresh failed: {}", e);
            let show = show_error(state, format_user_error(&e.to_string()));
            // Errors never stop the poller
            match poll_generation {
                Some(generation) => Command::batch([show, Command::SchedulePoll { generation }]),
                None => show,
            }
        }
    }
}

fn on_poll_tick(state: &mut DashboardState, generation: u64) -> Command {
    if !state.refresh_active || generation != state.poll_generation {
        return Command::None;
    }
    match state.project.clone() {
        Some(project) => Command::PollContainers {
            project,
            generation,
        },
        None => {
            state.refresh_active = false;
            Command::None
        }
    }
}

fn on_container_action_done(
    state: &mut DashboardState,
    action: ContainerAction,
    service: &str,
    result: Result<(), CoreError>,
) -> Command {
    match result {
        Ok(()) => {
            state.status_message = Some(format!(
                "Container '{}' {} successfully",
                service,
                action.past_tense()
            ));
            load_containers(state)
        }
        Err(e) => {
            state.status_message = None;
            show_error(state, format_action_error(action, service, &e.to_string()))
        }
    }
}

fn on_template_installed(state: &mut DashboardState, result: Result<usize, CoreError>) -> Command {
    match result {
        Ok(files) => {
            state.status_message = Some(format!("Template installed ({} files)", files));
            Command::DetectProject
        }
        Err(e) => {
            state.status_message = Some(format!("Template install failed: {}", e));
            Command::None
        }
    }
}
