//! Events fed into the reducer and the work it asks for in return

use crate::pump::PumpEvent;
use crossterm::event::KeyEvent;
use stackman_core::{CoreError, Project};
use stackman_provider::{ComposeOperation, ContainerAction, ContainerId, ContainerSnapshot};

/// Where a container list result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// One-shot refresh (startup, after an action, Esc, stream completion)
    Refresh,
    /// Background poller cycle
    Poll { generation: u64 },
}

/// A discrete input to the reducer
#[derive(Debug)]
pub enum Message {
    Key(KeyEvent),
    ProjectDetected(Result<Project, CoreError>),
    ContainersLoaded {
        origin: LoadOrigin,
        result: Result<Vec<ContainerSnapshot>, CoreError>,
    },
    /// Poller timer fired
    PollTick { generation: u64 },
    /// One item from the streaming pump
    Stream { stream_id: u64, event: PumpEvent },
    /// The stream could not be started (validation or spawn failure)
    StreamRejected { stream_id: u64, error: CoreError },
    /// Post-completion settle delay elapsed
    SettleElapsed { stream_id: u64 },
    ContainerActionDone {
        action: ContainerAction,
        service: String,
        result: Result<(), CoreError>,
    },
    TemplateInstalled(Result<usize, CoreError>),
    /// Auto-clear timer for the error currently shown
    ClearError { generation: u64 },
}

/// Work the reducer hands back to the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    Batch(Vec<Command>),
    Quit,
    DetectProject,
    LoadContainers(Project),
    PollContainers {
        project: Project,
        generation: u64,
    },
    SchedulePoll {
        generation: u64,
    },
    RunContainerAction {
        action: ContainerAction,
        id: ContainerId,
        service: String,
    },
    StartStream {
        stream_id: u64,
        operation: ComposeOperation,
        project: Project,
    },
    ScheduleSettle {
        stream_id: u64,
    },
    InstallTemplate(Project),
    ScheduleErrorClear {
        generation: u64,
    },
}

impl Command {
    /// Combine commands, dropping `None` and unwrapping a single survivor
    pub fn batch(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut commands: Vec<Command> = commands
            .into_iter()
            .filter(|c| !matches!(c, Command::None))
            .collect();
        match commands.len() {
            0 => Command::None,
            1 => commands.remove(0),
            _ => Command::Batch(commands),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }

    /// Every leaf command, depth first
    pub fn flatten(self) -> Vec<Command> {
        match self {
            Command::None => Vec::new(),
            Command::Batch(commands) => commands.into_iter().flat_map(Command::flatten).collect(),
            other => vec![other],
        }
    }
}
