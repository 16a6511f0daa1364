//! Runs reducer commands as background tasks
//!
//! Every command becomes at most one spawned task that reports back with a
//! single [`Message`], except `StartStream`, whose pump reports once per
//! output line.

use crate::message::{Command, LoadOrigin, Message};
use crate::pump;
use stackman_config::DashboardConfig;
use stackman_core::{CoreError, StackManager};
use stackman_provider::ContainerAction;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct Executor {
    manager: Arc<StackManager>,
    tx: mpsc::UnboundedSender<Message>,
    timings: DashboardConfig,
    /// Directory the project is detected from
    project_dir: PathBuf,
}

impl Executor {
    pub fn new(
        manager: Arc<StackManager>,
        tx: mpsc::UnboundedSender<Message>,
        timings: DashboardConfig,
        project_dir: PathBuf,
    ) -> Self {
        Self {
            manager,
            tx,
            timings,
            project_dir,
        }
    }

    fn send(&self, msg: Message) {
        // The receiver only goes away when the app is shutting down
        let _ = self.tx.send(msg);
    }

    fn send_after(&self, delay: Duration, msg: Message) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(msg);
        });
    }

    /// Start the work for one leaf command
    ///
    /// `None`, `Batch` and `Quit` are handled by the app and ignored here.
    pub fn spawn(&self, command: Command) {
        match command {
            Command::None | Command::Batch(_) | Command::Quit => {}
            Command::DetectProject => {
                let result = self.manager.detect_project(&self.project_dir);
                self.send(Message::ProjectDetected(result));
            }
            Command::LoadContainers(project) => {
                let manager = self.manager.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = manager.list(&project).await;
                    let _ = tx.send(Message::ContainersLoaded {
                        origin: LoadOrigin::Refresh,
                        result,
                    });
                });
            }
            Command::PollContainers {
                project,
                generation,
            } => {
                let manager = self.manager.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = manager.list_with_stats(&project).await;
                    let _ = tx.send(Message::ContainersLoaded {
                        origin: LoadOrigin::Poll { generation },
                        result,
                    });
                });
            }
            Command::SchedulePoll { generation } => {
                self.send_after(
                    self.timings.refresh_interval(),
                    Message::PollTick { generation },
                );
            }
            Command::RunContainerAction {
                action,
                id,
                service,
            } => {
                let manager = self.manager.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = match action {
                        ContainerAction::Start => manager.start(&id).await,
                        ContainerAction::Stop => manager.stop(&id).await,
                        ContainerAction::Restart => manager.restart(&id).await,
                    };
                    let _ = tx.send(Message::ContainerActionDone {
                        action,
                        service,
                        result,
                    });
                });
            }
            Command::StartStream {
                stream_id,
                operation,
                project,
            } => match self.manager.stream(operation, &project) {
                Ok(rx) => {
                    pump::spawn_pump(
                        rx,
                        self.timings.stream_line_timeout(),
                        stream_id,
                        self.tx.clone(),
                    );
                }
                Err(error) => self.send(Message::StreamRejected { stream_id, error }),
            },
            Command::ScheduleSettle { stream_id } => {
                self.send_after(
                    self.timings.settle_delay(),
                    Message::SettleElapsed { stream_id },
                );
            }
            Command::InstallTemplate(project) => {
                let manager = self.manager.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result =
                        tokio::task::spawn_blocking(move || manager.install_template(&project))
                            .await
                            .unwrap_or_else(|e| {
                                Err(CoreError::Io(std::io::Error::other(e.to_string())))
                            });
                    let _ = tx.send(Message::TemplateInstalled(result));
                });
            }
            Command::ScheduleErrorClear { generation } => {
                self.send_after(
                    self.timings.error_display(),
                    Message::ClearError { generation },
                );
            }
        }
    }
}
