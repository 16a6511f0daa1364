//! Test support utilities for stackman-core
//!
//! Provides MockRuntime and MockRunner for driving the StackManager and the
//! dashboard without a real Docker daemon.

use async_trait::async_trait;
use stackman_provider::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Records which methods were called on the mocks
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List { project: String },
    ListWithStats { project: String },
    Start { id: String },
    Stop { id: String, timeout: i64 },
    Restart { id: String, timeout: i64 },
    Ping,
    Run { operation: ComposeOperation, project: String },
    Stream { operation: ComposeOperation, project: String },
}

/// Clone a ProviderError (thiserror types don't implement Clone)
pub fn clone_provider_error(e: &ProviderError) -> ProviderError {
    match e {
        ProviderError::DaemonUnreachable(s) => ProviderError::DaemonUnreachable(s.clone()),
        ProviderError::PermissionDenied(s) => ProviderError::PermissionDenied(s.clone()),
        ProviderError::Timeout => ProviderError::Timeout,
        ProviderError::NotFound(s) => ProviderError::NotFound(s.clone()),
        ProviderError::Conflict(s) => ProviderError::Conflict(s.clone()),
        ProviderError::Unknown(s) => ProviderError::Unknown(s.clone()),
        ProviderError::Validation(s) => ProviderError::Validation(s.clone()),
        ProviderError::Io(e) => ProviderError::Unknown(format!("I/O error (cloned): {}", e)),
    }
}

fn clone_result<T: Clone>(r: &Mutex<Result<T>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_provider_error(e)),
    }
}

/// Configurable mock container runtime
///
/// Clones share state, so a test can keep a handle after boxing one.
#[derive(Clone)]
pub struct MockRuntime {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Results handed out once each, before falling back to `list_result`
    pub list_queue: Arc<Mutex<VecDeque<Result<Vec<ContainerSnapshot>>>>>,
    /// Result for list and list_with_stats calls
    pub list_result: Arc<Mutex<Result<Vec<ContainerSnapshot>>>>,
    pub start_result: Arc<Mutex<Result<()>>>,
    pub stop_result: Arc<Mutex<Result<()>>>,
    pub restart_result: Arc<Mutex<Result<()>>>,
    pub ping_result: Arc<Mutex<Result<()>>>,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRuntime {
    /// Create a new mock runtime with default success results and no containers
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            list_queue: Arc::new(Mutex::new(VecDeque::new())),
            list_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            start_result: Arc::new(Mutex::new(Ok(()))),
            stop_result: Arc::new(Mutex::new(Ok(()))),
            restart_result: Arc::new(Mutex::new(Ok(()))),
            ping_result: Arc::new(Mutex::new(Ok(()))),
        }
    }

    /// Build a snapshot for a compose service
    pub fn snapshot(service: &str, status: ContainerStatus) -> ContainerSnapshot {
        ContainerSnapshot {
            id: ContainerId::new(format!("{}_id", service)),
            service: service.to_string(),
            name: format!("site-{}-1", service),
            image: format!("{}:latest", service),
            status,
            url: url_for_service(service),
            cpu_percent: 0.0,
        }
    }

    pub fn set_containers(&self, containers: Vec<ContainerSnapshot>) {
        *self.list_result.lock().unwrap() = Ok(containers);
    }

    pub fn set_list_result(&self, result: Result<Vec<ContainerSnapshot>>) {
        *self.list_result.lock().unwrap() = result;
    }

    /// Queue a one-shot list result
    pub fn push_list_result(&self, result: Result<Vec<ContainerSnapshot>>) {
        self.list_queue.lock().unwrap().push_back(result);
    }

    pub fn set_start_result(&self, result: Result<()>) {
        *self.start_result.lock().unwrap() = result;
    }

    pub fn set_stop_result(&self, result: Result<()>) {
        *self.stop_result.lock().unwrap() = result;
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    fn next_list(&self) -> Result<Vec<ContainerSnapshot>> {
        if let Some(result) = self.list_queue.lock().unwrap().pop_front() {
            return result;
        }
        clone_result(&self.list_result)
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn list(&self, project: &str) -> Result<Vec<ContainerSnapshot>> {
        self.record(MockCall::List {
            project: project.to_string(),
        });
        self.next_list()
    }

    async fn list_with_stats(&self, project: &str) -> Result<Vec<ContainerSnapshot>> {
        self.record(MockCall::ListWithStats {
            project: project.to_string(),
        });
        self.next_list()
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.record(MockCall::Start { id: id.0.clone() });
        clone_result(&self.start_result)
    }

    async fn stop(&self, id: &ContainerId, timeout_secs: i64) -> Result<()> {
        self.record(MockCall::Stop {
            id: id.0.clone(),
            timeout: timeout_secs,
        });
        clone_result(&self.stop_result)
    }

    async fn restart(&self, id: &ContainerId, timeout_secs: i64) -> Result<()> {
        self.record(MockCall::Restart {
            id: id.0.clone(),
            timeout: timeout_secs,
        });
        clone_result(&self.restart_result)
    }

    async fn ping(&self) -> Result<()> {
        self.record(MockCall::Ping);
        clone_result(&self.ping_result)
    }
}

/// Configurable mock compose runner (clones share state)
#[derive(Clone)]
pub struct MockRunner {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Result for run calls
    pub run_result: Arc<Mutex<Result<ComposeOutput>>>,
    /// Lines every stream delivers before closing
    pub stream_lines: Arc<Mutex<Vec<OutputLine>>>,
    /// If set, stream returns this error instead of a channel
    pub stream_error: Arc<Mutex<Option<ProviderError>>>,
    /// Keep the channel open after the scripted lines (simulates a hung process)
    pub keep_open: Arc<Mutex<bool>>,
    held_senders: Arc<Mutex<Vec<mpsc::Sender<OutputLine>>>>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    /// Create a runner whose streams complete immediately
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            run_result: Arc::new(Mutex::new(Ok(ComposeOutput {
                success: true,
                combined_output: String::new(),
                error: None,
            }))),
            stream_lines: Arc::new(Mutex::new(vec![OutputLine::Complete])),
            stream_error: Arc::new(Mutex::new(None)),
            keep_open: Arc::new(Mutex::new(false)),
            held_senders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script stream output from raw text lines
    pub fn set_stream_lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.stream_lines.lock().unwrap() = lines.into_iter().map(OutputLine::parse).collect();
    }

    pub fn set_stream_error(&self, error: ProviderError) {
        *self.stream_error.lock().unwrap() = Some(error);
    }

    pub fn set_keep_open(&self, keep_open: bool) {
        *self.keep_open.lock().unwrap() = keep_open;
    }

    pub fn set_run_result(&self, result: Result<ComposeOutput>) {
        *self.run_result.lock().unwrap() = result;
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComposeRunner for MockRunner {
    async fn run(
        &self,
        operation: ComposeOperation,
        target: &ComposeTarget,
    ) -> Result<ComposeOutput> {
        self.record(MockCall::Run {
            operation,
            project: target.project_name.clone(),
        });
        clone_result(&self.run_result)
    }

    fn stream(
        &self,
        operation: ComposeOperation,
        target: &ComposeTarget,
    ) -> Result<mpsc::Receiver<OutputLine>> {
        self.record(MockCall::Stream {
            operation,
            project: target.project_name.clone(),
        });

        if let Some(e) = self.stream_error.lock().unwrap().as_ref() {
            return Err(clone_provider_error(e));
        }

        let lines = self.stream_lines.lock().unwrap().clone();
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            let _ = tx.try_send(line);
        }

        if *self.keep_open.lock().unwrap() {
            self.held_senders.lock().unwrap().push(tx);
        }

        Ok(rx)
    }
}
