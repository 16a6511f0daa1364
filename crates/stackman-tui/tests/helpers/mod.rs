use ratatui::{backend::TestBackend, Terminal};
use stackman_config::{GlobalConfig, StackEnv};
use stackman_core::test_support::{MockRunner, MockRuntime};
use stackman_core::StackManager;
use stackman_tui::App;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Upper bound for waiting on background work in tests
#[allow(dead_code)]
pub const WAIT: Duration = Duration::from_secs(5);

/// Render the app to a TestBackend and capture output as a string
#[allow(dead_code)]
pub fn render_app(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| stackman_tui::ui::draw(frame, app))
        .unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer_to_string(&buffer)
}

/// Convert a ratatui buffer to a string representation
#[allow(dead_code)]
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            let cell = buffer.get(x, y);
            output.push_str(cell.symbol());
        }
        output.push('\n');
    }
    output
}

/// Short timers so polling and settle delays finish quickly
pub fn fast_config() -> GlobalConfig {
    let mut config = GlobalConfig::default();
    config.dashboard.refresh_interval_ms = 20;
    config.dashboard.settle_delay_ms = 10;
    config.dashboard.stream_line_timeout_secs = 5;
    config
}

/// On-disk layout: `<tmp>/my-site` project and `<tmp>/stack` checkout
pub struct Fixture {
    _dir: TempDir,
    pub project_dir: PathBuf,
    pub stack_home: PathBuf,
    pub stack_file: PathBuf,
}

#[allow(dead_code)]
impl Fixture {
    /// Project with `public_html`, valid compose file
    pub fn scaffolded() -> Self {
        Self::build(true, true)
    }

    /// Project without `public_html`, valid compose file
    pub fn bare() -> Self {
        Self::build(false, true)
    }

    /// Project with `public_html`, compose file missing
    pub fn without_stack_file() -> Self {
        Self::build(true, false)
    }

    fn build(public_html: bool, write_stack_file: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project_dir = dir.path().join("my-site");
        std::fs::create_dir_all(&project_dir).unwrap();
        if public_html {
            std::fs::create_dir_all(project_dir.join("public_html")).unwrap();
        }

        let stack_home = dir.path().join("stack");
        let template = stack_home.join("demo-site-folder").join("public_html");
        std::fs::create_dir_all(&template).unwrap();
        std::fs::write(template.join("index.php"), "<?php phpinfo();\n").unwrap();

        let stack_file = stack_home.join("docker-compose.yml");
        if write_stack_file {
            std::fs::write(&stack_file, "services: {}\n").unwrap();
        }

        Self {
            _dir: dir,
            project_dir,
            stack_home,
            stack_file,
        }
    }

    pub fn stack_env(&self) -> StackEnv {
        StackEnv {
            stack_file: Some(self.stack_file.clone()),
            stack_home: Some(self.stack_home.clone()),
        }
    }
}

/// Build an app over the mocks; keep clones of the mocks to inspect calls
#[allow(dead_code)]
pub fn test_app(runtime: &MockRuntime, runner: &MockRunner, fixture: &Fixture) -> App {
    let manager = StackManager::new(
        Box::new(runtime.clone()),
        Box::new(runner.clone()),
        fixture.stack_env(),
        fast_config(),
    );
    App::new(manager, fixture.project_dir.clone())
}

/// Build an app, detect the project and wait for the first container refresh
#[allow(dead_code)]
pub async fn started_app(runtime: &MockRuntime, runner: &MockRunner, fixture: &Fixture) -> App {
    let mut app = test_app(runtime, runner, fixture);
    app.init();
    assert!(
        app.run_until(WAIT, |a| a.state.last_refreshed.is_some()).await,
        "initial refresh never arrived"
    );
    app
}
