//! Read-only commands: status and config

use super::{find_project, user_error};
use anyhow::Result;
use stackman_config::{GlobalConfig, StackEnv};
use stackman_core::StackManager;
use stackman_provider::{ContainerSnapshot, ContainerStatus};
use std::path::Path;

/// Print the containers of the project in `project_dir`
pub async fn status(manager: &StackManager, project_dir: &Path, json: bool) -> Result<()> {
    let project = find_project(manager, project_dir)?;
    let containers = manager.list_with_stats(&project).await.map_err(user_error)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&containers)?);
        return Ok(());
    }

    if containers.is_empty() {
        println!("No containers found for project '{}'.", project.name);
        println!("\nUse 'stackman up' to start the stack.");
        return Ok(());
    }

    print!("{}", status_table(&containers));
    Ok(())
}

/// Plain-text container table, one row per container
pub fn status_table(containers: &[ContainerSnapshot]) -> String {
    const SERVICE_WIDTH: usize = 16;
    const STATUS_WIDTH: usize = 11;
    const URL_WIDTH: usize = 24;

    let mut out = format!(
        "  {:<SERVICE_WIDTH$} {:<STATUS_WIDTH$} {:<URL_WIDTH$} CPU%\n",
        "SERVICE", "STATUS", "URL"
    );
    out.push_str(&"-".repeat(62));
    out.push('\n');

    for container in containers {
        let symbol = match container.status {
            ContainerStatus::Running => "●",
            ContainerStatus::Stopped => "○",
            ContainerStatus::Restarting => "◐",
            ContainerStatus::Error => "✗",
            ContainerStatus::Unknown => "?",
        };
        let url = if container.url.is_empty() { "-" } else { container.url.as_str() };
        let cpu = if container.is_running() {
            format!("{:.1}", container.cpu_percent)
        } else {
            "-".to_string()
        };

        out.push_str(&format!(
            "{} {:<SERVICE_WIDTH$} {:<STATUS_WIDTH$} {:<URL_WIDTH$} {}\n",
            symbol,
            container.service,
            container.status.to_string(),
            url,
            cpu
        ));
    }

    out
}

/// Show the config file location, the stack file and the effective settings
pub fn config(config: &GlobalConfig, stack: &StackEnv) -> Result<()> {
    let config_path = GlobalConfig::config_path()?;
    println!("Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("  (not created yet, showing defaults)");
    }

    match stack.validate() {
        Ok(path) => println!("Stack file:  {}", path.display()),
        Err(e) => println!("Stack file:  {}", e),
    }

    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
