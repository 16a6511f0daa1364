//! Whole-stack compose commands: up, down, restart, destroy

use super::{find_project, user_error};
use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Input};
use stackman_core::StackManager;
use stackman_provider::ComposeOperation;
use stackman_tui::confirm::{FIRST_ANSWER, SECOND_ANSWER};
use std::path::Path;

/// Run a compose operation to completion and print its output
pub async fn compose(
    manager: &StackManager,
    project_dir: &Path,
    operation: ComposeOperation,
) -> Result<()> {
    let project = find_project(manager, project_dir)?;

    println!("{} ({})", operation.progress_label(), project.name);
    let output = manager.run(operation, &project).await.map_err(user_error)?;

    let text = output.combined_output.trim_end();
    if !text.is_empty() {
        println!("{}", text);
    }

    if !output.success {
        bail!(
            "docker compose {} failed: {}",
            operation,
            output.error.as_deref().unwrap_or("unknown error")
        );
    }

    println!("Stack {} finished", operation);
    Ok(())
}

/// Destroy the stack and its volumes after a two-step confirmation
///
/// `skip_confirm` bypasses both prompts. Without it, a non-interactive stdin
/// is refused rather than assumed to agree.
pub async fn destroy(manager: &StackManager, project_dir: &Path, skip_confirm: bool) -> Result<()> {
    let project = find_project(manager, project_dir)?;

    // Fail on a bad stack file before asking anything
    manager.target_for(&project).map_err(user_error)?;

    if !skip_confirm {
        if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
            bail!("Refusing to destroy '{}' without confirmation; pass --yes", project.name);
        }

        println!("Destroy the stack for '{}'?", project.name);
        println!("  Warning: containers and named volumes (databases) will be deleted");

        if !confirm_answer("Step 1 of 2", FIRST_ANSWER)? || !confirm_answer("Step 2 of 2", SECOND_ANSWER)? {
            println!("Destroy cancelled.");
            return Ok(());
        }
    }

    compose(manager, project_dir, ComposeOperation::Destroy).await
}

fn confirm_answer(step: &str, answer: &str) -> Result<bool> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{}: type '{}' to continue", step, answer))
        .allow_empty(true)
        .interact_text()?;
    Ok(input == answer)
}
