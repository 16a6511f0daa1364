//! Short, actionable error messages for the dashboard

use regex::Regex;
use stackman_provider::ContainerAction;
use std::sync::LazyLock;

/// Longest error excerpt echoed back to the user
pub const MAX_DETAIL_LEN: usize = 100;

static PORT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)port\s+(\d+)").expect("port pattern is valid"));

static PORT_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\d+)").expect("port suffix pattern is valid"));

fn is_port_conflict(lower: &str) -> bool {
    lower.contains("port is already allocated") || lower.contains("address already in use")
}

fn is_daemon_down(lower: &str) -> bool {
    lower.contains("cannot connect to the docker daemon")
        || lower.contains("is the docker daemon running")
        || lower.contains("docker daemon is not running")
        || (lower.contains("connection refused") && lower.contains("docker"))
        || lower.contains("open //./pipe/docker_engine")
        || (lower.contains("the system cannot find the file specified") && lower.contains("docker"))
}

fn is_permission(lower: &str) -> bool {
    lower.contains("permission denied") || lower.contains("access is denied")
}

fn is_timeout(lower: &str) -> bool {
    lower.contains("timeout") || lower.contains("context deadline exceeded")
}

fn is_not_found(lower: &str) -> bool {
    lower.contains("no such container") || lower.contains("not found")
}

/// Pull the conflicting port number out of a docker error
pub fn extract_port(message: &str) -> Option<&str> {
    PORT_WORD
        .captures(message)
        .or_else(|| PORT_COLON.captures(message))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First line of `message`, cut to at most [`MAX_DETAIL_LEN`] characters
pub fn error_excerpt(message: &str) -> String {
    let first = message.lines().next().unwrap_or("").trim_end();
    if first.chars().count() > MAX_DETAIL_LEN {
        let cut: String = first.chars().take(MAX_DETAIL_LEN - 3).collect();
        format!("{}...", cut)
    } else {
        first.to_string()
    }
}

/// Map a raw error message to a sentence the user can act on
pub fn format_user_error(message: &str) -> String {
    let lower = message.to_lowercase();

    if is_port_conflict(&lower) {
        return match extract_port(message) {
            Some(port) => format!(
                "Port {} is already in use. Stop the conflicting service or use a different port.",
                port
            ),
            None => "Port is already in use. Stop the conflicting service or use a different port."
                .to_string(),
        };
    }
    if is_daemon_down(&lower) {
        return "Docker daemon is not running. Start Docker Desktop and try again.".to_string();
    }
    if is_permission(&lower) {
        return "Permission denied. Run Docker as your user or check socket permissions."
            .to_string();
    }
    if is_timeout(&lower) {
        return "Operation timed out. The service may be unresponsive or taking too long to respond."
            .to_string();
    }
    if is_not_found(&lower) {
        return "Container not found. It may have been removed. Try refreshing the view."
            .to_string();
    }

    format!("An error occurred. Details: {}", error_excerpt(message))
}

/// Message for a failed start/stop/restart of one container
pub fn format_action_error(action: ContainerAction, service: &str, message: &str) -> String {
    let lower = message.to_lowercase();
    let verb = action.verb();

    if is_port_conflict(&lower) {
        format!("Port conflict: Cannot {} '{}'. Port already in use.", verb, service)
    } else if is_timeout(&lower) {
        format!(
            "Timeout: Container '{}' took too long to {}. Try again.",
            service, verb
        )
    } else if is_not_found(&lower) {
        format!(
            "Container '{}' not found. It may have been removed. Press 'r' to refresh.",
            service
        )
    } else if is_permission(&lower) {
        "Permission denied. Add your user to the docker group.".to_string()
    } else {
        format!("Failed to {} '{}': {}", verb, service, error_excerpt(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_conflict_with_port() {
        insta::assert_snapshot!(
            format_user_error("Bind for 0.0.0.0:8080 failed: port is already allocated"),
            @"Port 8080 is already in use. Stop the conflicting service or use a different port."
        );
        assert_eq!(
            format_user_error("listen tcp: bind port 443: address already in use"),
            "Port 443 is already in use. Stop the conflicting service or use a different port."
        );
    }

    #[test]
    fn test_port_conflict_without_port() {
        assert_eq!(
            format_user_error("address already in use"),
            "Port is already in use. Stop the conflicting service or use a different port."
        );
    }

    #[test]
    fn test_known_patterns() {
        insta::assert_snapshot!(
            format_user_error("Cannot connect to the Docker daemon at unix:///var/run/docker.sock"),
            @"Docker daemon is not running. Start Docker Desktop and try again."
        );
        insta::assert_snapshot!(
            format_user_error("dial unix /var/run/docker.sock: connect: permission denied"),
            @"Permission denied. Run Docker as your user or check socket permissions."
        );
        insta::assert_snapshot!(
            format_user_error("context deadline exceeded"),
            @"Operation timed out. The service may be unresponsive or taking too long to respond."
        );
        insta::assert_snapshot!(
            format_user_error("Error response from daemon: No such container: abc"),
            @"Container not found. It may have been removed. Try refreshing the view."
        );
    }

    #[test]
    fn test_unknown_error_is_single_line_and_bounded() {
        let long = format!("{}\nsecond line", "x".repeat(150));
        let formatted = format_user_error(&long);
        assert!(!formatted.contains('\n'));

        let detail = formatted
            .strip_prefix("An error occurred. Details: ")
            .unwrap();
        assert_eq!(detail.chars().count(), MAX_DETAIL_LEN);
        assert!(detail.ends_with("..."));
    }

    #[test]
    fn test_short_unknown_error_is_kept() {
        assert_eq!(
            format_user_error("volume is in use"),
            "An error occurred. Details: volume is in use"
        );
    }

    #[test]
    fn test_action_errors() {
        assert_eq!(
            format_action_error(ContainerAction::Start, "nginx", "port is already allocated"),
            "Port conflict: Cannot start 'nginx'. Port already in use."
        );
        assert_eq!(
            format_action_error(ContainerAction::Stop, "mariadb", "Operation timeout"),
            "Timeout: Container 'mariadb' took too long to stop. Try again."
        );
        assert_eq!(
            format_action_error(ContainerAction::Restart, "apache", "weird\nstuff"),
            "Failed to restart 'apache': weird"
        );
    }
}
