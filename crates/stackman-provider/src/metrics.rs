//! CPU usage and access URL derivation

/// Cumulative CPU counters from one stats sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuUsage {
    /// Container CPU time (`cpu_usage.total_usage`)
    pub total: u64,
    /// Host CPU time (`system_cpu_usage`)
    pub system: u64,
}

/// CPU percentage between two samples, scaled by the number of CPUs
///
/// Returns 0 unless both the container and system counters advanced.
pub fn cpu_percent(previous: CpuUsage, current: CpuUsage, num_cpus: usize) -> f64 {
    let cpu_delta = current.total as f64 - previous.total as f64;
    let system_delta = current.system as f64 - previous.system as f64;
    let num_cpus = if num_cpus == 0 { 1 } else { num_cpus };

    if system_delta > 0.0 && cpu_delta > 0.0 {
        (cpu_delta / system_delta) * num_cpus as f64 * 100.0
    } else {
        0.0
    }
}

/// Access URL for a compose service, using the conventional host ports
pub fn url_for_service(service: &str) -> String {
    url_for_service_with_port(service, None)
}

/// Access URL for a compose service, preferring a published host port
///
/// Service names are matched case-sensitively.
pub fn url_for_service_with_port(service: &str, published: Option<u16>) -> String {
    if service.contains("nginx") {
        format!("http://localhost:{}", published.unwrap_or(80))
    } else if service.contains("phpmyadmin") {
        format!("http://localhost:{}", published.unwrap_or(8081))
    } else if service.contains("mariadb") || service.contains("mysql") {
        format!("localhost:{}", published.unwrap_or(3306))
    } else if service.contains("apache") {
        "internal".to_string()
    } else {
        String::new()
    }
}

/// Container-side port whose host binding carries the service URL
pub fn service_private_port(service: &str) -> Option<u16> {
    if service.contains("nginx") || service.contains("phpmyadmin") {
        Some(80)
    } else if service.contains("mariadb") || service.contains("mysql") {
        Some(3306)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_percent_two_cpus() {
        let previous = CpuUsage {
            total: 1_000_000,
            system: 10_000_000,
        };
        let current = CpuUsage {
            total: 2_000_000,
            system: 20_000_000,
        };
        let pct = cpu_percent(previous, current, 2);
        assert!((pct - 20.0).abs() < 1e-9, "got {}", pct);
    }

    #[test]
    fn test_cpu_percent_zero_system_delta() {
        let sample = CpuUsage {
            total: 5_000,
            system: 10_000,
        };
        let current = CpuUsage {
            total: 9_000,
            system: 10_000,
        };
        assert_eq!(cpu_percent(sample, current, 4), 0.0);
    }

    #[test]
    fn test_cpu_percent_counter_reset() {
        let previous = CpuUsage {
            total: 9_000,
            system: 10_000,
        };
        let current = CpuUsage {
            total: 1_000,
            system: 20_000,
        };
        assert_eq!(cpu_percent(previous, current, 1), 0.0);
    }

    #[test]
    fn test_cpu_percent_zero_cpus_falls_back_to_one() {
        let previous = CpuUsage::default();
        let current = CpuUsage {
            total: 250,
            system: 1_000,
        };
        assert!((cpu_percent(previous, current, 0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_url_mapping() {
        assert_eq!(url_for_service("nginx"), "http://localhost:80");
        assert_eq!(url_for_service("phpmyadmin"), "http://localhost:8081");
        assert_eq!(url_for_service("mariadb"), "localhost:3306");
        assert_eq!(url_for_service("mysql"), "localhost:3306");
        assert_eq!(url_for_service("apache"), "internal");
        assert_eq!(url_for_service("redis"), "");
    }

    #[test]
    fn test_url_mapping_is_substring_and_case_sensitive() {
        assert_eq!(url_for_service("site-nginx-1"), "http://localhost:80");
        assert_eq!(url_for_service("legacy_mysql"), "localhost:3306");
        assert_eq!(url_for_service("site-NGINX-1"), "");
        assert_eq!(service_private_port("MariaDB"), None);
    }

    #[test]
    fn test_url_uses_published_port() {
        assert_eq!(
            url_for_service_with_port("nginx", Some(8080)),
            "http://localhost:8080"
        );
        assert_eq!(url_for_service_with_port("apache", Some(8080)), "internal");
        assert_eq!(service_private_port("mariadb"), Some(3306));
        assert_eq!(service_private_port("apache"), None);
    }
}
