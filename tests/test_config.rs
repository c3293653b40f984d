use std::time::Duration;

use clap::Parser;
use tinypulse::config::{ConfigError, MIN_SAMPLE_WINDOW};
use tinypulse::{AgentConfig, Cli};

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tinypulse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        let config = AgentConfig::try_from(&cli).unwrap();

        assert_eq!(config.server.as_str(), "http://localhost:5000/");
        assert_eq!(config.endpoint.as_str(), "http://localhost:5000/api/metrics");
        assert_eq!(config.interval, Duration::from_secs(3));
        assert_eq!(config.profile_id, 1);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.sampling.cpu_window, MIN_SAMPLE_WINDOW);
        assert_eq!(config.sampling.net_window, MIN_SAMPLE_WINDOW);
        assert_eq!(config.max_ticks, None);
        assert_eq!(config.route_probe.to_string(), "8.8.8.8:80");
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "--server",
            "http://10.0.0.5:8080",
            "--interval",
            "15",
            "--profile",
            "-4",
            "--timeout",
            "2",
            "--sample-window-ms",
            "750",
            "--count",
            "5",
            "--route-probe",
            "1.1.1.1:53",
            "-vv",
        ]);
        let config = AgentConfig::try_from(&cli).unwrap();

        assert_eq!(config.endpoint.as_str(), "http://10.0.0.5:8080/api/metrics");
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.profile_id, -4);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.sampling.cpu_window, Duration::from_millis(750));
        assert_eq!(config.max_ticks, Some(5));
        assert_eq!(config.route_probe.to_string(), "1.1.1.1:53");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        for args in [
            &["tinypulse", "--interval", "0"][..],
            &["tinypulse", "--sample-window-ms", "100"][..],
            &["tinypulse", "--timeout", "0"][..],
            &["tinypulse", "--count", "0"][..],
            &["tinypulse", "--route-probe", "nowhere"][..],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?} should be rejected");
        }
    }

    #[test]
    fn test_invalid_server_is_config_error() {
        let cli = parse(&["--server", "localhost:5000/x y"]);
        let err = AgentConfig::try_from(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidServer { .. }));
    }
}
