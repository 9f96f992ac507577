use std::path::Component;

use super::{types::Config, ConfigError};

/// Validate configuration.
///
/// Every violation is collected; the error lists them sorted by key so an
/// operator can fix the whole file in one pass.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors: Vec<(&'static str, &'static str)> = Vec::new();

    if config.server.port == 0 {
        errors.push(("server.port", "must be a number between 1 and 65535"));
    }

    if let Some(serial) = &config.serial_port {
        if serial.device_file.as_os_str().is_empty() {
            errors.push((
                "serial_port.device_file",
                "must be a serial device file, such as /dev/ttyUSB0",
            ));
        }
    }

    if !(1..=10_000).contains(&config.rating.default_points) {
        errors.push((
            "rating.default_points",
            "must be a number between 1 and 10000. Default: 800",
        ));
    }
    if !(1.0..=100.0).contains(&config.rating.k_factor) {
        errors.push((
            "rating.k_factor",
            "must be a number between 1 and 100. Default: 16",
        ));
    }

    let timings = &config.timings;
    if !(1..=120).contains(&timings.duel) {
        errors.push(("timings.duel", "must be a number between 1 and 120. Default: 20"));
    }
    if !(1..=120).contains(&timings.leaderboard) {
        errors.push((
            "timings.leaderboard",
            "must be a number between 1 and 120. Default: 15",
        ));
    }
    if !(1..=120).contains(&timings.splash_screen) {
        errors.push((
            "timings.splash_screen",
            "must be a number between 1 and 120. Default: 15",
        ));
    }
    if timings.decision > 600 {
        errors.push(("timings.decision", "must be at most 600. Default: 5"));
    }
    if timings.timeout > 600 {
        errors.push(("timings.timeout", "must be at most 600. Default: 3"));
    }
    if timings.error > 600 {
        errors.push(("timings.error", "must be at most 600. Default: 30"));
    }

    if config.matchmaking.pool_size == 0 {
        errors.push(("matchmaking.pool_size", "must be at least 1. Default: 50"));
    }

    let display = &config.display;
    if display.leaderboard_size == 0 {
        errors.push(("display.leaderboard_size", "must be at least 1. Default: 10"));
    }
    if display.images_dir.as_os_str().is_empty() {
        errors.push((
            "display.images_dir",
            "must be the directory holding the image files, e.g. '/srv/artshow/images'",
        ));
    } else if display
        .images_dir
        .components()
        .any(|c| c == Component::ParentDir)
    {
        errors.push((
            "display.images_dir",
            "can't use path element '..', it wouldn't work in URLs",
        ));
    }

    if errors.is_empty() {
        return Ok(());
    }

    errors.sort_by_key(|(key, _)| *key);
    let message = errors
        .iter()
        .map(|(key, msg)| format!("{}: {}", key, msg))
        .collect::<Vec<_>>()
        .join("; ");
    Err(ConfigError::ValidationError(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerialPortConfig;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains("server.port")));
    }

    #[test]
    fn test_validate_reports_all_errors_sorted() {
        let mut config = Config::default();
        config.timings.duel = 0;
        config.rating.k_factor = 0.5;
        config.matchmaking.pool_size = 0;

        let err = validate_config(&config).unwrap_err();
        let ConfigError::ValidationError(message) = err else {
            panic!("expected validation error");
        };
        let keys: Vec<&str> = message
            .split("; ")
            .map(|entry| entry.split(':').next().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec!["matchmaking.pool_size", "rating.k_factor", "timings.duel"]
        );
    }

    #[test]
    fn test_validate_images_dir_rejects_parent_dir() {
        let mut config = Config::default();
        config.display.images_dir = PathBuf::from("images/../secrets");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("display.images_dir"));
    }

    #[test]
    fn test_validate_empty_serial_device() {
        let mut config = Config::default();
        config.serial_port = Some(SerialPortConfig {
            device_file: PathBuf::new(),
        });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("serial_port.device_file"));
    }

    #[test]
    fn test_validate_zero_cooldowns_allowed() {
        let mut config = Config::default();
        config.timings.decision = 0;
        config.timings.timeout = 0;
        config.timings.error = 0;
        assert!(validate_config(&config).is_ok());
    }
}
