//! Custom validation functions for configuration.

use std::path::Path;

use validator::ValidationError;

/// Validate that a log level is one `tracing` understands.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate that an output directory is not the empty path.
pub fn validate_directory(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        Err(ValidationError::new("empty_directory"))
    } else {
        Ok(())
    }
}
