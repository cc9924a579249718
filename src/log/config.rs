// Log config

use crate::utils::get_env_bool;

/// Logger configuration
#[derive(Clone)]
pub struct LogConfig {
    // Prefix for all the logs
    pub prefix: String,

    // Error messages enabled?
    pub error_enabled: bool,

    // Warning messages enabled?
    pub warning_enabled: bool,

    // Info messages enabled?
    pub info_enabled: bool,

    // Debug messages enabled?
    pub debug_enabled: bool,

    // Trace messages enabled?
    pub trace_enabled: bool,
}

impl LogConfig {
    /// Loads the log levels from the environment
    ///
    /// LOG_TRACE defaults to the value of LOG_DEBUG
    pub fn load_from_env() -> LogConfig {
        let debug_enabled = get_env_bool("LOG_DEBUG", false);

        LogConfig {
            prefix: "".to_string(),
            error_enabled: get_env_bool("LOG_ERROR", true),
            warning_enabled: get_env_bool("LOG_WARNING", true),
            info_enabled: get_env_bool("LOG_INFO", true),
            debug_enabled,
            trace_enabled: get_env_bool("LOG_TRACE", debug_enabled),
        }
    }

    /// Configuration with every level disabled
    #[cfg(test)]
    pub fn disabled() -> LogConfig {
        LogConfig {
            prefix: String::new(),
            error_enabled: false,
            warning_enabled: false,
            info_enabled: false,
            debug_enabled: false,
            trace_enabled: false,
        }
    }

    /// Creates a child configuration for a child logger
    ///
    /// The prefix parameter is appended to the parent's prefix
    pub fn child_config(&self, prefix: &str) -> LogConfig {
        LogConfig {
            prefix: format!("{}{}", self.prefix, prefix),
            ..self.clone()
        }
    }
}

// Tests
