// Log module

mod config;
mod logger;

pub use config::*;
pub use logger::*;

#[macro_export]
macro_rules! log_error {
    // The message is only formatted if the level is enabled
    ($logger:expr, $msg:expr) => {
        if $logger.is_enabled($crate::log::LogLevel::Error) {
            $logger.log($crate::log::LogLevel::Error, &format!("{}", $msg));
        }
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $msg:expr) => {
        if $logger.is_enabled($crate::log::LogLevel::Warning) {
            $logger.log($crate::log::LogLevel::Warning, &format!("{}", $msg));
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $msg:expr) => {
        if $logger.is_enabled($crate::log::LogLevel::Info) {
            $logger.log($crate::log::LogLevel::Info, &format!("{}", $msg));
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $msg:expr) => {
        if $logger.is_enabled($crate::log::LogLevel::Debug) {
            $logger.log($crate::log::LogLevel::Debug, &format!("{}", $msg));
        }
    };
}

#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $msg:expr) => {
        if $logger.is_enabled($crate::log::LogLevel::Trace) {
            $logger.log($crate::log::LogLevel::Trace, &format!("{}", $msg));
        }
    };
}
