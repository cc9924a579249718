// Play command

use crate::{log::Logger, log_debug};

/// Handles RTMP command: PLAY
///
/// Streams are only pulled over HTTP, so play gets no response
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `trans_id` - Transaction ID
/// * `name` - Requested stream name
///
/// # Return value
///
/// Returns true to continue receiving chunks
pub fn handle_rtmp_command_play(logger: &Logger, trans_id: f64, name: &str) -> bool {
    log_debug!(
        logger,
        format!(
            "Play requested for {} (transaction {}), not supported over RTMP",
            name, trans_id
        )
    );

    true
}
