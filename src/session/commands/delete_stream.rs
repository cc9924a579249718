// Delete stream command

use crate::{log::Logger, log_debug};

/// Handles RTMP command: DELETE STREAM
///
/// # Return value
///
/// Always returns false, the session ends
pub fn handle_rtmp_command_delete_stream(
    logger: &Logger,
    trans_id: f64,
    stream_id: f64,
) -> bool {
    log_debug!(
        logger,
        format!(
            "Stream {} deleted (transaction {}), closing session",
            stream_id, trans_id
        )
    );

    false
}
