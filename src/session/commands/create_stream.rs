// Create stream command

use tokio::{io::AsyncWrite, sync::Mutex};

use crate::{
    log::Logger,
    log_debug, log_error,
    rtmp::{rtmp_make_create_stream_response, RTMP_CREATE_STREAM_ID},
};

use super::super::{session_write_bytes, SessionContext};

/// Handles RTMP command: CREATE STREAM
///
/// Only one stream is allowed per connection. A second call ends the session.
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `session_context` - The session context
/// * `write_stream` - The stream to write to the client
/// * `trans_id` - Transaction ID
///
/// # Return value
///
/// Returns true to continue receiving chunks. Returns false to end the session main loop.
pub async fn handle_rtmp_command_create_stream<TW: AsyncWrite + Send + Unpin>(
    logger: &Logger,
    session_context: &mut SessionContext,
    write_stream: &Mutex<TW>,
    trans_id: f64,
) -> bool {
    if session_context.stream_created {
        log_debug!(logger, "Command error: createStream called twice");
        return false;
    }

    session_context.stream_created = true;

    let response = match rtmp_make_create_stream_response(trans_id, RTMP_CREATE_STREAM_ID) {
        Ok(r) => r,
        Err(e) => {
            log_error!(logger, format!("Could not serialize createStream response: {}", e));
            return true;
        }
    };

    if let Err(e) = session_write_bytes(write_stream, &response).await {
        log_debug!(logger, format!("Send error: Could not send createStream response: {}", e));
        return false;
    }

    true
}
