// Publish command

use tokio::{io::AsyncWrite, sync::Mutex};

use crate::{
    log::Logger,
    log_debug, log_error, log_info,
    rtmp::rtmp_make_status_message,
    server::{set_publisher, RtmpServerContext},
};

use super::super::{session_write_bytes, SessionContext};

/// Handles RTMP command: PUBLISH
///
/// Registers the live stream, replacing any previous stream with the same name
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `server_context` - The server context
/// * `session_context` - The session context
/// * `write_stream` - The stream to write to the client
/// * `stream_id` - Message stream ID of the publish command
/// * `name` - Publishing name
/// * `publish_type` - Publishing type (live, record, append)
///
/// # Return value
///
/// Returns true to continue receiving chunks. Returns false to end the session main loop.
pub async fn handle_rtmp_command_publish<TW: AsyncWrite + Send + Unpin>(
    logger: &Logger,
    server_context: &RtmpServerContext,
    session_context: &mut SessionContext,
    write_stream: &Mutex<TW>,
    stream_id: u32,
    name: &str,
    publish_type: &str,
) -> bool {
    let live_stream = set_publisher(&server_context.status, name).await;

    session_context.live_stream = Some(live_stream);
    session_context.publish_name = Some(name.to_string());

    if server_context.config.log_requests {
        log_info!(
            logger,
            format!(
                "Publish: session={}, name={}, type={}",
                session_context.id, name, publish_type
            )
        );
    }

    let status = match rtmp_make_status_message(
        stream_id,
        "status",
        "NetStream.Play.Start",
        "Start publishing",
    ) {
        Ok(s) => s,
        Err(e) => {
            log_error!(logger, format!("Could not serialize publish status: {}", e));
            return true;
        }
    };

    if let Err(e) = session_write_bytes(write_stream, &status).await {
        log_debug!(logger, format!("Send error: Could not send publish status: {}", e));
        return false;
    }

    true
}
