// Invoke packet handling logic

use tokio::{io::AsyncWrite, sync::Mutex};

use crate::{
    log::Logger,
    log_debug, log_error,
    rtmp::{CommandError, RtmpCommand, RtmpMessage},
    server::RtmpServerContext,
};

use super::{
    handle_rtmp_command_connect, handle_rtmp_command_create_stream,
    handle_rtmp_command_delete_stream, handle_rtmp_command_play, handle_rtmp_command_publish,
    SessionContext,
};

/// Handles RTMP packet (INVOKE)
///
/// A command that cannot be parsed is skipped, the session continues
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `server_context` - The server context
/// * `session_context` - The session context
/// * `write_stream` - The stream to write to the client
/// * `msg` - The message
/// * `payload` - The AMF0 encoded command
///
/// # Return value
///
/// Returns true to continue receiving chunks. Returns false to end the session main loop.
pub async fn handle_rtmp_packet_invoke<TW: AsyncWrite + Send + Unpin>(
    logger: &Logger,
    server_context: &RtmpServerContext,
    session_context: &mut SessionContext,
    write_stream: &Mutex<TW>,
    msg: &RtmpMessage,
    payload: &[u8],
) -> bool {
    let cmd = match RtmpCommand::decode(payload) {
        Ok(c) => c,
        Err(CommandError::UnknownCommand(name)) => {
            log_debug!(logger, format!("Ignored command: {}", name));
            return true;
        }
        Err(e) => {
            if server_context.config.log_requests {
                log_error!(logger, format!("Could not parse command: {}", e));
            }
            return true;
        }
    };

    log_debug!(logger, format!("Received command: {:?}", cmd));

    match cmd {
        RtmpCommand::Connect(connect) => {
            handle_rtmp_command_connect(logger, server_context, write_stream, &connect).await
        }
        RtmpCommand::CreateStream { trans_id } => {
            handle_rtmp_command_create_stream(logger, session_context, write_stream, trans_id)
                .await
        }
        RtmpCommand::Publish {
            trans_id,
            name,
            publish_type,
        } => {
            log_debug!(logger, format!("Publish transaction: {}", trans_id));

            handle_rtmp_command_publish(
                logger,
                server_context,
                session_context,
                write_stream,
                msg.header.stream_id,
                &name,
                &publish_type,
            )
            .await
        }
        RtmpCommand::Play { trans_id, name } => handle_rtmp_command_play(logger, trans_id, &name),
        RtmpCommand::DeleteStream {
            trans_id,
            stream_id,
        } => handle_rtmp_command_delete_stream(logger, trans_id, stream_id),
    }
}
