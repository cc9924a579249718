// Logic to handle RTMP messages

use tokio::{io::AsyncWrite, sync::Mutex};

use crate::{
    log::Logger,
    log_debug, log_error, log_trace,
    rtmp::{
        ChunkDecoder, RtmpMessage, RTMP_TYPE_AUDIO, RTMP_TYPE_DATA, RTMP_TYPE_EVENT,
        RTMP_TYPE_FLEX_MESSAGE, RTMP_TYPE_INVOKE, RTMP_TYPE_SET_CHUNK_SIZE,
        RTMP_TYPE_SET_PEER_BANDWIDTH, RTMP_TYPE_VIDEO, RTMP_TYPE_WINDOW_ACKNOWLEDGEMENT_SIZE,
    },
    server::RtmpServerContext,
};

use super::{handle_rtmp_packet_data, handle_rtmp_packet_invoke, handle_rtmp_packet_media, SessionContext};

/// Handles a complete RTMP message
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `server_context` - The server context
/// * `session_context` - The session context
/// * `decoder` - The chunk decoder of the session
/// * `write_stream` - The stream to write to the client
/// * `msg` - The message
///
/// # Return value
///
/// Returns true to continue receiving chunks. Returns false to end the session main loop.
pub async fn handle_rtmp_packet<TW: AsyncWrite + Send + Unpin>(
    logger: &Logger,
    server_context: &RtmpServerContext,
    session_context: &mut SessionContext,
    decoder: &mut ChunkDecoder,
    write_stream: &Mutex<TW>,
    msg: &RtmpMessage,
) -> bool {
    match msg.header.packet_type {
        RTMP_TYPE_SET_CHUNK_SIZE => match decoder.apply_set_chunk_size(&msg.payload) {
            Ok(_) => {
                log_debug!(logger, format!("Chunk size set to {}", decoder.chunk_size()));
                true
            }
            Err(e) => {
                if server_context.config.log_requests {
                    log_error!(logger, format!("Chunk stream error: {}", e));
                }
                false
            }
        },
        RTMP_TYPE_EVENT | RTMP_TYPE_WINDOW_ACKNOWLEDGEMENT_SIZE | RTMP_TYPE_SET_PEER_BANDWIDTH => {
            log_trace!(
                logger,
                format!("Ignored control message: type {}", msg.header.packet_type)
            );
            true
        }
        RTMP_TYPE_AUDIO | RTMP_TYPE_VIDEO => {
            handle_rtmp_packet_media(logger, session_context, msg).await
        }
        RTMP_TYPE_FLEX_MESSAGE => {
            // AMF3 command: the first byte is the format selector, the rest is AMF0
            if msg.payload.is_empty() {
                return true;
            }

            handle_rtmp_packet_invoke(
                logger,
                server_context,
                session_context,
                write_stream,
                msg,
                &msg.payload[1..],
            )
            .await
        }
        RTMP_TYPE_INVOKE => {
            handle_rtmp_packet_invoke(
                logger,
                server_context,
                session_context,
                write_stream,
                msg,
                &msg.payload,
            )
            .await
        }
        RTMP_TYPE_DATA => handle_rtmp_packet_data(logger, session_context, msg),
        t => {
            log_debug!(logger, format!("Ignored message of type {}", t));
            true
        }
    }
}
