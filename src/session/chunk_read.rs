// Chunk read logic

use tokio::{io::AsyncWrite, sync::Mutex};

use bytes::BytesMut;

use crate::{
    log::Logger,
    log_error, log_trace,
    rtmp::ChunkDecoder,
    server::RtmpServerContext,
};

use super::{handle_rtmp_packet, SessionContext};

/// Decodes and handles every complete message in the read buffer
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `server_context` - The server context
/// * `session_context` - The session context
/// * `decoder` - The chunk decoder of the session
/// * `buf` - The read buffer
/// * `write_stream` - The stream to write to the client
///
/// # Return value
///
/// Returns true to continue reading. Returns false to end the session main loop.
pub async fn read_rtmp_chunks<TW: AsyncWrite + Send + Unpin>(
    logger: &Logger,
    server_context: &RtmpServerContext,
    session_context: &mut SessionContext,
    decoder: &mut ChunkDecoder,
    buf: &mut BytesMut,
    write_stream: &Mutex<TW>,
) -> bool {
    loop {
        let msg = match decoder.decode(buf) {
            Ok(Some(m)) => m,
            Ok(None) => return true,
            Err(e) => {
                if server_context.config.log_requests {
                    log_error!(logger, format!("Chunk stream error: {}", e));
                }

                return false;
            }
        };

        log_trace!(
            logger,
            format!(
                "Message received: type={}, csid={}, stream={}, length={}, timestamp={}, delta={}",
                msg.header.packet_type,
                msg.header.channel_id,
                msg.header.stream_id,
                msg.header.length,
                msg.header.timestamp,
                decoder.preceding().timestamp_delta
            )
        );

        if !handle_rtmp_packet(
            logger,
            server_context,
            session_context,
            decoder,
            write_stream,
            &msg,
        )
        .await
        {
            return false;
        }
    }
}
