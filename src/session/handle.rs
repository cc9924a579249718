// Logic to handle RTMP sessions

use std::sync::Arc;

use bytes::BytesMut;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite},
    sync::Mutex,
};

use crate::{
    log::Logger,
    log_debug, log_error, log_info, log_warning,
    rtmp::{ChunkDecoder, HandshakePhase, RtmpHandshake, RTMP_HANDSHAKE_SIZE, RTMP_VERSION},
    server::RtmpServerContext,
};

use super::{read_rtmp_chunks, session_write_bytes, SessionContext};

/// Initial capacity of the read buffer
const READ_BUFFER_SIZE: usize = 4096;

/// Handles RTMP session
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `server_context` - The server context
/// * `session_id` - The session ID
/// * `read_stream` - The stream to read from the client
/// * `write_stream` - The stream to write to the client
pub async fn handle_rtmp_session<
    TR: AsyncRead + Send + Unpin,
    TW: AsyncWrite + Send + Unpin + 'static,
>(
    logger: Arc<Logger>,
    server_context: RtmpServerContext,
    session_id: u64,
    mut read_stream: TR,
    write_stream: Arc<Mutex<TW>>,
) {
    let mut buf = BytesMut::with_capacity(READ_BUFFER_SIZE + RTMP_HANDSHAKE_SIZE);

    ////////////////////
    //    Handshake   //
    ////////////////////

    let mut handshake = RtmpHandshake::new();

    while !handshake.is_ready() {
        match read_stream.read_buf(&mut buf).await {
            Ok(0) => {
                log_debug!(logger, "BAD HANDSHAKE: Connection closed by the client");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                log_debug!(logger, format!("BAD HANDSHAKE: Could not read: {}", e));
                return;
            }
        }

        if handshake.phase() == HandshakePhase::AwaitingC0 {
            if let Some(version) = buf.first() {
                if *version != RTMP_VERSION {
                    log_warning!(
                        logger,
                        format!("Unexpected protocol version requested: {}", version)
                    );
                }
            }
        }

        let response = handshake.process(&mut buf);

        if response.is_empty() {
            continue;
        }

        if let Err(e) = session_write_bytes(&write_stream, &response).await {
            if server_context.config.log_requests {
                log_error!(
                    logger,
                    format!("BAD HANDSHAKE: Could not send handshake response: {}", e)
                );
            }
            return;
        }
    }

    log_debug!(logger, "Handshake successful. Entering main loop...");

    ////////////////////
    //    Main loop   //
    ////////////////////

    let mut session_context = SessionContext::new(session_id);
    let mut decoder = ChunkDecoder::new(server_context.config.max_message_size);

    loop {
        // Bytes left after the handshake may already contain chunks
        if !read_rtmp_chunks(
            &logger,
            &server_context,
            &mut session_context,
            &mut decoder,
            &mut buf,
            &write_stream,
        )
        .await
        {
            break;
        }

        match read_stream.read_buf(&mut buf).await {
            Ok(0) => {
                log_debug!(logger, "Connection closed by the client");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                log_debug!(logger, format!("Could not read from the client: {}", e));
                break;
            }
        }
    }

    if server_context.config.log_requests {
        if let Some(name) = &session_context.publish_name {
            log_info!(logger, format!("Publisher of {} disconnected", name));
        }
    }
}

// Tests
