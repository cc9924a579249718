// Connect command

use tokio::{io::AsyncWrite, sync::Mutex};

use crate::{
    log::Logger,
    log_debug, log_error, log_info,
    rtmp::{
        rtmp_make_connect_response, rtmp_make_peer_bandwidth_set_message, rtmp_make_window_ack,
        RtmpConnectCommand, RTMP_PEER_BANDWIDTH_LIMIT_SOFT,
    },
    server::RtmpServerContext,
};

use super::super::session_write_bytes;

/// Handles RTMP command: CONNECT
///
/// Replies with window acknowledgement size, peer bandwidth and _result
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `server_context` - The server context
/// * `write_stream` - The stream to write to the client
/// * `cmd` - The command
///
/// # Return value
///
/// Returns true to continue receiving chunks. Returns false to end the session main loop.
pub async fn handle_rtmp_command_connect<TW: AsyncWrite + Send + Unpin>(
    logger: &Logger,
    server_context: &RtmpServerContext,
    write_stream: &Mutex<TW>,
    cmd: &RtmpConnectCommand,
) -> bool {
    if server_context.config.log_requests {
        log_info!(
            logger,
            format!(
                "Connect: app={}, flashVer={}, tcUrl={}",
                cmd.app, cmd.flashver, cmd.tc_url
            )
        );
    }

    log_debug!(
        logger,
        format!(
            "Connect details: type={}, swfUrl={}, pageUrl={}, fpad={}, audioCodecs={}, videoCodecs={}, videoFunction={}",
            cmd.connection_type,
            cmd.swf_url,
            cmd.page_url,
            cmd.fpad,
            cmd.audio_codecs,
            cmd.video_codecs,
            cmd.video_function
        )
    );

    let response = match rtmp_make_connect_response(cmd.trans_id) {
        Ok(r) => r,
        Err(e) => {
            log_error!(logger, format!("Could not serialize connect response: {}", e));
            return true;
        }
    };

    let mut bytes = rtmp_make_window_ack(server_context.config.window_ack_size);

    bytes.extend(rtmp_make_peer_bandwidth_set_message(
        server_context.config.peer_bandwidth,
        RTMP_PEER_BANDWIDTH_LIMIT_SOFT,
    ));

    bytes.extend(response);

    if let Err(e) = session_write_bytes(write_stream, &bytes).await {
        log_debug!(logger, format!("Send error: Could not send connect response: {}", e));
        return false;
    }

    true
}
