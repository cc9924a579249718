// Logic to handle data packets

use crate::{
    amf::{amf0_decode_string, AMFDecodingCursor},
    flv::{pack_tag, FLV_TAG_TYPE_SCRIPT},
    log::Logger,
    log_debug, log_trace,
    rtmp::RtmpMessage,
};

use super::SessionContext;

/// Name of the wrapper command sent by encoders before the metadata
const SET_DATA_FRAME: &str = "@setDataFrame";

/// Name of the metadata message
const ON_METADATA: &str = "onMetaData";

/// Handles DATA RTMP packet
///
/// Keeps the stream metadata as an FLV script tag, so it can be sent to new pullers
///
/// # Arguments
///
/// * `logger` - The session logger
/// * `session_context` - The session context
/// * `msg` - The message
///
/// # Return value
///
/// Returns true to continue receiving chunks. Returns false to end the session main loop.
pub fn handle_rtmp_packet_data(
    logger: &Logger,
    session_context: &mut SessionContext,
    msg: &RtmpMessage,
) -> bool {
    let mut cursor = AMFDecodingCursor::new(&msg.payload);

    let mut name = match amf0_decode_string(&mut cursor) {
        Ok(n) => n,
        Err(e) => {
            log_debug!(logger, format!("Could not parse data message: {}", e));
            return true;
        }
    };

    let mut start = cursor.position();

    if name == SET_DATA_FRAME {
        name = match amf0_decode_string(&mut cursor) {
            Ok(n) => n,
            Err(e) => {
                log_debug!(logger, format!("Could not parse data frame: {}", e));
                return true;
            }
        };
    } else {
        start = 0;
    }

    if name != ON_METADATA {
        log_trace!(logger, format!("Ignored data message: {}", name));
        return true;
    }

    session_context.bootstrap.metadata =
        Some(pack_tag(FLV_TAG_TYPE_SCRIPT, 0, &msg.payload[start..]));

    log_debug!(logger, "Stream metadata updated");

    true
}

// Tests
