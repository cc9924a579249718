// RTMP message generators

use byteorder::{BigEndian, ByteOrder};

use crate::amf::{
    amf0_encode_null, amf0_encode_number, amf0_encode_object, amf0_encode_string, AMF0Value,
};

use super::{ChunkError, RtmpMessage, RTMP_CHANNEL_INVOKE, RTMP_CHUNK_SIZE, RTMP_TYPE_INVOKE};

/// Server version reported in the connect response
pub const RTMP_SERVER_FMS_VERSION: &str = "FMS/3,0,1,123";

/// Capabilities reported in the connect response
pub const RTMP_SERVER_CAPABILITIES: f64 = 31.0;

/// Makes RTMP window ACK
pub fn rtmp_make_window_ack(size: u32) -> Vec<u8> {
    let mut b = vec![
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ];

    BigEndian::write_u32(&mut b[12..16], size);

    b
}

/// Makes RTMP control message to indicate peer bandwidth
pub fn rtmp_make_peer_bandwidth_set_message(size: u32, limit_type: u8) -> Vec<u8> {
    let mut b = vec![
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ];

    BigEndian::write_u32(&mut b[12..16], size);
    b[16] = limit_type;

    b
}

/// Makes RTMP invoke (AMF0 command) message
///
/// The payload is split using the default chunk size, since the
/// server never changes its outbound chunk size
///
/// # Arguments
///
/// * `payload` - Encoded AMF0 command
/// * `stream_id` - Message stream ID
pub fn rtmp_make_invoke_message(payload: Vec<u8>, stream_id: u32) -> Result<Vec<u8>, ChunkError> {
    RtmpMessage::new(RTMP_CHANNEL_INVOKE, RTMP_TYPE_INVOKE, stream_id, payload)
        .serialize_chunks(RTMP_CHUNK_SIZE)
}

/// Makes the _result response for connect
pub fn rtmp_make_connect_response(trans_id: f64) -> Result<Vec<u8>, ChunkError> {
    let mut payload: Vec<u8> = Vec::new();

    amf0_encode_string(&mut payload, "_result");
    amf0_encode_number(&mut payload, trans_id);

    amf0_encode_object(
        &mut payload,
        &[
            (
                "fmsVer",
                AMF0Value::String(RTMP_SERVER_FMS_VERSION.to_string()),
            ),
            ("capabilities", AMF0Value::Number(RTMP_SERVER_CAPABILITIES)),
        ],
    );

    amf0_encode_object(
        &mut payload,
        &[
            ("level", AMF0Value::String("status".to_string())),
            (
                "code",
                AMF0Value::String("NetConnection.Connect.Success".to_string()),
            ),
            (
                "description",
                AMF0Value::String("Connection succeeded.".to_string()),
            ),
        ],
    );

    rtmp_make_invoke_message(payload, 0)
}

/// Makes the _result response for createStream
pub fn rtmp_make_create_stream_response(
    trans_id: f64,
    stream_id: u32,
) -> Result<Vec<u8>, ChunkError> {
    let mut payload: Vec<u8> = Vec::new();

    amf0_encode_string(&mut payload, "_result");
    amf0_encode_number(&mut payload, trans_id);
    amf0_encode_null(&mut payload);
    amf0_encode_number(&mut payload, stream_id as f64);

    rtmp_make_invoke_message(payload, 0)
}

/// Makes RTMP status message (onStatus)
///
/// # Arguments
///
/// * `stream_id` - Message stream ID
/// * `level` - Status level
/// * `code` - Status code
/// * `description` - Human readable description
pub fn rtmp_make_status_message(
    stream_id: u32,
    level: &str,
    code: &str,
    description: &str,
) -> Result<Vec<u8>, ChunkError> {
    let mut payload: Vec<u8> = Vec::new();

    amf0_encode_string(&mut payload, "onStatus");
    amf0_encode_number(&mut payload, 0.0);
    amf0_encode_null(&mut payload);

    amf0_encode_object(
        &mut payload,
        &[
            ("level", AMF0Value::String(level.to_string())),
            ("code", AMF0Value::String(code.to_string())),
            ("description", AMF0Value::String(description.to_string())),
        ],
    );

    rtmp_make_invoke_message(payload, stream_id)
}

// Tests
