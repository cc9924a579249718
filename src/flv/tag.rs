// FLV tag packer

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};

/// Size of the FLV tag header
pub const FLV_TAG_HEADER_SIZE: usize = 11;

/// Size of the FLV file header
pub const FLV_HEADER_SIZE: usize = 9;

/// Size of the "previous tag size" field between tags
pub const FLV_PREVIOUS_TAG_SIZE: usize = 4;

// Tag types (same values as the RTMP message type ids)
pub const FLV_TAG_TYPE_AUDIO: u8 = 8;
pub const FLV_TAG_TYPE_VIDEO: u8 = 9;
pub const FLV_TAG_TYPE_SCRIPT: u8 = 18;

/// Returns the FLV file header: "FLV", version 1, audio + video flags, header length 9
pub fn flv_header() -> [u8; FLV_HEADER_SIZE] {
    [b'F', b'L', b'V', 0x01, 0x05, 0x00, 0x00, 0x00, 0x09]
}

/// Packs a FLV tag
///
/// Layout: type (1), payload size (3, BE), timestamp (3, BE),
/// reserved (1, always 0), stream id (3, always 0), payload.
///
/// The trailing "previous tag size" is not included; the output
/// stage writes it in front of the next tag.
///
/// # Arguments
///
/// * `tag_type` - Tag type (8 = audio, 9 = video, 18 = script)
/// * `timestamp` - Timestamp in milliseconds. Only the lower 24 bits are written
/// * `payload` - Raw media payload
pub fn pack_tag(tag_type: u8, timestamp: u32, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(FLV_TAG_HEADER_SIZE + payload.len());

    let mut b = [0u8; 4];

    buf.put_u8(tag_type);

    BigEndian::write_u32(&mut b, payload.len() as u32);
    buf.put_slice(&b[1..]);

    BigEndian::write_u32(&mut b, timestamp);
    buf.put_slice(&b[1..]);

    buf.put_u8(0);
    buf.put_slice(&[0, 0, 0]);

    buf.put_slice(payload);

    buf.freeze()
}

/// Checks if a video payload starts a key frame (frame type 1 in the high nibble)
pub fn is_video_key_frame(payload: &[u8]) -> bool {
    matches!(payload.first(), Some(b) if b & 0xf0 == 0x10)
}

/// Checks if an audio or video payload is a codec configuration
/// (AAC / AVC sequence header: packet type byte is 0)
pub fn is_sequence_header(payload: &[u8]) -> bool {
    payload.len() >= 2 && payload[1] == 0
}

// Tests
