// RTMP constants

/// Protocol version (C0 / S0)
pub const RTMP_VERSION: u8 = 3;

/// Size of C1, S1, C2 and S2
pub const RTMP_HANDSHAKE_SIZE: usize = 1536;

/// Fixed value written at offset 8 of S2
pub const RTMP_HANDSHAKE_S2_MARKER: u32 = 345345435;

/// Default chunk size, before any set chunk size message
pub const RTMP_CHUNK_SIZE: usize = 128;

/// Largest value representable by a 3-byte header field
pub const RTMP_MAX_HEADER_FIELD: u32 = 0xffffff;

/// Value of the timestamp field signaling an extended timestamp
pub const RTMP_EXTENDED_TIMESTAMP_MARK: u32 = 0xffffff;

/// Stream id returned to createStream
pub const RTMP_CREATE_STREAM_ID: u32 = 4;

// Chunk types
pub const RTMP_CHUNK_TYPE_0: u8 = 0; // 11-bytes: timestamp(3) + length(3) + stream type(1) + stream id(4)
pub const RTMP_CHUNK_TYPE_1: u8 = 1; // 7-bytes: delta(3) + length(3) + stream type(1)
pub const RTMP_CHUNK_TYPE_2: u8 = 2; // 3-bytes: delta(3)
pub const RTMP_CHUNK_TYPE_3: u8 = 3; // 0-byte

// RTMP channel used for commands
pub const RTMP_CHANNEL_INVOKE: u32 = 3;

/// Gets the message header size for a chunk format
pub fn get_rtmp_header_size(format: u8) -> usize {
    match format {
        RTMP_CHUNK_TYPE_0 => 11,
        RTMP_CHUNK_TYPE_1 => 7,
        RTMP_CHUNK_TYPE_2 => 3,
        _ => 0,
    }
}

// Packet types

/* Protocol Control Messages */
pub const RTMP_TYPE_SET_CHUNK_SIZE: u8 = 1;
pub const RTMP_TYPE_WINDOW_ACKNOWLEDGEMENT_SIZE: u8 = 5; // server bandwidth
pub const RTMP_TYPE_SET_PEER_BANDWIDTH: u8 = 6; // client bandwidth

/* User Control Messages Event (4) */
pub const RTMP_TYPE_EVENT: u8 = 4;

pub const RTMP_TYPE_AUDIO: u8 = 8;
pub const RTMP_TYPE_VIDEO: u8 = 9;

/* Command Message */
pub const RTMP_TYPE_FLEX_MESSAGE: u8 = 0x11; // AMF3
pub const RTMP_TYPE_INVOKE: u8 = 0x14; // AMF0

/* Data Message */
pub const RTMP_TYPE_DATA: u8 = 0x12; // AMF0

// Peer bandwidth limit type sent on connect
pub const RTMP_PEER_BANDWIDTH_LIMIT_SOFT: u8 = 1;
