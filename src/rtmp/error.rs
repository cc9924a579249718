// RTMP error types

use thiserror::Error;

use crate::amf::AmfDecodeError;

/// Framing error, fatal for the connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// Chunk stream ids 0 and 1 are reserved for the extended basic header forms
    #[error("invalid chunk stream id: {0}")]
    InvalidChunkStreamId(u32),

    /// Chunk format outside 0..=3
    #[error("invalid chunk format: {0}")]
    InvalidFormat(u8),

    /// Declared message length above the accepted maximum
    #[error("message too large: {length} bytes (max {max})")]
    MessageTooLarge { length: usize, max: usize },

    /// Timestamp that cannot be written in a 3-byte field
    #[error("timestamp does not fit in the header: {0}")]
    TimestampOverflow(u32),

    /// A new message header arrived before the previous message was complete
    #[error("message interleaved on chunk stream {csid} before the previous message was complete")]
    InterleavedMessage { csid: u32 },

    /// Set chunk size with a zero value
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(u32),
}

/// Error parsing a command message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    Amf(#[from] AmfDecodeError),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
