// RTMP message model

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::{
    ChunkError, RTMP_CHUNK_TYPE_0, RTMP_CHUNK_TYPE_1, RTMP_CHUNK_TYPE_2, RTMP_CHUNK_TYPE_3,
    RTMP_MAX_HEADER_FIELD,
};

/// Header of a complete RTMP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtmpMessageHeader {
    /// Chunk format used to send the message
    pub format: u8,

    /// Chunk stream ID
    pub channel_id: u32,

    /// Absolute timestamp (milliseconds)
    pub timestamp: u32,

    /// Message type
    pub packet_type: u8,

    /// Message stream ID
    pub stream_id: u32,

    /// Payload length
    pub length: usize,
}

/// RTMP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtmpMessage {
    /// Message header
    pub header: RtmpMessageHeader,

    /// Message payload
    pub payload: Vec<u8>,
}

impl RtmpMessage {
    /// Creates a format 0 message with the given payload
    ///
    /// # Arguments
    ///
    /// * `channel_id` - Chunk stream ID
    /// * `packet_type` - Message type
    /// * `stream_id` - Message stream ID
    /// * `payload` - Message payload
    pub fn new(channel_id: u32, packet_type: u8, stream_id: u32, payload: Vec<u8>) -> RtmpMessage {
        RtmpMessage {
            header: RtmpMessageHeader {
                format: RTMP_CHUNK_TYPE_0,
                channel_id,
                timestamp: 0,
                packet_type,
                stream_id,
                length: payload.len(),
            },
            payload,
        }
    }

    /// Serializes a basic header for a RTMP chunk
    ///
    /// # Arguments
    ///
    /// * `format` - Chunk format (0..=3)
    /// * `channel_id` - Chunk stream ID (2..=65599)
    pub fn serialize_basic_header(format: u8, channel_id: u32) -> Result<Vec<u8>, ChunkError> {
        if format > RTMP_CHUNK_TYPE_3 {
            return Err(ChunkError::InvalidFormat(format));
        }

        let fmt_bits = format << 6;

        match channel_id {
            0 | 1 => Err(ChunkError::InvalidChunkStreamId(channel_id)),
            2..=63 => Ok(vec![fmt_bits | (channel_id as u8)]),
            64..=319 => Ok(vec![fmt_bits, (channel_id - 64) as u8]),
            320..=65599 => {
                let mut b = [0u8; 2];
                BigEndian::write_u16(&mut b, (channel_id - 64) as u16);

                Ok(vec![fmt_bits | 1, b[0], b[1]])
            }
            _ => Err(ChunkError::InvalidChunkStreamId(channel_id)),
        }
    }

    /// Parses a basic header
    ///
    /// # Return value
    ///
    /// Returns (format, channel id, header size), or None if the
    /// buffer is too short to contain the full basic header
    pub fn parse_basic_header(buf: &[u8]) -> Option<(u8, u32, usize)> {
        let first = *buf.first()?;

        let format = first >> 6;

        match first & 0x3f {
            0 => {
                let b = *buf.get(1)?;
                Some((format, 64 + b as u32, 2))
            }
            1 => {
                if buf.len() < 3 {
                    return None;
                }

                Some((format, 64 + BigEndian::read_u16(&buf[1..3]) as u32, 3))
            }
            low => Some((format, low as u32, 1)),
        }
    }

    /// Serializes the message header for the message format
    pub fn serialize_chunk_message_header(&self) -> Result<Vec<u8>, ChunkError> {
        let mut out: Vec<u8> = Vec::new();
        let mut b = [0u8; 4];

        if self.header.format <= RTMP_CHUNK_TYPE_2 {
            if self.header.timestamp > RTMP_MAX_HEADER_FIELD {
                return Err(ChunkError::TimestampOverflow(self.header.timestamp));
            }

            BigEndian::write_u32(&mut b, self.header.timestamp);
            out.extend(&b[1..]);
        }

        if self.header.format <= RTMP_CHUNK_TYPE_1 {
            if self.header.length > RTMP_MAX_HEADER_FIELD as usize {
                return Err(ChunkError::MessageTooLarge {
                    length: self.header.length,
                    max: RTMP_MAX_HEADER_FIELD as usize,
                });
            }

            BigEndian::write_u32(&mut b, self.header.length as u32);
            out.extend(&b[1..]);
            out.push(self.header.packet_type);
        }

        if self.header.format == RTMP_CHUNK_TYPE_0 {
            LittleEndian::write_u32(&mut b, self.header.stream_id);
            out.extend(b);
        }

        Ok(out)
    }

    /// Serializes the message as a single chunk
    ///
    /// Outgoing messages are control and command messages,
    /// so they are never split by the chunk size.
    pub fn serialize(&self) -> Result<Vec<u8>, ChunkError> {
        let mut out = Self::serialize_basic_header(self.header.format, self.header.channel_id)?;

        out.extend(self.serialize_chunk_message_header()?);
        out.extend(&self.payload);

        Ok(out)
    }

    /// Serializes the message split by the chunk size
    ///
    /// The first chunk carries the message header, the rest are format 3 continuations
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Maximum payload size of a chunk
    pub fn serialize_chunks(&self, chunk_size: usize) -> Result<Vec<u8>, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize(0));
        }

        let mut out = Self::serialize_basic_header(self.header.format, self.header.channel_id)?;
        out.extend(self.serialize_chunk_message_header()?);

        let continuation = Self::serialize_basic_header(RTMP_CHUNK_TYPE_3, self.header.channel_id)?;

        for (i, part) in self.payload.chunks(chunk_size).enumerate() {
            if i > 0 {
                out.extend(&continuation);
            }

            out.extend(part);
        }

        Ok(out)
    }
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header_boundaries() {
        for csid in [2u32, 63, 64, 319, 320, 65599] {
            for format in 0..=3u8 {
                let bytes = RtmpMessage::serialize_basic_header(format, csid).unwrap();

                let expected_size = match csid {
                    2..=63 => 1,
                    64..=319 => 2,
                    _ => 3,
                };

                assert_eq!(bytes.len(), expected_size, "csid {}", csid);
                assert_eq!(
                    RtmpMessage::parse_basic_header(&bytes),
                    Some((format, csid, expected_size))
                );
            }
        }
    }

    #[test]
    fn test_basic_header_extended_forms() {
        assert_eq!(
            RtmpMessage::serialize_basic_header(0, 64).unwrap(),
            vec![0x00, 0x00]
        );
        assert_eq!(
            RtmpMessage::serialize_basic_header(1, 320).unwrap(),
            vec![0x41, 0x01, 0x00]
        );
        assert_eq!(
            RtmpMessage::serialize_basic_header(3, 65599).unwrap(),
            vec![0xc1, 0xff, 0xff]
        );
    }

    #[test]
    fn test_basic_header_errors() {
        assert_eq!(
            RtmpMessage::serialize_basic_header(0, 1),
            Err(ChunkError::InvalidChunkStreamId(1))
        );
        assert_eq!(
            RtmpMessage::serialize_basic_header(0, 65600),
            Err(ChunkError::InvalidChunkStreamId(65600))
        );
        assert_eq!(
            RtmpMessage::serialize_basic_header(4, 3),
            Err(ChunkError::InvalidFormat(4))
        );

        assert_eq!(RtmpMessage::parse_basic_header(&[]), None);
        assert_eq!(RtmpMessage::parse_basic_header(&[0x00]), None);
        assert_eq!(RtmpMessage::parse_basic_header(&[0x01, 0x00]), None);
    }

    #[test]
    fn test_serialize_format_0() {
        let mut msg = RtmpMessage::new(3, 0x14, 0x01020304, vec![0xaa, 0xbb]);
        msg.header.timestamp = 0x000102;

        assert_eq!(
            msg.serialize().unwrap(),
            vec![
                0x03, // basic header
                0x00, 0x01, 0x02, // timestamp
                0x00, 0x00, 0x02, // length
                0x14, // type
                0x04, 0x03, 0x02, 0x01, // stream id (LE)
                0xaa, 0xbb,
            ]
        );
    }

    #[test]
    fn test_serialize_compact_formats() {
        let mut msg = RtmpMessage::new(3, 0x14, 1, vec![0x01]);

        msg.header.format = RTMP_CHUNK_TYPE_1;
        msg.header.timestamp = 5;
        assert_eq!(
            msg.serialize().unwrap(),
            vec![0x43, 0x00, 0x00, 0x05, 0x00, 0x00, 0x01, 0x14, 0x01]
        );

        msg.header.format = RTMP_CHUNK_TYPE_2;
        assert_eq!(
            msg.serialize().unwrap(),
            vec![0x83, 0x00, 0x00, 0x05, 0x01]
        );
    }

    #[test]
    fn test_serialize_chunks() {
        let payload: Vec<u8> = (0..10).collect();
        let msg = RtmpMessage::new(3, 0x14, 0, payload);

        let bytes = msg.serialize_chunks(4).unwrap();

        assert_eq!(&bytes[..12], &msg.serialize().unwrap()[..12]);
        assert_eq!(
            &bytes[12..],
            &[0, 1, 2, 3, 0xc3, 4, 5, 6, 7, 0xc3, 8, 9]
        );

        // Small messages are a single chunk
        assert_eq!(msg.serialize_chunks(128).unwrap(), msg.serialize().unwrap());

        assert_eq!(
            msg.serialize_chunks(0),
            Err(ChunkError::InvalidChunkSize(0))
        );
    }

    #[test]
    fn test_serialize_rejects_unrepresentable_fields() {
        let mut msg = RtmpMessage::new(3, 0x14, 0, vec![]);
        msg.header.timestamp = 0x1000000;

        assert_eq!(
            msg.serialize(),
            Err(ChunkError::TimestampOverflow(0x1000000))
        );

        let mut msg = RtmpMessage::new(3, 0x14, 0, vec![]);
        msg.header.length = 0x1000000;

        assert!(matches!(
            msg.serialize(),
            Err(ChunkError::MessageTooLarge { .. })
        ));
    }
}
