// Chunk stream decoder

use std::cmp;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use bytes::{Buf, BytesMut};

use super::{
    get_rtmp_header_size, ChunkError, RtmpMessage, RtmpMessageHeader, RTMP_CHUNK_SIZE,
    RTMP_CHUNK_TYPE_0, RTMP_CHUNK_TYPE_1, RTMP_CHUNK_TYPE_2, RTMP_CHUNK_TYPE_3,
    RTMP_EXTENDED_TIMESTAMP_MARK,
};

/// Header fields of the last completed message,
/// inherited by the compact chunk formats
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecedingHeader {
    /// Message stream ID
    pub stream_id: u32,

    /// Message length
    pub length: usize,

    /// Message type
    pub packet_type: u8,

    /// Absolute timestamp
    pub timestamp: u32,

    /// Timestamp delta (or absolute timestamp, for format 0)
    pub timestamp_delta: u32,

    /// True if the timestamp field was extended
    pub extended_timestamp: bool,
}

/// Message being reassembled
struct InFlightMessage {
    header: RtmpMessageHeader,
    timestamp_delta: u32,
    extended_timestamp: bool,
    payload: Vec<u8>,
}

/// Result of trying to decode a single chunk
enum ChunkStep {
    /// The buffer does not contain a full chunk
    Incomplete,

    /// A chunk was consumed, the message is not complete yet
    Consumed,

    /// A chunk was consumed and it completed a message
    Complete(RtmpMessage),
}

/// Chunk stream decoder
///
/// Turns the bytes received after the handshake into complete
/// RTMP messages. Only one message can be in flight at a time.
/// Bytes are consumed from the buffer only when a full chunk
/// (header and payload slice) is available, so partial reads
/// never lose parsed state.
pub struct ChunkDecoder {
    /// Inbound chunk size
    chunk_size: usize,

    /// Max accepted message length
    max_message_size: usize,

    /// Fields of the last completed message
    preceding: PrecedingHeader,

    /// Message being reassembled
    in_flight: Option<InFlightMessage>,
}

impl ChunkDecoder {
    /// Creates a new decoder
    ///
    /// # Arguments
    ///
    /// * `max_message_size` - Max accepted message length
    pub fn new(max_message_size: usize) -> ChunkDecoder {
        ChunkDecoder {
            chunk_size: RTMP_CHUNK_SIZE,
            max_message_size,
            preceding: PrecedingHeader::default(),
            in_flight: None,
        }
    }

    /// Current inbound chunk size
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Fields of the last completed message
    pub fn preceding(&self) -> &PrecedingHeader {
        &self.preceding
    }

    /// Sets the inbound chunk size
    ///
    /// # Arguments
    ///
    /// * `payload` - Payload of the set chunk size message
    ///
    /// # Return value
    ///
    /// Returns the new chunk size
    pub fn apply_set_chunk_size(&mut self, payload: &[u8]) -> Result<usize, ChunkError> {
        if payload.len() < 4 {
            return Err(ChunkError::InvalidChunkSize(0));
        }

        let size = BigEndian::read_u32(&payload[0..4]) & 0x7fffffff;

        if size == 0 {
            return Err(ChunkError::InvalidChunkSize(size));
        }

        self.chunk_size = size as usize;

        Ok(self.chunk_size)
    }

    /// Decodes chunks until a message is complete
    ///
    /// # Arguments
    ///
    /// * `buf` - Buffer with the received bytes. Consumed chunks are removed from it.
    ///
    /// # Return value
    ///
    /// Returns the completed message, or None if more bytes are needed
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<RtmpMessage>, ChunkError> {
        loop {
            match self.decode_chunk(buf)? {
                ChunkStep::Incomplete => return Ok(None),
                ChunkStep::Consumed => continue,
                ChunkStep::Complete(msg) => return Ok(Some(msg)),
            }
        }
    }

    fn decode_chunk(&mut self, buf: &mut BytesMut) -> Result<ChunkStep, ChunkError> {
        let (format, channel_id, basic_size) = match RtmpMessage::parse_basic_header(&buf[..]) {
            Some(h) => h,
            None => return Ok(ChunkStep::Incomplete),
        };

        let continuation = match &self.in_flight {
            Some(msg) => {
                if format != RTMP_CHUNK_TYPE_3 || msg.header.channel_id != channel_id {
                    return Err(ChunkError::InterleavedMessage { csid: channel_id });
                }

                true
            }
            None => false,
        };

        let header_size = get_rtmp_header_size(format);
        let mut offset = basic_size + header_size;

        if buf.len() < offset {
            return Ok(ChunkStep::Incomplete);
        }

        let h = &buf[basic_size..offset];

        // Message header fields (3-byte timestamp field, length, type, stream id)

        let mut timestamp_field = if format <= RTMP_CHUNK_TYPE_2 {
            read_u24(&h[0..3])
        } else {
            0
        };

        let (length, packet_type) = if format <= RTMP_CHUNK_TYPE_1 {
            (read_u24(&h[3..6]) as usize, h[6])
        } else {
            (self.preceding.length, self.preceding.packet_type)
        };

        let stream_id = if format == RTMP_CHUNK_TYPE_0 {
            LittleEndian::read_u32(&h[7..11])
        } else {
            self.preceding.stream_id
        };

        // Extended timestamp

        let extended_timestamp = if continuation {
            self.in_flight
                .as_ref()
                .map(|m| m.extended_timestamp)
                .unwrap_or(false)
        } else if format == RTMP_CHUNK_TYPE_3 {
            self.preceding.extended_timestamp
        } else {
            timestamp_field == RTMP_EXTENDED_TIMESTAMP_MARK
        };

        if extended_timestamp {
            if buf.len() < offset + 4 {
                return Ok(ChunkStep::Incomplete);
            }

            timestamp_field = BigEndian::read_u32(&buf[offset..offset + 4]);
            offset += 4;
        }

        if !continuation && length > self.max_message_size {
            return Err(ChunkError::MessageTooLarge {
                length,
                max: self.max_message_size,
            });
        }

        // Payload slice

        let received = self.in_flight.as_ref().map(|m| m.payload.len()).unwrap_or(0);
        let total_length = self
            .in_flight
            .as_ref()
            .map(|m| m.header.length)
            .unwrap_or(length);

        let size_to_read = cmp::min(self.chunk_size, total_length - received);

        if buf.len() < offset + size_to_read {
            return Ok(ChunkStep::Incomplete);
        }

        // The full chunk is available, apply it

        if !continuation {
            let (timestamp, timestamp_delta) = match format {
                RTMP_CHUNK_TYPE_0 => (timestamp_field, timestamp_field),
                RTMP_CHUNK_TYPE_3 => {
                    let delta = if extended_timestamp {
                        timestamp_field
                    } else {
                        self.preceding.timestamp_delta
                    };

                    (self.preceding.timestamp.wrapping_add(delta), delta)
                }
                _ => (
                    self.preceding.timestamp.wrapping_add(timestamp_field),
                    timestamp_field,
                ),
            };

            self.in_flight = Some(InFlightMessage {
                header: RtmpMessageHeader {
                    format,
                    channel_id,
                    timestamp,
                    packet_type,
                    stream_id,
                    length,
                },
                timestamp_delta,
                extended_timestamp,
                payload: Vec::with_capacity(length),
            });
        }

        buf.advance(offset);
        let chunk_payload = buf.split_to(size_to_read);

        let complete = match self.in_flight.as_mut() {
            Some(msg) => {
                msg.payload.extend_from_slice(&chunk_payload);
                msg.payload.len() >= msg.header.length
            }
            None => false,
        };

        if !complete {
            return Ok(ChunkStep::Consumed);
        }

        match self.in_flight.take() {
            Some(msg) => {
                self.preceding = PrecedingHeader {
                    stream_id: msg.header.stream_id,
                    length: msg.header.length,
                    packet_type: msg.header.packet_type,
                    timestamp: msg.header.timestamp,
                    timestamp_delta: msg.timestamp_delta,
                    extended_timestamp: msg.extended_timestamp,
                };

                Ok(ChunkStep::Complete(RtmpMessage {
                    header: msg.header,
                    payload: msg.payload,
                }))
            }
            None => Ok(ChunkStep::Consumed),
        }
    }
}

fn read_u24(b: &[u8]) -> u32 {
    ((b[0] as u32) << 16) | ((b[1] as u32) << 8) | (b[2] as u32)
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 0xffffff;

    fn chunk_header_0(csid: u8, ts: u32, len: usize, t: u8, stream_id: u32) -> Vec<u8> {
        let mut b = vec![csid];
        b.extend(&ts.to_be_bytes()[1..]);
        b.extend(&(len as u32).to_be_bytes()[1..]);
        b.push(t);
        b.extend(stream_id.to_le_bytes());
        b
    }

    /// Splits a payload into fmt0 + fmt3 chunks
    fn chunk_message(csid: u8, ts: u32, t: u8, payload: &[u8], chunk_size: usize) -> Vec<u8> {
        let mut out = chunk_header_0(csid, ts, payload.len(), t, 1);

        for (i, part) in payload.chunks(chunk_size).enumerate() {
            if i > 0 {
                out.push(0xc0 | csid);
            }
            out.extend(part);
        }

        out
    }

    #[test]
    fn test_single_chunk_message() {
        let mut decoder = ChunkDecoder::new(MAX);
        let mut buf = BytesMut::from(&chunk_message(3, 1000, 0x14, &[1, 2, 3], 128)[..]);

        let msg = decoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(msg.header.channel_id, 3);
        assert_eq!(msg.header.timestamp, 1000);
        assert_eq!(msg.header.packet_type, 0x14);
        assert_eq!(msg.header.stream_id, 1);
        assert_eq!(msg.payload, vec![1, 2, 3]);
        assert!(buf.is_empty());

        assert_eq!(decoder.preceding().length, 3);
        assert_eq!(decoder.preceding().timestamp, 1000);
    }

    #[test]
    fn test_reassembly_across_partial_reads() {
        let payload: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let wire = chunk_message(6, 40, 9, &payload, 128);

        // ceil(1000 / 128) = 8 chunks: 1 fmt0 header + 7 fmt3 headers
        assert_eq!(wire.len(), 12 + 7 + payload.len());

        for step in [1usize, 2, 7, 13, 128, 129, 500] {
            let mut decoder = ChunkDecoder::new(MAX);
            let mut buf = BytesMut::new();
            let mut result = None;

            for piece in wire.chunks(step) {
                assert!(result.is_none());

                buf.extend_from_slice(piece);

                if let Some(msg) = decoder.decode(&mut buf).unwrap() {
                    result = Some(msg);
                }
            }

            let msg = result.unwrap();
            assert_eq!(msg.payload, payload, "step {}", step);
            assert_eq!(msg.header.timestamp, 40);
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn test_compact_formats_inherit_fields() {
        let mut decoder = ChunkDecoder::new(MAX);
        let mut buf = BytesMut::new();

        // fmt0: ts 100, len 2, video, stream 1
        buf.extend(chunk_header_0(4, 100, 2, 9, 1));
        buf.extend([0x17, 0x01]);

        // fmt1: delta 33, len 3, audio
        buf.extend([0x44, 0x00, 0x00, 0x21, 0x00, 0x00, 0x03, 0x08]);
        buf.extend([0xaf, 0x01, 0x02]);

        // fmt2: delta 20
        buf.extend([0x84, 0x00, 0x00, 0x14]);
        buf.extend([0xaf, 0x01, 0x03]);

        // fmt3: everything inherited, delta re-applied
        buf.extend([0xc4]);
        buf.extend([0xaf, 0x01, 0x04]);

        let m1 = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!((m1.header.timestamp, m1.header.packet_type), (100, 9));

        let m2 = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(m2.header.timestamp, 133);
        assert_eq!(m2.header.packet_type, 8);
        assert_eq!(m2.header.stream_id, 1);
        assert_eq!(m2.payload, vec![0xaf, 0x01, 0x02]);

        let m3 = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(m3.header.timestamp, 153);
        assert_eq!(m3.header.length, 3);
        assert_eq!(m3.header.packet_type, 8);
        assert_eq!(m3.payload, vec![0xaf, 0x01, 0x03]);

        let m4 = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(m4.header.timestamp, 173);
        assert_eq!(m4.payload, vec![0xaf, 0x01, 0x04]);

        assert!(decoder.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_extended_timestamp() {
        let mut decoder = ChunkDecoder::new(MAX);
        let mut buf = BytesMut::new();

        let payload = vec![7u8; 200];

        buf.extend(chunk_header_0(3, 0xffffff, payload.len(), 0x14, 0));
        buf.extend(0x01020304u32.to_be_bytes());
        buf.extend(&payload[..128]);
        buf.extend([0xc3]);
        buf.extend(0x01020304u32.to_be_bytes());

        // Partial: the continuation payload is missing
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend(&payload[128..]);

        let msg = decoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(msg.header.timestamp, 0x01020304);
        assert_eq!(msg.payload, payload);
        assert!(decoder.preceding().extended_timestamp);
    }

    #[test]
    fn test_set_chunk_size() {
        let mut decoder = ChunkDecoder::new(MAX);

        assert_eq!(
            decoder.apply_set_chunk_size(&[0x80, 0x00, 0x10, 0x00]).unwrap(),
            4096
        );
        assert_eq!(decoder.chunk_size(), 4096);

        assert_eq!(
            decoder.apply_set_chunk_size(&[0, 0, 0, 0]),
            Err(ChunkError::InvalidChunkSize(0))
        );
        assert!(decoder.apply_set_chunk_size(&[0, 1]).is_err());
        assert_eq!(decoder.chunk_size(), 4096);

        let payload = vec![1u8; 3000];
        let mut buf = BytesMut::from(&chunk_message(8, 0, 9, &payload, 4096)[..]);

        assert_eq!(decoder.decode(&mut buf).unwrap().unwrap().payload, payload);
    }

    #[test]
    fn test_extended_chunk_stream_ids() {
        let mut decoder = ChunkDecoder::new(MAX);
        let mut buf = BytesMut::new();

        // csid 64 + 0x0100 = 320, 3-byte form
        buf.extend([0x01, 0x01, 0x00]);
        buf.extend(&chunk_header_0(0, 0, 1, 9, 1)[1..]);
        buf.extend([0x55]);

        let msg = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.header.channel_id, 320);

        // csid 64 + 10 = 74, 2-byte form
        buf.extend([0x00, 0x0a]);
        buf.extend(&chunk_header_0(0, 0, 1, 9, 1)[1..]);
        buf.extend([0x56]);

        let msg = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.header.channel_id, 74);
    }

    #[test]
    fn test_interleaved_message_is_rejected() {
        let mut decoder = ChunkDecoder::new(MAX);
        let mut buf = BytesMut::new();

        buf.extend(chunk_header_0(4, 0, 200, 9, 1));
        buf.extend(vec![0u8; 128]);
        buf.extend(chunk_header_0(5, 0, 2, 8, 1));
        buf.extend([0xaf, 0x00]);

        assert_eq!(
            decoder.decode(&mut buf),
            Err(ChunkError::InterleavedMessage { csid: 5 })
        );
    }

    #[test]
    fn test_message_too_large() {
        let mut decoder = ChunkDecoder::new(1024);
        let mut buf = BytesMut::from(&chunk_header_0(4, 0, 2048, 9, 1)[..]);

        assert_eq!(
            decoder.decode(&mut buf),
            Err(ChunkError::MessageTooLarge {
                length: 2048,
                max: 1024
            })
        );
    }

    #[test]
    fn test_empty_message() {
        let mut decoder = ChunkDecoder::new(MAX);
        let mut buf = BytesMut::from(&chunk_header_0(3, 0, 0, 0x14, 0)[..]);

        let msg = decoder.decode(&mut buf).unwrap().unwrap();
        assert!(msg.payload.is_empty());
        assert!(buf.is_empty());
    }
}
