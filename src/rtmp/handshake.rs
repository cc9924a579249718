// RTMP handshake utils

use byteorder::{BigEndian, ByteOrder};
use bytes::{Buf, BytesMut};

use super::{RTMP_HANDSHAKE_S2_MARKER, RTMP_HANDSHAKE_SIZE};

/// Phase of the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    AwaitingC0,
    AwaitingC1,
    AwaitingC2,
    Ready,
}

/// Server side of the simple (unsigned) RTMP handshake
///
/// Bytes are taken from the session read buffer. Whatever is
/// left in the buffer once the phase is Ready belongs to the chunk stream.
pub struct RtmpHandshake {
    phase: HandshakePhase,
}

impl RtmpHandshake {
    /// Creates a handshake waiting for C0
    pub fn new() -> RtmpHandshake {
        RtmpHandshake {
            phase: HandshakePhase::AwaitingC0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> HandshakePhase {
        self.phase
    }

    /// Returns true once C2 was received
    pub fn is_ready(&self) -> bool {
        self.phase == HandshakePhase::Ready
    }

    /// Consumes every complete handshake packet available in the buffer
    ///
    /// # Arguments
    ///
    /// * `buf` - Session read buffer
    ///
    /// # Return value
    ///
    /// Returns the bytes to send to the client (empty if the buffer
    /// did not contain a complete packet)
    pub fn process(&mut self, buf: &mut BytesMut) -> Vec<u8> {
        let mut response: Vec<u8> = Vec::new();

        loop {
            match self.phase {
                HandshakePhase::AwaitingC0 => {
                    if buf.is_empty() {
                        break;
                    }

                    // S0 echoes the version requested by the client
                    response.push(buf.get_u8());
                    self.phase = HandshakePhase::AwaitingC1;
                }
                HandshakePhase::AwaitingC1 => {
                    if buf.len() < RTMP_HANDSHAKE_SIZE {
                        break;
                    }

                    let c1 = buf.split_to(RTMP_HANDSHAKE_SIZE);
                    response.extend(make_s1(&c1));
                    self.phase = HandshakePhase::AwaitingC2;
                }
                HandshakePhase::AwaitingC2 => {
                    if buf.len() < RTMP_HANDSHAKE_SIZE {
                        break;
                    }

                    let c2 = buf.split_to(RTMP_HANDSHAKE_SIZE);
                    response.extend(make_s2(&c2));
                    self.phase = HandshakePhase::Ready;
                }
                HandshakePhase::Ready => break,
            }
        }

        response
    }
}

/// Generates S1 from C1
///
/// The client timestamp and random bytes are echoed back
pub fn make_s1(c1: &[u8]) -> Vec<u8> {
    c1.to_vec()
}

/// Generates S2 from C2
///
/// ts1 (0..4) and ts2 (4..8) are kept, bytes 8..12 are overwritten
/// with a fixed marker and the rest is echoed. Timestamps are not validated.
pub fn make_s2(c2: &[u8]) -> Vec<u8> {
    let mut s2 = c2.to_vec();

    if s2.len() >= 12 {
        BigEndian::write_u32(&mut s2[8..12], RTMP_HANDSHAKE_S2_MARKER);
    }

    s2
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn make_packet(seed: u8) -> Vec<u8> {
        (0..RTMP_HANDSHAKE_SIZE)
            .map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed))
            .collect()
    }

    #[test]
    fn test_s2_layout() {
        let c2 = make_packet(3);
        let s2 = make_s2(&c2);

        assert_eq!(s2.len(), RTMP_HANDSHAKE_SIZE);
        assert_eq!(&s2[0..8], &c2[0..8]);
        assert_eq!(BigEndian::read_u32(&s2[8..12]), 345345435);
        assert_eq!(&s2[12..], &c2[12..]);
    }

    #[test]
    fn test_handshake_phases() {
        let mut hs = RtmpHandshake::new();
        let mut buf = BytesMut::new();

        assert!(hs.process(&mut buf).is_empty());

        let c1 = make_packet(1);
        let c2 = make_packet(2);

        buf.extend_from_slice(&[3]);
        buf.extend_from_slice(&c1[..100]);

        assert_eq!(hs.process(&mut buf), vec![3]);
        assert_eq!(hs.phase(), HandshakePhase::AwaitingC1);
        assert_eq!(buf.len(), 100);

        buf.extend_from_slice(&c1[100..]);

        let s1 = hs.process(&mut buf);
        assert_eq!(s1, c1);
        assert_eq!(hs.phase(), HandshakePhase::AwaitingC2);

        // S2 is not sent until C2 is complete
        buf.extend_from_slice(&c2[..RTMP_HANDSHAKE_SIZE - 1]);
        assert!(hs.process(&mut buf).is_empty());

        buf.extend_from_slice(&c2[RTMP_HANDSHAKE_SIZE - 1..]);
        buf.extend_from_slice(&[0x03, 0xaa]);

        let s2 = hs.process(&mut buf);
        assert_eq!(s2, make_s2(&c2));
        assert!(hs.is_ready());

        // Bytes after C2 are left for the chunk decoder
        assert_eq!(&buf[..], &[0x03, 0xaa]);
    }

    #[test]
    fn test_handshake_single_read() {
        let mut hs = RtmpHandshake::new();
        let mut buf = BytesMut::new();

        let c1 = make_packet(5);
        let c2 = make_packet(6);

        buf.extend_from_slice(&[3]);
        buf.extend_from_slice(&c1);
        buf.extend_from_slice(&c2);

        let response = hs.process(&mut buf);

        assert_eq!(response.len(), 1 + 2 * RTMP_HANDSHAKE_SIZE);
        assert_eq!(response[0], 3);
        assert_eq!(&response[1..1 + RTMP_HANDSHAKE_SIZE], &c1[..]);
        assert!(hs.is_ready());
        assert!(buf.is_empty());
    }
}
