// FLV puller, the consuming side of a subscriber channel

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::sync::mpsc::Receiver;

use crate::flv::{flv_header, FLV_PREVIOUS_TAG_SIZE};

/// Reads the tags queued for a puller and frames them as a FLV byte stream
///
/// The first chunk is the FLV header. Each following chunk is the
/// previous tag size (4 bytes, big endian) followed by the next tag.
///
/// Dropping the puller marks it for recycling, so the next
/// fan-out pass removes it from the live stream.
pub struct FlvPuller {
    /// Receiver of FLV tags
    receiver: Receiver<Bytes>,

    /// Recycle flag, shared with the live stream
    recycle: Arc<AtomicBool>,

    /// True once the FLV header was returned
    header_sent: bool,

    /// Size of the last returned tag
    previous_tag_size: u32,
}

impl FlvPuller {
    /// Creates a new puller
    pub fn new(receiver: Receiver<Bytes>, recycle: Arc<AtomicBool>) -> FlvPuller {
        FlvPuller {
            receiver,
            recycle,
            header_sent: false,
            previous_tag_size: 0,
        }
    }

    /// Gets the next chunk of the byte stream
    ///
    /// Waits for the publisher if no tag is queued.
    /// Returns None once the live stream dropped the puller.
    pub async fn next_chunk(&mut self) -> Option<Bytes> {
        if !self.header_sent {
            self.header_sent = true;
            return Some(Bytes::copy_from_slice(&flv_header()));
        }

        let tag = self.receiver.recv().await?;

        let mut chunk = BytesMut::with_capacity(FLV_PREVIOUS_TAG_SIZE + tag.len());
        chunk.put_u32(self.previous_tag_size);
        chunk.put_slice(&tag);

        self.previous_tag_size = tag.len() as u32;

        Some(chunk.freeze())
    }
}

impl Drop for FlvPuller {
    fn drop(&mut self) {
        self.recycle.store(true, Ordering::Release);
    }
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    use crate::flv::{pack_tag, FLV_TAG_TYPE_AUDIO};

    #[tokio::test]
    async fn test_puller_framing() {
        let (sender, receiver) = tokio::sync::mpsc::channel::<Bytes>(4);
        let recycle = Arc::new(AtomicBool::new(false));

        let mut puller = FlvPuller::new(receiver, recycle.clone());

        let tag1 = pack_tag(FLV_TAG_TYPE_AUDIO, 0, &[0xaf, 0x00, 0x12, 0x10]);
        let tag2 = pack_tag(FLV_TAG_TYPE_AUDIO, 23, &[0xaf, 0x01]);

        sender.try_send(tag1.clone()).unwrap();
        sender.try_send(tag2.clone()).unwrap();

        assert_eq!(&puller.next_chunk().await.unwrap()[..], &flv_header());

        let chunk = puller.next_chunk().await.unwrap();
        assert_eq!(&chunk[..4], &[0, 0, 0, 0]);
        assert_eq!(&chunk[4..], &tag1[..]);

        let chunk = puller.next_chunk().await.unwrap();
        assert_eq!(&chunk[..4], &(tag1.len() as u32).to_be_bytes());
        assert_eq!(&chunk[4..], &tag2[..]);

        drop(sender);
        assert!(puller.next_chunk().await.is_none());

        assert!(!recycle.load(Ordering::Acquire));
        drop(puller);
        assert!(recycle.load(Ordering::Acquire));
    }
}
