// Live stream status and fan-out

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use bytes::Bytes;
use tokio::sync::mpsc::{error::TrySendError, Receiver, Sender};

use crate::flv::FLV_TAG_TYPE_VIDEO;

/// Tags replayed to a puller before anything else
///
/// Kept by the publishing session, replaced each time
/// a new sequence header or metadata message arrives.
#[derive(Clone, Default)]
pub struct StreamBootstrap {
    /// Script tag with the stream metadata
    pub metadata: Option<Bytes>,

    /// Audio codec configuration tag (AAC sequence header)
    pub audio_config: Option<Bytes>,

    /// Video codec configuration tag (AVC sequence header)
    pub video_config: Option<Bytes>,
}

impl StreamBootstrap {
    /// Iterates the available tags, in replay order
    pub fn tags(&self) -> impl Iterator<Item = &Bytes> {
        [&self.metadata, &self.audio_config, &self.video_config]
            .into_iter()
            .flatten()
            .filter(|t| !t.is_empty())
    }
}

/// Status of a puller (HTTP subscriber)
pub struct RtmpPullerStatus {
    /// Sender of FLV tags to the HTTP response
    pub sender: Sender<Bytes>,

    /// True once the bootstrap tags were queued
    pub bootstrapped: bool,

    /// Private replay of the GOP cache
    pub replay: VecDeque<Bytes>,

    /// Set by the HTTP side when it stops consuming
    pub recycle: Arc<AtomicBool>,
}

/// Counters of a single fan-out pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Tags queued
    pub delivered: usize,

    /// Tags dropped because a channel was full
    pub dropped: usize,

    /// Pullers removed
    pub reaped: usize,
}

/// Live stream status
pub struct LiveStream {
    /// Tags since the last video key frame
    pub gop_cache: VecDeque<Bytes>,

    /// Pullers, by client address
    pub pullers: HashMap<SocketAddr, RtmpPullerStatus>,
}

impl LiveStream {
    /// Creates a new instance of LiveStream
    pub fn new() -> LiveStream {
        LiveStream {
            gop_cache: VecDeque::new(),
            pullers: HashMap::new(),
        }
    }

    /// Registers a puller
    ///
    /// # Arguments
    ///
    /// * `addr` - Client address
    /// * `capacity` - Capacity of the channel of tags
    ///
    /// # Return value
    ///
    /// Returns the receiving end of the channel and the recycle flag
    pub fn add_puller(
        &mut self,
        addr: SocketAddr,
        capacity: usize,
    ) -> (Receiver<Bytes>, Arc<AtomicBool>) {
        let (sender, receiver) = tokio::sync::mpsc::channel::<Bytes>(capacity);
        let recycle = Arc::new(AtomicBool::new(false));

        self.pullers.insert(
            addr,
            RtmpPullerStatus {
                sender,
                bootstrapped: false,
                replay: VecDeque::new(),
                recycle: recycle.clone(),
            },
        );

        (receiver, recycle)
    }

    /// Removes all the pullers, closing their channels
    pub fn clear_pullers(&mut self) {
        self.pullers.clear();
    }

    /// Stores a tag and sends it to the pullers
    ///
    /// The GOP cache is reset on every video key frame. A puller that joined
    /// mid-GOP gets the cached frames first, one per video tag, and drops what
    /// is left of that replay at the next key frame, where it becomes live.
    /// Sends never block: if the channel of a puller is full, the tag is
    /// dropped for that puller.
    ///
    /// # Arguments
    ///
    /// * `tag_type` - FLV tag type
    /// * `key_frame` - True if the tag is a video key frame
    /// * `tag` - Packed FLV tag
    /// * `bootstrap` - Tags to send first to new pullers
    pub fn dispatch_tag(
        &mut self,
        tag_type: u8,
        key_frame: bool,
        tag: Bytes,
        bootstrap: &StreamBootstrap,
    ) -> DispatchStats {
        let is_video = tag_type == FLV_TAG_TYPE_VIDEO;

        if is_video {
            if key_frame {
                self.gop_cache.clear();
            }

            self.gop_cache.push_back(tag.clone());
        }

        let mut stats = DispatchStats::default();

        // The tag being dispatched is the last cache entry,
        // new pullers get it through their own replay
        let gop_snapshot_len = if is_video {
            self.gop_cache.len() - 1
        } else {
            self.gop_cache.len()
        };

        let gop_cache = &self.gop_cache;

        self.pullers.retain(|_, puller| {
            if puller.recycle.load(Ordering::Acquire) {
                stats.reaped += 1;
                return false;
            }

            if !puller.bootstrapped {
                // The tag being dispatched goes out below, do not send it twice
                for t in bootstrap.tags().filter(|t| **t != tag) {
                    match puller.sender.try_send(t.clone()) {
                        Ok(()) => stats.delivered += 1,
                        Err(TrySendError::Full(_)) => stats.dropped += 1,
                        Err(TrySendError::Closed(_)) => {
                            stats.reaped += 1;
                            return false;
                        }
                    }
                }

                puller
                    .replay
                    .extend(gop_cache.iter().take(gop_snapshot_len).cloned());

                puller.bootstrapped = true;
            }

            if is_video && key_frame {
                puller.replay.clear();
            }

            let next = if is_video {
                puller.replay.push_back(tag.clone());
                puller.replay.pop_front()
            } else {
                Some(tag.clone())
            };

            if let Some(t) = next {
                match puller.sender.try_send(t) {
                    Ok(()) => stats.delivered += 1,
                    Err(TrySendError::Full(_)) => stats.dropped += 1,
                    Err(TrySendError::Closed(_)) => {
                        stats.reaped += 1;
                        return false;
                    }
                }
            }

            true
        });

        stats
    }
}

// Tests
