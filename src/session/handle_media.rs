// Logic to handle audio and video packets

use bytes::Bytes;

use crate::{
    flv::{is_sequence_header, is_video_key_frame, pack_tag, FLV_TAG_TYPE_AUDIO, FLV_TAG_TYPE_VIDEO},
    log::Logger,
    log_trace,
    rtmp::{RtmpMessage, RTMP_TYPE_AUDIO},
};

use super::SessionContext;

/// Handles AUDIO and VIDEO RTMP packets
///
/// Packs the message as an FLV tag and sends it to the pullers
/// of the stream being published. Media received before publish is ignored.
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
pub async fn handle_rtmp_packet_media(
    logger: &Logger,
    session_context: &mut SessionContext,
    msg: &RtmpMessage,
) -> bool {
    let live_stream = match &session_context.live_stream {
        Some(s) => s.clone(),
        None => {
            log_trace!(logger, "Media received before publish, ignored");
            return true;
        }
    };

    if msg.payload.is_empty() {
        return true;
    }

    let tag_type = if msg.header.packet_type == RTMP_TYPE_AUDIO {
        FLV_TAG_TYPE_AUDIO
    } else {
        FLV_TAG_TYPE_VIDEO
    };

    let tag: Bytes = pack_tag(tag_type, msg.header.timestamp, &msg.payload);

    if is_sequence_header(&msg.payload) {
        if tag_type == FLV_TAG_TYPE_AUDIO {
            log_trace!(logger, "Audio codec configuration updated");
            session_context.bootstrap.audio_config = Some(tag.clone());
        } else {
            log_trace!(logger, "Video codec configuration updated");
            session_context.bootstrap.video_config = Some(tag.clone());
        }
    }

    let key_frame = tag_type == FLV_TAG_TYPE_VIDEO && is_video_key_frame(&msg.payload);

    let stats = {
        let mut live_stream_v = live_stream.lock().await;
        live_stream_v.dispatch_tag(tag_type, key_frame, tag, &session_context.bootstrap)
    };

    if stats.dropped > 0 || stats.reaped > 0 {
        log_trace!(
            logger,
            format!(
                "Dispatch: delivered={}, dropped={}, reaped={}",
                stats.delivered, stats.dropped, stats.reaped
            )
        );
    }

    true
}

// Tests

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, sync::Arc};

    use tokio::sync::Mutex;

    use super::*;

    use crate::{
        rtmp::{RtmpMessage, RTMP_TYPE_VIDEO},
        server::LiveStream,
    };

    #[tokio::test]
    async fn test_media_is_dispatched_and_configs_replaced() {
        let logger = Logger::new_disabled();
        let live_stream = Arc::new(Mutex::new(LiveStream::new()));

        let mut session_context = SessionContext::new(1);
        session_context.live_stream = Some(live_stream.clone());

        let (mut receiver, _recycle) = live_stream
            .lock()
            .await
            .add_puller(SocketAddr::from(([127, 0, 0, 1], 9000)), 10);

        let seq_a = RtmpMessage::new(6, RTMP_TYPE_VIDEO, 1, vec![0x17, 0x00, 0xaa]);
        let seq_b = RtmpMessage::new(6, RTMP_TYPE_VIDEO, 1, vec![0x17, 0x00, 0xbb]);

        assert!(handle_rtmp_packet_media(&logger, &mut session_context, &seq_a).await);
        assert!(handle_rtmp_packet_media(&logger, &mut session_context, &seq_b).await);

        assert_eq!(
            session_context.bootstrap.video_config,
            Some(pack_tag(FLV_TAG_TYPE_VIDEO, 0, &[0x17, 0x00, 0xbb]))
        );

        // Each sequence header is received once, even the one that bootstrapped the puller
        assert_eq!(
            receiver.try_recv().unwrap(),
            pack_tag(FLV_TAG_TYPE_VIDEO, 0, &[0x17, 0x00, 0xaa])
        );
        assert_eq!(
            receiver.try_recv().unwrap(),
            pack_tag(FLV_TAG_TYPE_VIDEO, 0, &[0x17, 0x00, 0xbb])
        );

        let audio = RtmpMessage::new(4, RTMP_TYPE_AUDIO, 1, vec![0xaf, 0x01, 0x10]);
        assert!(handle_rtmp_packet_media(&logger, &mut session_context, &audio).await);
        assert!(session_context.bootstrap.audio_config.is_none());

        let mut received = Vec::new();
        while let Ok(t) = receiver.try_recv() {
            received.push(t);
        }

        assert_eq!(
            received.last(),
            Some(&pack_tag(FLV_TAG_TYPE_AUDIO, 0, &[0xaf, 0x01, 0x10]))
        );
    }

    #[tokio::test]
    async fn test_media_before_publish_is_ignored() {
        let logger = Logger::new_disabled();
        let mut session_context = SessionContext::new(1);

        let msg = RtmpMessage::new(6, RTMP_TYPE_VIDEO, 1, vec![0x17, 0x01, 0x00]);

        assert!(handle_rtmp_packet_media(&logger, &mut session_context, &msg).await);
        assert!(session_context.bootstrap.video_config.is_none());
    }
}
