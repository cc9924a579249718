use std::sync::Arc;

use tokio::sync::Mutex;

use super::{LiveStream, RtmpServerStatus};

/// Registers a live stream for a publish name
///
/// If the name was already published, the previous live stream is
/// replaced and its pullers are dropped, so their responses end.
///
/// # Arguments
///
/// * `status` - The server status
/// * `stream_name` - Publish name
///
/// # Return value
///
/// Returns the new live stream, to be kept by the publishing session
pub async fn set_publisher(
    status: &Mutex<RtmpServerStatus>,
    stream_name: &str,
) -> Arc<Mutex<LiveStream>> {
    let live_stream = Arc::new(Mutex::new(LiveStream::new()));

    let mut status_v = status.lock().await;
    let previous = status_v
        .streams
        .insert(stream_name.to_string(), live_stream.clone());
    drop(status_v);

    if let Some(previous_mu) = previous {
        let mut previous_stream = previous_mu.lock().await;
        previous_stream.clear_pullers();
    }

    live_stream
}

// Tests
