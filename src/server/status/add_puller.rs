use std::net::SocketAddr;

use tokio::sync::Mutex;

use crate::server::FlvPuller;

use super::RtmpServerStatus;

/// Adds a puller to a live stream
///
/// # Arguments
///
/// * `status` - The server status
/// * `stream_name` - Publish name
/// * `addr` - Client address
/// * `capacity` - Capacity of the channel of tags
///
/// # Return value
///
/// Returns the puller, or None if the stream does not exist
pub async fn add_puller(
    status: &Mutex<RtmpServerStatus>,
    stream_name: &str,
    addr: SocketAddr,
    capacity: usize,
) -> Option<FlvPuller> {
    let status_v = status.lock().await;
    let live_stream_mu = status_v.streams.get(stream_name)?.clone();
    drop(status_v);

    let mut live_stream = live_stream_mu.lock().await;
    let (receiver, recycle) = live_stream.add_puller(addr, capacity);

    Some(FlvPuller::new(receiver, recycle))
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    use crate::server::set_publisher;

    #[tokio::test]
    async fn test_add_puller() {
        let status = Mutex::new(RtmpServerStatus::new());
        let addr = SocketAddr::from(([127, 0, 0, 1], 9000));

        assert!(add_puller(&status, "missing", addr, 10).await.is_none());

        let stream = set_publisher(&status, "cam").await;

        assert!(add_puller(&status, "cam", addr, 10).await.is_some());
        assert!(stream.lock().await.pullers.contains_key(&addr));
    }
}
