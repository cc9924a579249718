// Session context

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::server::{LiveStream, StreamBootstrap};

/// Per-connection state of an RTMP session
pub struct SessionContext {
    /// Session ID
    pub id: u64,

    /// True once createStream was called
    pub stream_created: bool,

    /// Name being published
    pub publish_name: Option<String>,

    /// Live stream being published, registered in the server status
    pub live_stream: Option<Arc<Mutex<LiveStream>>>,

    /// Metadata and codec configuration tags for new pullers
    pub bootstrap: StreamBootstrap,
}

impl SessionContext {
    /// Creates the context of a new session
    pub fn new(id: u64) -> SessionContext {
        SessionContext {
            id,
            stream_created: false,
            publish_name: None,
            live_stream: None,
            bootstrap: StreamBootstrap::default(),
        }
    }
}
