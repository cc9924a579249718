// Context types to group parameters

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{RtmpServerConfiguration, RtmpServerStatus};

/// Server context, shared by the RTMP sessions and the HTTP handlers
#[derive(Clone)]
pub struct RtmpServerContext {
    /// Server configuration
    pub config: Arc<RtmpServerConfiguration>,

    /// Server status
    pub status: Arc<Mutex<RtmpServerStatus>>,
}

impl RtmpServerContext {
    /// Creates a context with an empty status
    pub fn new(config: Arc<RtmpServerConfiguration>) -> RtmpServerContext {
        RtmpServerContext {
            config,
            status: Arc::new(Mutex::new(RtmpServerStatus::new())),
        }
    }
}
