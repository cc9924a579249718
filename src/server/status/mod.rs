// Server status

use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

mod add_puller;
mod live_stream;
mod set_publisher;

pub use add_puller::*;
pub use live_stream::*;
pub use set_publisher::*;

/// Server status
pub struct RtmpServerStatus {
    /// Live streams, by publish name
    pub streams: HashMap<String, Arc<Mutex<LiveStream>>>,
}

impl RtmpServerStatus {
    /// Creates new instance of RtmpServerStatus
    pub fn new() -> RtmpServerStatus {
        RtmpServerStatus {
            streams: HashMap::new(),
        }
    }
}
