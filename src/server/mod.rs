// RTMP ingest and HTTP pull servers

mod config;
mod context;
mod http;
mod puller;
mod session_id_generator;
mod status;
mod tcp;

use std::sync::Arc;

pub use config::*;
pub use context::*;
pub use http::*;
pub use puller::*;
pub use session_id_generator::*;
pub use status::*;
pub use tcp::*;

use crate::log::Logger;

/// Runs the RTMP and HTTP servers
///
/// Returns when any of them stops
pub async fn run_server(logger: Logger, server_context: RtmpServerContext) {
    let session_id_generator = Arc::new(SessionIdGenerator::new());

    let (end_notifier, mut end_receiver) = tokio::sync::mpsc::channel::<()>(2);

    tcp_server(
        Arc::new(logger.make_child_logger("[SERVER:RTMP] ")),
        server_context.clone(),
        session_id_generator,
        end_notifier.clone(),
    );

    http_server(
        Arc::new(logger.make_child_logger("[SERVER:HTTP] ")),
        server_context,
        end_notifier,
    );

    _ = end_receiver.recv().await;
}
