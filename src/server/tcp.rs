// RTMP ingest listener

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
    sync::{mpsc::Sender, Mutex},
};

use crate::{log::Logger, log_debug, log_error, log_info, session::handle_rtmp_session};

use super::{RtmpServerContext, SessionIdGenerator};

/// Spawns the task accepting RTMP connections
///
/// # Arguments
///
/// * `logger` - The server logger
/// * `server_context` - The server context
/// * `session_id_generator` - Generator of session IDs
/// * `end_notifier` - Notified if the listener stops
pub fn tcp_server(
    logger: Arc<Logger>,
    server_context: RtmpServerContext,
    session_id_generator: Arc<SessionIdGenerator>,
    end_notifier: Sender<()>,
) {
    tokio::spawn(async move {
        let listen_addr = server_context.config.get_tcp_listen_addr();

        let listener = match TcpListener::bind(&listen_addr).await {
            Ok(l) => l,
            Err(e) => {
                log_error!(
                    logger,
                    format!("Could not bind RTMP listener on {}: {}", listen_addr, e)
                );
                _ = end_notifier.send(()).await;
                return;
            }
        };

        log_info!(logger, format!("Accepting RTMP publishers on {}", listen_addr));

        loop {
            let (connection, addr) = match listener.accept().await {
                Ok(c) => c,
                Err(e) => {
                    log_error!(logger, format!("Could not accept connection: {}", e));
                    _ = end_notifier.send(()).await;
                    return;
                }
            };

            let session_id = session_id_generator.generate_id();

            tokio::spawn(handle_connection_tcp(
                Arc::new(logger.make_child_logger(&format!("[#{}] ", session_id))),
                server_context.clone(),
                session_id,
                connection,
                addr,
            ));
        }
    });
}

/// Runs an RTMP session over an accepted connection
async fn handle_connection_tcp(
    logger: Arc<Logger>,
    server_context: RtmpServerContext,
    session_id: u64,
    connection: TcpStream,
    addr: SocketAddr,
) {
    if server_context.config.log_requests {
        log_info!(logger, format!("Connection accepted from {}", addr));
    }

    if let Err(e) = connection.set_nodelay(true) {
        log_debug!(logger, format!("Could not set TCP_NODELAY: {}", e));
    }

    let (read_stream, write_stream) = connection.into_split();
    let write_stream = Arc::new(Mutex::new(write_stream));

    handle_rtmp_session(
        logger.clone(),
        server_context.clone(),
        session_id,
        read_stream,
        write_stream.clone(),
    )
    .await;

    _ = write_stream.lock().await.shutdown().await;

    if server_context.config.log_requests {
        log_info!(logger, "Connection closed");
    }
}
