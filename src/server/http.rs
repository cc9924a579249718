// HTTP pull server

use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{ConnectInfo, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::stream;
use tokio::{net::TcpListener, sync::mpsc::Sender};

use crate::{log::Logger, log_debug, log_error, log_info};

use super::{add_puller, RtmpServerContext};

/// State of the HTTP handlers
#[derive(Clone)]
pub struct HttpPullState {
    /// Server context
    pub server_context: RtmpServerContext,

    /// Logger
    pub logger: Arc<Logger>,
}

/// Creates the router of the pull endpoint
pub fn create_pull_router(state: HttpPullState) -> Router {
    Router::new()
        .route("/:stream_name", get(handle_pull))
        .with_state(state)
}

/// Handles a pull request: GET /<stream_name>
async fn handle_pull(
    Path(stream_name): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<HttpPullState>,
) -> Response {
    let config = &state.server_context.config;

    let puller = match add_puller(
        &state.server_context.status,
        &stream_name,
        addr,
        config.pull_channel_capacity,
    )
    .await
    {
        Some(p) => p,
        None => {
            log_debug!(
                state.logger,
                format!("Pull from {} rejected: stream not found: {}", addr, stream_name)
            );

            return StatusCode::NOT_FOUND.into_response();
        }
    };

    if config.log_requests {
        log_info!(
            state.logger,
            format!("Puller registered: {} on stream {}", addr, stream_name)
        );
    }

    let body_stream = stream::unfold(puller, |mut puller| async move {
        let chunk = puller.next_chunk().await?;
        Some((Ok::<_, Infallible>(chunk), puller))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/x-flv")
        .header(header::CACHE_CONTROL, "no-cache, no-store")
        .body(Body::from_stream(body_stream));

    match response {
        Ok(r) => r,
        Err(e) => {
            log_error!(state.logger, format!("Could not build response: {}", e));
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Run the HTTP server
pub fn http_server(
    logger: Arc<Logger>,
    server_context: RtmpServerContext,
    end_notifier: Sender<()>,
) {
    tokio::spawn(async move {
        let listen_addr = server_context.config.get_http_listen_addr();

        // Create listener
        let listener = match TcpListener::bind(&listen_addr).await {
            Ok(l) => l,
            Err(e) => {
                log_error!(logger, format!("Could not create HTTP listener: {}", e));
                _ = end_notifier.send(()).await;
                return;
            }
        };

        log_info!(logger, format!("Listening on {}", listen_addr));

        let router = create_pull_router(HttpPullState {
            server_context,
            logger: logger.clone(),
        });

        if let Err(e) = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            log_error!(logger, format!("HTTP server error: {}", e));
        }

        _ = end_notifier.send(()).await;
    });
}

// Tests
