use std::io::Error;

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};

/// Writes bytes to the session write stream
///
/// # Arguments
///
/// * `write_stream` - The stream to write to the client
/// * `bytes` - The bytes to write
pub async fn session_write_bytes<TW: AsyncWrite + Send + Unpin>(
    write_stream: &Mutex<TW>,
    bytes: &[u8],
) -> Result<(), Error> {
    let mut write_stream_v = write_stream.lock().await;

    write_stream_v.write_all(bytes).await?;
    write_stream_v.flush().await
}
