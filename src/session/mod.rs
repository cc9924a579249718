// RTMP session

mod chunk_read;
mod commands;
mod context;
mod handle;
mod handle_data;
mod handle_invoke;
mod handle_media;
mod handle_packet;
mod write;

pub use chunk_read::*;
pub use commands::*;
pub use context::*;
pub use handle::*;
pub use handle_data::*;
pub use handle_invoke::*;
pub use handle_media::*;
pub use handle_packet::*;
pub use write::*;
