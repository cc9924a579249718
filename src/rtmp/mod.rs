// RTMP protocol utilities

mod chunk;
mod command;
mod constants;
mod error;
mod handshake;
mod messages;
mod packet;

pub use chunk::*;
pub use command::*;
pub use constants::*;
pub use error::*;
pub use handshake::*;
pub use messages::*;
pub use packet::*;
