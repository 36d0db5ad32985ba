pub mod chunk;
pub mod layout;
pub mod stream;
pub mod streaming;

pub use chunk::ChunkCodec;
pub use layout::{ChunkLayout, MAX_UNIT_BYTES};
pub use stream::StreamCodec;
pub use streaming::{StreamingDecoder, StreamingEncoder};
