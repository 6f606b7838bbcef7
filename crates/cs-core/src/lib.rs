/// Configuration, types, and shared conventions for chunkscope.
///
/// This crate holds the audio buffer type, the chunk naming convention shared
/// by the splitter and the analyzer, time-axis helpers and configuration.

pub mod axis;
pub mod buffer;
pub mod config;
pub mod error;
pub mod naming;
pub mod traits;

pub use axis::TimeAxis;
pub use buffer::AudioBuffer;
pub use config::ToolConfig;
pub use error::CoreError;
pub use traits::ChunkSink;
