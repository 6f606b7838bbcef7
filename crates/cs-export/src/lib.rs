// Encoding (ffmpeg subprocess) and figure rendering for chunkscope.

pub mod canvas;
pub mod colormap;
pub mod encoder;
pub mod error;
pub mod ffmpeg;
pub mod figure;
pub mod png_writer;
pub mod text;

pub use encoder::FfmpegSink;
pub use error::ExportError;
pub use figure::{FigureStyle, render_analysis};
pub use text::TextRasterizer;
