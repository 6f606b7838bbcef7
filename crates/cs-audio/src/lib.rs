// Audio decoding and spectral analysis for chunkscope.

pub mod analysis;
pub mod decode;
pub mod error;
pub mod features;
pub mod stft;

pub use analysis::{Analysis, BatchAnalyzer};
pub use error::AudioError;
pub use stft::{Spectrogram, StftPipeline};
