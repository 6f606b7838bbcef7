use std::path::Path;

use crate::buffer::AudioBuffer;

/// Destination des chunks produits par le découpage.
///
/// Implémenté par : `FfmpegSink` (encodage réel) et des sinks mémoire en test.
///
/// # Example
/// ```
/// use cs_core::traits::ChunkSink;
/// use cs_core::buffer::AudioBuffer;
/// use std::path::Path;
///
/// struct Discard;
/// impl ChunkSink for Discard {
///     fn extension(&self) -> &str { "wav" }
///     fn write_chunk(&mut self, _chunk: &AudioBuffer, _path: &Path) -> anyhow::Result<()> { Ok(()) }
/// }
/// ```
pub trait ChunkSink {
    /// File extension (without dot) of the files this sink writes.
    fn extension(&self) -> &str;

    /// Encode `chunk` and write it to `path`.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    fn write_chunk(&mut self, chunk: &AudioBuffer, path: &Path) -> anyhow::Result<()>;
}
