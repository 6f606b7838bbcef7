use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};
use cs_core::buffer::AudioBuffer;
use cs_core::traits::ChunkSink;

use crate::error::ExportError;

/// Nombre d'échantillons convertis en octets par écriture dans le pipe.
const PIPE_BLOCK: usize = 64 * 1024;

/// Encode du PCM f32 brut dans un fichier audio avec ffmpeg.
///
/// Les échantillons entrelacés sont envoyés en `f32le` sur stdin.
pub struct PcmEncoder {
    ffmpeg_child: Child,
}

impl PcmEncoder {
    /// Lance ffmpeg pour écrire `output_path` au format `format` (muxer ffmpeg).
    ///
    /// # Errors
    /// Retourne une erreur si ffmpeg est impossible à démarrer.
    pub fn new(
        ffmpeg: &Path,
        output_path: &Path,
        channels: u16,
        sample_rate: u32,
        format: &str,
        bitrate: Option<&str>,
    ) -> Result<Self> {
        let path_str = output_path.to_str().context("Chemin invalide")?;

        let mut command = Command::new(ffmpeg);
        command.args([
            "-y",
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "f32le",
            "-ar",
            &sample_rate.to_string(),
            "-ac",
            &channels.to_string(),
            "-i",
            "-",
        ]);
        if let Some(br) = bitrate {
            command.args(["-b:a", br]);
        }
        command.args(["-f", format, path_str]);

        let child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| {
                format!(
                    "Échec du lancement de l'encodeur audio ffmpeg ({})",
                    ffmpeg.display()
                )
            })?;

        Ok(Self {
            ffmpeg_child: child,
        })
    }

    /// Envoie des échantillons entrelacés au flux.
    ///
    /// # Errors
    /// Retourne une erreur I/O si l'écriture dans le pipe échoue.
    pub fn write_samples(&mut self, samples: &[f32]) -> Result<()> {
        let Some(stdin) = self.ffmpeg_child.stdin.as_mut() else {
            return Ok(());
        };
        let mut bytes = Vec::with_capacity(PIPE_BLOCK * 4);
        for block in samples.chunks(PIPE_BLOCK) {
            bytes.clear();
            bytes.extend(block.iter().flat_map(|s| s.to_le_bytes()));
            stdin.write_all(&bytes).context("Écriture PCM vers ffmpeg")?;
        }
        Ok(())
    }

    /// Ferme le flux et attend la fin de l'encodage.
    ///
    /// # Errors
    /// Retourne [`ExportError::EncodeError`] si ffmpeg signale une erreur.
    pub fn finish(mut self) -> Result<()> {
        drop(self.ffmpeg_child.stdin.take());

        let output = self.ffmpeg_child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::EncodeError(format!(
                "ffmpeg ({}) : {}",
                output.status,
                stderr.trim()
            ))
            .into());
        }
        Ok(())
    }
}

/// [`ChunkSink`] qui encode chaque chunk via ffmpeg.
///
/// # Example
/// ```no_run
/// use cs_export::encoder::FfmpegSink;
/// use std::path::PathBuf;
/// let sink = FfmpegSink::new(PathBuf::from("/usr/bin/ffmpeg"), "mp3", Some("192k".into()));
/// ```
#[derive(Clone, Debug)]
pub struct FfmpegSink {
    ffmpeg: PathBuf,
    format: String,
    bitrate: Option<String>,
}

impl FfmpegSink {
    #[must_use]
    pub fn new(ffmpeg: PathBuf, format: &str, bitrate: Option<String>) -> Self {
        Self {
            ffmpeg,
            format: format.to_string(),
            bitrate,
        }
    }
}

impl ChunkSink for FfmpegSink {
    fn extension(&self) -> &str {
        &self.format
    }

    fn write_chunk(&mut self, chunk: &AudioBuffer, path: &Path) -> Result<()> {
        let mut encoder = PcmEncoder::new(
            &self.ffmpeg,
            path,
            chunk.channels,
            chunk.sample_rate,
            &self.format,
            self.bitrate.as_deref(),
        )?;
        let written = encoder.write_samples(&chunk.samples);
        // ffmpeg's own diagnostic explains a broken pipe better than the pipe error.
        encoder
            .finish()
            .with_context(|| format!("Encodage de {}", path.display()))?;
        written
    }
}
