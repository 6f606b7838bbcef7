use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cs_core::buffer::AudioBuffer;
use cs_core::error::CoreError;
use cs_core::naming::{base_name, chunk_file_name};
use cs_core::traits::ChunkSink;

/// Fenêtre `[start_ms, end_ms)` du chunk numéro `index` (à partir de 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkWindow {
    pub index: u64,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl ChunkWindow {
    #[must_use]
    pub fn len_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Fenêtres de découpage : départs `0, L, 2L, …` tant que `start < total`.
///
/// Une entrée vide donne quand même une fenêtre `[0, 0)`.
#[must_use]
pub fn plan_chunks(total_ms: u64, chunk_ms: u64) -> Vec<ChunkWindow> {
    if total_ms == 0 || chunk_ms == 0 {
        return vec![ChunkWindow {
            index: 1,
            start_ms: 0,
            end_ms: total_ms,
        }];
    }
    (0..total_ms.div_ceil(chunk_ms))
        .map(|i| {
            let start_ms = i * chunk_ms;
            ChunkWindow {
                index: i + 1,
                start_ms,
                end_ms: (start_ms + chunk_ms).min(total_ms),
            }
        })
        .collect()
}

/// Découpe un buffer déjà décodé et écrit chaque chunk via `sink`.
///
/// # Errors
/// Retourne la première erreur d'encodage ; les chunks déjà écrits restent.
pub fn split_buffer(
    buffer: &AudioBuffer,
    base: &str,
    output_dir: &Path,
    chunk_ms: u64,
    sink: &mut dyn ChunkSink,
) -> Result<Vec<PathBuf>> {
    let windows = plan_chunks(buffer.duration_ms(), chunk_ms);
    log::info!(
        "{base} : {} ms → {} chunk(s) de {chunk_ms} ms",
        buffer.duration_ms(),
        windows.len()
    );

    let last = windows.len();
    let mut written = Vec::with_capacity(last);
    for (i, window) in windows.into_iter().enumerate() {
        // le dernier chunk va jusqu'à la dernière frame
        let chunk = if i + 1 == last {
            buffer.slice_from_ms(window.start_ms)
        } else {
            buffer.slice_ms(window.start_ms, window.end_ms)
        };
        let path = output_dir.join(chunk_file_name(base, window.index, sink.extension()));
        sink.write_chunk(&chunk, &path)
            .with_context(|| format!("Chunk {} de {base}", window.index))?;
        log::info!("Saved chunk {}: {}", window.index, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Décode `input` et l'écrit en chunks de `chunk_ms` dans `output_dir`.
///
/// The output folder must already exist; it is checked before decoding.
///
/// # Errors
/// `CoreError::Config` pour une durée nulle, `CoreError::FileNotFound` pour
/// une entrée ou un dossier absent, erreur de décodage ou d'encodage sinon.
pub fn split_file(
    input: &Path,
    output_dir: &Path,
    chunk_ms: u64,
    sink: &mut dyn ChunkSink,
) -> Result<Vec<PathBuf>> {
    if chunk_ms == 0 {
        return Err(CoreError::Config("la durée de chunk doit être > 0 ms".into()).into());
    }
    if !input.is_file() {
        return Err(CoreError::FileNotFound {
            path: input.display().to_string(),
        }
        .into());
    }
    if !output_dir.is_dir() {
        return Err(CoreError::FileNotFound {
            path: output_dir.display().to_string(),
        }
        .into());
    }

    let buffer = cs_audio::decode::decode_file(input)
        .with_context(|| format!("Décodage de {}", input.display()))?;
    split_buffer(&buffer, &base_name(input), output_dir, chunk_ms, sink)
}
