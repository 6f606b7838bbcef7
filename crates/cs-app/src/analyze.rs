use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cs_audio::analysis::BatchAnalyzer;
use cs_core::config::{FailurePolicy, ToolConfig};
use cs_core::error::CoreError;
use cs_core::naming::{analysis_file_name, base_name, chunk_offset_secs};
use cs_export::figure::{FigureStyle, render_analysis};
use cs_export::png_writer::save_png;
use cs_export::text::TextRasterizer;

/// Bilan d'un lot d'analyse.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Figures écrites, dans l'ordre de traitement.
    pub written: Vec<PathBuf>,
    /// Fichiers ignorés (politique `skip`) avec leur erreur.
    pub failed: Vec<(PathBuf, String)>,
}

/// Fichiers de `folder` dont le nom se termine par `.ext`, dans l'ordre du listing.
///
/// # Errors
/// `CoreError::FileNotFound` si le dossier n'existe pas.
pub fn collect_audio_files(folder: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(CoreError::FileNotFound {
            path: folder.display().to_string(),
        }
        .into());
    }
    let suffix = format!(".{}", ext.trim_start_matches('.'));
    let files = std::fs::read_dir(folder)
        .with_context(|| format!("Lecture du dossier {}", folder.display()))?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&suffix))
        })
        .collect();
    Ok(files)
}

/// Analyse un fichier et écrit sa figure dans `output_dir`.
fn analyze_one(
    path: &Path,
    output_dir: &Path,
    analyzer: &mut BatchAnalyzer,
    style: &FigureStyle,
    window_secs: f64,
    text: Option<&mut TextRasterizer>,
) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let offset = chunk_offset_secs(&file_name, window_secs);

    let analysis = analyzer
        .analyze_file(path, offset)
        .with_context(|| format!("Analyse de {}", path.display()))?;
    let image = render_analysis(&analysis, style, text);
    drop(analysis);

    let out = output_dir.join(analysis_file_name(&base_name(path)));
    save_png(&image, &out, style.dpi)?;
    Ok(out)
}

fn saved_message(input: &Path, output: &Path) -> String {
    let file = input
        .file_name()
        .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
    format!("Saved analysis for {file} to {}", output.display())
}

/// Produit une figure d'analyse par fichier `.extension` de `folder`.
///
/// Le dossier de sortie est créé au besoin. Les fichiers sont traités un par
/// un ; selon `config.on_error`, un échec arrête le lot ou est consigné dans
/// le bilan.
///
/// # Errors
/// Retourne une erreur si un dossier est inaccessible, ou au premier fichier
/// en échec avec la politique `abort`.
pub fn analyze_folder(
    folder: &Path,
    output_dir: &Path,
    config: &ToolConfig,
    text: Option<TextRasterizer>,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Création du dossier {}", output_dir.display()))?;
    let files = collect_audio_files(folder, &config.audio_extension)?;
    log::info!(
        "{} fichier(s) .{} dans {}",
        files.len(),
        config.audio_extension,
        folder.display()
    );

    let mut analyzer = BatchAnalyzer::from_config(config);
    let style = FigureStyle::from_config(config);
    let window_secs = config.offset_window_secs();
    let mut text = text;
    let mut report = BatchReport::default();

    for path in files {
        match analyze_one(&path, output_dir, &mut analyzer, &style, window_secs, text.as_mut()) {
            Ok(out) => {
                log::info!("{}", saved_message(&path, &out));
                report.written.push(out);
            }
            Err(e) => match config.on_error {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    log::warn!("Fichier ignoré {} : {e:#}", path.display());
                    report.failed.push((path, format!("{e:#}")));
                }
            },
        }
    }
    Ok(report)
}
