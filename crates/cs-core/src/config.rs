use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::naming::DEFAULT_OFFSET_WINDOW_SECS;

/// Longueur de chunk par défaut : 10 minutes.
pub const DEFAULT_CHUNK_LENGTH_MS: u64 = 600_000;

/// Origine de la fenêtre utilisée pour convertir un index de chunk en offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// `offset_window_secs` (600 s by default), independent of the chunk length.
    #[default]
    Fixed,
    /// `chunk_length_ms / 1000`, shared with the splitter.
    ChunkLength,
}

/// What the analyzer does when one file fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the batch on the first failure.
    #[default]
    Abort,
    /// Log a warning naming the file and continue.
    Skip,
}

/// Configuration complète du découpage et de l'analyse.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use cs_core::config::ToolConfig;
/// let config = ToolConfig::default();
/// assert_eq!(config.chunk_length_ms, 600_000);
/// assert_eq!(config.figure_size_px(), (3600, 4500));
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ToolConfig {
    // === Découpage ===
    /// Longueur nominale d'un chunk en millisecondes (> 0).
    pub chunk_length_ms: u64,
    /// Format de sortie des chunks (extension et muxer ffmpeg).
    pub chunk_format: String,
    /// Bitrate ffmpeg optionnel, ex. "192k".
    pub chunk_bitrate: Option<String>,

    // === Analyse ===
    /// Extension des fichiers analysés, sans le point.
    pub audio_extension: String,
    /// Fréquence d'analyse en Hz. 0 = fréquence native du fichier.
    pub analysis_sample_rate: u32,
    /// Taille de la FFT.
    pub n_fft: usize,
    /// Pas entre deux trames STFT, en échantillons.
    pub hop_length: usize,
    /// Dynamique du spectrogramme sous le pic, en dB.
    pub top_db: f32,
    pub offset_mode: OffsetMode,
    /// Fenêtre fixe (s) utilisée par `OffsetMode::Fixed`.
    pub offset_window_secs: f64,
    pub on_error: FailurePolicy,

    // === Figure ===
    pub figure_width_in: f32,
    pub figure_height_in: f32,
    pub dpi: u32,
    /// Police TrueType pour les libellés. None = recherche dans les emplacements système.
    pub font_path: Option<PathBuf>,

    // === Codec ===
    /// Exécutable ffmpeg. None = recherche dans le PATH.
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            chunk_length_ms: DEFAULT_CHUNK_LENGTH_MS,
            chunk_format: "mp3".to_string(),
            chunk_bitrate: None,
            audio_extension: "mp3".to_string(),
            analysis_sample_rate: 22_050,
            n_fft: 2048,
            hop_length: 512,
            top_db: 80.0,
            offset_mode: OffsetMode::Fixed,
            offset_window_secs: DEFAULT_OFFSET_WINDOW_SECS,
            on_error: FailurePolicy::Abort,
            figure_width_in: 12.0,
            figure_height_in: 15.0,
            dpi: 300,
            font_path: None,
            ffmpeg_path: None,
        }
    }
}

impl ToolConfig {
    /// Window in seconds that one chunk index step adds to the offset.
    ///
    /// # Example
    /// ```
    /// use cs_core::config::{OffsetMode, ToolConfig};
    /// let mut config = ToolConfig { chunk_length_ms: 30_000, ..ToolConfig::default() };
    /// assert_eq!(config.offset_window_secs(), 600.0);
    /// config.offset_mode = OffsetMode::ChunkLength;
    /// assert_eq!(config.offset_window_secs(), 30.0);
    /// ```
    #[must_use]
    pub fn offset_window_secs(&self) -> f64 {
        match self.offset_mode {
            OffsetMode::Fixed => self.offset_window_secs,
            OffsetMode::ChunkLength => self.chunk_length_ms as f64 / 1000.0,
        }
    }

    /// Figure size in pixels at the configured DPI.
    #[must_use]
    pub fn figure_size_px(&self) -> (u32, u32) {
        let dpi = self.dpi as f32;
        (
            (self.figure_width_in * dpi).round() as u32,
            (self.figure_height_in * dpi).round() as u32,
        )
    }

    /// Reject values the pipeline cannot work with.
    ///
    /// # Errors
    /// Returns `CoreError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.chunk_length_ms == 0 {
            return Err(CoreError::Config(
                "chunk_length_ms doit être un entier positif".into(),
            ));
        }
        if self.chunk_format.trim().is_empty() {
            return Err(CoreError::Config("chunk_format vide".into()));
        }
        if self.audio_extension.trim().is_empty() {
            return Err(CoreError::Config("audio_extension vide".into()));
        }
        if self.n_fft == 0 || self.hop_length == 0 {
            return Err(CoreError::Config(format!(
                "n_fft ({}) et hop_length ({}) doivent être > 0",
                self.n_fft, self.hop_length
            )));
        }
        if self.top_db.is_nan() || self.top_db <= 0.0 {
            return Err(CoreError::Config(format!("top_db invalide : {}", self.top_db)));
        }
        if !(self.offset_window_secs.is_finite() && self.offset_window_secs >= 0.0) {
            return Err(CoreError::Config(format!(
                "offset_window_secs invalide : {}",
                self.offset_window_secs
            )));
        }
        let (w, h) = self.figure_size_px();
        if self.dpi == 0 || w == 0 || h == 0 {
            return Err(CoreError::Config(format!(
                "figure vide : {}x{} in @ {} dpi",
                self.figure_width_in, self.figure_height_in, self.dpi
            )));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize, Default)]
struct ConfigFile {
    chunk: Option<ChunkSection>,
    analysis: Option<AnalysisSection>,
    figure: Option<FigureSection>,
    codec: Option<CodecSection>,
}

#[derive(Deserialize)]
struct ChunkSection {
    length_ms: Option<u64>,
    format: Option<String>,
    bitrate: Option<String>,
}

#[derive(Deserialize)]
struct AnalysisSection {
    extension: Option<String>,
    sample_rate: Option<u32>,
    n_fft: Option<usize>,
    hop_length: Option<usize>,
    top_db: Option<f32>,
    offset_mode: Option<OffsetMode>,
    offset_window_secs: Option<f64>,
    on_error: Option<FailurePolicy>,
}

#[derive(Deserialize)]
struct FigureSection {
    width_in: Option<f32>,
    height_in: Option<f32>,
    dpi: Option<u32>,
    font_path: Option<PathBuf>,
}

#[derive(Deserialize)]
struct CodecSection {
    ffmpeg_path: Option<PathBuf>,
}

/// Parse a TOML document and merge it over the defaults.
///
/// # Errors
/// Returns an error if the document is not valid TOML or a value is out of range.
///
/// # Example
/// ```
/// use cs_core::config::parse_config;
/// let config = parse_config("[chunk]\nlength_ms = 30000\n").unwrap();
/// assert_eq!(config.chunk_length_ms, 30_000);
/// assert_eq!(config.chunk_format, "mp3");
/// ```
pub fn parse_config(content: &str) -> Result<ToolConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = ToolConfig::default();

    if let Some(c) = file.chunk {
        if let Some(v) = c.length_ms {
            config.chunk_length_ms = v;
        }
        if let Some(v) = c.format {
            config.chunk_format = v;
        }
        if c.bitrate.is_some() {
            config.chunk_bitrate = c.bitrate;
        }
    }

    if let Some(a) = file.analysis {
        if let Some(v) = a.extension {
            config.audio_extension = v;
        }
        if let Some(v) = a.sample_rate {
            config.analysis_sample_rate = v;
        }
        if let Some(v) = a.n_fft {
            config.n_fft = v;
        }
        if let Some(v) = a.hop_length {
            config.hop_length = v;
        }
        if let Some(v) = a.top_db {
            config.top_db = v;
        }
        if let Some(v) = a.offset_mode {
            config.offset_mode = v;
        }
        if let Some(v) = a.offset_window_secs {
            config.offset_window_secs = v;
        }
        if let Some(v) = a.on_error {
            config.on_error = v;
        }
    }

    if let Some(f) = file.figure {
        if let Some(v) = f.width_in {
            config.figure_width_in = v;
        }
        if let Some(v) = f.height_in {
            config.figure_height_in = v;
        }
        if let Some(v) = f.dpi {
            config.dpi = v;
        }
        if f.font_path.is_some() {
            config.font_path = f.font_path;
        }
    }

    if let Some(c) = file.codec {
        if c.ffmpeg_path.is_some() {
            config.ffmpeg_path = c.ffmpeg_path;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
/// ```no_run
/// use cs_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ToolConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}
