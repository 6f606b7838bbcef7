use std::path::Path;

use anyhow::Result;
use cs_core::axis::TimeAxis;
use cs_core::config::ToolConfig;

use crate::features::{amplitude_to_db, frames_to_time, rms_from_spectrogram};
use crate::stft::{Spectrogram, StftPipeline};

/// Séries dérivées d'un fichier, alignées sur la timeline globale.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Début de la timeline (s), déduit de l'index de chunk.
    pub offset_secs: f64,
    pub duration_secs: f64,
    pub sample_rate: u32,
    /// Échantillons mono bruts.
    pub waveform: Vec<f32>,
    /// Spectrogramme en dB (0 dB = pic).
    pub spectrogram_db: Spectrogram,
    /// RMS par trame STFT.
    pub rms: Vec<f32>,
    /// Temps (s, offset inclus) de chaque valeur RMS.
    pub rms_times: Vec<f64>,
    /// Pas STFT (échantillons) entre deux trames.
    pub hop_length: usize,
    /// Axe x commun aux trois panneaux.
    pub axis: TimeAxis,
    pub top_db: f32,
}

impl Analysis {
    /// Time of waveform sample `i`: samples are spread evenly over the axis,
    /// first on `axis.start` and last on `axis.end`.
    #[must_use]
    pub fn waveform_time(&self, i: usize) -> f64 {
        let n = self.waveform.len();
        if n <= 1 {
            return self.axis.start;
        }
        self.axis.start + self.axis.span() * i as f64 / (n - 1) as f64
    }

    /// Nyquist frequency, top of the spectrogram's y axis.
    #[must_use]
    pub fn max_frequency(&self) -> f64 {
        f64::from(self.sample_rate) / 2.0
    }

    /// Durée (s) d'un pas STFT, 0 si la fréquence est inconnue.
    #[must_use]
    pub fn hop_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.hop_length as f64 / f64::from(self.sample_rate)
        }
    }
}

/// Analyseur audio pour le traitement offline en lot.
///
/// Calcule waveform, spectrogramme dB et énergie RMS pour un buffer mono.
pub struct BatchAnalyzer {
    stft: StftPipeline,
    top_db: f32,
    target_rate: u32,
}

impl BatchAnalyzer {
    /// Crée un nouvel analyseur batch.
    ///
    /// `target_rate` de 0 garde la fréquence native des fichiers.
    ///
    /// # Panics
    /// Panics if `n_fft` or `hop_length` is 0.
    ///
    /// # Example
    /// ```
    /// use cs_audio::analysis::BatchAnalyzer;
    /// let analyzer = BatchAnalyzer::new(2048, 512, 80.0, 22050);
    /// ```
    #[must_use]
    pub fn new(n_fft: usize, hop_length: usize, top_db: f32, target_rate: u32) -> Self {
        Self {
            stft: StftPipeline::new(n_fft, hop_length),
            top_db,
            target_rate,
        }
    }

    /// Analyzer built from a validated configuration.
    #[must_use]
    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(
            config.n_fft,
            config.hop_length,
            config.top_db,
            config.analysis_sample_rate,
        )
    }

    /// Analyse l'intégralité d'un buffer mono placé à `offset_secs`.
    ///
    /// # Example
    /// ```
    /// use cs_audio::analysis::BatchAnalyzer;
    /// let mut analyzer = BatchAnalyzer::new(256, 64, 80.0, 0);
    /// let analysis = analyzer.analyze_samples(vec![0.0; 1000], 1000, 600.0);
    /// assert_eq!(analysis.axis.start, 600.0);
    /// assert_eq!(analysis.axis.end, 601.0);
    /// assert_eq!(analysis.rms.len(), analysis.rms_times.len());
    /// ```
    #[must_use]
    pub fn analyze_samples(&mut self, samples: Vec<f32>, sample_rate: u32, offset_secs: f64) -> Analysis {
        let duration_secs = if sample_rate == 0 {
            0.0
        } else {
            samples.len() as f64 / f64::from(sample_rate)
        };

        let magnitudes = self.stft.magnitudes(&samples);
        let rms = rms_from_spectrogram(&magnitudes, self.stft.n_fft());
        let rms_times = frames_to_time(
            magnitudes.n_frames,
            self.stft.hop_length(),
            sample_rate,
            offset_secs,
        );
        let spectrogram_db = amplitude_to_db(&magnitudes, self.top_db);
        drop(magnitudes);

        log::debug!(
            "Analyse : {} échantillons, {} trames STFT, offset {offset_secs}s",
            samples.len(),
            spectrogram_db.n_frames
        );

        Analysis {
            offset_secs,
            duration_secs,
            sample_rate,
            waveform: samples,
            spectrogram_db,
            rms,
            rms_times,
            hop_length: self.stft.hop_length(),
            axis: TimeAxis::new(offset_secs, duration_secs),
            top_db: self.top_db,
        }
    }

    /// Décode un fichier audio et analyse l'intégralité de ses échantillons.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier ne peut être décodé.
    pub fn analyze_file(&mut self, path: &Path, offset_secs: f64) -> Result<Analysis> {
        let buffer = crate::decode::decode_mono(path, self.target_rate)?;
        let sample_rate = buffer.sample_rate;
        Ok(self.analyze_samples(buffer.samples, sample_rate, offset_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_series_share_the_axis() {
        let mut analyzer = BatchAnalyzer::new(512, 128, 80.0, 0);
        let sr = 8000;
        let samples: Vec<f32> = (0..sr * 3)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin())
            .collect();
        let a = analyzer.analyze_samples(samples, sr as u32, 1200.0);

        assert_eq!(a.axis, TimeAxis::new(1200.0, 3.0));
        assert!((a.waveform_time(0) - 1200.0).abs() < 1e-9);
        assert!((a.waveform_time(a.waveform.len() - 1) - 1203.0).abs() < 1e-9);
        assert!(a.rms_times.iter().all(|&t| t >= a.axis.start && t <= a.axis.end));
        assert_eq!(a.rms.len(), a.spectrogram_db.n_frames);
        assert!((a.max_frequency() - 4000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn db_spectrogram_peaks_at_zero() {
        let mut analyzer = BatchAnalyzer::new(256, 64, 60.0, 0);
        let samples: Vec<f32> = (0..4000).map(|i| ((i % 50) as f32 / 25.0) - 1.0).collect();
        let a = analyzer.analyze_samples(samples, 4000, 0.0);
        assert!(a.spectrogram_db.max().unwrap_or(f32::NAN).abs() < 1e-4);
        assert!(a.spectrogram_db.min().unwrap_or(f32::NAN) >= -60.0 - 1e-3);
    }

    #[test]
    fn empty_signal_is_degenerate_but_valid() {
        let mut analyzer = BatchAnalyzer::new(256, 64, 80.0, 0);
        let a = analyzer.analyze_samples(Vec::new(), 22_050, 0.0);
        assert!(a.duration_secs.abs() < f64::EPSILON);
        assert_eq!(a.rms.len(), 1);
        assert!((a.waveform_time(0)).abs() < f64::EPSILON);
    }
}
