use crate::stft::Spectrogram;

/// Plancher d'amplitude avant passage en dB.
pub const AMIN: f32 = 1e-5;

/// Convert magnitudes to decibels relative to the peak magnitude.
///
/// `20·log10(max(AMIN, x)) - 20·log10(max(AMIN, peak))`, then floored at
/// `-top_db` below the loudest value. The result peaks at 0 dB.
///
/// # Example
/// ```
/// use cs_audio::features::amplitude_to_db;
/// use cs_audio::stft::Spectrogram;
/// let spec = Spectrogram { data: vec![1.0, 0.1, 0.0], n_bins: 3, n_frames: 1 };
/// let db = amplitude_to_db(&spec, 80.0);
/// assert!((db.data[0] - 0.0).abs() < 1e-4);
/// assert!((db.data[1] + 20.0).abs() < 1e-4);
/// assert!((db.data[2] + 80.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn amplitude_to_db(spec: &Spectrogram, top_db: f32) -> Spectrogram {
    let peak = spec.max().unwrap_or(0.0).max(AMIN);
    let ref_db = 20.0 * peak.log10();

    let mut data: Vec<f32> = spec
        .data
        .iter()
        .map(|&x| 20.0 * x.max(AMIN).log10() - ref_db)
        .collect();

    let floor = data.iter().copied().fold(f32::NEG_INFINITY, f32::max) - top_db;
    for v in &mut data {
        *v = v.max(floor);
    }

    Spectrogram {
        data,
        n_bins: spec.n_bins,
        n_frames: spec.n_frames,
    }
}

/// Frame-wise RMS energy from a magnitude spectrogram.
///
/// One-sided power is doubled except for the DC and (even `n_fft`) Nyquist
/// bins, then summed and normalised by `n_fft²`. By Parseval this equals the
/// RMS of the windowed frame.
///
/// # Example
/// ```
/// use cs_audio::features::rms_from_spectrogram;
/// use cs_audio::stft::Spectrogram;
/// let spec = Spectrogram { data: vec![0.0; 5 * 2], n_bins: 5, n_frames: 2 };
/// assert_eq!(rms_from_spectrogram(&spec, 8), vec![0.0, 0.0]);
/// ```
#[must_use]
pub fn rms_from_spectrogram(spec: &Spectrogram, n_fft: usize) -> Vec<f32> {
    if spec.n_bins == 0 || n_fft == 0 {
        return vec![0.0; spec.n_frames];
    }
    let norm = (n_fft * n_fft) as f32;
    let last = spec.n_bins - 1;
    let nyquist_is_real = n_fft % 2 == 0;

    (0..spec.n_frames)
        .map(|t| {
            let power: f32 = spec
                .frame(t)
                .iter()
                .enumerate()
                .map(|(k, &m)| {
                    let p = 2.0 * m * m;
                    if k == 0 || (k == last && nyquist_is_real) {
                        0.5 * p
                    } else {
                        p
                    }
                })
                .sum();
            (power / norm).sqrt()
        })
        .collect()
}

/// Time in seconds of each STFT frame, shifted by `offset_secs`.
///
/// # Example
/// ```
/// use cs_audio::features::frames_to_time;
/// assert_eq!(frames_to_time(3, 512, 22050, 600.0)[1], 600.0 + 512.0 / 22050.0);
/// ```
#[must_use]
pub fn frames_to_time(n_frames: usize, hop_length: usize, sample_rate: u32, offset_secs: f64) -> Vec<f64> {
    if sample_rate == 0 {
        return vec![offset_secs; n_frames];
    }
    let step = hop_length as f64 / f64::from(sample_rate);
    (0..n_frames).map(|t| offset_secs + t as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stft::StftPipeline;

    #[test]
    fn db_range_is_bounded() {
        let spec = Spectrogram {
            data: vec![4.0, 2.0, 1e-9, 0.5, 0.0, 3.0],
            n_bins: 3,
            n_frames: 2,
        };
        let db = amplitude_to_db(&spec, 80.0);
        assert!((db.max().unwrap_or(f32::NAN)).abs() < 1e-5);
        assert!(db.min().unwrap_or(f32::NAN) >= -80.0 - 1e-4);
        assert!((db.data[1] + 6.0206).abs() < 1e-3);
    }

    #[test]
    fn db_of_silence_is_flat() {
        let spec = Spectrogram {
            data: vec![0.0; 6],
            n_bins: 3,
            n_frames: 2,
        };
        let db = amplitude_to_db(&spec, 80.0);
        assert!(db.data.iter().all(|v| v.abs() < 1e-5));
    }

    #[test]
    fn rms_matches_windowed_frame() {
        let n_fft = 256;
        let hop = 64;
        let samples: Vec<f32> = (0..2048)
            .map(|i| 0.8 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 8000.0).sin())
            .collect();
        let mut stft = StftPipeline::new(n_fft, hop);
        let spec = stft.magnitudes(&samples);
        let rms = rms_from_spectrogram(&spec, n_fft);
        assert_eq!(rms.len(), spec.n_frames);

        // frame 10 is centered on sample 640, fully inside the signal
        let t = 10;
        let first = t * hop - n_fft / 2;
        let expected: f32 = (0..n_fft)
            .map(|i| {
                let v = samples[first + i] * stft.window()[i];
                v * v
            })
            .sum::<f32>()
            / n_fft as f32;
        assert!((rms[t] - expected.sqrt()).abs() < 1e-4, "{} vs {}", rms[t], expected.sqrt());
    }

    #[test]
    fn full_scale_sine_rms() {
        let samples: Vec<f32> = (0..8192)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 16000.0).sin())
            .collect();
        let mut stft = StftPipeline::new(512, 128);
        let rms = rms_from_spectrogram(&stft.magnitudes(&samples), 512);
        let mid = rms[rms.len() / 2];
        assert!((mid - (3.0f32 / 16.0).sqrt()).abs() < 1e-2, "{mid}");
    }

    #[test]
    fn frame_times_without_rate() {
        assert_eq!(frames_to_time(2, 512, 0, 5.0), vec![5.0, 5.0]);
    }
}
