use std::sync::Arc;

use realfft::RealFftPlanner;
use realfft::num_complex::Complex;

/// Magnitude (or dB) spectrogram, stored frame-major.
///
/// `data[frame * n_bins + bin]`, bin 0 = DC, bin `n_bins - 1` = Nyquist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spectrogram {
    pub data: Vec<f32>,
    pub n_bins: usize,
    pub n_frames: usize,
}

impl Spectrogram {
    /// Bins of one frame.
    #[must_use]
    pub fn frame(&self, frame: usize) -> &[f32] {
        let start = frame * self.n_bins;
        &self.data[start..start + self.n_bins]
    }

    #[must_use]
    pub fn get(&self, frame: usize, bin: usize) -> f32 {
        self.data[frame * self.n_bins + bin]
    }

    /// Largest value, or `None` when empty.
    #[must_use]
    pub fn max(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    /// Smallest value, or `None` when empty.
    #[must_use]
    pub fn min(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::min)
    }
}

/// Short-time Fourier transform: periodic Hann window, centered frames.
///
/// Pre-allocates the FFT plan and scratch buffers; frames are processed one
/// after the other into the same buffers.
///
/// # Example
/// ```
/// use cs_audio::stft::StftPipeline;
/// let mut stft = StftPipeline::new(256, 64);
/// let spec = stft.magnitudes(&vec![0.0f32; 640]);
/// assert_eq!(spec.n_bins, 129); // N/2 + 1
/// assert_eq!(spec.n_frames, 11); // 1 + 640 / 64
/// ```
pub struct StftPipeline {
    n_fft: usize,
    hop_length: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    plan: Arc<dyn realfft::RealToComplex<f32>>,
    /// Hann window coefficients (periodic).
    window: Vec<f32>,
}

impl StftPipeline {
    /// Create a new STFT pipeline.
    ///
    /// # Panics
    /// Panics if `n_fft` or `hop_length` is 0.
    #[must_use]
    pub fn new(n_fft: usize, hop_length: usize) -> Self {
        assert!(n_fft > 0, "FFT size must be > 0");
        assert!(hop_length > 0, "hop length must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(n_fft);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        let window = (0..n_fft)
            .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / n_fft as f32).cos())
            .collect();

        Self {
            n_fft,
            hop_length,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
            window,
        }
    }

    #[must_use]
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    #[must_use]
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of centered frames for a signal of `n_samples`.
    #[must_use]
    pub fn frame_count(&self, n_samples: usize) -> usize {
        1 + n_samples / self.hop_length
    }

    /// The window coefficients.
    #[must_use]
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Magnitude spectrogram `|STFT|` of `samples`.
    ///
    /// Frame `t` is centered on sample `t * hop_length`; samples outside the
    /// signal read as zero. Magnitudes are not normalised by the FFT size.
    pub fn magnitudes(&mut self, samples: &[f32]) -> Spectrogram {
        let n_bins = self.n_bins();
        let n_frames = self.frame_count(samples.len());
        let half = (self.n_fft / 2) as isize;
        let mut data = Vec::with_capacity(n_bins * n_frames);

        for t in 0..n_frames {
            let first = (t * self.hop_length) as isize - half;

            // Copy and window
            for (i, slot) in self.input_buf.iter_mut().enumerate() {
                let idx = first + i as isize;
                let sample = if idx >= 0 {
                    samples.get(idx as usize).copied().unwrap_or(0.0)
                } else {
                    0.0
                };
                *slot = sample * self.window[i];
            }

            // Forward FFT
            if self
                .plan
                .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
                .is_err()
            {
                log::warn!("STFT frame {t} failed, zero-filled");
                data.extend(std::iter::repeat_n(0.0, n_bins));
                continue;
            }

            data.extend(self.spectrum_buf.iter().map(|c| c.norm()));
        }

        Spectrogram {
            data,
            n_bins,
            n_frames,
        }
    }
}
