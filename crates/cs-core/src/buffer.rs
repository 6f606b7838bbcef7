/// Decoded audio held in memory: interleaved `f32` samples plus format.
///
/// Created by decoding a file, dropped once the chunk is exported or the
/// analysis is done.
///
/// # Example
/// ```
/// use cs_core::buffer::AudioBuffer;
/// let buf = AudioBuffer::new(vec![0.0; 2000], 2, 1000);
/// assert_eq!(buf.frame_count(), 1000);
/// assert_eq!(buf.duration_ms(), 1000);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved samples, `frame_count * channels` long.
    pub samples: Vec<f32>,
    /// Number of interleaved channels (>= 1).
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
}

impl AudioBuffer {
    #[must_use]
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: channels.max(1),
            sample_rate,
        }
    }

    /// Number of frames (one sample per channel).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Length in milliseconds, rounded to the nearest millisecond.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frame_count() as f64 * 1000.0 / f64::from(self.sample_rate)).round() as u64
    }

    /// Exact length in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    /// Frame index for a millisecond position, floored and clamped to the buffer.
    ///
    /// Positions at or beyond `duration_ms()` map to the last frame boundary so
    /// that the final window always reaches the true end of the buffer.
    #[must_use]
    pub fn frame_at_ms(&self, ms: u64) -> usize {
        if ms == 0 {
            return 0;
        }
        let frames = self.frame_count();
        if ms >= self.duration_ms() {
            return frames;
        }
        let frame = u128::from(ms) * u128::from(self.sample_rate) / 1000;
        usize::try_from(frame).map_or(frames, |f| f.min(frames))
    }

    /// Copy of the `[start_ms, end_ms)` range. Ends past the buffer are clamped.
    ///
    /// # Example
    /// ```
    /// use cs_core::buffer::AudioBuffer;
    /// let buf = AudioBuffer::new((0..10).map(|i| i as f32).collect(), 1, 1000);
    /// let part = buf.slice_ms(4, 100);
    /// assert_eq!(part.samples, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    /// ```
    #[must_use]
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> Self {
        let ch = usize::from(self.channels.max(1));
        let start = self.frame_at_ms(start_ms);
        let end = self.frame_at_ms(end_ms).max(start);
        Self {
            samples: self.samples[start * ch..end * ch].to_vec(),
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Copy from `start_ms` through the last frame, whatever the rounded duration says.
    ///
    /// # Example
    /// ```
    /// use cs_core::buffer::AudioBuffer;
    /// // 20 frames at 44.1 kHz: duration_ms() rounds to 0
    /// let buf = AudioBuffer::new(vec![0.5; 20], 1, 44_100);
    /// assert_eq!(buf.duration_ms(), 0);
    /// assert_eq!(buf.slice_from_ms(0).frame_count(), 20);
    /// ```
    #[must_use]
    pub fn slice_from_ms(&self, start_ms: u64) -> Self {
        let ch = usize::from(self.channels.max(1));
        let start = self.frame_at_ms(start_ms);
        let end = self.frame_count().max(start);
        Self {
            samples: self.samples[start * ch..end * ch].to_vec(),
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Average all channels into a single mono channel.
    #[must_use]
    pub fn to_mono(&self) -> Self {
        if self.channels <= 1 {
            return self.clone();
        }
        let ch = usize::from(self.channels);
        let samples = self
            .samples
            .chunks_exact(ch)
            .map(|frame| frame.iter().sum::<f32>() / ch as f32)
            .collect();
        Self {
            samples,
            channels: 1,
            sample_rate: self.sample_rate,
        }
    }
}
