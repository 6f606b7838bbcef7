use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use cs_core::buffer::AudioBuffer;
use rubato::{FftFixedIn, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AudioError;

/// Decode an audio file into interleaved f32 samples at its native rate.
///
/// Supports WAV, MP3, FLAC, OGG, AAC via symphonia. All channels are kept.
///
/// # Errors
/// Returns an error if the file cannot be opened, is not audio
/// ([`AudioError::UnsupportedFormat`]), or no packet decodes
/// ([`AudioError::DecodeError`]).
///
/// # Example
/// ```no_run
/// use cs_audio::decode::decode_file;
/// let buffer = decode_file("talk.mp3").unwrap();
/// println!("{} ms", buffer.duration_ms());
/// ```
pub fn decode_file(path: impl AsRef<Path>) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Cannot open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions {
                enable_gapless: true,
                ..Default::default()
            },
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))
        .with_context(|| format!("Failed to probe audio format: {}", path.display()))?;

    let mut format = probed.format;
    let (track_id, params) = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .map(|t| (t.id, t.codec_params.clone()))
        .ok_or(AudioError::NoTrack)
        .with_context(|| format!("No audio track in {}", path.display()))?;

    let mut sample_rate = params.sample_rate.unwrap_or(44100);
    let mut channels = params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))
        .context("Failed to create audio decoder")?;

    let mut all_samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;
    let mut decoded_packets: usize = 0;
    let mut last_error: Option<String> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                log::warn!("Audio stream reset requested, stopping at {} packets", decoded_packets);
                break;
            }
            Err(e) if decoded_packets == 0 => {
                return Err(AudioError::DecodeError(e.to_string()))
                    .with_context(|| format!("Cannot read packets from {}", path.display()));
            }
            Err(e) => {
                log::warn!("Audio decode packet error (truncated tail): {e}");
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Audio decode frame error: {e}");
                last_error = Some(e.to_string());
                continue;
            }
            Err(e) => {
                return Err(AudioError::DecodeError(e.to_string()))
                    .with_context(|| format!("Decoder failure in {}", path.display()));
            }
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count();
        let num_frames = decoded.capacity();
        // Reuse SampleBuffer: only reallocate if this packet is bigger than current capacity
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);
        all_samples.extend_from_slice(buf.samples());
        decoded_packets += 1;
    }

    if decoded_packets == 0 {
        if let Some(e) = last_error {
            return Err(AudioError::DecodeError(e))
                .with_context(|| format!("No decodable frame in {}", path.display()));
        }
    }

    let buffer = AudioBuffer::new(all_samples, channels.max(1) as u16, sample_rate);
    log::info!(
        "Decoded {} frames x {} ch @ {}Hz from {}",
        buffer.frame_count(),
        buffer.channels,
        buffer.sample_rate,
        path.display()
    );
    Ok(buffer)
}

/// Decode a file, downmix to mono and resample to `target_rate`.
///
/// A `target_rate` of 0 keeps the native rate.
///
/// # Errors
/// Same as [`decode_file`], plus [`resample`] failures.
pub fn decode_mono(path: impl AsRef<Path>, target_rate: u32) -> Result<AudioBuffer> {
    let mono = decode_file(path)?.to_mono();
    if target_rate == 0 || target_rate == mono.sample_rate || mono.sample_rate == 0 {
        return Ok(mono);
    }
    let samples = resample(&mono.samples, mono.sample_rate, target_rate)?;
    Ok(AudioBuffer::new(samples, 1, target_rate))
}

/// Frames fed to the resampler per call.
const RESAMPLE_CHUNK: usize = 1024;

/// Band-limited resampling of a mono signal (rubato FFT resampler).
///
/// Content above the lower Nyquist frequency is filtered out before the
/// rate change. The output is aligned on the input (resampler delay removed)
/// and holds `round(len * to_rate / from_rate)` samples.
///
/// # Errors
/// Returns an error if rubato rejects the rate pair.
///
/// # Example
/// ```
/// use cs_audio::decode::resample;
/// let same = resample(&[0.1, 0.2], 8000, 8000).unwrap();
/// assert_eq!(same, vec![0.1, 0.2]);
/// assert_eq!(resample(&vec![0.0; 4410], 44_100, 22_050).unwrap().len(), 2205);
/// ```
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if samples.is_empty() || from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return Ok(samples.to_vec());
    }
    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, RESAMPLE_CHUNK, 2, 1)
            .with_context(|| format!("Cannot resample {from_rate} Hz to {to_rate} Hz"))?;

    let expected = ((samples.len() as u64 * u64::from(to_rate) + u64::from(from_rate) / 2)
        / u64::from(from_rate)) as usize;
    let delay = resampler.output_delay();
    let mut out: Vec<f32> = Vec::with_capacity(delay + expected + RESAMPLE_CHUNK);

    let mut pos = 0;
    while samples.len() - pos >= resampler.input_frames_next() {
        let n = resampler.input_frames_next();
        let chunk = resampler
            .process(&[&samples[pos..pos + n]], None)
            .context("Resampling failed")?;
        out.extend_from_slice(&chunk[0]);
        pos += n;
    }
    if pos < samples.len() {
        let chunk = resampler
            .process_partial(Some(&[&samples[pos..]][..]), None)
            .context("Resampling failed")?;
        out.extend_from_slice(&chunk[0]);
    }
    // vidange : le filtre retient encore `delay` frames
    while out.len() < delay + expected {
        let chunk = resampler
            .process_partial::<&[f32]>(None, None)
            .context("Resampling flush failed")?;
        if chunk[0].is_empty() {
            break;
        }
        out.extend_from_slice(&chunk[0]);
    }

    out.truncate(delay + expected);
    out.drain(..delay.min(out.len()));
    log::debug!("Resampled {} → {} samples ({from_rate} → {to_rate} Hz)", samples.len(), out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Minimal 16-bit PCM WAV writer for fixtures.
    fn write_wav(path: &Path, samples: &[i16], channels: u16, rate: u32) {
        let data_len = (samples.len() * 2) as u32;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&(rate * u32::from(channels) * 2).to_le_bytes());
        bytes.extend_from_slice(&(channels * 2).to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        let mut f = File::create(path).unwrap();
        f.write_all(&bytes).unwrap();
    }

    #[test]
    fn decodes_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let frames: Vec<i16> = (0..800)
            .flat_map(|i| if i % 2 == 0 { [16384, -16384] } else { [0, 8192] })
            .collect();
        write_wav(&path, &frames, 2, 8000);

        let buf = decode_file(&path).unwrap();
        assert_eq!(buf.channels, 2);
        assert_eq!(buf.sample_rate, 8000);
        assert_eq!(buf.frame_count(), 800);
        assert!((buf.samples[0] - 0.5).abs() < 1e-4);
        assert!((buf.samples[1] + 0.5).abs() < 1e-4);
        assert!((buf.samples[3] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn mono_decode_resamples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.wav");
        write_wav(&path, &vec![8192i16; 44_100], 1, 44_100);

        let buf = decode_mono(&path, 22_050).unwrap();
        assert_eq!(buf.channels, 1);
        assert_eq!(buf.sample_rate, 22_050);
        assert_eq!(buf.frame_count(), 22_050);
        // bords exclus : le filtre sonne sur les fronts du signal
        assert!(buf.samples[1000..21_050].iter().all(|s| (s - 0.25).abs() < 1e-2));

        let native = decode_mono(&path, 0).unwrap();
        assert_eq!(native.sample_rate, 44_100);
    }

    #[test]
    fn empty_wav_decodes_to_empty_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, &[], 1, 16_000);
        let buf = decode_file(&path).unwrap();
        assert_eq!(buf.frame_count(), 0);
        assert_eq!(buf.duration_ms(), 0);
    }

    #[test]
    fn non_audio_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.mp3");
        std::fs::write(&path, b"this is definitely not an mp3 stream").unwrap();
        let err = decode_file(&path).unwrap_err();
        assert!(err.downcast_ref::<AudioError>().is_some(), "{err:?}");
    }

    #[test]
    fn missing_file_fails() {
        assert!(decode_file("/nonexistent/definitely/missing.wav").is_err());
    }

    fn sine(freq: f32, rate: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    fn middle_rms(s: &[f32]) -> f32 {
        let mid = &s[s.len() / 4..3 * s.len() / 4];
        (mid.iter().map(|x| x * x).sum::<f32>() / mid.len() as f32).sqrt()
    }

    #[test]
    fn resample_identity_and_empty() {
        let s = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(resample(&s, 100, 100).unwrap(), s.to_vec());
        assert!(resample(&[], 1, 2).unwrap().is_empty());
        assert_eq!(resample(&s, 0, 22_050).unwrap(), s.to_vec());
    }

    #[test]
    fn resample_length_follows_rate_ratio() {
        assert_eq!(resample(&vec![0.0; 1000], 48_000, 22_050).unwrap().len(), 459);
        assert_eq!(resample(&vec![0.0; 300], 8000, 16_000).unwrap().len(), 600);
    }

    #[test]
    fn tone_above_new_nyquist_is_filtered() {
        // 15 kHz > 11.025 kHz : doit disparaître, pas se replier vers 7 kHz
        let out = resample(&sine(15_000.0, 44_100, 22_050), 44_100, 22_050).unwrap();
        assert_eq!(out.len(), 11_025);
        assert!(middle_rms(&out) < 0.1, "rms {}", middle_rms(&out));
    }

    #[test]
    fn in_band_tone_is_preserved() {
        let out = resample(&sine(1000.0, 44_100, 22_050), 44_100, 22_050).unwrap();
        let rms = middle_rms(&out);
        assert!((rms - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.02, "rms {rms}");
    }

    #[test]
    fn gapless_decoding_keeps_exact_wav_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.wav");
        write_wav(&path, &vec![1000i16; 12_345], 1, 22_050);
        assert_eq!(decode_file(&path).unwrap().frame_count(), 12_345);
    }
}
