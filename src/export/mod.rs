//! Audio export for rendered PSG output
//!
//! Writes the interpreter's sample buffer to disk:
//! - WAV (16-bit PCM via `hound`)
//! - Raw (headerless 16-bit little-endian PCM)
//!
//! The default configuration writes the buffer exactly as rendered. Peak
//! normalization, a linear fade out and mono-to-stereo duplication are
//! opt-in post-processing steps.
//!
//! # Examples
//!
//! ```no_run
//! use sn76489::export::{write_wav, ExportConfig};
//! use sn76489::vgm::{load_file, render};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vgm = load_file("song.vgz")?;
//! let output = render(&vgm)?;
//!
//! let config = ExportConfig::stereo().fade_out(2.0);
//! write_wav("song.wav", &output.samples, &config)?;
//! # Ok(())
//! # }
//! ```

mod raw;
mod wav;

pub use raw::write_raw;
pub use wav::write_wav;

use crate::{Result, Sn76489Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Rate the VGM interpreter renders at
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Peak level targeted by normalization, as a fraction of full scale
const NORMALIZE_HEADROOM: f32 = 0.95;

/// Export configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Sample rate stamped into the output (default: 44100 Hz)
    pub sample_rate: u32,
    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Scale the buffer so its peak sits just below full scale
    pub normalize: bool,
    /// Fade out duration in seconds (0 = no fade)
    pub fade_out_duration: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
            normalize: false,
            fade_out_duration: 0.0,
        }
    }
}

impl ExportConfig {
    /// Create config for stereo export
    pub fn stereo() -> Self {
        Self {
            channels: 2,
            ..Default::default()
        }
    }

    /// Enable or disable peak normalization
    pub fn normalize(mut self, enable: bool) -> Self {
        self.normalize = enable;
        self
    }

    /// Add fade out at the end
    pub fn fade_out(mut self, duration_seconds: f32) -> Self {
        self.fade_out_duration = duration_seconds;
        self
    }

    /// Reject settings no writer can honour
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.channels) {
            return Err(Sn76489Error::ConfigError(format!(
                "channels must be 1 or 2, got {}",
                self.channels
            )));
        }
        if self.sample_rate == 0 {
            return Err(Sn76489Error::ConfigError(
                "sample rate must be non-zero".into(),
            ));
        }
        if !self.fade_out_duration.is_finite() || self.fade_out_duration < 0.0 {
            return Err(Sn76489Error::ConfigError(format!(
                "fade out duration must be a non-negative number of seconds, got {}",
                self.fade_out_duration
            )));
        }
        Ok(())
    }
}

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// RIFF WAVE, 16-bit PCM
    #[default]
    Wav,
    /// Headerless 16-bit little-endian PCM
    Raw,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Wav => "wav",
            ExportFormat::Raw => "bin",
        }
    }

    /// Write `samples` in this format
    pub fn write<P: AsRef<Path>>(
        self,
        path: P,
        samples: &[i16],
        config: &ExportConfig,
    ) -> Result<()> {
        match self {
            ExportFormat::Wav => write_wav(path, samples, config),
            ExportFormat::Raw => write_raw(path, samples, config),
        }
    }
}

/// Output path next to `input` with the extension swapped for `format`
pub fn default_output_path<P: AsRef<Path>>(input: P, format: ExportFormat) -> PathBuf {
    input.as_ref().with_extension(format.extension())
}

/// Apply the configured post-processing and channel layout
fn prepare(samples: &[i16], config: &ExportConfig) -> Result<Vec<i16>> {
    config.validate()?;

    let mut processed = samples.to_vec();
    if config.normalize {
        log::debug!("Normalizing audio");
        normalize_samples(&mut processed);
    }
    if config.fade_out_duration > 0.0 {
        log::debug!("Applying {:.1}s fade out", config.fade_out_duration);
        apply_fade_out(&mut processed, config.fade_out_duration, config.sample_rate);
    }

    Ok(if config.channels == 2 {
        mono_to_stereo(&processed)
    } else {
        processed
    })
}

/// Scale samples so the peak magnitude lands at the normalization headroom
fn normalize_samples(samples: &mut [i16]) {
    let peak = samples
        .iter()
        .map(|s| s.unsigned_abs())
        .max()
        .unwrap_or(0);
    if peak == 0 {
        return;
    }

    let scale = NORMALIZE_HEADROOM * i16::MAX as f32 / f32::from(peak);
    for sample in samples.iter_mut() {
        *sample = (f32::from(*sample) * scale)
            .round()
            .clamp(i16::MIN as f32, i16::MAX as f32) as i16;
    }
}

/// Apply a linear fade out to the end of the buffer
fn apply_fade_out(samples: &mut [i16], fade_duration: f32, sample_rate: u32) {
    if fade_duration <= 0.0 || samples.is_empty() {
        return;
    }

    let fade_samples = (fade_duration * sample_rate as f32) as usize;
    if fade_samples == 0 {
        return;
    }
    let start_fade = samples.len().saturating_sub(fade_samples);

    for (i, sample) in samples.iter_mut().enumerate().skip(start_fade) {
        let progress = (i - start_fade + 1) as f32 / fade_samples as f32;
        *sample = (f32::from(*sample) * (1.0 - progress)) as i16;
    }
}

/// Convert mono samples to stereo (duplicate each sample)
fn mono_to_stereo(mono: &[i16]) -> Vec<i16> {
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for &sample in mono {
        stereo.push(sample);
        stereo.push(sample);
    }
    stereo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_raw_mono() {
        let config = ExportConfig::default();
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.channels, 1);
        assert!(!config.normalize);
        assert_eq!(config.fade_out_duration, 0.0);
    }

    #[test]
    fn test_export_config_builder() {
        let config = ExportConfig::stereo().normalize(true).fade_out(2.0);

        assert_eq!(config.channels, 2);
        assert!(config.normalize);
        assert_eq!(config.fade_out_duration, 2.0);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ExportConfig = serde_json::from_str(r#"{"channels": 2}"#).unwrap();
        assert_eq!(config, ExportConfig::stereo());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = ExportConfig::default();
        config.channels = 6;
        assert!(matches!(
            config.validate(),
            Err(Sn76489Error::ConfigError(_))
        ));
        assert!(ExportConfig::default().fade_out(-1.0).validate().is_err());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("music/song.vgz", ExportFormat::Wav),
            PathBuf::from("music/song.wav")
        );
        assert_eq!(
            default_output_path("song.vgm", ExportFormat::Raw),
            PathBuf::from("song.bin")
        );
    }

    #[test]
    fn test_prepare_leaves_buffer_untouched_by_default() {
        let samples = vec![8191, 0, 32764, 12];
        assert_eq!(prepare(&samples, &ExportConfig::default()).unwrap(), samples);
    }

    #[test]
    fn test_normalize_samples() {
        let mut samples = vec![0, 8191, 16382];
        normalize_samples(&mut samples);
        let target = (0.95 * i16::MAX as f32).round() as i16;
        assert_eq!(samples[0], 0);
        assert_eq!(samples[2], target);
        assert!((i32::from(samples[1]) - i32::from(target) / 2).abs() <= 1);
    }

    #[test]
    fn test_normalize_silence_is_noop() {
        let mut samples = vec![0; 16];
        normalize_samples(&mut samples);
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_fade_out() {
        let mut samples = vec![10_000; 1000];
        apply_fade_out(&mut samples, 0.01, 44_100); // 441-sample fade

        assert_eq!(samples[0], 10_000);
        assert_eq!(samples[558], 10_000);
        assert!(samples[600] < 10_000);
        assert_eq!(samples[999], 0);
    }

    #[test]
    fn test_mono_to_stereo() {
        assert_eq!(mono_to_stereo(&[1, 2, 3]), vec![1, 1, 2, 2, 3, 3]);
    }
}
