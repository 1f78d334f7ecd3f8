//! WAV file export

use super::{prepare, ExportConfig};
use crate::{Result, Sn76489Error};
use std::path::Path;

/// Write rendered samples to a 16-bit PCM WAV file
///
/// # Examples
///
/// ```no_run
/// use sn76489::export::{write_wav, ExportConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let samples: Vec<i16> = vec![8191, 0, 8191, 0];
/// write_wav("output.wav", &samples, &ExportConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[i16], config: &ExportConfig) -> Result<()> {
    let path = path.as_ref();
    let final_samples = prepare(samples, config)?;

    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| {
        Sn76489Error::AudioFileError(format!(
            "failed to create WAV file '{}': {}",
            path.display(),
            e
        ))
    })?;

    for &sample in &final_samples {
        writer
            .write_sample(sample)
            .map_err(|e| Sn76489Error::AudioFileError(format!("failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| Sn76489Error::AudioFileError(format!("failed to finalize WAV file: {}", e)))?;

    log::info!(
        "Wrote {} frames to {} ({} Hz, {} channel{})",
        samples.len(),
        path.display(),
        config.sample_rate,
        config.channels,
        if config.channels == 1 { "" } else { "s" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_round_trip_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let samples = vec![8191, 0, 8191, 0, 32764];

        write_wav(&path, &samples, &ExportConfig::default()).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn test_wav_stereo_duplicates_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        write_wav(&path, &[1, 2], &ExportConfig::stereo()).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.duration(), 2);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_unwritable_path_is_audio_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.wav");
        let err = write_wav(&path, &[0], &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, Sn76489Error::AudioFileError(_)));
        assert_eq!(err.exit_code(), 6);
    }
}
