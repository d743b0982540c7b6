use std::path::Path;

use hound::{SampleFormat, WavReader};
use triage_model::CapturedAudio;

use super::{CaptureError, downmix};

/// Reads a WAV file as voice input. Any channel count, integer or float
/// samples are accepted.
pub fn read_wav(path: &Path) -> Result<CapturedAudio, CaptureError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    debug!("reading {}: {spec:?}", path.display());

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => {
            reader.samples::<f32>().collect::<Result<_, _>>()?
        }
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    Ok(CapturedAudio::new(
        downmix(&samples, spec.channels),
        spec.sample_rate,
    ))
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use hound::{WavSpec, WavWriter};

    use super::*;

    #[test]
    fn test_read_stereo_wav() {
        let path = env::temp_dir().join(format!(
            "triage-agent-test-{}.wav",
            std::process::id()
        ));
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for sample in [1000_i16, 3000, -2000, -2000] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let audio = read_wav(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(audio.sample_rate, 44_100);
        assert_eq!(audio.samples.len(), 2);
        assert!((audio.samples[0] - 2000).abs() <= 1);
        assert!((audio.samples[1] + 2000).abs() <= 1);
    }

    #[test]
    fn test_missing_file() {
        let err = read_wav(Path::new("/nonexistent/voice.wav")).unwrap_err();
        assert!(matches!(err, CaptureError::File(_)));
    }
}
