//! Sources of voice input.

#[cfg(feature = "microphone")]
mod microphone;
mod wav_file;

use std::error::Error;
use std::fmt::{self, Display};
use std::time::Duration;

#[cfg(feature = "microphone")]
pub use microphone::record;
pub use wav_file::read_wav;

/// Longest stretch of speech captured in one recording.
pub const MAX_RECORDING: Duration = Duration::from_secs(5);

/// Audio could not be captured at all, so there is nothing to transcribe.
#[derive(Debug)]
pub enum CaptureError {
    /// No usable input device, or the device failed.
    Device(String),
    /// The audio file could not be read.
    File(hound::Error),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Device(detail) => {
                write!(f, "microphone error: {detail}")
            }
            CaptureError::File(err) => write!(f, "cannot read audio file: {err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CaptureError::Device(_) => None,
            CaptureError::File(err) => Some(err),
        }
    }
}

impl From<hound::Error> for CaptureError {
    #[inline]
    fn from(err: hound::Error) -> Self {
        CaptureError::File(err)
    }
}

/// Averages interleaved frames of normalized samples into mono 16-bit PCM.
pub(crate) fn downmix(interleaved: &[f32], channels: u16) -> Vec<i16> {
    let channels = usize::from(channels.max(1));
    interleaved
        .chunks(channels)
        .map(|frame| {
            let mean = frame.iter().sum::<f32>() / frame.len() as f32;
            (mean.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono() {
        assert_eq!(downmix(&[0.0, 1.0, -1.0], 1), vec![0, i16::MAX, -i16::MAX]);
    }

    #[test]
    fn test_downmix_stereo() {
        assert_eq!(downmix(&[1.0, 0.0, -0.5, -0.5, 2.0, 2.0], 2), vec![
            16383,
            -16383,
            i16::MAX
        ]);
    }
}
