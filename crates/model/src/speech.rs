use std::error::Error;
use std::fmt::{self, Display};

/// A piece of recorded audio, downmixed to mono 16-bit PCM.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CapturedAudio {
    /// The PCM samples.
    pub samples: Vec<i16>,
    /// Samples per second.
    pub sample_rate: u32,
}

impl CapturedAudio {
    /// Creates a new `CapturedAudio` from mono samples.
    #[inline]
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Returns `true` if no samples were recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The error returned by a [`SpeechRecognizer`].
///
/// The two variants must be reported differently to the user: one means
/// "try speaking again", the other means the service itself is broken.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecognitionError {
    /// The audio was received but no speech could be recognized.
    Unintelligible,
    /// The recognition service could not be reached or failed.
    Service(String),
}

impl Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionError::Unintelligible => {
                write!(f, "couldn't understand audio")
            }
            RecognitionError::Service(detail) => {
                write!(f, "recognition service error: {detail}")
            }
        }
    }
}

impl Error for RecognitionError {}

/// A type that turns captured audio into text.
///
/// Like [`crate::ModelProvider`], implementations should behave like
/// stateless objects.
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribes the audio.
    fn recognize(
        &self,
        audio: &CapturedAudio,
    ) -> impl Future<Output = Result<String, RecognitionError>> + Send + 'static;
}
