//! Voice input.

use std::pin::Pin;
use std::sync::Arc;

use tracing::Instrument;
use triage_model::{CapturedAudio, RecognitionError, SpeechRecognizer};

type RecognizeResult = Result<String, RecognitionError>;
type BoxedRecognizeFuture =
    Pin<Box<dyn Future<Output = RecognizeResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(&CapturedAudio) -> BoxedRecognizeFuture + Send + Sync>;

/// A type-erased [`SpeechRecognizer`], so that sessions don't need a
/// generic parameter for it.
#[derive(Clone)]
pub struct SpeechClient {
    handler_fn: HandlerFn,
}

impl SpeechClient {
    /// Wraps a speech recognizer.
    #[inline]
    pub fn new<R: SpeechRecognizer + 'static>(recognizer: R) -> Self {
        let handler_fn: HandlerFn = Arc::new(move |audio: &CapturedAudio| {
            let samples = audio.samples.len();
            let fut = recognizer.recognize(audio);
            Box::pin(
                async move {
                    trace!("recognizing {samples} samples");
                    let result = fut.await;
                    match &result {
                        Ok(text) => debug!("recognized: {text}"),
                        Err(err) => warn!("recognition failed: {err}"),
                    }
                    result
                }
                .instrument(trace_span!("speech client req")),
            )
        });
        Self { handler_fn }
    }

    /// Transcribes the audio.
    ///
    /// [`RecognitionError::Unintelligible`] and
    /// [`RecognitionError::Service`] must be reported to the user
    /// differently.
    #[inline]
    pub async fn recognize(&self, audio: &CapturedAudio) -> RecognizeResult {
        (self.handler_fn)(audio).await
    }
}
