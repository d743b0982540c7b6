use std::io::Cursor;
use std::sync::Arc;

use hound::{SampleFormat, WavSpec, WavWriter};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, header};
use triage_model::{CapturedAudio, RecognitionError, SpeechRecognizer};

use crate::OpenAIConfig;
use crate::proto::TranscriptionResponse;

/// Speech recognizer backed by the `/audio/transcriptions` endpoint of an
/// OpenAI-compatible API.
#[derive(Clone, Debug)]
pub struct OpenAITranscriber {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAITranscriber {
    /// Creates a new `OpenAITranscriber` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self::with_client(Client::new(), Arc::new(config))
    }

    #[inline]
    pub(crate) fn with_client(client: Client, config: Arc<OpenAIConfig>) -> Self {
        Self { client, config }
    }
}

impl SpeechRecognizer for OpenAITranscriber {
    fn recognize(
        &self,
        audio: &CapturedAudio,
    ) -> impl Future<Output = Result<String, RecognitionError>> + Send + 'static
    {
        let wav = if audio.is_empty() {
            None
        } else {
            Some(encode_wav(audio))
        };
        let client = self.client.clone();
        let config = Arc::clone(&self.config);

        async move {
            let Some(wav) = wav else {
                return Err(RecognitionError::Unintelligible);
            };
            let wav = wav.map_err(|err| {
                RecognitionError::Service(format!("failed to encode audio: {err}"))
            })?;
            debug!("uploading {} bytes of audio", wav.len());

            let file = Part::bytes(wav)
                .file_name("speech.wav")
                .mime_str("audio/wav")
                .map_err(|err| RecognitionError::Service(format!("{err}")))?;
            let form = Form::new()
                .text("model", config.transcription_model.clone())
                .text("response_format", "json")
                .part("file", file);

            let resp = client
                .post(format!("{}{}", config.base_url, "/audio/transcriptions"))
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", config.api_key),
                )
                .multipart(form)
                .send()
                .await
                .map_err(|err| RecognitionError::Service(format!("{err}")))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                error!("transcription failed with {status}: {body}");
                return Err(RecognitionError::Service(format!(
                    "HTTP {status}: {}",
                    body.trim()
                )));
            }

            let body = resp
                .json::<TranscriptionResponse>()
                .await
                .map_err(|err| RecognitionError::Service(format!("{err}")))?;
            transcript_from_response(body)
        }
    }
}

/// Blank transcripts mean the service heard nothing it could recognize.
fn transcript_from_response(
    resp: TranscriptionResponse,
) -> Result<String, RecognitionError> {
    let text = resp.text.trim();
    if text.is_empty() {
        return Err(RecognitionError::Unintelligible);
    }
    Ok(text.to_owned())
}

fn encode_wav(audio: &CapturedAudio) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for sample in &audio.samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}
