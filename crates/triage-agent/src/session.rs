use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use triage_core::conversation::{Conversation, Message};
use triage_core::input::{PendingVoiceInput, resolve_input};
use triage_core::language::LanguageDetector;
use triage_core::speech::SpeechClient;
use triage_core::transcript::export_file_name;
use triage_core::{Triage, TriageBuilder, TurnError};
use triage_model::{
    CapturedAudio, ModelProvider, RecognitionError, SpeechRecognizer,
};

use crate::theme::Theme;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    triage_builder: TriageBuilder,
    speech_client: Option<SpeechClient>,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        Self {
            triage_builder: TriageBuilder::with_model_provider(provider),
            speech_client: None,
        }
    }

    /// Enables voice input with the given recognizer.
    #[inline]
    pub fn with_speech_recognizer<R: SpeechRecognizer + 'static>(
        mut self,
        recognizer: R,
    ) -> Self {
        self.speech_client = Some(SpeechClient::new(recognizer));
        self
    }

    /// Replaces the default language detector.
    #[inline]
    pub fn with_language_detector<D: LanguageDetector + 'static>(
        mut self,
        detector: D,
    ) -> Self {
        self.triage_builder =
            self.triage_builder.with_language_detector(detector);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            triage: self.triage_builder.build(),
            speech_client: self.speech_client,
            conversation: Conversation::new(),
            pending_voice: PendingVoiceInput::default(),
            theme: Theme::default(),
        }
    }
}

/// A triage chat session, like a window that displays messages and has an
/// input box and a record button.
///
/// The session owns all per-user state: the conversation, the voice input
/// waiting for the next turn, and the display theme. It lives as long as
/// the user interacts with it and nothing is persisted.
pub struct Session {
    triage: Triage,
    speech_client: Option<SpeechClient>,
    conversation: Conversation,
    pending_voice: PendingVoiceInput,
    theme: Theme,
}

impl Session {
    /// Transcribes recorded audio and keeps the text as the input for the
    /// next turn.
    ///
    /// On failure, nothing is kept and the session stays usable for typed
    /// input.
    pub async fn transcribe(
        &mut self,
        audio: &CapturedAudio,
    ) -> Result<&str, RecognitionError> {
        let Some(speech_client) = &self.speech_client else {
            return Err(RecognitionError::Service(
                "voice input is not configured".to_owned(),
            ));
        };
        let text = speech_client.recognize(audio).await?;
        self.pending_voice.set(text);
        Ok(self.pending_voice.peek().unwrap_or_default())
    }

    /// Runs a turn with the pending voice input if any, or else with
    /// `typed`.
    ///
    /// Returns `Ok(None)` when there is no input, in which case nothing
    /// happens.
    pub async fn submit(
        &mut self,
        typed: Option<&str>,
    ) -> Result<Option<&Message>, TurnError> {
        let Some(input) = resolve_input(&mut self.pending_voice, typed) else {
            return Ok(None);
        };
        self.triage
            .run_turn(&mut self.conversation, input)
            .await
            .map(Some)
    }

    /// Returns the conversation to its initial state and drops any pending
    /// voice input.
    #[inline]
    pub fn reset(&mut self) {
        info!("resetting conversation");
        self.conversation.reset();
        self.pending_voice = PendingVoiceInput::default();
    }

    /// Writes the transcript to `chat_<timestamp>.txt` in `dir`, and
    /// returns the path of the file.
    pub fn export_transcript(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(export_file_name(&Local::now()));
        fs::write(&path, self.conversation.transcript())?;
        info!("exported transcript to {}", path.display());
        Ok(path)
    }

    /// Switches between the light and dark theme.
    #[inline]
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Returns the current theme.
    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Returns the conversation.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns `true` if voice input can be used.
    #[inline]
    pub fn has_voice_input(&self) -> bool {
        self.speech_client.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::future::ready;

    use triage_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    struct FixedLanguage(&'static str);

    impl LanguageDetector for FixedLanguage {
        fn detect(&self, _text: &str) -> Option<String> {
            Some(self.0.to_owned())
        }
    }

    /// Hears "cough" in any recording that isn't silent.
    struct FakeRecognizer;

    impl SpeechRecognizer for FakeRecognizer {
        fn recognize(
            &self,
            audio: &CapturedAudio,
        ) -> impl Future<Output = Result<String, RecognitionError>>
        + Send
        + 'static {
            let result = if audio.is_empty() {
                Err(RecognitionError::Service("connection reset".to_owned()))
            } else if audio.samples.iter().all(|s| *s == 0) {
                Err(RecognitionError::Unintelligible)
            } else {
                Ok("cough".to_owned())
            };
            ready(result)
        }
    }

    fn build_session(replies: &[&str]) -> Session {
        let mut model_provider = TestModelProvider::default();
        for reply in replies {
            model_provider.add_assistant_turn(PresetResponse::with_reply(*reply));
        }
        SessionBuilder::with_model_provider(model_provider)
            .with_language_detector(FixedLanguage("en"))
            .with_speech_recognizer(FakeRecognizer)
            .build()
    }

    fn speech() -> CapturedAudio {
        CapturedAudio::new(vec![0, 900, -700, 300], 16_000)
    }

    #[tokio::test]
    async fn test_voice_input_wins_over_typed() {
        let mut session = build_session(&["Stay hydrated.", "Take a rest."]);

        assert_eq!(session.transcribe(&speech()).await.unwrap(), "cough");
        session.submit(Some("fever")).await.unwrap().unwrap();
        assert_eq!(
            session.conversation().messages()[1],
            Message::user("cough")
        );

        // The voice input has been consumed, typed input is used now.
        session.submit(Some("fever")).await.unwrap().unwrap();
        assert_eq!(
            session.conversation().messages()[3],
            Message::user("fever")
        );
        assert_eq!(session.conversation().len(), 5);
    }

    #[tokio::test]
    async fn test_no_input_does_nothing() {
        let mut session = build_session(&[]);
        assert!(session.submit(None).await.unwrap().is_none());
        assert!(session.submit(Some("  ")).await.unwrap().is_none());
        assert_eq!(session.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_recognition_keeps_nothing() {
        let mut session = build_session(&["Rest."]);

        let silence = CapturedAudio::new(vec![0; 64], 16_000);
        assert_eq!(
            session.transcribe(&silence).await.unwrap_err(),
            RecognitionError::Unintelligible
        );
        assert!(matches!(
            session.transcribe(&CapturedAudio::default()).await,
            Err(RecognitionError::Service(_))
        ));

        let reply = session.submit(Some("rash")).await.unwrap().unwrap();
        assert_eq!(reply.content(), "Rest.\n\n**Urgency Level:** ⚠️ Medium");
    }

    #[tokio::test]
    async fn test_voice_input_not_configured() {
        let mut session =
            SessionBuilder::with_model_provider(TestModelProvider::default())
                .build();
        assert!(!session.has_voice_input());
        assert!(matches!(
            session.transcribe(&speech()).await,
            Err(RecognitionError::Service(_))
        ));
    }

    #[tokio::test]
    async fn test_reset() {
        let mut session = build_session(&["Rest."]);
        session.submit(Some("fever")).await.unwrap();
        session.transcribe(&speech()).await.unwrap();

        session.reset();
        assert_eq!(session.conversation(), &Conversation::new());
        assert!(session.submit(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_export_transcript() {
        let mut session = build_session(&["Possible migraine."]);
        session.submit(Some("severe headache")).await.unwrap();

        let dir = env::temp_dir()
            .join(format!("triage-agent-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = session.export_transcript(&dir).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).ok();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("chat_") && name.ends_with(".txt"));
        assert_eq!(name.len(), "chat_20240131_094502.txt".len());
        assert_eq!(
            body,
            "User: severe headache\n\nAI: Possible migraine.\n\n\
             **Urgency Level:** 🚨 Emergency\n\n"
        );
    }

    #[test]
    fn test_toggle_theme() {
        let mut session = build_session(&[]);
        assert_eq!(session.theme(), Theme::Light);
        assert_eq!(session.toggle_theme(), Theme::Dark);
        assert_eq!(session.toggle_theme(), Theme::Light);
    }
}
