mod builder;

use std::error::Error;
use std::fmt::{self, Display};

use triage_model::{ErrorKind, ModelProviderError, ModelRequest};

use crate::conversation::{Conversation, Message};
use crate::language::LanguageDetector;
use crate::model_client::ModelClient;
use crate::urgency::classify;
pub use builder::TriageBuilder;

/// Placeholder appended for non-English input until translation exists.
const TRANSLATION_PENDING: &str = "[Translation feature coming soon]";

/// Runs triage turns: asks the model about the symptoms and tags its
/// reply with a language note and an urgency rating.
///
/// `Triage` holds no conversation state itself. The conversation is passed
/// in by mutable reference, so turns on one conversation can only ever run
/// one at a time.
pub struct Triage {
    model_client: ModelClient,
    language_detector: Box<dyn LanguageDetector>,
}

impl Triage {
    /// Runs one turn with an already resolved input, and returns the
    /// assistant message that was appended.
    ///
    /// The user message is appended before the model is called, and is
    /// kept when the call fails. No retry is attempted.
    pub async fn run_turn<'c>(
        &self,
        conversation: &'c mut Conversation,
        input: String,
    ) -> Result<&'c Message, TurnError> {
        debug!("running turn with {} prior messages", conversation.len());
        conversation.push(Message::user(input.as_str()));

        let request = ModelRequest {
            messages: conversation.to_model_messages(),
        };
        let resp = self
            .model_client
            .send_request(request)
            .await
            .map_err(|source| TurnError { source })?;
        if resp.finish_reason.is_none() {
            warn!("reply stream ended without a finish reason");
        }

        let reply = self.augment_reply(resp.transcript, &input);
        Ok(conversation.push(Message::assistant(reply)))
    }

    fn augment_reply(&self, mut reply: String, input: &str) -> String {
        match self.language_detector.detect(input) {
            Some(code) if code != "en" => {
                reply.push_str(&format!(
                    "\n\n🌐 Translation ({}): {TRANSLATION_PENDING}",
                    code.to_uppercase()
                ));
            }
            Some(_) => {}
            None => debug!("input language unknown, no translation note"),
        }

        let urgency = classify(input);
        debug!("urgency rated {}", urgency.name());
        reply.push_str(&format!("\n\n**Urgency Level:** {urgency}"));
        reply
    }
}

/// The chat-completion call of a turn failed.
///
/// The conversation still holds the user message of the failed turn.
#[derive(Debug)]
pub struct TurnError {
    source: Box<dyn ModelProviderError>,
}

impl TurnError {
    /// Returns the kind of the underlying provider error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

impl Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat completion failed: {}", self.source)
    }
}

impl Error for TurnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}
