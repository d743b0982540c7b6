use triage_model::ModelProvider;

use super::Triage;
use crate::language::{LanguageDetector, LinguaDetector};
use crate::model_client::ModelClient;

/// [`Triage`] builder.
pub struct TriageBuilder {
    model_client: ModelClient,
    language_detector: Option<Box<dyn LanguageDetector>>,
}

impl TriageBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            language_detector: None,
        }
    }

    /// Replaces the default [`LinguaDetector`].
    #[inline]
    pub fn with_language_detector<D: LanguageDetector + 'static>(
        mut self,
        detector: D,
    ) -> Self {
        self.language_detector = Some(Box::new(detector));
        self
    }

    /// Builds the orchestrator.
    #[inline]
    pub fn build(self) -> Triage {
        Triage {
            model_client: self.model_client,
            language_detector: self
                .language_detector
                .unwrap_or_else(|| Box::new(LinguaDetector::new())),
        }
    }
}
