use std::env;
use std::error::Error;
use std::fmt::{self, Display};
use std::path::PathBuf;

use triage_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

const API_KEY_VAR: &str = "GROQ_API_KEY";
const BASE_URL_VAR: &str = "TRIAGE_BASE_URL";
const MODEL_VAR: &str = "TRIAGE_MODEL";
const TRANSCRIPTION_MODEL_VAR: &str = "TRIAGE_TRANSCRIPTION_MODEL";
const EXPORT_DIR_VAR: &str = "TRIAGE_EXPORT_DIR";

/// Startup configuration, read from the process environment.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    base_url: Option<String>,
    model: Option<String>,
    transcription_model: Option<String>,
    /// Where exported transcripts are written.
    pub export_dir: PathBuf,
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// `GROQ_API_KEY` is required. `TRIAGE_BASE_URL`, `TRIAGE_MODEL`,
    /// `TRIAGE_TRANSCRIPTION_MODEL` and `TRIAGE_EXPORT_DIR` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value
    /// of a variable by name.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let Some(api_key) = optional(API_KEY_VAR) else {
            return Err(ConfigError::Missing(API_KEY_VAR));
        };
        if !api_key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ConfigError::Invalid {
                name: API_KEY_VAR,
                reason: "it must not contain spaces or control characters",
            });
        }

        Ok(Self {
            api_key,
            base_url: optional(BASE_URL_VAR),
            model: optional(MODEL_VAR),
            transcription_model: optional(TRANSCRIPTION_MODEL_VAR),
            export_dir: optional(EXPORT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Builds the configuration for the chat and transcription providers.
    pub fn openai_config(&self) -> OpenAIConfig {
        let mut builder = OpenAIConfigBuilder::with_api_key(&self.api_key);
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        if let Some(model) = &self.model {
            builder = builder.with_model(model);
        }
        if let Some(model) = &self.transcription_model {
            builder = builder.with_transcription_model(model);
        }
        builder.build()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<deducted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("transcription_model", &self.transcription_model)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}

/// The configuration is unusable, the program cannot start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    Missing(&'static str),
    /// A variable is set to an unusable value.
    Invalid {
        /// Name of the variable.
        name: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => {
                write!(f, "{name} environment variable is not set")
            }
            ConfigError::Invalid { name, reason } => {
                write!(f, "{name} environment variable is invalid: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}
