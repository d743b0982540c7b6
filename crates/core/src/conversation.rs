//! Conversation-related types.

use std::fmt::{self, Display};

use triage_model::ModelMessage;

use crate::transcript::format_transcript;

/// The instructions every conversation starts with.
pub const SYSTEM_PROMPT: &str = "You are a helpful medical triage assistant. \
Based on the user's symptoms, identify possible conditions, recommend a \
relevant doctor (e.g., cardiologist, neurologist), rate urgency \
(Low/Medium/Emergency), and provide basic advice. Always respond in English \
first, then translate the same reply to the user's language if it's not \
English.";

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The fixed instructions for the model.
    System,
    /// The person describing their symptoms.
    User,
    /// The model.
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in the conversation. Messages never change once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    pub(crate) fn to_model_message(&self) -> ModelMessage {
        let content = self.content.clone();
        match self.role {
            Role::System => ModelMessage::System(content),
            Role::User => ModelMessage::User(content),
            Role::Assistant => ModelMessage::Assistant(content),
        }
    }
}

/// Represents a conversation.
///
/// The first message is always the system message carrying
/// [`SYSTEM_PROMPT`]. It is sent to the model but never displayed or
/// exported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates a conversation that holds only the system message.
    #[inline]
    pub fn new() -> Self {
        Self {
            messages: vec![Message::system(SYSTEM_PROMPT)],
        }
    }

    /// Drops every message except the system message.
    #[inline]
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Appends a message to the end of the conversation and returns it.
    #[inline]
    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Returns all messages, including the system message.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the messages that are shown to the user.
    #[inline]
    pub fn visible_messages(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// Returns the number of messages, including the system message.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if no turn has happened yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.len() <= 1
    }

    /// Returns the latest message.
    #[inline]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Renders the plain-text transcript of this conversation.
    #[inline]
    pub fn transcript(&self) -> String {
        format_transcript(&self.messages)
    }

    pub(crate) fn to_model_messages(&self) -> Vec<ModelMessage> {
        self.messages.iter().map(Message::to_model_message).collect()
    }
}

impl Default for Conversation {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
