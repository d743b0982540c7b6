//! Plain-text export of a conversation.

use chrono::{DateTime, TimeZone};

use crate::conversation::{Message, Role};

/// Renders messages as a plain-text transcript.
///
/// The first message is the system message and is skipped. Every other
/// message becomes `User: <content>` or `AI: <content>`, followed by a blank
/// line.
pub fn format_transcript(messages: &[Message]) -> String {
    let mut transcript = String::new();
    for message in messages.iter().skip(1) {
        let label = if message.role() == Role::User {
            "User"
        } else {
            "AI"
        };
        transcript.push_str(label);
        transcript.push_str(": ");
        transcript.push_str(message.content());
        transcript.push_str("\n\n");
    }
    transcript
}

/// Returns the file name for a transcript exported at `time`, like
/// `chat_20240131_094502.txt`.
pub fn export_file_name<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("chat_{}.txt", time.format("%Y%m%d_%H%M%S"))
}
