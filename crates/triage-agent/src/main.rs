//! Interactive terminal front end of the triage assistant.

#[macro_use]
extern crate tracing;

mod command;

use std::io::Write as _;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use triage_agent::audio::{self, CaptureError};
use triage_agent::core::conversation::{Message, Role};
use triage_agent::{Config, Session, SessionBuilder, Theme};
use triage_model::{CapturedAudio, RecognitionError};
use triage_openai_model::OpenAIProvider;

use crate::command::{Command, HELP};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // `.env` may set `RUST_LOG`.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let model_provider = OpenAIProvider::new(config.openai_config());
    let transcriber = model_provider.transcriber();
    let mut session = SessionBuilder::with_model_provider(model_provider)
        .with_speech_recognizer(transcriber)
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    println!("{}", "🩺 AI Medical Triage Agent".bold());
    println!("Describe your symptoms, or type /help to see all commands.\n");

    let mut stdin = io::BufReader::new(io::stdin());
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let theme = session.theme();

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Text(text) => {
                submit(&mut session, Some(&text), &progress_style).await;
            }
            Command::Voice(path) => {
                let captured = match path {
                    Some(path) => audio::read_wav(&path),
                    None => record_microphone().await,
                };
                let captured = match captured {
                    Ok(captured) => captured,
                    Err(err) => {
                        let message = format!("Could not capture audio: {err}");
                        print_alert(theme, &message);
                        continue;
                    }
                };
                if transcribe(&mut session, &captured, &progress_style).await {
                    submit(&mut session, None, &progress_style).await;
                }
            }
            Command::History => {
                let messages = session.conversation().visible_messages();
                if messages.is_empty() {
                    println!("No messages yet.\n");
                }
                for message in messages {
                    print_message(message, theme);
                }
            }
            Command::Reset => {
                session.reset();
                println!("Conversation cleared.\n");
            }
            Command::Export => {
                match session.export_transcript(&config.export_dir) {
                    Ok(path) => {
                        println!("Chat exported as {}\n", path.display());
                    }
                    Err(err) => {
                        error!("failed to export transcript: {}", err);
                        print_alert(theme, &format!("Export failed: {err}"));
                    }
                }
            }
            Command::Theme => {
                let theme = session.toggle_theme();
                println!("Switched to the {} theme.\n", theme.name());
            }
            Command::Help => println!("{HELP}\n"),
            Command::Quit => break,
            Command::Unknown(line) => {
                let message = format!(
                    "Unknown command: {line}. Type /help for the list of commands."
                );
                print_alert(theme, &message);
            }
        }
    }

    ExitCode::SUCCESS
}

/// Runs a turn and prints the reply.
async fn submit(
    session: &mut Session,
    typed: Option<&str>,
    progress_style: &ProgressStyle,
) {
    let theme = session.theme();
    let spinner = spinner(progress_style, "🤔 Analyzing...");
    let result = session.submit(typed).await;
    spinner.finish_and_clear();

    match result {
        Ok(Some(reply)) => print_message(reply, theme),
        Ok(None) => {}
        Err(err) => {
            error!("turn failed: {}", err);
            print_alert(theme, &format!("Error: {err}"));
        }
    }
}

/// Returns `true` if the audio was recognized and is waiting to be sent.
async fn transcribe(
    session: &mut Session,
    captured: &CapturedAudio,
    progress_style: &ProgressStyle,
) -> bool {
    let theme = session.theme();
    let spinner = spinner(progress_style, "🎧 Transcribing...");
    let result = session.transcribe(captured).await.map(str::to_owned);
    spinner.finish_and_clear();

    match result {
        Ok(text) => {
            println!("Recognized: {}", text.style(theme.text()));
            true
        }
        Err(RecognitionError::Unintelligible) => {
            print_alert(theme, "Sorry, couldn't understand audio.");
            false
        }
        Err(RecognitionError::Service(detail)) => {
            print_alert(theme, &format!("API error: {detail}"));
            false
        }
    }
}

#[cfg(feature = "microphone")]
async fn record_microphone() -> Result<CapturedAudio, CaptureError> {
    println!("🎙️ Listening...");
    match tokio::task::spawn_blocking(|| audio::record(audio::MAX_RECORDING))
        .await
    {
        Ok(result) => result,
        Err(err) => Err(CaptureError::Device(err.to_string())),
    }
}

#[cfg(not(feature = "microphone"))]
async fn record_microphone() -> Result<CapturedAudio, CaptureError> {
    Err(CaptureError::Device(
        "this build has no microphone support, pass a WAV file instead"
            .to_owned(),
    ))
}

fn spinner(
    progress_style: &ProgressStyle,
    message: &'static str,
) -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style.clone());
    progress_bar.set_message(message);
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    progress_bar
}

fn print_message(message: &Message, theme: Theme) {
    let (label, style) = match message.role() {
        Role::User => ("👤 User", theme.user()),
        _ => ("🧠 AI", theme.assistant()),
    };
    println!("{}{}", BAR_CHAR.style(style), label.style(style));
    for line in message.content().lines() {
        println!("{}{}", BAR_CHAR.style(style), line.style(theme.text()));
    }
    println!();
}

fn print_alert(theme: Theme, message: &str) {
    println!("{}\n", message.style(theme.alert()));
}

/// Reads the next line, or returns `None` at the end of input.
///
/// The reader must be reused across calls, or buffered lines are lost.
async fn read_line<R>(reader: &mut R) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();

    match reader.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_lines_in_a_row() {
        let mut input: &[u8] = b"I have a rash\n/export\n/quit";
        assert_eq!(
            read_line(&mut input).await.as_deref(),
            Some("I have a rash\n")
        );
        assert_eq!(read_line(&mut input).await.as_deref(), Some("/export\n"));
        assert_eq!(read_line(&mut input).await.as_deref(), Some("/quit"));
        assert_eq!(read_line(&mut input).await, None);
    }

    #[tokio::test]
    async fn test_buffered_reader_keeps_pending_lines() {
        let mut reader =
            io::BufReader::new(&b"fever\n\n/history\n"[..]);
        let mut commands = Vec::new();
        while let Some(line) = read_line(&mut reader).await {
            commands.push(Command::parse(&line));
        }
        assert_eq!(
            commands,
            vec![
                Command::Text("fever".to_owned()),
                Command::Empty,
                Command::History,
            ]
        );
    }
}
