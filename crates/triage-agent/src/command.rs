use std::path::PathBuf;

/// A line of user input, parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Symptoms typed by the user.
    Text(String),
    /// Voice input, from the microphone or from a WAV file.
    Voice(Option<PathBuf>),
    /// Start the conversation over.
    Reset,
    /// Save the transcript to a file.
    Export,
    /// Switch between the light and dark theme.
    Theme,
    /// Show the conversation so far.
    History,
    /// Show the list of commands.
    Help,
    /// Leave the program.
    Quit,
    /// A blank line.
    Empty,
    /// A slash command that is not recognized.
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Command::Text(line.to_owned());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match (name, arg) {
            ("voice", "") => Command::Voice(None),
            ("voice", path) => Command::Voice(Some(PathBuf::from(path))),
            ("reset", "") => Command::Reset,
            ("export", "") => Command::Export,
            ("theme", "") => Command::Theme,
            ("history", "") => Command::History,
            ("help", "") => Command::Help,
            ("quit" | "exit", "") => Command::Quit,
            _ => Command::Unknown(line.to_owned()),
        }
    }
}

pub const HELP: &str = "\
Describe your symptoms and press Enter.

  /voice          record up to 5 seconds from the microphone
  /voice <file>   transcribe a WAV file
  /history        show the conversation so far
  /reset          start over
  /export         save the conversation to a text file
  /theme          switch between light and dark colors
  /help           show this help
  /quit           exit";
