//! Picking the input for a turn.

/// A transcribed utterance waiting to be used by the next turn.
///
/// It is consumed at most once: [`PendingVoiceInput::take`] returns the
/// text and leaves the holder empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingVoiceInput(Option<String>);

impl PendingVoiceInput {
    /// Stores a new utterance, replacing any previous one.
    #[inline]
    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.0 = Some(text.into());
    }

    /// Moves the utterance out, if there is a non-empty one.
    #[inline]
    pub fn take(&mut self) -> Option<String> {
        self.0.take().filter(|text| !text.is_empty())
    }

    /// Returns the utterance without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Returns `true` if nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.as_deref().is_none_or(str::is_empty)
    }
}

/// Selects the input for this turn.
///
/// A pending voice utterance always wins and is cleared, even if the user
/// also typed something. Otherwise the typed text is used, unless it is
/// blank. `None` means there is nothing to do this turn.
pub fn resolve_input(
    pending_voice: &mut PendingVoiceInput,
    typed: Option<&str>,
) -> Option<String> {
    if let Some(voice) = pending_voice.take() {
        trace!("using pending voice input");
        return Some(voice);
    }
    typed
        .filter(|text| !text.trim().is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_takes_priority() {
        let mut pending = PendingVoiceInput::default();
        pending.set("cough");

        assert_eq!(
            resolve_input(&mut pending, Some("fever")),
            Some("cough".to_owned())
        );
        assert!(pending.is_empty());
        assert_eq!(
            resolve_input(&mut pending, Some("fever")),
            Some("fever".to_owned())
        );
    }

    #[test]
    fn test_voice_is_consumed_once() {
        let mut pending = PendingVoiceInput::default();
        pending.set("cough");
        assert_eq!(pending.peek(), Some("cough"));

        assert_eq!(resolve_input(&mut pending, None), Some("cough".to_owned()));
        assert_eq!(resolve_input(&mut pending, None), None);
    }

    #[test]
    fn test_empty_voice_falls_back_to_typed() {
        let mut pending = PendingVoiceInput::default();
        pending.set("");
        assert!(pending.is_empty());
        assert_eq!(
            resolve_input(&mut pending, Some("rash")),
            Some("rash".to_owned())
        );
    }

    #[test]
    fn test_no_input() {
        let mut pending = PendingVoiceInput::default();
        assert_eq!(resolve_input(&mut pending, None), None);
        assert_eq!(resolve_input(&mut pending, Some("   ")), None);
        assert_eq!(resolve_input(&mut pending, Some("")), None);
    }
}
