//! Keyword-based urgency rating.

use std::fmt::{self, Display};

/// Phrases that make a description an emergency.
const CRITICAL_PHRASES: &[&str] = &[
    "chest pain",
    "unconscious",
    "bleeding",
    "difficulty breathing",
    "severe headache",
];

/// Phrases that call for a doctor's visit soon.
const MEDIUM_PHRASES: &[&str] =
    &["fever", "rash", "vomiting", "infection", "swelling"];

/// How urgently the described symptoms need attention.
///
/// Levels are ordered, `Low < Medium < Emergency`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UrgencyLevel {
    /// Nothing alarming was mentioned.
    Low,
    /// Symptoms that need a doctor soon.
    Medium,
    /// Symptoms that need immediate care.
    Emergency,
}

impl UrgencyLevel {
    /// Returns the plain name of the level.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "Low",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::Emergency => "Emergency",
        }
    }

    #[inline]
    fn icon(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "✅",
            UrgencyLevel::Medium => "⚠️",
            UrgencyLevel::Emergency => "🚨",
        }
    }
}

/// Formats as a badge, e.g. `🚨 Emergency`.
impl Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.name())
    }
}

/// Rates the urgency of a free-text symptom description.
///
/// This is a plain case-insensitive substring search, critical phrases
/// win over medium ones. There are no word boundaries, so "rash" also
/// matches "brashly".
pub fn classify(text: &str) -> UrgencyLevel {
    let text = text.to_lowercase();
    if CRITICAL_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        UrgencyLevel::Emergency
    } else if MEDIUM_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}
