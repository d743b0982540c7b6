use owo_colors::Style;

/// Color palette of the terminal front end. It only affects rendering,
/// never the conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Colors suited to light terminal backgrounds.
    #[default]
    Light,
    /// Brighter colors for dark terminal backgrounds.
    Dark,
}

impl Theme {
    /// Returns the other theme.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Returns the display name.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Style of the bar and label in front of user messages.
    pub fn user(self) -> Style {
        match self {
            Theme::Light => Style::new().blue().bold(),
            Theme::Dark => Style::new().bright_yellow().bold(),
        }
    }

    /// Style of the bar and label in front of assistant messages.
    pub fn assistant(self) -> Style {
        match self {
            Theme::Light => Style::new().cyan(),
            Theme::Dark => Style::new().bright_cyan(),
        }
    }

    /// Style of message bodies.
    pub fn text(self) -> Style {
        match self {
            Theme::Light => Style::new().black(),
            Theme::Dark => Style::new().bright_white(),
        }
    }

    /// Style of errors and warnings.
    pub fn alert(self) -> Style {
        match self {
            Theme::Light => Style::new().red().bold(),
            Theme::Dark => Style::new().bright_red().bold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let theme = Theme::default();
        assert_eq!(theme, Theme::Light);
        assert_eq!(theme.toggled(), Theme::Dark);
        assert_eq!(theme.toggled().toggled(), theme);
        assert_eq!(theme.toggled().name(), "dark");
    }
}
