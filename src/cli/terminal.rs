//! Styling for report output

use owo_colors::{OwoColorize, Style, colors::css};

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| usize::from(w.0))
}

/// The role a piece of output plays in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A completed action or a clean check (green)
    Success,
    /// A problem found in the catalog (amber)
    Warning,
    /// The title of a report (bold blue)
    Heading,
    /// A hint (dimmed)
    Hint,
}

impl Tone {
    const fn style(self) -> Style {
        match self {
            Self::Success => Style::new().fg::<css::Green>(),
            Self::Warning => Style::new().fg::<css::Orange>(),
            Self::Heading => Style::new().fg::<css::LightBlue>().bold(),
            Self::Hint => Style::new().dimmed(),
        }
    }

    /// Styles `text` for stdout, or leaves it plain when stdout has no colour
    /// support.
    pub fn paint(self, text: &str) -> String {
        self.paint_if(
            supports_color::on(supports_color::Stream::Stdout).is_some(),
            text,
        )
    }

    fn paint_if(self, enabled: bool, text: &str) -> String {
        if enabled {
            text.style(self.style()).to_string()
        } else {
            text.to_string()
        }
    }
}
