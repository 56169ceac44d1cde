//! Styling helpers for terminal output.
//!
//! The [`DialogStyle`] trait applies ANSI styling via the `colored` crate.
//! Implementations for `&str` and `String` are provided so string literals
//! can be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to dialogue output.
pub trait DialogStyle {
    fn speaker_style(&self) -> ColoredString;
    fn line_style(&self) -> ColoredString;
    fn narration_style(&self) -> ColoredString;
    fn choice_number_style(&self) -> ColoredString;
    fn choice_style(&self) -> ColoredString;
    fn title_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn ended_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
}

impl DialogStyle for &str {
    fn speaker_style(&self) -> ColoredString {
        self.truecolor(13, 130, 60).bold()
    }
    fn line_style(&self) -> ColoredString {
        self.normal()
    }
    fn narration_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn choice_number_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.truecolor(220, 180, 40)
    }
    fn choice_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn title_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10).underline()
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(75, 80, 75)
    }
    fn ended_style(&self) -> ColoredString {
        self.italic().truecolor(220, 40, 220)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
}

impl DialogStyle for String {
    fn speaker_style(&self) -> ColoredString {
        self.as_str().speaker_style()
    }
    fn line_style(&self) -> ColoredString {
        self.as_str().line_style()
    }
    fn narration_style(&self) -> ColoredString {
        self.as_str().narration_style()
    }
    fn choice_number_style(&self) -> ColoredString {
        self.as_str().choice_number_style()
    }
    fn choice_style(&self) -> ColoredString {
        self.as_str().choice_style()
    }
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn ended_style(&self) -> ColoredString {
        self.as_str().ended_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
}
