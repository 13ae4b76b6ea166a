use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

/// Decides whether output is colored and applies the colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    use_color: bool,
}

impl Palette {
    /// Colors only when allowed and stdout is a terminal.
    #[must_use]
    pub fn detect(no_color: bool) -> Self {
        Self {
            use_color: !no_color && std::io::stdout().is_terminal(),
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self { use_color: false }
    }

    #[must_use]
    pub const fn colored() -> Self {
        Self { use_color: true }
    }

    fn paint(self, text: &str, color: Color) -> String {
        if self.use_color {
            text.with(color).to_string()
        } else {
            text.to_owned()
        }
    }

    #[must_use]
    pub fn success(self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    #[must_use]
    pub fn warning(self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    #[must_use]
    pub fn error(self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    #[must_use]
    pub fn info(self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    #[must_use]
    pub fn header(self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    #[must_use]
    pub fn name(self, text: &str) -> String {
        self.paint(text, Color::Magenta)
    }

    #[must_use]
    pub fn method(self, method: &str) -> String {
        let color = match method.to_ascii_uppercase().as_str() {
            "GET" => Color::Green,
            "POST" => Color::Yellow,
            "PUT" | "PATCH" => Color::Blue,
            "DELETE" => Color::Red,
            _ => Color::Cyan,
        };
        self.paint(method, color)
    }

    /// Green for 2xx, yellow for 3xx and red for everything else.
    #[must_use]
    pub fn by_status(self, status: u16, text: &str) -> String {
        match status {
            200..=299 => self.success(text),
            300..=399 => self.warning(text),
            _ => self.error(text),
        }
    }
}
