//! ANSI escape to HTML markup conversion
//!
//! Raw scan-tool output is converted one line at a time. Style codes
//! accumulate into a single inline style string, and each non-empty line is
//! wrapped in one `<span>` carrying the style in effect at the end of that
//! line. Intra-line color changes are therefore not segment accurate: a line
//! that turns red halfway through renders entirely red.

pub mod palette;
pub mod scanner;

pub use scanner::{scan_line, Token};

/// Meaning of one escape code for the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeCode {
    /// `0m`
    Reset,
    /// `1m`
    Bold,
    /// SGR 30-37, palette index
    Foreground(usize),
    /// SGR 40-47, palette index
    Background(usize),
    /// `0K`, `1K`, `2K`: all treated as "clear the current line"
    EraseLine,
    /// Consumed and stripped with no visible effect
    Ignored,
}

impl EscapeCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "0m" => EscapeCode::Reset,
            "1m" => EscapeCode::Bold,
            "0K" | "1K" | "2K" => EscapeCode::EraseLine,
            _ if code.ends_with('m') => match leading_integer(code) {
                Some(n @ 30..=37) => EscapeCode::Foreground((n - 30) as usize),
                Some(n @ 40..=47) => EscapeCode::Background((n - 40) as usize),
                _ => EscapeCode::Ignored,
            },
            _ => EscapeCode::Ignored,
        }
    }
}

/// Parse the integer prefix of a code, e.g. `31` from `31;1m`.
fn leading_integer(code: &str) -> Option<i64> {
    let trimmed = code.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}

/// Escape text for safe inclusion in HTML element content or attributes
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Stateful converter. The style persists across lines (and across calls)
/// until a reset code is seen.
#[derive(Debug, Default)]
pub struct AnsiConverter {
    style: String,
}

impl AnsiConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a blob of raw text. Newline structure is preserved: the output
    /// has exactly as many `\n`-separated lines as the input.
    pub fn convert(&mut self, raw: &str) -> String {
        raw.split('\n')
            .map(|line| self.convert_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn convert_line(&mut self, line: &str) -> String {
        let mut text = String::new();
        for token in scan_line(line) {
            match token {
                Token::Literal(s) => text.push_str(&s),
                Token::Escape(code) => self.apply(EscapeCode::parse(&code), &mut text),
            }
        }

        if text.is_empty() {
            return String::new();
        }
        let text = escape_html(&text);
        if self.style.is_empty() {
            text
        } else {
            format!("<span style=\"{}\">{}</span>", self.style, text)
        }
    }

    fn apply(&mut self, code: EscapeCode, line_text: &mut String) {
        match code {
            EscapeCode::Reset => self.style.clear(),
            EscapeCode::Bold => self.style.push_str(palette::BOLD),
            EscapeCode::Foreground(i) => {
                if let Some(decl) = palette::foreground_declaration(i) {
                    self.style.push_str(&decl);
                }
            }
            EscapeCode::Background(i) => {
                if let Some(decl) = palette::background_declaration(i) {
                    self.style.push_str(&decl);
                }
            }
            EscapeCode::EraseLine => line_text.clear(),
            EscapeCode::Ignored => {}
        }
    }
}

/// Convert one blob with a fresh converter
pub fn ansi_to_markup(raw: &str) -> String {
    AnsiConverter::new().convert(raw)
}
