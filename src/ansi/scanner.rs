//! Line-level scanner that splits raw terminal text into literals and escape codes

const ESC: char = '\u{1b}';

/// Characters that end a CSI escape token (inclusive)
pub const TERMINATORS: &str = "ABCDEFGHJKSTfmnsulh";

/// A piece of one scanned line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of visible characters
    Literal(String),
    /// Escape code: the text after `ESC[` including its terminator, e.g. `31m`
    Escape(String),
}

#[derive(Debug)]
enum State {
    Literal,
    /// Saw ESC, waiting to see whether `[` follows
    EscapeIntro,
    EscapeToken(String),
}

/// Scan a single line (no `\n`) into tokens.
///
/// A token that never reaches a terminator before the end of the line is
/// dropped. A lone ESC not followed by `[` is kept as a literal.
pub fn scan_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut state = State::Literal;

    for c in line.chars() {
        state = match state {
            State::Literal => {
                if c == ESC {
                    State::EscapeIntro
                } else {
                    literal.push(c);
                    State::Literal
                }
            }
            State::EscapeIntro => match c {
                '[' => {
                    flush_literal(&mut literal, &mut tokens);
                    State::EscapeToken(String::new())
                }
                ESC => {
                    literal.push(ESC);
                    State::EscapeIntro
                }
                _ => {
                    literal.push(ESC);
                    literal.push(c);
                    State::Literal
                }
            },
            State::EscapeToken(mut code) => {
                code.push(c);
                if TERMINATORS.contains(c) {
                    tokens.push(Token::Escape(code));
                    State::Literal
                } else {
                    State::EscapeToken(code)
                }
            }
        };
    }

    if let State::EscapeIntro = state {
        literal.push(ESC);
    }
    flush_literal(&mut literal, &mut tokens);
    tokens
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}
