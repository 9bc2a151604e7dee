//! # Error Location
//!
//! Decoder messages end with `on line L, column C.`. [`locate`] recovers the
//! position from that phrase and [`render`] cuts a numbered excerpt of the
//! source around the failing line.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"on line (\d+), column (\d+)\.").expect("position pattern is valid")
});

/// Lines shown on each side of the target line.
const CONTEXT_LINES: usize = 5;

/// Position extracted from a decoder message; either part may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    /// 1-based line.
    pub line: Option<usize>,
    /// 1-based column.
    pub column: Option<usize>,
}

/// Extract the position phrase from a decoder message.
pub fn locate(message: &str) -> Location {
    let Some(caps) = POSITION.captures(message) else {
        return Location::default();
    };
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse().ok());
    Location {
        line: number(1),
        column: number(2),
    }
}

/// Numbered excerpt of `text` around `line`, with the target marked.
///
/// Lines are split on `\n` with any trailing `\r` removed, so text ending
/// in a newline has a final empty line; the decoder reports end-of-input
/// errors there. Shows up to five lines before and after, clamped to the
/// text. Numbers are right-aligned to the widest one shown and the target
/// line is wrapped in `>>` and `<<`. Returns an empty string when `line` is
/// outside the text.
pub fn render(text: &str, line: usize) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if line == 0 || line > lines.len() {
        return String::new();
    }

    let first = line.saturating_sub(CONTEXT_LINES).max(1);
    let last = (line + CONTEXT_LINES).min(lines.len());
    let width = last.to_string().len();

    let mut out = String::new();
    for n in first..=last {
        let content = lines[n - 1];
        if n == line {
            out.push_str(&format!("{n:>width$}: >>{content}<<\n"));
        } else {
            out.push_str(&format!("{n:>width$}: {content}\n"));
        }
    }
    out
}
