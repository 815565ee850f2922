use serde::Serialize;

/// One logical instruction, possibly spanning several physical lines joined
/// by trailing-backslash continuation. Recomputed from the line sequence on
/// every access, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    /// Instruction keyword, always upper-case (`FROM`, `LABEL`, ...).
    pub name: String,
    /// First physical line of the instruction, 0-based.
    pub start_line: usize,
    /// Last physical line, 0-based inclusive. Equals `start_line` unless the
    /// instruction was continued.
    pub end_line: usize,
    /// Exact original text of the span, newlines and continuation
    /// backslashes included.
    pub content: String,
    /// Argument text with trailing whitespace and continuation markers
    /// stripped from each physical line.
    pub value: String,
}
