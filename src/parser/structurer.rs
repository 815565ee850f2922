use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::types::Instruction;

/// Optional leading whitespace, a keyword, whitespace, rest of line.
fn instruction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s+(.*)$").expect("instruction pattern"))
}

/// Right-trim, then drop a single trailing continuation backslash.
fn rstrip_backslash(text: &str) -> &str {
    let trimmed = text.trim_end();
    trimmed.strip_suffix('\\').unwrap_or(trimmed)
}

/// Does this physical line continue onto the next one?
fn continues(line: &str) -> bool {
    line.trim_end().ends_with('\\')
}

/// Fold a raw line sequence into the ordered list of instructions it
/// contains. Blank lines, comments and anything else that does not look
/// like `KEYWORD args` are skipped; they never appear in the output.
///
/// Line indices in the result are indices into `lines`. `content` is the
/// byte-for-byte text of the instruction's span, so splicing a replacement
/// over `start_line..=end_line` touches nothing else in the file.
pub fn structure(lines: &[String]) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut current: Option<Instruction> = None;
    let mut in_continuation = false;

    for (lineno, line) in lines.iter().enumerate() {
        if !in_continuation {
            // The regex never crosses the trailing newline.
            let matchable = line.strip_suffix('\n').unwrap_or(line);
            let Some(caps) = instruction_re().captures(matchable) else {
                continue;
            };
            current = Some(Instruction {
                name: caps[1].to_uppercase(),
                start_line: lineno,
                end_line: lineno,
                content: line.clone(),
                value: rstrip_backslash(&caps[2]).to_string(),
            });
        } else if let Some(insn) = current.as_mut() {
            // The first continuation line is left-trimmed (its indentation
            // is layout, not argument text); later ones append verbatim.
            let trim = insn.end_line == insn.start_line || insn.value.is_empty();
            insn.content.push_str(line);
            insn.end_line = lineno;
            let remainder = if trim { line.trim_start() } else { line.as_str() };
            insn.value.push_str(rstrip_backslash(remainder));
        }

        in_continuation = continues(line);
        if !in_continuation {
            if let Some(insn) = current.take() {
                instructions.push(insn);
            }
        }
    }

    if let Some(insn) = current {
        warn!(
            "dropping instruction with unterminated continuation at line {}",
            insn.start_line
        );
    }

    instructions
}
