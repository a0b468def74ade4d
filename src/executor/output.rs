//! Output handling for command execution.

/// Shorten command output for inclusion in error messages.
///
/// Keeps the last `max_lines` lines, since the control binary prints its
/// verdict last, and truncates overlong lines. Leading surrounding
/// whitespace is trimmed.
pub fn tail_output(output: &str, max_lines: usize) -> String {
    const MAX_LINE_LENGTH: usize = 200;

    let trimmed = output.trim();
    let lines: Vec<&str> = trimmed.lines().collect();
    let skipped = lines.len().saturating_sub(max_lines);

    let mut result = String::new();
    if skipped > 0 {
        result.push_str(&format!("...[{} earlier lines omitted]", skipped));
    }

    for line in &lines[skipped..] {
        if !result.is_empty() {
            result.push('\n');
        }
        match line.char_indices().nth(MAX_LINE_LENGTH) {
            Some((idx, _)) => {
                result.push_str(&line[..idx]);
                result.push_str("...");
            }
            None => result.push_str(line),
        }
    }

    result
}
