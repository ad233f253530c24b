const INDENT: &str = "    ";

/// Re-indents `code` at four spaces per nesting level.
///
/// A line whose trimmed text starts with `}` or `)` dedents before it is
/// written; a line ending with `{` or `(` indents the lines after it.
/// Blank lines stay empty and the line count never changes.
pub fn format_source(code: &str) -> String {
    let mut level: usize = 0;
    let mut formatted = Vec::new();

    for line in code.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('}') || trimmed.starts_with(')') {
            level = level.saturating_sub(1);
        }

        if trimmed.is_empty() {
            formatted.push(String::new());
        } else {
            formatted.push(format!("{}{}", INDENT.repeat(level), trimmed));
        }

        if trimmed.ends_with('{') || trimmed.ends_with('(') {
            level += 1;
        }
    }

    formatted.join("\n")
}
