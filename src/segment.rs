/// Splits source text into code and literal spans.
///
/// Literal spans cover string literals, char literals, line comments and
/// block comments. Everything else is code. Every later scanner (bracket
/// balance, entry body extraction, translation) consults these spans so that
/// a `{` inside `"..."` or a `)` inside a comment never counts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Code,
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    pub text: String,
    pub start_offset: usize,
    pub kind: SpanKind,
}

impl CodeSpan {
    fn new(text: &str, start_offset: usize, kind: SpanKind) -> Self {
        Self {
            text: text.to_string(),
            start_offset,
            kind,
        }
    }

    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    pub fn is_code(&self) -> bool {
        self.kind == SpanKind::Code
    }

    pub fn is_comment(&self) -> bool {
        self.kind == SpanKind::Literal && self.text.starts_with('/')
    }

    pub fn is_string(&self) -> bool {
        self.kind == SpanKind::Literal && self.text.starts_with('"')
    }
}

/// Segments `source` into ordered, contiguous spans. Never fails: an
/// unterminated block comment runs to the end of the source, and an
/// unterminated string or char literal runs to the end of its line.
pub fn segment(source: &str) -> Vec<CodeSpan> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();
    let mut code_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let literal_end = match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => Some(line_comment_end(bytes, i)),
            b'/' if bytes.get(i + 1) == Some(&b'*') => Some(block_comment_end(source, i)),
            b'"' | b'\'' => Some(quoted_end(bytes, i)),
            _ => None,
        };

        match literal_end {
            Some(end) => {
                if code_start < i {
                    spans.push(CodeSpan::new(&source[code_start..i], code_start, SpanKind::Code));
                }
                spans.push(CodeSpan::new(&source[i..end], i, SpanKind::Literal));
                i = end;
                code_start = end;
            }
            None => i += 1,
        }
    }

    if code_start < bytes.len() {
        spans.push(CodeSpan::new(&source[code_start..], code_start, SpanKind::Code));
    }

    spans
}

fn line_comment_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| start + pos)
        .unwrap_or(bytes.len())
}

fn block_comment_end(source: &str, start: usize) -> usize {
    source[start + 2..]
        .find("*/")
        .map(|pos| start + 2 + pos + 2)
        .unwrap_or(source.len())
}

fn quoted_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Rebuilds the source with every literal byte blanked to a space.
/// Newlines survive, so byte offsets and line numbers are unchanged.
pub fn code_view(spans: &[CodeSpan]) -> String {
    blank_spans(spans, |span| !span.is_code())
}

/// Rebuilds the source with only comments blanked. String and char
/// literals are kept as written.
pub fn comment_free_view(spans: &[CodeSpan]) -> String {
    blank_spans(spans, CodeSpan::is_comment)
}

fn blank_spans(spans: &[CodeSpan], blank: impl Fn(&CodeSpan) -> bool) -> String {
    let mut out = String::new();
    for span in spans {
        if blank(span) {
            for c in span.text.chars() {
                if c == '\n' {
                    out.push('\n');
                } else {
                    out.extend(std::iter::repeat(' ').take(c.len_utf8()));
                }
            }
        } else {
            out.push_str(&span.text);
        }
    }
    out
}

/// 1-based line number of the byte at `offset`.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(SpanKind, String)> {
        segment(source)
            .into_iter()
            .map(|span| (span.kind, span.text))
            .collect()
    }

    #[test]
    fn spans_cover_source_without_gaps() {
        let source = "int a = 1; // one\nString s = \"x{\"; /* } */ char c = '(';";
        let spans = segment(source);
        let mut expected_start = 0;
        for span in &spans {
            assert_eq!(span.start_offset, expected_start);
            expected_start = span.end_offset();
        }
        assert_eq!(expected_start, source.len());
        let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn classifies_comments_strings_and_chars() {
        let got = kinds("a(\"b)\") // c\n'd'");
        assert_eq!(
            got,
            vec![
                (SpanKind::Code, "a(".to_string()),
                (SpanKind::Literal, "\"b)\"".to_string()),
                (SpanKind::Code, ") ".to_string()),
                (SpanKind::Literal, "// c".to_string()),
                (SpanKind::Code, "\n".to_string()),
                (SpanKind::Literal, "'d'".to_string()),
            ]
        );
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        let spans = segment(r#"x = "say \"hi\""; y"#);
        assert_eq!(spans[1].text, r#""say \"hi\"""#);
        assert_eq!(spans[2].text, "; y");
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        let spans = segment("a /* never closed {");
        assert_eq!(spans.len(), 2);
        assert!(spans[1].is_comment());
        assert_eq!(spans[1].end_offset(), "a /* never closed {".len());
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let spans = segment("s = \"open\nnext;");
        assert_eq!(spans[1].text, "\"open");
        assert_eq!(spans[2].text, "\nnext;");
    }

    #[test]
    fn views_preserve_offsets() {
        let source = "f(\"é}\") // ü\nx";
        let spans = segment(source);
        let code = code_view(&spans);
        assert_eq!(code.len(), source.len());
        assert!(!code.contains('}'));
        let comments_gone = comment_free_view(&spans);
        assert!(comments_gone.contains("\"é}\""));
        assert!(!comments_gone.contains("//"));
        assert_eq!(line_of(source, source.len() - 1), 2);
    }
}
