use crate::segment::{code_view, line_of, segment};
use regex::Regex;
use std::sync::LazyLock;

/// `public static void main(String[] args)` in either array spelling.
pub static ENTRY_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bpublic\s+static\s+void\s+main\s*\(\s*String\s*(?:\[\s*\]\s*[A-Za-z_$][\w$]*|[A-Za-z_$][\w$]*\s*\[\s*\])\s*\)",
    )
    .expect("entry method pattern")
});

/// The statements between the entry method's braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBody {
    pub text: String,
    /// Byte offset of the first body character in the full source.
    pub start_offset: usize,
    /// 1-based source line of the first body character.
    pub start_line: usize,
}

/// Locates the entry method and returns its body, or `None` when the
/// signature or its matching closing brace cannot be found.
pub fn extract_entry_body(source: &str) -> Option<EntryBody> {
    let code = code_view(&segment(source));
    let signature = ENTRY_METHOD.find(&code)?;
    let open = signature.end() + code[signature.end()..].find('{')?;
    let body_start = open + 1;

    let mut depth = 1usize;
    for span in segment(&source[body_start..]).iter().filter(|span| span.is_code()) {
        for (index, c) in span.text.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let body_end = body_start + span.start_offset + index;
                        tracing::debug!(
                            start = body_start,
                            end = body_end,
                            "extracted entry body"
                        );
                        return Some(EntryBody {
                            text: source[body_start..body_end].to_string(),
                            start_offset: body_start,
                            start_line: line_of(source, body_start),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    tracing::warn!("entry method body has no matching closing brace");
    None
}
