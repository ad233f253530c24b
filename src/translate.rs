use crate::segment::segment;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Type names a declaration may start with. Anything else (user classes,
/// nested generics) passes through untouched and fails later at runtime.
const DECLARABLE_TYPES: &str = "int|long|short|byte|double|float|boolean|char|String|var|\
Integer|Long|Short|Byte|Double|Float|Boolean|Character|Object|\
ArrayList|List|LinkedList|HashMap|Map|TreeMap|LinkedHashMap|\
Scanner|Random|Date|BigDecimal|BigInteger";

const IDENT: &str = r"[A-Za-z_$][\w$]*";
const ARRAY_MARKERS: &str = r"(?:[ \t]*\[[ \t]*\])";
const GENERIC_ARGS: &str = r"(?:[ \t]*<[^<>\n]*>)";

fn rule_regex(pattern: String) -> Regex {
    Regex::new(&pattern).expect("rewrite rule pattern")
}

static ARRAY_INITIALIZER: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(format!(
        r"\b(?:final[ \t]+)?(?:{DECLARABLE_TYPES}){ARRAY_MARKERS}+[ \t]+({IDENT})[ \t]*=[ \t]*\{{([^{{}};]*)\}}"
    ))
});

static ANONYMOUS_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(format!(
        r"\bnew[ \t]+(?:{DECLARABLE_TYPES}){ARRAY_MARKERS}+[ \t]*\{{([^{{}};]*)\}}"
    ))
});

static ARRAY_ALLOCATION: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(format!(
        r"\bnew[ \t]+({DECLARABLE_TYPES})((?:[ \t]*\[[^\[\]\n]*[^\[\]\s][^\[\]\n]*\])+)({ARRAY_MARKERS}*)"
    ))
});

static SIZED_DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| rule_regex(r"\[([^\[\]\n]+)\]".to_string()));

static GENERIC_CONSTRUCTOR: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(format!(r"\bnew[ \t]+({IDENT})[ \t]*<[^<>\n]*>[ \t]*\("))
});

static ENHANCED_FOR: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(format!(
        r"\bfor[ \t]*\([ \t]*(?:final[ \t]+)?(?:{DECLARABLE_TYPES}){GENERIC_ARGS}?{ARRAY_MARKERS}*[ \t]+({IDENT})[ \t]*:"
    ))
});

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(format!(
        r"\b(?:final[ \t]+)?(?:{DECLARABLE_TYPES}){GENERIC_ARGS}?{ARRAY_MARKERS}*[ \t]+({IDENT})[ \t]*(=|;)"
    ))
});

static INTEGER_PARSE: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(
        r"\b(?:Integer\.parseInt|Long\.parse(Long)|Short\.parseShort|Byte\.parseByte)[ \t]*\("
            .to_string(),
    )
});

static DECIMAL_PARSE: LazyLock<Regex> = LazyLock::new(|| {
    rule_regex(r"\b(?:Double\.parseDouble|Float\.parseFloat)[ \t]*\(".to_string())
});

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| rule_regex(r"\x{E000}(\d+)\x{E001}".to_string()));

/// One lexical rewrite. Rules are independent search-and-replace passes,
/// applied in `REWRITE_RULES` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteRule {
    /// `int[] xs = {1, 2};` becomes `let xs = [1, 2];`
    ArrayInitializer,
    /// `new int[]{1, 2}` becomes `[1, 2]`
    AnonymousArray,
    /// `new int[n]` becomes `newArray(n, 0)`
    ArrayAllocation,
    /// `new ArrayList<>(` becomes `new ArrayList(`
    GenericConstructor,
    /// `for (String s : xs)` becomes `for (let s of xs)`
    EnhancedFor,
    /// `int x =` / `int x;` become `let x =` / `let x;`
    Declaration,
    IntegerParse,
    DecimalParse,
}

pub const REWRITE_RULES: [RewriteRule; 8] = [
    RewriteRule::ArrayInitializer,
    RewriteRule::AnonymousArray,
    RewriteRule::ArrayAllocation,
    RewriteRule::GenericConstructor,
    RewriteRule::EnhancedFor,
    RewriteRule::Declaration,
    RewriteRule::IntegerParse,
    RewriteRule::DecimalParse,
];

impl RewriteRule {
    fn pattern(self) -> &'static Regex {
        match self {
            RewriteRule::ArrayInitializer => &ARRAY_INITIALIZER,
            RewriteRule::AnonymousArray => &ANONYMOUS_ARRAY,
            RewriteRule::ArrayAllocation => &ARRAY_ALLOCATION,
            RewriteRule::GenericConstructor => &GENERIC_CONSTRUCTOR,
            RewriteRule::EnhancedFor => &ENHANCED_FOR,
            RewriteRule::Declaration => &DECLARATION,
            RewriteRule::IntegerParse => &INTEGER_PARSE,
            RewriteRule::DecimalParse => &DECIMAL_PARSE,
        }
    }

    /// Applies the rule to already-masked text.
    pub fn apply(self, text: &str) -> String {
        let pattern = self.pattern();
        match self {
            RewriteRule::ArrayInitializer => pattern.replace_all(text, "let ${1} = [${2}]"),
            RewriteRule::AnonymousArray => pattern.replace_all(text, "[${1}]"),
            RewriteRule::ArrayAllocation => pattern.replace_all(text, |caps: &Captures| {
                nested_allocation(&caps[1], &caps[2], caps[3].is_empty())
            }),
            RewriteRule::GenericConstructor => pattern.replace_all(text, "new ${1}("),
            RewriteRule::EnhancedFor => pattern.replace_all(text, "for (let ${1} of"),
            RewriteRule::Declaration => pattern.replace_all(text, "let ${1} ${2}"),
            RewriteRule::IntegerParse => pattern.replace_all(text, |caps: &Captures| {
                if caps.get(1).is_some() { "parseLong(" } else { "parseInt(" }
            }),
            RewriteRule::DecimalParse => pattern.replace_all(text, "parseFloat("),
        }
        .into_owned()
    }
}

/// `new int[2][3]` becomes `newArray(2, newArray(3, 0))`. Unsized trailing
/// dimensions (`new int[2][]`) leave the innermost rows `null`.
fn nested_allocation(type_name: &str, dimensions: &str, fully_sized: bool) -> String {
    let leaf = if fully_sized { default_for(type_name) } else { "null" };
    let sizes: Vec<&str> = SIZED_DIMENSION
        .captures_iter(dimensions)
        .filter_map(|caps| caps.get(1))
        .map(|size| size.as_str().trim())
        .collect();
    sizes
        .iter()
        .rev()
        .fold(leaf.to_string(), |inner, size| format!("newArray({}, {})", size, inner))
}

/// Initial element value of a freshly allocated array of `type_name`.
fn default_for(type_name: &str) -> &'static str {
    match type_name {
        "int" | "long" | "short" | "byte" => "0",
        "double" | "float" => "0.0",
        "boolean" => "false",
        "char" => r"'\0'",
        _ => "null",
    }
}

/// Rewrites an entry body into host statements. String, char and comment
/// spans are carried through byte for byte, and the line structure of the
/// body is unchanged.
pub fn translate(body: &str) -> String {
    let mut literals = Vec::new();
    let mut masked = String::with_capacity(body.len());
    for span in segment(body) {
        if span.is_code() {
            masked.push_str(&span.text);
        } else {
            masked.push_str(&format!("\u{E000}{}\u{E001}", literals.len()));
            literals.push(span.text);
        }
    }

    let rewritten = REWRITE_RULES
        .iter()
        .fold(masked, |text, rule| rule.apply(&text));

    let translated = PLACEHOLDER
        .replace_all(&rewritten, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| literals.get(index))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned();

    tracing::trace!(%translated, "translated entry body");
    translated
}
