//! `String` instance members, the `String`/`Character` statics and the
//! `printf`-style formatter.

use super::{arity, int_arg, string_arg, ShimError};
use crate::shim::collections::check_index;
use crate::shim::numeric::ordering_value;
use crate::value::{shared, Value};

fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `index`th char; `index == len` maps to the end.
fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices().nth(index).map_or(text.len(), |(offset, _)| offset)
}

fn substring(text: &str, begin: i64, end: i64) -> Result<String, ShimError> {
    let length = char_count(text) as i64;
    if begin < 0 || end > length || begin > end {
        return Err(ShimError::StringIndexOutOfBounds(format!(
            "begin {}, end {}, length {}",
            begin, end, length
        )));
    }
    let start = byte_offset(text, begin as usize);
    let stop = byte_offset(text, end as usize);
    Ok(text[start..stop].to_string())
}

fn char_index_of(text: &str, byte_index: Option<usize>) -> i64 {
    byte_index.map_or(-1, |offset| text[..offset].chars().count() as i64)
}

pub fn string_method(text: &str, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    let one_string = |args: &[Value]| -> Result<String, ShimError> {
        arity(method, args, 1..=1)?;
        string_arg(method, &args[0])
    };

    match method {
        "length" => {
            arity(method, args, 0..=0)?;
            Ok(Value::Int(char_count(text) as i64))
        }
        "charAt" => {
            arity(method, args, 1..=1)?;
            let index = int_arg(method, &args[0])?;
            let length = char_count(text);
            let slot = check_index(index, length).map_err(|_| {
                ShimError::StringIndexOutOfBounds(format!(
                    "Index {} out of bounds for length {}",
                    index, length
                ))
            })?;
            Ok(text.chars().nth(slot).map_or(Value::Null, Value::Char))
        }
        "substring" => {
            arity(method, args, 1..=2)?;
            let begin = int_arg(method, &args[0])?;
            let end = match args.get(1) {
                Some(end) => int_arg(method, end)?,
                None => char_count(text) as i64,
            };
            Ok(Value::String(substring(text, begin, end)?))
        }
        "equals" => {
            arity(method, args, 1..=1)?;
            Ok(Value::Bool(matches!(&args[0], Value::String(other) if other == text)))
        }
        "equalsIgnoreCase" => {
            arity(method, args, 1..=1)?;
            Ok(Value::Bool(
                matches!(&args[0], Value::String(other) if other.to_lowercase() == text.to_lowercase()),
            ))
        }
        "compareTo" => {
            let other = one_string(args)?;
            Ok(Value::Int(ordering_value(text.cmp(other.as_str()))))
        }
        "toUpperCase" | "toLowerCase" | "trim" | "isEmpty" | "isBlank" | "toString" => {
            arity(method, args, 0..=0)?;
            Ok(match method {
                "toUpperCase" => Value::String(text.to_uppercase()),
                "toLowerCase" => Value::String(text.to_lowercase()),
                "trim" => Value::String(text.trim().to_string()),
                "isEmpty" => Value::Bool(text.is_empty()),
                "isBlank" => Value::Bool(text.trim().is_empty()),
                _ => Value::String(text.to_string()),
            })
        }
        "contains" => Ok(Value::Bool(text.contains(one_string(args)?.as_str()))),
        "startsWith" => Ok(Value::Bool(text.starts_with(one_string(args)?.as_str()))),
        "endsWith" => Ok(Value::Bool(text.ends_with(one_string(args)?.as_str()))),
        "indexOf" => {
            let needle = one_string(args)?;
            Ok(Value::Int(char_index_of(text, text.find(needle.as_str()))))
        }
        "lastIndexOf" => {
            let needle = one_string(args)?;
            Ok(Value::Int(char_index_of(text, text.rfind(needle.as_str()))))
        }
        "concat" => Ok(Value::String(format!("{}{}", text, one_string(args)?))),
        "replace" => {
            arity(method, args, 2..=2)?;
            let from = string_arg(method, &args[0])?;
            let to = string_arg(method, &args[1])?;
            Ok(Value::String(text.replace(from.as_str(), &to)))
        }
        "split" => {
            let separator = one_string(args)?;
            let pattern = regex::Regex::new(&separator)
                .map_err(|err| ShimError::IllegalArgument(err.to_string()))?;
            let mut parts: Vec<Value> = pattern
                .split(text)
                .map(|part| Value::String(part.to_string()))
                .collect();
            while matches!(parts.last(), Some(Value::String(last)) if last.is_empty()) && parts.len() > 1 {
                parts.pop();
            }
            Ok(Value::Array(shared(parts)))
        }
        "repeat" => {
            arity(method, args, 1..=1)?;
            let count = int_arg(method, &args[0])?;
            if count < 0 {
                return Err(ShimError::IllegalArgument(format!("count is negative: {}", count)));
            }
            Ok(Value::String(text.repeat(count as usize)))
        }
        "toCharArray" => {
            arity(method, args, 0..=0)?;
            Ok(Value::Array(shared(text.chars().map(Value::Char).collect())))
        }
        _ => Err(ShimError::unknown_method("String", method)),
    }
}

pub fn string_static(method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "valueOf" => {
            arity("String.valueOf", args, 1..=1)?;
            Ok(Value::String(args[0].to_string()))
        }
        "format" => {
            let Some((pattern, rest)) = args.split_first() else {
                return arity("String.format", args, 1..=usize::MAX).map(|_| Value::Null);
            };
            let pattern = string_arg("String.format", pattern)?;
            Ok(Value::String(format(&pattern, rest)?))
        }
        "join" => {
            let Some((separator, rest)) = args.split_first() else {
                return arity("String.join", args, 1..=usize::MAX).map(|_| Value::Null);
            };
            let separator = string_arg("String.join", separator)?;
            let parts: Vec<String> = match rest {
                [Value::List(items) | Value::Array(items)] => {
                    items.borrow().iter().map(Value::to_string).collect()
                }
                _ => rest.iter().map(Value::to_string).collect(),
            };
            Ok(Value::String(parts.join(&separator)))
        }
        _ => Err(ShimError::unknown_method("String", method)),
    }
}

pub fn character_static(method: &str, args: &[Value]) -> Result<Value, ShimError> {
    arity(method, args, 1..=1)?;
    let c = match &args[0] {
        Value::Char(c) => *c,
        other => return Err(ShimError::type_mismatch(method, "char", other)),
    };
    match method {
        "isDigit" => Ok(Value::Bool(c.is_ascii_digit())),
        "isLetter" => Ok(Value::Bool(c.is_alphabetic())),
        "isLetterOrDigit" => Ok(Value::Bool(c.is_alphanumeric())),
        "isWhitespace" => Ok(Value::Bool(c.is_whitespace())),
        "isUpperCase" => Ok(Value::Bool(c.is_uppercase())),
        "isLowerCase" => Ok(Value::Bool(c.is_lowercase())),
        "toUpperCase" => Ok(Value::Char(c.to_uppercase().next().unwrap_or(c))),
        "toLowerCase" => Ok(Value::Char(c.to_lowercase().next().unwrap_or(c))),
        "getNumericValue" => Ok(Value::Int(c.to_digit(36).map_or(-1, |d| d as i64))),
        "toString" => Ok(Value::String(c.to_string())),
        _ => Err(ShimError::unknown_method("Character", method)),
    }
}

/// One parsed `%[flags][width][.precision]conversion` directive.
#[derive(Debug, Default)]
struct Directive {
    left_align: bool,
    zero_pad: bool,
    grouping: bool,
    plus: bool,
    width: usize,
    precision: Option<usize>,
}

impl Directive {
    fn pad(&self, body: String) -> String {
        let length = char_count(&body);
        if length >= self.width {
            return body;
        }
        let fill = self.width - length;
        if self.left_align {
            format!("{}{}", body, " ".repeat(fill))
        } else if self.zero_pad {
            match body.strip_prefix('-') {
                Some(digits) => format!("-{}{}", "0".repeat(fill), digits),
                None => format!("{}{}", "0".repeat(fill), body),
            }
        } else {
            format!("{}{}", " ".repeat(fill), body)
        }
    }

    fn signed(&self, body: String) -> String {
        if self.plus && !body.starts_with('-') {
            format!("+{}", body)
        } else {
            body
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// `String.format` / `printf` with `%d %s %f %.Nf %c %b %x %e %n %%`.
pub fn format(pattern: &str, args: &[Value]) -> Result<String, ShimError> {
    let mut out = String::new();
    let mut chars = pattern.chars().peekable();
    let mut next_arg = args.iter();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut directive = Directive::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => directive.left_align = true,
                '0' => directive.zero_pad = true,
                ',' => directive.grouping = true,
                '+' => directive.plus = true,
                _ => break,
            }
            chars.next();
        }
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            directive.width = directive.width * 10 + digit as usize;
            chars.next();
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut precision = 0;
            while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
                precision = precision * 10 + digit as usize;
                chars.next();
            }
            directive.precision = Some(precision);
        }

        let conversion = chars.next().ok_or(ShimError::UnknownFormatConversion('%'))?;
        let body = match conversion {
            'n' => {
                out.push('\n');
                continue;
            }
            '%' => "%".to_string(),
            _ => {
                let arg = next_arg
                    .next()
                    .ok_or(ShimError::MissingFormatArgument(conversion))?;
                format_one(&directive, conversion, arg)?
            }
        };
        out.push_str(&directive.pad(body));
    }
    Ok(out)
}

fn format_one(directive: &Directive, conversion: char, arg: &Value) -> Result<String, ShimError> {
    let mismatch = || ShimError::IllegalFormatConversion {
        conversion,
        type_name: arg.type_name().to_string(),
    };

    Ok(match conversion {
        'd' => {
            let n = match arg {
                Value::Int(n) => n.to_string(),
                Value::BigInteger(big) => big.to_string(),
                _ => return Err(mismatch()),
            };
            let n = if directive.grouping { group_thousands(&n) } else { n };
            directive.signed(n)
        }
        'f' | 'e' => {
            let n = match arg {
                Value::Double(n) => *n,
                Value::Decimal(d) => d.to_f64(),
                _ => return Err(mismatch()),
            };
            let precision = directive.precision.unwrap_or(6);
            let body = if conversion == 'f' {
                let fixed = format!("{:.*}", precision, n);
                if directive.grouping {
                    group_thousands(&fixed)
                } else {
                    fixed
                }
            } else {
                java_scientific(n, precision)
            };
            directive.signed(body)
        }
        'x' | 'X' => {
            let n = arg.as_i64().filter(|_| !matches!(arg, Value::Char(_))).ok_or_else(mismatch)?;
            let hex = format!("{:x}", n);
            if conversion == 'X' {
                hex.to_uppercase()
            } else {
                hex
            }
        }
        's' | 'S' => {
            let mut text = arg.to_string();
            if let Some(precision) = directive.precision {
                text = text.chars().take(precision).collect();
            }
            if conversion == 'S' {
                text.to_uppercase()
            } else {
                text
            }
        }
        'c' => match arg {
            Value::Char(c) => c.to_string(),
            Value::Int(n) => u32::try_from(*n)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(mismatch)?
                .to_string(),
            _ => return Err(mismatch()),
        },
        'b' | 'B' => match arg {
            Value::Bool(b) => b.to_string(),
            Value::Null => "false".to_string(),
            _ => "true".to_string(),
        },
        other => return Err(ShimError::UnknownFormatConversion(other)),
    })
}

/// `1.234560e+03` layout with a two-digit signed exponent.
fn java_scientific(n: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, n);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::String(text.to_string())
    }

    #[test]
    fn format_directives() {
        let args = [s("Bob"), Value::Int(7), Value::Double(3.14159), Value::Char('x'), Value::Bool(true)];
        let text = format("%s has %d, %.2f %c %b%%%n", &args).expect("format");
        assert_eq!(text, "Bob has 7, 3.14 x true%\n");
    }

    #[test]
    fn format_width_and_flags() {
        assert_eq!(format("[%5d]", &[Value::Int(42)]).expect("format"), "[   42]");
        assert_eq!(format("[%-4s]", &[s("ab")]).expect("format"), "[ab  ]");
        assert_eq!(format("%05.1f", &[Value::Double(-2.5)]).expect("format"), "-02.5");
        assert_eq!(format("%,d", &[Value::Int(1234567)]).expect("format"), "1,234,567");
    }

    #[test]
    fn format_rejects_wrong_argument_types() {
        let err = format("%d", &[s("x")]).unwrap_err();
        assert_eq!(err.to_string(), "IllegalFormatConversionException: d != String");
        assert!(matches!(format("%d", &[]), Err(ShimError::MissingFormatArgument('d'))));
    }

    #[test]
    fn string_members() {
        let text = "Hello, World";
        assert!(string_method(text, "length", &[]).expect("length").equals(&Value::Int(12)));
        assert!(string_method(text, "charAt", &[Value::Int(4)]).expect("charAt").equals(&Value::Char('o')));
        assert_eq!(
            string_method(text, "substring", &[Value::Int(7)]).expect("substring").to_string(),
            "World"
        );
        assert!(string_method(text, "indexOf", &[s("World")]).expect("indexOf").equals(&Value::Int(7)));
        assert_eq!(
            string_method("a,b,,c,,", "split", &[s(",")]).expect("split").to_string(),
            "[a, b, , c]"
        );
        assert!(string_method(text, "charAt", &[Value::Int(40)]).is_err());
    }

    #[test]
    fn join_accepts_lists_and_varargs() {
        let list = Value::List(shared(vec![s("a"), s("b")]));
        assert_eq!(string_static("join", &[s("-"), list]).expect("join").to_string(), "a-b");
        assert_eq!(
            string_static("join", &[s(", "), s("x"), s("y")]).expect("join").to_string(),
            "x, y"
        );
    }
}
