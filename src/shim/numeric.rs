//! Numeric shims: `Math`, `Integer`/`Long`/`Double` statics, numeric
//! parsing, and `BigDecimal` / `BigInteger` on arbitrary-precision numbers.

use super::{arity, float_arg, int_arg, string_arg, ShimError};
use crate::shim::RunContext;
use crate::value::{format_double, Value};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Arbitrary-precision decimal. Equality compares value and scale, so
/// `2.0` and `2.00` differ as they do for `BigDecimal.equals`.
#[derive(Debug, Clone)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// `new BigDecimal(String)`: sign, digits, an optional point and an
    /// optional exponent. No surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E');
        if !text.chars().any(|c| c.is_ascii_digit()) || !text.chars().all(allowed) {
            return None;
        }
        BigDecimal::from_str(text).ok().map(Decimal)
    }

    pub fn from_i64(n: i64) -> Self {
        Decimal(BigDecimal::from(n))
    }

    /// Uses the shortest decimal text of `n`, like `BigDecimal.valueOf`.
    pub fn from_f64(n: f64) -> Option<Self> {
        if !n.is_finite() {
            return None;
        }
        let text = if n.fract() == 0.0 && n.abs() < 1e16 {
            format!("{:.1}", n)
        } else {
            format!("{:e}", n)
        };
        Self::parse(&text)
    }

    pub fn add(&self, other: &Self) -> Self {
        Decimal(&self.0 + &other.0)
    }

    pub fn subtract(&self, other: &Self) -> Self {
        Decimal(&self.0 - &other.0)
    }

    pub fn multiply(&self, other: &Self) -> Self {
        Decimal(&self.0 * &other.0)
    }

    pub fn negate(&self) -> Self {
        Decimal(-self.0.clone())
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// `toPlainString`: never uses an exponent.
    pub fn to_plain_string(&self) -> String {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        let sign = if unscaled.is_negative() { "-" } else { "" };
        let digits = unscaled.magnitude().to_string();
        if scale <= 0 {
            let zeros = "0".repeat(scale.unsigned_abs() as usize);
            return format!("{}{}{}", sign, digits, zeros);
        }
        let scale = scale as usize;
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        format!("{}{}.{}", sign, whole, fraction)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bigint_and_exponent() == other.0.as_bigint_and_exponent()
    }
}

/// `BigDecimal.toString`: plain unless the scale is negative or the
/// number is smaller than `1E-6`, then one leading digit and an exponent.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        let digits = unscaled.magnitude().to_string();
        let adjusted = digits.len() as i64 - 1 - scale;
        if scale >= 0 && adjusted >= -6 {
            return f.write_str(&self.to_plain_string());
        }

        let sign = if unscaled.is_negative() { "-" } else { "" };
        let (first, rest) = digits.split_at(1);
        let point = if rest.is_empty() { "" } else { "." };
        let exponent_sign = if adjusted >= 0 { "+" } else { "" };
        write!(f, "{}{}{}{}E{}{}", sign, first, point, rest, exponent_sign, adjusted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BigInteger(BigInt);

impl BigInteger {
    /// `new BigInteger(String)`: optional sign, decimal digits only.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        BigInt::from_str(text).ok().map(BigInteger)
    }

    pub fn from_i64(n: i64) -> Self {
        BigInteger(BigInt::from(n))
    }

    pub fn add(&self, other: &Self) -> Self {
        BigInteger(&self.0 + &other.0)
    }

    pub fn subtract(&self, other: &Self) -> Self {
        BigInteger(&self.0 - &other.0)
    }

    pub fn multiply(&self, other: &Self) -> Self {
        BigInteger(&self.0 * &other.0)
    }

    /// Truncates toward zero.
    pub fn divide(&self, other: &Self) -> Result<Self, ShimError> {
        if other.0.is_zero() {
            return Err(ShimError::Arithmetic("BigInteger divide by zero".to_string()));
        }
        Ok(BigInteger(&self.0 / &other.0))
    }

    pub fn negate(&self) -> Self {
        BigInteger(-self.0.clone())
    }

    fn to_decimal(&self) -> Decimal {
        Decimal(BigDecimal::new(self.0.clone(), 0))
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `Integer.parseInt` semantics: `parse_long` limited to the 32-bit range.
pub fn parse_int(text: &str) -> Result<i64, ShimError> {
    let n = parse_long(text)?;
    match i32::try_from(n) {
        Ok(_) => Ok(n),
        Err(_) => Err(ShimError::NumberFormat(text.to_string())),
    }
}

/// `Long.parseLong` semantics: optional sign, decimal digits only.
pub fn parse_long(text: &str) -> Result<i64, ShimError> {
    let trimmed = text.strip_prefix('+').unwrap_or(text);
    if trimmed.is_empty() || trimmed.starts_with('+') {
        return Err(ShimError::NumberFormat(text.to_string()));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ShimError::NumberFormat(text.to_string()))
}

/// `Double.parseDouble` semantics: surrounding whitespace ignored.
pub fn parse_double(text: &str) -> Result<f64, ShimError> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_suffix(['d', 'D', 'f', 'F'])
        .unwrap_or(trimmed);
    match trimmed {
        "NaN" => Ok(f64::NAN),
        "Infinity" | "+Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            Err(ShimError::NumberFormat(text.to_string()))
        }
        _ => trimmed
            .parse::<f64>()
            .map_err(|_| ShimError::NumberFormat(text.to_string())),
    }
}

pub fn math_property(name: &str) -> Option<Value> {
    match name {
        "PI" => Some(Value::Double(std::f64::consts::PI)),
        "E" => Some(Value::Double(std::f64::consts::E)),
        _ => None,
    }
}

pub fn math_method(ctx: &mut RunContext, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "abs" => {
            arity("Math.abs", args, 1..=1)?;
            match &args[0] {
                Value::Double(n) => Ok(Value::Double(n.abs())),
                other => Ok(Value::Int(int_arg("Math.abs", other)?.wrapping_abs())),
            }
        }
        "max" | "min" => {
            arity(method, args, 2..=2)?;
            let pick_max = method == "max";
            match (&args[0], &args[1]) {
                (l, r) if l.as_i64().is_some() && r.as_i64().is_some() => {
                    let (l, r) = (int_arg(method, l)?, int_arg(method, r)?);
                    Ok(Value::Int(if pick_max { l.max(r) } else { l.min(r) }))
                }
                (l, r) => {
                    let (l, r) = (float_arg(method, l)?, float_arg(method, r)?);
                    Ok(Value::Double(if pick_max { l.max(r) } else { l.min(r) }))
                }
            }
        }
        "pow" => {
            arity("Math.pow", args, 2..=2)?;
            let base = float_arg("Math.pow", &args[0])?;
            let exponent = float_arg("Math.pow", &args[1])?;
            Ok(Value::Double(base.powf(exponent)))
        }
        "sqrt" | "floor" | "ceil" => {
            arity(method, args, 1..=1)?;
            let n = float_arg(method, &args[0])?;
            Ok(Value::Double(match method {
                "sqrt" => n.sqrt(),
                "floor" => n.floor(),
                _ => n.ceil(),
            }))
        }
        "round" => {
            arity("Math.round", args, 1..=1)?;
            let n = float_arg("Math.round", &args[0])?;
            Ok(Value::Int((n + 0.5).floor() as i64))
        }
        "random" => {
            arity("Math.random", args, 0..=0)?;
            Ok(Value::Double(ctx.rng.gen::<f64>()))
        }
        _ => Err(ShimError::unknown_method("Math", method)),
    }
}

/// `Integer.*` and `Long.*` statics share one table.
pub fn integer_method(class: &str, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "parseInt" | "parseLong" | "valueOf" => {
            arity(method, args, 1..=1)?;
            match &args[0] {
                Value::String(text) if class == "Integer" => Ok(Value::Int(parse_int(text)?)),
                Value::String(text) => Ok(Value::Int(parse_long(text)?)),
                other => Ok(Value::Int(int_arg(method, other)?)),
            }
        }
        "toString" => {
            arity(method, args, 1..=1)?;
            Ok(Value::String(int_arg(method, &args[0])?.to_string()))
        }
        "max" | "min" => {
            arity(method, args, 2..=2)?;
            let (l, r) = (int_arg(method, &args[0])?, int_arg(method, &args[1])?);
            Ok(Value::Int(if method == "max" { l.max(r) } else { l.min(r) }))
        }
        _ => Err(ShimError::unknown_method(class, method)),
    }
}

pub fn integer_property(class: &str, name: &str) -> Option<Value> {
    match (class, name) {
        ("Integer", "MAX_VALUE") => Some(Value::Int(i32::MAX as i64)),
        ("Integer", "MIN_VALUE") => Some(Value::Int(i32::MIN as i64)),
        ("Long", "MAX_VALUE") => Some(Value::Int(i64::MAX)),
        ("Long", "MIN_VALUE") => Some(Value::Int(i64::MIN)),
        _ => None,
    }
}

pub fn double_method(method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "parseDouble" | "valueOf" => {
            arity(method, args, 1..=1)?;
            match &args[0] {
                Value::String(text) => Ok(Value::Double(parse_double(text)?)),
                other => Ok(Value::Double(float_arg(method, other)?)),
            }
        }
        "toString" => {
            arity(method, args, 1..=1)?;
            Ok(Value::String(format_double(float_arg(method, &args[0])?)))
        }
        _ => Err(ShimError::unknown_method("Double", method)),
    }
}

fn decimal_from(value: &Value) -> Result<Decimal, ShimError> {
    match value {
        Value::Decimal(d) => Ok(d.clone()),
        Value::String(text) => Decimal::parse(text).ok_or_else(|| ShimError::NumberFormat(text.clone())),
        Value::Double(n) => Decimal::from_f64(*n).ok_or_else(|| ShimError::NumberFormat(format_double(*n))),
        Value::BigInteger(big) => Ok(big.to_decimal()),
        other => Ok(Decimal::from_i64(int_arg("BigDecimal", other)?)),
    }
}

fn big_integer_from(value: &Value) -> Result<BigInteger, ShimError> {
    match value {
        Value::BigInteger(big) => Ok(big.clone()),
        Value::String(text) => BigInteger::parse(text).ok_or_else(|| ShimError::NumberFormat(text.clone())),
        other => Ok(BigInteger::from_i64(int_arg("BigInteger", other)?)),
    }
}

/// `new BigDecimal(x)` and `BigDecimal.valueOf(x)`.
pub fn new_decimal(args: &[Value]) -> Result<Value, ShimError> {
    arity("BigDecimal", args, 1..=1)?;
    Ok(Value::Decimal(decimal_from(&args[0])?))
}

/// `new BigInteger(x)` and `BigInteger.valueOf(x)`.
pub fn new_big_integer(args: &[Value]) -> Result<Value, ShimError> {
    arity("BigInteger", args, 1..=1)?;
    Ok(Value::BigInteger(big_integer_from(&args[0])?))
}

pub fn decimal_method(receiver: &Decimal, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "add" | "subtract" | "multiply" | "compareTo" | "equals" => {
            arity(method, args, 1..=1)?;
            if method == "equals" {
                return Ok(Value::Bool(matches!(&args[0], Value::Decimal(d) if d == receiver)));
            }
            let other = decimal_from(&args[0])?;
            Ok(match method {
                "add" => Value::Decimal(receiver.add(&other)),
                "subtract" => Value::Decimal(receiver.subtract(&other)),
                "multiply" => Value::Decimal(receiver.multiply(&other)),
                _ => Value::Int(ordering_value(receiver.compare(&other))),
            })
        }
        "negate" => {
            arity(method, args, 0..=0)?;
            Ok(Value::Decimal(receiver.negate()))
        }
        "doubleValue" => {
            arity(method, args, 0..=0)?;
            Ok(Value::Double(receiver.to_f64()))
        }
        "toString" => {
            arity(method, args, 0..=0)?;
            Ok(Value::String(receiver.to_string()))
        }
        "toPlainString" => {
            arity(method, args, 0..=0)?;
            Ok(Value::String(receiver.to_plain_string()))
        }
        _ => Err(ShimError::unknown_method("BigDecimal", method)),
    }
}

pub fn big_integer_method(receiver: &BigInteger, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "add" | "subtract" | "multiply" | "divide" | "compareTo" | "equals" => {
            arity(method, args, 1..=1)?;
            if method == "equals" {
                return Ok(Value::Bool(matches!(&args[0], Value::BigInteger(b) if b == receiver)));
            }
            let other = big_integer_from(&args[0])?;
            Ok(match method {
                "add" => Value::BigInteger(receiver.add(&other)),
                "subtract" => Value::BigInteger(receiver.subtract(&other)),
                "multiply" => Value::BigInteger(receiver.multiply(&other)),
                "divide" => Value::BigInteger(receiver.divide(&other)?),
                _ => Value::Int(ordering_value(receiver.cmp(&other))),
            })
        }
        "negate" => {
            arity(method, args, 0..=0)?;
            Ok(Value::BigInteger(receiver.negate()))
        }
        "toString" => {
            arity(method, args, 0..=0)?;
            Ok(Value::String(receiver.to_string()))
        }
        _ => Err(ShimError::unknown_method("BigInteger", method)),
    }
}

pub fn ordering_value(ordering: Ordering) -> i64 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Host `parseInt(...)`, `parseLong(...)` and `parseFloat(...)`, the
/// targets the translator rewrites the parse utilities to.
pub fn parse_function(name: &str, args: &[Value]) -> Result<Value, ShimError> {
    arity(name, args, 1..=1)?;
    let text = string_arg(name, &args[0])?;
    match name {
        "parseInt" => Ok(Value::Int(parse_int(&text)?)),
        "parseLong" => Ok(Value::Int(parse_long(&text)?)),
        _ => Ok(Value::Double(parse_double(&text)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(text: &str) -> Decimal {
        Decimal::parse(text).expect("decimal literal")
    }

    #[test]
    fn decimal_arithmetic_keeps_scale() {
        let a = decimal("10.25");
        let b = decimal("0.5");
        assert_eq!(a.add(&b).to_string(), "10.75");
        assert_eq!(a.subtract(&b).to_string(), "9.75");
        assert_eq!(a.multiply(&b).to_string(), "5.125");
        assert_eq!(decimal("-0.05").to_string(), "-0.05");
        assert_eq!(Decimal::from_f64(0.1).expect("f64").to_string(), "0.1");
        assert_eq!(Decimal::from_f64(3.0).expect("f64").to_string(), "3.0");
    }

    #[test]
    fn decimal_text_forms() {
        assert_eq!(decimal("1e3").to_string(), "1E+3");
        assert_eq!(decimal("1e3").to_plain_string(), "1000");
        assert_eq!(decimal("1.5E-8").to_string(), "1.5E-8");
        assert_eq!(decimal("1.5E-8").to_plain_string(), "0.000000015");
        assert_eq!(decimal("2.50").to_string(), "2.50");
        assert!(Decimal::parse(" 1").is_none());
        assert!(Decimal::parse("abc").is_none());
        assert!(Decimal::parse("").is_none());
    }

    #[test]
    fn decimal_equality_includes_scale() {
        assert!(decimal("2.0") != decimal("2.00"));
        assert_eq!(decimal("2.0").compare(&decimal("2.00")), Ordering::Equal);
    }

    #[test]
    fn big_integer_grows_past_128_bits() {
        let big = BigInteger::parse("170141183460469231731687303715884105727").expect("i128 max");
        assert_eq!(
            big.add(&BigInteger::from_i64(1)).to_string(),
            "170141183460469231731687303715884105728"
        );
        assert_eq!(BigInteger::from_i64(12).multiply(&BigInteger::from_i64(-3)).to_string(), "-36");
        assert_eq!(BigInteger::from_i64(-7).divide(&BigInteger::from_i64(2)).expect("div").to_string(), "-3");
        assert!(matches!(
            BigInteger::from_i64(1).divide(&BigInteger::from_i64(0)),
            Err(ShimError::Arithmetic(_))
        ));
        assert!(BigInteger::parse("12a").is_none());
    }

    #[test]
    fn parse_rules_follow_java() {
        assert_eq!(parse_int("42").expect("int"), 42);
        assert_eq!(parse_int("-7").expect("int"), -7);
        assert!(parse_int(" 42").is_err());
        assert!(parse_int("4.2").is_err());
        assert_eq!(parse_double(" 2.5 ").expect("double"), 2.5);
        assert!(parse_double("abc").is_err());
    }

    #[test]
    fn int_parsing_is_limited_to_32_bits() {
        assert_eq!(parse_int("2147483647").expect("int max"), i32::MAX as i64);
        assert_eq!(parse_int("-2147483648").expect("int min"), i32::MIN as i64);
        assert!(matches!(parse_int("99999999999"), Err(ShimError::NumberFormat(_))));
        assert_eq!(parse_long("99999999999").expect("long"), 99_999_999_999);

        let wide = [Value::String("99999999999".to_string())];
        assert!(integer_method("Integer", "parseInt", &wide).is_err());
        assert!(integer_method("Long", "parseLong", &wide).is_ok());
        assert!(parse_function("parseInt", &wide).is_err());
        assert!(parse_function("parseLong", &wide).is_ok());
    }
}
