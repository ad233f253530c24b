//! Emulated standard-library objects that translated statements call into.
//!
//! Every entry point takes the run's [`RunContext`], so nothing here keeps
//! state between runs. Failures are [`ShimError`]s whose messages carry the
//! Java exception name; the evaluator attaches a source span to them.

pub mod collections;
pub mod date;
pub mod numeric;
pub mod random;
pub mod scanner;
pub mod text;

use crate::config::RunConfig;
use crate::output::OutputAssembler;
use crate::value::{shared, StaticClass, Stream, Value};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scanner::InputQueue;
use std::ops::RangeInclusive;

/// Per-run state owned by the executor.
pub struct RunContext {
    pub input: InputQueue,
    pub output: OutputAssembler,
    pub rng: StdRng,
    pub echo_input: bool,
}

impl RunContext {
    pub fn new(config: &RunConfig, input: InputQueue) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            input,
            output: OutputAssembler::new(),
            rng,
            echo_input: config.echo_input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShimError {
    #[error("IndexOutOfBoundsException: Index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("StringIndexOutOfBoundsException: {0}")]
    StringIndexOutOfBounds(String),
    #[error("NegativeArraySizeException: {0}")]
    NegativeArraySize(i64),
    #[error("NumberFormatException: For input string: \"{0}\"")]
    NumberFormat(String),
    #[error("ArithmeticException: {0}")]
    Arithmetic(String),
    #[error("NullPointerException: Cannot invoke \"{0}\" because value is null")]
    NullPointer(String),
    #[error("IllegalArgumentException: {0}")]
    IllegalArgument(String),
    #[error("UnknownFormatConversionException: Conversion = '{0}'")]
    UnknownFormatConversion(char),
    #[error("IllegalFormatConversionException: {conversion} != {type_name}")]
    IllegalFormatConversion { conversion: char, type_name: String },
    #[error("MissingFormatArgumentException: Format specifier '%{0}'")]
    MissingFormatArgument(char),
    #[error("The method {method}() is undefined for the type {type_name}")]
    UnknownMethod { type_name: String, method: String },
    #[error("{property} cannot be resolved or is not a field of {type_name}")]
    UnknownProperty { type_name: String, property: String },
    #[error("{0} cannot be resolved to a type")]
    UnknownClass(String),
    #[error("The function {0}() is undefined")]
    UnknownFunction(String),
    #[error("{name} expects {expected} argument(s) but got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
    #[error("{name}: expected {expected} but got {got}")]
    Type {
        name: String,
        expected: &'static str,
        got: &'static str,
    },
}

impl ShimError {
    pub fn unknown_method(type_name: &str, method: &str) -> Self {
        ShimError::UnknownMethod {
            type_name: type_name.to_string(),
            method: method.to_string(),
        }
    }

    pub fn unknown_property(type_name: &str, property: &str) -> Self {
        ShimError::UnknownProperty {
            type_name: type_name.to_string(),
            property: property.to_string(),
        }
    }

    pub fn type_mismatch(name: &str, expected: &'static str, got: &Value) -> Self {
        ShimError::Type {
            name: name.to_string(),
            expected,
            got: got.type_name(),
        }
    }
}

pub fn arity(name: &str, args: &[Value], expected: RangeInclusive<usize>) -> Result<(), ShimError> {
    if expected.contains(&args.len()) {
        return Ok(());
    }
    let expected = if expected.start() == expected.end() {
        expected.start().to_string()
    } else {
        format!("{} to {}", expected.start(), expected.end())
    };
    Err(ShimError::Arity {
        name: name.to_string(),
        expected,
        got: args.len(),
    })
}

pub fn int_arg(name: &str, value: &Value) -> Result<i64, ShimError> {
    value
        .as_i64()
        .ok_or_else(|| ShimError::type_mismatch(name, "int", value))
}

pub fn float_arg(name: &str, value: &Value) -> Result<f64, ShimError> {
    value
        .as_f64()
        .ok_or_else(|| ShimError::type_mismatch(name, "double", value))
}

pub fn bool_arg(name: &str, value: &Value) -> Result<bool, ShimError> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(ShimError::type_mismatch(name, "boolean", other)),
    }
}

/// Strings and chars both satisfy a `String` parameter.
pub fn string_arg(name: &str, value: &Value) -> Result<String, ShimError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Char(c) => Ok(c.to_string()),
        other => Err(ShimError::type_mismatch(name, "String", other)),
    }
}

/// Bindings present before the first statement runs.
pub fn globals() -> Vec<(&'static str, Value)> {
    let mut bindings: Vec<(&'static str, Value)> = StaticClass::ALL
        .iter()
        .map(|class| (class.name(), Value::Class(*class)))
        .collect();
    bindings.push(("args", Value::Array(shared(Vec::new()))));
    bindings
}

/// `new Class(args)`.
pub fn construct(ctx: &mut RunContext, class: &str, args: Vec<Value>) -> Result<Value, ShimError> {
    match class {
        "ArrayList" | "LinkedList" | "List" => collections::new_list(&args),
        "HashMap" | "TreeMap" | "LinkedHashMap" | "Map" => {
            arity(class, &args, 0..=0)?;
            Ok(Value::Map(shared(Vec::new())))
        }
        "Scanner" => {
            arity("Scanner", &args, 1..=1)?;
            match &args[0] {
                Value::InputStream => Ok(Value::Scanner),
                other => Err(ShimError::type_mismatch("Scanner", "InputStream", other)),
            }
        }
        "Random" => random::new_random(ctx, &args),
        "Date" => {
            arity("Date", &args, 0..=0)?;
            Ok(Value::Date(date::now()))
        }
        "BigDecimal" => numeric::new_decimal(&args),
        "BigInteger" => numeric::new_big_integer(&args),
        "String" => match args.as_slice() {
            [] => Ok(Value::String(String::new())),
            [value] => Ok(Value::String(value.to_string())),
            _ => arity("String", &args, 0..=1).map(|_| Value::Null),
        },
        _ => Err(ShimError::UnknownClass(class.to_string())),
    }
}

/// Calls of bare host functions the translator emits.
pub fn call_function(name: &str, args: Vec<Value>) -> Result<Value, ShimError> {
    match name {
        "parseInt" | "parseLong" | "parseFloat" => numeric::parse_function(name, &args),
        "newArray" => {
            arity("newArray", &args, 2..=2)?;
            let size = int_arg("newArray", &args[0])?;
            collections::new_array(size, &args[1])
        }
        _ => Err(ShimError::UnknownFunction(name.to_string())),
    }
}

/// `receiver.name` without a call.
pub fn get_property(receiver: &Value, name: &str) -> Result<Value, ShimError> {
    match receiver {
        Value::Null => Err(ShimError::NullPointer(name.to_string())),
        Value::Array(items) if name == "length" => Ok(Value::Int(items.borrow().len() as i64)),
        Value::Class(class) => static_property(*class, name)
            .ok_or_else(|| ShimError::unknown_property(class.name(), name)),
        other => Err(ShimError::unknown_property(other.type_name(), name)),
    }
}

fn static_property(class: StaticClass, name: &str) -> Option<Value> {
    match (class, name) {
        (StaticClass::System, "out") => Some(Value::PrintStream(Stream::Out)),
        (StaticClass::System, "err") => Some(Value::PrintStream(Stream::Err)),
        (StaticClass::System, "in") => Some(Value::InputStream),
        (StaticClass::Math, _) => numeric::math_property(name),
        (StaticClass::Integer | StaticClass::Long, _) => numeric::integer_property(class.name(), name),
        (StaticClass::BigDecimal, "ZERO") => Some(Value::Decimal(numeric::Decimal::from_i64(0))),
        (StaticClass::BigDecimal, "ONE") => Some(Value::Decimal(numeric::Decimal::from_i64(1))),
        (StaticClass::BigDecimal, "TEN") => Some(Value::Decimal(numeric::Decimal::from_i64(10))),
        (StaticClass::BigInteger, "ZERO") => Some(Value::BigInteger(numeric::BigInteger::from_i64(0))),
        (StaticClass::BigInteger, "ONE") => Some(Value::BigInteger(numeric::BigInteger::from_i64(1))),
        (StaticClass::BigInteger, "TEN") => Some(Value::BigInteger(numeric::BigInteger::from_i64(10))),
        _ => None,
    }
}

/// `receiver.method(args)`.
pub fn call_method(
    ctx: &mut RunContext,
    receiver: &Value,
    method: &str,
    args: Vec<Value>,
) -> Result<Value, ShimError> {
    match receiver {
        Value::Null => Err(ShimError::NullPointer(format!("{}()", method))),
        Value::Class(class) => call_static(ctx, *class, method, args),
        Value::PrintStream(stream) => print_stream_method(ctx, *stream, method, &args),
        Value::Scanner => scanner::scanner_method(ctx, method, &args),
        Value::List(items) => collections::list_method(items, method, &args),
        Value::Map(entries) => collections::map_method(entries, method, &args),
        Value::Array(items) => match method {
            "clone" => Ok(Value::Array(shared(items.borrow().clone()))),
            _ => object_method(receiver, method, &args),
        },
        Value::String(text) => text::string_method(text, method, &args),
        Value::Random(rng) => random::random_method(rng, method, &args),
        Value::Date(date) => date::date_method(date, method, &args),
        Value::Decimal(decimal) => numeric::decimal_method(decimal, method, &args),
        Value::BigInteger(big) => numeric::big_integer_method(big, method, &args),
        Value::Char(_) | Value::Int(_) | Value::Double(_) | Value::Bool(_) => {
            object_method(receiver, method, &args)
        }
        Value::InputStream => Err(ShimError::unknown_method("InputStream", method)),
    }
}

/// Members every object answers.
fn object_method(receiver: &Value, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "toString" => {
            arity("toString", args, 0..=0)?;
            Ok(Value::String(receiver.to_string()))
        }
        "equals" => {
            arity("equals", args, 1..=1)?;
            Ok(Value::Bool(receiver.equals(&args[0])))
        }
        "intValue" | "longValue" if receiver.is_numeric() => {
            arity(method, args, 0..=0)?;
            Ok(Value::Int(receiver.as_f64().unwrap_or_default() as i64))
        }
        "doubleValue" if receiver.is_numeric() => {
            arity(method, args, 0..=0)?;
            Ok(Value::Double(receiver.as_f64().unwrap_or_default()))
        }
        _ => Err(ShimError::unknown_method(receiver.type_name(), method)),
    }
}

fn call_static(
    ctx: &mut RunContext,
    class: StaticClass,
    method: &str,
    args: Vec<Value>,
) -> Result<Value, ShimError> {
    match class {
        StaticClass::Math => numeric::math_method(ctx, method, &args),
        StaticClass::Integer | StaticClass::Long => numeric::integer_method(class.name(), method, &args),
        StaticClass::Double => numeric::double_method(method, &args),
        StaticClass::String => text::string_static(method, &args),
        StaticClass::Character => text::character_static(method, &args),
        StaticClass::Arrays => collections::arrays_static(method, &args),
        StaticClass::BigDecimal if method == "valueOf" => numeric::new_decimal(&args),
        StaticClass::BigInteger if method == "valueOf" => numeric::new_big_integer(&args),
        StaticClass::System => system_static(method, &args),
        _ => Err(ShimError::unknown_method(class.name(), method)),
    }
}

fn system_static(method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "currentTimeMillis" => {
            arity(method, args, 0..=0)?;
            Ok(Value::Int(date::now().timestamp_millis()))
        }
        "nanoTime" => {
            arity(method, args, 0..=0)?;
            Ok(Value::Int(date::now().timestamp_nanos_opt().unwrap_or_default()))
        }
        _ => Err(ShimError::unknown_method("System", method)),
    }
}

/// `System.out` and `System.err` share the console; there is one output
/// pane.
fn print_stream_method(
    ctx: &mut RunContext,
    stream: Stream,
    method: &str,
    args: &[Value],
) -> Result<Value, ShimError> {
    tracing::trace!(?stream, method, "print stream call");
    match method {
        "println" => {
            arity(method, args, 0..=1)?;
            let text = args.first().map(Value::to_string).unwrap_or_default();
            ctx.output.println(&text);
        }
        "print" => {
            arity(method, args, 1..=1)?;
            ctx.output.print(&args[0].to_string());
        }
        "printf" | "format" => {
            let Some((pattern, rest)) = args.split_first() else {
                return arity(method, args, 1..=usize::MAX).map(|_| Value::Null);
            };
            let pattern = string_arg(method, pattern)?;
            ctx.output.print(&text::format(&pattern, rest)?);
        }
        "flush" => arity(method, args, 0..=0)?,
        _ => return Err(ShimError::unknown_method("PrintStream", method)),
    }
    Ok(Value::Null)
}
