use crate::shim::numeric::{BigInteger, Decimal};
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Mutable state shared between every binding that refers to one object,
/// the way Java references share one heap object.
pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Classes whose static members can be reached by name, e.g. `Math.max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticClass {
    System,
    Math,
    Integer,
    Long,
    Double,
    String,
    Character,
    Arrays,
    BigDecimal,
    BigInteger,
}

impl StaticClass {
    pub const ALL: [StaticClass; 10] = [
        StaticClass::System,
        StaticClass::Math,
        StaticClass::Integer,
        StaticClass::Long,
        StaticClass::Double,
        StaticClass::String,
        StaticClass::Character,
        StaticClass::Arrays,
        StaticClass::BigDecimal,
        StaticClass::BigInteger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StaticClass::System => "System",
            StaticClass::Math => "Math",
            StaticClass::Integer => "Integer",
            StaticClass::Long => "Long",
            StaticClass::Double => "Double",
            StaticClass::String => "String",
            StaticClass::Character => "Character",
            StaticClass::Arrays => "Arrays",
            StaticClass::BigDecimal => "BigDecimal",
            StaticClass::BigInteger => "BigInteger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Char(char),
    String(String),
    Array(Shared<Vec<Value>>),
    List(Shared<Vec<Value>>),
    /// Entries in insertion order.
    Map(Shared<Vec<(Value, Value)>>),
    Scanner,
    Random(Shared<StdRng>),
    Date(DateTime<Local>),
    Decimal(Decimal),
    BigInteger(BigInteger),
    PrintStream(Stream),
    InputStream,
    Class(StaticClass),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::String(_) => "String",
            Value::Array(_) => "array",
            Value::List(_) => "ArrayList",
            Value::Map(_) => "HashMap",
            Value::Scanner => "Scanner",
            Value::Random(_) => "Random",
            Value::Date(_) => "Date",
            Value::Decimal(_) => "BigDecimal",
            Value::BigInteger(_) => "BigInteger",
            Value::PrintStream(_) => "PrintStream",
            Value::InputStream => "InputStream",
            Value::Class(class) => class.name(),
        }
    }

    /// Integral view used by arithmetic and indexing; chars promote to
    /// their code point.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Char(c) => Some(*c as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            Value::Char(c) => Some(*c as u32 as f64),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_) | Value::Char(_))
    }

    /// Value equality as `==` and `equals` see it: numbers compare across
    /// int/double/char, strings by content, objects by identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Char(l), Value::Char(r)) => l == r,
            (Value::Int(l), Value::Int(r)) => l == r,
            (l, r) if l.is_numeric() && r.is_numeric() => l.as_f64() == r.as_f64(),
            (Value::Array(l), Value::Array(r)) => Rc::ptr_eq(l, r),
            (Value::List(l), Value::List(r)) => Rc::ptr_eq(l, r),
            (Value::Map(l), Value::Map(r)) => Rc::ptr_eq(l, r),
            (Value::Random(l), Value::Random(r)) => Rc::ptr_eq(l, r),
            (Value::Date(l), Value::Date(r)) => l == r,
            (Value::Decimal(l), Value::Decimal(r)) => l == r,
            (Value::BigInteger(l), Value::BigInteger(r)) => l == r,
            (Value::Scanner, Value::Scanner) => true,
            (Value::InputStream, Value::InputStream) => true,
            (Value::PrintStream(l), Value::PrintStream(r)) => l == r,
            (Value::Class(l), Value::Class(r)) => l == r,
            _ => false,
        }
    }
}

/// Java's `Double.toString` layout: always a fractional digit, scientific
/// notation outside `[1e-3, 1e7)`.
pub fn format_double(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-3..1e7).contains(&magnitude) {
        let formatted = format!("{:e}", n);
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{}.0", mantissa)
        };
        format!("{}E{}", mantissa, exponent)
    } else if n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", format_double(*n)),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) | Value::List(items) => {
                write!(f, "[")?;
                write_joined(f, items.borrow().iter())?;
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Scanner => write!(f, "java.util.Scanner"),
            Value::Random(_) => write!(f, "java.util.Random"),
            Value::Date(date) => write!(f, "{}", crate::shim::date::display(date)),
            Value::Decimal(decimal) => write!(f, "{}", decimal),
            Value::BigInteger(big) => write!(f, "{}", big),
            Value::PrintStream(_) => write!(f, "java.io.PrintStream"),
            Value::InputStream => write!(f, "java.io.InputStream"),
            Value::Class(class) => write!(f, "class {}", class.name()),
        }
    }
}
