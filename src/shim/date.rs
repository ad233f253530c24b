use super::{arity, ShimError};
use crate::value::Value;
use chrono::{DateTime, Local};

pub fn now() -> DateTime<Local> {
    Local::now()
}

/// `Date.toString()` layout, e.g. `Sun Oct 18 09:15:02 +0200 2026`.
pub fn display(date: &DateTime<Local>) -> String {
    date.format("%a %b %d %H:%M:%S %z %Y").to_string()
}

pub fn date_method(date: &DateTime<Local>, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "toString" => {
            arity("toString", args, 0..=0)?;
            Ok(Value::String(display(date)))
        }
        "getTime" => {
            arity("getTime", args, 0..=0)?;
            Ok(Value::Int(date.timestamp_millis()))
        }
        _ => Err(ShimError::unknown_method("Date", method)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_uses_java_field_order() {
        let date = Local
            .with_ymd_and_hms(2026, 10, 18, 9, 15, 2)
            .single()
            .expect("unambiguous local time");
        let text = display(&date);
        assert!(text.starts_with("Sun Oct 18 09:15:02 "));
        assert!(text.ends_with(" 2026"));
    }
}
