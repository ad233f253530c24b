use super::{arity, int_arg, ShimError};
use crate::value::{shared, Shared, Value};
use std::cmp::Ordering;

/// Converts a host index into a slot, or the Java out-of-bounds fault.
pub fn check_index(index: i64, length: usize) -> Result<usize, ShimError> {
    if index < 0 || index as usize >= length {
        return Err(ShimError::IndexOutOfBounds { index, length });
    }
    Ok(index as usize)
}

/// `newArray(n, default)`: `n` copies of the element type's default.
pub fn new_array(size: i64, default: &Value) -> Result<Value, ShimError> {
    if size < 0 {
        return Err(ShimError::NegativeArraySize(size));
    }
    let slots = (0..size).map(|_| fresh_copy(default)).collect();
    Ok(Value::Array(shared(slots)))
}

/// Nested array defaults get their own storage per slot, so the rows of
/// `newArray(2, newArray(3, 0))` are independent.
fn fresh_copy(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(shared(items.borrow().iter().map(fresh_copy).collect())),
        other => other.clone(),
    }
}

/// `new ArrayList<>()`, or a copy of another collection.
pub fn new_list(args: &[Value]) -> Result<Value, ShimError> {
    arity("ArrayList", args, 0..=1)?;
    let items = match args.first() {
        None | Some(Value::Int(_)) => Vec::new(),
        Some(Value::List(other) | Value::Array(other)) => other.borrow().clone(),
        Some(other) => return Err(ShimError::type_mismatch("ArrayList", "Collection", other)),
    };
    Ok(Value::List(shared(items)))
}

pub fn list_method(items: &Shared<Vec<Value>>, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "add" => {
            arity("add", args, 1..=2)?;
            let mut items = items.borrow_mut();
            if let [index, value] = args {
                let length = items.len();
                let index = int_arg("add", index)?;
                if index < 0 || index as usize > length {
                    return Err(ShimError::IndexOutOfBounds { index, length });
                }
                items.insert(index as usize, value.clone());
                Ok(Value::Null)
            } else {
                items.push(args[0].clone());
                Ok(Value::Bool(true))
            }
        }
        "get" => {
            arity("get", args, 1..=1)?;
            let items = items.borrow();
            let slot = check_index(int_arg("get", &args[0])?, items.len())?;
            Ok(items[slot].clone())
        }
        "set" => {
            arity("set", args, 2..=2)?;
            let mut items = items.borrow_mut();
            let slot = check_index(int_arg("set", &args[0])?, items.len())?;
            Ok(std::mem::replace(&mut items[slot], args[1].clone()))
        }
        "size" => {
            arity("size", args, 0..=0)?;
            Ok(Value::Int(items.borrow().len() as i64))
        }
        "isEmpty" => {
            arity("isEmpty", args, 0..=0)?;
            Ok(Value::Bool(items.borrow().is_empty()))
        }
        "remove" => {
            arity("remove", args, 1..=1)?;
            let mut items = items.borrow_mut();
            match &args[0] {
                Value::Int(index) => {
                    let slot = check_index(*index, items.len())?;
                    Ok(items.remove(slot))
                }
                value => match items.iter().position(|item| item.equals(value)) {
                    Some(slot) => {
                        items.remove(slot);
                        Ok(Value::Bool(true))
                    }
                    None => Ok(Value::Bool(false)),
                },
            }
        }
        "contains" => {
            arity("contains", args, 1..=1)?;
            Ok(Value::Bool(items.borrow().iter().any(|item| item.equals(&args[0]))))
        }
        "indexOf" => {
            arity("indexOf", args, 1..=1)?;
            let position = items.borrow().iter().position(|item| item.equals(&args[0]));
            Ok(Value::Int(position.map_or(-1, |slot| slot as i64)))
        }
        "clear" => {
            arity("clear", args, 0..=0)?;
            items.borrow_mut().clear();
            Ok(Value::Null)
        }
        "addAll" => {
            arity("addAll", args, 1..=1)?;
            let extra = match &args[0] {
                Value::List(other) | Value::Array(other) => other.borrow().clone(),
                other => return Err(ShimError::type_mismatch("addAll", "Collection", other)),
            };
            items.borrow_mut().extend(extra);
            Ok(Value::Bool(true))
        }
        "toString" => {
            arity("toString", args, 0..=0)?;
            Ok(Value::String(Value::List(items.clone()).to_string()))
        }
        _ => Err(ShimError::unknown_method("ArrayList", method)),
    }
}

pub fn map_method(
    entries: &Shared<Vec<(Value, Value)>>,
    method: &str,
    args: &[Value],
) -> Result<Value, ShimError> {
    let position = |key: &Value| entries.borrow().iter().position(|(k, _)| k.equals(key));
    match method {
        "put" => {
            arity("put", args, 2..=2)?;
            let slot = position(&args[0]);
            let mut entries = entries.borrow_mut();
            match slot {
                Some(slot) => Ok(std::mem::replace(&mut entries[slot].1, args[1].clone())),
                None => {
                    entries.push((args[0].clone(), args[1].clone()));
                    Ok(Value::Null)
                }
            }
        }
        "get" | "getOrDefault" => {
            let fallback = if method == "get" {
                arity("get", args, 1..=1)?;
                Value::Null
            } else {
                arity("getOrDefault", args, 2..=2)?;
                args[1].clone()
            };
            Ok(match position(&args[0]) {
                Some(slot) => entries.borrow()[slot].1.clone(),
                None => fallback,
            })
        }
        "containsKey" => {
            arity("containsKey", args, 1..=1)?;
            Ok(Value::Bool(position(&args[0]).is_some()))
        }
        "containsValue" => {
            arity("containsValue", args, 1..=1)?;
            Ok(Value::Bool(entries.borrow().iter().any(|(_, v)| v.equals(&args[0]))))
        }
        "remove" => {
            arity("remove", args, 1..=1)?;
            Ok(match position(&args[0]) {
                Some(slot) => entries.borrow_mut().remove(slot).1,
                None => Value::Null,
            })
        }
        "size" => {
            arity("size", args, 0..=0)?;
            Ok(Value::Int(entries.borrow().len() as i64))
        }
        "isEmpty" => {
            arity("isEmpty", args, 0..=0)?;
            Ok(Value::Bool(entries.borrow().is_empty()))
        }
        "clear" => {
            arity("clear", args, 0..=0)?;
            entries.borrow_mut().clear();
            Ok(Value::Null)
        }
        "keySet" | "values" => {
            arity(method, args, 0..=0)?;
            let take_keys = method == "keySet";
            let items = entries
                .borrow()
                .iter()
                .map(|(k, v)| if take_keys { k.clone() } else { v.clone() })
                .collect();
            Ok(Value::List(shared(items)))
        }
        "toString" => {
            arity("toString", args, 0..=0)?;
            Ok(Value::String(Value::Map(entries.clone()).to_string()))
        }
        _ => Err(ShimError::unknown_method("HashMap", method)),
    }
}

/// `Arrays.*` statics.
pub fn arrays_static(method: &str, args: &[Value]) -> Result<Value, ShimError> {
    match method {
        "toString" => {
            arity("Arrays.toString", args, 1..=1)?;
            match &args[0] {
                Value::Null => Ok(Value::String("null".to_string())),
                Value::Array(items) => Ok(Value::String(Value::List(items.clone()).to_string())),
                other => Err(ShimError::type_mismatch("Arrays.toString", "array", other)),
            }
        }
        "sort" => {
            arity("Arrays.sort", args, 1..=1)?;
            let Value::Array(items) = &args[0] else {
                return Err(ShimError::type_mismatch("Arrays.sort", "array", &args[0]));
            };
            items.borrow_mut().sort_by(compare_values);
            Ok(Value::Null)
        }
        "fill" => {
            arity("Arrays.fill", args, 2..=2)?;
            let Value::Array(items) = &args[0] else {
                return Err(ShimError::type_mismatch("Arrays.fill", "array", &args[0]));
            };
            items.borrow_mut().fill(args[1].clone());
            Ok(Value::Null)
        }
        "asList" => Ok(Value::List(shared(args.to_vec()))),
        _ => Err(ShimError::unknown_method("Arrays", method)),
    }
}

/// Natural ordering: numbers numerically, strings lexicographically.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::String(l), Value::String(r)) => l.cmp(r),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        (l, r) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l.total_cmp(&r),
            _ => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::String(s.to_string())).collect()
    }

    #[test]
    fn list_remove_distinguishes_index_from_value() {
        let list = shared(vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
        let removed = list_method(&list, "remove", &[Value::Int(0)]).expect("remove by index");
        assert!(removed.equals(&Value::Int(10)));

        let names = shared(strings(&["a", "b"]));
        let removed = list_method(&names, "remove", &[Value::String("b".into())]).expect("remove by value");
        assert!(removed.equals(&Value::Bool(true)));
        assert_eq!(Value::List(names).to_string(), "[a]");
    }

    #[test]
    fn list_get_out_of_range_reports_length() {
        let list = shared(strings(&["x"]));
        let err = list_method(&list, "get", &[Value::Int(3)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "IndexOutOfBoundsException: Index 3 out of bounds for length 1"
        );
    }

    #[test]
    fn map_keeps_insertion_order_and_overwrites() {
        let map = shared(Vec::new());
        map_method(&map, "put", &[Value::String("b".into()), Value::Int(2)]).expect("put");
        map_method(&map, "put", &[Value::String("a".into()), Value::Int(1)]).expect("put");
        let previous = map_method(&map, "put", &[Value::String("b".into()), Value::Int(3)]).expect("put");
        assert!(previous.equals(&Value::Int(2)));
        assert_eq!(Value::Map(map.clone()).to_string(), "{b=3, a=1}");

        let missing = map_method(&map, "get", &[Value::String("z".into())]).expect("get");
        assert!(matches!(missing, Value::Null));
        let fallback = map_method(&map, "getOrDefault", &[Value::String("z".into()), Value::Int(0)])
            .expect("getOrDefault");
        assert!(fallback.equals(&Value::Int(0)));
    }

    #[test]
    fn arrays_sort_and_to_string() {
        let array = Value::Array(shared(vec![Value::Int(3), Value::Int(1), Value::Int(2)]));
        arrays_static("sort", &[array.clone()]).expect("sort");
        let text = arrays_static("toString", &[array]).expect("toString");
        assert_eq!(text.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn nested_array_rows_are_independent() {
        let row = new_array(3, &Value::Int(0)).expect("row");
        let grid = new_array(2, &row).expect("grid");
        let Value::Array(rows) = &grid else {
            panic!("not an array: {:?}", grid);
        };
        if let Value::Array(second) = &rows.borrow()[1] {
            second.borrow_mut()[2] = Value::Int(5);
        }
        assert_eq!(grid.to_string(), "[[0, 0, 0], [0, 0, 5]]");
        assert_eq!(row.to_string(), "[0, 0, 0]");
    }

    #[test]
    fn negative_array_size_is_rejected() {
        assert!(matches!(
            new_array(-1, &Value::Int(0)),
            Err(ShimError::NegativeArraySize(-1))
        ));
    }
}
