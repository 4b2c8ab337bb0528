//! Comparison and membership operators: `< > }` (equality lives in the
//! dispatcher since it is pure [`Value::eq_value`]).

use std::cmp::Ordering;

use crate::{
    builtins::{bad_type, bool_value},
    exception::RunResult,
    value::Value,
};

/// `<`. Numbers, strings and lists compare (0/1); a seq and a real slice:
/// `<q r` is the prefix `q[..r]`, `<r q` drops the last `r` elements. Slice
/// bounds clamp and accept negative indices the way Python slices do.
pub(crate) fn less_than(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(bool_value(x < y)),
        (Value::Str(x), Value::Str(y)) => Ok(bool_value(x < y)),
        (Value::List(_), Value::List(_)) => match a.try_cmp(b) {
            Some(ordering) => Ok(bool_value(ordering == Ordering::Less)),
            None => Err(bad_type("less_than", &[a, b])),
        },
        (Value::Str(_) | Value::List(_), Value::Num(n)) => {
            let end = prefix_end(seq_len(a), n.floor_i64()?);
            Ok(slice(a, 0, end))
        }
        (Value::Num(n), Value::Str(_) | Value::List(_)) => {
            let len = seq_len(b);
            let end = prefix_end(len, -(n.floor_i64()?));
            Ok(slice(b, 0, end))
        }
        _ => Err(bad_type("less_than", &[a, b])),
    }
}

/// `>`. The comparisons mirror `<`; the slices take the other end: `>q r`
/// is the suffix `q[r..]`, `>r q` keeps the last `r` elements.
pub(crate) fn greater_than(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(bool_value(x > y)),
        (Value::Str(x), Value::Str(y)) => Ok(bool_value(x > y)),
        (Value::List(_), Value::List(_)) => match a.try_cmp(b) {
            Some(ordering) => Ok(bool_value(ordering == Ordering::Greater)),
            None => Err(bad_type("greater_than", &[a, b])),
        },
        (Value::Str(_) | Value::List(_), Value::Num(n)) => {
            let len = seq_len(a);
            let start = suffix_start(len, n.floor_i64()?);
            Ok(slice(a, start, len))
        }
        (Value::Num(n), Value::Str(_) | Value::List(_)) => {
            let len = seq_len(b);
            let start = suffix_start(len, -(n.floor_i64()?));
            Ok(slice(b, start, len))
        }
        _ => Err(bad_type("greater_than", &[a, b])),
    }
}

/// `}`. A list on the right tests membership by equality; numbers and
/// strings test substring containment on their renderings (`}20"120"` is 1).
pub(crate) fn pin(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (item, Value::List(items)) => Ok(bool_value(items.iter().any(|el| el.eq_value(item)))),
        (Value::Num(_) | Value::Str(_), Value::Num(_) | Value::Str(_)) => {
            Ok(bool_value(b.render().contains(&a.render())))
        }
        _ => Err(bad_type("Pin", &[a, b])),
    }
}

fn seq_len(value: &Value) -> usize {
    match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        _ => 0,
    }
}

/// Endpoint of `seq[..k]` with Python semantics: negative counts from the
/// end, out-of-range clamps.
fn prefix_end(len: usize, k: i64) -> usize {
    if k < 0 {
        len.saturating_sub(k.unsigned_abs() as usize)
    } else {
        len.min(k as usize)
    }
}

/// Start of `seq[k..]` with Python semantics.
fn suffix_start(len: usize, k: i64) -> usize {
    if k < 0 {
        len.saturating_sub(k.unsigned_abs() as usize)
    } else {
        len.min(k as usize)
    }
}

fn slice(value: &Value, start: usize, end: usize) -> Value {
    match value {
        Value::Str(s) => Value::str(
            s.chars()
                .skip(start)
                .take(end.saturating_sub(start))
                .collect::<String>(),
        ),
        Value::List(items) => Value::list(items[start.min(items.len())..end.min(items.len())].to_vec()),
        other => other.clone(),
    }
}
