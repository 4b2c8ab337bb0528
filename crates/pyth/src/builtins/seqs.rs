//! Sequence-or-number operators: `h t H T l s U S`.

use crate::{
    builtins::{bad_type, makeiter, rebuild_seq, seq_elements, sort_values},
    exception::{RunResult, index_error, value_error},
    number::Num,
    value::Value,
};

use super::arith::plus;

/// `h`: first element of a seq, or the successor of a real.
pub(crate) fn head(a: &Value) -> RunResult<Value> {
    match a {
        Value::Str(s) => s
            .chars()
            .next()
            .map(|c| Value::str(c.to_string()))
            .ok_or_else(|| index_error("string index out of range")),
        Value::List(items) => items
            .first()
            .cloned()
            .ok_or_else(|| index_error("list index out of range")),
        Value::Num(n) => Ok(Value::Num(n.succ())),
        _ => Err(bad_type("head", &[a])),
    }
}

/// `t`: a seq without its first element, or the predecessor of a real.
pub(crate) fn tail(a: &Value) -> RunResult<Value> {
    match a {
        Value::Str(s) => Ok(Value::str(s.chars().skip(1).collect::<String>())),
        Value::List(items) => Ok(Value::list(items.iter().skip(1).cloned().collect())),
        Value::Num(n) => Ok(Value::Num(n.pred())),
        _ => Err(bad_type("tail", &[a])),
    }
}

/// `H`: last element of a seq.
pub(crate) fn end(a: &Value) -> RunResult<Value> {
    match a {
        Value::Str(s) => s
            .chars()
            .next_back()
            .map(|c| Value::str(c.to_string()))
            .ok_or_else(|| index_error("string index out of range")),
        Value::List(items) => items
            .last()
            .cloned()
            .ok_or_else(|| index_error("list index out of range")),
        _ => Err(bad_type("end", &[a])),
    }
}

/// `T`: a seq without its last element, or a real mod 10.
pub(crate) fn pop(a: &Value) -> RunResult<Value> {
    match a {
        Value::Str(s) => {
            let mut chars: Vec<char> = s.chars().collect();
            chars.pop();
            Ok(Value::str(chars.into_iter().collect::<String>()))
        }
        Value::List(items) => {
            let keep = items.len().saturating_sub(1);
            Ok(Value::list(items[..keep].to_vec()))
        }
        Value::Num(n) => Ok(Value::Num(n.mod_ten()?)),
        _ => Err(bad_type("pop", &[a])),
    }
}

/// `l`: length of a seq, or log base 2 of a real.
pub(crate) fn len(a: &Value) -> RunResult<Value> {
    match a {
        Value::Str(s) => Ok(Value::Num(Num::from_usize(s.chars().count()))),
        Value::List(items) => Ok(Value::Num(Num::from_usize(items.len()))),
        Value::Num(n) => Ok(Value::Num(n.log2()?)),
        _ => Err(bad_type("Plen", &[a])),
    }
}

/// `s`: floor a real to an integer, parse a string as a number (empty
/// string is 0), or left-fold a list with `+` (empty list is 0).
pub(crate) fn sum(a: &Value) -> RunResult<Value> {
    match a {
        Value::Num(n) => Ok(Value::Num(n.floored()?)),
        Value::Str(s) => {
            if s.is_empty() {
                return Ok(Value::int(0));
            }
            Num::parse_decimal(s)
                .map(Value::Num)
                .ok_or_else(|| value_error(format!("could not parse '{s}' as a number")))
        }
        Value::List(items) => {
            let mut iter = items.iter();
            let Some(first) = iter.next() else {
                return Ok(Value::int(0));
            };
            let mut acc = first.clone();
            for item in iter {
                acc = plus(&acc, item)?;
            }
            Ok(acc)
        }
        _ => Err(bad_type("Psum", &[a])),
    }
}

/// `U`: the range `[0, r)` (or `[r, 0)` when negative) of a real, or the
/// index list of a seq.
pub(crate) fn unary_range(a: &Value) -> RunResult<Value> {
    match a {
        Value::Num(_) => Ok(Value::list(makeiter(a)?)),
        Value::Str(_) | Value::List(_) => {
            let elements = seq_elements(a).expect("strings and lists are seqs");
            Ok(Value::list((0..elements.len() as i64).map(Value::int).collect()))
        }
        _ => Err(bad_type("unary_range", &[a])),
    }
}

/// `S`: the one-based range of a real (mirrored for negatives), or a sorted
/// seq (strings sort by character and re-join).
pub(crate) fn sorted(a: &Value) -> RunResult<Value> {
    match a {
        Value::Num(_) => {
            let shifted = makeiter(a)?
                .into_iter()
                .map(|v| match v {
                    Value::Num(n) => Value::Num(n.succ()),
                    other => other,
                })
                .collect();
            Ok(Value::list(shifted))
        }
        Value::Str(_) | Value::List(_) => {
            let mut elements = seq_elements(a).expect("strings and lists are seqs");
            sort_values("Psorted", &mut elements)?;
            Ok(rebuild_seq(a, elements))
        }
        _ => Err(bad_type("Psorted", &[a])),
    }
}
