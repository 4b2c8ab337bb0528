//! The dotted numeric operators: `.!  .<  .>`.

use crate::{
    builtins::{bad_type, rebuild_seq, seq_elements},
    exception::RunResult,
    number::Num,
    value::Value,
};

/// `.!`: factorial of a non-negative integer, Γ(a+1) for other reals.
pub(crate) fn factorial(a: &Value) -> RunResult<Value> {
    match a {
        Value::Num(n) => Ok(Value::Num(n.factorial()?)),
        _ => Err(bad_type("factorial", &[a])),
    }
}

/// `.<`: bit-shift two reals (both floored), or rotate a seq left by
/// floor(r) positions (modulo its length).
pub(crate) fn leftshift(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.shift_left(y)?)),
        (Value::Str(_) | Value::List(_), Value::Num(count)) => rotate(a, count, Direction::Left),
        _ => Err(bad_type("leftshift", &[a, b])),
    }
}

/// `.>`: arithmetic right shift, or rotate a seq right.
pub(crate) fn rightshift(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.shift_right(y)?)),
        (Value::Str(_) | Value::List(_), Value::Num(count)) => rotate(a, count, Direction::Right),
        _ => Err(bad_type("rightshift", &[a, b])),
    }
}

enum Direction {
    Left,
    Right,
}

fn rotate(seq: &Value, count: &Num, direction: Direction) -> RunResult<Value> {
    let mut elements = seq_elements(seq).expect("callers pass strings or lists");
    if elements.is_empty() {
        return Ok(seq.clone());
    }
    let len = elements.len() as i64;
    let by = count.floor_i64()?.rem_euclid(len) as usize;
    match direction {
        Direction::Left => elements.rotate_left(by),
        Direction::Right => elements.rotate_right(by),
    }
    Ok(rebuild_seq(seq, elements))
}
