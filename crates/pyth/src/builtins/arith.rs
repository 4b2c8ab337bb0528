//! Arithmetic and construction operators: `+ - * ^ , ] _ {`.

use crate::{
    builtins::{bad_type, makeiter, rebuild_seq, seq_elements},
    exception::RunResult,
    number::Num,
    value::Value,
};

/// `+`. With no arguments: `+inf`. One real: absolute value. Same variants
/// add or concatenate; a list absorbs a non-list on either side; a number
/// and a string concatenate their renderings.
pub(crate) fn plus(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Nil, Value::Nil) => Ok(Value::Num(Num::Inf)),
        (Value::Num(n), Value::Nil) => Ok(Value::Num(n.abs())),
        (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.checked_add(y)?)),
        (Value::Str(x), Value::Str(y)) => Ok(Value::str(format!("{x}{y}"))),
        (Value::List(x), Value::List(y)) => {
            let mut items = x.as_ref().clone();
            items.extend(y.iter().cloned());
            Ok(Value::list(items))
        }
        (item, Value::List(list)) if !matches!(item, Value::Nil) => {
            let mut items = Vec::with_capacity(list.len() + 1);
            items.push(item.clone());
            items.extend(list.iter().cloned());
            Ok(Value::list(items))
        }
        (Value::List(list), item) if !matches!(item, Value::Nil) => {
            let mut items = list.as_ref().clone();
            items.push(item.clone());
            Ok(Value::list(items))
        }
        (Value::Num(_), Value::Str(_)) | (Value::Str(_), Value::Num(_)) => {
            Ok(Value::str(format!("{}{}", a.render(), b.render())))
        }
        _ => Err(bad_type("plus", &[a, b])),
    }
}

/// `-`. With no arguments: `-inf`. One real: negated absolute value.
/// Sequences subtract by filtering; strings subtract by deleting every
/// occurrence of the rendered right operand.
pub(crate) fn minus(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Nil, Value::Nil) => Ok(Value::Num(Num::NegInf)),
        (Value::Num(n), Value::Nil) => Ok(Value::Num(n.abs().neg())),
        (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.checked_sub(y)?)),
        (Value::Num(_), Value::List(exclude)) => {
            let kept = makeiter(a)?
                .into_iter()
                .filter(|el| !exclude.iter().any(|ex| ex.eq_value(el)))
                .collect();
            Ok(Value::list(kept))
        }
        (Value::List(items), Value::Num(_) | Value::Str(_)) => {
            let kept = items.iter().filter(|el| !el.eq_value(b)).cloned().collect();
            Ok(Value::list(kept))
        }
        (Value::List(items), Value::List(exclude)) => {
            let kept = items
                .iter()
                .filter(|el| !exclude.iter().any(|ex| ex.eq_value(el)))
                .cloned()
                .collect();
            Ok(Value::list(kept))
        }
        (Value::Str(_) | Value::Num(_), Value::Str(_) | Value::Num(_)) => {
            Ok(Value::str(a.render().replace(&b.render(), "")))
        }
        (Value::Str(s), Value::List(patterns)) => {
            let mut out = s.to_string();
            for pattern in patterns.iter() {
                out = out.replace(&pattern.render(), "");
            }
            Ok(Value::str(out))
        }
        _ => Err(bad_type("minus", &[a, b])),
    }
}

/// `*`. Reals multiply; a real repeats a sequence; two strings produce the
/// pairwise concatenation of their character product; two seqs produce the
/// Cartesian product as two-element lists.
pub(crate) fn times(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.checked_mul(y)?)),
        (Value::Num(n), Value::Str(s)) | (Value::Str(s), Value::Num(n)) => {
            Ok(Value::str(s.repeat(n.repeat_count()?)))
        }
        (Value::Num(n), Value::List(items)) | (Value::List(items), Value::Num(n)) => {
            let count = n.repeat_count()?;
            let mut out = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                out.extend(items.iter().cloned());
            }
            Ok(Value::list(out))
        }
        (Value::Str(x), Value::Str(y)) => {
            let mut out = Vec::new();
            for p in x.chars() {
                for q in y.chars() {
                    out.push(Value::str(format!("{p}{q}")));
                }
            }
            Ok(Value::list(out))
        }
        _ => {
            let (Some(xs), Some(ys)) = (seq_elements(a), seq_elements(b)) else {
                return Err(bad_type("times", &[a, b]));
            };
            let mut out = Vec::with_capacity(xs.len() * ys.len());
            for p in &xs {
                for q in &ys {
                    out.push(Value::list(vec![p.clone(), q.clone()]));
                }
            }
            Ok(Value::list(out))
        }
    }
}

/// `^`. Reals exponentiate (exactly where possible); a sequence to a real
/// power is the Cartesian product of the sequence with itself floor(r)
/// times, joined back into strings for a string base.
pub(crate) fn power(a: &Value, b: &Value) -> RunResult<Value> {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.pow(y)?)),
        (Value::Str(s), Value::Num(n)) => {
            let chars: Vec<char> = s.chars().collect();
            let product = cartesian_power(&chars, n.repeat_count()?);
            Ok(Value::list(
                product
                    .into_iter()
                    .map(|combo| Value::str(combo.into_iter().collect::<String>()))
                    .collect(),
            ))
        }
        (Value::List(items), Value::Num(n)) => {
            let product = cartesian_power(items, n.repeat_count()?);
            Ok(Value::list(product.into_iter().map(Value::list).collect()))
        }
        _ => Err(bad_type("power", &[a, b])),
    }
}

/// All length-`n` combinations, leftmost position varying slowest.
fn cartesian_power<T: Clone>(items: &[T], n: usize) -> Vec<Vec<T>> {
    let mut combos: Vec<Vec<T>> = vec![Vec::new()];
    for _ in 0..n {
        combos = combos
            .into_iter()
            .flat_map(|combo| {
                items.iter().map(move |item| {
                    let mut next = combo.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect();
    }
    combos
}

/// `,`: the zero/one/two-element list.
pub(crate) fn pair(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Nil, Value::Nil) => Value::list(vec![]),
        (a, Value::Nil) => Value::list(vec![a.clone()]),
        (a, b) => Value::list(vec![a.clone(), b.clone()]),
    }
}

/// `]`: wrap in a one-element list; `])` is the empty list.
pub(crate) fn one_list(a: &Value) -> RunResult<Value> {
    Ok(match a {
        Value::Nil => Value::list(vec![]),
        a => Value::list(vec![a.clone()]),
    })
}

/// `_`: negate a real, reverse a sequence.
pub(crate) fn neg(a: &Value) -> RunResult<Value> {
    match a {
        Value::Num(n) => Ok(Value::Num(n.clone().neg())),
        Value::Str(s) => Ok(Value::str(s.chars().rev().collect::<String>())),
        Value::List(items) => Ok(Value::list(items.iter().rev().cloned().collect())),
        _ => Err(bad_type("neg", &[a])),
    }
}

/// `{`: first-occurrence dedupe of a sequence; a real becomes a one-element
/// list.
pub(crate) fn unique(a: &Value) -> RunResult<Value> {
    match a {
        Value::Num(_) => Ok(Value::list(vec![a.clone()])),
        Value::Str(_) | Value::List(_) => {
            let elements = seq_elements(a).expect("strings and lists are seqs");
            let mut kept: Vec<Value> = Vec::new();
            for el in elements {
                if !kept.iter().any(|seen| seen.eq_value(&el)) {
                    kept.push(el);
                }
            }
            Ok(rebuild_seq(a, kept))
        }
        _ => Err(bad_type("unique", &[a])),
    }
}
