//! The polymorphic operator runtime.
//!
//! Every eager operator is a function from 0-3 values to one value.
//! Dispatch follows the reference semantics: each operator tries its
//! signature rules in declared order over the variants {num, str, list} (and
//! `nil` for absent arguments); the first match wins and no match raises
//! `BadTypeCombination`.
//!
//! Control-flow operators (`? & |`), the body-taking operators (`m f o`),
//! `p` and `L` never reach [`apply`]; the evaluator handles them because
//! they need lazy arguments, the output writer or the environment.

mod arith;
mod compare;
mod numbers;
mod seqs;

use crate::{
    exception::{Error, RunError, RunResult},
    expressions::Op,
    value::Value,
};

/// Applies an eager operator to its evaluated arguments. The evaluator pads
/// `args` with `Nil` up to the operator's arity (`[` passes all its items).
pub(crate) fn apply(op: Op, args: &[Value]) -> RunResult<Value> {
    match op {
        Op::Not => Ok(bool_value(!args[0].is_truthy())),
        Op::ListOf => Ok(Value::list(args.to_vec())),
        Op::OneList => arith::one_list(&args[0]),
        Op::Pair => Ok(arith::pair(&args[0], &args[1])),
        Op::Neg => arith::neg(&args[0]),
        Op::Plus => arith::plus(&args[0], &args[1]),
        Op::Minus => arith::minus(&args[0], &args[1]),
        Op::Times => arith::times(&args[0], &args[1]),
        Op::Power => arith::power(&args[0], &args[1]),
        Op::Unique => arith::unique(&args[0]),
        Op::Repr => Ok(Value::str(args[0].repr())),
        Op::Equals => Ok(bool_value(args[0].eq_value(&args[1]))),
        Op::NotEquals => Ok(bool_value(!args[0].eq_value(&args[1]))),
        Op::LessThan => compare::less_than(&args[0], &args[1]),
        Op::GreaterThan => compare::greater_than(&args[0], &args[1]),
        Op::In => compare::pin(&args[0], &args[1]),
        Op::Head => seqs::head(&args[0]),
        Op::Tail => seqs::tail(&args[0]),
        Op::End => seqs::end(&args[0]),
        Op::Pop => seqs::pop(&args[0]),
        Op::Len => seqs::len(&args[0]),
        Op::Sum => seqs::sum(&args[0]),
        Op::UnaryRange => seqs::unary_range(&args[0]),
        Op::Sorted => seqs::sorted(&args[0]),
        Op::Factorial => numbers::factorial(&args[0]),
        Op::LeftShift => numbers::leftshift(&args[0], &args[1]),
        Op::RightShift => numbers::rightshift(&args[0], &args[1]),
        Op::And | Op::Or | Op::Ternary | Op::Map | Op::Filter | Op::OrderBy | Op::Print | Op::Lambda => {
            unreachable!("{} is evaluated by the tree walker", op.name())
        }
    }
}

/// Coerces a value into something iterable: reals become integer ranges
/// (`[0, floor(r))`, or `(floor(r), 0]` for negatives), strings iterate by
/// character, lists by element.
pub(crate) fn makeiter(value: &Value) -> RunResult<Vec<Value>> {
    match value {
        Value::Num(n) => {
            let bound = n.floor_i64()?;
            let range = if bound < 0 { bound..0 } else { 0..bound };
            Ok(range.map(Value::int).collect())
        }
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
        Value::List(items) => Ok(items.iter().cloned().collect()),
        other => Err(bad_type("makeiter", &[other])),
    }
}

/// `0`/`1` results for the predicate operators.
pub(crate) fn bool_value(b: bool) -> Value {
    Value::int(i64::from(b))
}

pub(crate) fn bad_type(op: &str, args: &[&Value]) -> RunError {
    Error::bad_type_combination(op, args).into()
}

/// Stable in-place sort; mixed incomparable variants surface as an error
/// from `op`.
pub(crate) fn sort_values(op: &'static str, items: &mut [Value]) -> RunResult<()> {
    let mut incomparable: Option<RunError> = None;
    items.sort_by(|a, b| {
        a.try_cmp(b).unwrap_or_else(|| {
            if incomparable.is_none() {
                incomparable = Some(bad_type(op, &[a, b]));
            }
            std::cmp::Ordering::Equal
        })
    });
    match incomparable {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Shared element view for operators generic over `Seq = Str | List`.
/// Strings split into one-character strings and are re-joined by
/// [`rebuild_seq`].
pub(crate) fn seq_elements(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Str(s) => Some(s.chars().map(|c| Value::str(c.to_string())).collect()),
        Value::List(items) => Some(items.iter().cloned().collect()),
        _ => None,
    }
}

/// Rebuilds the result of a seq operation in the shape of its input.
pub(crate) fn rebuild_seq(like: &Value, items: Vec<Value>) -> Value {
    match like {
        Value::Str(_) => {
            let mut out = String::new();
            for item in items {
                if let Value::Str(s) = item {
                    out.push_str(&s);
                }
            }
            Value::str(out)
        }
        _ => Value::list(items),
    }
}
