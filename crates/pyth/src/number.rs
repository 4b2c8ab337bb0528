//! Exact rational numbers with signed infinities.
//!
//! Pyth has a single numeric type covering integers, exact rationals and the
//! two infinities produced by `+)` and `-)`. Values are stored as reduced
//! `BigRational`s so golf staples like `T19.3` (19.3 mod 10) stay exact
//! instead of drifting the way binary floats would.
//!
//! Operations that leave the rational field (log2, gamma for most reals,
//! powers with irrational results) drop to `f64` and come back through
//! [`ryu`]'s shortest representation, which keeps rendered results identical
//! to what a shortest-float printer would show.

use std::{cmp::Ordering, fmt};

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::exception::{RunResult, value_error};

/// Rendered precision for non-integer rationals: 20 significant digits,
/// trailing zeros stripped.
const RENDER_SIG_DIGITS: u32 = 20;

/// √π to well past render precision, used for exact half-integer gamma.
const SQRT_PI: &str = "1.77245385090551602729816748334114518279754945612239";

/// A Pyth number: an exact rational or one of the two infinities.
///
/// Stored rationals are always reduced (that is `BigRational`'s invariant),
/// so integer-ness is just a denominator check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub(crate) enum Num {
    Rat(BigRational),
    Inf,
    NegInf,
}

impl Num {
    pub fn from_bigint(n: BigInt) -> Self {
        Self::Rat(BigRational::from_integer(n))
    }

    pub fn from_i64(n: i64) -> Self {
        Self::from_bigint(BigInt::from(n))
    }

    pub fn from_usize(n: usize) -> Self {
        Self::from_bigint(BigInt::from(n))
    }

    /// Parses a numeric literal or the argument of `s`: optional sign,
    /// decimal digits with at most one dot (`"3."`, `".5"` and `"0."` are
    /// all valid, a bare `"."` or empty string is not).
    pub fn parse_decimal(text: &str) -> Option<Self> {
        parse_rational(text).map(Self::Rat)
    }

    /// Converts a finite or infinite `f64` back into a `Num`, going through
    /// ryu's shortest decimal form so the result renders the way a float
    /// repr would. Returns `None` for NaN.
    pub fn from_f64(v: f64) -> Option<Self> {
        if v.is_nan() {
            return None;
        }
        if v.is_infinite() {
            return Some(if v > 0.0 { Self::Inf } else { Self::NegInf });
        }
        let mut buffer = ryu::Buffer::new();
        parse_rational(buffer.format(v)).map(Self::Rat)
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Rat(r) => r.to_f64().unwrap_or(f64::NAN),
            Self::Inf => f64::INFINITY,
            Self::NegInf => f64::NEG_INFINITY,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Rat(r) if r.is_zero())
    }

    /// Floors to a `BigInt`; infinities have no floor.
    pub fn floor_int(&self) -> RunResult<BigInt> {
        match self {
            Self::Rat(r) => Ok(r.floor().to_integer()),
            Self::Inf | Self::NegInf => Err(value_error("cannot floor an infinite value")),
        }
    }

    /// Floor clamped into `i64`, for materializing ranges.
    pub fn floor_i64(&self) -> RunResult<i64> {
        self.floor_int()?
            .to_i64()
            .ok_or_else(|| value_error("number too large for a range"))
    }

    /// Floor interpreted as a repeat count: negative repeats are empty.
    pub fn repeat_count(&self) -> RunResult<usize> {
        let n = self.floor_int()?;
        if n.sign() == Sign::Minus {
            return Ok(0);
        }
        n.to_usize().ok_or_else(|| value_error("repeat count too large"))
    }

    pub fn checked_add(&self, other: &Self) -> RunResult<Self> {
        match (self, other) {
            (Self::Rat(a), Self::Rat(b)) => Ok(Self::Rat(a + b)),
            (Self::Inf, Self::NegInf) | (Self::NegInf, Self::Inf) => {
                Err(value_error("inf + -inf is undefined"))
            }
            (Self::Inf, _) | (_, Self::Inf) => Ok(Self::Inf),
            (Self::NegInf, _) | (_, Self::NegInf) => Ok(Self::NegInf),
        }
    }

    pub fn checked_sub(&self, other: &Self) -> RunResult<Self> {
        self.checked_add(&other.clone().neg())
    }

    pub fn checked_mul(&self, other: &Self) -> RunResult<Self> {
        match (self, other) {
            (Self::Rat(a), Self::Rat(b)) => Ok(Self::Rat(a * b)),
            (inf, Self::Rat(r)) | (Self::Rat(r), inf) => {
                if r.is_zero() {
                    return Err(value_error("0 * inf is undefined"));
                }
                Ok(match (inf, r.is_positive()) {
                    (Self::Inf, true) | (Self::NegInf, false) => Self::Inf,
                    _ => Self::NegInf,
                })
            }
            (a, b) => Ok(if a == b { Self::Inf } else { Self::NegInf }),
        }
    }

    pub fn neg(self) -> Self {
        match self {
            Self::Rat(r) => Self::Rat(-r),
            Self::Inf => Self::NegInf,
            Self::NegInf => Self::Inf,
        }
    }

    pub fn abs(&self) -> Self {
        match self {
            Self::Rat(r) => Self::Rat(r.abs()),
            Self::Inf | Self::NegInf => Self::Inf,
        }
    }

    /// `self + 1` / `self - 1` for the numeric branches of `h` and `t`.
    pub fn succ(&self) -> Self {
        match self {
            Self::Rat(r) => Self::Rat(r + BigRational::one()),
            inf => inf.clone(),
        }
    }

    pub fn pred(&self) -> Self {
        match self {
            Self::Rat(r) => Self::Rat(r - BigRational::one()),
            inf => inf.clone(),
        }
    }

    /// Floors to an integer `Num` (the numeric branch of `s`).
    pub fn floored(&self) -> RunResult<Self> {
        Ok(Self::from_bigint(self.floor_int()?))
    }

    /// Python-style `self mod 10`, exact on rationals (`T19.3` -> `9.3`,
    /// `T_3` -> `7`).
    pub fn mod_ten(&self) -> RunResult<Self> {
        let Self::Rat(r) = self else {
            return Err(value_error("cannot take an infinite value mod 10"));
        };
        let ten = BigRational::from_integer(BigInt::from(10));
        let quotient = (r / &ten).floor();
        Ok(Self::Rat(r - ten * quotient))
    }

    /// Base-2 logarithm via `f64` (the numeric branch of `l`).
    pub fn log2(&self) -> RunResult<Self> {
        match self {
            Self::Rat(r) => {
                if !r.is_positive() {
                    return Err(value_error("math domain error"));
                }
                Self::from_f64(self.to_f64().log2()).ok_or_else(|| value_error("math domain error"))
            }
            Self::Inf => Ok(Self::Inf),
            Self::NegInf => Err(value_error("math domain error")),
        }
    }

    /// Exponentiation for `^`.
    ///
    /// Integer exponents stay exact (negative exponents invert). Fractional
    /// exponents first try an exact k-th root of the (already exponentiated)
    /// base, which is what makes `^.04 .5` come out as exactly `0.2`; when
    /// no exact root exists the computation falls back to `f64::powf`.
    pub fn pow(&self, exponent: &Self) -> RunResult<Self> {
        let (Self::Rat(base), Self::Rat(exp)) = (self, exponent) else {
            // Infinities on either side follow float semantics.
            return Self::from_f64(self.to_f64().powf(exponent.to_f64()))
                .ok_or_else(|| value_error("power is undefined"));
        };

        if exp.is_integer() {
            return Ok(Self::Rat(rational_int_pow(base, &exp.to_integer())?));
        }

        let Some(root) = exp.denom().to_u32() else {
            return self.pow_f64(exponent);
        };
        if base.is_negative() {
            return self.pow_f64(exponent);
        }

        // Raise to the (possibly negative) numerator first, then take the
        // exact root if one exists.
        let raised = rational_int_pow(base, exp.numer())?;
        match (exact_root(raised.numer(), root), exact_root(raised.denom(), root)) {
            (Some(n), Some(d)) => Ok(Self::Rat(BigRational::new(n, d))),
            _ => self.pow_f64(exponent),
        }
    }

    fn pow_f64(&self, exponent: &Self) -> RunResult<Self> {
        Self::from_f64(self.to_f64().powf(exponent.to_f64()))
            .ok_or_else(|| value_error("power is undefined"))
    }

    /// `.!`: exact factorial for non-negative integers, Γ(self + 1) for
    /// non-integer reals.
    pub fn factorial(&self) -> RunResult<Self> {
        match self {
            Self::Rat(r) if r.is_integer() => {
                let n = r.to_integer();
                if n.sign() == Sign::Minus {
                    return Err(value_error("factorial of a negative integer"));
                }
                let n = n
                    .to_u64()
                    .ok_or_else(|| value_error("factorial argument too large"))?;
                Ok(Self::from_bigint(int_factorial(n)))
            }
            Self::Rat(r) => gamma(&(r + BigRational::one())),
            Self::Inf => Ok(Self::Inf),
            Self::NegInf => Err(value_error("factorial of negative infinity")),
        }
    }

    /// Numeric `.<`: shift the floored value left by the floored count.
    pub fn shift_left(&self, count: &Self) -> RunResult<Self> {
        Ok(Self::from_bigint(self.floor_int()? << shift_count(count)?))
    }

    /// Numeric `.>`: arithmetic right shift of the floored value.
    pub fn shift_right(&self, count: &Self) -> RunResult<Self> {
        Ok(Self::from_bigint(self.floor_int()? >> shift_count(count)?))
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Num {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Rat(a), Self::Rat(b)) => a.cmp(b),
            (Self::Inf, Self::Inf) | (Self::NegInf, Self::NegInf) => Ordering::Equal,
            (Self::Inf, _) | (_, Self::NegInf) => Ordering::Greater,
            (Self::NegInf, _) | (_, Self::Inf) => Ordering::Less,
        }
    }
}

impl fmt::Display for Num {
    /// The auto-print rendering: integers bare, other rationals as decimal
    /// with [`RENDER_SIG_DIGITS`] significant digits and trailing zeros
    /// stripped, infinities as `inf`/`-inf`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inf => f.write_str("inf"),
            Self::NegInf => f.write_str("-inf"),
            Self::Rat(r) if r.is_integer() => write!(f, "{}", r.to_integer()),
            Self::Rat(r) => f.write_str(&render_decimal(r)),
        }
    }
}

/// Renders a reduced non-integer rational as a rounded decimal string.
fn render_decimal(r: &BigRational) -> String {
    let negative = r.is_negative();
    let n = r.numer().abs();
    let d = r.denom().clone();

    let int_part = &n / &d;
    let frac_digits = if int_part.is_zero() {
        // Significant digits start after the leading zeros; find the first
        // power of ten that pushes a digit across the denominator.
        let mut zeros = 0_u32;
        let mut scaled = n.clone() * 10;
        while scaled < d {
            zeros += 1;
            scaled *= 10;
        }
        zeros + RENDER_SIG_DIGITS
    } else {
        RENDER_SIG_DIGITS.saturating_sub(int_part.to_string().len() as u32)
    };

    // Round half away from zero at the last kept digit.
    let scale = BigInt::from(10).pow(frac_digits);
    let scaled: BigInt = (&n * &scale * 2 + &d) / (&d * 2);

    let digits = scaled.to_string();
    let point = digits.len() as i64 - i64::from(frac_digits);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if point <= 0 {
        out.push_str("0.");
        for _ in 0..(-point) {
            out.push('0');
        }
        out.push_str(&digits);
    } else {
        let (whole, frac) = digits.split_at(point as usize);
        out.push_str(whole);
        if !frac.is_empty() {
            out.push('.');
            out.push_str(frac);
        }
    }
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    out
}

/// Parses `[+-]?digits[.digits][e[+-]digits]` into a rational. The exponent
/// form only occurs internally (ryu output); literals never carry one.
fn parse_rational(text: &str) -> Option<BigRational> {
    let (text, negative) = match text.as_bytes().first()? {
        b'-' => (&text[1..], true),
        b'+' => (&text[1..], false),
        _ => (text, false),
    };

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], text[idx + 1..].parse::<i32>().ok()?),
        None => (text, 0),
    };

    let (whole, frac) = match mantissa.find('.') {
        Some(idx) => (&mantissa[..idx], &mantissa[idx + 1..]),
        None => (mantissa, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut numer: BigInt = if whole.is_empty() {
        BigInt::zero()
    } else {
        whole.parse().ok()?
    };
    let mut denom = BigInt::one();
    for digit in frac.bytes() {
        numer = numer * 10 + i64::from(digit - b'0');
        denom *= 10;
    }
    match exponent.cmp(&0) {
        Ordering::Greater => numer *= BigInt::from(10).pow(exponent as u32),
        Ordering::Less => denom *= BigInt::from(10).pow(exponent.unsigned_abs()),
        Ordering::Equal => {}
    }
    if negative {
        numer = -numer;
    }
    Some(BigRational::new(numer, denom))
}

fn rational_int_pow(base: &BigRational, exp: &BigInt) -> RunResult<BigRational> {
    let magnitude = exp
        .abs()
        .to_u32()
        .ok_or_else(|| value_error("exponent too large"))?;
    if exp.sign() == Sign::Minus && base.is_zero() {
        return Err(value_error("zero to a negative power"));
    }
    let powed = BigRational::new(base.numer().pow(magnitude), base.denom().pow(magnitude));
    Ok(if exp.sign() == Sign::Minus {
        powed.recip()
    } else {
        powed
    })
}

/// Returns the exact `root`-th root of a non-negative integer, if it has one.
fn exact_root(n: &BigInt, root: u32) -> Option<BigInt> {
    if n.sign() == Sign::Minus {
        return None;
    }
    let candidate = n.nth_root(root);
    (candidate.clone().pow(root) == *n).then_some(candidate)
}

fn shift_count(count: &Num) -> RunResult<usize> {
    let n = count.floor_int()?;
    if n.sign() == Sign::Minus {
        return Err(value_error("negative shift count"));
    }
    n.to_usize().ok_or_else(|| value_error("shift count too large"))
}

fn int_factorial(n: u64) -> BigInt {
    let mut acc = BigInt::one();
    for k in 2..=n {
        acc *= k;
    }
    acc
}

/// Γ for non-integer rationals.
///
/// Half-integers at or above 1/2 use the closed form
/// `Γ(n + 1/2) = (2n)!·√π / (4ⁿ·n!)` against a high-precision √π constant,
/// which keeps all rendered digits of `.!.5` correct. Everything else uses a
/// Lanczos approximation in `f64`.
fn gamma(x: &BigRational) -> RunResult<Num> {
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    if *x.denom() == BigInt::from(2) && *x >= half {
        let n = (x - half)
            .to_integer()
            .to_u64()
            .ok_or_else(|| value_error("gamma argument too large"))?;
        let sqrt_pi = parse_rational(SQRT_PI).expect("constant parses");
        let numer = BigRational::from_integer(int_factorial(2 * n));
        let denom = BigRational::from_integer(BigInt::from(4).pow(
            u32::try_from(n).map_err(|_| value_error("gamma argument too large"))?,
        )) * BigRational::from_integer(int_factorial(n));
        return Ok(Num::Rat(numer / denom * sqrt_pi));
    }

    let v = x.to_f64().ok_or_else(|| value_error("gamma argument too large"))?;
    Num::from_f64(gamma_f64(v)).ok_or_else(|| value_error("math domain error"))
}

/// Lanczos approximation (g = 7, 9 coefficients) with reflection for the
/// left half-plane.
fn gamma_f64(x: f64) -> f64 {
    use std::f64::consts::PI;

    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma_f64(1.0 - x));
    }
    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, coeff) in COEFFS.iter().enumerate().skip(1) {
        acc += coeff / (x + i as f64);
    }
    let t = x + G + 0.5;
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
}
