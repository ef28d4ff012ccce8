//! Natural exponentiation and logarithm in fixed point.
//!
//! Port of the vault's `LogExpMath`: `exp` and `ln` reduce their argument
//! with a table of precomputed powers of `e` and finish with a short Taylor
//! (for `exp`) or `atanh` (for `ln`) series at 20 decimals of precision.
//! Arguments close to one take a 36-decimal `ln` for the extra accuracy
//! `pow` needs when the base is near unity.
//!
//! Inputs and outputs are 18-decimal fixed point.  Results carry a relative
//! error well below `1e-14`, which is what
//! [`fixed_point::MAX_POW_RELATIVE_ERROR`](super::fixed_point::MAX_POW_RELATIVE_ERROR)
//! compensates for.

use alloy_primitives::{uint, I256, U256};

use crate::error::AmmError;

const fn int(v: U256) -> I256 {
    I256::from_raw(v)
}

const ONE_18: I256 = int(uint!(1_000_000_000_000_000_000_U256));
const ONE_20: I256 = int(uint!(100_000_000_000_000_000_000_U256));
const ONE_36: I256 = int(uint!(1_000_000_000_000_000_000_000_000_000_000_000_000_U256));

const MAX_NATURAL_EXPONENT: I256 = int(uint!(130_000_000_000_000_000_000_U256));
const MIN_NATURAL_EXPONENT_ABS: I256 = int(uint!(41_000_000_000_000_000_000_U256));

const LN_36_LOWER_BOUND: I256 = int(uint!(900_000_000_000_000_000_U256));
const LN_36_UPPER_BOUND: I256 = int(uint!(1_100_000_000_000_000_000_U256));

// 2^254 / 1e20
const MILD_EXPONENT_BOUND: U256 =
    uint!(289_480_223_093_290_488_558_927_462_521_719_769_633_174_961_664_101_410_098_U256);

// 18 decimals; a0 and a1 have no decimals.
const X0: I256 = int(uint!(128_000_000_000_000_000_000_U256));
const A0: I256 = int(uint!(38_877_084_059_945_950_922_200_000_000_000_000_000_000_000_000_U256));
const X1: I256 = int(uint!(64_000_000_000_000_000_000_U256));
const A1: I256 = int(uint!(6_235_149_080_811_616_882_910_000_000_U256));

// 20 decimals.
const X2: I256 = int(uint!(3_200_000_000_000_000_000_000_U256));
const A2: I256 = int(uint!(7_896_296_018_268_069_516_100_000_000_000_000_U256));
const X3: I256 = int(uint!(1_600_000_000_000_000_000_000_U256));
const A3: I256 = int(uint!(888_611_052_050_787_263_676_000_000_U256));
const X4: I256 = int(uint!(800_000_000_000_000_000_000_U256));
const A4: I256 = int(uint!(298_095_798_704_172_827_474_000_U256));
const X5: I256 = int(uint!(400_000_000_000_000_000_000_U256));
const A5: I256 = int(uint!(5_459_815_003_314_423_907_810_U256));
const X6: I256 = int(uint!(200_000_000_000_000_000_000_U256));
const A6: I256 = int(uint!(738_905_609_893_065_022_723_U256));
const X7: I256 = int(uint!(100_000_000_000_000_000_000_U256));
const A7: I256 = int(uint!(271_828_182_845_904_523_536_U256));
const X8: I256 = int(uint!(50_000_000_000_000_000_000_U256));
const A8: I256 = int(uint!(164_872_127_070_012_814_685_U256));
const X9: I256 = int(uint!(25_000_000_000_000_000_000_U256));
const A9: I256 = int(uint!(128_402_541_668_774_148_407_U256));
const X10: I256 = int(uint!(12_500_000_000_000_000_000_U256));
const A10: I256 = int(uint!(113_314_845_306_682_631_683_U256));
const X11: I256 = int(uint!(6_250_000_000_000_000_000_U256));
const A11: I256 = int(uint!(106_449_445_891_785_942_956_U256));

const REDUCTION_20: [(I256, I256); 8] = [
    (X2, A2),
    (X3, A3),
    (X4, A4),
    (X5, A5),
    (X6, A6),
    (X7, A7),
    (X8, A8),
    (X9, A9),
];

fn small(v: u64) -> I256 {
    int(U256::from(v))
}

fn mul(a: I256, b: I256) -> Result<I256, AmmError> {
    a.checked_mul(b).ok_or(AmmError::Overflow("log_exp mul"))
}

fn div(a: I256, b: I256) -> Result<I256, AmmError> {
    a.checked_div(b).ok_or(AmmError::DivisionByZero)
}

fn add(a: I256, b: I256) -> Result<I256, AmmError> {
    a.checked_add(b).ok_or(AmmError::Overflow("log_exp add"))
}

/// `x^y` for 18-decimal `x` and `y`, computed as `exp(y * ln(x))`.
///
/// # Errors
///
/// Returns [`AmmError::ExponentOutOfBounds`] when `x >= 2^255`, `y` is above
/// the mild exponent bound, or `y * ln(x)` leaves `[-41, 130]`.
pub fn pow(x: U256, y: U256) -> Result<U256, AmmError> {
    if y.is_zero() {
        return Ok(ONE_18.into_raw());
    }
    if x.is_zero() {
        return Ok(U256::ZERO);
    }
    if x.bit(255) {
        return Err(AmmError::ExponentOutOfBounds("pow base"));
    }
    if y >= MILD_EXPONENT_BOUND {
        return Err(AmmError::ExponentOutOfBounds("pow exponent"));
    }
    let x = int(x);
    let y = int(y);

    let logx_times_y = if LN_36_LOWER_BOUND < x && x < LN_36_UPPER_BOUND {
        let ln_36_x = ln_36(x)?;
        // Split to keep the 36-decimal product in range.
        add(
            mul(div(ln_36_x, ONE_18)?, y)?,
            div(mul(ln_36_x % ONE_18, y)?, ONE_18)?,
        )?
    } else {
        mul(ln_unchecked(x)?, y)?
    };
    let logx_times_y = div(logx_times_y, ONE_18)?;

    if logx_times_y < -MIN_NATURAL_EXPONENT_ABS || logx_times_y > MAX_NATURAL_EXPONENT {
        return Err(AmmError::ExponentOutOfBounds("pow product"));
    }
    Ok(exp(logx_times_y)?.into_raw())
}

/// Natural exponential of an 18-decimal exponent in `[-41, 130]`.
///
/// # Errors
///
/// Returns [`AmmError::ExponentOutOfBounds`] outside that range.
pub fn exp(x: I256) -> Result<I256, AmmError> {
    if x < -MIN_NATURAL_EXPONENT_ABS || x > MAX_NATURAL_EXPONENT {
        return Err(AmmError::ExponentOutOfBounds("exp argument"));
    }
    if x.is_negative() {
        // e^-x = 1 / e^x; ONE_18 * ONE_18 keeps the result at 18 decimals.
        return div(mul(ONE_18, ONE_18)?, exp(-x)?);
    }

    let mut x = x;
    let first_an = if x >= X0 {
        x -= X0;
        A0
    } else if x >= X1 {
        x -= X1;
        A1
    } else {
        small(1)
    };

    // Switch to 20 decimals for the remaining reduction and the series.
    x = mul(x, small(100))?;

    let mut product = ONE_20;
    for (xn, an) in REDUCTION_20 {
        if x >= xn {
            x -= xn;
            product = div(mul(product, an)?, ONE_20)?;
        }
    }

    // Taylor series up to the 12th term; x < 0.25 here.
    let mut series_sum = ONE_20;
    let mut term = x;
    series_sum = add(series_sum, term)?;
    for k in 2..=12u64 {
        term = div(div(mul(term, x)?, ONE_20)?, small(k))?;
        series_sum = add(series_sum, term)?;
    }

    let scaled = div(mul(product, series_sum)?, ONE_20)?;
    div(mul(scaled, first_an)?, small(100))
}

/// Natural logarithm of a positive 18-decimal value.
///
/// # Errors
///
/// Returns [`AmmError::ExponentOutOfBounds`] for `a <= 0`.
pub fn ln(a: I256) -> Result<I256, AmmError> {
    if a <= I256::ZERO {
        return Err(AmmError::ExponentOutOfBounds("ln of non-positive value"));
    }
    if LN_36_LOWER_BOUND < a && a < LN_36_UPPER_BOUND {
        div(ln_36(a)?, ONE_18)
    } else {
        ln_unchecked(a)
    }
}

fn ln_unchecked(a: I256) -> Result<I256, AmmError> {
    if a < ONE_18 {
        // ln(a) = -ln(1/a); ONE_18 * ONE_18 / a keeps 18 decimals.
        return Ok(-ln_unchecked(div(mul(ONE_18, ONE_18)?, a)?)?);
    }

    let mut a = a;
    let mut sum = I256::ZERO;
    if a >= mul(A0, ONE_18)? {
        a = div(a, A0)?;
        sum = add(sum, X0)?;
    }
    if a >= mul(A1, ONE_18)? {
        a = div(a, A1)?;
        sum = add(sum, X1)?;
    }

    sum = mul(sum, small(100))?;
    a = mul(a, small(100))?;

    for (xn, an) in REDUCTION_20.into_iter().chain([(X10, A10), (X11, A11)]) {
        if a >= an {
            a = div(mul(a, ONE_20)?, an)?;
            sum = add(sum, xn)?;
        }
    }

    // ln(a) = 2 * atanh(z), z = (a - 1) / (a + 1), odd terms to z^11.
    let z = div(mul(a - ONE_20, ONE_20)?, add(a, ONE_20)?)?;
    let z_squared = div(mul(z, z)?, ONE_20)?;
    let mut num = z;
    let mut series_sum = num;
    for k in [3u64, 5, 7, 9, 11] {
        num = div(mul(num, z_squared)?, ONE_20)?;
        series_sum = add(series_sum, div(num, small(k))?)?;
    }
    series_sum = mul(series_sum, small(2))?;

    div(add(sum, series_sum)?, small(100))
}

/// `ln(x)` at 36 decimals for `x` close to one.
fn ln_36(x: I256) -> Result<I256, AmmError> {
    let x = mul(x, ONE_18)?;
    let z = div(mul(x - ONE_36, ONE_36)?, add(x, ONE_36)?)?;
    let z_squared = div(mul(z, z)?, ONE_36)?;
    let mut num = z;
    let mut series_sum = num;
    for k in [3u64, 5, 7, 9, 11, 13, 15] {
        num = div(mul(num, z_squared)?, ONE_36)?;
        series_sum = add(series_sum, div(num, small(k))?)?;
    }
    mul(series_sum, small(2))
}
