use crate::errors::{ErrorKind, Result};
use num_bigint::{BigInt, RandBigInt};
use num_integer::Roots;
use num_traits::{Signed, Zero};
use rand::thread_rng;

/// All arithmetic is arbitrary precision. Division truncates toward zero and
/// the remainder takes the dividend's sign, which is what BigInt's `/` and
/// `%` already do.
pub type Int = BigInt;

pub fn parse(text: &str) -> Result<Int> {
    text.parse::<Int>()
        .map_err(|_| ErrorKind::SyntaxError(format!("invalid number '{}'", text)).into())
}

pub fn isqrt(n: &Int) -> Result<Int> {
    if n.is_negative() {
        return Err(ErrorKind::DomainError(format!("isqrt of negative number {}", n)).into());
    }
    Ok(Roots::sqrt(n))
}

/// Uniform random integer in `[0, n)`; the caller checks n > 0.
pub fn rand_below(n: &Int) -> Int {
    thread_rng().gen_bigint_range(&Int::zero(), n)
}
