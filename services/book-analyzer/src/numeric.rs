//! Fixed-precision rounding and tolerant float comparison
//!
//! Totals are accumulated in binary floating point, so two walks over the
//! same book can differ in the last bit. Comparisons go through
//! [`approx_eq`] instead of `==`.

/// Decimal places used for prices and reported totals
pub const PRICE_PRECISION: i32 = 2;

/// Round `value` to `precision` decimal places, half away from zero.
#[inline]
#[must_use]
pub fn round_to(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    // f64::round already rounds half away from zero
    (value * scale).round() / scale
}

/// Round a price or total to [`PRICE_PRECISION`] places.
#[inline]
#[must_use]
pub fn round_price(value: f64) -> f64 {
    round_to(value, PRICE_PRECISION)
}

/// Equality that tolerates one unit in the last place.
///
/// Two values are equal if they compare equal or their bit patterns are at
/// most one step apart.
#[inline]
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let ai = a.to_bits() as i64;
    let bi = b.to_bits() as i64;
    ai.abs_diff(bi) <= 1
}
