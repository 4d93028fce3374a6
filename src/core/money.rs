use rust_decimal::{Decimal, RoundingStrategy};

/// Convert a float amount to an exact decimal through its shortest
/// round-trip text form, so `0.1` becomes `0.1` rather than the binary
/// expansion. Returns `None` for non-finite or out-of-range values.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value.to_string().parse::<Decimal>().ok()
}

/// Inverse of [`to_decimal`]: parsing the text form keeps the nearest float.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

/// Round half away from zero to whole cents, always carrying two decimals.
pub fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}
