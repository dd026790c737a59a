//! Numeric formatting for bar annotations and axis ticks.

const FIXED_MIN: f64 = 0.01;
const FIXED_MAX: f64 = 1000.0;

/// Format `value` with two decimals, switching to scientific notation when
/// its magnitude lies outside `[0.01, 1000]`.
///
/// Zero stays in fixed notation. Exponents are signed and at least two
/// digits wide, e.g. `5.00e-04` or `1.50e+04`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (FIXED_MIN..=FIXED_MAX).contains(&magnitude) {
        format!("{value:.2}")
    } else {
        format_scientific(value)
    }
}

fn format_scientific(value: f64) -> String {
    let raw = format!("{value:.2e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return raw;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}
