//! Fixed-point number formatting for display strings
//!
//! Field values travel to the display layer as pre-formatted strings, so the
//! rounding rule is part of the data contract. Exact ties round away from zero
//! (Rust's float formatting rounds ties to even), and the sign is kept for
//! negative values that round to zero.

/// Extra digits rendered past the requested precision to detect an exact tie.
const TIE_PROBE_DIGITS: usize = 64;

/// Format `value` with exactly `digits` decimals.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    let probe = format!("{:.*}", digits + TIE_PROBE_DIGITS, magnitude);
    let (kept, rest) = probe.split_at(probe.len() - TIE_PROBE_DIGITS);
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');

    let body = if is_tie {
        increment_last_digit(kept.trim_end_matches('.'))
    } else {
        format!("{:.*}", digits, magnitude)
    };

    if value < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

/// Round `value` to `digits` decimals using the same rule as [`to_fixed`].
pub fn round_to(value: f64, digits: usize) -> f64 {
    to_fixed(value, digits).parse().unwrap_or(value)
}

/// Add one unit in the last place of a plain decimal string.
fn increment_last_digit(decimal: &str) -> String {
    let mut bytes = decimal.as_bytes().to_vec();
    let mut idx = bytes.len();
    loop {
        if idx == 0 {
            bytes.insert(0, b'1');
            break;
        }
        idx -= 1;
        match bytes[idx] {
            b'.' => continue,
            b'9' => bytes[idx] = b'0',
            _ => {
                bytes[idx] += 1;
                break;
            }
        }
    }
    bytes.into_iter().map(char::from).collect()
}
