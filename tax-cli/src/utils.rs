use rust_decimal::Decimal;
use tax_core::calculations::common::round_half_up;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes the
/// `_` and `,` digit separators.
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace([',', '_'], "")
}

/// Parses a command-line amount into a [`Decimal`].
///
/// Accepts `,` and `_` as thousands separators (e.g. `"2,500,000"`); `.` is
/// the decimal point. Non-finite spellings such as `NaN` or `inf` are
/// rejected.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats a local-currency amount the es-CL way: `.` groups thousands and
/// `,` separates two rounded decimals.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_cli::utils::format_amount;
///
/// assert_eq!(format_amount(dec!(16168447.04)), "16.168.447,04");
/// assert_eq!(format_amount(dec!(-0.005)), "-0,01");
/// ```
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);

    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{fraction}")
}

/// Formats a percentage with two decimals, e.g. `93,69%`.
pub fn format_percent(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    format!("{}%", rounded.to_string().replace('.', ","))
}

/// Formats a bracket bound, using `∞` for an unbounded upper limit.
pub fn format_bound(value: Option<Decimal>) -> String {
    value.map(format_amount).unwrap_or_else(|| "∞".to_string())
}
