use crate::arithmetic::{ArithmeticError, Operation};

/// Shortest text that parses back to the same value, always with a
/// fractional part for finite integral values (`7.0`, not `7`).
pub fn format_number(value: f64) -> String {
    // Debug keeps the trailing `.0` that Display drops.
    format!("{:?}", value)
}

pub fn format_result(
    label: &str,
    division_by_zero: &str,
    op: Operation,
    a: f64,
    b: f64,
    result: Result<f64, ArithmeticError>,
) -> String {
    let result = match result {
        Ok(value) => format_number(value),
        Err(ArithmeticError::DivisionByZero) => division_by_zero.to_string(),
    };

    format!(
        "{label}: {} {} {} = {result}",
        format_number(a),
        op.symbol(),
        format_number(b)
    )
}
