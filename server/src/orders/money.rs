//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic runs through `Decimal` and is rounded to 2 decimal
//! places before being stored/serialized as `f64`.

use crate::db::models::OrderLine;
use crate::utils::AppError;
use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item (KES 1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: u32 = 9999;

fn to_decimal(value: f64, field: &str) -> Result<Decimal, AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::validation(format!("{field} is not representable: {value}")))
}

fn round(value: Decimal) -> f64 {
    value
        .round_dp(DECIMAL_PLACES)
        .to_f64()
        .unwrap_or_default()
}

/// Validate a catalog price before it is snapshotted into a line.
pub fn validate_price(price: f64, field: &str) -> Result<(), AppError> {
    let d = to_decimal(price, field)?;
    if d < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// `unit_price × quantity`, rounded to 2 decimal places.
pub fn line_subtotal(unit_price: f64, quantity: u32) -> Result<f64, AppError> {
    let price = to_decimal(unit_price, "unit_price")?;
    Ok(round(price * Decimal::from(quantity)))
}

/// Sum of all line subtotals.
pub fn sum_lines(lines: &[OrderLine]) -> Result<f64, AppError> {
    let mut total = Decimal::ZERO;
    for line in lines {
        total += to_decimal(line.line_subtotal, "line_subtotal")?;
    }
    Ok(round(total))
}

/// Render an amount for notifications and receipts: `KES 1000.00`
pub fn format_amount(amount: f64) -> String {
    format!("KES {amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn line(unit_price: f64, quantity: u32) -> OrderLine {
        OrderLine {
            menu_item: RecordId::from_table_key("menu_item", "a"),
            name: "Test".into(),
            unit_price,
            quantity,
            line_subtotal: line_subtotal(unit_price, quantity).unwrap(),
        }
    }

    #[test]
    fn line_subtotal_is_exact() {
        assert_eq!(line_subtotal(500.0, 2).unwrap(), 1000.0);
        assert_eq!(line_subtotal(0.1, 3).unwrap(), 0.3);
    }

    #[test]
    fn sums_round_to_cents() {
        let lines = vec![line(0.1, 1), line(0.2, 1)];
        assert_eq!(sum_lines(&lines).unwrap(), 0.3);
    }

    #[test]
    fn non_finite_prices_are_rejected() {
        assert!(line_subtotal(f64::NAN, 1).is_err());
        assert!(validate_price(f64::INFINITY, "price").is_err());
        assert!(validate_price(-1.0, "price").is_err());
    }

    #[test]
    fn amounts_render_with_currency() {
        assert_eq!(format_amount(1000.0), "KES 1000.00");
        assert_eq!(format_amount(49.5), "KES 49.50");
    }
}
