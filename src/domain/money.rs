use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Money is represented as an exact decimal to avoid floating-point
/// precision issues. Amounts keep whatever scale they were entered with;
/// comparisons are by numeric value.
pub type Amount = Decimal;

/// Parse a decimal string into an amount.
/// Example: "50.00" -> 50.00, "12.5" -> 12.5, "100" -> 100
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    Decimal::from_str(input.trim()).map_err(|_| ParseAmountError::InvalidFormat)
}

/// Format an amount for display, trimming trailing zeros.
/// Example: 50.00 -> "50", 12.50 -> "12.5"
pub fn format_amount(amount: Amount) -> String {
    amount.normalize().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50.00"), Ok(dec!(50.00)));
        assert_eq!(parse_amount("50"), Ok(dec!(50)));
        assert_eq!(parse_amount("12.34"), Ok(dec!(12.34)));
        assert_eq!(parse_amount("12.5"), Ok(dec!(12.5)));
        assert_eq!(parse_amount("0.01"), Ok(dec!(0.01)));
        assert_eq!(parse_amount("-50.00"), Ok(dec!(-50.00)));
        assert_eq!(parse_amount("  100 "), Ok(dec!(100)));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.34.56").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(50.00)), "50");
        assert_eq!(format_amount(dec!(12.50)), "12.5");
        assert_eq!(format_amount(dec!(0.01)), "0.01");
        assert_eq!(format_amount(dec!(-3.10)), "-3.1");
    }
}
