use serde::{Deserialize, Serialize};

/// Digit grouping for the integer part of an amount.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 12,34,567 (lakh/crore)
    #[default]
    Indian,
    /// 1,234,567
    Western,
}

/// The single money rendering rule shared by the terminal views, the
/// digest and the document report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: Grouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₹".to_string(),
            grouping: Grouping::Indian,
        }
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, grouping: Grouping) -> Self {
        Self {
            symbol: symbol.into(),
            grouping,
        }
    }

    /// `₹1,23,456.70`, `-₹50.00`. Callers must pass finite values.
    pub fn format(&self, value: f64) -> String {
        let (negative, digits) = self.split(value);
        let sign = if negative { "-" } else { "" };
        format!("{}{}{}", sign, self.symbol, digits)
    }

    /// Grouped amount with two decimals and no symbol.
    pub fn format_amount(&self, value: f64) -> String {
        let (negative, digits) = self.split(value);
        if negative {
            format!("-{}", digits)
        } else {
            digits
        }
    }

    /// Income-style rendering: `+ ₹1,500.00`.
    pub fn credit(&self, value: f64) -> String {
        format!("+ {}", self.format(value))
    }

    /// Expense-style rendering: `- ₹600.00`.
    pub fn debit(&self, value: f64) -> String {
        format!("- {}", self.format(value))
    }

    fn split(&self, value: f64) -> (bool, String) {
        let (whole, frac) = round_cents(value.abs());
        let nonzero = whole.bytes().chain(frac.bytes()).any(|b| b != b'0');
        let negative = value < 0.0 && nonzero;
        let grouped = group_digits(&whole, self.grouping);
        (negative, format!("{}.{}", grouped, frac))
    }
}

/// Rounds a non-negative value to cents from its exact binary value, so
/// `0.015` (stored as 0.01499...) gives `0.01`. Exact half-cent ties round
/// away from zero.
fn round_cents(abs: f64) -> (String, String) {
    // Only multiples of 1/8 can sit exactly on a half cent.
    let fixed = if (abs * 8.0).fract() == 0.0 && (abs * 1000.0) % 10.0 == 5.0 {
        let cents = (abs * 100.0).round();
        format!("{:.0}.{:02}", (cents / 100.0).trunc(), (cents % 100.0) as u8)
    } else {
        format!("{:.2}", abs)
    };

    match fixed.split_once('.') {
        Some((whole, frac)) => (whole.to_string(), frac.to_string()),
        None => (fixed, "00".to_string()),
    }
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let step = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(0.0), "₹0.00");
        assert_eq!(fmt.format(999.5), "₹999.50");
        assert_eq!(fmt.format(1500.0), "₹1,500.00");
        assert_eq!(fmt.format(123456.7), "₹1,23,456.70");
        assert_eq!(fmt.format(12345678.0), "₹1,23,45,678.00");
    }

    #[test]
    fn test_western_grouping() {
        let fmt = CurrencyFormat::new("$", Grouping::Western);
        assert_eq!(fmt.format(1234567.891), "$1,234,567.89");
        assert_eq!(fmt.format_amount(1000.0), "1,000.00");
    }

    #[test]
    fn test_negative_and_negative_zero() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(-50.0), "-₹50.00");
        assert_eq!(fmt.format(-0.001), "₹0.00");
        assert_eq!(fmt.format(-0.0), "₹0.00");
        assert_eq!(fmt.format_amount(-1234.5), "-1,234.50");
    }

    #[test]
    fn test_signed_renderings() {
        let fmt = CurrencyFormat::new("Rs. ", Grouping::Indian);
        assert_eq!(fmt.credit(1500.0), "+ Rs. 1,500.00");
        assert_eq!(fmt.debit(600.0), "- Rs. 600.00");
    }

    #[test]
    fn test_rounds_the_stored_value() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(0.015), "₹0.01");
        assert_eq!(fmt.format(1.005), "₹1.00");
        assert_eq!(fmt.format(2.675), "₹2.67");
        assert_eq!(fmt.format(0.125), "₹0.13");
        assert_eq!(fmt.format(-0.375), "-₹0.38");
        assert_eq!(fmt.format(1234.5678), "₹1,234.57");
        assert_eq!(fmt.format(-0.004), "₹0.00");
    }

    #[test]
    fn test_formatting_is_stable() {
        let fmt = CurrencyFormat::default();
        let value = 98765.4321;
        assert_eq!(fmt.format(value), fmt.format(value));
        assert_eq!(fmt.format(value), "₹98,765.43");
    }
}
