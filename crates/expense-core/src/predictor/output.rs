//! Prediction output formatting
//!
//! Turns the raw model scalar into display text and, for models that know
//! the student's income, an affordability message.

use crate::models::Insight;

/// Currency symbol shown in front of every amount
pub const DEFAULT_CURRENCY: &str = "RM";

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Currency symbol prefix (default: RM)
    pub currency_symbol: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Formats model outputs into user-facing strings
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    config: OutputConfig,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self {
            config: OutputConfig::default(),
        }
    }

    pub fn with_config(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn currency(&self) -> &str {
        &self.config.currency_symbol
    }

    /// Amount with two decimals and thousands separators, e.g. `RM 1,234.50`
    pub fn format_prediction(&self, amount: f64) -> String {
        format!("{} {}", self.currency(), format_grouped(amount, 2))
    }

    /// Whole-unit amount with thousands separators, e.g. `RM 1,235`
    pub fn format_whole(&self, amount: f64) -> String {
        format!("{} {}", self.currency(), format_grouped(amount.round(), 0))
    }

    /// Compare predicted expenses against total income.
    ///
    /// Spending strictly above income is a deficit; equal or below is a
    /// surplus (possibly zero). Both differences are rounded to whole units.
    pub fn affordability(&self, prediction: f64, total_income: u64) -> Insight {
        let income = total_income as f64;
        if prediction > income {
            let shortfall = (prediction - income).round() as i64;
            Insight::Deficit {
                shortfall,
                total_income,
                message: format!(
                    "Warning: your predicted expenses are {} more than your total income of {}. \
                     Consider cutting back on non-essential spending.",
                    self.format_whole(shortfall as f64),
                    self.format_whole(income),
                ),
            }
        } else {
            let surplus = (income - prediction).round() as i64;
            Insight::Surplus {
                surplus,
                total_income,
                message: format!(
                    "Good news: your predicted expenses fit within your total income of {}. \
                     You could save about {} each month.",
                    self.format_whole(income),
                    self.format_whole(surplus as f64),
                ),
            }
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-point rendering with comma-grouped integer digits
pub fn format_grouped(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    // -0.00 renders as 0.00
    if amount.is_sign_negative() && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_two_decimals() {
        let formatter = OutputFormatter::new();
        assert_eq!(formatter.format_prediction(450.0), "RM 450.00");
        assert_eq!(formatter.format_prediction(12.345678), "RM 12.35");
        assert_eq!(formatter.format_prediction(0.0), "RM 0.00");
    }

    #[test]
    fn test_thousands_separators() {
        let formatter = OutputFormatter::new();
        assert_eq!(formatter.format_prediction(1234.5), "RM 1,234.50");
        assert_eq!(formatter.format_prediction(1234567.891), "RM 1,234,567.89");
        assert_eq!(formatter.format_prediction(999.999), "RM 1,000.00");
        assert_eq!(formatter.format_whole(100000.4), "RM 100,000");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_grouped(-1234.5, 2), "-1,234.50");
        assert_eq!(format_grouped(-0.001, 2), "0.00");
    }

    #[test]
    fn test_custom_currency() {
        let formatter = OutputFormatter::with_config(OutputConfig {
            currency_symbol: "USD".to_string(),
        });
        assert_eq!(formatter.format_prediction(10.0), "USD 10.00");
    }

    #[test]
    fn test_deficit_when_prediction_exceeds_income() {
        let formatter = OutputFormatter::new();
        let insight = formatter.affordability(450.0, 300);
        assert!(insight.is_deficit());
        match &insight {
            Insight::Deficit { shortfall, .. } => assert_eq!(*shortfall, 150),
            other => panic!("expected deficit, got {other:?}"),
        }
        assert!(insight.message().contains("RM 150 more than your total income"));
    }

    #[test]
    fn test_surplus_when_income_covers_prediction() {
        let formatter = OutputFormatter::new();
        let insight = formatter.affordability(420.4, 600);
        match &insight {
            Insight::Surplus { surplus, .. } => assert_eq!(*surplus, 180),
            other => panic!("expected surplus, got {other:?}"),
        }
        assert!(insight.message().contains("RM 180"));
    }

    #[test]
    fn test_equal_income_is_zero_surplus() {
        let formatter = OutputFormatter::new();
        let insight = formatter.affordability(300.0, 300);
        assert_eq!(
            insight,
            Insight::Surplus {
                surplus: 0,
                total_income: 300,
                message: insight.message().to_string(),
            }
        );
    }

    #[test]
    fn test_zero_income_shortfall_is_rounded_prediction() {
        let formatter = OutputFormatter::new();
        match formatter.affordability(87.6, 0) {
            Insight::Deficit { shortfall, .. } => assert_eq!(shortfall, 88),
            other => panic!("expected deficit, got {other:?}"),
        }
    }
}
