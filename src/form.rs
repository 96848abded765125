//! Form payloads posted by the html views and their validation.

use std::str::FromStr;

use bigdecimal::{num_traits::Signed, BigDecimal};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::ValidationError,
    models::TransactionKind,
    month::MonthKey,
};

pub const INVALID_DATE: &str = "Invalid date. Please use yyyy-mm-dd.";
pub const INVALID_AMOUNT: &str = "Invalid amount. Please enter a non-negative number.";
pub const INVALID_KIND: &str = "Invalid transaction type. Choose income or expense.";
pub const MISSING_CATEGORY: &str = "Category is required.";
pub const CATEGORY_TOO_LONG: &str = "Category must be at most 50 characters.";
pub const DESCRIPTION_TOO_LONG: &str = "Description must be at most 200 characters.";

pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Exclusive upper bound of an amount, `10^MAX_AMOUNT_DIGITS`.
const MAX_AMOUNT_DIGITS: i64 = 12;
const AMOUNT_SCALE: i64 = 2;

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct TransactionForm {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: BigDecimal,
    pub description: Option<String>,
}

impl TryFrom<TransactionForm> for TransactionInput {
    type Error = ValidationError;

    fn try_from(f: TransactionForm) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(f.date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::new(INVALID_DATE))?;
        let kind = f
            .kind
            .trim()
            .parse::<TransactionKind>()
            .map_err(|_| ValidationError::new(INVALID_KIND))?;
        let category = non_empty(f.category).ok_or_else(|| ValidationError::new(MISSING_CATEGORY))?;
        check_len(&category, MAX_CATEGORY_LEN, CATEGORY_TOO_LONG)?;
        let description = non_empty(f.description);
        if let Some(d) = &description {
            check_len(d, MAX_DESCRIPTION_LEN, DESCRIPTION_TOO_LONG)?;
        }
        let amount = parse_amount(&f.amount)?;

        Ok(TransactionInput {
            date,
            kind,
            category,
            amount,
            description,
        })
    }
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct GoalForm {
    pub category: String,
    pub month: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalInput {
    /// `None` for the overall monthly goal.
    pub category: Option<String>,
    pub month: MonthKey,
    pub amount: BigDecimal,
}

impl TryFrom<GoalForm> for GoalInput {
    type Error = ValidationError;

    fn try_from(f: GoalForm) -> Result<Self, Self::Error> {
        // month first, a bad month is the most common mistake on this form
        let month = MonthKey::parse_display(&f.month)?;
        let category = non_empty(f.category);
        if let Some(c) = &category {
            check_len(c, MAX_CATEGORY_LEN, CATEGORY_TOO_LONG)?;
        }
        let amount = parse_amount(&f.amount)?;
        Ok(GoalInput {
            category,
            month,
            amount,
        })
    }
}

/// Parses a non-negative amount with at most two decimals and stores it with exactly two.
///
/// The scale is checked before any arithmetic, an exponent such as `1e-200000000`
/// would otherwise make every later sum allocate millions of digits.
fn parse_amount(s: &str) -> Result<BigDecimal, ValidationError> {
    let invalid = || ValidationError::new(INVALID_AMOUNT);

    let amount = BigDecimal::from_str(s.trim()).map_err(|_| invalid())?;
    // trailing zeros do not count as decimals, `12.300` is fine
    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > AMOUNT_SCALE || scale < -MAX_AMOUNT_DIGITS {
        return Err(invalid());
    }
    if amount.is_negative() || amount >= BigDecimal::new(1.into(), -MAX_AMOUNT_DIGITS) {
        return Err(invalid());
    }
    Ok(amount.with_scale(AMOUNT_SCALE))
}

fn check_len(s: &str, max: usize, msg: &str) -> Result<(), ValidationError> {
    if s.chars().count() > max {
        return Err(ValidationError::new(msg));
    }
    Ok(())
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::INVALID_MONTH;

    fn tx_form(date: &str, kind: &str, category: &str, amount: &str) -> TransactionForm {
        TransactionForm {
            date: date.into(),
            kind: kind.into(),
            category: category.into(),
            amount: amount.into(),
            description: String::new(),
        }
    }

    #[test]
    fn valid_transaction_form() {
        let mut form = tx_form("2025-08-14", "expense", " groceries ", "12.30");
        form.description = "weekly shop".into();

        let input = TransactionInput::try_from(form).unwrap();
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2025, 8, 14).unwrap());
        assert_eq!(input.kind, TransactionKind::Expense);
        assert_eq!(input.category, "groceries");
        assert_eq!(input.amount, BigDecimal::from_str("12.3").unwrap());
        assert_eq!(input.description.as_deref(), Some("weekly shop"));
    }

    #[test]
    fn blank_description_is_none() {
        let mut form = tx_form("2025-08-14", "income", "salary", "1000");
        form.description = "   ".into();
        assert_eq!(TransactionInput::try_from(form).unwrap().description, None);
    }

    #[test]
    fn transaction_form_errors() {
        let cases = [
            (tx_form("14/08/2025", "expense", "food", "1"), INVALID_DATE),
            (tx_form("2025-02-30", "expense", "food", "1"), INVALID_DATE),
            (tx_form("2025-08-14", "gift", "food", "1"), INVALID_KIND),
            (tx_form("2025-08-14", "expense", "  ", "1"), MISSING_CATEGORY),
            (tx_form("2025-08-14", "expense", "food", "ten"), INVALID_AMOUNT),
            (tx_form("2025-08-14", "expense", "food", "-4"), INVALID_AMOUNT),
            (tx_form("2025-08-14", "expense", "food", ""), INVALID_AMOUNT),
        ];
        for (form, msg) in cases {
            assert_eq!(TransactionInput::try_from(form).unwrap_err().message(), msg);
        }
    }

    #[test]
    fn huge_or_over_precise_amounts_are_rejected() {
        for amount in ["1e-200000000", "1e400", "0.001", "1000000000000", "1e13"] {
            let form = tx_form("2025-08-14", "expense", "food", amount);
            assert_eq!(
                TransactionInput::try_from(form).unwrap_err().message(),
                INVALID_AMOUNT,
                "amount {amount:?}"
            );
        }
    }

    #[test]
    fn amounts_are_kept_in_cents() {
        for (amount, stored) in [("12.3", "12.30"), ("7", "7.00"), ("1e3", "1000.00"), ("0.050", "0.05")] {
            let input = TransactionInput::try_from(tx_form("2025-08-14", "income", "pay", amount)).unwrap();
            assert_eq!(input.amount.to_string(), stored);
        }
    }

    #[test]
    fn category_and_description_lengths_are_bounded() {
        let ok = tx_form("2025-08-14", "expense", &"c".repeat(MAX_CATEGORY_LEN), "1");
        assert!(TransactionInput::try_from(ok).is_ok());

        let long = tx_form("2025-08-14", "expense", &"c".repeat(MAX_CATEGORY_LEN + 1), "1");
        assert_eq!(TransactionInput::try_from(long).unwrap_err().message(), CATEGORY_TOO_LONG);

        let mut form = tx_form("2025-08-14", "expense", "food", "1");
        form.description = "é".repeat(MAX_DESCRIPTION_LEN);
        assert!(TransactionInput::try_from(form).is_ok());

        let mut form = tx_form("2025-08-14", "expense", "food", "1");
        form.description = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        assert_eq!(TransactionInput::try_from(form).unwrap_err().message(), DESCRIPTION_TOO_LONG);

        let err = GoalInput::try_from(GoalForm {
            category: "g".repeat(3000),
            month: "8/2025".into(),
            amount: "1".into(),
        })
        .unwrap_err();
        assert_eq!(err.message(), CATEGORY_TOO_LONG);
    }

    #[test]
    fn goal_form_empty_category_is_overall() {
        let input = GoalInput::try_from(GoalForm {
            category: "".into(),
            month: "8/2025".into(),
            amount: "100".into(),
        })
        .unwrap();
        assert_eq!(input.category, None);
        assert_eq!(input.month.key(), "2025-08");
    }

    #[test]
    fn goal_form_bad_month_wins_over_bad_amount() {
        let err = GoalInput::try_from(GoalForm {
            category: "food".into(),
            month: "August".into(),
            amount: "lots".into(),
        })
        .unwrap_err();
        assert_eq!(err.message(), INVALID_MONTH);
    }

    #[test]
    fn zero_amount_is_allowed() {
        let input = GoalInput::try_from(GoalForm {
            category: "fun".into(),
            month: "1/2026".into(),
            amount: "0".into(),
        })
        .unwrap();
        assert_eq!(input.amount, BigDecimal::from(0));
    }
}
