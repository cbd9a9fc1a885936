//! Raw inputs for creating and editing transactions.
//!
//! Amounts arrive as text, the way an entry form or command line supplies
//! them, and are validated when the store applies the input.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Input for [`crate::store::TransactionStore::add`].
///
/// # Examples
///
/// ```
/// use expense_tracker_rs::models::NewTransaction;
/// use chrono::NaiveDate;
///
/// let input = NewTransaction::new("Groceries", "-42.10", "food")
///     .date(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
/// assert_eq!(input.amount, "-42.10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Description text, trimmed on insert.
    pub description: String,
    /// Signed amount text.
    pub amount: String,
    /// Category label.
    pub category: String,
    /// Calendar date; the store uses today when absent.
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    /// Creates an input dated today.
    #[inline]
    #[must_use]
    pub fn new<D, A, C>(description: D, amount: A, category: C) -> Self
    where
        D: Into<String>,
        A: Into<String>,
        C: Into<String>,
    {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date: None,
        }
    }

    /// Sets an explicit date.
    #[inline]
    #[must_use]
    pub const fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Replacement values for [`crate::store::TransactionStore::update`].
///
/// Every field is required. `amount` is a magnitude by convention: an
/// expense stays an expense when edited with a positive number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPatch {
    /// New description.
    pub description: String,
    /// New amount text.
    pub amount: String,
    /// New category.
    pub category: String,
    /// New date; `None` means the field was left blank.
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    /// Creates a patch with all fields set.
    #[inline]
    #[must_use]
    pub fn new<D, A, C>(description: D, amount: A, category: C, date: NaiveDate) -> Self
    where
        D: Into<String>,
        A: Into<String>,
        C: Into<String>,
    {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date: Some(date),
        }
    }
}

/// Trims a description, rejecting blank text.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyDescription`] when nothing is left
/// after trimming.
#[inline]
pub fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_owned())
}

/// Parses amount text into a finite number.
///
/// Surrounding whitespace is ignored; trailing garbage, `NaN` and
/// infinities are rejected.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAmount`] when the text is not a
/// finite decimal number.
#[inline]
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidAmount {
            input: raw.to_owned(),
        })
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDate`] on any other format.
#[inline]
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_err| {
        ValidationError::InvalidDate {
            input: raw.to_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_trimmed() {
        assert_eq!(validate_description("  Rent \n").unwrap(), "Rent");
        assert_eq!(
            validate_description(" \t "),
            Err(ValidationError::EmptyDescription)
        );
    }

    #[test]
    fn amount_accepts_signed_decimals() {
        assert!((parse_amount("-200").unwrap() + 200.0).abs() < f64::EPSILON);
        assert!((parse_amount(" 12.75 ").unwrap() - 12.75).abs() < f64::EPSILON);
        assert!((parse_amount("0").unwrap()).abs() < f64::EPSILON);
    }

    #[test]
    fn amount_rejects_non_finite_and_garbage() {
        for bad in ["", "abc", "NaN", "inf", "-infinity", "12abc"] {
            assert!(
                matches!(parse_amount(bad), Err(ValidationError::InvalidAmount { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(
            parse_date("2023-02-29"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn new_transaction_builder() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let input = NewTransaction::new("Lunch", "-9", "food").date(day);
        assert_eq!(input.date, Some(day));
        assert_eq!(NewTransaction::new("Lunch", "-9", "food").date, None);
    }
}
