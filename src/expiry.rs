//! Card expiry date parsing and validation.
//!
//! # Supported Formats
//!
//! - `MM/YY` - e.g., "12/25"
//! - `MM/YYYY` - e.g., "12/2025"
//! - `MMYY` - e.g., "1225"
//! - `MMYYYY` - e.g., "122025"
//! - `MM-YY` - e.g., "12-25"
//!
//! Parsing never fails: empty input becomes [`ExpiryDate::EMPTY_DATE`] and
//! anything unparsable becomes [`ExpiryDate::INVALID_DATE`], which the
//! validator tells apart.
//!
//! # Validity Window
//!
//! A card is valid through the last day of its expiry month. That day must
//! be no earlier than three months before the reference date, and the
//! expiry year no later than thirty years after the reference year.
//!
//! # Example
//!
//! ```
//! use checkout_core::expiry::{parse_expiry_date, validate_expiry_date, ExpiryDateValidation};
//! use checkout_core::FieldPolicy;
//! use chrono::NaiveDate;
//!
//! let reference = NaiveDate::from_ymd_opt(2022, 5, 23).unwrap();
//! let expiry = parse_expiry_date("12/30");
//! assert_eq!(expiry.month(), 12);
//! assert_eq!(expiry.year(), 2030);
//! assert_eq!(
//!     validate_expiry_date(expiry, reference, FieldPolicy::Required),
//!     ExpiryDateValidation::Valid
//! );
//! ```

use crate::card::FieldPolicy;
use chrono::{Datelike, Local, Months, NaiveDate};
use std::fmt;

/// Months an expiry date may lie in the past and still be accepted.
pub const MAXIMUM_EXPIRED_MONTHS: u32 = 3;

/// Years an expiry date may lie in the future.
pub const MAXIMUM_YEARS_IN_FUTURE: i32 = 30;

/// An expiry month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpiryDate {
    month: i32,
    year: i32,
}

impl ExpiryDate {
    /// No date entered.
    pub const EMPTY_DATE: Self = Self { month: 0, year: 0 };

    /// Text was entered but could not be parsed.
    pub const INVALID_DATE: Self = Self {
        month: -1,
        year: -1,
    };

    /// Creates an expiry date. No range check happens here; see
    /// [`ExpiryDate::exists`].
    #[inline]
    pub const fn new(month: i32, year: i32) -> Self {
        Self { month, year }
    }

    /// Returns the month (1-12 for existing dates).
    #[inline]
    pub const fn month(&self) -> i32 {
        self.month
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns true when this is neither sentinel, the month is 1-12 and
    /// the year is positive.
    pub fn exists(&self) -> bool {
        *self != Self::EMPTY_DATE
            && *self != Self::INVALID_DATE
            && (1..=12).contains(&self.month)
            && self.year > 0
    }

    /// Last day of the expiry month.
    fn last_valid_day(&self) -> Option<NaiveDate> {
        let month = u32::try_from(self.month).ok()?;
        NaiveDate::from_ymd_opt(self.year, month, 1)?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }

    /// Formats as MM/YY.
    pub fn format_short(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year % 100)
    }

    /// Formats as MM/YYYY.
    pub fn format_long(&self) -> String {
        format!("{:02}/{:04}", self.month, self.year)
    }
}

impl Default for ExpiryDate {
    fn default() -> Self {
        Self::EMPTY_DATE
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists() {
            write!(f, "{:02}/{:02}", self.month, self.year % 100)
        } else {
            f.write_str("--/--")
        }
    }
}

/// Outcome of expiry date validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpiryDateValidation {
    /// The date is within the validity window.
    Valid,
    /// No date was entered and the field is optional or hidden.
    ValidNotRequired,
    /// The date does not exist or could not be parsed.
    InvalidDateFormat,
    /// More than three months in the past.
    InvalidTooOld,
    /// More than thirty years in the future.
    InvalidTooFarInTheFuture,
}

impl ExpiryDateValidation {
    /// Returns true for both valid variants.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid | Self::ValidNotRequired)
    }

    /// Stable identifier used in CLI output and logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::ValidNotRequired => "valid_not_required",
            Self::InvalidDateFormat => "invalid_date_format",
            Self::InvalidTooOld => "invalid_too_old",
            Self::InvalidTooFarInTheFuture => "invalid_too_far_in_the_future",
        }
    }
}

impl fmt::Display for ExpiryDateValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Valid => "expiry date is valid",
            Self::ValidNotRequired => "expiry date is not required",
            Self::InvalidDateFormat => "invalid expiry format (expected MM/YY or MM/YYYY)",
            Self::InvalidTooOld => "card expired",
            Self::InvalidTooFarInTheFuture => "expiry date is too far in the future",
        };
        f.write_str(message)
    }
}

/// Parses an expiry date typed by the shopper.
///
/// # Example
///
/// ```
/// use checkout_core::expiry::{parse_expiry_date, ExpiryDate};
///
/// assert_eq!(parse_expiry_date("12/25"), ExpiryDate::new(12, 2025));
/// assert_eq!(parse_expiry_date("01/2030"), ExpiryDate::new(1, 2030));
/// assert_eq!(parse_expiry_date(""), ExpiryDate::EMPTY_DATE);
/// assert_eq!(parse_expiry_date("13/25"), ExpiryDate::INVALID_DATE);
/// ```
pub fn parse_expiry_date(input: &str) -> ExpiryDate {
    let input = input.trim();

    if input.is_empty() {
        return ExpiryDate::EMPTY_DATE;
    }

    let parsed = if let Some((month, year)) = input.split_once('/').or_else(|| input.split_once('-')) {
        parse_month_year(month.trim(), year.trim())
    } else if !input.bytes().all(|b| b.is_ascii_digit()) {
        None
    } else {
        match input.len() {
            4 => parse_month_year(&input[0..2], &input[2..4]),
            6 => parse_month_year(&input[0..2], &input[2..6]),
            _ => None,
        }
    };

    parsed.unwrap_or(ExpiryDate::INVALID_DATE)
}

fn parse_month_year(month: &str, year: &str) -> Option<ExpiryDate> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(month) || !all_digits(year) || month.len() > 2 {
        return None;
    }

    let month: i32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let year: i32 = match year.len() {
        // Two-digit years are in the 2000s
        2 => 2000 + year.parse::<i32>().ok()?,
        4 => year.parse().ok()?,
        _ => return None,
    };

    Some(ExpiryDate::new(month, year))
}

/// Validates an expiry date against a reference date.
///
/// `policy` is the expiry field policy of the detected brand; it only
/// matters when no date was entered.
pub fn validate_expiry_date(
    expiry_date: ExpiryDate,
    reference: NaiveDate,
    policy: FieldPolicy,
) -> ExpiryDateValidation {
    if !expiry_date.exists() {
        return if policy.is_not_required() && expiry_date != ExpiryDate::INVALID_DATE {
            ExpiryDateValidation::ValidNotRequired
        } else {
            ExpiryDateValidation::InvalidDateFormat
        };
    }

    let in_max_year_range = is_in_max_year_range(expiry_date, reference);
    let in_min_month_range = is_in_min_month_range(expiry_date, reference);

    if in_min_month_range && in_max_year_range {
        ExpiryDateValidation::Valid
    } else if !in_max_year_range {
        ExpiryDateValidation::InvalidTooFarInTheFuture
    } else {
        ExpiryDateValidation::InvalidTooOld
    }
}

/// Validates an expiry date against today's local date.
pub fn validate_expiry_date_today(expiry_date: ExpiryDate, policy: FieldPolicy) -> ExpiryDateValidation {
    validate_expiry_date(expiry_date, Local::now().date_naive(), policy)
}

fn is_in_max_year_range(expiry_date: ExpiryDate, reference: NaiveDate) -> bool {
    expiry_date.year() <= reference.year().saturating_add(MAXIMUM_YEARS_IN_FUTURE)
}

fn is_in_min_month_range(expiry_date: ExpiryDate, reference: NaiveDate) -> bool {
    let Some(last_valid_day) = expiry_date.last_valid_day() else {
        return false;
    };
    match reference.checked_sub_months(Months::new(MAXIMUM_EXPIRED_MONTHS)) {
        Some(max_past) => last_valid_day >= max_past,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 23).unwrap()
    }

    fn check(month: i32, year: i32) -> ExpiryDateValidation {
        validate_expiry_date(ExpiryDate::new(month, year), reference(), FieldPolicy::Required)
    }

    #[test]
    fn test_parse_mm_yy() {
        let expiry = parse_expiry_date("12/25");
        assert_eq!(expiry.month(), 12);
        assert_eq!(expiry.year(), 2025);
    }

    #[test]
    fn test_parse_mm_yyyy() {
        assert_eq!(parse_expiry_date("01/2030"), ExpiryDate::new(1, 2030));
    }

    #[test]
    fn test_parse_with_dash() {
        assert_eq!(parse_expiry_date("06-28"), ExpiryDate::new(6, 2028));
    }

    #[test]
    fn test_parse_without_separator() {
        assert_eq!(parse_expiry_date("1225"), ExpiryDate::new(12, 2025));
        assert_eq!(parse_expiry_date("122025"), ExpiryDate::new(12, 2025));
    }

    #[test]
    fn test_parse_with_spaces() {
        assert_eq!(parse_expiry_date("  12 / 25  "), ExpiryDate::new(12, 2025));
    }

    #[test]
    fn test_parse_invalid_month() {
        assert_eq!(parse_expiry_date("00/25"), ExpiryDate::INVALID_DATE);
        assert_eq!(parse_expiry_date("13/25"), ExpiryDate::INVALID_DATE);
    }

    #[test]
    fn test_parse_invalid_format() {
        assert_eq!(parse_expiry_date(""), ExpiryDate::EMPTY_DATE);
        assert_eq!(parse_expiry_date("abc"), ExpiryDate::INVALID_DATE);
        assert_eq!(parse_expiry_date("1/2/3"), ExpiryDate::INVALID_DATE);
        assert_eq!(parse_expiry_date("12/5"), ExpiryDate::INVALID_DATE);
        assert_eq!(parse_expiry_date("+1/25"), ExpiryDate::INVALID_DATE);
    }

    #[test]
    fn test_thirty_years_boundary() {
        assert_eq!(check(12, 2052), ExpiryDateValidation::Valid);
        assert_eq!(check(1, 2053), ExpiryDateValidation::InvalidTooFarInTheFuture);
    }

    #[test]
    fn test_three_months_boundary() {
        assert_eq!(check(2, 2022), ExpiryDateValidation::Valid);
        assert_eq!(check(1, 2022), ExpiryDateValidation::InvalidTooOld);
    }

    #[test]
    fn test_current_month_is_valid() {
        assert_eq!(check(5, 2022), ExpiryDateValidation::Valid);
    }

    #[test]
    fn test_non_existing_dates() {
        assert_eq!(check(0, 0), ExpiryDateValidation::InvalidDateFormat);
        assert_eq!(check(13, 2025), ExpiryDateValidation::InvalidDateFormat);
        assert_eq!(check(5, 0), ExpiryDateValidation::InvalidDateFormat);
    }

    #[test]
    fn test_not_required_policies() {
        for policy in [FieldPolicy::Optional, FieldPolicy::Hidden] {
            assert_eq!(
                validate_expiry_date(ExpiryDate::EMPTY_DATE, reference(), policy),
                ExpiryDateValidation::ValidNotRequired
            );
            assert_eq!(
                validate_expiry_date(ExpiryDate::INVALID_DATE, reference(), policy),
                ExpiryDateValidation::InvalidDateFormat
            );
        }
        assert_eq!(
            validate_expiry_date(ExpiryDate::EMPTY_DATE, reference(), FieldPolicy::Required),
            ExpiryDateValidation::InvalidDateFormat
        );
    }

    #[test]
    fn test_existing_date_ignores_policy() {
        assert_eq!(
            validate_expiry_date(ExpiryDate::new(1, 2022), reference(), FieldPolicy::Optional),
            ExpiryDateValidation::InvalidTooOld
        );
    }

    #[test]
    fn test_month_end_with_short_reference_month() {
        // 31 May minus three months clamps to 28 February
        let reference = NaiveDate::from_ymd_opt(2022, 5, 31).unwrap();
        assert_eq!(
            validate_expiry_date(ExpiryDate::new(2, 2022), reference, FieldPolicy::Required),
            ExpiryDateValidation::Valid
        );
    }

    #[test]
    fn test_today_far_future_and_past() {
        assert_eq!(
            validate_expiry_date_today(ExpiryDate::new(1, 2020), FieldPolicy::Required),
            ExpiryDateValidation::InvalidTooOld
        );
        assert_eq!(
            validate_expiry_date_today(ExpiryDate::new(1, 2999), FieldPolicy::Required),
            ExpiryDateValidation::InvalidTooFarInTheFuture
        );
    }

    #[test]
    fn test_format() {
        let expiry = ExpiryDate::new(3, 2025);
        assert_eq!(expiry.format_short(), "03/25");
        assert_eq!(expiry.format_long(), "03/2025");
        assert_eq!(expiry.to_string(), "03/25");
        assert_eq!(ExpiryDate::EMPTY_DATE.to_string(), "--/--");
    }

    #[test]
    fn test_exists() {
        assert!(ExpiryDate::new(1, 2025).exists());
        assert!(!ExpiryDate::EMPTY_DATE.exists());
        assert!(!ExpiryDate::INVALID_DATE.exists());
        assert!(!ExpiryDate::new(0, 2025).exists());
    }
}
