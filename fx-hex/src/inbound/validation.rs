//! Request validation at the HTTP boundary.
//!
//! Everything here runs before the service is called, so invalid input never
//! reaches the provider.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use fx_types::{AppError, CurrencyCode, MAX_PAGE_SIZE};

/// Largest absolute amount accepted for conversion, 10^18.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

fn oldest_rate_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1999, 1, 4).unwrap_or(NaiveDate::MIN)
}

pub fn parse_currency(raw: &str) -> Result<CurrencyCode, AppError> {
    raw.parse::<CurrencyCode>().map_err(AppError::from)
}

/// Parses a currency that may take part in a conversion.
pub fn parse_convertible_currency(raw: &str) -> Result<CurrencyCode, AppError> {
    let code = parse_currency(raw)?;
    if !code.is_convertible() {
        return Err(AppError::BadRequest(format!(
            "{} is not a supported currency for conversion",
            code
        )));
    }
    Ok(code)
}

pub fn check_amount(amount: Decimal) -> Result<(), AppError> {
    if amount.abs() > MAX_AMOUNT {
        return Err(AppError::BadRequest(format!(
            "amount must not exceed {} in magnitude",
            MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Parses a strict `yyyy-mm-dd` date.
fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(AppError::BadRequest(
            "Incorrect date format, expected format is yyyy-mm-dd".into(),
        ));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("{} is not a valid date", field)))
}

/// Parses the start of a historical window.
///
/// Must not predate the first published rates nor be after `today`.
pub fn parse_from_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let date = parse_date(raw, "from_date")?;
    if date < oldest_rate_date() {
        return Err(AppError::BadRequest(
            "from_date cannot be older than January 4, 1999".into(),
        ));
    }
    if date > today {
        return Err(AppError::BadRequest("from_date cannot be in future".into()));
    }
    Ok(date)
}

/// Parses the end of a historical window; must not be after `today`.
pub fn parse_to_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let date = parse_date(raw, "to_date")?;
    if date > today {
        return Err(AppError::BadRequest("to_date cannot be in future".into()));
    }
    Ok(date)
}

pub fn check_paging(page_size: u32, page: u32) -> Result<(), AppError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    if page == 0 {
        return Err(AppError::BadRequest("page must be at least 1".into()));
    }
    Ok(())
}
