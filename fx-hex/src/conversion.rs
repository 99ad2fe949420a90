//! Amount conversion over a rate snapshot.

use rust_decimal::Decimal;

use fx_types::{ConversionResult, CurrencyCode, DailyRates, RateError, RateSnapshot};

/// Converts `amount` of the snapshot's base into `to`, or into every
/// convertible currency of the snapshot when `to` is `None`.
///
/// Non-convertible currencies never appear in the output. Asking for one
/// explicitly, or for a currency the snapshot lacks, is `UnknownCurrency`.
pub fn convert(
    snapshot: &RateSnapshot,
    amount: Decimal,
    to: Option<&CurrencyCode>,
) -> Result<ConversionResult, RateError> {
    let rates_applied: DailyRates = match to {
        Some(target) => {
            let rate = snapshot
                .rates
                .get(target)
                .filter(|_| target.is_convertible())
                .ok_or_else(|| RateError::UnknownCurrency(target.to_string()))?;
            DailyRates::from([(target.clone(), *rate)])
        }
        None => snapshot
            .rates
            .iter()
            .filter(|(code, _)| code.is_convertible())
            .map(|(code, rate)| (code.clone(), *rate))
            .collect(),
    };

    let converted_amounts = rates_applied
        .iter()
        .map(|(code, rate)| {
            let value = amount.checked_mul(*rate).ok_or_else(|| {
                RateError::Internal(format!("converting {amount} to {code} overflowed"))
            })?;
            Ok((code.clone(), value))
        })
        .collect::<Result<DailyRates, RateError>>()?;

    Ok(ConversionResult {
        input_amount: amount,
        from_currency: snapshot.base.clone(),
        converted_amounts,
        rates_applied,
    })
}
