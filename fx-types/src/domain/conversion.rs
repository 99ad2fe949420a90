//! Conversion results derived from a rate snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CurrencyCode, DailyRates};

/// Amounts obtained by converting `input_amount` of `from_currency`.
///
/// Always recomputed from a cached snapshot; never cached itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionResult {
    #[schema(value_type = String, example = "2")]
    pub input_amount: Decimal,
    pub from_currency: CurrencyCode,
    /// `input_amount * rate` for every target currency
    #[schema(value_type = Object, example = json!({"AUD": "2.9728"}))]
    pub converted_amounts: DailyRates,
    /// Rate used for every target currency
    #[schema(value_type = Object, example = json!({"AUD": "1.4864"}))]
    pub rates_applied: DailyRates,
}
