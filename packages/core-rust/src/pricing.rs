//! Pricing engine: total cost and effective duration for a list of items.

use crate::types::{PriceType, Quote, ServiceItem};

/// Duration assumed for recurring items when no override is given, and the
/// reported duration when nothing else sets one.
pub const DEFAULT_DURATION_MONTHS: u32 = 12;

const MONTHS_PER_YEAR: u32 = 12;

/// Prices `items` over an optional month override.
///
/// Recurring items (`monthly`, `yearly`) are billed over the override when it
/// is positive, otherwise over [`DEFAULT_DURATION_MONTHS`]. Yearly items bill
/// each started year in full. The reported duration is the maximum month count
/// of any recurring item, starting from the override; it falls back to
/// [`DEFAULT_DURATION_MONTHS`] when still zero. One-time items never affect it.
///
/// Pure and total: empty lists yield `(0.0, 12)`.
#[must_use]
pub fn calculate(items: &[ServiceItem], months_override: Option<u32>) -> Quote {
    let mut duration_months = months_override.filter(|m| *m > 0).unwrap_or(0);
    let mut total_cost = 0.0;

    for item in items {
        #[allow(clippy::cast_precision_loss)] // quantities are far below 2^52
        let quantity = item.billable_quantity() as f64;

        match item.price_type {
            PriceType::Monthly => {
                let months = effective_months(duration_months);
                total_cost += item.price * quantity * f64::from(months);
                duration_months = duration_months.max(months);
            }
            PriceType::Yearly => {
                let months = effective_months(duration_months);
                let years = months.div_ceil(MONTHS_PER_YEAR);
                total_cost += item.price * quantity * f64::from(years);
                duration_months = duration_months.max(months);
            }
            PriceType::OneTime => {
                total_cost += item.price * quantity;
            }
        }
    }

    if duration_months == 0 {
        duration_months = DEFAULT_DURATION_MONTHS;
    }

    Quote {
        total_cost,
        duration_months,
    }
}

fn effective_months(current: u32) -> u32 {
    if current == 0 {
        DEFAULT_DURATION_MONTHS
    } else {
        current
    }
}
