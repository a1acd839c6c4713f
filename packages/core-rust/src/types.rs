//! Request and outcome types exchanged with callers.
//!
//! Field names are `snake_case` on the wire. Request decoding is lenient:
//! missing scalar fields fall back to their zero values so that required-field
//! checks happen in [`CalculationRequest::validate`] rather than in the decoder.
//! An explicit JSON `null` is treated the same as a missing field.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Decodes `null` as `T::default()`. Pair with `#[serde(default)]` so an
/// absent field behaves the same way.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Billing model of a single service item.
///
/// Any unrecognised string (and a missing or `null` field) decodes as
/// [`PriceType::OneTime`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// Charged per month of the effective duration.
    Monthly,
    /// Charged per started year of the effective duration.
    Yearly,
    /// Charged once regardless of duration.
    #[default]
    #[serde(other)]
    OneTime,
}

/// A priced line item of a calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Caller-side identifier, carried through untouched.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    /// Unit price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// How the price scales with duration.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_type: PriceType,
    /// Ordered quantity. Values `<= 0` are billed as 1.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
}

impl ServiceItem {
    /// Quantity used for billing: the ordered quantity, or 1 when it is not positive.
    #[must_use]
    pub fn billable_quantity(&self) -> i64 {
        self.quantity.max(1)
    }
}

/// Inbound calculation request, as accepted by `POST /process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Caller-assigned identifier. Zero means "missing".
    #[serde(default, deserialize_with = "null_as_default")]
    pub calculation_id: i64,
    /// Items to price, in caller order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<ServiceItem>,
    /// Where the outcome is delivered.
    #[serde(default, deserialize_with = "null_as_default")]
    pub callback_url: String,
    /// Optional period start, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Optional period end, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Rejection reasons for a decoded request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("calculation_id and callback_url are required")]
    MissingRequiredField,
}

impl CalculationRequest {
    /// Checks the fields the scheduler relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRequiredField`] when `calculation_id`
    /// is zero or `callback_url` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.calculation_id == 0 || self.callback_url.is_empty() {
            return Err(ValidationError::MissingRequiredField);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of the pricing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Sum of all item contributions.
    pub total_cost: f64,
    /// Effective duration in months, always `>= 1`.
    pub duration_months: u32,
}

/// Terminal status reported to the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

impl OutcomeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Payload delivered to the caller's callback URL.
///
/// Only constructible through [`CalculationOutcome::success`] and
/// [`CalculationOutcome::failure`], so `total_cost` and `duration_months` are
/// present exactly when the status is `success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationOutcome {
    status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_months: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl CalculationOutcome {
    /// A successful outcome carrying the computed quote.
    pub fn success(quote: Quote, note: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            total_cost: Some(quote.total_cost),
            duration_months: Some(quote.duration_months),
            note: Some(note.into()),
        }
    }

    /// A failed outcome. Carries no pricing data.
    pub fn failure(note: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            total_cost: None,
            duration_months: None,
            note: Some(note.into()),
        }
    }

    #[must_use]
    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    #[must_use]
    pub fn total_cost(&self) -> Option<f64> {
        self.total_cost
    }

    #[must_use]
    pub fn duration_months(&self) -> Option<u32> {
        self.duration_months
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn request(calculation_id: i64, callback_url: &str) -> CalculationRequest {
        CalculationRequest {
            calculation_id,
            services: Vec::new(),
            callback_url: callback_url.to_string(),
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn price_type_known_values() {
        let monthly: PriceType = serde_json::from_str("\"monthly\"").unwrap();
        let yearly: PriceType = serde_json::from_str("\"yearly\"").unwrap();
        let one_time: PriceType = serde_json::from_str("\"one_time\"").unwrap();
        assert_eq!(monthly, PriceType::Monthly);
        assert_eq!(yearly, PriceType::Yearly);
        assert_eq!(one_time, PriceType::OneTime);
    }

    #[test]
    fn price_type_unknown_string_is_one_time() {
        let pt: PriceType = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(pt, PriceType::OneTime);
    }

    #[test]
    fn service_item_missing_fields_default() {
        let item: ServiceItem = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.price_type, PriceType::OneTime);
        assert_eq!(item.quantity, 0);
        assert_eq!(item.billable_quantity(), 1);
    }

    #[test]
    fn service_item_null_fields_default() {
        let item: ServiceItem = serde_json::from_str(
            r#"{"id": null, "price": null, "price_type": null, "quantity": null}"#,
        )
        .unwrap();
        assert_eq!(item.id, 0);
        assert_eq!(item.price, 0.0);
        assert_eq!(item.price_type, PriceType::OneTime);
        assert_eq!(item.quantity, 0);
        assert_eq!(item.billable_quantity(), 1);
    }

    #[test]
    fn service_item_wrong_type_still_rejected() {
        assert!(serde_json::from_str::<ServiceItem>(r#"{"quantity": "two"}"#).is_err());
    }

    #[test]
    fn billable_quantity_keeps_positive_values() {
        let item = ServiceItem {
            id: 1,
            price: 1.0,
            price_type: PriceType::Monthly,
            quantity: 3,
        };
        assert_eq!(item.billable_quantity(), 3);
    }

    #[test]
    fn request_decodes_full_body() {
        let body = r#"{
            "calculation_id": 42,
            "services": [{"id": 1, "price": 100.0, "price_type": "monthly", "quantity": 2}],
            "callback_url": "http://localhost:9000/cb",
            "start_date": "2024-01-10",
            "end_date": "2024-06-15"
        }"#;
        let req: CalculationRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.calculation_id, 42);
        assert_eq!(req.services.len(), 1);
        assert_eq!(req.services[0].price_type, PriceType::Monthly);
        assert_eq!(req.start_date.as_deref(), Some("2024-01-10"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_missing_fields_fail_validation() {
        let req: CalculationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.calculation_id, 0);
        assert!(req.services.is_empty());
        assert_eq!(req.validate(), Err(ValidationError::MissingRequiredField));
    }

    #[test]
    fn request_null_services_is_empty_list() {
        let req: CalculationRequest = serde_json::from_str(
            r#"{"calculation_id": 3, "services": null, "callback_url": "http://cb"}"#,
        )
        .unwrap();
        assert!(req.services.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_null_callback_url_fails_validation_not_decoding() {
        let req: CalculationRequest =
            serde_json::from_str(r#"{"calculation_id": 3, "callback_url": null}"#).unwrap();
        assert_eq!(req.callback_url, "");
        assert_eq!(req.validate(), Err(ValidationError::MissingRequiredField));
    }

    #[test]
    fn request_null_id_and_dates_decode() {
        let req: CalculationRequest = serde_json::from_str(
            r#"{"calculation_id": null, "callback_url": "http://cb", "start_date": null, "end_date": null}"#,
        )
        .unwrap();
        assert_eq!(req.calculation_id, 0);
        assert!(req.start_date.is_none());
        assert!(req.end_date.is_none());
        assert_eq!(req.validate(), Err(ValidationError::MissingRequiredField));
    }

    #[test]
    fn validate_rejects_zero_id() {
        assert!(request(0, "http://cb").validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_callback() {
        assert!(request(5, "").validate().is_err());
    }

    #[test]
    fn validate_accepts_negative_id() {
        assert!(request(-3, "http://cb").validate().is_ok());
    }

    #[test]
    fn validation_error_message() {
        assert_eq!(
            ValidationError::MissingRequiredField.to_string(),
            "calculation_id and callback_url are required"
        );
    }

    #[test]
    fn success_outcome_carries_quote() {
        let outcome = CalculationOutcome::success(
            Quote { total_cost: 2400.0, duration_months: 12 },
            "done",
        );
        assert_eq!(outcome.status(), OutcomeStatus::Success);
        assert_eq!(outcome.total_cost(), Some(2400.0));
        assert_eq!(outcome.duration_months(), Some(12));
        assert_eq!(outcome.note(), Some("done"));
    }

    #[test]
    fn failure_outcome_carries_no_quote() {
        let outcome = CalculationOutcome::failure("nope");
        assert_eq!(outcome.status(), OutcomeStatus::Failure);
        assert!(outcome.total_cost().is_none());
        assert!(outcome.duration_months().is_none());
    }

    #[test]
    fn success_serializes_all_fields() {
        let outcome = CalculationOutcome::success(
            Quote { total_cost: 2400.0, duration_months: 12 },
            "calculated",
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["total_cost"], 2400.0);
        assert_eq!(json["duration_months"], 12);
        assert_eq!(json["note"], "calculated");
    }

    #[test]
    fn failure_omits_pricing_fields() {
        let json = serde_json::to_value(CalculationOutcome::failure("simulated")).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["status"], "failure");
        assert!(!obj.contains_key("total_cost"));
        assert!(!obj.contains_key("duration_months"));
        assert_eq!(obj["note"], "simulated");
    }

    #[test]
    fn outcome_status_as_str() {
        assert_eq!(OutcomeStatus::Success.as_str(), "success");
        assert_eq!(OutcomeStatus::Failure.as_str(), "failure");
    }
}
