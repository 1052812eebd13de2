use chrono::NaiveDate;

use crate::domain::{NewPayment, parse_cents};

use super::AppError;

/// Raw payment input as received at the boundary, before any validation.
#[derive(Debug, Clone, Default)]
pub struct PaymentDraft {
    pub client_id: Option<String>,
    pub amount: Option<String>,
    pub payment_date: Option<String>,
}

/// Validate a draft into a payment ready for insertion.
///
/// Rules run in a fixed order and the first failure wins: both required
/// fields present, client id a positive integer, amount a positive decimal,
/// payment date (when given) a valid calendar date. The date defaults to
/// `today` when omitted. Whether the client actually exists is the caller's
/// precondition, checked against the store.
pub fn admit(draft: &PaymentDraft, today: NaiveDate) -> Result<NewPayment, AppError> {
    let (client_id_raw, amount_raw) = match (&draft.client_id, &draft.amount) {
        (Some(client_id), Some(amount)) => (client_id.trim(), amount.trim()),
        _ => return Err(AppError::MissingField),
    };
    if client_id_raw.is_empty() || amount_raw.is_empty() {
        return Err(AppError::MissingField);
    }

    let client_id = client_id_raw
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidClientId(client_id_raw.to_string()))?;

    let amount_cents = parse_cents(amount_raw)
        .ok()
        .filter(|cents| *cents > 0)
        .ok_or_else(|| AppError::InvalidAmount(amount_raw.to_string()))?;

    let payment_date = match &draft.payment_date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(raw.clone()))?,
        None => today,
    };

    Ok(NewPayment {
        client_id,
        amount_cents,
        payment_date,
    })
}
