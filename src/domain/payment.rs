use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, ClientId};

pub type PaymentId = i64;

/// A persisted payment. Payments are append-only: never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub client_id: ClientId,
    pub amount_cents: Cents,
    pub payment_date: NaiveDate,
}

/// A validated payment that has not been persisted yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub client_id: ClientId,
    pub amount_cents: Cents,
    pub payment_date: NaiveDate,
}
