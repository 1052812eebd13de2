use serde::{Deserialize, Serialize};

use super::Cents;

pub type ClientId = i64;

/// Cap assigned at registration when none is given.
pub const DEFAULT_CAP_CENTS: Cents = 15_000;

/// A registered client with its maximum payable amount per cycle.
/// The id is assigned by the store; the record is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub max_amount_cents: Cents,
}
