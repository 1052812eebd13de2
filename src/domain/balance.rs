use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Cents, Client, ClientId, Cycle, Payment};

/// A single client's standing within a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBalance {
    pub client_id: ClientId,
    pub name: String,
    pub max_amount_cents: Cents,
    pub received_cents: Cents,
    pub remaining_cents: Cents,
}

/// Aggregate standing for a cycle. The cap total spans every registered
/// client; only the received total is restricted to the window. The cap is a
/// standing obligation, the received total is cycle activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTotals {
    pub total_to_receive_cents: Cents,
    pub total_received_cents: Cents,
    pub total_remaining_cents: Cents,
}

impl CycleTotals {
    /// Build totals from the two aggregate sums, flooring remaining at zero.
    pub fn from_sums(total_to_receive: Cents, total_received: Cents) -> Self {
        Self {
            total_to_receive_cents: total_to_receive,
            total_received_cents: total_received,
            total_remaining_cents: (total_to_receive - total_received).max(0),
        }
    }
}

/// Compute each client's received/remaining balance for a cycle.
///
/// Payments dated outside the window are ignored, as are payments whose
/// client reference matches no known client. Clients with no payments yield
/// received = 0. Results are ordered by client name, id as tiebreak.
pub fn client_balances(
    cycle: &Cycle,
    clients: &[Client],
    payments: &[Payment],
) -> Vec<ClientBalance> {
    let mut received: HashMap<ClientId, Cents> = HashMap::new();
    for payment in payments {
        if cycle.contains(payment.payment_date) {
            *received.entry(payment.client_id).or_insert(0) += payment.amount_cents;
        }
    }

    let mut balances: Vec<ClientBalance> = clients
        .iter()
        .map(|client| {
            let got = received.get(&client.id).copied().unwrap_or(0);
            ClientBalance {
                client_id: client.id,
                name: client.name.clone(),
                max_amount_cents: client.max_amount_cents,
                received_cents: got,
                remaining_cents: (client.max_amount_cents - got).max(0),
            }
        })
        .collect();

    balances.sort_by(|a, b| a.name.cmp(&b.name).then(a.client_id.cmp(&b.client_id)));
    balances
}

/// Compute the aggregate totals for a cycle, independently of the per-client
/// view: every client's cap counts, only in-cycle payments count.
pub fn cycle_totals(cycle: &Cycle, clients: &[Client], payments: &[Payment]) -> CycleTotals {
    let total_to_receive: Cents = clients.iter().map(|c| c.max_amount_cents).sum();
    let total_received: Cents = payments
        .iter()
        .filter(|p| cycle.contains(p.payment_date))
        .map(|p| p.amount_cents)
        .sum();

    CycleTotals::from_sums(total_to_receive, total_received)
}
