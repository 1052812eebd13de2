use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Client, ClientId, Cycle, CycleTotals, Payment, client_balances, format_cents,
};

/// Cycle window as it crosses the boundary: plain ISO calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCycle {
    pub start: String,
    pub end: String,
}

impl From<&Cycle> for ReportCycle {
    fn from(cycle: &Cycle) -> Self {
        Self {
            start: cycle.start.format("%Y-%m-%d").to_string(),
            end: cycle.end.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Live balances view for one cycle, one line per client in name order.
/// Amounts are fixed two-decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub cycle: ReportCycle,
    pub clients: Vec<BalanceLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub id: ClientId,
    pub name: String,
    pub max_amount: String,
    pub received: String,
    pub remaining: String,
}

/// Live aggregate view for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsView {
    pub cycle: ReportCycle,
    pub total_to_receive: String,
    pub total_received: String,
    pub total_remaining: String,
}

/// The nested export document: report -> cycle -> clients[] -> client ->
/// payments[] -> payment. The same shape serializes to JSON and, through the
/// element-per-field convention, to XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "report")]
pub struct Report {
    pub cycle: ReportCycle,
    pub clients: ReportClients,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportClients {
    #[serde(rename = "client", default)]
    pub client: Vec<ReportClient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportClient {
    pub id: ClientId,
    pub name: String,
    pub max_amount: String,
    pub received: String,
    pub remaining: String,
    pub payments: ReportPayments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayments {
    #[serde(rename = "payment", default)]
    pub payment: Vec<ReportPayment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayment {
    pub amount: String,
    pub date: String,
}

/// Assemble the live balances view from a snapshot.
pub fn balance_sheet(cycle: &Cycle, clients: &[Client], payments: &[Payment]) -> BalanceSheet {
    let lines = client_balances(cycle, clients, payments)
        .into_iter()
        .map(|balance| BalanceLine {
            id: balance.client_id,
            name: balance.name,
            max_amount: format_cents(balance.max_amount_cents),
            received: format_cents(balance.received_cents),
            remaining: format_cents(balance.remaining_cents),
        })
        .collect();

    BalanceSheet {
        cycle: cycle.into(),
        clients: lines,
    }
}

/// Format aggregate totals for the boundary.
pub fn totals_view(cycle: &Cycle, totals: &CycleTotals) -> TotalsView {
    TotalsView {
        cycle: cycle.into(),
        total_to_receive: format_cents(totals.total_to_receive_cents),
        total_received: format_cents(totals.total_received_cents),
        total_remaining: format_cents(totals.total_remaining_cents),
    }
}

/// Assemble the nested cycle report from a snapshot.
///
/// Client nodes are name-ordered; each client's payments are date-ordered
/// (id as tiebreak) and restricted to the window. Rendering the same
/// snapshot twice yields an identical document.
pub fn build_report(cycle: &Cycle, clients: &[Client], payments: &[Payment]) -> Report {
    let mut by_client: HashMap<ClientId, Vec<&Payment>> = HashMap::new();
    for payment in payments {
        if cycle.contains(payment.payment_date) {
            by_client.entry(payment.client_id).or_default().push(payment);
        }
    }

    let client_nodes = client_balances(cycle, clients, payments)
        .into_iter()
        .map(|balance| {
            let mut entries = by_client.remove(&balance.client_id).unwrap_or_default();
            entries.sort_by_key(|p| (p.payment_date, p.id));

            ReportClient {
                id: balance.client_id,
                name: balance.name,
                max_amount: format_cents(balance.max_amount_cents),
                received: format_cents(balance.received_cents),
                remaining: format_cents(balance.remaining_cents),
                payments: ReportPayments {
                    payment: entries
                        .iter()
                        .map(|p| ReportPayment {
                            amount: format_cents(p.amount_cents),
                            date: p.payment_date.format("%Y-%m-%d").to_string(),
                        })
                        .collect(),
                },
            }
        })
        .collect();

    Report {
        cycle: cycle.into(),
        clients: ReportClients {
            client: client_nodes,
        },
    }
}
