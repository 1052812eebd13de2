use chrono::NaiveDate;

use crate::domain::{Cents, Client, Cycle, CycleTotals, Payment, cycle_totals};
use crate::storage::Repository;

use super::{
    AppError, BalanceSheet, PaymentDraft, Report, TotalsView, admission, reporting,
};

/// Application service providing the ledger's high-level operations.
/// This is the primary interface for any presentation layer (CLI, API, ...).
pub struct BillingService {
    repo: Repository,
}

/// Result of the store health check.
#[derive(Debug, Clone)]
pub struct StoreHealth {
    pub client_count: i64,
    pub payment_count: i64,
    pub dangling_payment_refs: i64,
    pub totals_match: bool,
}

impl StoreHealth {
    pub fn is_healthy(&self) -> bool {
        self.dangling_payment_refs == 0 && self.totals_match
    }
}

impl BillingService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database. Failure to reach the store here is
    /// fatal to the caller: there is no degraded mode.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Resolve an optional `YYYY-MM` selector into a cycle window.
    pub fn resolve_cycle(month: Option<&str>, today: NaiveDate) -> Result<Cycle, AppError> {
        Cycle::for_month(month, today)
            .map_err(|_| AppError::InvalidMonth(month.unwrap_or("").to_string()))
    }

    // ========================
    // Client operations
    // ========================

    /// Register a new client with its payment cap.
    pub async fn register_client(
        &self,
        name: &str,
        max_amount_cents: Cents,
    ) -> Result<Client, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MissingName);
        }
        if max_amount_cents < 0 {
            return Err(AppError::InvalidCap(max_amount_cents.to_string()));
        }

        Ok(self.repo.insert_client(name, max_amount_cents).await?)
    }

    /// List all registered clients in name order.
    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        Ok(self.repo.list_clients().await?)
    }

    // ========================
    // Cycle queries
    // ========================

    /// Per-client balances for the cycle selected by `month`.
    pub async fn balance_sheet(
        &self,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<BalanceSheet, AppError> {
        let cycle = Self::resolve_cycle(month, today)?;
        let clients = self.repo.list_clients().await?;
        let payments = self.repo.list_payments_between(cycle.start, cycle.end).await?;
        Ok(reporting::balance_sheet(&cycle, &clients, &payments))
    }

    /// Aggregate totals for the cycle: the cap total spans every client, the
    /// received total only in-cycle payments. Both come from store
    /// aggregates; the two reads are independent.
    pub async fn totals(
        &self,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<TotalsView, AppError> {
        let cycle = Self::resolve_cycle(month, today)?;
        let total_to_receive = self.repo.sum_caps().await?;
        let total_received = self.repo.sum_payments_between(cycle.start, cycle.end).await?;
        let totals = CycleTotals::from_sums(total_to_receive, total_received);
        Ok(reporting::totals_view(&cycle, &totals))
    }

    /// The full nested report for the cycle.
    pub async fn report(
        &self,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Report, AppError> {
        let cycle = Self::resolve_cycle(month, today)?;
        let clients = self.repo.list_clients().await?;
        let payments = self.repo.list_payments_between(cycle.start, cycle.end).await?;
        Ok(reporting::build_report(&cycle, &clients, &payments))
    }

    // ========================
    // Payment admission
    // ========================

    /// Validate and persist a payment.
    ///
    /// The client-existence precondition is checked against the store right
    /// before the insert; on success the payment is appended unconditionally,
    /// with no dedup or idempotency key. A client row vanishing between check
    /// and insert surfaces as a store error from the foreign key, never a
    /// silent write.
    pub async fn record_payment(
        &self,
        draft: &PaymentDraft,
        today: NaiveDate,
    ) -> Result<Payment, AppError> {
        let new_payment = admission::admit(draft, today)?;

        if !self.repo.client_exists(new_payment.client_id).await? {
            return Err(AppError::ClientNotFound(new_payment.client_id));
        }

        Ok(self.repo.insert_payment(&new_payment).await?)
    }

    // ========================
    // Integrity operations
    // ========================

    /// Check store health: row counts, dangling payment references, and a
    /// cross-check of the store's aggregates against the engine's own totals
    /// for the current cycle.
    pub async fn check_store(&self, today: NaiveDate) -> Result<StoreHealth, AppError> {
        let stats = self.repo.store_stats().await?;

        let cycle = Self::resolve_cycle(None, today)?;
        let clients = self.repo.list_clients().await?;
        let payments = self.repo.list_payments_between(cycle.start, cycle.end).await?;
        let engine = cycle_totals(&cycle, &clients, &payments);

        let total_to_receive = self.repo.sum_caps().await?;
        let total_received = self.repo.sum_payments_between(cycle.start, cycle.end).await?;
        let totals_match = engine.total_to_receive_cents == total_to_receive
            && engine.total_received_cents == total_received;

        Ok(StoreHealth {
            client_count: stats.client_count,
            payment_count: stats.payment_count,
            dangling_payment_refs: stats.dangling_payment_refs,
            totals_match,
        })
    }
}
