use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};

use crate::domain::{Cents, Client, ClientId, NewPayment, Payment};

use super::MIGRATION_001_INITIAL;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row counts and referential health, used by the check command.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub client_count: i64,
    pub payment_count: i64,
    pub dangling_payment_refs: i64,
}

/// Repository for persisting and querying clients and payments.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL, with foreign key
    /// enforcement on so dangling payment inserts are rejected by the store.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Client operations
    // ========================

    /// Insert a new client and return it with its store-assigned id.
    pub async fn insert_client(&self, name: &str, max_amount_cents: Cents) -> Result<Client> {
        let row = sqlx::query(
            r#"
            INSERT INTO clients (name, max_amount_cents)
            VALUES (?, ?)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(max_amount_cents)
        .fetch_one(&self.pool)
        .await
        .with_context(|| {
            format!("Failed to insert client (name={name}, max_amount_cents={max_amount_cents})")
        })?;

        Ok(Client {
            id: row.get("id"),
            name: name.to_string(),
            max_amount_cents,
        })
    }

    /// List all clients, ordered by name (id as tiebreak).
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query(
            "SELECT id, name, max_amount_cents FROM clients ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list clients")?;

        rows.iter().map(Self::row_to_client).collect()
    }

    /// Get a client by id.
    pub async fn get_client(&self, id: ClientId) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT id, name, max_amount_cents FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch client (id={id})"))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    /// Check whether a client with the given id exists.
    pub async fn client_exists(&self, id: ClientId) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM clients WHERE id = ?) AS present")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to check client existence (id={id})"))?;

        Ok(row.get::<i64, _>("present") != 0)
    }

    /// Sum of caps over all clients, regardless of cycle.
    pub async fn sum_caps(&self) -> Result<Cents> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(max_amount_cents), 0) AS total FROM clients",
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum client caps")?;

        Ok(row.get("total"))
    }

    // ========================
    // Payment operations
    // ========================

    /// Insert a validated payment and return it with its store-assigned id.
    pub async fn insert_payment(&self, payment: &NewPayment) -> Result<Payment> {
        let date = payment.payment_date.format(DATE_FORMAT).to_string();
        let row = sqlx::query(
            r#"
            INSERT INTO payments (client_id, amount_cents, payment_date)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(payment.client_id)
        .bind(payment.amount_cents)
        .bind(&date)
        .fetch_one(&self.pool)
        .await
        .with_context(|| {
            format!(
                "Failed to insert payment (client_id={}, amount_cents={}, payment_date={})",
                payment.client_id, payment.amount_cents, date
            )
        })?;

        Ok(Payment {
            id: row.get("id"),
            client_id: payment.client_id,
            amount_cents: payment.amount_cents,
            payment_date: payment.payment_date,
        })
    }

    /// List payments dated within [start, end], both inclusive, ordered by
    /// date (id as tiebreak).
    pub async fn list_payments_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, client_id, amount_cents, payment_date
            FROM payments
            WHERE payment_date BETWEEN ? AND ?
            ORDER BY payment_date, id
            "#,
        )
        .bind(start.format(DATE_FORMAT).to_string())
        .bind(end.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to list payments between {start} and {end}"))?;

        rows.iter().map(Self::row_to_payment).collect()
    }

    /// Sum of payment amounts dated within [start, end], both inclusive.
    pub async fn sum_payments_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0) AS total
            FROM payments
            WHERE payment_date BETWEEN ? AND ?
            "#,
        )
        .bind(start.format(DATE_FORMAT).to_string())
        .bind(end.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to sum payments between {start} and {end}"))?;

        Ok(row.get("total"))
    }

    // ========================
    // Integrity
    // ========================

    /// Row counts and referential health for the check command.
    pub async fn store_stats(&self) -> Result<StoreStats> {
        let client_count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM clients")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count clients")?
            .get("count");

        let payment_count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM payments")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count payments")?
            .get("count");

        let dangling_payment_refs: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM payments p
            WHERE NOT EXISTS (SELECT 1 FROM clients c WHERE c.id = p.client_id)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to count dangling payment references")?
        .get("count");

        Ok(StoreStats {
            client_count,
            payment_count,
            dangling_payment_refs,
        })
    }

    fn row_to_client(row: &sqlx::sqlite::SqliteRow) -> Result<Client> {
        Ok(Client {
            id: row.get("id"),
            name: row.get("name"),
            max_amount_cents: row.get("max_amount_cents"),
        })
    }

    fn row_to_payment(row: &sqlx::sqlite::SqliteRow) -> Result<Payment> {
        let date_str: String = row.get("payment_date");
        Ok(Payment {
            id: row.get("id"),
            client_id: row.get("client_id"),
            amount_cents: row.get("amount_cents"),
            payment_date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid payment_date in store: {date_str}"))?,
        })
    }
}
