// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use incasso::application::{BillingService, PaymentDraft};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(BillingService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = BillingService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse an ISO calendar date
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Draft builder for payment admission tests
pub fn draft(
    client_id: Option<&str>,
    amount: Option<&str>,
    payment_date: Option<&str>,
) -> PaymentDraft {
    PaymentDraft {
        client_id: client_id.map(String::from),
        amount: amount.map(String::from),
        payment_date: payment_date.map(String::from),
    }
}

/// Record a payment for an existing client on a given date
pub async fn pay(
    service: &BillingService,
    client_id: i64,
    amount: &str,
    payment_date: &str,
) -> Result<()> {
    service
        .record_payment(
            &draft(
                Some(&client_id.to_string()),
                Some(amount),
                Some(payment_date),
            ),
            date(payment_date),
        )
        .await?;
    Ok(())
}
