mod common;

use anyhow::Result;
use common::{date, pay, test_service};

#[tokio::test]
async fn test_received_and_remaining_for_one_cycle() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    pay(&service, ana.id, "40.00", "2024-01-05").await?;
    pay(&service, ana.id, "35.50", "2024-01-20").await?;

    let sheet = service
        .balance_sheet(Some("2024-01"), date("2024-06-15"))
        .await?;

    assert_eq!(sheet.cycle.start, "2024-01-01");
    assert_eq!(sheet.cycle.end, "2024-01-30");
    assert_eq!(sheet.clients.len(), 1);
    assert_eq!(sheet.clients[0].max_amount, "150.00");
    assert_eq!(sheet.clients[0].received, "75.50");
    assert_eq!(sheet.clients[0].remaining, "74.50");

    Ok(())
}

#[tokio::test]
async fn test_payment_outside_cycle_does_not_count() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    pay(&service, ana.id, "40.00", "2024-01-05").await?;
    // Day 31 falls outside the day-30 window
    pay(&service, ana.id, "25.00", "2024-01-31").await?;
    pay(&service, ana.id, "25.00", "2024-02-10").await?;

    let sheet = service
        .balance_sheet(Some("2024-01"), date("2024-06-15"))
        .await?;
    assert_eq!(sheet.clients[0].received, "40.00");

    let totals = service.totals(Some("2024-01"), date("2024-06-15")).await?;
    assert_eq!(totals.total_received, "40.00");

    Ok(())
}

#[tokio::test]
async fn test_client_without_payments_shows_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.register_client("Ana", 15000).await?;

    let sheet = service
        .balance_sheet(Some("2024-01"), date("2024-06-15"))
        .await?;
    assert_eq!(sheet.clients[0].received, "0.00");
    assert_eq!(sheet.clients[0].remaining, "150.00");

    Ok(())
}

#[tokio::test]
async fn test_remaining_floors_at_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 5000).await?;
    pay(&service, ana.id, "90.00", "2024-01-10").await?;

    let sheet = service
        .balance_sheet(Some("2024-01"), date("2024-06-15"))
        .await?;
    assert_eq!(sheet.clients[0].received, "90.00");
    assert_eq!(sheet.clients[0].remaining, "0.00");

    Ok(())
}

#[tokio::test]
async fn test_totals_cap_spans_all_clients_received_is_cycle_bound() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    let bruno = service.register_client("Bruno", 20000).await?;
    pay(&service, ana.id, "50.00", "2024-01-10").await?;
    pay(&service, bruno.id, "70.00", "2024-02-10").await?;

    let totals = service.totals(Some("2024-02"), date("2024-06-15")).await?;
    // Both caps count even though only Bruno paid in February
    assert_eq!(totals.total_to_receive, "350.00");
    assert_eq!(totals.total_received, "70.00");
    assert_eq!(totals.total_remaining, "280.00");

    Ok(())
}

#[tokio::test]
async fn test_clients_ordered_by_name() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.register_client("Carla", 1000).await?;
    service.register_client("Ana", 1000).await?;
    service.register_client("Bruno", 1000).await?;

    let sheet = service
        .balance_sheet(Some("2024-01"), date("2024-06-15"))
        .await?;
    let names: Vec<&str> = sheet.clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);

    Ok(())
}

#[tokio::test]
async fn test_february_cycle_overflow_collects_march_days() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    pay(&service, ana.id, "10.00", "2024-02-01").await?;
    // The leap-year February window runs through March 1
    pay(&service, ana.id, "20.00", "2024-03-01").await?;
    pay(&service, ana.id, "40.00", "2024-03-02").await?;

    let sheet = service
        .balance_sheet(Some("2024-02"), date("2024-06-15"))
        .await?;
    assert_eq!(sheet.cycle.end, "2024-03-01");
    assert_eq!(sheet.clients[0].received, "30.00");

    Ok(())
}

#[tokio::test]
async fn test_month_defaults_to_today() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    pay(&service, ana.id, "10.00", "2024-07-15").await?;

    let sheet = service.balance_sheet(None, date("2024-07-19")).await?;
    assert_eq!(sheet.cycle.start, "2024-07-01");
    assert_eq!(sheet.clients[0].received, "10.00");

    Ok(())
}

#[tokio::test]
async fn test_invalid_month_selector_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .balance_sheet(Some("2024-13"), date("2024-06-15"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid_month");
    assert!(err.is_rejection());

    Ok(())
}

#[tokio::test]
async fn test_check_reports_healthy_store() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    pay(&service, ana.id, "40.00", "2024-01-05").await?;

    let health = service.check_store(date("2024-01-15")).await?;
    assert_eq!(health.client_count, 1);
    assert_eq!(health.payment_count, 1);
    assert_eq!(health.dangling_payment_refs, 0);
    assert!(health.totals_match);
    assert!(health.is_healthy());

    Ok(())
}
