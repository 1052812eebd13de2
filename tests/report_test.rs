mod common;

use anyhow::Result;
use common::{date, pay, test_service};
use incasso::io::{Exporter, render_report_json, render_report_xml};

#[tokio::test]
async fn test_report_nests_payments_under_clients() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    service.register_client("Bruno", 10000).await?;
    pay(&service, ana.id, "40.00", "2024-01-05").await?;
    pay(&service, ana.id, "35.50", "2024-01-20").await?;

    let report = service.report(Some("2024-01"), date("2024-06-15")).await?;

    assert_eq!(report.cycle.start, "2024-01-01");
    assert_eq!(report.cycle.end, "2024-01-30");
    assert_eq!(report.clients.client.len(), 2);

    let ana_node = &report.clients.client[0];
    assert_eq!(ana_node.name, "Ana");
    assert_eq!(ana_node.received, "75.50");
    assert_eq!(ana_node.remaining, "74.50");
    assert_eq!(ana_node.payments.payment.len(), 2);
    assert_eq!(ana_node.payments.payment[0].amount, "40.00");
    assert_eq!(ana_node.payments.payment[0].date, "2024-01-05");

    let bruno_node = &report.clients.client[1];
    assert!(bruno_node.payments.payment.is_empty());
    assert_eq!(bruno_node.received, "0.00");

    Ok(())
}

#[tokio::test]
async fn test_xml_export_document_structure() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    pay(&service, ana.id, "40.00", "2024-01-05").await?;

    let exporter = Exporter::new(&service);
    let mut buffer = Vec::new();
    exporter
        .export_report_xml(&mut buffer, Some("2024-01"), date("2024-06-15"))
        .await?;
    let xml = String::from_utf8(buffer)?;

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<report>"));
    assert!(xml.contains("<cycle><start>2024-01-01</start><end>2024-01-30</end></cycle>"));
    assert!(xml.contains("<clients><client>"));
    assert!(xml.contains("<max_amount>150.00</max_amount>"));
    assert!(
        xml.contains("<payments><payment><amount>40.00</amount><date>2024-01-05</date></payment>")
    );
    assert!(xml.trim_end().ends_with("</report>"));

    Ok(())
}

#[tokio::test]
async fn test_rendering_the_same_snapshot_twice_is_byte_identical() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    let bruno = service.register_client("Bruno", 10000).await?;
    pay(&service, ana.id, "40.00", "2024-01-05").await?;
    pay(&service, bruno.id, "12.34", "2024-01-07").await?;

    let first = service.report(Some("2024-01"), date("2024-06-15")).await?;
    let second = service.report(Some("2024-01"), date("2024-06-15")).await?;

    assert_eq!(render_report_xml(&first)?, render_report_xml(&second)?);
    assert_eq!(render_report_json(&first)?, render_report_json(&second)?);

    Ok(())
}

#[tokio::test]
async fn test_february_report_window_overflows() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.register_client("Ana", 15000).await?;

    let leap = service.report(Some("2024-02"), date("2024-06-15")).await?;
    assert_eq!(leap.cycle.end, "2024-03-01");

    let common_year = service.report(Some("2023-02"), date("2024-06-15")).await?;
    assert_eq!(common_year.cycle.end, "2023-03-02");

    Ok(())
}

#[tokio::test]
async fn test_csv_export_lists_balance_rows() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let ana = service.register_client("Ana", 15000).await?;
    service.register_client("Bruno", 10000).await?;
    pay(&service, ana.id, "40.00", "2024-01-05").await?;

    let exporter = Exporter::new(&service);
    let mut buffer = Vec::new();
    let count = exporter
        .export_balances_csv(&mut buffer, Some("2024-01"), date("2024-06-15"))
        .await?;
    let csv = String::from_utf8(buffer)?;

    assert_eq!(count, 2);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("id,client,max_amount,received,remaining")
    );
    assert_eq!(
        lines.next(),
        Some(format!("{},Ana,150.00,40.00,110.00", ana.id).as_str())
    );

    Ok(())
}
