use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::application::{BillingService, Report};
use crate::domain::Cycle;

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Exporter for rendering cycle reports and balances to external formats.
pub struct Exporter<'a> {
    service: &'a BillingService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BillingService) -> Self {
        Self { service }
    }

    /// Export the cycle report as a tagged XML document.
    pub async fn export_report_xml<W: Write>(
        &self,
        mut writer: W,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Report> {
        let report = self.service.report(month, today).await?;
        let xml = render_report_xml(&report)?;
        writer.write_all(xml.as_bytes())?;
        writer.flush()?;
        Ok(report)
    }

    /// Export the cycle report as a JSON document.
    pub async fn export_report_json<W: Write>(
        &self,
        mut writer: W,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Report> {
        let report = self.service.report(month, today).await?;
        let json = render_report_json(&report)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(report)
    }

    /// Export per-client balances for the cycle as CSV rows.
    pub async fn export_balances_csv<W: Write>(
        &self,
        writer: W,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<usize> {
        let sheet = self.service.balance_sheet(month, today).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["id", "client", "max_amount", "received", "remaining"])?;

        let mut count = 0;
        for line in &sheet.clients {
            csv_writer.write_record(&[
                line.id.to_string(),
                line.name.clone(),
                line.max_amount.clone(),
                line.received.clone(),
                line.remaining.clone(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}

/// Render a report as an XML document. Same report in, same bytes out.
pub fn render_report_xml(report: &Report) -> Result<String> {
    let body = quick_xml::se::to_string(report).context("Failed to serialize report as XML")?;
    Ok(format!("{XML_DECL}{body}\n"))
}

/// Render a report as a pretty-printed JSON document.
pub fn render_report_json(report: &Report) -> Result<String> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize report as JSON")?;
    Ok(format!("{json}\n"))
}

/// Conventional file name for a report export:
/// `report_<start>_to_<end>.<extension>`.
pub fn report_filename(cycle: &Cycle, extension: &str) -> String {
    format!(
        "report_{}_to_{}.{}",
        cycle.start.format("%Y-%m-%d"),
        cycle.end.format("%Y-%m-%d"),
        extension
    )
}
