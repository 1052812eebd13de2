use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::error;

use crate::application::{AppError, BillingService, PaymentDraft};
use crate::domain::{DEFAULT_CAP_CENTS, format_cents, parse_cents};

/// Incasso - Cycle Payment Ledger
#[derive(Parser)]
#[command(name = "incasso")]
#[command(about = "A cycle-based client payment ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "incasso.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Client management commands
    #[command(subcommand)]
    Client(ClientCommands),

    /// Record a payment for a client
    Pay {
        /// Amount paid (e.g., "40.00" or "40")
        amount: String,

        /// Client id the payment belongs to
        #[arg(long)]
        client: String,

        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show aggregate totals for a cycle
    Totals {
        /// Month selector (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Export the cycle report
    Report {
        /// Month selector (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Format: xml, json, csv
        #[arg(short, long, default_value = "xml")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Write to the conventional report_<start>_to_<end> file name
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Verify store health
    Check,
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Register a new client
    Create {
        /// Client display name
        name: String,

        /// Maximum payable amount per cycle (e.g., "150.00")
        #[arg(short, long)]
        max_amount: Option<String>,
    },

    /// List clients with their balances for a cycle
    List {
        /// Month selector (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let today = Local::now().date_naive();

        if let Commands::Init = self.command {
            BillingService::init(&self.database).await?;
            println!("Initialized database at {}", self.database);
            return Ok(());
        }

        // Failure to reach the store is fatal: the error propagates and the
        // process exits non-zero before any command logic runs.
        let service = BillingService::connect(&self.database).await?;

        let outcome = match self.command {
            Commands::Init => unreachable!("handled above"),
            Commands::Client(cmd) => run_client_command(&service, cmd, today).await,
            Commands::Pay {
                amount,
                client,
                date,
            } => run_pay_command(&service, amount, client, date, today).await,
            Commands::Totals { month, format } => {
                run_totals_command(&service, month.as_deref(), &format, today).await
            }
            Commands::Report {
                month,
                format,
                output,
                save,
            } => {
                run_report_command(
                    &service,
                    month.as_deref(),
                    &format,
                    output.as_deref(),
                    save,
                    today,
                )
                .await
            }
            Commands::Check => run_check_command(&service, today).await,
        };

        if let Err(err) = outcome {
            match err.downcast::<AppError>() {
                Ok(app_err) => {
                    if let AppError::Store(cause) = &app_err {
                        error!("store failure: {cause:#}");
                        eprintln!("error[{}]: internal store failure", app_err.code());
                    } else {
                        eprintln!("error[{}]: {app_err}", app_err.code());
                    }
                    std::process::exit(1);
                }
                Err(other) => return Err(other),
            }
        }

        Ok(())
    }
}

async fn run_client_command(
    service: &BillingService,
    cmd: ClientCommands,
    today: NaiveDate,
) -> Result<()> {
    match cmd {
        ClientCommands::Create { name, max_amount } => {
            let cap_cents = match max_amount {
                Some(raw) => parse_cents(&raw).map_err(|_| AppError::InvalidCap(raw))?,
                None => DEFAULT_CAP_CENTS,
            };
            let client = service.register_client(&name, cap_cents).await?;
            println!(
                "Created client #{} {} (cap {})",
                client.id,
                client.name,
                format_cents(client.max_amount_cents)
            );
        }
        ClientCommands::List { month, format } => {
            let sheet = service.balance_sheet(month.as_deref(), today).await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&sheet)?),
                _ => {
                    println!("Cycle: {} to {}", sheet.cycle.start, sheet.cycle.end);
                    println!();
                    println!(
                        "{:<6} {:<24} {:>12} {:>12} {:>12}",
                        "ID", "CLIENT", "CAP", "RECEIVED", "REMAINING"
                    );
                    println!("{}", "-".repeat(70));
                    for line in &sheet.clients {
                        println!(
                            "{:<6} {:<24} {:>12} {:>12} {:>12}",
                            line.id,
                            truncate(&line.name, 24),
                            line.max_amount,
                            line.received,
                            line.remaining
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

async fn run_pay_command(
    service: &BillingService,
    amount: String,
    client: String,
    date: Option<String>,
    today: NaiveDate,
) -> Result<()> {
    let draft = PaymentDraft {
        client_id: Some(client),
        amount: Some(amount),
        payment_date: date,
    };
    let payment = service.record_payment(&draft, today).await?;
    println!(
        "Recorded payment #{}: {} for client #{} on {}",
        payment.id,
        format_cents(payment.amount_cents),
        payment.client_id,
        payment.payment_date
    );
    Ok(())
}

async fn run_totals_command(
    service: &BillingService,
    month: Option<&str>,
    format: &str,
    today: NaiveDate,
) -> Result<()> {
    let totals = service.totals(month, today).await?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&totals)?),
        _ => {
            println!("Cycle: {} to {}", totals.cycle.start, totals.cycle.end);
            println!();
            println!("{:<14} {:>12}", "TO RECEIVE", totals.total_to_receive);
            println!("{:<14} {:>12}", "RECEIVED", totals.total_received);
            println!("{:<14} {:>12}", "REMAINING", totals.total_remaining);
        }
    }
    Ok(())
}

async fn run_report_command(
    service: &BillingService,
    month: Option<&str>,
    format: &str,
    output: Option<&str>,
    save: bool,
    today: NaiveDate,
) -> Result<()> {
    use std::fs::File;
    use std::io::{Write, stdout};

    use crate::io::{Exporter, report_filename};

    let extension = match format {
        "xml" | "json" | "csv" => format,
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: xml, json, csv", format),
    };

    let path = if save {
        let cycle = BillingService::resolve_cycle(month, today)?;
        Some(report_filename(&cycle, extension))
    } else {
        output.map(String::from)
    };

    let writer: Box<dyn Write> = match &path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let exporter = Exporter::new(service);
    match format {
        "xml" => {
            let report = exporter.export_report_xml(writer, month, today).await?;
            if let Some(path) = &path {
                eprintln!(
                    "Exported report for {} to {} -> {}",
                    report.cycle.start, report.cycle.end, path
                );
            }
        }
        "json" => {
            let report = exporter.export_report_json(writer, month, today).await?;
            if let Some(path) = &path {
                eprintln!(
                    "Exported report for {} to {} -> {}",
                    report.cycle.start, report.cycle.end, path
                );
            }
        }
        "csv" => {
            let count = exporter.export_balances_csv(writer, month, today).await?;
            if let Some(path) = &path {
                eprintln!("Exported {} balance rows -> {}", count, path);
            }
        }
        _ => unreachable!("validated above"),
    }

    Ok(())
}

async fn run_check_command(service: &BillingService, today: NaiveDate) -> Result<()> {
    let health = service.check_store(today).await?;

    println!("Clients:  {}", health.client_count);
    println!("Payments: {}", health.payment_count);
    if health.dangling_payment_refs > 0 {
        println!("Dangling payment refs: {}", health.dangling_payment_refs);
    }
    println!(
        "Cycle totals: {}",
        if health.totals_match { "OK" } else { "MISMATCH" }
    );
    println!();
    if health.is_healthy() {
        println!("OK");
    } else {
        println!("PROBLEMS FOUND");
        std::process::exit(1);
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
