use std::path::PathBuf;

use clap::{Parser, Subcommand};
use payday_tools::bridge::{BridgeSession, DEFAULT_BRIDGE_ADDR, LedgerBridge};
use payday_tools::directory::EntityDirectory;
use payday_tools::io::{csv_read, date};
use payday_tools::model::{EarningsRecord, Pay};
use payday_tools::{Result, ToolError, import};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::CompanyInfo(args) => execute_company_info(args),
        Command::ImportChecks(args) => execute_import(args, ImportVariant::Checks),
        Command::ImportTime(args) => execute_import(args, ImportVariant::Time),
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_company_info(args: CompanyInfoArgs) -> Result<()> {
    let mut session = BridgeSession::connect(&args.bridge_addr)?;

    if let Err(error) = print_company_info(&mut session) {
        warn!(%error, "company information unavailable");
    }

    let directory = EntityDirectory::load(&mut session)?;

    println!("\nEmployee Statistics:");
    println!("-------------------");
    println!("Total Employees: {}", directory.employees().len());
    let active = directory
        .employees()
        .iter()
        .filter(|employee| employee.is_active)
        .count();
    println!("Active Employees: {active}");
    println!("Inactive Employees: {}", directory.employees().len() - active);
    for employee in directory.employees() {
        println!("- {} (ID: {})", employee.display_name, employee.list_id);
    }

    println!("\nPayroll Wage Items:");
    println!("-------------------");
    println!("Total Payroll Items: {}", directory.wage_items().len());
    for item in directory.wage_items() {
        println!("- {} (ID: {})", item.name, item.list_id);
    }

    Ok(())
}

fn execute_import(args: ImportArgs, variant: ImportVariant) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let mut session = BridgeSession::connect(&args.bridge_addr)?;

    if let Err(error) = print_company_info(&mut session) {
        warn!(%error, "company information unavailable");
    }

    let directory = EntityDirectory::load(&mut session)?;
    print_employee_listing(&directory);

    let records = match variant {
        ImportVariant::Checks => csv_read::read_flat_earnings(&args.input)?,
        ImportVariant::Time => csv_read::read_hourly_earnings(&args.input)?,
    };
    println!("Read {} records from CSV file.", records.len());
    print_preview(&records);

    let txn_date = date::resolve_txn_date(args.date.as_deref());
    let summary = import::run_import(&mut session, &directory, &records, txn_date);
    println!(
        "Successfully imported {} of {} earnings records.",
        summary.succeeded, summary.attempted
    );
    Ok(())
}

fn print_company_info<B: LedgerBridge>(bridge: &mut B) -> Result<()> {
    let company = bridge.company_info()?;
    println!("\nCompany Information:");
    println!("-------------------");
    println!("Company Name: {}", company.company_name);
    if let Some(legal_name) = &company.legal_company_name {
        println!("Legal Company Name: {legal_name}");
    }
    if let Some(month) = company.first_month_fiscal_year {
        println!("First Month of Fiscal Year: {month}");
    }
    if let Some(month) = company.first_month_income_tax_year {
        println!("First Month of Income Tax Year: {month}");
    }
    Ok(())
}

fn print_employee_listing(directory: &EntityDirectory) {
    println!("\nAvailable employees:");
    println!("--------------------");
    for employee in directory.employees() {
        println!(
            "ID: {}, Name: {}, Full Name: {}",
            employee.list_id,
            employee.display_name,
            employee.full_name()
        );
    }
    println!("--------------------\n");
}

fn print_preview(records: &[EarningsRecord]) {
    println!("\nCSV Data Preview:");
    println!("----------------");
    for record in records.iter().take(5) {
        match &record.pay {
            Pay::Flat { amount, category } => println!(
                "Employee: '{}', Amount: {amount}, Type: {category}",
                record.employee_name
            ),
            Pay::Hourly { rate, hours } => println!(
                "Employee: '{}', Rate: {rate}, Hours: {hours}",
                record.employee_name
            ),
        }
    }
    println!("----------------\n");
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Console utilities bridging payroll CSV exports into the company ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show company information and directory statistics.
    CompanyInfo(CompanyInfoArgs),
    /// Import flat earnings amounts as check transactions.
    ImportChecks(ImportArgs),
    /// Import hourly earnings as time-tracking entries.
    ImportTime(ImportArgs),
}

#[derive(clap::Args)]
struct CompanyInfoArgs {
    /// Address of the accounting application's automation bridge.
    #[arg(long, default_value = DEFAULT_BRIDGE_ADDR)]
    bridge_addr: String,
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Path to the earnings CSV export.
    #[arg(long)]
    input: PathBuf,

    /// Transaction date as MM/DD/YYYY. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// Address of the accounting application's automation bridge.
    #[arg(long, default_value = DEFAULT_BRIDGE_ADDR)]
    bridge_addr: String,
}

enum ImportVariant {
    Checks,
    Time,
}
