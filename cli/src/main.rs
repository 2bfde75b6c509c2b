mod dashboard;
mod entries;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use fleetledger_core::{
    apply_fields, build_entry, parse_args, parse_entry_date, render_html, resolve_data_dir,
    CredentialCheck, EntryFilter, FileEntryRepository, LedgerConfig, LedgerError, LedgerService,
    PinGate, TrendMode,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "fleetledger")]
#[command(about = "Income and expense ledger for a small taxi fleet", long_about = None)]
struct Cli {
    /// Data directory (default: ~/.fleetledger)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Owner PIN, when one is configured
    #[arg(long, global = true, env = "FLEETLEDGER_PIN", hide_env_values = true)]
    pin: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record an entry (usage: add airport run vehicle:KA01 driver:Ravi income:1500 fuel:300)
    Add {
        /// Notes words and key:value fields
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Change fields of an entry (usage: edit 1a2b3c4d fuel:350)
    Edit {
        /// Entry id or unique id prefix
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete an entry
    Delete {
        /// Entry id or unique id prefix
        id: String,
    },
    /// List entries, newest first
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(long)]
        driver: Option<String>,
        /// Matches vehicle or driver, ignoring case
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show totals and the best day
    Summary,
    /// Show the profit trend
    Trend {
        #[arg(short, long, value_enum, default_value_t = ModeArg::Daily)]
        mode: ModeArg,
    },
    /// Write the printable statement
    Report {
        /// Output directory (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Period label shown in the summary heading
        #[arg(long, default_value = "All Time")]
        range: String,
    },
    /// Print the shareable digest and a message link
    Share,
    /// Open the terminal dashboard
    Dashboard,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Daily,
    Monthly,
}

impl From<ModeArg> for TrendMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Daily => TrendMode::Daily,
            ModeArg::Monthly => TrendMode::Monthly,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", describe(&err));
        std::process::exit(1);
    }
}

/// Turns collaborator failures into the message shown to the operator.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LedgerError>() {
        Some(LedgerError::AccessDenied) => "Invalid PIN".to_string(),
        Some(LedgerError::Json(e)) => format!("Entry data file is corrupt: {}", e),
        Some(LedgerError::Io(e)) => format!("Could not access the data directory: {}", e),
        Some(LedgerError::Config(msg)) => format!("Configuration problem: {}", msg),
        _ => format!("{:#}", err),
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = LedgerConfig::load(&data_dir)?;

    PinGate::from_config(config.access.pin.as_deref()).authorize(cli.pin.as_deref())?;

    let repo = FileEntryRepository::new(&data_dir)?;
    info!(path = %repo.path().display(), "opened ledger");
    let service = LedgerService::new(repo, config);
    let currency = service.config().currency.clone();
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Add { args }) => {
            let entry = build_entry(&args, today)?;
            let created = service.create(entry)?;
            let id = created.id.map(|id| id.to_string()).unwrap_or_default();
            println!("Entry added: {} {} (ID: {})", created.date, created.vehicle_id, id);
            println!("  Income:  {}", currency.format(created.income));
            println!("  Expense: {}", currency.format(created.total_expense()));
            println!("  Profit:  {}", currency.format(created.profit()));
        }
        Some(Commands::Edit { id, args }) => {
            let id = service.resolve_id(&id)?;
            let mut entry = service.get(&id)?;
            apply_fields(&mut entry, &parse_args(&args), today)?;
            let updated = service.update(entry)?;
            println!("Entry updated: {} {}", updated.date, updated.vehicle_id);
            println!("  Profit:  {}", currency.format(updated.profit()));
        }
        Some(Commands::Delete { id }) => {
            let id = service.resolve_id(&id)?;
            service.remove(&id)?;
            println!("Entry deleted: {}", id);
        }
        Some(Commands::List {
            from,
            to,
            vehicle,
            driver,
            search,
        }) => {
            let filter = EntryFilter {
                date_start: from
                    .map(|d| parse_entry_date(&d, today))
                    .transpose()
                    .context("Invalid --from date")?,
                date_end: to
                    .map(|d| parse_entry_date(&d, today))
                    .transpose()
                    .context("Invalid --to date")?,
                vehicle,
                driver,
                search,
            };
            let entries = service.list_filtered(&filter)?;
            entries::show_entries(&entries, &currency);
        }
        Some(Commands::Summary) => {
            let stats = service.summary()?;
            entries::show_summary(&stats, &currency);
        }
        Some(Commands::Trend { mode }) => {
            let points = service.trend(mode.into())?;
            entries::show_trend(&points, &currency);
        }
        Some(Commands::Report { out, range }) => {
            let now = Local::now().naive_local();
            let doc = service.statement(&range, now)?;
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let path = dir.join(service.report_filename(today));
            fs::write(&path, render_html(&doc))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Report written to: {} ({} page{})",
                path.display(),
                doc.page_count(),
                if doc.page_count() == 1 { "" } else { "s" }
            );
        }
        Some(Commands::Share) => {
            let text = service.digest()?;
            println!("{}", text);
            println!();
            println!("https://wa.me/?text={}", urlencoding::encode(&text));
        }
        Some(Commands::Dashboard) | None => {
            let entries = service.list()?;
            dashboard::run(&entries, currency)?;
        }
    }
    Ok(())
}
