use clap::{Parser, Subcommand};
use gateway_fees::application::addon::AddonModule;
use gateway_fees::application::estimator::CheckoutEstimator;
use gateway_fees::application::hooks::HookDispatcher;
use gateway_fees::application::reconciler::InvoiceReconciler;
use gateway_fees::application::rule_store::FeeRuleStore;
use gateway_fees::config::Config;
use gateway_fees::domain::calculator::{compute_fee, format_amount};
use gateway_fees::domain::cart::{CartEstimate, CheckoutSession};
use gateway_fees::domain::ports::SettingsStoreRef;
use gateway_fees::domain::settings::Gateway;
use gateway_fees::infrastructure::in_memory::{
    InMemoryGatewayCatalog, InMemoryInvoiceService, InMemorySettingsStore,
};
use gateway_fees::interfaces::csv::estimate_writer::EstimateWriter;
use gateway_fees::interfaces::csv::invoice_reader::InvoiceReader;
use gateway_fees::interfaces::csv::invoice_writer::InvoiceWriter;
use gateway_fees::interfaces::csv::settings_reader::SettingsReader;
use gateway_fees::interfaces::events::EventReader;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Addon settings CSV (module,setting,value) loaded before the command runs
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Path to persistent settings database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the surcharge for one gateway and invoice total
    Quote {
        #[arg(long)]
        gateway: String,
        #[arg(long)]
        total: Decimal,
    },
    /// Print the checkout estimate of every configured gateway as CSV
    Estimate {
        /// Cart total as displayed, e.g. "$100.00 USD"
        #[arg(long, default_value = "")]
        display: String,
        #[arg(long)]
        total: Decimal,
    },
    /// Replay host hook events against invoices and print the resulting line items
    Replay {
        /// Invoices CSV (invoice,user,payment_method,item,type,notes,description,amount,taxed)
        #[arg(long)]
        invoices: PathBuf,
        /// Hook events, one JSON object per line
        #[arg(long)]
        events: PathBuf,
        /// Write rendered hook markup to this file
        #[arg(long)]
        markup: Option<PathBuf>,
    },
    /// Print the addon configuration schema as JSON
    Schema {
        /// Gateways as name or name=Display Name, comma separated
        #[arg(long, value_delimiter = ',')]
        gateways: Vec<String>,
    },
    /// Seed default fee keys for the given gateways
    Activate {
        /// Gateways as name or name=Display Name, comma separated
        #[arg(long, value_delimiter = ',')]
        gateways: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().into_diagnostic()?;

    let settings = open_settings(cli.db_path)?;
    if let Some(path) = cli.settings {
        import_settings(&settings, path).await?;
    }
    let rules = FeeRuleStore::new(settings.clone(), config.module.clone());

    match cli.command {
        Command::Quote { gateway, total } => {
            let rule = rules.list_rules().await.into_diagnostic()?.rule_for(&gateway);
            let fee = compute_fee(total, &rule).into_diagnostic()?;
            println!("{}", format_amount(fee));
        }
        Command::Estimate { display, total } => {
            let mut session = CheckoutSession::new();
            session.record_cart_totals(CartEstimate::new(display, total));
            let estimator = CheckoutEstimator::new(rules, &config);
            let table = estimator
                .estimates(&session)
                .await
                .into_diagnostic()?
                .unwrap_or_default();
            let stdout = io::stdout();
            EstimateWriter::new(stdout.lock())
                .write_estimates(&table)
                .into_diagnostic()?;
        }
        Command::Replay {
            invoices,
            events,
            markup,
        } => replay(rules, &config, invoices, events, markup).await?,
        Command::Schema { gateways } => {
            let addon = addon_module(settings, &gateways, &config);
            let schema = addon.config().await.into_diagnostic()?;
            println!("{}", serde_json::to_string_pretty(&schema).into_diagnostic()?);
        }
        Command::Activate { gateways } => {
            let addon = addon_module(settings, &gateways, &config);
            let report = addon.activate().await.into_diagnostic()?;
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
    }

    Ok(())
}

async fn replay(
    rules: FeeRuleStore,
    config: &Config,
    invoices: PathBuf,
    events: PathBuf,
    markup: Option<PathBuf>,
) -> Result<()> {
    let service = Arc::new(InMemoryInvoiceService::new());
    let file = File::open(invoices).into_diagnostic()?;
    for invoice in InvoiceReader::new(file).invoices().into_diagnostic()? {
        service.insert_invoice(invoice).await.into_diagnostic()?;
    }

    let dispatcher = HookDispatcher::new(
        InvoiceReconciler::new(service.clone(), rules.clone(), config),
        CheckoutEstimator::new(rules, config),
    );
    let mut markup_out = match markup {
        Some(path) => Some(File::create(path).into_diagnostic()?),
        None => None,
    };

    // Process events
    let mut session = CheckoutSession::new();
    let file = File::open(events).into_diagnostic()?;
    for event_result in EventReader::new(BufReader::new(file)).events() {
        match event_result {
            Ok(event) => match dispatcher.dispatch(event, &mut session).await {
                Ok(Some(rendered)) if !rendered.is_empty() => {
                    if let Some(out) = markup_out.as_mut() {
                        writeln!(out, "{}", rendered).into_diagnostic()?;
                    }
                }
                Ok(_) => {}
                Err(e) => eprintln!("Error processing event: {}", e),
            },
            Err(e) => eprintln!("Error reading event: {}", e),
        }
    }

    let stdout = io::stdout();
    let mut writer = InvoiceWriter::new(stdout.lock());
    writer
        .write_invoices(service.invoices().await)
        .into_diagnostic()?;

    Ok(())
}

async fn import_settings(settings: &SettingsStoreRef, path: PathBuf) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    for setting in SettingsReader::new(file).settings() {
        match setting {
            Ok(setting) => settings.put(setting).await.into_diagnostic()?,
            Err(e) => eprintln!("Error reading setting: {}", e),
        }
    }
    Ok(())
}

fn addon_module(settings: SettingsStoreRef, gateways: &[String], config: &Config) -> AddonModule {
    let gateways = gateways
        .iter()
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, display)) => Gateway::new(name.trim()).with_display_name(display.trim()),
            None => Gateway::new(entry.trim()),
        })
        .collect();
    AddonModule::new(
        settings,
        Arc::new(InMemoryGatewayCatalog::new(gateways)),
        config.module.clone(),
    )
}

#[cfg(feature = "storage-rocksdb")]
fn open_settings(db_path: Option<PathBuf>) -> Result<SettingsStoreRef> {
    use gateway_fees::infrastructure::rocksdb::RocksDbSettingsStore;

    match db_path {
        Some(db_path) => {
            let store = RocksDbSettingsStore::open(db_path).into_diagnostic()?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemorySettingsStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_settings(db_path: Option<PathBuf>) -> Result<SettingsStoreRef> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Arc::new(InMemorySettingsStore::new()))
}
