//! stockdal - Stock store command-line interface
//! Composition root: configuration, logging and DI wiring

mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::{debug, info};

use settings::Settings;
use stockdal_core::application::{interrupt_channel, StockService, StoreClient};
use stockdal_core::domain::Stock;
use stockdal_core::VERSION;
use stockdal_infra_sqlite::{create_pool, run_migrations, SqliteStockStore};

#[derive(Parser)]
#[command(name = "stockdal")]
#[command(about = "Stock store CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL or path (overrides configuration)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Configuration file (default: ./stockdal.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a stock, replacing any stock with the same symbol
    Save {
        symbol: String,
        price: Decimal,
        quantity: i64,
    },

    /// Show one stock
    Get { symbol: String },

    /// List all stocks
    List,

    /// Delete one or more stocks (several symbols are deleted in one transaction)
    Delete {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[derive(Tabled)]
struct StockRow {
    symbol: String,
    price: String,
    quantity: i64,
}

impl From<&Stock> for StockRow {
    fn from(stock: &Stock) -> Self {
        Self {
            symbol: stock.symbol.clone(),
            price: stock.price.to_string(),
            quantity: stock.quantity,
        }
    }
}

fn print_stocks(stocks: &[Stock], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stocks)?);
    } else if stocks.is_empty() {
        println!("{}", "No stocks".yellow());
    } else {
        let rows: Vec<StockRow> = stocks.iter().map(StockRow::from).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}

/// Create the directory holding a file-backed database
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    if database_url.starts_with("sqlite:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut settings = Settings::load(cli.config.as_deref()).context("Invalid configuration")?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }

    // 2. Initialize logging
    logging::init_logging(&settings.log_format)?;
    info!("stockdal v{} starting...", VERSION);
    debug!(?settings, "Configuration loaded");

    // 3. Initialize database
    let sqlite_settings = settings.sqlite_settings();
    ensure_parent_dir(&sqlite_settings.database_url)?;
    info!(database_url = %sqlite_settings.database_url, "Opening database...");

    let pool = create_pool(&sqlite_settings)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let (interrupt_tx, interrupt_token) = interrupt_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            interrupt_tx.interrupt();
        }
    });

    let store = Arc::new(SqliteStockStore::new(pool.clone()));
    let client =
        StoreClient::new(store, settings.retry_policy()).with_interrupt(interrupt_token.clone());
    let service = StockService::new(Arc::new(client));

    // 5. Run command, abandoning it on Ctrl-C
    let result = interrupt_token
        .run_until_interrupted(run(cli.command, cli.json, &service))
        .await;

    pool.close().await;
    result
}

async fn run(command: Commands, json: bool, service: &StockService) -> Result<()> {
    match command {
        Commands::Save {
            symbol,
            price,
            quantity,
        } => {
            let stock = Stock::new(symbol, price, quantity);
            service.save(&stock).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stock)?);
            } else {
                println!("{}", format!("✓ Saved {}", stock).green().bold());
            }
        }

        Commands::Get { symbol } => match service.find_one(&symbol).await? {
            Some(stock) => print_stocks(&[stock], json)?,
            None => anyhow::bail!("Stock {} not found", symbol),
        },

        Commands::List => {
            let stocks = service.find_all().await?;
            print_stocks(&stocks, json)?;
        }

        Commands::Delete { symbols } => {
            if let [symbol] = symbols.as_slice() {
                service.delete(symbol).await?;
                println!("{}", format!("✓ Deleted {}", symbol).green().bold());
            } else {
                let removed = service.delete_all(&symbols).await?;
                println!(
                    "{}",
                    format!("✓ Deleted {} of {} stocks", removed, symbols.len())
                        .green()
                        .bold()
                );
            }
        }
    }

    Ok(())
}
