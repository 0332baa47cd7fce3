use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payhere_ipn::application::processor::NotificationProcessor;
use payhere_ipn::config::{AcquirerArgs, ServeArgs};
use payhere_ipn::domain::checkout::{Buyer, CheckoutRequest, checkout_fields};
use payhere_ipn::domain::ports::{Lookup, TransactionRepositoryBox};
use payhere_ipn::infrastructure::http_gateway::HttpEchoGateway;
use payhere_ipn::infrastructure::in_memory::InMemoryTransactionRepository;
use payhere_ipn::infrastructure::log_notifier::LogNotifier;
use payhere_ipn::interfaces::csv::transaction_reader::TransactionReader;
use payhere_ipn::interfaces::http::{AppState, build_router};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the payment notification webhook server
    Serve(ServeArgs),
    /// Print the checkout fields for an order as JSON
    Checkout(CheckoutArgs),
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long)]
    reference: String,

    #[arg(long)]
    amount: Decimal,

    #[arg(long, default_value = "LKR")]
    currency: String,

    #[arg(long, default_value = "")]
    company: String,

    /// Public base URL the gateway calls back on
    #[arg(long)]
    base_url: String,

    /// Buyer pays from the merchant's country
    #[arg(long)]
    domestic: bool,

    #[command(flatten)]
    acquirer: AcquirerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Checkout(args) => checkout(args),
    }
}

fn open_repository(db_path: Option<&Path>) -> Result<TransactionRepositoryBox> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        use payhere_ipn::infrastructure::rocksdb::RocksDBTransactionRepository;
        let store = RocksDBTransactionRepository::open(db_path).into_diagnostic()?;
        return Ok(Box::new(store));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    Ok(Box::new(InMemoryTransactionRepository::new()))
}

async fn seed(repository: &TransactionRepositoryBox, path: &Path) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    let reader = TransactionReader::new(file);
    for tx_result in reader.transactions() {
        match tx_result {
            Ok(tx) => {
                if repository.find(&tx.reference).await.into_diagnostic()? == Lookup::NotFound {
                    repository.create(tx).await.into_diagnostic()?;
                } else {
                    tracing::debug!(reference = %tx.reference, "transaction already stored, not seeding");
                }
            }
            Err(e) => {
                eprintln!("Error reading transaction: {}", e);
            }
        }
    }
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let repository = open_repository(args.db_path.as_deref())?;
    if let Some(path) = &args.transactions {
        seed(&repository, path).await?;
    }

    let acquirer = args.acquirer.to_config();
    tracing::info!(
        environment = %acquirer.environment,
        echo_url = acquirer.echo_url(),
        use_ipn = acquirer.use_ipn,
        "acquirer configured"
    );

    let processor = NotificationProcessor::new(
        repository,
        Arc::new(HttpEchoGateway::new(args.echo_timeout_ms)),
        Arc::new(LogNotifier::new()),
        acquirer,
    );
    let app = build_router(AppState {
        processor: Arc::new(processor),
    });

    let listener = tokio::net::TcpListener::bind(&args.bind_addr)
        .await
        .into_diagnostic()?;
    tracing::info!("listening on {}", args.bind_addr);
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

fn checkout(args: CheckoutArgs) -> Result<()> {
    let config = args.acquirer.to_config();
    let request = CheckoutRequest {
        reference: args.reference,
        amount: args.amount,
        currency_code: args.currency,
        company_name: args.company,
        buyer: Buyer::default(),
        domestic: args.domestic,
    };
    let fields = checkout_fields(&config, &request, &args.base_url);
    println!("{}", serde_json::to_string_pretty(&fields).into_diagnostic()?);
    Ok(())
}
