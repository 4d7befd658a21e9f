use circulation::application::engine::LendingEngine;
use circulation::domain::ports::{LibraryStoreBox, PaymentGateway};
use circulation::infrastructure::gateway::SandboxGateway;
use circulation::infrastructure::in_memory::InMemoryLibraryStore;
#[cfg(feature = "storage-rocksdb")]
use circulation::infrastructure::rocksdb::RocksDbLibraryStore;
use circulation::interfaces::csv::catalog_writer::CatalogWriter;
use circulation::interfaces::csv::command_reader::{Command, CommandReader, OpKind};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input circulation commands CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store: LibraryStoreBox = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => Box::new(RocksDbLibraryStore::open(db_path).into_diagnostic()?),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "persistent storage requires the storage-rocksdb feature"
            ));
        }
        None => Box::new(InMemoryLibraryStore::new()),
    };
    let engine = LendingEngine::new(store);
    let gateway = SandboxGateway::new();

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => run_command(&engine, &gateway, command).await,
            Err(e) => eprintln!("error: {e}"),
        }
    }

    // Final catalog snapshot to stdout.
    let books = engine.catalog().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = CatalogWriter::new(stdout.lock());
    writer.write_books(books).into_diagnostic()?;

    Ok(())
}

async fn run_command(engine: &LendingEngine, gateway: &dyn PaymentGateway, cmd: Command) {
    let patron = cmd.patron.as_deref().unwrap_or("");
    let book = cmd.book.unwrap_or(0);

    match cmd.op {
        OpKind::Add => {
            let result = engine
                .add_book(
                    cmd.title.as_deref().unwrap_or(""),
                    cmd.author.as_deref().unwrap_or(""),
                    cmd.isbn.as_deref().unwrap_or(""),
                    cmd.copies.unwrap_or(0),
                )
                .await;
            report_outcome(result);
        }
        OpKind::Borrow => report_outcome(engine.borrow_book(patron, book).await),
        OpKind::Return => report_outcome(engine.return_book(patron, book).await),
        OpKind::Fee => match engine.late_fee(patron, book).await {
            Ok(quote) => eprintln!(
                "fee: amount={} days={} status={}",
                quote.fee_amount, quote.days_overdue, quote.status
            ),
            Err(e) => eprintln!("error: {e}"),
        },
        OpKind::Search => {
            let term = cmd.term.as_deref().unwrap_or("");
            let field = cmd.field.as_deref().unwrap_or("title");
            match engine.search(term, field).await {
                Ok(hits) => {
                    let titles: Vec<&str> = hits.iter().map(|b| b.title.as_str()).collect();
                    eprintln!("search: {} result(s): {}", hits.len(), titles.join(", "));
                }
                Err(e) => eprintln!("error: {e}"),
            }
        }
        OpKind::Report => match engine.patron_report(patron).await {
            Ok(Some(report)) => match serde_json::to_string(&report) {
                Ok(json) => eprintln!("report: {json}"),
                Err(e) => eprintln!("error: {e}"),
            },
            Ok(None) => eprintln!("error: Invalid patron ID. Must be exactly 6 digits."),
            Err(e) => eprintln!("error: {e}"),
        },
        OpKind::Pay => match engine.pay_late_fee(patron, book, gateway).await {
            Ok(outcome) if outcome.success => eprintln!(
                "ok: {} transaction_id={}",
                outcome.message,
                outcome.transaction_id.unwrap_or_default()
            ),
            Ok(outcome) => eprintln!("error: {}", outcome.message),
            Err(e) => eprintln!("error: {e}"),
        },
        OpKind::Refund => {
            let Some(amount) = cmd.amount else {
                eprintln!("error: Invalid amount");
                return;
            };
            let tx = cmd.tx.as_deref().unwrap_or("");
            match engine.refund_late_fee(tx, amount, gateway).await {
                Ok(outcome) if outcome.success => eprintln!(
                    "ok: {} refund_id={}",
                    outcome.message,
                    outcome.refund_id.unwrap_or_default()
                ),
                Ok(outcome) => eprintln!("error: {}", outcome.message),
                Err(e) => eprintln!("error: {e}"),
            }
        }
    }
}

fn report_outcome(result: circulation::error::Result<String>) {
    match result {
        Ok(message) => eprintln!("ok: {message}"),
        Err(e) => eprintln!("error: {e}"),
    }
}
