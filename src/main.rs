use budget_jobs::application::renewal::RenewalJob;
use budget_jobs::domain::category::RenewalBasis;
use budget_jobs::interfaces::http::log_relay;
use budget_jobs::interfaces::json::fixture_reader::{Fixture, FixtureReader};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one balance renewal pass over a users/categories JSON file.
    ///
    /// The scheduler (cron or equivalent) is expected to invoke this on a
    /// fixed cadence; each invocation is independent.
    Run {
        /// Input JSON file: users with embedded categories
        data: PathBuf,

        /// Policy for computing the next due date of a renewed category
        #[arg(long, value_enum, default_value = "from-now")]
        basis: BasisArg,
    },
    /// Serve the client log relay over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BasisArg {
    /// Advance one interval past the execution moment (missed cycles collapse)
    FromNow,
    /// Advance from the previous due date until strictly after now
    CatchUp,
}

impl From<BasisArg> for RenewalBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::FromNow => RenewalBasis::FromNow,
            BasisArg::CatchUp => RenewalBasis::CatchUp,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for the `run` snapshot.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run { data, basis } => run_renewal(data, basis.into()).await,
        Command::Serve { addr } => serve_log_relay(addr).await,
    }
}

async fn run_renewal(data: PathBuf, basis: RenewalBasis) -> Result<()> {
    let file = File::open(data).into_diagnostic()?;
    let fixture = FixtureReader::new(file).fixture().into_diagnostic()?;
    let store = fixture.into_store().await;

    let job = RenewalJob::new(Box::new(store.clone()), basis);
    let report = job.run(Utc::now()).await.into_diagnostic()?;
    for failure in &report.failures {
        eprintln!(
            "Error renewing category {} of user {}: {}",
            failure.category_id, failure.user_id, failure.reason
        );
    }

    let snapshot = Fixture::from_snapshot(store.snapshot().await);
    let output = serde_json::to_string_pretty(&snapshot).into_diagnostic()?;
    println!("{output}");
    Ok(())
}

async fn serve_log_relay(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    info!(%addr, "log relay listening");
    axum::serve(listener, log_relay::router())
        .await
        .into_diagnostic()?;
    Ok(())
}
