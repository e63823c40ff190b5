//! SwapDesk terminal front-end.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swapdesk_controller::cli::{self, Command};
use swapdesk_controller::{
    ControllerConfig, FileSink, LiveController, NoopSink, Reconciler, SessionParams,
    SessionSink, SwapController, SwapSession,
};
use swapdesk_fx::Tables;

/// SwapDesk CLI
#[derive(Parser, Debug)]
#[command(name = "swapdesk")]
#[command(about = "Interactive currency swap quotes with a 1% fee")]
struct Args {
    /// Currency to sell
    #[arg(long)]
    from: Option<String>,

    /// Currency to buy
    #[arg(long)]
    to: Option<String>,

    /// Initial amount typed into the active field
    #[arg(long)]
    amount: Option<String>,

    /// Active field: input (sell) or output (buy)
    #[arg(long)]
    field: Option<String>,

    /// Session file to restore from and persist to
    #[arg(long)]
    session: Option<PathBuf>,
}

fn init_logging(config: &ControllerConfig) {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );

    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn restored_params(path: Option<&PathBuf>) -> SessionParams {
    let Some(path) = path.filter(|p| p.exists()) else {
        return SessionParams::default();
    };

    match FileSink::read(path) {
        Ok(snapshot) => {
            info!(path = %path.display(), "Restoring session");
            snapshot.into()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            SessionParams::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ControllerConfig::from_env();
    init_logging(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let tables = Tables::load(&config.table_source())?;

    let params = SessionParams {
        from: args.from,
        to: args.to,
        amount: args.amount,
        field: args.field,
    }
    .or(restored_params(args.session.as_ref()));

    let session = SwapSession::restore(&params, config.default_from, config.default_to);
    info!(session_id = %session.id, pair = %session.pair(), "Session started");

    let sink: Arc<dyn SessionSink> = match &args.session {
        Some(path) => Arc::new(FileSink::new(path.clone())),
        None => Arc::new(NoopSink),
    };

    let reconciler = Reconciler::new(&tables);
    let formatter = reconciler.formatter().clone();
    let live = LiveController::start(SwapController::new(session, reconciler, sink), &config);

    print!("{}", cli::render_view(&live.settled().await, &formatter));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", cli::HELP),
            Command::Rates => print!("{}", cli::render_rates(&tables.rates, &formatter)),
            Command::Currencies => print!("{}", cli::render_currencies(&tables.metadata)),
            Command::Show => print!("{}", cli::render_view(&live.view(), &formatter)),
            command => {
                command.dispatch(&live);
                print!("{}", cli::render_view(&live.settled().await, &formatter));
            }
        }
    }

    info!("Session closed");
    Ok(())
}
