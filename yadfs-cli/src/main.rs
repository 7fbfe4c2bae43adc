mod command;
mod config;
mod local_fs;
mod shell;
mod terminal;

use clap::Parser;
use config::Config;
use shell::Shell;
use terminal::Terminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use yadfs_core::Orchestrator;

#[derive(Parser)]
#[command(name = "yadfs")]
#[command(about = "Interactive client for the YADFS distributed file store")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "yadfs.yaml")]
    config: String,

    /// Master node address, overrides master.address from config
    #[arg(long, env = "MASTER_NODE")]
    master: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yadfs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut cfg = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(error) => {
            tracing::error!("Failed to load config: {}", error);
            std::process::exit(1);
        }
    };

    if let Some(master) = cli.master {
        tracing::info!("Using master override '{}'", master);
        cfg.master.address = master;
    }

    let orchestrator = match Orchestrator::connect(
        &cfg.master.address,
        &cfg.transport_options(),
        cfg.replica_policy(),
    ) {
        Ok(orchestrator) => orchestrator,
        Err(error) => {
            tracing::error!("Failed to set up client: {}", error);
            std::process::exit(1);
        }
    };

    if let Err(error) = run_shell(orchestrator).await {
        tracing::error!("Shell error: {}", error);
        std::process::exit(1);
    }
}

async fn run_shell(orchestrator: Orchestrator) -> yadfs_core::Result<()> {
    let mut shell = Shell::new(orchestrator, std::io::stdout());
    let mut terminal = Terminal::stdin();

    shell.print_help()?;
    shell.run(&mut terminal).await
}
