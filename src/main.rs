mod handlers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use repairtrack::engine::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "repairtrack", version, about = "Track device repairs from booking to collection")]
struct Cli {
    /// Data directory (overrides REPAIRTRACK_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Initialize the repair store
    Init,
    /// Book a new repair
    Book {
        /// Device being repaired (e.g. "iPhone 13")
        device: String,
        #[arg(long, short = 'd')]
        description: Option<String>,
        #[arg(long, short = 'c')]
        customer: Option<String>,
        /// Quoted price in pence
        #[arg(long, short = 'q')]
        quote: Option<i64>,
    },
    /// Update a repair's status or dates
    Update {
        /// Booking reference or repair id
        repair: String,
        #[arg(long, short = 's')]
        status: Option<String>,
        /// When the repair is booked in (RFC 3339)
        #[arg(long)]
        scheduled: Option<String>,
        /// When the repair should be ready (RFC 3339)
        #[arg(long)]
        estimate: Option<String>,
    },
    /// Show a repair's progress and timeline
    Track {
        /// Booking reference or repair id
        reference: String,
        #[arg(long)]
        json: bool,
    },
    /// List repairs
    List {
        /// Only show repairs in this status
        #[arg(long, short = 's')]
        status: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env(cli.data_dir.as_deref());
    init_tracing(&config);

    match cli.command {
        Commands::Init | Commands::Book { .. } | Commands::Update { .. } => {
            dispatch_write_ops(&config, cli.command)
        }
        Commands::Track { .. } | Commands::List { .. } => dispatch_read_ops(&config, cli.command),
    }
}

fn dispatch_write_ops(config: &Config, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init => handlers::init::handle(config),
        Commands::Book {
            device,
            description,
            customer,
            quote,
        } => handlers::book::handle(config, device, description, customer, quote),
        Commands::Update {
            repair,
            status,
            scheduled,
            estimate,
        } => handlers::update::handle(
            config,
            &repair,
            status.as_deref(),
            scheduled.as_deref(),
            estimate.as_deref(),
        ),
        _ => unreachable!("Invalid write command dispatch"),
    }
}

fn dispatch_read_ops(config: &Config, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Track { reference, json } => handlers::track::handle(config, &reference, json),
        Commands::List { status } => handlers::list::handle(config, status.as_deref()),
        _ => unreachable!("Invalid read command dispatch"),
    }
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
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
