//! unliminotify — Binary Entrypoint
//! Checks the cinema listings for Unlimited Screenings, texts subscribers about
//! new ones and records what was sent.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unliminotify::config::{load_settings, Overrides};
use unliminotify::listings::HttpListingsSource;
use unliminotify::notify::TwilioTransport;
use unliminotify::report::Console;
use unliminotify::{list_cinemas, run_check};

#[derive(Parser)]
#[command(name = "unliminotify")]
#[command(about = "Check for Cineworld Unlimited screenings")]
#[command(
    long_about = "Checks which Cineworld Unlimited screenings appear in the current listings \
                  and sends notifications for any that are new."
)]
#[command(version)]
struct Cli {
    /// Config file (default is $HOME/.unliminotify.toml or .json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// ID of the cinema to check
    #[arg(short = 'c', long)]
    cinema_id: Option<i64>,

    /// Path to the notifications file
    #[arg(short = 'f', long)]
    notifications_file: Option<PathBuf>,

    /// Numbers to send SMS notifications to
    #[arg(short = 's', long, value_delimiter = ',')]
    sms_numbers: Vec<String>,

    /// Disable SMS notification sending
    #[arg(long, hide = true)]
    disable_sms: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available cinemas
    Cinemas,
}

/// Logs go to stderr so stdout stays the operator report.
/// `RUST_LOG` wins over the verbose flag.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "unliminotify=debug,warn"
    } else {
        "unliminotify=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let flags = Overrides {
        cinema_id: cli.cinema_id,
        notifications_file: cli.notifications_file,
        sms_numbers: cli.sms_numbers,
        disable_sms: cli.disable_sms,
        verbose: cli.verbose,
    };
    let (settings, config_used) = load_settings(flags, cli.config.as_deref())?;

    let mut console = Console::stdout();
    if let Some(path) = &config_used {
        console.line(format!("Using config file: {}", path.display()));
    }

    let source = HttpListingsSource::new(settings.listings_url.clone());
    match cli.command {
        Some(Commands::Cinemas) => {
            list_cinemas(&source, &mut console).await?;
        }
        None => {
            if settings.sends_sms() && !settings.twilio.is_complete() {
                tracing::warn!("Twilio credentials are incomplete; sending will fail if anything is new");
            }
            let transport = TwilioTransport::new(&settings.twilio);
            run_check(&source, &transport, &settings, &mut console).await?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env if present; real environment variables still win.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(run_err) = e.downcast_ref::<unliminotify::RunError>() {
                tracing::error!(kind = run_err.kind(), "run failed");
            }
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
