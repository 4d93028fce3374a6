mod cli;
mod core;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "costwatch",
    about = "Daily cloud cost report with history and threshold alerts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest day's costs, store them and send the report
    Run {
        /// Use synthetic data instead of querying the billing source
        #[arg(long)]
        test_data: bool,

        /// Invocation options as JSON, e.g. '{"use_test_data": true}'
        #[arg(long)]
        event: Option<String>,
    },
    /// Read back stored daily reports
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show the report stored for a date (YYYY-MM-DD)
    Show { date: String },
    /// List every stored report
    List,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print config and history file locations
    Path,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "costwatch=debug,info" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output_opts = cli::output::OutputOptions {
        format: if cli.json {
            cli::output::OutputFormat::Json
        } else {
            match cli.format.as_deref() {
                Some("json") => cli::output::OutputFormat::Json,
                _ => cli::output::OutputFormat::Text,
            }
        },
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color),
    };

    match cli.command {
        None => cli::run_cmd::run(None, false, &output_opts).await?,
        Some(Commands::Run { test_data, event }) => {
            cli::run_cmd::run(event, test_data, &output_opts).await?
        }
        Some(Commands::History { action }) => match action {
            HistoryAction::Show { date } => cli::history_cmd::show(&date, &output_opts).await?,
            HistoryAction::List => cli::history_cmd::list(&output_opts).await?,
        },
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init()?,
            ConfigAction::Check => cli::config_cmd::check()?,
            ConfigAction::Path => cli::config_cmd::path()?,
        },
    }

    Ok(())
}
