use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filescope::Category;
use filescope::cli::FORMATS;
use filescope::cli::commands::{analyze, batch, classify, config};

#[derive(Parser)]
#[command(name = "filescope")]
#[command(
    version,
    about = "Heuristic file categorization and analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single file
    Analyze {
        #[arg(help = "File to analyze")]
        file: PathBuf,
        #[arg(long, help = "Force a category instead of detecting it")]
        category: Option<Category>,
        #[arg(long, help = "Override the guessed MIME type")]
        mime: Option<String>,
        #[arg(long, help = "Attach insights from the configured enrichment provider")]
        enrich: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = FORMATS,
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Analyze every file under a directory
    Batch {
        #[arg(help = "Directory to scan")]
        dir: PathBuf,
        #[arg(long, short = 'j', help = "Files analyzed concurrently")]
        concurrency: Option<usize>,
        #[arg(long, help = "Include hidden files and directories")]
        hidden: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = FORMATS,
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Print the category for a path or extension
    Classify {
        #[arg(help = "Path or extension, e.g. src/main.py or .csv")]
        target: String,
        #[arg(long, help = "MIME type to classify with")]
        mime: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = FORMATS,
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a configuration template
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mfilescope encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            category,
            mime,
            enrich,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(analyze::run(analyze::AnalyzeOptions {
                file,
                category,
                mime,
                enrich,
                format,
            }))?;
        }
        Commands::Batch {
            dir,
            concurrency,
            hidden,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(batch::run(batch::BatchOptions {
                dir,
                concurrency,
                hidden,
                format,
            }))?;
        }
        Commands::Classify { target, mime } => {
            classify::run(&target, mime.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => config::show(&format)?,
            ConfigAction::Path => config::path()?,
            ConfigAction::Init { global, force } => config::init(global, force)?,
        },
    }

    Ok(())
}
