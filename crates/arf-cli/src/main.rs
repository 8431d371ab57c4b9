use arf::commands::activate::{self, ActivateArgs};
use arf::commands::config::{self, ConfigAction};
use arf::commands::scaffold::{self, ScaffoldArgs};
use arf::commands::serve::{self, ServeArgs};
use arf::commands::{languages, list, localize, publish};
use arf::common::Context;
use arf::errors::CliError;
use arf::interrupt;
use arf::GlobalOpts;
use arf_lang::LanguageTable;
use arf_logger as logger;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "arf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Agentic Rules Framework toolkit",
    long_about = "arf scaffolds rule plugins, publishes the setup page configuration and activates rules for your agent."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new rule plugin (interactive when no flags are given)
    Scaffold(ScaffoldArgs),
    /// Rebuild web-config.json and embed it into setup.html
    Publish,
    /// Embed localization.json into setup.html
    Localize {
        /// Empty the embedded data and reset language options to English
        #[arg(long)]
        reset: bool,
    },
    /// Install rule documents as agent integration files
    Activate(ActivateArgs),
    /// Serve setup.html locally with file write access
    Serve(ServeArgs),
    /// List registered plugins
    List,
    /// Show the supported languages
    Languages {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configure the arf tool
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();
    if let Err(e) = interrupt::install() {
        logger::debug(&format!("Ctrl+C handler not installed: {}", e));
    }

    if let Err(e) = run(cli) {
        logger::error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("ARF_LOG")
                .unwrap_or_else(|_| logger::verbosity_to_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let table = LanguageTable::builtin();

    match cli.command {
        Commands::Config { action } => config::handle_config(action, &cli.global),
        Commands::Languages { json } => languages::handle_languages(&table, json),
        command => {
            let ctx = Context::load(&cli.global, table)?;
            match command {
                Commands::Scaffold(args) => scaffold::handle_scaffold(&ctx, &args),
                Commands::Publish => publish::handle_publish(&ctx),
                Commands::Localize { reset } => localize::handle_localize(&ctx, reset),
                Commands::Activate(args) => activate::handle_activate(&ctx, &args),
                Commands::Serve(args) => serve::handle_serve(&ctx, &args),
                Commands::List => list::handle_list(&ctx),
                Commands::Config { .. } | Commands::Languages { .. } => Ok(()),
            }
        }
    }
}
