use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use deepmerge::config::{Config, LogFormat};
use deepmerge::input::{load_arguments, render, OutputFormat};
use deepmerge::{logging, serve, Dispatcher};
use deepmerge_runtime::{Provider, MERGE_OBJECTS};

#[derive(Parser)]
#[command(name = "deepmerge")]
#[command(about = "Deep-merge configuration values, keeping track of unknowns", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file (TOML)
    #[arg(long, env = "DEEPMERGE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log format, overriding the configuration file
    #[arg(long, env = "DEEPMERGE_LOG_FORMAT", value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a function with arguments read from files
    Call {
        /// Function to call
        #[arg(short, long, default_value = MERGE_OBJECTS)]
        function: String,

        /// Read arguments in the typed encoding, which can express unknown values
        #[arg(long)]
        typed: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,

        /// Argument files in order; `-` reads standard input
        files: Vec<PathBuf>,
    },

    /// List the available functions and their signatures
    Functions,

    /// Answer line-delimited JSON function calls on stdin/stdout
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.log, cli.log_format, cli.verbose, cli.debug)?;
    debug!("Configuration: {:?}", config);

    let dispatcher = Dispatcher::new(Arc::new(Provider::standard()), config.server.clone());

    match cli.command {
        Commands::Call {
            function,
            typed,
            output,
            files,
        } => handle_call(&dispatcher, &function, typed, output, &files).await,
        Commands::Functions => {
            let signatures = dispatcher.provider().signatures();
            println!("{}", serde_json::to_string_pretty(&signatures)?);
            Ok(())
        }
        Commands::Serve => handle_serve(&dispatcher).await,
    }
}

async fn handle_call(
    dispatcher: &Dispatcher,
    function: &str,
    typed: bool,
    output: OutputFormat,
    files: &[PathBuf],
) -> Result<()> {
    let arguments = load_arguments(files, typed)?;

    info!("Calling {} with {} arguments", function, arguments.len());
    let result = dispatcher
        .call(function, arguments)
        .await
        .map_err(|e| match e.argument.and_then(|i| files.get(i)) {
            Some(path) => anyhow::anyhow!("{}: {}", path.display(), e.message),
            None => anyhow::Error::new(e),
        })
        .with_context(|| format!("Call to {} failed", function))?;

    println!("{}", render(&result, output)?);
    Ok(())
}

async fn handle_serve(dispatcher: &Dispatcher) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    tokio::select! {
        result = serve(dispatcher, stdin, &mut stdout) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}
