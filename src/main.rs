//! OHX script host - CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ohx_script::script::{Console, StdoutConsole, TracingConsole};
use ohx_script::util::config::{load_config, load_default, HostConfig};
use ohx_script::util::logger::{self, LogLevel};
use ohx_script::{bindings_from_config, run_hello, NAME, VERSION};
use std::path::PathBuf;
use std::rc::Rc;

/// Runs rule scripts against in-memory host capabilities
#[derive(Parser, Debug)]
#[command(name = "ohx-script")]
#[command(author = "OHX Team")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (otherwise $OHX_SCRIPT_CONFIG, then ./ohx-script.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the hello script and print the final output slot
    Run {
        /// Override the delay before the output is overwritten
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Override the imported `a_string`
        #[arg(long, value_name = "TEXT")]
        a_string: Option<String>,

        /// Where console.log lines go
        #[arg(long, value_enum, default_value_t = ConsoleKind::Stdout)]
        console: ConsoleKind,
    },

    /// List installed host functions
    Functions,

    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConsoleKind {
    /// Plain lines on stdout
    Stdout,
    /// `tracing` events on stderr
    Tracing,
}

fn load(args: &Args) -> Result<HostConfig> {
    match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => load_default().context("Failed to load config"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = load(&args)?;

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.log.level
    };
    logger::init_with_level(level);

    if args.verbose {
        eprintln!("{} version: {}", NAME, VERSION);
        eprintln!("Host: {}", std::env::consts::OS);
    }

    match args.command {
        Commands::Run {
            delay_ms,
            a_string,
            console,
        } => {
            if let Some(delay_ms) = delay_ms {
                config.script.delay_ms = delay_ms;
            }
            if let Some(a_string) = a_string {
                config.script.a_string = a_string;
            }
            let console: Rc<dyn Console> = match console {
                ConsoleKind::Stdout => Rc::new(StdoutConsole),
                ConsoleKind::Tracing => Rc::new(TracingConsole),
            };

            let report = run_hello(&config, &bindings_from_config(&config), console)?;
            println!("{}", report.describe());
        }
        Commands::Functions => {
            let registry = bindings_from_config(&config).registry();
            for func in registry.functions() {
                println!("{} (arity {})", func.name, func.arity);
            }
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}
