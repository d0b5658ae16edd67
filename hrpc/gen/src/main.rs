//! hrpc compiler
//!
//! Compiles an hrpc schema into a JavaScript RPC binding.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use hrpc_gen::errors::GeneratorError;
use hrpc_gen::options::{DEFAULT_FLATTENED_SERVICE, DEFAULT_RUNTIME, GeneratorOptions, LineEnding, SessionLayout};
use hrpc_gen::output::{generate_and_write, read_schema};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: hrpc schema.proto [--rpc=rpc.js] [--messages=rpc-messages.js]";

/// hrpc compiler - turns a schema into a typed RPC binding
#[derive(Parser, Debug)]
#[command(name = "hrpc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema file to compile
    schema: Option<PathBuf>,

    /// Output path of the binding module
    #[arg(short, long, default_value = "rpc.js")]
    rpc: PathBuf,

    /// Output path of the codec module
    #[arg(short, long, default_value = "rpc-messages.js")]
    messages: PathBuf,

    /// Promote one service's methods onto the session (`-s` alone means RPC)
    #[arg(
        short,
        long,
        value_name = "NAME",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_FLATTENED_SERVICE
    )]
    service: Option<String>,

    /// Module specifier of the runtime package
    #[arg(long, value_name = "MODULE", default_value = DEFAULT_RUNTIME)]
    runtime: String,

    /// Line terminator of the generated files
    #[arg(long, value_enum, default_value_t = LineEnding::Lf)]
    line_ending: LineEnding,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            rpc_path: self.rpc.clone(),
            messages_path: self.messages.clone(),
            layout: match &self.service {
                Some(service) => SessionLayout::Flattened {
                    service: service.clone(),
                },
                None => SessionLayout::PerService,
            },
            line_ending: self.line_ending,
            runtime: self.runtime.clone(),
        }
    }
}

/// Initialize tracing subscriber based on verbosity level.
///
/// `RUST_LOG` takes precedence. Without `-v` only warnings are shown, so the
/// id renumbering warning is always visible.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,hrpc_gen=info,hrpc_define=info".to_string(),
            2 => "info,hrpc_gen=debug,hrpc_define=debug".to_string(),
            _ => "debug,hrpc_gen=trace,hrpc_define=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(cli: &Cli, schema: &Path) -> Result<(), GeneratorError> {
    let options = cli.options();
    info!(schema = %schema.display(), "compiling");

    let source = read_schema(schema)?;
    generate_and_write(&source, &options, cli.dry_run)?;

    if !cli.dry_run && cli.verbose > 0 {
        eprintln!("Wrote {}", options.messages_path.display());
        eprintln!("Wrote {}", options.rpc_path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(schema) = cli.schema.clone() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(1);
    };

    init_tracing(cli.verbose);

    match run(&cli, &schema) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::from(err.exit_code())
        }
    }
}
