mod outline;
mod serve;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use fil_codegen::{GenerateOptions, StubPolicy};
use fil_core::{FilError, ParseOptions, DEFAULT_MAX_DEPTH};
use tracing_subscriber::EnvFilter;

/// Program shown on the landing page and printed by `fil sample`.
pub(crate) const SAMPLE_PROGRAM: &str = "x: value FROM some table.
y: first part OF x.
z: any value FROM [INNER value OF y] INTO nothing.";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// FIL to Python translator.
#[derive(Parser)]
#[command(name = "fil", version, about = "FIL to Python translator")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "fil_core=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a FIL program to Python
    Translate {
        /// Path to the FIL source file ("-" reads stdin)
        input: PathBuf,
        /// Write the generated Python here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Emit one stub per distinct signature and arity
        #[arg(long)]
        dedupe: bool,
        /// Deepest bracket nesting accepted
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Print the typed AST of a FIL program
    Parse {
        /// Path to the FIL source file ("-" reads stdin)
        input: PathBuf,
        /// Deepest bracket nesting accepted
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Print the sample FIL program
    Sample,

    /// Start the FIL HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Largest accepted source text in bytes (default: FIL_MAX_SOURCE_SIZE or 1 MiB)
        #[arg(long)]
        max_source_size: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Translate {
            input,
            out,
            dedupe,
            max_depth,
        } => {
            let options = GenerateOptions {
                stubs: if dedupe {
                    StubPolicy::DedupeBySignature
                } else {
                    StubPolicy::PerOccurrence
                },
                ..GenerateOptions::default()
            };
            cmd_translate(
                &input,
                out.as_deref(),
                &ParseOptions { max_depth },
                &options,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Parse { input, max_depth } => {
            cmd_parse(&input, &ParseOptions { max_depth }, cli.output, cli.quiet);
        }
        Commands::Sample => {
            println!("{}", SAMPLE_PROGRAM);
        }
        Commands::Serve {
            port,
            max_source_size,
        } => {
            let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
            if let Err(e) = rt.block_on(serve::start_server(port, max_source_size)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--log-level`.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(input: &Path) -> Result<String, String> {
    if input == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .map_err(|e| format!("error reading stdin: {}", e))?;
        return Ok(s);
    }
    std::fs::read_to_string(input)
        .map_err(|e| format!("error reading file '{}': {}", input.display(), e))
}

fn cmd_translate(
    input: &Path,
    out: Option<&Path>,
    parse: &ParseOptions,
    options: &GenerateOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let source = read_source(input).unwrap_or_else(|msg| {
        report_error(&msg, output, quiet);
        process::exit(1);
    });

    let python = match fil_codegen::translate(&source, parse, options) {
        Ok(text) => text,
        Err(e) => {
            report_fil_error(&e, output, quiet);
            process::exit(1);
        }
    };
    tracing::info!(input = %input.display(), bytes = python.len(), "translated");

    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &python) {
                let msg = format!("error writing '{}': {}", path.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
            if !quiet {
                match output {
                    OutputFormat::Text => eprintln!("wrote {}", path.display()),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::json!({ "written": path.display().to_string() })
                    ),
                }
            }
        }
        None => match output {
            OutputFormat::Text => print!("{}", python),
            OutputFormat::Json => {
                let json = serde_json::json!({ "output": python });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                );
            }
        },
    }
}

fn cmd_parse(input: &Path, parse: &ParseOptions, output: OutputFormat, quiet: bool) {
    let source = read_source(input).unwrap_or_else(|msg| {
        report_error(&msg, output, quiet);
        process::exit(1);
    });

    let program = match fil_core::parse_program_with(&source, parse) {
        Ok(p) => p,
        Err(e) => {
            report_fil_error(&e, output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Text => print!("{}", outline::render(&program)),
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&program)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}

fn report_fil_error(e: &FilError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", e);
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
