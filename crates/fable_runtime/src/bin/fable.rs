//! Fable CLI entry point.

use fable_runtime::{Repl, Session, demo};
use std::env;
use std::process::ExitCode;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    seed: Option<u64>,
    trace_size: Option<usize>,
    no_banner: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--no-banner" => config.no_banner = true,
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("--seed requires a value".into());
                }
                config.seed = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("invalid --seed value: {}", args[i]))?,
                );
            }
            "--trace-size" => {
                i += 1;
                if i >= args.len() {
                    return Err("--trace-size requires a value".into());
                }
                config.trace_size = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("invalid --trace-size value: {}", args[i]))?,
                );
            }
            arg => {
                return Err(format!("unknown option: {arg}").into());
            }
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("fable {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let registry = demo::registry()?;
    let world = demo::world(config.seed.unwrap_or(0));
    let session = match config.trace_size {
        Some(capacity) => Session::with_trace_capacity(registry, world, capacity)?,
        None => Session::new(registry, world)?,
    };

    let mut repl = Repl::new(session)?;
    if config.no_banner {
        repl = repl.without_banner();
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mFable\x1b[0m - Extensible turn-based fiction core

\x1b[1mUSAGE:\x1b[0m
    fable [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    --seed N           Seed the world's dice (default 0)
    --trace-size N     Cap the trace buffer at N events
    --no-banner        Skip the welcome banner

\x1b[1mEXAMPLES:\x1b[0m
    fable                       Start the demo world
    fable --seed 42             Same world, different dice
    fable --trace-size 100      Keep only the last 100 trace events

\x1b[1mREPL COMMANDS:\x1b[0m
    take lamp          Dispatch a command (verb, then entity ids)
    :turn              Advance the world one turn
    :trace [N]         Show recent trace events
    :help              Full meta-command list
    Ctrl+D             Exit"
    );
}
