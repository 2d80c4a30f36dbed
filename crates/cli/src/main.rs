//! Cache hierarchy simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Trace replay:** Run an address trace through L1/L2 and report every access.
//! 2. **Assembly:** Turn a program into an address trace, optionally replaying it.
//! 3. **Program run:** Execute a program on the interpreter with live cache accesses.
//!
//! Every mode ends with the statistics report; `--json` switches step output to
//! one JSON object per line.

use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memsim_core::common::{SimError, SimResult};
use memsim_core::config::Config;
use memsim_core::core::AccessResult;
use memsim_core::core::cpu::StepOutcome;
use memsim_core::sim::{Simulator, loader};

#[derive(Parser, Debug)]
#[command(
    name = "memsim",
    author,
    version,
    about = "Two-level cache hierarchy simulator",
    long_about = "Replay address traces or run small assembly programs through a configurable L1/L2 cache model.\n\nExamples:\n  memsim trace accesses.txt\n  memsim asm loop.s --replay --stats summary,misses\n  memsim run loop.s --config direct_mapped.json --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    opts: Options,
}

#[derive(Args, Debug)]
struct Options {
    /// JSON configuration file (missing fields take defaults).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Print each step as a JSON object.
    #[arg(long, global = true)]
    json: bool,

    /// Statistics sections to print (summary, misses, l2, energy). Default: all.
    #[arg(long, global = true, value_delimiter = ',')]
    stats: Vec<String>,

    /// Log filter (e.g. `debug`, `memsim_core=trace`). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay an address trace file.
    Trace {
        /// Trace file: one address, `name = value`, or `Write addr value` per line.
        path: String,
    },

    /// Assemble a program into an address trace.
    Asm {
        /// Assembly source file.
        path: String,

        /// Replay the generated trace through the cache hierarchy.
        #[arg(long)]
        replay: bool,
    },

    /// Execute a program on the interpreter.
    Run {
        /// Assembly source file.
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.opts.log_level.as_deref());

    if let Err(e) = dispatch(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber.
///
/// `--log-level` wins over `RUST_LOG`; with neither, only warnings are shown.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn dispatch(cli: &Cli) -> SimResult<()> {
    let config = match &cli.opts.config {
        Some(path) => loader::load_config_file(path)?,
        None => Config::default(),
    };
    tracing::debug!(?config, "configuration loaded");
    let mut sim = Simulator::new(config)?;

    match &cli.command {
        Commands::Trace { path } => {
            let ops = loader::load_trace_file(path)?;
            sim.load_trace_ops(ops)?;
            replay(&mut sim, &cli.opts);
        }
        Commands::Asm { path, replay: with_replay } => {
            let with_replay = *with_replay;
            let source = loader::load_text(path)?;
            let assembly = sim.assemble(&source)?;
            if !(cli.opts.json && with_replay) {
                println!("{}", assembly.text());
            }
            report_diagnostic(assembly.diagnostic.as_ref());
            if with_replay {
                sim.load_trace_ops(assembly.trace)?;
                replay(&mut sim, &cli.opts);
            }
        }
        Commands::Run { path } => {
            let source = loader::load_text(path)?;
            sim.load_program(&source)?;
            let run = sim.run()?;
            for (idx, outcome) in run.steps.iter().enumerate() {
                print_outcome(idx, outcome, cli.opts.json);
            }
            report_diagnostic(run.diagnostic.as_ref());
            print_stats(&sim, &cli.opts);
        }
    }
    Ok(())
}

/// Replays the loaded trace, printing each access and then the statistics.
fn replay(sim: &mut Simulator, opts: &Options) {
    let mut idx = 0;
    while let Some(access) = sim.step_trace() {
        if opts.json {
            println!("{}", to_json(&access));
        } else {
            println!("{}", format_access(idx, &access));
        }
        idx += 1;
    }
    print_stats(sim, opts);
}

fn print_outcome(idx: usize, outcome: &StepOutcome, json: bool) {
    if json {
        println!("{}", to_json(outcome));
        return;
    }
    match outcome {
        StepOutcome::Memory { access, alu } => {
            println!("{}  [{alu}]", format_access(idx, access));
        }
        StepOutcome::Alu { alu } => println!("{idx:>5}  {alu}"),
        StepOutcome::Idle => {}
    }
}

/// One line per access: kind, address, outcome, location, data, energy.
fn format_access(idx: usize, a: &AccessResult) -> String {
    let outcome = if a.is_hit {
        "HIT ".to_string()
    } else {
        format!("MISS ({})", a.miss_type)
    };
    let data = a
        .data
        .map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(
        "{idx:>5}  {:<5} 0x{:08X}  {outcome:<18} set={:<3} way={:<2} tag=0x{:X}  l2={}  data={data}  E={:.2} pJ",
        a.access_type.to_string(),
        a.address,
        a.set_index,
        a.way_index,
        a.tag,
        if a.l2_hit { "hit" } else { "-" },
        a.energy,
    )
}

fn print_stats(sim: &Simulator, opts: &Options) {
    if opts.json {
        println!("{}", to_json(sim.stats()));
    } else {
        println!();
        sim.stats().print_sections(&opts.stats);
    }
}

fn report_diagnostic(diagnostic: Option<&SimError>) {
    if let Some(d) = diagnostic {
        eprintln!("warning: {d}");
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}
