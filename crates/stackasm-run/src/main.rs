//! stackasm-run - evaluates a StackAssembly script from disk.
//!
//! This binary is a deliberately small host: it services `yield` by printing
//! the operand stack and resuming, and it maps effects to exit codes so the
//! interpreter can sit in a shell pipeline. Anything richer (providing
//! services to scripts, inspecting memory, retry policies) belongs to a
//! custom host built on `stackasm-runtime`.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stackasm_lang::{parse, LineIndex};
use stackasm_runtime::{Effect, Machine, MachineConfig, DEFAULT_MEMORY_WORDS};

#[derive(Parser, Debug)]
#[command(name = "stackasm-run")]
#[command(about = "Evaluate a StackAssembly script")]
struct Cli {
    /// Path to the script to evaluate (conventionally `.stack`)
    script: PathBuf,

    /// Memory size in 32-bit words
    #[arg(long, default_value_t = DEFAULT_MEMORY_WORDS)]
    memory_words: usize,

    /// Operand stack cap; unbounded when omitted
    #[arg(long)]
    stack_limit: Option<usize>,

    /// Milliseconds to pause after each serviced yield, so loop output
    /// stays readable
    #[arg(long, default_value_t = 0)]
    step_delay_ms: u64,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stackasm_run=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.script) {
        Ok(source) => source,
        Err(err) => {
            error!("failed to read {}: {err}", cli.script.display());
            process::exit(1);
        }
    };

    let lines = LineIndex::new(&source);

    let program = match parse(&source) {
        Ok(program) => program,
        Err(err) => {
            let (line, col) = lines.line_col(err.span.start);
            error!("{}:{line}:{col}: {}", cli.script.display(), err.kind);
            process::exit(1);
        }
    };

    let mut machine = Machine::with_config(
        Arc::new(program),
        MachineConfig {
            memory_words: cli.memory_words,
            stack_limit: cli.stack_limit,
        },
    );

    loop {
        match machine.run() {
            Effect::Finished => {
                info!("evaluation finished");
                print_stack(&machine);
                process::exit(0);
            }
            Effect::Yield => {
                print_stack(&machine);

                machine
                    .resume()
                    .expect("machine reported a yield, so it must be resumable");

                if cli.step_delay_ms > 0 {
                    thread::sleep(Duration::from_millis(cli.step_delay_ms));
                }
            }
            effect => {
                // The counter points past the operator that failed.
                let failed = machine.program_counter().saturating_sub(1);
                let location = machine
                    .program()
                    .span_of(failed)
                    .map(|span| lines.line_col(span.start));

                match location {
                    Some((line, col)) => {
                        error!("{}:{line}:{col}: {effect}", cli.script.display());
                    }
                    None => error!("{effect}"),
                }

                print_stack(&machine);
                process::exit(2);
            }
        }
    }
}

fn print_stack(machine: &Machine) {
    let mut values = machine.stack().iter().peekable();

    print!("stack: ");
    while let Some(value) = values.next() {
        print!("{value}");
        if values.peek().is_some() {
            print!(" ");
        }
    }
    println!();
}
