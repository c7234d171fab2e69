use ansi_term::Style;
use clap::Parser;
use linefeed::{Interface, ReadResult, Signal};
use minic::lang::{lex, Error};
use minic::mach::{Limits, Runtime, StdConsole};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "minic")]
#[command(about = "MiniC compiler and stack machine", long_about = None)]
struct Args {
    /// Source file to run; starts the interactive prompt when omitted
    file: Option<PathBuf>,
    /// Print the token stream before running
    #[arg(long)]
    tokens: bool,
    /// Print the instruction listing before running
    #[arg(long)]
    listing: bool,
    /// Operand stack depth
    #[arg(long, default_value_t = 256)]
    stack: usize,
    /// Call frame depth
    #[arg(long, default_value_t = 100)]
    frames: usize,
    /// Instruction stream capacity in cells
    #[arg(long, default_value_t = 2000)]
    program: usize,
    /// Nesting depth of control constructs and calls
    #[arg(long, default_value_t = 200)]
    depth: usize,
}

impl Args {
    fn limits(&self) -> Limits {
        Limits::new()
            .stack(self.stack)
            .frames(self.frames)
            .program(self.program)
            .depth(self.depth)
    }
}

pub fn main() {
    let args = Args::parse();
    let filter = EnvFilter::try_from_env("MINIC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    debug!(?args, "starting");

    let mut runtime = Runtime::with_limits(StdConsole, args.limits());
    let interrupted = runtime.interrupt_handle();
    if let Err(error) = ctrlc::set_handler(move || {
        interrupted.store(true, Ordering::SeqCst);
    }) {
        warn!(%error, "Ctrl-C handler not installed");
    }

    let status = match &args.file {
        Some(path) => run_file(&mut runtime, &args, path),
        None => match main_loop(&mut runtime) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("{}", error);
                1
            }
        },
    };
    std::process::exit(status);
}

fn run_file(runtime: &mut Runtime, args: &Args, path: &Path) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("minic: {}: {}", path.display(), error);
            return 1;
        }
    };
    if args.tokens {
        for (line, token) in lex(&source) {
            println!("{}\t{}", line, token);
        }
    }
    let entry = match runtime.compile(&source) {
        Ok(entry) => entry,
        Err(error) => return report(&error),
    };
    if args.listing {
        print!("{}", runtime.listing());
    }
    match runtime.execute(entry) {
        Ok(()) => 0,
        Err(error) => report(&error),
    }
}

fn report(error: &Error) -> i32 {
    eprintln!("?{}", error);
    if error.is_compile_error() {
        2
    } else {
        1
    }
}

fn main_loop(runtime: &mut Runtime) -> std::io::Result<()> {
    let interface = Interface::new("minic")?;
    interface.set_report_signal(Signal::Interrupt, true);
    runtime.set_echo(true);
    let mut source = String::new();
    loop {
        interface.set_prompt(if source.is_empty() { "minic> " } else { "...> " })?;
        let line = match interface.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(Signal::Interrupt) => {
                interface.set_buffer("")?;
                source.clear();
                continue;
            }
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        source.push_str(&line);
        source.push('\n');
        if is_open(&source) {
            continue;
        }
        if !line.trim().is_empty() {
            interface.add_history_unique(source.trim_end().to_string());
        }
        if let Err(error) = runtime.enter(&source) {
            interface.write_fmt(format_args!(
                "{}\n",
                Style::new().bold().paint(format!("?{}", error))
            ))?;
        }
        source.clear();
    }
    Ok(())
}

/// Unbalanced braces continue the entry on the next line.
fn is_open(source: &str) -> bool {
    let opened = source.matches('{').count();
    let closed = source.matches('}').count();
    opened > closed
}

