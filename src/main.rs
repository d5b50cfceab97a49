use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ls8::{Ls8, State};

const EXIT_FAULTED: u8 = 1;
const EXIT_LOAD_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_name = "PROGRAM", help = "Program image to load", value_hint = clap::ValueHint::FilePath)]
    program: PathBuf,
    #[arg(long, help = "Print machine state before every instruction")]
    trace: bool,
    #[arg(long, value_name = "N", help = "Fault after executing N instructions")]
    max_steps: Option<usize>,
    #[arg(long, help = "Dump registers and memory if the program faults")]
    dump: bool,
}

fn load(args: &Args) -> anyhow::Result<Ls8> {
    let mut ls8 = Ls8::new().trace(args.trace).step_limit(args.max_steps);
    ls8.load_program_from_file(args.program.to_owned())
        .context("load program")?;
    Ok(ls8)
}

/// Process exit status for a machine that has stopped running
fn exit_status(state: &State) -> u8 {
    match state {
        State::Halted => 0,
        State::Faulted(_) | State::Running => EXIT_FAULTED,
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let mut ls8 = match load(&args) {
        Ok(ls8) => ls8,
        Err(e) => {
            eprintln!("ls8: {:?}", e);
            return ExitCode::from(EXIT_LOAD_FAILED);
        }
    };

    let mut stdout = std::io::stdout().lock();
    ls8.run(&mut stdout);

    if let State::Faulted(fault) = ls8.state() {
        eprintln!("ls8: {}", fault);
        if args.dump {
            eprintln!("{}", ls8);
        }
    }

    ExitCode::from(exit_status(ls8.state()))
}
