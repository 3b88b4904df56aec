use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use minichip::{
    memory::DEFAULT_STACK_LIMIT, Exit, Machine, MachineConfig, RunConfig, Runner,
};
use simple_logger::SimpleLogger;

#[derive(Parser, Debug)]
#[command(version, about, arg_required_else_help(true))]
struct Args {
    /// Program image to run
    rom: PathBuf,

    /// Instructions per second (unthrottled by default)
    #[arg(long)]
    hz: Option<u32>,

    /// Stop after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Maximum subroutine nesting
    #[arg(long, default_value_t = DEFAULT_STACK_LIMIT)]
    stack_limit: usize,

    /// Print the frame buffer when the run ends
    #[arg(long)]
    dump_display: bool,

    /// Show the frame buffer in a window
    #[cfg(feature = "window")]
    #[arg(long)]
    window: bool,

    /// More logging, -vv traces every instruction
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let image = fs::read(&args.rom)
        .with_context(|| format!("failed to read {}", args.rom.display()))?;
    log::info!("loaded {} ({} bytes)", args.rom.display(), image.len());

    let machine_config = MachineConfig {
        stack_limit: args.stack_limit,
    };
    let mut machine = Machine::with_config(&image, &machine_config)?;
    let mut runner = Runner::new(RunConfig {
        cycles_per_second: args.hz,
        max_cycles: args.max_cycles,
    });

    #[cfg(feature = "window")]
    let result = if args.window {
        let mut frontend = minichip::window::WindowFrontend::new()
            .map_err(|err| anyhow!("failed to open window: {err}"))?;
        runner.run_with(&mut machine, &mut frontend)
    } else {
        runner.run(&mut machine)
    };
    #[cfg(not(feature = "window"))]
    let result = runner.run(&mut machine);

    if args.dump_display {
        print!("{}", machine.frame_buffer());
    }

    match result {
        Ok(Exit::Cancelled | Exit::CycleLimit) => Ok(true),
        // already logged by the runner
        Err(_) => Ok(false),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = SimpleLogger::new()
        .with_level(args.level())
        .init()
        .map_err(|err| anyhow!("failed to set up logging: {err}"))
    {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
