use anyhow::{bail, Context};
use doglang::ast::Program;
use doglang::compiler::{self, registers::SCRATCH_REGISTERS, CodegenOptions};
use doglang::eval::evaluate;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::fmt;

fn main() {
    if let Err(ref e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), anyhow::Error> {
    let opt = Opt::from_args();

    if let Some((_, filter)) = std::env::vars().find(|x| x.0 == "DOGLANG_TRACE") {
        let subscriber = fmt::Subscriber::builder()
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_env_filter(filter)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        // `log` records end up in the same output
        tracing_log::LogTracer::init()?;
    }

    if !(1..=SCRATCH_REGISTERS.len()).contains(&opt.registers) {
        bail!(
            "--registers must be between 1 and {}, got {}",
            SCRATCH_REGISTERS.len(),
            opt.registers
        );
    }

    let source = match &opt.file {
        Some(filename) => fs::read_to_string(filename)
            .with_context(|| format!("could not read {}", filename.display()))?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let program: Program = doglang::parse(&source)?;
    log::debug!("parsed: {program:?}");

    if opt.eval {
        match evaluate(&program)? {
            Some(value) => println!("{value}"),
            None => println!("(no value)"),
        }
        return Ok(());
    }

    let options = CodegenOptions {
        scratch_registers: opt.registers,
    };
    let output = compiler::generate(&program, &options)?;
    log::debug!("generated {} lines", output.len());

    let out_file = opt
        .output
        .or_else(|| opt.file.as_ref().map(|file| file.with_extension("s")));
    match out_file {
        Some(out_file) => {
            let mut file = fs::File::create(&out_file)
                .with_context(|| format!("could not create {}", out_file.display()))?;
            for x in output {
                writeln!(file, "{}", x)?;
            }
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            for x in output {
                writeln!(lock, "{}", x)?;
            }
        }
    }

    Ok(())
}

#[derive(Debug, StructOpt)]
#[structopt(name = "doglang", about = "Compiles doglang programs to x86-64 assembly")]
struct Opt {
    /// The file to compile, read from standard input when missing
    #[structopt(parse(from_os_str))]
    file: Option<PathBuf>,
    /// The (optional) output file
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Run the program instead of compiling it, printing its result
    #[structopt(long)]
    eval: bool,
    /// How many scratch registers expressions may use
    #[structopt(long, default_value = "8")]
    registers: usize,
}
