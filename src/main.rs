use std::{fs, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::{Parser, ValueEnum};
use glhfc::{
    compiler::compiler::generate, display_error, errors::errors::Error, lexer::lexer::tokenize,
    optimizer::optimizer::optimize, parser::parser::parse, type_checker::type_checker::analyze,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compiles a GLHF source file to JavaScript.
#[derive(Parser, Debug)]
#[command(name = "glhfc", version)]
struct Args {
    /// Source file to compile
    source: PathBuf,

    /// Artifact to print
    #[arg(long, value_enum, default_value_t = Emit::Js)]
    emit: Emit,

    /// Skip the optimizer
    #[arg(long)]
    no_optimize: bool,

    /// Write the artifact here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Parsed,
    Analyzed,
    Optimized,
    Js,
}

fn main() -> ExitCode {
    // GLHF_LOG takes an EnvFilter directive, e.g. `GLHF_LOG=glhfc=trace`
    if let Ok(filter) = EnvFilter::try_from_env("GLHF_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Args::parse();

    let source = match fs::read_to_string(&args.source) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read {}: {}", args.source.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let file_name = args
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.source.display().to_string());

    let artifact = match run(&args, &source, Rc::new(file_name)) {
        Ok(artifact) => artifact,
        Err(error) => {
            display_error(&error, &source);
            return ExitCode::FAILURE;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(error) = fs::write(path, artifact + "\n") {
                eprintln!("Error: cannot write {}: {}", path.display(), error);
                return ExitCode::FAILURE;
            }
        }
        None => println!("{}", artifact),
    }

    ExitCode::SUCCESS
}

/// Runs the pipeline up to the requested artifact.
fn run(args: &Args, source: &str, file: Rc<String>) -> Result<String, Error> {
    let start = Instant::now();

    let tokens = tokenize(source, Rc::clone(&file))?;
    info!(elapsed = ?start.elapsed(), "tokenized");
    if args.emit == Emit::Tokens {
        return Ok(tokens
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join("\n"));
    }

    let parse_start = Instant::now();
    let program = parse(tokens, file)?;
    info!(elapsed = ?parse_start.elapsed(), "parsed");
    if args.emit == Emit::Parsed {
        return Ok(format!("{:#?}", program));
    }

    let analyze_start = Instant::now();
    let mut typed = analyze(&program)?;
    info!(elapsed = ?analyze_start.elapsed(), "analyzed");
    if args.emit == Emit::Analyzed {
        return Ok(format!("{:#?}", typed));
    }

    if !args.no_optimize {
        let optimize_start = Instant::now();
        typed = optimize(typed);
        info!(elapsed = ?optimize_start.elapsed(), "optimized");
    }
    if args.emit == Emit::Optimized {
        return Ok(format!("{:#?}", typed));
    }

    let generate_start = Instant::now();
    let output = generate(&typed);
    info!(elapsed = ?generate_start.elapsed(), total = ?start.elapsed(), "generated");

    Ok(output)
}
