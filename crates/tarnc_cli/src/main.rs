use crate::args::Args;
use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr as ColorStderr, Stdout as ColorStdout};
use std::io;
use std::path::Path;
use tarn_ast_parsing::parse_str;
use tarn_ast_parsing::parser::Tree;
use tarn_common::diagnostic::{Diagnostic, Severity};
use tarn_tokens::token::Token;
use tracing::metadata::LevelFilter;
use tracing::{debug, trace, Level, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

mod args;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting tarnc with args: {args:?}");
    debug!("tarnc version: {}", env!("CARGO_PKG_VERSION"));

    let Some(file) = args.file.as_deref() else {
        report(Diagnostic::warning("No file provided", &[]));
        return Ok(());
    };
    let Some(tree) = parse_file(file) else {
        return Ok(());
    };

    for token in tree.leftover_tokens() {
        report(leftover(token));
    }
    if args.print_tree {
        for slot in &tree {
            println!("{slot}");
        }
    }
    if args.validate {
        match tree.validate() {
            Ok(()) => debug!("every top level node is valid"),
            Err(error) => report(Diagnostic::fatal("$", &[&error])),
        }
    } else {
        println!(
            "Nothing to do yet. If no warnings have printed, then the parser has accepted your syntax as valid."
        );
        println!(
            "Note that this does not mean your syntax is valid as there is no verification run, use --validate to check it."
        );
    }
    Ok(())
}

/// Reads and parses `file`, reporting why when it can't.
fn parse_file(file: &Path) -> Option<Tree> {
    let src = match std::fs::read_to_string(file) {
        Ok(src) => src,
        Err(error) => {
            debug!("reading {file:?} failed: {error}");
            report(Diagnostic::error("Could not open file: $", &[&file.display()]));
            return None;
        }
    };
    match parse_str(&src) {
        Ok(tree) => Some(tree),
        Err(error) => {
            report(Diagnostic::fatal("Parsing error: $", &[&error]));
            None
        }
    }
}

fn leftover(token: &Token) -> Diagnostic {
    Diagnostic::warning(
        "Found a token in tree vector($): $",
        &[&token.line(), &token.kind().name()],
    )
}

/// Prints a diagnostic, warnings to stdout and everything worse to stderr. Fatal diagnostics
/// end the process.
fn report(diagnostic: Diagnostic) {
    debug!("reporting {diagnostic}");
    let severity = diagnostic.severity();
    match severity {
        Severity::Warning => println!(
            "{}: {}",
            severity.if_supports_color(ColorStdout, |text| text.bright_yellow()),
            diagnostic.message()
        ),
        Severity::Error | Severity::Fatal => eprintln!(
            "{}: {}",
            severity.if_supports_color(ColorStderr, |text| text.bright_red()),
            diagnostic.message()
        ),
    }
    if diagnostic.is_fatal() {
        std::process::exit(1);
    }
}

/// Logs errors to stderr and everything else to stdout, keeping span traces for error reports
fn subscriber(level_filter: LevelFilter) -> impl Subscriber + Send + Sync {
    let writer = io::stderr.with_max_level(Level::ERROR).or_else(io::stdout);
    Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(writer)
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default())
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    tracing::subscriber::set_global_default(subscriber(level_filter))?;
    Ok(())
}
