use clap::{ArgAction, Parser};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stackenv::{
    Conversion, ConvertConfig, ConvertOptions, Diagnostic, Diagnostics, Level, Verbosity,
};

mod output;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "stackenv")]
#[command(version = VERSION)]
#[command(about = "Convert deployment stack outputs into a sourceable shell script")]
struct Cli {
    /// Stack outputs file; `.yaml`/`.yml` parse as YAML, anything else as JSON
    /// [default: cdk-outputs.json]
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Script to write [default: cdk-outputs.sh]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Fail instead of doing nothing when the input file does not exist
    #[arg(long)]
    fail_on_missing: bool,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbosity")]
    verbose: u8,

    /// Verbosity level: 0 warnings and errors, 1 adds info, 2 adds debug
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=2))]
    verbosity: Option<u8>,

    /// JSON file with defaults for any of the options above
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print a JSON summary on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn flag_options(&self) -> stackenv::Result<ConvertOptions> {
        let level = match (self.verbosity, self.verbose) {
            (Some(level), _) => Some(level),
            (None, 0) => None,
            (None, count) => Some(count.min(Verbosity::DEBUG.as_u8())),
        };

        Ok(ConvertOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            fail_on_missing: self.fail_on_missing.then_some(true),
            verbosity: level.map(Verbosity::new).transpose()?,
        })
    }

    fn resolve(&self) -> stackenv::Result<ConvertConfig> {
        let file = match &self.config {
            Some(path) => ConvertOptions::from_file(path)?,
            None => ConvertOptions::default(),
        };
        Ok(ConvertConfig::resolve(file.merge(self.flag_options()?)))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertOutput<'a> {
    input: &'a Path,
    output: &'a Path,
    exports: usize,
    #[serde(flatten)]
    conversion: &'a Conversion,
    diagnostics: &'a [Diagnostic],
}

fn init_tracing(verbosity: Verbosity) {
    let max_level = match verbosity.threshold() {
        Level::Debug => tracing::Level::DEBUG,
        Level::Info => tracing::Level::INFO,
        Level::Warn | Level::Error => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(max_level)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn emit(diagnostic: &Diagnostic) {
    let origin = diagnostic.origin.as_deref().unwrap_or("-");
    match diagnostic.level {
        Level::Debug => tracing::debug!(origin, "{}", diagnostic.message),
        Level::Info => tracing::info!(origin, "{}", diagnostic.message),
        Level::Warn => tracing::warn!(origin, "{}", diagnostic.message),
        Level::Error => tracing::error!(origin, "{}", diagnostic.message),
    }
}

fn report_error(err: &stackenv::Error) {
    eprintln!("error: {}", err);
    for hint in &err.hints {
        eprintln!("hint: {}", hint.message);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(err) => {
            if cli.json {
                output::print_result::<()>(&Err(err.clone())).ok();
            }
            report_error(&err);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.verbosity);

    let mut diagnostics = Diagnostics::new(config.verbosity);
    let result = stackenv::run(&config, &mut diagnostics);

    for diagnostic in diagnostics.records() {
        emit(diagnostic);
    }

    if cli.json {
        let summary = result.as_ref().map(|conversion| ConvertOutput {
            input: &config.input,
            output: &config.output,
            exports: conversion.export_count(),
            conversion,
            diagnostics: diagnostics.records(),
        });
        let printed = match summary {
            Ok(data) => output::print_result(&Ok(data)),
            Err(err) => output::print_result::<()>(&Err(err.clone())),
        };
        if let Err(err) = printed {
            report_error(&err);
            return ExitCode::FAILURE;
        }
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}
