//! rscope CLI - resampling filter measurement tool

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

mod commands;

use commands::analyze::AnalyzeArgs;

/// Measure the filter an image resizer uses.
#[derive(Parser)]
#[command(name = "rscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the calibration patterns and a preview page
    Gen {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Analyze resized calibration images and draw the filter graph
    Analyze(AnalyzeArgs),
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Gen { dir } => commands::generate::run(&dir),
        Commands::Analyze(args) => commands::analyze::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_gen_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["rscope", "gen"]).unwrap();
        match cli.command {
            Commands::Gen { dir } => assert_eq!(dir, PathBuf::from(".")),
            Commands::Analyze(_) => panic!("expected gen"),
        }
    }

    #[test]
    fn test_analyze_needs_input_and_output() {
        assert!(Cli::try_parse_from(["rscope", "analyze", "only.png"]).is_err());
        assert!(Cli::try_parse_from(["rscope", "analyze", "a.png", "out.png"]).is_ok());
        assert!(Cli::try_parse_from(["rscope", "analyze", "a.png", "b.png", "c.png", "d.png"]).is_err());
    }
}
