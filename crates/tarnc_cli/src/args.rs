//! the args for running tarnc

use clap::{value_parser, ArgAction};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Checks the syntax of a tarn source file")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// The source file to parse
    #[clap(value_name = "source file", value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,
    /// Check every top level node against its validity contract after parsing
    #[clap(long)]
    pub validate: bool,
    /// Print the reduced tree
    #[clap(long)]
    pub print_tree: bool,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }
}

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used,
    pub fn log_level_filter(&self) -> LevelFilter {
        let sum = self.verbose as i8 - self.quiet as i8;
        match sum {
            ..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;
    use test_log::test;

    #[test]
    fn test_args_parsing() {
        let test = "tarnc file.tarn --validate";
        let args = Args::try_parse_from(test.split(" ")).expect("could not parse test string");
        assert_eq!(args.file.as_deref(), Some(Path::new("file.tarn")));
        assert!(args.validate);
        assert!(!args.print_tree);
    }

    #[test]
    fn test_file_is_optional() {
        let args = Args::try_parse_from(["tarnc"]).expect("could not parse test string");
        assert!(args.file.is_none());
    }

    #[test]
    fn test_log_levels() {
        let args = Args::try_parse_from(["tarnc", "-vv"]).unwrap();
        assert_eq!(args.logging().log_level_filter(), LevelFilter::TRACE);
        let args = Args::try_parse_from(["tarnc", "-q"]).unwrap();
        assert_eq!(args.logging().log_level_filter(), LevelFilter::ERROR);
        assert!(Args::try_parse_from(["tarnc", "-v", "-q"]).is_err());
    }
}
