use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    author     = env!("CARGO_PKG_AUTHORS"),
    about      = "Extract audio from soundbanks and name it after the events that play it",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat warnings as fatal errors (fail on first warning).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Fail level handed to the library components.
    pub fn fail_level(&self) -> log::Level {
        if self.strict {
            log::Level::Warn
        } else {
            log::Level::Error
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract the audio files of a bank or WPK archive.
    Extract(ExtractArgs),

    /// Print which audio files each event plays.
    Events(EventsArgs),

    /// Rewrite the granule positions of an Ogg Vorbis file.
    Revorb(RevorbArgs),
}

#[derive(Debug, Args)]
pub struct NameArgs {
    /// Bank holding the event hierarchy (HIRC section).
    #[arg(long, value_name = "BNK")]
    pub events: Option<PathBuf>,

    /// Event names to look up, one per line ("-" for stdin).
    #[arg(long, value_name = "TXT", requires = "events")]
    pub names: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Audio container: a .bnk with embedded media or a .wpk archive.
    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,

    #[command(flatten)]
    pub names: NameArgs,

    /// Output directory.
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    pub output_path: PathBuf,

    /// Only write the raw .wem files.
    #[arg(long, conflicts_with = "ogg_only")]
    pub wem_only: bool,

    /// Only write repaired .ogg files (for payloads that are Ogg streams).
    #[arg(long)]
    pub ogg_only: bool,
}

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Bank holding the event hierarchy (HIRC section).
    #[arg(value_name = "BNK")]
    pub events: PathBuf,

    /// Event names to look up, one per line ("-" for stdin).
    #[arg(long, value_name = "TXT")]
    pub names: PathBuf,

    /// Write the YAML mapping here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Also list names that resolve to no file.
    #[arg(long)]
    pub include_empty: bool,
}

#[derive(Debug, Args)]
pub struct RevorbArgs {
    /// Input Ogg Vorbis file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file. Defaults to replacing the input, or stdout for stdin input.
    #[arg(short, long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Stream serial for the output (defaults to the input's).
    #[arg(long, value_name = "SERIAL")]
    pub serial: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_requires_events_bank_for_names() {
        let parsed = Cli::try_parse_from(["bnkx", "extract", "a.wpk", "--names", "n.txt"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "bnkx", "--strict", "extract", "a.wpk", "--events", "e.bnk", "--names", "n.txt",
        ])
        .unwrap();
        assert_eq!(cli.fail_level(), log::Level::Warn);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.output_path, PathBuf::from("output"));
        assert!(!args.wem_only);
    }

    #[test]
    fn revorb_serial_is_optional() {
        let cli = Cli::try_parse_from(["bnkx", "revorb", "in.ogg", "--serial", "42"]).unwrap();
        let Commands::Revorb(args) = cli.command else {
            panic!("expected revorb");
        };
        assert_eq!(args.serial, Some(42));
        assert_eq!(args.output_path, None);
    }
}
