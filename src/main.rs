// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use chrono::TimeDelta;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subshift::app_config::{Config, LogLevel};
use subshift::timestamp::{format_srt_timestamp, parse_signed_timestamp, parse_timestamp};
use subshift::{Controller, SubtitleFormat};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

fn parse_time_arg(value: &str) -> Result<TimeDelta, String> {
    parse_timestamp(value).ok_or_else(|| format!("invalid timestamp '{}', expected hh:mm:ss,fff", value))
}

fn parse_offset_arg(value: &str) -> Result<TimeDelta, String> {
    parse_signed_timestamp(value)
        .ok_or_else(|| format!("invalid offset '{}', expected [-]hh:mm:ss,fff or milliseconds", value))
}

fn parse_format_arg(value: &str) -> Result<SubtitleFormat, String> {
    value.parse().map_err(|e: subshift::SubtitleError| e.to_string())
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a subtitle file to another format (picked from the extensions)
    Convert {
        /// Source subtitle file
        input: PathBuf,
        /// Destination file (.srt or .ass)
        output: PathBuf,
    },

    /// Shift all cues by a signed offset
    Shift {
        /// Subtitle file to shift
        input: PathBuf,
        /// Offset such as 00:00:02,500, -00:00:01.000 or -1500 (milliseconds)
        #[arg(allow_hyphen_values = true, value_parser = parse_offset_arg)]
        offset: TimeDelta,
        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stretch timings so the first cue begins at START and the last at END
    Rescale {
        /// Subtitle file to rescale
        input: PathBuf,
        /// New begin of the first cue in range
        #[arg(value_parser = parse_time_arg)]
        start: TimeDelta,
        /// New begin of the last cue in range
        #[arg(value_parser = parse_time_arg)]
        end: TimeDelta,
        /// Index of the first cue to rescale (0-based)
        #[arg(long, requires = "last")]
        first: Option<usize>,
        /// Index of the last cue to rescale (0-based, inclusive)
        #[arg(long, requires = "first")]
        last: Option<usize>,
        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy timings from a reference subtitle of the same content
    Sync {
        /// Subtitle file to retime
        input: PathBuf,
        /// Correctly timed subtitle file
        reference: PathBuf,
        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the cue shown at a given time
    At {
        /// Subtitle file to search
        input: PathBuf,
        /// Time such as 00:12:34,500
        #[arg(value_parser = parse_time_arg)]
        time: TimeDelta,
    },

    /// Print a short summary of a subtitle file
    Info {
        /// Subtitle file to inspect
        input: PathBuf,
    },

    /// Generate shell completions for subshift
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subshift - convert and retime SRT and ASS subtitles
#[derive(Parser, Debug)]
#[command(name = "subshift")]
#[command(version)]
#[command(about = "Convert and retime SRT and ASS subtitles")]
#[command(long_about = "subshift converts subtitles between SubRip and Advanced SubStation Alpha and fixes their timing.

EXAMPLES:
    subshift convert movie.ass movie.srt                 # Convert ASS to SRT
    subshift shift movie.srt -00:00:01,500               # Show cues 1.5s earlier
    subshift shift movie.srt 2500 -o fixed.srt           # 2.5s later, into a new file
    subshift rescale movie.srt 00:00:05,000 01:40:12,300 # Fix drifting subtitles
    subshift sync movie.fr.srt movie.en.srt              # Take timings from another file
    subshift at movie.srt 00:12:34,500                   # What is on screen at 12:34.5
    subshift completions bash > subshift.bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Read input files as this format instead of guessing from the extension
    #[arg(short, long, global = true, value_parser = parse_format_arg)]
    format: Option<SubtitleFormat>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The level is lowered later through log::set_max_level once config is read
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Info until the config or the command line says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subshift", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(LevelFilter::from(LogLevel::from(level.clone())));
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.into());
    debug!("Using configuration: {:?}", config);

    let controller = Controller::with_config(config)?.with_input_format(cli.format);
    run_command(&controller, cli.command)
}

fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Convert { input, output } => controller.convert(&input, &output),
        Commands::Shift { input, offset, output } => {
            controller.shift(&input, offset, output.as_deref())
        }
        Commands::Rescale {
            input,
            start,
            end,
            first,
            last,
            output,
        } => {
            let range = first.zip(last);
            controller.rescale(&input, range, start, end, output.as_deref())
        }
        Commands::Sync {
            input,
            reference,
            output,
        } => controller.sync(&input, &reference, output.as_deref()),
        Commands::At { input, time } => {
            match controller.cue_at(&input, time)? {
                Some(cue) => println!("{}", cue),
                None => info!("No cue at {}", format_srt_timestamp(time)),
            }
            Ok(())
        }
        Commands::Info { input } => {
            let format = controller.input_format_for(&input)?;
            let document = controller.load_as(&input, format)?;
            println!("File:   {}", input.display());
            println!("Format: {}", format);
            println!("Cues:   {}", document.len());
            if let Some((begin, end)) = document.time_span() {
                println!("From:   {}", format_srt_timestamp(begin));
                println!("To:     {}", format_srt_timestamp(end));
            }
            Ok(())
        }
        Commands::Completions { .. } => Err(anyhow!("Completions are handled before loading config")),
    }
}
