// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use wordtalk::app_config::{self, Config, SourceKind};
use wordtalk::app_controller::Controller;
use wordtalk::messages::Locale;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SourceKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSource {
    Http,
    File,
}

impl From<CliSource> for SourceKind {
    fn from(cli_source: CliSource) -> Self {
        match cli_source {
            CliSource::Http => SourceKind::Http,
            CliSource::File => SourceKind::File,
        }
    }
}

/// CLI Wrapper for Locale to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLocale {
    En,
    Ko,
}

impl From<CliLocale> for Locale {
    fn from(cli_locale: CliLocale) -> Self {
        match cli_locale {
            CliLocale::En => Locale::En,
            CliLocale::Ko => Locale::Ko,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive player (default command)
    Play,

    /// Print the parts of the vocabulary and the voices it offers
    List,

    /// Generate shell completions for wordtalk
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command; they override the config file
#[derive(Parser, Debug)]
struct SharedArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Where the vocabulary is read from
    #[arg(long, value_enum, global = true)]
    source: Option<CliSource>,

    /// Origin serving the vocabulary and its audio (http(s):// or file:///)
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Deployment prefix, e.g. /wordtalktalk_tts
    #[arg(long, global = true)]
    base_path: Option<String>,

    /// Voices selected at startup, in playback order
    #[arg(short, long, value_delimiter = ',', global = true)]
    voices: Option<Vec<String>>,

    /// Start playing right away and advance through the words
    #[arg(short, long, global = true)]
    auto_advance: bool,

    /// Leave the Korean clip out of the queue
    #[arg(long, global = true)]
    no_korean: bool,

    /// Language of on-screen messages
    #[arg(long, value_enum, global = true)]
    locale: Option<CliLocale>,
}

/// wordtalk - vocabulary flashcards with recorded pronunciations
///
/// Plays each word in the selected English voices followed by its Korean
/// pronunciation, word by word or continuously.
#[derive(Parser, Debug)]
#[command(name = "wordtalk")]
#[command(version)]
#[command(about = "Vocabulary flashcard player")]
#[command(long_about = "wordtalk loads a vocabulary of words with recorded clips and plays them from the terminal.

EXAMPLES:
    wordtalk                                     # Play using conf.json
    wordtalk -b https://example.org --base-path /wordtalktalk_tts
    wordtalk --source file -b file:///srv/wordtalk/ list
    wordtalk -v danna,matt -a                    # Two voices, auto-advance
    wordtalk completions bash > wordtalk.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    shared: SharedArgs,
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

    // @returns: Emoji and ANSI colour for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "wordtalk", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::List) => {
            let controller = Controller::with_config(load_config(cli.shared)?)?;
            println!("{}", controller.list().await?);
            Ok(())
        }
        Some(Commands::Play) | None => {
            let controller = Controller::with_config(load_config(cli.shared)?)?;
            controller.run().await
        }
    }
}

/// Load or create the config file, apply CLI overrides, validate, then set the log level
fn load_config(options: SharedArgs) -> Result<Config> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(source) = options.source {
        config.catalog.source = source.into();
    }
    if let Some(base_url) = options.base_url {
        config.catalog.base_url = base_url;
    }
    if let Some(base_path) = options.base_path {
        config.catalog.base_path = base_path;
    }
    if let Some(voices) = options.voices {
        config.playback.default_voices = voices;
    }
    if options.auto_advance {
        config.playback.auto_advance = true;
    }
    if options.no_korean {
        config.playback.include_korean = false;
    }
    if let Some(locale) = options.locale {
        config.locale = locale.into();
    }
    if let Some(level) = options.log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    info!(
        "Vocabulary source: {} {}{}",
        config.catalog.source, config.catalog.base_url, config.catalog.base_path
    );
    Ok(config)
}
