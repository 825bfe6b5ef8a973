// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use furisub::app_config::{self, Config};
use furisub::app_controller::{ConversionJob, ConversionOutcome, Controller};
use furisub::emitters::OutputFormat;

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

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Ass,
    Images,
    Romaji,
    Timeline,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Ass => OutputFormat::Ass,
            CliOutputFormat::Images => OutputFormat::Images,
            CliOutputFormat::Romaji => OutputFormat::Romaji,
            CliOutputFormat::Timeline => OutputFormat::Timeline,
        }
    }
}

/// Options shared by every conversion command
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "furisub.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long, global = true)]
    force_overwrite: bool,

    #[command(flatten)]
    render: RenderArgs,
}

/// Overrides for the render section of the configuration
#[derive(Args, Debug, Clone, Default)]
struct RenderArgs {
    /// Font name or path to a TrueType/OpenType file
    #[arg(long, global = true)]
    font: Option<String>,

    /// Base text size in px
    #[arg(long, global = true)]
    font_size: Option<u32>,

    /// Reading (furigana) size in px
    #[arg(long, global = true)]
    ruby_size: Option<u32>,

    /// Distance between the bottom of the canvas and the base text row
    #[arg(long, global = true)]
    vertical_margin: Option<u32>,

    /// Fill colour, a name or #RRGGBB[AA]
    #[arg(long, global = true)]
    text_color: Option<String>,

    /// Outline colour, a name or #RRGGBB[AA]
    #[arg(long, global = true)]
    stroke_color: Option<String>,

    /// Outline width in px
    #[arg(long, global = true)]
    stroke_width: Option<u32>,

    /// Timeline frames per second
    #[arg(long, global = true)]
    fps: Option<u32>,

    /// Canvas width in px
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Canvas height in px
    #[arg(long, global = true)]
    height: Option<u32>,
}

impl RenderArgs {
    fn apply(&self, config: &mut Config) {
        let render = &mut config.render;
        if let Some(font) = &self.font {
            render.font = font.clone();
        }
        if let Some(size) = self.font_size {
            render.base_font_size = size;
        }
        if let Some(size) = self.ruby_size {
            render.reading_font_size = size;
        }
        if let Some(margin) = self.vertical_margin {
            render.vertical_margin = margin;
        }
        if let Some(color) = &self.text_color {
            render.text_color = color.clone();
        }
        if let Some(color) = &self.stroke_color {
            render.stroke_color = color.clone();
        }
        if let Some(width) = self.stroke_width {
            render.stroke_width = width;
        }
        if let Some(fps) = self.fps {
            render.frame_rate = fps;
        }
        if let Some(width) = self.width {
            render.canvas_width = width;
        }
        if let Some(height) = self.height {
            render.canvas_height = height;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write an Advanced SubStation Alpha track with stacked ruby
    Ass {
        /// SRT file providing the timing
        timing: PathBuf,
        /// JSON array of ruby markup strings
        content: PathBuf,
        /// Output .ass file
        output: PathBuf,
    },

    /// Render one transparent PNG per subtitle line
    Images {
        /// SRT file providing the timing
        timing: PathBuf,
        /// JSON array of ruby markup strings
        content: PathBuf,
        /// Output directory for sentence_<n>.png
        output_dir: PathBuf,
        /// Write sentence_<n>.json layout descriptors instead of images
        #[arg(long)]
        layout_only: bool,
    },

    /// Write a romanized SRT track
    Romaji {
        /// SRT file providing the timing
        timing: PathBuf,
        /// JSON array of ruby markup strings
        content: PathBuf,
        /// Output .srt file
        output: PathBuf,
    },

    /// Write an XMEML timeline placing the rendered images
    Timeline {
        /// SRT file providing the timing
        timing: PathBuf,
        /// JSON array of ruby markup strings
        content: PathBuf,
        /// Directory holding sentence_<n>.png
        images_dir: PathBuf,
        /// Output .xml file
        output: PathBuf,
    },

    /// Convert a plain text file (one markup line per line) into a JSON content track
    Prepare {
        /// Plain text input
        input: PathBuf,
    },

    /// Convert every X.json with a sibling X.srt in a directory
    Batch {
        /// Output format
        #[arg(value_enum)]
        format: CliOutputFormat,
        /// Directory holding the content and timing tracks
        input_dir: PathBuf,
        /// Output directory
        output_dir: PathBuf,
        /// For images, write layout descriptors instead of PNG files
        #[arg(long)]
        layout_only: bool,
    },

    /// Generate shell completions for furisub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// furisub - ruby (furigana) subtitle converter
///
/// Converts Japanese subtitle lines with inline <ruby> annotations into
/// styled subtitles, images, romaji subtitles and editor timelines.
#[derive(Parser, Debug)]
#[command(name = "furisub")]
#[command(version)]
#[command(about = "Ruby (furigana) subtitle converter")]
#[command(long_about = "furisub converts Japanese subtitle lines with inline <ruby> annotations, timed by an SRT track.

EXAMPLES:
    furisub prepare lines.txt                                 # lines.txt -> lines_converted.json
    furisub ass movie.srt lines.json movie.ass                # ASS with stacked furigana
    furisub images movie.srt lines.json out/ --font Noto.ttf  # One PNG per line
    furisub romaji movie.srt lines.json movie.romaji.srt      # Romanized SRT
    furisub timeline movie.srt lines.json out/ movie.xml      # XMEML timeline for the PNGs
    furisub batch ass subs/ out/                              # Every X.json with a sibling X.srt
    furisub completions bash > furisub.bash                   # Generate bash completions

CONFIGURATION:
    Configuration is stored in furisub.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Render flags override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour sequence for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Initialize the logger with the most verbose filter; the effective level
    // is applied through set_max_level once the config is known
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "furisub", &mut std::io::stdout());
        return Ok(());
    }

    let options = cli.common;
    let config = load_config(&options)?;
    log::set_max_level(LevelFilter::from(&config.log_level));

    let controller = Controller::with_config(config)?;
    let force_overwrite = options.force_overwrite;

    let outcome = match cli.command {
        Commands::Ass { timing, content, output } => {
            controller.convert(&ConversionJob::new(OutputFormat::Ass, timing, content, output), force_overwrite)?
        }
        Commands::Images { timing, content, output_dir, layout_only } => controller.convert(
            &ConversionJob::new(OutputFormat::Images, timing, content, output_dir).with_layout_only(layout_only),
            force_overwrite,
        )?,
        Commands::Romaji { timing, content, output } => {
            controller.convert(&ConversionJob::new(OutputFormat::Romaji, timing, content, output), force_overwrite)?
        }
        Commands::Timeline { timing, content, images_dir, output } => controller.convert(
            &ConversionJob::new(OutputFormat::Timeline, timing, content, output).with_images_dir(images_dir),
            force_overwrite,
        )?,
        Commands::Prepare { input } => controller.prepare(&input, force_overwrite)?,
        Commands::Batch { format, input_dir, output_dir, layout_only } => {
            let summary = controller
                .run_batch(format.into(), input_dir, output_dir, layout_only, force_overwrite)
                .await?;
            if summary.failed > 0 {
                return Err(anyhow::anyhow!("{} of the batch conversions failed", summary.failed));
            }
            return Ok(());
        }
        Commands::Completions { .. } => return Ok(()),
    };

    if let ConversionOutcome::Written(paths) = outcome {
        info!("Wrote {} file(s)", paths.len());
    }
    Ok(())
}

// Load the config file, creating a default one when missing, then apply CLI overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    let config_path = &options.config_path;

    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    options.render.apply(&mut config);

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
