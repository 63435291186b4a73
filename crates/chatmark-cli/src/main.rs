use anyhow::{Context, Result};
use chatmark_config::Config;
use chatmark_engine::{
    ChunkLimit, Delivery, LengthMetric, MarkupMode, TransportError, convert, deliver_chunks,
    split_with,
};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::PathBuf;

const DEFAULT_RECIPIENT: &str = "stdout";

/// Convert an LLM reply to Telegram HTML and split it into messages
#[derive(Parser, Debug)]
#[command(name = "chatmark", author, version, about)]
struct Cli {
    /// Markdown input (default: stdin)
    file: Option<PathBuf>,

    /// Maximum chunk length (overrides the config file)
    #[arg(long)]
    max_length: Option<usize>,

    /// Unit the chunk length is measured in: chars, utf16 or bytes
    #[arg(long)]
    metric: Option<LengthMetric>,

    /// Print the converted HTML without splitting it
    #[arg(long, conflicts_with = "raw")]
    convert_only: bool,

    /// Treat the input as already converted HTML and only split it
    #[arg(long)]
    raw: bool,

    /// Config file (default: ~/.config/chatmark/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Prints each chunk followed by a separator line.
struct StdoutDelivery<W> {
    out: W,
    sent: usize,
}

impl<W: Write> Delivery for StdoutDelivery<W> {
    fn deliver(
        &mut self,
        recipient: &str,
        chunk: &str,
        mode: MarkupMode,
    ) -> Result<(), TransportError> {
        self.sent += 1;
        writeln!(self.out, "{chunk}")?;
        writeln!(
            self.out,
            "--- {} #{} ({}) ---",
            recipient,
            self.sent,
            mode.parse_mode()
        )?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = load_config(cli.config.as_ref())?;
    let limit = chunk_limit(&cli, &config)?;
    let input = read_input(cli.file.as_ref())?;

    if cli.convert_only {
        println!("{}", convert(&input));
        return Ok(());
    }

    let marked_up = if cli.raw { input } else { convert(&input) };
    let chunks = split_with(&marked_up, limit).context("Failed to split reply")?;
    log::info!(
        "{} chunks of at most {} {}",
        chunks.len(),
        limit.max_length(),
        limit.metric()
    );

    let recipient = config.recipient.as_deref().unwrap_or(DEFAULT_RECIPIENT);
    let mut delivery = StdoutDelivery {
        out: io::stdout().lock(),
        sent: 0,
    };
    deliver_chunks(&mut delivery, recipient, &chunks, config.markup_mode)
        .context("Failed to deliver reply")?;
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config_path = path.cloned().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());

    match Config::load_from_path(&config_path)? {
        Some(config) => Ok(config),
        None if path.is_some() => {
            anyhow::bail!("Config file not found: {}", config_path.display())
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn chunk_limit(cli: &Cli, config: &Config) -> Result<ChunkLimit> {
    let max_length = cli.max_length.unwrap_or(config.max_length);
    let metric = cli.metric.unwrap_or(config.length_metric);
    let limit = ChunkLimit::new(max_length).context("Invalid --max-length")?;
    Ok(limit.with_metric(metric))
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}
