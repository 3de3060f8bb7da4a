use anyhow::{Context, Result, bail};
use citation_audit_config::Config;
use citation_audit_engine::{
    ChapterNumbering, QuoteTrigger, ReportDocument, analyze, console_summary, io,
    read_document, render_bibliography_markdown,
};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;

/// Classify the citations of a long document by chapter and report the ones
/// missing from its extracts and references listings
#[derive(Parser, Debug)]
#[command(name = "citation-audit", version)]
struct Cli {
    /// Input document (.docx or .json)
    input: PathBuf,

    /// Configuration file (default: ~/.config/citation-audit/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the report files (default: next to the input)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Which headings start a new chapter
    #[arg(long, value_enum)]
    chapter_numbering: Option<ChapterNumberingArg>,

    /// Which body paragraphs open a quotation
    #[arg(long, value_enum)]
    quote_trigger: Option<QuoteTriggerArg>,

    /// Skip writing the Markdown bibliography
    #[arg(long)]
    no_bibliography: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChapterNumberingArg {
    Headings,
    LegacyBibliography,
    Both,
}

impl From<ChapterNumberingArg> for ChapterNumbering {
    fn from(arg: ChapterNumberingArg) -> Self {
        match arg {
            ChapterNumberingArg::Headings => ChapterNumbering::Headings,
            ChapterNumberingArg::LegacyBibliography => ChapterNumbering::LegacyBibliography,
            ChapterNumberingArg::Both => ChapterNumbering::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QuoteTriggerArg {
    AnyBody,
    Indented,
}

impl From<QuoteTriggerArg> for QuoteTrigger {
    fn from(arg: QuoteTriggerArg) -> Self {
        match arg {
            QuoteTriggerArg::AnyBody => QuoteTrigger::AnyBody,
            QuoteTriggerArg::Indented => QuoteTrigger::Indented,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(policy) = cli.chapter_numbering {
        config.analysis.chapter_numbering = policy.into();
    }
    if let Some(trigger) = cli.quote_trigger {
        config.analysis.quote_trigger = trigger.into();
    }
    if cli.no_bibliography {
        config.output.bibliography = false;
    }

    // Nothing is written unless the whole document was read
    let document = read_document(&cli.input)
        .with_context(|| format!("Failed to read document '{}'", cli.input.display()))?;
    let analysis = analyze(&document, &config.analysis);

    let out_dir = cli
        .out_dir
        .or(config.output.directory)
        .unwrap_or_else(|| input_dir(&cli.input));

    let report_path = io::artifact_path(&out_dir, &cli.input, "citations.json");
    let json = ReportDocument::from_analysis(&analysis)
        .to_json()
        .context("Failed to serialize report")?;
    io::write_text(&report_path, &json)
        .with_context(|| format!("Failed to write '{}'", report_path.display()))?;
    log::info!("Wrote {}", report_path.display());

    if config.output.bibliography {
        let bibliography_path = io::artifact_path(&out_dir, &cli.input, "bibliography.md");
        io::write_text(&bibliography_path, &render_bibliography_markdown(&analysis.store))
            .with_context(|| format!("Failed to write '{}'", bibliography_path.display()))?;
        log::info!("Wrote {}", bibliography_path.display());
    }

    if config.output.console_summary {
        print!("{}", console_summary(&analysis.report));
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => match Config::load_from_path(path)? {
            Some(config) => Ok(config),
            None => bail!("Config file '{}' not found", path.display()),
        },
        None => {
            let config = Config::load().with_context(|| {
                format!(
                    "Failed to load config file '{}'",
                    Config::config_path().display()
                )
            })?;
            Ok(config.unwrap_or_default())
        }
    }
}

fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
