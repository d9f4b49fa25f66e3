use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mailblocks::{Config, Document, PALETTE};

#[derive(Parser)]
#[command(name = "mailblocks")]
#[command(about = "Convert between email HTML and editable block documents")]
struct Cli {
    /// TOML render config (asset base URL, default colors)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL for hosted assets such as social icons; overrides the config
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON block document to email HTML
    Render {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse email HTML into a JSON block document
    Parse {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Import a Markdown draft as a JSON block document
    Import {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a JSON block document and list content warnings
    Check { input: PathBuf },
    /// List the block palette
    Palette,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::compiled_default(),
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    match cli.command {
        Command::Render { input, output } => {
            let document = read_document(&input)?;
            let mut html = document.to_html(&config);
            html.push('\n');
            write_output(output.as_deref(), &html)
        }
        Command::Parse {
            input,
            output,
            pretty,
        } => {
            let html = read_input(&input)?;
            let document = Document::from_blocks(mailblocks::parse(&html));
            write_output(output.as_deref(), &to_json(&document, pretty)?)
        }
        Command::Import {
            input,
            output,
            pretty,
        } => {
            let markdown = read_input(&input)?;
            let document = Document::from_blocks(mailblocks::markdown_to_blocks(&markdown));
            write_output(output.as_deref(), &to_json(&document, pretty)?)
        }
        Command::Check { input } => {
            let document = read_document(&input)?;
            document
                .validate()
                .with_context(|| format!("{} is not a valid document", input.display()))?;
            let warnings = document.warnings();
            for warning in &warnings {
                println!("warning: {warning}");
            }
            if warnings.is_empty() {
                println!("{}: {} blocks, no warnings", input.display(), document.len());
            }
            Ok(())
        }
        Command::Palette => {
            for entry in PALETTE {
                println!("{:<8} {:<14} {}", entry.kind.as_str(), entry.label, entry.icon);
            }
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_document(path: &Path) -> Result<Document> {
    let json = read_input(path)?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn to_json(document: &Document, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    json.push('\n');
    Ok(json)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if path.is_dir() {
                bail!("{} is a directory", path.display());
            }
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Created {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
