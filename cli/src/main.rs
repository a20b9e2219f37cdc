//! manuscript-format CLI - DOCX manuscript formatting tool

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::{debug, info};

use manuscript_format::{
    estimate_pages, word_count, Document, Margins, NormalizeConfig, Result, WordCountScope,
};

#[derive(Parser)]
#[command(name = "manuscript-format")]
#[command(version)]
#[command(about = "Normalize fonts, sizes, spacing and margins of DOCX manuscripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a manuscript's formatting
    Format {
        /// Input DOCX file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output DOCX file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// JSON configuration (manuscript defaults if not specified)
        #[arg(long, value_name = "FILE", env = "MANUSCRIPT_FORMAT_CONFIG")]
        config: Option<PathBuf>,

        /// Font family
        #[arg(long, value_name = "FAMILY")]
        font: Option<String>,

        /// Font size in points
        #[arg(long, value_name = "PT")]
        size: Option<f32>,

        /// Line spacing multiple (2.0 = double)
        #[arg(long, value_name = "X")]
        line_spacing: Option<f32>,

        /// Uniform page margin in inches
        #[arg(long, value_name = "IN")]
        margins: Option<f64>,

        /// Style to leave untouched (repeatable; replaces the configured list)
        #[arg(long = "protect", value_name = "STYLE")]
        protect: Vec<String>,
    },

    /// Count the words of a manuscript
    Count {
        /// Input DOCX file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Also count text inside tables
        #[arg(long)]
        include_tables: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Format {
            input,
            output,
            config,
            font,
            size,
            line_spacing,
            margins,
            protect,
        } => {
            let mut config = match config {
                Some(path) => {
                    debug!("loading configuration from {}", path.display());
                    NormalizeConfig::from_path(path)?
                }
                None => NormalizeConfig::manuscript_default(),
            };
            if let Some(font) = font {
                config.rules.font_family = Some(font);
            }
            if let Some(size) = size {
                config.rules.font_size_pt = Some(size);
            }
            if let Some(spacing) = line_spacing {
                config.rules.line_spacing = Some(spacing);
            }
            if let Some(inches) = margins {
                config.rules.margins_inch = Some(Margins::uniform(inches));
            }
            if !protect.is_empty() {
                config.protected_styles = protect;
            }
            config.rules.validate()?;

            let mut doc = Document::open(&input)?;
            let words = word_count(&doc, config.word_count_scope);
            info!("{}: {} paragraphs, {} words", input.display(), doc.paragraph_count(), words);
            let report = config.normalizer().apply(&mut doc)?;
            doc.save(&output)?;

            println!(
                "{} -> {} ({} words, ~{} pages)",
                input.display(),
                output.display(),
                words,
                estimate_pages(words)
            );
            println!("{}", report);
        }

        Commands::Count {
            input,
            include_tables,
        } => {
            let scope = if include_tables {
                WordCountScope::IncludeTables
            } else {
                WordCountScope::TopLevel
            };
            let doc = Document::open(&input)?;
            let words = word_count(&doc, scope);
            println!("{} words, ~{} pages", words, estimate_pages(words));
        }
    }

    Ok(())
}
