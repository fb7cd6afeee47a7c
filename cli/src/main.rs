//! mdocx CLI - Markdown business plan to Word converter

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdocx::convert::{self, convert_batch_with, ConvertOptions};
use mdocx::{BulletMode, ConversionResult, JsonFormat, ParseOptions, Warning};

#[derive(Parser)]
#[command(name = "mdocx")]
#[command(version)]
#[command(about = "Convert Korean business-plan Markdown to Word documents", long_about = None)]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output DOCX file (defaults to <FILE stem>.docx next to the input)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    style: StyleArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Markdown to DOCX
    Convert {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output DOCX file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Convert several Markdown files in parallel
    Batch {
        /// Input Markdown files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Dump the parsed document model as JSON
    Json {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the plain-text rendering
    Text {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show conversion statistics and warnings
    Info {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Options shared by the converting commands.
#[derive(Args, Clone)]
struct StyleArgs {
    /// Do not add section numbers to headings
    #[arg(long)]
    no_numbering: bool,

    /// How bullet nesting levels are chosen
    #[arg(long, value_enum, default_value = "indent")]
    bullet_mode: BulletLeveling,

    /// Fail when a referenced image is missing
    #[arg(long)]
    strict: bool,

    /// Width of embedded images in inches
    #[arg(long, value_name = "INCHES", default_value = "5.0")]
    image_width: f32,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
enum BulletLeveling {
    /// From leading indentation (0/2/4/6+ columns)
    #[default]
    Indent,
    /// From the glyph (□ ○ - •)
    Glyph,
}

impl From<BulletLeveling> for BulletMode {
    fn from(mode: BulletLeveling) -> Self {
        match mode {
            BulletLeveling::Indent => BulletMode::Indentation,
            BulletLeveling::Glyph => BulletMode::Glyph,
        }
    }
}

impl Default for StyleArgs {
    fn default() -> Self {
        Self {
            no_numbering: false,
            bullet_mode: BulletLeveling::Indent,
            strict: false,
            image_width: 5.0,
        }
    }
}

impl StyleArgs {
    fn to_options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new()
            .with_bullet_mode(self.bullet_mode.into())
            .with_heading_numbers(!self.no_numbering)
            .with_image_width(self.image_width);
        if self.strict {
            options = options.strict();
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            style,
        }) => cmd_convert(&input, output.as_deref(), &style),
        Some(Commands::Batch {
            inputs,
            output,
            style,
        }) => cmd_batch(&inputs, output.as_deref(), &style),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &cli.style)
            } else {
                println!("{}", "Usage: mdocx <FILE> [OUTPUT]".yellow());
                println!("       mdocx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    style: &StyleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Converting {}", input.display());
    let result = convert::convert_file(input, output, &style.to_options())?;

    print_warnings(&result.warnings);
    if let Some(ref path) = result.output {
        println!("{} {}", "Saved to".green(), path.display());
    }
    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: Option<&Path>,
    style: &StyleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let outcomes = convert_batch_with(inputs, output, &style.to_options(), |outcome| {
        pb.set_message(outcome.input.display().to_string());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let mut failed = 0;
    println!();
    for outcome in &outcomes {
        match outcome.result {
            Ok(ref result) => {
                let target = result
                    .output
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("  {} {} -> {}", "✓".green(), outcome.input.display(), target);
                print_warnings(&result.warnings);
            }
            Err(ref e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), outcome.input.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, outcomes.len()).into());
    }
    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = mdocx::parse_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = mdocx::render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = mdocx::parse_file(input)?;
    let text = mdocx::render::to_text(&doc);
    write_or_print(output, &text)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let options = ParseOptions::new().lenient();
    let doc = mdocx::parse_file_with_options(input, options)?;
    let result = ConversionResult::from_document(&doc, None);
    let stats = &result.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    println!("{}: {}", "Blocks".bold(), doc.blocks.len());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Placeholders".bold(), stats.placeholder_count);
    println!("{}: {}", "Captions".bold(), stats.caption_count);
    println!("{}: {}", "TOC entries".bold(), stats.toc_entry_count);
    println!("{}: {}", "References".bold(), stats.reference_count);
    println!("{}: {}", "Footnotes".bold(), stats.footnote_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    if !result.warnings.is_empty() {
        println!();
        println!("{}", "Warnings".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        print_warnings(&result.warnings);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "mdocx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown business plan to Word converter");
    println!();
    println!("License: MIT");
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("  {} {}", "warning:".yellow(), warning);
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_convert() {
        let cli = Cli::try_parse_from(["mdocx", "plan.md", "out.docx", "--strict"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("plan.md")));
        assert_eq!(cli.output, Some(PathBuf::from("out.docx")));
        assert!(cli.style.strict);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_convert_subcommand_options() {
        let cli = Cli::try_parse_from([
            "mdocx",
            "convert",
            "plan.md",
            "-o",
            "x.docx",
            "--no-numbering",
            "--bullet-mode",
            "glyph",
            "--image-width",
            "4",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Convert { style, output, .. }) => {
                let options = style.to_options();
                assert!(!options.parse.number_headings);
                assert_eq!(options.parse.bullet_mode, BulletMode::Glyph);
                assert_eq!(options.render.image_width_in, 4.0);
                assert_eq!(output, Some(PathBuf::from("x.docx")));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_batch_requires_files() {
        assert!(Cli::try_parse_from(["mdocx", "batch"]).is_err());
    }

    #[test]
    fn test_convert_writes_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plan.md");
        fs::write(&input, "# 제목\n본문").unwrap();

        cmd_convert(&input, None, &StyleArgs::default()).unwrap();
        assert!(dir.path().join("plan.docx").exists());
    }

    #[test]
    fn test_convert_missing_input_fails() {
        let result = cmd_convert(Path::new("missing.md"), None, &StyleArgs::default());
        assert!(result.is_err());
    }
}
