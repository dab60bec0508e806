//! unlayout CLI - rebuild Markdown from layout analysis output

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unlayout::textract::{parse_textract_file, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH};
use unlayout::{parse_pages_file, reconstruct, JsonFormat, Page, RenderOptions};

#[derive(Parser)]
#[command(name = "unlayout")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild Markdown documents from layout analysis output", long_about = None)]
struct Cli {
    /// Input layout JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// How to read the input file.
#[derive(Args, Clone, Copy)]
struct SourceArgs {
    /// Input is AWS Textract JSON
    #[arg(long)]
    textract: bool,

    /// Page width for Textract coordinates (with --textract)
    #[arg(long, default_value_t = DEFAULT_PAGE_WIDTH)]
    page_width: f32,

    /// Page height for Textract coordinates (with --textract)
    #[arg(long, default_value_t = DEFAULT_PAGE_HEIGHT)]
    page_height: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the document as Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Insert page markers and separators
        #[arg(long)]
        paginate: bool,

        /// Separator written after each page marker
        #[arg(long, value_name = "TEXT")]
        page_separator: Option<String>,

        /// Vertical gap under which aligned lines are treated as wrapped
        #[arg(long, value_name = "N", env = "UNLAYOUT_MAX_BLOCK_GAP")]
        max_block_gap: Option<f32>,

        /// Leave positional tags out of the output
        #[arg(long)]
        no_tags: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Rebuild the document and print blocks and statistics as JSON
    Json {
        /// Input layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show layout information
    Info {
        /// Input layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show version information
    Version,
}

/// Options of the `markdown` subcommand.
struct MarkdownArgs {
    paginate: bool,
    page_separator: Option<String>,
    max_block_gap: Option<f32>,
    no_tags: bool,
}

impl MarkdownArgs {
    fn render_options(&self) -> Result<RenderOptions, unlayout::Error> {
        let mut options = RenderOptions::new()
            .with_pagination(self.paginate)
            .with_positional_tags(!self.no_tags);
        if let Some(ref separator) = self.page_separator {
            options = options.with_page_separator(separator.replace("\\n", "\n"));
        }
        if let Some(gap) = self.max_block_gap {
            options = options.with_max_block_gap(gap);
        }
        options.validate()?;
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Markdown {
            input,
            output,
            paginate,
            page_separator,
            max_block_gap,
            no_tags,
            source,
        }) => {
            let args = MarkdownArgs {
                paginate,
                page_separator,
                max_block_gap,
                no_tags,
            };
            cmd_markdown(&input, output.as_deref(), &args, source)
        }
        Some(Commands::Json {
            input,
            output,
            compact,
            source,
        }) => cmd_json(&input, output.as_deref(), compact, source),
        Some(Commands::Info { input, source }) => cmd_info(&input, source),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), cli.source)
            } else {
                println!("{}", "Usage: unlayout <FILE> [OUTPUT]".yellow());
                println!("       unlayout --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_pages(input: &Path, source: SourceArgs) -> unlayout::Result<Vec<Page>> {
    let pages = if source.textract {
        parse_textract_file(input, source.page_width, source.page_height)?
    } else {
        parse_pages_file(input)?
    };
    log::debug!("Loaded {} pages from {}", pages.len(), input.display());
    Ok(pages)
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

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    source: SourceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading layout...");
    let pages = load_pages(input, source)?;
    pb.inc(1);

    pb.set_message("Rebuilding document...");
    let result = reconstruct(&pages, &RenderOptions::default());
    pb.inc(1);

    pb.set_message("Writing output...");
    fs::write(output_dir.join("document.md"), &result.markdown)?;
    let json = unlayout::render::to_json(&result, JsonFormat::Pretty)?;
    fs::write(output_dir.join("blocks.json"), &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} document.md", "├─".dimmed());
    println!("  {} blocks.json", "└─".dimmed());

    Ok(())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    args: &MarkdownArgs,
    source: SourceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.render_options()?;
    let pages = load_pages(input, source)?;
    let markdown = unlayout::to_markdown(&pages, &options);
    write_or_print(output, &markdown)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    source: SourceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = load_pages(input, source)?;
    let result = reconstruct(&pages, &RenderOptions::default());

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = unlayout::render::to_json(&result, format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path, source: SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pages = load_pages(input, source)?;

    println!("{}", "Layout Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let blocks: usize = pages.iter().map(|p| p.blocks.len()).sum();
    let lines: usize = pages.iter().map(Page::line_count).sum();
    let spans: usize = pages.iter().map(Page::span_count).sum();

    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {}",
        "Format".bold(),
        if source.textract { "Textract" } else { "Pages" }
    );
    println!("{}: {}", "Pages".bold(), pages.len());
    println!("{}: {}", "Blocks".bold(), blocks);
    println!("{}: {}", "Lines".bold(), lines);
    println!("{}: {}", "Spans".bold(), spans);

    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
    for block in pages.iter().flat_map(|p| &p.blocks) {
        *histogram.entry(block.block_type.to_string()).or_default() += 1;
    }

    if !histogram.is_empty() {
        println!();
        println!("{}", "Block Types".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (label, count) in &histogram {
            println!("{}: {}", label.bold(), count);
        }
    }

    let result = reconstruct(&pages, &RenderOptions::default());
    let stats = &result.stats;

    println!();
    println!("{}", "Reconstruction Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Output blocks".bold(), stats.block_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Lines dropped".bold(), stats.lines_dropped);
    println!("{}: {}", "De-hyphenations".bold(), stats.dehyphenations);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unlayout".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout-to-Markdown reconstruction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown_args() -> MarkdownArgs {
        MarkdownArgs {
            paginate: false,
            page_separator: None,
            max_block_gap: None,
            no_tags: false,
        }
    }

    #[test]
    fn test_cli_parses_markdown_flags() {
        let cli = Cli::try_parse_from([
            "unlayout",
            "md",
            "layout.json",
            "--paginate",
            "--no-tags",
            "--max-block-gap",
            "9.5",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Markdown {
                paginate,
                no_tags,
                max_block_gap,
                source,
                ..
            }) => {
                assert!(paginate);
                assert!(no_tags);
                assert_eq!(max_block_gap, Some(9.5));
                assert!(!source.textract);
            }
            _ => panic!("expected markdown command"),
        }
    }

    #[test]
    fn test_cli_default_command() {
        let cli = Cli::try_parse_from(["unlayout", "scan.json", "out", "--textract"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input, Some(PathBuf::from("scan.json")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert!(cli.source.textract);
        assert_eq!(cli.source.page_width, 1000.0);
    }

    #[test]
    fn test_render_options_from_args() {
        let args = MarkdownArgs {
            paginate: true,
            page_separator: Some("***\\n".to_string()),
            ..markdown_args()
        };
        let options = args.render_options().unwrap();
        assert!(options.paginate_output);
        assert_eq!(options.page_separator, "***\n");
        assert!(options.positional_tags);
    }

    #[test]
    fn test_render_options_reject_negative_gap() {
        let args = MarkdownArgs {
            max_block_gap: Some(-1.0),
            ..markdown_args()
        };
        assert!(args.render_options().is_err());
    }

    #[test]
    fn test_convert_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("layout.json");
        fs::write(
            &input,
            r#"[{"number": 1, "bbox": [0, 0, 612, 792], "blocks": [
                {"bbox": [0, 0, 500, 20], "block_type": "Text", "id": 0,
                 "lines": [{"bbox": [0, 0, 500, 20], "id": 0,
                            "spans": [{"text": "Hello.", "bbox": [0, 0, 500, 20]}]}]}
            ]}]"#,
        )
        .unwrap();

        let out = dir.path().join("out");
        let source = SourceArgs {
            textract: false,
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
        };
        cmd_convert(&input, Some(&out), source).unwrap();

        let markdown = fs::read_to_string(out.join("document.md")).unwrap();
        assert_eq!(markdown, "Hello. [[1_0_0]]");
        assert!(out.join("blocks.json").exists());
    }
}
