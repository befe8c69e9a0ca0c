//! pdfoutline CLI - PDF outline extraction tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{self, FileReport};
use pdfoutline::render::{self, JsonFormat};
use pdfoutline::{
    extract_lines_file, extract_outline_file_with_options, BatchOptions, OcrPolicy, OutlineOptions,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract the title and heading outline of PDF files as JSON", long_about = None)]
struct Cli {
    /// Input PDF file or directory of PDF files
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (file input) or directory (directory input)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// When to run OCR on pages without a text layer
    #[arg(long, value_enum, default_value = "empty-document", env = "PDFOUTLINE_OCR")]
    ocr: OcrMode,

    /// Process directory inputs in parallel
    #[arg(long)]
    parallel: bool,

    /// Fail on the first unreadable page instead of skipping it
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show font statistics, thresholds and line scores for a PDF
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of top-scoring lines to show
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OcrMode {
    /// Never run OCR
    Disabled,
    /// OCR only documents without a text layer
    EmptyDocument,
    /// OCR every page without a text layer
    EmptyPages,
}

impl From<OcrMode> for OcrPolicy {
    fn from(mode: OcrMode) -> Self {
        match mode {
            OcrMode::Disabled => OcrPolicy::Disabled,
            OcrMode::EmptyDocument => OcrPolicy::EmptyDocument,
            OcrMode::EmptyPages => OcrPolicy::EmptyPages,
        }
    }
}

impl Cli {
    fn outline_options(&self) -> OutlineOptions {
        let options = OutlineOptions::new().with_ocr_policy(self.ocr.into());
        if self.strict {
            options.strict()
        } else {
            options
        }
    }

    fn json_format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Inspect { input, top }) => cmd_inspect(&cli, input, *top),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match &cli.input {
            Some(input) if input.is_dir() => cmd_directory(&cli, input, cli.output.as_deref()),
            Some(input) => cmd_file(&cli, input, cli.output.as_deref()),
            None => {
                println!("{}", "Usage: pdfoutline <INPUT> [OUTPUT]".yellow());
                println!("       pdfoutline --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_file(cli: &Cli, input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.outline_options();
    log::debug!("Processing {} with {:?}", input.display(), options);
    let outline = extract_outline_file_with_options(input, &options)?;

    if let Some(path) = output {
        render::write_json(&outline, path, cli.json_format())?;
        println!(
            "{} {} ({} headings)",
            "Saved to".green(),
            path.display(),
            outline.headings.len()
        );
    } else {
        println!("{}", render::to_json(&outline, cli.json_format())?);
    }

    Ok(())
}

fn cmd_directory(
    cli: &Cli,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("output"));
    let total = batch::list_pdfs(input)?.len();
    if total == 0 {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let options = BatchOptions::new()
        .with_parallel(cli.parallel)
        .with_format(cli.json_format())
        .with_outline_options(cli.outline_options());
    let report = batch::process_directory_with_progress(input, &output_dir, &options, |file: &FileReport| {
        if let Some(name) = file.input.file_name() {
            pb.set_message(name.to_string_lossy().to_string());
        }
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {}/{} files processed into {}",
        "Done!".green().bold(),
        report.succeeded(),
        report.files.len(),
        output_dir.display()
    );
    for file in report.failed() {
        let reason = file
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_default();
        println!(
            "  {} {}: {}",
            "✗".red(),
            file.input.display(),
            reason.dimmed()
        );
    }

    if cli.strict && report.succeeded() < report.files.len() {
        return Err(format!("{} files failed", report.files.len() - report.succeeded()).into());
    }
    Ok(())
}

fn cmd_inspect(cli: &Cli, input: &Path, top: usize) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.outline_options();
    let document = extract_lines_file(input, &options)?;
    let analyzer = options.analyzer();

    println!("{}", "Document".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), document.page_count);
    println!("{}: {}", "Lines".bold(), document.lines.len());
    println!("{}: {}", "Characters".bold(), document.text_chars());
    if !document.failed_pages.is_empty() {
        println!("{}: {:?}", "Unreadable pages".bold(), document.failed_pages);
    }
    if !document.ocr_pages.is_empty() {
        println!("{}: {:?}", "OCR pages".bold(), document.ocr_pages);
    }

    let Some(analysis) = analyzer.analyze(&document.lines) else {
        println!("\n{}", "No extractable text.".yellow());
        return Ok(());
    };

    let profile = &analysis.profile;
    println!();
    println!("{}", "Font Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {:.1}pt", "Body size".bold(), profile.body_size);
    println!(
        "{}: {:.1}-{:.1}pt",
        "Range".bold(),
        profile.min_size,
        profile.max_size
    );
    for (key, weight) in profile.size_histogram.iter().rev() {
        println!("  {:>6.1}pt {:>8} chars", *key as f32 / 10.0, weight);
    }

    let classification = &analysis.classification;
    println!();
    println!("{}", "Thresholds".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {:.2}",
        "Heading floor".bold(),
        classification.level_thresholds.floor
    );
    println!(
        "{}: {:?}",
        "Title cuts".bold(),
        classification.title_thresholds.cuts
    );
    println!(
        "{}: {:?}",
        "Level cuts".bold(),
        classification.level_thresholds.cuts
    );

    let mut ranked: Vec<_> = analysis.scored.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    println!();
    println!("{}", "Top Lines".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for scored in ranked.into_iter().take(top) {
        let f = &scored.features;
        println!(
            "{:>7.2}  p{:<3} {:>5.1}pt  {}",
            scored.score,
            scored.line.page,
            scored.line.font_size,
            scored.line.text
        );
        println!(
            "         {}",
            format!(
                "size {:+.2} style {:+.2} pattern {:+.2} length {:+.2} caps {:+.2} punct {:+.2} noise {:+.2}",
                f.font_size, f.style, f.pattern, f.length, f.capitalization, f.punctuation, f.noise
            )
            .dimmed()
        );
    }

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print!("{}", render::to_text(&analysis.outline()));

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction tool");
    println!(
        "OCR fallback: {}",
        if cfg!(feature = "ocr") {
            "available".green()
        } else {
            "not built".dimmed()
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pdfoutline", "input.pdf"]);
        assert_eq!(cli.input, Some(PathBuf::from("input.pdf")));
        assert!(cli.output.is_none());
        assert!(cli.ocr == OcrMode::EmptyDocument);
        assert_eq!(cli.json_format(), JsonFormat::Pretty);
        assert_eq!(
            cli.outline_options().error_mode,
            pdfoutline::ErrorMode::Lenient
        );
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "pdfoutline",
            "in",
            "out",
            "--compact",
            "--ocr",
            "empty-pages",
            "--parallel",
            "--strict",
        ]);
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.json_format(), JsonFormat::Compact);
        assert!(cli.parallel);
        let options = cli.outline_options();
        assert_eq!(options.ocr_policy, OcrPolicy::EmptyPages);
        assert_eq!(options.error_mode, pdfoutline::ErrorMode::Strict);
    }

    #[test]
    fn test_inspect_subcommand() {
        let cli = Cli::parse_from(["pdfoutline", "inspect", "doc.pdf", "--top", "5"]);
        match cli.command {
            Some(Commands::Inspect { input, top }) => {
                assert_eq!(input, PathBuf::from("doc.pdf"));
                assert_eq!(top, 5);
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.pdf");
        fs::write(&input, b"not a pdf").unwrap();
        let cli = Cli::parse_from(["pdfoutline", "x"]);
        let result = cmd_file(&cli, &input, Some(&dir.path().join("out.json")));
        assert!(result.is_err());
    }
}
