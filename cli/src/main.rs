//! pdfsift CLI - batch PDF content extraction tool

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::batch::{BatchReport, DocumentReport, FailedDocument};
use pdfsift::discover::documents_in;
use pdfsift::extract::{
    DocumentImageSource, DocumentTextTableSource, PdfImageSource, PdfTextTableSource,
};
use pdfsift::sink::write_bundle;
use pdfsift::{Error, ExtractionConfig};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract text, tables, and images from PDF documents", long_about = None)]
struct Cli {
    /// Input directory containing PDF files
    #[arg(value_name = "DIR", default_value = "./docs")]
    input: PathBuf,

    /// Output root directory
    #[arg(short, long, value_name = "DIR", default_value = "./extracted_content")]
    output: PathBuf,

    /// File extension to process
    #[arg(long, value_name = "EXT", default_value = "pdf")]
    extension: String,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Only log errors and skip progress display
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "error" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExtractionConfig::new()
        .with_input_dir(&cli.input)
        .with_output_root(&cli.output)
        .with_extension(&cli.extension);

    log::debug!(
        "Input: {}, output root: {}, extension: {}",
        config.input_dir.display(),
        config.output_root.display(),
        config.extension
    );

    let text_source = PdfTextTableSource::new();
    let image_source = PdfImageSource::new();

    let mut report = BatchReport::default();

    for path in documents_in(&config.input_dir, &config.extension)? {
        if !cli.quiet {
            println!("{} {}", "Processing".cyan().bold(), path.display());
        }
        match process_document(&config, &text_source, &image_source, &path, cli.quiet) {
            Ok(doc) => {
                if !cli.quiet {
                    print_document_result(&doc);
                }
                report.succeeded.push(doc);
            }
            Err(e) => {
                eprintln!("{} {}: {}", "Failed".red().bold(), path.display(), e);
                report.failed.push(FailedDocument {
                    source: path,
                    error: e.to_string(),
                });
            }
        }
    }

    if report.total_documents() == 0 {
        let not_found = Error::NoDocuments {
            dir: config.input_dir.clone(),
            extension: config.extension.clone(),
        };
        println!("{}", not_found.to_string().yellow());
        return Ok(());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn process_document(
    config: &ExtractionConfig,
    text_source: &dyn DocumentTextTableSource,
    image_source: &dyn DocumentImageSource,
    path: &Path,
    quiet: bool,
) -> pdfsift::Result<DocumentReport> {
    let pb = progress_bar(quiet);

    pb.set_message("Extracting text and tables...");
    let text = text_source.extract(path)?;
    pb.inc(1);

    pb.set_message("Extracting images...");
    let images = image_source.extract(path)?;
    pb.inc(1);

    pb.set_message("Writing output...");
    let output_dir = config.document_output_dir(path);
    let bundle = write_bundle(&output_dir, path, &text, &images)?;
    pb.inc(1);

    pb.finish_and_clear();

    Ok(DocumentReport {
        source: path.to_path_buf(),
        output_dir,
        pages: text.page_count(),
        tables: text.table_count(),
        metadata: text.metadata,
        images: images.count(),
        images_failed: images.failed,
        markdown_path: bundle.markdown_path,
        spreadsheet_path: bundle.spreadsheet_path,
        images_dir: bundle.images_dir,
    })
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn print_document_result(doc: &DocumentReport) {
    println!("  {} {}", "├─".dimmed(), doc.markdown_path.display());
    if let Some(ref spreadsheet) = doc.spreadsheet_path {
        println!(
            "  {} {} ({} tables)",
            "├─".dimmed(),
            spreadsheet.display(),
            doc.tables
        );
    }
    println!(
        "  {} {} ({} images)",
        "└─".dimmed(),
        doc.images_dir.display(),
        doc.images
    );
    if doc.images_failed > 0 {
        println!(
            "  {} {} image(s) could not be decoded",
            "!".yellow().bold(),
            doc.images_failed
        );
    }
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", "Extraction Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Documents".bold(), report.total_documents());
    println!("{}: {}", "Succeeded".bold(), report.succeeded.len());
    println!("{}: {}", "Failed".bold(), report.failed.len());
    println!("{}: {}", "Tables".bold(), report.total_tables());
    println!("{}: {}", "Images".bold(), report.total_images());

    for failure in &report.failed {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failure.source.display(),
            failure.error
        );
    }
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
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["pdfsift"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("./docs"));
        assert_eq!(cli.output, PathBuf::from("./extracted_content"));
        assert_eq!(cli.extension, "pdf");
        assert!(!cli.json);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "pdfsift",
            "papers",
            "-o",
            "out",
            "--extension",
            "PDF",
            "--json",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("papers"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert_eq!(cli.extension, "PDF");
        assert!(cli.json);
        assert!(cli.quiet);
    }
}
