//! Process command - extract concession records from a single notice.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use mensura_core::{ExtractionResult, MensuraParser, NoticeParser};

use super::config::load_config;
use crate::export::{self, SourcedRecord};
use crate::source;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.txt or .pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per record
    Csv,
    /// Plain text summary
    Text,
    /// GeoJSON feature collection of the boundaries
    Geojson,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
            OutputFormat::Geojson => "geojson",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Reading document...");
    pb.set_position(10);
    let document = source::read_document(&args.input)?;

    pb.set_message("Extracting records...");
    pb.set_position(50);
    let parser = MensuraParser::from_config(&config)?;
    let result = parser.parse(&document);

    pb.set_position(100);
    pb.finish_and_clear();

    let source_name = source_name(&args.input);
    let output = format_result(&source_name, &result, args.format, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_warnings {
        eprintln!();
        if result.warnings.is_empty() {
            eprintln!("{} No warnings", style("ℹ").blue());
        } else {
            eprintln!("{}", style("Warnings:").yellow());
            for warning in &result.warnings {
                eprintln!("  - {}", warning);
            }
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// File name used as the `source` column and property.
pub fn source_name(path: &std::path::Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

pub fn format_result(
    source: &str,
    result: &ExtractionResult,
    format: OutputFormat,
    config: &mensura_core::MensuraConfig,
) -> anyhow::Result<String> {
    let records: Vec<SourcedRecord<'_>> = result
        .records
        .iter()
        .map(|r| SourcedRecord::new(source, r))
        .collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => export::format_csv(&records),
        OutputFormat::Text => Ok(format_text(source, result)),
        OutputFormat::Geojson => export::format_geojson(&records, config.export.crs),
    }
}

fn format_text(source: &str, result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", source));
    output.push_str(&format!("Kind: {}\n", result.kind));

    for record in &result.records {
        output.push('\n');
        output.push_str(&format!("Record ({}):\n", record.role.as_str()));
        for (name, value) in record.flat_fields() {
            output.push_str(&format!("  {:<18} {}\n", name, value));
        }

        if let Some(point) = record.reference_point {
            output.push_str(&format!(
                "  {:<18} E {} N {}\n",
                "reference_point", point.easting, point.northing
            ));
        }

        match (record.boundary.source(), record.boundary.area_hectares()) {
            (Some(source), Some(area)) => output.push_str(&format!(
                "  {:<18} {} vertices, {} ({:.2} ha)\n",
                "boundary",
                record.boundary.vertex_count(),
                source.as_str(),
                area
            )),
            _ => output.push_str(&format!("  {:<18} none\n", "boundary")),
        }
    }

    output
}
