//! Batch processing command for multiple notices.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use mensura_core::{ExtractionResult, MensuraConfig, MensuraParser, NoticeParser};

use super::config::load_config;
use super::process::{format_result, source_name, OutputFormat};
use crate::export::{self, SourcedRecord};
use crate::source;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write summary.csv with one row per record
    #[arg(long)]
    summary: bool,

    /// Also write boundaries.geojson with every reconstructed boundary
    #[arg(long)]
    geojson: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    source: String,
    result: Option<ExtractionResult>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = Arc::new(MensuraParser::from_config(&config)?);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| source::is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let jobs = args.jobs.max(1);
    let mut pending = stream::iter(files.into_iter().map(|path| {
        let parser = Arc::clone(&parser);
        async move {
            let worker_path = path.clone();
            let outcome = tokio::task::spawn_blocking(move || process_single_file(&worker_path, &parser))
                .await
                .map_err(|e| anyhow::anyhow!("Worker failed: {}", e))
                .and_then(|r| r);
            (path, outcome)
        }
    }))
    .buffer_unordered(jobs);

    let mut results = Vec::new();
    while let Some((path, outcome)) = pending.next().await {
        let source = source_name(&path);
        match outcome {
            Ok(result) => results.push(ProcessResult {
                path,
                source,
                result: Some(result),
                error: None,
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        source,
                        result: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    // Completion order depends on the workers.
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for item in &successful {
            if let Some(result) = &item.result {
                let stem = item
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("notice");
                let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));

                let content = format_result(&item.source, result, args.format, &config)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    let records: Vec<SourcedRecord<'_>> = successful
        .iter()
        .filter_map(|item| item.result.as_ref().map(|r| (item.source.as_str(), r)))
        .flat_map(|(source, result)| {
            result
                .records
                .iter()
                .map(move |record| SourcedRecord::new(source, record))
        })
        .collect();

    if args.summary {
        let summary_path = artifact_path(args.output_dir.as_deref(), "summary.csv");
        write_summary(&summary_path, &records)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if args.geojson {
        let geojson_path = artifact_path(args.output_dir.as_deref(), "boundaries.geojson");
        write_geojson(&geojson_path, &records, &config)?;
        println!(
            "{} Boundaries written to {}",
            style("✓").green(),
            geojson_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files ({} records) in {:?}",
        style("✓").green(),
        results.len(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, parser: &MensuraParser) -> anyhow::Result<ExtractionResult> {
    let document = source::read_document(path)?;
    if document.is_empty() {
        warn!("{} contains no text", path.display());
    }
    Ok(parser.parse(&document))
}

fn artifact_path(output_dir: Option<&Path>, name: &str) -> PathBuf {
    output_dir
        .map(|d| d.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

fn write_summary(path: &Path, records: &[SourcedRecord<'_>]) -> anyhow::Result<()> {
    let file = fs::File::create(path)?;
    export::write_csv(file, records)
}

fn write_geojson(
    path: &Path,
    records: &[SourcedRecord<'_>],
    config: &MensuraConfig,
) -> anyhow::Result<()> {
    let content = export::format_geojson(records, config.export.crs)?;
    fs::write(path, content)?;
    Ok(())
}
