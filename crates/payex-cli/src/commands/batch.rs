//! Batch command - extract payments from many request files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use payex_core::{ExtractionRequest, ExtractionResponse, PaymentExtractor};

use super::extract::{format_response, OutputFormat};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching request JSON files
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file responses
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    email_id: serde_json::Value,
    response: Option<ExtractionResponse>,
    error: Option<String>,
    extracted_at: DateTime<Utc>,
}

impl FileResult {
    fn status(&self) -> &'static str {
        match (&self.response, &self.error) {
            (_, Some(_)) | (None, None) => "error",
            (Some(response), None) if response.is_success() => "success",
            (Some(_), None) => "no_match",
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("json")
        })
        .collect();

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

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(PaymentExtractor::with_config(config));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let extractor = Arc::clone(&extractor);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let result =
                tokio::task::spawn_blocking(move || process_file(path, &extractor)).await?;
            Ok::<_, anyhow::Error>((index, result))
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined??;
        pb.inc(1);

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                tasks.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push((index, result));
    }

    pb.finish_and_clear();

    // Completion order is arbitrary; report in glob order.
    results.sort_by_key(|(index, _)| *index);
    let results: Vec<FileResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(response) = &result.response {
                write_response(output_dir, result, response, &args)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let count = |status: &str| results.iter().filter(|r| r.status() == status).count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} extracted, {} without payment, {} failed",
        style(count("success")).green(),
        style(count("no_match")).yellow(),
        style(count("error")).red()
    );

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
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

/// Runs on a blocking worker; never fails, errors are captured in the result.
fn process_file(path: PathBuf, extractor: &PaymentExtractor) -> FileResult {
    let outcome = fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|json| Ok(ExtractionRequest::from_json(&json)?));

    let mut result = FileResult {
        path,
        email_id: serde_json::Value::Null,
        response: None,
        error: None,
        extracted_at: Utc::now(),
    };

    match outcome {
        Ok(request) => {
            let response = extractor.extract_request(&request);
            if response.is_exception() {
                result.error = Some(response.errors().join("; "));
            }
            result.email_id = request.email_id;
            result.response = Some(response);
        }
        Err(e) => result.error = Some(e.to_string()),
    }

    result.extracted_at = Utc::now();
    debug!("{}: {}", result.path.display(), result.status());
    result
}

fn write_response(
    output_dir: &Path,
    result: &FileResult,
    response: &ExtractionResponse,
    args: &BatchArgs,
) -> anyhow::Result<()> {
    let output_name = result
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("response");

    let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));
    fs::write(&output_path, format_response(response, args.format, args.pretty)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "email_id",
        "status",
        "amount",
        "currency",
        "confidence",
        "source",
        "sender",
        "errors",
        "extracted_at",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        let email_id = match &result.email_id {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let record = result.response.as_ref().and_then(|r| r.record());
        let errors = match (&result.error, &result.response) {
            (Some(error), _) => error.clone(),
            (None, Some(response)) => response.errors().join("; "),
            (None, None) => String::new(),
        };

        wtr.write_record([
            filename,
            &email_id,
            result.status(),
            &record.map(|r| r.result.amount.to_string()).unwrap_or_default(),
            record.map(|r| r.result.currency.code()).unwrap_or(""),
            &record
                .map(|r| format!("{:.2}", r.result.confidence))
                .unwrap_or_default(),
            record.map(|r| r.result.source.as_str()).unwrap_or(""),
            record.and_then(|r| r.sender_name.as_deref()).unwrap_or(""),
            &errors,
            &result.extracted_at.to_rfc3339(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
