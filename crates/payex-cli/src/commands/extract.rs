//! Extract command - run the cascade on a single email.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use payex_core::{ExtractionInput, ExtractionResponse, PaymentExtractor};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Request JSON file, or `-` for stdin (default: stdin)
    #[arg(conflicts_with_all = ["html_file", "text_file"])]
    input: Option<PathBuf>,

    /// Read the HTML body from a file instead of a request
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// Read the plain-text body from a file instead of a request
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Sender address used with --html-file/--text-file
    #[arg(long, default_value = "")]
    from: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON response
    Json,
    /// CSV row with header
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<ExitCode> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let extractor = PaymentExtractor::with_config(config);

    let response = if args.html_file.is_some() || args.text_file.is_some() {
        let text = args.text_file.as_deref().map(fs::read_to_string).transpose()?;
        let html = args.html_file.as_deref().map(fs::read_to_string).transpose()?;
        extractor.extract(&ExtractionInput::new(text, html, &args.from))
    } else {
        let json = read_request(args.input.as_deref())?;
        extractor.extract_json(&json)
    };

    let output = format_response(&response, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if response.is_exception() {
        warn!("Extraction failed: {}", response.errors().join("; "));
        return Ok(ExitCode::FAILURE);
    }

    info!("Extraction finished (success: {})", response.is_success());
    Ok(ExitCode::SUCCESS)
}

fn read_request(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            Ok(fs::read_to_string(path)?)
        }
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

pub fn format_response(
    response: &ExtractionResponse,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Json => Ok(serde_json::to_string(response)?),
        OutputFormat::Csv => format_csv(response),
        OutputFormat::Text => Ok(format_text(response)),
    }
}

fn format_csv(response: &ExtractionResponse) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "success",
        "amount",
        "currency",
        "direction",
        "confidence",
        "source",
        "sender_name",
        "account_number",
        "errors",
    ])?;

    match response.record() {
        Some(record) => wtr.write_record([
            "true",
            &record.result.amount.to_string(),
            record.result.currency.code(),
            &record.direction.to_string(),
            &format!("{:.2}", record.result.confidence),
            record.result.source.as_str(),
            record.sender_name.as_deref().unwrap_or(""),
            record.account_number.as_deref().unwrap_or(""),
            "",
        ])?,
        None => wtr.write_record([
            "false",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            &response.errors().join("; "),
        ])?,
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(response: &ExtractionResponse) -> String {
    let mut output = String::new();

    match response.record() {
        Some(record) => {
            output.push_str(&format!(
                "Amount: {:.2} {}\n",
                record.result.amount, record.result.currency
            ));
            output.push_str(&format!("Direction: {}\n", record.direction));
            if let Some(sender) = &record.sender_name {
                output.push_str(&format!("Sender: {}\n", sender));
            }
            if let Some(account) = &record.account_number {
                output.push_str(&format!("Account: {}\n", account));
            }
            output.push_str(&format!(
                "Source: {} (confidence {:.2})\n",
                record.result.source, record.result.confidence
            ));
        }
        None => {
            output.push_str("No payment found\n");
            for error in response.errors() {
                output.push_str(&format!("  - {}\n", error));
            }
        }
    }

    let diagnostics = response.diagnostics();
    if !diagnostics.steps.is_empty() {
        output.push_str("\nSteps:\n");
        for step in &diagnostics.steps {
            output.push_str(&format!("  {}\n", step));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_row() {
        let response = PaymentExtractor::new().extract(&ExtractionInput::text(
            "Transfer from JOHN DOE to you. Amount: NGN 1,500.00",
        ));

        let csv = format_response(&response, OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "true,1500,NGN,credit,0.80,text_body,john doe,,");
    }

    #[test]
    fn test_text_failure() {
        let response = PaymentExtractor::new().extract(&ExtractionInput::text("hello"));

        let text = format_response(&response, OutputFormat::Text, false).unwrap();
        assert!(text.starts_with("No payment found\n  - All extraction strategies failed\n"));
    }
}
