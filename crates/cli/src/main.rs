mod echo;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use referent_core::{
    CompletionConfig, Extraction, FailureReason, Fetcher, HttpFetcher, HuggingFaceClient, ImageConfig,
    OpenRouterClient, Reader, ReaderConfig, Task, fetch_file, fetch_stdin, illustrate, run_task,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::echo::{
    format_size, print_banner, print_error, print_extraction_details, print_info, print_step, print_success,
    print_timing_summary, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// What to generate from the extracted article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliTask {
    Generate(Task),
    Illustration,
}

impl FromStr for CliTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "illustration" | "image" => Ok(Self::Illustration),
            "summary" | "thesis" | "telegram" | "translate" => s.parse().map(Self::Generate),
            _ => Err(format!(
                "Invalid task: {}. Valid options: summary, thesis, telegram, translate, illustration",
                s
            )),
        }
    }
}

/// Extract article text from web pages and derive summaries, posts and translations from it
#[derive(Parser, Debug)]
#[command(name = "referent")]
#[command(version)]
#[command(about = "Extract article text from web pages", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Generate an artifact from the article (summary, thesis, telegram, translate, illustration)
    #[arg(short, long, value_name = "TASK")]
    task: Option<CliTask>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Result of the final step, ready to be written out
enum Rendered {
    Text(String),
    Bytes(Vec<u8>),
}

fn is_http_url(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn completion_client() -> anyhow::Result<OpenRouterClient> {
    let api_key = env::var("OPENROUTER_API_KEY").context("OPENROUTER_API_KEY is not set")?;
    let mut config = CompletionConfig::with_api_key(api_key);
    if let Ok(app_url) = env::var("REFERENT_APP_URL") {
        config.referer = app_url;
    }
    Ok(OpenRouterClient::new(config))
}

fn image_client() -> anyhow::Result<HuggingFaceClient> {
    let api_key = env::var("HUGGINGFACE_API_KEY").context("HUGGINGFACE_API_KEY is not set")?;
    Ok(HuggingFaceClient::new(ImageConfig::with_api_key(api_key)))
}

fn render_extraction(extraction: &Extraction, content: &str, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("{}\n", content)),
        OutputFormat::Json => {
            let value = json!({
                "content": content,
                "title": extraction.metadata.title,
                "date": extraction.metadata.date,
            });
            serde_json::to_string_pretty(&value).context("Failed to serialize JSON")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let started = Instant::now();
    let mut timings = Vec::new();
    let total_steps = if args.task.is_some() { 4 } else { 3 };

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("referent_core=debug"))
            .with_writer(std::io::stderr)
            .init();
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let mut builder = ReaderConfig::builder().timeout(args.timeout);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    let reader = Reader::with_config(builder.build());

    let phase = Instant::now();
    let source_url = is_http_url(&args.input).then_some(args.input.as_str());
    let html = if args.input == "-" {
        if args.verbose {
            print_step(1, total_steps, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if let Some(url) = source_url {
        if args.verbose {
            print_step(1, total_steps, &format!("Fetching from {}", url.bright_white().underline()));
        }
        let fetcher = HttpFetcher::new(reader.config().fetch.clone()).context("Failed to build HTTP client")?;
        fetcher.fetch(url).await.context("Failed to fetch URL")?
    } else {
        if args.verbose {
            print_step(1, total_steps, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };
    timings.push(("Read", phase.elapsed()));

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        eprintln!();
        print_step(2, total_steps, "Extracting article text");
    }

    let phase = Instant::now();
    let extraction = match source_url {
        Some(url) => reader.extract_html_with_url(&html, url),
        None => reader.extract_html(&html),
    }
    .context("Failed to extract content")?;
    timings.push(("Extract", phase.elapsed()));

    if args.verbose {
        print_extraction_details(&extraction);
    }

    let Some(content) = extraction.content() else {
        let reason = extraction.outcome.failure_reason().unwrap_or(FailureReason::NotFound);
        print_error(reason.message());
        bail!("extraction failed ({:?})", reason);
    };

    let rendered = match args.task {
        None => Rendered::Text(render_extraction(&extraction, content, args.format)?),
        Some(CliTask::Generate(task)) => {
            if args.verbose {
                print_step(3, total_steps, &format!("Generating {}", task.name()));
            }
            let client = completion_client()?;
            let phase = Instant::now();
            let result = run_task(&client, task, content, source_url)
                .await
                .with_context(|| format!("Failed to generate {}", task.name()))?;
            timings.push(("Generate", phase.elapsed()));

            match args.format {
                OutputFormat::Text => Rendered::Text(format!("{}\n", result)),
                OutputFormat::Json => {
                    let value = json!({
                        "task": task.name(),
                        "result": result,
                        "title": extraction.metadata.title,
                        "date": extraction.metadata.date,
                    });
                    Rendered::Text(serde_json::to_string_pretty(&value).context("Failed to serialize JSON")?)
                }
            }
        }
        Some(CliTask::Illustration) => {
            if args.verbose {
                print_step(3, total_steps, "Generating illustration");
            }
            let completion = completion_client()?;
            let images = image_client()?;
            let phase = Instant::now();
            let (prompt, image) = illustrate(&completion, &images, content)
                .await
                .context("Failed to generate illustration")?;
            timings.push(("Illustrate", phase.elapsed()));

            if args.verbose {
                print_info(&format!("Prompt: {}", prompt.trim()));
            }
            match (args.format, &args.output) {
                (OutputFormat::Json, _) => {
                    let value = json!({ "prompt": prompt, "illustration": image.to_data_url() });
                    Rendered::Text(serde_json::to_string_pretty(&value).context("Failed to serialize JSON")?)
                }
                (OutputFormat::Text, Some(_)) => Rendered::Bytes(image.bytes),
                (OutputFormat::Text, None) => Rendered::Text(format!("{}\n", image.to_data_url())),
            }
        }
    };

    if args.verbose {
        print_step(total_steps, total_steps, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    match (&args.output, rendered) {
        (Some(path), Rendered::Text(text)) => {
            fs::write(path, text).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        (Some(path), Rendered::Bytes(bytes)) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Image written to {}", path.display().bright_white()));
        }
        (None, Rendered::Text(text)) => print!("{}", text),
        (None, Rendered::Bytes(_)) => print_warning("Image output requires --output"),
    }

    if args.verbose {
        print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}
