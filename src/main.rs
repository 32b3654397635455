use anyhow::{bail, Context, Result};
use clap::Parser;
use failure_explainer::attachment::AttachmentInput;
use failure_explainer::models::Config;
use failure_explainer::{report, Analyzer, Error};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "failure-explainer")]
#[command(about = "Explain a failure from its error log, context and screenshots")]
struct CliArgs {
    /// Error log file, or `-` to read it from stdin.
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Free-text context about what was happening when it failed.
    #[arg(short, long, default_value = "")]
    context: String,

    /// Image or video file to include as evidence. May be repeated.
    #[arg(short, long = "attach", value_name = "FILE")]
    attachments: Vec<PathBuf>,

    /// Print the result as JSON instead of a text report.
    #[arg(long)]
    json: bool,
}

// Invalid UTF-8 in the log is replaced, not rejected.
async fn read_log(path: Option<&PathBuf>) -> Result<String> {
    let bytes = match path {
        None => return Ok(String::new()),
        Some(path) if path.as_os_str() == "-" => {
            let mut bytes = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut bytes)
                .await
                .context("Failed to read log from stdin")?;
            bytes
        }
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read log file {}", path.display()))?,
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn run(args: CliArgs, config: Config) -> Result<()> {
    let log = read_log(args.log.as_ref()).await?;
    if log.trim().is_empty() && args.attachments.is_empty() {
        bail!("Nothing to analyze: provide an error log (--log) or at least one attachment (--attach)");
    }

    let analyzer = Analyzer::new(&config);
    if !analyzer.is_configured() {
        return Err(Error::MissingCredential.into());
    }

    let mut files = Vec::with_capacity(args.attachments.len());
    for path in &args.attachments {
        let input = AttachmentInput::from_path(path).await?;
        info!(
            "Attaching {} ({}, {} bytes)",
            input.display_name, input.media_type, input.size_bytes
        );
        files.push(input);
    }

    info!("Analyzing failure...");
    let result = analyzer.analyze(&log, &args.context, files).await?;

    if args.json {
        println!("{}", report::render_json(&result)?);
    } else {
        print!("{}", report::render_text(&result));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "failure_explainer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let result = match Config::from_env() {
        Ok(config) => run(args, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            if let Some(raw) = e
                .downcast_ref::<Error>()
                .and_then(|e| e.raw_response())
            {
                eprintln!("Raw model response:\n{}", raw);
            }
            std::process::exit(1);
        }
    }
}
