//! Genart CLI - Command-line client for the Genart job service

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use genart_sdk::{GenartClient, Image, JobRow, JobState, LoadOutcome, SdkError};
use tabled::{Table, Tabled};

const DEFAULT_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "genart-cli")]
#[command(about = "Genart job service CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service base URL
    #[arg(long, env = "GENART_URL", default_value = DEFAULT_URL)]
    url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List available generators
    Generators,

    /// Submit an asynchronous render job
    Submit {
        /// Generator name (see `generators`)
        generator: String,
    },

    /// Fetch a job's image, or report that it is still pending
    Poll {
        /// Job ID
        id: String,

        /// Keep polling until the job finishes
        #[arg(short, long)]
        wait: bool,

        /// Write the finished image here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delay between polls when waiting
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Give up waiting after this many seconds (0 = never)
        #[arg(long, default_value = "0")]
        timeout_secs: u64,
    },

    /// Show a job's state
    Status {
        /// Job ID
        id: String,
    },

    /// Render synchronously and save the image
    Draw {
        /// Generator name
        generator: String,

        /// Output file (default: <generator>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List submitted jobs
    Jobs,

    /// Show service health
    Health,
}

#[derive(Tabled)]
struct JobTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Generator")]
    generator: String,
    #[tabled(rename = "Submitted")]
    submitted: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<JobRow> for JobTableRow {
    fn from(row: JobRow) -> Self {
        let submitted = chrono::DateTime::from_timestamp_millis(row.submitted_at)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| row.submitted_at.to_string());
        Self {
            id: row.id,
            generator: row.generator,
            submitted,
            url: row.url,
        }
    }
}

async fn save(image: &Image, path: &Path) -> Result<()> {
    tokio::fs::write(path, &image.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "{}",
        format!(
            "✓ Saved {} ({} bytes, {})",
            path.display(),
            image.bytes.len(),
            image.media_type
        )
        .green()
        .bold()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = GenartClient::new(&cli.url).context("Invalid service URL")?;

    match cli.command {
        Commands::Generators => {
            let generators = client
                .generators()
                .await
                .context("Failed to list generators")?;
            println!("{}", "Available generators".cyan().bold());
            for name in generators {
                println!("  {} {}", "•".bold(), name);
            }
        }

        Commands::Submit { generator } => match client.submit(&generator).await {
            Ok(job) => {
                println!("{}", "✓ Job submitted successfully".green().bold());
                println!();
                println!("  {} {}", "ID:".bold(), job.id);
                println!("  {} {}", "Poll:".bold(), job.url);
            }
            Err(e @ SdkError::Api { .. }) if e.is_retryable() => {
                anyhow::bail!("Service busy, try again shortly: {}", e);
            }
            Err(e) => return Err(e).context("Submission failed"),
        },

        Commands::Poll {
            id,
            wait,
            output,
            interval_ms,
            timeout_secs,
        } => {
            let image = if wait {
                let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
                println!("{}", format!("Waiting for job {}...", id).cyan());
                client
                    .wait_for(&id, Duration::from_millis(interval_ms), timeout)
                    .await?
            } else {
                match client.load(&id).await? {
                    LoadOutcome::Ready(image) => image,
                    LoadOutcome::Pending(_) => {
                        println!("{}", format!("○ Job {} is still pending", id).yellow());
                        return Ok(());
                    }
                    LoadOutcome::Failed(reason) => {
                        anyhow::bail!("Job {} failed: {}", id, reason);
                    }
                }
            };

            match output {
                Some(path) => save(&image, &path).await?,
                None => println!(
                    "{}",
                    format!("✓ Job {} ready ({} bytes)", id, image.bytes.len())
                        .green()
                        .bold()
                ),
            }
        }

        Commands::Status { id } => {
            let status = client.status(&id).await?;
            let state = match status.state {
                JobState::Pending => status.state.to_string().yellow(),
                JobState::Ready => status.state.to_string().green(),
                JobState::Failed => status.state.to_string().red(),
            };
            println!("  {} {}", "ID:".bold(), status.id);
            println!("  {} {}", "State:".bold(), state);
            if let Some(error) = status.error {
                println!("  {} {}", "Error:".bold(), error);
            }
        }

        Commands::Draw { generator, output } => {
            let image = client.draw(&generator).await.context("Draw failed")?;
            let path =
                output.unwrap_or_else(|| PathBuf::from(format!("{}.{}", generator, image.extension())));
            save(&image, &path).await?;
        }

        Commands::Jobs => {
            let jobs = client.jobs().await?;
            if jobs.is_empty() {
                println!("{}", "No jobs submitted yet".yellow());
            } else {
                let rows: Vec<JobTableRow> = jobs.into_iter().map(JobTableRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Health => {
            println!("{}", "Service Status".cyan().bold());
            println!();

            match client.health().await {
                Ok(health) => {
                    println!("  {} {}", "URL:".bold(), client.base_url());
                    println!("  {} {}", "Status:".bold(), health.status.green());
                    println!("  {} {}", "Version:".bold(), health.version);
                    println!();
                    println!("  {} {}", "Submitted:".bold(), health.submitted_jobs);
                    println!("  {} {}", "Completed:".bold(), health.completed_jobs);
                    println!(
                        "  {} {}/{}",
                        "Busy workers:".bold(),
                        health.busy_workers,
                        health.workers
                    );
                    println!("  {} {}", "Queued:".bold(), health.queue_depth);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
