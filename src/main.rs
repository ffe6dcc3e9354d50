use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use tiktok_user_scraper::export::{timestamped_filename, FILENAME_PREFIX};
use tiktok_user_scraper::models::SearchInput;
use tiktok_user_scraper::{
    Config, DatasetExporter, FixedDelayPacer, Paginator, RunOptions, ScrapePipeline, SearchClient,
};

#[derive(Parser, Debug)]
#[command(name = "tiktok-user-scraper")]
#[command(version = "0.1.0")]
#[command(about = "Search TikTok users by keyword and export the results")]
struct Args {
    /// Path to input JSON file containing keywords and limits
    #[arg(long, default_value = "data/input.sample.json")]
    input: PathBuf,

    /// Path to configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to store exported datasets (overrides config)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format: json, csv, xlsx, html, xml (overrides input and config)
    #[arg(long)]
    output_format: Option<String>,

    /// Maximum number of users to fetch per keyword (overrides input and config)
    #[arg(long)]
    max_items: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    // Initialize logging
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(config.log_directive()).add_directive("reqwest=warn".parse()?),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting TikTok Users Scraper");

    let input = SearchInput::from_file(&args.input).inspect_err(|e| {
        tracing::error!("Failed to load input file {}: {}", args.input.display(), e);
    })?;

    let options = RunOptions::resolve(
        args.max_items,
        args.output_format.as_deref(),
        args.output_dir.as_deref(),
        &input,
        &config,
    )?;

    tracing::info!(
        "Resolved configuration - keywords={:?}, max_items={}, output_format={}, output_dir={}",
        input.keywords,
        options.max_items,
        options.format,
        options.output_dir.display()
    );

    let client = SearchClient::new(&config.tiktok.base_url, &config.tiktok.user_agent)?;
    let pacer = FixedDelayPacer::from_secs_f64(config.scraper.sleep_between_requests)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current request");
            ctrl_c.cancel();
        }
    });

    let paginator = Paginator::new(Arc::new(client), Arc::new(pacer), config.request_timeout()?)
        .with_cancellation(cancel);
    let pipeline = ScrapePipeline::new(paginator, options.max_items);

    let users = pipeline.run(&input.keywords).await;

    if users.is_empty() {
        tracing::warn!("No users were collected for any keyword. Nothing to export.");
        return Ok(());
    }

    let base_filename = timestamped_filename(FILENAME_PREFIX, Utc::now());
    let output_path = DatasetExporter::new()
        .export(&users, options.format, &options.output_dir, &base_filename)
        .inspect_err(|e| tracing::error!("Failed to export dataset: {}", e))?;

    tracing::info!("Export complete. File saved to: {}", output_path.display());
    println!("{}", output_path.display());

    Ok(())
}
