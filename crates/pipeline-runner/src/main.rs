mod config;
mod stages;

use ai_insights::GeminiClient;
use clap::{Parser, Subcommand};
use config::Config;
use data_store::DataStore;
use market_data::MarketDataClient;
use screener_core::{RateLimiter, ScreenerError};
use stages::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Requests per minute against the generation API.
const GENERATION_RPM: usize = 30;
/// Pause between stages in a full run.
const STAGE_PAUSE: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "smart-money-pipeline")]
#[command(about = "Smart money screening pipeline", long_about = None)]
struct Cli {
    /// Data directory (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Volume/accumulation analysis over the screening universe
    Volume,
    /// Institutional ownership and insider-signal scoring
    Institutional,
    /// ETF flow proxies plus AI commentary
    EtfFlows,
    /// Composite screen over the volume and institutional tables
    Screen,
    /// Insider clusters, options flow, portfolio risk, sector heatmap
    Pulse,
    /// Bilingual AI summaries for the top picks
    Summaries {
        /// Number of top picks to summarize
        #[arg(long, default_value_t = 20)]
        top: usize,
        /// Regenerate summaries that already exist
        #[arg(long)]
        refresh: bool,
    },
    /// Macro indicators plus bilingual strategy commentary
    Macro,
    /// Economic calendar with AI impact notes
    Calendar {
        /// Days ahead to cover
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
    /// Final quant/AI blended report
    Report {
        /// Number of picks in the report
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Run every stage in order, continuing past failures
    All {
        /// Skip AI generation stages
        #[arg(long)]
        quick: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn build_context(config: &Config, quick: bool) -> anyhow::Result<Context> {
    let store = DataStore::open(&config.data_dir)?;

    let market_limiter =
        RateLimiter::new(config.requests_per_minute, Duration::from_secs(60));
    let source = Arc::new(MarketDataClient::new(
        config.market_api_key.clone(),
        market_limiter,
    ));

    // Quick mode drops the credential so every AI path degrades to its
    // sentinel instead of calling out.
    let google_key = if quick { String::new() } else { config.google_api_key.clone() };
    let generator = Arc::new(GeminiClient::new(
        google_key,
        RateLimiter::new(GENERATION_RPM, Duration::from_secs(60)),
    ));

    Ok(Context {
        store,
        source,
        generator,
        tickers: config.tickers.clone(),
        bar_cache: dashmap::DashMap::new(),
    })
}

fn record(
    name: &'static str,
    result: Result<(), ScreenerError>,
    failed: &mut Vec<&'static str>,
) {
    match result {
        Ok(()) => tracing::info!(stage = name, "stage succeeded"),
        Err(e) => {
            tracing::error!(stage = name, error = %e, "stage failed, continuing");
            failed.push(name);
        }
    }
}

async fn run_all(ctx: &Context, quick: bool) -> anyhow::Result<()> {
    let mut failed = Vec::new();
    let started = std::time::Instant::now();

    record("volume", stages::run_volume(ctx).await, &mut failed);
    tokio::time::sleep(STAGE_PAUSE).await;
    record("institutional", stages::run_institutional(ctx).await, &mut failed);
    tokio::time::sleep(STAGE_PAUSE).await;
    record("etf-flows", stages::run_etf_flows(ctx).await, &mut failed);
    tokio::time::sleep(STAGE_PAUSE).await;
    record("screen", stages::run_screen(ctx).await, &mut failed);
    tokio::time::sleep(STAGE_PAUSE).await;
    record("pulse", stages::run_market_pulse(ctx).await, &mut failed);
    tokio::time::sleep(STAGE_PAUSE).await;

    if quick {
        tracing::info!("quick mode: skipping summary and macro generation");
    } else {
        record("summaries", stages::run_summaries(ctx, 20, false).await, &mut failed);
        tokio::time::sleep(STAGE_PAUSE).await;
        record("macro", stages::run_macro(ctx).await, &mut failed);
        tokio::time::sleep(STAGE_PAUSE).await;
    }

    record("calendar", stages::run_calendar(ctx, 7).await, &mut failed);
    tokio::time::sleep(STAGE_PAUSE).await;
    record("report", stages::run_report(ctx, 10).await, &mut failed);

    let minutes = started.elapsed().as_secs_f64() / 60.0;
    tracing::info!(
        failed = failed.len(),
        minutes = format!("{:.1}", minutes),
        "pipeline run finished"
    );

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("stages failed: {}", failed.join(", "))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let quick = matches!(&cli.command, Commands::All { quick: true });
    let ctx = build_context(&config, quick)?;

    match cli.command {
        Commands::Volume => stages::run_volume(&ctx).await?,
        Commands::Institutional => stages::run_institutional(&ctx).await?,
        Commands::EtfFlows => stages::run_etf_flows(&ctx).await?,
        Commands::Screen => stages::run_screen(&ctx).await?,
        Commands::Pulse => stages::run_market_pulse(&ctx).await?,
        Commands::Summaries { top, refresh } => {
            stages::run_summaries(&ctx, top, refresh).await?
        }
        Commands::Macro => stages::run_macro(&ctx).await?,
        Commands::Calendar { days } => stages::run_calendar(&ctx, days).await?,
        Commands::Report { top } => stages::run_report(&ctx, top).await?,
        Commands::All { quick } => run_all(&ctx, quick).await?,
    }

    Ok(())
}
