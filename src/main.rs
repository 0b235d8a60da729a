// src/main.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use trailhub::config::Config;
use trailhub::integrations::{
    canonical_watch_url, CatalogProvider, FfprobeProbe, SearchProvider, TmdbClient, YouTubeClient,
    YtDlpDownloader,
};
use trailhub::{ReconcileService, ScanService, SelectionService, StatsService, TrailerService};

/// Fetch, upgrade, and maintain movie trailers for a local library.
#[derive(Parser, Debug)]
#[command(name = "trailhub", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "trailhub.toml")]
    config: PathBuf,

    /// Report decisions without downloading or touching any movie directory
    #[arg(long)]
    dry_run: bool,

    /// Report library trailer coverage and exit (no downloads, no writes)
    #[arg(long, conflicts_with_all = ["movie_dir", "url"])]
    stats: bool,

    /// Limit how many titles each stats listing shows (0 = no limit)
    #[arg(long, default_value_t = 0)]
    list_limit: usize,

    /// Fetch for a single movie directory instead of scanning the roots
    #[arg(long, requires = "url")]
    movie_dir: Option<PathBuf>,

    /// YouTube URL or video id to fetch for --movie-dir
    #[arg(long, requires = "movie_dir")]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // 1. CONFIGURATION - any error here is fatal before work starts
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let policy = config.selection_policy();
    let scanner = ScanService::new(config.video_extensions());
    let probe = Arc::new(FfprobeProbe::new());

    // 2. STATS MODE - scan + probe only, no provider credentials needed
    if cli.stats {
        config.validate_library().context("validating config")?;
        let stats = StatsService::new(
            probe,
            config.settings.trailer_suffix.clone(),
            config.settings.preferred_height,
        );
        let movies = scanner.scan_roots(&config.paths.roots);
        stats.report(&movies).log_report(cli.list_limit);
        return Ok(());
    }

    // 3. PIPELINE WIRING
    let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbClient::new(
        config.auth.tmdb_api_key.clone(),
        &config.settings.language,
    ));
    let search: Arc<dyn SearchProvider> = Arc::new(YouTubeClient::new(
        config.auth.youtube_api_key.clone(),
        &config.settings.language,
    ));
    let downloader = Arc::new(YtDlpDownloader::new());

    let selector = SelectionService::new(policy.clone());
    let reconciler = ReconcileService::new(
        probe,
        downloader,
        policy,
        config.settings.trailer_suffix.clone(),
        config.settings.temp_dir.clone(),
    );
    let pipeline = TrailerService::new(catalog, search, selector, reconciler, cli.dry_run);

    if cli.dry_run {
        log::info!("Dry run: no downloads, no file changes");
    }

    // 4. MANUAL MODE - one movie, one user-supplied URL, no provider calls
    if let (Some(dir), Some(reference)) = (cli.movie_dir.as_deref(), cli.url.as_deref()) {
        config.validate_base().context("validating config")?;
        let url = canonical_watch_url(reference)
            .with_context(|| format!("not a recognizable YouTube URL or id: {}", reference))?;
        let movie = scanner
            .scan_single(dir)
            .with_context(|| format!("no movie video found in {}", dir.display()))?;

        let summary = pipeline.run_single(&movie, &url).await;
        if summary.failed > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    // 5. LIBRARY RUN
    config.validate().context("validating config")?;
    let movies = scanner.scan_roots(&config.paths.roots);
    if movies.is_empty() {
        log::warn!("No movies found under the configured roots");
        return Ok(());
    }

    let summary = pipeline.run(&movies).await;
    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
