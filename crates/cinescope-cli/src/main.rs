//! cinescope - browse and search TMDB movies from the terminal.

/// Application configuration (TOML).
mod config;
/// Text rendering of controller state.
mod render;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cinescope_api::tmdb::{ImageSize, TimeWindow, TmdbClient, image_url};
use cinescope_query::search::execute;
use cinescope_query::{
    DetailController, LandingController, LandingTab, SearchController, SearchInput, SearchSession,
    SearchSnapshot,
};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{API_KEY_ENV, AppConfig, resolve_config_path};
use crate::render::{log_detail, log_movies, log_search};

/// Stdin line that submits the current query in `live-search`.
const SUBMIT_COMMAND: &str = ":submit";

/// Capacity of the `live-search` input channel.
const INPUT_BUFFER: usize = 32;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the landing lists (trending, popular, top rated).
    Home(HomeArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Search as you type: each stdin line replaces the query.
    ///
    /// A blank line clears the search and `:submit` searches immediately.
    LiveSearch,
    /// Show details for a single movie.
    Details(DetailsArgs),
    /// Print a TMDB image CDN URL.
    ImageUrl(ImageUrlArgs),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Landing tab.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TabArg {
    /// Trending movies.
    Trending,
    /// Popular movies.
    Popular,
    /// Top rated movies.
    TopRated,
}

impl From<TabArg> for LandingTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Trending => Self::Trending,
            TabArg::Popular => Self::Popular,
            TabArg::TopRated => Self::TopRated,
        }
    }
}

/// Trending time window.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WindowArg {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
}

impl From<WindowArg> for TimeWindow {
    fn from(window: WindowArg) -> Self {
        match window {
            WindowArg::Day => Self::Day,
            WindowArg::Week => Self::Week,
        }
    }
}

/// Image size token.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SizeArg {
    /// 92px wide.
    W92,
    /// 154px wide.
    W154,
    /// 185px wide.
    W185,
    /// 342px wide.
    W342,
    /// 500px wide.
    W500,
    /// 780px wide.
    W780,
    /// Original upload.
    Original,
}

impl From<SizeArg> for ImageSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::W92 => Self::W92,
            SizeArg::W154 => Self::W154,
            SizeArg::W185 => Self::W185,
            SizeArg::W342 => Self::W342,
            SizeArg::W500 => Self::W500,
            SizeArg::W780 => Self::W780,
            SizeArg::Original => Self::Original,
        }
    }
}

/// Arguments for the `home` subcommand.
#[derive(clap::Args)]
struct HomeArgs {
    /// List to print.
    #[arg(long, value_enum, default_value_t = TabArg::Trending)]
    tab: TabArg,
    /// Trending time window.
    #[arg(long, value_enum, default_value_t = WindowArg::Week)]
    window: WindowArg,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for (e.g. "Dune").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `image-url` subcommand.
#[derive(clap::Args)]
struct ImageUrlArgs {
    /// Image path as returned by TMDB (e.g. "/abc.jpg").
    #[arg(long)]
    path: Option<String>,
    /// Image size.
    #[arg(long, value_enum, default_value_t = SizeArg::W500)]
    size: SizeArg,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a default config file if none exists.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// TMDB v3 API key to store.
    #[arg(long)]
    api_key: Option<String>,
}

/// Loads the config file for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Builds the TMDB client from config and environment.
///
/// # Errors
///
/// Returns an error if no API key is configured, `tmdb.base_url` is not a
/// valid URL, or the client fails to build.
#[instrument(skip_all)]
fn build_client(config: &AppConfig) -> Result<Arc<TmdbClient>> {
    let api_key = config
        .api_key(std::env::var(API_KEY_ENV).ok())
        .with_context(|| {
            format!("TMDB API key is required: set {API_KEY_ENV} or tmdb.api_key in config.toml")
        })?;

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.timeout());
    if let Some(base_url) = config.tmdb.base_url.as_deref() {
        let url =
            Url::parse(base_url).with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    let client = builder.build().context("failed to build TMDB client")?;
    Ok(Arc::new(client))
}

/// Runs the `home` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the landing lists fail to load.
#[instrument(skip_all)]
async fn run_home(args: &HomeArgs, config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;
    let mut controller = LandingController::new(client).with_window(args.window.into());
    controller.select_tab(args.tab.into());

    controller.load().await;
    if let Some(message) = controller.state().error_message() {
        bail!("{message}");
    }

    log_movies(controller.active_movies());
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;
    let mut controller = SearchController::new(config.debounce());
    controller.set_query(&args.query, Instant::now());

    let Some(request) = controller.submit() else {
        tracing::info!("Nothing to search: query is blank");
        return Ok(());
    };
    let response = execute(client.as_ref(), request).await;
    controller.apply(response);

    let snapshot = controller.snapshot();
    if let Some(message) = snapshot.state.error_message() {
        bail!("{message}");
    }
    log_search(&snapshot);
    Ok(())
}

/// Reads query lines from stdin into the session until EOF, then asks the
/// session to finish once the last input has settled.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
fn read_queries(tx: &mpsc::Sender<SearchInput>) -> Result<()> {
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let input = if line.trim() == SUBMIT_COMMAND {
            SearchInput::Submit
        } else {
            SearchInput::Query(line)
        };
        if tx.blocking_send(input).is_err() {
            return Ok(());
        }
    }
    if tx.blocking_send(SearchInput::Finish).is_err() {
        tracing::debug!("search session already closed");
    }
    Ok(())
}

/// Logs every published snapshot until the session ends.
async fn render_updates(mut snapshots: watch::Receiver<SearchSnapshot>) {
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        log_search(&snapshot);
    }
}

/// Runs the `live-search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or stdin cannot be read.
#[instrument(skip_all)]
async fn run_live_search(config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    let (session, snapshots) =
        SearchSession::new(client, SearchController::new(config.debounce()), rx);

    let reader = tokio::task::spawn_blocking(move || read_queries(&tx));
    let (_, read, ()) = tokio::join!(session.run(), reader, render_updates(snapshots));
    read.context("stdin reader task failed")?
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the detail fails to load.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;
    let mut controller = DetailController::new(client);

    controller.load(args.id).await;
    if let Some(message) = controller.state().error_message() {
        bail!("{message}");
    }

    let detail = controller.detail().context("no movie detail was loaded")?;
    log_detail(detail);
    Ok(())
}

/// Runs the `image-url` subcommand.
fn run_image_url(args: &ImageUrlArgs) {
    tracing::info!("{}", image_url(args.path.as_deref(), args.size.into()));
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() {
        tracing::info!("Config already exists: {}", path.display());
        return Ok(());
    }

    let mut config = AppConfig::default();
    config.tmdb.api_key.clone_from(&args.api_key);
    config.save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Home(args) => run_home(&args, &load_config(dir)?).await,
        Commands::Search(args) => run_search(&args, &load_config(dir)?).await,
        Commands::LiveSearch => run_live_search(&load_config(dir)?).await,
        Commands::Details(args) => run_details(&args, &load_config(dir)?).await,
        Commands::ImageUrl(args) => {
            run_image_url(&args);
            Ok(())
        }
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, dir),
        },
    }
}
