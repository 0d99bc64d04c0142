use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodqueue::config::{AppConfig, CliConfig, FileConfig};
use moodqueue::{
    HttpTrackCatalog, MoodClassifier, MoodQueueManager, NoopRemotePlayer, PlaybackQueueReconciler,
    PlaylistStore, ProfileAuthGate, ProfileStore, QueueState, ReconcilerSettings, RemotePlayer,
    SqliteKeyValueStore,
};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    config: Option<PathBuf>,

    /// Sqlite file holding the persisted profile and playlist snapshots.
    #[clap(long, value_parser = parse_path)]
    db_path: Option<PathBuf>,

    /// URL of the mood classification endpoint.
    #[clap(long)]
    mood_endpoint_url: Option<String>,

    /// Base URL of the track catalog service.
    #[clap(long)]
    catalog_url: Option<String>,

    /// Access token for the catalog service.
    #[clap(long)]
    catalog_token: Option<String>,

    /// Number of recommendations to request per mood.
    #[clap(long, default_value_t = 20)]
    limit: usize,

    /// Milliseconds between consecutive remote enqueue calls.
    #[clap(long, default_value_t = 500)]
    enqueue_delay_ms: u64,

    /// Milliseconds to wait for the remote player connection to come back.
    #[clap(long, default_value_t = 2000)]
    reconnect_delay_ms: u64,

    /// Timeout in seconds for mood classification requests.
    #[clap(long, default_value_t = 60)]
    classifier_timeout_secs: u64,

    /// Profile to operate as; created on first use.
    #[clap(long, default_value = "default")]
    profile: String,

    /// Pin unlocking the profile, if it has one set.
    #[clap(long)]
    pin: Option<String>,

    /// Comma-separated favorite genres, used when creating the profile.
    #[clap(long, value_delimiter = ',')]
    genres: Vec<String>,

    /// Date of birth for a newly created profile (YYYY-MM-DD).
    #[clap(long)]
    date_of_birth: Option<NaiveDate>,

    /// Queue tracks for this mood label directly.
    #[clap(long)]
    mood: Option<String>,

    /// Detect the mood from this JPEG image, then queue for it.
    #[clap(long, value_parser = parse_path)]
    image: Option<PathBuf>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            db_path: args.db_path.clone(),
            mood_endpoint_url: args.mood_endpoint_url.clone(),
            catalog_base_url: args.catalog_url.clone(),
            catalog_token: args.catalog_token.clone(),
            recommendation_limit: args.limit,
            enqueue_delay_ms: args.enqueue_delay_ms,
            reconnect_delay_ms: args.reconnect_delay_ms,
            classifier_timeout_secs: args.classifier_timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    info!("Opening key/value store at {:?}...", config.db_path);
    let kv_store = Arc::new(SqliteKeyValueStore::new(&config.db_path)?);

    let profile_store = ProfileStore::new(kv_store.clone());
    let playlist_store = Arc::new(PlaylistStore::new(kv_store));

    // No vendor SDK adapter is wired in this build; the noop player logs
    // every remote call and still emits track-changed events.
    let player = Arc::new(NoopRemotePlayer::new());
    player.connect().await?;

    let reconciler = Arc::new(PlaybackQueueReconciler::new(
        player.clone(),
        QueueState::new(),
        playlist_store.clone(),
        ReconcilerSettings {
            enqueue_delay: Duration::from_millis(config.enqueue_delay_ms),
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
        },
    ));

    let shutdown_token = CancellationToken::new();
    let event_loop = reconciler.clone().spawn_event_loop(shutdown_token.clone());

    let profile = match profile_store.find_by_name(&cli_args.profile) {
        Some(profile) => profile,
        None => {
            let date_of_birth = cli_args
                .date_of_birth
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
            profile_store.create(&cli_args.profile, date_of_birth, cli_args.genres.clone(), true)
        }
    };

    if !ProfileAuthGate::allows(&profile, cli_args.pin.as_deref().unwrap_or("")) {
        bail!("incorrect pin for profile {}", profile.name);
    }

    let mood = match (&cli_args.image, &cli_args.mood) {
        (Some(image_path), _) => {
            let endpoint = config
                .mood_endpoint_url
                .clone()
                .context("--mood-endpoint-url is required to detect a mood from an image")?;
            let jpeg = std::fs::read(image_path)
                .with_context(|| format!("Failed to read image {:?}", image_path))?;

            let classifier = MoodClassifier::new(endpoint, config.classifier_timeout_secs);
            let detection = classifier.detect(jpeg).await?;
            Some(detection.mood)
        }
        (None, Some(mood)) => Some(mood.clone()),
        (None, None) => None,
    };

    if let Some(mood) = mood {
        let Some(catalog_url) = config.catalog_base_url.clone() else {
            bail!("--catalog-url is required to queue tracks for a mood");
        };

        let catalog = Arc::new(HttpTrackCatalog::new(
            catalog_url,
            config.catalog_token.clone(),
            30,
        ));
        let manager = MoodQueueManager::new(catalog, reconciler.clone(), config.recommendation_limit);

        let confirmed = manager.queue_for_mood(&mood, &profile).await?;
        info!(
            "queued {} tracks for mood {}; {} playlists stored for {}",
            confirmed.len(),
            mood,
            playlist_store.list_for(profile.id).len(),
            profile.name
        );
    } else {
        warn!("no --mood or --image given, nothing to queue");
    }

    info!("running; press Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    shutdown_token.cancel();
    let _ = event_loop.await;

    Ok(())
}
