pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod models;
pub mod persistence;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::CommandFactory;
use cli::{Cli, Commands};
pub use config::Config;
use catalog::{CatalogSession, GenreFilter, MergePolicy, QueryConfig};
use models::record::{RecordDraft, parse_genre_list};
use persistence::{FileGateway, HttpGateway, MemoryGateway, PersistenceGateway};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Loads `path` when given, otherwise searches the default locations.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) if path.exists() => Config::load_from_path(path)?,
        Some(_) | None => Config::load()?,
    };
    config.validate()?;
    Ok(config)
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let prometheus_handle = if config.observability.metrics_enabled
        && matches!(cli.command, Some(Commands::Serve))
    {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json = config.general.log_format == "json";

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    if prometheus_handle.is_some() {
        info!("Prometheus metrics recorder initialized");
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = StoreTarget::from_flags(cli.remote.as_deref(), cli.ephemeral);

    match command {
        Commands::Serve => {
            let gateway = build_gateway(&config, store)?;
            cli::cmd_serve(config, gateway, prometheus_handle).await
        }

        Commands::List {
            search,
            category,
            genre,
            mode,
            page,
        } => {
            let session = open_session(&config, store).await?;
            let query = QueryConfig {
                search,
                category,
                genre: GenreFilter::new(&genre),
                mode,
                page,
            };
            cli::cmd_list_records(&session, &query)
        }

        Commands::Counts => {
            let session = open_session(&config, store).await?;
            cli::cmd_counts(&session)
        }

        Commands::Add {
            title,
            category,
            status,
            rating,
            genres,
            rank,
            url,
            image,
            description,
        } => {
            let draft = RecordDraft {
                title: title.join(" "),
                category,
                status,
                rating,
                description: description.unwrap_or_default(),
                image_url: image.unwrap_or_default(),
                playback_url: url,
                manual_rank: rank,
                genres: genres.as_deref().map(parse_genre_list).unwrap_or_default(),
            };
            let mut session = open_session(&config, store).await?;
            cli::cmd_add_record(&mut session, draft).await
        }

        Commands::Remove { id } => {
            let mut session = open_session(&config, store).await?;
            cli::cmd_remove_record(&mut session, &id).await
        }

        Commands::Import { file, replace } => {
            let policy = if replace {
                MergePolicy::Replace
            } else {
                MergePolicy::Merge
            };
            let mut session = open_session(&config, store).await?;
            cli::cmd_import(&mut session, &file, policy).await
        }

        Commands::Export { file } => {
            let session = open_session(&config, store).await?;
            cli::cmd_export(&session, &file).await
        }

        Commands::Init => cmd_init(cli.config.as_deref()),
    }
}

/// Where a command keeps its catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTarget<'a> {
    /// The JSON file under the configured data directory.
    File,
    /// A remote server's `/api/data` endpoint.
    Remote(&'a str),
    /// In-process memory; nothing is read from or written to disk.
    Ephemeral,
}

impl<'a> StoreTarget<'a> {
    #[must_use]
    pub const fn from_flags(remote: Option<&'a str>, ephemeral: bool) -> Self {
        match (remote, ephemeral) {
            (_, true) => Self::Ephemeral,
            (Some(base_url), false) => Self::Remote(base_url),
            (None, false) => Self::File,
        }
    }
}

pub fn build_gateway(
    config: &Config,
    store: StoreTarget<'_>,
) -> anyhow::Result<Arc<dyn PersistenceGateway>> {
    match store {
        StoreTarget::Remote(base_url) => {
            info!("Using remote store at {}", base_url);
            let timeout = Duration::from_secs(config.general.remote_timeout_seconds);
            let gateway =
                HttpGateway::new(base_url, timeout).context("Failed to create remote gateway")?;
            Ok(Arc::new(gateway))
        }
        StoreTarget::Ephemeral => {
            info!("Using in-memory store; changes will not be saved");
            Ok(Arc::new(MemoryGateway::new(
                config.general.store_key.clone(),
            )))
        }
        StoreTarget::File => Ok(Arc::new(FileGateway::new(
            config.data_dir(),
            config.general.store_key.clone(),
        ))),
    }
}

async fn open_session(config: &Config, store: StoreTarget<'_>) -> anyhow::Result<CatalogSession> {
    let gateway = build_gateway(config, store)?;
    let store_key = gateway.store_key().to_string();
    CatalogSession::open(gateway)
        .await
        .with_context(|| format!("Failed to load catalog snapshot '{store_key}'"))
}

fn cmd_init(path: Option<&Path>) -> anyhow::Result<()> {
    let created = match path {
        Some(path) if path.exists() => false,
        Some(path) => {
            Config::default().save_to_path(path)?;
            true
        }
        None => Config::create_default_if_missing()?,
    };

    if created {
        println!("✓ Config file created. Edit config.toml and run again.");
    } else {
        println!("Config file already exists.");
    }
    Ok(())
}
