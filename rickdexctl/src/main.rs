use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rickdex_config::{Config, ConfigLoader};
use rickdex_core::{ApiClient, CharacterApi, ResultTable};
use rickdex_model::{CharacterQuery, CharacterStatus, FilterField, PageIndex};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod browse;
mod render;

#[derive(Parser)]
#[command(
    name = "rickdexctl",
    version,
    about = "Search and browse Rick and Morty characters"
)]
struct Cli {
    /// TOML configuration file (defaults to $RICKDEX_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Load environment overrides from this .env file first
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one page and print it
    Search {
        /// Name substring to search for
        #[arg(long, default_value = "")]
        name: String,
        /// Server-side status filter: alive, dead or unknown
        #[arg(long)]
        status: Option<CharacterStatus>,
        /// One-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Narrow the printed rows locally
        #[arg(long)]
        filter: Option<String>,
        /// Field the local filter matches against
        #[arg(long)]
        field: Option<FilterField>,
    },
    /// Interactive search driven by stdin (type :help for commands)
    Browse,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    let load = loader.load().context("failed to load configuration")?;

    if let Some(path) = &load.config.metadata.config_file {
        info!(path = %path.display(), "loaded config file");
    }
    if load.config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    for warning in load.warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }
    Ok(load.config)
}

async fn search(
    config: &Config,
    api: &dyn CharacterApi,
    query: CharacterQuery,
    filter: Option<String>,
    field: Option<FilterField>,
) -> Result<()> {
    let page = api
        .fetch_characters(&query)
        .await
        .with_context(|| format!("search for '{}' failed", query.name))?;

    let mut table =
        ResultTable::new(field.unwrap_or(config.table.filter_field));
    table.replace(Arc::new(page));
    if let Some(filter) = filter {
        table.set_filter(&filter);
    }

    let mut out = std::io::stdout().lock();
    render::table(&mut out, &table)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rickdex_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let client = Arc::new(
        ApiClient::from_config(&config.api)
            .context("failed to build API client")?,
    );

    match cli.command {
        Command::Search {
            name,
            status,
            page,
            filter,
            field,
        } => {
            let page = PageIndex::from_wire(page)
                .context("page numbers start at 1")?;
            let query = CharacterQuery::new(name, page).with_status(status);
            search(&config, client.as_ref(), query, filter, field).await
        }
        Command::Browse => browse::run(&config, client).await,
    }
}
