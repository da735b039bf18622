//! feedgraph command-line entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use feedgraph::Actions;
use feedgraph_cli::commands::{self, ChannelRequest};
use feedgraph_cli::config::{ClientConfig, ConfigOverrides};
use feedgraph_cli::transport::{FixtureActions, HttpActions};

#[derive(Parser)]
#[command(
    name = "feedgraph",
    about = "Browse InnerTube-style channel and settings feeds",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// API base URL. Also reads FEEDGRAPH_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API key sent with every request. Also reads FEEDGRAPH_API_KEY.
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Interface language. Also reads FEEDGRAPH_HL.
    #[arg(long, global = true)]
    hl: Option<String>,

    /// Content region. Also reads FEEDGRAPH_GL.
    #[arg(long, global = true)]
    gl: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Serve responses from a directory of saved JSON files instead of the
    /// network.
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved response and list the shapes found in it.
    Inspect {
        /// Path to a JSON response.
        file: PathBuf,
    },

    /// Show a channel, optionally one tab, one filter and further pages.
    Channel {
        /// Channel browse id (UC...).
        browse_id: String,

        /// Tab URL suffix (featured, videos, shorts, streams, playlists, ...).
        #[arg(long)]
        tab: Option<String>,

        /// Filter chip to apply.
        #[arg(long)]
        filter: Option<String>,

        /// Number of further list pages to follow.
        #[arg(long, default_value_t = 0)]
        pages: usize,
    },

    /// Show the account settings page.
    Settings {
        /// Sidebar item to open.
        #[arg(long)]
        item: Option<String>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   feedgraph completions bash > ~/.local/share/bash-completion/completions/feedgraph
    ///   feedgraph completions zsh > ~/.zfunc/_feedgraph
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

impl Cli {
    fn actions(&self) -> anyhow::Result<Arc<dyn Actions>> {
        if let Some(dir) = &self.fixtures {
            tracing::info!("Serving responses from {}", dir.display());
            return Ok(Arc::new(FixtureActions::new(dir)));
        }

        let config = ClientConfig::resolve(ConfigOverrides {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            hl: self.hl.clone(),
            gl: self.gl.clone(),
            timeout_ms: self.timeout_ms,
        })?;
        tracing::info!("Using {}", config.base_url);
        Ok(Arc::new(HttpActions::new(config)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let report = match &cli.command {
        Commands::Inspect { file } => commands::inspect(file).await?,

        Commands::Channel {
            browse_id,
            tab,
            filter,
            pages,
        } => {
            let request = ChannelRequest {
                browse_id: browse_id.clone(),
                tab: tab.clone(),
                filter: filter.clone(),
                pages: *pages,
            };
            commands::channel(cli.actions()?, &request).await?
        }

        Commands::Settings { item } => commands::settings(cli.actions()?, item.as_deref()).await?,

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "feedgraph", &mut std::io::stdout());
            return Ok(());
        }
    };

    println!("{report}");
    Ok(())
}
