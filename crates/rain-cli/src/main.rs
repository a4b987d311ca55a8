//! Rain - MCP server importer
//!
//! Usage:
//!   rain add               # Interactive add-server wizard
//!   rain import            # Import servers from the clipboard
//!   rain import -f x.json  # ... or from a file
//!   rain search <query>    # Search the cached registry catalog
//!   rain list | remove <id> | export

mod clipboard;
mod interactive;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rain_core::config::{ConfigStore, RainConfig};
use rain_core::import::{ClipboardSource, ImportError};
use rain_core::mcp::{AgentServerEntry, to_mcp_servers_json};
use rain_core::registry::{SchemaStore, ServerSchema};
use rain_core::search::{SchemaIndex, SearchOptions};
use rain_core::store::{JsonServerStore, ServerStore, StoreError};
use rain_core::types::{OriginType, UserServer};
use rain_core::wizard::{ServerType, WizardSession};

use crate::clipboard::SystemClipboard;
use crate::interactive::AddWizard;

#[derive(Parser)]
#[command(name = "rain")]
#[command(about = "Import and configure MCP servers", long_about = None)]
struct Cli {
    /// Path to rain.toml (default: <config dir>/rain-mcp/rain.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a server with the interactive wizard
    Add,

    /// Import server configurations from the clipboard
    ///
    /// Accepts Claude Desktop / VS Code style `mcpServers` documents, a single
    /// server object, or a `"name": {...}` fragment copied from a README.
    Import {
        /// Read from a file instead of the clipboard
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Search the cached registry catalog
    Search {
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List saved servers
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove a saved server
    #[command(alias = "rm")]
    Remove {
        /// Server ID
        id: String,
    },

    /// Print saved servers as an `mcpServers` document
    Export,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Resolved settings and data locations for one invocation
struct AppContext {
    config_store: ConfigStore,
    config: RainConfig,
}

impl AppContext {
    fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_store = match config_path {
            Some(path) => ConfigStore::from_path(path),
            None => ConfigStore::from_default()?,
        };
        let config = config_store.load()?;
        tracing::debug!("Loaded config from {}", config_store.config_path().display());
        Ok(Self {
            config_store,
            config,
        })
    }

    fn server_store(&self) -> JsonServerStore {
        JsonServerStore::new(self.config_store.servers_file(&self.config))
    }

    fn catalog(&self) -> Result<Vec<ServerSchema>> {
        let path = self.config_store.schema_store(&self.config);
        let store = SchemaStore::load(&path)?;
        if store.servers.is_empty() {
            tracing::warn!("Registry catalog at {} is empty", path.display());
        }
        Ok(store.servers)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rain=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let context = AppContext::load(cli.config)?;
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

    run_cli(cli.command, &context, &runtime)
}

fn run_cli(command: Commands, context: &AppContext, runtime: &tokio::runtime::Runtime) -> Result<()> {
    match command {
        Commands::Add => {
            let catalog = context.catalog()?;
            let mut wizard = AddWizard::new(
                WizardSession::new(context.server_store()),
                SchemaIndex::new(catalog, context.config.search.options()),
                SystemClipboard,
                runtime,
            );
            if !wizard.run()? {
                println!("Nothing added.");
            }
        }
        Commands::Import { file, yes } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => SystemClipboard.read_text(),
            };
            run_import(text, yes, context, runtime)?;
        }
        Commands::Search {
            query,
            limit,
            format,
        } => {
            run_search(&query, limit, format, context)?;
        }
        Commands::List { format } => {
            let servers = runtime.block_on(context.server_store().list())?;
            match format {
                OutputFormat::Table => print_server_table(&servers),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&servers)?),
            }
        }
        Commands::Remove { id } => match runtime.block_on(context.server_store().delete(&id)) {
            Ok(()) => println!("{} Removed {}", style("✓").green(), id),
            Err(StoreError::NotFound(_)) => {
                anyhow::bail!("No server with ID '{}'. Run `rain list` to see IDs.", id)
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Export => {
            let servers = runtime.block_on(context.server_store().list())?;
            let document = to_mcp_servers_json(
                servers.iter().map(|s| (s.name.as_str(), &s.config)),
            )?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}

fn run_import(
    text: String,
    yes: bool,
    context: &AppContext,
    runtime: &tokio::runtime::Runtime,
) -> Result<()> {
    let mut session = WizardSession::new(context.server_store());
    session.apply(|s| s.choose_type(ServerType::Clipboard));

    if let Err(e) = session.import_clipboard(&text) {
        report_import_error(&e);
        anyhow::bail!("Nothing imported");
    }

    let servers = &session.state().clipboard_servers;
    let count = servers.len();
    println!("Found {} server(s):", count);
    for server in servers {
        println!(
            "  {} {}",
            style(&server.name).green(),
            style(server.config.summary()).dim()
        );
    }

    if !yes
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Add these servers?")
            .default(true)
            .interact()?
    {
        println!("Aborted.");
        return Ok(());
    }

    if !runtime.block_on(session.submit_clipboard()) {
        let pending: Vec<&str> = session
            .state()
            .clipboard_servers
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        anyhow::bail!("Failed to save imported servers: {}", pending.join(", "));
    }
    println!("{} Imported {} server(s)", style("✓").green(), count);
    Ok(())
}

fn report_import_error(error: &ImportError) {
    eprintln!("{} {}", style("✗").red(), error);
    if let Some(hint) = error.hint() {
        eprintln!("  {}", style(hint).dim());
    }
}

fn run_search(
    query: &str,
    limit: Option<usize>,
    format: OutputFormat,
    context: &AppContext,
) -> Result<()> {
    let mut options: SearchOptions = context.config.search.options();
    if let Some(limit) = limit {
        options.page_size = limit.max(1);
    }
    let mut index = SchemaIndex::new(context.catalog()?, options);
    index.set_query(query);
    let results = index.results();

    match format {
        OutputFormat::Table => {
            if results.is_empty() {
                println!("No servers match '{}'.", query);
                return Ok(());
            }
            print_schema_table(&results);
            if index.has_more() {
                println!(
                    "  ... {} more, use --limit to show them",
                    index.total_matches() - results.len()
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }
    Ok(())
}

fn print_schema_table(schemas: &[&ServerSchema]) {
    println!("  {:<40} {:<10} Description", "Name", "Version");
    println!("  {}", "-".repeat(80));
    for schema in schemas {
        println!(
            "  {:<40} {:<10} {}",
            truncate(&schema.name, 40),
            truncate(&schema.version, 10),
            truncate(schema.description.as_deref().unwrap_or("-"), 40)
        );
    }
}

fn print_server_table(servers: &[UserServer]) {
    if servers.is_empty() {
        println!("No servers added yet.");
        println!("Add one with: rain add");
        return;
    }

    println!(
        "  {:<36} {:<20} {:<7} {:<9} Target",
        "ID", "Name", "Type", "Origin"
    );
    println!("  {}", "-".repeat(100));

    for server in servers {
        let kind = match server.config {
            AgentServerEntry::Local(_) => "local",
            AgentServerEntry::Remote(_) => "remote",
        };
        let origin = match server.origin.as_ref().map(|o| o.origin_type) {
            Some(OriginType::Registry) => "registry",
            Some(OriginType::Custom) => "custom",
            None => "-",
        };
        println!(
            "  {:<36} {:<20} {:<7} {:<9} {}",
            server.id,
            truncate(&server.name, 20),
            kind,
            origin,
            server.config.summary()
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
