//! groupdir CLI
//!
//! Command-line interface for the W3C group lookup proxy.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use groupdir_api::{ApiConfig, ApiServer};
use groupdir_core::constants::API_KEY_ENV;
use groupdir_core::types::{GroupCategory, GroupRecord, PolicyStatus};
use groupdir_lookup::GroupLookup;
use groupdir_registry::GroupRegistry;

/// groupdir - caching lookup proxy for the W3C group directory
#[derive(Parser)]
#[command(name = "groupdir")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    upstream: UpstreamArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct UpstreamArgs {
    /// W3C API key
    #[arg(long, global = true, env = "W3C_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// W3C API base URL
    #[arg(long, global = true, env = "W3C_API_URL")]
    api_url: Option<String>,

    /// Group table (JSON) to use instead of the bundled one
    #[arg(long, global = true, env = "GROUPS_FILE")]
    groups_file: Option<PathBuf>,
}

impl UpstreamArgs {
    fn api_config(&self) -> Result<ApiConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| format!("{} is required (or pass --api-key)", API_KEY_ENV))?;

        Ok(ApiConfig {
            api_key,
            api_url: self.api_url.clone(),
            groups_file: self.groups_file.clone(),
        })
    }

    fn lookup(&self) -> Result<GroupLookup> {
        let config = self.api_config()?.lookup_config();
        GroupLookup::with_config(config).context("Failed to set up group lookup")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one group and print it as JSON
    Lookup {
        /// Group shortname (e.g. "webperf")
        name: String,
    },

    /// Resolve every registered group
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the group registry without calling the W3C API
    Registry,

    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "groupdir=debug,info"
    } else {
        "groupdir=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Lookup { name } => cmd_lookup(&cli.upstream, &name).await,
        Commands::List { json } => cmd_list(&cli.upstream, json).await,
        Commands::Registry => cmd_registry(&cli.upstream),
        Commands::Serve { port, bind } => cmd_serve(&cli.upstream, port, &bind).await,
    }
}

/// Resolve a single group
async fn cmd_lookup(upstream: &UpstreamArgs, name: &str) -> Result<()> {
    let lookup = upstream.lookup()?;

    let record = lookup
        .lookup_one(name)
        .await
        .with_context(|| format!("Failed to resolve group '{}'", name))?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Resolve all groups
async fn cmd_list(upstream: &UpstreamArgs, json: bool) -> Result<()> {
    let lookup = upstream.lookup()?;
    let records = lookup.lookup_all().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        print_row(record);
    }

    let partial = records.iter().filter(|r| r.is_partial()).count();
    println!(
        "\n{} {} groups, {} resolved, {} registry-only",
        "Total:".bold(),
        records.len(),
        records.len() - partial,
        partial
    );
    if partial > 0 {
        println!("   {}", "Run with --verbose to see why lookups failed.".dimmed());
    }

    Ok(())
}

fn print_row(record: &GroupRecord) {
    let category = match record.category() {
        GroupCategory::WorkingGroup => "wg".green(),
        GroupCategory::CommunityGroup => "cg".cyan(),
    };
    let policy = match record.patent_policy {
        PolicyStatus::Known(policy) => policy.to_string().normal(),
        PolicyStatus::Absent => "none".dimmed(),
        PolicyStatus::Undetermined => "-".dimmed(),
    };
    let name = match &record.name {
        Some(name) => name.normal(),
        None => "(unresolved)".yellow(),
    };

    println!(
        "{} {:<24} {:>8}  {:<7} {}",
        category,
        record.shortname(),
        record.id(),
        policy,
        name
    );
}

/// Print the registry
fn cmd_registry(upstream: &UpstreamArgs) -> Result<()> {
    let registry = match &upstream.groups_file {
        Some(path) => std::sync::Arc::new(
            GroupRegistry::from_file(path).context("Failed to load group table")?,
        ),
        None => GroupRegistry::bundled(),
    };

    for meta in registry.entries() {
        println!("{} {:<24} {:>8}", meta.category, meta.shortname, meta.id);
    }
    println!(
        "\n{} {} working groups, {} community groups",
        "Registry:".bold(),
        registry.category_len(GroupCategory::WorkingGroup),
        registry.category_len(GroupCategory::CommunityGroup)
    );

    Ok(())
}

/// Run API server
async fn cmd_serve(upstream: &UpstreamArgs, port: u16, bind: &str) -> Result<()> {
    println!("{}", "Starting groupdir API server...".cyan().bold());
    println!("   {} http://{}:{}/w3c/group", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let config = upstream.api_config()?;
    let server = ApiServer::new(&config).context("Failed to start server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}
