//! unraid - CLI client for the Unraid API
//!
//! Usage:
//!   unraid config add tower --url https://192.168.1.100 --api-key KEY
//!   unraid config list
//!   unraid docker ls --all
//!   unraid --server backup docker restart plex

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unraid_core::api::{Container, UnraidClient};
use unraid_core::commands::config::{AddOptions, ListReport};
use unraid_core::commands::docker::{ContainerReport, ListOptions};
use unraid_core::commands::{ConfigCommand, DockerCommand};
use unraid_core::config::ConfigStore;
use unraid_core::resolve::{CliOverrides, EnvOverrides, resolve};

#[derive(Parser)]
#[command(name = "unraid")]
#[command(about = "CLI client for the Unraid API", long_about = None)]
#[command(version)]
struct Cli {
    /// Server name from config to use [env: UNRAID_SERVER]
    #[arg(long, global = true)]
    server: Option<String>,

    /// Server URL (overrides env and config) [env: UNRAID_URL]
    #[arg(long, global = true)]
    url: Option<String>,

    /// API key (overrides env and config) [env: UNRAID_API_KEY]
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Request timeout in seconds (default: 5) [env: UNRAID_TIMEOUT]
    #[arg(long, global = true, value_name = "SECONDS")]
    timeout: Option<String>,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage server configurations
    Config(ConfigArgs),

    /// Docker container management
    Docker(DockerArgs),
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a server configuration (overwrites an existing one)
    Add {
        /// Name for this server configuration
        name: String,

        /// Server URL (e.g., `https://192.168.1.100`)
        #[arg(long)]
        url: String,

        /// API key for authentication
        #[arg(long)]
        api_key: String,
    },

    /// List all configured servers
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Set the default server
    Default {
        /// Name of the server to set as default
        name: String,
    },

    /// Remove a server configuration
    Remove {
        /// Name of the server to remove
        name: String,
    },
}

#[derive(Args)]
struct DockerArgs {
    #[command(subcommand)]
    command: DockerSubcommand,
}

#[derive(Subcommand)]
enum DockerSubcommand {
    /// List Docker containers
    #[command(visible_alias = "ls")]
    ListContainers {
        /// Show all containers (default: only running)
        #[arg(short, long)]
        all: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Start a container
    Start {
        /// Container name or id
        name: String,
    },

    /// Stop a container
    Stop {
        /// Container name or id
        name: String,
    },

    /// Restart a container
    Restart {
        /// Container name or id
        name: String,
    },

    /// Update a container to its latest image
    Update {
        /// Container name or id
        name: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run_cli(cli)
}

fn run_cli(cli: Cli) -> Result<()> {
    let store = match &cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::from_default_location()?,
    };
    tracing::debug!(path = %store.config_path().display(), "Using config file");

    let overrides = CliOverrides {
        server: cli.server,
        url: cli.url,
        api_key: cli.api_key,
        timeout: cli.timeout,
    };

    match cli.command {
        Commands::Config(args) => run_config(ConfigCommand::new(store), args),
        Commands::Docker(args) => run_docker(&store, &overrides, args),
    }
}

fn run_config(cmd: ConfigCommand, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigSubcommand::Add { name, url, api_key } => {
            let report = cmd.add(&AddOptions::new(&name, url, api_key))?;

            for warning in &report.warnings {
                eprintln!("Warning: {}", warning);
            }
            println!("Server '{}' added successfully.", report.name);
            if report.became_default {
                println!("Set as default server.");
            }
        }
        ConfigSubcommand::List { format } => {
            let report = cmd.list()?;
            match format {
                OutputFormat::Table => print_servers_table(&report),
                OutputFormat::Json => print_servers_json(&report)?,
            }
        }
        ConfigSubcommand::Default { name } => {
            cmd.set_default(&name)?;
            println!("Default server set to '{}'.", name);
        }
        ConfigSubcommand::Remove { name } => {
            let report = cmd.remove(&name)?;
            println!("Server '{}' removed successfully.", report.name);
            if report.was_default {
                match &report.new_default {
                    Some(next) => println!("Default server is now '{}'.", next),
                    None => println!("No servers left; default cleared."),
                }
            }
        }
    }
    Ok(())
}

fn run_docker(store: &ConfigStore, overrides: &CliOverrides, args: DockerArgs) -> Result<()> {
    let config = store.load()?;
    let settings = resolve(overrides, &EnvOverrides::from_env(), &config)?;

    let client = UnraidClient::new(&settings)?;
    let cmd = DockerCommand::new(client);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    match args.command {
        DockerSubcommand::ListContainers { all, format } => {
            let containers =
                runtime.block_on(cmd.list_containers(ListOptions::new().with_all(all)))?;
            match format {
                OutputFormat::Table => print_containers_table(&containers, all),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&containers)?);
                }
            }
        }
        DockerSubcommand::Start { name } => {
            let report = runtime.block_on(cmd.start(&name))?;
            print_container_report(&report);
        }
        DockerSubcommand::Stop { name } => {
            let report = runtime.block_on(cmd.stop(&name))?;
            print_container_report(&report);
        }
        DockerSubcommand::Restart { name } => {
            let report = runtime.block_on(cmd.restart(&name))?;
            print_container_report(&report);
        }
        DockerSubcommand::Update { name } => {
            let report = runtime.block_on(cmd.update(&name))?;
            print_container_report(&report);
        }
    }

    Ok(())
}

fn print_servers_table(report: &ListReport) {
    if report.profiles.is_empty() {
        println!("No servers configured.");
        println!("Use 'unraid config add <name> --url <url> --api-key <key>' to add a server.");
        return;
    }

    println!("Configured servers:");
    println!();

    for profile in &report.profiles {
        let default_marker = if report.is_default(profile) {
            " (default)"
        } else {
            ""
        };

        println!("  {}{}", profile.name, default_marker);
        println!("    URL: {}", profile.url);
        println!("    API Key: {}", profile.masked_api_key());
        println!();
    }
}

fn print_servers_json(report: &ListReport) -> Result<()> {
    let servers: Vec<_> = report
        .profiles
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.name,
                "url": p.url,
                "api_key": p.masked_api_key(),
                "default": report.is_default(p),
            })
        })
        .collect();

    let output = serde_json::json!({
        "default": report.default,
        "servers": servers,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_containers_table(containers: &[Container], show_all: bool) {
    if containers.is_empty() {
        if show_all {
            println!("No containers found.");
        } else {
            println!("No running containers found. Use --all to show all containers.");
        }
        return;
    }

    println!(
        "{:<30} {:<40} {:<10} {:<20}",
        "NAME", "IMAGE", "STATE", "STATUS"
    );
    println!("{}", "-".repeat(100));

    for container in containers {
        println!(
            "{:<30} {:<40} {:<10} {:<20}",
            truncate(container.display_name(), 29),
            truncate(&container.image, 39),
            container.state,
            truncate(&container.status, 19)
        );
    }
}

fn print_container_report(report: &ContainerReport) {
    println!(
        "Container '{}' {} ({}).",
        report.container.display_name(),
        report.action.past_tense(),
        report.container.state
    );
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
