//! # TGRCTL CLI
//!
//! Command-line interface for target group registrations.
//!
//! Desired state is read from a YAML or JSON file; state is kept in a local
//! JSON document between runs.
//!
//! ## Usage
//!
//! ```bash
//! # Show the plan for a desired state file
//! tgrctl plan -f registration.yaml
//!
//! # Apply it
//! tgrctl apply -f registration.yaml
//!
//! # Refresh state from the load balancer
//! tgrctl refresh
//!
//! # Adopt an existing target group
//! tgrctl import arn:aws:elasticloadbalancing:us-west-2:123456789012:targetgroup/web/73e2d6bc24d8a067
//!
//! # Deregister every target in state
//! tgrctl destroy
//!
//! # Print the desired-state JSON Schema
//! tgrctl schema
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use target_group_registration::config::ReconcilerConfig;
use target_group_registration::constants::DEFAULT_STATE_FILE;
use target_group_registration::controller::reconciler::Reconciler;
use target_group_registration::observability::{logging, metrics};
use target_group_registration::provider::aws::{ClientContext, Elbv2Registry};
use tracing::debug;

mod apply;
mod schema;
mod state;

/// Target Group Registration CLI
#[derive(Parser)]
#[command(name = "tgrctl")]
#[command(
    about = "Reconcile targets registered with an ELBv2 target group",
    long_about = None,
    after_help = "\
Examples:
  tgrctl plan -f registration.yaml
  tgrctl apply -f registration.yaml --state web.tfstate.json
  tgrctl import arn:aws:elasticloadbalancing:us-west-2:123456789012:targetgroup/web/73e2d6bc24d8a067
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path of the state document
    #[arg(short, long, global = true, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// AWS region (defaults to the SDK's resolution chain)
    #[arg(long, global = true)]
    region: Option<String>,

    /// AWS shared config profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// ELBv2 endpoint override (e.g. a local emulator)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Write Prometheus metrics to this file on exit (textfile collector format)
    #[arg(long, global = true)]
    metrics_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the JSON Schema of the desired-state file
    Schema,
    /// Show what apply would change, against the persisted state
    Plan {
        /// Desired state file (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Refresh state, then create, update or replace the registration
    Apply {
        /// Desired state file (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Refresh persisted state from the load balancer
    Refresh,
    /// Deregister every target held in state and remove the state
    Destroy,
    /// Adopt an existing target group's registration
    Import {
        /// Target group ARN
        #[arg(value_name = "TARGET_GROUP_ARN")]
        id: String,
    },
    /// Print the persisted state
    Show,
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ReconcilerConfig::from_env();

    logging::init_logging(&config);
    if config.enable_metrics {
        metrics::register_metrics()?;
    }

    let context = ClientContext::from_env().with_overrides(
        cli.region.clone(),
        cli.profile.clone(),
        cli.endpoint_url.clone(),
    );

    let result = match cli.command {
        Commands::Schema => schema::schema_command(),
        Commands::Version => {
            version_command();
            Ok(())
        }
        Commands::Show => state::show_command(&cli.state),
        Commands::Plan { file } => apply::plan_command(&config, &file, &cli.state),
        Commands::Apply { file } => {
            let reconciler = build_reconciler(&context, &config).await;
            apply::apply_command(&reconciler, &file, &cli.state).await
        }
        Commands::Refresh => {
            let reconciler = build_reconciler(&context, &config).await;
            state::refresh_command(&reconciler, &cli.state).await
        }
        Commands::Destroy => {
            let reconciler = build_reconciler(&context, &config).await;
            state::destroy_command(&reconciler, &cli.state).await
        }
        Commands::Import { id } => {
            let reconciler = build_reconciler(&context, &config).await;
            state::import_command(&reconciler, &id, &cli.state).await
        }
    };

    if let Some(path) = &cli.metrics_file {
        if config.enable_metrics {
            write_metrics(path)?;
        }
    }

    result
}

async fn build_reconciler(context: &ClientContext, config: &ReconcilerConfig) -> Reconciler {
    let registry = Arc::new(Elbv2Registry::new(context).await);
    debug!("Using ELBv2 in region {}", registry.region());
    Reconciler::new(registry.clone(), registry, config.clone())
}

fn write_metrics(path: &std::path::Path) -> Result<()> {
    let body = metrics::render_metrics()?;
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write metrics to {}", path.display()))
}

fn version_command() {
    println!("tgrctl {}", env!("CARGO_PKG_VERSION"));
    println!("  Git hash:   {}", env!("BUILD_GIT_HASH"));
    println!("  Build time: {}", env!("BUILD_DATETIME"));
}
