use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "tollgate",
    about = "Tollgate — canary release readiness checks",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a release's primary or canary workload is ready.
    ///
    /// Exits 0 when ready, 2 when still converging, and 1 when the
    /// rollout exceeded its progress deadline or the check failed.
    Check {
        /// Release descriptor (TOML).
        #[arg(short, long)]
        release: PathBuf,
        /// Which workload of the release to check.
        #[arg(long, value_enum, default_value = "canary")]
        role: RoleArg,
        /// JSON array of workload objects to read instead of the cluster.
        #[arg(long)]
        objects: Option<PathBuf>,
        /// Output format.
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Primary,
    Canary,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tollgate=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            release,
            role,
            objects,
            format,
        } => commands::check::check(&release, role, objects.as_deref(), format).await,
    }
}
