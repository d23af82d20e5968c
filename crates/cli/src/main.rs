// Authgen CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Logs go to stderr so generated source on stdout stays clean.

mod commands;
mod loader;
mod output;

use anyhow::Context;
use authgen_core::SchemeRegistry;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "authgen")]
#[command(about = "Authgen CLI - Generate HTTP auth scheme providers from service auth metadata")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the auth scheme provider source
    Generate {
        /// Service model file (TOML, or JSON by extension)
        #[arg(long, short, env = "AUTHGEN_MODEL")]
        model: PathBuf,

        /// Generator config file
        #[arg(long, short, env = "AUTHGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Symbol prefix; defaults to the config value or the service shape name
        #[arg(long, env = "AUTHGEN_SERVICE_NAME")]
        service_name: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the resolved options and operation branches without generating
    Plan {
        /// Service model file (TOML, or JSON by extension)
        #[arg(long, short, env = "AUTHGEN_MODEL")]
        model: PathBuf,

        /// Generator config file
        #[arg(long, short, env = "AUTHGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Symbol prefix; defaults to the config value or the service shape name
        #[arg(long, env = "AUTHGEN_SERVICE_NAME")]
        service_name: Option<String>,
    },

    /// List registered auth schemes
    Schemes,
}

fn main() -> anyhow::Result<()> {
    // Load .env before parsing; AUTHGEN_* variables may come from it
    let env_file = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgen=info,authgen_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from: {}", path.display());
    }

    let cli = Cli::parse();
    let output_format = output::OutputFormat::parse(&cli.output);
    let registry =
        SchemeRegistry::with_builtins().context("Failed to register built-in auth schemes")?;
    tracing::debug!(schemes = registry.len(), "Scheme registry ready");

    match cli.command {
        Commands::Generate {
            model,
            config,
            service_name,
            out,
        } => commands::generate::run(
            commands::generate::GenerateArgs {
                model,
                config,
                service_name,
                out,
            },
            &registry,
            cli.quiet,
        ),
        Commands::Plan {
            model,
            config,
            service_name,
        } => commands::plan::run(
            commands::plan::PlanArgs {
                model,
                config,
                service_name,
            },
            &registry,
            output_format,
        ),
        Commands::Schemes => commands::schemes::run(&registry, output_format),
    }
}
