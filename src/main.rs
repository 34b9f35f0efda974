use anyhow::Context;
use benefits_directory::{config::Config, logging, metrics, server, DirectoryService, TaxonomyField};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "benefits-directory")]
#[command(about = "Benefits directory ingestion engine and read-only API")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $BENEFITS_CONFIG, then the built-in file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for rotated JSON logs
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch the source once and print the records
    Fetch {
        /// Print records as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print the ranked taxonomy summary for one field
    Taxonomy {
        #[arg(long, value_enum, default_value_t = FieldArg::Audience)]
        field: FieldArg,
    },
    /// Suggest the benefits most relevant to a free-form question
    Suggest {
        query: String,
    },
    /// List the metrics exported at /metrics
    Metrics,
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Audience,
    Category,
    Organization,
}

impl From<FieldArg> for TaxonomyField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Audience => TaxonomyField::TargetAudience,
            FieldArg::Category => TaxonomyField::Category,
            FieldArg::Organization => TaxonomyField::Organization,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&cli.log_dir);

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            metrics::init_metrics();
            let svc = Arc::new(DirectoryService::from_config(&config)?);
            info!(ttl_secs = config.cache.ttl_secs, "starting server");
            server::start_server(svc, &config.server)
                .await
                .map_err(|e| anyhow::anyhow!("server failed: {}", e))?;
        }
        Commands::Fetch { json } => {
            let svc = DirectoryService::from_config(&config)?;
            let records = svc.get_records().await.context("fetching records")?;
            if json {
                println!("{}", serde_json::to_string_pretty(records.as_ref())?);
            } else {
                println!("📊 {} benefits loaded", records.len());
                for record in records.iter().take(10) {
                    println!("   {} | {} | {}", record.id, record.category, record.organization);
                }
                if records.len() > 10 {
                    println!("   ... and {} more", records.len() - 10);
                }
            }
        }
        Commands::Taxonomy { field } => {
            let svc = DirectoryService::from_config(&config)?;
            let entries = svc.classify(field.into()).await.context("classifying records")?;
            for entry in entries {
                println!("{:>5}  {}", entry.count, entry.name);
            }
        }
        Commands::Suggest { query } => {
            let svc = DirectoryService::from_config(&config)?;
            let result = svc.suggest(&query).await.context("generating suggestions")?;
            println!("{}", result.explanation);
            for record in &result.suggestions {
                println!("   {} | {} | {}", record.id, record.category, record.organization);
            }
        }
        Commands::Metrics => {
            for doc in metrics::registry::all_documentation() {
                println!("{:<45} {:<10} {}", doc.name, doc.metric_type.as_str(), doc.help);
            }
        }
    }
    Ok(())
}
