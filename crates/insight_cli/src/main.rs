use anyhow::Result;
use clap::{Parser, Subcommand};
use insight_agents::{providers, AllowAllClassifier, MemoryStore, Orchestrator};
use insight_core::{FeedbackRequest, InsightConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "insight.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Process one feedback request and print the reply as JSON
    Invoke {
        #[arg(long, default_value = "cli-1")]
        feedback_id: String,

        #[arg(long, default_value = "cli")]
        customer_name: String,

        /// The feedback text to analyze
        feedback_text: String,

        /// Optional analysis instructions
        #[arg(long, default_value = "")]
        instructions: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = InsightConfig::load_or_default(&cli.config);

    let client = providers::from_config(&config.llm)?;
    let orchestrator = Arc::new(Orchestrator::new(
        client,
        Arc::new(AllowAllClassifier),
        Arc::new(MemoryStore::default()),
        &config,
    ));

    match cli.command {
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            info!(provider = %config.llm.provider, model = %config.llm.model, "starting gateway");
            insight_gateway::serve(orchestrator, &host, port).await
        }
        Command::Invoke {
            feedback_id,
            customer_name,
            feedback_text,
            instructions,
        } => {
            let request = FeedbackRequest {
                feedback_id,
                customer_name,
                feedback_text,
                timestamp: chrono::Utc::now().to_rfc3339(),
                instructions,
            };
            let reply = orchestrator.handle(request).await;
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
    }
}
