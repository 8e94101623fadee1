//! RedisGraph client CLI
//!
//! Runs queries against a RedisGraph server and prints decoded records.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use redisgraph_client::transport::RedisTransport;
use redisgraph_client::{Config, Graph, Reply};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "redisgraph")]
#[command(about = "Query a RedisGraph server")]
struct Cli {
    /// Graph to run against (overrides config.yaml / GRAPH_NAME)
    #[arg(short, long, global = true)]
    graph: Option<String>,

    /// Redis URL (overrides config.yaml / REDIS_URL)
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Cypher query and print the decoded records
    Query {
        /// Cypher text
        cypher: String,
    },

    /// Print the execution plan of a Cypher query
    Explain {
        /// Cypher text
        cypher: String,
    },

    /// Delete the graph
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,redisgraph_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.redis_url = url;
    }
    if let Some(graph) = cli.graph {
        config.graph.name = graph;
    }

    let transport = RedisTransport::connect(&config.redis_url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.redis_url))?;
    tracing::info!("Connected to {}", config.redis_url);

    let graph = Graph::from_config(&config.graph, Arc::new(transport))
        .context("Use --graph or GRAPH_NAME to choose a graph")?;

    match cli.command {
        Commands::Query { cypher } => run_query(&graph, &cypher).await,
        Commands::Explain { cypher } => {
            let plan = graph.explain(&cypher).await?;
            print_reply(&plan)
        }
        Commands::Delete => {
            let reply = graph.delete().await?;
            print_reply(&reply)
        }
    }
}

async fn run_query(graph: &Graph, cypher: &str) -> Result<()> {
    let result = graph
        .query(cypher)
        .await
        .with_context(|| format!("Query failed on graph {}", graph.name()))?;

    println!("{}", serde_json::to_string_pretty(&result.records)?);
    for (key, value) in result.statistics.iter() {
        println!("{}: {}", key, value);
    }

    tracing::info!("{} record(s) returned", result.len());
    Ok(())
}

/// Text replies print line by line, anything else as JSON
fn print_reply(reply: &Reply) -> Result<()> {
    match reply {
        Reply::String(text) => println!("{}", text),
        Reply::Array(lines) if lines.iter().all(|l| l.as_str().is_some()) => {
            for line in lines.iter().filter_map(Reply::as_str) {
                println!("{}", line);
            }
        }
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}
