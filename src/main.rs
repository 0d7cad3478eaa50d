use anyhow::{Context, bail};
use clap::Parser;
use docsearch::cli::{Cli, Commands};
use docsearch::config::LookupConfig;
use docsearch::javadoc;
use docsearch::search::SymbolIndex;
use docsearch::server::SymbolServer;
use docsearch::session::QuerySession;
use docsearch::tools::format_results;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LookupConfig::load(path)?,
        None => LookupConfig::default(),
    };
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    docsearch::tracing::init(config.log_format);

    match cli.command {
        Commands::Serve {
            index,
            debounce_ms,
            max_results,
        } => {
            if let Some(debounce_ms) = debounce_ms {
                config.debounce_ms = debounce_ms;
            }
            if max_results.is_some() {
                config.max_results = max_results;
            }
            if !index.is_empty() {
                config.index_paths = index;
            }
            serve(config).await
        }
        Commands::Query {
            query,
            index,
            category,
            limit,
            json,
        } => {
            let index = build_index(&config, index)?;
            let mut session = QuerySession::new(config.session_options());
            let Some(results) = session.submit(&index, &query)? else {
                bail!("Query is empty");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&results.payload())?);
            } else {
                print!("{}", format_results(results, category, limit));
            }
            Ok(())
        }
        Commands::Stats { index } => {
            let index = build_index(&config, index)?;
            let snapshot = index.snapshot()?;
            print!("{}", docsearch::tools::format_category_counts(&snapshot));
            let report = snapshot.report();
            println!(
                "{} indexed, {} dropped, {} duplicates",
                report.indexed, report.dropped, report.duplicates
            );
            Ok(())
        }
    }
}

async fn serve(config: LookupConfig) -> anyhow::Result<()> {
    tracing::info!("Starting docsearch MCP server");

    let preload = config.resolved_index_paths();
    let server = SymbolServer::new(config);

    if !preload.is_empty() {
        // A broken preload path shouldn't keep the server from starting
        match server.state().load(preload).await {
            Ok(report) => tracing::info!("Preloaded {} symbols", report.indexed),
            Err(e) => tracing::warn!("Failed to preload index: {}", e),
        }
    }

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}

/// Loads the CLI paths, or the configured ones when none were given.
fn build_index(config: &LookupConfig, paths: Vec<PathBuf>) -> anyhow::Result<SymbolIndex> {
    let paths = if paths.is_empty() {
        config.resolved_index_paths()
    } else {
        paths
    };
    if paths.is_empty() {
        bail!("No index paths given. Pass --index or set index_paths in the config file.");
    }

    let entries = javadoc::load_paths(&paths).context("Failed to load search indexes")?;
    let mut index = SymbolIndex::new();
    index.rebuild(&entries);
    Ok(index)
}
