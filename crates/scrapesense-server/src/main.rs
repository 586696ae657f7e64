//! ScrapeSense — page-aware assistant backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use scrapesense_core::ScrapeSenseConfig;
use scrapesense_extract::{ContentScript, HtmlPage};
use scrapesense_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run the content script against a saved HTML file and print the snapshot.
fn extract_file(path: &Path, url: &str) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    let script = ContentScript::new(HtmlPage::parse(url, &source));
    let response = script
        .handle_message(&serde_json::json!({ "type": "GET_PAGE_CONTENT" }))
        .ok_or_else(|| anyhow::anyhow!("Content script ignored the request"))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    match response.into_snapshot() {
        Some(_) => Ok(()),
        None => anyhow::bail!("Extraction failed"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "--extract" | "extract" => {
                if args.len() < 3 {
                    eprintln!("Usage: scrapesense extract <file.html> [url]");
                    std::process::exit(1);
                }
                let path = PathBuf::from(&args[2]);
                let url = args
                    .get(3)
                    .cloned()
                    .unwrap_or_else(|| format!("file://{}", path.display()));
                if let Err(e) = extract_file(&path, &url) {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("ScrapeSense — page-aware assistant backend");
                println!();
                println!("Usage: scrapesense [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  extract <file> [url]     Print the page snapshot of a saved HTML file");
                println!("  help                     Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'scrapesense help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let config = ScrapeSenseConfig::from_env()?;
    config.ensure_data_dir()?;
    info!("Data directory: {}", config.data_dir.display());
    info!("Environment: {}", config.mode);

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ScrapeSense server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
