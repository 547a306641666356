use anyhow::{Context, Result};
use apidoc_scraper::config::DEFAULT_BASE_URL;
use apidoc_scraper::{CrawlerConfig, DocsScraper, DocumentBundle, ParseBotClient};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "apidoc-scraper")]
#[command(about = "Scrape API reference documentation into JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape documentation by walking its HTML
    Scrape {
        /// Base URL for API documentation
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        url: String,
        /// Output JSON file
        #[arg(short, long, default_value = "paid_api_docs.json")]
        output: PathBuf,
        /// Print a summary of what was found
        #[arg(short, long)]
        verbose: bool,
    },
    /// Extract documentation with the Parse.bot AI service
    Parsebot {
        /// URL to scrape
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        url: String,
        /// Output JSON file
        #[arg(short, long, default_value = "paid_api_docs.json")]
        output: PathBuf,
        /// Parse.bot API key (or set PARSE_BOT_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Custom extraction query; the raw answer is saved as-is
        #[arg(long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Scrape { verbose: true, .. });
    init_tracing(verbose);

    match cli.command {
        Commands::Scrape { url, output, verbose } => {
            let scraper = DocsScraper::new(CrawlerConfig::with_base_url(url))
                .context("Failed to set up scraper")?;
            let documentation = scraper.scrape().await;
            save_json(&output, &documentation)?;

            if verbose {
                print_summary(&documentation);
            }
            println!("Scraping completed successfully!");
        }
        Commands::Parsebot {
            url,
            output,
            api_key,
            query,
        } => {
            let client = ParseBotClient::from_env(api_key).context("Configuration error")?;
            match query {
                Some(query) => {
                    let result = client.scrape(&url, &query, None).await?;
                    save_json(&output, &result)?;
                    println!(
                        "  Endpoints: {}",
                        result["endpoints"].as_array().map_or(0, Vec::len)
                    );
                    println!(
                        "  Sections: {}",
                        result["sections"].as_array().map_or(0, Vec::len)
                    );
                }
                None => {
                    let documentation = client.scrape_docs(&url).await?;
                    save_json(&output, &documentation)?;
                    println!("  Endpoints: {}", documentation.endpoints.len());
                    println!("  Sections: {}", documentation.sections.len());
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,apidoc_scraper=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Data saved to: {}", path.display());
    Ok(())
}

fn print_summary(documentation: &DocumentBundle) {
    println!("\nScraping Summary:");
    println!("Total endpoints found: {}", documentation.endpoints.len());
    println!("Total sections found: {}", documentation.sections.len());

    if !documentation.endpoints.is_empty() {
        println!("\nEndpoints:");
        for endpoint in &documentation.endpoints {
            let method = endpoint.method.map_or("N/A", |m| m.as_str());
            let target = endpoint.path.as_deref().unwrap_or(&endpoint.title);
            println!("  - {} {}", method, target);
        }
    }
}
