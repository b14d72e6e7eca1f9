mod commands;
mod logging;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use marketplace_lib::cache::PageCache;
use marketplace_lib::marketplace_api::DEFAULT_BASE_URL;
use marketplace_lib::{CachedClient, QueryConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(about = "Browse marketplace categories from the storefront backend")]
struct Cli {
    /// Output format: table, markdown or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Backend base URL (overrides MARKETPLACE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of categories
    Categories(commands::categories::CategoriesArgs),
    /// Show a single category
    Category(commands::category::CategoryArgs),
    /// Print the category tree
    Tree(commands::tree::TreeArgs),
    /// Interactively page and search through categories, one command per line
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let base_url = cli
        .api_url
        .or_else(|| std::env::var("MARKETPLACE_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let cache = PageCache::new(Duration::from_secs(300));
    let client = CachedClient::with_base_url(&base_url, cache);
    let config = QueryConfig::from_env();

    match &cli.command {
        Commands::Categories(args) => {
            commands::categories::run(args, client, config, &format).await?
        }
        Commands::Category(args) => commands::category::run(args, &client, &format).await?,
        Commands::Tree(args) => commands::tree::run(args, &client, &config, &format).await?,
        Commands::Browse => commands::browse::run(client, config, &format).await?,
    }

    Ok(())
}
