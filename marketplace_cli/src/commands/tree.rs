use anyhow::Result;
use clap::Args;
use marketplace_lib::{CachedClient, QueryConfig};

use crate::output::{format_tree, print_json, OutputFormat};

#[derive(Args)]
pub struct TreeArgs {
    /// Language code for names (defaults to MARKETPLACE_LANGUAGE or fr)
    #[arg(long)]
    pub language: Option<String>,
}

pub async fn run(
    args: &TreeArgs,
    client: &CachedClient,
    config: &QueryConfig,
    format: &OutputFormat,
) -> Result<()> {
    let language = args
        .language
        .as_deref()
        .unwrap_or(config.default_language.as_str());
    let roots = client.get_category_hierarchy(language).await?;
    match format {
        OutputFormat::Json => print_json(&roots),
        _ => println!("{}", format_tree(&roots)),
    }
    Ok(())
}
