use anyhow::Result;
use clap::Args;
use marketplace_lib::CachedClient;

use crate::output::{print_categories, OutputFormat};

#[derive(Args)]
pub struct CategoryArgs {
    /// Category ID
    pub id: i64,
}

pub async fn run(args: &CategoryArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let resp = client.get_category(args.id).await?;
    print_categories(&[&resp.data], format);
    Ok(())
}
