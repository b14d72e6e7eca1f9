use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;
use marketplace_lib::{sanitize_search, CachedClient, PagedFilterQuery, QueryConfig};

use crate::output::{format_page_footer, print_categories, OutputFormat};

#[derive(Args)]
pub struct CategoriesArgs {
    /// Language code for names and descriptions (e.g. fr, ar)
    #[arg(long)]
    pub language: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page
    #[arg(long)]
    pub limit: Option<u32>,

    /// Server-side search on name and description
    #[arg(long)]
    pub search: Option<String>,

    /// Narrow the fetched page locally, without another request
    #[arg(long)]
    pub filter: Option<String>,
}

pub async fn run(
    args: &CategoriesArgs,
    client: CachedClient,
    config: QueryConfig,
    format: &OutputFormat,
) -> Result<()> {
    // Nobody is typing here, so there is nothing to debounce.
    let mut query = PagedFilterQuery::new(client, config.with_debounce(Duration::ZERO));

    if let Some(ref language) = args.language {
        query.set_language(language);
    }
    if let Some(limit) = args.limit {
        query.set_limit(limit)?;
    }
    if let Some(ref search) = args.search {
        let sanitized = sanitize_search(search)?;
        query.set_search_term(&sanitized);
    }

    // The page bound is only known once the first page has arrived.
    query.settle().await;
    if args.page != 1 {
        query.set_page(args.page)?;
        query.settle().await;
    }

    let snapshot = query.snapshot();
    if let Some(err) = snapshot.error {
        return Err(anyhow!("could not load categories: {}", err));
    }

    let shown = match args.filter {
        Some(ref term) => query.search_categories(snapshot.items, term),
        None => snapshot.items.iter().collect(),
    };

    eprintln!(
        "{}",
        format_page_footer(
            snapshot.current_page,
            snapshot.filters.limit,
            snapshot.total_count,
            snapshot.total_pages
        )
    );
    if args.filter.is_some() {
        eprintln!("{} of {} on this page match the filter", shown.len(), snapshot.items.len());
    }
    print_categories(&shown, format);

    Ok(())
}
