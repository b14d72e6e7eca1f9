//! Line-driven browser: every stdin line is one user action, applied to a
//! live [`PagedFilterQuery`] while its requests and search debounce run.

use anyhow::Result;
use marketplace_lib::{
    CachedClient, PageFetcher, PagedFilterQuery, QueryConfig, QueryError, QueryEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output::{format_page_footer, print_categories, OutputFormat};

const HELP: &str = "commands: search <text> | page <n> | next | prev | lang <code> | \
                    limit <n> | filter <text> | reset | refresh | show | help | quit";

#[derive(Debug, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Page(u32),
    Next,
    Prev,
    Language(String),
    Limit(u32),
    Filter(String),
    Reset,
    Refresh,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };
    let number = |rest: &str| {
        rest.trim()
            .parse::<u32>()
            .map_err(|_| format!("expected a number, got {:?}", rest.trim()))
    };
    match word.to_lowercase().as_str() {
        // The search term is kept as typed, trailing spaces included.
        "search" | "s" => Ok(BrowseCommand::Search(rest.to_string())),
        "page" | "p" => number(rest).map(BrowseCommand::Page),
        "next" | "n" => Ok(BrowseCommand::Next),
        "prev" => Ok(BrowseCommand::Prev),
        "lang" | "language" => match rest.trim() {
            "" => Err("lang needs a language code".to_string()),
            code => Ok(BrowseCommand::Language(code.to_string())),
        },
        "limit" => number(rest).map(BrowseCommand::Limit),
        "filter" | "f" => Ok(BrowseCommand::Filter(rest.to_string())),
        "reset" => Ok(BrowseCommand::Reset),
        "refresh" => Ok(BrowseCommand::Refresh),
        "show" | "" => Ok(BrowseCommand::Show),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command {:?}; {}", other, HELP)),
    }
}

/// Applies one command to the query. `Filter`, `Show`, `Help` and `Quit` are
/// handled by the caller.
pub fn apply<F: PageFetcher>(
    query: &mut PagedFilterQuery<F>,
    command: &BrowseCommand,
) -> Result<(), QueryError> {
    match command {
        BrowseCommand::Search(term) => query.set_search_term(term),
        BrowseCommand::Page(page) => query.set_page(*page)?,
        BrowseCommand::Next => query.set_page(query.filters().page + 1)?,
        BrowseCommand::Prev => {
            let page = query.filters().page;
            if page > 1 {
                query.set_page(page - 1)?;
            }
        }
        BrowseCommand::Language(code) => query.set_language(code),
        BrowseCommand::Limit(limit) => query.set_limit(*limit)?,
        BrowseCommand::Reset => query.reset_filters(),
        BrowseCommand::Refresh => query.refetch(),
        BrowseCommand::Filter(_)
        | BrowseCommand::Show
        | BrowseCommand::Help
        | BrowseCommand::Quit => {}
    }
    Ok(())
}

fn render(query: &PagedFilterQuery<CachedClient>, filter: Option<&str>, format: &OutputFormat) {
    let snapshot = query.snapshot();
    let shown = match filter {
        Some(term) => query.search_categories(snapshot.items, term),
        None => snapshot.items.iter().collect(),
    };
    print_categories(&shown, format);
    eprintln!(
        "{}",
        format_page_footer(
            snapshot.current_page,
            snapshot.filters.limit,
            snapshot.total_count,
            snapshot.total_pages
        )
    );
    if let Some(err) = snapshot.error {
        eprintln!("! {} (showing the last page that loaded)", err);
    }
    if snapshot.is_loading {
        eprintln!("loading...");
    } else if snapshot.is_searching {
        eprintln!("searching for {:?}...", snapshot.search_term);
    }
}

pub async fn run(client: CachedClient, config: QueryConfig, format: &OutputFormat) -> Result<()> {
    let mut query = PagedFilterQuery::new(client, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{}", HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(msg) => {
                        eprintln!("{}", msg);
                        continue;
                    }
                };
                match command {
                    BrowseCommand::Quit => break,
                    BrowseCommand::Help => eprintln!("{}", HELP),
                    BrowseCommand::Show => render(&query, None, format),
                    BrowseCommand::Filter(ref term) => render(&query, Some(term.as_str()), format),
                    ref other => {
                        if let Err(e) = apply(&mut query, other) {
                            eprintln!("{}", e);
                        }
                    }
                }
            }
            Some(event) = query.next_event() => {
                match event {
                    QueryEvent::Loaded { .. } | QueryEvent::Failed { .. } => {
                        render(&query, None, format)
                    }
                    QueryEvent::SearchSettled(term) => {
                        note_search(&term);
                    }
                    QueryEvent::StaleDiscarded { .. } => {}
                }
            }
        }
    }

    Ok(())
}

fn note_search(term: &str) {
    if term.is_empty() {
        eprintln!("search cleared");
    } else {
        eprintln!("searching for {:?}", term);
    }
}
