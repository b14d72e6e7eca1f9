//! Local, in-memory text search over already-fetched items.
//!
//! Independent of the server-side `search` parameter: nothing here is applied
//! to fetched pages unless a caller asks for it.

use marketplace_api::types::Category;

use crate::error::QueryError;

pub const MAX_SEARCH_LENGTH: usize = 100;

/// Extracts one searchable text field from an item.
pub type FieldExtractor<T> = fn(&T) -> Option<&str>;

/// Case-insensitive substring filter over a configurable set of text fields.
pub struct TextFilter<T> {
    fields: Vec<FieldExtractor<T>>,
}

impl<T> Default for TextFilter<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> TextFilter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to match against.
    pub fn field(mut self, extract: FieldExtractor<T>) -> Self {
        self.fields.push(extract);
        self
    }

    /// Whether any field of `item` contains `term`, ignoring case. `term`
    /// must already be trimmed and lowercased.
    fn matches_normalized(&self, item: &T, term: &str) -> bool {
        self.fields.iter().any(|extract| {
            extract(item)
                .map(|text| text.to_lowercase().contains(term))
                .unwrap_or(false)
        })
    }

    pub fn matches(&self, item: &T, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty() || self.matches_normalized(item, &term)
    }

    /// Items matching `term`, in their original order. A blank term keeps everything.
    pub fn apply<'a>(&self, items: &'a [T], term: &str) -> Vec<&'a T> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return items.iter().collect();
        }
        items
            .iter()
            .filter(|item| self.matches_normalized(item, &term))
            .collect()
    }
}

/// Items that know which of their fields a local search looks at.
pub trait Searchable: Sized {
    fn text_filter() -> TextFilter<Self>;
}

impl Searchable for Category {
    fn text_filter() -> TextFilter<Self> {
        TextFilter::<Self>::new()
            .field(|c| c.name.as_deref())
            .field(|c| c.description.as_deref())
            .field(|c| c.name_ar.as_deref())
            .field(|c| c.description_ar.as_deref())
            .field(|c| c.name_fr.as_deref())
            .field(|c| c.description_fr.as_deref())
    }
}

/// Filters already-loaded categories by name and description in any language.
pub fn search_categories<'a>(categories: &'a [Category], term: &str) -> Vec<&'a Category> {
    Category::text_filter().apply(categories, term)
}

/// Clean up a search term typed on a terminal: strip ASCII control characters
/// (except space), trim, and enforce a byte-length limit. An empty result
/// means "no search".
pub fn sanitize_search(input: &str) -> Result<String, QueryError> {
    if input.len() > MAX_SEARCH_LENGTH {
        return Err(QueryError::Validation(format!(
            "search exceeds maximum length of {} bytes",
            MAX_SEARCH_LENGTH
        )));
    }
    Ok(input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string())
}
