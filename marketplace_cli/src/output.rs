use marketplace_lib::types::Category;
use marketplace_lib::{item_range, page_window, PageLink};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

const MAX_DESCRIPTION_CHARS: usize = 48;

#[derive(Tabled, Serialize)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Arabic")]
    #[serde(rename = "Arabic")]
    name_ar: String,
    #[tabled(rename = "Description")]
    #[serde(rename = "Description")]
    description: String,
    #[tabled(rename = "Audience")]
    #[serde(rename = "Audience")]
    audience: String,
    #[tabled(rename = "Ages")]
    #[serde(rename = "Ages")]
    ages: String,
    #[tabled(rename = "Parent")]
    #[serde(rename = "Parent")]
    parent: String,
}

// -- Row builders --

fn build_category_rows(categories: &[&Category]) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id,
            name: c.display_name().to_string(),
            name_ar: c.name_ar.clone().unwrap_or_default(),
            description: truncate(c.display_description(), MAX_DESCRIPTION_CHARS),
            audience: c.gender.map(|g| g.to_string()).unwrap_or_default(),
            ages: format_ages(c.age_min, c.age_max),
            parent: c.parent_id.map(|p| p.to_string()).unwrap_or_default(),
        })
        .collect()
}

pub fn print_categories(categories: &[&Category], format: &OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&categories),
        OutputFormat::Table => println!("{}", Table::new(build_category_rows(categories))),
        OutputFormat::Markdown => {
            let mut table = Table::new(build_category_rows(categories));
            table.with(Style::markdown());
            println!("{}", table);
        }
    }
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// `Showing 11-20 of 42 | Page 2/5 | 1 [2] 3 4 ... 5`
pub fn format_page_footer(page: u32, limit: u32, total_count: u64, total_pages: u32) -> String {
    let shown = match item_range(page, limit, total_count) {
        Some((start, end)) => format!("Showing {}-{} of {}", start, end, total_count),
        None => format!("Showing 0 of {}", total_count),
    };
    if total_pages <= 1 {
        return shown;
    }
    let window = page_window(page, total_pages, marketplace_lib::pagination::MAX_VISIBLE_PAGES)
        .into_iter()
        .map(|link| match link {
            PageLink::Page(n) if n == page => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} | Page {}/{} | {}", shown, page, total_pages, window)
}

/// Renders a category tree with two spaces of indentation per level.
pub fn format_tree(categories: &[Category]) -> String {
    fn walk(out: &mut Vec<String>, categories: &[Category], depth: usize) {
        for c in categories {
            out.push(format!("{}{} (#{})", "  ".repeat(depth), c.display_name(), c.id));
            walk(out, &c.children, depth + 1);
        }
    }
    let mut lines = Vec::new();
    walk(&mut lines, categories, 0);
    lines.join("\n")
}

fn format_ages(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{}-{}", min, max),
        (Some(min), None) => format!("{}+", min),
        (None, Some(max)) => format!("≤{}", max),
        (None, None) => String::new(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_categories_fixture() -> Vec<Category> {
        let json_str = include_str!("../../marketplace_api/tests/fixtures/categories.json");
        let resp: serde_json::Value = serde_json::from_str(json_str).unwrap();
        serde_json::from_value(resp["data"].clone()).unwrap()
    }

    fn load_hierarchy_fixture() -> Vec<Category> {
        let json_str = include_str!("../../marketplace_api/tests/fixtures/hierarchy.json");
        let resp: serde_json::Value = serde_json::from_str(json_str).unwrap();
        serde_json::from_value(resp["data"].clone()).unwrap()
    }

    // -- row builder tests --

    #[test]
    fn test_build_category_rows() {
        let categories = load_categories_fixture();
        let refs: Vec<&Category> = categories.iter().collect();
        let rows = build_category_rows(&refs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Algèbre");
        assert_eq!(rows[0].name_ar, "الجبر");
        assert_eq!(rows[0].audience, "mixte");
        assert_eq!(rows[0].ages, "12-99");
        assert_eq!(rows[0].parent, "");
        assert_eq!(rows[1].parent, "1");
        assert_eq!(rows[1].description, "");
    }

    #[test]
    fn test_rows_serialize_with_display_headers() {
        let categories = load_categories_fixture();
        let refs: Vec<&Category> = categories.iter().take(1).collect();
        let json = serde_json::to_value(build_category_rows(&refs)).unwrap();
        assert_eq!(json[0]["Name"], "Algèbre");
        assert_eq!(json[0]["Ages"], "12-99");
    }

    // -- formatting helpers --

    #[test]
    fn test_format_ages() {
        assert_eq!(format_ages(Some(3), Some(12)), "3-12");
        assert_eq!(format_ages(Some(18), None), "18+");
        assert_eq!(format_ages(None, Some(10)), "≤10");
        assert_eq!(format_ages(None, None), "");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("court", 10), "court");
        assert_eq!(truncate("éléphants", 5), "élép…");
    }

    #[test]
    fn test_page_footer() {
        assert_eq!(
            format_page_footer(2, 10, 42, 5),
            "Showing 11-20 of 42 | Page 2/5 | 1 [2] 3 4 5"
        );
        assert_eq!(
            format_page_footer(10, 10, 200, 20),
            "Showing 91-100 of 200 | Page 10/20 | 1 ... 9 [10] 11 ... 20"
        );
        assert_eq!(format_page_footer(1, 10, 3, 1), "Showing 1-3 of 3");
        assert_eq!(format_page_footer(1, 10, 0, 0), "Showing 0 of 0");
    }

    #[test]
    fn test_format_tree() {
        let tree = load_hierarchy_fixture();
        assert_eq!(
            format_tree(&tree),
            "Livres (#1)\n  Algèbre (#2)\n  Histoire (#3)\nJouets (#4)"
        );
    }
}
