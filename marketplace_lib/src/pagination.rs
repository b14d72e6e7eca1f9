//! Page navigation helpers for rendering a paginated listing.

use std::fmt;

/// Number of page links shown before the window collapses with ellipses.
pub const MAX_VISIBLE_PAGES: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLink::Page(n) => write!(f, "{}", n),
            PageLink::Ellipsis => write!(f, "..."),
        }
    }
}

/// Smallest window that fits the first page, the last page, `current` with
/// a neighbour on each side and two ellipses.
pub const MIN_VISIBLE_PAGES: u32 = 5;

/// Page links to show around `current`.
///
/// Every page when there are at most `max_visible`; otherwise the first and
/// last page stay visible and the pages nearest `current` fill the middle.
/// `max_visible` below [`MIN_VISIBLE_PAGES`] is raised to it, and `current`
/// is clamped into `1..=total_pages`.
pub fn page_window(current: u32, total_pages: u32, max_visible: u32) -> Vec<PageLink> {
    let max_visible = max_visible.max(MIN_VISIBLE_PAGES);
    if total_pages <= max_visible {
        return (1..=total_pages).map(PageLink::Page).collect();
    }
    let current = current.clamp(1, total_pages);
    // Pages shown at either edge, next to the single link for the far end.
    let edge = max_visible - 1;
    // Pages shown around `current` when both ellipses are needed.
    let middle = max_visible - 2;

    let mut links = Vec::with_capacity(max_visible as usize + 2);
    if current < edge {
        links.extend((1..=edge).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total_pages));
    } else if current > total_pages - edge + 1 {
        links.push(PageLink::Page(1));
        links.push(PageLink::Ellipsis);
        links.extend((total_pages - edge + 1..=total_pages).map(PageLink::Page));
    } else {
        let first = current - (middle - 1) / 2;
        links.push(PageLink::Page(1));
        links.push(PageLink::Ellipsis);
        links.extend((first..first + middle).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total_pages));
    }
    links
}

/// 1-based inclusive range of the items shown on `current`, or `None` when
/// there is nothing on that page.
pub fn item_range(current: u32, limit: u32, total_count: u64) -> Option<(u64, u64)> {
    if current == 0 || limit == 0 {
        return None;
    }
    let start = (current as u64 - 1) * limit as u64 + 1;
    if start > total_count {
        return None;
    }
    let end = (current as u64 * limit as u64).min(total_count);
    Some((start, end))
}
