use crate::error::{ScrapeError, ScrapeResult};
use reqwest::Url;
use scraper::{ElementRef, Selector};

/// Compile a CSS selector, mapping failures into a scrape error.
pub fn selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{}: {}", css, e)))
}

/// All descendant text of an element.
pub fn element_text(node: ElementRef) -> String {
    node.text().collect::<String>()
}

/// Text of the first descendant matching `selector`, trimmed. Empty if none.
pub fn select_text(node: ElementRef, selector: &Selector) -> String {
    node.select(selector)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_default()
}

/// Text nodes that are direct children of the element, ignoring nested markup.
pub fn own_text(node: ElementRef) -> String {
    node.children()
        .filter_map(|child| child.value().as_text().map(|t| &**t))
        .collect::<String>()
}

pub fn has_class(node: ElementRef, class: &str) -> bool {
    node.value().classes().any(|c| c == class)
}

pub fn first_child_element(node: ElementRef) -> Option<ElementRef> {
    node.children().find_map(ElementRef::wrap)
}

/// Cancelled entries carry a `cancelled` class on the entry itself or on the
/// first element nested inside it (`<dd><div><span class="cancelled">`).
pub fn is_cancelled(entry: ElementRef) -> bool {
    let mut node = Some(entry);
    for _ in 0..3 {
        match node {
            Some(el) if has_class(el, "cancelled") => return true,
            Some(el) => node = first_child_element(el),
            None => break,
        }
    }
    false
}

/// Resolve a possibly-relative href against the site's base URL.
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Value of a query parameter, matched case-sensitively like the site emits it.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.into_owned())
}

/// Numeric query parameter, `None` when absent or not a number.
pub fn query_id(url: &Url, name: &str) -> Option<u32> {
    query_param(url, name)?.trim().parse().ok()
}

/// Parse an integer out of loosely formatted text ("9", " 9 ", "9,").
pub fn parse_number<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.trim().trim_end_matches(',').trim().parse().ok()
}
