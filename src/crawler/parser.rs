//! HTML parser for category pages
//!
//! This module handles the two page shapes of a category listing:
//! - the root index, whose bucket anchors become the crawl lanes
//! - a listing page, which yields item names and an optional "next page" link
//!
//! Parsing is synchronous and returns owned data only; `scraper::Html` never
//! leaves this module.

use crate::config::Config;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::ops::RangeInclusive;
use url::Url;

/// Compiled page layout of a category, built once per run
#[derive(Debug, Clone)]
pub struct CategoryLayout {
    index_selector: Selector,
    item_selector: Selector,
    next_page_label: String,
    excluded_lead: RangeInclusive<u32>,
    base_url: Url,
}

impl CategoryLayout {
    /// Compiles selectors and the base URL from the configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let source = &config.source;
        let [start, end] = config.crawler.excluded_lead_range;

        Ok(Self {
            index_selector: compile_selector(&source.index_selector)?,
            item_selector: compile_selector(&source.item_selector)?,
            next_page_label: source.next_page_label.trim().to_string(),
            excluded_lead: start..=end,
            base_url: Url::parse(&source.base_url).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", source.base_url, e))
            })?,
        })
    }

    /// Returns true if `name` starts inside the excluded code point range
    pub fn is_excluded(&self, name: &str) -> bool {
        name.chars()
            .next()
            .map_or(true, |c| self.excluded_lead.contains(&(c as u32)))
    }
}

fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}

/// One bucket link of the root index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Absolute URL of the bucket's first page
    pub url: String,

    /// Trimmed anchor text, the bucket's start prefix
    pub label: String,
}

/// Items and continuation extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Surviving item names in document order
    pub names: Vec<String>,

    /// Absolute URL of the next page, if the page advertises one
    pub next_page: Option<String>,
}

/// Extracts the bucket entries of the root index in document order
///
/// Anchors without a usable href are skipped together with their label, so
/// URLs and labels stay aligned.
pub fn parse_index(html: &str, layout: &CategoryLayout) -> Vec<IndexEntry> {
    let document = Html::parse_document(html);

    document
        .select(&layout.index_selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = resolve_link(href, &layout.base_url)?;
            Some(IndexEntry {
                url,
                label: element_text(&anchor),
            })
        })
        .collect()
}

/// Extracts item names and the next-page link from a listing page
///
/// The item name is the anchor's `title` attribute. Anchors without a title
/// and names starting in the excluded range are dropped. Calling this twice
/// on the same input yields the same result.
///
/// # Example
///
/// ```no_run
/// use category_census::config::Config;
/// use category_census::crawler::{parse_listing, CategoryLayout};
///
/// let layout = CategoryLayout::from_config(&Config::default()).unwrap();
/// let page = parse_listing("<html><body></body></html>", &layout);
/// assert!(page.names.is_empty());
/// assert_eq!(page.next_page, None);
/// ```
pub fn parse_listing(html: &str, layout: &CategoryLayout) -> ListingPage {
    let document = Html::parse_document(html);

    let names = document
        .select(&layout.item_selector)
        .filter_map(|anchor| anchor.value().attr("title"))
        .filter(|name| !layout.is_excluded(name))
        .map(str::to_string)
        .collect();

    let next_page = find_link_by_text(&document, &layout.next_page_label)
        .and_then(|href| resolve_link(href, &layout.base_url));

    ListingPage { names, next_page }
}

/// Returns the href of the first `<a>` whose trimmed text equals `label`
fn find_link_by_text<'a>(document: &'a Html, label: &str) -> Option<&'a str> {
    let selector = Selector::parse("a[href]").ok()?;

    document
        .select(&selector)
        .find(|anchor| element_text(anchor) == label)
        .and_then(|anchor| anchor.value().attr("href"))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves an href against the base URL
///
/// Returns None for empty, fragment-only, non-HTTP(S) or unparseable links.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
