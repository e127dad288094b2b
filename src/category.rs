use std::time::Duration;

use scraper::{Html, Selector};
use url::Url;

use crate::extract::{parse_selector, stripped_text};
use crate::fetch::Fetch;

pub const FALLBACK_CATEGORY: &str = "General";

/// Phrase the catalog puts in every page title, e.g. `"Poetry | Books to Scrape - Sandbox"`.
pub const TITLE_MARKER: &str = "Books to Scrape";

pub const CATEGORY_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Works out the section label shared by every product on a listing page.
#[derive(Debug)]
pub struct CategoryResolver {
    breadcrumb: Selector,
    breadcrumb_entry: Selector,
    title: Selector,
}

impl CategoryResolver {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            breadcrumb: parse_selector("ul.breadcrumb")?,
            breadcrumb_entry: parse_selector("li")?,
            title: parse_selector("title")?,
        })
    }

    /// Fetches `page_url` on its own and reads the label from it. Never fails:
    /// any fetch error or missing marker yields [`FALLBACK_CATEGORY`].
    pub fn resolve(&self, fetcher: &impl Fetch, page_url: &Url) -> String {
        match fetcher.fetch(page_url, CATEGORY_FETCH_TIMEOUT) {
            Ok(html) => self.resolve_from_html(&html),
            Err(err) => {
                tracing::warn!(url = %page_url, %err, "category lookup failed; using fallback");
                FALLBACK_CATEGORY.to_owned()
            }
        }
    }

    pub fn resolve_from_html(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        // Only the first breadcrumb list counts.
        let crumbs = document
            .select(&self.breadcrumb)
            .next()
            .map(|list| {
                list.select(&self.breadcrumb_entry)
                    .map(stripped_text)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if crumbs.len() > 1
            && let Some(last) = crumbs.last().filter(|crumb| !crumb.is_empty())
        {
            return last.clone();
        }

        if let Some(title) = document.select(&self.title).next() {
            let text = title.text().collect::<String>();
            if text.contains(TITLE_MARKER)
                && let Some((head, _)) = text.split_once('|')
            {
                let head = head.trim();
                if !head.is_empty() {
                    return head.to_owned();
                }
            }
        }

        FALLBACK_CATEGORY.to_owned()
    }
}
