use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::category::CategoryResolver;
use crate::cli::CrawlArgs;
use crate::extract::ListingParser;
use crate::fetch::{Fetch, FetchError, HttpFetcher};
use crate::formats::CatalogItem;

/// How a crawl ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// A listing page came back without product nodes, or the page bound was reached.
    Completed,
    /// A listing page could not be fetched. Items gathered before it are kept.
    Aborted { page: u32, error: FetchError },
}

impl RunOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

#[derive(Debug)]
pub struct CrawlReport {
    pub items: Vec<CatalogItem>,
    pub pages_with_items: u32,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub base_url: Url,
    pub page_timeout: Duration,
    pub max_pages: Option<u32>,
}

/// Walks the listing pages in order, one at a time.
pub struct Crawler<F> {
    fetcher: F,
    listing: ListingParser,
    categories: CategoryResolver,
    options: CrawlOptions,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F, options: CrawlOptions) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher,
            listing: ListingParser::new().context("build listing parser")?,
            categories: CategoryResolver::new().context("build category resolver")?,
            options,
        })
    }

    pub fn run(&self) -> anyhow::Result<CrawlReport> {
        let base_url = &self.options.base_url;
        let mut items: Vec<CatalogItem> = Vec::new();
        let mut pages_with_items = 0_u32;
        let mut page = 1_u32;

        let outcome = loop {
            if let Some(max_pages) = self.options.max_pages
                && page > max_pages
            {
                tracing::info!(max_pages, "page bound reached; finishing");
                break RunOutcome::Completed;
            }

            let url = listing_page_url(base_url, page)
                .with_context(|| format!("build url for page {page}"))?;
            tracing::info!(page, url = %url, "processing page");

            let html = match self.fetcher.fetch(&url, self.options.page_timeout) {
                Ok(html) => html,
                Err(error) => {
                    tracing::warn!(
                        page,
                        url = %error.url(),
                        %error,
                        "listing page fetch failed; stopping crawl"
                    );
                    break RunOutcome::Aborted { page, error };
                }
            };

            let raw_items = self.listing.extract(&html, base_url);
            if raw_items.is_empty() {
                tracing::info!(page, "no items found; finishing");
                break RunOutcome::Completed;
            }

            let category = self.categories.resolve(&self.fetcher, &url);
            for raw in raw_items {
                let next_id = u32::try_from(items.len() + 1).context("item id overflow")?;
                let item = crate::record::build(raw, &category, next_id);
                tracing::debug!(id = item.id, title = %item.title, category = %item.category, "extracted");
                items.push(item);
            }

            pages_with_items += 1;
            page += 1;
        };

        tracing::info!(total_items = items.len(), aborted = outcome.is_aborted(), "crawl finished");
        Ok(CrawlReport {
            items,
            pages_with_items,
            outcome,
        })
    }
}

/// Page 1 is the catalog root; later pages follow `catalogue/page-<n>.html`.
pub fn listing_page_url(base_url: &Url, page: u32) -> Result<Url, url::ParseError> {
    if page <= 1 {
        return Ok(base_url.clone());
    }
    base_url.join(&format!("catalogue/page-{page}.html"))
}

pub fn run(args: CrawlArgs) -> anyhow::Result<RunOutcome> {
    let base_url = Url::parse(&args.url).context("parse --url")?;
    if base_url.scheme() != "http" && base_url.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {base_url}");
    }
    let base_url = url_with_trailing_slash(&base_url);
    let out_path = PathBuf::from(&args.out);

    let fetcher = HttpFetcher::new()?;
    let crawler = Crawler::new(
        fetcher,
        CrawlOptions {
            base_url,
            page_timeout: Duration::from_secs(args.timeout_secs),
            max_pages: args.max_pages,
        },
    )?;

    let report = crawler.run().context("crawl catalog")?;
    tracing::info!(
        pages = report.pages_with_items,
        items = report.items.len(),
        "crawl completed"
    );

    crate::dataset::write(&report.items, &out_path)
        .with_context(|| format!("write dataset: {}", out_path.display()))?;

    Ok(report.outcome)
}

fn url_with_trailing_slash(url: &Url) -> Url {
    let mut out = url.clone();
    let path = out.path();
    if !path.ends_with('/') {
        out.set_path(&format!("{path}/"));
    }
    out
}
