use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk the catalog listing pages and write the dataset.
    Crawl(CrawlArgs),
    /// Report whether the dataset is present and how many rows it holds.
    Health(HealthArgs),
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Catalog root URL (must be http/https).
    #[arg(long, default_value = "https://books.toscrape.com/")]
    pub url: String,

    /// Output CSV path. Overwritten on every run.
    #[arg(long, default_value = crate::dataset::DEFAULT_DATASET_PATH)]
    pub out: String,

    /// Timeout for each listing page request.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Stop after this many listing pages even if more are available.
    #[arg(long)]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Args)]
pub struct HealthArgs {
    /// Dataset CSV path (written by `crawl`).
    #[arg(long, default_value = crate::dataset::DEFAULT_DATASET_PATH)]
    pub data: String,
}
