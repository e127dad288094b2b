#![forbid(unsafe_code)]

pub mod category;
pub mod cli;
pub mod crawl;
pub mod dataset;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod health;
pub mod logging;
pub mod record;
