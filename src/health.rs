use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::HealthArgs;
use crate::formats::{HealthReport, HealthStatus};

pub fn run(args: HealthArgs) -> anyhow::Result<()> {
    let path = PathBuf::from(&args.data);
    let report = report(&path)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report).context("serialize health report")?;
    stdout.write_all(b"\n").context("write health report newline")?;
    Ok(())
}

/// A missing dataset is reported as degraded rather than failing.
pub fn report(path: &Path) -> anyhow::Result<HealthReport> {
    let dataset = crate::dataset::load(path).context("load dataset")?;
    let status = if dataset.exists {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    Ok(HealthReport {
        status,
        total_books: dataset.items.len(),
        data_file_exists: dataset.exists,
        timestamp: chrono::Utc::now(),
    })
}
