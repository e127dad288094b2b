use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::formats::CatalogItem;

pub const DEFAULT_DATASET_PATH: &str = "data/extracted_data.csv";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("create dataset dir {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("open dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serialize dataset row into {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("read dataset {}: {source}", path.display())]
pub struct LoadError {
    path: PathBuf,
    #[source]
    source: csv::Error,
}

/// Writes `items` as CSV in insertion order, replacing whatever was at `path`.
///
/// Returns the number of rows written. Nothing is written for an empty slice.
pub fn write(items: &[CatalogItem], path: &Path) -> Result<usize, WriteError> {
    if items.is_empty() {
        tracing::warn!(path = %path.display(), "no items to export; dataset left untouched");
        return Ok(0);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    for item in items {
        writer.serialize(item).map_err(|source| WriteError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    }
    writer.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = items.len(), "dataset written");
    Ok(items.len())
}

/// A dataset as seen by read-only consumers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub exists: bool,
    pub items: Vec<CatalogItem>,
}

/// Loads the dataset at `path`. A missing file is an empty dataset, not an error.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "dataset file missing; treating as empty");
        return Ok(Dataset::default());
    }

    let to_load_error = |source| LoadError {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(to_load_error)?;
    let items = reader
        .deserialize::<CatalogItem>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_load_error)?;

    Ok(Dataset {
        exists: true,
        items,
    })
}
