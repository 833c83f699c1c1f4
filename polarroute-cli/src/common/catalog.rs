use std::path::{Path, PathBuf};

use polarroute_core::{BuiltinCatalog, Catalog, CatalogError, CatalogLoader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileCatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// Reads catalog JSON from disk.
#[derive(Debug, Clone)]
pub struct FileCatalogLoader {
    path: PathBuf,
}

impl FileCatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogLoader for FileCatalogLoader {
    type Error = FileCatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| FileCatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        Catalog::from_json(&json).map_err(|source| FileCatalogError::Invalid {
            path: self.path.clone(),
            source,
        })
    }
}

/// Catalog from `--catalog`, or the embedded one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let catalog = match path {
        Some(path) => {
            log::info!("loading catalog from {}", path.display());
            FileCatalogLoader::new(path).load_catalog()?
        }
        None => BuiltinCatalog.load_catalog()?,
    };
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::util::temp_path;

    #[test]
    fn missing_file_reports_io_error() {
        let err = FileCatalogLoader::new(temp_path("missing-catalog"))
            .load_catalog()
            .unwrap_err();
        assert!(matches!(err, FileCatalogError::Io { .. }));
    }

    #[test]
    fn invalid_file_reports_validation_error() {
        let path = temp_path("empty-catalog");
        std::fs::write(&path, r#"{ "ports": [], "corridors": [] }"#).unwrap();
        let err = FileCatalogLoader::new(&path).load_catalog().unwrap_err();
        assert!(matches!(
            err,
            FileCatalogError::Invalid {
                source: CatalogError::NoCorridors,
                ..
            }
        ));
    }

    #[test]
    fn roundtrips_builtin_catalog_through_disk() {
        let path = temp_path("builtin-catalog");
        std::fs::write(&path, serde_json::to_string(Catalog::builtin()).unwrap()).unwrap();
        let loaded = load_catalog(Some(&path)).unwrap();
        assert_eq!(loaded.ports.len(), Catalog::builtin().ports.len());
        assert_eq!(loaded.corridors, Catalog::builtin().corridors);
        assert_eq!(load_catalog(None).unwrap(), *Catalog::builtin());
    }
}
