//! Fetching raw data files.
//!
//! Fetches are the only suspension points of the pipeline. The trait is
//! runtime-agnostic: implementations return plain futures and the host chooses
//! the executor.

use crate::data::error::FetchError;
use std::path::{Component, Path, PathBuf};

/// Source of raw data file contents, addressed by relative path
/// (`data/json/<id>.json`, `data/csv/<id>.csv`).
#[allow(async_fn_in_trait)]
pub trait DataFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

impl<F: DataFetcher> DataFetcher for &F {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        (**self).fetch_text(path).await
    }
}

/// Reads data files below a root directory.
///
/// A missing file answers like an HTTP 404 so the resolver treats it like any
/// other failed fetch.
///
/// Reads use blocking `std::fs` calls, so the returned future never yields and
/// holds the executor thread for the duration of the read. That is fine for the
/// CLI and tests, which drive everything with `block_on`. Hosts that share an
/// executor with other work should wrap a non-blocking reader in their own
/// [`DataFetcher`] instead.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl DataFetcher for FsFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full = self.resolve(path)?;
        match std::fs::read_to_string(&full) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::not_found(path)),
            Err(source) => Err(FetchError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }
}
