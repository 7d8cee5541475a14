use std::{path::PathBuf, sync::Arc};

use tokio::sync::OnceCell;

use crate::{
    error::{AppError, AppResult},
    services::{catalog, recommendations::RecommendationIndex},
};

/// Process-wide handle to the recommendation index
///
/// The first caller of `get` loads the catalog and builds the index on the
/// blocking pool; concurrent callers wait on the same initialization. A failed
/// build leaves the cell empty so the error reaches every caller.
#[derive(Clone)]
pub struct SharedIndex {
    catalog_path: PathBuf,
    cell: Arc<OnceCell<Arc<RecommendationIndex>>>,
}

impl SharedIndex {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Wraps an index that has already been built
    pub fn from_index(index: RecommendationIndex) -> Self {
        Self {
            catalog_path: PathBuf::new(),
            cell: Arc::new(OnceCell::new_with(Some(Arc::new(index)))),
        }
    }

    pub fn is_built(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> AppResult<Arc<RecommendationIndex>> {
        self.cell
            .get_or_try_init(|| build_from_path(self.catalog_path.clone()))
            .await
            .cloned()
    }
}

async fn build_from_path(path: PathBuf) -> AppResult<Arc<RecommendationIndex>> {
    tracing::info!(path = %path.display(), "Building recommendation index");

    let index = tokio::task::spawn_blocking(move || {
        let catalog = catalog::load_path(&path)?;
        if catalog.is_empty() {
            return Err(AppError::Configuration(format!(
                "Catalog {} has no usable items",
                path.display()
            )));
        }
        RecommendationIndex::build(catalog)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Arc::new(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_builds_once_and_shares_result() {
        let file = write_catalog(
            "title,description,listed_in,type,date_added\n\
             Narcos,Drug lord empire in Colombia,Crime TV Shows,TV Show,\"September 1, 2017\"\n\
             El Chapo,Rise of a drug lord in Mexico,Crime TV Shows,TV Show,\"June 1, 2018\"\n",
        );
        let shared = SharedIndex::new(file.path());
        assert!(!shared.is_built());

        let other = shared.clone();
        let (a, b) = tokio::join!(shared.get(), other.get());
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(shared.is_built());
        assert_eq!(a.catalog().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_configuration_error() {
        let file = write_catalog("title,description,listed_in,type,date_added\nGhost,,,Movie,\n");
        let shared = SharedIndex::new(file.path());
        let err = shared.get().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(!shared.is_built());
    }

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let shared = SharedIndex::new("/nonexistent/catalog.csv");
        let err = shared.get().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
