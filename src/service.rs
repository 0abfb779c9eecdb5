use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use tokio::sync::OnceCell;

use crate::{canonical::CanonicalIndex, dataset, error::CollegiumError, index::ReferenceIndex, model::InstitutionRecord};

/// Resolution handle over the reference dataset. All indices are built in
/// full before a handle is returned, and are read-only afterwards, so a
/// service can be shared freely across request handlers.
pub struct CollegeService {
  reference: ReferenceIndex,
  canonical: CanonicalIndex,
}

impl CollegeService {
  /// Reads the dataset file and builds the indices. Read, parse and
  /// empty-dataset problems are fatal: no handle is returned, and no caller
  /// can observe a partially-built index.
  pub fn from_path(path: impl AsRef<Path>) -> Result<CollegeService, CollegiumError> {
    Self::from_records(dataset::load_records(path.as_ref())?)
  }

  /// Builds the indices from already-loaded records, merging in the custom
  /// non-geographic entries.
  pub fn from_records(records: Vec<InstitutionRecord>) -> Result<CollegeService, CollegiumError> {
    if records.is_empty() {
      return Err(CollegiumError::DatasetError("reference dataset contains no records".to_string()));
    }

    let dataset_size = records.len();
    let records = records.into_iter().chain(dataset::CUSTOM_RECORDS.iter().cloned()).map(Arc::new).collect::<Vec<_>>();

    let reference = ReferenceIndex::build(&records);
    let canonical = CanonicalIndex::build(&records);

    tracing::info!(records = dataset_size, keys = reference.len(), groups = canonical.len(), "built college name indices");

    Ok(CollegeService { reference, canonical })
  }

  pub(crate) fn reference(&self) -> &ReferenceIndex {
    &self.reference
  }

  pub(crate) fn canonical(&self) -> &CanonicalIndex {
    &self.canonical
  }
}

/// Lazily-built service sharing one initialization across concurrent callers:
/// the first `get` runs the build, callers arriving while it runs await the
/// same build, and later calls return the built handle untouched. A failed
/// build surfaces its error to every waiter.
pub struct LazyCollegeService {
  path: PathBuf,
  service: OnceCell<CollegeService>,
}

impl LazyCollegeService {
  pub fn new(path: impl Into<PathBuf>) -> LazyCollegeService {
    LazyCollegeService { path: path.into(), service: OnceCell::new() }
  }

  pub async fn get(&self) -> Result<&CollegeService, CollegiumError> {
    self.service.get_or_try_init(|| async { CollegeService::from_path(&self.path) }).await
  }
}
