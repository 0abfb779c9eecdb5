#[derive(Debug, thiserror::Error)]
pub enum CollegiumError {
  #[error("could not load reference dataset: {0}")]
  DatasetError(String),
  #[error("invalid request: {0}")]
  ValidationError(#[from] validator::ValidationErrors),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}
