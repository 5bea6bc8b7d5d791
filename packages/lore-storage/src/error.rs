#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Qdrant(#[from] qdrant_client::QdrantError),
	#[error("Failed to access {path:?}.")]
	Io { path: std::path::PathBuf, source: std::io::Error },
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error("{0}")]
	NotFound(String),
}
