#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read {path:?}.")]
	Io { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse export file {path:?}.")]
	Json { path: std::path::PathBuf, source: serde_json::Error },
	#[error("Failed to parse document {path:?}: {message}")]
	Document { path: std::path::PathBuf, message: String },
	#[error("Unsupported file type: {path:?}.")]
	UnsupportedFormat { path: std::path::PathBuf },
}
