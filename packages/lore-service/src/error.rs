pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Ingest error: {message}")]
	Ingest { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
}
impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<lore_storage::Error> for Error {
	fn from(err: lore_storage::Error) -> Self {
		match err {
			lore_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
			lore_storage::Error::NotFound(message) => Self::NotFound { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<lore_ingest::Error> for Error {
	fn from(err: lore_ingest::Error) -> Self {
		Self::Ingest { message: err.to_string() }
	}
}
