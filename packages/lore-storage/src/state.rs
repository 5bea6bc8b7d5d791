use std::{fs, path::Path};

use crate::{Error, Result};
use lore_domain::KnowledgeItem;

/// Reads the persisted collection reference: a single trimmed line.
pub fn load_collection_ref(path: &Path) -> Result<String> {
	let raw = match fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound =>
			return Err(Error::NotFound(format!(
				"Collection reference file {path:?} not found; run the index step first."
			))),
		Err(err) => return Err(Error::Io { path: path.to_path_buf(), source: err }),
	};
	let reference = raw.trim().to_string();

	if reference.is_empty() {
		return Err(Error::NotFound(format!(
			"Collection reference file {path:?} is empty; run the index step first."
		)));
	}

	Ok(reference)
}

pub fn save_collection_ref(path: &Path, reference: &str) -> Result<()> {
	fs::write(path, format!("{}\n", reference.trim()))
		.map_err(|err| Error::Io { path: path.to_path_buf(), source: err })
}

/// Persists one ingestion category as a pretty-printed JSON array with full
/// Unicode preserved.
pub fn write_items(path: &Path, items: &[KnowledgeItem]) -> Result<()> {
	let rendered = serde_json::to_string_pretty(items)?;

	fs::write(path, format!("{rendered}\n"))
		.map_err(|err| Error::Io { path: path.to_path_buf(), source: err })
}

pub fn read_items(path: &Path) -> Result<Vec<KnowledgeItem>> {
	let raw =
		fs::read_to_string(path).map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;

	Ok(serde_json::from_str(&raw)?)
}
