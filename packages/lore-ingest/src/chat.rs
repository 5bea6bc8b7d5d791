use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::{Error, Result};

/// One chat message as it appears in a channel export, before translation
/// and thread grouping. The channel name comes from the export directory.
#[derive(Clone, Debug)]
pub struct RawMessage {
	pub channel: String,
	pub ts: String,
	pub thread_ts: Option<String>,
	pub user: String,
	pub text: String,
}

#[derive(Debug, Deserialize)]
struct ExportMessage {
	#[serde(default)]
	text: String,
	#[serde(default)]
	ts: String,
	thread_ts: Option<String>,
	#[serde(default)]
	user: String,
}

/// Loads every `.json` export under each channel directory.
///
/// Unreadable or unparsable files are logged and skipped; the batch
/// continues. Messages with empty or missing text produce nothing.
pub fn load_channel_exports(channel_dirs: &[String]) -> Result<Vec<RawMessage>> {
	let mut messages = Vec::new();

	for dir in channel_dirs {
		let channel = channel_name(dir);
		let path = Path::new(dir);

		if !path.is_dir() {
			warn!(directory = %dir, "Channel directory not found, skipping.");

			continue;
		}

		let mut files: Vec<_> = fs::read_dir(path)
			.map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?
			.filter_map(|entry| entry.ok().map(|entry| entry.path()))
			.filter(|file| file.extension().and_then(|ext| ext.to_str()) == Some("json"))
			.collect();

		// Export file names carry dates; sorting keeps arrival order stable.
		files.sort();

		for file in files {
			match load_export_file(&file, &channel) {
				Ok(batch) => messages.extend(batch),
				Err(err) => warn!(file = ?file, error = %err, "Skipping unparsable export file."),
			}
		}
	}

	Ok(messages)
}

fn load_export_file(path: &Path, channel: &str) -> Result<Vec<RawMessage>> {
	let raw =
		fs::read_to_string(path).map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;
	let entries: Vec<Value> = serde_json::from_str(&raw)
		.map_err(|err| Error::Json { path: path.to_path_buf(), source: err })?;

	Ok(entries
		.into_iter()
		// Non-object entries are tolerated and dropped.
		.filter_map(|entry| serde_json::from_value::<ExportMessage>(entry).ok())
		// No text, no knowledge item.
		.filter(|message| !message.text.trim().is_empty())
		.map(|message| RawMessage {
			channel: channel.to_string(),
			ts: message.ts,
			thread_ts: message.thread_ts.filter(|ts| !ts.is_empty()),
			user: message.user,
			text: message.text,
		})
		.collect())
}

fn channel_name(dir: &str) -> String {
	Path::new(dir)
		.file_name()
		.and_then(|name| name.to_str())
		.unwrap_or(dir)
		.to_string()
}
