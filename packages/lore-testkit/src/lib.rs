//! Shared fixtures for tests that exercise the pipeline without a network or
//! a running Qdrant.

use std::{
	collections::VecDeque,
	env, fs,
	path::{Path, PathBuf},
	sync::{
		Mutex,
		atomic::{AtomicU64, Ordering},
	},
	time::{SystemTime, UNIX_EPOCH},
};

use serde_json::{Value, json};

static WORKSPACE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A throwaway directory for fixture files, removed on drop.
pub struct TempWorkspace {
	root: PathBuf,
}
impl TempWorkspace {
	pub fn new(label: &str) -> Self {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|elapsed| elapsed.as_nanos())
			.unwrap_or_default();
		let counter = WORKSPACE_COUNTER.fetch_add(1, Ordering::Relaxed);
		let root = env::temp_dir().join(format!(
			"lore_{label}_{}_{nanos}_{counter}",
			std::process::id()
		));

		fs::create_dir_all(&root).expect("Failed to create a temp workspace.");

		Self { root }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn path(&self, relative: &str) -> PathBuf {
		self.root.join(relative)
	}

	/// Writes `content` at `relative`, creating parent directories.
	pub fn write(&self, relative: &str, content: &str) -> PathBuf {
		let path = self.root.join(relative);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).expect("Failed to create fixture directories.");
		}

		fs::write(&path, content).expect("Failed to write a fixture file.");

		path
	}

	pub fn write_json(&self, relative: &str, value: &Value) -> PathBuf {
		let rendered =
			serde_json::to_string_pretty(value).expect("Failed to render fixture JSON.");

		self.write(relative, &rendered)
	}
}
impl Drop for TempWorkspace {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.root);
	}
}

/// One chat-export message in the shape the channel loaders expect.
pub fn export_message(user: &str, text: &str, ts: &str, thread_ts: Option<&str>) -> Value {
	let mut message = json!({ "user": user, "text": text, "ts": ts });

	if let Some(thread_ts) = thread_ts {
		message["thread_ts"] = json!(thread_ts);
	}

	message
}

/// Configuration pointing every path into `root`, so pipeline tests never
/// touch real exports or documents.
pub fn sample_config(root: &Path) -> lore_config::Config {
	let config_path = root.join("lore.toml");
	let root = root.display();
	let rendered = format!(
		r#"
[service]
log_level = "info"

[storage]
collection_ref_file = "{root}/collection_ref.txt"

[storage.qdrant]
collection = "support_knowledge_test"
url        = "http://127.0.0.1:6334"
vector_dim = 3

[providers.embedding]
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
dimensions  = 3
model       = "text-embedding-3-small"
path        = "/v1/embeddings"
provider_id = "openai"
timeout_ms  = 1000

[providers.chat]
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
model       = "gpt-4o"
path        = "/v1/chat/completions"
provider_id = "openai"
temperature = 0.2
timeout_ms  = 1000

[ingest]
conversation_dirs       = ["{root}/product-changes", "{root}/help", "{root}/customer-success"]
documents               = ["{root}/docs/Reclaim Guideline 2025.xlsx"]
processed_conversations = "{root}/processed_conversations.json"
processed_documents     = "{root}/processed_documents.json"

[search]
embed_batch_size = 2
max_results      = 10
"#
	);

	fs::write(&config_path, rendered).expect("Failed to write the sample config.");

	lore_config::load(&config_path).expect("Failed to load the sample config.")
}

/// A queue of canned replies plus a log of the requests that consumed them.
/// Tests wrap this in their provider trait impls.
pub struct ScriptedResponses {
	replies: Mutex<VecDeque<String>>,
	calls: Mutex<Vec<String>>,
}
impl ScriptedResponses {
	pub fn new<I, S>(replies: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
			calls: Mutex::new(Vec::new()),
		}
	}

	/// Records `request` and pops the next canned reply. Panics when the
	/// script runs dry, which means the test made an unexpected call.
	pub fn next(&self, request: &str) -> String {
		self.calls
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(request.to_string());
		self.replies
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.pop_front()
			.expect("Scripted responses ran out; the test made an unexpected provider call.")
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).len()
	}
}
