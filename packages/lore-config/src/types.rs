use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub ingest: Ingest,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
	/// File holding the active collection reference, one trimmed line.
	pub collection_ref_file: String,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub chat: ChatProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	/// Environment variable consulted when `api_key` is empty.
	pub api_key_env: Option<String>,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub api_key_env: Option<String>,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Ingest {
	/// Channel export directories, each holding `.json` message dumps.
	pub conversation_dirs: Vec<String>,
	/// Office documents to ingest as official sources.
	pub documents: Vec<String>,
	pub processed_conversations: String,
	pub processed_documents: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub max_results: u32,
	pub embed_batch_size: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { max_results: 30, embed_batch_size: 64 }
	}
}
