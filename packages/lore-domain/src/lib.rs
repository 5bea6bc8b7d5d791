pub mod intent;
pub mod language;
pub mod metadata;
pub mod rerank;
pub mod threads;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One normalized unit of support knowledge, ready for indexing.
///
/// Produced from either a grouped conversation thread or an office document;
/// immutable once built.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct KnowledgeItem {
	pub content: String,
	pub metadata: Map<String, Value>,
}
