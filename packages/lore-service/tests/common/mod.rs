use std::sync::Arc;

use lore_service::{BoxFuture, ChatProvider, EmbeddingProvider, LoreService, Providers};
use lore_storage::qdrant::QdrantStore;
use lore_testkit::{ScriptedResponses, TempWorkspace, sample_config};

pub struct ScriptedChat(pub Arc<ScriptedResponses>);
impl ChatProvider for ScriptedChat {
	fn complete<'a>(
		&'a self,
		_cfg: &'a lore_config::ChatProviderConfig,
		system: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		let reply = self.0.next(&format!("{system}\n---\n{user}"));

		Box::pin(async move { Ok(reply) })
	}
}

pub struct FixedEmbeddings;
impl EmbeddingProvider for FixedEmbeddings {
	fn embed<'a>(
		&'a self,
		cfg: &'a lore_config::EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		let vectors = texts.iter().map(|_| vec![0.1; cfg.dimensions as usize]).collect();

		Box::pin(async move { Ok(vectors) })
	}
}

/// A service whose chat provider replays `replies` in order, wired to config
/// paths inside `workspace`.
pub fn scripted_service(
	workspace: &TempWorkspace,
	replies: &[&str],
) -> (LoreService, Arc<ScriptedResponses>) {
	let mut cfg = sample_config(workspace.root());

	if let Ok(url) = std::env::var("LORE_QDRANT_URL") {
		cfg.storage.qdrant.url = url;
	}

	let qdrant = QdrantStore::new(&cfg.storage.qdrant).expect("Failed to build the store.");
	let chat = Arc::new(ScriptedResponses::new(replies.iter().copied()));
	let providers =
		Providers::new(Arc::new(ScriptedChat(chat.clone())), Arc::new(FixedEmbeddings));

	(LoreService::with_providers(cfg, qdrant, providers), chat)
}
