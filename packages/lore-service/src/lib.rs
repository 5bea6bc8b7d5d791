pub mod ask;
pub mod index;
pub mod ingest;

mod error;

pub use ask::AskResponse;
pub use error::{Error, Result};
pub use index::IndexReport;
pub use ingest::IngestReport;

use std::{future::Future, pin::Pin, sync::Arc};

use lore_config::{ChatProviderConfig, Config, EmbeddingProviderConfig};
use lore_domain::language::{self, Language};
use lore_providers::{chat, embedding, prompts};
use lore_storage::qdrant::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Chat-completion seam. The default implementation goes over the wire;
/// tests substitute scripted responders.
pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		system: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

struct DefaultProviders;

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		system: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(chat::complete(cfg, system, user))
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

#[derive(Clone)]
pub struct Providers {
	pub chat: Arc<dyn ChatProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(chat: Arc<dyn ChatProvider>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { chat, embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { chat: provider.clone(), embedding: provider }
	}
}

pub struct LoreService {
	pub cfg: Config,
	pub qdrant: QdrantStore,
	pub providers: Providers,
}
impl LoreService {
	pub fn new(cfg: Config) -> Result<Self> {
		let qdrant = QdrantStore::new(&cfg.storage.qdrant)?;

		Ok(Self { cfg, qdrant, providers: Providers::default() })
	}

	pub fn with_providers(cfg: Config, qdrant: QdrantStore, providers: Providers) -> Self {
		Self { cfg, qdrant, providers }
	}

	/// Translates `text` into `target` through the chat provider.
	///
	/// A true no-op for blank input or when the detected language already
	/// matches the target; no provider call is made in either case.
	pub(crate) async fn translate(&self, text: &str, target: Language) -> Result<String> {
		if text.trim().is_empty() || language::detect(text) == target {
			return Ok(text.to_string());
		}

		let system = prompts::translation_system_prompt(target);
		let translated =
			self.providers.chat.complete(&self.cfg.providers.chat, &system, text).await?;

		Ok(translated.trim().to_string())
	}
}
