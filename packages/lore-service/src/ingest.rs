use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::{info, warn};

use lore_domain::{
	KnowledgeItem,
	language::{self, Language},
	metadata,
	threads::{self, Thread, ThreadMessage},
};
use lore_ingest::{
	chat,
	docs::{self, ParsedDocument},
};
use lore_storage::state;

use crate::{LoreService, Result};

/// Counts from one ingestion run.
#[derive(Clone, Copy, Debug, Default)]
pub struct IngestReport {
	pub messages: usize,
	pub threads: usize,
	pub documents: usize,
	pub skipped_documents: usize,
}

impl LoreService {
	/// Normalizes chat exports and office documents into English knowledge
	/// items and persists both batches for the index step.
	///
	/// Unreadable or unsupported documents are logged and skipped; the rest
	/// of the batch still lands.
	pub async fn ingest(&self) -> Result<IngestReport> {
		let mut report = IngestReport::default();
		let raw_messages = chat::load_channel_exports(&self.cfg.ingest.conversation_dirs)?;

		report.messages = raw_messages.len();

		let mut thread_messages = Vec::with_capacity(raw_messages.len());

		for raw in raw_messages {
			let text = self.translate(&raw.text, Language::English).await?;

			thread_messages.push(ThreadMessage {
				user: raw.user,
				text,
				ts: raw.ts,
				thread_ts: raw.thread_ts,
				source: metadata::channel_source_tag(&raw.channel).map(str::to_string),
			});
		}

		let grouped = threads::group_into_threads(thread_messages);
		let conversation_items: Vec<KnowledgeItem> = grouped.iter().map(thread_item).collect();

		report.threads = conversation_items.len();

		state::write_items(
			Path::new(&self.cfg.ingest.processed_conversations),
			&conversation_items,
		)?;
		info!("Wrote {} conversation threads.", conversation_items.len());

		let mut document_items = Vec::new();

		for path in &self.cfg.ingest.documents {
			match docs::parse_document(Path::new(path)) {
				Ok(parsed) => document_items.push(self.document_item(parsed).await?),
				Err(err) => {
					warn!("Skipping document {path}: {err}");

					report.skipped_documents += 1;
				},
			}
		}

		report.documents = document_items.len();

		state::write_items(Path::new(&self.cfg.ingest.processed_documents), &document_items)?;
		info!("Wrote {} documents.", document_items.len());

		Ok(report)
	}

	async fn document_item(&self, parsed: ParsedDocument) -> Result<KnowledgeItem> {
		let original_language = language::detect(&parsed.text);
		let text = self.translate(&parsed.text, Language::English).await?;
		let mut meta = Map::new();

		meta.insert("source".to_string(), json!(metadata::SOURCE_OFFICIAL_DOCUMENT));
		meta.insert("file_name".to_string(), json!(parsed.file_name));
		meta.insert("file_type".to_string(), json!(parsed.file_type));
		meta.insert("original_language".to_string(), json!(original_language.name()));

		if let Some(sheets) = parsed.sheets {
			meta.insert("sheets".to_string(), json!(sheets));
		}

		Ok(KnowledgeItem { content: text, metadata: meta })
	}
}

fn thread_item(thread: &Thread) -> KnowledgeItem {
	let mut meta = Map::new();

	meta.insert("thread_ts".to_string(), json!(thread.metadata.thread_id));
	meta.insert("timestamp".to_string(), json!(thread.metadata.timestamp));
	meta.insert("participants".to_string(), json!(thread.metadata.participants));
	meta.insert("message_count".to_string(), json!(thread.metadata.message_count));

	if let Some(source) = &thread.metadata.source_channel {
		meta.insert("source".to_string(), Value::String(source.clone()));
	}

	KnowledgeItem { content: thread.content.clone(), metadata: meta }
}
