use std::path::Path;

use tracing::info;

use lore_storage::state;

use crate::{Error, LoreService, Result};

/// Counts from one index build.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexReport {
	pub items: usize,
	pub batches: usize,
}

impl LoreService {
	/// Rebuilds the semantic index from the persisted ingestion output.
	///
	/// The collection is recreated from scratch, items are embedded in
	/// configured batch sizes, and the collection reference file is written
	/// last, so a failed build never leaves a reference to a half-filled
	/// collection.
	pub async fn build_index(&self) -> Result<IndexReport> {
		let mut items = state::read_items(Path::new(&self.cfg.ingest.processed_conversations))?;

		items.extend(state::read_items(Path::new(&self.cfg.ingest.processed_documents))?);

		if items.is_empty() {
			return Err(Error::NotFound {
				message: "No processed items to index; run the ingest step first.".to_string(),
			});
		}

		self.qdrant.recreate_collection().await?;

		let batch_size = self.cfg.search.embed_batch_size.max(1) as usize;
		let mut report = IndexReport { items: items.len(), batches: 0 };
		let mut id_offset = 0;

		for batch in items.chunks(batch_size) {
			let texts: Vec<String> = batch.iter().map(|item| item.content.clone()).collect();
			let vectors =
				self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

			if vectors.len() != batch.len() {
				return Err(Error::Provider {
					message: format!(
						"Embedding batch returned {} vectors for {} inputs.",
						vectors.len(),
						batch.len()
					),
				});
			}

			self.qdrant.upsert(batch, vectors, id_offset).await?;

			id_offset += batch.len() as u64;
			report.batches += 1;
		}

		state::save_collection_ref(
			Path::new(&self.cfg.storage.collection_ref_file),
			&self.cfg.storage.qdrant.collection,
		)?;
		info!(
			"Indexed {} items into {:?} in {} batches.",
			report.items, self.cfg.storage.qdrant.collection, report.batches
		);

		Ok(report)
	}
}
