use qdrant_client::{
	Payload,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, Query, QueryPointsBuilder,
		UpsertPointsBuilder, VectorParamsBuilder, value::Kind,
	},
};
use serde_json::Value;

use crate::Result;
use lore_domain::KnowledgeItem;

/// One hit returned by the semantic index: passage text, raw similarity
/// score, and the structured metadata payload when present.
#[derive(Clone, Debug)]
pub struct ScoredHit {
	pub content: String,
	pub score: f32,
	pub metadata: Option<Value>,
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &lore_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Drops and recreates the collection: index builds always start from a
	/// clean slate, mirroring a fresh external index per upload run.
	pub async fn recreate_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			self.client.delete_collection(&self.collection).await?;
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(&self.collection)
					.vectors_config(VectorParamsBuilder::new(
						u64::from(self.vector_dim),
						Distance::Cosine,
					)),
			)
			.await?;

		Ok(())
	}

	/// Uploads knowledge items with their embedding vectors. Point ids are
	/// positional within one rebuild.
	pub async fn upsert(
		&self,
		items: &[KnowledgeItem],
		vectors: Vec<Vec<f32>>,
		id_offset: u64,
	) -> Result<()> {
		let points: Vec<PointStruct> = items
			.iter()
			.zip(vectors)
			.enumerate()
			.map(|(index, (item, vector))| {
				let mut payload = Payload::new();

				payload.insert("content", item.content.clone());
				payload.insert(
					"metadata",
					serde_json::to_string(&item.metadata).unwrap_or_default(),
				);

				PointStruct::new(id_offset + index as u64, vector, payload)
			})
			.collect();

		self.client
			.upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
			.await?;

		Ok(())
	}

	/// Nearest-neighbor query returning payload-backed hits.
	pub async fn query(&self, vector: Vec<f32>, max_results: u32) -> Result<Vec<ScoredHit>> {
		let request = QueryPointsBuilder::new(&self.collection)
			.query(Query::new_nearest(vector))
			.with_payload(true)
			.limit(u64::from(max_results));
		let response = self.client.query(request).await?;

		Ok(response
			.result
			.into_iter()
			.map(|point| {
				let content = payload_str(&point.payload, "content").unwrap_or_default();
				let metadata = payload_str(&point.payload, "metadata")
					.and_then(|raw| serde_json::from_str(&raw).ok());

				ScoredHit { content, score: point.score, metadata }
			})
			.collect())
	}
}

fn payload_str(
	payload: &std::collections::HashMap<String, qdrant_client::qdrant::Value>,
	key: &str,
) -> Option<String> {
	match payload.get(key).and_then(|value| value.kind.as_ref()) {
		Some(Kind::StringValue(raw)) => Some(raw.clone()),
		_ => None,
	}
}
