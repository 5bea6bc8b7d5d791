use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Embeds `texts` through an OpenAI-style embeddings endpoint, returning one
/// vector per input in input order.
pub async fn embed(
	cfg: &lore_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(Value::as_array)
		.ok_or_else(|| eyre::eyre!("Embedding response is missing data array."))?;
	let mut vectors: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (position, item) in data.iter().enumerate() {
		let index =
			item.get("index").and_then(Value::as_u64).map(|i| i as usize).unwrap_or(position);
		let raw = item
			.get("embedding")
			.and_then(Value::as_array)
			.ok_or_else(|| eyre::eyre!("Embedding item is missing its embedding array."))?;
		let vector = raw
			.iter()
			.map(|component| {
				component
					.as_f64()
					.map(|value| value as f32)
					.ok_or_else(|| eyre::eyre!("Embedding components must be numeric."))
			})
			.collect::<Result<Vec<f32>>>()?;

		vectors.push((index, vector));
	}

	vectors.sort_by_key(|(index, _)| *index);

	Ok(vectors.into_iter().map(|(_, vector)| vector).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reorders_embeddings_by_reported_index() {
		let json = serde_json::json!({
			"data": [
				{ "index": 1, "embedding": [2.0, 3.0] },
				{ "index": 0, "embedding": [0.5, 1.5] }
			]
		});
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![vec![0.5, 1.5], vec![2.0, 3.0]]);
	}

	#[test]
	fn non_numeric_components_are_an_error() {
		let json = serde_json::json!({
			"data": [ { "index": 0, "embedding": ["oops"] } ]
		});

		assert!(parse_embedding_response(json).is_err());
	}
}
