mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ChatProviderConfig, Config, EmbeddingProviderConfig, Ingest, Providers, Qdrant, Search,
	Service, Storage,
};

use std::{env, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.collection_ref_file.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.collection_ref_file must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if !cfg.providers.chat.temperature.is_finite() || cfg.providers.chat.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.chat.temperature must be zero or greater.".to_string(),
		});
	}
	if cfg.search.max_results == 0 {
		return Err(Error::Validation {
			message: "search.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.search.embed_batch_size == 0 {
		return Err(Error::Validation {
			message: "search.embed_batch_size must be greater than zero.".to_string(),
		});
	}
	if cfg.ingest.processed_conversations.trim().is_empty() {
		return Err(Error::Validation {
			message: "ingest.processed_conversations must be non-empty.".to_string(),
		});
	}
	if cfg.ingest.processed_documents.trim().is_empty() {
		return Err(Error::Validation {
			message: "ingest.processed_documents must be non-empty.".to_string(),
		});
	}

	// The pipeline cannot reach any provider without credentials, so an
	// unresolved key is fatal here rather than at first use.
	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("chat", &cfg.providers.chat.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key could not be resolved."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	resolve_api_key(&mut cfg.providers.embedding.api_key, cfg.providers.embedding.api_key_env.as_deref());
	resolve_api_key(&mut cfg.providers.chat.api_key, cfg.providers.chat.api_key_env.as_deref());
}

fn resolve_api_key(api_key: &mut String, api_key_env: Option<&str>) {
	if !api_key.trim().is_empty() {
		return;
	}

	if let Some(var) = api_key_env
		&& let Ok(value) = env::var(var)
	{
		*api_key = value.trim().to_string();
	}
}
