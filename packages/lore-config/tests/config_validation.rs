use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use lore_config::Config;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("lore_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_is_valid() {
	let cfg = base_config();

	assert!(lore_config::validate(&cfg).is_ok());
}

#[test]
fn vector_dim_must_match_embedding_dimensions() {
	let payload = SAMPLE_CONFIG_TEMPLATE_TOML.replace("vector_dim = 1536", "vector_dim = 1024");
	let path = write_temp_config(payload);
	let result = lore_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected dimension mismatch validation error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn max_results_must_be_positive() {
	let mut cfg = base_config();

	cfg.search.max_results = 0;

	let err = lore_config::validate(&cfg).expect_err("Expected max_results validation error.");

	assert!(
		err.to_string().contains("search.max_results must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn unresolved_api_key_is_fatal() {
	let mut cfg = base_config();

	cfg.providers.chat.api_key = "   ".to_string();

	let err = lore_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider chat api_key could not be resolved."),
		"Unexpected error: {err}"
	);
}

#[test]
fn api_key_resolves_from_environment() {
	let payload = SAMPLE_CONFIG_TEMPLATE_TOML
		.replace("api_key     = \"REPLACE_ME\"", "api_key     = \"\"")
		.replace("LORE_OPENAI_API_KEY", "LORE_CONFIG_TEST_KEY");

	// SAFETY: test-local variable, no concurrent reader depends on it.
	unsafe {
		env::set_var("LORE_CONFIG_TEST_KEY", "from-env");
	}

	let path = write_temp_config(payload);
	let result = lore_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected env-resolved config to load.");

	assert_eq!(cfg.providers.chat.api_key, "from-env");
	assert_eq!(cfg.providers.embedding.api_key, "from-env");
}

#[test]
fn search_defaults_apply_when_section_is_absent() {
	let payload = SAMPLE_CONFIG_TEMPLATE_TOML
		.replace("[search]\nembed_batch_size = 64\nmax_results      = 30\n", "");
	let cfg: Config = toml::from_str(&payload).expect("Failed to parse test config.");

	assert_eq!(cfg.search.max_results, 30);
	assert_eq!(cfg.search.embed_batch_size, 64);
}

#[test]
fn lore_example_toml_parses_and_validates() {
	let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

	path.push("../../lore.example.toml");

	let raw = fs::read_to_string(&path).expect("Expected lore.example.toml to exist.");
	let cfg: Config = toml::from_str(&raw).expect("Expected lore.example.toml to parse.");

	assert!(lore_config::validate(&cfg).is_ok());
}
