use regex::Regex;
use serde_json::Value;

pub const SOURCE_OFFICIAL_DOCUMENT: &str = "official_document";

/// Channel keywords checked in order; the first substring match wins.
pub const SOURCE_CHANNELS: &[&str] = &["product-changes", "help", "customer-success"];

const SLACK_WORKSPACE_URL: &str = "https://trustooworkspace.slack.com/archives";

/// Document titles recognizable from passage text alone, for hits whose
/// structured metadata was lost in serialization.
const KNOWN_DOCUMENTS: &[(&str, &str)] = &[
	("Reclaim Guideline", "Reclaim Guideline 2025.xlsx"),
	("Customer Success Manual", "Customer Success Manual.docx"),
];

/// Provenance recovered for one search hit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedMetadata {
	pub source: Option<String>,
	pub document_name: Option<String>,
	pub thread_ref: Option<String>,
}
impl ExtractedMetadata {
	/// True when the hit originates from a chat thread rather than a document.
	pub fn is_chat_sourced(&self) -> bool {
		self.thread_ref.is_some()
	}
}

/// Two-tier metadata recovery.
///
/// Tier 1 reads structured metadata: the index payload when the provider
/// returns one, else a `"metadata": {...}` fragment embedded in the raw
/// content. Tier 2 falls back to text-pattern heuristics against known
/// document titles and channel keywords. Tier 1 wins field by field.
pub fn extract(structured: Option<&Value>, raw: &str) -> ExtractedMetadata {
	let mut meta = structured.map(from_structured).unwrap_or_default();

	merge_missing(&mut meta, from_embedded_fragment(raw));

	if meta.thread_ref.is_none() {
		meta.thread_ref = thread_ref_from_raw(raw);
	}

	merge_missing(&mut meta, from_heuristics(raw));

	meta
}

/// Tier 1: structured metadata object, as stored at ingestion time.
pub fn from_structured(value: &Value) -> ExtractedMetadata {
	let source = string_field(value, "source");
	let document_name = string_field(value, "file_name").or_else(|| {
		string_field(value, "file_path")
			.and_then(|path| path.rsplit('/').next().map(str::to_string))
	});
	let thread_ref = string_field(value, "thread_ts");

	ExtractedMetadata { source, document_name, thread_ref }
}

/// Tier 1 fallback: a metadata object serialized into the content itself.
pub fn from_embedded_fragment(raw: &str) -> ExtractedMetadata {
	let fragment = Regex::new(r#""metadata":\s*(\{[^{}]*\})"#)
		.ok()
		.and_then(|re| re.captures(raw).map(|caps| caps[1].to_string()));

	let Some(fragment) = fragment else {
		return ExtractedMetadata::default();
	};

	serde_json::from_str::<Value>(&fragment).map(|value| from_structured(&value)).unwrap_or_default()
}

/// Tier 2: text-pattern heuristics for hits with no recoverable metadata.
pub fn from_heuristics(raw: &str) -> ExtractedMetadata {
	for (title, file_name) in KNOWN_DOCUMENTS {
		if raw.contains(title) {
			return ExtractedMetadata {
				source: Some(SOURCE_OFFICIAL_DOCUMENT.to_string()),
				document_name: Some((*file_name).to_string()),
				thread_ref: None,
			};
		}
	}

	ExtractedMetadata {
		source: channel_source_tag(raw).map(str::to_string),
		document_name: None,
		thread_ref: None,
	}
}

/// Derives a source tag from a channel name (or any text mentioning one).
/// First keyword match wins; no match leaves the source unset.
pub fn channel_source_tag(channel: &str) -> Option<&'static str> {
	SOURCE_CHANNELS.iter().find(|keyword| channel.contains(*keyword)).copied()
}

/// Archive link for a chat thread. Only produced when the source maps to a
/// known channel; document hits carry no link.
pub fn citation_link(thread_ref: &str, source: &str) -> Option<String> {
	let channel = SOURCE_CHANNELS.iter().find(|channel| **channel == source)?;

	if thread_ref.is_empty() {
		return None;
	}

	Some(format!("{SLACK_WORKSPACE_URL}/{channel}/p{}", thread_ref.replace('.', "")))
}

fn thread_ref_from_raw(raw: &str) -> Option<String> {
	Regex::new(r#""thread_ts":\s*"([^"]+)""#)
		.ok()
		.and_then(|re| re.captures(raw).map(|caps| caps[1].to_string()))
}

fn string_field(value: &Value, key: &str) -> Option<String> {
	value
		.get(key)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|field| !field.is_empty())
		.map(str::to_string)
}

fn merge_missing(into: &mut ExtractedMetadata, from: ExtractedMetadata) {
	if into.source.is_none() {
		into.source = from.source;
	}
	if into.document_name.is_none() {
		into.document_name = from.document_name;
	}
	if into.thread_ref.is_none() {
		into.thread_ref = from.thread_ref;
	}
}
