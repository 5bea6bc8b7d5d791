use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::{
	intent::QueryIntent,
	metadata::{self, ExtractedMetadata},
};

/// Upper bound on the context handed to answer synthesis.
pub const MAX_CONTEXT_ENTRIES: usize = 8;

pub const REQUIREMENT_BOOST: f32 = 1.5;
pub const LIST_SHAPE_BOOST: f32 = 1.5;
pub const EXCLUSION_PENALTY: f32 = 0.3;
/// Flat boost for document sources under a policy query.
pub const POLICY_DOCUMENT_BOOST: f32 = 2.0;

/// Phrases marking passages that state rules or acceptance criteria.
const REQUIREMENT_INDICATORS: &[&str] =
	&["need", "require", "must have", "rules", "criteria", "only if", "mandatory"];

/// Markers of enumerated or checklist-shaped content.
const LIST_MARKERS: &[&str] = &["1:", "2:", "3:", "4:", ":heavy_check_mark:", "\u{2713}", "\u{2022}"];

/// One raw hit from the semantic index; lives only within a single query.
#[derive(Clone, Debug)]
pub struct SearchCandidate {
	pub raw_content: String,
	pub base_score: f32,
	/// Structured metadata payload, when the index returns one.
	pub structured: Option<Value>,
}

/// One re-ranked, citation-annotated passage.
#[derive(Clone, Debug, Serialize)]
pub struct ContextEntry {
	pub content: String,
	pub adjusted_score: f32,
	pub source: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub citation_link: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub document_name: Option<String>,
}

/// Re-ranks index hits with domain heuristics and truncates to the context
/// bound.
///
/// Adjustments compose multiplicatively on each candidate's similarity
/// score, in a fixed order: requirement-language boost, list-shape boost,
/// exclusion penalty (applied at most once), then the source-trust step.
/// Zero-scored entries are dropped; the rest sort descending with stable
/// ties and truncate to [`MAX_CONTEXT_ENTRIES`].
pub fn rerank(candidates: Vec<SearchCandidate>, intent: &QueryIntent) -> Vec<ContextEntry> {
	let mut entries: Vec<ContextEntry> = candidates
		.into_iter()
		.map(|candidate| score_candidate(candidate, intent))
		.filter(|entry| entry.adjusted_score > 0.0)
		.collect();

	entries.sort_by(|a, b| {
		b.adjusted_score.partial_cmp(&a.adjusted_score).unwrap_or(Ordering::Equal)
	});
	entries.truncate(MAX_CONTEXT_ENTRIES);

	entries
}

/// Trust weight for non-policy queries: official documents above curated
/// channels above informal chat.
pub fn source_multiplier(source: Option<&str>) -> f32 {
	match source {
		Some(metadata::SOURCE_OFFICIAL_DOCUMENT) => 2.0,
		Some("product-changes") => 1.75,
		Some("help") => 1.25,
		_ => 1.0,
	}
}

pub fn contains_requirement_language(content: &str) -> bool {
	let lower = content.to_lowercase();

	REQUIREMENT_INDICATORS.iter().any(|term| lower.contains(term))
}

pub fn looks_like_list(content: &str) -> bool {
	if LIST_MARKERS.iter().any(|marker| content.contains(marker)) {
		return true;
	}

	// Hyphen bullets count only at the start of a line, else any hyphenated
	// word would trigger the boost.
	content.lines().any(|line| line.trim_start().starts_with("- "))
}

fn score_candidate(candidate: SearchCandidate, intent: &QueryIntent) -> ContextEntry {
	let raw = candidate.raw_content;
	let mut score = candidate.base_score;

	if contains_requirement_language(&raw) {
		score *= REQUIREMENT_BOOST;
	}
	if looks_like_list(&raw) {
		score *= LIST_SHAPE_BOOST;
	}
	if matches_exclude_terms(&raw, &intent.exclude_terms) {
		score *= EXCLUSION_PENALTY;
	}

	let meta = metadata::extract(candidate.structured.as_ref(), &raw);

	score = if intent.is_policy_query {
		// Policy answers must source exclusively from official documents;
		// chat threads are hard-excluded no matter how similar they are.
		if meta.is_chat_sourced() { 0.0 } else { score * POLICY_DOCUMENT_BOOST }
	} else {
		score * source_multiplier(meta.source.as_deref())
	};

	build_entry(raw, score, meta)
}

fn matches_exclude_terms(content: &str, exclude_terms: &[String]) -> bool {
	if exclude_terms.is_empty() {
		return false;
	}

	let lower = content.to_lowercase();

	exclude_terms.iter().any(|term| lower.contains(&term.to_lowercase()))
}

fn build_entry(content: String, adjusted_score: f32, meta: ExtractedMetadata) -> ContextEntry {
	let citation_link = match (meta.thread_ref.as_deref(), meta.source.as_deref()) {
		(Some(thread_ref), Some(source)) => metadata::citation_link(thread_ref, source),
		_ => None,
	};

	ContextEntry {
		content,
		adjusted_score,
		source: meta.source,
		citation_link,
		document_name: meta.document_name,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::intent;

	fn plain_intent() -> QueryIntent {
		QueryIntent {
			main_concept: "budget".to_string(),
			search_query: "budget".to_string(),
			exclude_terms: Vec::new(),
			is_policy_query: false,
		}
	}

	fn candidate(content: &str, score: f32) -> SearchCandidate {
		SearchCandidate { raw_content: content.to_string(), base_score: score, structured: None }
	}

	#[test]
	fn requirement_language_is_detected_case_insensitively() {
		assert!(contains_requirement_language("Partners MUST HAVE a verified profile."));
		assert!(!contains_requirement_language("General chatter about the weather."));
	}

	#[test]
	fn hyphen_bullets_only_count_at_line_starts() {
		assert!(looks_like_list("Steps:\n- open the portal\n- submit the form"));
		assert!(!looks_like_list("A well-known edge case."));
	}

	#[test]
	fn exclusion_penalty_applies_once() {
		let mut intent = plain_intent();

		intent.exclude_terms = vec!["review".to_string(), "profile".to_string()];

		// Both exclude terms appear, penalty still applies exactly once.
		let entries =
			rerank(vec![candidate("a review of the partner profile", 1.0)], &intent);

		assert_eq!(entries.len(), 1);
		assert!((entries[0].adjusted_score - 0.3).abs() < 1e-6);
	}

	#[test]
	fn sort_is_descending_and_truncated() {
		let candidates =
			(0..12).map(|i| candidate(&format!("passage {i}"), 0.1 * i as f32)).collect();
		let entries = rerank(candidates, &plain_intent());

		assert_eq!(entries.len(), MAX_CONTEXT_ENTRIES);
		assert!(
			entries.windows(2).all(|pair| pair[0].adjusted_score >= pair[1].adjusted_score),
			"Entries must be sorted by descending adjusted score."
		);
	}

	#[test]
	fn ties_preserve_candidate_order() {
		let candidates = vec![candidate("first", 0.5), candidate("second", 0.5)];
		let entries = rerank(candidates, &plain_intent());

		assert_eq!(entries[0].content, "first");
		assert_eq!(entries[1].content, "second");
	}

	#[test]
	fn short_result_lists_pass_through() {
		let entries = rerank(vec![candidate("only one", 0.4)], &plain_intent());

		assert_eq!(entries.len(), 1);
	}

	#[test]
	fn policy_query_zeroes_chat_candidates() {
		let intent = intent::fallback_intent("what are the reclaim exceptions?");
		let chat = SearchCandidate {
			raw_content: r#"{"metadata": {"source": "help", "thread_ts": "1700.42"}} how to reclaim"#
				.to_string(),
			base_score: 9.0,
			structured: None,
		};
		let document = candidate("Reclaim Guideline row: only if the order was late", 0.2);
		let entries = rerank(vec![chat, document], &intent);

		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].document_name.as_deref(), Some("Reclaim Guideline 2025.xlsx"));
	}

	#[test]
	fn citation_link_attaches_to_chat_entries() {
		let chat = SearchCandidate {
			raw_content: "ordinary chatter".to_string(),
			base_score: 1.0,
			structured: Some(serde_json::json!({
				"source": "help",
				"thread_ts": "1712345678.000100",
			})),
		};
		let entries = rerank(vec![chat], &plain_intent());

		assert_eq!(
			entries[0].citation_link.as_deref(),
			Some("https://trustooworkspace.slack.com/archives/help/p1712345678000100")
		);
	}
}
