use serde::{Deserialize, Serialize};

/// Canonical policy-query trigger vocabulary.
///
/// The same list drives both the model instruction and the local fallback
/// test, so the two paths cannot disagree on what counts as a policy query.
pub const POLICY_TRIGGER_TERMS: &[&str] =
	&["reclaim", "reclameren", "dispute", "chargeback", "exception"];

/// Structured intent derived once per incoming question.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryIntent {
	pub main_concept: String,
	pub search_query: String,
	pub exclude_terms: Vec<String>,
	pub is_policy_query: bool,
}

/// Parses the analyzer model's output into a [`QueryIntent`].
///
/// Accepts only a JSON object carrying exactly the four expected fields,
/// optionally wrapped in a Markdown code fence. Anything else yields `None`
/// and the caller degrades to [`fallback_intent`].
pub fn parse_intent(raw: &str) -> Option<QueryIntent> {
	let body = strip_code_fence(raw.trim());

	serde_json::from_str(body).ok()
}

/// Degraded intent used when the analyzer output is malformed.
pub fn fallback_intent(query: &str) -> QueryIntent {
	QueryIntent {
		main_concept: query.to_string(),
		search_query: query.to_string(),
		exclude_terms: Vec::new(),
		is_policy_query: is_policy_question(query),
	}
}

/// Local keyword test for dispute/refund/exception-style questions.
pub fn is_policy_question(query: &str) -> bool {
	let lower = query.to_lowercase();

	POLICY_TRIGGER_TERMS.iter().any(|term| lower.contains(term))
}

fn strip_code_fence(body: &str) -> &str {
	let Some(rest) = body.strip_prefix("```") else {
		return body;
	};
	let rest = rest.strip_prefix("json").unwrap_or(rest);
	let rest = rest.strip_suffix("```").unwrap_or(rest);

	rest.trim()
}
