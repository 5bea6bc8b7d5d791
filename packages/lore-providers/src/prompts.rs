//! Fixed instruction sets for the chat model. The wording here is part of
//! the external contract: intent analysis must yield a strict JSON object,
//! and answers must keep company-standard terminology verbatim.

use color_eyre::Result;
use serde_json::Value;

use lore_domain::{
	intent::{POLICY_TRIGGER_TERMS, QueryIntent},
	language::Language,
	rerank::ContextEntry,
};

/// Company-standard terms kept verbatim in every output language.
pub const UNTRANSLATABLE_TERMS: &[&str] = &["reclaim", "reclameren", "budget", "mediator", "DJ"];

/// The general rule cited when no specific exception matches.
pub const NO_EXCEPTION_FALLBACK: &str = "If you can't find the exception you are looking for - it's not an exception! And therefore needs to be denied";

pub fn intent_system_prompt() -> String {
	let triggers = POLICY_TRIGGER_TERMS.join(", ");

	format!(
		r#"You are a search query analyzer. Analyze the query and return ONLY a JSON object with exactly these fields:
{{
    "main_concept": "the primary concept being asked about",
    "search_query": "the enhanced search query to find relevant information",
    "exclude_terms": ["terms", "that", "should", "reduce", "relevance"],
    "is_policy_query": false
}}

Your task:
1. For policy queries (any question about {triggers} handling):
   - Set is_policy_query to true
   - Focus search_query on finding official guidelines and exceptions
   - Include terms like "guideline", "exception", "rule", "policy"
   - For profession/role-specific queries (e.g. DJs, vloerleggers, mediators):
     * Include both the profession name and "general exceptions"
     * Keep profession names in original language (don't translate)
2. For other queries:
   - Keep search focused on the specific topic
   - Include synonyms and related terms
3. Always identify terms that could lead to irrelevant results in exclude_terms

Example for policy query "what are exceptions for vloerleggers?":
{{
    "main_concept": "vloerleggers reclaim exceptions",
    "search_query": "vloerleggers general exceptions reclaim guideline materiaal gekocht",
    "exclude_terms": ["review", "profile"],
    "is_policy_query": true
}}

IMPORTANT: Return ONLY the JSON object, no other text."#
	)
}

pub fn intent_user_prompt(query: &str) -> String {
	format!("Analyze this query: {query}")
}

pub fn translation_system_prompt(target: Language) -> String {
	format!(
		"You are a translator. Translate the text to {}, maintaining the same meaning and intent. Only respond with the translation, nothing else.",
		target.name()
	)
}

pub fn answer_system_prompt(intent: &QueryIntent) -> String {
	let terms = UNTRANSLATABLE_TERMS.join(", ");

	format!(
		r#"You are a helpful customer success assistant. Answer questions accurately and professionally.

Topic: {}

Guidelines:
- Focus on information directly relevant to the question asked
- Keep different concepts separate and distinct
- If listing requirements or steps, use a clear numbered list
- Each item should be complete and on its own line
- Double-check that all numbered items are present and properly formatted
- For document sources, cite as [Document: filename]
- For chat messages, use [Source](link) format
- Always include the source of information
- Keep responses clear and concise

Language and Terminology Guidelines:
- ALWAYS keep these exact terms verbatim regardless of response language: {terms}
- Never translate them to local synonyms such as "herroeping" or "terugvordering"
- Keep document names and system terms in English
- This applies to ALL languages - these are company standard terms

When answering reclaim exception queries:
- ALWAYS start with the specific exception if found
- If a specific exception exists, quote it exactly as written
- If NO specific exception is found, cite the general rule:
  "{NO_EXCEPTION_FALLBACK}"
- Be explicit about whether exceptions are allowed or not
- Always cite the source document

Other guidelines:
- Stay focused on the specific concept being asked about
- Do not mix information about different features or concepts
- If answering whether something is allowed/valid, clearly state yes/no and explain why
- Prioritize explicit statements and lists from official documents"#,
		intent.main_concept
	)
}

pub fn answer_user_prompt(question: &str, context: &[ContextEntry]) -> Result<String> {
	let sources: Vec<Value> = context
		.iter()
		.map(|entry| {
			serde_json::json!({
				"content": entry.content,
				"source": entry
					.citation_link
					.as_deref()
					.or(entry.source.as_deref())
					.unwrap_or("unknown"),
				"document_name": entry.document_name.as_deref().unwrap_or("Unknown Document"),
			})
		})
		.collect();
	let rendered = serde_json::to_string_pretty(&sources)?;

	Ok(format!(
		"Question: {question}\n\nSources:\n{rendered}\n\nBased on these sources, please provide a clear and specific answer to the question. For document sources, cite them as [Document: filename]. IMPORTANT: Always use the term 'reclaim' or 'reclameren' regardless of the response language - these are company standard terms."
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use lore_domain::intent;

	#[test]
	fn intent_prompt_demands_strict_json_and_names_all_triggers() {
		let prompt = intent_system_prompt();

		assert!(prompt.contains("Return ONLY the JSON object"));
		assert!(prompt.contains("\"is_policy_query\""));
		for term in POLICY_TRIGGER_TERMS {
			assert!(prompt.contains(term), "Prompt must name trigger term {term:?}.");
		}
	}

	#[test]
	fn answer_prompt_carries_terminology_and_fallback_rule() {
		let prompt = answer_system_prompt(&intent::fallback_intent("reclaim exceptions for DJs"));

		assert!(prompt.contains(NO_EXCEPTION_FALLBACK));
		assert!(prompt.contains("reclaim, reclameren, budget, mediator, DJ"));
		assert!(prompt.contains("Topic: reclaim exceptions for DJs"));
	}

	#[test]
	fn answer_user_prompt_prefers_citation_links() {
		let entry = ContextEntry {
			content: "thread content".to_string(),
			adjusted_score: 1.0,
			source: Some("help".to_string()),
			citation_link: Some("https://example.com/p1".to_string()),
			document_name: None,
		};
		let rendered =
			answer_user_prompt("a question", &[entry]).expect("Failed to render prompt.");

		assert!(rendered.contains("https://example.com/p1"));
		assert!(rendered.contains("Unknown Document"));
	}

	#[test]
	fn translation_prompt_names_the_target_language() {
		let prompt = translation_system_prompt(Language::Dutch);

		assert!(prompt.contains("Translate the text to Dutch"));
	}
}
