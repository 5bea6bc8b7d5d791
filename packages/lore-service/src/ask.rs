use std::path::Path;

use tracing::{debug, warn};

use lore_domain::{
	intent::{self, QueryIntent},
	language::{self, Language},
	rerank::{self, ContextEntry, SearchCandidate},
};
use lore_providers::prompts;
use lore_storage::state;

use crate::{Error, LoreService, Result};

/// A synthesized answer plus the evidence behind it.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AskResponse {
	/// Final answer, in the language the question arrived in.
	pub answer: String,
	/// Detected question language.
	pub language: String,
	pub intent: QueryIntent,
	/// Re-ranked passages the answer was synthesized from, best first.
	pub context: Vec<ContextEntry>,
}

impl LoreService {
	/// Answers one support question against the indexed knowledge.
	///
	/// The pipeline runs in English end to end: a non-English question is
	/// translated in, and the synthesized answer is translated back out.
	/// Intent analysis never fails the request; a malformed analyzer reply
	/// falls back to a literal interpretation of the question.
	pub async fn ask(&self, question: &str) -> Result<AskResponse> {
		let question = question.trim();

		if question.is_empty() {
			return Err(Error::InvalidRequest { message: "question must be non-empty".to_string() });
		}

		let reference = state::load_collection_ref(Path::new(&self.cfg.storage.collection_ref_file))?;

		if reference != self.cfg.storage.qdrant.collection {
			warn!(
				"Collection reference {reference:?} differs from configured collection {:?}.",
				self.cfg.storage.qdrant.collection
			);
		}

		let question_language = language::detect(question);
		let english_question = if question_language == Language::English {
			question.to_string()
		} else {
			self.translate(question, Language::English).await?
		};
		let intent = self.analyze_intent(&english_question).await;

		debug!(
			"Searching for {:?} (policy query: {}).",
			intent.search_query, intent.is_policy_query
		);

		let context = self.retrieve_context(&intent).await?;
		let english_answer = self.synthesize(&english_question, &intent, &context).await?;
		let answer = if question_language == Language::English {
			english_answer
		} else {
			self.translate(&english_answer, question_language).await?
		};

		Ok(AskResponse {
			answer,
			language: question_language.name().to_string(),
			intent,
			context,
		})
	}

	/// Asks the chat provider to decompose the question. Any failure, wire
	/// or parse, degrades to [`intent::fallback_intent`] rather than an
	/// error.
	async fn analyze_intent(&self, question: &str) -> QueryIntent {
		let system = prompts::intent_system_prompt();
		let user = prompts::intent_user_prompt(question);

		match self.providers.chat.complete(&self.cfg.providers.chat, &system, &user).await {
			Ok(raw) => intent::parse_intent(&raw).unwrap_or_else(|| {
				warn!("Intent analyzer returned malformed JSON; using the literal question.");

				intent::fallback_intent(question)
			}),
			Err(err) => {
				warn!("Intent analysis failed: {err}. Using the literal question.");

				intent::fallback_intent(question)
			},
		}
	}

	async fn retrieve_context(&self, intent: &QueryIntent) -> Result<Vec<ContextEntry>> {
		let vectors = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &[intent.search_query.clone()])
			.await?;
		let vector = vectors.into_iter().next().ok_or_else(|| Error::Provider {
			message: "Embedding response contained no vectors.".to_string(),
		})?;
		let hits = self.qdrant.query(vector, self.cfg.search.max_results).await?;
		let candidates = hits
			.into_iter()
			.map(|hit| SearchCandidate {
				raw_content: hit.content,
				base_score: hit.score,
				structured: hit.metadata,
			})
			.collect();

		Ok(rerank::rerank(candidates, intent))
	}

	async fn synthesize(
		&self,
		question: &str,
		intent: &QueryIntent,
		context: &[ContextEntry],
	) -> Result<String> {
		let system = prompts::answer_system_prompt(intent);
		let user = prompts::answer_user_prompt(question, context)?;
		let answer =
			self.providers.chat.complete(&self.cfg.providers.chat, &system, &user).await?;

		Ok(answer.trim().to_string())
	}
}
