use std::collections::HashMap;

/// One normalized chat message entering thread grouping. Text is expected to
/// be non-empty and already translated.
#[derive(Clone, Debug)]
pub struct ThreadMessage {
	pub user: String,
	pub text: String,
	pub ts: String,
	/// Reply-thread identifier; a message without one anchors its own thread.
	pub thread_ts: Option<String>,
	pub source: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThreadMetadata {
	pub thread_id: String,
	pub timestamp: String,
	/// Deduplicated, in first-seen order.
	pub participants: Vec<String>,
	pub message_count: usize,
	pub source_channel: Option<String>,
}

/// A finalized conversation thread, one retrievable unit.
#[derive(Clone, Debug)]
pub struct Thread {
	pub content: String,
	pub metadata: ThreadMetadata,
}

struct ThreadAccumulator {
	thread_id: String,
	timestamp: String,
	lines: Vec<String>,
	participants: Vec<String>,
	source_channel: Option<String>,
}
impl ThreadAccumulator {
	fn start(thread_id: String, message: &ThreadMessage) -> Self {
		Self {
			thread_id,
			timestamp: message.ts.clone(),
			lines: Vec::new(),
			participants: Vec::new(),
			// The thread's source inherits from its first processed message.
			source_channel: message.source.clone(),
		}
	}

	fn push(&mut self, message: ThreadMessage) {
		self.lines.push(format!("{}: {}", message.user, message.text));

		if !self.participants.contains(&message.user) {
			self.participants.push(message.user);
		}
	}

	fn finalize(self) -> Thread {
		Thread {
			content: self.lines.join("\n"),
			metadata: ThreadMetadata {
				thread_id: self.thread_id,
				timestamp: self.timestamp,
				participants: self.participants,
				message_count: self.lines.len(),
				source_channel: self.source_channel,
			},
		}
	}
}

/// Folds a message stream into finalized threads.
///
/// Messages sharing a thread identifier (defaulting to the message's own
/// timestamp) concatenate in arrival order as `"{user}: {text}"` lines.
/// Threads come out in order of first appearance.
pub fn group_into_threads(messages: impl IntoIterator<Item = ThreadMessage>) -> Vec<Thread> {
	let mut order: HashMap<String, usize> = HashMap::new();
	let mut accumulators: Vec<ThreadAccumulator> = Vec::new();

	for message in messages {
		let thread_id = message.thread_ts.clone().unwrap_or_else(|| message.ts.clone());
		let index = *order.entry(thread_id.clone()).or_insert_with(|| {
			accumulators.push(ThreadAccumulator::start(thread_id, &message));

			accumulators.len() - 1
		});

		accumulators[index].push(message);
	}

	accumulators.into_iter().map(ThreadAccumulator::finalize).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn message(user: &str, text: &str, ts: &str, thread_ts: Option<&str>) -> ThreadMessage {
		ThreadMessage {
			user: user.to_string(),
			text: text.to_string(),
			ts: ts.to_string(),
			thread_ts: thread_ts.map(str::to_string),
			source: Some("help".to_string()),
		}
	}

	#[test]
	fn groups_by_thread_in_arrival_order() {
		let threads = group_into_threads(vec![
			message("alice", "how do budgets work?", "1.0", Some("1.0")),
			message("bob", "see the manual", "2.0", Some("1.0")),
			message("carol", "unrelated note", "3.0", Some("3.0")),
		]);

		assert_eq!(threads.len(), 2);
		assert_eq!(threads[0].content, "alice: how do budgets work?\nbob: see the manual");
		assert_eq!(threads[0].metadata.message_count, 2);
		assert_eq!(threads[1].metadata.thread_id, "3.0");
	}

	#[test]
	fn message_timestamp_is_the_default_thread_id() {
		let threads = group_into_threads(vec![message("alice", "solo", "7.5", None)]);

		assert_eq!(threads[0].metadata.thread_id, "7.5");
		assert_eq!(threads[0].metadata.timestamp, "7.5");
	}

	#[test]
	fn participants_deduplicate_preserving_first_seen_order() {
		let threads = group_into_threads(vec![
			message("bob", "one", "1.0", Some("1.0")),
			message("alice", "two", "2.0", Some("1.0")),
			message("bob", "three", "3.0", Some("1.0")),
		]);

		assert_eq!(threads[0].metadata.participants, vec!["bob", "alice"]);
		assert_eq!(threads[0].metadata.message_count, 3);
	}

	#[test]
	fn source_inherits_from_first_message() {
		let mut first = message("alice", "one", "1.0", Some("1.0"));
		let mut second = message("bob", "two", "2.0", Some("1.0"));

		first.source = Some("product-changes".to_string());
		second.source = Some("help".to_string());

		let threads = group_into_threads(vec![first, second]);

		assert_eq!(threads[0].metadata.source_channel.as_deref(), Some("product-changes"));
	}
}
