use serde::Deserialize;
use serde_json::Value;

use crate::graph::payload::scalar_text;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SwitchResponse {
	#[serde(default)]
	pub message: Option<String>,
}

/// Reply of the `ai_search` integration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IntegrationSearchResponse {
	#[serde(default)]
	pub answer: String,
	/// Triplets as the backend stringifies them.
	#[serde(default)]
	pub triplets: Value,
	pub selected_db: String,
}

impl IntegrationSearchResponse {
	pub fn triplets_text(&self) -> String {
		match &self.triplets {
			Value::Array(items) => items
				.iter()
				.filter_map(scalar_text)
				.collect::<Vec<_>>()
				.join(", "),
			other => scalar_text(other).unwrap_or_default(),
		}
	}
}

/// Reply of `GET /ai-search`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AiSearchResponse {
	#[serde(default)]
	pub selected_db: Option<String>,
	#[serde(default)]
	pub search_quality_reflection: Option<String>,
	#[serde(default)]
	pub search_quality_score: Option<Value>,
	#[serde(default)]
	pub result: Option<String>,
}

impl AiSearchResponse {
	pub fn score_text(&self) -> String {
		self.search_quality_score
			.as_ref()
			.and_then(scalar_text)
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn search_reply_accepts_stringified_triplets() {
		let reply: IntegrationSearchResponse = serde_json::from_value(json!({
			"answer": "Johnny planted apples.",
			"triplets": "['Johnny PLANTED Apple']",
			"selected_db": "orchards"
		}))
		.unwrap();
		assert_eq!(reply.triplets_text(), "['Johnny PLANTED Apple']");
		assert_eq!(reply.selected_db, "orchards");
	}

	#[test]
	fn search_reply_joins_triplet_lists() {
		let reply: IntegrationSearchResponse = serde_json::from_value(json!({
			"answer": "",
			"triplets": ["A KNOWS B", "B LIKES C"],
			"selected_db": "people"
		}))
		.unwrap();
		assert_eq!(reply.triplets_text(), "A KNOWS B, B LIKES C");
	}

	#[test]
	fn search_reply_without_database_is_rejected() {
		let reply = serde_json::from_value::<IntegrationSearchResponse>(json!({ "answer": "x" }));
		assert!(reply.is_err());
	}

	#[test]
	fn ai_search_fields_are_optional() {
		let reply: AiSearchResponse = serde_json::from_value(json!({
			"selected_db": "people",
			"search_quality_score": 4
		}))
		.unwrap();
		assert_eq!(reply.score_text(), "4");
		assert!(reply.result.is_none());
		assert_eq!(AiSearchResponse::default().score_text(), "");
	}
}
