//! Wire shape of `GET /get-graph-data`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Entities grouped by type tag, then keyed by entity id, plus the flat
/// relationship list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphPayload {
	#[serde(default)]
	pub entities: BTreeMap<String, BTreeMap<String, EntityRecord>>,
	#[serde(default)]
	pub relationships: Vec<RelationshipRecord>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EntityRecord {
	#[serde(default)]
	pub entity_type: Option<String>,
	/// Free-form property bag as stored by the backend.
	#[serde(default)]
	pub data: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RelationshipRecord {
	#[serde(default)]
	pub from_id: Option<Value>,
	#[serde(default)]
	pub to_id: Option<Value>,
	#[serde(default)]
	pub snippet: Option<Value>,
	#[serde(default)]
	pub relationship_type: Option<String>,
	#[serde(default)]
	pub relationship: Option<String>,
	#[serde(default)]
	pub from_type: Option<String>,
	#[serde(default)]
	pub to_type: Option<String>,
}

impl EntityRecord {
	/// Property lookup rendered as display text. Empty strings and nulls
	/// count as absent.
	pub fn property(&self, key: &str) -> Option<String> {
		self.data.get(key).and_then(scalar_text)
	}
}

/// Text form of a scalar JSON value, `None` for null, empty strings and
/// containers.
pub fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

/// Entity id referenced by a relationship endpoint: strings and numbers only.
/// Whole floats print without a fraction, so `1.0` names entity `"1"`.
pub fn endpoint_id(value: &Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) if n.is_f64() => n.as_f64().map(|f| {
			if f.fract() == 0.0 && f.abs() < MAX_EXACT_INT {
				format!("{}", f as i64)
			} else {
				n.to_string()
			}
		}),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Largest magnitude below which every whole `f64` is an exact integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;
