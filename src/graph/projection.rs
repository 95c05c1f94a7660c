use std::collections::HashMap;
use std::fmt;

use super::EntityKind;
use super::payload::{EntityRecord, GraphPayload, RelationshipRecord, endpoint_id, scalar_text};
use crate::components::force_graph::{GraphData, GraphLink, GraphNode, NodeKey};

pub const PLACEHOLDER_NAME: &str = "Unnamed";

/// Which end of a relationship a rejection refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	From,
	To,
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::From => "from_id",
			Self::To => "to_id",
		})
	}
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
	#[error("{0} is missing or not a string/number")]
	MissingEndpoint(Endpoint),
	#[error("{end} {id:?} does not name an entity in the payload")]
	DanglingEndpoint { end: Endpoint, id: String },
	#[error("{end} {id:?} exists in several type groups and the relationship names none")]
	AmbiguousEndpoint { end: Endpoint, id: String },
}

/// A relationship left out of the view, by its index in the payload list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRelationship {
	pub index: usize,
	pub reason: RejectReason,
}

#[derive(Clone, Debug, Default)]
pub struct Transformed {
	pub data: GraphData,
	pub rejected: Vec<RejectedRelationship>,
}

/// `name`, then `term`, then the placeholder.
pub fn display_name(entity: &EntityRecord) -> String {
	entity
		.property("name")
		.or_else(|| entity.property("term"))
		.unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
}

/// Entity ids present in the payload, each with the type groups that hold it.
type Index<'a> = HashMap<&'a str, Vec<&'a str>>;

/// Project a payload into nodes and edges. Relationships with a missing,
/// unknown or ambiguous endpoint are reported in `rejected` instead of
/// becoming edges.
pub fn transform(payload: &GraphPayload) -> Transformed {
	let mut nodes = Vec::new();
	let mut known: Index<'_> = HashMap::new();

	for (tag, group) in &payload.entities {
		let kind = EntityKind::from_tag(tag);
		for (id, entity) in group {
			known.entry(id.as_str()).or_default().push(tag.as_str());
			nodes.push(GraphNode {
				id: id.clone(),
				name: display_name(entity),
				kind: kind.clone(),
			});
		}
	}

	let mut links = Vec::with_capacity(payload.relationships.len());
	let mut rejected = Vec::new();
	for (index, rel) in payload.relationships.iter().enumerate() {
		match edge(rel, &known) {
			Ok(link) => links.push(link),
			Err(reason) => rejected.push(RejectedRelationship { index, reason }),
		}
	}

	Transformed {
		data: GraphData { nodes, links },
		rejected,
	}
}

fn edge(rel: &RelationshipRecord, known: &Index<'_>) -> Result<GraphLink, RejectReason> {
	let source = endpoint(rel.from_id.as_ref(), rel.from_type.as_deref(), Endpoint::From, known)?;
	let target = endpoint(rel.to_id.as_ref(), rel.to_type.as_deref(), Endpoint::To, known)?;
	Ok(GraphLink {
		id: format!("rel-{}-{}", source.id, target.id),
		source,
		target,
		snippet: rel.snippet.as_ref().and_then(scalar_text),
		label: rel
			.relationship_type
			.clone()
			.or_else(|| rel.relationship.clone()),
	})
}

/// Resolve one end to a node key. A type given with the relationship must
/// hold the id; without one the id has to be unique across groups.
fn endpoint(
	value: Option<&serde_json::Value>,
	tag: Option<&str>,
	end: Endpoint,
	known: &Index<'_>,
) -> Result<NodeKey, RejectReason> {
	let id = value
		.and_then(endpoint_id)
		.ok_or(RejectReason::MissingEndpoint(end))?;
	let groups = known.get(id.as_str()).map(Vec::as_slice).unwrap_or_default();

	let group = match tag.filter(|t| !t.is_empty()) {
		Some(tag) => groups.iter().find(|g| **g == tag),
		None if groups.len() > 1 => return Err(RejectReason::AmbiguousEndpoint { end, id }),
		None => groups.first(),
	};
	match group {
		Some(group) => Ok(NodeKey::new(EntityKind::from_tag(group), id)),
		None => Err(RejectReason::DanglingEndpoint { end, id }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn payload(value: serde_json::Value) -> GraphPayload {
		serde_json::from_value(value).unwrap()
	}

	fn entity(data: serde_json::Value) -> EntityRecord {
		EntityRecord {
			entity_type: None,
			data,
		}
	}

	#[test]
	fn name_wins_over_term() {
		assert_eq!(display_name(&entity(json!({ "name": "Ada", "term": "x" }))), "Ada");
	}

	#[test]
	fn term_is_used_without_name() {
		assert_eq!(display_name(&entity(json!({ "term": "entropy" }))), "entropy");
	}

	#[test]
	fn empty_name_falls_through_to_term() {
		assert_eq!(display_name(&entity(json!({ "name": "", "term": "flux" }))), "flux");
	}

	#[test]
	fn placeholder_without_name_or_term() {
		assert_eq!(display_name(&entity(json!({ "age": 3 }))), PLACEHOLDER_NAME);
		assert_eq!(display_name(&entity(serde_json::Value::Null)), "Unnamed");
	}

	#[test]
	fn one_node_per_entity_tagged_with_its_group() {
		let out = transform(&payload(json!({
			"entities": {
				"Person": {
					"p1": { "data": { "name": "Ada" } },
					"p2": { "data": { "name": "Charles" } }
				},
				"Concept": {
					"c1": { "data": { "term": "Engine" } }
				},
				"Gadget": {
					"g1": { "data": {} }
				}
			},
			"relationships": []
		})));

		assert_eq!(out.data.nodes.len(), 4);
		for node in &out.data.nodes {
			let expected = match node.id.as_str() {
				"p1" | "p2" => "Person",
				"c1" => "Concept",
				_ => "Gadget",
			};
			assert_eq!(node.kind.tag(), expected);
		}
		let g1 = out.data.nodes.iter().find(|n| n.id == "g1").unwrap();
		assert_eq!(g1.name, "Unnamed");
		assert_eq!(g1.kind, EntityKind::Other("Gadget".into()));
	}

	#[test]
	fn each_relationship_becomes_one_edge() {
		let out = transform(&payload(json!({
			"entities": {
				"Person": { "1": { "data": { "name": "A" } }, "2": { "data": { "name": "B" } } },
				"Event": { "e": { "data": { "name": "Launch" } } }
			},
			"relationships": [
				{ "from_id": 1, "to_id": 2, "snippet": "A met B", "relationship_type": "MET" },
				{ "from_id": "2", "to_id": "e", "snippet": "B went", "relationship_type": "ATTENDED" },
				{ "from_id": 2.0, "to_id": 1, "relationship_type": "MET" }
			]
		})));

		assert!(out.rejected.is_empty());
		assert_eq!(out.data.links.len(), 3);

		let first = &out.data.links[0];
		assert_eq!(first.id, "rel-1-2");
		assert_eq!(first.source, NodeKey::new(EntityKind::Person, "1"));
		assert_eq!(first.target.id, "2");
		assert_eq!(first.snippet.as_deref(), Some("A met B"));
		assert_eq!(first.label.as_deref(), Some("MET"));

		assert_eq!(out.data.links[1].id, "rel-2-e");
		assert_eq!(out.data.links[2].id, "rel-2-1");
	}

	#[test]
	fn label_falls_back_to_relationship_name() {
		let out = transform(&payload(json!({
			"entities": { "Person": { "a": { "data": {} } } },
			"relationships": [{ "from_id": "a", "to_id": "a", "relationship": "SELF" }]
		})));
		assert_eq!(out.data.links[0].label.as_deref(), Some("SELF"));
		assert_eq!(out.data.links[0].snippet, None);
	}

	#[test]
	fn missing_endpoints_are_rejected() {
		let out = transform(&payload(json!({
			"entities": { "Person": { "a": { "data": {} } } },
			"relationships": [
				{ "to_id": "a", "relationship_type": "X" },
				{ "from_id": "a", "to_id": null },
				{ "from_id": "a", "to_id": ["a"] }
			]
		})));

		assert!(out.data.links.is_empty());
		assert_eq!(
			out.rejected,
			vec![
				RejectedRelationship {
					index: 0,
					reason: RejectReason::MissingEndpoint(Endpoint::From),
				},
				RejectedRelationship {
					index: 1,
					reason: RejectReason::MissingEndpoint(Endpoint::To),
				},
				RejectedRelationship {
					index: 2,
					reason: RejectReason::MissingEndpoint(Endpoint::To),
				},
			]
		);
	}

	#[test]
	fn dangling_endpoints_are_rejected() {
		let out = transform(&payload(json!({
			"entities": { "Person": { "a": { "data": {} } } },
			"relationships": [
				{ "from_id": "a", "to_id": "ghost" },
				{ "from_id": "a", "to_id": "a" }
			]
		})));

		assert_eq!(out.data.links.len(), 1);
		assert_eq!(out.data.links[0].id, "rel-a-a");
		assert_eq!(
			out.rejected[0].reason,
			RejectReason::DanglingEndpoint {
				end: Endpoint::To,
				id: "ghost".into(),
			}
		);
		assert_eq!(
			out.rejected[0].reason.to_string(),
			"to_id \"ghost\" does not name an entity in the payload"
		);
	}

	#[test]
	fn shared_ids_resolve_through_relationship_types() {
		let out = transform(&payload(json!({
			"entities": {
				"Person": { "7": { "data": { "name": "Mercury (god)" } } },
				"Concept": { "7": { "data": { "name": "Mercury (element)" } } },
				"Location": { "rome": { "data": { "name": "Rome" } } }
			},
			"relationships": [
				{ "from_id": "7", "from_type": "Person", "to_id": "rome", "relationship_type": "WORSHIPPED_IN" },
				{ "from_id": "7", "from_type": "Concept", "to_id": "7", "to_type": "Person", "relationship_type": "NAMED_AFTER" }
			]
		})));

		assert!(out.rejected.is_empty());
		assert_eq!(out.data.nodes.len(), 3);
		let links = &out.data.links;
		assert_eq!(links[0].source, NodeKey::new(EntityKind::Person, "7"));
		assert_eq!(links[0].target, NodeKey::new(EntityKind::Location, "rome"));
		assert_eq!(links[1].source, NodeKey::new(EntityKind::Concept, "7"));
		assert_eq!(links[1].target, NodeKey::new(EntityKind::Person, "7"));
		assert_eq!(links[1].id, "rel-7-7");
	}

	#[test]
	fn untyped_shared_ids_are_rejected_as_ambiguous() {
		let out = transform(&payload(json!({
			"entities": {
				"Person": { "7": { "data": {} } },
				"Concept": { "7": { "data": {} }, "c": { "data": {} } }
			},
			"relationships": [
				{ "from_id": "c", "to_id": "7" },
				{ "from_id": "c", "to_id": "7", "to_type": "Event" }
			]
		})));

		assert!(out.data.links.is_empty());
		assert_eq!(
			out.rejected[0].reason,
			RejectReason::AmbiguousEndpoint {
				end: Endpoint::To,
				id: "7".into(),
			}
		);
		assert_eq!(
			out.rejected[1].reason,
			RejectReason::DanglingEndpoint {
				end: Endpoint::To,
				id: "7".into(),
			}
		);
	}

	#[test]
	fn empty_payload_yields_empty_view() {
		let out = transform(&GraphPayload::default());
		assert!(out.data.nodes.is_empty());
		assert!(out.data.links.is_empty());
		assert!(out.rejected.is_empty());
	}
}
