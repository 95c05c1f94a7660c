//! Entity/relationship payloads and their projection into the graph view.

use std::collections::HashSet;
use std::fmt;

use crate::components::force_graph::{GraphData, NodeKey};

pub mod payload;
mod projection;

pub use payload::{EntityRecord, GraphPayload, RelationshipRecord};
pub use projection::{
	Endpoint, PLACEHOLDER_NAME, RejectReason, RejectedRelationship, Transformed, display_name,
	transform,
};

/// Entity categories the backend groups nodes under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
	Person,
	Organization,
	Object,
	Concept,
	Event,
	Action,
	Location,
	Time,
	Technology,
	Market,
	Product,
	/// Any tag outside the fixed set, kept verbatim.
	Other(String),
}

impl EntityKind {
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"Person" => Self::Person,
			"Organization" => Self::Organization,
			"Object" => Self::Object,
			"Concept" => Self::Concept,
			"Event" => Self::Event,
			"Action" => Self::Action,
			"Location" => Self::Location,
			"Time" => Self::Time,
			"Technology" => Self::Technology,
			"Market" => Self::Market,
			"Product" => Self::Product,
			other => Self::Other(other.to_string()),
		}
	}

	/// The group key this kind came from.
	pub fn tag(&self) -> &str {
		match self {
			Self::Person => "Person",
			Self::Organization => "Organization",
			Self::Object => "Object",
			Self::Concept => "Concept",
			Self::Event => "Event",
			Self::Action => "Action",
			Self::Location => "Location",
			Self::Time => "Time",
			Self::Technology => "Technology",
			Self::Market => "Market",
			Self::Product => "Product",
			Self::Other(tag) => tag.as_str(),
		}
	}
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}

/// Nodes whose name contains `query`, ignoring case. A blank query matches
/// nothing.
pub fn matching_nodes(data: &GraphData, query: &str) -> HashSet<NodeKey> {
	let needle = query.trim().to_lowercase();
	if needle.is_empty() {
		return HashSet::new();
	}
	data.nodes
		.iter()
		.filter(|node| node.name.to_lowercase().contains(&needle))
		.map(|node| node.key())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::GraphNode;

	fn node(id: &str, name: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: name.into(),
			kind: EntityKind::Concept,
		}
	}

	#[test]
	fn kind_tags_round_trip_through_known_and_unknown() {
		assert_eq!(EntityKind::from_tag("Market"), EntityKind::Market);
		assert_eq!(EntityKind::from_tag("Market").tag(), "Market");
		let custom = EntityKind::from_tag("Recipe");
		assert_eq!(custom, EntityKind::Other("Recipe".into()));
		assert_eq!(custom.to_string(), "Recipe");
	}

	#[test]
	fn matching_is_case_insensitive_substring() {
		let data = GraphData {
			nodes: vec![
				node("1", "Johnny Appleseed"),
				node("2", "apple pie"),
				node("3", "Orchard"),
			],
			links: vec![],
		};
		let hits = matching_nodes(&data, "APPLE");
		assert_eq!(
			hits,
			HashSet::from([
				NodeKey::new(EntityKind::Concept, "1"),
				NodeKey::new(EntityKind::Concept, "2"),
			])
		);
	}

	#[test]
	fn blank_query_matches_nothing() {
		let data = GraphData {
			nodes: vec![node("1", "anything")],
			links: vec![],
		};
		assert!(matching_nodes(&data, "").is_empty());
		assert!(matching_nodes(&data, "   ").is_empty());
	}
}
