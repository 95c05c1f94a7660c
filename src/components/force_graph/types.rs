use std::fmt;

use crate::graph::EntityKind;

/// Identity of a node in the view. Entity ids are only unique within their
/// type group, so the group is part of the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
	pub kind: EntityKind,
	pub id: String,
}

impl NodeKey {
	pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
		Self {
			kind,
			id: id.into(),
		}
	}
}

impl fmt::Display for NodeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.kind, self.id)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	pub kind: EntityKind,
}

impl GraphNode {
	pub fn key(&self) -> NodeKey {
		NodeKey::new(self.kind.clone(), self.id.clone())
	}

	fn is(&self, key: &NodeKey) -> bool {
		self.id == key.id && self.kind == key.kind
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub id: String,
	pub source: NodeKey,
	pub target: NodeKey,
	/// Relationship type, drawn along the edge.
	pub label: Option<String>,
	pub snippet: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn node(&self, key: &NodeKey) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.is(key))
	}

	/// Copy of the view with `key` and every edge touching it removed.
	pub fn without_node(&self, key: &NodeKey) -> GraphData {
		GraphData {
			nodes: self.nodes.iter().filter(|n| !n.is(key)).cloned().collect(),
			links: self
				.links
				.iter()
				.filter(|l| &l.source != key && &l.target != key)
				.cloned()
				.collect(),
		}
	}
}
