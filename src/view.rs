//! What the canvas shows, kept apart from the signals that carry it so the
//! update rules can be checked without a browser.

use std::collections::HashSet;

use crate::components::force_graph::{GraphData, GraphNode, NodeKey};
use crate::graph::matching_nodes;

/// Numbers refreshes so only the latest one may replace the view.
#[derive(Clone, Debug, Default)]
pub struct RefreshTicket {
	latest: u64,
}

impl RefreshTicket {
	/// Start a refresh. Every earlier number stops being current.
	pub fn issue(&mut self) -> u64 {
		self.latest += 1;
		self.latest
	}

	pub fn is_current(&self, generation: u64) -> bool {
		generation == self.latest
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
	pub graph: GraphData,
	/// Search hits.
	pub highlighted: HashSet<NodeKey>,
	pub selected: Option<NodeKey>,
}

impl ViewState {
	/// Show a freshly loaded graph. Highlight and selection refer to the old
	/// one and are cleared.
	pub fn replace(&mut self, graph: GraphData) {
		self.graph = graph;
		self.highlighted.clear();
		self.selected = None;
	}

	/// Highlight nodes whose name matches `query`.
	pub fn highlight(&mut self, query: &str) -> usize {
		self.highlighted = matching_nodes(&self.graph, query);
		self.highlighted.len()
	}

	/// Select `key` if it is on screen.
	pub fn select(&mut self, key: &NodeKey) -> Option<GraphNode> {
		let node = self.graph.node(key).cloned()?;
		self.selected = Some(key.clone());
		Some(node)
	}

	/// Drop a deleted node, its edges and any highlight or selection on it.
	pub fn remove(&mut self, key: &NodeKey) {
		self.graph = self.graph.without_node(key);
		self.highlighted.remove(key);
		if self.selected.as_ref() == Some(key) {
			self.selected = None;
		}
	}
}
