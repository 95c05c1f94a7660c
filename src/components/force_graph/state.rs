use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, NodeKey};
use crate::graph::EntityKind;

pub const NODE_RADIUS: f64 = 7.0;
pub const HIT_RADIUS: f64 = 12.0;
pub const HIGHLIGHT_COLOR: &str = "#61bffc";
/// Pointer travel (screen px) below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;
const FIT_PADDING: f64 = 40.0;
const FIT_MAX_ZOOM: f64 = 2.0;
const TICK: f32 = 0.016;

pub fn kind_color(kind: &EntityKind) -> &'static str {
	match kind {
		EntityKind::Person => "#FF8A80",
		EntityKind::Organization => "#80D8FF",
		EntityKind::Object => "#FFFF8D",
		EntityKind::Concept => "#CCFF90",
		EntityKind::Event => "#CF94DA",
		EntityKind::Action => "#FFD180",
		EntityKind::Location => "#A7FFEB",
		EntityKind::Time => "#FF9E80",
		EntityKind::Technology => "#B388FF",
		EntityKind::Market => "#8C9EFF",
		EntityKind::Product => "#FFC400",
		EntityKind::Other(_) => "#DDDDDD",
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub key: Option<NodeKey>,
	pub label: String,
	pub color: &'static str,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub src: DefaultNodeIdx,
	pub tgt: DefaultNodeIdx,
	pub label: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	/// Nodes drawn in the highlight color (search hits).
	pub highlighted: HashSet<NodeKey>,
	pub selected: Option<NodeKey>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: simulation(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			highlighted: HashSet::new(),
			selected: None,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		};
		state.rebuild(data);
		state
	}

	/// Drop every node and edge and load `data`. Nodes whose key survives
	/// keep their last position; new ones start on a ring around the centre.
	pub fn rebuild(&mut self, data: &GraphData) {
		let mut previous = HashMap::new();
		self.graph.visit_nodes(|node| {
			if let Some(key) = &node.data.user_data.key {
				previous.insert(key.clone(), (node.x(), node.y()));
			}
		});

		self.graph = simulation();
		self.edges.clear();
		self.hover = HoverState::default();
		self.drag = DragState::default();
		self.pan = PanState::default();

		let mut key_to_idx = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			let key = node.key();
			let (x, y) = previous.get(&key).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
				(
					(self.width / 2.0 + 100.0 * angle.cos()) as f32,
					(self.height / 2.0 + 100.0 * angle.sin()) as f32,
				)
			});

			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					key: Some(key.clone()),
					label: node.name.clone(),
					color: kind_color(&node.kind),
				},
			});
			key_to_idx.insert(key, idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(key_to_idx.get(&link.source), key_to_idx.get(&link.target))
			{
				self.graph.add_edge(src, tgt, EdgeData::default());
				self.edges.push(EdgeInfo {
					src,
					tgt,
					label: link.label.clone(),
				});
			}
		}

		self.animation_running = true;
	}

	/// Run the simulation ahead of drawing, then frame the result.
	pub fn relayout(&mut self, warmup_ticks: usize) {
		for _ in 0..warmup_ticks {
			self.graph.update(TICK);
		}
		self.fit();
	}

	/// Zoom and pan so every node is inside the canvas.
	pub fn fit(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});

		let Some((x0, y0, x1, y1)) = bounds else {
			self.transform = ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			};
			return;
		};

		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((self.width - 2.0 * FIT_PADDING) / bw)
			.min((self.height - 2.0 * FIT_PADDING) / bh)
			.clamp(0.1, FIT_MAX_ZOOM);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_key(&self, idx: DefaultNodeIdx) -> Option<NodeKey> {
		let mut key = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				key = node.data.user_data.key.clone();
			}
		});
		key
	}

	/// Press at screen `(x, y)`: grabs the node under the pointer, else
	/// starts panning.
	pub fn press(&mut self, x: f64, y: f64) {
		match self.node_at_position(x, y) {
			Some(idx) => {
				let mut start = (0.0, 0.0);
				self.graph.visit_nodes(|node| {
					if node.index() == idx {
						start = (node.x(), node.y());
					}
				});
				self.drag = DragState {
					active: true,
					moved: false,
					node_idx: Some(idx),
					start_x: x,
					start_y: y,
					node_start_x: start.0,
					node_start_y: start.1,
				};
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (sdx, sdy) = (x - self.drag.start_x, y - self.drag.start_y);
			if (sdx * sdx + sdy * sdy).sqrt() >= CLICK_SLOP {
				self.drag.moved = true;
			}
			if !self.drag.moved {
				return;
			}
			let (nx, ny) = (
				self.drag.node_start_x + (sdx / self.transform.k) as f32,
				self.drag.node_start_y + (sdy / self.transform.k) as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Release the pointer. Returns the node if the press was a click rather
	/// than a drag. A dragged node rejoins the simulation where it was dropped.
	pub fn release(&mut self) -> Option<NodeKey> {
		let clicked = match (self.drag.active, self.drag.node_idx) {
			(true, Some(idx)) if !self.drag.moved => self.node_key(idx),
			_ => None,
		};
		self.unpin_dragged();
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	pub fn leave(&mut self) {
		self.unpin_dragged();
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	fn unpin_dragged(&mut self) {
		if let Some(idx) = self.drag.node_idx {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
		}
	}

	/// Zoom by one wheel notch around screen `(x, y)`.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.src == idx {
					self.hover.neighbors.insert(edge.tgt);
				} else if edge.tgt == idx {
					self.hover.neighbors.insert(edge.src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn is_search_hit(&self, info: &NodeInfo) -> bool {
		info.key.as_ref().is_some_and(|k| self.highlighted.contains(k))
	}

	pub fn is_selected(&self, info: &NodeInfo) -> bool {
		info.key.is_some() && self.selected == info.key
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{GraphLink, GraphNode};

	fn node(id: &str, kind: EntityKind) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.to_uppercase(),
			kind,
		}
	}

	fn key(id: &str, kind: EntityKind) -> NodeKey {
		NodeKey::new(kind, id)
	}

	fn link(source: NodeKey, target: NodeKey) -> GraphLink {
		GraphLink {
			id: format!("rel-{}-{}", source.id, target.id),
			source,
			target,
			label: Some("LINKS".into()),
			snippet: None,
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![node("a", EntityKind::Person), node("b", EntityKind::Market)],
			links: vec![
				link(key("a", EntityKind::Person), key("b", EntityKind::Market)),
				link(key("a", EntityKind::Person), key("b", EntityKind::Person)),
			],
		}
	}

	fn position(state: &ForceGraphState, id: &str) -> (f64, f64) {
		let mut pos = (f64::NAN, f64::NAN);
		state.graph.visit_nodes(|n| {
			if n.data.user_data.key.as_ref().is_some_and(|k| k.id == id) {
				pos = (n.x() as f64, n.y() as f64);
			}
		});
		pos
	}

	fn anchored(state: &ForceGraphState, id: &str) -> bool {
		let mut pinned = false;
		state.graph.visit_nodes(|n| {
			if n.data.user_data.key.as_ref().is_some_and(|k| k.id == id) {
				pinned = n.data.is_anchor;
			}
		});
		pinned
	}

	fn to_screen(state: &ForceGraphState, (x, y): (f64, f64)) -> (f64, f64) {
		(
			x * state.transform.k + state.transform.x,
			y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn palette_follows_entity_kind() {
		assert_eq!(kind_color(&EntityKind::Person), "#FF8A80");
		assert_eq!(kind_color(&EntityKind::Product), "#FFC400");
		assert_eq!(kind_color(&EntityKind::Other("Widget".into())), "#DDDDDD");
	}

	#[test]
	fn edges_to_unknown_nodes_are_not_drawn() {
		let state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let mut count = 0;
		state.graph.visit_nodes(|_| count += 1);
		assert_eq!(count, 2);
		assert_eq!(state.edges.len(), 1);
		assert_eq!(state.edges[0].label.as_deref(), Some("LINKS"));
	}

	#[test]
	fn fit_centres_the_bounding_box() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		state.fit();
		let (ax, ay) = to_screen(&state, position(&state, "a"));
		let (bx, by) = to_screen(&state, position(&state, "b"));
		assert!((((ax + bx) / 2.0) - 400.0).abs() < 1e-6);
		assert!((((ay + by) / 2.0) - 300.0).abs() < 1e-6);
		assert!(state.transform.k <= FIT_MAX_ZOOM);
	}

	#[test]
	fn fit_on_empty_graph_resets_the_view() {
		let mut state = ForceGraphState::new(&GraphData::default(), 800.0, 600.0);
		state.transform.k = 4.0;
		state.fit();
		assert_eq!(state.transform.k, 1.0);
	}

	#[test]
	fn click_without_movement_reports_the_node() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		state.fit();
		let (sx, sy) = to_screen(&state, position(&state, "b"));
		state.press(sx, sy);
		state.pointer_move(sx + 1.0, sy);
		assert_eq!(state.release(), Some(key("b", EntityKind::Market)));
	}

	#[test]
	fn dragging_moves_the_node_instead_of_selecting() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		state.fit();
		let before = position(&state, "a");
		let (sx, sy) = to_screen(&state, before);
		state.press(sx, sy);
		state.pointer_move(sx + 40.0, sy);
		assert!(anchored(&state, "a"));
		assert_eq!(state.release(), None);
		assert!(position(&state, "a").0 > before.0);
	}

	#[test]
	fn released_nodes_rejoin_the_simulation() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		state.fit();
		let (sx, sy) = to_screen(&state, position(&state, "a"));
		state.press(sx, sy);
		state.pointer_move(sx + 40.0, sy + 10.0);
		state.release();
		assert!(!anchored(&state, "a"));

		let (sx, sy) = to_screen(&state, position(&state, "b"));
		state.press(sx, sy);
		state.pointer_move(sx - 30.0, sy);
		state.leave();
		assert!(!anchored(&state, "b"));
	}

	#[test]
	fn nodes_sharing_an_id_are_told_apart_by_kind() {
		let person = key("7", EntityKind::Person);
		let concept = key("7", EntityKind::Concept);
		let data = GraphData {
			nodes: vec![node("7", EntityKind::Concept), node("7", EntityKind::Person)],
			links: vec![link(person.clone(), concept.clone())],
		};
		let mut state = ForceGraphState::new(&data, 800.0, 600.0);
		assert_eq!(state.edges.len(), 1);
		assert_ne!(state.edges[0].src, state.edges[0].tgt);

		state.highlighted = HashSet::from([person.clone()]);
		state.selected = Some(concept.clone());
		let mut hits = Vec::new();
		state.graph.visit_nodes(|n| {
			let info = &n.data.user_data;
			hits.push((info.key.clone(), state.is_search_hit(info), state.is_selected(info)));
		});
		assert!(hits.contains(&(Some(person), true, false)));
		assert!(hits.contains(&(Some(concept), false, true)));
	}

	#[test]
	fn rebuild_keeps_positions_of_surviving_nodes() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		state.relayout(30);
		let before = position(&state, "a");
		state.rebuild(&sample().without_node(&key("b", EntityKind::Market)));
		assert_eq!(position(&state, "a"), before);
		assert!(state.edges.is_empty());
	}

	#[test]
	fn wheel_zoom_keeps_the_pointer_fixed() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let anchor = state.screen_to_graph(200.0, 150.0);
		state.zoom_at(200.0, 150.0, -1.0);
		let after = state.screen_to_graph(200.0, 150.0);
		assert!((anchor.0 - after.0).abs() < 1e-9);
		assert!((anchor.1 - after.1).abs() < 1e-9);
		assert!(state.transform.k > 1.0);
	}
}
