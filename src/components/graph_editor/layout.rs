//! Force-directed layout over `force_graph`, with d3-style heat control.
//!
//! `force_graph` supplies charge repulsion and springs. Link distance, collision and
//! centring run as extra passes after each engine step, scaled by the current heat.
//! Positions are kept here, keyed by node id, and are the single source of truth for
//! where things are drawn.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::config::LayoutParams;
use super::types::{Edge, EdgeId, Node, NodeId};

const NODE_MASS: f32 = 10.0;
const LINK_STRENGTH: f64 = 0.5;
const COLLIDE_STRENGTH: f64 = 0.7;

/// A position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

pub struct LayoutEngine {
	params: LayoutParams,
	graph: ForceGraph<NodeId, ()>,
	index: HashMap<NodeId, DefaultNodeIdx>,
	node_ids: Vec<NodeId>,
	edge_ids: Vec<EdgeId>,
	links: Vec<(NodeId, NodeId)>,
	positions: HashMap<NodeId, Point>,
	pins: HashMap<NodeId, Point>,
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

impl LayoutEngine {
	pub fn new(params: LayoutParams) -> Self {
		let graph = ForceGraph::new(engine_parameters(&params));
		Self {
			params,
			graph,
			index: HashMap::new(),
			node_ids: Vec::new(),
			edge_ids: Vec::new(),
			links: Vec::new(),
			positions: HashMap::new(),
			pins: HashMap::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			running: false,
		}
	}

	/// Bring the simulation in line with the store's node and edge sets.
	///
	/// Returns false when membership is unchanged; relabels and recolours land here and
	/// leave the simulation alone. Otherwise the engine is rebuilt, surviving nodes keep
	/// their positions and pins, new nodes spawn near the centre, and heat resets to 1.
	pub fn sync(&mut self, nodes: &[Node], edges: &[Edge]) -> bool {
		let node_ids: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
		let edge_ids: Vec<EdgeId> = edges.iter().map(|e| e.id).collect();
		if node_ids == self.node_ids && edge_ids == self.edge_ids {
			return false;
		}

		self.pins.retain(|id, _| node_ids.contains(id));
		self.positions.retain(|id, _| node_ids.contains(id));

		let mut graph = ForceGraph::new(engine_parameters(&self.params));
		let mut index = HashMap::with_capacity(node_ids.len());
		for (i, &id) in node_ids.iter().enumerate() {
			let pinned = self.pins.get(&id).copied();
			let at = pinned
				.or_else(|| self.positions.get(&id).copied())
				.unwrap_or_else(|| self.spawn_point(i));
			self.positions.insert(id, at);
			let idx = graph.add_node(NodeData {
				x: at.x as f32,
				y: at.y as f32,
				mass: NODE_MASS,
				is_anchor: pinned.is_some(),
				user_data: id,
			});
			index.insert(id, idx);
		}

		let mut links = Vec::with_capacity(edges.len());
		for edge in edges {
			if let (Some(&a), Some(&b)) = (index.get(&edge.source), index.get(&edge.target)) {
				graph.add_edge(a, b, EdgeData::default());
				links.push((edge.source, edge.target));
			}
		}

		debug!(
			"layout rebuilt with {} node(s), {} link(s)",
			node_ids.len(),
			links.len()
		);
		self.graph = graph;
		self.index = index;
		self.node_ids = node_ids;
		self.edge_ids = edge_ids;
		self.links = links;
		self.restart();
		true
	}

	/// Advance one step. Returns false when the simulation is idle or stopped.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		self.graph.update(dt * self.alpha as f32);
		self.apply_constraints();
		self.refresh_positions();
		if self.alpha < self.params.alpha_min {
			self.running = false;
		}
		true
	}

	/// Full heat, as after a structural change.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
		self.running = true;
	}

	/// Move heat toward `target` from wherever it is now and resume stepping.
	pub fn reheat(&mut self, target: f64) {
		self.alpha_target = target;
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Fix a node at `at`. It stays there until pinned elsewhere or deleted.
	pub fn pin(&mut self, id: NodeId, at: Point) {
		if !self.index.contains_key(&id) {
			return;
		}
		self.pins.insert(id, at);
		self.positions.insert(id, at);
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == id {
				node.data.x = at.x as f32;
				node.data.y = at.y as f32;
				node.data.is_anchor = true;
			}
		});
	}

	#[cfg(test)]
	pub fn is_pinned(&self, id: NodeId) -> bool {
		self.pins.contains_key(&id)
	}

	pub fn position(&self, id: NodeId) -> Option<Point> {
		self.positions.get(&id).copied()
	}

	pub fn positions(&self) -> &HashMap<NodeId, Point> {
		&self.positions
	}

	/// d3's phyllotaxis arrangement around the centre.
	fn spawn_point(&self, i: usize) -> Point {
		let radius = 10.0 * (0.5 + i as f64).sqrt();
		let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
		let (cx, cy) = self.params.center;
		Point::new(cx + radius * angle.cos(), cy + radius * angle.sin())
	}

	fn apply_constraints(&mut self) {
		let mut pos: HashMap<NodeId, Point> = HashMap::with_capacity(self.index.len());
		self.graph.visit_nodes(|node| {
			pos.insert(
				node.data.user_data,
				Point::new(node.x() as f64, node.y() as f64),
			);
		});
		let mut shift: HashMap<NodeId, (f64, f64)> = HashMap::new();
		let mut push = |id: NodeId, dx: f64, dy: f64| {
			let s = shift.entry(id).or_default();
			s.0 += dx;
			s.1 += dy;
		};

		for &(a, b) in &self.links {
			let (Some(pa), Some(pb)) = (pos.get(&a), pos.get(&b)) else {
				continue;
			};
			let (dx, dy) = (pb.x - pa.x, pb.y - pa.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 1e-6 {
				continue;
			}
			let k = (dist - self.params.link_distance) / dist * self.alpha * LINK_STRENGTH * 0.5;
			push(a, dx * k, dy * k);
			push(b, -dx * k, -dy * k);
		}

		let min_gap = self.params.collision_radius * 2.0;
		for (i, a) in self.node_ids.iter().enumerate() {
			for b in &self.node_ids[i + 1..] {
				let (Some(pa), Some(pb)) = (pos.get(a), pos.get(b)) else {
					continue;
				};
				let (mut dx, mut dy) = (pb.x - pa.x, pb.y - pa.y);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_gap {
					continue;
				}
				if dist < 1e-6 {
					(dx, dy, dist) = (1.0, 0.0, 1.0);
				}
				let k = (min_gap - dist) / dist * COLLIDE_STRENGTH * 0.5;
				push(*a, -dx * k, -dy * k);
				push(*b, dx * k, dy * k);
			}
		}

		let n = pos.len().max(1) as f64;
		let (sx, sy) = pos.iter().fold((0.0, 0.0), |(sx, sy), (id, p)| {
			let d = shift.get(id).copied().unwrap_or_default();
			(sx + p.x + d.0, sy + p.y + d.1)
		});
		let (cx, cy) = (self.params.center.0 - sx / n, self.params.center.1 - sy / n);

		let pins = &self.pins;
		self.graph.visit_nodes_mut(|node| {
			let id = node.data.user_data;
			if let Some(at) = pins.get(&id) {
				node.data.x = at.x as f32;
				node.data.y = at.y as f32;
				return;
			}
			let d = shift.get(&id).copied().unwrap_or_default();
			node.data.x += (d.0 + cx) as f32;
			node.data.y += (d.1 + cy) as f32;
		});
	}

	fn refresh_positions(&mut self) {
		let (positions, pins) = (&mut self.positions, &self.pins);
		self.graph.visit_nodes(|node| {
			let id = node.data.user_data;
			let at = pins
				.get(&id)
				.copied()
				.unwrap_or_else(|| Point::new(node.x() as f64, node.y() as f64));
			positions.insert(id, at);
		});
	}
}

fn engine_parameters(params: &LayoutParams) -> SimulationParameters {
	SimulationParameters {
		// force_graph scales repulsion by node mass; half of d3's strength lands close.
		force_charge: (params.charge_strength.abs() * 0.5) as f32,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_editor::store::GraphStore;

	fn engine() -> LayoutEngine {
		LayoutEngine::new(LayoutParams::centered(900.0, 600.0))
	}

	fn triangle() -> GraphStore {
		let mut store = GraphStore::default();
		let (a, b, c) = (store.add_node(), store.add_node(), store.add_node());
		store.add_edge(Some(a), Some(b)).unwrap();
		store.add_edge(Some(b), Some(c)).unwrap();
		store
	}

	#[test]
	fn new_nodes_spawn_near_center() {
		let store = triangle();
		let mut layout = engine();
		assert!(layout.sync(store.nodes(), store.edges()));
		assert_eq!(layout.positions().len(), 3);
		for p in layout.positions().values() {
			let (dx, dy) = (p.x - 450.0, p.y - 300.0);
			assert!((dx * dx + dy * dy).sqrt() < 100.0);
		}
		assert!(layout.is_running());
	}

	#[test]
	fn relabel_keeps_positions() {
		let mut store = triangle();
		let mut layout = engine();
		layout.sync(store.nodes(), store.edges());
		for _ in 0..20 {
			layout.tick(0.016);
		}
		let before = layout.position(NodeId(1)).unwrap();

		store.update_node(Some(NodeId(1)), "Renamed", "#abcdef").unwrap();
		assert!(!layout.sync(store.nodes(), store.edges()));
		assert_eq!(layout.position(NodeId(1)), Some(before));
	}

	#[test]
	fn structural_change_preserves_survivors() {
		let mut store = triangle();
		let mut layout = engine();
		layout.sync(store.nodes(), store.edges());
		for _ in 0..20 {
			layout.tick(0.016);
		}
		let kept = layout.position(NodeId(3)).unwrap();
		layout.pin(NodeId(2), Point::new(5.0, 5.0));

		store.delete_node(Some(NodeId(2))).unwrap();
		assert!(layout.sync(store.nodes(), store.edges()));
		assert_eq!(layout.position(NodeId(3)), Some(kept));
		assert_eq!(layout.position(NodeId(2)), None);
		assert!(!layout.is_pinned(NodeId(2)));
		assert_eq!(layout.alpha(), 1.0);
	}

	#[test]
	fn pinned_node_does_not_move() {
		let store = triangle();
		let mut layout = engine();
		layout.sync(store.nodes(), store.edges());
		let at = Point::new(100.0, 120.0);
		layout.pin(NodeId(1), at);
		for _ in 0..50 {
			layout.tick(0.016);
		}
		assert_eq!(layout.position(NodeId(1)), Some(at));
		assert!(layout.is_pinned(NodeId(1)));
	}

	#[test]
	fn pin_ignores_unknown_node() {
		let mut layout = engine();
		layout.pin(NodeId(7), Point::new(1.0, 1.0));
		assert!(!layout.is_pinned(NodeId(7)));
		assert_eq!(layout.position(NodeId(7)), None);
	}

	#[test]
	fn heat_decays_to_idle() {
		let store = triangle();
		let mut layout = engine();
		layout.sync(store.nodes(), store.edges());
		for _ in 0..290 {
			assert!(layout.tick(0.016));
		}
		assert!(layout.is_running());
		for _ in 0..20 {
			layout.tick(0.016);
		}
		assert!(!layout.is_running());
		assert!(!layout.tick(0.016));
	}

	#[test]
	fn reheat_holds_simulation_warm() {
		let store = triangle();
		let mut layout = engine();
		layout.sync(store.nodes(), store.edges());
		for _ in 0..400 {
			layout.tick(0.016);
		}
		assert!(!layout.is_running());

		layout.reheat(0.3);
		for _ in 0..1000 {
			assert!(layout.tick(0.016));
		}
		assert!((layout.alpha() - 0.3).abs() < 0.01);

		layout.reheat(0.0);
		for _ in 0..1000 {
			layout.tick(0.016);
		}
		assert!(!layout.is_running());
	}

	#[test]
	fn stop_halts_ticks() {
		let store = triangle();
		let mut layout = engine();
		layout.sync(store.nodes(), store.edges());
		layout.stop();
		let before = layout.positions().clone();
		assert!(!layout.tick(0.016));
		assert_eq!(layout.positions(), &before);
	}

	#[test]
	fn overlapping_nodes_are_pushed_apart() {
		let store = triangle();
		let mut layout = engine();
		layout.sync(store.nodes(), store.edges());
		let gap = |layout: &LayoutEngine| {
			let (a, b) = (
				layout.position(NodeId(1)).unwrap(),
				layout.position(NodeId(2)).unwrap(),
			);
			(a.x - b.x).hypot(a.y - b.y)
		};
		let start = gap(&layout);
		for _ in 0..30 {
			layout.tick(0.016);
		}
		let end = gap(&layout);
		assert!(end > start);
	}
}
