//! Visual primitives kept in step with the store by id.
//!
//! Each pass creates primitives for new ids, restyles existing ones in place and drops
//! stale ones. Coordinates are only written by [`Scene::apply_positions`], so a
//! restyle never disturbs where something is on screen.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::config::Style;
use super::layout::Point;
use super::store::GraphStore;
use super::types::{Edge, EdgeId, Node, NodeId};

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLine {
	pub source: NodeId,
	pub target: NodeId,
	pub from: Point,
	pub to: Point,
	pub color: &'static str,
	pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeCircle {
	pub center: Point,
	pub radius: f64,
	pub fill: String,
	pub stroke: &'static str,
	pub stroke_width: f64,
}

/// Centred text drawn over a node. Never a hit target.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeLabel {
	pub at: Point,
	pub text: String,
	offset: f64,
}

/// What a reconcile pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diff {
	pub created: usize,
	pub updated: usize,
	pub removed: usize,
}

impl std::ops::Add for Diff {
	type Output = Diff;

	fn add(self, rhs: Diff) -> Diff {
		Diff {
			created: self.created + rhs.created,
			updated: self.updated + rhs.updated,
			removed: self.removed + rhs.removed,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
	lines: BTreeMap<EdgeId, EdgeLine>,
	circles: BTreeMap<NodeId, NodeCircle>,
	labels: BTreeMap<NodeId, NodeLabel>,
}

/// Match `prims` to `items` by key. New entries come from `create`; every live entry,
/// new or old, then goes through `update`.
fn reconcile_keyed<K: Ord + Copy, T, D>(
	prims: &mut BTreeMap<K, T>,
	items: &[D],
	key: impl Fn(&D) -> K,
	create: impl Fn(&D) -> T,
	update: impl Fn(&mut T, &D),
) -> Diff {
	let live: BTreeSet<K> = items.iter().map(&key).collect();
	let before = prims.len();
	prims.retain(|k, _| live.contains(k));
	let mut diff = Diff {
		removed: before - prims.len(),
		..Diff::default()
	};

	for item in items {
		let prim = match prims.entry(key(item)) {
			Entry::Occupied(e) => {
				diff.updated += 1;
				e.into_mut()
			}
			Entry::Vacant(e) => {
				diff.created += 1;
				e.insert(create(item))
			}
		};
		update(prim, item);
	}
	diff
}

impl Scene {
	pub fn reconcile(
		&mut self,
		store: &GraphStore,
		positions: &HashMap<NodeId, Point>,
		style: &Style,
	) -> Diff {
		let sel = &store.selection;
		let at = |id: NodeId| positions.get(&id).copied().unwrap_or_default();

		let lines = reconcile_keyed(
			&mut self.lines,
			store.edges(),
			|e: &Edge| e.id,
			|e| EdgeLine {
				source: e.source,
				target: e.target,
				from: at(e.source),
				to: at(e.target),
				color: style.edge_color,
				width: style.edge_width,
			},
			|line, e| {
				let marked = sel.edge == Some(e.id);
				line.color = if marked {
					style.marked_edge_color
				} else {
					style.edge_color
				};
				line.width = if marked {
					style.marked_edge_width
				} else {
					style.edge_width
				};
			},
		);

		let circles = reconcile_keyed(
			&mut self.circles,
			store.nodes(),
			|n: &Node| n.id,
			|n| NodeCircle {
				center: at(n.id),
				radius: style.node_radius,
				fill: String::new(),
				stroke: style.node_stroke,
				stroke_width: style.node_stroke_width,
			},
			|circle, n| {
				let selected = sel.node == Some(n.id);
				circle.radius = style.node_radius;
				circle.fill = n.color.clone().unwrap_or_else(|| style.node_fill.into());
				(circle.stroke, circle.stroke_width) = if selected {
					(style.selected_stroke, style.selected_stroke_width)
				} else {
					(style.node_stroke, style.node_stroke_width)
				};
			},
		);

		let labels = reconcile_keyed(
			&mut self.labels,
			store.nodes(),
			|n: &Node| n.id,
			|n| {
				let c = at(n.id);
				NodeLabel {
					at: Point::new(c.x, c.y + style.label_offset),
					text: String::new(),
					offset: style.label_offset,
				}
			},
			|label, n| {
				if label.text != n.label {
					label.text = n.label.clone();
				}
			},
		);

		lines + circles + labels
	}

	/// Per-tick hook: copy simulated positions onto every primitive.
	pub fn apply_positions(&mut self, positions: &HashMap<NodeId, Point>) {
		for line in self.lines.values_mut() {
			if let Some(p) = positions.get(&line.source) {
				line.from = *p;
			}
			if let Some(p) = positions.get(&line.target) {
				line.to = *p;
			}
		}
		for (id, circle) in &mut self.circles {
			if let Some(p) = positions.get(id) {
				circle.center = *p;
			}
		}
		for (id, label) in &mut self.labels {
			if let Some(p) = positions.get(id) {
				label.at = Point::new(p.x, p.y + label.offset);
			}
		}
	}

	pub fn lines(&self) -> impl Iterator<Item = (EdgeId, &EdgeLine)> {
		self.lines.iter().map(|(id, l)| (*id, l))
	}

	pub fn circles(&self) -> impl Iterator<Item = (NodeId, &NodeCircle)> {
		self.circles.iter().map(|(id, c)| (*id, c))
	}

	pub fn labels(&self) -> impl Iterator<Item = (NodeId, &NodeLabel)> {
		self.labels.iter().map(|(id, l)| (*id, l))
	}

	#[cfg(test)]
	pub fn circle(&self, id: NodeId) -> Option<&NodeCircle> {
		self.circles.get(&id)
	}

	#[cfg(test)]
	pub fn line(&self, id: EdgeId) -> Option<&EdgeLine> {
		self.lines.get(&id)
	}

	/// Topmost circle under `p` (graph space). Labels are ignored.
	pub fn node_at(&self, p: Point) -> Option<NodeId> {
		self.circles
			.iter()
			.rev()
			.find(|(_, c)| {
				let (dx, dy) = (c.center.x - p.x, c.center.y - p.y);
				(dx * dx + dy * dy).sqrt() <= c.radius
			})
			.map(|(id, _)| *id)
	}

	/// Topmost line within `slack` of `p`, widened by half its stroke.
	pub fn edge_at(&self, p: Point, slack: f64) -> Option<EdgeId> {
		self.lines
			.iter()
			.rev()
			.find(|(_, l)| distance_to_segment(p, l.from, l.to) <= l.width / 2.0 + slack)
			.map(|(id, _)| *id)
	}
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (vx, vy) = (b.x - a.x, b.y - a.y);
	let len2 = vx * vx + vy * vy;
	let t = if len2 < 1e-12 {
		0.0
	} else {
		(((p.x - a.x) * vx + (p.y - a.y) * vy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * vx, a.y + t * vy);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}
