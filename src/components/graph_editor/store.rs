use log::{debug, warn};

use super::error::EditError;
use super::form::NodeDraft;
use super::types::{Edge, EdgeId, GraphData, Node, NodeId};

/// Colour given to nodes created from the toolbar.
pub const NEW_NODE_COLOR: &str = "#666";

/// Transient UI selection. Each slot is independent of the others.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	pub node: Option<NodeId>,
	/// Edge marked for deletion.
	pub edge: Option<EdgeId>,
	pub source: Option<NodeId>,
	pub target: Option<NodeId>,
}

/// Authoritative node and edge lists plus selection and edit-form state.
///
/// Every operation validates before it touches anything, so a rejected edit
/// leaves the store exactly as it was.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStore {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	pub selection: Selection,
	pub draft: NodeDraft,
	next_node: u32,
	next_edge: u32,
}

impl Default for GraphStore {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			selection: Selection::default(),
			draft: NodeDraft::default(),
			next_node: 1,
			next_edge: 1,
		}
	}
}

impl GraphStore {
	/// Build a store from seed data. Links that would break an edge invariant are skipped.
	pub fn from_data(data: &GraphData) -> Self {
		let mut store = Self::default();

		for seed in &data.nodes {
			let id = NodeId(seed.id);
			if store.node(id).is_some() {
				warn!("skipping duplicate seed node {id}");
				continue;
			}
			let Some(next) = seed.id.checked_add(1) else {
				warn!("skipping seed node {id}: no id left after it");
				continue;
			};
			store.nodes.push(Node {
				id,
				label: seed.label.clone().unwrap_or_else(|| format!("Node {id}")),
				color: seed.color.clone(),
			});
			store.next_node = store.next_node.max(next);
		}

		for link in &data.links {
			let (source, target) = (NodeId(link.source), NodeId(link.target));
			if let Err(err) = store.add_edge(Some(source), Some(target)) {
				warn!("skipping seed link {source} -> {target}: {err}");
			}
		}

		store
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Append a node with the next unused id and a default label and colour.
	pub fn add_node(&mut self) -> NodeId {
		let id = NodeId(self.next_node);
		self.next_node += 1;
		self.nodes.push(Node {
			id,
			label: format!("Node {id}"),
			color: Some(NEW_NODE_COLOR.into()),
		});
		debug!("added node {id}");
		id
	}

	/// Connect two distinct, existing, not-yet-connected nodes.
	pub fn add_edge(
		&mut self,
		source: Option<NodeId>,
		target: Option<NodeId>,
	) -> Result<EdgeId, EditError> {
		let (Some(source), Some(target)) = (source, target) else {
			return Err(EditError::MissingEndpoints);
		};
		if source == target {
			return Err(EditError::SelfLoop);
		}
		for endpoint in [source, target] {
			if self.node(endpoint).is_none() {
				return Err(EditError::UnknownNode(endpoint));
			}
		}
		if self.edges.iter().any(|e| e.connects(source, target)) {
			return Err(EditError::DuplicateEdge);
		}

		let id = EdgeId(self.next_edge);
		self.next_edge += 1;
		self.edges.push(Edge { id, source, target });
		self.selection.source = None;
		self.selection.target = None;
		debug!("added edge {id}: {source} -> {target}");
		Ok(id)
	}

	/// Remove a node together with every edge that touches it.
	pub fn delete_node(&mut self, selected: Option<NodeId>) -> Result<Node, EditError> {
		let id = selected.ok_or(EditError::NoNodeToDelete)?;
		let pos = self
			.nodes
			.iter()
			.position(|n| n.id == id)
			.ok_or(EditError::UnknownNode(id))?;

		let removed = self.nodes.remove(pos);
		let before = self.edges.len();
		self.edges.retain(|e| !e.touches(id));
		debug!(
			"deleted node {id} and {} attached edge(s)",
			before - self.edges.len()
		);

		let sel = &mut self.selection;
		sel.node = None;
		if sel.source == Some(id) {
			sel.source = None;
		}
		if sel.target == Some(id) {
			sel.target = None;
		}
		if let Some(marked) = sel.edge {
			if !self.edges.iter().any(|e| e.id == marked) {
				sel.edge = None;
			}
		}
		Ok(removed)
	}

	pub fn delete_edge(&mut self, marked: Option<EdgeId>) -> Result<Edge, EditError> {
		let id = marked.ok_or(EditError::NoEdgeSelected)?;
		let pos = self
			.edges
			.iter()
			.position(|e| e.id == id)
			.ok_or(EditError::UnknownEdge(id))?;

		let removed = self.edges.remove(pos);
		self.selection.edge = None;
		debug!("deleted edge {id}");
		Ok(removed)
	}

	/// Replace a node's label and colour. Whitespace-only labels are rejected.
	pub fn update_node(
		&mut self,
		selected: Option<NodeId>,
		label: &str,
		color: &str,
	) -> Result<(), EditError> {
		let id = selected.ok_or(EditError::NoNodeToUpdate)?;
		if label.trim().is_empty() {
			return Err(EditError::EmptyLabel);
		}
		let node = self
			.nodes
			.iter_mut()
			.find(|n| n.id == id)
			.ok_or(EditError::UnknownNode(id))?;

		node.label = label.to_owned();
		node.color = Some(color.to_owned());
		debug!("updated node {id}: label={label:?} color={color}");
		Ok(())
	}

	/// Select a node without touching the edit draft.
	pub fn select_node(&mut self, id: Option<NodeId>) {
		self.selection.node = id;
	}

	/// Select a node from the canvas and pre-fill the draft from it.
	pub fn focus_node(&mut self, id: NodeId) {
		let Some(node) = self.node(id) else {
			return;
		};
		self.draft = NodeDraft::from_node(node);
		self.selection.node = Some(id);
	}

	pub fn mark_edge(&mut self, id: Option<EdgeId>) {
		self.selection.edge = id;
	}

	/// Background click: drop both the selected node and the marked edge.
	pub fn clear_selection(&mut self) {
		self.selection.node = None;
		self.selection.edge = None;
	}

	pub fn set_pending_source(&mut self, id: Option<NodeId>) {
		self.selection.source = id;
	}

	pub fn set_pending_target(&mut self, id: Option<NodeId>) {
		self.selection.target = id;
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::graph_editor::types::{GraphLink, GraphNode};

	fn seed() -> GraphStore {
		let node = |id: u32| GraphNode {
			id,
			label: Some(format!("Node {id}")),
			color: None,
		};
		GraphStore::from_data(&GraphData {
			nodes: vec![node(1), node(2), node(3)],
			links: vec![
				GraphLink { source: 1, target: 2 },
				GraphLink { source: 2, target: 3 },
			],
		})
	}

	fn pairs(store: &GraphStore) -> Vec<(u32, u32)> {
		store
			.edges()
			.iter()
			.map(|e| (e.source.0, e.target.0))
			.collect()
	}

	#[test]
	fn add_edge_closes_triangle() {
		let mut store = seed();
		let id = store.add_edge(Some(NodeId(1)), Some(NodeId(3))).unwrap();
		assert_eq!(id, EdgeId(3));
		assert_eq!(pairs(&store), vec![(1, 2), (2, 3), (1, 3)]);
	}

	#[test]
	fn add_edge_rejects_duplicate_either_direction() {
		let mut store = seed();
		store.add_edge(Some(NodeId(1)), Some(NodeId(3))).unwrap();
		let before = store.clone();
		assert_eq!(
			store.add_edge(Some(NodeId(1)), Some(NodeId(2))),
			Err(EditError::DuplicateEdge)
		);
		assert_eq!(
			store.add_edge(Some(NodeId(3)), Some(NodeId(1))),
			Err(EditError::DuplicateEdge)
		);
		assert_eq!(store, before);
		assert_eq!(store.edges().len(), 3);
	}

	#[test]
	fn add_edge_rejects_missing_self_and_unknown() {
		let mut store = seed();
		store.set_pending_source(Some(NodeId(1)));
		let before = store.clone();
		assert_eq!(
			store.add_edge(Some(NodeId(1)), None),
			Err(EditError::MissingEndpoints)
		);
		assert_eq!(
			store.add_edge(Some(NodeId(2)), Some(NodeId(2))),
			Err(EditError::SelfLoop)
		);
		assert_eq!(
			store.add_edge(Some(NodeId(1)), Some(NodeId(9))),
			Err(EditError::UnknownNode(NodeId(9)))
		);
		assert_eq!(store, before);
	}

	#[test]
	fn add_edge_clears_pending_endpoints() {
		let mut store = seed();
		store.set_pending_source(Some(NodeId(1)));
		store.set_pending_target(Some(NodeId(3)));
		let sel = store.selection.clone();
		store.add_edge(sel.source, sel.target).unwrap();
		assert_eq!(store.selection.source, None);
		assert_eq!(store.selection.target, None);
	}

	#[test]
	fn delete_node_cascades_edges() {
		let mut store = seed();
		store.add_edge(Some(NodeId(1)), Some(NodeId(3))).unwrap();
		store.select_node(Some(NodeId(2)));
		let removed = store.delete_node(store.selection.node).unwrap();
		assert_eq!(removed.id, NodeId(2));
		let ids: Vec<u32> = store.nodes().iter().map(|n| n.id.0).collect();
		assert_eq!(ids, vec![1, 3]);
		assert_eq!(pairs(&store), vec![(1, 3)]);
		assert_eq!(store.selection.node, None);
	}

	#[test]
	fn delete_node_clears_references_to_removed_entities() {
		let mut store = seed();
		store.mark_edge(Some(EdgeId(1)));
		store.set_pending_source(Some(NodeId(2)));
		store.set_pending_target(Some(NodeId(3)));
		store.delete_node(Some(NodeId(2))).unwrap();
		assert_eq!(
			store.selection,
			Selection {
				target: Some(NodeId(3)),
				..Selection::default()
			}
		);
	}

	#[test]
	fn delete_node_requires_selection() {
		let mut store = seed();
		let before = store.clone();
		assert_eq!(store.delete_node(None), Err(EditError::NoNodeToDelete));
		assert_eq!(
			store.delete_node(Some(NodeId(7))),
			Err(EditError::UnknownNode(NodeId(7)))
		);
		assert_eq!(store, before);
	}

	#[test]
	fn delete_edge_removes_only_that_edge() {
		let mut store = seed();
		assert_eq!(store.delete_edge(None), Err(EditError::NoEdgeSelected));
		store.mark_edge(Some(EdgeId(1)));
		let removed = store.delete_edge(store.selection.edge).unwrap();
		assert_eq!(removed.id, EdgeId(1));
		assert_eq!(pairs(&store), vec![(2, 3)]);
		assert_eq!(store.nodes().len(), 3);
		assert_eq!(store.selection.edge, None);
	}

	#[test]
	fn add_node_from_empty_counts_up() {
		let mut store = GraphStore::default();
		let ids: Vec<NodeId> = (0..3).map(|_| store.add_node()).collect();
		assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
		assert_eq!(store.node(NodeId(2)).unwrap().label, "Node 2");
		assert_eq!(
			store.node(NodeId(2)).unwrap().color.as_deref(),
			Some(NEW_NODE_COLOR)
		);
	}

	#[test]
	fn seeded_ids_continue_after_largest() {
		let mut store = seed();
		assert_eq!(store.add_node(), NodeId(4));
		assert_eq!(
			store.add_edge(Some(NodeId(4)), Some(NodeId(1))),
			Ok(EdgeId(3))
		);
	}

	#[test]
	fn update_node_rejects_blank_label() {
		let mut store = seed();
		let before = store.clone();
		assert_eq!(
			store.update_node(Some(NodeId(1)), "", "#fff"),
			Err(EditError::EmptyLabel)
		);
		assert_eq!(
			store.update_node(Some(NodeId(1)), "  \t", "#fff"),
			Err(EditError::EmptyLabel)
		);
		assert_eq!(
			store.update_node(None, "x", "#fff"),
			Err(EditError::NoNodeToUpdate)
		);
		assert_eq!(store, before);
	}

	#[test]
	fn update_node_replaces_label_and_color() {
		let mut store = seed();
		store.update_node(Some(NodeId(1)), "Hub", "#123456").unwrap();
		let node = store.node(NodeId(1)).unwrap();
		assert_eq!(node.label, "Hub");
		assert_eq!(node.color.as_deref(), Some("#123456"));
	}

	#[test]
	fn focus_node_prefills_draft() {
		let mut store = seed();
		store.update_node(Some(NodeId(3)), "Sink", "#00ff00").unwrap();
		store.focus_node(NodeId(3));
		assert_eq!(store.selection.node, Some(NodeId(3)));
		assert_eq!(store.draft.label, "Sink");
		assert_eq!(store.draft.color, "#00ff00");

		store.focus_node(NodeId(1));
		assert_eq!(store.draft.color, "#ffffff");
	}

	#[test]
	fn clear_selection_keeps_pending_endpoints() {
		let mut store = seed();
		store.select_node(Some(NodeId(1)));
		store.mark_edge(Some(EdgeId(2)));
		store.set_pending_source(Some(NodeId(3)));
		store.clear_selection();
		assert_eq!(store.selection.node, None);
		assert_eq!(store.selection.edge, None);
		assert_eq!(store.selection.source, Some(NodeId(3)));
	}

	#[test]
	fn seed_skips_invalid_links() {
		let store = GraphStore::from_data(&GraphData {
			nodes: vec![
				GraphNode { id: 5, label: None, color: None },
				GraphNode { id: 6, label: None, color: None },
			],
			links: vec![
				GraphLink { source: 5, target: 6 },
				GraphLink { source: 6, target: 5 },
				GraphLink { source: 5, target: 5 },
				GraphLink { source: 5, target: 8 },
			],
		});
		assert_eq!(pairs(&store), vec![(5, 6)]);
		assert_eq!(store.node(NodeId(6)).unwrap().label, "Node 6");
	}

	#[test]
	fn seed_skips_node_at_id_ceiling() {
		let mut store = GraphStore::from_data(&GraphData {
			nodes: vec![
				GraphNode { id: 4, label: None, color: None },
				GraphNode { id: u32::MAX, label: None, color: None },
			],
			links: vec![GraphLink { source: 4, target: u32::MAX }],
		});
		assert!(store.node(NodeId(u32::MAX)).is_none());
		assert!(store.edges().is_empty());
		assert_eq!(store.add_node(), NodeId(5));
	}

	#[derive(Clone, Debug)]
	enum Op {
		AddNode,
		DeleteNode(usize),
		AddEdge(usize, usize),
	}

	fn op() -> impl Strategy<Value = Op> {
		prop_oneof![
			3 => Just(Op::AddNode),
			1 => any::<usize>().prop_map(Op::DeleteNode),
			2 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::AddEdge(a, b)),
		]
	}

	fn pick(store: &GraphStore, i: usize) -> Option<NodeId> {
		let nodes = store.nodes();
		(!nodes.is_empty()).then(|| nodes[i % nodes.len()].id)
	}

	proptest! {
		#[test]
		fn node_ids_strictly_increase_and_are_never_reused(
			ops in prop::collection::vec(op(), 0..60),
		) {
			let mut store = GraphStore::default();
			let mut issued: Vec<NodeId> = Vec::new();
			for op in ops {
				match op {
					Op::AddNode => {
						let id = store.add_node();
						if let Some(last) = issued.last() {
							prop_assert!(id > *last);
						}
						issued.push(id);
					}
					Op::DeleteNode(i) => {
						let _ = store.delete_node(pick(&store, i));
					}
					Op::AddEdge(a, b) => {
						let _ = store.add_edge(pick(&store, a), pick(&store, b));
					}
				}
			}
		}

		#[test]
		fn delete_node_removes_exactly_touching_edges(
			ops in prop::collection::vec(op(), 1..60),
			victim in any::<usize>(),
		) {
			let mut store = GraphStore::default();
			store.add_node();
			for op in ops {
				match op {
					Op::AddNode | Op::DeleteNode(_) => {
						store.add_node();
					}
					Op::AddEdge(a, b) => {
						let _ = store.add_edge(pick(&store, a), pick(&store, b));
					}
				}
			}
			let id = pick(&store, victim).unwrap();
			let expected: Vec<Edge> =
				store.edges().iter().copied().filter(|e| !e.touches(id)).collect();
			store.delete_node(Some(id)).unwrap();
			prop_assert_eq!(store.edges(), expected.as_slice());
			prop_assert!(
				store
					.edges()
					.iter()
					.all(|e| store.node(e.source).is_some() && store.node(e.target).is_some())
			);
		}

		#[test]
		fn self_loops_never_land(ops in prop::collection::vec(op(), 0..30), i in any::<usize>()) {
			let mut store = GraphStore::default();
			store.add_node();
			for op in ops {
				if let Op::AddEdge(a, b) = op {
					let _ = store.add_edge(pick(&store, a), pick(&store, b));
				} else {
					store.add_node();
				}
			}
			let before = store.edges().to_vec();
			let id = pick(&store, i);
			prop_assert_eq!(store.add_edge(id, id), Err(EditError::SelfLoop));
			prop_assert_eq!(store.edges(), before.as_slice());
		}
	}
}
