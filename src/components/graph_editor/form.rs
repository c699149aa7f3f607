//! Edit-form logic kept apart from the DOM so it can be unit tested.

use super::store::GraphStore;
use super::types::{Edge, EdgeId, Node, NodeId};

/// Colour shown in the picker when nothing else applies.
pub const DEFAULT_DRAFT_COLOR: &str = "#ffffff";

/// Label and colour fields of the rename/recolour form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDraft {
	pub label: String,
	pub color: String,
}

impl Default for NodeDraft {
	fn default() -> Self {
		Self {
			label: String::new(),
			color: DEFAULT_DRAFT_COLOR.into(),
		}
	}
}

impl NodeDraft {
	pub fn from_node(node: &Node) -> Self {
		Self {
			label: node.label.clone(),
			color: node
				.color
				.clone()
				.unwrap_or_else(|| DEFAULT_DRAFT_COLOR.into()),
		}
	}
}

/// Dropdown value: empty means "nothing chosen".
fn parse_choice(value: &str) -> Option<u32> {
	let value = value.trim();
	if value.is_empty() {
		return None;
	}
	value.parse().ok()
}

pub fn parse_node_choice(value: &str) -> Option<NodeId> {
	parse_choice(value).map(NodeId)
}

pub fn parse_edge_choice(value: &str) -> Option<EdgeId> {
	parse_choice(value).map(EdgeId)
}

/// Inverse of the parsers: the `<select>` value for an optional id.
pub fn choice_value<T: ToString>(id: Option<T>) -> String {
	id.map(|id| id.to_string()).unwrap_or_default()
}

/// "{source} to {target}" using node labels where the endpoints still exist.
pub fn edge_option_label(store: &GraphStore, edge: &Edge) -> String {
	let label = |id: NodeId| {
		store
			.node(id)
			.map(|n| n.label.clone())
			.unwrap_or_else(|| format!("Node {id}"))
	};
	format!("{} to {}", label(edge.source), label(edge.target))
}
