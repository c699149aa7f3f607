use std::fmt;

/// Identifier of a node. Assigned in increasing order and never reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Identifier of an edge. Assigned in increasing order and never reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A node as held by the store. Its position lives in the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub label: String,
	pub color: Option<String>,
}

/// An undirected connection between two distinct nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	pub id: EdgeId,
	pub source: NodeId,
	pub target: NodeId,
}

impl Edge {
	pub fn touches(&self, node: NodeId) -> bool {
		self.source == node || self.target == node
	}

	/// True when this edge joins `a` and `b` in either direction.
	pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
		(self.source == a && self.target == b) || (self.source == b && self.target == a)
	}
}

/// Seed node handed to the editor on mount.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: u32,
	pub label: Option<String>,
	pub color: Option<String>,
}

/// Seed link handed to the editor on mount.
#[derive(Clone, Debug)]
pub struct GraphLink {
	pub source: u32,
	pub target: u32,
}

/// Initial graph contents.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
