use thiserror::Error;

use super::types::{EdgeId, NodeId};

/// A rejected edit. The message is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
	/// Add-edge was pressed without both endpoints chosen.
	#[error("Please select both source and target nodes.")]
	MissingEndpoints,

	#[error("Cannot connect a node to itself.")]
	SelfLoop,

	/// An edge already joins the pair, in either direction.
	#[error("Edge already exists.")]
	DuplicateEdge,

	#[error("Please select a node to delete.")]
	NoNodeToDelete,

	#[error("Please select a node to update.")]
	NoNodeToUpdate,

	#[error("Label cannot be empty.")]
	EmptyLabel,

	#[error("Please select an edge to delete.")]
	NoEdgeSelected,

	/// The id does not name a node in the graph.
	#[error("Node {0} does not exist.")]
	UnknownNode(NodeId),

	/// The id does not name an edge in the graph.
	#[error("Edge {0} does not exist.")]
	UnknownEdge(EdgeId),
}
