//! Errors raised while turning a graph description into a laid-out diagram.

use thiserror::Error;

use super::model::PortDirection;

/// Reasons a graph description cannot be laid out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowGraphError {
	#[error("node name `{0}` is used more than once")]
	DuplicateNode(String),
	#[error("connection references unknown node `{0}`")]
	UnknownNode(String),
	#[error("node `{node}` has no {direction} port named `{port}`")]
	UnknownPort {
		node: String,
		port: String,
		direction: PortDirection,
	},
	/// Rank propagation kept improving past the node count, which only happens on a cycle.
	#[error("graph contains a cycle through node `{node}`")]
	Cycle { node: String },
}
