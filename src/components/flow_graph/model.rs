//! In-memory graph model shared by placement, simulation and rendering.
//!
//! Topology (nodes, ports, edges) is fixed once the graph is built; only the
//! per-node position, velocity and pin state change afterwards.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

use indexmap::IndexMap;

use super::error::FlowGraphError;
use super::types::GraphData;

/// A 2-D point or vector in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl Add for Vec2 {
	type Output = Vec2;

	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Vec2 {
	type Output = Vec2;

	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;

	fn mul(self, rhs: f64) -> Vec2 {
		Vec2::new(self.x * rhs, self.y * rhs)
	}
}

/// Dense index of a node inside its [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Which side of a node a port sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortDirection {
	Input,
	Output,
}

impl fmt::Display for PortDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PortDirection::Input => f.write_str("input"),
			PortDirection::Output => f.write_str("output"),
		}
	}
}

/// A port identified by its owning node, side, and index among that side's ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortRef {
	pub node: NodeId,
	pub direction: PortDirection,
	pub index: usize,
}

/// A directed edge from an output port to an input port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	pub source: PortRef,
	pub target: PortRef,
}

impl Edge {
	pub fn is_self_loop(&self) -> bool {
		self.source.node == self.target.node
	}
}

/// Who currently owns a node's position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeState {
	/// Moved by the collision simulation.
	#[default]
	Settling,
	/// Held by the pointer; the simulation treats it as an immovable obstacle.
	Pinned,
}

/// A node card with its ports and live simulation state.
#[derive(Clone, Debug)]
pub struct Node {
	name: String,
	inputs: Vec<String>,
	outputs: Vec<String>,
	pub position: Vec2,
	pub velocity: Vec2,
	state: NodeState,
}

impl Node {
	fn new(name: String, inputs: Vec<String>, outputs: Vec<String>) -> Self {
		Self {
			name,
			inputs,
			outputs,
			position: Vec2::ZERO,
			velocity: Vec2::ZERO,
			state: NodeState::Settling,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn inputs(&self) -> &[String] {
		&self.inputs
	}

	pub fn outputs(&self) -> &[String] {
		&self.outputs
	}

	pub fn ports(&self, direction: PortDirection) -> &[String] {
		match direction {
			PortDirection::Input => &self.inputs,
			PortDirection::Output => &self.outputs,
		}
	}

	/// Number of slot rows on the card (the taller of the two port columns).
	pub fn slot_rows(&self) -> usize {
		self.inputs.len().max(self.outputs.len())
	}

	pub fn state(&self) -> NodeState {
		self.state
	}

	pub fn is_pinned(&self) -> bool {
		self.state == NodeState::Pinned
	}

	/// Hand the node to the pointer. Velocity is dropped so no momentum survives the drag.
	pub fn pin(&mut self) {
		self.state = NodeState::Pinned;
		self.velocity = Vec2::ZERO;
	}

	/// Return the node to the simulation.
	pub fn unpin(&mut self) {
		self.state = NodeState::Settling;
	}
}

/// Nodes plus edges, with deduplicated adjacency precomputed.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	ids: IndexMap<String, NodeId>,
	successors: Vec<Vec<NodeId>>,
	predecessors: Vec<Vec<NodeId>>,
}

impl Graph {
	/// Resolve names in a graph description into a graph.
	///
	/// Fails on duplicate node names and on connections naming nodes or ports
	/// that do not exist; past this point every edge endpoint is valid.
	pub fn from_data(data: &GraphData) -> Result<Self, FlowGraphError> {
		let mut ids = IndexMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for node in &data.nodes {
			let id = NodeId(nodes.len());
			if ids.insert(node.name.clone(), id).is_some() {
				return Err(FlowGraphError::DuplicateNode(node.name.clone()));
			}
			nodes.push(Node::new(
				node.name.clone(),
				node.inputs.clone(),
				node.outputs.clone(),
			));
		}

		let resolve = |name: &str, slot: &str, direction: PortDirection| {
			let node = *ids
				.get(name)
				.ok_or_else(|| FlowGraphError::UnknownNode(name.to_string()))?;
			let index = nodes[node.0]
				.ports(direction)
				.iter()
				.position(|p| p == slot)
				.ok_or_else(|| FlowGraphError::UnknownPort {
					node: name.to_string(),
					port: slot.to_string(),
					direction,
				})?;
			Ok::<_, FlowGraphError>(PortRef {
				node,
				direction,
				index,
			})
		};

		let edges = data
			.connections
			.iter()
			.map(|c| {
				Ok(Edge {
					source: resolve(&c.out, &c.out_slot, PortDirection::Output)?,
					target: resolve(&c.input, &c.in_slot, PortDirection::Input)?,
				})
			})
			.collect::<Result<Vec<_>, FlowGraphError>>()?;

		let mut successors = vec![Vec::new(); nodes.len()];
		let mut predecessors = vec![Vec::new(); nodes.len()];
		for edge in &edges {
			let (from, to) = (edge.source.node, edge.target.node);
			if !successors[from.0].contains(&to) {
				successors[from.0].push(to);
			}
			if !predecessors[to.0].contains(&from) {
				predecessors[to.0].push(from);
			}
		}

		Ok(Self {
			nodes,
			edges,
			ids,
			successors,
			predecessors,
		})
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
		(0..self.nodes.len()).map(NodeId)
	}

	pub fn node_id(&self, name: &str) -> Option<NodeId> {
		self.ids.get(name).copied()
	}

	pub fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Distinct nodes reachable through one edge leaving `id`, in first-seen order.
	pub fn successors(&self, id: NodeId) -> &[NodeId] {
		&self.successors[id.0]
	}

	/// Distinct nodes with an edge arriving at `id`, in first-seen order.
	pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
		&self.predecessors[id.0]
	}

	pub fn port_name(&self, port: PortRef) -> &str {
		&self.node(port.node).ports(port.direction)[port.index]
	}
}
