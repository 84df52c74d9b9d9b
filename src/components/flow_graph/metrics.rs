//! Card geometry shared by the collision simulation and the renderer.
//!
//! # Coordinate Spaces
//!
//! - **Node-local**: origin at the top-left corner of a card. Port offsets and
//!   collision boxes are expressed here.
//! - **Graph-space**: node-local plus the node's position. Everything the
//!   simulation touches lives here; the view transform maps it to the screen.

use serde::Deserialize;

use super::model::{Graph, Node, PortDirection, PortRef, Vec2};

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub min: Vec2,
	pub max: Vec2,
}

impl Rect {
	pub const fn new(min: Vec2, max: Vec2) -> Self {
		Self { min, max }
	}

	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}

	pub fn translate(&self, by: Vec2) -> Rect {
		Rect::new(self.min + by, self.max + by)
	}

	pub fn contains(&self, p: Vec2) -> bool {
		p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
	}

	/// True when the rectangles overlap by more than `tolerance` on both axes.
	pub fn overlaps(&self, other: &Rect, tolerance: f64) -> bool {
		let x = (self.max.x.min(other.max.x)) - (self.min.x.max(other.min.x));
		let y = (self.max.y.min(other.max.y)) - (self.min.y.max(other.min.y));
		x > tolerance && y > tolerance
	}
}

/// Cubic Bézier from an output port to an input port.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
	pub from: Vec2,
	pub ctrl1: Vec2,
	pub ctrl2: Vec2,
	pub to: Vec2,
}

/// Card dimensions in graph-space units.
///
/// Width is fixed; height grows with the taller port column. The collision box
/// pads the card so port circles and a margin never touch a neighbour.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CardMetrics {
	pub node_width: f64,
	/// Margin kept clear around each card during collision resolution.
	pub node_padding: f64,
	/// Height of one port row.
	pub slot_height: f64,
	pub slot_radius: f64,
	pub title_height: f64,
	/// Gap between the title separator and the first port row.
	pub separator_height: f64,
	/// Number of dashes in the title separator.
	pub separator_count: u32,
	/// Horizontal distance from each edge endpoint to its Bézier control point.
	pub edge_tangent: f64,
	/// Horizontal distance between ranks, as a multiple of `node_width`.
	pub rank_spacing: f64,
}

impl Default for CardMetrics {
	fn default() -> Self {
		Self {
			node_width: 170.0,
			node_padding: 10.0,
			slot_height: 40.0,
			slot_radius: 10.0,
			title_height: 40.0,
			separator_height: 10.0,
			separator_count: 8,
			edge_tangent: 60.0,
			rank_spacing: 1.6,
		}
	}
}

impl CardMetrics {
	/// Pixels between adjacent ranks.
	pub fn rank_width(&self) -> f64 {
		self.rank_spacing * self.node_width
	}

	/// Y offset of the first port row.
	fn slots_top(&self) -> f64 {
		self.title_height + self.separator_height
	}

	pub fn card_height(&self, node: &Node) -> f64 {
		self.slots_top() + self.slot_height * node.slot_rows() as f64
	}

	/// The visible card in graph space; used for hit testing.
	pub fn card_rect(&self, node: &Node) -> Rect {
		Rect::new(
			Vec2::ZERO,
			Vec2::new(self.node_width, self.card_height(node)),
		)
		.translate(node.position)
	}

	/// Padded collision box, node-local.
	pub fn collision_box(&self, node: &Node) -> Rect {
		let pad_x = self.node_padding + 2.0 * self.slot_radius;
		let pad_y = self.node_padding + self.slot_radius;
		Rect::new(
			Vec2::new(-pad_x, -pad_y),
			Vec2::new(self.node_width + pad_x, self.card_height(node) + pad_y),
		)
	}

	/// Centre of a port circle, node-local.
	pub fn port_offset(&self, direction: PortDirection, index: usize) -> Vec2 {
		let x = match direction {
			PortDirection::Input => 0.0,
			PortDirection::Output => self.node_width,
		};
		let y = self.slots_top() + self.slot_height * index as f64 + self.slot_height / 2.0;
		Vec2::new(x, y)
	}

	/// Centre of a port circle in graph space.
	pub fn port_position(&self, graph: &Graph, port: PortRef) -> Vec2 {
		graph.node(port.node).position + self.port_offset(port.direction, port.index)
	}

	pub fn edge_curve(&self, from: Vec2, to: Vec2) -> EdgeCurve {
		EdgeCurve {
			from,
			ctrl1: Vec2::new(from.x + self.edge_tangent, from.y),
			ctrl2: Vec2::new(to.x - self.edge_tangent, to.y),
			to,
		}
	}

	/// Dash length for the title separator so `separator_count` dashes span it.
	pub fn separator_dash(&self) -> f64 {
		let count = self.separator_count.max(1) as f64;
		(self.node_width - 2.0 * self.slot_radius) / (2.0 * count - 1.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::types::{FlowConnection, FlowNode, GraphData};

	fn sample() -> Graph {
		let data = GraphData {
			title: String::new(),
			nodes: vec![
				FlowNode::new("add", ["x", "y"], ["value", "u", "v", "w"]),
				FlowNode::new("final", ["w"], Vec::<String>::new()),
			],
			connections: vec![FlowConnection::new("add", "u", "final", "w")],
		};
		Graph::from_data(&data).unwrap()
	}

	#[test]
	fn card_height_follows_taller_column() {
		let graph = sample();
		let metrics = CardMetrics::default();

		assert_eq!(metrics.card_height(graph.node(graph.node_id("add").unwrap())), 210.0);
		assert_eq!(metrics.card_height(graph.node(graph.node_id("final").unwrap())), 90.0);
	}

	#[test]
	fn collision_box_pads_card() {
		let graph = sample();
		let metrics = CardMetrics::default();
		let bbox = metrics.collision_box(graph.node(graph.node_id("final").unwrap()));

		assert_eq!(bbox.min, Vec2::new(-30.0, -20.0));
		assert_eq!(bbox.max, Vec2::new(200.0, 110.0));
		assert_eq!(bbox.width(), 230.0);
	}

	#[test]
	fn ports_sit_on_card_sides() {
		let metrics = CardMetrics::default();

		assert_eq!(
			metrics.port_offset(PortDirection::Input, 0),
			Vec2::new(0.0, 70.0)
		);
		assert_eq!(
			metrics.port_offset(PortDirection::Output, 2),
			Vec2::new(170.0, 150.0)
		);
	}

	#[test]
	fn port_position_follows_node() {
		let mut graph = sample();
		let metrics = CardMetrics::default();
		let edge = graph.edges()[0];
		graph.node_mut(edge.source.node).position = Vec2::new(100.0, -50.0);

		assert_eq!(
			metrics.port_position(&graph, edge.source),
			Vec2::new(270.0, 60.0)
		);
	}

	#[test]
	fn edge_tangents_are_horizontal_and_fixed() {
		let metrics = CardMetrics::default();
		let curve = metrics.edge_curve(Vec2::new(0.0, 0.0), Vec2::new(-500.0, 300.0));

		assert_eq!(curve.ctrl1, Vec2::new(60.0, 0.0));
		assert_eq!(curve.ctrl2, Vec2::new(-560.0, 300.0));
	}

	#[test]
	fn rect_overlap_respects_tolerance() {
		let a = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
		let touching = a.translate(Vec2::new(10.0, 0.0));
		let nested = a.translate(Vec2::new(5.0, 5.0));

		assert!(!a.overlaps(&touching, 1e-6));
		assert!(a.overlaps(&nested, 1e-6));
		assert!(a.contains(Vec2::new(10.0, 0.0)));
	}

	#[test]
	fn separator_dashes_span_card() {
		let metrics = CardMetrics::default();
		assert_eq!(metrics.separator_dash(), 10.0);
	}
}
