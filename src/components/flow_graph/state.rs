//! Diagram session state and pointer interaction.
//!
//! One [`FlowGraphState`] owns everything a diagram needs: the graph, the
//! collision simulation, and the pan/zoom transform. The simulation timer and
//! the pointer handlers take turns mutating it on the single UI thread; each
//! entry point reports whether the scene changed so the caller knows to redraw.

use log::{debug, info};
use serde::Deserialize;

use super::collision::Simulation;
use super::config::FlowGraphConfig;
use super::error::FlowGraphError;
use super::metrics::CardMetrics;
use super::model::{Graph, NodeId, Vec2};
use super::placement;
use super::types::GraphData;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, screen: Vec2) -> Vec2 {
		Vec2::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, graph: Vec2) -> Vec2 {
		Vec2::new(graph.x * self.k + self.x, graph.y * self.k + self.y)
	}

	/// Change zoom to `k` while keeping the graph point under `anchor` fixed on screen.
	pub fn zoom_at(&mut self, anchor: Vec2, k: f64) {
		let ratio = k / self.k;
		self.x = anchor.x - (anchor.x - self.x) * ratio;
		self.y = anchor.y - (anchor.y - self.y) * ratio;
		self.k = k;
	}
}

/// Zoom bounds and the per-notch wheel ratio.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Zoom multiplier per wheel notch toward the viewer.
	pub zoom_step: f64,
}

impl Default for ZoomLimits {
	fn default() -> Self {
		Self {
			min_zoom: 0.1,
			max_zoom: 3.0,
			zoom_step: 1.1,
		}
	}
}

/// What the pointer is currently doing.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
	#[default]
	Idle,
	/// Dragging the background: the view follows the pointer.
	Panning { start: Vec2, view_start: Vec2 },
	/// Dragging a node card: the node is pinned and follows the pointer.
	Dragging {
		node: NodeId,
		start: Vec2,
		node_start: Vec2,
	},
}

/// Everything one diagram needs, owned in one place.
pub struct FlowGraphState {
	pub graph: Graph,
	pub metrics: CardMetrics,
	pub simulation: Simulation,
	pub transform: ViewTransform,
	pub zoom: ZoomLimits,
	pub interaction: Interaction,
	pub width: f64,
	pub height: f64,
	/// Paint order, back to front. The last dragged node is drawn on top.
	draw_order: Vec<NodeId>,
}

impl FlowGraphState {
	/// Build the graph, place it by rank, and start the simulation.
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		config: &FlowGraphConfig,
	) -> Result<Self, FlowGraphError> {
		let mut graph = Graph::from_data(data)?;
		let ranks = placement::place(&graph)?;
		let metrics = config.metrics.clone();

		for (node, position) in graph
			.nodes_mut()
			.iter_mut()
			.zip(ranks.positions(metrics.rank_width()))
		{
			node.position = position;
		}
		info!(
			"flow-graph: {} nodes, {} edges placed",
			graph.len(),
			graph.edges().len()
		);

		let draw_order = graph.node_ids().collect();
		Ok(Self {
			transform: ViewTransform {
				x: (width - metrics.node_width) / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			graph,
			metrics,
			simulation: Simulation::new(config.simulation.clone()),
			zoom: config.zoom.clone(),
			interaction: Interaction::Idle,
			width,
			height,
			draw_order,
		})
	}

	pub fn draw_order(&self) -> &[NodeId] {
		&self.draw_order
	}

	pub fn is_animating(&self) -> bool {
		self.simulation.is_running()
	}

	/// Topmost card under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let p = self.transform.screen_to_graph(Vec2::new(sx, sy));
		self.draw_order
			.iter()
			.rev()
			.copied()
			.find(|&id| self.metrics.card_rect(self.graph.node(id)).contains(p))
	}

	/// Advance the simulation one step. Returns whether anything moved.
	pub fn tick(&mut self) -> bool {
		if !self.simulation.is_running() {
			return false;
		}
		self.simulation.tick(&mut self.graph, &self.metrics);
		true
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> bool {
		let start = Vec2::new(sx, sy);
		match self.node_at_position(sx, sy) {
			Some(id) => {
				let node = self.graph.node_mut(id);
				node.pin();
				let node_start = node.position;
				debug!("flow-graph: drag start on `{}`", node.name());

				self.raise(id);
				self.simulation.begin_drag();
				self.interaction = Interaction::Dragging {
					node: id,
					start,
					node_start,
				};
			}
			None => {
				self.interaction = Interaction::Panning {
					start,
					view_start: Vec2::new(self.transform.x, self.transform.y),
				};
			}
		}
		true
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> bool {
		let p = Vec2::new(sx, sy);
		match self.interaction {
			Interaction::Idle => false,
			Interaction::Panning { start, view_start } => {
				self.transform.x = view_start.x + (p.x - start.x);
				self.transform.y = view_start.y + (p.y - start.y);
				true
			}
			Interaction::Dragging {
				node,
				start,
				node_start,
			} => {
				self.graph.node_mut(node).position = node_start + (p - start) * (1.0 / self.transform.k);
				true
			}
		}
	}

	/// End any pan or drag. Releasing a node hands it back to the simulation at full heat.
	pub fn pointer_up(&mut self) -> bool {
		match std::mem::take(&mut self.interaction) {
			Interaction::Idle => false,
			Interaction::Panning { .. } => true,
			Interaction::Dragging { node, .. } => {
				let node = self.graph.node_mut(node);
				node.unpin();
				debug!("flow-graph: drag end on `{}`", node.name());
				self.simulation.end_drag();
				true
			}
		}
	}

	/// Zoom one notch around the pointer. Negative `delta_y` zooms in.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) -> bool {
		if delta_y == 0.0 {
			return false;
		}
		let factor = if delta_y < 0.0 {
			self.zoom.zoom_step
		} else {
			1.0 / self.zoom.zoom_step
		};
		let k = (self.transform.k * factor).clamp(self.zoom.min_zoom, self.zoom.max_zoom);
		if k == self.transform.k {
			return false;
		}
		self.transform.zoom_at(Vec2::new(sx, sy), k);
		true
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn raise(&mut self, id: NodeId) {
		self.draw_order.retain(|&n| n != id);
		self.draw_order.push(id);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::model::NodeState;
	use crate::components::flow_graph::types::{FlowConnection, FlowNode};

	fn chain() -> FlowGraphState {
		let data = GraphData {
			title: "chain".into(),
			nodes: vec![
				FlowNode::new("A", Vec::<String>::new(), ["o"]),
				FlowNode::new("B", ["i"], ["o2"]),
				FlowNode::new("C", ["i2"], Vec::<String>::new()),
			],
			connections: vec![
				FlowConnection::new("A", "o", "B", "i"),
				FlowConnection::new("B", "o2", "C", "i2"),
			],
		};
		FlowGraphState::new(&data, 800.0, 600.0, &FlowGraphConfig::default()).unwrap()
	}

	fn screen_of(state: &FlowGraphState, id: NodeId) -> Vec2 {
		// a point just inside the card's title bar
		let pos = state.graph.node(id).position + Vec2::new(20.0, 10.0);
		state.transform.graph_to_screen(pos)
	}

	#[test]
	fn initial_positions_follow_ranks() {
		let state = chain();
		let xs: Vec<f64> = state.graph.nodes().iter().map(|n| n.position.x).collect();

		assert_eq!(xs, vec![-272.0, 0.0, 272.0]);
		assert!(state.graph.nodes().iter().all(|n| n.position.y == 0.0));
		assert_eq!(state.transform, ViewTransform { x: 315.0, y: 300.0, k: 1.0 });
	}

	#[test]
	fn zoom_keeps_point_under_pointer() {
		let mut state = chain();
		let pointer = Vec2::new(123.0, 456.0);
		let before = state.transform.screen_to_graph(pointer);

		assert!(state.wheel(pointer.x, pointer.y, -1.0));
		let after_in = state.transform.screen_to_graph(pointer);
		assert!((after_in.x - before.x).abs() < 1e-9);
		assert!((after_in.y - before.y).abs() < 1e-9);

		assert!(state.wheel(pointer.x, pointer.y, 3.0));
		assert!(state.wheel(pointer.x, pointer.y, 3.0));
		let after_out = state.transform.screen_to_graph(pointer);
		assert!((after_out.x - before.x).abs() < 1e-9);
		assert!((after_out.y - before.y).abs() < 1e-9);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = chain();
		for _ in 0..100 {
			state.wheel(0.0, 0.0, -1.0);
		}
		assert_eq!(state.transform.k, state.zoom.max_zoom);
		assert!(!state.wheel(0.0, 0.0, -1.0));

		for _ in 0..200 {
			state.wheel(0.0, 0.0, 1.0);
		}
		assert_eq!(state.transform.k, state.zoom.min_zoom);
	}

	#[test]
	fn background_drag_pans_view() {
		let mut state = chain();
		let (x0, y0) = (state.transform.x, state.transform.y);

		assert!(state.pointer_down(5.0, 5.0));
		assert!(matches!(state.interaction, Interaction::Panning { .. }));
		assert!(state.pointer_move(25.0, -5.0));
		assert_eq!((state.transform.x, state.transform.y), (x0 + 20.0, y0 - 10.0));

		assert!(state.pointer_up());
		assert_eq!(state.interaction, Interaction::Idle);
		assert!(!state.pointer_move(100.0, 100.0));
	}

	#[test]
	fn node_drag_pins_and_follows_pointer_through_zoom() {
		let mut state = chain();
		state.wheel(400.0, 300.0, -1.0);
		let b = state.graph.node_id("B").unwrap();
		let start = screen_of(&state, b);
		let origin = state.graph.node(b).position;

		assert!(state.pointer_down(start.x, start.y));
		assert_eq!(state.graph.node(b).state(), NodeState::Pinned);
		assert_eq!(state.draw_order().last(), Some(&b));

		let k = state.transform.k;
		state.pointer_move(start.x + 11.0 * k, start.y - 33.0 * k);
		let moved = state.graph.node(b).position;
		assert!((moved.x - (origin.x + 11.0)).abs() < 1e-9);
		assert!((moved.y - (origin.y - 33.0)).abs() < 1e-9);

		for _ in 0..20 {
			state.tick();
			assert_eq!(state.graph.node(b).position, moved);
		}

		state.pointer_up();
		assert_eq!(state.graph.node(b).state(), NodeState::Settling);
		assert_eq!(state.simulation.alpha(), 1.0);
		assert!(state.is_animating());
	}

	#[test]
	fn drag_start_reheats_gently() {
		let mut state = chain();
		state.simulation.settle(&mut state.graph, &state.metrics);
		assert!(!state.tick());

		let a = state.graph.node_id("A").unwrap();
		let p = screen_of(&state, a);
		state.pointer_down(p.x, p.y);

		assert!(state.is_animating());
		assert_eq!(state.simulation.alpha(), state.simulation.params().drag_temperature);
	}

	#[test]
	fn hit_test_prefers_topmost_card() {
		let mut state = chain();
		let a = state.graph.node_id("A").unwrap();
		let c = state.graph.node_id("C").unwrap();
		state.graph.node_mut(a).position = state.graph.node(c).position;
		let p = screen_of(&state, c);

		assert_eq!(state.node_at_position(p.x, p.y), Some(c));
		state.raise(a);
		assert_eq!(state.node_at_position(p.x, p.y), Some(a));
		assert_eq!(state.node_at_position(-5000.0, -5000.0), None);
	}
}
