//! Damped collision simulation that pushes overlapping cards apart.
//!
//! Each tick every unordered pair of padded card boxes is tested. Overlapping
//! pairs receive equal and opposite impulses along the axis of least
//! penetration; everything else is left alone. Velocities decay every tick,
//! so motion dies out once the boxes stop overlapping.
//!
//! A temperature (`alpha`) cools geometrically toward `alpha_target`. Once it
//! drops below `alpha_min` the loop stops, unless padded boxes still overlap, in
//! which case it keeps ticking until they clear or `max_ticks` since the last
//! reheat is reached. Temperature only decides when to stop, it does not scale
//! the forces.

use log::{debug, warn};
use serde::Deserialize;

use super::metrics::{CardMetrics, Rect};
use super::model::{Graph, Vec2};

/// Tuning for the collision simulation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
	/// Impulse multiplier applied to normalised penetration depth.
	pub stiffness: f64,
	/// Fraction of velocity kept each tick.
	pub velocity_decay: f64,
	/// Temperature below which the simulation stops.
	pub alpha_min: f64,
	/// Ticks for a full cool-down from 1 to `alpha_min`.
	pub settle_ticks: u32,
	/// Wall-clock interval between ticks, in milliseconds.
	pub tick_ms: u32,
	/// Temperature held while a node is being dragged.
	pub drag_temperature: f64,
	/// Overlap, in graph units, still counted as settled.
	pub overlap_tolerance: f64,
	/// Ticks after a (re)heat past which remaining overlaps no longer keep it running.
	pub max_ticks: u64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			stiffness: 10.0,
			velocity_decay: 0.6,
			alpha_min: 0.001,
			settle_ticks: 300,
			tick_ms: 20,
			drag_temperature: 0.3,
			overlap_tolerance: 0.1,
			max_ticks: 10_000,
		}
	}
}

impl SimulationParameters {
	/// Per-tick decay that takes alpha from 1 to `alpha_min` in `settle_ticks`.
	pub fn alpha_decay(&self) -> f64 {
		1.0 - self.alpha_min.powf(1.0 / self.settle_ticks.max(1) as f64)
	}
}

/// Impulses for a pair of boxes, normalised by each box's extent on the push axis.
///
/// Returns zero vectors unless the boxes overlap on both axes.
pub fn collision_force(a: &Rect, b: &Rect) -> (Vec2, Vec2) {
	let left = b.max.x - a.min.x;
	let right = a.max.x - b.min.x;
	let top = b.max.y - a.min.y;
	let bottom = a.max.y - b.min.y;

	if !(left > 0.0 && right > 0.0 && top > 0.0 && bottom > 0.0) {
		return (Vec2::ZERO, Vec2::ZERO);
	}

	// Signed shift of `b` that would clear `a` on each axis, picking the shorter way out.
	let dx = if left > right { right } else { -left };
	let dy = if top > bottom { bottom } else { -top };

	if dx.abs() <= dy.abs() {
		(
			Vec2::new(-dx / a.width(), 0.0),
			Vec2::new(dx / b.width(), 0.0),
		)
	} else {
		(
			Vec2::new(0.0, -dy / a.height()),
			Vec2::new(0.0, dy / b.height()),
		)
	}
}

/// Cooling collision simulation over a [`Graph`].
#[derive(Clone, Debug)]
pub struct Simulation {
	params: SimulationParameters,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	heat_ticks: u64,
}

impl Simulation {
	/// A freshly heated simulation (alpha = 1).
	pub fn new(params: SimulationParameters) -> Self {
		Self {
			params,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			ticks: 0,
			heat_ticks: 0,
		}
	}

	pub fn params(&self) -> &SimulationParameters {
		&self.params
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Restart cooling from `alpha`.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = alpha;
		self.running = true;
		self.heat_ticks = 0;
		debug!("flow-graph: simulation reheated to {alpha:.2}");
	}

	/// A drag began: keep the graph gently warm until it ends.
	pub fn begin_drag(&mut self) {
		self.alpha_target = self.params.drag_temperature;
		self.reheat(self.params.drag_temperature);
	}

	/// A drag ended: cool down from full temperature.
	pub fn end_drag(&mut self) {
		self.alpha_target = 0.0;
		self.reheat(1.0);
	}

	/// Advance one step. Returns whether the simulation is still running afterwards.
	pub fn tick(&mut self, graph: &mut Graph, metrics: &CardMetrics) -> bool {
		if !self.running {
			return false;
		}
		self.ticks += 1;
		self.heat_ticks += 1;
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay();

		self.apply_collisions(graph, metrics);

		let decay = self.params.velocity_decay;
		for node in graph.nodes_mut() {
			if node.is_pinned() {
				node.velocity = Vec2::ZERO;
				continue;
			}
			node.velocity = node.velocity * decay;
			node.position += node.velocity;
		}

		if self.alpha < self.params.alpha_min {
			let crowded = !overlapping_pairs(graph, metrics, self.params.overlap_tolerance).is_empty();
			if !crowded {
				self.running = false;
				debug!("flow-graph: simulation settled after {} ticks", self.ticks);
			} else if self.heat_ticks >= self.params.max_ticks {
				self.running = false;
				warn!(
					"flow-graph: simulation stopped with overlapping cards after {} ticks",
					self.heat_ticks
				);
			}
		}
		self.running
	}

	/// Tick until cool and overlap-free, or capped. Returns the number of ticks taken.
	pub fn settle(&mut self, graph: &mut Graph, metrics: &CardMetrics) -> u64 {
		let start = self.ticks;
		while self.tick(graph, metrics) {}
		self.ticks - start
	}

	fn apply_collisions(&self, graph: &mut Graph, metrics: &CardMetrics) {
		let boxes: Vec<Rect> = graph
			.nodes()
			.iter()
			.map(|n| metrics.collision_box(n).translate(n.position))
			.collect();
		let stiffness = self.params.stiffness;
		let nodes = graph.nodes_mut();

		for i in 0..boxes.len() {
			for j in (i + 1)..boxes.len() {
				let (fa, fb) = collision_force(&boxes[i], &boxes[j]);
				nodes[i].velocity += fa * stiffness;
				nodes[j].velocity += fb * stiffness;
			}
		}
	}
}

/// Pairs of unpinned nodes whose padded boxes still overlap by more than `tolerance`.
pub fn overlapping_pairs(graph: &Graph, metrics: &CardMetrics, tolerance: f64) -> Vec<(usize, usize)> {
	let boxes: Vec<Rect> = graph
		.nodes()
		.iter()
		.map(|n| metrics.collision_box(n).translate(n.position))
		.collect();
	let mut pairs = Vec::new();
	for i in 0..boxes.len() {
		for j in (i + 1)..boxes.len() {
			let pinned = graph.nodes()[i].is_pinned() || graph.nodes()[j].is_pinned();
			if !pinned && boxes[i].overlaps(&boxes[j], tolerance) {
				pairs.push((i, j));
			}
		}
	}
	pairs
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::model::NodeId;
	use crate::components::flow_graph::types::{FlowNode, GraphData};

	fn stacked(count: usize) -> Graph {
		let data = GraphData {
			title: String::new(),
			nodes: (0..count)
				.map(|i| FlowNode::new(format!("n{i}"), ["in"], ["out"]))
				.collect(),
			connections: Vec::new(),
		};
		Graph::from_data(&data).unwrap()
	}

	fn square(x: f64, y: f64) -> Rect {
		Rect::new(Vec2::new(x, y), Vec2::new(x + 10.0, y + 10.0))
	}

	#[test]
	fn separated_boxes_feel_nothing() {
		let (fa, fb) = collision_force(&square(0.0, 0.0), &square(20.0, 0.0));
		assert_eq!(fa, Vec2::ZERO);
		assert_eq!(fb, Vec2::ZERO);

		// overlapping on x only
		let (fa, _) = collision_force(&square(0.0, 0.0), &square(5.0, 30.0));
		assert_eq!(fa, Vec2::ZERO);
	}

	#[test]
	fn pushes_along_shallower_axis() {
		// 2 units of x overlap, 8 of y
		let (fa, fb) = collision_force(&square(0.0, 0.0), &square(8.0, 2.0));
		assert_eq!(fa, Vec2::new(-0.2, 0.0));
		assert_eq!(fb, Vec2::new(0.2, 0.0));

		// 7 units of x overlap, 1 of y, b above a
		let (fa, fb) = collision_force(&square(0.0, 0.0), &square(3.0, -9.0));
		assert_eq!(fa, Vec2::new(0.0, 0.1));
		assert_eq!(fb, Vec2::new(0.0, -0.1));
	}

	#[test]
	fn forces_are_equal_and_opposite_for_equal_boxes() {
		let (fa, fb) = collision_force(&square(0.0, 0.0), &square(1.0, 4.0));
		assert_eq!(fa + fb, Vec2::ZERO);
	}

	#[test]
	fn cooling_schedule_halts() {
		let mut graph = stacked(1);
		let metrics = CardMetrics::default();
		let mut sim = Simulation::new(SimulationParameters::default());

		let ticks = sim.settle(&mut graph, &metrics);

		assert!(!sim.is_running());
		assert!(sim.alpha() < sim.params().alpha_min);
		assert!((295..=305).contains(&ticks), "took {ticks} ticks");
		assert!(!sim.tick(&mut graph, &metrics));
	}

	#[test]
	fn settles_stacked_cards_without_overlap() {
		let mut graph = stacked(4);
		let metrics = CardMetrics::default();
		let mut sim = Simulation::new(SimulationParameters::default());

		sim.settle(&mut graph, &metrics);

		assert!(overlapping_pairs(&graph, &metrics, 0.5).is_empty());
	}

	#[test]
	fn keeps_ticking_until_a_tall_stack_clears() {
		let mut graph = stacked(12);
		let metrics = CardMetrics::default();
		let params = SimulationParameters::default();
		let mut sim = Simulation::new(params.clone());

		let ticks = sim.settle(&mut graph, &metrics);

		assert!(!sim.is_running());
		assert!(ticks > params.settle_ticks as u64, "took {ticks} ticks");
		assert!(ticks < params.max_ticks, "hit the cap after {ticks} ticks");
		assert!(overlapping_pairs(&graph, &metrics, 0.5).is_empty());
	}

	#[test]
	fn tick_cap_stops_an_unresolvable_stack() {
		let mut graph = stacked(12);
		let metrics = CardMetrics::default();
		let mut sim = Simulation::new(SimulationParameters {
			stiffness: 0.0,
			max_ticks: 400,
			..SimulationParameters::default()
		});

		let ticks = sim.settle(&mut graph, &metrics);

		assert_eq!(ticks, 400);
		assert!(!sim.is_running());
		assert!(!overlapping_pairs(&graph, &metrics, 0.5).is_empty());
	}

	#[test]
	fn pinned_node_is_an_obstacle() {
		let mut graph = stacked(2);
		let metrics = CardMetrics::default();
		let mut sim = Simulation::new(SimulationParameters::default());
		let anchor = Vec2::new(5.0, 5.0);
		graph.node_mut(NodeId(0)).position = anchor;
		graph.node_mut(NodeId(0)).pin();

		for _ in 0..50 {
			sim.tick(&mut graph, &metrics);
			assert_eq!(graph.node(NodeId(0)).position, anchor);
			assert_eq!(graph.node(NodeId(0)).velocity, Vec2::ZERO);
		}
		sim.settle(&mut graph, &metrics);

		let a = metrics.collision_box(graph.node(NodeId(0))).translate(anchor);
		let b = metrics
			.collision_box(graph.node(NodeId(1)))
			.translate(graph.node(NodeId(1)).position);
		assert!(!a.overlaps(&b, 0.5));
	}

	#[test]
	fn drag_keeps_simulation_warm() {
		let mut graph = stacked(1);
		let metrics = CardMetrics::default();
		let mut sim = Simulation::new(SimulationParameters::default());

		sim.begin_drag();
		assert_eq!(sim.alpha(), 0.3);
		for _ in 0..2000 {
			assert!(sim.tick(&mut graph, &metrics));
		}

		sim.end_drag();
		assert_eq!(sim.alpha(), 1.0);
		sim.settle(&mut graph, &metrics);
		assert!(!sim.is_running());
	}

	#[test]
	fn alpha_decay_matches_schedule() {
		let params = SimulationParameters::default();
		let decay = params.alpha_decay();
		let after = (1.0 - decay).powi(params.settle_ticks as i32);

		assert!((after - params.alpha_min).abs() < 1e-9);
	}
}
