//! Topological placement: an initial horizontal rank per node from reachability alone.
//!
//! Ranks are longest-path layers pushed rightward from sources, then pulled
//! leftward from sinks, then centered on zero. Card sizes play no part here;
//! overlap is left to the collision simulation.
//!
//! Input is expected to be acyclic. Propagation runs on a FIFO worklist that
//! only re-enqueues a node when its rank strictly improves, so on a DAG every
//! node is relaxed fewer than `n` times. A node relaxed more often than that
//! sits on a cycle, and placement reports it instead of looping.

use std::collections::VecDeque;

use log::debug;

use super::error::FlowGraphError;
use super::model::{Graph, NodeId, Vec2};

/// Centered ranks, one per node, indexed by [`NodeId`].
#[derive(Clone, Debug, PartialEq)]
pub struct Ranks(Vec<f64>);

impl Ranks {
	pub fn get(&self, id: NodeId) -> f64 {
		self.0[id.0]
	}

	pub fn as_slice(&self) -> &[f64] {
		&self.0
	}

	/// Pixel position for each node: ranks scaled by `spacing` on x, all on y = 0.
	pub fn positions(&self, spacing: f64) -> impl Iterator<Item = Vec2> + '_ {
		self.0.iter().map(move |&r| Vec2::new(r * spacing, 0.0))
	}
}

#[derive(Clone, Copy)]
enum Pass {
	Forward,
	Backward,
}

/// Nodes with no predecessors other than themselves.
pub fn sources(graph: &Graph) -> Vec<NodeId> {
	graph
		.node_ids()
		.filter(|&id| graph.predecessors(id).iter().all(|&p| p == id))
		.collect()
}

/// Nodes with no successors other than themselves.
pub fn sinks(graph: &Graph) -> Vec<NodeId> {
	graph
		.node_ids()
		.filter(|&id| graph.successors(id).iter().all(|&s| s == id))
		.collect()
}

/// Forward pass alone: longest distance from any source, `None` where unreachable.
pub fn forward_ranks(graph: &Graph) -> Result<Vec<Option<i64>>, FlowGraphError> {
	let mut ranks = vec![None; graph.len()];
	let sources = sources(graph);
	for &id in &sources {
		ranks[id.0] = Some(0);
	}
	propagate(graph, &mut ranks, sources, Pass::Forward)?;
	Ok(ranks)
}

/// Assign every node a centered horizontal rank.
pub fn place(graph: &Graph) -> Result<Ranks, FlowGraphError> {
	let mut ranks = forward_ranks(graph)?;

	let sinks = sinks(graph);
	for &id in &sinks {
		ranks[id.0].get_or_insert(0);
	}
	propagate(graph, &mut ranks, sinks, Pass::Backward)?;

	let resolved: Vec<i64> = ranks.into_iter().map(|r| r.unwrap_or(0)).collect();
	let centered = center(&resolved);
	debug!(
		"flow-graph: placed {} nodes across {} ranks",
		graph.len(),
		span(&resolved)
	);
	Ok(Ranks(centered))
}

/// Shift ranks so the midpoint of the extremes lands on zero.
pub fn center(ranks: &[i64]) -> Vec<f64> {
	let (Some(&min), Some(&max)) = (ranks.iter().min(), ranks.iter().max()) else {
		return Vec::new();
	};
	let mid = (min + max) as f64 / 2.0;
	ranks.iter().map(|&r| r as f64 - mid).collect()
}

fn span(ranks: &[i64]) -> i64 {
	match (ranks.iter().min(), ranks.iter().max()) {
		(Some(min), Some(max)) => max - min + 1,
		_ => 0,
	}
}

fn propagate(
	graph: &Graph,
	ranks: &mut [Option<i64>],
	seeds: Vec<NodeId>,
	pass: Pass,
) -> Result<(), FlowGraphError> {
	let limit = graph.len();
	let mut relaxations = vec![0usize; graph.len()];
	let mut queued = vec![false; graph.len()];
	let mut queue: VecDeque<NodeId> = seeds.into_iter().collect();
	for id in &queue {
		queued[id.0] = true;
	}

	while let Some(n) = queue.pop_front() {
		queued[n.0] = false;
		let Some(rank) = ranks[n.0] else {
			continue;
		};
		let neighbours = match pass {
			Pass::Forward => graph.successors(n),
			Pass::Backward => graph.predecessors(n),
		};

		for &u in neighbours {
			if u == n {
				continue;
			}
			let improved = match (pass, ranks[u.0]) {
				(_, None) => true,
				(Pass::Forward, Some(current)) => rank + 1 > current,
				(Pass::Backward, Some(current)) => rank - 1 < current,
			};
			if !improved {
				continue;
			}

			ranks[u.0] = Some(match pass {
				Pass::Forward => rank + 1,
				Pass::Backward => rank - 1,
			});
			relaxations[u.0] += 1;
			if relaxations[u.0] > limit {
				return Err(FlowGraphError::Cycle {
					node: graph.node(u).name().to_string(),
				});
			}
			if !queued[u.0] {
				queued[u.0] = true;
				queue.push_back(u);
			}
		}
	}
	Ok(())
}
