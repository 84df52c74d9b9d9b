//! Graph description consumed from the host page.
//!
//! Field names mirror the structure streamed by graph producers: every node
//! carries a name and its port names, every connection names both endpoint
//! nodes and slots.

use serde::Deserialize;

/// A node as described by the producer.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlowNode {
	/// Unique name. Used both as topology key and as the card title.
	pub name: String,
	/// Input slot names, top to bottom.
	#[serde(default)]
	pub inputs: Vec<String>,
	/// Output slot names, top to bottom.
	#[serde(default)]
	pub outputs: Vec<String>,
}

impl FlowNode {
	pub fn new<I, O, S1, S2>(name: impl Into<String>, inputs: I, outputs: O) -> Self
	where
		I: IntoIterator<Item = S1>,
		O: IntoIterator<Item = S2>,
		S1: Into<String>,
		S2: Into<String>,
	{
		Self {
			name: name.into(),
			inputs: inputs.into_iter().map(Into::into).collect(),
			outputs: outputs.into_iter().map(Into::into).collect(),
		}
	}
}

/// A directed connection from an output slot to an input slot.
#[derive(Clone, Debug, Deserialize)]
pub struct FlowConnection {
	/// Source node name.
	pub out: String,
	/// Output slot on the source node.
	pub out_slot: String,
	/// Destination node name.
	#[serde(rename = "in")]
	pub input: String,
	/// Input slot on the destination node.
	pub in_slot: String,
}

impl FlowConnection {
	pub fn new(
		out: impl Into<String>,
		out_slot: impl Into<String>,
		input: impl Into<String>,
		in_slot: impl Into<String>,
	) -> Self {
		Self {
			out: out.into(),
			out_slot: out_slot.into(),
			input: input.into(),
			in_slot: in_slot.into(),
		}
	}
}

/// Complete graph description: title, nodes and connections.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub nodes: Vec<FlowNode>,
	#[serde(default)]
	pub connections: Vec<FlowConnection>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_producer_field_names() {
		let json = r#"{
			"title": "Test",
			"nodes": [
				{ "name": "plop", "inputs": [], "outputs": ["val"] },
				{ "name": "modif", "inputs": ["vv", "uu"], "outputs": ["value"] }
			],
			"connections": [
				{ "out": "plop", "out_slot": "val", "in": "modif", "in_slot": "uu" }
			]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();

		assert_eq!(data.title, "Test");
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[1].inputs, vec!["vv", "uu"]);
		assert_eq!(data.connections[0].input, "modif");
		assert_eq!(data.connections[0].in_slot, "uu");
	}

	#[test]
	fn missing_fields_default_to_empty() {
		let data: GraphData = serde_json::from_str(r#"{ "nodes": [{ "name": "lonely" }] }"#).unwrap();

		assert!(data.title.is_empty());
		assert!(data.connections.is_empty());
		assert!(data.nodes[0].inputs.is_empty());
		assert!(data.nodes[0].outputs.is_empty());
	}
}
