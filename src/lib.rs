//! flow-graph: interactive diagrams of port-based flow graphs.
//!
//! This crate provides a WASM-based viewer that lays out a directed graph of
//! nodes with named input/output ports, removes card overlap with a damped
//! collision simulation, and supports pan/zoom and node dragging.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::flow_graph::{
	FlowConnection, FlowGraphCanvas, FlowGraphConfig, FlowGraphError, FlowGraphState, FlowNode,
	GraphData, Theme, ThemeName,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("flow-graph: logging initialized");
}

/// Text content of the script element with the given id, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

fn parse_embedded<T: DeserializeOwned>(id: &str, json_text: &str) -> Option<T> {
	match serde_json::from_str::<T>(json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("flow-graph: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { title, nodes: [...], connections: [...] }
pub fn load_graph_data() -> Option<GraphData> {
	let data: GraphData = parse_embedded("graph-data", &script_text("graph-data")?)?;
	info!(
		"flow-graph: loaded {} nodes, {} connections",
		data.nodes.len(),
		data.connections.len()
	);
	Some(data)
}

/// Load optional settings from a script element with id="graph-config".
pub fn load_config() -> FlowGraphConfig {
	script_text("graph-config")
		.and_then(|text| parse_embedded("graph-config", &text))
		.unwrap_or_default()
}

/// Main application component.
/// Loads graph data from DOM and renders the interactive diagram.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|| {
		warn!("flow-graph: no graph data found, rendering an empty diagram");
		GraphData::default()
	});
	let config = load_config();
	let title = if graph_data.title.is_empty() {
		"Flow Graph".to_string()
	} else {
		graph_data.title.clone()
	};
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text=title.clone() />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<FlowGraphCanvas data=graph_signal config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>{title}</h1>
				<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
