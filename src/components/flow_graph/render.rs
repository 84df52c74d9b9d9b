//! Canvas rendering for flow graph diagrams.
//!
//! Drawing order gives the z-ordering:
//! 1. Background (screen space)
//! 2. Edge curves (graph space), beneath every card
//! 3. Cards in draw order, each with its title, separator and ports

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::metrics::CardMetrics;
use super::model::{Node, PortDirection};
use super::state::FlowGraphState;
use super::theme::Theme;

/// Renders the complete diagram to the canvas.
pub fn render(state: &FlowGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, theme);
	for &id in state.draw_order() {
		draw_card(ctx, state.graph.node(id), &state.metrics, theme);
	}

	ctx.restore();
}

fn draw_background(state: &FlowGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = theme
		.background
		.use_gradient
		.then(|| ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8))
		.and_then(Result::ok);

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(state: &FlowGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_stroke_style_str(&theme.edge.color.to_css());
	ctx.set_line_width(theme.edge.width);

	for edge in state.graph.edges() {
		let from = state.metrics.port_position(&state.graph, edge.source);
		let to = state.metrics.port_position(&state.graph, edge.target);
		let curve = state.metrics.edge_curve(from, to);

		ctx.begin_path();
		ctx.move_to(curve.from.x, curve.from.y);
		ctx.bezier_curve_to(
			curve.ctrl1.x,
			curve.ctrl1.y,
			curve.ctrl2.x,
			curve.ctrl2.y,
			curve.to.x,
			curve.to.y,
		);
		ctx.stroke();
	}
}

fn draw_card(ctx: &CanvasRenderingContext2d, node: &Node, metrics: &CardMetrics, theme: &Theme) {
	let rect = metrics.card_rect(node);
	let style = &theme.card;

	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill_rect(rect.min.x, rect.min.y, rect.width(), rect.height());

	let border = if node.is_pinned() {
		style.pinned_border
	} else {
		style.border
	};
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width(style.border_width);
	ctx.stroke_rect(rect.min.x, rect.min.y, rect.width(), rect.height());

	ctx.set_fill_style_str(&style.title_color.to_css());
	ctx.set_font(style.title_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(
		node.name(),
		rect.min.x + metrics.node_width / 2.0,
		rect.min.y + metrics.title_height / 2.0,
	);

	// Dashed separator under the title
	let dash = metrics.separator_dash();
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(dash),
	));
	ctx.set_stroke_style_str(&style.separator_color.to_css());
	ctx.begin_path();
	ctx.move_to(rect.min.x + metrics.slot_radius, rect.min.y + metrics.title_height);
	ctx.line_to(
		rect.max.x - metrics.slot_radius,
		rect.min.y + metrics.title_height,
	);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for direction in [PortDirection::Input, PortDirection::Output] {
		for (index, label) in node.ports(direction).iter().enumerate() {
			draw_port(ctx, node, metrics, theme, direction, index, label);
		}
	}
}

fn draw_port(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	metrics: &CardMetrics,
	theme: &Theme,
	direction: PortDirection,
	index: usize,
	label: &str,
) {
	let centre = node.position + metrics.port_offset(direction, index);
	let (fill, align, label_x) = match direction {
		PortDirection::Input => (
			theme.port.input_fill,
			"start",
			centre.x + 2.0 * metrics.slot_radius,
		),
		PortDirection::Output => (
			theme.port.output_fill,
			"end",
			centre.x - 2.0 * metrics.slot_radius,
		),
	};

	ctx.begin_path();
	let _ = ctx.arc(centre.x, centre.y, metrics.slot_radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&theme.port.stroke.to_css());
	ctx.set_line_width(theme.port.stroke_width);
	ctx.stroke();

	ctx.set_fill_style_str(&theme.card.label_color.to_css());
	ctx.set_font(theme.card.label_font);
	ctx.set_text_align(align);
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, label_x, centre.y);
}
