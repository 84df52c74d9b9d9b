//! Leptos component wrapping the flow graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, and zooming. The collision simulation
//! runs on a `setInterval` timer that stops once the layout settles and is
//! restarted whenever an interaction reheats it. Every tick and every pointer
//! event that changes the scene triggers a redraw.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::FlowGraphConfig;
use super::render;
use super::state::FlowGraphState;
use super::theme::Theme;
use super::types::GraphData;

/// Bundles the diagram session with what is needed to draw it.
struct GraphContext {
	state: FlowGraphState,
	theme: Theme,
	ctx: CanvasRenderingContext2d,
}

impl GraphContext {
	fn redraw(&self) {
		render::render(&self.state, &self.ctx, &self.theme);
	}
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Periodic simulation timer. Only one interval is ever active.
#[derive(Clone, Default)]
struct Ticker {
	handle: Rc<Cell<Option<i32>>>,
	callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl Ticker {
	fn start(&self, interval_ms: u32) {
		if self.handle.get().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.callback.borrow() {
			match window.set_interval_with_callback_and_timeout_and_arguments_0(
				cb.as_ref().unchecked_ref(),
				interval_ms as i32,
			) {
				Ok(handle) => self.handle.set(Some(handle)),
				Err(e) => warn!("flow-graph: failed to start simulation timer: {:?}", e),
			}
		}
	}

	fn stop(&self) {
		let Some(handle) = self.handle.take() else {
			return;
		};
		if let Some(window) = web_sys::window() {
			window.clear_interval_with_handle(handle);
		}
	}
}

/// Drop the current session and its timer.
fn teardown(context: &SharedContext, ticker: &Ticker) {
	ticker.stop();
	ticker.callback.borrow_mut().take();
	context.borrow_mut().take();
}

/// Redraw after an interaction, and make sure the timer runs if the simulation was reheated.
fn after_interaction(c: &GraphContext, changed: bool, ticker: &Ticker) {
	if changed {
		c.redraw();
	}
	if c.state.is_animating() {
		ticker.start(c.state.simulation.params().tick_ms);
	}
}

/// Canvas-relative pointer position.
fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Renders an interactive flow graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing.
///
/// Graphs that cannot be laid out (dangling references, duplicate names,
/// cycles) are reported in place of the diagram.
#[component]
pub fn FlowGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: FlowGraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let ticker = Ticker::default();
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (error, set_error) = signal(None::<String>);
	let (context_init, ticker_init, resize_cb_init) =
		(context.clone(), ticker.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("flow-graph: canvas 2d context unavailable");
			return;
		};

		teardown(&context_init, &ticker_init);
		let state = match FlowGraphState::new(&data.get(), w, h, &config) {
			Ok(state) => state,
			Err(e) => {
				warn!("flow-graph: cannot lay out graph: {}", e);
				set_error.set(Some(e.to_string()));
				return;
			}
		};
		set_error.set(None);

		let tick_ms = state.simulation.params().tick_ms;
		let graph_context = GraphContext {
			state,
			theme: Theme::from(config.theme),
			ctx,
		};
		graph_context.redraw();
		*context_init.borrow_mut() = Some(graph_context);

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
					c.redraw();
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_tick, ticker_tick) = (context_init.clone(), ticker_init.clone());
		*ticker_init.callback.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_tick.borrow_mut() {
				if c.state.tick() {
					c.redraw();
				}
				if !c.state.is_animating() {
					debug!("flow-graph: timer stopped");
					ticker_tick.stop();
				}
			}
		}));
		ticker_init.start(tick_ms);
	});

	let (context_md, ticker_md) = (context.clone(), ticker.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let changed = c.state.pointer_down(x, y);
			after_interaction(c, changed, &ticker_md);
		}
	};

	let (context_mm, ticker_mm) = (context.clone(), ticker.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let changed = c.state.pointer_move(x, y);
			after_interaction(c, changed, &ticker_mm);
		}
	};

	let (context_mu, ticker_mu) = (context.clone(), ticker.clone());
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			let changed = c.state.pointer_up();
			after_interaction(c, changed, &ticker_mu);
		}
	};

	let (context_ml, ticker_ml) = (context.clone(), ticker.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			let changed = c.state.pointer_up();
			after_interaction(c, changed, &ticker_ml);
		}
	};

	let (context_wh, ticker_wh) = (context.clone(), ticker.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let changed = c.state.wheel(x, y, ev.delta_y());
			after_interaction(c, changed, &ticker_wh);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flow-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		{move || error.get().map(|message| view! { <p class="graph-error">{message}</p> })}
	}
}
