use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::acquisition::load_or_empty;
use super::config::TradeNetworkConfig;
use super::derive::derive_graph;
use super::lifecycle::GenerationCounter;
use super::render;
use super::scene::build_scene;
use super::state::TradeNetworkState;
use super::theme::{Theme, role_color};
use super::types::{Role, TradeGraph};

/// Longest frame step fed to the hover fade, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

type Shared<T> = Rc<RefCell<Option<T>>>;

/// Browser-side resources owned by one mounted canvas.
#[derive(Clone, Default)]
struct FrameLoop {
	generations: GenerationCounter,
	state: Shared<TradeNetworkState>,
	pending: Rc<Cell<Option<i32>>>,
	animate: Shared<Closure<dyn FnMut()>>,
	resize: Shared<Closure<dyn FnMut()>>,
}

impl FrameLoop {
	fn schedule(&self, window: &Window) {
		if let Some(ref cb) = *self.animate.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.pending.set(Some(id)),
				Err(e) => warn!("requestAnimationFrame failed: {e:?}"),
			}
		}
	}

	fn cancel_pending(&self) {
		if let Some(id) = self.pending.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
	}

	/// Stop stepping the current graph and drop everything its frame callback holds.
	///
	/// The callback keeps a clone of this loop, so the `animate` slot has to be
	/// emptied here or the closure, the state and the 2d context never drop.
	/// Never called from inside the callback itself.
	fn stop(&self) {
		self.generations.cancel();
		self.cancel_pending();
		if let Some(mut s) = self.state.borrow_mut().take() {
			s.simulation.stop();
		}
		if let Some(cb) = self.resize.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ =
					window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		drop(self.animate.borrow_mut().take());
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	// canvas may be scaled down by CSS
	let (sx, sy) = (
		canvas.width() as f64 / rect.width().max(1.0),
		canvas.height() as f64 / rect.height().max(1.0),
	);
	Some((
		(ev.client_x() as f64 - rect.left()) * sx,
		(ev.client_y() as f64 - rect.top()) * sy,
	))
}

/// Force-directed canvas for one trade graph.
///
/// A new graph replaces the whole layout; the previous frame loop is cancelled
/// before the new one starts.
#[component]
pub fn TradeNetworkCanvas(
	#[prop(into)] graph: Signal<TradeGraph>,
	#[prop(into)] theme: Signal<Theme>,
	#[prop(default = TradeNetworkConfig::default())] config: TradeNetworkConfig,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let frames = StoredValue::new_local(FrameLoop::default());

	Effect::new(move |_| {
		let graph = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let lp = frames.get_value();
		lp.stop();

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((config.width, config.height))
		} else {
			(config.width, config.height)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("2d canvas context unavailable");
				return;
			}
		};

		info!(
			"laying out {} countries and {} trade flows",
			graph.nodes.len(),
			graph.edges.len()
		);
		*lp.state.borrow_mut() = Some(TradeNetworkState::new(graph, w, h, config.simulation.clone()));
		let ticket = lp.generations.advance();
		debug!("frame loop generation {}", ticket.id());

		if fullscreen {
			let (state_resize, canvas_resize) = (lp.state.clone(), canvas.clone());
			*lp.resize.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *lp.resize.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let lp_inner = lp.clone();
		let mut last = js_sys::Date::now();
		*lp.animate.borrow_mut() = Some(Closure::new(move || {
			lp_inner.pending.set(None);
			if !ticket.is_current() {
				return;
			}
			let now = js_sys::Date::now();
			let dt = ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_DT);
			last = now;
			if let Some(ref mut s) = *lp_inner.state.borrow_mut() {
				s.tick(dt);
				let theme = theme.try_get_untracked().unwrap_or_default();
				render::render(&build_scene(s, theme), &ctx);
			}
			if let Some(window) = web_sys::window() {
				lp_inner.schedule(&window);
			}
		}));
		lp.schedule(&window);
	});

	on_cleanup(move || {
		frames.try_with_value(FrameLoop::stop);
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		frames.with_value(|lp| {
			if let Some(ref mut s) = *lp.state.borrow_mut() {
				s.pointer_down(x, y);
			}
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		frames.with_value(|lp| {
			if let Some(ref mut s) = *lp.state.borrow_mut() {
				s.pointer_move(x, y);
			}
		});
	};

	let on_mouseup = move |_: MouseEvent| {
		frames.with_value(|lp| {
			if let Some(ref mut s) = *lp.state.borrow_mut() {
				s.pointer_up();
			}
		});
	};

	let on_mouseleave = move |_: MouseEvent| {
		frames.with_value(|lp| {
			if let Some(ref mut s) = *lp.state.borrow_mut() {
				s.pointer_leave();
			}
		});
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		frames.with_value(|lp| {
			if let Some(ref mut s) = *lp.state.borrow_mut() {
				s.zoom(x, y, ev.delta_y());
			}
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="trade-network-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; max-width: 100%; height: auto; cursor: grab;"
		/>
	}
}

/// Fetch the trade rows once and derive the graph.
///
/// Reads `None` while the request is outstanding. A failed fetch is logged
/// and yields an empty graph.
pub fn use_trade_graph(config: TradeNetworkConfig) -> ReadSignal<Option<TradeGraph>> {
	let (graph, set_graph) = signal(None::<TradeGraph>);
	spawn_local(async move {
		let records = load_or_empty(&config).await;
		let graph = derive_graph(&records);
		info!(
			"derived {} countries and {} flows from {} rows",
			graph.nodes.len(),
			graph.edges.len(),
			records.len()
		);
		let _ = set_graph.try_set(Some(graph));
	});
	graph
}

/// Swatch per role, in the colors the canvas paints nodes with.
#[component]
pub fn RoleLegend() -> impl IntoView {
	view! {
		<ul class="role-legend">
			{Role::ALL
				.into_iter()
				.map(|role| {
					view! {
						<li>
							<span
								class="role-swatch"
								style:background-color=role_color(role)
							></span>
							{role.as_str()}
						</li>
					}
				})
				.collect_view()}
		</ul>
	}
}

/// Dashboard card wrapping the network canvas.
#[component]
pub fn TradeNetworkCard(
	#[prop(into)] theme: Signal<Theme>,
	#[prop(default = TradeNetworkConfig::default())] config: TradeNetworkConfig,
) -> impl IntoView {
	let graph = use_trade_graph(config.clone());
	let loaded = move || graph.with(Option::is_some);
	let graph = Signal::derive(move || graph.get().unwrap_or_default());

	view! {
		<div class="card">
			<div class="card-header">
				<h3 class="card-title">
					{move || {
						if loaded() {
							"Global Palm Oil Trade Network (2024)"
						} else {
							"Global Palm Oil Trade Network"
						}
					}}
				</h3>
				<p class="card-description">
					{move || {
						if loaded() {
							"Green = only import, Amber = only export, Violet = both. Drag to explore."
						} else {
							"Loading…"
						}
					}}
				</p>
			</div>
			<div class="card-content">
				<Show
					when=loaded
					fallback=|| view! { <p class="card-loading">"Loading…"</p> }
				>
					<TradeNetworkCanvas graph=graph theme=theme config=config.clone() />
				</Show>
			</div>
		</div>
	}
}
