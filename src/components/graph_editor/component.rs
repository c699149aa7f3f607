use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::EditorConfig;
use super::controls::EditControls;
use super::render;
use super::state::{EditorState, Gesture};
use super::store::GraphStore;
use super::types::GraphData;

/// Longest step handed to the layout, so a backgrounded tab doesn't jolt the graph.
const MAX_FRAME_SECS: f64 = 0.05;

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Stop the layout and release the editor state held by the animation loop.
fn shut_down(slot: &RefCell<Option<EditorState>>) {
	if let Some(mut s) = slot.borrow_mut().take() {
		s.stop();
	}
}

/// Interactive graph editor: a force-laid-out canvas plus its edit form.
#[component]
pub fn GraphEditor(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: Option<EditorConfig>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let (w, h) = (
		width.unwrap_or(config.width),
		height.unwrap_or(config.height),
	);
	let config = config.with_size(w, h);

	let store = RwSignal::new(GraphStore::from_data(&data.get_untracked()));
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<EditorState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let torn_down = Arc::new(AtomicBool::new(false));
	let (state_init, animate_init, torn_down_init) =
		(state.clone(), animate.clone(), torn_down.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("graph editor needs a window");
			return;
		};
		canvas.set_width(config.width as u32);
		canvas.set_height(config.height as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("canvas has no 2d context");
				return;
			}
		};
		*state_init.borrow_mut() = Some(EditorState::new(&store.get_untracked(), config.clone()));
		info!("graph editor mounted at {}x{}", config.width, config.height);

		let (state_anim, animate_inner, stop_flag) =
			(state_init.clone(), animate_init.clone(), torn_down_init.clone());
		let mut last = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if stop_flag.load(Ordering::Relaxed) {
				shut_down(&state_anim);
				// A running closure can't free itself; a timeout drops it after this frame.
				if let Some(win) = web_sys::window() {
					if let Some(cb) = animate_inner.borrow_mut().take() {
						let release = Closure::once_into_js(move || drop(cb));
						let _ = win.set_timeout_with_callback(release.unchecked_ref());
					}
				}
				info!("layout stopped");
				return;
			}
			let now = js_sys::Date::now();
			let dt = ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_SECS) as f32;
			last = now;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Re-run whenever nodes, edges or selection change.
	let state_sync = state.clone();
	Effect::new(move |_| {
		store.with(|snapshot| {
			if let Some(ref mut s) = *state_sync.borrow_mut() {
				s.sync(snapshot);
			}
		});
	});

	// on_cleanup takes a Send + Sync closure.
	let torn_down_cleanup = torn_down.clone();
	on_cleanup(move || {
		torn_down_cleanup.store(true, Ordering::Relaxed);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.move_to(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let gesture = state_mu
			.borrow_mut()
			.as_mut()
			.map(|s| s.release())
			.unwrap_or(Gesture::None);
		match gesture {
			Gesture::NodeClick(id) => store.update(|s| s.focus_node(id)),
			Gesture::BackgroundClick => store.update(|s| s.clear_selection()),
			Gesture::Moved | Gesture::None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel();
		}
	};

	let state_cm = state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let hit = state_cm
			.borrow()
			.as_ref()
			.and_then(|s| s.edge_at_position(x, y));
		if let Some(id) = hit {
			ev.prevent_default();
			store.update(|s| s.mark_edge(Some(id)));
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<div class="graph-editor">
			<canvas
				node_ref=canvas_ref
				class="graph-editor-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:contextmenu=on_contextmenu
				on:wheel=on_wheel
				style="display: block; cursor: grab; border: 1px solid #ccc; border-radius: 4px;"
			/>
			<EditControls store=store />
		</div>
	}
}
