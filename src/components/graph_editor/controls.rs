use leptos::ev;
use leptos::prelude::*;
use log::warn;

use super::error::EditError;
use super::form::{choice_value, edge_option_label, parse_edge_choice, parse_node_choice};
use super::store::GraphStore;

/// Show a rejected edit to the user as a blocking alert.
pub fn notify(err: &EditError) {
	warn!("edit rejected: {err}");
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(&err.to_string());
	}
}

/// Run `op` against a copy of the store and publish it only on success, so a
/// rejected edit never reaches subscribers.
fn apply<T>(
	store: RwSignal<GraphStore>,
	op: impl FnOnce(&mut GraphStore) -> Result<T, EditError>,
) {
	let mut next = store.get_untracked();
	match op(&mut next) {
		Ok(_) => store.set(next),
		Err(err) => notify(&err),
	}
}

/// Form surface: add, delete, rename/recolour nodes; add and delete edges.
#[component]
pub fn EditControls(store: RwSignal<GraphStore>) -> impl IntoView {
	let node_options = move || {
		store.with(|s| {
			s.nodes()
				.iter()
				.map(|n| view! { <option value=n.id.to_string()>{n.label.clone()}</option> })
				.collect_view()
		})
	};
	let edge_options = move || {
		store.with(|s| {
			s.edges()
				.iter()
				.map(|e| {
					view! { <option value=e.id.to_string()>{edge_option_label(s, e)}</option> }
				})
				.collect_view()
		})
	};

	let on_add_node = move |_: ev::MouseEvent| {
		store.update(|s| {
			s.add_node();
		});
	};
	let on_delete_node = move |_: ev::MouseEvent| {
		apply(store, |s| {
			let selected = s.selection.node;
			s.delete_node(selected)
		});
	};
	let on_update_node = move |_: ev::MouseEvent| {
		apply(store, |s| {
			let (selected, draft) = (s.selection.node, s.draft.clone());
			s.update_node(selected, &draft.label, &draft.color)
		});
	};
	let on_add_edge = move |_: ev::MouseEvent| {
		apply(store, |s| {
			let (source, target) = (s.selection.source, s.selection.target);
			s.add_edge(source, target)
		});
	};
	let on_delete_edge = move |_: ev::MouseEvent| {
		apply(store, |s| {
			let marked = s.selection.edge;
			s.delete_edge(marked)
		});
	};

	view! {
		<div class="graph-controls">
			<div class="control-group">
				<button on:click=on_add_node>"Add Node"</button>
			</div>

			<div class="control-group">
				<label for="delete-node-select">"Select Node to Delete: "</label>
				<select
					id="delete-node-select"
					prop:value=move || store.with(|s| choice_value(s.selection.node))
					on:change=move |ev| {
						let id = parse_node_choice(&event_target_value(&ev));
						store.update(|s| s.select_node(id));
					}
				>
					<option value="">"Select Node"</option>
					{node_options}
				</select>
				<button on:click=on_delete_node>"Delete Selected Node"</button>
			</div>

			<div class="control-group">
				<label for="rename-node-input">"Rename Node: "</label>
				<input
					id="rename-node-input"
					type="text"
					placeholder="New label"
					prop:value=move || store.with(|s| s.draft.label.clone())
					on:input=move |ev| {
						let label = event_target_value(&ev);
						store.update(|s| s.draft.label = label);
					}
				/>
				<br />
				<label for="recolor-node-input">"Assign Color: "</label>
				<input
					id="recolor-node-input"
					type="color"
					prop:value=move || store.with(|s| s.draft.color.clone())
					on:input=move |ev| {
						let color = event_target_value(&ev);
						store.update(|s| s.draft.color = color);
					}
				/>
				<br />
				<button on:click=on_update_node>"Update Node"</button>
			</div>

			<div class="control-group">
				<label for="source-node-select">"Add Edge: "</label>
				<br />
				<label for="source-node-select">"Source: "</label>
				<select
					id="source-node-select"
					prop:value=move || store.with(|s| choice_value(s.selection.source))
					on:change=move |ev| {
						let id = parse_node_choice(&event_target_value(&ev));
						store.update(|s| s.set_pending_source(id));
					}
				>
					<option value="">"Select Source Node"</option>
					{node_options}
				</select>
				<br />
				<label for="target-node-select">"Target: "</label>
				<select
					id="target-node-select"
					prop:value=move || store.with(|s| choice_value(s.selection.target))
					on:change=move |ev| {
						let id = parse_node_choice(&event_target_value(&ev));
						store.update(|s| s.set_pending_target(id));
					}
				>
					<option value="">"Select Target Node"</option>
					{node_options}
				</select>
				<br />
				<button on:click=on_add_edge>"Add Edge"</button>
			</div>

			<div class="control-group">
				<label for="delete-edge-select">"Delete Edge: "</label>
				<select
					id="delete-edge-select"
					prop:value=move || store.with(|s| choice_value(s.selection.edge))
					on:change=move |ev| {
						let id = parse_edge_choice(&event_target_value(&ev));
						store.update(|s| s.mark_edge(id));
					}
				>
					<option value="">"Select Edge"</option>
					{edge_options}
				</select>
				<button on:click=on_delete_edge>"Delete Selected Edge"</button>
			</div>
		</div>
	}
}
