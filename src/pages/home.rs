use leptos::prelude::*;

use crate::components::graph_editor::{GraphData, GraphEditor, GraphLink, GraphNode};

/// The graph every session starts from.
fn starter_graph() -> GraphData {
	let node = |id: u32, color: &str| GraphNode {
		id,
		label: Some(format!("Node {}", id)),
		color: Some(color.into()),
	};

	GraphData {
		nodes: vec![node(1, "#ff0000"), node(2, "#00ff00"), node(3, "#0000ff")],
		links: vec![
			GraphLink {
				source: 1,
				target: 2,
			},
			GraphLink {
				source: 2,
				target: 3,
			},
		],
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(starter_graph);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div
				class="graph-page"
				style="background-color: #2c2f33; padding: 20px; min-height: 100vh; color: white;"
			>
				<h2>"Graph View"</h2>
				<GraphEditor data=graph_data />
				<p class="subtitle">
					"Click a node to select it. Right-click an edge to mark it. "
					"Drag nodes to pin them. Scroll to zoom."
				</p>
			</div>
		</ErrorBoundary>
	}
}
