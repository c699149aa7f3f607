//! Interactive graph editor: store, layout, scene binding and the Leptos surface.

mod component;
mod config;
mod controls;
mod error;
mod form;
mod layout;
mod render;
mod scene;
mod state;
mod store;
mod types;

pub use component::GraphEditor;
pub use types::{GraphData, GraphLink, GraphNode};
