use log::debug;

use super::config::EditorConfig;
use super::layout::{LayoutEngine, Point};
use super::scene::{Diff, Scene};
use super::store::GraphStore;
use super::types::{EdgeId, NodeId};

/// Screen distance a press may travel and still count as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;
/// Extra hit slack around edge lines, in screen pixels.
pub const EDGE_HIT_SLACK: f64 = 4.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<NodeId>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

/// Outcome of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
	NodeClick(NodeId),
	BackgroundClick,
	/// A node drag or a pan; not a click.
	Moved,
	None,
}

/// Everything the canvas needs between frames: layout, primitives and viewport.
pub struct EditorState {
	pub config: EditorConfig,
	pub layout: LayoutEngine,
	pub scene: Scene,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
}

impl EditorState {
	pub fn new(store: &GraphStore, config: EditorConfig) -> Self {
		let mut state = Self {
			layout: LayoutEngine::new(config.layout.clone()),
			config,
			scene: Scene::default(),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
		};
		state.sync(store);
		state
	}

	/// Reconcile layout and primitives with the store.
	pub fn sync(&mut self, store: &GraphStore) -> Diff {
		let restarted = self.layout.sync(store.nodes(), store.edges());
		let diff = self
			.scene
			.reconcile(store, self.layout.positions(), &self.config.style);
		debug!(
			"scene +{} ~{} -{}, layout restarted: {restarted}",
			diff.created, diff.updated, diff.removed
		);
		diff
	}

	/// One animation frame. Positions reach the primitives only through here.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.layout.tick(dt) {
			return false;
		}
		self.scene.apply_positions(self.layout.positions());
		true
	}

	pub fn stop(&mut self) {
		self.layout.stop();
	}

	pub fn width(&self) -> f64 {
		self.config.width
	}

	pub fn height(&self) -> f64 {
		self.config.height
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		self.scene.node_at(self.screen_to_graph(sx, sy))
	}

	/// Edge under a right-click. Nodes sit on top of lines and shadow them.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<EdgeId> {
		let p = self.screen_to_graph(sx, sy);
		if self.scene.node_at(p).is_some() {
			return None;
		}
		self.scene.edge_at(p, EDGE_HIT_SLACK / self.transform.k)
	}

	/// Pointer down: start dragging the node under the cursor, or pan the viewport.
	pub fn press(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.node_at_position(sx, sy) {
			let at = self
				.layout
				.position(id)
				.unwrap_or_else(|| self.screen_to_graph(sx, sy));
			self.drag = DragState {
				node: Some(id),
				start_x: sx,
				start_y: sy,
				node_start: at,
				moved: false,
			};
			self.layout.pin(id, at);
			self.layout.reheat(self.config.layout.drag_alpha_target);
			self.scene.apply_positions(self.layout.positions());
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
				moved: false,
			};
		}
	}

	pub fn move_to(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.drag.node {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if !self.drag.moved && dx.hypot(dy) <= CLICK_TOLERANCE {
				return;
			}
			self.drag.moved = true;
			let at = Point::new(
				self.drag.node_start.x + dx / self.transform.k,
				self.drag.node_start.y + dy / self.transform.k,
			);
			self.layout.pin(id, at);
			self.scene.apply_positions(self.layout.positions());
		} else if self.pan.active {
			let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
			if !self.pan.moved && dx.hypot(dy) <= CLICK_TOLERANCE {
				return;
			}
			self.pan.moved = true;
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// Pointer up. A dragged node stays pinned where it was dropped.
	pub fn release(&mut self) -> Gesture {
		let gesture = if let Some(id) = self.drag.node {
			self.layout.reheat(0.0);
			if self.drag.moved {
				Gesture::Moved
			} else {
				Gesture::NodeClick(id)
			}
		} else if self.pan.active {
			if self.pan.moved {
				Gesture::Moved
			} else {
				Gesture::BackgroundClick
			}
		} else {
			Gesture::None
		};
		self.drag = DragState::default();
		self.pan = PanState::default();
		gesture
	}

	/// Pointer left the canvas: end any gesture without a click.
	pub fn cancel(&mut self) {
		if self.drag.node.is_some() {
			self.layout.reheat(0.0);
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	/// Zoom about the cursor, clamped to the configured extent.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let (min_k, max_k) = self.config.zoom_extent;
		let new_k = (self.transform.k * factor).clamp(min_k, max_k);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}
}
