//! Editor defaults: canvas geometry, force parameters and drawing style.

/// Colours and stroke widths used when building scene primitives.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
	pub background: &'static str,
	pub node_radius: f64,
	pub node_fill: &'static str,
	pub node_stroke: &'static str,
	pub node_stroke_width: f64,
	pub selected_stroke: &'static str,
	pub selected_stroke_width: f64,
	pub edge_color: &'static str,
	pub edge_width: f64,
	pub marked_edge_color: &'static str,
	pub marked_edge_width: f64,
	pub edge_opacity: f64,
	pub label_color: &'static str,
	pub label_font: &'static str,
	/// Vertical offset of a label from its node centre.
	pub label_offset: f64,
}

impl Default for Style {
	fn default() -> Self {
		Self {
			background: "#2c2f33",
			node_radius: 20.0,
			node_fill: "#666",
			node_stroke: "#000000",
			node_stroke_width: 1.5,
			selected_stroke: "#ffffff",
			selected_stroke_width: 3.0,
			edge_color: "#61dafb",
			edge_width: 2.0,
			marked_edge_color: "#ff69b4",
			marked_edge_width: 4.0,
			edge_opacity: 0.6,
			label_color: "#fff",
			label_font: "14px Arial, sans-serif",
			label_offset: 5.0,
		}
	}
}

/// Force parameters handed to the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
	pub link_distance: f64,
	/// Pairwise many-body strength; negative values repel.
	pub charge_strength: f64,
	pub center: (f64, f64),
	/// Minimum separation radius around each node.
	pub collision_radius: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Heat held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl LayoutParams {
	pub fn centered(width: f64, height: f64) -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 150.0,
			charge_strength: -300.0,
			center: (width / 2.0, height / 2.0),
			collision_radius: 50.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			drag_alpha_target: 0.3,
		}
	}
}

/// Everything the editor needs to size, simulate and draw the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	pub width: f64,
	pub height: f64,
	pub layout: LayoutParams,
	pub style: Style,
	pub zoom_extent: (f64, f64),
}

impl EditorConfig {
	/// Resize the canvas, moving the centring point with it.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = width;
		self.height = height;
		self.layout.center = (width / 2.0, height / 2.0);
		self
	}
}

impl Default for EditorConfig {
	fn default() -> Self {
		let (width, height) = (900.0, 600.0);
		Self {
			width,
			height,
			layout: LayoutParams::centered(width, height),
			style: Style::default(),
			zoom_extent: (0.1, 4.0),
		}
	}
}
