use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::EditorState;

pub fn render(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	ctx.set_fill_style_str(style.background);
	ctx.fill_rect(0.0, 0.0, state.width(), state.height());
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_lines(state, ctx);
	draw_circles(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
}

fn draw_lines(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(state.config.style.edge_opacity);
	for (_, line) in state.scene.lines() {
		ctx.set_stroke_style_str(line.color);
		ctx.set_line_width(line.width);
		ctx.begin_path();
		ctx.move_to(line.from.x, line.from.y);
		ctx.line_to(line.to.x, line.to.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_circles(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	for (_, circle) in state.scene.circles() {
		ctx.begin_path();
		let _ = ctx.arc(circle.center.x, circle.center.y, circle.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&circle.fill);
		ctx.fill();
		ctx.set_stroke_style_str(circle.stroke);
		ctx.set_line_width(circle.stroke_width);
		ctx.stroke();
	}
}

fn draw_labels(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	ctx.set_fill_style_str(style.label_color);
	ctx.set_font(style.label_font);
	ctx.set_text_align("center");
	for (_, label) in state.scene.labels() {
		let _ = ctx.fill_text(&label.text, label.at.x, label.at.y);
	}
}
