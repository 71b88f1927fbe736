use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::legend::{DASH_PATTERN, Legend, LegendItem};
use super::palette::Rgba;
use super::scene::{BurstNode, CourseNode, HIGHLIGHT_LABEL_SIZE, RequisiteEdge, STROKE_WIDTH};
use super::state::CourseMapState;

const BACKGROUND: &str = "#ffffff";
const LINE_COLOR: &str = "#000000";
const LEGEND_TEXT: &str = "#333";
const LEGEND_LINE: &str = "#333";
const LEGEND_BORDER: &str = "#ccc";

fn set_dash(ctx: &CanvasRenderingContext2d, dashed: bool) {
	let pattern = if dashed {
		js_sys::Array::of2(
			&JsValue::from_f64(DASH_PATTERN[0]),
			&JsValue::from_f64(DASH_PATTERN[1]),
		)
	} else {
		js_sys::Array::new()
	};
	let _ = ctx.set_line_dash(&pattern);
}

pub fn render(state: &CourseMapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width(), state.height());

	let t = state.viewport().transform();
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	let scene = state.scene();
	for edge in scene.edges.values() {
		draw_edge(edge, ctx);
	}
	for node in scene.nodes.values() {
		draw_node(node, ctx);
	}
	for burst in &scene.bursts {
		draw_burst(burst, ctx);
	}
	ctx.restore();

	ctx.set_global_alpha(state.chrome_opacity());
	draw_legend(state.legend(), ctx);
	ctx.set_global_alpha(1.0);
}

fn draw_edge(edge: &RequisiteEdge, ctx: &CanvasRenderingContext2d) {
	let opacity = edge.opacity.get();
	if opacity <= 0.001 {
		return;
	}
	let ((x1, y1), (x2, y2)) = (edge.from.get(), edge.to.get());
	ctx.set_global_alpha(opacity);
	ctx.set_stroke_style_str(LINE_COLOR);
	ctx.set_line_width(1.0);
	set_dash(ctx, edge.dashed);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();
	set_dash(ctx, false);
	ctx.set_global_alpha(1.0);
}

fn draw_circle(
	ctx: &CanvasRenderingContext2d,
	(x, y): (f64, f64),
	radius: f64,
	fill: Rgba,
	stroke: Rgba,
) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius.max(0.0), 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&fill.css());
	ctx.fill();
	ctx.set_stroke_style_str(&stroke.css());
	ctx.set_line_width(STROKE_WIDTH);
	ctx.stroke();
}

fn draw_label(ctx: &CanvasRenderingContext2d, (x, y): (f64, f64), text: &str, size: f64, fill: Rgba) {
	ctx.set_fill_style_str(&fill.css());
	ctx.set_font(&format!("{size}px Arial"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, x, y);
}

fn draw_node(node: &CourseNode, ctx: &CanvasRenderingContext2d) {
	let pos = node.pos.get();
	let opacity = node.drawn_opacity();
	if opacity > 0.001 {
		ctx.set_global_alpha(opacity);
		draw_circle(ctx, pos, node.radius.get(), node.fill.get(), node.stroke.get());
	}
	let label_opacity = node.drawn_label_opacity();
	if label_opacity > 0.001 {
		ctx.set_global_alpha(label_opacity);
		draw_label(ctx, pos, node.label(), node.label_size.get(), node.label_fill);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_burst(burst: &BurstNode, ctx: &CanvasRenderingContext2d) {
	let pos = burst.pos.get();
	draw_circle(ctx, pos, burst.radius.get(), burst.fill, burst.stroke);
	ctx.set_global_alpha(burst.label_opacity.get());
	draw_label(ctx, pos, burst.label(), HIGHLIGHT_LABEL_SIZE, burst.label_fill);
	ctx.set_global_alpha(1.0);
}

fn draw_legend(legend: &Legend, ctx: &CanvasRenderingContext2d) {
	let c = &legend.config;
	ctx.begin_path();
	ctx.rect(legend.x, legend.y, legend.width, legend.height);
	ctx.set_fill_style_str("white");
	ctx.fill();
	ctx.set_stroke_style_str(LEGEND_BORDER);
	ctx.set_line_width(1.0);
	ctx.stroke();

	for (i, item) in legend.items.iter().enumerate() {
		let (ox, oy) = legend.row_origin(i);
		let (ix, iy) = (ox + c.icon_x, oy + c.icon_y);
		match item {
			LegendItem::CourseType { color, .. } => {
				ctx.begin_path();
				let _ = ctx.arc(ix, iy, c.circle_radius, 0.0, 2.0 * PI);
				ctx.set_fill_style_str("white");
				ctx.fill();
				ctx.set_stroke_style_str(&color.css());
				ctx.set_line_width(c.circle_stroke_width);
				ctx.stroke();
			}
			LegendItem::Required { colors } => {
				for (cx, color) in legend.required_circle_xs(colors.len()).into_iter().zip(colors) {
					ctx.begin_path();
					let _ = ctx.arc(ox + cx, iy, c.circle_radius, 0.0, 2.0 * PI);
					ctx.set_fill_style_str(&color.css());
					ctx.fill();
					ctx.set_stroke_style_str(&color.css());
					ctx.set_line_width(c.circle_stroke_width);
					ctx.stroke();
				}
			}
			LegendItem::PrimaryLine | LegendItem::AlternativeLine => {
				ctx.set_stroke_style_str(LEGEND_LINE);
				ctx.set_line_width(c.line_stroke_width);
				set_dash(ctx, matches!(item, LegendItem::AlternativeLine));
				ctx.begin_path();
				ctx.move_to(ix - c.line_length / 2.0, iy);
				ctx.line_to(ix + c.line_length / 2.0, iy);
				ctx.stroke();
				set_dash(ctx, false);
			}
		}

		ctx.set_fill_style_str(LEGEND_TEXT);
		ctx.set_font(&format!("{}px Arial", c.font_size));
		ctx.set_text_align("start");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(item.label(), ox + c.label_x, iy);
	}
}
