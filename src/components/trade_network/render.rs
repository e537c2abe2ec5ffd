use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{EdgeVisual, NodeVisual, Scene};

const LABEL_GAP: f64 = 4.0;
const NODE_STROKE_WIDTH: f64 = 1.5;

pub fn render(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(scene.background);
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);
	for edge in &scene.edges {
		draw_edge(edge, scene.edge_color, ctx);
	}
	ctx.set_global_alpha(1.0);
	for node in &scene.nodes {
		draw_node(node, scene, ctx);
	}
	ctx.set_global_alpha(1.0);
	ctx.restore();
}

fn draw_edge(edge: &EdgeVisual, color: &str, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(edge.alpha);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(edge.width);
	ctx.begin_path();
	ctx.move_to(edge.start.0, edge.start.1);
	ctx.line_to(edge.end.0, edge.end.1);
	ctx.stroke();

	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(edge.tip.0, edge.tip.1);
	ctx.line_to(edge.left.0, edge.left.1);
	ctx.line_to(edge.right.0, edge.right.1);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(node: &NodeVisual, scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let k = scene.transform.k;
	ctx.set_global_alpha(node.alpha);
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.fill);
	ctx.fill();
	ctx.set_stroke_style_str(scene.node_stroke);
	ctx.set_line_width(NODE_STROKE_WIDTH);
	ctx.stroke();

	if node.outlined {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius + 3.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(scene.label_color);
		ctx.set_line_width(1.5 / k);
		ctx.stroke();
	}

	ctx.set_fill_style_str(scene.label_color);
	ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&node.code, node.x, node.y - node.radius - LABEL_GAP);
}
