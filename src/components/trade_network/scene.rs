//! Per-frame visual description of the trade graph.
//!
//! A [`Scene`] is rebuilt from [`TradeNetworkState`] on every frame and handed
//! to the painter; nothing drawn is kept between frames.

use super::state::{TradeNetworkState, ViewTransform};
use super::theme::{Theme, role_color};

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub code: String,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: &'static str,
	pub alpha: f64,
	/// Draws a ring around the node.
	pub outlined: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	pub start: (f64, f64),
	/// Where the line meets the arrowhead base.
	pub end: (f64, f64),
	pub width: f64,
	/// Arrowhead triangle; `tip` sits on the target's rendered boundary.
	pub tip: (f64, f64),
	pub left: (f64, f64),
	pub right: (f64, f64),
	pub alpha: f64,
}

#[derive(Clone, Debug)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub transform: ViewTransform,
	pub background: &'static str,
	pub edge_color: &'static str,
	pub node_stroke: &'static str,
	pub label_color: &'static str,
	pub edges: Vec<EdgeVisual>,
	/// In paint order.
	pub nodes: Vec<NodeVisual>,
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Arrowhead length for a given stroke width.
pub fn arrow_length(width: f64) -> f64 {
	4.0 + 2.0 * width
}

pub fn build_scene(state: &TradeNetworkState, theme: Theme) -> Scene {
	let palette = theme.palette();
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();
	let bodies = state.simulation.bodies();

	// radius as painted, so arrowheads stay on the enlarged hover circle
	let drawn_radius = |idx: usize| {
		let base = state.node_radius(idx);
		if !has_highlight {
			base
		} else if state.is_hovered(idx) {
			base * (1.0 + 0.2 * t)
		} else if state.is_highlighted(idx) {
			base * (1.0 + 0.1 * t)
		} else {
			base
		}
	};

	let edges = state
		.graph
		.edges
		.iter()
		.filter(|e| !e.is_self_loop())
		.filter_map(|e| {
			let (si, ti) = (
				state.graph.node_index(&e.source)?,
				state.graph.node_index(&e.target)?,
			);
			let (s, d) = (bodies.get(si)?, bodies.get(ti)?);
			let (dx, dy) = (d.x - s.x, d.y - s.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 0.001 {
				return None;
			}
			let (ux, uy) = (dx / dist, dy / dist);
			let (rs, rt) = (drawn_radius(si), drawn_radius(ti));
			let width = state.edge_scale.apply(e.value);
			let len = arrow_length(width);

			let tip = (d.x - ux * rt, d.y - uy * rt);
			let end = (tip.0 - ux * len, tip.1 - uy * len);
			let (px, py) = (-uy * len * 0.5, ux * len * 0.5);

			let alpha = if !has_highlight {
				0.6
			} else if state.is_highlighted(si) && state.is_highlighted(ti) {
				0.6 + 0.3 * t
			} else {
				0.6 - 0.45 * t
			};

			Some(EdgeVisual {
				start: (s.x + ux * rs, s.y + uy * rs),
				end,
				width,
				tip,
				left: (end.0 + px, end.1 + py),
				right: (end.0 - px, end.1 - py),
				alpha,
			})
		})
		.collect();

	let visual = |idx: usize| {
		let node = &state.graph.nodes[idx];
		let body = &bodies[idx];
		let radius = drawn_radius(idx);
		let (alpha, outlined) = if !has_highlight || state.is_highlighted(idx) {
			(1.0, has_highlight && state.is_hovered(idx) && t > 0.01)
		} else {
			(1.0 - 0.7 * t, false)
		};
		NodeVisual {
			code: node.code.clone(),
			x: body.x,
			y: body.y,
			radius,
			fill: role_color(node.role),
			alpha,
			outlined,
		}
	};

	// highlighted nodes paint last so they sit on top
	let count = bodies.len().min(state.graph.nodes.len());
	let (front, back): (Vec<usize>, Vec<usize>) =
		(0..count).partition(|&i| has_highlight && state.is_highlighted(i));
	let nodes = back.into_iter().chain(front).map(visual).collect();

	Scene {
		width: state.width,
		height: state.height,
		transform: state.transform.clone(),
		background: palette.background,
		edge_color: palette.edge,
		node_stroke: palette.node_stroke,
		label_color: palette.label,
		edges,
		nodes,
	}
}
