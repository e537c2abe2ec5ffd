use std::collections::HashSet;

use log::debug;

use super::config::SimulationParams;
use super::scale::{EDGE_WIDTH_RANGE, NODE_RADIUS_RANGE, SqrtScale};
use super::simulation::Simulation;
use super::types::TradeGraph;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
/// Alpha a resize reheats the layout to.
const RESIZE_ALPHA: f64 = 0.3;

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
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	/// 0 = nothing highlighted, 1 = fully highlighted.
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
}

/// Everything the canvas needs for one graph generation.
pub struct TradeNetworkState {
	pub graph: TradeGraph,
	pub simulation: Simulation,
	pub node_scale: SqrtScale,
	pub edge_scale: SqrtScale,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Node index pairs for every non-self-loop edge.
	links: Vec<(usize, usize)>,
}

impl TradeNetworkState {
	pub fn new(graph: TradeGraph, width: f64, height: f64, params: SimulationParams) -> Self {
		let node_scale = SqrtScale::new(graph.max_node_value(), NODE_RADIUS_RANGE);
		let edge_scale = SqrtScale::new(graph.max_edge_value(), EDGE_WIDTH_RANGE);
		let radii: Vec<f64> = graph.nodes.iter().map(|n| node_scale.apply(n.value)).collect();
		let simulation = Simulation::new(&graph, &radii, (width / 2.0, height / 2.0), params);
		let links = graph
			.edges
			.iter()
			.filter(|e| !e.is_self_loop())
			.filter_map(|e| Some((graph.node_index(&e.source)?, graph.node_index(&e.target)?)))
			.collect();

		debug!(
			"trade network state: {} countries, {} flows",
			graph.nodes.len(),
			graph.edges.len()
		);

		Self {
			graph,
			simulation,
			node_scale,
			edge_scale,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			links,
		}
	}

	pub fn node_radius(&self, idx: usize) -> f64 {
		self.graph
			.nodes
			.get(idx)
			.map(|n| self.node_scale.apply(n.value))
			.unwrap_or(NODE_RADIUS_RANGE.0)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose rendered circle contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.simulation
			.bodies()
			.iter()
			.enumerate()
			.rev()
			.find(|(i, b)| {
				let (dx, dy) = (b.x - gx, b.y - gy);
				(dx * dx + dy * dy).sqrt() <= self.node_radius(*i)
			})
			.map(|(i, _)| i)
	}

	/// Grab the node under the pointer, if any, and pin it where it is.
	pub fn begin_drag(&mut self, sx: f64, sy: f64) -> bool {
		if self.drag.active {
			return false;
		}
		let Some(idx) = self.node_at_position(sx, sy) else {
			return false;
		};
		let Some((nx, ny)) = self.simulation.position(idx) else {
			return false;
		};
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: nx,
			node_start_y: ny,
		};
		self.simulation.pin(idx, nx, ny);
		debug!("dragging {}", self.graph.nodes[idx].code);
		true
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let (true, Some(idx)) = (self.drag.active, self.drag.node_idx) else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		self.simulation
			.pin(idx, self.drag.node_start_x + dx, self.drag.node_start_y + dy);
	}

	pub fn end_drag(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			self.simulation.release(idx);
		}
		self.drag.active = false;
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if self.begin_drag(sx, sy) {
			return;
		}
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			self.drag_to(sx, sy);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered);
		}
	}

	pub fn pointer_up(&mut self) {
		self.end_drag();
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	/// Zoom around the pointer; positive `delta_y` zooms out.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		// keep the old highlight around so it can fade out
		if self.hover.node.is_some() && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for &(src, tgt) in &self.links {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Step the layout and the hover fade. `dt` is in seconds.
	pub fn tick(&mut self, dt: f64) -> bool {
		let moved = self.simulation.tick();

		let (target, speed) = if self.hover.node.is_some() {
			(1.0, 6.0)
		} else {
			(0.0, 4.0)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}
		moved
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation.set_center(width / 2.0, height / 2.0);
		self.simulation.reheat(RESIZE_ALPHA);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::trade_network::derive::derive_graph;
	use crate::components::trade_network::types::{Direction, TradeRecord};

	fn rec(reporter: &str, partner: &str, direction: Direction, value: f64) -> TradeRecord {
		TradeRecord {
			reporter: reporter.into(),
			partner: partner.into(),
			direction,
			ref_month: 1,
			commodity: "palm oil".into(),
			value,
		}
	}

	fn state() -> TradeNetworkState {
		let records = vec![
			rec("IDN", "IND", Direction::Export, 400.0),
			rec("MYS", "IND", Direction::Export, 100.0),
			rec("NLD", "MYS", Direction::Import, 50.0),
		];
		TradeNetworkState::new(
			derive_graph(&records),
			900.0,
			600.0,
			SimulationParams::default(),
		)
	}

	fn screen_of(s: &TradeNetworkState, idx: usize) -> (f64, f64) {
		let (x, y) = s.simulation.position(idx).unwrap();
		(x * s.transform.k + s.transform.x, y * s.transform.k + s.transform.y)
	}

	#[test]
	fn empty_graph_initializes_and_ticks() {
		let mut s = TradeNetworkState::new(TradeGraph::default(), 900.0, 600.0, Default::default());
		for _ in 0..10 {
			s.tick(0.016);
		}
		assert_eq!(s.node_at_position(450.0, 300.0), None);
		assert!(!s.begin_drag(450.0, 300.0));
		s.pointer_down(450.0, 300.0);
		s.pointer_move(460.0, 300.0);
		assert_eq!(s.transform.x, 10.0);
	}

	#[test]
	fn radii_follow_the_node_scale() {
		let s = state();
		let ind = s.graph.node_index("IND").unwrap();
		let nld = s.graph.node_index("NLD").unwrap();
		// IND has the largest total (500)
		assert_eq!(s.node_radius(ind), NODE_RADIUS_RANGE.1);
		assert!(s.node_radius(nld) < s.node_radius(ind));
		assert_eq!(s.simulation.bodies()[nld].radius, s.node_radius(nld));
	}

	#[test]
	fn hit_test_uses_rendered_radius() {
		let mut s = state();
		for _ in 0..100 {
			s.tick(0.016);
		}
		let ind = s.graph.node_index("IND").unwrap();
		let (x, y) = screen_of(&s, ind);
		assert_eq!(s.node_at_position(x, y), Some(ind));
		assert_eq!(s.node_at_position(x + 27.0, y), Some(ind));
		assert_ne!(s.node_at_position(x + 29.0, y), Some(ind));
	}

	#[test]
	fn dragged_node_follows_pointer_until_release() {
		let mut s = state();
		for _ in 0..100 {
			s.tick(0.016);
		}
		s.zoom(0.0, 0.0, -1.0);
		let k = s.transform.k;
		let idx = s.graph.node_index("MYS").unwrap();
		let start = s.simulation.position(idx).unwrap();
		let (px, py) = screen_of(&s, idx);

		assert!(s.begin_drag(px, py));
		assert!(!s.begin_drag(px, py), "only one node per pointer");
		s.drag_to(px + 55.0, py - 22.0);
		let expected = (start.0 + 55.0 / k, start.1 - 22.0 / k);
		for _ in 0..20 {
			s.tick(0.016);
			let (x, y) = s.simulation.position(idx).unwrap();
			assert!((x - expected.0).abs() < 1e-9 && (y - expected.1).abs() < 1e-9);
		}

		s.end_drag();
		assert!(!s.drag.active);
		assert!(!s.simulation.bodies()[idx].is_pinned());
		s.tick(0.016);
		assert_ne!(s.simulation.position(idx).unwrap(), expected);
	}

	#[test]
	fn background_drag_pans() {
		let mut s = state();
		s.pointer_down(5.0, 5.0);
		assert!(s.pan.active);
		s.pointer_move(25.0, -5.0);
		assert_eq!((s.transform.x, s.transform.y), (20.0, -10.0));
		s.pointer_up();
		assert!(!s.pan.active);
	}

	#[test]
	fn zoom_is_clamped_and_keeps_pointer_fixed() {
		let mut s = state();
		let before = s.screen_to_graph(300.0, 200.0);
		s.zoom(300.0, 200.0, -1.0);
		let after = s.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		for _ in 0..200 {
			s.zoom(0.0, 0.0, 1.0);
		}
		assert_eq!(s.transform.k, MIN_ZOOM);
		for _ in 0..200 {
			s.zoom(0.0, 0.0, -1.0);
		}
		assert_eq!(s.transform.k, MAX_ZOOM);
	}

	#[test]
	fn hover_highlights_trading_partners() {
		let mut s = state();
		let ind = s.graph.node_index("IND").unwrap();
		let idn = s.graph.node_index("IDN").unwrap();
		let mys = s.graph.node_index("MYS").unwrap();
		let nld = s.graph.node_index("NLD").unwrap();

		s.set_hover(Some(ind));
		assert!(s.is_hovered(ind));
		assert!(s.is_highlighted(idn) && s.is_highlighted(mys));
		assert!(!s.is_highlighted(nld));

		for _ in 0..60 {
			s.tick(0.016);
		}
		assert!(s.hover.highlight_t > 0.9);

		s.set_hover(None);
		assert!(s.has_active_highlight(), "fades out");
		for _ in 0..120 {
			s.tick(0.016);
		}
		assert!(!s.has_active_highlight());
		assert_eq!(s.hover.highlight_t, 0.0);
	}

	#[test]
	fn resize_recenters_layout() {
		let mut s = state();
		while s.tick(0.016) {}
		s.resize(400.0, 400.0);
		assert!(s.simulation.is_running());
		for _ in 0..300 {
			s.tick(0.016);
		}
		let n = s.simulation.bodies().len() as f64;
		let mx: f64 = s.simulation.bodies().iter().map(|b| b.x / n).sum();
		assert!((mx - 200.0).abs() < 1.0);
	}
}
