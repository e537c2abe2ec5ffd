//! Force-directed layout for the trade graph.
//!
//! Each tick applies four forces, then integrates velocities:
//! - link: springs along edges toward `link_distance`
//! - charge: inverse-distance repulsion between every pair of bodies
//! - center: shifts the whole layout so its mean sits on the canvas center
//! - collide: pushes apart bodies whose padded radii overlap
//!
//! Forces are scaled by `alpha`, which decays toward `alpha_target` every tick.
//! Once alpha falls below `alpha_min` the simulation stops until restarted.
//! A pinned body is held at its pin but still pushes and pulls its neighbors.

use std::f64::consts::PI;

use log::debug;

use super::config::SimulationParams;
use super::types::TradeGraph;

const INITIAL_RADIUS: f64 = 10.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Rendered radius, used for collision.
	pub radius: f64,
	pub pin: Option<(f64, f64)>,
}

impl Body {
	pub fn is_pinned(&self) -> bool {
		self.pin.is_some()
	}
}

#[derive(Clone, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	params: SimulationParams,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

/// Tiny deterministic offset used to separate coincident bodies.
fn jiggle(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	((x as f64) / 233280.0 - 0.5) * 1e-6
}

impl Simulation {
	/// `radii[i]` is the rendered radius of `graph.nodes[i]`.
	pub fn new(
		graph: &TradeGraph,
		radii: &[f64],
		center: (f64, f64),
		params: SimulationParams,
	) -> Self {
		let angle_step = PI * (3.0 - 5f64.sqrt());
		let bodies: Vec<Body> = (0..graph.nodes.len())
			.map(|i| {
				let (r, a) = (
					INITIAL_RADIUS * (0.5 + i as f64).sqrt(),
					i as f64 * angle_step,
				);
				Body {
					x: center.0 + r * a.cos(),
					y: center.1 + r * a.sin(),
					radius: radii.get(i).copied().unwrap_or(0.0),
					..Body::default()
				}
			})
			.collect();

		let pairs: Vec<(usize, usize)> = graph
			.edges
			.iter()
			.filter(|e| !e.is_self_loop())
			.filter_map(|e| Some((graph.node_index(&e.source)?, graph.node_index(&e.target)?)))
			.collect();
		let mut degree = vec![0usize; bodies.len()];
		for &(s, t) in &pairs {
			degree[s] += 1;
			degree[t] += 1;
		}
		let springs: Vec<Spring> = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Spring {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		debug!(
			"layout created with {} bodies and {} springs",
			bodies.len(),
			springs.len()
		);

		Self {
			bodies,
			springs,
			params,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.bodies.get(idx).map(|b| (b.x, b.y))
	}

	pub fn spring_count(&self) -> usize {
		self.springs.len()
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Raise alpha to at least `alpha` and restart.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
		self.restart();
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Hold body `idx` at `(x, y)` and keep the layout warm while it is held.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		let Some(b) = self.bodies.get_mut(idx) else {
			return;
		};
		b.pin = Some((x, y));
		b.x = x;
		b.y = y;
		b.vx = 0.0;
		b.vy = 0.0;
		self.alpha_target = self.params.drag_alpha_target;
		self.restart();
	}

	/// Let body `idx` move freely again, starting from where it was held.
	pub fn release(&mut self, idx: usize) {
		if let Some(b) = self.bodies.get_mut(idx) {
			b.pin = None;
		}
		if !self.bodies.iter().any(Body::is_pinned) {
			self.alpha_target = 0.0;
		}
	}

	/// Advance one step. Returns false once the layout has cooled.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collide();
		self.integrate();

		if self.alpha < self.params.alpha_min {
			self.running = false;
			debug!("layout cooled");
		}
		true
	}

	fn apply_links(&mut self) {
		let (alpha, distance) = (self.alpha, self.params.link_distance);
		for (i, s) in self.springs.iter().enumerate() {
			let (src, tgt) = (&self.bodies[s.source], &self.bodies[s.target]);
			let mut dx = tgt.x + tgt.vx - src.x - src.vx;
			let mut dy = tgt.y + tgt.vy - src.y - src.vy;
			if dx == 0.0 {
				dx = jiggle(i);
			}
			if dy == 0.0 {
				dy = jiggle(i + 1);
			}
			let l = (dx * dx + dy * dy).sqrt();
			let k = (l - distance) / l * alpha * s.strength;
			dx *= k;
			dy *= k;

			let tgt = &mut self.bodies[s.target];
			tgt.vx -= dx * s.bias;
			tgt.vy -= dy * s.bias;
			let src = &mut self.bodies[s.source];
			src.vx += dx * (1.0 - s.bias);
			src.vy += dy * (1.0 - s.bias);
		}
	}

	fn apply_charge(&mut self) {
		let n = self.bodies.len();
		let strength = self.params.charge_strength * self.alpha;
		let positions: Vec<(f64, f64)> = self.bodies.iter().map(|b| (b.x, b.y)).collect();
		for (i, body) in self.bodies.iter_mut().enumerate() {
			let (xi, yi) = positions[i];
			for (j, &(xj, yj)) in positions.iter().enumerate() {
				if i == j {
					continue;
				}
				let (mut dx, mut dy) = (xj - xi, yj - yi);
				if dx == 0.0 {
					dx = jiggle(i * n + j);
				}
				if dy == 0.0 {
					dy = jiggle(j * n + i);
				}
				let mut l2 = dx * dx + dy * dy;
				// soften very close pairs
				if l2 < 1.0 {
					l2 = l2.sqrt();
				}
				let w = strength / l2;
				body.vx += dx * w;
				body.vy += dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let (dx, dy) = (sx / n as f64 - self.center.0, sy / n as f64 - self.center.1);
		for b in &mut self.bodies {
			b.x -= dx;
			b.y -= dy;
		}
	}

	fn apply_collide(&mut self) {
		let n = self.bodies.len();
		let pad = self.params.collide_padding;
		for i in 0..n {
			let (xi, yi, ri) = {
				let b = &self.bodies[i];
				(b.x + b.vx, b.y + b.vy, b.radius + pad)
			};
			for j in (i + 1)..n {
				let (xj, yj, rj) = {
					let b = &self.bodies[j];
					(b.x + b.vx, b.y + b.vy, b.radius + pad)
				};
				let r = ri + rj;
				let (mut dx, mut dy) = (xi - xj, yi - yj);
				let mut l = dx * dx + dy * dy;
				if l >= r * r {
					continue;
				}
				if dx == 0.0 {
					dx = jiggle(i * n + j);
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = jiggle(j * n + i);
					l += dy * dy;
				}
				let l = l.sqrt();
				let k = (r - l) / l;
				dx *= k;
				dy *= k;
				let share = rj * rj / (ri * ri + rj * rj);

				let bi = &mut self.bodies[i];
				bi.vx += dx * share;
				bi.vy += dy * share;
				let bj = &mut self.bodies[j];
				bj.vx -= dx * (1.0 - share);
				bj.vy -= dy * (1.0 - share);
			}
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.params.velocity_decay;
		for b in &mut self.bodies {
			match b.pin {
				Some((px, py)) => {
					b.x = px;
					b.y = py;
					b.vx = 0.0;
					b.vy = 0.0;
				}
				None => {
					b.vx *= keep;
					b.vy *= keep;
					b.x += b.vx;
					b.y += b.vy;
				}
			}
		}
	}
}
