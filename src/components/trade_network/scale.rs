/// Square-root scale from `[0, domain_max]` onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
	pub domain_max: f64,
	pub range: (f64, f64),
}

pub const NODE_RADIUS_RANGE: (f64, f64) = (6.0, 28.0);
pub const EDGE_WIDTH_RANGE: (f64, f64) = (1.0, 10.0);

impl SqrtScale {
	pub fn new(domain_max: f64, range: (f64, f64)) -> Self {
		Self { domain_max, range }
	}

	/// Inputs outside the domain clamp to the range ends.
	pub fn apply(&self, value: f64) -> f64 {
		let (lo, hi) = self.range;
		if !(self.domain_max.is_finite() && self.domain_max > 0.0) || !value.is_finite() {
			return lo;
		}
		let t = (value.clamp(0.0, self.domain_max) / self.domain_max).sqrt();
		lo + (hi - lo) * t
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_domain_ends_to_range_ends() {
		let s = SqrtScale::new(400.0, NODE_RADIUS_RANGE);
		assert_eq!(s.apply(0.0), 6.0);
		assert_eq!(s.apply(400.0), 28.0);
		// sqrt(100 / 400) = 0.5
		assert_eq!(s.apply(100.0), 17.0);
	}

	#[test]
	fn is_monotonic_and_concave() {
		let s = SqrtScale::new(1000.0, EDGE_WIDTH_RANGE);
		let a = s.apply(100.0) - s.apply(0.0);
		let b = s.apply(200.0) - s.apply(100.0);
		assert!(a > 0.0 && b > 0.0);
		assert!(b < a);
	}

	#[test]
	fn clamps_out_of_domain_values() {
		let s = SqrtScale::new(10.0, NODE_RADIUS_RANGE);
		assert_eq!(s.apply(-5.0), 6.0);
		assert_eq!(s.apply(1e9), 28.0);
		assert_eq!(s.apply(f64::NAN), 6.0);
	}

	#[test]
	fn degenerate_domain_yields_minimum() {
		assert_eq!(SqrtScale::new(0.0, NODE_RADIUS_RANGE).apply(3.0), 6.0);
		assert_eq!(SqrtScale::new(-1.0, EDGE_WIDTH_RANGE).apply(3.0), 1.0);
	}
}
