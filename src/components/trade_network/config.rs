//! Tunables for the trade network view.

use serde::Deserialize;

/// Backend endpoint serving the raw trade rows.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/trade-data";
/// Commodity phrase the rows are filtered on.
pub const DEFAULT_COMMODITY: &str = "palm oil";

/// Force layout parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Extra spacing added to each rendered radius for collision.
	pub collide_padding: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 140.0,
			charge_strength: -500.0,
			collide_padding: 6.0,
			alpha_min,
			// cools from 1.0 to alpha_min in ~300 ticks
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TradeNetworkConfig {
	pub endpoint: String,
	pub commodity: String,
	pub width: f64,
	pub height: f64,
	pub simulation: SimulationParams,
}

impl Default for TradeNetworkConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.into(),
			commodity: DEFAULT_COMMODITY.into(),
			width: 900.0,
			height: 600.0,
			simulation: SimulationParams::default(),
		}
	}
}
