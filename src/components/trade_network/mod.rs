//! Palm oil trade network: fetch, graph derivation, force layout, canvas.

pub mod acquisition;
mod component;
pub mod config;
pub mod derive;
pub mod lifecycle;
mod render;
pub mod scale;
pub mod scene;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod types;

pub use component::{RoleLegend, TradeNetworkCanvas, TradeNetworkCard, use_trade_graph};
pub use config::{SimulationParams, TradeNetworkConfig};
pub use theme::Theme;
pub use types::{Direction, Role, TradeEdge, TradeGraph, TradeNode, TradeRecord};
