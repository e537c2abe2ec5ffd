use leptos::prelude::*;

use crate::components::trade_network::{
	RoleLegend, Theme, TradeNetworkCanvas, TradeNetworkConfig, use_trade_graph,
};

/// Full-window trade network.
#[component]
pub fn NetworkPage(#[prop(into)] theme: Signal<Theme>) -> impl IntoView {
	let config = TradeNetworkConfig::default();
	let graph = use_trade_graph(config.clone());
	let loading = move || graph.with(Option::is_none);
	let graph = Signal::derive(move || graph.get().unwrap_or_default());

	view! {
		<div class="fullscreen-graph">
			<TradeNetworkCanvas graph=graph theme=theme config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Global Palm Oil Trade Network"</h1>
				<p class="subtitle">
					{move || {
						if loading() {
							"Loading…"
						} else {
							"Drag countries to reposition. Scroll to zoom. Drag background to pan."
						}
					}}
				</p>
				<RoleLegend />
			</div>
		</div>
	}
}
