use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::trade_network::{Theme, TradeNetworkCard};

/// Dashboard page
#[component]
pub fn Home(theme: ReadSignal<Theme>, set_theme: WriteSignal<Theme>) -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<header class="dashboard-header">
				<h1>"Palm Oil Dashboard"</h1>
				<nav>
					<A href="/network">"Full screen"</A>
				</nav>
				<button
					class="mode-toggle"
					on:click=move |_| set_theme.update(|t| *t = t.toggled())
				>
					{move || match theme.get() {
						Theme::Light => "Dark mode",
						Theme::Dark => "Light mode",
					}}
				</button>
			</header>

			<main class="dashboard">
				<section class="global-trades">
					<TradeNetworkCard theme=theme />
				</section>
			</main>
		</ErrorBoundary>
	}
}
