//! Leptos client-side dashboard for the palm oil trade network.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
mod pages;

// Top-Level pages
use crate::components::trade_network::Theme;
use crate::pages::home::Home;
use crate::pages::network::NetworkPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router with the dashboard, a full-screen network view, and a 404 page.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let (theme, set_theme) = signal(Theme::default());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=move || theme.get().as_str() />

		// sets the document title
		<Title text="Palm Oil Dashboard" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route
					path=path!("/")
					view=move || view! { <Home theme=theme set_theme=set_theme /> }
				/>
				<Route path=path!("/network") view=move || view! { <NetworkPage theme=theme /> } />
			</Routes>
		</Router>
	}
}
