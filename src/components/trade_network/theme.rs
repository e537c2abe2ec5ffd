use super::types::Role;

/// Color scheme, passed explicitly to the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Light,
	Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
	pub background: &'static str,
	/// Links and arrowheads.
	pub edge: &'static str,
	pub node_stroke: &'static str,
	pub label: &'static str,
}

const LIGHT: Palette = Palette {
	background: "#ffffff",
	edge: "#666666",
	node_stroke: "#ffffff",
	label: "#1f2937",
};

const DARK: Palette = Palette {
	background: "#111827",
	edge: "#bbbbbb",
	node_stroke: "#333333",
	label: "#e5e7eb",
};

impl Theme {
	pub fn palette(self) -> Palette {
		match self {
			Theme::Light => LIGHT,
			Theme::Dark => DARK,
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Theme::Light => Theme::Dark,
			Theme::Dark => Theme::Light,
		}
	}

	/// Value for the `data-theme` attribute.
	pub fn as_str(self) -> &'static str {
		match self {
			Theme::Light => "light",
			Theme::Dark => "dark",
		}
	}
}

/// Green for import-only, amber for export-only, violet for both.
pub fn role_color(role: Role) -> &'static str {
	match role {
		Role::Import => "#10b981",
		Role::Export => "#f59e0b",
		Role::Both => "#8b5cf6",
	}
}
