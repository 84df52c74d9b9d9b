//! Visual theming for flow graph diagrams.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Centre color of the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Node card style.
#[derive(Clone, Debug)]
pub struct CardStyle {
	pub fill: Color,
	pub border: Color,
	pub border_width: f64,
	/// Border drawn instead of `border` while the card is being dragged.
	pub pinned_border: Color,
	pub title_color: Color,
	pub separator_color: Color,
	pub title_font: &'static str,
	pub label_font: &'static str,
	pub label_color: Color,
}

/// Port circle style.
#[derive(Clone, Debug)]
pub struct PortStyle {
	pub input_fill: Color,
	pub output_fill: Color,
	pub stroke: Color,
	pub stroke_width: f64,
}

/// Edge curve style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Line width in graph units.
	pub width: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub card: CardStyle,
	pub port: PortStyle,
	pub edge: EdgeStyle,
}

impl Theme {
	/// Dark slate theme (default)
	pub fn default_theme() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			card: CardStyle {
				fill: Color::rgba(48, 56, 68, 0.92),
				border: Color::rgb(94, 129, 172),
				border_width: 2.0,
				pinned_border: Color::rgb(129, 161, 193).lighten(0.3),
				title_color: Color::rgb(230, 235, 240),
				separator_color: Color::rgba(140, 160, 180, 0.6),
				title_font: "bold 15px Verdana, sans-serif",
				label_font: "13px Verdana, sans-serif",
				label_color: Color::rgb(200, 208, 216),
			},
			port: PortStyle {
				input_fill: Color::rgb(100, 148, 160),
				output_fill: Color::rgb(108, 142, 173),
				stroke: Color::rgb(230, 235, 240),
				stroke_width: 2.0,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.8),
				width: 3.0,
			},
		}
	}

	/// Grey on white, as the classic standalone diagrams look
	pub fn paper() -> Self {
		let grey = Color::rgb(0x55, 0x55, 0x55);
		Self {
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				color_secondary: Color::rgb(255, 255, 255),
				use_gradient: false,
			},
			card: CardStyle {
				fill: Color::rgba(255, 255, 255, 0.53),
				border: grey,
				border_width: 3.0,
				pinned_border: Color::rgb(0x22, 0x22, 0x22),
				title_color: grey,
				separator_color: grey,
				title_font: "16px Verdana, sans-serif",
				label_font: "14px Verdana, sans-serif",
				label_color: grey,
			},
			port: PortStyle {
				input_fill: grey,
				output_fill: grey,
				stroke: Color::rgb(255, 255, 255),
				stroke_width: 3.0,
			},
			edge: EdgeStyle {
				color: grey,
				width: 3.0,
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

/// Named theme selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
	#[default]
	Default,
	Paper,
}

impl From<ThemeName> for Theme {
	fn from(name: ThemeName) -> Self {
		match name {
			ThemeName::Default => Theme::default_theme(),
			ThemeName::Paper => Theme::paper(),
		}
	}
}
